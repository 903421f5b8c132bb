use crate::error::ApiError;
use crate::models::{BookingStatus, EnquiryStatus, ScheduleStatus};

/// A status enum with a fixed table of legal next states.
pub trait WorkflowStatus: Copy + PartialEq + Send + 'static {
    fn next_statuses(&self) -> &'static [Self];
    fn as_str(&self) -> &'static str;
    fn label(&self) -> &'static str;

    fn can_move_to(&self, target: Self) -> bool {
        self.next_statuses().contains(&target)
    }
}

/// An entity that carries a workflow status.
pub trait HasStatus {
    type Status: WorkflowStatus;

    fn status(&self) -> Self::Status;
    fn set_status(&mut self, status: Self::Status);
}

impl WorkflowStatus for BookingStatus {
    fn next_statuses(&self) -> &'static [Self] {
        use BookingStatus::*;
        match self {
            Pending => &[Active, Completed, Canceled],
            Active => &[Completed, Canceled],
            Completed => &[],
            Canceled => &[Pending],
            Unknown => &[],
        }
    }

    fn as_str(&self) -> &'static str {
        BookingStatus::as_str(self)
    }

    fn label(&self) -> &'static str {
        self.display_name()
    }
}

impl WorkflowStatus for ScheduleStatus {
    fn next_statuses(&self) -> &'static [Self] {
        use ScheduleStatus::*;
        match self {
            Pending => &[InProgress, Completed, Canceled],
            InProgress => &[Completed, Canceled],
            Completed => &[Pending, Canceled],
            Canceled => &[Pending, InProgress],
            Unknown => &[],
        }
    }

    fn as_str(&self) -> &'static str {
        ScheduleStatus::as_str(self)
    }

    fn label(&self) -> &'static str {
        self.display_name()
    }
}

impl WorkflowStatus for EnquiryStatus {
    /// Review is free-form: any known status other than the current one.
    fn next_statuses(&self) -> &'static [Self] {
        use EnquiryStatus::*;
        match self {
            Pending => &[InReview, Accepted, Rejected],
            InReview => &[Pending, Accepted, Rejected],
            Accepted => &[Pending, InReview, Rejected],
            Rejected => &[Pending, InReview, Accepted],
            Unknown => &[],
        }
    }

    fn as_str(&self) -> &'static str {
        EnquiryStatus::as_str(self)
    }

    fn label(&self) -> &'static str {
        self.display_name()
    }
}

/// Refuse an illegal move before anything goes over the wire.
pub fn check_transition<S: WorkflowStatus>(current: S, target: S) -> Result<(), ApiError> {
    if current.can_move_to(target) {
        return Ok(());
    }
    let allowed: Vec<&str> = current.next_statuses().iter().map(|s| s.as_str()).collect();
    Err(ApiError::Validation(if allowed.is_empty() {
        format!("{} is a final status and cannot be changed", current.as_str())
    } else {
        format!(
            "Cannot move from {} to {} (allowed: {})",
            current.as_str(),
            target.as_str(),
            allowed.join(", ")
        )
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_table() {
        use BookingStatus::*;
        assert_eq!(Pending.next_statuses(), &[Active, Completed, Canceled]);
        assert_eq!(Active.next_statuses(), &[Completed, Canceled]);
        assert!(Completed.next_statuses().is_empty());
        assert_eq!(Canceled.next_statuses(), &[Pending]);
        assert!(Unknown.next_statuses().is_empty());
    }

    #[test]
    fn schedule_table() {
        use ScheduleStatus::*;
        assert_eq!(Pending.next_statuses(), &[InProgress, Completed, Canceled]);
        assert_eq!(InProgress.next_statuses(), &[Completed, Canceled]);
        assert_eq!(Completed.next_statuses(), &[Pending, Canceled]);
        assert_eq!(Canceled.next_statuses(), &[Pending, InProgress]);
    }

    #[test]
    fn enquiry_offers_every_other_status() {
        for status in EnquiryStatus::ALL {
            let next = status.next_statuses();
            assert_eq!(next.len(), 3);
            assert!(!next.contains(&status));
            let expected: Vec<EnquiryStatus> =
                EnquiryStatus::ALL.into_iter().filter(|s| *s != status).collect();
            assert_eq!(next, expected.as_slice());
        }
    }

    #[test]
    fn terminal_status_is_refused() {
        let err = check_transition(BookingStatus::Completed, BookingStatus::Pending).unwrap_err();
        assert_eq!(
            err,
            ApiError::Validation("COMPLETED is a final status and cannot be changed".into())
        );
        assert!(check_transition(BookingStatus::Canceled, BookingStatus::Pending).is_ok());
        assert!(check_transition(ScheduleStatus::InProgress, ScheduleStatus::Pending).is_err());
    }
}
