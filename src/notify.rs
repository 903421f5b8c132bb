use std::collections::VecDeque;
use std::time::{Duration, Instant};

use log::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub created: Instant,
}

/// Short-lived toast messages. Old entries expire on `prune`.
#[derive(Debug)]
pub struct Notices {
    queue: VecDeque<Notice>,
    ttl: Duration,
}

const MAX_QUEUED: usize = 20;

impl Notices {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            queue: VecDeque::new(),
            ttl: Duration::from_secs(ttl_secs.max(1)),
        }
    }

    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            NoticeLevel::Error => error!("{}", message),
            _ => info!("{}", message),
        }
        self.queue.push_back(Notice {
            level,
            message,
            created: Instant::now(),
        });
        while self.queue.len() > MAX_QUEUED {
            self.queue.pop_front();
        }
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Info, message);
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.queue.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.queue.iter()
    }

    pub fn prune(&mut self) {
        let ttl = self.ttl;
        self.queue.retain(|n| n.created.elapsed() < ttl);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Move notices raised elsewhere (a worker's scratch queue) into this
    /// one. They were already logged when first pushed.
    pub fn absorb(&mut self, other: Notices) {
        self.queue.extend(other.queue);
        while self.queue.len() > MAX_QUEUED {
            self.queue.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_is_most_recent() {
        let mut notices = Notices::new(4);
        notices.success("Region created");
        notices.error("Failed to delete doula");
        let latest = notices.latest().unwrap();
        assert_eq!(latest.level, NoticeLevel::Error);
        assert_eq!(latest.message, "Failed to delete doula");
    }

    #[test]
    fn prune_keeps_fresh_entries() {
        let mut notices = Notices::new(60);
        notices.info("Loaded");
        notices.prune();
        assert!(!notices.is_empty());
    }

    #[test]
    fn queue_is_bounded() {
        let mut notices = Notices::new(60);
        for i in 0..30 {
            notices.info(format!("n{}", i));
        }
        assert_eq!(notices.iter().count(), MAX_QUEUED);
        assert_eq!(notices.iter().next().unwrap().message, "n10");
    }

    #[test]
    fn absorb_appends_in_order() {
        let mut main = Notices::new(60);
        main.info("Loaded");
        let mut scratch = Notices::new(60);
        scratch.success("Region Pune created");
        main.absorb(scratch);
        assert_eq!(main.iter().count(), 2);
        assert_eq!(main.latest().unwrap().message, "Region Pune created");
    }
}
