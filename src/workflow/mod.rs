pub mod menu;
pub mod status;

pub use menu::{apply_transition, StatusMenu};
pub use status::{check_transition, HasStatus, WorkflowStatus};
