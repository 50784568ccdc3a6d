//! Admission monitor
//!
//! Polls the status page on a fixed interval, remembers the last known
//! status, and alerts through the webhook when it flips between FULL and OPEN.

pub mod core;
pub mod exit;
pub mod messages;
mod state;


pub use self::core::{CycleReport, Monitor};
pub use exit::{report_exit, run_guarded, EXIT_CRASHED, EXIT_STOPPED};
pub use state::{MonitorState, Status, Transition};
