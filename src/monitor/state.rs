//! Transition detection across polling cycles

use std::fmt;

use crate::extract::PageStatus;
use crate::fetcher::PollResult;

/// Admission status as seen by the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Nothing observed yet.
    Unknown,
    Full,
    Open,
}

impl Status {
    /// Only the FULL keyword decides; a page without it counts as open.
    pub fn from_page(page: &PageStatus) -> Self {
        if page.is_full {
            Status::Full
        } else {
            Status::Open
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Unknown => write!(f, "UNKNOWN"),
            Status::Full => write!(f, "FULL"),
            Status::Open => write!(f, "OPEN"),
        }
    }
}

/// A change between two known statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// FULL -> OPEN
    Opened,
    /// OPEN -> FULL
    Reverted,
}

/// Memory carried from one cycle to the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorState {
    previous_status: Status,
    check_count: u64,
}

impl Default for MonitorState {
    fn default() -> Self {
        Self::new()
    }
}

impl MonitorState {
    pub fn new() -> Self {
        Self {
            previous_status: Status::Unknown,
            check_count: 0,
        }
    }

    pub fn previous_status(&self) -> Status {
        self.previous_status
    }

    pub fn check_count(&self) -> u64 {
        self.check_count
    }

    /// Start a new polling cycle, returning its 1-based number.
    pub fn begin_check(&mut self) -> u64 {
        self.check_count += 1;
        self.check_count
    }

    /// Fold one poll result into the state.
    ///
    /// Failed polls leave the previous status untouched. The first successful
    /// observation never yields a transition.
    pub fn observe(&mut self, result: &PollResult) -> Option<Transition> {
        let Ok(page) = result else {
            return None;
        };

        let current = Status::from_page(page);
        let transition = match (self.previous_status, current) {
            (Status::Full, Status::Open) => Some(Transition::Opened),
            (Status::Open, Status::Full) => Some(Transition::Reverted),
            _ => None,
        };
        self.previous_status = current;
        transition
    }
}
