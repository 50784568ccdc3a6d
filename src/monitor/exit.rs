//! Final notice and exit status once the loop has ended

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use anyhow::{anyhow, Result};
use colored::Colorize;
use tracing::error;

use crate::notifier::Notify;

use super::messages::{crashed_notice, stopped_notice};

/// Exit status after a requested stop.
pub const EXIT_STOPPED: u8 = 0;

/// Exit status after an error or panic escaped the loop.
pub const EXIT_CRASHED: u8 = 1;

/// Run `body`, turning a panic into an error so it can still be reported.
pub fn run_guarded<F>(body: F) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    panic::catch_unwind(AssertUnwindSafe(body))
        .unwrap_or_else(|payload| Err(anyhow!("panic: {}", panic_message(payload.as_ref()))))
}

/// Send the stopped or crashed notice for `outcome` and pick the exit status.
///
/// Delivery of the notice is best-effort and never changes the status.
pub fn report_exit<N: Notify + ?Sized>(notifier: &N, outcome: Result<()>) -> u8 {
    match outcome {
        Ok(()) => {
            println!("\n\n{}", "Monitoring stopped by user.".yellow());
            let _ = notifier.notify(stopped_notice());
            EXIT_STOPPED
        }
        Err(e) => {
            let message = crashed_notice(&format!("{e:#}"));
            error!("{message}");
            let _ = notifier.notify(&message);
            EXIT_CRASHED
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
