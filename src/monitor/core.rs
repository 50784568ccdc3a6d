//! Poll-detect-notify loop

use anyhow::{Context, Result};
use chrono::Local;
use colored::Colorize;
use tracing::{info, warn};

use crate::config::MonitorConfig;
use crate::fetcher::{PollResult, StatusSource};
use crate::notifier::{Delivery, Notify};
use crate::shutdown::ShutdownSignal;

use super::messages::{startup_notice, timestamp, transition_alert};
use super::state::{MonitorState, Status, Transition};

const RULE_WIDTH: usize = 60;

/// What happened during one polling cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub check: u64,
    /// Status derived this cycle, `None` when the poll failed.
    pub observed: Option<Status>,
    pub transition: Option<Transition>,
    pub delivery: Option<Delivery>,
}

/// Drives the polling cycle and owns the transition memory.
pub struct Monitor<S, N> {
    config: MonitorConfig,
    source: S,
    notifier: N,
    state: MonitorState,
}

impl<S: StatusSource, N: Notify> Monitor<S, N> {
    pub fn new(config: MonitorConfig, source: S, notifier: N) -> Self {
        Self {
            config,
            source,
            notifier,
            state: MonitorState::new(),
        }
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Run until a stop is requested on `shutdown`.
    ///
    /// Per-cycle failures are logged and retried on the next cycle; only
    /// errors that break the loop itself are returned.
    pub fn run(&mut self, shutdown: &ShutdownSignal) -> Result<()> {
        self.print_banner();
        let _ = self.startup();
        self.print_started();

        if shutdown.is_requested() {
            return Ok(());
        }

        loop {
            let (check, result) = self.poll_step();
            // A stop requested while the poll was in flight wins over its result
            if shutdown.is_requested() {
                info!(check, "Shutdown requested during check, result discarded");
                return Ok(());
            }
            self.apply_step(check, result);
            self.log_next_check()?;

            if shutdown.wait(self.config.check_interval) {
                info!(checks = self.state.check_count(), "Shutdown requested");
                return Ok(());
            }
        }
    }

    /// Diagnostic poll followed by the "monitor active" notice.
    ///
    /// A successful diagnostic poll becomes the first known status.
    pub fn startup(&mut self) -> Delivery {
        info!("Testing connections...");
        let result = self.source.poll();
        match &result {
            Ok(page) => {
                info!(
                    status = %Status::from_page(page),
                    "Website connection successful"
                );
            }
            Err(e) => {
                warn!(
                    error = %e,
                    "Website connection failed, will retry every {} minutes",
                    self.config.interval_minutes()
                );
            }
        }
        // Previous status is Unknown here, so this never alerts
        let _ = self.state.observe(&result);

        info!("Sending webhook test message...");
        let delivery = self
            .notifier
            .notify(&startup_notice(self.config.interval_minutes()));
        if delivery.is_delivered() {
            info!("Webhook working");
        } else {
            warn!("Webhook failed, check the webhook URL");
        }
        delivery
    }

    /// One fetch-extract-decide-notify pass.
    pub fn run_cycle(&mut self) -> CycleReport {
        let (check, result) = self.poll_step();
        self.apply_step(check, result)
    }

    fn poll_step(&mut self) -> (u64, PollResult) {
        let check = self.state.begin_check();
        info!(check, time = %timestamp(Local::now()), "Checking website");
        (check, self.source.poll())
    }

    fn apply_step(&mut self, check: u64, result: PollResult) -> CycleReport {
        let observed = match &result {
            Ok(page) => {
                let status = Status::from_page(page);
                info!(check, %status, "Status");
                Some(status)
            }
            Err(e) => {
                warn!(check, error = %e, "Failed to check website");
                None
            }
        };

        let transition = self.state.observe(&result);
        let delivery = transition.map(|t| self.alert(t));

        CycleReport {
            check,
            observed,
            transition,
            delivery,
        }
    }

    fn alert(&self, transition: Transition) -> Delivery {
        let message = transition_alert(transition, &self.config.website_url, Local::now());
        let delivery = self.notifier.notify(&message);
        match transition {
            Transition::Opened => info!("Status changed to OPEN, alert sent"),
            Transition::Reverted => info!("Status changed back to FULL"),
        }
        delivery
    }

    fn log_next_check(&self) -> Result<()> {
        let interval = chrono::Duration::from_std(self.config.check_interval)
            .context("Check interval out of range")?;
        let next = Local::now()
            .checked_add_signed(interval)
            .context("Next check time out of range")?;
        info!(
            "Next check in {} minutes at {}",
            self.config.interval_minutes(),
            next.format("%H:%M:%S")
        );
        Ok(())
    }

    fn print_banner(&self) {
        println!("{}", "=".repeat(RULE_WIDTH));
        println!("{}", "AMP Free Admission Monitor Started".bold());
        println!("Website: {}", self.config.website_url.cyan());
        println!(
            "Check Interval: {} minutes",
            self.config.interval_minutes()
        );
        println!("Started at: {}", timestamp(Local::now()).dimmed());
        println!("{}", "=".repeat(RULE_WIDTH));
    }

    fn print_started(&self) {
        println!();
        println!("{}", "=".repeat(RULE_WIDTH));
        println!("{}", "Monitoring started. Press Ctrl+C to stop.".green());
        println!("{}", "=".repeat(RULE_WIDTH));
    }
}
