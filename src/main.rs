use std::process::{self, ExitCode};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use amp_monitor::config::MonitorConfig;
use amp_monitor::fetcher::Fetcher;
use amp_monitor::http::ReqwestTransport;
use amp_monitor::monitor::{report_exit, run_guarded, Monitor};
use amp_monitor::notifier::Notifier;
use amp_monitor::shutdown;

type SharedNotifier = Arc<Notifier<Arc<ReqwestTransport>>>;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = MonitorConfig::default();
    let transport = match ReqwestTransport::new() {
        Ok(transport) => Arc::new(transport),
        Err(e) => {
            error!("Cannot start monitor: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    let notifier = Arc::new(Notifier::new(Arc::clone(&transport), &config));
    let fetcher = Fetcher::new(transport, &config);

    let outcome = run_guarded(|| run(config, fetcher, &notifier));
    ExitCode::from(report_exit(&*notifier, outcome))
}

/// Install the interrupt handler and run the monitor until it stops.
///
/// The first interrupt stops the loop at its next checkpoint. A second one
/// sends the stopped notice and exits without waiting for in-flight requests.
fn run(
    config: MonitorConfig,
    fetcher: Fetcher<Arc<ReqwestTransport>>,
    notifier: &SharedNotifier,
) -> Result<()> {
    let (handle, signal) = shutdown::channel();
    let interrupt_notifier = Arc::clone(notifier);
    ctrlc::set_handler(move || {
        if handle.request() == 1 {
            info!("Interrupt received, stopping after the current step (press Ctrl+C again to force)");
        } else {
            warn!("Second interrupt received, stopping now");
            process::exit(i32::from(report_exit(&*interrupt_notifier, Ok(()))));
        }
    })
    .context("Failed to set Ctrl+C handler")?;

    let mut monitor = Monitor::new(config, fetcher, &**notifier);
    monitor.run(&signal)
}
