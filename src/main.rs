/*!
 * Handoff Kernel - Driver Host
 *
 * Loads the handoff driver and keeps it alive until Ctrl+C:
 * - Process handler registry
 * - Provider table and syscall dispatch
 * - Control device at /dev/reality
 */

use handoff_kernel::driver::config::CONFIG_FILE_VAR;
use handoff_kernel::{init_tracing, Driver, DriverConfig};
use miette::IntoDiagnostic;
use std::time::Duration;
use tracing::info;

const STATS_INTERVAL: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> miette::Result<()> {
    let config = DriverConfig::load()?;
    init_tracing(config.trace_json);

    info!("Handoff kernel starting...");
    info!(
        file = ?std::env::var(CONFIG_FILE_VAR).ok(),
        device = %config.device.path.display(),
        providers = ?config.providers,
        max_tracked = config.max_tracked_processes,
        "Configuration loaded"
    );
    let driver = Driver::load(config)?;
    info!(
        device = %driver.config().device.path.display(),
        providers = ?driver.providers().names(),
        "Driver ready - press Ctrl+C to exit"
    );

    let mut stats = tokio::time::interval(STATS_INTERVAL);
    stats.tick().await;

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal.into_diagnostic()?;
                break;
            }
            _ = stats.tick() => {
                let pool = driver.registry().allocator_stats();
                info!(
                    tracked = driver.registry().len(),
                    peak = pool.peak,
                    failures = pool.failures,
                    requests = driver.device().request_count(),
                    "Driver running"
                );
            }
        }
    }

    info!("Shutting down...");
    driver.unload();
    Ok(())
}
