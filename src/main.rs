/*!
 * lowmemd - Main Entry Point
 *
 * Userspace low-memory killer daemon: polls the policy engine's reclaim
 * estimate and runs kill rounds while the system stays under pressure.
 */

use std::error::Error;
use std::time::Duration;
use tracing::info;

use lowmemd::sys::{ProcCatalog, ProcMemoryProvider};
use lowmemd::{init_tracing, EngineParams, PolicyEngine, ReclaimSource};

/// How often the daemon plays reclaim scheduler
const POLL_INTERVAL: Duration = Duration::from_millis(500);

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    info!("lowmemd starting...");

    let params = EngineParams::from_env();
    info!(
        severities = ?params.severities,
        min_free_pages = ?params.min_free_pages,
        cost = params.cost,
        debug_level = params.debug_level,
        "Loaded engine parameters"
    );

    let engine = PolicyEngine::new(ProcMemoryProvider::new(), ProcCatalog::new(), params);
    info!(cost = engine.cost(), "Policy engine initialized");

    let mut ticker = tokio::time::interval(POLL_INTERVAL);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // The estimate only says "there is something reclaimable";
                // the round itself decides whether pressure warrants a kill.
                if engine.estimate() > 0 {
                    let freed = engine.reclaim(0);
                    if freed > 0 {
                        info!(freed_pages = freed, "Reclaim round freed memory");
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received, exiting");
                break;
            }
        }
    }

    Ok(())
}
