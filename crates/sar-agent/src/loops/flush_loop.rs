//! Detection flush loop.
//!
//! Drains the detection queue to the downstream sink on a fixed interval,
//! prunes aged entries and drops drones that stopped reporting.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::time::{interval_at, Instant};

use crate::config::Config;
use crate::coordinator::SearchCoordinator;

pub async fn run_flush_loop(
    coordinator: Arc<SearchCoordinator>,
    config: Config,
    mut shutdown: broadcast::Receiver<()>,
) {
    let period = config.flush_interval();
    let stale_after = config.drone_stale_after();
    let mut ticker = interval_at(Instant::now() + period, period);

    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                tracing::info!("Flush loop shutting down");
                break;
            }
            _ = ticker.tick() => {
                let summary = coordinator.flush();
                if summary.failed > 0 {
                    tracing::warn!(
                        "Flush delivered {}/{} detections",
                        summary.emitted,
                        summary.emitted + summary.failed
                    );
                }
                if summary.pruned > 0 {
                    tracing::debug!(
                        "Pruned {} detections ({} remaining)",
                        summary.pruned,
                        summary.remaining
                    );
                }

                let dropped = coordinator.prune_stale_drones(stale_after);
                if dropped > 0 {
                    tracing::info!("Dropped {} stale drone(s) from tracking", dropped);
                }
            }
        }
    }

    let summary = coordinator.flush();
    if summary.emitted + summary.failed > 0 {
        tracing::info!("Final flush reported {} detections", summary.emitted);
    }
}
