//! Scout agent - detection queue and drone tracking for search missions

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sar_agent::loops::flush_loop::run_flush_loop;
use sar_agent::{BroadcastSink, Config, DetectionSink, SearchCoordinator, SystemClock, TracingSink};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();
    init_tracing(&config)?;

    tracing::info!("Starting scout agent...");

    let sink = BroadcastSink::new(config.event_channel_capacity);
    let mut events = sink.subscribe();
    let coordinator = Arc::new(SearchCoordinator::from_config(
        &config,
        Arc::new(SystemClock),
        Arc::new(sink),
    ));

    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    let flush = tokio::spawn(run_flush_loop(
        coordinator.clone(),
        config.clone(),
        shutdown_tx.subscribe(),
    ));

    // Until a transport is attached, downstream events go to the log.
    let relay = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if let Err(err) = TracingSink.publish(event) {
                        tracing::warn!("Event relay failed: {}", err);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("Event relay lagged, skipped {} events", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    tracing::info!(
        "Flushing detections every {}s, retaining {}s",
        config.flush_interval_secs,
        config.retention_secs
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown requested");

    let _ = shutdown_tx.send(());
    flush.await?;
    relay.abort();

    Ok(())
}

fn init_tracing(config: &Config) -> Result<()> {
    let filter =
        tracing_subscriber::EnvFilter::from_default_env().add_directive("sar_agent=debug".parse()?);

    if config.log_json {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(filter)
            .init();
    }
    Ok(())
}
