//! Flush loop behavior under paused tokio time.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::broadcast;

use sar_agent::loops::flush_loop::run_flush_loop;
use sar_agent::{
    Config, DetectionEvent, DetectionSink, ManualClock, SearchCoordinator, SinkError,
};
use sar_core::models::{DetectionReport, DetectionType, Urgency, Waypoint};

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<DetectionEvent>>,
}

impl RecordingSink {
    fn reports(&self) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| matches!(e, DetectionEvent::DetectionReport { .. }))
            .count()
    }
}

impl DetectionSink for RecordingSink {
    fn publish(&self, event: DetectionEvent) -> Result<(), SinkError> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

fn report(confidence: f64) -> DetectionReport {
    DetectionReport {
        drone_id: "scout-1".into(),
        image_ref: "frame-7".into(),
        location: Waypoint::new(25.03, 121.56, 40.0),
        confidence,
        detection_type: DetectionType::Victim,
        urgency: Urgency::Low,
    }
}

fn setup() -> (Arc<SearchCoordinator>, Arc<RecordingSink>, Arc<ManualClock>, Config) {
    let config = Config::default();
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let sink = Arc::new(RecordingSink::default());
    let coordinator = Arc::new(SearchCoordinator::from_config(
        &config,
        clock.clone(),
        sink.clone(),
    ));
    (coordinator, sink, clock, config)
}

#[tokio::test(start_paused = true)]
async fn flushes_on_interval_and_on_shutdown() {
    let (coordinator, sink, _clock, config) = setup();
    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
    let handle = tokio::spawn(run_flush_loop(coordinator.clone(), config, shutdown_rx));

    coordinator.handle_detection(&report(0.9)).unwrap();
    assert!(coordinator.handle_detection(&report(0.4)).is_err());

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(sink.reports(), 0);

    tokio::time::sleep(Duration::from_secs(21)).await;
    assert_eq!(sink.reports(), 1);
    assert_eq!(coordinator.queue().pending_len(), 0);

    coordinator.handle_detection(&report(0.75)).unwrap();
    shutdown_tx.send(()).unwrap();
    handle.await.unwrap();

    assert_eq!(sink.reports(), 2);
    assert_eq!(coordinator.queue().pending_len(), 0);
}

#[tokio::test(start_paused = true)]
async fn aged_detections_are_pruned_by_the_loop() {
    let (coordinator, _sink, clock, config) = setup();
    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
    let handle = tokio::spawn(run_flush_loop(coordinator.clone(), config, shutdown_rx));

    coordinator.handle_detection(&report(0.95)).unwrap();
    tokio::time::sleep(Duration::from_secs(31)).await;
    assert_eq!(coordinator.queue().len(), 1);

    clock.advance(chrono::Duration::hours(1));
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert!(coordinator.queue().is_empty());

    shutdown_tx.send(()).unwrap();
    handle.await.unwrap();
}
