//! Outbound detection events and the sinks that deliver them.
//!
//! The transport behind a sink is the host's choice; this crate ships a
//! tokio broadcast sink for in-process subscribers and a tracing sink that
//! only logs.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;

use sar_core::models::{Detection, Urgency};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "topic", rename_all = "kebab-case")]
pub enum DetectionEvent {
    /// Raised at ingest for high and critical detections
    UrgentDetection {
        detection: Detection,
        urgency: Urgency,
    },
    /// One per entry drained by a periodic flush
    DetectionReport { detection: Detection },
}

impl DetectionEvent {
    pub fn topic(&self) -> &'static str {
        match self {
            DetectionEvent::UrgentDetection { .. } => "urgent-detection",
            DetectionEvent::DetectionReport { .. } => "detection-report",
        }
    }

    pub fn detection(&self) -> &Detection {
        match self {
            DetectionEvent::UrgentDetection { detection, .. } => detection,
            DetectionEvent::DetectionReport { detection } => detection,
        }
    }
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("no subscribers for {0}")]
    NoSubscribers(&'static str),
    #[error("sink unavailable: {0}")]
    Unavailable(String),
}

/// Downstream receiver of detection events.
pub trait DetectionSink: Send + Sync {
    fn publish(&self, event: DetectionEvent) -> Result<(), SinkError>;
}

/// Fans events out to in-process subscribers.
#[derive(Debug, Clone)]
pub struct BroadcastSink {
    tx: broadcast::Sender<DetectionEvent>,
}

impl BroadcastSink {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DetectionEvent> {
        self.tx.subscribe()
    }
}

impl DetectionSink for BroadcastSink {
    fn publish(&self, event: DetectionEvent) -> Result<(), SinkError> {
        let topic = event.topic();
        self.tx
            .send(event)
            .map(|_| ())
            .map_err(|_| SinkError::NoSubscribers(topic))
    }
}

/// Logs each event as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DetectionSink for TracingSink {
    fn publish(&self, event: DetectionEvent) -> Result<(), SinkError> {
        let payload =
            serde_json::to_string(&event).map_err(|e| SinkError::Unavailable(e.to_string()))?;
        match &event {
            DetectionEvent::UrgentDetection { .. } => {
                tracing::warn!("[{}] {}", event.topic(), payload)
            }
            DetectionEvent::DetectionReport { .. } => {
                tracing::info!("[{}] {}", event.topic(), payload)
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sar_core::models::{DetectionType, Waypoint};

    fn detection() -> Detection {
        Detection {
            id: "det-1".into(),
            drone_id: "d1".into(),
            timestamp: Utc::now(),
            location: Waypoint::new(25.0, 121.5, 60.0),
            detection_type: DetectionType::Fire,
            confidence: 0.93,
            image_ref: "frame-1".into(),
            processed: false,
        }
    }

    #[test]
    fn events_serialize_with_topic_tag() {
        let event = DetectionEvent::UrgentDetection {
            detection: detection(),
            urgency: Urgency::Critical,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["topic"], "urgent-detection");
        assert_eq!(value["urgency"], "critical");
        assert_eq!(value["detection"]["detection_type"], "fire");

        let report = DetectionEvent::DetectionReport { detection: detection() };
        assert_eq!(serde_json::to_value(&report).unwrap()["topic"], report.topic());
    }

    #[tokio::test]
    async fn broadcast_sink_delivers_to_subscribers() {
        let sink = BroadcastSink::new(8);
        let mut rx = sink.subscribe();
        sink.publish(DetectionEvent::DetectionReport { detection: detection() })
            .unwrap();
        let received = rx.recv().await.unwrap();
        assert_eq!(received.detection().id, "det-1");
    }

    #[test]
    fn broadcast_sink_without_subscribers_fails() {
        let sink = BroadcastSink::new(8);
        let err = sink
            .publish(DetectionEvent::DetectionReport { detection: detection() })
            .unwrap_err();
        assert!(matches!(err, SinkError::NoSubscribers("detection-report")));
    }

    #[test]
    fn tracing_sink_accepts_everything() {
        assert!(TracingSink
            .publish(DetectionEvent::DetectionReport { detection: detection() })
            .is_ok());
    }
}
