//! In-memory detection ingest queue.
//!
//! Entries move RECEIVED (processed = false) -> FLUSHED (processed = true)
//! -> PRUNED. Urgent detections are published at ingest; everything else
//! waits for the next periodic flush. Age-based pruning runs only at flush
//! time, so between flushes the queue grows with the arrival rate unless a
//! hard cap is configured.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Duration;
use thiserror::Error;
use uuid::Uuid;

use sar_core::models::{Detection, DetectionReport};

use crate::clock::Clock;
use crate::events::{DetectionEvent, DetectionSink};

pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.7;
pub const DEFAULT_RETENTION_SECS: i64 = 3600;

#[derive(Debug, Clone)]
pub struct QueueSettings {
    /// Detections must score strictly above this to be admitted
    pub min_confidence: f64,
    /// Entries at least this old are dropped at flush
    pub retention: Duration,
    /// Optional hard cap on queued entries
    pub max_len: Option<usize>,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            retention: Duration::seconds(DEFAULT_RETENTION_SECS),
            max_len: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IngestRejection {
    #[error("confidence {confidence} does not exceed threshold {threshold}")]
    LowConfidence { confidence: f64, threshold: f64 },
    #[error("confidence {0} is outside [0, 1]")]
    InvalidConfidence(f64),
}

/// Outcome of one flush cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushSummary {
    pub emitted: usize,
    pub failed: usize,
    pub pruned: usize,
    pub remaining: usize,
}

pub struct DetectionQueue {
    entries: Mutex<VecDeque<Detection>>,
    settings: QueueSettings,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn DetectionSink>,
}

impl DetectionQueue {
    pub fn new(settings: QueueSettings, clock: Arc<dyn Clock>, sink: Arc<dyn DetectionSink>) -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            settings,
            clock,
            sink,
        }
    }

    pub fn settings(&self) -> &QueueSettings {
        &self.settings
    }

    fn entries(&self) -> MutexGuard<'_, VecDeque<Detection>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Admit a classified detection.
    ///
    /// High and critical detections are published as `urgent-detection`
    /// before this returns. A publish failure is logged and does not undo
    /// the admission.
    pub fn ingest(&self, report: &DetectionReport) -> Result<Detection, IngestRejection> {
        let confidence = report.confidence;
        if !(0.0..=1.0).contains(&confidence) {
            tracing::warn!(
                "Rejected detection from {}: invalid confidence {}",
                report.drone_id,
                confidence
            );
            return Err(IngestRejection::InvalidConfidence(confidence));
        }
        if confidence <= self.settings.min_confidence {
            return Err(IngestRejection::LowConfidence {
                confidence,
                threshold: self.settings.min_confidence,
            });
        }

        let detection = Detection::from_report(
            format!("det-{}", Uuid::new_v4()),
            report,
            self.clock.now(),
        );

        {
            let mut entries = self.entries();
            entries.push_back(detection.clone());
            if let Some(max_len) = self.settings.max_len {
                enforce_cap(&mut entries, max_len);
            }
        }

        tracing::info!(
            "Detection [{:?}] confidence={:.2} @ {},{} from {}",
            detection.detection_type,
            detection.confidence,
            detection.location.lat,
            detection.location.lng,
            detection.drone_id
        );

        if report.urgency.is_escalated() {
            let event = DetectionEvent::UrgentDetection {
                detection: detection.clone(),
                urgency: report.urgency,
            };
            if let Err(err) = self.sink.publish(event) {
                tracing::warn!("Urgent detection {} not delivered: {}", detection.id, err);
            }
        }

        Ok(detection)
    }

    /// Publish every unprocessed entry, then prune by age.
    ///
    /// Each entry is marked processed whether or not its publish succeeds;
    /// there is no redelivery.
    pub fn flush(&self) -> FlushSummary {
        let pending: Vec<Detection> = {
            let mut entries = self.entries();
            entries
                .iter_mut()
                .filter(|d| !d.processed)
                .map(|d| {
                    let snapshot = d.clone();
                    d.processed = true;
                    snapshot
                })
                .collect()
        };

        let mut summary = FlushSummary::default();
        if !pending.is_empty() {
            tracing::debug!("Processing {} detections in queue", pending.len());
        }
        for detection in pending {
            let id = detection.id.clone();
            match self.sink.publish(DetectionEvent::DetectionReport { detection }) {
                Ok(()) => summary.emitted += 1,
                Err(err) => {
                    summary.failed += 1;
                    tracing::warn!("Detection {} report failed: {}", id, err);
                }
            }
        }

        let now = self.clock.now();
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|d| now - d.timestamp < self.settings.retention);
        summary.pruned = before - entries.len();
        summary.remaining = entries.len();
        summary
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Entries not yet handed to a flush.
    pub fn pending_len(&self) -> usize {
        self.entries().iter().filter(|d| !d.processed).count()
    }

    pub fn snapshot(&self) -> Vec<Detection> {
        self.entries().iter().cloned().collect()
    }
}

// Oldest already-reported entries go first; unreported ones only when
// nothing else is left to drop.
fn enforce_cap(entries: &mut VecDeque<Detection>, max_len: usize) {
    while entries.len() > max_len {
        let victim = entries.iter().position(|d| d.processed).unwrap_or(0);
        if let Some(dropped) = entries.remove(victim) {
            if !dropped.processed {
                tracing::warn!("Detection queue full, dropped unreported {}", dropped.id);
            }
        }
    }
}
