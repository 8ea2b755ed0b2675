//! In-memory state owned by the search coordinator.

pub mod detections;
pub mod drones;

pub use detections::{DetectionQueue, FlushSummary, IngestRejection, QueueSettings};
pub use drones::{DroneStatusUpdate, DroneTracker, DroneTrackingState};
