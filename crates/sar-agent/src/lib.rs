//! Always-on scout agent: detection ingest, drone tracking and the
//! periodic flush that reports detections downstream.

pub mod clock;
pub mod config;
pub mod coordinator;
pub mod events;
pub mod loops;
pub mod state;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use coordinator::{DetectionOutcome, SearchCoordinator};
pub use events::{BroadcastSink, DetectionEvent, DetectionSink, SinkError, TracingSink};
