//! Ephemeral per-drone tracking, keyed by drone id.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use sar_core::models::FlightPath;

use crate::clock::Clock;

/// Status recorded for drones that received a path before any status report.
pub const UNREPORTED_STATUS: &str = "unknown";

/// Status event from fleet telemetry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroneStatusUpdate {
    pub drone_id: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroneTrackingState {
    pub drone_id: String,
    pub status: String,
    pub last_update: DateTime<Utc>,
    pub current_path: Option<FlightPath>,
}

pub struct DroneTracker {
    drones: DashMap<String, DroneTrackingState>,
    clock: Arc<dyn Clock>,
}

impl DroneTracker {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            drones: DashMap::new(),
            clock,
        }
    }

    /// Create the drone if absent, else overwrite status and last update.
    ///
    /// A path assigned earlier is kept.
    pub fn upsert_status(&self, update: &DroneStatusUpdate) -> DroneTrackingState {
        let now = self.clock.now();
        self.drones
            .entry(update.drone_id.clone())
            .and_modify(|state| {
                state.status = update.status.clone();
                state.last_update = now;
            })
            .or_insert_with(|| DroneTrackingState {
                drone_id: update.drone_id.clone(),
                status: update.status.clone(),
                last_update: now,
                current_path: None,
            })
            .clone()
    }

    /// Record the path a drone is currently flying.
    ///
    /// Counts as activity: the staleness clock restarts.
    pub fn assign_path(&self, drone_id: &str, path: FlightPath) {
        let now = self.clock.now();
        match self.drones.entry(drone_id.to_string()) {
            Entry::Occupied(mut entry) => {
                let state = entry.get_mut();
                state.current_path = Some(path);
                state.last_update = now;
            }
            Entry::Vacant(entry) => {
                entry.insert(DroneTrackingState {
                    drone_id: drone_id.to_string(),
                    status: UNREPORTED_STATUS.to_string(),
                    last_update: now,
                    current_path: Some(path),
                });
            }
        }
    }

    pub fn current_path(&self, drone_id: &str) -> Option<FlightPath> {
        self.drones
            .get(drone_id)
            .and_then(|state| state.current_path.clone())
    }

    pub fn get(&self, drone_id: &str) -> Option<DroneTrackingState> {
        self.drones.get(drone_id).map(|r| r.value().clone())
    }

    /// All tracked drones, sorted by id.
    pub fn snapshot(&self) -> Vec<DroneTrackingState> {
        let mut drones: Vec<DroneTrackingState> =
            self.drones.iter().map(|r| r.value().clone()).collect();
        drones.sort_by(|a, b| a.drone_id.cmp(&b.drone_id));
        drones
    }

    pub fn len(&self) -> usize {
        self.drones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drones.is_empty()
    }

    pub fn remove(&self, drone_id: &str) -> Option<DroneTrackingState> {
        self.drones.remove(drone_id).map(|(_, state)| state)
    }

    /// Drop drones with no status update for longer than `max_age`.
    pub fn prune_stale(&self, max_age: Duration) -> usize {
        let now = self.clock.now();
        let before = self.drones.len();
        self.drones
            .retain(|_, state| now - state.last_update <= max_age);
        before.saturating_sub(self.drones.len())
    }
}
