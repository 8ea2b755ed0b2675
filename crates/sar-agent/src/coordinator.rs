//! Search coordinator: the single owner of planning, queue and tracking state.

use std::sync::Arc;

use chrono::Duration;

use sar_core::models::{
    Detection, DetectionReport, FlightPath, GeoPoint, Priority, SearchRequest,
};
use sar_core::{
    planar_distance, PlanningResult, PlanningRules, SearchPlanner, SwarmCoordinator, SwarmPlan,
};

use crate::clock::Clock;
use crate::config::Config;
use crate::events::DetectionSink;
use crate::state::{
    DetectionQueue, DroneStatusUpdate, DroneTracker, DroneTrackingState, FlushSummary,
    IngestRejection, QueueSettings,
};

/// Result of handling one detection report.
#[derive(Debug, Clone)]
pub struct DetectionOutcome {
    pub detection: Detection,
    /// Re-planned path for the reporting drone, when it had one
    pub adjusted_path: Option<FlightPath>,
}

pub struct SearchCoordinator {
    planner: SearchPlanner,
    swarm: SwarmCoordinator,
    queue: DetectionQueue,
    tracker: DroneTracker,
}

impl SearchCoordinator {
    pub fn new(
        rules: PlanningRules,
        settings: QueueSettings,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn DetectionSink>,
    ) -> Self {
        let planner = SearchPlanner::with_rules(rules);
        Self {
            swarm: SwarmCoordinator::new(planner.clone()),
            planner,
            queue: DetectionQueue::new(settings, clock.clone(), sink),
            tracker: DroneTracker::new(clock),
        }
    }

    pub fn from_config(config: &Config, clock: Arc<dyn Clock>, sink: Arc<dyn DetectionSink>) -> Self {
        Self::new(PlanningRules::default(), config.queue_settings(), clock, sink)
    }

    pub fn planner(&self) -> &SearchPlanner {
        &self.planner
    }

    pub fn queue(&self) -> &DetectionQueue {
        &self.queue
    }

    pub fn tracker(&self) -> &DroneTracker {
        &self.tracker
    }

    /// Plan a search path and record it as the drone's current path.
    pub fn plan_for_drone(&self, drone_id: &str, request: &SearchRequest) -> PlanningResult<FlightPath> {
        let path = self.planner.plan_search_path(request)?;
        self.tracker.assign_path(drone_id, path.clone());
        Ok(path)
    }

    /// Split `total_area` across `drone_ids` and record every assigned path.
    ///
    /// Nothing is recorded unless every drone could be planned.
    pub fn coordinate_swarm_search(
        &self,
        drone_ids: &[String],
        total_area: &[GeoPoint],
    ) -> PlanningResult<SwarmPlan> {
        let plan = self.swarm.coordinate_swarm_search(drone_ids, total_area)?;
        for assignment in &plan.assignments {
            self.tracker
                .assign_path(&assignment.drone_id, assignment.path.clone());
        }
        Ok(plan)
    }

    /// Ingest a detection and divert the reporting drone to investigate it.
    ///
    /// Only high and critical detections divert. If the drone is flying a
    /// tracked path, a loiter ring is placed ahead of it and the new path
    /// replaces the old one, unless the path already opens with a ring
    /// around the same spot. A failed re-plan is logged; the detection stays
    /// admitted.
    pub fn handle_detection(
        &self,
        report: &DetectionReport,
    ) -> Result<DetectionOutcome, IngestRejection> {
        let detection = self.queue.ingest(report)?;
        if !report.urgency.is_escalated() {
            return Ok(DetectionOutcome {
                detection,
                adjusted_path: None,
            });
        }

        let spot = report.location.position();
        let adjusted_path = self
            .tracker
            .current_path(&report.drone_id)
            .filter(|path| !self.circling(path, spot))
            .and_then(|path| match self.planner.adjust_path_for_detection(&path, spot) {
                Ok(adjusted) => Some(adjusted),
                Err(err) => {
                    tracing::warn!(
                        "Could not re-plan {} around detection {}: {}",
                        report.drone_id,
                        detection.id,
                        err
                    );
                    None
                }
            });

        if let Some(path) = &adjusted_path {
            self.tracker.assign_path(&report.drone_id, path.clone());
        }

        Ok(DetectionOutcome {
            detection,
            adjusted_path,
        })
    }

    // True when the path is an investigation whose leading ring is centered
    // within one orbit radius of `spot`.
    fn circling(&self, path: &FlightPath, spot: GeoPoint) -> bool {
        let rules = self.planner.rules();
        let ring_len = rules.orbit_points;
        if path.priority != Priority::Urgent || ring_len == 0 || path.len() < ring_len {
            return false;
        }
        let ring = &path.waypoints[..ring_len];
        let n = ring_len as f64;
        let center = GeoPoint::new(
            ring.iter().map(|w| w.lat).sum::<f64>() / n,
            ring.iter().map(|w| w.lng).sum::<f64>() / n,
        );
        planar_distance(center, spot) <= rules.orbit_radius_m
    }

    pub fn update_drone_status(&self, update: &DroneStatusUpdate) -> DroneTrackingState {
        self.tracker.upsert_status(update)
    }

    pub fn flush(&self) -> FlushSummary {
        self.queue.flush()
    }

    pub fn prune_stale_drones(&self, max_age: Duration) -> usize {
        self.tracker.prune_stale(max_age)
    }
}
