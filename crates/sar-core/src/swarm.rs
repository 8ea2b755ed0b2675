//! Swarm coordination: one sector and one search path per drone.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{PlanningError, PlanningResult};
use crate::models::{FlightPath, GeoPoint, SearchRequest};
use crate::partition::{divide, Sector};
use crate::planner::SearchPlanner;

/// A drone's share of a swarm search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorAssignment {
    pub drone_id: String,
    pub sector: Sector,
    pub path: FlightPath,
}

/// Result of a swarm search: exactly one assignment per drone, west to east.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwarmPlan {
    pub assignments: Vec<SectorAssignment>,
}

impl SwarmPlan {
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn get(&self, drone_id: &str) -> Option<&SectorAssignment> {
        self.assignments.iter().find(|a| a.drone_id == drone_id)
    }

    pub fn path_for(&self, drone_id: &str) -> Option<&FlightPath> {
        self.get(drone_id).map(|a| &a.path)
    }

    pub fn into_paths(self) -> HashMap<String, FlightPath> {
        self.assignments
            .into_iter()
            .map(|a| (a.drone_id, a.path))
            .collect()
    }
}

/// Splits an area across drones and plans each sector.
#[derive(Debug, Clone, Default)]
pub struct SwarmCoordinator {
    planner: SearchPlanner,
}

impl SwarmCoordinator {
    pub fn new(planner: SearchPlanner) -> Self {
        Self { planner }
    }

    /// Assign sector *i* of `total_area` to `drone_ids[i]` and plan it.
    ///
    /// Every drone starts at its sector's south-west corner and flies the
    /// swarm altitude, pattern and priority from the planner's rules. If any
    /// single plan fails the whole call fails; no partial plan is returned.
    pub fn coordinate_swarm_search(
        &self,
        drone_ids: &[String],
        total_area: &[GeoPoint],
    ) -> PlanningResult<SwarmPlan> {
        let mut seen = HashSet::with_capacity(drone_ids.len());
        for drone_id in drone_ids {
            if !seen.insert(drone_id.as_str()) {
                return Err(PlanningError::invalid(format!(
                    "drone {drone_id} listed more than once"
                )));
            }
        }

        let sectors = divide(total_area, drone_ids.len())?;
        let rules = self.planner.rules();

        let mut assignments = Vec::with_capacity(sectors.len());
        for (drone_id, sector) in drone_ids.iter().zip(sectors) {
            let vertices = sector.vertices();
            let request = SearchRequest {
                area: vertices.to_vec(),
                start: vertices[0],
                altitude_m: rules.swarm_altitude_m,
                pattern: rules.swarm_pattern,
                priority: rules.swarm_priority,
            };
            let path = self.planner.plan_search_path(&request)?;
            assignments.push(SectorAssignment {
                drone_id: drone_id.clone(),
                sector,
                path,
            });
        }

        tracing::info!("Swarm coordination: {} drones assigned", assignments.len());

        Ok(SwarmPlan { assignments })
    }
}

/// Coordinate a swarm search with default planning rules.
pub fn coordinate_swarm_search(
    drone_ids: &[String],
    total_area: &[GeoPoint],
) -> PlanningResult<SwarmPlan> {
    SwarmCoordinator::default().coordinate_swarm_search(drone_ids, total_area)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use crate::rules::PlanningRules;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn area() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(24.000, 120.000),
            GeoPoint::new(24.000, 120.003),
            GeoPoint::new(24.002, 120.003),
            GeoPoint::new(24.002, 120.000),
        ]
    }

    #[test]
    fn one_assignment_per_drone_in_input_order() {
        let plan = coordinate_swarm_search(&ids(&["a", "b", "c"]), &area()).unwrap();
        assert_eq!(plan.len(), 3);
        let order: Vec<&str> = plan.assignments.iter().map(|a| a.drone_id.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
        for (i, assignment) in plan.assignments.iter().enumerate() {
            assert_eq!(assignment.sector.index, i);
            assert_eq!(assignment.path.priority, Priority::High);
            assert!(assignment.path.waypoints.iter().all(|w| w.altitude_m == 50.0));
        }
    }

    #[test]
    fn paths_start_at_sector_corner() {
        let plan = coordinate_swarm_search(&ids(&["a", "b"]), &area()).unwrap();
        for assignment in &plan.assignments {
            let first = assignment.path.waypoints[0].position();
            assert_eq!(first, assignment.sector.vertices()[0]);
        }
    }

    #[test]
    fn duplicate_drone_ids_are_rejected() {
        let err = coordinate_swarm_search(&ids(&["a", "a"]), &area()).unwrap_err();
        assert!(matches!(err, PlanningError::InvalidInput(_)));
    }

    #[test]
    fn empty_swarm_is_rejected() {
        assert!(coordinate_swarm_search(&[], &area()).is_err());
    }

    #[test]
    fn any_failed_sector_fails_the_whole_swarm() {
        let rules = PlanningRules {
            grid_spacing_m: 0.0,
            ..PlanningRules::default()
        };
        let coordinator = SwarmCoordinator::new(SearchPlanner::with_rules(rules));
        assert!(coordinator
            .coordinate_swarm_search(&ids(&["a", "b"]), &area())
            .is_err());
    }

    #[test]
    fn into_paths_keys_by_drone() {
        let paths = coordinate_swarm_search(&ids(&["x", "y"]), &area())
            .unwrap()
            .into_paths();
        assert_eq!(paths.len(), 2);
        assert!(paths.contains_key("x"));
        assert!(paths.contains_key("y"));
    }
}
