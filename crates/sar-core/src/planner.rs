//! Search path planning.
//!
//! Composes coverage generation, nearest-neighbor ordering and the flight
//! time estimate into a [`FlightPath`], and re-plans a path around a new
//! detection.

use crate::coverage::orbit;
use crate::error::{PlanningError, PlanningResult};
use crate::models::{FlightPath, GeoPoint, Priority, SearchRequest, Waypoint};
use crate::routing::{estimate_flight_minutes_at, optimize_order};
use crate::rules::PlanningRules;

/// Stateless planner parameterized by [`PlanningRules`].
#[derive(Debug, Clone, Default)]
pub struct SearchPlanner {
    rules: PlanningRules,
}

impl SearchPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: PlanningRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &PlanningRules {
        &self.rules
    }

    /// Plan a search path over `request.area`.
    ///
    /// Grid and spiral patterns cover the area's bounding box; contour flies
    /// the polygon vertices. The generated waypoints are reordered from
    /// `request.start`.
    pub fn plan_search_path(&self, request: &SearchRequest) -> PlanningResult<FlightPath> {
        if request.area.is_empty() {
            return Err(PlanningError::invalid("search area has no vertices"));
        }
        if !request.start.is_finite() {
            return Err(PlanningError::invalid("start point is not finite"));
        }
        if !request.altitude_m.is_finite() {
            return Err(PlanningError::invalid(format!(
                "altitude must be finite, got {}",
                request.altitude_m
            )));
        }

        let raw = request
            .pattern
            .coverage(&self.rules)
            .generate(&request.area, request.altitude_m)?;
        let waypoints = optimize_order(&raw, request.start);
        let estimated_time_minutes =
            estimate_flight_minutes_at(&waypoints, self.rules.cruise_speed_mps)?;

        tracing::info!(
            "Search path planned ({:?}): {} waypoints, ~{} min",
            request.pattern,
            waypoints.len(),
            estimated_time_minutes
        );

        Ok(FlightPath {
            waypoints,
            estimated_time_minutes,
            priority: request.priority,
        })
    }

    /// Re-plan `current` to investigate a detection first.
    ///
    /// A loiter ring around `detection` is placed ahead of the existing
    /// waypoints, the time estimate covers the combined path, and priority
    /// becomes [`Priority::Urgent`]. `current` is left untouched.
    pub fn adjust_path_for_detection(
        &self,
        current: &FlightPath,
        detection: GeoPoint,
    ) -> PlanningResult<FlightPath> {
        let ring = orbit(
            detection,
            self.rules.orbit_radius_m,
            self.rules.orbit_altitude_m,
            self.rules.orbit_points,
        )?;

        let mut waypoints: Vec<Waypoint> = Vec::with_capacity(ring.len() + current.len());
        waypoints.extend(ring);
        waypoints.extend_from_slice(&current.waypoints);
        let estimated_time_minutes =
            estimate_flight_minutes_at(&waypoints, self.rules.cruise_speed_mps)?;

        tracing::info!(
            "Path adjusted for detection at {},{}: {} waypoints",
            detection.lat,
            detection.lng,
            waypoints.len()
        );

        Ok(FlightPath {
            waypoints,
            estimated_time_minutes,
            priority: Priority::Urgent,
        })
    }
}

/// Plan a search path with default planning rules.
pub fn plan_search_path(request: &SearchRequest) -> PlanningResult<FlightPath> {
    SearchPlanner::default().plan_search_path(request)
}

/// Insert a detection loiter ring with default planning rules.
pub fn adjust_path_for_detection(
    current: &FlightPath,
    detection: GeoPoint,
) -> PlanningResult<FlightPath> {
    SearchPlanner::default().adjust_path_for_detection(current, detection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SearchPattern;

    fn square() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 0.001),
            GeoPoint::new(0.001, 0.001),
            GeoPoint::new(0.001, 0.0),
        ]
    }

    fn request(pattern: SearchPattern) -> SearchRequest {
        SearchRequest {
            area: square(),
            start: GeoPoint::new(0.0, 0.0),
            altitude_m: 50.0,
            pattern,
            priority: Priority::Medium,
        }
    }

    #[test]
    fn contour_path_visits_vertices_from_start() {
        let path = plan_search_path(&SearchRequest {
            start: GeoPoint::new(0.0011, 0.0011),
            ..request(SearchPattern::Contour)
        })
        .unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(path.waypoints[0].position(), GeoPoint::new(0.001, 0.001));
        assert_eq!(path.priority, Priority::Medium);
    }

    #[test]
    fn spiral_path_keeps_all_points() {
        let path = plan_search_path(&request(SearchPattern::Spiral)).unwrap();
        assert_eq!(path.len(), 200);
    }

    #[test]
    fn empty_area_is_rejected() {
        let req = SearchRequest {
            area: Vec::new(),
            ..request(SearchPattern::Contour)
        };
        assert!(matches!(plan_search_path(&req), Err(PlanningError::InvalidInput(_))));
    }

    #[test]
    fn non_finite_altitude_is_rejected() {
        let req = SearchRequest {
            altitude_m: f64::INFINITY,
            ..request(SearchPattern::Grid)
        };
        assert!(plan_search_path(&req).is_err());
    }

    #[test]
    fn custom_rules_change_grid_density() {
        let rules = PlanningRules {
            grid_spacing_m: 25.0,
            ..PlanningRules::default()
        };
        let dense = SearchPlanner::with_rules(rules)
            .plan_search_path(&request(SearchPattern::Grid))
            .unwrap();
        let default = plan_search_path(&request(SearchPattern::Grid)).unwrap();
        assert!(dense.len() > default.len());
    }

    #[test]
    fn adjust_on_empty_path_is_just_the_ring() {
        let empty = FlightPath {
            waypoints: Vec::new(),
            estimated_time_minutes: 0,
            priority: Priority::Low,
        };
        let adjusted = adjust_path_for_detection(&empty, GeoPoint::new(10.0, 10.0)).unwrap();
        assert_eq!(adjusted.len(), 8);
        assert_eq!(adjusted.priority, Priority::Urgent);
        assert!(adjusted.waypoints.iter().all(|w| w.altitude_m == 50.0));
    }
}
