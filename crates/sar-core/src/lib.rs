pub mod coverage;
pub mod error;
pub mod models;
pub mod partition;
pub mod planner;
pub mod routing;
pub mod rules;
pub mod spatial;
pub mod swarm;

pub use coverage::{contour, grid, orbit, spiral, CoveragePattern};
pub use error::{PlanningError, PlanningResult};
pub use models::{
    Detection, DetectionReport, DetectionType, FlightPath, GeoBounds, GeoPoint, Priority,
    SearchPattern, SearchRequest, Urgency, Waypoint,
};
pub use partition::{divide, Sector};
pub use planner::{adjust_path_for_detection, plan_search_path, SearchPlanner};
pub use routing::{estimate_flight_minutes, optimize_order};
pub use rules::PlanningRules;
pub use spatial::{bounding_box, planar_distance};
pub use swarm::{coordinate_swarm_search, SectorAssignment, SwarmCoordinator, SwarmPlan};
