//! Planning constants for search and swarm operations.

use serde::{Deserialize, Serialize};

use crate::models::{Priority, SearchPattern};

/// Tunable parameters for path generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningRules {
    /// Row and column spacing of the grid sweep in meters
    pub grid_spacing_m: f64,
    /// Cruise speed used for flight time estimates
    pub cruise_speed_mps: f64,
    /// Number of revolutions in the spiral pattern
    pub spiral_turns: usize,
    pub spiral_points_per_turn: usize,
    /// Loiter ring radius around a detection in meters
    pub orbit_radius_m: f64,
    pub orbit_altitude_m: f64,
    pub orbit_points: usize,
    /// Fixed per-drone plan parameters for swarm searches
    pub swarm_altitude_m: f64,
    pub swarm_pattern: SearchPattern,
    pub swarm_priority: Priority,
}

impl Default for PlanningRules {
    fn default() -> Self {
        Self {
            grid_spacing_m: 50.0,
            cruise_speed_mps: 10.0,
            spiral_turns: 10,
            spiral_points_per_turn: 20,
            orbit_radius_m: 30.0,
            orbit_altitude_m: 50.0,
            orbit_points: 8,
            swarm_altitude_m: 50.0,
            swarm_pattern: SearchPattern::Grid,
            swarm_priority: Priority::High,
        }
    }
}
