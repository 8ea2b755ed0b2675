//! Visiting order and flight time for generated waypoints.

use crate::error::{PlanningError, PlanningResult};
use crate::models::{GeoPoint, Waypoint};
use crate::spatial::planar_distance;

pub const DEFAULT_CRUISE_SPEED_MPS: f64 = 10.0;

/// Order waypoints by greedy nearest-neighbor, starting from `start`.
///
/// At every step the closest remaining waypoint (planar distance) is
/// visited next; ties go to the one that appears first in the input. The
/// result is always a permutation of the input. This is O(n²) and makes no
/// attempt at 2-opt or any other refinement.
pub fn optimize_order(waypoints: &[Waypoint], start: GeoPoint) -> Vec<Waypoint> {
    let mut remaining: Vec<Waypoint> = waypoints.to_vec();
    let mut ordered = Vec::with_capacity(remaining.len());
    let mut current = start;

    while !remaining.is_empty() {
        let mut nearest_idx = 0;
        let mut nearest_dist = f64::INFINITY;
        for (idx, waypoint) in remaining.iter().enumerate() {
            let dist = planar_distance(current, waypoint.position());
            if dist < nearest_dist {
                nearest_dist = dist;
                nearest_idx = idx;
            }
        }

        // `remove` keeps the rest in input order, which is what makes ties stable.
        let next = remaining.remove(nearest_idx);
        current = next.position();
        ordered.push(next);
    }

    ordered
}

/// Total ground-track length of an ordered path in meters.
///
/// Altitude changes are ignored.
pub fn path_length_m(waypoints: &[Waypoint]) -> f64 {
    waypoints
        .windows(2)
        .map(|pair| planar_distance(pair[0].position(), pair[1].position()))
        .sum()
}

/// Estimated flight time in whole minutes at the default cruise speed.
pub fn estimate_flight_minutes(waypoints: &[Waypoint]) -> u32 {
    minutes_at(waypoints, DEFAULT_CRUISE_SPEED_MPS)
}

/// Estimated flight time in whole minutes at `speed_mps`.
///
/// Paths with fewer than two waypoints take zero minutes.
pub fn estimate_flight_minutes_at(waypoints: &[Waypoint], speed_mps: f64) -> PlanningResult<u32> {
    if !speed_mps.is_finite() || speed_mps <= 0.0 {
        return Err(PlanningError::invalid(format!(
            "cruise speed must be positive, got {speed_mps}"
        )));
    }
    Ok(minutes_at(waypoints, speed_mps))
}

fn minutes_at(waypoints: &[Waypoint], speed_mps: f64) -> u32 {
    if waypoints.len() < 2 {
        return 0;
    }
    let minutes = path_length_m(waypoints) / speed_mps / 60.0;
    minutes.round() as u32
}
