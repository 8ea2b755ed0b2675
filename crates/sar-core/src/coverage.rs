//! Coverage pattern generation.
//!
//! Each generator turns a search area into an unordered set of candidate
//! waypoints; visiting order is decided later by [`crate::routing`]. All
//! generators are pure: the same input always yields the same output.

use std::f64::consts::PI;

use crate::error::{PlanningError, PlanningResult};
use crate::models::{GeoBounds, GeoPoint, SearchPattern, Waypoint};
use crate::rules::PlanningRules;
use crate::spatial::{bounding_box, degrees_per_meter_lat, degrees_per_meter_lng, offset_position};

/// Upper bound on grid size so a tiny spacing cannot exhaust memory.
pub const MAX_GRID_POINTS: usize = 1_000_000;

/// Absorbs float error when a span is an exact multiple of the step.
const STEP_EPSILON: f64 = 1e-9;

/// Fills a search polygon with candidate waypoints at a fixed altitude.
pub trait CoveragePattern {
    fn generate(&self, area: &[GeoPoint], altitude_m: f64) -> PlanningResult<Vec<Waypoint>>;
}

/// Boustrophedon sweep over the area's bounding box.
#[derive(Debug, Clone, Copy)]
pub struct GridPattern {
    pub spacing_m: f64,
}

/// Outward spiral from the center of the area's bounding box.
#[derive(Debug, Clone, Copy)]
pub struct SpiralPattern {
    pub turns: usize,
    pub points_per_turn: usize,
}

/// The polygon's own vertices, in order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContourPattern;

impl CoveragePattern for GridPattern {
    fn generate(&self, area: &[GeoPoint], altitude_m: f64) -> PlanningResult<Vec<Waypoint>> {
        grid(&bounding_box(area)?, altitude_m, self.spacing_m)
    }
}

impl CoveragePattern for SpiralPattern {
    fn generate(&self, area: &[GeoPoint], altitude_m: f64) -> PlanningResult<Vec<Waypoint>> {
        spiral_with(&bounding_box(area)?, altitude_m, self.turns, self.points_per_turn)
    }
}

impl CoveragePattern for ContourPattern {
    fn generate(&self, area: &[GeoPoint], altitude_m: f64) -> PlanningResult<Vec<Waypoint>> {
        Ok(contour(area, altitude_m))
    }
}

impl SearchPattern {
    /// Resolve the pattern to its generator.
    pub fn coverage(&self, rules: &PlanningRules) -> Box<dyn CoveragePattern> {
        match self {
            SearchPattern::Grid => Box::new(GridPattern {
                spacing_m: rules.grid_spacing_m,
            }),
            SearchPattern::Spiral => Box::new(SpiralPattern {
                turns: rules.spiral_turns,
                points_per_turn: rules.spiral_points_per_turn,
            }),
            SearchPattern::Contour => Box::new(ContourPattern),
        }
    }
}

/// Lawnmower sweep: rows step north by `spacing_m`, alternating east/west.
///
/// The longitude step is scaled at the box's southern edge. Rows and columns
/// include both edges of the box whenever the span is a whole number of steps.
pub fn grid(bounds: &GeoBounds, altitude_m: f64, spacing_m: f64) -> PlanningResult<Vec<Waypoint>> {
    if !spacing_m.is_finite() || spacing_m <= 0.0 {
        return Err(PlanningError::invalid(format!(
            "grid spacing must be positive, got {spacing_m}"
        )));
    }

    let lat_step = spacing_m * degrees_per_meter_lat();
    let lng_step = spacing_m * degrees_per_meter_lng(bounds.min_lat)?;
    let rows = steps_within(bounds.lat_span(), lat_step);
    let cols = steps_within(bounds.lng_span(), lng_step);

    // Counts stay in f64 until bounded; a tiny step yields inf or NaN here.
    let count = rows * cols;
    if !(count <= MAX_GRID_POINTS as f64) {
        return Err(PlanningError::invalid(format!(
            "grid of {rows}x{cols} points exceeds {MAX_GRID_POINTS}"
        )));
    }
    let (rows, cols) = (rows as usize, cols as usize);
    let total = rows * cols;

    let mut waypoints = Vec::with_capacity(total);
    for row in 0..rows {
        let lat = (bounds.min_lat + row as f64 * lat_step).min(bounds.max_lat);
        let eastbound = row % 2 == 0;
        for col in 0..cols {
            let offset = col as f64 * lng_step;
            let lng = if eastbound {
                (bounds.min_lng + offset).min(bounds.max_lng)
            } else {
                (bounds.max_lng - offset).max(bounds.min_lng)
            };
            waypoints.push(Waypoint::new(lat, lng, altitude_m));
        }
    }
    Ok(waypoints)
}

fn steps_within(span: f64, step: f64) -> f64 {
    (span / step + STEP_EPSILON).floor() + 1.0
}

/// Default spiral: 10 revolutions of 20 points each.
pub fn spiral(bounds: &GeoBounds, altitude_m: f64) -> Vec<Waypoint> {
    let rules = PlanningRules::default();
    spiral_points(bounds, altitude_m, rules.spiral_turns, rules.spiral_points_per_turn)
}

/// Spiral with explicit revolution and density parameters.
pub fn spiral_with(
    bounds: &GeoBounds,
    altitude_m: f64,
    turns: usize,
    points_per_turn: usize,
) -> PlanningResult<Vec<Waypoint>> {
    if turns == 0 || points_per_turn == 0 {
        return Err(PlanningError::invalid(
            "spiral needs at least one turn and one point per turn",
        ));
    }
    Ok(spiral_points(bounds, altitude_m, turns, points_per_turn))
}

// Radius is measured in degrees and grows linearly from zero to half of the
// larger box dimension, so the outer ring just reaches the box edge.
fn spiral_points(
    bounds: &GeoBounds,
    altitude_m: f64,
    turns: usize,
    points_per_turn: usize,
) -> Vec<Waypoint> {
    let center = bounds.center();
    let total = turns * points_per_turn;
    let max_radius = bounds.lat_span().max(bounds.lng_span()) / 2.0;

    (0..total)
        .map(|i| {
            let angle = (i as f64 / points_per_turn as f64) * 2.0 * PI;
            let radius = (i as f64 / total as f64) * max_radius;
            Waypoint::new(
                center.lat + radius * angle.cos(),
                center.lng + radius * angle.sin(),
                altitude_m,
            )
        })
        .collect()
}

/// One waypoint per polygon vertex, in input order.
pub fn contour(polygon: &[GeoPoint], altitude_m: f64) -> Vec<Waypoint> {
    polygon.iter().map(|p| Waypoint::at(*p, altitude_m)).collect()
}

/// `count` points evenly spaced on a circle of `radius_m` meters.
///
/// The first point is due north of `center`; the rest follow clockwise.
pub fn orbit(
    center: GeoPoint,
    radius_m: f64,
    altitude_m: f64,
    count: usize,
) -> PlanningResult<Vec<Waypoint>> {
    if !radius_m.is_finite() || radius_m < 0.0 {
        return Err(PlanningError::invalid(format!(
            "orbit radius must be non-negative, got {radius_m}"
        )));
    }
    if count == 0 {
        return Err(PlanningError::invalid("orbit needs at least one point"));
    }

    (0..count)
        .map(|i| {
            let angle = (i as f64 / count as f64) * 2.0 * PI;
            let point = offset_position(center, radius_m * angle.cos(), radius_m * angle.sin())?;
            Ok(Waypoint::at(point, altitude_m))
        })
        .collect()
}
