//! Area partitioning for multi-drone searches.
//!
//! Sectors are equal-width longitude strips of the polygon's bounding box.
//! This is not a polygon clip: a strip can include ground that lies outside
//! the original polygon.

use serde::{Deserialize, Serialize};

use crate::error::{PlanningError, PlanningResult};
use crate::models::{GeoBounds, GeoPoint};
use crate::spatial::bounding_box;

/// One strip of a partitioned search area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    /// Position from west to east, starting at 0
    pub index: usize,
    pub bounds: GeoBounds,
}

impl Sector {
    /// Rectangle vertices, starting at the south-west corner.
    pub fn vertices(&self) -> [GeoPoint; 4] {
        self.bounds.corners()
    }
}

/// Split the polygon's bounding box into `count` longitude strips.
pub fn divide(polygon: &[GeoPoint], count: usize) -> PlanningResult<Vec<Sector>> {
    if polygon.len() < 3 {
        return Err(PlanningError::invalid(format!(
            "polygon needs at least 3 vertices, got {}",
            polygon.len()
        )));
    }
    if count == 0 {
        return Err(PlanningError::invalid("sector count must be at least 1"));
    }

    let bounds = bounding_box(polygon)?;
    let lng_step = bounds.lng_span() / count as f64;
    // Shared edges come from the same expression so neighbours meet exactly.
    let edge = |i: usize| {
        if i == count {
            bounds.max_lng
        } else {
            bounds.min_lng + i as f64 * lng_step
        }
    };

    Ok((0..count)
        .map(|i| Sector {
            index: i,
            bounds: GeoBounds {
                min_lat: bounds.min_lat,
                max_lat: bounds.max_lat,
                min_lng: edge(i),
                max_lng: edge(i + 1),
            },
        })
        .collect())
}
