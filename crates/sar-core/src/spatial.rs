//! Degree/meter conversion and planar distance helpers.
//!
//! Everything here uses a flat-earth (equirectangular) model around the
//! points involved. That is accurate to well under a percent over the few
//! kilometers a single search sector spans.

use crate::error::{PlanningError, PlanningResult};
use crate::models::{GeoBounds, GeoPoint};

/// Meters per degree of latitude (and of longitude at the equator).
pub const METERS_PER_DEG_LAT: f64 = 111_320.0;

/// Degrees of latitude covered by one meter.
pub fn degrees_per_meter_lat() -> f64 {
    1.0 / METERS_PER_DEG_LAT
}

/// Degrees of longitude covered by one meter at the given latitude.
///
/// Longitude lines converge toward the poles, so the factor grows with
/// 1/cos(lat). At exactly ±90° the factor is unbounded and this returns
/// [`PlanningError::DegenerateGeometry`] instead of an infinite value.
pub fn degrees_per_meter_lng(lat_deg: f64) -> PlanningResult<f64> {
    if !lat_deg.is_finite() || lat_deg.abs() > 90.0 {
        return Err(PlanningError::invalid(format!(
            "latitude {lat_deg} is outside [-90, 90]"
        )));
    }
    let cos_lat = lat_deg.to_radians().cos();
    // cos(90°) evaluates to ~6e-17 rather than zero
    if lat_deg.abs() == 90.0 || cos_lat.abs() <= f64::EPSILON {
        return Err(PlanningError::DegenerateGeometry { lat: lat_deg });
    }
    Ok(1.0 / (METERS_PER_DEG_LAT * cos_lat))
}

/// Bounding box of a set of points. Fails on empty input.
pub fn bounding_box(points: &[GeoPoint]) -> PlanningResult<GeoBounds> {
    let first = points
        .first()
        .ok_or_else(|| PlanningError::invalid("bounding box of an empty point set"))?;

    let mut bounds = GeoBounds {
        min_lat: first.lat,
        max_lat: first.lat,
        min_lng: first.lng,
        max_lng: first.lng,
    };
    for point in points {
        if !point.is_finite() {
            return Err(PlanningError::invalid(format!(
                "non-finite coordinate ({}, {})",
                point.lat, point.lng
            )));
        }
        bounds.min_lat = bounds.min_lat.min(point.lat);
        bounds.max_lat = bounds.max_lat.max(point.lat);
        bounds.min_lng = bounds.min_lng.min(point.lng);
        bounds.max_lng = bounds.max_lng.max(point.lng);
    }
    Ok(bounds)
}

/// Ground distance between two points in meters (equirectangular).
///
/// Not a great-circle distance; longitude differences are scaled by the
/// cosine of the mean latitude.
pub fn planar_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let mean_lat = ((a.lat + b.lat) / 2.0).to_radians();
    let dy = (b.lat - a.lat) * METERS_PER_DEG_LAT;
    let dx = (b.lng - a.lng) * METERS_PER_DEG_LAT * mean_lat.cos();
    dx.hypot(dy)
}

/// Offset a position by meters north and east.
pub fn offset_position(origin: GeoPoint, north_m: f64, east_m: f64) -> PlanningResult<GeoPoint> {
    let lng_per_m = degrees_per_meter_lng(origin.lat)?;
    Ok(GeoPoint::new(
        origin.lat + north_m * degrees_per_meter_lat(),
        origin.lng + east_m * lng_per_m,
    ))
}
