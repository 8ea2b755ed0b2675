//! Core data models for search planning and detection reporting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A planar geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// A navigable point a vehicle is commanded to fly through.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub lat: f64,
    pub lng: f64,
    pub altitude_m: f64,
}

impl Waypoint {
    pub fn new(lat: f64, lng: f64, altitude_m: f64) -> Self {
        Self { lat, lng, altitude_m }
    }

    /// Lift a ground point to the given altitude.
    pub fn at(point: GeoPoint, altitude_m: f64) -> Self {
        Self::new(point.lat, point.lng, altitude_m)
    }

    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

/// Axis-aligned bounding box of a set of points, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl GeoBounds {
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }

    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn lng_span(&self) -> f64 {
        self.max_lng - self.min_lng
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        point.lat >= self.min_lat
            && point.lat <= self.max_lat
            && point.lng >= self.min_lng
            && point.lng <= self.max_lng
    }

    /// Rectangle corners: SW, NW, NE, SE.
    pub fn corners(&self) -> [GeoPoint; 4] {
        [
            GeoPoint::new(self.min_lat, self.min_lng),
            GeoPoint::new(self.max_lat, self.min_lng),
            GeoPoint::new(self.max_lat, self.max_lng),
            GeoPoint::new(self.min_lat, self.max_lng),
        ]
    }
}

// ========== FLIGHT PLANNING ==========

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    /// Set when a path has been re-planned around a detection
    Urgent,
}

/// Coverage pattern used to fill a search area with waypoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchPattern {
    /// Boustrophedon sweep over the bounding box
    #[default]
    Grid,
    /// Outward spiral from the bounding box center
    Spiral,
    /// Fly the polygon vertices in order
    Contour,
}

/// Ordered planning output handed to flight control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightPath {
    pub waypoints: Vec<Waypoint>,
    pub estimated_time_minutes: u32,
    pub priority: Priority,
}

impl FlightPath {
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

/// Parameters for a single search path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Polygon vertices of the search area
    pub area: Vec<GeoPoint>,
    pub start: GeoPoint,
    pub altitude_m: f64,
    #[serde(default)]
    pub pattern: SearchPattern,
    #[serde(default)]
    pub priority: Priority,
}

// ========== DETECTIONS ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionType {
    Victim,
    Fire,
    Flood,
    StructuralDamage,
    Vehicle,
}

/// Urgency assigned by the upstream vision classifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl Urgency {
    /// High and critical detections are escalated at ingest time.
    pub fn is_escalated(&self) -> bool {
        matches!(self, Urgency::High | Urgency::Critical)
    }
}

/// Classified detection as received from the vision pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionReport {
    pub drone_id: String,
    /// Opaque reference to the stored frame
    #[serde(default)]
    pub image_ref: String,
    pub location: Waypoint,
    pub confidence: f64,
    pub detection_type: DetectionType,
    #[serde(default)]
    pub urgency: Urgency,
}

/// A detection admitted to the ingest queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub id: String,
    pub drone_id: String,
    pub timestamp: DateTime<Utc>,
    pub location: Waypoint,
    pub detection_type: DetectionType,
    pub confidence: f64,
    pub image_ref: String,
    pub processed: bool,
}

impl Detection {
    pub fn from_report(id: String, report: &DetectionReport, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            drone_id: report.drone_id.clone(),
            timestamp,
            location: report.location,
            detection_type: report.detection_type,
            confidence: report.confidence,
            image_ref: report.image_ref.clone(),
            processed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_use_wire_names() {
        assert_eq!(
            serde_json::to_string(&DetectionType::StructuralDamage).unwrap(),
            "\"structural_damage\""
        );
        assert_eq!(serde_json::to_string(&Priority::Urgent).unwrap(), "\"urgent\"");
        let pattern: SearchPattern = serde_json::from_str("\"spiral\"").unwrap();
        assert_eq!(pattern, SearchPattern::Spiral);
    }

    #[test]
    fn report_defaults_urgency_to_low() {
        let report: DetectionReport = serde_json::from_value(serde_json::json!({
            "drone_id": "d1",
            "location": {"lat": 25.0, "lng": 121.5, "altitude_m": 60.0},
            "confidence": 0.9,
            "detection_type": "victim"
        }))
        .unwrap();
        assert_eq!(report.urgency, Urgency::Low);
        assert!(!report.urgency.is_escalated());
        assert!(report.image_ref.is_empty());
    }

    #[test]
    fn bounds_corners_run_sw_nw_ne_se() {
        let bounds = GeoBounds { min_lat: 1.0, max_lat: 2.0, min_lng: 10.0, max_lng: 12.0 };
        let corners = bounds.corners();
        assert_eq!(corners[0], GeoPoint::new(1.0, 10.0));
        assert_eq!(corners[2], GeoPoint::new(2.0, 12.0));
        assert_eq!(bounds.center(), GeoPoint::new(1.5, 11.0));
        assert!(bounds.contains(GeoPoint::new(1.5, 12.0)));
        assert!(!bounds.contains(GeoPoint::new(2.5, 11.0)));
    }
}
