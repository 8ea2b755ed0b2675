//! Error type shared by the planning functions.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanningError {
    /// Empty or malformed geometry, non-positive spacing, zero sector count, etc.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Longitude scale is undefined at the poles.
    #[error("degenerate geometry: longitude scale undefined at latitude {lat}")]
    DegenerateGeometry { lat: f64 },
}

impl PlanningError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

pub type PlanningResult<T> = Result<T, PlanningError>;
