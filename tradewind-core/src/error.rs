//! Errors surfaced by [`Router::calculate_routing`](crate::Router::calculate_routing).

use thiserror::Error;

use crate::polar::PolarError;
use crate::wind::WindError;

/// Errors returned by routers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoutingError {
    /// No path reaches the destination before `max_time`.
    #[error("no feasible route within the time budget ending at {max_time}")]
    Infeasible {
        /// Latest allowed arrival, epoch seconds.
        max_time: f64,
    },
    /// The wind model has neither forecast nor climatology for `time`.
    #[error("no wind data available for timestamp {time}")]
    NoWindData {
        /// Requested epoch seconds.
        time: f64,
    },
    /// Start and end coincide, or the search space collapsed.
    #[error("degenerate geometry: {reason}")]
    DegenerateGeometry {
        /// What collapsed.
        reason: String,
    },
    /// The polar curve or derived wind values were unusable.
    #[error("invalid polar input: {reason}")]
    InvalidPolarInput {
        /// What was rejected.
        reason: String,
    },
    /// Request or configuration values were out of range.
    #[error("invalid routing request: {reason}")]
    InvalidRequest {
        /// What was rejected.
        reason: String,
    },
    /// Any other wind model failure.
    #[error(transparent)]
    Wind(WindError),
}

impl RoutingError {
    /// Whether the error must abort a search rather than drop one candidate.
    ///
    /// Missing wind data and bad requests abort; a polar or wind source
    /// failure for a single heading only excludes that heading.
    #[must_use]
    pub const fn is_systemic(&self) -> bool {
        !matches!(self, Self::InvalidPolarInput { .. } | Self::Wind(_))
    }
}

impl From<WindError> for RoutingError {
    fn from(error: WindError) -> Self {
        match error {
            WindError::NoWindData { time } => Self::NoWindData { time },
            other => Self::Wind(other),
        }
    }
}

impl From<PolarError> for RoutingError {
    fn from(error: PolarError) -> Self {
        match error {
            PolarError::InvalidPolarInput { reason } => Self::InvalidPolarInput { reason },
            PolarError::Wind(wind) => wind.into(),
        }
    }
}
