use thiserror::Error;

/// Errors raised by [`crate::wind::WindModel`] implementations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WindError {
    /// Neither forecast nor climatology data covers the requested time.
    #[error("no wind data available for timestamp {time}")]
    NoWindData {
        /// Requested epoch seconds.
        time: f64,
    },
    /// A wind field or constant wind was constructed from unusable values.
    #[error("invalid wind field: {reason}")]
    InvalidField {
        /// What was wrong with the input.
        reason: String,
    },
    /// The backing data source failed to produce a field.
    #[error("wind source failed for {key}: {message}")]
    Source {
        /// Cache key of the field being loaded.
        key: String,
        /// Source-specific description of the failure.
        message: String,
    },
}
