//! Wind lookups consumed by polar models.
//!
//! A [`WindModel`] answers one question: given where the boat is, which way
//! it points and when, where does the true wind come from relative to the
//! bow and how strong is it. Gridded forecast implementations live in the
//! `tradewind-wind` crate; [`ConstantWind`] covers tests and quick studies.

mod constant;
mod error;

use std::sync::Arc;

use geo::Point;

pub use constant::ConstantWind;
pub use error::WindError;

/// True wind at a location, expressed relative to a heading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindSample {
    /// `heading - true wind bearing`, normalised to `[0, 360)`.
    pub direction: f64,
    /// Wind speed in m/s.
    pub speed: f64,
}

/// Source of true wind for a position, heading and time.
///
/// # Examples
/// ```rust
/// use geo::Point;
/// use tradewind_core::{WindError, WindModel, WindSample, angle360};
///
/// struct Northerly;
///
/// impl WindModel for Northerly {
///     fn wind(&self, _: Point<f64>, heading: f64, _: f64) -> Result<WindSample, WindError> {
///         Ok(WindSample { direction: angle360(heading), speed: 10.0 })
///     }
/// }
///
/// let sample = Northerly.wind(Point::new(0.0, 0.0), 180.0, 0.0)?;
/// assert_eq!(sample.direction, 180.0);
/// # Ok::<(), WindError>(())
/// ```
pub trait WindModel {
    /// Wind for a boat at `position` pointing at `heading` degrees at
    /// `time` epoch seconds.
    ///
    /// # Errors
    /// Returns [`WindError::NoWindData`] when the model has no data for
    /// `time`, or another [`WindError`] when the data cannot be read.
    fn wind(&self, position: Point<f64>, heading: f64, time: f64)
    -> Result<WindSample, WindError>;
}

impl<W: WindModel + ?Sized> WindModel for &W {
    fn wind(
        &self,
        position: Point<f64>,
        heading: f64,
        time: f64,
    ) -> Result<WindSample, WindError> {
        (**self).wind(position, heading, time)
    }
}

impl<W: WindModel + ?Sized> WindModel for Arc<W> {
    fn wind(
        &self,
        position: Point<f64>,
        heading: f64,
        time: f64,
    ) -> Result<WindSample, WindError> {
        (**self).wind(position, heading, time)
    }
}
