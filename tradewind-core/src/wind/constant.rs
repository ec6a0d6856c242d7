//! Uniform, time-invariant wind.

use geo::Point;

use super::{WindError, WindModel, WindSample};
use crate::angle360;

/// Wind blowing from the same bearing at the same speed everywhere.
///
/// # Examples
/// ```
/// use geo::Point;
/// use tradewind_core::{ConstantWind, WindModel};
///
/// let wind = ConstantWind::new(150.0, 20.0)?;
/// let sample = wind.wind(Point::new(0.0, 0.0), 240.0, 0.0)?;
/// assert_eq!(sample.direction, 90.0);
/// assert_eq!(sample.speed, 20.0);
/// # Ok::<(), tradewind_core::WindError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstantWind {
    direction: f64,
    speed: f64,
}

impl ConstantWind {
    /// Wind from `direction` degrees at `speed` m/s.
    ///
    /// # Errors
    /// Returns [`WindError::InvalidField`] for a negative or non-finite
    /// speed, or a non-finite direction.
    pub fn new(direction: f64, speed: f64) -> Result<Self, WindError> {
        if !direction.is_finite() {
            return Err(WindError::InvalidField {
                reason: format!("wind direction {direction} is not finite"),
            });
        }
        if !speed.is_finite() || speed < 0.0 {
            return Err(WindError::InvalidField {
                reason: format!("wind speed {speed} must be finite and non-negative"),
            });
        }
        Ok(Self {
            direction: angle360(direction),
            speed,
        })
    }

    /// Bearing the wind blows from, degrees.
    #[must_use]
    pub const fn direction(&self) -> f64 {
        self.direction
    }

    /// Wind speed in m/s.
    #[must_use]
    pub const fn speed(&self) -> f64 {
        self.speed
    }
}

impl WindModel for ConstantWind {
    fn wind(&self, _position: Point<f64>, heading: f64, _time: f64) -> Result<WindSample, WindError> {
        Ok(WindSample {
            direction: angle360(heading - self.direction),
            speed: self.speed,
        })
    }
}
