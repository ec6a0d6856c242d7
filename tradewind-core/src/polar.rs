//! Boat speed from wind: the apparent-wind triangle plus a polar curve.

use geo::Point;
use thiserror::Error;

use crate::angle360;
use crate::wind::{WindError, WindModel};

/// Errors from [`PolarModel::speed`] and [`PolarCurve::new`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolarError {
    /// The curve or the derived wind values cannot be used.
    #[error("invalid polar input: {reason}")]
    InvalidPolarInput {
        /// What was rejected.
        reason: String,
    },
    /// The wind model failed.
    #[error(transparent)]
    Wind(#[from] WindError),
}

/// Maps a heading at a place and time to an achievable boat speed.
pub trait PolarModel {
    /// Boat speed in m/s when sailing `heading` degrees from `position` at
    /// `time`, given a current boat speed estimate `boat_speed` in m/s.
    ///
    /// # Errors
    /// Returns [`PolarError::Wind`] when the wind lookup fails and
    /// [`PolarError::InvalidPolarInput`] when inputs are out of range.
    fn speed<W: WindModel + ?Sized>(
        &self,
        position: Point<f64>,
        heading: f64,
        boat_speed: f64,
        time: f64,
        wind: &W,
    ) -> Result<f64, PolarError>;
}

impl<P: PolarModel + ?Sized> PolarModel for &P {
    fn speed<W: WindModel + ?Sized>(
        &self,
        position: Point<f64>,
        heading: f64,
        boat_speed: f64,
        time: f64,
        wind: &W,
    ) -> Result<f64, PolarError> {
        (**self).speed(position, heading, boat_speed, time, wind)
    }
}

/// Apparent wind derived from boat and true wind velocities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApparentWind {
    /// Angle off the bow in degrees, `[0, 360)`.
    pub direction: f64,
    /// Apparent wind speed in m/s.
    pub speed: f64,
}

/// Solve the velocity triangle for the apparent wind.
///
/// `true_direction` is the true wind angle relative to the heading, as
/// returned by a [`WindModel`].
///
/// # Examples
/// ```
/// use tradewind_core::polar::apparent_wind;
///
/// // A stationary boat feels the true wind.
/// let apparent = apparent_wind(0.0, 120.0, 8.0);
/// assert_eq!(apparent.direction, 120.0);
/// assert_eq!(apparent.speed, 8.0);
/// ```
#[must_use]
pub fn apparent_wind(boat_speed: f64, true_direction: f64, true_speed: f64) -> ApparentWind {
    let speed = (boat_speed.powi(2)
        + true_speed.powi(2)
        + 2.0 * boat_speed * true_speed * true_direction.to_radians().cos())
    .max(0.0)
    .sqrt();
    let direction = if speed == 0.0 {
        0.0
    } else if boat_speed == 0.0 {
        true_direction
    } else {
        let cosine = (speed.powi(2) + boat_speed.powi(2) - true_speed.powi(2))
            / (2.0 * speed * boat_speed);
        cosine.clamp(-1.0, 1.0).acos().to_degrees()
    };
    ApparentWind {
        direction: angle360(direction),
        speed,
    }
}

/// A symmetric polar: boat speed against apparent wind angle on `[0, 180]`.
///
/// Speeds between entries are interpolated linearly; angles outside the
/// covered range take the nearest entry's speed.
///
/// # Examples
/// ```
/// use tradewind_core::PolarCurve;
///
/// let polar = PolarCurve::new(vec![
///     (0.0, 0.0),
///     (45.0, 0.0),
///     (90.0, 2.8),
///     (135.0, 4.2),
///     (180.0, 2.8),
/// ])?;
/// assert!((polar.interpolate(112.5) - 3.5).abs() < 1e-9);
/// // Port and starboard tacks are mirror images.
/// assert_eq!(polar.interpolate(270.0), polar.interpolate(90.0));
/// # Ok::<(), tradewind_core::PolarError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PolarCurve {
    points: Vec<(f64, f64)>,
}

impl PolarCurve {
    /// Build a curve from `(angle, speed)` pairs.
    ///
    /// # Errors
    /// Returns [`PolarError::InvalidPolarInput`] when the curve is empty,
    /// angles are not strictly increasing within `[0, 180]`, or a speed is
    /// negative or not finite.
    pub fn new(points: Vec<(f64, f64)>) -> Result<Self, PolarError> {
        if points.is_empty() {
            return Err(invalid("polar curve has no entries"));
        }
        for &(angle, speed) in &points {
            if !(0.0..=180.0).contains(&angle) {
                return Err(invalid(format!("angle {angle} is outside [0, 180]")));
            }
            if !speed.is_finite() || speed < 0.0 {
                return Err(invalid(format!(
                    "speed {speed} at {angle} degrees must be finite and non-negative"
                )));
            }
        }
        if points.windows(2).any(|pair| match pair {
            [(a, _), (b, _)] => a >= b,
            _ => false,
        }) {
            return Err(invalid("polar angles must be strictly increasing"));
        }
        Ok(Self { points })
    }

    /// The `(angle, speed)` entries.
    #[must_use]
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Boat speed for an apparent wind angle in degrees.
    #[must_use]
    pub fn interpolate(&self, angle: f64) -> f64 {
        let folded = angle360(angle);
        let x = if folded > 180.0 { 360.0 - folded } else { folded };

        let (Some(&(first_angle, first_speed)), Some(&(last_angle, last_speed))) =
            (self.points.first(), self.points.last())
        else {
            return 0.0;
        };
        if x <= first_angle {
            return first_speed;
        }
        if x >= last_angle {
            return last_speed;
        }
        self.points
            .windows(2)
            .find_map(|pair| match pair {
                [(a0, s0), (a1, s1)] if x <= *a1 => {
                    Some(s0 + (s1 - s0) * (x - a0) / (a1 - a0))
                }
                _ => None,
            })
            .unwrap_or(last_speed)
    }
}

impl PolarModel for PolarCurve {
    fn speed<W: WindModel + ?Sized>(
        &self,
        position: Point<f64>,
        heading: f64,
        boat_speed: f64,
        time: f64,
        wind: &W,
    ) -> Result<f64, PolarError> {
        if !boat_speed.is_finite() || boat_speed < 0.0 {
            return Err(invalid(format!("boat speed {boat_speed} is negative")));
        }
        let sample = wind.wind(position, heading, time)?;
        if !sample.speed.is_finite() || sample.speed < 0.0 {
            return Err(invalid(format!("wind speed {} is negative", sample.speed)));
        }
        let apparent = apparent_wind(boat_speed, sample.direction, sample.speed);
        Ok(self.interpolate(apparent.direction))
    }
}

fn invalid(reason: impl Into<String>) -> PolarError {
    PolarError::InvalidPolarInput {
        reason: reason.into(),
    }
}
