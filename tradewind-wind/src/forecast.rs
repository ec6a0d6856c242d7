//! Forecast-backed wind with a climatology fallback.

use std::sync::Arc;

use chrono::{DateTime, Datelike};
use geo::Point;
use tradewind_core::{WindError, WindModel, WindSample, angle360};

use crate::{FieldKey, WindField, WindFieldCache, WindSource};

const SECONDS_PER_HOUR: f64 = 3_600.0;

/// Timing of the forecast run a [`ForecastWind`] reads from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForecastWindConfig {
    /// Model run (analysis) time, epoch seconds.
    pub run_time: f64,
    /// Last published forecast step in hours; later times use climatology.
    pub horizon_hours: u32,
    /// Steps after this hour are only published every three hours.
    pub three_hourly_after: u32,
}

impl Default for ForecastWindConfig {
    fn default() -> Self {
        Self {
            run_time: 0.0,
            horizon_hours: 180,
            three_hourly_after: 78,
        }
    }
}

/// Forecast step, in whole hours after the run, that best matches `time`.
///
/// Times before the run map to the analysis step. Beyond
/// `three_hourly_after` the hour snaps to the nearest multiple of three.
///
/// # Examples
/// ```
/// use tradewind_wind::forecast_hour;
///
/// assert_eq!(forecast_hour(5_400.0, 0.0, 78), Some(2));
/// assert_eq!(forecast_hour(-7_200.0, 0.0, 78), Some(0));
/// assert_eq!(forecast_hour(82.0 * 3_600.0, 0.0, 78), Some(81));
/// assert_eq!(forecast_hour(83.0 * 3_600.0, 0.0, 78), Some(84));
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "hours are rounded and range-checked before the cast"
)]
pub fn forecast_hour(time: f64, run_time: f64, three_hourly_after: u32) -> Option<u32> {
    if !time.is_finite() || !run_time.is_finite() {
        return None;
    }
    let hours = ((time - run_time) / SECONDS_PER_HOUR).round().max(0.0);
    if !hours.is_finite() || hours >= f64::from(u32::MAX - 1) {
        return None;
    }
    let hour = hours as u32;
    if hour <= three_hourly_after {
        return Some(hour);
    }
    Some(match hour.rem_euclid(3) {
        1 => hour - 1,
        2 => hour + 1,
        _ => hour,
    })
}

/// Calendar month (1 to 12, UTC) containing `time`.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "out-of-range timestamps are rejected by chrono"
)]
pub fn month_of(time: f64) -> Option<u32> {
    if !time.is_finite() {
        return None;
    }
    DateTime::from_timestamp(time.floor() as i64, 0).map(|instant| instant.month())
}

/// Wind from gridded forecasts, falling back to monthly climatology.
///
/// Each query picks the forecast step nearest to its time. Steps beyond the
/// horizon, or missing from the source, are answered from the climatology of
/// the query's month. Fields are decoded once through a shared
/// [`WindFieldCache`].
#[derive(Debug)]
pub struct ForecastWind<S: WindSource> {
    source: S,
    cache: Arc<WindFieldCache>,
    config: ForecastWindConfig,
}

impl<S: WindSource> ForecastWind<S> {
    /// Forecast wind for the run at `run_time` with a private cache.
    pub fn new(source: S, run_time: f64) -> Self {
        Self::with_config(
            source,
            Arc::new(WindFieldCache::new()),
            ForecastWindConfig {
                run_time,
                ..ForecastWindConfig::default()
            },
        )
    }

    /// Forecast wind with an explicit, possibly shared, cache.
    pub const fn with_config(
        source: S,
        cache: Arc<WindFieldCache>,
        config: ForecastWindConfig,
    ) -> Self {
        Self {
            source,
            cache,
            config,
        }
    }

    /// The cache this model fills.
    #[must_use]
    pub const fn cache(&self) -> &Arc<WindFieldCache> {
        &self.cache
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &ForecastWindConfig {
        &self.config
    }

    /// The field answering queries at `time`.
    ///
    /// # Errors
    /// Returns [`WindError::NoWindData`] when neither the forecast nor the
    /// climatology covers `time`, and propagates source failures.
    pub fn field_at(&self, time: f64) -> Result<Arc<WindField>, WindError> {
        let hour = forecast_hour(time, self.config.run_time, self.config.three_hourly_after)
            .filter(|hour| *hour <= self.config.horizon_hours);
        if let Some(hour) = hour {
            if let Some(field) = self.load(FieldKey::Forecast { hour })? {
                return Ok(field);
            }
            log::debug!("forecast step +{hour}h is missing; falling back to climatology");
        }
        let month = month_of(time).ok_or(WindError::NoWindData { time })?;
        self.load(FieldKey::Climatology { month })?
            .ok_or(WindError::NoWindData { time })
    }

    fn load(&self, key: FieldKey) -> Result<Option<Arc<WindField>>, WindError> {
        self.cache.get_or_load(key, || self.source.load(key))
    }
}

impl<S: WindSource> WindModel for ForecastWind<S> {
    #[expect(
        clippy::float_arithmetic,
        reason = "relative wind angle is a difference of bearings"
    )]
    fn wind(&self, position: Point<f64>, heading: f64, time: f64) -> Result<WindSample, WindError> {
        let field = self.field_at(time)?;
        let (from, speed) = field.sample(position);
        Ok(WindSample {
            direction: angle360(heading - from),
            speed,
        })
    }
}
