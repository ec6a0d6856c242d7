//! Gridded wind for the Tradewind router.
//!
//! Forecast and climatology fields arrive through a [`WindSource`], are
//! decoded once into a shared [`WindFieldCache`], and are served to routers by
//! [`ForecastWind`], which implements
//! [`WindModel`](tradewind_core::WindModel).
//!
//! Fetching and decoding GRIB files is left to `WindSource` implementations;
//! [`MemorySource`] serves pre-built fields.

#![forbid(unsafe_code)]

pub mod cache;
pub mod field;
pub mod forecast;
pub mod source;

pub use cache::{FieldKey, WindFieldCache};
pub use field::WindField;
pub use forecast::{ForecastWind, ForecastWindConfig, forecast_hour, month_of};
pub use source::{MemorySource, WindSource};
