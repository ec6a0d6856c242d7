//! Facade crate for the Tradewind weather router.
//!
//! This crate re-exports the core routing types and exposes the route
//! searches and gridded wind models behind feature flags.

#![forbid(unsafe_code)]

pub use tradewind_core::{
    ConstantWind, EarthModel, Isochrone, PathTree, PointId, PolarCurve, PolarError, PolarModel,
    RouteRequest, Router, RoutingError, RoutingPoint, WindError, WindModel, WindSample, angle360,
};

#[cfg(feature = "router")]
pub use tradewind_router::{
    DpRouter, DpRouterConfig, GcRouter, GcRouterConfig, IsochroneConfig, IsochroneRouter,
};

#[cfg(feature = "wind")]
pub use tradewind_wind::{
    FieldKey, ForecastWind, ForecastWindConfig, MemorySource, WindField, WindFieldCache,
    WindSource,
};
