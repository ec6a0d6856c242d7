//! Core domain types for the Tradewind weather router.
//!
//! The crate defines the pieces every route search shares: geodesic solves
//! over an [`EarthModel`], the [`RoutingPoint`] state and its [`PathTree`]
//! arena, the [`Router`] contract, and the two collaborators a search
//! consults at every step, a [`WindModel`] and a [`PolarModel`].
//!
//! Concrete searches live in `tradewind-router`; gridded forecast wind lives
//! in `tradewind-wind`.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod error;
pub mod geodesy;
pub mod point;
pub mod polar;
pub mod router;
pub mod tree;
pub mod wind;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use error::RoutingError;
pub use geodesy::{EarthModel, Forward, Inverse, angle360};
pub use point::{MIN_SPEED, PointId, RoutingPoint};
pub use polar::{PolarCurve, PolarError, PolarModel};
pub use router::{RouteRequest, Router};
pub use tree::{Isochrone, PathTree};
pub use wind::{ConstantWind, WindError, WindModel, WindSample};
