//! Route searches for the Tradewind weather router.
//!
//! Three interchangeable implementations of
//! [`Router`](tradewind_core::Router) share the geodesic and state types from
//! `tradewind-core`:
//!
//! - [`GcRouter`] samples the great circle between the endpoints. It is not
//!   time-optimal and serves as the baseline and mesh skeleton.
//! - [`IsochroneRouter`] grows fixed-interval wavefronts, keeping the
//!   farthest point per bearing sector.
//! - [`DpRouter`] lays a mesh across a corridor around the great circle and
//!   relaxes arrival times layer by layer.
//!
//! Searches are single-threaded and synchronous; each router owns the
//! [`PathTree`](tradewind_core::PathTree) its nodes live in.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod dp;
mod gc;
mod isochrone;

pub use dp::{DpRouter, DpRouterConfig};
pub use gc::{GcRouter, GcRouterConfig, great_circle_skeleton};
pub use isochrone::{IsochroneConfig, IsochroneRouter, prune_by_sector};

use tradewind_core::RoutingError;

/// Convert a configured count into a float for spacing arithmetic.
fn count_as_f64(count: usize, what: &str) -> Result<f64, RoutingError> {
    u32::try_from(count)
        .map(f64::from)
        .map_err(|_| RoutingError::InvalidRequest {
            reason: format!("{what} count {count} is too large"),
        })
}
