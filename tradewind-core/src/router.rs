//! The contract shared by every route search.
//!
//! A router is built from a [`RouteRequest`] plus a polar and a wind model.
//! `calculate_routing` runs the search and returns the terminal node of the
//! best path; the nodes themselves stay in the router's [`PathTree`], so the
//! path is recovered with [`Router::route`].

use geo::Point;

use crate::{EarthModel, Isochrone, PathTree, RoutingError, RoutingPoint};

/// Start and end points closer than this are treated as the same place.
pub const COINCIDENT_TOLERANCE_M: f64 = 1.0;

/// Endpoints, time window and earth model for one routing run.
///
/// # Examples
/// ```
/// use geo::Point;
/// use tradewind_core::RouteRequest;
///
/// let request = RouteRequest::new(
///     Point::new(-4.91519, 48.26118),
///     Point::new(-60.69365, 14.77645),
///     0.0,
///     90.0 * 86_400.0,
/// );
/// assert!(request.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteRequest {
    /// Departure point.
    pub start: Point<f64>,
    /// Destination.
    pub end: Point<f64>,
    /// Departure time, epoch seconds.
    pub start_time: f64,
    /// Latest acceptable arrival, epoch seconds.
    pub max_time: f64,
    /// Earth model for geodesic solves.
    pub earth: EarthModel,
}

impl RouteRequest {
    /// Request on the default WGS84 ellipsoid.
    #[must_use]
    pub fn new(start: Point<f64>, end: Point<f64>, start_time: f64, max_time: f64) -> Self {
        Self {
            start,
            end,
            start_time,
            max_time,
            earth: EarthModel::default(),
        }
    }

    /// Replace the earth model.
    #[must_use]
    pub const fn with_earth(mut self, earth: EarthModel) -> Self {
        self.earth = earth;
        self
    }

    /// Check coordinates, time window and endpoint separation.
    ///
    /// # Errors
    /// Returns [`RoutingError::InvalidRequest`] for out-of-range inputs and
    /// [`RoutingError::DegenerateGeometry`] when start and end coincide.
    pub fn validate(&self) -> Result<(), RoutingError> {
        for (label, point) in [("start", self.start), ("end", self.end)] {
            if !point.x().is_finite() || !point.y().is_finite() {
                return Err(RoutingError::InvalidRequest {
                    reason: format!("{label} coordinate is not finite"),
                });
            }
            if !(-90.0..=90.0).contains(&point.y()) {
                return Err(RoutingError::InvalidRequest {
                    reason: format!("{label} latitude {} is outside [-90, 90]", point.y()),
                });
            }
        }
        if !self.start_time.is_finite() || self.max_time.is_nan() {
            return Err(RoutingError::InvalidRequest {
                reason: "start time must be finite and max time a number".into(),
            });
        }
        if self.max_time < self.start_time {
            return Err(RoutingError::InvalidRequest {
                reason: format!(
                    "max time {} precedes start time {}",
                    self.max_time, self.start_time
                ),
            });
        }
        if self.earth.distance(self.start, self.end) < COINCIDENT_TOLERANCE_M {
            return Err(RoutingError::DegenerateGeometry {
                reason: "start and end coincide".into(),
            });
        }
        Ok(())
    }
}

/// A route search over geodesic legs.
///
/// Implementations rebuild their search structure on every call to
/// [`Router::calculate_routing`]; [`Router::isochrones`] exposes the layers of
/// the most recent run and is empty before the first one.
pub trait Router {
    /// Run the search and return the terminal node of the best path.
    ///
    /// # Errors
    /// Returns [`RoutingError::Infeasible`] when nothing reaches the goal
    /// within the time budget, or the specific systemic failure otherwise.
    fn calculate_routing(&mut self) -> Result<RoutingPoint, RoutingError>;

    /// Layers built by the last run, in time or mesh order.
    fn isochrones(&self) -> &[Isochrone];

    /// Arena holding every node the last run created.
    fn tree(&self) -> &PathTree;

    /// Path from the start to `terminal`, in travel order.
    fn route(&self, terminal: &RoutingPoint) -> Vec<RoutingPoint> {
        self.tree().path_to(terminal)
    }

    /// Copies of every layer's nodes, for diagnostics and plotting.
    fn layers(&self) -> Vec<Vec<RoutingPoint>> {
        self.isochrones()
            .iter()
            .map(|layer| self.tree().resolve(layer))
            .collect()
    }
}
