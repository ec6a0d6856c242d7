//! Fixtures shared by unit, behaviour and property tests.
//!
//! The reference scenario is a transatlantic passage from Brest to
//! Martinique under a steady south-south-easterly.

use geo::Point;

use crate::{
    ConstantWind, PathTree, PolarCurve, RouteRequest, RoutingPoint, WindError, WindModel,
    WindSample,
};

/// Departure time of the reference scenario (2023-11-14T22:13:20Z).
pub const SCENARIO_START_TIME: f64 = 1_700_000_000.0;

/// Brest, France.
#[must_use]
pub fn brest() -> Point<f64> {
    Point::new(-4.91519, 48.26118)
}

/// Le Marin, Martinique.
#[must_use]
pub fn martinique() -> Point<f64> {
    Point::new(-60.69365, 14.77645)
}

/// Brest to Martinique with a ninety day budget.
#[must_use]
pub fn scenario_request() -> RouteRequest {
    RouteRequest::new(
        brest(),
        martinique(),
        SCENARIO_START_TIME,
        SCENARIO_START_TIME + 90.0 * 86_400.0,
    )
}

/// Polar that stalls upwind and is fastest on a broad reach.
///
/// # Panics
/// Never; the entries are statically valid.
#[must_use]
pub fn scenario_polar() -> PolarCurve {
    PolarCurve::new(vec![
        (0.0, 0.0),
        (45.0, 0.0),
        (90.0, 2.8),
        (135.0, 4.2),
        (180.0, 2.8),
    ])
    .expect("scenario polar is valid")
}

/// Polar of a boat that never moves.
///
/// # Panics
/// Never; the entries are statically valid.
#[must_use]
pub fn becalmed_polar() -> PolarCurve {
    PolarCurve::new(vec![(0.0, 0.0), (180.0, 0.0)]).expect("becalmed polar is valid")
}

/// Twenty metres per second from 150 degrees.
///
/// # Panics
/// Never; the values are statically valid.
#[must_use]
pub fn scenario_wind() -> ConstantWind {
    ConstantWind::new(150.0, 20.0).expect("scenario wind is valid")
}

/// Wind model without any data.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoWind;

impl WindModel for NoWind {
    fn wind(&self, _position: Point<f64>, _heading: f64, time: f64) -> Result<WindSample, WindError> {
        Err(WindError::NoWindData { time })
    }
}

/// Wind that fails with a source error on every heading rounding to an even
/// degree and defers to `inner` otherwise.
#[derive(Debug, Clone, Copy)]
pub struct PatchyWind<W> {
    /// Model answering the odd headings.
    pub inner: W,
}

impl<W: WindModel> WindModel for PatchyWind<W> {
    fn wind(&self, position: Point<f64>, heading: f64, time: f64) -> Result<WindSample, WindError> {
        if (heading.round() as i64).rem_euclid(2) == 0 {
            return Err(WindError::Source {
                key: format!("heading {heading:.0}"),
                message: "sector unavailable".into(),
            });
        }
        self.inner.wind(position, heading, time)
    }
}

/// Wind whose data runs out after `until`.
#[derive(Debug, Clone, Copy)]
pub struct ExpiringWind<W> {
    /// Model answering queries up to `until`.
    pub inner: W,
    /// Last covered epoch second.
    pub until: f64,
}

impl<W: WindModel> WindModel for ExpiringWind<W> {
    fn wind(&self, position: Point<f64>, heading: f64, time: f64) -> Result<WindSample, WindError> {
        if time > self.until {
            return Err(WindError::NoWindData { time });
        }
        self.inner.wind(position, heading, time)
    }
}

/// Assert the path ending at `terminal` has strictly increasing times and
/// non-decreasing distances, and ends at a root.
///
/// # Panics
/// Panics when either invariant is violated.
pub fn assert_chain_monotone(tree: &PathTree, terminal: &RoutingPoint) {
    let path = tree.path_to(terminal);
    let Some(root) = path.first() else {
        panic!("path is empty");
    };
    assert!(root.previous_point.is_none(), "path does not end at a root");
    assert_eq!(root.distance_to_start, 0.0, "root must start at distance 0");
    for pair in path.windows(2) {
        if let [earlier, later] = pair {
            assert!(
                later.time > earlier.time,
                "time did not increase: {} -> {}",
                earlier.time,
                later.time
            );
            assert!(
                later.distance_to_start >= earlier.distance_to_start,
                "distance decreased: {} -> {}",
                earlier.distance_to_start,
                later.distance_to_start
            );
        }
    }
}
