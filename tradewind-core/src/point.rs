//! Routing state nodes.

use geo::Point;

/// Slowest boat speed, in m/s, accepted for a leg.
///
/// Legs sailed slower than this would take an unbounded time and are dropped
/// before a node is created.
pub const MIN_SPEED: f64 = 1e-6;

/// Index of a [`RoutingPoint`] inside a [`PathTree`](crate::PathTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointId(pub(crate) usize);

impl PointId {
    /// Position of the node in its arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A reachable vessel state: where, when, how fast and from where.
///
/// Points form a backward-linked tree: `previous_point` names the node this
/// one was reached from and always refers to an earlier time.
///
/// # Examples
/// ```
/// use geo::Point;
/// use tradewind_core::RoutingPoint;
///
/// let root = RoutingPoint::root(Point::new(-4.9, 48.3), 240.0, 0.0);
/// assert!(root.is_reached());
/// assert!(root.previous_point.is_none());
/// assert_eq!(root.distance_to_start, 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoutingPoint {
    /// Location, `x = longitude`, `y = latitude`.
    pub position: Point<f64>,
    /// Outbound heading in degrees, when one was computed.
    pub course: Option<f64>,
    /// Predecessor on the path.
    pub previous_point: Option<PointId>,
    /// Metres travelled from the start.
    pub distance_to_start: f64,
    /// Bearing in degrees from the start point to this point.
    pub bearing: f64,
    /// Boat speed in m/s over the leg that reached this point.
    pub speed: f64,
    /// Arrival time in epoch seconds; infinite while unreached.
    pub time: f64,
}

impl RoutingPoint {
    /// Construct the seed node of a search.
    #[must_use]
    pub const fn root(position: Point<f64>, course: f64, start_time: f64) -> Self {
        Self {
            position,
            course: Some(course),
            previous_point: None,
            distance_to_start: 0.0,
            bearing: course,
            speed: 0.0,
            time: start_time,
        }
    }

    /// Construct a node nobody has reached yet.
    ///
    /// Dynamic programming meshes start from these and fill them in as
    /// better predecessors are found.
    #[must_use]
    pub const fn unreached(position: Point<f64>, bearing: f64) -> Self {
        Self {
            position,
            course: None,
            previous_point: None,
            distance_to_start: 0.0,
            bearing,
            speed: 0.0,
            time: f64::INFINITY,
        }
    }

    /// Whether an arrival time has been resolved for this node.
    #[must_use]
    pub fn is_reached(&self) -> bool {
        self.time.is_finite()
    }

    /// Longitude in degrees.
    #[must_use]
    pub fn lon(&self) -> f64 {
        self.position.x()
    }

    /// Latitude in degrees.
    #[must_use]
    pub fn lat(&self) -> f64 {
        self.position.y()
    }
}
