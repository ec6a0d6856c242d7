//! Geodesic forward and inverse solves over a selectable earth model.
//!
//! Routers never talk to `geo` directly; they go through [`EarthModel`] so
//! the ellipsoid used for a run is fixed at construction time.

use geo::{Bearing, Destination, Distance, Geodesic, Haversine, Point};

/// Map an angle in degrees into `[0, 360)`.
///
/// # Examples
/// ```
/// use tradewind_core::angle360;
///
/// assert_eq!(angle360(-10.0), 350.0);
/// assert_eq!(angle360(370.0), 10.0);
/// assert_eq!(angle360(0.0), 0.0);
/// ```
#[must_use]
pub fn angle360(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // `rem_euclid` can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Smallest absolute difference between two headings, in `[0, 180]`.
///
/// # Examples
/// ```
/// use tradewind_core::geodesy::angular_distance;
///
/// assert_eq!(angular_distance(350.0, 10.0), 20.0);
/// assert_eq!(angular_distance(90.0, 270.0), 180.0);
/// ```
#[must_use]
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let diff = angle360(a - b);
    if diff > 180.0 { 360.0 - diff } else { diff }
}

/// Result of an inverse solve between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inverse {
    /// Initial bearing at the first point, degrees in `[0, 360)`.
    pub bearing: f64,
    /// Bearing at the second point pointing back to the first.
    pub reverse_bearing: f64,
    /// Distance along the geodesic in metres.
    pub distance: f64,
}

/// Result of a forward solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Forward {
    /// Projected point.
    pub destination: Point<f64>,
    /// Bearing at the destination pointing back to the origin.
    pub reverse_bearing: f64,
}

/// Earth model used for geodesic computations.
///
/// `Wgs84` solves on the WGS84 ellipsoid with Karney's algorithm; `Sphere`
/// uses great circles on a sphere of mean earth radius and is mostly useful
/// for quick comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EarthModel {
    /// WGS84 reference ellipsoid.
    #[default]
    Wgs84,
    /// Spherical earth.
    Sphere,
}

impl EarthModel {
    /// Bearing and distance from `from` to `to`.
    ///
    /// # Examples
    /// ```
    /// use geo::Point;
    /// use tradewind_core::EarthModel;
    ///
    /// let inv = EarthModel::Wgs84.inverse(Point::new(0.0, 0.0), Point::new(1.0, 0.0));
    /// assert!((inv.bearing - 90.0).abs() < 1e-6);
    /// assert!((inv.reverse_bearing - 270.0).abs() < 1e-6);
    /// assert!((inv.distance - 111_319.49).abs() < 1.0);
    /// ```
    #[must_use]
    pub fn inverse(self, from: Point<f64>, to: Point<f64>) -> Inverse {
        Inverse {
            bearing: self.bearing(from, to),
            reverse_bearing: self.bearing(to, from),
            distance: self.distance(from, to),
        }
    }

    /// Project `distance` metres from `origin` along `bearing`.
    ///
    /// A negative distance projects along the reciprocal bearing.
    #[must_use]
    pub fn forward(self, origin: Point<f64>, bearing: f64, distance: f64) -> Forward {
        let (heading, length) = if distance < 0.0 {
            (angle360(bearing + 180.0), -distance)
        } else {
            (angle360(bearing), distance)
        };
        let destination = match self {
            Self::Wgs84 => Geodesic.destination(origin, heading, length),
            Self::Sphere => Haversine.destination(origin, heading, length),
        };
        Forward {
            destination,
            reverse_bearing: self.bearing(destination, origin),
        }
    }

    /// Geodesic distance in metres.
    #[must_use]
    pub fn distance(self, from: Point<f64>, to: Point<f64>) -> f64 {
        match self {
            Self::Wgs84 => Geodesic.distance(from, to),
            Self::Sphere => Haversine.distance(from, to),
        }
    }

    fn bearing(self, from: Point<f64>, to: Point<f64>) -> f64 {
        let raw = match self {
            Self::Wgs84 => Geodesic.bearing(from, to),
            Self::Sphere => Haversine.bearing(from, to),
        };
        angle360(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(-10.0, 350.0)]
    #[case(370.0, 10.0)]
    #[case(0.0, 0.0)]
    #[case(360.0, 0.0)]
    #[case(-720.0, 0.0)]
    #[case(1_085.5, 5.5)]
    fn angle360_wraps_into_range(#[case] input: f64, #[case] expected: f64) {
        assert!((angle360(input) - expected).abs() < 1e-9);
    }

    #[rstest]
    fn tiny_negative_angle_stays_below_360() {
        let wrapped = angle360(-1e-20);
        assert!((0.0..360.0).contains(&wrapped));
    }

    #[rstest]
    #[case(EarthModel::Wgs84)]
    #[case(EarthModel::Sphere)]
    fn forward_inverts_inverse(#[case] earth: EarthModel) {
        let brest = Point::new(-4.91519, 48.26118);
        let martinique = Point::new(-60.69365, 14.77645);
        let inv = earth.inverse(brest, martinique);
        let fwd = earth.forward(brest, inv.bearing, inv.distance);
        assert!(earth.distance(fwd.destination, martinique) < 1.0);
        assert!((fwd.reverse_bearing - inv.reverse_bearing).abs() < 1e-3);
    }

    #[rstest]
    fn negative_distance_projects_backwards() {
        let earth = EarthModel::Wgs84;
        let origin = Point::new(10.0, 10.0);
        let ahead = earth.forward(origin, 45.0, 10_000.0).destination;
        let behind = earth.forward(origin, 45.0, -10_000.0).destination;
        let bearing_back = earth.inverse(origin, behind).bearing;
        assert!(angular_distance(bearing_back, 225.0) < 1e-3);
        assert!((earth.distance(ahead, behind) - 20_000.0).abs() < 1.0);
    }
}
