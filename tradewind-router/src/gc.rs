//! Great-circle baseline router.

use geo::Point;
use log::{info, warn};
use tradewind_core::{
    Isochrone, MIN_SPEED, PathTree, PolarModel, RouteRequest, Router, RoutingError, RoutingPoint,
    WindModel, angle360,
};

use crate::count_as_f64;

/// Configuration for [`GcRouter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GcRouterConfig {
    /// Number of equal-length legs the great circle is split into.
    pub segments: usize,
}

impl Default for GcRouterConfig {
    fn default() -> Self {
        Self { segments: 20 }
    }
}

/// Sails the great circle between the endpoints at whatever speed the polar
/// allows on each leg.
///
/// The path is fixed; only the timing depends on wind. Each leg's speed is
/// taken at the leg's far end with the heading the great circle continues on.
///
/// # Examples
/// ```
/// use tradewind_core::test_support::{scenario_polar, scenario_request, scenario_wind};
/// use tradewind_core::Router;
/// use tradewind_router::GcRouter;
///
/// let mut router = GcRouter::new(scenario_request(), scenario_polar(), scenario_wind());
/// let terminal = router.calculate_routing()?;
/// assert_eq!(router.route(&terminal).len(), 21);
/// # Ok::<(), tradewind_core::RoutingError>(())
/// ```
#[derive(Debug)]
pub struct GcRouter<P, W>
where
    P: PolarModel,
    W: WindModel,
{
    request: RouteRequest,
    polar: P,
    wind: W,
    config: GcRouterConfig,
    tree: PathTree,
    isochrones: Vec<Isochrone>,
}

impl<P, W> GcRouter<P, W>
where
    P: PolarModel,
    W: WindModel,
{
    /// Construct a router using default configuration.
    pub fn new(request: RouteRequest, polar: P, wind: W) -> Self {
        Self::with_config(request, polar, wind, GcRouterConfig::default())
    }

    /// Construct a router with explicit configuration.
    pub fn with_config(request: RouteRequest, polar: P, wind: W, config: GcRouterConfig) -> Self {
        Self {
            request,
            polar,
            wind,
            config,
            tree: PathTree::new(),
            isochrones: Vec::new(),
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &GcRouterConfig {
        &self.config
    }

    /// The request this router answers.
    #[must_use]
    pub const fn request(&self) -> &RouteRequest {
        &self.request
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "leg times are distance over speed"
    )]
    fn sail(&mut self) -> Result<RoutingPoint, RoutingError> {
        let walk = GreatCircle::walk(&self.request, self.config.segments)?;
        let mut previous = RoutingPoint::root(self.request.start, walk.bearing, self.request.start_time);
        let mut previous_id = self.tree.push(previous);
        self.isochrones.push(vec![previous_id]);

        for waypoint in &walk.waypoints {
            let speed = self.polar.speed(
                waypoint.position,
                waypoint.course,
                0.0,
                previous.time,
                &self.wind,
            )?;
            if !speed.is_finite() || speed < MIN_SPEED {
                warn!(
                    "great circle is becalmed at ({:.3}, {:.3}); speed {speed}",
                    waypoint.position.x(),
                    waypoint.position.y()
                );
                return Err(RoutingError::Infeasible {
                    max_time: self.request.max_time,
                });
            }
            let point = RoutingPoint {
                position: waypoint.position,
                course: Some(waypoint.course),
                previous_point: Some(previous_id),
                distance_to_start: walk.advance(previous.distance_to_start),
                bearing: walk.bearing,
                speed,
                time: previous.time + walk.leg / speed,
            };
            previous_id = self.tree.push(point);
            self.isochrones.push(vec![previous_id]);
            previous = point;
        }
        Ok(previous)
    }
}

impl<P, W> Router for GcRouter<P, W>
where
    P: PolarModel,
    W: WindModel,
{
    #[expect(
        clippy::float_arithmetic,
        reason = "log output converts units"
    )]
    fn calculate_routing(&mut self) -> Result<RoutingPoint, RoutingError> {
        self.tree.clear();
        self.isochrones.clear();
        self.request.validate()?;

        let terminal = self.sail()?;
        if terminal.time > self.request.max_time {
            warn!(
                "great circle arrives {:.1} h after the deadline",
                (terminal.time - self.request.max_time) / 3_600.0
            );
            return Err(RoutingError::Infeasible {
                max_time: self.request.max_time,
            });
        }
        info!(
            "great circle route: {:.1} km in {:.1} h over {} legs",
            terminal.distance_to_start / 1_000.0,
            (terminal.time - self.request.start_time) / 3_600.0,
            self.config.segments
        );
        Ok(terminal)
    }

    fn isochrones(&self) -> &[Isochrone] {
        &self.isochrones
    }

    fn tree(&self) -> &PathTree {
        &self.tree
    }
}

/// The great-circle walk for `request` without any polar queries.
///
/// Returns `segments + 1` points in travel order carrying position,
/// continuing course and cumulative distance; speed is zero and every
/// time is the start time. The points are not linked to each other.
///
/// # Errors
/// Returns [`RoutingError::InvalidRequest`] for zero segments or an
/// invalid request and [`RoutingError::DegenerateGeometry`] when the
/// endpoints coincide.
pub fn great_circle_skeleton(
    request: &RouteRequest,
    segments: usize,
) -> Result<Vec<RoutingPoint>, RoutingError> {
    request.validate()?;
    let walk = GreatCircle::walk(request, segments)?;
    let start_time = request.start_time;
    let mut points = Vec::with_capacity(walk.waypoints.len() + 1);
    points.push(RoutingPoint::root(request.start, walk.bearing, start_time));
    let mut travelled = 0.0;
    for waypoint in &walk.waypoints {
        travelled = walk.advance(travelled);
        points.push(RoutingPoint {
            position: waypoint.position,
            course: Some(waypoint.course),
            previous_point: None,
            distance_to_start: travelled,
            bearing: walk.bearing,
            speed: 0.0,
            time: start_time,
        });
    }
    Ok(points)
}

/// Equal-length legs along the geodesic from start to end.
struct GreatCircle {
    bearing: f64,
    leg: f64,
    waypoints: Vec<Waypoint>,
}

struct Waypoint {
    position: Point<f64>,
    course: f64,
}

impl GreatCircle {
    #[expect(
        clippy::float_arithmetic,
        reason = "legs are an equal share of the total distance"
    )]
    fn walk(request: &RouteRequest, segments: usize) -> Result<Self, RoutingError> {
        if segments == 0 {
            return Err(RoutingError::InvalidRequest {
                reason: "a great circle needs at least one segment".into(),
            });
        }
        let earth = request.earth;
        let inverse = earth.inverse(request.start, request.end);
        let leg = inverse.distance / count_as_f64(segments, "segment")?;

        let mut waypoints: Vec<Waypoint> = Vec::with_capacity(segments);
        let mut position = request.start;
        let mut course = inverse.bearing;
        for _ in 0..segments {
            let forward = earth.forward(position, course, leg);
            position = forward.destination;
            // The reverse azimuth points home; turn it round to keep going.
            course = angle360(forward.reverse_bearing + 180.0);
            waypoints.push(Waypoint { position, course });
        }
        Ok(Self {
            bearing: inverse.bearing,
            leg,
            waypoints,
        })
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "distances accumulate leg by leg"
    )]
    fn advance(&self, travelled: f64) -> f64 {
        travelled + self.leg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tradewind_core::test_support::{
        assert_chain_monotone, becalmed_polar, scenario_polar, scenario_request, scenario_wind,
    };
    use tradewind_core::{ConstantWind, PolarCurve};

    type ScenarioRouter = GcRouter<PolarCurve, ConstantWind>;

    #[fixture]
    fn router() -> ScenarioRouter {
        GcRouter::new(scenario_request(), scenario_polar(), scenario_wind())
    }

    #[rstest]
    fn yields_segments_plus_one_points(mut router: ScenarioRouter) {
        let terminal = router.calculate_routing().expect("scenario route");
        let route = router.route(&terminal);
        assert_eq!(route.len(), 21);
        assert_eq!(router.isochrones().len(), 21);
        assert!(router.isochrones().iter().all(|layer| layer.len() == 1));
        assert_chain_monotone(router.tree(), &terminal);
    }

    #[rstest]
    fn total_distance_matches_geodesic(mut router: ScenarioRouter) {
        let request = scenario_request();
        let terminal = router.calculate_routing().expect("scenario route");
        let expected = request.earth.distance(request.start, request.end);
        assert!((terminal.distance_to_start - expected).abs() < 1.0);
        assert!(request.earth.distance(terminal.position, request.end) < 10.0);
        assert!(terminal.time > request.start_time);
    }

    #[rstest]
    fn recomputation_rebuilds_tree(mut router: ScenarioRouter) {
        let first = router.calculate_routing().expect("first run");
        let second = router.calculate_routing().expect("second run");
        assert_eq!(first, second);
        assert_eq!(router.tree().len(), 21);
    }

    #[rstest]
    fn becalmed_boat_is_infeasible() {
        let mut router = GcRouter::new(scenario_request(), becalmed_polar(), scenario_wind());
        assert!(matches!(
            router.calculate_routing(),
            Err(RoutingError::Infeasible { .. })
        ));
    }

    #[rstest]
    fn deadline_is_enforced() {
        let mut request = scenario_request();
        request.max_time = request.start_time + 86_400.0;
        let mut router = GcRouter::new(request, scenario_polar(), scenario_wind());
        assert!(matches!(
            router.calculate_routing(),
            Err(RoutingError::Infeasible { .. })
        ));
    }

    #[rstest]
    fn zero_segments_are_rejected() {
        let mut router = GcRouter::with_config(
            scenario_request(),
            scenario_polar(),
            scenario_wind(),
            GcRouterConfig { segments: 0 },
        );
        assert!(matches!(
            router.calculate_routing(),
            Err(RoutingError::InvalidRequest { .. })
        ));
    }

    #[rstest]
    fn skeleton_skips_polar() {
        let skeleton = great_circle_skeleton(&scenario_request(), 5).expect("skeleton");
        assert_eq!(skeleton.len(), 6);
        assert!(skeleton.iter().all(|point| point.speed.abs() < f64::EPSILON));
        assert!(skeleton.iter().all(|point| point.previous_point.is_none()));
        assert!(skeleton.windows(2).all(|pair| match pair {
            [earlier, later] => earlier.distance_to_start < later.distance_to_start,
            _ => true,
        }));
    }

    #[rstest]
    fn skeleton_rejects_coincident_endpoints() {
        let mut request = scenario_request();
        request.end = request.start;
        assert!(matches!(
            great_circle_skeleton(&request, 5),
            Err(RoutingError::DegenerateGeometry { .. })
        ));
    }

    #[rstest]
    fn router_reports_its_request_and_config() {
        let config = GcRouterConfig { segments: 7 };
        let mut router =
            GcRouter::with_config(scenario_request(), scenario_polar(), scenario_wind(), config);
        assert_eq!(router.request(), &scenario_request());
        assert_eq!(router.config(), &config);
        let terminal = router.calculate_routing().expect("scenario route");
        assert_eq!(router.route(&terminal).len(), config.segments + 1);
    }
}
