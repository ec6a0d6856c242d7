#![expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]

//! Behavioural tests for the routers using rstest-bdd.

use std::cell::RefCell;
use std::sync::Arc;

use geo::Point;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tradewind_core::test_support::{
    SCENARIO_START_TIME, becalmed_polar, brest, scenario_polar, scenario_request, scenario_wind,
};
use tradewind_core::{
    ConstantWind, PolarCurve, RouteRequest, Router, RoutingError, RoutingPoint, WindError,
    WindModel, WindSample,
};
use tradewind_router::{DpRouter, GcRouter, IsochroneRouter};
use tradewind_wind::{FieldKey, ForecastWind, MemorySource, WindField};

#[derive(Debug, Clone, Copy, Default)]
enum Algorithm {
    #[default]
    GreatCircle,
    Isochrone,
    Dynamic,
}

#[derive(Debug, Clone)]
enum WindChoice {
    Steady(ConstantWind),
    Forecast(Arc<ForecastWind<MemorySource>>),
}

impl WindModel for WindChoice {
    fn wind(&self, position: Point<f64>, heading: f64, time: f64) -> Result<WindSample, WindError> {
        match self {
            Self::Steady(wind) => wind.wind(position, heading, time),
            Self::Forecast(wind) => wind.wind(position, heading, time),
        }
    }
}

#[derive(Debug)]
struct RoutingWorld {
    request: RefCell<RouteRequest>,
    polar: RefCell<PolarCurve>,
    wind: RefCell<WindChoice>,
    algorithm: RefCell<Algorithm>,
    outcome: RefCell<Option<Result<Vec<RoutingPoint>, RoutingError>>>,
}

impl RoutingWorld {
    fn new() -> Self {
        Self {
            request: RefCell::new(scenario_request()),
            polar: RefCell::new(scenario_polar()),
            wind: RefCell::new(WindChoice::Steady(scenario_wind())),
            algorithm: RefCell::new(Algorithm::default()),
            outcome: RefCell::new(None),
        }
    }

    fn outcome(&self) -> Result<Vec<RoutingPoint>, RoutingError> {
        self.outcome
            .borrow()
            .clone()
            .expect("route should be calculated before assertions")
    }

    fn route(&self) -> Vec<RoutingPoint> {
        self.outcome().expect("expected a route")
    }
}

fn solve<R: Router>(mut router: R) -> Result<Vec<RoutingPoint>, RoutingError> {
    let terminal = router.calculate_routing()?;
    Ok(router.route(&terminal))
}

#[fixture]
fn world() -> RoutingWorld {
    RoutingWorld::new()
}

#[given("the Brest to Martinique passage")]
fn given_passage(world: &RoutingWorld) {
    world.request.replace(scenario_request());
}

#[given("a passage that starts and ends in Brest")]
fn given_round_trip(world: &RoutingWorld) {
    world.request.replace(RouteRequest::new(
        brest(),
        brest(),
        SCENARIO_START_TIME,
        SCENARIO_START_TIME + 86_400.0,
    ));
}

#[given("the reference polar")]
fn given_reference_polar(world: &RoutingWorld) {
    world.polar.replace(scenario_polar());
}

#[given("a becalmed polar")]
fn given_becalmed_polar(world: &RoutingWorld) {
    world.polar.replace(becalmed_polar());
}

#[given("a steady south-south-easterly")]
fn given_steady_wind(world: &RoutingWorld) {
    world.wind.replace(WindChoice::Steady(scenario_wind()));
}

#[given("a climatology of the same wind with no forecast")]
fn given_climatology(world: &RoutingWorld) {
    // 20 m/s from 150 degrees.
    let (sin, cos) = 150.0_f64.to_radians().sin_cos();
    let source = (1..=12).fold(MemorySource::new(), |source, month| {
        source.with_field(
            FieldKey::Climatology { month },
            WindField::uniform(-20.0 * sin, -20.0 * cos).expect("uniform field"),
        )
    });
    let wind = ForecastWind::new(source, SCENARIO_START_TIME);
    world.wind.replace(WindChoice::Forecast(Arc::new(wind)));
}

#[given("the great circle router")]
fn given_great_circle(world: &RoutingWorld) {
    world.algorithm.replace(Algorithm::GreatCircle);
}

#[given("the isochrone router")]
fn given_isochrone(world: &RoutingWorld) {
    world.algorithm.replace(Algorithm::Isochrone);
}

#[given("the dynamic programming router")]
fn given_dynamic(world: &RoutingWorld) {
    world.algorithm.replace(Algorithm::Dynamic);
}

#[when("the route is calculated")]
fn when_calculated(world: &RoutingWorld) {
    let request = *world.request.borrow();
    let polar = world.polar.borrow().clone();
    let wind = world.wind.borrow().clone();
    let outcome = match *world.algorithm.borrow() {
        Algorithm::GreatCircle => solve(GcRouter::new(request, polar, wind)),
        Algorithm::Isochrone => solve(IsochroneRouter::new(request, polar, wind)),
        Algorithm::Dynamic => solve(DpRouter::new(request, polar, wind)),
    };
    world.outcome.replace(Some(outcome));
}

#[then("the route starts at Brest")]
fn then_starts_at_brest(world: &RoutingWorld) {
    let route = world.route();
    let start = route.first().expect("route has a start");
    assert_eq!(start.position, brest());
    assert!(start.previous_point.is_none());
    assert!((start.time - SCENARIO_START_TIME).abs() < f64::EPSILON);
}

#[then("arrival times increase along the route")]
fn then_times_increase(world: &RoutingWorld) {
    let route = world.route();
    assert!(route.len() > 1);
    assert!(route.windows(2).all(|pair| match pair {
        [earlier, later] => {
            later.time > earlier.time && later.distance_to_start >= earlier.distance_to_start
        }
        _ => true,
    }));
}

#[then("the route covers the passage distance")]
fn then_covers_distance(world: &RoutingWorld) {
    let request = *world.request.borrow();
    let direct = request.earth.distance(request.start, request.end);
    let terminal = *world.route().last().expect("route has an end");
    assert!(
        (terminal.distance_to_start - direct).abs() < 0.2 * direct,
        "travelled {} m for a {direct} m passage",
        terminal.distance_to_start
    );
    assert!(terminal.time <= request.max_time);
}

#[then("the search is infeasible")]
fn then_infeasible(world: &RoutingWorld) {
    assert!(matches!(
        world.outcome(),
        Err(RoutingError::Infeasible { .. })
    ));
}

#[then("the request is rejected as degenerate")]
fn then_degenerate(world: &RoutingWorld) {
    assert!(matches!(
        world.outcome(),
        Err(RoutingError::DegenerateGeometry { .. })
    ));
}

#[scenario(path = "tests/features/router.feature", index = 0)]
fn great_circle_baseline(world: RoutingWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/router.feature", index = 1)]
fn isochrone_search(world: RoutingWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/router.feature", index = 2)]
fn mesh_search(world: RoutingWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/router.feature", index = 3)]
fn climatology_fallback(world: RoutingWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/router.feature", index = 4)]
fn becalmed_passage(world: RoutingWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/router.feature", index = 5)]
fn degenerate_passage(world: RoutingWorld) {
    let _ = world;
}
