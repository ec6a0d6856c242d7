#![expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]

//! Behavioural tests for `ForecastWind` using rstest-bdd.

use std::cell::RefCell;
use std::sync::Arc;

use geo::Point;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tradewind_core::{WindError, WindModel, WindSample};
use tradewind_wind::{FieldKey, ForecastWind, MemorySource, WindField};

/// 2023-11-15T00:00:00Z.
const RUN: f64 = 1_700_006_400.0;

#[derive(Debug)]
struct ForecastWorld {
    source: RefCell<Arc<MemorySource>>,
    outcome: RefCell<Option<Result<WindSample, WindError>>>,
}

impl ForecastWorld {
    fn new() -> Self {
        Self {
            source: RefCell::new(Arc::new(MemorySource::new())),
            outcome: RefCell::new(None),
        }
    }

    fn query(&self, offsets: &[f64]) {
        let wind = ForecastWind::new(Arc::clone(&self.source.borrow()), RUN);
        for offset in offsets {
            // Heading north: the relative direction equals the wind bearing.
            let outcome = wind.wind(Point::new(-30.0, 30.0), 0.0, RUN + offset);
            self.outcome.replace(Some(outcome));
        }
    }

    fn sample(&self) -> WindSample {
        self.outcome
            .borrow()
            .clone()
            .expect("a query should have run")
            .expect("wind should be available")
    }
}

#[fixture]
fn world() -> ForecastWorld {
    ForecastWorld::new()
}

#[given("a source with an analysis field and a November climatology")]
fn given_populated_source(world: &ForecastWorld) {
    let source = MemorySource::new()
        .with_field(
            FieldKey::Forecast { hour: 0 },
            WindField::uniform(0.0, -12.0).expect("northerly field"),
        )
        .with_field(
            FieldKey::Climatology { month: 11 },
            WindField::uniform(0.0, 6.0).expect("southerly field"),
        );
    world.source.replace(Arc::new(source));
}

#[given("an empty source")]
fn given_empty_source(world: &ForecastWorld) {
    world.source.replace(Arc::new(MemorySource::new()));
}

#[when("wind is requested two minutes after the run")]
fn when_requested_at_analysis(world: &ForecastWorld) {
    world.query(&[120.0]);
}

#[when("wind is requested ten days after the run")]
fn when_requested_beyond_horizon(world: &ForecastWorld) {
    world.query(&[10.0 * 86_400.0]);
}

#[when("wind is requested twenty times within the first half hour")]
fn when_requested_repeatedly(world: &ForecastWorld) {
    let offsets: Vec<f64> = (0..20_u32).map(|step| f64::from(step) * 60.0).collect();
    world.query(&offsets);
}

#[then("the northerly analysis wind is returned")]
fn then_analysis_wind(world: &ForecastWorld) {
    let sample = world.sample();
    assert!(sample.direction.abs() < 1e-9 || (sample.direction - 360.0).abs() < 1e-9);
    assert!((sample.speed - 12.0).abs() < 1e-9);
}

#[then("the southerly climatology wind is returned")]
fn then_climatology_wind(world: &ForecastWorld) {
    let sample = world.sample();
    assert!((sample.direction - 180.0).abs() < 1e-9);
    assert!((sample.speed - 6.0).abs() < 1e-9);
}

#[then("the query fails with no wind data")]
fn then_no_wind_data(world: &ForecastWorld) {
    let outcome = world.outcome.borrow().clone().expect("a query should have run");
    assert!(matches!(outcome, Err(WindError::NoWindData { .. })));
}

#[then("the source was read once")]
fn then_single_read(world: &ForecastWorld) {
    assert_eq!(world.source.borrow().loads(), 1);
}

#[scenario(path = "tests/features/forecast_wind.feature", index = 0)]
fn forecast_inside_horizon(world: ForecastWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/forecast_wind.feature", index = 1)]
fn climatology_beyond_horizon(world: ForecastWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/forecast_wind.feature", index = 2)]
fn no_wind_data(world: ForecastWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/forecast_wind.feature", index = 3)]
fn shared_decoded_field(world: ForecastWorld) {
    let _ = world;
}
