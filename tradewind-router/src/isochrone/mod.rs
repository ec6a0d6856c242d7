//! Wavefront expansion at fixed time steps.
//!
//! Every point of the current isochrone fans out over a range of headings
//! for one time step. Candidates are bucketed by whole-degree bearing from
//! the start and only the farthest one per bucket survives, which keeps the
//! front one point wide per degree. Expansion stops once a new front gets no
//! closer to the destination than the best point seen so far.

use std::collections::BTreeMap;

use log::{debug, info, trace, warn};
use tradewind_core::geodesy::angular_distance;
use tradewind_core::{
    Isochrone, MIN_SPEED, PathTree, PointId, PolarModel, RouteRequest, Router, RoutingError,
    RoutingPoint, WindModel, angle360,
};

/// Configuration for [`IsochroneRouter`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IsochroneConfig {
    /// Seconds between isochrones.
    pub time_step: f64,
    /// Headings tried per point, in whole degrees either side of its course.
    pub angle_range: i32,
    /// Half-width in degrees of the bearing window kept around the initial
    /// bearing to the destination.
    pub bearing_range: f64,
    /// Upper bound on the number of isochrones built.
    pub max_layers: usize,
}

impl Default for IsochroneConfig {
    fn default() -> Self {
        Self {
            time_step: 86_400.0,
            angle_range: 20,
            bearing_range: 20.0,
            max_layers: 10_000,
        }
    }
}

impl IsochroneConfig {
    fn validate(&self) -> Result<(), RoutingError> {
        let reason = if !(self.time_step.is_finite() && self.time_step > 0.0) {
            format!("time step {} must be positive", self.time_step)
        } else if self.angle_range < 0 {
            format!("angle range {} must not be negative", self.angle_range)
        } else if !(self.bearing_range.is_finite() && self.bearing_range > 0.0) {
            format!("bearing range {} must be positive", self.bearing_range)
        } else if self.max_layers == 0 {
            "at least one isochrone is required".to_owned()
        } else {
            return Ok(());
        };
        Err(RoutingError::InvalidRequest { reason })
    }
}

/// Keep the farthest candidate per whole-degree bearing bucket.
///
/// Buckets are `round(bearing)` modulo 360. Only buckets whose angular
/// distance to the rounded `start_bearing` is strictly below
/// `bearing_range` are kept; the window wraps through north. Within a bucket
/// the candidate with the greatest `distance_to_start` wins and the first
/// one seen wins ties. Survivors are returned in bucket order.
///
/// # Examples
/// ```
/// use geo::Point;
/// use tradewind_core::RoutingPoint;
/// use tradewind_router::prune_by_sector;
///
/// let at = |bearing: f64, distance: f64| {
///     let mut point = RoutingPoint::root(Point::new(0.0, 0.0), bearing, 0.0);
///     point.distance_to_start = distance;
///     point
/// };
/// let kept = prune_by_sector(vec![at(90.2, 5.0), at(89.9, 7.0), at(150.0, 9.0)], 90.0, 20.0);
/// assert_eq!(kept.len(), 1);
/// assert_eq!(kept[0].distance_to_start, 7.0);
/// ```
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "bucket keys are whole degrees in [0, 360)"
)]
pub fn prune_by_sector(
    candidates: Vec<RoutingPoint>,
    start_bearing: f64,
    bearing_range: f64,
) -> Vec<RoutingPoint> {
    let centre = angle360(start_bearing.round());
    let mut best: BTreeMap<u16, RoutingPoint> = BTreeMap::new();
    for candidate in candidates {
        let bucket = angle360(candidate.bearing.round());
        if angular_distance(bucket, centre) >= bearing_range {
            continue;
        }
        best.entry(bucket as u16)
            .and_modify(|kept| {
                if candidate.distance_to_start > kept.distance_to_start {
                    *kept = candidate;
                }
            })
            .or_insert(candidate);
    }
    best.into_values().collect()
}

/// Time-optimal routing by isochrone expansion.
///
/// Returns the point of the last improving isochrone closest to the
/// destination; the route rarely ends exactly on it.
#[derive(Debug)]
pub struct IsochroneRouter<P, W>
where
    P: PolarModel,
    W: WindModel,
{
    request: RouteRequest,
    polar: P,
    wind: W,
    config: IsochroneConfig,
    tree: PathTree,
    isochrones: Vec<Isochrone>,
}

impl<P, W> IsochroneRouter<P, W>
where
    P: PolarModel,
    W: WindModel,
{
    /// Construct a router using default configuration.
    pub fn new(request: RouteRequest, polar: P, wind: W) -> Self {
        Self::with_config(request, polar, wind, IsochroneConfig::default())
    }

    /// Construct a router with explicit configuration.
    pub fn with_config(request: RouteRequest, polar: P, wind: W, config: IsochroneConfig) -> Self {
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
    pub const fn config(&self) -> &IsochroneConfig {
        &self.config
    }

    /// Every candidate reachable from `layer` in one time step.
    ///
    /// Failures for a single heading drop that heading; systemic failures
    /// abort.
    #[expect(
        clippy::float_arithmetic,
        reason = "step length is speed times duration"
    )]
    fn expand(&self, layer: &[PointId]) -> Result<Vec<RoutingPoint>, RoutingError> {
        let earth = self.request.earth;
        let time_step = self.config.time_step;
        let range = self.config.angle_range;
        let mut candidates = Vec::new();
        for &origin_id in layer {
            let Some(origin) = self.tree.get(origin_id).copied() else {
                continue;
            };
            let course = origin.course.unwrap_or(origin.bearing);
            for offset in -range..=range {
                let heading = angle360(course + f64::from(offset));
                let speed = match self.polar.speed(
                    origin.position,
                    heading,
                    0.0,
                    origin.time,
                    &self.wind,
                ) {
                    Ok(speed) => speed,
                    Err(failure) => {
                        let error = RoutingError::from(failure);
                        if error.is_systemic() {
                            return Err(error);
                        }
                        debug!("dropping heading {heading:.0}: {error}");
                        continue;
                    }
                };
                if !speed.is_finite() || speed < MIN_SPEED {
                    trace!("dropping heading {heading:.0}: speed {speed}");
                    continue;
                }
                let forward = earth.forward(origin.position, heading, speed * time_step);
                let from_start = earth.inverse(self.request.start, forward.destination);
                candidates.push(RoutingPoint {
                    position: forward.destination,
                    course: Some(angle360(forward.reverse_bearing + 180.0)),
                    previous_point: Some(origin_id),
                    distance_to_start: from_start.distance,
                    bearing: from_start.bearing,
                    speed,
                    time: origin.time + time_step,
                });
            }
        }
        Ok(candidates)
    }

    /// Closest point of `layer` to the destination, first one on ties.
    fn nearest_to_end(&self, layer: &[PointId]) -> Option<(f64, PointId)> {
        let earth = self.request.earth;
        layer
            .iter()
            .filter_map(|&id| {
                self.tree
                    .get(id)
                    .map(|point| (earth.distance(point.position, self.request.end), id))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
    }

    fn infeasible(&self, why: &str) -> RoutingError {
        warn!("isochrone search failed: {why}");
        RoutingError::Infeasible {
            max_time: self.request.max_time,
        }
    }
}

impl<P, W> Router for IsochroneRouter<P, W>
where
    P: PolarModel,
    W: WindModel,
{
    #[expect(
        clippy::float_arithmetic,
        reason = "isochrone times advance by a fixed step"
    )]
    fn calculate_routing(&mut self) -> Result<RoutingPoint, RoutingError> {
        self.tree.clear();
        self.isochrones.clear();
        self.request.validate()?;
        self.config.validate()?;

        let earth = self.request.earth;
        let initial = earth.inverse(self.request.start, self.request.end);
        let root = self.tree.push(RoutingPoint::root(
            self.request.start,
            initial.bearing,
            self.request.start_time,
        ));
        self.isochrones.push(vec![root]);

        let mut best = (initial.distance, root);
        let mut frontier: Isochrone = vec![root];
        let mut layer_time = self.request.start_time;
        loop {
            if self.isochrones.len() > self.config.max_layers {
                return Err(self.infeasible("isochrone limit reached"));
            }
            layer_time += self.config.time_step;
            if layer_time > self.request.max_time {
                return Err(self.infeasible("time budget exhausted"));
            }

            let candidates = self.expand(&frontier)?;
            let survivors =
                prune_by_sector(candidates, initial.bearing, self.config.bearing_range);
            if survivors.is_empty() {
                return Err(self.infeasible("no heading makes way"));
            }
            frontier = survivors
                .into_iter()
                .map(|point| self.tree.push(point))
                .collect();
            self.isochrones.push(frontier.clone());

            let nearest = self.nearest_to_end(&frontier);
            debug!(
                "isochrone {}: {} points, nearest {:.1} km from the destination",
                self.isochrones.len() - 1,
                frontier.len(),
                nearest.map_or(f64::NAN, |(distance, _)| distance / 1_000.0)
            );
            match nearest {
                Some((distance, id)) if distance < best.0 => best = (distance, id),
                _ => break,
            }
        }

        let (remaining, terminal_id) = best;
        let terminal = self
            .tree
            .get(terminal_id)
            .copied()
            .ok_or_else(|| self.infeasible("best point missing from the tree"))?;
        info!(
            "isochrone route: {:.1} km in {:.1} h, ending {:.1} km short over {} isochrones",
            terminal.distance_to_start / 1_000.0,
            (terminal.time - self.request.start_time) / 3_600.0,
            remaining / 1_000.0,
            self.isochrones.len()
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
