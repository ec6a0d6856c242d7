//! Dynamic programming over a mesh laid across the great circle.
//!
//! The mesh has one layer per great-circle sample. Interior layers spread
//! their nodes along the perpendicular to the great circle; edges only join
//! consecutive layers, so a single forward sweep settles every arrival time.

use log::{debug, info, trace, warn};
use tradewind_core::{
    Isochrone, MIN_SPEED, PathTree, PolarModel, RouteRequest, Router, RoutingError, RoutingPoint,
    WindModel, angle360,
};

use crate::great_circle_skeleton;

/// Configuration for [`DpRouter`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DpRouterConfig {
    /// Nodes per interior layer.
    pub nodes: usize,
    /// Great-circle segments; the mesh has `layers + 1` layers.
    pub layers: usize,
    /// Corridor width as a fraction of the start to end distance.
    pub corridor_ratio: f64,
}

impl Default for DpRouterConfig {
    fn default() -> Self {
        Self {
            nodes: 40,
            layers: 30,
            corridor_ratio: 0.4,
        }
    }
}

/// Mesh-based time-optimal routing.
///
/// # Examples
/// ```
/// use tradewind_core::test_support::{scenario_polar, scenario_request, scenario_wind};
/// use tradewind_core::Router;
/// use tradewind_router::{DpRouter, DpRouterConfig};
///
/// let config = DpRouterConfig { nodes: 9, layers: 6, ..DpRouterConfig::default() };
/// let mut router =
///     DpRouter::with_config(scenario_request(), scenario_polar(), scenario_wind(), config);
/// let terminal = router.calculate_routing()?;
/// assert_eq!(router.isochrones().len(), 7);
/// assert_eq!(router.route(&terminal).len(), 7);
/// # Ok::<(), tradewind_core::RoutingError>(())
/// ```
#[derive(Debug)]
pub struct DpRouter<P, W>
where
    P: PolarModel,
    W: WindModel,
{
    request: RouteRequest,
    polar: P,
    wind: W,
    config: DpRouterConfig,
    tree: PathTree,
    isochrones: Vec<Isochrone>,
}

impl<P, W> DpRouter<P, W>
where
    P: PolarModel,
    W: WindModel,
{
    /// Construct a router using default configuration.
    pub fn new(request: RouteRequest, polar: P, wind: W) -> Self {
        Self::with_config(request, polar, wind, DpRouterConfig::default())
    }

    /// Construct a router with explicit configuration.
    pub fn with_config(request: RouteRequest, polar: P, wind: W, config: DpRouterConfig) -> Self {
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
    pub const fn config(&self) -> &DpRouterConfig {
        &self.config
    }

    /// Replace the mesh with a fresh, unrelaxed one.
    ///
    /// Layer 0 holds the reached start node and the last layer the unreached
    /// end node.
    ///
    /// # Errors
    /// Returns [`RoutingError::DegenerateGeometry`] when interior layers would
    /// be empty and [`RoutingError::InvalidRequest`] for a bad corridor or
    /// request.
    #[expect(
        clippy::float_arithmetic,
        reason = "corridor offsets are fractions of the route length"
    )]
    pub fn build_mesh(&mut self) -> Result<(), RoutingError> {
        self.tree.clear();
        self.isochrones.clear();
        self.request.validate()?;
        let ratio = self.config.corridor_ratio;
        if !ratio.is_finite() || ratio < 0.0 {
            return Err(RoutingError::InvalidRequest {
                reason: format!("corridor ratio {ratio} must be finite and non-negative"),
            });
        }

        let earth = self.request.earth;
        let start = self.request.start;
        let initial = earth.inverse(start, self.request.end);
        let skeleton = if self.config.layers < 2 {
            Vec::new()
        } else {
            great_circle_skeleton(&self.request, self.config.layers)?
        };
        let interior = skeleton.len().saturating_sub(2);
        if interior > 0 && self.config.nodes == 0 {
            return Err(RoutingError::DegenerateGeometry {
                reason: "mesh layers need at least one node".into(),
            });
        }

        let root = self.tree.push(RoutingPoint::root(
            start,
            initial.bearing,
            self.request.start_time,
        ));
        self.isochrones.push(vec![root]);

        let half_width = ratio * initial.distance / 2.0;
        let offsets = linspace(-half_width, half_width, self.config.nodes)?;
        for waypoint in skeleton.iter().skip(1).take(interior) {
            let across = angle360(waypoint.course.unwrap_or(waypoint.bearing) + 90.0);
            let layer: Isochrone = offsets
                .iter()
                .map(|&offset| {
                    let position = earth.forward(waypoint.position, across, offset).destination;
                    let bearing = earth.inverse(start, position).bearing;
                    self.tree.push(RoutingPoint::unreached(position, bearing))
                })
                .collect();
            self.isochrones.push(layer);
        }

        let end = self
            .tree
            .push(RoutingPoint::unreached(self.request.end, initial.bearing));
        self.isochrones.push(vec![end]);
        debug!(
            "dp mesh: {} layers, {} nodes",
            self.isochrones.len(),
            self.tree.len()
        );
        Ok(())
    }

    /// Sweep the mesh once, lowering arrival times along every edge.
    ///
    /// Returns how many nodes were improved. Layers are visited in order so
    /// one sweep settles the mesh; a second sweep improves nothing.
    ///
    /// # Errors
    /// Returns the first systemic failure from the wind or polar model.
    /// Edge-local failures skip the edge.
    #[expect(
        clippy::float_arithmetic,
        reason = "arrival times are distance over speed"
    )]
    pub fn relax(&mut self) -> Result<usize, RoutingError> {
        let earth = self.request.earth;
        let max_time = self.request.max_time;
        let mut improved = 0;
        for pair in self.isochrones.windows(2) {
            let [from_layer, to_layer] = pair else {
                continue;
            };
            for &from_id in from_layer {
                let Some(origin) = self.tree.get(from_id).copied() else {
                    continue;
                };
                if !origin.is_reached() || origin.time > max_time {
                    continue;
                }
                for &to_id in to_layer {
                    let Some(target) = self.tree.get_mut(to_id) else {
                        continue;
                    };
                    let leg = earth.inverse(origin.position, target.position);
                    if leg.distance <= 0.0 {
                        continue;
                    }
                    let speed = match self.polar.speed(
                        origin.position,
                        leg.bearing,
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
                            debug!("skipping mesh edge: {error}");
                            continue;
                        }
                    };
                    if !speed.is_finite() || speed < MIN_SPEED {
                        trace!("skipping mesh edge at speed {speed}");
                        continue;
                    }
                    let arrival = origin.time + leg.distance / speed;
                    if arrival < target.time {
                        target.time = arrival;
                        target.previous_point = Some(from_id);
                        target.course = Some(leg.bearing);
                        target.speed = speed;
                        target.distance_to_start = origin.distance_to_start + leg.distance;
                        improved += 1;
                    }
                }
            }
        }
        Ok(improved)
    }
}

impl<P, W> Router for DpRouter<P, W>
where
    P: PolarModel,
    W: WindModel,
{
    #[expect(
        clippy::float_arithmetic,
        reason = "log output converts units"
    )]
    fn calculate_routing(&mut self) -> Result<RoutingPoint, RoutingError> {
        self.build_mesh()?;
        let improved = self.relax()?;
        debug!("dp relaxation improved {improved} nodes");

        let terminal = self
            .isochrones
            .last()
            .and_then(|layer| layer.first())
            .and_then(|&id| self.tree.get(id))
            .copied()
            .filter(|end| end.is_reached() && end.time <= self.request.max_time);
        let Some(terminal) = terminal else {
            warn!("dp search failed: destination not reached within the time budget");
            return Err(RoutingError::Infeasible {
                max_time: self.request.max_time,
            });
        };
        info!(
            "dp route: {:.1} km in {:.1} h over {} layers",
            terminal.distance_to_start / 1_000.0,
            (terminal.time - self.request.start_time) / 3_600.0,
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

/// `count` evenly spaced values from `low` to `high` inclusive.
///
/// A single value sits midway.
#[expect(
    clippy::float_arithmetic,
    reason = "evenly spaced offsets"
)]
fn linspace(low: f64, high: f64, count: usize) -> Result<Vec<f64>, RoutingError> {
    if count < 2 {
        return Ok(vec![(low + high) / 2.0; count]);
    }
    let last = u32::try_from(count - 1).map_err(|_| RoutingError::InvalidRequest {
        reason: format!("mesh node count {count} is too large"),
    })?;
    let step = (high - low) / f64::from(last);
    Ok((0..=last).map(|index| low + step * f64::from(index)).collect())
}
