//! Regular longitude/latitude grids of wind components.

use geo::Point;
use tradewind_core::{WindError, angle360};

/// Wind vector components on a regular grid, queried by bilinear
/// interpolation.
///
/// `u` points east and `v` north, both in m/s, stored row-major with one row
/// per latitude. Queries outside the grid take the nearest edge value.
///
/// # Examples
/// ```
/// use geo::Point;
/// use tradewind_wind::WindField;
///
/// // A 10 m/s westerly everywhere.
/// let field = WindField::uniform(10.0, 0.0)?;
/// let (from, speed) = field.sample(Point::new(-30.0, 40.0));
/// assert!((from - 270.0).abs() < 1e-9);
/// assert!((speed - 10.0).abs() < 1e-9);
/// # Ok::<(), tradewind_core::WindError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindField {
    lons: Vec<f64>,
    lats: Vec<f64>,
    u: Vec<f64>,
    v: Vec<f64>,
}

impl WindField {
    /// Build a field from strictly increasing axes and row-major components.
    ///
    /// # Errors
    /// Returns [`WindError::InvalidField`] when an axis is empty or not
    /// strictly increasing, or a component does not hold
    /// `lats.len() * lons.len()` finite values.
    pub fn new(lons: Vec<f64>, lats: Vec<f64>, u: Vec<f64>, v: Vec<f64>) -> Result<Self, WindError> {
        check_axis("longitude", &lons)?;
        check_axis("latitude", &lats)?;
        let cells = lons.len().checked_mul(lats.len()).ok_or_else(|| invalid("grid too large"))?;
        for (name, values) in [("u", &u), ("v", &v)] {
            if values.len() != cells {
                return Err(invalid(format!(
                    "{name} holds {} values, grid needs {cells}",
                    values.len()
                )));
            }
            if values.iter().any(|value| !value.is_finite()) {
                return Err(invalid(format!("{name} contains non-finite values")));
            }
        }
        Ok(Self { lons, lats, u, v })
    }

    /// A single-cell field with the same wind everywhere.
    ///
    /// # Errors
    /// Returns [`WindError::InvalidField`] for non-finite components.
    pub fn uniform(u: f64, v: f64) -> Result<Self, WindError> {
        Self::new(vec![-180.0], vec![0.0], vec![u], vec![v])
    }

    /// Interpolated `(from_bearing, speed)` at `position`.
    ///
    /// The bearing is meteorological: the direction the wind blows from,
    /// degrees clockwise from north.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "wind direction is derived from interpolated vector components"
    )]
    pub fn sample(&self, position: Point<f64>) -> (f64, f64) {
        let (u, v) = self.components(position);
        let from = angle360((-u).atan2(-v).to_degrees());
        (from, u.hypot(v))
    }

    /// Interpolated `(u, v)` components at `position`.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "bilinear interpolation is floating-point by nature"
    )]
    pub fn components(&self, position: Point<f64>) -> (f64, f64) {
        let lon = self.normalise_lon(position.x());
        let (x0, x1, tx) = bracket(&self.lons, lon);
        let (y0, y1, ty) = bracket(&self.lats, position.y());
        let blend = |values: &[f64]| {
            let at = |row: usize, col: usize| {
                row.checked_mul(self.lons.len())
                    .and_then(|offset| offset.checked_add(col))
                    .and_then(|index| values.get(index))
                    .copied()
                    .unwrap_or(0.0)
            };
            let south = at(y0, x0) * (1.0 - tx) + at(y0, x1) * tx;
            let north = at(y1, x0) * (1.0 - tx) + at(y1, x1) * tx;
            south * (1.0 - ty) + north * ty
        };
        (blend(&self.u), blend(&self.v))
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "longitudes are shifted by a full turn"
    )]
    fn normalise_lon(&self, lon: f64) -> f64 {
        match self.lons.first() {
            Some(first) if *first >= 0.0 && lon < 0.0 => lon + 360.0,
            Some(first) if *first < 0.0 && lon > 180.0 => lon - 360.0,
            _ => lon,
        }
    }
}

/// Lower index, upper index and interpolation weight for `value` on `axis`.
#[expect(
    clippy::float_arithmetic,
    reason = "interpolation weight is a ratio of coordinate differences"
)]
fn bracket(axis: &[f64], value: f64) -> (usize, usize, f64) {
    let (Some(&first), Some(&last)) = (axis.first(), axis.last()) else {
        return (0, 0, 0.0);
    };
    if axis.len() < 2 || value <= first {
        return (0, 0, 0.0);
    }
    let top = axis.len() - 1;
    if value >= last {
        return (top, top, 0.0);
    }
    let upper = axis.partition_point(|coordinate| *coordinate <= value).min(top);
    let lower = upper.saturating_sub(1);
    match (axis.get(lower), axis.get(upper)) {
        (Some(&a), Some(&b)) if b > a => (lower, upper, (value - a) / (b - a)),
        _ => (lower, lower, 0.0),
    }
}

fn check_axis(name: &str, axis: &[f64]) -> Result<(), WindError> {
    if axis.is_empty() {
        return Err(invalid(format!("{name} axis is empty")));
    }
    if axis.iter().any(|value| !value.is_finite()) {
        return Err(invalid(format!("{name} axis contains non-finite values")));
    }
    if axis.windows(2).any(|pair| matches!(pair, [a, b] if a >= b)) {
        return Err(invalid(format!("{name} axis must be strictly increasing")));
    }
    Ok(())
}

fn invalid(reason: impl Into<String>) -> WindError {
    WindError::InvalidField {
        reason: reason.into(),
    }
}
