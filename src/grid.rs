//! Spatial sampling grids.
//!
//! A [Grid] is a set of sample points in the transverse plane, stored in
//! one native [CoordinateSystem]. Fields are sampled on grids and keep a shared
//! reference ([std::sync::Arc]) to the grid they belong to.
use crate::error::{OpticsError, Result};
use crate::geometry::Vec2D;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Coordinate representation of a [Grid].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSystem {
    /// `(x, y)` coordinates.
    Cartesian,
    /// `(r, theta)` coordinates, `theta` in radians.
    Polar,
}

/// Sample points of a grid, in the grid's native [CoordinateSystem].
///
/// `u` and `v` always hold one value per point. If the grid was built as the
/// outer product of two axes, those axes are kept in `axes` (first axis varies
/// fastest).
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    system: CoordinateSystem,
    u: Vec<f64>,
    v: Vec<f64>,
    axes: Option<(Vec<f64>, Vec<f64>)>,
}

impl Grid {
    fn unstructured(system: CoordinateSystem, u: Vec<f64>, v: Vec<f64>) -> Result<Self> {
        if u.len() != v.len() {
            return Err(OpticsError::InvalidArgument(format!(
                "coordinate arrays have different lengths ({} and {})",
                u.len(),
                v.len()
            )));
        }
        Ok(Self { system, u, v, axes: None })
    }

    fn separated(system: CoordinateSystem, u_axis: Vec<f64>, v_axis: Vec<f64>) -> Self {
        let size = u_axis.len() * v_axis.len();
        let mut u = Vec::with_capacity(size);
        let mut v = Vec::with_capacity(size);
        for b in &v_axis {
            for a in &u_axis {
                u.push(*a);
                v.push(*b);
            }
        }
        Self { system, u, v, axes: Some((u_axis, v_axis)) }
    }

    /// Unstructured Cartesian grid from paired `x` and `y` coordinates.
    pub fn cartesian(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        Self::unstructured(CoordinateSystem::Cartesian, x, y)
    }

    /// Unstructured polar grid from paired `r` and `theta` coordinates.
    pub fn polar(r: Vec<f64>, theta: Vec<f64>) -> Result<Self> {
        Self::unstructured(CoordinateSystem::Polar, r, theta)
    }

    /// Cartesian grid spanned by an x-axis and a y-axis. Points are ordered
    /// row by row, x varying fastest.
    pub fn separated_cartesian(x_axis: Vec<f64>, y_axis: Vec<f64>) -> Self {
        Self::separated(CoordinateSystem::Cartesian, x_axis, y_axis)
    }

    /// Polar grid spanned by a radial axis and an angular axis, radius
    /// varying fastest.
    pub fn separated_polar(r_axis: Vec<f64>, theta_axis: Vec<f64>) -> Self {
        Self::separated(CoordinateSystem::Polar, r_axis, theta_axis)
    }

    /// Number of sample points.
    pub fn size(&self) -> usize {
        self.u.len()
    }

    pub fn coordinate_system(&self) -> CoordinateSystem {
        self.system
    }

    /// Whether the grid is natively stored in `system`.
    pub fn is(&self, system: CoordinateSystem) -> bool {
        self.system == system
    }

    /// Native coordinate arrays: `(x, y)` or `(r, theta)`.
    pub fn coords(&self) -> (&[f64], &[f64]) {
        (&self.u, &self.v)
    }

    /// Radial distance of every point from the origin.
    pub fn r(&self) -> Cow<'_, [f64]> {
        match self.system {
            CoordinateSystem::Polar => Cow::Borrowed(&self.u),
            CoordinateSystem::Cartesian => Cow::Owned(
                self.u.iter().zip(&self.v).map(|(x, y)| x.hypot(*y)).collect()
            ),
        }
    }

    /// Cartesian position of every point.
    pub fn points(&self) -> Vec<Vec2D> {
        let g = self.as_system(CoordinateSystem::Cartesian);
        let (x, y) = g.coords();
        x.iter().zip(y).map(|(x, y)| Vec2D::new(*x, *y)).collect()
    }

    /// View of this grid in another coordinate system.
    ///
    /// Borrows `self` when no conversion is needed. A converted grid keeps the
    /// point order but is always unstructured.
    pub fn as_system(&self, system: CoordinateSystem) -> Cow<'_, Grid> {
        if self.system == system {
            return Cow::Borrowed(self);
        }
        let (u, v): (Vec<f64>, Vec<f64>) = match system {
            CoordinateSystem::Cartesian => self.u.iter().zip(&self.v)
                .map(|(r, theta)| {
                    let p = Vec2D::from_polar(*r, *theta);
                    (p.x, p.y)
                })
                .unzip(),
            CoordinateSystem::Polar => self.u.iter().zip(&self.v)
                .map(|(x, y)| {
                    let p = Vec2D::new(*x, *y);
                    (p.norm(), p.angle())
                })
                .unzip(),
        };
        Cow::Owned(Grid { system, u, v, axes: None })
    }

    pub fn as_cartesian(&self) -> Cow<'_, Grid> {
        self.as_system(CoordinateSystem::Cartesian)
    }

    /// Whether the grid is the outer product of two axes.
    pub fn is_separated(&self) -> bool {
        self.axes.is_some()
    }

    /// The two separated axes, first axis varying fastest.
    pub fn axes(&self) -> Result<(&[f64], &[f64])> {
        match &self.axes {
            Some((a, b)) => Ok((a, b)),
            None => Err(OpticsError::MissingCapability("separated coordinates".into())),
        }
    }

    /// Shape as `[rows, columns]`, i.e. `[len(second axis), len(first axis)]`.
    pub fn shape(&self) -> Result<[usize; 2]> {
        let (a, b) = self.axes()?;
        Ok([b.len(), a.len()])
    }

    /// Whether both separated axes are uniformly spaced.
    pub fn is_regular(&self) -> bool {
        match &self.axes {
            Some((a, b)) => uniform_step(a).is_some() && uniform_step(b).is_some(),
            None => false,
        }
    }

    /// Spacing along each axis of a regular grid.
    pub fn delta(&self) -> Result<[f64; 2]> {
        let (a, b) = self.axes()?;
        match (uniform_step(a), uniform_step(b)) {
            (Some(da), Some(db)) => Ok([da, db]),
            _ => Err(OpticsError::MissingCapability("regularly spaced coordinates".into())),
        }
    }

    /// First coordinate along each axis of a regular grid.
    pub fn zero(&self) -> Result<[f64; 2]> {
        self.delta()?;
        let (a, b) = self.axes()?;
        Ok([a[0], b[0]])
    }
}

/// Step of a uniformly spaced axis; single-point axes have step 1.
fn uniform_step(axis: &[f64]) -> Option<f64> {
    match axis {
        [] => None,
        [_] => Some(1.0),
        [first, second, ..] => {
            let step = second - first;
            let tolerance = 1e-9 * step.abs().max(f64::MIN_POSITIVE);
            axis.windows(2)
                .all(|w| ((w[1] - w[0]) - step).abs() <= tolerance)
                .then_some(step)
        }
    }
}
