//! Convenience functions and utilities for rhci.
use crate::geometry::Vec2D;
use crate::grid::Grid;

/// Square, regularly sampled Cartesian grid covering a pupil of `diameter`.
///
/// The `samples x samples` points sit at the centres of equal cells spanning
/// `[-diameter/2, diameter/2]` in both axes, so the origin is only sampled
/// for odd `samples`:
/// ```
/// let grid = rhci::make_pupil_grid(4, 2.0);
/// assert_eq!(grid.shape().unwrap(), [4, 4]);
/// assert_eq!(grid.delta().unwrap(), [0.5, 0.5]);
/// assert_eq!(grid.zero().unwrap(), [-0.75, -0.75]);
/// ```
#[must_use] pub fn make_pupil_grid(samples: u32, diameter: f64) -> Grid {
    let axis: Vec<f64> = Vec2D::linspace(
        &Vec2D::new(-diameter / 2.0, 0.0),
        &Vec2D::new( diameter / 2.0, 0.0),
        samples,
    ).into_iter().map(|p| p.x).collect();
    Grid::separated_cartesian(axis.clone(), axis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq};

    #[test]
    fn pupil_grid_is_symmetric() {
        let grid = make_pupil_grid(5, 1.0);
        let (x_axis, _) = grid.axes().unwrap();
        assert_eq!(grid.size(), 25);
        assert_abs_diff_eq!(x_axis[0], -0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(x_axis[2], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x_axis[4], 0.4, epsilon = 1e-12);
        assert!(grid.is_regular());
    }
}
