//! Hard-edged aperture masks.
//!
//! Every shape is a small immutable value implementing [Aperture]. The
//! constructor functions validate the shape parameters up front, so an
//! invalid shape is rejected before any grid is sampled:
//! ```
//! use rhci::{Aperture, Grid, OpticsError, regular_polygon_aperture};
//! use std::sync::Arc;
//!
//! assert!(matches!(
//!     regular_polygon_aperture(2, 1.0),
//!     Err(OpticsError::InvalidArgument(_))
//! ));
//!
//! let hexagon = regular_polygon_aperture(6, 2.0).unwrap();
//! let grid = Arc::new(Grid::cartesian(vec![0.0, 0.0], vec![0.0, 1.01]).unwrap());
//! assert_eq!(hexagon.sample(&grid).values(), &[1.0, 0.0]);
//! ```
use crate::core::Aperture;
use crate::error::{OpticsError, Result};
use crate::field::Field;
use crate::geometry::Vec2D;
use crate::grid::{CoordinateSystem, Grid};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::sync::Arc;

fn check_length(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(OpticsError::InvalidArgument(format!(
            "{name} must be finite and positive, got {value}"
        )))
    }
}

fn indicator(inside: bool) -> f64 {
    if inside { 1.0 } else { 0.0 }
}

/// Circular aperture centred on the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct CircularAperture {
    diameter: f64,
}

impl CircularAperture {
    pub fn diameter(&self) -> f64 {
        self.diameter
    }
}

/// Circular aperture of the given `diameter`.
///
/// A point transmits iff its distance from the origin is at most
/// `diameter / 2`, boundary included.
pub fn circular_aperture(diameter: f64) -> Result<CircularAperture> {
    Ok(CircularAperture { diameter: check_length("diameter", diameter)? })
}

impl Aperture for CircularAperture {
    fn sample(&self, grid: &Arc<Grid>) -> Field<f64> {
        let radius = self.diameter / 2.0;
        let (u, v) = grid.coords();
        let values: Vec<f64> = match grid.coordinate_system() {
            // compare squared distances, no square root needed
            CoordinateSystem::Cartesian => {
                let radius2 = radius * radius;
                u.par_iter()
                .zip(v.par_iter())
                .map(|(x, y)| indicator(x*x + y*y <= radius2))
                .collect()
            }
            CoordinateSystem::Polar => {
                u.par_iter()
                .map(|r| indicator(*r <= radius))
                .collect()
            }
        };
        Field::from_parts(values, Arc::clone(grid))
    }
}

/// Rectangular aperture with edges parallel to the axes.
#[derive(Debug, Clone, PartialEq)]
pub struct RectangularAperture {
    width: f64,
    height: f64,
    center: Vec2D,
}

impl RectangularAperture {
    /// Full edge lengths `[width, height]`.
    pub fn size(&self) -> [f64; 2] {
        [self.width, self.height]
    }
    pub fn center(&self) -> Vec2D {
        self.center
    }

    fn mask(&self, x: &[f64], y: &[f64]) -> Vec<f64> {
        let half_width = self.width / 2.0;
        let half_height = self.height / 2.0;
        x.par_iter()
        .zip(y.par_iter())
        .map(|(x, y)| indicator(
            (x - self.center.x).abs() <= half_width
            && (y - self.center.y).abs() <= half_height
        ))
        .collect()
    }
}

/// Rectangular aperture of full edge lengths `width` x `height`, centred on
/// `center` (the origin when `None`).
pub fn rectangular_aperture(width: f64, height: f64, center: Option<Vec2D>) -> Result<RectangularAperture> {
    let center = center.unwrap_or_else(Vec2D::origin);
    if !(center.x.is_finite() && center.y.is_finite()) {
        return Err(OpticsError::InvalidArgument(format!(
            "center must be finite, got ({}, {})", center.x, center.y
        )));
    }
    Ok(RectangularAperture {
        width: check_length("width", width)?,
        height: check_length("height", height)?,
        center,
    })
}

/// Square aperture of edge length `size`, centred on the origin.
pub fn square_aperture(size: f64) -> Result<RectangularAperture> {
    rectangular_aperture(size, size, None)
}

impl Aperture for RectangularAperture {
    fn sample(&self, grid: &Arc<Grid>) -> Field<f64> {
        let cartesian = grid.as_cartesian();
        let (x, y) = cartesian.coords();
        Field::from_parts(self.mask(x, y), Arc::clone(grid))
    }
}

/// Regular polygon centred on the origin.
///
/// Even-sided polygons have an edge normal along the x-axis; odd-sided
/// polygons have a vertex on the positive y-axis and a flat bottom edge.
#[derive(Debug, Clone, PartialEq)]
pub struct RegularPolygonAperture {
    num_sides: usize,
    circum_diameter: f64,
    apothem: f64,
    thetas: Vec<f64>,
    bounding_box: RectangularAperture,
}

impl RegularPolygonAperture {
    pub fn num_sides(&self) -> usize {
        self.num_sides
    }
    pub fn circum_diameter(&self) -> f64 {
        self.circum_diameter
    }
    /// Distance from the centre to the midpoint of an edge.
    pub fn apothem(&self) -> f64 {
        self.apothem
    }

    /// Whether a point already inside the bounding box is inside the polygon.
    ///
    /// Opposite edges are tested together, so only about half of the edges
    /// need an angle of their own.
    fn contains(&self, x: f64, y: f64) -> bool {
        if self.num_sides % 2 == 0 {
            self.thetas.iter()
            .all(|theta| Vec2D::from_angle(*theta).dot(&Vec2D::new(x, y)).abs() < self.apothem)
        } else {
            self.thetas.iter()
            .all(|theta| (theta.sin() * x).abs() - theta.cos() * y < self.apothem)
        }
    }
}

/// Regular polygon with `num_sides` sides inscribed in a circle of diameter
/// `circum_diameter`.
///
/// Fails with [OpticsError::InvalidArgument] if `num_sides < 3`.
pub fn regular_polygon_aperture(num_sides: usize, circum_diameter: f64) -> Result<RegularPolygonAperture> {
    if num_sides < 3 {
        return Err(OpticsError::InvalidArgument(format!(
            "a regular polygon needs at least 3 sides, got {num_sides}"
        )));
    }
    let circum_diameter = check_length("circum_diameter", circum_diameter)?;
    let apothem = (PI / num_sides as f64).cos() * circum_diameter / 2.0;

    let half = num_sides / 2;
    let thetas: Vec<f64> = if num_sides % 2 == 0 {
        (0..half)
        .map(|k| k as f64 * PI / half as f64)
        .collect()
    } else {
        (0..=half)
        .map(|k| k as f64 * (num_sides - 2) as f64 * PI / (num_sides as f64 / 2.0))
        .collect()
    };
    tracing::debug!(num_sides, circum_diameter, apothem, ?thetas, "regular polygon aperture");

    let bounding_box = square_aperture(4.0 * circum_diameter)?;
    Ok(RegularPolygonAperture {
        num_sides,
        circum_diameter,
        apothem,
        thetas,
        bounding_box,
    })
}

/// Regular hexagon inscribed in a circle of diameter `circum_diameter`.
pub fn hexagonal_aperture(circum_diameter: f64) -> Result<RegularPolygonAperture> {
    regular_polygon_aperture(6, circum_diameter)
}

impl Aperture for RegularPolygonAperture {
    fn sample(&self, grid: &Arc<Grid>) -> Field<f64> {
        let cartesian = grid.as_cartesian();
        let (x, y) = cartesian.coords();
        let inside_box = self.bounding_box.mask(x, y);
        let values: Vec<f64> = inside_box.par_iter()
            .zip(x.par_iter().zip(y.par_iter()))
            .map(|(m, (x, y))| {
                if *m == 0.0 {
                    0.0
                } else {
                    indicator(self.contains(*x, *y))
                }
            })
            .collect();
        Field::from_parts(values, Arc::clone(grid))
    }
}

/// Declarative description of an aperture, e.g. read from a configuration
/// file.
/// ```
/// let spec: rhci::ApertureSpec = serde_json::from_str(
///     r#"{"regular_polygon": {"num_sides": 8, "circum_diameter": 1.0}}"#
/// ).unwrap();
/// assert!(spec.build().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApertureSpec {
    Circular {
        diameter: f64,
    },
    Rectangular {
        width: f64,
        height: f64,
        #[serde(default)]
        center: Option<Vec2D>,
    },
    RegularPolygon {
        num_sides: usize,
        circum_diameter: f64,
    },
    Hexagonal {
        circum_diameter: f64,
    },
}

impl ApertureSpec {
    /// Validate the description and construct the aperture.
    pub fn build(&self) -> Result<Box<dyn Aperture>> {
        Ok(match *self {
            Self::Circular { diameter } => Box::new(circular_aperture(diameter)?),
            Self::Rectangular { width, height, center } => {
                Box::new(rectangular_aperture(width, height, center)?)
            }
            Self::RegularPolygon { num_sides, circum_diameter } => {
                Box::new(regular_polygon_aperture(num_sides, circum_diameter)?)
            }
            Self::Hexagonal { circum_diameter } => Box::new(hexagonal_aperture(circum_diameter)?),
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq};
    use proptest::prelude::*;

    /// 5x5 grid over [-1, 1]^2, spacing 0.5.
    fn grid_5x5() -> Arc<Grid> {
        let axis = vec![-1.0, -0.5, 0.0, 0.5, 1.0];
        Arc::new(Grid::separated_cartesian(axis.clone(), axis))
    }

    fn single_point(x: f64, y: f64) -> Arc<Grid> {
        Arc::new(Grid::cartesian(vec![x], vec![y]).unwrap())
    }

    /// Tests every edge of the polygon independently.
    fn polygon_reference(num_sides: usize, circum_diameter: f64, x: f64, y: f64) -> f64 {
        let apothem = (PI / num_sides as f64).cos() * circum_diameter / 2.0;
        let offset = if num_sides % 2 == 0 { 0.0 } else { -PI / 2.0 };
        let inside = (0..num_sides)
            .map(|k| offset + 2.0 * PI * k as f64 / num_sides as f64)
            .all(|phi| Vec2D::from_angle(phi).dot(&Vec2D::new(x, y)) < apothem);
        indicator(inside)
    }

    /// Smallest distance from (x, y) to the line through any polygon edge.
    fn edge_distance(num_sides: usize, circum_diameter: f64, x: f64, y: f64) -> f64 {
        let apothem = (PI / num_sides as f64).cos() * circum_diameter / 2.0;
        let offset = if num_sides % 2 == 0 { 0.0 } else { -PI / 2.0 };
        (0..num_sides)
            .map(|k| offset + 2.0 * PI * k as f64 / num_sides as f64)
            .map(|phi| (Vec2D::from_angle(phi).dot(&Vec2D::new(x, y)) - apothem).abs())
            .fold(f64::INFINITY, f64::min)
    }

    #[test]
    fn circle_on_5x5_grid() {
        let grid = grid_5x5();
        let field = circular_aperture(2.0).unwrap().sample(&grid);
        assert_eq!(field.len(), grid.size());
        for (value, p) in field.iter().zip(grid.points()) {
            let expected = if p.x*p.x + p.y*p.y <= 1.0 { 1.0 } else { 0.0 };
            assert_eq!(*value, expected, "at ({}, {})", p.x, p.y);
        }
        // centre and corners
        assert_eq!(field[12], 1.0);
        for corner in [0, 4, 20, 24] {
            assert_eq!(field[corner], 0.0);
        }
        // (1, 0) sits exactly on the boundary
        assert_eq!(field[14], 1.0);
    }

    #[test]
    fn circle_polar_grid_uses_radius() {
        let grid = Arc::new(Grid::separated_polar(vec![0.0, 0.5, 1.0, 1.5], vec![0.0, 1.0]));
        let field = circular_aperture(2.0).unwrap().sample(&grid);
        assert_eq!(field.values(), &[1.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn invalid_lengths_are_rejected() {
        assert!(matches!(circular_aperture(-1.0), Err(OpticsError::InvalidArgument(_))));
        assert!(matches!(circular_aperture(f64::NAN), Err(OpticsError::InvalidArgument(_))));
        assert!(matches!(rectangular_aperture(1.0, 0.0, None), Err(OpticsError::InvalidArgument(_))));
        assert!(matches!(
            rectangular_aperture(1.0, 1.0, Some(Vec2D::new(f64::INFINITY, 0.0))),
            Err(OpticsError::InvalidArgument(_))
        ));
    }

    #[test]
    fn rectangle_edges_are_inclusive() {
        let grid = grid_5x5();
        let field = rectangular_aperture(2.0, 1.0, None).unwrap().sample(&grid);
        for (value, p) in field.iter().zip(grid.points()) {
            let expected = if p.x.abs() <= 1.0 && p.y.abs() <= 0.5 { 1.0 } else { 0.0 };
            assert_eq!(*value, expected, "at ({}, {})", p.x, p.y);
        }
        assert_eq!(field.sum(), 15.0);
    }

    #[test]
    fn rectangle_center_shifts_window() {
        let grid = grid_5x5();
        let shifted = rectangular_aperture(1.0, 1.0, Some(Vec2D::new(0.5, 0.5))).unwrap();
        let field = shifted.sample(&grid);
        for (value, p) in field.iter().zip(grid.points()) {
            let expected = if p.x >= 0.0 && p.y >= 0.0 { 1.0 } else { 0.0 };
            assert_eq!(*value, expected, "at ({}, {})", p.x, p.y);
        }
    }

    #[test]
    fn rectangle_converts_polar_grid() {
        let grid = Arc::new(Grid::polar(vec![0.4, 0.4], vec![0.0, PI / 2.0]).unwrap());
        let field = rectangular_aperture(1.0, 0.5, None).unwrap().sample(&grid);
        assert_eq!(field.values(), &[1.0, 0.0]);
    }

    #[test]
    fn polygon_needs_three_sides() {
        for n in 0..3 {
            assert!(matches!(
                regular_polygon_aperture(n, 1.0),
                Err(OpticsError::InvalidArgument(_))
            ));
        }
        assert!(regular_polygon_aperture(3, 1.0).is_ok());
    }

    #[test]
    fn polygon_angles() {
        let hexagon = hexagonal_aperture(1.0).unwrap();
        assert_eq!(hexagon.thetas.len(), 3);
        assert_abs_diff_eq!(hexagon.thetas[1], PI / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(hexagon.apothem(), (PI / 6.0).cos() / 2.0, epsilon = 1e-12);

        let triangle = regular_polygon_aperture(3, 1.0).unwrap();
        assert_eq!(triangle.thetas.len(), 2);
        assert_abs_diff_eq!(triangle.thetas[1], 2.0 * PI / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn hexagon_centre_and_vertex() {
        let hexagon = regular_polygon_aperture(6, 2.0).unwrap();
        assert_eq!(hexagon.sample(&single_point(0.0, 0.0))[0], 1.0);
        // vertices at 30 + 60k degrees, radius 1
        let eps = 1e-6;
        for k in 0..6 {
            let phi = PI / 6.0 + k as f64 * PI / 3.0;
            let p = Vec2D::from_polar(1.0 + eps, phi);
            assert_eq!(hexagon.sample(&single_point(p.x, p.y))[0], 0.0);
            let q = Vec2D::from_polar(1.0 - eps, phi);
            assert_eq!(hexagon.sample(&single_point(q.x, q.y))[0], 1.0);
        }
    }

    #[test]
    fn triangle_orientation() {
        let triangle = regular_polygon_aperture(3, 2.0).unwrap();
        // vertex on +y, flat edge at y = -apothem = -0.5
        assert_eq!(triangle.sample(&single_point(0.0, 0.99))[0], 1.0);
        assert_eq!(triangle.sample(&single_point(0.0, -0.49))[0], 1.0);
        assert_eq!(triangle.sample(&single_point(0.0, -0.51))[0], 0.0);
        assert_eq!(triangle.sample(&single_point(0.0, 1.01))[0], 0.0);
    }

    #[test]
    fn hexagonal_matches_six_sided_polygon() {
        let axis: Vec<f64> = (0..41).map(|i| -1.0 + 0.05 * i as f64).collect();
        let grid = Arc::new(Grid::separated_cartesian(axis.clone(), axis));
        let a = hexagonal_aperture(1.7).unwrap().sample(&grid);
        let b = regular_polygon_aperture(6, 1.7).unwrap().sample(&grid);
        assert_eq!(a, b);
    }

    #[test]
    fn polygon_is_binary_and_inside_circumcircle() {
        let axis: Vec<f64> = (0..51).map(|i| -1.25 + 0.05 * i as f64).collect();
        let grid = Arc::new(Grid::separated_cartesian(axis.clone(), axis));
        for n in 3..10 {
            let field = regular_polygon_aperture(n, 2.0).unwrap().sample(&grid);
            for (value, p) in field.iter().zip(grid.points()) {
                assert!(*value == 0.0 || *value == 1.0);
                if *value == 1.0 {
                    assert!(p.norm() <= 1.0 + 1e-12);
                }
            }
        }
    }

    #[test]
    fn spec_builds_every_shape() {
        let grid = grid_5x5();
        let specs = [
            (ApertureSpec::Circular { diameter: 2.0 }, 13.0),
            (ApertureSpec::Rectangular { width: 1.0, height: 1.0, center: None }, 9.0),
            (ApertureSpec::RegularPolygon { num_sides: 4, circum_diameter: 1.0 }, 1.0),
            (ApertureSpec::Hexagonal { circum_diameter: 0.5 }, 1.0),
        ];
        for (spec, expected) in specs {
            assert_eq!(spec.build().unwrap().sample(&grid).sum(), expected, "{:?}", spec);
        }
        assert!(ApertureSpec::RegularPolygon { num_sides: 2, circum_diameter: 1.0 }.build().is_err());
    }

    #[test]
    fn spec_from_json() {
        let spec: ApertureSpec = serde_json::from_str(
            r#"{"rectangular": {"width": 2.0, "height": 1.0}}"#
        ).unwrap();
        assert_eq!(spec, ApertureSpec::Rectangular { width: 2.0, height: 1.0, center: None });
    }

    proptest! {
        #[test]
        fn polygon_matches_all_edges_reference(
            n in 3usize..13,
            diameter in 0.1f64..10.0,
            x in -1.2f64..1.2,
            y in -1.2f64..1.2,
        ) {
            let (x, y) = (x * diameter, y * diameter);
            prop_assume!(edge_distance(n, diameter, x, y) > 1e-9 * diameter);
            let polygon = regular_polygon_aperture(n, diameter).unwrap();
            let value = polygon.sample(&single_point(x, y))[0];
            prop_assert_eq!(value, polygon_reference(n, diameter, x, y));
        }

        #[test]
        fn circle_cartesian_and_polar_agree(
            diameter in 0.1f64..10.0,
            points in proptest::collection::vec((-6.0f64..6.0, -6.0f64..6.0), 1..64),
        ) {
            let radius = diameter / 2.0;
            let points: Vec<(f64, f64)> = points.into_iter()
                .filter(|(x, y)| (x.hypot(*y) - radius).abs() > 1e-9)
                .collect();
            let (x, y): (Vec<f64>, Vec<f64>) = points.into_iter().unzip();
            let cartesian = Arc::new(Grid::cartesian(x, y).unwrap());
            let polar = Arc::new(cartesian.as_system(CoordinateSystem::Polar).into_owned());
            let aperture = circular_aperture(diameter).unwrap();
            let a = aperture.sample(&cartesian);
            let b = aperture.sample(&polar);
            prop_assert_eq!(a.values(), b.values());
            for (value, r) in a.iter().zip(cartesian.r().iter()) {
                prop_assert_eq!(*value, indicator(*r <= radius));
            }
        }

        #[test]
        fn rectangle_is_axis_aligned_box(
            width in 0.1f64..10.0,
            height in 0.1f64..10.0,
            cx in -2.0f64..2.0,
            cy in -2.0f64..2.0,
            points in proptest::collection::vec((-6.0f64..6.0, -6.0f64..6.0), 1..64),
        ) {
            let (x, y): (Vec<f64>, Vec<f64>) = points.into_iter().unzip();
            let grid = Arc::new(Grid::cartesian(x.clone(), y.clone()).unwrap());
            let centred = rectangular_aperture(width, height, None).unwrap().sample(&grid);
            let shifted = rectangular_aperture(width, height, Some(Vec2D::new(cx, cy))).unwrap().sample(&grid);
            for (i, (x, y)) in x.iter().zip(&y).enumerate() {
                prop_assert_eq!(centred[i], indicator(x.abs() <= width / 2.0 && y.abs() <= height / 2.0));
                prop_assert_eq!(
                    shifted[i],
                    indicator((x - cx).abs() <= width / 2.0 && (y - cy).abs() <= height / 2.0)
                );
            }
        }

        #[test]
        fn sampling_is_pure(
            n in 3usize..9,
            points in proptest::collection::vec((-2.0f64..2.0, -2.0f64..2.0), 1..64),
        ) {
            let (x, y): (Vec<f64>, Vec<f64>) = points.into_iter().unzip();
            let grid = Arc::new(Grid::cartesian(x, y).unwrap());
            let apertures: Vec<Box<dyn Aperture>> = vec![
                Box::new(circular_aperture(1.5).unwrap()),
                Box::new(rectangular_aperture(1.0, 2.0, None).unwrap()),
                Box::new(regular_polygon_aperture(n, 2.5).unwrap()),
            ];
            for aperture in &apertures {
                prop_assert_eq!(aperture.sample(&grid), aperture.sample(&grid));
            }
        }
    }
}
