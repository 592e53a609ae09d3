use std::ops;

/// 2D geometric vector in the transverse plane of the optical path.
///
/// This struct is used for grid points, aperture centres and the edge normals
/// of polygonal apertures.
/// # Examples
/// ```
/// let a = rhci::Vec2D::new(3.0, 4.0);
/// assert_eq!(a.norm(),5.0);
/// let b = &a * 2.0;
/// assert_eq!(b.norm(),10.0);
/// let e_x = rhci::Vec2D::x_unit();
/// let e_y = rhci::Vec2D::y_unit();
/// assert_eq!(e_x.dot(&e_y), 0.0);
/// assert_eq!(e_x.dot(&a), 3.0);
/// assert_eq!((e_x / 2.0).x, 0.5);
/// ```
#[derive(Debug,Clone,Copy,PartialEq,serde::Serialize,serde::Deserialize)]
pub struct Vec2D {
    pub x: f64,
    pub y: f64,
}

impl Vec2D {
    /// Create a new [Vec2D] from the coordinates in the transverse plane.
    pub fn new(x: f64, y: f64) -> Self {
        Self {x,y}
    }
    /// The origin of the transverse plane.
    pub fn origin() -> Self {
        Self {x:0.0, y:0.0}
    }
    /// create a unit vector along x-axis.
    pub fn x_unit() -> Self {
        Self {x:1.0, y:0.0}
    }
    /// create a unit vector along y-axis.
    pub fn y_unit() -> Self {
        Self {x:0.0, y:1.0}
    }
    /// Create a [Vec2D] from polar coordinates, `theta` in radians measured
    /// from the x-axis towards the y-axis.
    pub fn from_polar(r: f64, theta: f64) -> Self {
        Self {
            x: r*theta.cos(),
            y: r*theta.sin(),
        }
    }
    /// Unit vector pointing along `theta`.
    pub fn from_angle(theta: f64) -> Self {
        Self::from_polar(1.0, theta)
    }
    /// return the (Euclidean) norm of the [Vec2D].
    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }
    /// return the (Euclidean) squared-norm of the [Vec2D].
    pub fn norm2(&self) -> f64 {
        self.x*self.x+self.y*self.y
    }
    /// Angle of the [Vec2D] from the x-axis, in `(-pi, pi]`.
    pub fn angle(&self) -> f64 {
        self.y.atan2(self.x)
    }
    /// return the dot (inner) product of the [Vec2D] with another (borrowed) [Vec2D].
    pub fn dot(&self, other: &Self) -> f64 {
        self.x*other.x+self.y*other.y
    }
    /// Calculate a uniformly spaced set of points between two [Vec2D]s.
    ///
    /// Points sit at the centres of `npoints` equal segments, so neither end
    /// point is included.
    pub fn linspace(a: &Self, b: &Self, npoints: u32) -> Vec<Self> {
        (0..npoints)
        .map(|u| (u as f64 / npoints as f64) + 1.0/ (2.0 * npoints as f64))
        .map(|t| (1.0-t)*a + t*b)
        .collect()
    }
}

impl_op!(- |a:Vec2D| -> Vec2D {
    Vec2D::new(-a.x, -a.y)
});

impl_op_ex_commutative!(/ |a:&Vec2D,b:&f64| -> Vec2D {
    Vec2D {
        x: a.x / b,
        y: a.y / b,
    }
});
impl_op_ex_commutative!(* |a:&Vec2D,b:&f64| -> Vec2D {
    Vec2D {
        x: a.x * b,
        y: a.y * b,
    }
});
impl_op_ex!(+ |a:&Vec2D,b:&Vec2D| -> Vec2D {
    Vec2D {
        x: a.x + b.x,
        y: a.y + b.y,
    }
});
impl_op_ex!(- |a:&Vec2D,b:&Vec2D| -> Vec2D {
    Vec2D {
        x: a.x - b.x,
        y: a.y - b.y,
    }
});


#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq};
    use std::f64::consts::PI;

    #[test]
    fn linspace() {
        let a = Vec2D::new(1.0,2.0);
        let b = Vec2D::new(3.0,0.0);
        let ls = Vec2D::linspace(&a,&b,3);
        assert_abs_diff_eq!(ls[1].x, 2.0);
        assert_abs_diff_eq!(ls[1].y, 1.0);
    }

    #[test]
    fn linspace_is_centred() {
        let ls = Vec2D::linspace(&Vec2D::new(-1.0,0.0),&Vec2D::new(1.0,0.0),4);
        assert_abs_diff_eq!(ls[0].x, -0.75);
        assert_abs_diff_eq!(ls[3].x, 0.75);
    }

    #[test]
    fn polar_round_trip() {
        let p = Vec2D::from_polar(2.0, 3.0*PI/4.0);
        assert_abs_diff_eq!(p.norm(), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.angle(), 3.0*PI/4.0, epsilon = 1e-12);
    }

    #[test]
    fn subtracting() {
        let a = Vec2D::new(1.0,2.0);
        let b = Vec2D::new(10.0,20.0);
        let c = &b - &a;
        assert_abs_diff_eq!(c.x, 9.0);
        assert_abs_diff_eq!((-c).y, -18.0);
    }
}
