use crate::error::Result;
use crate::field::Field;
use crate::grid::Grid;
use crate::optics::Wavefront;
use std::sync::Arc;

// Core traits:
// - Aperture (e.g., circular pupils, hexagonal segments)
// - OpticalElement (e.g., apodizers, phase screens, chains of both)
// - Detector (e.g., a noiseless accumulating camera)

/// A shape that can be sampled onto any [Grid], producing a transmission
/// [Field].
///
/// Shape parameters are validated once, when the aperture is constructed (see
/// [crate::circular_aperture] and friends), so sampling itself cannot fail.
/// Sampling is pure: the same aperture sampled twice on the same grid gives
/// identical values, and independent grids can be sampled from several
/// threads at once.
///
/// Any closure of the right shape is also an [Aperture], which makes it easy
/// to combine shapes:
/// ```
/// use rhci::{Aperture, Field, Grid, circular_aperture};
/// use std::sync::Arc;
///
/// let primary = circular_aperture(1.0).unwrap();
/// let obstruction = circular_aperture(0.3).unwrap();
/// let annulus = move |grid: &Arc<Grid>| {
///     let outer = primary.sample(grid);
///     let inner = obstruction.sample(grid);
///     Field::new(
///         outer.iter().zip(inner.iter()).map(|(a, b)| a * (1.0 - b)).collect(),
///         Arc::clone(grid),
///     ).unwrap()
/// };
/// let grid = Arc::new(Grid::cartesian(vec![0.0, 0.4], vec![0.0, 0.0]).unwrap());
/// assert_eq!(annulus.sample(&grid).values(), &[0.0, 1.0]);
/// ```
pub trait Aperture: Send + Sync {
    /// Evaluate the transmission of the aperture at every point of `grid`.
    fn sample(&self, grid: &Arc<Grid>) -> Field<f64>;
}

impl<F> Aperture for F
where
    F: Fn(&Arc<Grid>) -> Field<f64> + Send + Sync,
{
    fn sample(&self, grid: &Arc<Grid>) -> Field<f64> {
        self(grid)
    }
}

/// Anything a [Wavefront] can be propagated through.
///
/// Both directions are required: [OpticalElement::backward] is the adjoint
/// of [OpticalElement::forward]. Elements are chained uniformly with
/// [crate::OpticalSystem].
pub trait OpticalElement {
    /// Propagate `wavefront` through the element in the nominal direction.
    fn forward(&self, wavefront: &Wavefront) -> Result<Wavefront>;

    /// Propagate `wavefront` through the element in the reverse direction.
    fn backward(&self, wavefront: &Wavefront) -> Result<Wavefront>;

    /// Shorthand for [OpticalElement::forward].
    fn propagate(&self, wavefront: &Wavefront) -> Result<Wavefront> {
        self.forward(wavefront)
    }
}

/// Lifecycle of a [Detector] exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorState {
    /// Nothing has been integrated since construction or the last reset.
    Idle,
    /// At least one wavefront has been integrated.
    Integrating,
}

/// A light-accumulating component at the end of an optical train.
///
/// Detectors own mutable accumulator state and provide no internal locking;
/// one exposure pipeline should own one detector at a time.
pub trait Detector {
    /// Add the intensity of `wavefront`, weighted by the exposure time `dt`,
    /// to the accumulator.
    fn integrate(&mut self, wavefront: &Wavefront, dt: f64) -> Result<()>;

    /// Current accumulated image. Reading out does not reset the detector.
    fn read_out(&self) -> Field<f64>;

    /// Clear the accumulator and return to [DetectorState::Idle].
    fn reset(&mut self);

    /// Whether anything has been integrated since the last reset.
    fn state(&self) -> DetectorState;
}
