use crate::core::{Detector, DetectorState};
use crate::error::{OpticsError, Result};
use crate::field::Field;
use crate::grid::Grid;
use crate::optics::Wavefront;
use std::sync::Arc;

/// Detector that accumulates exact intensity with no noise of any kind.
#[derive(Debug, Clone)]
pub struct NoiselessDetector {
    grid: Arc<Grid>,
    accumulated: Vec<f64>,
    state: DetectorState,
}

impl NoiselessDetector {
    /// New idle detector with one pixel per point of `grid`.
    pub fn new(grid: Arc<Grid>) -> Self {
        Self {
            accumulated: vec![0.0; grid.size()],
            grid,
            state: DetectorState::Idle,
        }
    }

    pub fn grid(&self) -> &Arc<Grid> {
        &self.grid
    }
}

impl Detector for NoiselessDetector {
    /// A zero exposure time adds nothing but still counts as an exposure,
    /// so the detector moves to [DetectorState::Integrating].
    fn integrate(&mut self, wavefront: &Wavefront, dt: f64) -> Result<()> {
        if !(dt.is_finite() && dt >= 0.0) {
            return Err(OpticsError::InvalidArgument(format!(
                "exposure time must be finite and non-negative, got {dt}"
            )));
        }
        let grid = wavefront.grid();
        if grid.size() != self.grid.size() {
            return Err(OpticsError::SizeMismatch {
                expected: self.grid.size(),
                found: grid.size(),
            });
        }
        if !(Arc::ptr_eq(grid, &self.grid) || **grid == *self.grid) {
            return Err(OpticsError::InvalidArgument(
                "wavefront is sampled on a different grid than the detector".into()
            ));
        }
        for (pixel, e) in self.accumulated.iter_mut().zip(wavefront.electric_field().iter()) {
            *pixel += e.norm_sqr() * dt;
        }
        self.state = DetectorState::Integrating;
        Ok(())
    }

    fn read_out(&self) -> Field<f64> {
        Field::from_parts(self.accumulated.clone(), Arc::clone(&self.grid))
    }

    fn reset(&mut self) {
        tracing::trace!(pixels = self.accumulated.len(), "detector reset");
        self.accumulated.iter_mut().for_each(|pixel| *pixel = 0.0);
        self.state = DetectorState::Idle;
    }

    fn state(&self) -> DetectorState {
        self.state
    }
}
