//! Wavefronts and the optical elements they propagate through.
use crate::core::{Aperture, OpticalElement};
use crate::error::{OpticsError, Result};
use crate::field::Field;
use crate::grid::Grid;
use num_complex::Complex64;
use std::fmt;
use std::sync::Arc;

/// Complex electric field at a single wavelength.
#[derive(Debug, Clone, PartialEq)]
pub struct Wavefront {
    electric_field: Field<Complex64>,
    wavelength: f64,
}

impl Wavefront {
    /// Fails if `wavelength` is not finite and positive.
    pub fn new(electric_field: Field<Complex64>, wavelength: f64) -> Result<Self> {
        if !(wavelength.is_finite() && wavelength > 0.0) {
            return Err(OpticsError::InvalidArgument(format!(
                "wavelength must be finite and positive, got {wavelength}"
            )));
        }
        Ok(Self { electric_field, wavelength })
    }

    /// Unit-amplitude, flat-phase wavefront on `grid`.
    pub fn plane(grid: Arc<Grid>, wavelength: f64) -> Result<Self> {
        let values = vec![Complex64::new(1.0, 0.0); grid.size()];
        Self::new(Field::from_parts(values, grid), wavelength)
    }

    pub fn electric_field(&self) -> &Field<Complex64> {
        &self.electric_field
    }

    pub fn wavelength(&self) -> f64 {
        self.wavelength
    }

    pub fn grid(&self) -> &Arc<Grid> {
        self.electric_field.grid()
    }

    /// `|E|^2` at every point.
    pub fn intensity(&self) -> Field<f64> {
        self.electric_field.map(|e| e.norm_sqr())
    }

    pub fn total_power(&self) -> f64 {
        self.electric_field.iter().map(|e| e.norm_sqr()).sum()
    }

    fn with_field(&self, values: Vec<Complex64>) -> Self {
        Self {
            electric_field: Field::from_parts(values, Arc::clone(self.grid())),
            wavelength: self.wavelength,
        }
    }
}

fn multiply(wavefront: &Wavefront, factors: &Field<Complex64>, conjugate: bool) -> Result<Wavefront> {
    factors.check_same_size(wavefront.grid())?;
    let values = wavefront.electric_field().iter()
        .zip(factors.iter())
        .map(|(e, t)| if conjugate { e * t.conj() } else { e * t })
        .collect();
    Ok(wavefront.with_field(values))
}

/// Multiplies a wavefront by a (possibly complex) transmission.
///
/// [OpticalElement::backward] applies the complex conjugate, which is the
/// adjoint of the forward operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Apodizer {
    transmission: Field<Complex64>,
}

impl Apodizer {
    pub fn new(transmission: Field<Complex64>) -> Self {
        Self { transmission }
    }

    /// Amplitude-only apodizer from a real transmission field.
    pub fn from_transmission(transmission: &Field<f64>) -> Self {
        Self::new(transmission.map(|t| Complex64::new(*t, 0.0)))
    }

    /// Sample `aperture` on `grid` and use it as the transmission.
    pub fn from_aperture(aperture: &dyn Aperture, grid: &Arc<Grid>) -> Self {
        Self::from_transmission(&aperture.sample(grid))
    }

    pub fn transmission(&self) -> &Field<Complex64> {
        &self.transmission
    }
}

impl OpticalElement for Apodizer {
    fn forward(&self, wavefront: &Wavefront) -> Result<Wavefront> {
        multiply(wavefront, &self.transmission, false)
    }
    fn backward(&self, wavefront: &Wavefront) -> Result<Wavefront> {
        multiply(wavefront, &self.transmission, true)
    }
}

/// Thin phase screen, `phase` in radians.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseScreen {
    phase: Field<f64>,
    phasor: Field<Complex64>,
}

impl PhaseScreen {
    pub fn new(phase: Field<f64>) -> Self {
        let phasor = phase.map(|p| Complex64::from_polar(1.0, *p));
        Self { phase, phasor }
    }

    pub fn phase(&self) -> &Field<f64> {
        &self.phase
    }
}

impl OpticalElement for PhaseScreen {
    fn forward(&self, wavefront: &Wavefront) -> Result<Wavefront> {
        multiply(wavefront, &self.phasor, false)
    }
    fn backward(&self, wavefront: &Wavefront) -> Result<Wavefront> {
        multiply(wavefront, &self.phasor, true)
    }
}

/// Ordered chain of optical elements, itself an [OpticalElement].
///
/// `forward` runs the elements in order, `backward` runs their `backward`
/// in reverse order. The first failing element aborts the propagation.
/// ```
/// use rhci::{Apodizer, OpticalElement, OpticalSystem, PhaseScreen, Wavefront};
/// use rhci::{circular_aperture, make_pupil_grid};
/// use std::sync::Arc;
///
/// let grid = Arc::new(make_pupil_grid(16, 1.0));
/// let pupil = circular_aperture(1.0).unwrap();
/// let mut system = OpticalSystem::new();
/// system.push(Apodizer::from_aperture(&pupil, &grid));
/// system.push(PhaseScreen::new(rhci::Field::zeros(Arc::clone(&grid))));
///
/// let wf = Wavefront::plane(grid, 500e-9).unwrap();
/// let out = system.propagate(&wf).unwrap();
/// assert!(out.total_power() < wf.total_power());
/// ```
#[derive(Default)]
pub struct OpticalSystem {
    elements: Vec<Box<dyn OpticalElement>>,
}

impl OpticalSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element at the end of the chain.
    pub fn push(&mut self, element: impl OpticalElement + 'static) {
        self.elements.push(Box::new(element));
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl fmt::Debug for OpticalSystem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("OpticalSystem")
            .field("elements", &self.elements.len())
            .finish()
    }
}

impl OpticalElement for OpticalSystem {
    fn forward(&self, wavefront: &Wavefront) -> Result<Wavefront> {
        self.elements.iter()
            .try_fold(wavefront.clone(), |wf, element| element.forward(&wf))
    }
    fn backward(&self, wavefront: &Wavefront) -> Result<Wavefront> {
        self.elements.iter()
            .rev()
            .try_fold(wavefront.clone(), |wf, element| element.backward(&wf))
    }
}
