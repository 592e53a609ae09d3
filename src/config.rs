//! Simulation description for the `rhci` binary, read from JSON.
//! ```
//! let config = rhci::SimulationConfig::from_json(r#"{
//!     "grid": {"samples": 64, "diameter": 1.1},
//!     "wavelength": 6.5e-7,
//!     "output_dir": "/tmp",
//!     "apertures": [
//!         {"name": "segment", "spec": {"hexagonal": {"circum_diameter": 1.0}}}
//!     ]
//! }"#).unwrap();
//! assert_eq!(config.apertures[0].name, "segment");
//! ```
use crate::aperture::ApertureSpec;
use crate::error::{OpticsError, Result};
use crate::grid::Grid;
use crate::utils::make_pupil_grid;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Samples along each axis.
    pub samples: u32,
    /// Physical extent of each axis.
    pub diameter: f64,
}

impl GridConfig {
    pub fn build(&self) -> Result<Grid> {
        if self.samples == 0 || !(self.diameter.is_finite() && self.diameter > 0.0) {
            return Err(OpticsError::InvalidArgument(format!(
                "grid needs at least one sample and a positive diameter, got {} samples over {}",
                self.samples, self.diameter
            )));
        }
        Ok(make_pupil_grid(self.samples, self.diameter))
    }
}

/// An aperture to render, written to `<output_dir>/<name>.fits`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedAperture {
    pub name: String,
    pub spec: ApertureSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub grid: GridConfig,
    /// Wavelength of the plane wave sent through each aperture.
    pub wavelength: f64,
    pub output_dir: PathBuf,
    pub apertures: Vec<NamedAperture>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig { samples: 256, diameter: 1.1 },
            wavelength: 500e-9,
            output_dir: std::env::temp_dir(),
            apertures: vec![
                NamedAperture {
                    name: "circular".into(),
                    spec: ApertureSpec::Circular { diameter: 1.0 },
                },
                NamedAperture {
                    name: "square".into(),
                    spec: ApertureSpec::Rectangular { width: 0.8, height: 0.8, center: None },
                },
                NamedAperture {
                    name: "triangle".into(),
                    spec: ApertureSpec::RegularPolygon { num_sides: 3, circum_diameter: 1.0 },
                },
                NamedAperture {
                    name: "hexagon".into(),
                    spec: ApertureSpec::Hexagonal { circum_diameter: 1.0 },
                },
            ],
        }
    }
}

impl SimulationConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
