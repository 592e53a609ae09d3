//! # rhci
//!
//! Building blocks for simulating high-contrast imaging instruments:
//! hard-edged aperture masks sampled on arbitrary grids, optical elements that
//! transform wavefronts, and detectors that accumulate their intensity.
//!
//! ```
//! use rhci::*;
//! use std::sync::Arc;
//!
//! let grid = Arc::new(make_pupil_grid(32, 1.0));
//! let pupil = hexagonal_aperture(1.0).unwrap();
//! let apodizer = Apodizer::from_aperture(&pupil, &grid);
//!
//! let mut camera = NoiselessDetector::new(Arc::clone(&grid));
//! let wavefront = Wavefront::plane(Arc::clone(&grid), 700e-9).unwrap();
//! camera.integrate(&apodizer.propagate(&wavefront).unwrap(), 1.0).unwrap();
//! let image = camera.read_out();
//! assert_eq!(image.sum(), pupil.sample(&grid).sum());
//! ```
#[macro_use]
extern crate impl_ops;

mod aperture;
mod config;
mod core;
mod detector;
mod error;
mod field;
mod geometry;
mod grid;
mod io;
mod linalg;
mod optics;
mod utils;

pub use aperture::*;
pub use config::*;
pub use crate::core::*;
pub use detector::*;
pub use error::*;
pub use field::*;
pub use geometry::*;
pub use grid::*;
pub use io::*;
pub use linalg::*;
pub use optics::*;
pub use utils::*;
