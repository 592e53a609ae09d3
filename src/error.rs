//! Error types for rhci.

use thiserror::Error;

/// Errors returned by aperture construction, element propagation, detectors
/// and file output.
#[derive(Error, Debug)]
pub enum OpticsError {
    /// Malformed shape or element parameters, rejected at construction.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The grid does not provide a representation the operation needs.
    #[error("grid lacks required capability: {0}")]
    MissingCapability(String),
    /// Values and grid (or two grids) disagree on the number of samples.
    #[error("size mismatch: expected {expected} samples, found {found}")]
    SizeMismatch { expected: usize, found: usize },
    /// No format was given and none could be guessed from the file name.
    #[error("format not given and could not be guessed from '{0}'")]
    UnknownFormat(String),
    /// The format is recognised but cannot be read or written.
    #[error("file format '{0}' is not supported")]
    UnsupportedFormat(String),
    /// A file could not be decoded as the format it claims to be.
    #[error("malformed file: {0}")]
    MalformedFile(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OpticsError>;
