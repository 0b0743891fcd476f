//! Error types for gravity-sandbox.
//!
//! Everything the physics and camera code does at runtime is infallible; the
//! only failures are bad construction parameters and malformed scene files.

use thiserror::Error;

/// An axis index outside of 0..3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("axis index must be 0, 1 or 2, got {0}")]
pub struct AxisError(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TrajectoryError {
    #[error("trajectory capacity must be positive")]
    ZeroCapacity,
}

/// Invalid parameters passed when creating a body.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BodyError {
    #[error("mass must be finite and positive, got {0}")]
    InvalidMass(f64),

    #[error("radius must be finite and non-negative, got {0}")]
    InvalidRadius(f64),

    #[error(transparent)]
    Trajectory(#[from] TrajectoryError),
}

/// Errors that can occur while reading a scene file.
#[derive(Debug, Error)]
pub enum SceneFileError {
    #[error("could not read scene file: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: expected {expected} columns, found {found}")]
    ColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: could not parse {field} from {value:?}")]
    BadField {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("line {line}: bad color {value:?}, expected six hex digits")]
    BadColor { line: usize, value: String },

    #[error("line {line}: {source}")]
    Body {
        line: usize,
        #[source]
        source: BodyError,
    },
}
