//! Error types for annotation operations.

use thiserror::Error;

/// Result type for annotation operations.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// A measurement was rejected before touching any state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// NaN or infinite reading.
    #[error("measurement is not a finite number")]
    NotFinite,

    /// Reading outside the accepted depth range.
    #[error("measurement {value} is outside the accepted range [{min}, {max}]")]
    OutOfRange { value: f64, min: f64, max: f64 },
}
