//! Error type for configuration and construction failures
//!
//! Per-frame physics never fails; degenerate inputs are handled by branching.
//! Only building a tube, validating signal parameters and loading settings can
//! reject input.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrtError {
    #[error("Invalid tube geometry: {field} must be finite and > 0 (got {value})")]
    InvalidGeometry { field: &'static str, value: f64 },

    #[error("Invalid signal parameters: {0}")]
    InvalidSignal(String),

    #[error("Invalid range for {name}: min={min}, max={max}")]
    InvalidRange { name: &'static str, min: f64, max: f64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CrtResult<T> = Result<T, CrtError>;
