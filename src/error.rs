//! Error types for physlab
//!
//! Most laboratory conditions are recoverable and never surface here:
//! out-of-range input is clamped, undefined physics yields
//! [`Quantity::Undefined`](crate::quantity::Quantity::Undefined), and
//! missing runs are reported through `tracing`. This enum covers the
//! failures a caller genuinely has to handle.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// physlab error types
#[derive(Error, Debug)]
pub enum Error {
    /// Apparatus identifier not present in the catalog
    #[error("Unknown apparatus: {0}\nKnown apparatus: potentiometer, meter-bridge, galvanometer, em-induction")]
    UnknownApparatus(String),

    /// Parameter identifier not declared by the apparatus
    #[error("Unknown parameter '{parameter}' for apparatus '{apparatus}'")]
    UnknownParameter {
        /// Apparatus identifier
        apparatus: String,
        /// Offending parameter identifier
        parameter: String,
    },

    /// Parameter declaration violates `min <= default <= max` or `step > 0`
    #[error("Invalid parameter spec: {0}")]
    InvalidParameterSpec(String),

    /// JSON (de)serialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV writer failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error while flushing an export buffer
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
