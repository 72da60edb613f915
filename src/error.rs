//! Crate-wide error type.
//!
//! Every numeric routine validates its argument domain up front and fails
//! with a specific variant instead of returning NaN. Errors are local to the
//! failing call; there is no global error state.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Malformed record: empty or mismatched arrays, non-monotonic time.
    #[error("invalid waveform: {0}")]
    InvalidWaveform(String),
    /// Out-of-domain argument: non-positive cutoff, low >= high cutoffs,
    /// empty period list, magnitude/distance/site class outside range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// Gaussian elimination hit an unusable pivot during baseline fitting.
    #[error("singular system: {0}")]
    SingularSystem(String),
    /// Vendor text format could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
