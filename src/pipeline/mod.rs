//! Waveform processing operations.
//!
//! Each transform is a pure function of its input record and returns a new
//! `Waveform`; nothing here shares mutable state, so callers may process
//! independent records, periods, or damping ratios concurrently without
//! coordination. `Pipeline` strings transforms together with history and
//! undo.

pub mod baseline;
pub mod calculus;
pub mod filters;
pub mod intensity;
pub mod response;
pub mod spectral;
pub mod synthetic;

use serde::{Deserialize, Serialize};

use crate::data::waveform::Waveform;
use crate::error::Result;
use crate::provenance::ProvenanceLog;

/// Descriptor of one waveform → waveform transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProcessingOp {
    LowPass { cutoff_hz: f64 },
    HighPass { cutoff_hz: f64 },
    BandPass { low_hz: f64, high_hz: f64 },
    Integrate { initial_value: f64 },
    Differentiate,
    CorrectBaseline { order: usize },
}

impl std::fmt::Display for ProcessingOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingOp::LowPass { cutoff_hz } => write!(f, "Low-pass ({} Hz)", cutoff_hz),
            ProcessingOp::HighPass { cutoff_hz } => write!(f, "High-pass ({} Hz)", cutoff_hz),
            ProcessingOp::BandPass { low_hz, high_hz } => {
                write!(f, "Band-pass ({}–{} Hz)", low_hz, high_hz)
            }
            ProcessingOp::Integrate { initial_value } => {
                write!(f, "Integrate (y0={})", initial_value)
            }
            ProcessingOp::Differentiate => write!(f, "Differentiate"),
            ProcessingOp::CorrectBaseline { order } => {
                write!(f, "Baseline correction (order {})", order)
            }
        }
    }
}

impl ProcessingOp {
    /// Apply this operation to a record.
    pub fn apply(&self, waveform: &Waveform) -> Result<Waveform> {
        match *self {
            ProcessingOp::LowPass { cutoff_hz } => filters::low_pass(waveform, cutoff_hz),
            ProcessingOp::HighPass { cutoff_hz } => filters::high_pass(waveform, cutoff_hz),
            ProcessingOp::BandPass { low_hz, high_hz } => {
                filters::band_pass(waveform, low_hz, high_hz)
            }
            ProcessingOp::Integrate { initial_value } => {
                Ok(calculus::integrate(waveform, initial_value))
            }
            ProcessingOp::Differentiate => Ok(calculus::differentiate(waveform)),
            ProcessingOp::CorrectBaseline { order } => {
                baseline::correct_baseline(waveform, order)
            }
        }
    }
}

/// A record under processing: current state, undo stack, provenance log.
///
/// Transforms never mutate their input, so undo is just restoring the
/// previous value.
#[derive(Debug, Clone)]
pub struct Pipeline {
    current: Waveform,
    previous: Vec<Waveform>,
    pub log: ProvenanceLog,
}

impl Pipeline {
    pub fn new(waveform: Waveform) -> Self {
        let mut log = ProvenanceLog::new();
        let source = match (&waveform.metadata.station, &waveform.metadata.component) {
            (Some(station), Some(component)) => format!("{}/{}", station, component),
            (Some(station), None) => station.clone(),
            _ => "unnamed record".to_string(),
        };
        log.set_source(&source);
        Self {
            current: waveform,
            previous: Vec::new(),
            log,
        }
    }

    pub fn waveform(&self) -> &Waveform {
        &self.current
    }

    /// Apply an operation; the prior state is kept for undo.
    pub fn apply(&mut self, op: &ProcessingOp) -> Result<()> {
        let next = op.apply(&self.current)?;
        self.previous.push(std::mem::replace(&mut self.current, next));
        self.log.add_entry(
            &op.to_string(),
            &format!(
                "{} samples, units {}",
                self.current.len(),
                self.current.metadata.units
            ),
        );
        Ok(())
    }

    /// Revert the most recent operation. Returns false when nothing is left
    /// to undo.
    pub fn undo(&mut self) -> bool {
        match self.previous.pop() {
            Some(waveform) => {
                self.current = waveform;
                self.log.pop_entry();
                true
            }
            None => false,
        }
    }

    pub fn applied_count(&self) -> usize {
        self.previous.len()
    }
}
