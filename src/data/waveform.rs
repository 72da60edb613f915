//! The core ground-motion record and its validation invariants.
//!
//! A `Waveform` pairs a strictly increasing time axis with an equally long
//! amplitude array plus station/event metadata. Every transform in the
//! pipeline returns a *new* `Waveform` with relabeled units and an extended
//! processing history; nothing mutates a record in place, so derived
//! entities never hold a live reference back to their source.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{EngineError, Result};

/// Descriptive attributes attached to a record.
///
/// `header` keeps every raw key/value pair from a vendor file; the typed
/// fields mirror the keys the engine recognizes. `processing` is the ordered
/// list of operation descriptions that produced this record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveformMetadata {
    /// Physical units of the amplitude values ("g", "m/s", "m", ...).
    pub units: String,
    pub sample_rate_hz: Option<f64>,
    /// Component direction (e.g. "EW", "NS", "UD").
    pub component: Option<String>,
    pub magnitude: Option<f64>,
    pub depth_km: Option<f64>,
    pub distance_km: Option<f64>,
    pub station: Option<String>,
    pub event_id: Option<String>,
    /// Raw vendor header pairs, untouched.
    pub header: BTreeMap<String, String>,
    /// Ordered descriptions of the operations applied so far.
    pub processing: Vec<String>,
}

impl Default for WaveformMetadata {
    fn default() -> Self {
        Self {
            units: "g".to_string(),
            sample_rate_hz: None,
            component: None,
            magnitude: None,
            depth_km: None,
            distance_km: None,
            station: None,
            event_id: None,
            header: BTreeMap::new(),
            processing: Vec::new(),
        }
    }
}

/// A digitized ground-motion time series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Waveform {
    /// Sample times in seconds, strictly increasing.
    pub time: Vec<f64>,
    /// Amplitude at each sample; acceleration, velocity, or displacement
    /// depending on `metadata.units`.
    pub amplitude: Vec<f64>,
    pub metadata: WaveformMetadata,
}

impl Waveform {
    /// Validate and construct a record.
    ///
    /// Rejects empty or length-mismatched arrays and a time axis that is
    /// not strictly increasing. Downstream operations assume this has
    /// passed and do not re-validate.
    pub fn new(time: Vec<f64>, amplitude: Vec<f64>, metadata: WaveformMetadata) -> Result<Self> {
        if time.is_empty() || amplitude.is_empty() {
            return Err(EngineError::InvalidWaveform(
                "time and amplitude must be non-empty".to_string(),
            ));
        }
        if time.len() != amplitude.len() {
            return Err(EngineError::InvalidWaveform(format!(
                "length mismatch: {} time samples vs {} amplitude samples",
                time.len(),
                amplitude.len()
            )));
        }
        if time.len() < 2 {
            return Err(EngineError::InvalidWaveform(
                "a record needs at least two samples".to_string(),
            ));
        }
        for i in 1..time.len() {
            if time[i] <= time[i - 1] {
                return Err(EngineError::InvalidWaveform(format!(
                    "time axis not strictly increasing at index {}",
                    i
                )));
            }
        }
        Ok(Self {
            time,
            amplitude,
            metadata,
        })
    }

    /// Convenience constructor with default metadata.
    pub fn from_series(time: Vec<f64>, amplitude: Vec<f64>) -> Result<Self> {
        Self::new(time, amplitude, WaveformMetadata::default())
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Sample spacing in seconds. Every algorithm that needs a sample rate
    /// treats the axis as uniform with this spacing.
    pub fn dt(&self) -> f64 {
        self.time[1] - self.time[0]
    }

    /// Samples per second, preferring the metadata value when present.
    pub fn sample_rate(&self) -> f64 {
        self.metadata
            .sample_rate_hz
            .unwrap_or_else(|| 1.0 / self.dt())
    }

    /// Record length in seconds.
    pub fn duration(&self) -> f64 {
        self.time[self.time.len() - 1] - self.time[0]
    }

    /// Maximum absolute amplitude (PGA/PGV/PGD depending on units).
    pub fn peak_abs(&self) -> f64 {
        self.amplitude.iter().map(|v| v.abs()).fold(0.0f64, f64::max)
    }

    /// Build the transform result: same time axis, new amplitudes, updated
    /// units, and the operation appended to the processing history.
    pub(crate) fn derived(&self, amplitude: Vec<f64>, units: String, note: &str) -> Waveform {
        let mut metadata = self.metadata.clone();
        metadata.units = units;
        metadata.processing.push(note.to_string());
        Waveform {
            time: self.time.clone(),
            amplitude,
            metadata,
        }
    }
}

/// Fixed unit relabeling for one time integration
/// (acceleration → velocity, velocity → displacement).
pub fn integrated_units(units: &str) -> String {
    match units {
        "m/s2" | "m/s²" => "m/s".to_string(),
        "cm/s2" | "cm/s²" | "gal" => "cm/s".to_string(),
        "m/s" => "m".to_string(),
        "cm/s" => "cm".to_string(),
        other => format!("{}·s", other),
    }
}

/// Inverse relabeling for one time differentiation.
pub fn differentiated_units(units: &str) -> String {
    match units {
        "m/s" => "m/s2".to_string(),
        "cm/s" => "cm/s2".to_string(),
        "m" => "m/s".to_string(),
        "cm" => "cm/s".to_string(),
        other => format!("{}/s", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_construction() {
        let w = Waveform::from_series(vec![0.0, 0.01, 0.02], vec![0.1, 0.2, 0.15]).unwrap();
        assert_eq!(w.len(), 3);
        assert!((w.dt() - 0.01).abs() < 1e-12);
        assert!((w.duration() - 0.02).abs() < 1e-12);
        assert!((w.peak_abs() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_empty_and_mismatch() {
        assert!(Waveform::from_series(vec![], vec![]).is_err());
        assert!(Waveform::from_series(vec![0.0, 0.01], vec![1.0]).is_err());
        assert!(Waveform::from_series(vec![0.0], vec![1.0]).is_err());
    }

    #[test]
    fn test_rejects_non_monotonic_time() {
        let err = Waveform::from_series(vec![0.0, 0.02, 0.01], vec![1.0, 2.0, 3.0]);
        assert!(matches!(err, Err(EngineError::InvalidWaveform(_))));
        // Repeated timestamps are not strictly increasing either
        assert!(Waveform::from_series(vec![0.0, 0.0, 0.01], vec![1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_sample_rate_prefers_metadata() {
        let mut meta = WaveformMetadata::default();
        meta.sample_rate_hz = Some(200.0);
        let w = Waveform::new(vec![0.0, 0.01], vec![0.0, 1.0], meta).unwrap();
        assert!((w.sample_rate() - 200.0).abs() < 1e-12);

        let w = Waveform::from_series(vec![0.0, 0.01], vec![0.0, 1.0]).unwrap();
        assert!((w.sample_rate() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_unit_relabeling() {
        assert_eq!(integrated_units("m/s2"), "m/s");
        assert_eq!(integrated_units("m/s"), "m");
        assert_eq!(integrated_units("gal"), "cm/s");
        assert_eq!(integrated_units("g"), "g·s");
        assert_eq!(differentiated_units("m"), "m/s");
        assert_eq!(differentiated_units("m/s"), "m/s2");
        assert_eq!(differentiated_units("g·s"), "g·s/s");
    }
}
