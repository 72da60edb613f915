//! Vendor strong-motion text format reader.
//!
//! The format is a plain-text header block of `Key: Value` lines terminated
//! by a column-header line containing `TIME` or `ACCELERATION`, followed by
//! whitespace-delimited `time value` rows:
//!
//! ```text
//! Station: KMMH16
//! Component: EW
//! Magnitude: 6.5
//! Units: g
//! TIME ACCELERATION
//! 0.00  0.0012
//! 0.01 -0.0034
//! ...
//! ```
//!
//! All header pairs are kept verbatim in `metadata.header`; the keys the
//! engine recognizes are additionally promoted to typed metadata fields.
//! Only the data contract is covered here, not transport.

use std::collections::BTreeMap;
use std::path::Path;

use crate::data::waveform::{Waveform, WaveformMetadata};
use crate::error::{EngineError, Result};

/// A parsed vendor file: the validated record plus the sampling quantities
/// derived from the time column.
#[derive(Debug, Clone)]
pub struct VendorRecord {
    pub waveform: Waveform,
    /// Spacing of the first two samples, in seconds.
    pub time_step: f64,
    /// Time span of the record, in seconds.
    pub duration: f64,
}

/// Read and parse a vendor text file.
pub fn read_vendor_file(path: &Path) -> Result<VendorRecord> {
    let content = std::fs::read_to_string(path)?;
    parse_vendor_text(&content)
}

/// Parse vendor text content.
pub fn parse_vendor_text(content: &str) -> Result<VendorRecord> {
    let mut header: BTreeMap<String, String> = BTreeMap::new();
    let mut time: Vec<f64> = Vec::new();
    let mut amplitude: Vec<f64> = Vec::new();
    let mut in_data = false;

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if !in_data {
            let upper = trimmed.to_uppercase();
            if upper.contains("TIME") || upper.contains("ACCELERATION") {
                // Column-header line terminates the header block
                in_data = true;
                continue;
            }
            if let Some(colon) = trimmed.find(':') {
                let key = trimmed[..colon].trim().to_string();
                let value = trimmed[colon + 1..].trim().to_string();
                if !key.is_empty() {
                    header.insert(key, value);
                }
            }
            continue;
        }

        // Data row: first two numeric tokens are time and amplitude
        let mut tokens = trimmed.split_whitespace();
        let t = tokens.next().and_then(|s| s.parse::<f64>().ok());
        let a = tokens.next().and_then(|s| s.parse::<f64>().ok());
        if let (Some(t), Some(a)) = (t, a) {
            time.push(t);
            amplitude.push(a);
        } else {
            log::warn!("skipping unparseable data row: {:?}", trimmed);
        }
    }

    if !in_data {
        return Err(EngineError::Parse(
            "no TIME/ACCELERATION column header found".to_string(),
        ));
    }
    if time.len() < 2 {
        return Err(EngineError::Parse(format!(
            "expected at least 2 data rows, found {}",
            time.len()
        )));
    }

    let metadata = metadata_from_header(header);
    let mut waveform = Waveform::new(time, amplitude, metadata)?;
    let time_step = waveform.dt();
    let duration = waveform.duration();

    if waveform.metadata.sample_rate_hz.is_none() && time_step > 0.0 {
        waveform.metadata.sample_rate_hz = Some(1.0 / time_step);
    }

    Ok(VendorRecord {
        waveform,
        time_step,
        duration,
    })
}

/// Promote recognized header keys to typed metadata fields.
fn metadata_from_header(header: BTreeMap<String, String>) -> WaveformMetadata {
    let mut meta = WaveformMetadata::default();

    for (key, value) in &header {
        match key.to_uppercase().as_str() {
            "STATION" | "STATION CODE" => meta.station = Some(value.clone()),
            "COMPONENT" | "COMP" | "DIRECTION" => meta.component = Some(value.clone()),
            "MAGNITUDE" | "MAG" => meta.magnitude = parse_header_float(value),
            "DEPTH" | "DEPTH(KM)" | "FOCAL DEPTH" => meta.depth_km = parse_header_float(value),
            "DISTANCE" | "DISTANCE(KM)" | "EPICENTRAL DISTANCE" => {
                meta.distance_km = parse_header_float(value)
            }
            "EVENT" | "EVENT ID" | "ORIGIN" => meta.event_id = Some(value.clone()),
            "UNITS" | "UNIT" => meta.units = value.clone(),
            "SAMPLE RATE" | "SAMPLING RATE" | "SAMPLE RATE(HZ)" => {
                meta.sample_rate_hz = parse_header_float(value)
            }
            _ => {}
        }
    }

    meta.header = header;
    meta
}

/// Parse the leading numeric token of a header value ("10 km" → 10.0).
fn parse_header_float(s: &str) -> Option<f64> {
    s.trim()
        .split_whitespace()
        .next()
        .and_then(|v| v.parse::<f64>().ok())
}
