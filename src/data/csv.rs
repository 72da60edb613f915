//! CSV serializer for time series.
//!
//! Interface only: the caller decides where the text goes. Output is a
//! `Time,<SeriesName>` header row followed by one `time,value` row per
//! sample; a missing value serializes as the empty string.

use crate::data::waveform::Waveform;

/// Serialize a time/value series under the given column name.
///
/// When `values` is shorter than `time`, the trailing rows carry an empty
/// value field.
pub fn to_csv(name: &str, time: &[f64], values: &[f64]) -> String {
    let mut out = String::with_capacity(16 + time.len() * 12);
    out.push_str("Time,");
    out.push_str(name);
    out.push('\n');

    for (i, t) in time.iter().enumerate() {
        out.push_str(&t.to_string());
        out.push(',');
        if let Some(v) = values.get(i) {
            out.push_str(&v.to_string());
        }
        out.push('\n');
    }
    out
}

/// Serialize a record's amplitude column.
pub fn waveform_to_csv(waveform: &Waveform, name: &str) -> String {
    to_csv(name, &waveform.time, &waveform.amplitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_three_sample_output() {
        let out = to_csv("Test", &[0.0, 0.01, 0.02], &[0.1, 0.2, 0.15]);
        assert_eq!(out, "Time,Test\n0,0.1\n0.01,0.2\n0.02,0.15\n");
    }

    #[test]
    fn test_missing_values_serialize_empty() {
        let out = to_csv("A", &[0.0, 0.5, 1.0], &[3.25]);
        assert_eq!(out, "Time,A\n0,3.25\n0.5,\n1,\n");
    }

    #[test]
    fn test_waveform_export() {
        let w = Waveform::from_series(vec![0.0, 0.01], vec![-1.5, 2.0]).unwrap();
        assert_eq!(waveform_to_csv(&w, "EW"), "Time,EW\n0,-1.5\n0.01,2\n");
    }
}
