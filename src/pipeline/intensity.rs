//! Scalar intensity measures of an acceleration record.
//!
//! Amplitudes are taken to be in units of g; conversions to physical units
//! go through `g = 9.81 m/s²`. All duration thresholds are computed on the
//! normalized cumulative Arias curve, never on raw intensity.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::data::waveform::Waveform;

pub const GRAVITY_MS2: f64 = 9.81;

/// Flat record of summary statistics, computed once per record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntensityParameters {
    /// Peak ground acceleration, g.
    pub pga_g: f64,
    /// Peak ground velocity, m/s (from one integration of the record).
    pub pgv_ms: f64,
    /// Peak ground displacement, m (from two integrations).
    pub pgd_m: f64,
    /// Root mean square of the acceleration, g.
    pub rms_g: f64,
    /// Total Arias intensity, m/s.
    pub arias_intensity_ms: f64,
    /// Cumulative absolute velocity, m/s.
    pub cav_ms: f64,
    pub t5_s: f64,
    pub t25_s: f64,
    pub t75_s: f64,
    pub t95_s: f64,
    /// Significant duration, 5–95% of Arias intensity.
    pub duration_5_95_s: f64,
    /// Significant duration, 25–75% of Arias intensity.
    pub duration_25_75_s: f64,
}

/// Cumulative Arias intensity time series, m/s.
///
/// `Ia(t) = π/(2g)·∫a(τ)²dτ` accumulated with the trapezoidal rule; the
/// sequence is non-decreasing for any input.
pub fn arias_intensity_series(waveform: &Waveform) -> Vec<f64> {
    let dt = waveform.dt();
    let scale = PI / (2.0 * GRAVITY_MS2);
    let a_ms2: Vec<f64> = waveform
        .amplitude
        .iter()
        .map(|&a| a * GRAVITY_MS2)
        .collect();

    let mut series = Vec::with_capacity(a_ms2.len());
    series.push(0.0);
    for i in 1..a_ms2.len() {
        let increment = scale * dt / 2.0 * (a_ms2[i] * a_ms2[i] + a_ms2[i - 1] * a_ms2[i - 1]);
        series.push(series[i - 1] + increment);
    }
    series
}

/// Extract every summary statistic from an acceleration record.
pub fn extract_parameters(waveform: &Waveform) -> IntensityParameters {
    let dt = waveform.dt();
    let n = waveform.len();
    let accel = &waveform.amplitude;

    let pga_g = waveform.peak_abs();
    let rms_g = (accel.iter().map(|a| a * a).sum::<f64>() / n as f64).sqrt();

    // One and two trapezoidal integrations, in physical units
    let mut velocity = vec![0.0f64; n];
    for i in 1..n {
        velocity[i] =
            velocity[i - 1] + dt / 2.0 * (accel[i] + accel[i - 1]) * GRAVITY_MS2;
    }
    let mut displacement = vec![0.0f64; n];
    for i in 1..n {
        displacement[i] = displacement[i - 1] + dt / 2.0 * (velocity[i] + velocity[i - 1]);
    }
    let pgv_ms = velocity.iter().map(|v| v.abs()).fold(0.0f64, f64::max);
    let pgd_m = displacement.iter().map(|d| d.abs()).fold(0.0f64, f64::max);

    let cav_ms = accel.iter().map(|a| a.abs() * GRAVITY_MS2 * dt).sum();

    let arias = arias_intensity_series(waveform);
    let total = *arias.last().unwrap_or(&0.0);

    let (t5_s, t25_s, t75_s, t95_s) = if total > 0.0 {
        (
            threshold_time(&waveform.time, &arias, total, 0.05),
            threshold_time(&waveform.time, &arias, total, 0.25),
            threshold_time(&waveform.time, &arias, total, 0.75),
            threshold_time(&waveform.time, &arias, total, 0.95),
        )
    } else {
        // Zero-energy record: the midpoint stands in for every bound
        let midpoint = waveform.time[0] + waveform.duration() / 2.0;
        log::warn!("zero-energy record, significant duration collapses to midpoint");
        (midpoint, midpoint, midpoint, midpoint)
    };

    IntensityParameters {
        pga_g,
        pgv_ms,
        pgd_m,
        rms_g,
        arias_intensity_ms: total,
        cav_ms,
        t5_s,
        t25_s,
        t75_s,
        t95_s,
        duration_5_95_s: t95_s - t5_s,
        duration_25_75_s: t75_s - t25_s,
    }
}

/// Time at which the normalized cumulative curve crosses `fraction`,
/// linearly interpolated between the bracketing samples.
fn threshold_time(time: &[f64], cumulative: &[f64], total: f64, fraction: f64) -> f64 {
    let target = fraction * total;
    for i in 0..cumulative.len() {
        if cumulative[i] >= target {
            if i == 0 {
                return time[0];
            }
            let below = cumulative[i - 1];
            let above = cumulative[i];
            let frac = if above > below {
                (target - below) / (above - below)
            } else {
                0.5
            };
            return time[i - 1] + frac * (time[i] - time[i - 1]);
        }
    }
    time[time.len() - 1]
}
