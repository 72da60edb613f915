//! SDOF response spectrum solver.
//!
//! For each target period the oscillator equation
//! `ü + 2ζω·u̇ + ω²·u = −a_g(t)` is integrated through the whole record
//! with the Newmark-beta method (average acceleration, γ=0.5, β=0.25).
//! Running maxima of |u|, |u̇|, and the pseudo-acceleration ω²·|u| become
//! the spectral ordinates.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::data::waveform::Waveform;
use crate::error::{EngineError, Result};

const GAMMA: f64 = 0.5;
const BETA: f64 = 0.25;

/// Periods below this floor short-circuit to the rigid-oscillator limit.
pub const MIN_PERIOD_S: f64 = 0.01;

/// Spectral ordinates over a period axis for one damping ratio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseSpectrum {
    pub damping_ratio: f64,
    pub period: Vec<f64>,
    /// Pseudo-spectral acceleration, same units as the input record.
    pub sa: Vec<f64>,
    pub sv: Vec<f64>,
    pub sd: Vec<f64>,
}

/// Compute the response spectrum of an acceleration record.
pub fn response_spectrum(
    waveform: &Waveform,
    periods: &[f64],
    damping_ratio: f64,
) -> Result<ResponseSpectrum> {
    if periods.is_empty() {
        return Err(EngineError::InvalidParameter(
            "period list must be non-empty".to_string(),
        ));
    }
    if !(0.0..1.0).contains(&damping_ratio) {
        return Err(EngineError::InvalidParameter(format!(
            "damping ratio must be in [0, 1), got {}",
            damping_ratio
        )));
    }

    let dt = waveform.dt();
    let peak_input = waveform.peak_abs();

    let mut sa = Vec::with_capacity(periods.len());
    let mut sv = Vec::with_capacity(periods.len());
    let mut sd = Vec::with_capacity(periods.len());

    for &period in periods {
        if period < MIN_PERIOD_S {
            // A near-rigid oscillator just rides the ground motion
            sa.push(peak_input);
            sv.push(0.0);
            sd.push(0.0);
            continue;
        }
        let (max_u, max_v) = newmark_peaks(&waveform.amplitude, dt, period, damping_ratio);
        let omega = 2.0 * PI / period;
        sa.push(omega * omega * max_u);
        sv.push(max_v);
        sd.push(max_u);
    }

    Ok(ResponseSpectrum {
        damping_ratio,
        period: periods.to_vec(),
        sa,
        sv,
        sd,
    })
}

/// One spectrum per damping ratio; the ratios do not interact.
pub fn multi_damping_response_spectra(
    waveform: &Waveform,
    periods: &[f64],
    damping_ratios: &[f64],
) -> Result<Vec<ResponseSpectrum>> {
    damping_ratios
        .iter()
        .map(|&zeta| response_spectrum(waveform, periods, zeta))
        .collect()
}

/// A practical default period axis: log-spaced from the stability floor to
/// 10 s.
pub fn default_periods() -> Vec<f64> {
    let count = 60;
    let (lo, hi) = (MIN_PERIOD_S.ln(), 10.0f64.ln());
    (0..count)
        .map(|i| (lo + (hi - lo) * i as f64 / (count - 1) as f64).exp())
        .collect()
}

/// Newmark-beta sweep of one oscillator; returns (max |u|, max |u̇|).
fn newmark_peaks(accel: &[f64], dt: f64, period: f64, zeta: f64) -> (f64, f64) {
    let omega = 2.0 * PI / period;
    let k = omega * omega;
    let c = 2.0 * zeta * omega;

    // Incremental formulation with unit mass
    let k_hat = k + GAMMA * c / (BETA * dt) + 1.0 / (BETA * dt * dt);
    let a_coef = 1.0 / (BETA * dt) + GAMMA * c / BETA;
    let b_coef = 1.0 / (2.0 * BETA) + dt * c * (GAMMA / (2.0 * BETA) - 1.0);

    let mut u = 0.0f64;
    let mut v = 0.0f64;
    let mut a = -accel[0];
    let mut max_u = 0.0f64;
    let mut max_v = 0.0f64;

    for i in 0..accel.len() - 1 {
        let dp = -(accel[i + 1] - accel[i]);
        let dp_hat = dp + a_coef * v + b_coef * a;
        let du = dp_hat / k_hat;
        let dv = GAMMA / (BETA * dt) * du - GAMMA / BETA * v + dt * (1.0 - GAMMA / (2.0 * BETA)) * a;
        let da = du / (BETA * dt * dt) - v / (BETA * dt) - a / (2.0 * BETA);
        u += du;
        v += dv;
        a += da;
        max_u = max_u.max(u.abs());
        max_v = max_v.max(v.abs());
    }

    (max_u, max_v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine_record(freq_hz: f64, amplitude: f64, dt: f64, duration: f64) -> Waveform {
        let n = (duration / dt) as usize + 1;
        let time: Vec<f64> = (0..n).map(|i| i as f64 * dt).collect();
        let values: Vec<f64> = time
            .iter()
            .map(|&t| amplitude * (2.0 * PI * freq_hz * t).sin())
            .collect();
        Waveform::from_series(time, values).unwrap()
    }

    #[test]
    fn test_empty_period_list_rejected() {
        let w = sine_record(1.0, 1.0, 0.01, 2.0);
        assert!(matches!(
            response_spectrum(&w, &[], 0.05),
            Err(EngineError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_invalid_damping_rejected() {
        let w = sine_record(1.0, 1.0, 0.01, 2.0);
        assert!(response_spectrum(&w, &[1.0], -0.01).is_err());
        assert!(response_spectrum(&w, &[1.0], 1.0).is_err());
    }

    #[test]
    fn test_short_period_equals_peak_input() {
        let w = sine_record(1.0, 0.35, 0.01, 5.0);
        let spectrum = response_spectrum(&w, &[0.005, 0.5], 0.05).unwrap();
        assert!((spectrum.sa[0] - w.peak_abs()).abs() < 1e-12);
        assert!((spectrum.sv[0]).abs() < 1e-12);
        assert!((spectrum.sd[0]).abs() < 1e-12);
    }

    #[test]
    fn test_resonant_amplification() {
        // 1 g sine at 1 Hz for 10 s; a 1 s oscillator at 5% damping rings
        // up toward the 1/(2ζ) = 10× steady-state amplification
        let w = sine_record(1.0, 1.0, 0.01, 10.0);
        let spectrum = response_spectrum(&w, &[1.0], 0.05).unwrap();
        let sa = spectrum.sa[0];
        assert!(sa > 5.0, "resonant sa = {}", sa);
        assert!(sa < 15.0, "resonant sa = {}", sa);
    }

    #[test]
    fn test_off_resonance_is_weaker() {
        let w = sine_record(1.0, 1.0, 0.01, 10.0);
        let spectrum = response_spectrum(&w, &[0.2, 1.0, 5.0], 0.05).unwrap();
        assert!(spectrum.sa[1] > spectrum.sa[0]);
        assert!(spectrum.sa[1] > spectrum.sa[2]);
    }

    #[test]
    fn test_two_point_record_degenerate_but_finite() {
        let w = Waveform::from_series(vec![0.0, 0.01], vec![0.3, -0.2]).unwrap();
        let spectrum = response_spectrum(&w, &[0.5], 0.05).unwrap();
        assert!(spectrum.sa[0].is_finite());
        assert!(spectrum.sv[0].is_finite());
        assert!(spectrum.sd[0].is_finite());
    }

    #[test]
    fn test_multi_damping_ordering() {
        let w = sine_record(1.0, 1.0, 0.01, 10.0);
        let spectra = multi_damping_response_spectra(&w, &[1.0], &[0.02, 0.05, 0.20]).unwrap();
        assert_eq!(spectra.len(), 3);
        // More damping, less resonant response
        assert!(spectra[0].sa[0] > spectra[1].sa[0]);
        assert!(spectra[1].sa[0] > spectra[2].sa[0]);
    }

    #[test]
    fn test_default_periods_span() {
        let periods = default_periods();
        assert!(!periods.is_empty());
        assert!((periods[0] - MIN_PERIOD_S).abs() < 1e-9);
        assert!((periods.last().unwrap() - 10.0).abs() < 1e-6);
        assert!(periods.windows(2).all(|p| p[1] > p[0]));
    }
}
