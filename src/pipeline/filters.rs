//! Recursive IIR filters.
//!
//! The adaptive single-pole filters take their coefficient from the cutoff
//! frequency normalized to Nyquist, so they follow whatever sample rate the
//! record carries. The fixed-coefficient band-pass at the bottom is a
//! separate design used only for shaping synthetic noise; the two are not
//! numerically equivalent and are kept apart on purpose.

use crate::data::waveform::Waveform;
use crate::error::{EngineError, Result};

/// Single-pole recursive low-pass.
///
/// `y[0] = x[0]`, `y[n] = α·x[n] + (1−α)·y[n−1]` with
/// `α = f_n/(f_n + 1)` and `f_n` the cutoff normalized to Nyquist.
pub fn low_pass(waveform: &Waveform, cutoff_hz: f64) -> Result<Waveform> {
    if cutoff_hz <= 0.0 {
        return Err(EngineError::InvalidParameter(format!(
            "low-pass cutoff must be positive, got {}",
            cutoff_hz
        )));
    }
    let nyquist = waveform.sample_rate() / 2.0;
    let f_n = cutoff_hz / nyquist;
    if f_n >= 1.0 {
        log::warn!(
            "low-pass cutoff {} Hz is at or above Nyquist ({} Hz); filter will pass through",
            cutoff_hz,
            nyquist
        );
    }
    let alpha = f_n / (f_n + 1.0);

    let x = &waveform.amplitude;
    let mut y = Vec::with_capacity(x.len());
    y.push(x[0]);
    for n in 1..x.len() {
        y.push(alpha * x[n] + (1.0 - alpha) * y[n - 1]);
    }

    Ok(waveform.derived(
        y,
        waveform.metadata.units.clone(),
        &format!("Low-pass filter ({} Hz)", cutoff_hz),
    ))
}

/// Complementary single-pole high-pass.
///
/// `y[n] = α·(y[n−1] + x[n] − x[n−1])` with `α = 1/(1 + f_n)`.
pub fn high_pass(waveform: &Waveform, cutoff_hz: f64) -> Result<Waveform> {
    if cutoff_hz <= 0.0 {
        return Err(EngineError::InvalidParameter(format!(
            "high-pass cutoff must be positive, got {}",
            cutoff_hz
        )));
    }
    let nyquist = waveform.sample_rate() / 2.0;
    let f_n = cutoff_hz / nyquist;
    let alpha = 1.0 / (1.0 + f_n);

    let x = &waveform.amplitude;
    let mut y = Vec::with_capacity(x.len());
    y.push(x[0]);
    for n in 1..x.len() {
        y.push(alpha * (y[n - 1] + x[n] - x[n - 1]));
    }

    Ok(waveform.derived(
        y,
        waveform.metadata.units.clone(),
        &format!("High-pass filter ({} Hz)", cutoff_hz),
    ))
}

/// Band-pass as a composition: high-pass at `low_hz`, then low-pass at
/// `high_hz`.
pub fn band_pass(waveform: &Waveform, low_hz: f64, high_hz: f64) -> Result<Waveform> {
    if low_hz >= high_hz {
        return Err(EngineError::InvalidParameter(format!(
            "band-pass requires low < high, got {} >= {}",
            low_hz, high_hz
        )));
    }
    let highpassed = high_pass(waveform, low_hz)?;
    low_pass(&highpassed, high_hz)
}

// =========================================================================
//  Fixed-coefficient shaping band-pass
// =========================================================================

// 4th-order band-pass tuned for 100 Hz sampling, passband roughly 2–8 Hz.
// Poles sit at radius 0.95, so the recursion is stable for any input.
const SHAPING_B: [f64; 5] = [0.0201, 0.0, -0.0402, 0.0, 0.0201];
const SHAPING_A: [f64; 5] = [1.0, -3.5500, 4.9435, -3.2039, 0.8145];

/// Direct-form recursive band-pass with literal coefficients.
///
/// Used by the synthetic generator to give white noise a ground-motion-like
/// frequency content. Distinct from the adaptive filters above: the
/// coefficients do not adapt to the sample rate.
pub fn shaping_band_pass(samples: &[f64]) -> Vec<f64> {
    let mut y = vec![0.0; samples.len()];
    for n in 0..samples.len() {
        let mut acc = 0.0;
        for (k, b) in SHAPING_B.iter().enumerate() {
            if n >= k {
                acc += b * samples[n - k];
            }
        }
        for (k, a) in SHAPING_A.iter().enumerate().skip(1) {
            if n >= k {
                acc -= a * y[n - k];
            }
        }
        y[n] = acc;
    }
    y
}
