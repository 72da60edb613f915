//! Frequency-domain analysis: Fourier amplitude spectrum and smoothed
//! power spectral density.
//!
//! The record is zero-padded to the next power of two and transformed with
//! `rustfft`. The output keeps direct-DFT semantics: one-sided magnitudes
//! over `[0, Nyquist)` at resolution `fs/padded_len`, with the ×2 factor
//! folding in the negative-frequency half.

use num_complex::Complex;
use rustfft::FftPlanner;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::data::waveform::Waveform;

/// One-sided Fourier amplitude spectrum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FourierSpectrum {
    pub frequency: Vec<f64>,
    pub amplitude: Vec<f64>,
}

/// One-sided power spectral density.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerSpectrum {
    pub frequency: Vec<f64>,
    pub power: Vec<f64>,
}

/// Next power of two >= n.
pub fn next_power_of_two(n: usize) -> usize {
    let mut p = 1;
    while p < n {
        p <<= 1;
    }
    p
}

/// Zero-pad, transform, and return (padded length, one-sided raw magnitudes).
fn dft_magnitudes(samples: &[f64]) -> (usize, Vec<f64>) {
    let padded = next_power_of_two(samples.len());
    let mut buffer: Vec<Complex<f64>> =
        samples.iter().map(|&v| Complex::new(v, 0.0)).collect();
    buffer.resize(padded, Complex::new(0.0, 0.0));

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(padded);
    fft.process(&mut buffer);

    let magnitudes = buffer[..padded / 2].iter().map(|c| c.norm()).collect();
    (padded, magnitudes)
}

/// Fourier amplitude spectrum over `[0, Nyquist)`.
pub fn fourier_spectrum(waveform: &Waveform) -> FourierSpectrum {
    let fs = waveform.sample_rate();
    let (padded, magnitudes) = dft_magnitudes(&waveform.amplitude);
    let resolution = fs / padded as f64;

    let frequency = (0..magnitudes.len())
        .map(|k| k as f64 * resolution)
        .collect();
    let amplitude = magnitudes
        .iter()
        .map(|m| 2.0 * m / padded as f64)
        .collect();

    FourierSpectrum {
        frequency,
        amplitude,
    }
}

/// Hann-windowed power spectral density with optional smoothing.
///
/// Power is `magnitude²/(fs·padded_len)`. A positive `smoothing_factor`
/// applies a centered moving average whose window is
/// `max(3, round(bins·smoothing_factor·0.1))`.
pub fn power_spectral_density(waveform: &Waveform, smoothing_factor: f64) -> PowerSpectrum {
    let n = waveform.len();
    let fs = waveform.sample_rate();

    let windowed: Vec<f64> = waveform
        .amplitude
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let hann = 0.5 * (1.0 - (2.0 * PI * i as f64 / (n as f64 - 1.0)).cos());
            v * hann
        })
        .collect();

    let (padded, magnitudes) = dft_magnitudes(&windowed);
    let resolution = fs / padded as f64;
    let frequency: Vec<f64> = (0..magnitudes.len())
        .map(|k| k as f64 * resolution)
        .collect();

    let mut power: Vec<f64> = magnitudes
        .iter()
        .map(|m| m * m / (fs * padded as f64))
        .collect();

    if smoothing_factor > 0.0 {
        let window = smoothing_window(power.len(), smoothing_factor);
        power = centered_moving_average(&power, window);
    }

    PowerSpectrum { frequency, power }
}

fn smoothing_window(bins: usize, smoothing_factor: f64) -> usize {
    ((bins as f64 * smoothing_factor * 0.1).round() as usize).max(3)
}

/// Moving average centered on each bin; the window shrinks at the edges.
fn centered_moving_average(values: &[f64], window: usize) -> Vec<f64> {
    let half = window / 2;
    (0..values.len())
        .map(|i| {
            let lo = i.saturating_sub(half);
            let hi = (i + half + 1).min(values.len());
            values[lo..hi].iter().sum::<f64>() / (hi - lo) as f64
        })
        .collect()
}
