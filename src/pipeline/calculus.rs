//! Time-domain calculus: trapezoidal integration and central-difference
//! differentiation, the two directions of the accel ↔ vel ↔ disp chain.

use crate::data::waveform::{differentiated_units, integrated_units, Waveform};

/// Trapezoidal integration with an explicit starting value.
///
/// `y[0] = initial_value`, `y[i] = y[i−1] + dt/2·(x[i] + x[i−1])`.
/// Units move one step down the chain (acceleration → velocity,
/// velocity → displacement), falling back to `"<units>·s"` when the
/// mapping is unknown.
pub fn integrate(waveform: &Waveform, initial_value: f64) -> Waveform {
    let dt = waveform.dt();
    let x = &waveform.amplitude;
    let mut y = Vec::with_capacity(x.len());
    y.push(initial_value);
    for i in 1..x.len() {
        y.push(y[i - 1] + dt / 2.0 * (x[i] + x[i - 1]));
    }

    let units = integrated_units(&waveform.metadata.units);
    waveform.derived(y, units, "Trapezoidal integration")
}

/// Central-difference differentiation.
///
/// Interior points use `(x[i+1] − x[i−1])/(2·dt)`; the two boundary points
/// use one-sided differences. Units move one step up the chain.
pub fn differentiate(waveform: &Waveform) -> Waveform {
    let dt = waveform.dt();
    let x = &waveform.amplitude;
    let n = x.len();
    let mut y = Vec::with_capacity(n);

    y.push((x[1] - x[0]) / dt);
    for i in 1..n - 1 {
        y.push((x[i + 1] - x[i - 1]) / (2.0 * dt));
    }
    y.push((x[n - 1] - x[n - 2]) / dt);

    let units = differentiated_units(&waveform.metadata.units);
    waveform.derived(y, units, "Central-difference differentiation")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::waveform::WaveformMetadata;
    use std::f64::consts::PI;

    fn sine_wave(freq_hz: f64, dt: f64, n: usize, units: &str) -> Waveform {
        let time: Vec<f64> = (0..n).map(|i| i as f64 * dt).collect();
        let amplitude: Vec<f64> = time.iter().map(|&t| (2.0 * PI * freq_hz * t).sin()).collect();
        let mut meta = WaveformMetadata::default();
        meta.units = units.to_string();
        Waveform::new(time, amplitude, meta).unwrap()
    }

    #[test]
    fn test_integrate_constant() {
        let w = Waveform::from_series(vec![0.0, 0.1, 0.2, 0.3], vec![2.0; 4]).unwrap();
        let integrated = integrate(&w, 0.0);
        // ∫2 dt over 0.3 s = 0.6
        assert!((integrated.amplitude[3] - 0.6).abs() < 1e-12);
        assert!((integrated.amplitude[0]).abs() < 1e-12);
    }

    #[test]
    fn test_integrate_respects_initial_value() {
        let w = Waveform::from_series(vec![0.0, 0.1], vec![0.0, 0.0]).unwrap();
        let integrated = integrate(&w, 5.0);
        assert!((integrated.amplitude[0] - 5.0).abs() < 1e-12);
        assert!((integrated.amplitude[1] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_differentiate_linear_ramp() {
        let time: Vec<f64> = (0..10).map(|i| i as f64 * 0.1).collect();
        let amplitude: Vec<f64> = time.iter().map(|&t| 3.0 * t).collect();
        let w = Waveform::from_series(time, amplitude).unwrap();
        let derivative = differentiate(&w);
        for v in &derivative.amplitude {
            assert!((v - 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_round_trip_recovers_waveform() {
        let w = sine_wave(5.0, 0.001, 2000, "m/s2");
        let round_trip = differentiate(&integrate(&w, 0.0));
        // Interior points agree to discretization error; amplitude is 1
        for i in 1..w.len() - 1 {
            assert!(
                (round_trip.amplitude[i] - w.amplitude[i]).abs() < 1e-2,
                "mismatch at {}: {} vs {}",
                i,
                round_trip.amplitude[i],
                w.amplitude[i]
            );
        }
    }

    #[test]
    fn test_unit_chain() {
        let w = sine_wave(1.0, 0.01, 100, "m/s2");
        let vel = integrate(&w, 0.0);
        assert_eq!(vel.metadata.units, "m/s");
        let disp = integrate(&vel, 0.0);
        assert_eq!(disp.metadata.units, "m");
        let back = differentiate(&disp);
        assert_eq!(back.metadata.units, "m/s");
        // History accumulated one entry per transform
        assert_eq!(back.metadata.processing.len(), 3);
    }
}
