//! Seismic waveform analysis engine.
//!
//! Ingests a digitized ground-motion time series and derives the
//! engineering quantities used in earthquake engineering: filtered
//! waveforms, integrated/differentiated motion, Fourier and power spectra,
//! SDOF response spectra, Arias intensity and significant duration,
//! baseline-corrected records, and synthetic ground motions.
//!
//! Everything is synchronous and stateless across calls: each analysis is
//! a pure function of its input `Waveform`, and every transform returns a
//! new record rather than mutating its input. The Fourier routines and the
//! per-period SDOF solver are O(n²) and O(n·|periods|); callers with long
//! records can fan work out across independent periods or damping ratios
//! without any locking.

pub mod data;
pub mod error;
pub mod pipeline;
pub mod provenance;

pub use data::csv::{to_csv, waveform_to_csv};
pub use data::vendor::{parse_vendor_text, read_vendor_file, VendorRecord};
pub use data::waveform::{Waveform, WaveformMetadata};
pub use error::{EngineError, Result};
pub use pipeline::baseline::correct_baseline;
pub use pipeline::calculus::{differentiate, integrate};
pub use pipeline::filters::{band_pass, high_pass, low_pass};
pub use pipeline::intensity::{
    arias_intensity_series, extract_parameters, IntensityParameters,
};
pub use pipeline::response::{
    default_periods, multi_damping_response_spectra, response_spectrum, ResponseSpectrum,
};
pub use pipeline::spectral::{
    fourier_spectrum, power_spectral_density, FourierSpectrum, PowerSpectrum,
};
pub use pipeline::synthetic::{generate_ground_motion, SiteClass, SyntheticGroundMotion};
pub use pipeline::{Pipeline, ProcessingOp};
pub use provenance::ProvenanceLog;
