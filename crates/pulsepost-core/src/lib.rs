//! # Pulsepost Core
//!
//! Numeric post-processing for pulsed-field simulations. The crate does two
//! things: it synthesizes the periodic, smoothly-ramped excitation waveform
//! that drives a simulation, and it turns a simulated electric-field line
//! profile, sampled at discrete time slices, into a displacement current,
//! its accumulated charge, and a single-sided amplitude spectrum.
//!
//! ## Pipeline
//!
//! ```text
//! (time, position, field) records
//!        │ group by time slice
//!        ▼
//! spatial profiles ──trapezoid──▶ integrated field ──d/dt──▶ current
//!                                                              │
//!                                              ┌───────────────┤
//!                                              ▼               ▼
//!                                           charge          spectrum
//! ```
//!
//! The waveform synthesizer is independent of that chain; its output feeds
//! external plotting and comparison only.
//!
//! ## Example
//!
//! ```rust
//! use pulsepost_core::current::{accumulate_charge, derive_current, EPSILON_0};
//! use pulsepost_core::field_integral::integrate_slices;
//! use pulsepost_core::types::{FieldRecord, GroupedTimeSlices};
//!
//! // A toy record stream: three time slices of a two-point lineout
//! let mut records = Vec::new();
//! for (i, time) in [0.0, 1e-9, 2e-9].into_iter().enumerate() {
//!     for position in [0.0, 0.01] {
//!         records.push(FieldRecord { time, position, field: 1e5 * i as f64 });
//!     }
//! }
//!
//! let slices = GroupedTimeSlices::from_records(records);
//! let integrated = integrate_slices(&slices).unwrap();
//! let current = derive_current(&integrated, EPSILON_0, 1.0).unwrap();
//! let charge = accumulate_charge(&current).unwrap();
//! assert_eq!(charge.values()[0], 0.0);
//! ```
//!
//! All stages are pure, synchronous, batch computations over fully
//! materialized arrays; each validates its input eagerly and fails with a
//! specific [`types::PostError`] rather than propagating NaN or Inf.

pub mod current;
pub mod field_integral;
pub mod gradient;
pub mod io;
pub mod spectrum;
pub mod types;
pub mod waveform;

pub use current::{accumulate_charge, derive_current, EPSILON_0};
pub use field_integral::{integrate_slices, trapezoid};
pub use gradient::gradient;
pub use spectrum::{Spectrum, SpectrumConfig, WindowKind};
pub use types::{
    FieldRecord, GroupedTimeSlices, PostError, PostResult, SpatialProfile, TimeSeries,
};
pub use waveform::{generate, raised_cosine, PulseConfig, PulseWidth};
