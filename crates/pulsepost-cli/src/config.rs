//! TOML job configuration.
//!
//! One file describes a whole post-processing run: the waveform shape, the
//! physical scale constants for the current derivation, and the spectral
//! analysis knobs. Every field has a default matching the reference run, so
//! a minimal job file only overrides what differs.
//!
//! ```toml
//! [waveform]
//! t_end = 110e-9
//! period = 60e-9
//! duty_cycle = 0.5
//! rise_time = 10e-9
//!
//! [physical]
//! relative_permittivity = 1.0
//! depth = 0.003
//!
//! [spectrum]
//! window = "blackman"
//! head_trim = 0
//! tail_trim = 0
//! ```

use anyhow::{bail, Context, Result};
use pulsepost_core::spectrum::{SpectrumConfig, WindowKind};
use pulsepost_core::waveform::{PulseConfig, PulseWidth};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    #[serde(default)]
    pub waveform: WaveformSection,
    #[serde(default)]
    pub physical: PhysicalSection,
    #[serde(default)]
    pub spectrum: SpectrumSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WaveformSection {
    #[serde(default)]
    pub t_start: f64,
    #[serde(default = "default_t_end")]
    pub t_end: f64,
    #[serde(default = "default_dt")]
    pub dt: f64,
    #[serde(default = "default_period")]
    pub period: f64,
    /// Fraction of the period spent high. Mutually exclusive with
    /// `pulse_width`.
    #[serde(default)]
    pub duty_cycle: Option<f64>,
    /// Absolute pulse width in seconds. Mutually exclusive with
    /// `duty_cycle`.
    #[serde(default)]
    pub pulse_width: Option<f64>,
    #[serde(default = "default_rise_time")]
    pub rise_time: f64,
    #[serde(default = "default_amplitude")]
    pub amplitude: f64,
    #[serde(default)]
    pub offset: f64,
    #[serde(default)]
    pub phase_shift: f64,
}

impl Default for WaveformSection {
    fn default() -> Self {
        Self {
            t_start: 0.0,
            t_end: default_t_end(),
            dt: default_dt(),
            period: default_period(),
            duty_cycle: None,
            pulse_width: None,
            rise_time: default_rise_time(),
            amplitude: default_amplitude(),
            offset: 0.0,
            phase_shift: 0.0,
        }
    }
}

impl WaveformSection {
    pub fn to_pulse_config(&self) -> Result<PulseConfig> {
        let width = match (self.duty_cycle, self.pulse_width) {
            (Some(_), Some(_)) => {
                bail!("waveform: duty_cycle and pulse_width are mutually exclusive")
            }
            (Some(d), None) => PulseWidth::DutyCycle(d),
            (None, Some(w)) => PulseWidth::Seconds(w),
            (None, None) => PulseWidth::DutyCycle(0.5),
        };
        let config = PulseConfig {
            t_start: self.t_start,
            t_end: self.t_end,
            dt: self.dt,
            period: self.period,
            width,
            rise_time: self.rise_time,
            amplitude: self.amplitude,
            offset: self.offset,
            phase_shift: self.phase_shift,
        };
        config.validate().context("waveform configuration")?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhysicalSection {
    /// Relative permittivity of the medium; multiplied onto epsilon_0.
    #[serde(default = "default_one")]
    pub relative_permittivity: f64,
    /// Geometric depth factor in meters.
    #[serde(default = "default_one")]
    pub depth: f64,
}

impl Default for PhysicalSection {
    fn default() -> Self {
        Self {
            relative_permittivity: 1.0,
            depth: 1.0,
        }
    }
}

impl PhysicalSection {
    /// Absolute permittivity in F/m.
    pub fn permittivity(&self) -> f64 {
        pulsepost_core::EPSILON_0 * self.relative_permittivity
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpectrumSection {
    #[serde(default = "default_window")]
    pub window: WindowKind,
    #[serde(default)]
    pub head_trim: usize,
    #[serde(default)]
    pub tail_trim: usize,
    #[serde(default = "default_spacing_tolerance")]
    pub spacing_tolerance: f64,
}

impl Default for SpectrumSection {
    fn default() -> Self {
        Self {
            window: default_window(),
            head_trim: 0,
            tail_trim: 0,
            spacing_tolerance: default_spacing_tolerance(),
        }
    }
}

impl SpectrumSection {
    pub fn to_spectrum_config(&self) -> SpectrumConfig {
        SpectrumConfig {
            window: self.window,
            head_trim: self.head_trim,
            tail_trim: self.tail_trim,
            spacing_tolerance: self.spacing_tolerance,
            ..Default::default()
        }
    }
}

fn default_t_end() -> f64 {
    110e-9
}
fn default_dt() -> f64 {
    1e-12
}
fn default_period() -> f64 {
    60e-9
}
fn default_rise_time() -> f64 {
    10e-9
}
fn default_amplitude() -> f64 {
    1.0
}
fn default_one() -> f64 {
    1.0
}
fn default_window() -> WindowKind {
    WindowKind::Blackman
}
fn default_spacing_tolerance() -> f64 {
    1e-6
}

/// Load and validate a job configuration file.
pub fn load_config(path: &Path) -> Result<JobConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let job: JobConfig = toml::from_str(&text)
        .with_context(|| format!("parsing config file {}", path.display()))?;
    job.waveform.to_pulse_config()?;
    Ok(job)
}
