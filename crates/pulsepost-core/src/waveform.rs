//! Periodic Smooth Pulse Synthesis
//!
//! Generates the excitation waveform driving a pulsed-field simulation: a
//! periodic square-ish pulse whose edges are raised-cosine ramps instead of
//! hard steps. The ramp has zero slope at both ends, so the synthesized
//! signal is continuously differentiable everywhere and a spectrum of the
//! drive does not pick up the broadband content a discontinuity would inject.
//!
//! ## Pulse Shape
//!
//! ```text
//! amplitude ┤      ________________
//!           │     /                \
//!           │    /                  \
//!         0 ┤___/                    \___________
//!           └───┬────────────────┬───┬──────────── t (one period)
//!               rise         width   width+rise
//! ```
//!
//! ## Example
//!
//! ```rust
//! use pulsepost_core::waveform::{self, PulseConfig, PulseWidth};
//!
//! let config = PulseConfig {
//!     t_end: 120e-9,
//!     period: 60e-9,
//!     width: PulseWidth::DutyCycle(0.5),
//!     rise_time: 10e-9,
//!     ..Default::default()
//! };
//!
//! let pulse = waveform::generate(&config).unwrap();
//! // Halfway up the first ramp the value is exactly half the amplitude
//! let mid = (5e-9 / config.dt).round() as usize;
//! assert!((pulse.values()[mid] - 0.5).abs() < 1e-12);
//! ```

use crate::types::{PostError, PostResult, TimeSeries};
use std::f64::consts::PI;

/// How the high portion of the pulse is specified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PulseWidth {
    /// Fraction of the period spent high, in (0, 1].
    DutyCycle(f64),
    /// Absolute plateau-plus-rise duration in seconds.
    Seconds(f64),
}

impl PulseWidth {
    /// Resolve to an absolute width in seconds for the given period.
    pub fn resolve(self, period: f64) -> f64 {
        match self {
            PulseWidth::DutyCycle(d) => period * d,
            PulseWidth::Seconds(w) => w,
        }
    }
}

/// Shape parameters for the synthesized pulse train.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseConfig {
    /// Start of the sampling window in seconds. Default: 0
    pub t_start: f64,
    /// End of the sampling window in seconds (exclusive). Default: 110 ns
    pub t_end: f64,
    /// Sample step in seconds. Default: 1 ps
    pub dt: f64,
    /// Repetition period in seconds. Default: 60 ns
    pub period: f64,
    /// Pulse width specification. Default: 50% duty cycle
    pub width: PulseWidth,
    /// Rise/fall ramp duration in seconds. Default: 10 ns
    pub rise_time: f64,
    /// Peak amplitude. Default: 1.0
    pub amplitude: f64,
    /// DC offset added to every sample. Default: 0.0
    pub offset: f64,
    /// Phase shift in seconds; may be negative. Default: 0.0
    pub phase_shift: f64,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            t_start: 0.0,
            t_end: 110e-9,
            dt: 1e-12,
            period: 60e-9,
            width: PulseWidth::DutyCycle(0.5),
            rise_time: 10e-9,
            amplitude: 1.0,
            offset: 0.0,
            phase_shift: 0.0,
        }
    }
}

impl PulseConfig {
    /// Absolute pulse width in seconds.
    pub fn pulse_width(&self) -> f64 {
        self.width.resolve(self.period)
    }

    /// Validate all shape invariants, failing fast on the first violation.
    pub fn validate(&self) -> PostResult<()> {
        for (name, value) in [
            ("t_start", self.t_start),
            ("t_end", self.t_end),
            ("dt", self.dt),
            ("period", self.period),
            ("rise_time", self.rise_time),
            ("amplitude", self.amplitude),
            ("offset", self.offset),
            ("phase_shift", self.phase_shift),
            ("pulse_width", self.pulse_width()),
        ] {
            if !value.is_finite() {
                return Err(PostError::NonFiniteParameter(name));
            }
        }
        if !(self.dt > 0.0) {
            return Err(PostError::NonPositiveStep(self.dt));
        }
        if !(self.period > 0.0) {
            return Err(PostError::NonPositivePeriod(self.period));
        }
        if !(self.rise_time > 0.0) {
            return Err(PostError::NonPositiveRiseTime(self.rise_time));
        }
        if !(self.t_end > self.t_start) {
            return Err(PostError::EmptyWindow {
                t_start: self.t_start,
                t_end: self.t_end,
            });
        }
        if let PulseWidth::DutyCycle(d) = self.width {
            if !(d > 0.0 && d <= 1.0) {
                return Err(PostError::InvalidDutyCycle(d));
            }
        }
        let width = self.pulse_width();
        if width < 2.0 * self.rise_time {
            return Err(PostError::OverlappingRamps {
                pulse_width: width,
                rise_time: self.rise_time,
            });
        }
        Ok(())
    }
}

/// Smooth transition from 0 at `t0` to 1 at `t1`.
///
/// Monotonically increasing on (t0, t1) with zero derivative at both
/// endpoints, which is what makes the assembled pulse C1 at every ramp
/// boundary.
pub fn raised_cosine(t: f64, t0: f64, t1: f64) -> f64 {
    0.5 * (1.0 - (PI * (t - t0) / (t1 - t0)).cos())
}

/// Synthesize the pulse train over [t_start, t_end) at step dt.
///
/// Each sample's position within its period comes from a floor modulo, so
/// the wrapped time lands in [0, period) for any sign of the phase shift.
/// Four disjoint intervals then decide the value: rising ramp, plateau,
/// falling ramp, and zero floor.
pub fn generate(config: &PulseConfig) -> PostResult<TimeSeries> {
    config.validate()?;

    let width = config.pulse_width();
    let n_hint = ((config.t_end - config.t_start) / config.dt) as usize;
    let mut times = Vec::with_capacity(n_hint + 1);
    let mut values = Vec::with_capacity(n_hint + 1);

    let mut i = 0usize;
    loop {
        let t = config.t_start + i as f64 * config.dt;
        if t >= config.t_end {
            break;
        }
        let t_in_period = (t - config.phase_shift).rem_euclid(config.period);

        let shape = if t_in_period < config.rise_time {
            raised_cosine(t_in_period, 0.0, config.rise_time)
        } else if t_in_period < width {
            1.0
        } else if t_in_period < width + config.rise_time {
            1.0 - raised_cosine(t_in_period, width, width + config.rise_time)
        } else {
            0.0
        };

        times.push(t);
        values.push(config.amplitude * shape + config.offset);
        i += 1;
    }

    TimeSeries::new(times, values)
}
