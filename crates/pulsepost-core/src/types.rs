//! Core types for the post-processing pipeline
//!
//! This module defines the fundamental data model shared by every pipeline
//! stage: time series, per-slice spatial profiles, the grouped record stream
//! coming out of the simulation database query, and the error taxonomy.
//!
//! All entities are produced by one stage and consumed read-only by the next.
//! Construction validates the structural invariants (equal lengths, strictly
//! increasing time) so downstream numeric code never has to re-check them.

use serde::{Deserialize, Serialize};

/// A floating point sample (for real-valued signals)
pub type Sample = f64;

/// Result type for pipeline operations
pub type PostResult<T> = Result<T, PostError>;

/// Errors that can occur while configuring or running the pipeline
#[derive(Debug, Clone, thiserror::Error)]
pub enum PostError {
    #[error("rise time must be positive, got {0:e} s")]
    NonPositiveRiseTime(f64),

    #[error("period must be positive, got {0:e} s")]
    NonPositivePeriod(f64),

    #[error("sample step must be positive, got {0:e} s")]
    NonPositiveStep(f64),

    #[error("empty sampling window: t_end {t_end:e} s must exceed t_start {t_start:e} s")]
    EmptyWindow { t_start: f64, t_end: f64 },

    #[error("duty cycle must lie in (0, 1], got {0}")]
    InvalidDutyCycle(f64),

    #[error("rise and fall ramps overlap: pulse width {pulse_width:e} s < 2 x rise time {rise_time:e} s")]
    OverlappingRamps { pulse_width: f64, rise_time: f64 },

    #[error("parameter `{0}` must be finite")]
    NonFiniteParameter(&'static str),

    #[error("time axis is not strictly increasing at index {index}")]
    NonMonotonicTime { index: usize },

    #[error("length mismatch: {times} time samples vs {values} values")]
    LengthMismatch { times: usize, values: usize },

    #[error("series too short: need at least {needed} samples, got {got}")]
    TooFewSamples { needed: usize, got: usize },

    #[error("spatial profile needs at least two points, got {0}")]
    DegenerateProfile(usize),

    #[error("non-uniform sample spacing at index {index}: gap {got:e} s, expected {expected:e} s")]
    NonUniformSpacing {
        index: usize,
        got: f64,
        expected: f64,
    },

    #[error("malformed record at line {line}: {message}")]
    MalformedRecord { line: u64, message: String },

    #[error("i/o error: {0}")]
    Io(String),
}

impl From<std::io::Error> for PostError {
    fn from(err: std::io::Error) -> Self {
        PostError::Io(err.to_string())
    }
}

/// An ordered sequence of (time, value) pairs with strictly increasing time.
///
/// Immutable once constructed; every pipeline stage that transforms a series
/// produces a fresh one. Times are in seconds, values are stage-dependent
/// (field integral in V, current in A, charge in C, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    times: Vec<f64>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Build a series, validating equal lengths and a strictly increasing
    /// time axis. A NaN anywhere in the time axis fails the monotonicity
    /// check and is rejected here rather than propagated.
    pub fn new(times: Vec<f64>, values: Vec<f64>) -> PostResult<Self> {
        if times.len() != values.len() {
            return Err(PostError::LengthMismatch {
                times: times.len(),
                values: values.len(),
            });
        }
        for i in 1..times.len() {
            if !(times[i] > times[i - 1]) {
                return Err(PostError::NonMonotonicTime { index: i });
            }
        }
        Ok(Self { times, values })
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate over (time, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times.iter().copied().zip(self.values.iter().copied())
    }

    /// Check uniform sampling and return the common step.
    ///
    /// The step is taken from the first interval; every other interval must
    /// match it within `rel_tolerance * step`. Needed by the spectral stage,
    /// where bin frequencies assume one global sample spacing.
    pub fn uniform_spacing(&self, rel_tolerance: f64) -> PostResult<f64> {
        if self.len() < 2 {
            return Err(PostError::TooFewSamples {
                needed: 2,
                got: self.len(),
            });
        }
        let step = self.times[1] - self.times[0];
        for i in 2..self.len() {
            let gap = self.times[i] - self.times[i - 1];
            if (gap - step).abs() > rel_tolerance * step {
                return Err(PostError::NonUniformSpacing {
                    index: i,
                    got: gap,
                    expected: step,
                });
            }
        }
        Ok(step)
    }
}

/// A spatial line profile belonging to exactly one time slice.
///
/// Positions are in meters along the lineout; the field unit is whatever the
/// queried database variable carries (V/m for an electric field component).
/// Position ordering is the caller's responsibility: the trapezoidal
/// integrator consumes the pairs in the order supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialProfile {
    positions: Vec<f64>,
    fields: Vec<f64>,
}

impl SpatialProfile {
    pub fn new(positions: Vec<f64>, fields: Vec<f64>) -> PostResult<Self> {
        if positions.len() != fields.len() {
            return Err(PostError::LengthMismatch {
                times: positions.len(),
                values: fields.len(),
            });
        }
        Ok(Self { positions, fields })
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    pub fn fields(&self) -> &[f64] {
        &self.fields
    }
}

/// One flat record from the database query: a field sample at one point of
/// one lineout at one time slice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldRecord {
    /// Simulation time of the slice, in seconds.
    pub time: f64,
    /// Position along the lineout, in meters.
    pub position: f64,
    /// Field value at that position.
    pub field: f64,
}

/// Spatial profiles grouped by time slice, in ascending time order.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedTimeSlices {
    slices: Vec<(f64, SpatialProfile)>,
}

impl GroupedTimeSlices {
    /// Group a flat record stream by exact time equality.
    ///
    /// Records are stably sorted by time, then runs of bitwise-identical time
    /// values become one profile each; within a slice the original record
    /// order is preserved. Grouping relies on the producer writing each
    /// slice's time identically for every row (the lineout query prints one
    /// time per slice, so equal strings parse to equal floats). Times that
    /// differ by even one ulp silently fragment into separate slices.
    pub fn from_records(mut records: Vec<FieldRecord>) -> Self {
        records.sort_by(|a, b| a.time.total_cmp(&b.time));

        let mut slices: Vec<(f64, SpatialProfile)> = Vec::new();
        let mut positions: Vec<f64> = Vec::new();
        let mut fields: Vec<f64> = Vec::new();
        let mut current_time: Option<f64> = None;

        for rec in records {
            match current_time {
                Some(t) if rec.time == t => {}
                Some(t) => {
                    slices.push((
                        t,
                        SpatialProfile {
                            positions: std::mem::take(&mut positions),
                            fields: std::mem::take(&mut fields),
                        },
                    ));
                    current_time = Some(rec.time);
                }
                None => current_time = Some(rec.time),
            }
            positions.push(rec.position);
            fields.push(rec.field);
        }
        if let Some(t) = current_time {
            slices.push((t, SpatialProfile { positions, fields }));
        }

        log::debug!("grouped record stream into {} time slices", slices.len());
        Self { slices }
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Iterate over (time, profile) pairs in ascending time order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &SpatialProfile)> + '_ {
        self.slices.iter().map(|(t, p)| (*t, p))
    }

    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.slices.iter().map(|(t, _)| *t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_series_rejects_length_mismatch() {
        let err = TimeSeries::new(vec![0.0, 1.0], vec![1.0]).unwrap_err();
        assert!(matches!(
            err,
            PostError::LengthMismatch { times: 2, values: 1 }
        ));
    }

    #[test]
    fn test_time_series_rejects_non_monotonic_time() {
        let err = TimeSeries::new(vec![0.0, 2.0, 1.0], vec![0.0; 3]).unwrap_err();
        assert!(matches!(err, PostError::NonMonotonicTime { index: 2 }));

        // Repeated times are not strictly increasing either
        let err = TimeSeries::new(vec![0.0, 1.0, 1.0], vec![0.0; 3]).unwrap_err();
        assert!(matches!(err, PostError::NonMonotonicTime { index: 2 }));
    }

    #[test]
    fn test_time_series_rejects_nan_time() {
        let err = TimeSeries::new(vec![0.0, f64::NAN, 2.0], vec![0.0; 3]).unwrap_err();
        assert!(matches!(err, PostError::NonMonotonicTime { .. }));
    }

    #[test]
    fn test_uniform_spacing_detects_jitter() {
        let series = TimeSeries::new(vec![0.0, 1.0, 2.0, 3.5], vec![0.0; 4]).unwrap();
        let err = series.uniform_spacing(1e-6).unwrap_err();
        assert!(matches!(err, PostError::NonUniformSpacing { index: 3, .. }));

        let series = TimeSeries::new(vec![0.0, 1.0, 2.0, 3.0], vec![0.0; 4]).unwrap();
        assert_eq!(series.uniform_spacing(1e-6).unwrap(), 1.0);
    }

    #[test]
    fn test_grouping_by_exact_time() {
        let records = vec![
            FieldRecord { time: 1.0, position: 0.0, field: 10.0 },
            FieldRecord { time: 1.0, position: 0.5, field: 11.0 },
            FieldRecord { time: 0.0, position: 0.0, field: 1.0 },
            FieldRecord { time: 0.0, position: 0.5, field: 2.0 },
            FieldRecord { time: 2.0, position: 0.0, field: 20.0 },
        ];
        let grouped = GroupedTimeSlices::from_records(records);
        assert_eq!(grouped.len(), 3);

        let times: Vec<f64> = grouped.times().collect();
        assert_eq!(times, vec![0.0, 1.0, 2.0]);

        let (_, first) = grouped.iter().next().unwrap();
        assert_eq!(first.positions(), &[0.0, 0.5]);
        assert_eq!(first.fields(), &[1.0, 2.0]);
    }

    #[test]
    fn test_grouping_preserves_within_slice_order() {
        // Positions deliberately not sorted; the order supplied must survive
        let records = vec![
            FieldRecord { time: 0.0, position: 0.9, field: 1.0 },
            FieldRecord { time: 0.0, position: 0.1, field: 2.0 },
        ];
        let grouped = GroupedTimeSlices::from_records(records);
        let (_, profile) = grouped.iter().next().unwrap();
        assert_eq!(profile.positions(), &[0.9, 0.1]);
    }

    #[test]
    fn test_grouping_empty_stream() {
        let grouped = GroupedTimeSlices::from_records(Vec::new());
        assert!(grouped.is_empty());
    }
}
