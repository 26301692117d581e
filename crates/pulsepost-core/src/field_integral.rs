//! Spatial Field Integration
//!
//! Collapses each time slice's spatial line profile into one scalar: the
//! definite integral of the field over position, by the trapezoidal rule.
//! Applied across a grouped record stream this turns (time, position, field)
//! triplets into a single integrated-field time series, the quantity whose
//! time derivative drives the displacement current.

use crate::types::{GroupedTimeSlices, PostError, PostResult, SpatialProfile, TimeSeries};

/// Trapezoidal integral of field over position, in the order supplied.
///
/// Fails on fewer than two points; a single sample spans no interval and the
/// integral is undefined.
pub fn trapezoid(profile: &SpatialProfile) -> PostResult<f64> {
    let n = profile.len();
    if n < 2 {
        return Err(PostError::DegenerateProfile(n));
    }
    let x = profile.positions();
    let f = profile.fields();

    let mut acc = 0.0;
    for i in 1..n {
        acc += 0.5 * (f[i] + f[i - 1]) * (x[i] - x[i - 1]);
    }
    Ok(acc)
}

/// Integrate every time slice, producing the integrated-field series.
///
/// Slices are independent of each other; the output preserves the grouped
/// stream's ascending time order. Any degenerate slice aborts the whole
/// call.
pub fn integrate_slices(slices: &GroupedTimeSlices) -> PostResult<TimeSeries> {
    log::debug!("integrating {} spatial profiles", slices.len());

    let mut times = Vec::with_capacity(slices.len());
    let mut values = Vec::with_capacity(slices.len());
    for (time, profile) in slices.iter() {
        times.push(time);
        values.push(trapezoid(profile)?);
    }
    TimeSeries::new(times, values)
}
