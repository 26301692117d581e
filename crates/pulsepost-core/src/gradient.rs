//! Discrete Time Derivative
//!
//! Numerical gradient of a time series: central differences at interior
//! samples, one-sided differences at the two boundary samples. Same length
//! and time axis as the input.

use crate::types::{PostError, PostResult, TimeSeries};

/// Differentiate a series with respect to its own time axis.
///
/// Interior samples use `(v[i+1] - v[i-1]) / (t[i+1] - t[i-1])`; the first
/// and last samples fall back to forward and backward differences. The time
/// axis need not be uniform. Fails on fewer than two samples.
pub fn gradient(series: &TimeSeries) -> PostResult<TimeSeries> {
    let n = series.len();
    if n < 2 {
        return Err(PostError::TooFewSamples { needed: 2, got: n });
    }
    let t = series.times();
    let v = series.values();

    let mut out = vec![0.0; n];
    out[0] = (v[1] - v[0]) / (t[1] - t[0]);
    out[n - 1] = (v[n - 1] - v[n - 2]) / (t[n - 1] - t[n - 2]);
    for i in 1..n - 1 {
        out[i] = (v[i + 1] - v[i - 1]) / (t[i + 1] - t[i - 1]);
    }

    TimeSeries::new(t.to_vec(), out)
}
