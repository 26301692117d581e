//! Current Derivation and Charge Accumulation
//!
//! Converts the integrated-field series into a physical current,
//!
//! ```text
//! i(t) = permittivity * depth * d/dt  integral E dx
//! ```
//!
//! and accumulates the transferred charge over time. The permittivity is
//! typically `EPSILON_0` times a caller-chosen relative permittivity; the
//! depth factor accounts for the geometry the lineout was cut through. Both
//! are opaque scale constants here, only required to be finite.

use crate::gradient::gradient;
use crate::types::{PostError, PostResult, TimeSeries};

/// Vacuum permittivity in F/m (CODATA 2018).
pub const EPSILON_0: f64 = 8.8541878128e-12;

/// Scale the time derivative of the integrated field into a current series.
pub fn derive_current(
    integrated_field: &TimeSeries,
    permittivity: f64,
    depth: f64,
) -> PostResult<TimeSeries> {
    if !permittivity.is_finite() {
        return Err(PostError::NonFiniteParameter("permittivity"));
    }
    if !depth.is_finite() {
        return Err(PostError::NonFiniteParameter("depth"));
    }

    let deriv = gradient(integrated_field)?;
    let scale = permittivity * depth;
    let values = deriv.values().iter().map(|v| scale * v).collect();
    TimeSeries::new(deriv.times().to_vec(), values)
}

/// Cumulative charge transferred by a current series.
///
/// `charge[0] = 0` and `charge[i] = charge[i-1] + current[i-1] * dt[i]`, a
/// left-rectangle rule over each interval. This deliberately reproduces the
/// reference pipeline's accumulation, which is cruder than the trapezoidal
/// rule used for the spatial integral; changing it would change published
/// charge numbers.
pub fn accumulate_charge(current: &TimeSeries) -> PostResult<TimeSeries> {
    let n = current.len();
    if n < 1 {
        return Err(PostError::TooFewSamples { needed: 1, got: 0 });
    }
    let t = current.times();
    let c = current.values();

    let mut charge = Vec::with_capacity(n);
    charge.push(0.0);
    for i in 1..n {
        let q = charge[i - 1] + c[i - 1] * (t[i] - t[i - 1]);
        charge.push(q);
    }
    TimeSeries::new(t.to_vec(), charge)
}
