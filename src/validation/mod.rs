// src/validation/mod.rs

//! Numeric sanity checks for states and operators.
//!
//! Both checks resolve the deferred scale factor before comparing, so an
//! operator stored as `[[1, 1], [1, -1]]` with scale 2 is unitary and a state
//! stored as `[1, 1]` with scale 2 is normalized.

use crate::core::{DEFAULT_TOLERANCE, Operator, QsimError, QsimResult, State};
use num_complex::Complex64;
use num_traits::Zero;

/// Checks that the state's normalized probabilities sum to 1.
///
/// # Arguments
/// * `state` - The `State` to check.
/// * `tolerance` - Allowed deviation from 1.0. Defaults to [`DEFAULT_TOLERANCE`].
///
/// # Errors
/// `NotNormalized` carrying the observed squared norm.
pub fn check_normalization(state: &State, tolerance: Option<f64>) -> QsimResult<()> {
    let tolerance = tolerance.unwrap_or(DEFAULT_TOLERANCE);
    let raw: f64 = state.raw_amplitudes().iter().map(|a| a.norm_sqr()).sum();
    let norm_sqr = raw / state.scale();
    if (norm_sqr - 1.0).abs() > tolerance || !norm_sqr.is_finite() {
        return Err(QsimError::NotNormalized { norm_sqr });
    }
    Ok(())
}

/// Checks that `U†U = scale · I` for the operator's stored matrix `U`.
///
/// The deviation is measured entrywise after dividing by the scale, so the
/// tolerance applies to the operator the matrix stands for.
///
/// # Errors
/// `NotUnitary` carrying the largest entrywise deviation.
pub fn check_unitary(op: &Operator, tolerance: Option<f64>) -> QsimResult<()> {
    let tolerance = tolerance.unwrap_or(DEFAULT_TOLERANCE);
    let dim = op.dimension();
    let scale = op.scale();
    let mut deviation = 0.0f64;
    for i in 0..dim {
        for j in 0..dim {
            let mut product = Complex64::zero();
            for k in 0..dim {
                product += op.entry(k, i).conj() * op.entry(k, j);
            }
            let expected = if i == j { scale } else { 0.0 };
            deviation = deviation.max((product - expected).norm() / scale);
        }
    }
    if deviation > tolerance || !deviation.is_finite() {
        return Err(QsimError::NotUnitary { deviation });
    }
    Ok(())
}

/// Runs every state check with default tolerances.
pub fn validate_state(state: &State) -> QsimResult<()> {
    check_normalization(state, None)?;
    Ok(())
}
