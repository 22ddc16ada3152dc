//! Window primitives shared by the indicator engines.

use crate::error::{Result, SignalError};

/// Denominators at or below this magnitude are treated as zero.
pub const ZERO_TOLERANCE: f64 = 1e-12;

/// Divide, yielding 0 when the denominator is zero (or not finite).
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator.abs() <= ZERO_TOLERANCE || !denominator.is_finite() {
        0.0
    } else {
        numerator / denominator
    }
}

/// True when a dispersion measure is indistinguishable from zero at the
/// magnitude of `reference`. Summation rounding on a constant window leaves
/// residue around `1e-14 * reference`, which must not be divided by.
pub fn is_flat(dispersion: f64, reference: f64) -> bool {
    dispersion.abs() <= ZERO_TOLERANCE * reference.abs().max(1.0)
}

fn check_period(name: &'static str, period: usize) -> Result<()> {
    if period == 0 {
        return Err(SignalError::invalid_period(name, period));
    }
    Ok(())
}

/// Simple moving average. Indices before `period - 1` are `None`.
pub fn sma(values: &[f64], period: usize) -> Result<Vec<Option<f64>>> {
    check_period("sma", period)?;

    let mut result = vec![None; values.len()];
    let mut sum = 0.0;
    for (i, value) in values.iter().enumerate() {
        sum += value;
        if i >= period {
            sum -= values[i - period];
        }
        if i + 1 >= period {
            result[i] = Some(sum / period as f64);
        }
    }
    Ok(result)
}

/// Wilder's running accumulator.
///
/// Index `period - 1` holds the plain sum of the first `period` values; each
/// later index is `prev - prev / period + value`. Earlier indices are 0. The
/// result is a running sum, not an average: divide by `period` where an
/// average is wanted.
pub fn wilder_smooth(values: &[f64], period: usize) -> Result<Vec<f64>> {
    check_period("wilder_smooth", period)?;

    let mut result = vec![0.0; values.len()];
    if values.len() < period {
        return Ok(result);
    }

    let mut acc: f64 = values[..period].iter().sum();
    result[period - 1] = acc;
    for i in period..values.len() {
        acc = acc - acc / period as f64 + values[i];
        result[i] = acc;
    }
    Ok(result)
}

/// Population standard deviation over each trailing window, around the
/// matching mean in `means` (normally the output of [`sma`]).
pub fn std_dev(values: &[f64], period: usize, means: &[Option<f64>]) -> Result<Vec<Option<f64>>> {
    check_period("std_dev", period)?;

    let result = values
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if i + 1 < period {
                return None;
            }
            let mean = (*means.get(i)?)?;
            let window = &values[i + 1 - period..=i];
            let variance =
                window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / period as f64;
            Some(variance.sqrt())
        })
        .collect();
    Ok(result)
}

/// Mean absolute deviation of `window` around `mean`.
pub fn mean_deviation(window: &[f64], mean: f64) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    window.iter().map(|v| (v - mean).abs()).sum::<f64>() / window.len() as f64
}
