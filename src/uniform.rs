//! Classical Savitzky-Golay coefficients for evenly spaced samples.
//!
//! On a uniform grid every window has the same geometry, so one coefficient
//! vector serves the whole signal. The non-uniform filter must agree with this
//! reference on evenly spaced input.

use nalgebra::{DMatrix, DVector};

use crate::error::{Result, SavGolError};
use crate::filter::window_size_for;
use crate::linalg::MAX_DEGREE;

/// Computes uniform-grid Savitzky-Golay coefficients in physical units.
///
/// Solves `AᵗA c = derivative! · e_derivative` by LU on integer offsets, then
/// divides by `delta^derivative` so the coefficients approximate the
/// derivative in physical units.
///
/// # Arguments
///
/// * `half_window` - Half-window radius `n`; the window holds `2n + 1` samples
/// * `degree` - Degree of the polynomial to fit (must be < `2n + 1`)
/// * `derivative` - Order of derivative to compute (0 for smoothing)
/// * `delta` - Sample spacing
///
/// # Returns
///
/// A vector of `2n + 1` filter coefficients to be correlated with the signal.
/// A radius whose window size overflows `usize` reports `InsufficientData`;
/// a spacing that is not finite and positive reports `SingularFit`.
pub fn compute_coefficients(
    half_window: usize,
    degree: usize,
    derivative: usize,
    delta: f64,
) -> Result<Vec<f64>> {
    let window_size = window_size_for(half_window).ok_or(SavGolError::InsufficientData {
        len: 0,
        window_size: usize::MAX,
    })?;
    if !delta.is_finite() || delta <= 0.0 {
        return Err(SavGolError::SingularFit { index: half_window });
    }
    if degree > MAX_DEGREE {
        return Err(SavGolError::DegreeTooHigh { degree, max: MAX_DEGREE });
    }
    if window_size <= degree + 1 {
        return Err(SavGolError::UnderdeterminedFit { window_size, terms: degree + 1 });
    }

    // Derivative order higher than polynomial order results in zero
    if derivative > degree {
        return Ok(vec![0.0; window_size]);
    }

    let position = |i: usize| ((i as isize) - (half_window as isize)) as f64;

    let mut vandermonde = DMatrix::<f64>::zeros(window_size, degree + 1);
    for i in 0..window_size {
        let x = position(i);
        for j in 0..=degree {
            vandermonde[(i, j)] = x.powi(j as i32);
        }
    }

    let ata = vandermonde.transpose() * &vandermonde;
    let mut rhs = DVector::<f64>::zeros(degree + 1);
    rhs[derivative] = (1..=derivative).fold(1.0, |acc, x| acc * x as f64);

    let coeffs_poly = ata
        .lu()
        .solve(&rhs)
        .ok_or(SavGolError::SingularFit { index: half_window })?;

    let scale = delta.powi(derivative as i32);
    let mut filter_coeffs = vec![0.0; window_size];
    for (i, c) in filter_coeffs.iter_mut().enumerate() {
        let x = position(i);
        for j in 0..=degree {
            *c += coeffs_poly[j] * x.powi(j as i32);
        }
        *c /= scale;
    }

    Ok(filter_coeffs)
}

/// Filters an evenly spaced signal with the classical coefficients.
///
/// Interior samples (`n <= i < len - n`) are the correlation of the window
/// with the coefficients; the `n` samples at each edge are passed through.
pub fn filter(
    data: &[f64],
    half_window: usize,
    degree: usize,
    derivative: usize,
    delta: f64,
) -> Result<Vec<f64>> {
    let window_size = window_size_for(half_window).unwrap_or(usize::MAX);
    if data.len() < window_size {
        return Err(SavGolError::InsufficientData { len: data.len(), window_size });
    }

    let coeffs = compute_coefficients(half_window, degree, derivative, delta)?;
    let mut result = data.to_vec();
    for (offset, window) in data.windows(window_size).enumerate() {
        result[offset + half_window] = window.iter().zip(&coeffs).map(|(v, c)| v * c).sum();
    }
    Ok(result)
}
