//! # Non-uniform Savitzky-Golay Filter
//!
//! Savitzky-Golay smoothing and numerical differentiation for signals sampled
//! at irregularly spaced positions.
//!
//! For every sample with a full symmetric window of `2n + 1` neighbors, a
//! polynomial is fitted by least squares to the window using the samples'
//! actual positions, and its value (or first or second derivative) at the
//! center becomes the output. On an evenly spaced grid this reduces to the
//! classical Savitzky-Golay filter.
//!
//! ## Features
//!
//! - Per-window coefficients from the normal equations, inverted on the stack
//! - Derivatives in physical units (orders 0, 1 and 2)
//! - Selectable boundary policy for the first and last `n` samples
//! - Optional caller-owned coefficient cache and rayon-parallel application
//!
//! ## Example
//!
//! ```rust
//! use savgol_nonuniform::smooth;
//!
//! let x = vec![0.0, 0.1, 0.15, 0.3, 0.42, 0.5, 0.61, 0.7, 0.85];
//! let y = vec![1.0, 2.0, 3.0, 4.0, 5.0, 4.0, 3.0, 2.0, 1.0];
//! let smoothed = smooth(&x, &y, 2, 2, 0).expect("Valid parameters");
//! assert_eq!(smoothed.len(), y.len());
//! ```

mod coefficients;
mod error;
mod filter;
mod linalg;

pub mod csv_utils;
pub mod uniform;

pub use coefficients::{
    window_coefficients, CoefficientCache, DEFAULT_SINGULAR_TOLERANCE, MAX_DERIVATIVE,
};
pub use csv_utils::{read_csv_column, read_signal};
pub use error::{Result, SavGolError};
pub use filter::{BoundaryPolicy, FilterConfig, NonUniformFilter};
pub use linalg::MAX_DEGREE;

/// Smooths (or differentiates) a non-uniformly sampled signal.
///
/// Uses the default boundary policy, [`BoundaryPolicy::FiniteDifference`].
///
/// # Arguments
///
/// * `x` - Strictly increasing sample positions
/// * `y` - Sample values, same length as `x`
/// * `half_window` - Neighbors on each side of the center; window size is `2n + 1`
/// * `degree` - Degree of the local polynomial (must be < `2n + 1`)
/// * `derivative` - 0 for the smoothed value, 1 or 2 for derivatives
///
/// # Returns
///
/// A vector of the same length as the input, or the first error detected
///
/// # Example
///
/// ```rust
/// use savgol_nonuniform::{smooth, SavGolError};
///
/// let err = smooth(&[1.0, 2.0, 3.0], &[1.0, 2.0], 0, 0, 0).unwrap_err();
/// assert!(matches!(err, SavGolError::ShapeMismatch { .. }));
/// ```
pub fn smooth(
    x: &[f64],
    y: &[f64],
    half_window: usize,
    degree: usize,
    derivative: usize,
) -> Result<Vec<f64>> {
    let config = FilterConfig::new(half_window, degree).with_derivative(derivative);
    NonUniformFilter::with_config(config).apply(x, y)
}

/// Computes the first derivative of a non-uniformly sampled signal.
///
/// # Arguments
///
/// * `x` - Strictly increasing sample positions
/// * `y` - Sample values
/// * `half_window` - Neighbors on each side of the center
/// * `degree` - Degree of the local polynomial (must be < `2n + 1`)
///
/// # Returns
///
/// A Result containing `dy/dx` at every sample or an error
pub fn derivative(x: &[f64], y: &[f64], half_window: usize, degree: usize) -> Result<Vec<f64>> {
    smooth(x, y, half_window, degree, 1)
}
