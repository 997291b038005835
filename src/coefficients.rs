use std::collections::HashMap;

use crate::error::{Result, SavGolError};
use crate::linalg::{NormalEquations, MAX_DEGREE};

/// Highest derivative order the filter reports.
pub const MAX_DERIVATIVE: usize = 2;

/// Default relative pivot threshold for the normal-equations inversion.
pub const DEFAULT_SINGULAR_TOLERANCE: f64 = 1e-12;

/// Computes the filter coefficients of a single window from the relative
/// positions of its samples.
///
/// `offsets[j]` is `x[i + j - n] - x[i]` for the window centered at `i`. The
/// returned vector has one weight per sample; the dot product with the window's
/// values gives the fitted polynomial's `derivative`-th derivative at the
/// center.
///
/// # Arguments
///
/// * `offsets` - Relative sample positions (the center offset is 0)
/// * `degree` - Degree of the local polynomial (must be < `offsets.len()`)
/// * `derivative` - Order of derivative to compute (0, 1 or 2)
/// * `tolerance` - Relative pivot threshold below which the window is rejected
///
/// # Example
///
/// ```rust
/// use savgol_nonuniform::window_coefficients;
///
/// let coeffs = window_coefficients(&[-2.0, -1.0, 0.0, 1.0, 2.0], 2, 0, 1e-12).unwrap();
/// assert!((coeffs[2] - 17.0 / 35.0).abs() < 1e-12);
/// ```
pub fn window_coefficients(
    offsets: &[f64],
    degree: usize,
    derivative: usize,
    tolerance: f64,
) -> Result<Vec<f64>> {
    let window_size = offsets.len();
    if window_size == 0 {
        return Err(SavGolError::InsufficientData { len: 0, window_size: 1 });
    }
    if degree > MAX_DEGREE {
        return Err(SavGolError::DegreeTooHigh { degree, max: MAX_DEGREE });
    }
    if window_size <= degree + 1 {
        return Err(SavGolError::UnderdeterminedFit { window_size, terms: degree + 1 });
    }
    if derivative > MAX_DERIVATIVE {
        return Err(SavGolError::UnsupportedDerivative(derivative));
    }

    let mut coeffs = vec![0.0; window_size];
    fill_window_coefficients(offsets, degree, derivative, tolerance, &mut coeffs)
        .ok_or(SavGolError::SingularFit { index: window_size / 2 })?;
    Ok(coeffs)
}

/// Writes the coefficients of one window into `out` (same length as `offsets`).
///
/// Parameters are assumed validated. Returns `None` if the window's normal
/// matrix is singular at `tolerance`.
pub(crate) fn fill_window_coefficients(
    offsets: &[f64],
    degree: usize,
    derivative: usize,
    tolerance: f64,
    out: &mut [f64],
) -> Option<()> {
    debug_assert_eq!(offsets.len(), out.len());

    let terms = degree + 1;

    // Work in u = offset / h so the normal matrix stays well scaled.
    let half_span = offsets.iter().fold(0.0f64, |acc, &d| acc.max(d.abs()));
    let scale = if half_span > 0.0 { half_span } else { 1.0 };

    let normal = NormalEquations::from_points(offsets.iter().map(|&d| d / scale), terms)?;
    let inverse = normal.try_inverse(tolerance)?;

    if derivative > degree {
        // The fitted polynomial has no term of this order.
        out.iter_mut().for_each(|c| *c = 0.0);
        return Some(());
    }

    // Row `derivative` of (AᵗA)⁻¹ Aᵗ, converted back to physical units and
    // multiplied by derivative! so it yields the derivative, not the Taylor coefficient.
    let factor = factorial(derivative) / scale.powi(derivative as i32);
    for (c, &d) in out.iter_mut().zip(offsets) {
        let u = d / scale;
        let mut power = 1.0;
        let mut acc = 0.0;
        for k in 0..terms {
            acc += inverse[(derivative, k)] * power;
            power *= u;
        }
        *c = acc * factor;
    }

    if out.iter().all(|c| c.is_finite()) {
        Some(())
    } else {
        None
    }
}

fn factorial(k: usize) -> f64 {
    (1..=k).fold(1.0, |acc, x| acc * x as f64)
}

/// Key identifying a window's geometry (the exact bit patterns of its offsets)
/// and the fit parameters that decide its coefficients or its rejection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    offsets: Vec<u64>,
    degree: usize,
    derivative: usize,
    tolerance: u64,
}

/// Caller-owned cache of window coefficients.
///
/// Windows whose relative offsets repeat bit-for-bit (integer or periodically
/// repeating grids) share one coefficient vector. Owning the cache outside the
/// filter keeps every filter call a pure function of its arguments.
#[derive(Debug, Default)]
pub struct CoefficientCache {
    entries: HashMap<CacheKey, Vec<f64>, ahash::RandomState>,
    hits: usize,
    misses: usize,
}

impl CoefficientCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct window geometries stored
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups answered from the cache since creation or the last `clear`
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Lookups that had to compute coefficients
    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Gets coefficients from cache or computes them if not cached.
    ///
    /// Singular windows are not stored; `None` is returned for them.
    pub fn get_or_compute(
        &mut self,
        offsets: &[f64],
        degree: usize,
        derivative: usize,
        tolerance: f64,
    ) -> Option<&[f64]> {
        let key = CacheKey {
            offsets: offsets.iter().map(|d| d.to_bits()).collect(),
            degree,
            derivative,
            tolerance: tolerance.to_bits(),
        };

        if self.entries.contains_key(&key) {
            self.hits += 1;
            log::trace!("coefficient cache hit ({} offsets)", offsets.len());
        } else {
            self.misses += 1;
            log::trace!("coefficient cache miss ({} offsets)", offsets.len());
            let mut coeffs = vec![0.0; offsets.len()];
            fill_window_coefficients(offsets, degree, derivative, tolerance, &mut coeffs)?;
            self.entries.insert(key.clone(), coeffs);
        }

        self.entries.get(&key).map(|c| c.as_slice())
    }
}
