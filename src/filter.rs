use crate::coefficients::{
    fill_window_coefficients, CoefficientCache, DEFAULT_SINGULAR_TOLERANCE, MAX_DERIVATIVE,
};
use crate::error::{Result, SavGolError};
use crate::linalg::MAX_DEGREE;

/// How samples without a full symmetric window are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryPolicy {
    /// Raw value for order 0; finite differences toward the interior for orders 1 and 2
    #[default]
    FiniteDifference,
    /// Raw value for every derivative order
    PassThrough,
}

/// Configuration for the non-uniform Savitzky-Golay filter.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    /// Number of neighbors on each side of the center sample
    pub half_window: usize,
    /// Degree of the local polynomial
    pub degree: usize,
    /// Derivative order reported at the window center (0, 1 or 2)
    pub derivative: usize,
    /// Boundary handling strategy
    pub boundary: BoundaryPolicy,
    /// Relative pivot threshold for rejecting degenerate windows
    pub singular_tolerance: f64,
}

impl FilterConfig {
    /// Creates a smoothing configuration (derivative order 0).
    ///
    /// Nothing is checked here; see [`FilterConfig::validate`].
    pub fn new(half_window: usize, degree: usize) -> Self {
        Self {
            half_window,
            degree,
            derivative: 0,
            boundary: BoundaryPolicy::default(),
            singular_tolerance: DEFAULT_SINGULAR_TOLERANCE,
        }
    }

    /// Sets the derivative order
    pub fn with_derivative(mut self, derivative: usize) -> Self {
        self.derivative = derivative;
        self
    }

    /// Sets the boundary handling policy
    pub fn with_boundary_policy(mut self, policy: BoundaryPolicy) -> Self {
        self.boundary = policy;
        self
    }

    /// Sets the relative pivot threshold
    pub fn with_singular_tolerance(mut self, tolerance: f64) -> Self {
        self.singular_tolerance = tolerance;
        self
    }

    /// Number of samples in a window (`2n + 1`), saturating at `usize::MAX`
    pub fn window_size(&self) -> usize {
        window_size_for(self.half_window).unwrap_or(usize::MAX)
    }

    /// Checks the parameters that do not depend on the signal.
    pub fn validate(&self) -> Result<()> {
        if self.degree > MAX_DEGREE {
            return Err(SavGolError::DegreeTooHigh { degree: self.degree, max: MAX_DEGREE });
        }
        if self.window_size() <= self.degree + 1 {
            return Err(SavGolError::UnderdeterminedFit {
                window_size: self.window_size(),
                terms: self.degree + 1,
            });
        }
        if self.derivative > MAX_DERIVATIVE {
            return Err(SavGolError::UnsupportedDerivative(self.derivative));
        }
        if !self.singular_tolerance.is_finite() || self.singular_tolerance < 0.0 {
            return Err(SavGolError::InvalidTolerance(self.singular_tolerance));
        }
        Ok(())
    }
}

/// A Savitzky-Golay filter for signals sampled at irregular positions.
///
/// The filter holds only its configuration; every `apply*` call is a pure
/// function of its arguments.
#[derive(Debug, Clone)]
pub struct NonUniformFilter {
    config: FilterConfig,
}

impl NonUniformFilter {
    /// Creates a smoothing filter with the specified parameters.
    ///
    /// # Arguments
    ///
    /// * `half_window` - Neighbors on each side of the center (window size `2n + 1`)
    /// * `degree` - Degree of the local polynomial (must be < `2n + 1`)
    ///
    /// # Example
    ///
    /// ```rust
    /// use savgol_nonuniform::NonUniformFilter;
    ///
    /// let filter = NonUniformFilter::new(2, 2).expect("Valid parameters");
    /// ```
    pub fn new(half_window: usize, degree: usize) -> Result<Self> {
        let config = FilterConfig::new(half_window, degree);
        config.validate()?;
        Ok(Self { config })
    }

    /// Creates a filter with custom configuration.
    ///
    /// The configuration is validated when the filter is applied.
    pub fn with_config(config: FilterConfig) -> Self {
        Self { config }
    }

    /// Sets the derivative order
    pub fn with_derivative(mut self, derivative: usize) -> Self {
        self.config.derivative = derivative;
        self
    }

    /// Sets the boundary handling policy
    pub fn with_boundary_policy(mut self, policy: BoundaryPolicy) -> Self {
        self.config.boundary = policy;
        self
    }

    /// Returns the filter configuration
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Applies the filter to the signal `(x, y)`.
    ///
    /// `x` must be strictly increasing. The result has the same length as the
    /// input; the first and last `half_window` samples follow the boundary
    /// policy.
    ///
    /// # Example
    ///
    /// ```rust
    /// use savgol_nonuniform::NonUniformFilter;
    ///
    /// let x = vec![0.0, 0.1, 0.25, 0.3, 0.48, 0.5, 0.66];
    /// let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 1.0).collect();
    /// let filter = NonUniformFilter::new(2, 2).expect("Valid parameters");
    /// let smoothed = filter.apply(&x, &y).unwrap();
    /// assert!((smoothed[3] - y[3]).abs() < 1e-12);
    /// ```
    pub fn apply(&self, x: &[f64], y: &[f64]) -> Result<Vec<f64>> {
        self.validate_inputs(x, y)?;

        let n = self.config.half_window;
        let len = x.len();
        let mut result = vec![0.0; len];
        let mut scratch = WindowScratch::new(self.config.window_size());

        for i in n..len - n {
            result[i] = self.interior_value(x, y, i, &mut scratch)?;
        }

        self.fill_boundary(x, y, &mut result)?;
        Ok(result)
    }

    /// Applies the filter, reusing coefficients from a caller-owned cache.
    ///
    /// Produces exactly the output of [`NonUniformFilter::apply`]; windows whose
    /// relative offsets repeat bit-for-bit skip the matrix inversion.
    pub fn apply_with_cache(
        &self,
        x: &[f64],
        y: &[f64],
        cache: &mut CoefficientCache,
    ) -> Result<Vec<f64>> {
        self.validate_inputs(x, y)?;

        let n = self.config.half_window;
        let len = x.len();
        let mut result = vec![0.0; len];
        let mut scratch = WindowScratch::new(self.config.window_size());

        for i in n..len - n {
            scratch.load_offsets(x, i, n);
            let coeffs = cache
                .get_or_compute(
                    &scratch.offsets,
                    self.config.degree,
                    self.config.derivative,
                    self.config.singular_tolerance,
                )
                .ok_or_else(|| singular(i))?;
            result[i] = dot(coeffs, &y[i - n..=i + n]);
        }

        log::debug!(
            "coefficient cache: {} entries, {} hits, {} misses",
            cache.len(),
            cache.hits(),
            cache.misses()
        );

        self.fill_boundary(x, y, &mut result)?;
        Ok(result)
    }

    /// Applies the filter with interior windows spread over the rayon thread pool.
    ///
    /// Each worker writes disjoint output slots. If several windows are
    /// singular, whichever is found first is reported.
    #[cfg(feature = "parallel")]
    pub fn apply_parallel(&self, x: &[f64], y: &[f64]) -> Result<Vec<f64>> {
        use rayon::prelude::*;

        self.validate_inputs(x, y)?;

        let n = self.config.half_window;
        let len = x.len();
        let window_size = self.config.window_size();
        let mut result = vec![0.0; len];

        result[n..len - n]
            .par_iter_mut()
            .enumerate()
            .try_for_each_init(
                || WindowScratch::new(window_size),
                |scratch, (k, slot)| -> Result<()> {
                    *slot = self.interior_value(x, y, k + n, scratch)?;
                    Ok(())
                },
            )?;

        self.fill_boundary(x, y, &mut result)?;
        Ok(result)
    }

    /// Checks the signal and configuration in the order errors are reported.
    fn validate_inputs(&self, x: &[f64], y: &[f64]) -> Result<()> {
        if x.len() != y.len() {
            return Err(SavGolError::ShapeMismatch { x_len: x.len(), y_len: y.len() });
        }
        let window_size = self.config.window_size();
        if x.len() < window_size {
            return Err(SavGolError::InsufficientData { len: x.len(), window_size });
        }
        self.config.validate()?;

        log::debug!(
            "smoothing {} samples: window={}, degree={}, derivative={}, boundary={:?}",
            x.len(),
            window_size,
            self.config.degree,
            self.config.derivative,
            self.config.boundary
        );
        Ok(())
    }

    /// Fitted value (or derivative) at interior index `i`.
    fn interior_value(
        &self,
        x: &[f64],
        y: &[f64],
        i: usize,
        scratch: &mut WindowScratch,
    ) -> Result<f64> {
        let n = self.config.half_window;
        scratch.load_offsets(x, i, n);
        fill_window_coefficients(
            &scratch.offsets,
            self.config.degree,
            self.config.derivative,
            self.config.singular_tolerance,
            &mut scratch.coeffs,
        )
        .ok_or_else(|| singular(i))?;
        Ok(dot(&scratch.coeffs, &y[i - n..=i + n]))
    }

    /// Fills the first and last `half_window` samples.
    fn fill_boundary(&self, x: &[f64], y: &[f64], result: &mut [f64]) -> Result<()> {
        let n = self.config.half_window;
        let len = x.len();
        let leading = 0..n;
        let trailing = len - n..len;

        match (self.config.boundary, self.config.derivative) {
            (BoundaryPolicy::PassThrough, _) | (_, 0) => {
                result[leading.clone()].copy_from_slice(&y[leading]);
                result[trailing.clone()].copy_from_slice(&y[trailing]);
            }
            (BoundaryPolicy::FiniteDifference, 1) => {
                for i in leading {
                    result[i] = first_difference(x, y, i, i + 1, i)?;
                }
                for i in trailing {
                    result[i] = first_difference(x, y, i - 1, i, i)?;
                }
            }
            (BoundaryPolicy::FiniteDifference, _) => {
                for i in leading {
                    result[i] = second_difference(x, y, i, i)?;
                }
                for i in trailing {
                    result[i] = second_difference(x, y, i - 2, i)?;
                }
            }
        }
        Ok(())
    }
}

/// Per-window buffers, owned by one loop (or one rayon worker).
struct WindowScratch {
    offsets: Vec<f64>,
    coeffs: Vec<f64>,
}

impl WindowScratch {
    fn new(window_size: usize) -> Self {
        Self {
            offsets: vec![0.0; window_size],
            coeffs: vec![0.0; window_size],
        }
    }

    fn load_offsets(&mut self, x: &[f64], center: usize, half_window: usize) {
        let origin = x[center];
        for (d, &xj) in self.offsets.iter_mut().zip(&x[center - half_window..=center + half_window]) {
            *d = xj - origin;
        }
    }
}

/// `2n + 1`, or `None` if it does not fit in `usize`.
pub(crate) fn window_size_for(half_window: usize) -> Option<usize> {
    half_window.checked_mul(2).and_then(|v| v.checked_add(1))
}

fn dot(coeffs: &[f64], values: &[f64]) -> f64 {
    coeffs.iter().zip(values).map(|(c, v)| c * v).sum()
}

fn singular(index: usize) -> SavGolError {
    log::warn!("window centered at sample {} is singular", index);
    SavGolError::SingularFit { index }
}

/// Slope between samples `a` and `b`.
fn first_difference(x: &[f64], y: &[f64], a: usize, b: usize, index: usize) -> Result<f64> {
    let dx = x[b] - x[a];
    if dx == 0.0 || !dx.is_finite() {
        return Err(singular(index));
    }
    Ok((y[b] - y[a]) / dx)
}

/// Twice the second divided difference over samples `a`, `a + 1`, `a + 2`.
fn second_difference(x: &[f64], y: &[f64], a: usize, index: usize) -> Result<f64> {
    let left = first_difference(x, y, a, a + 1, index)?;
    let right = first_difference(x, y, a + 1, a + 2, index)?;
    let span = x[a + 2] - x[a];
    if span == 0.0 || !span.is_finite() {
        return Err(singular(index));
    }
    Ok(2.0 * (right - left) / span)
}
