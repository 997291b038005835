//! Normal equations of the per-window polynomial fit.
//!
//! The normal matrix of a window has `degree + 1` rows and columns, which is
//! small and bounded, so it is stored in a fixed-size nalgebra matrix on the
//! stack instead of being reallocated for every sample of the signal. Unused
//! rows and columns are padded with the identity, which keeps the active block
//! decoupled during factorization.

use nalgebra::SMatrix;

/// Highest polynomial degree the fixed-capacity matrix can hold.
pub const MAX_DEGREE: usize = 7;

/// Number of basis terms (`MAX_DEGREE + 1`).
pub const MAX_TERMS: usize = MAX_DEGREE + 1;

/// Stack-allocated storage for a normal matrix or its inverse.
pub type NormalMatrix = SMatrix<f64, MAX_TERMS, MAX_TERMS>;

/// `AᵗA` for the polynomial basis evaluated at the points of one window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalEquations {
    dim: usize,
    matrix: NormalMatrix,
    max_abs: f64,
}

impl NormalEquations {
    /// Builds `AᵗA` for `dim` basis terms without materializing `A`.
    ///
    /// Entry `(r, c)` is `Σ_j points[j]^(r + c)`, so only the `2 * dim - 1`
    /// power sums are accumulated. Returns `None` when `dim` is zero or exceeds
    /// `MAX_TERMS`.
    pub fn from_points<I>(points: I, dim: usize) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        if dim == 0 || dim > MAX_TERMS {
            return None;
        }

        let mut sums = [0.0; 2 * MAX_TERMS - 1];
        let n_sums = 2 * dim - 1;
        for u in points {
            let mut power = 1.0;
            for sum in sums.iter_mut().take(n_sums) {
                *sum += power;
                power *= u;
            }
        }

        let mut matrix = NormalMatrix::identity();
        for r in 0..dim {
            for c in 0..dim {
                matrix[(r, c)] = sums[r + c];
            }
        }
        let max_abs = sums[..n_sums].iter().fold(0.0f64, |acc, s| acc.max(s.abs()));

        Some(Self { dim, matrix, max_abs })
    }

    /// Inverts `AᵗA` through an LU factorization with partial pivoting.
    ///
    /// Returns `None` when a diagonal entry of `U` in the active block is
    /// non-finite or its magnitude is at most `tolerance` times the largest
    /// absolute entry of `AᵗA`.
    pub fn try_inverse(&self, tolerance: f64) -> Option<NormalMatrix> {
        let threshold = tolerance * self.max_abs;
        let lu = self.matrix.lu();
        let u = lu.u();

        for i in 0..self.dim {
            let pivot = u[(i, i)].abs();
            if !pivot.is_finite() || pivot == 0.0 || pivot <= threshold {
                return None;
            }
        }

        lu.try_inverse()
    }
}
