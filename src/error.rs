use std::fmt;

/// Error types for non-uniform Savitzky-Golay operations
#[derive(Debug, Clone, PartialEq)]
pub enum SavGolError {
    /// Position and value arrays differ in length
    ShapeMismatch { x_len: usize, y_len: usize },
    /// Not enough samples to form a single full window
    InsufficientData { len: usize, window_size: usize },
    /// Window holds no more samples than the polynomial has coefficients
    UnderdeterminedFit { window_size: usize, terms: usize },
    /// Derivative order outside 0..=2
    UnsupportedDerivative(usize),
    /// Normal-equations matrix of the window centered at `index` could not be inverted
    SingularFit { index: usize },
    /// Polynomial degree exceeds the fixed matrix capacity
    DegreeTooHigh { degree: usize, max: usize },
    /// Singular tolerance must be finite and non-negative
    InvalidTolerance(f64),
}

impl fmt::Display for SavGolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SavGolError::ShapeMismatch { x_len, y_len } => {
                write!(f, "Shape mismatch: x has {} samples but y has {}", x_len, y_len)
            }
            SavGolError::InsufficientData { len, window_size } => {
                write!(
                    f,
                    "Insufficient data: {} samples cannot hold one full window of {} (2n + 1) samples",
                    len, window_size
                )
            }
            SavGolError::UnderdeterminedFit { window_size, terms } => {
                write!(
                    f,
                    "Underdetermined fit: window size {} must exceed the {} polynomial coefficients",
                    window_size, terms
                )
            }
            SavGolError::UnsupportedDerivative(order) => {
                write!(f, "Unsupported derivative order: {}. Supported orders are 0, 1 and 2", order)
            }
            SavGolError::SingularFit { index } => {
                write!(f, "Singular fit: window centered at sample {} is degenerate", index)
            }
            SavGolError::DegreeTooHigh { degree, max } => {
                write!(f, "Polynomial degree {} is too high. Maximum supported degree is {}", degree, max)
            }
            SavGolError::InvalidTolerance(tol) => {
                write!(f, "Invalid singular tolerance: {}. Must be finite and non-negative", tol)
            }
        }
    }
}

impl std::error::Error for SavGolError {}

/// Result type for non-uniform Savitzky-Golay operations
pub type Result<T> = std::result::Result<T, SavGolError>;
