use thiserror::Error;

/// Errors returned by the element-wise vector helpers.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum VecMathError {
    #[error("vector length mismatch: left has {left} elements, right has {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("cannot divide a vector by zero")]
    ZeroDivisor,

    #[error("cannot divide a vector by non-finite scalar {divisor}")]
    NonFiniteDivisor { divisor: f32 },
}
