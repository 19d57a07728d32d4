//! Dense vector helpers used by the context featurizer.
//!
//! Everything here is a pure function over `f32` slices: no allocation beyond
//! the returned vector, no global state, no I/O. Binary operations require
//! equal lengths and report a [`VecMathError`] otherwise.
//!
//! Undefined results are made explicit rather than leaking NaN:
//! [`cosine_similarity`] returns `None` for zero-magnitude inputs and
//! [`scalar_divide`] rejects a zero divisor.
//!
//! ```
//! use vecmath::{cosine_similarity, norm, scalar_divide};
//!
//! let v = [3.0f32, 4.0];
//! assert_eq!(norm(&v), 5.0);
//! assert_eq!(scalar_divide(&v, 5.0).unwrap(), vec![0.6, 0.8]);
//! assert_eq!(cosine_similarity(&v, &[0.0, 0.0]).unwrap(), None);
//! ```

mod error;
mod normalize;
mod ops;

pub use crate::error::VecMathError;
pub use crate::normalize::{l2_normalize_in_place, rescale_to_magnitude};
pub use crate::ops::{
    cosine_similarity, dot, norm, scalar_divide, vector_add, vector_add_assign, zeroes,
};
