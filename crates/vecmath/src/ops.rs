//! Element-wise operations over equal-length `f32` slices.
//!
//! Every binary operation checks lengths up front and returns
//! [`VecMathError::LengthMismatch`] instead of silently truncating to the
//! shorter input.

use crate::error::VecMathError;

#[inline]
fn check_len(a: &[f32], b: &[f32]) -> Result<(), VecMathError> {
    if a.len() != b.len() {
        return Err(VecMathError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(())
}

/// Largest absolute component, `0` for the zero vector and the empty slice.
#[inline]
pub(crate) fn max_abs(v: &[f32]) -> f32 {
    v.iter().fold(0.0f32, |m, x| m.max(x.abs()))
}

/// Sum of squares of `v / scale`; `scale` must be `max_abs(v)` and non-zero.
#[inline]
fn scaled_sum_sq(v: &[f32], scale: f32) -> f32 {
    v.iter()
        .map(|x| {
            let s = x / scale;
            s * s
        })
        .sum()
}

/// Euclidean (L2) norm. Zero only for the zero vector (and the empty slice).
///
/// Components are divided by the largest magnitude before squaring, so the
/// sum neither overflows for components past `1e19` nor flushes to zero for
/// components below `1e-19`. The result is `inf` only when the true norm
/// exceeds `f32::MAX`.
pub fn norm(v: &[f32]) -> f32 {
    let scale = max_abs(v);
    if scale == 0.0 || !scale.is_finite() {
        return scale;
    }
    scaled_sum_sq(v, scale).sqrt() * scale
}

/// Dot product of two equal-length vectors.
pub fn dot(a: &[f32], b: &[f32]) -> Result<f32, VecMathError> {
    check_len(a, b)?;
    Ok(a.iter().zip(b.iter()).map(|(x, y)| x * y).sum())
}

/// Cosine similarity of two equal-length vectors.
///
/// Returns `Ok(None)` when the similarity is undefined, i.e. either vector has
/// zero magnitude. Callers decide what "no signal" means for them; nothing
/// here produces NaN. Defined results are clamped to `[-1, 1]` to absorb
/// rounding drift.
///
/// Both inputs are rescaled by their largest component first, so the result
/// only depends on direction and stays defined across the whole finite range.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<Option<f32>, VecMathError> {
    check_len(a, b)?;
    let (scale_a, scale_b) = (max_abs(a), max_abs(b));
    if scale_a == 0.0 || scale_b == 0.0 || !scale_a.is_finite() || !scale_b.is_finite() {
        return Ok(None);
    }
    let dot: f32 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (x / scale_a) * (y / scale_b))
        .sum();
    let denom = scaled_sum_sq(a, scale_a).sqrt() * scaled_sum_sq(b, scale_b).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return Ok(None);
    }
    let sim = dot / denom;
    if sim.is_nan() {
        return Ok(None);
    }
    Ok(Some(sim.clamp(-1.0, 1.0)))
}

/// Divide every element of `v` by `divisor`.
///
/// A zero or non-finite divisor is rejected rather than producing `inf`/NaN.
pub fn scalar_divide(v: &[f32], divisor: f32) -> Result<Vec<f32>, VecMathError> {
    if !divisor.is_finite() {
        return Err(VecMathError::NonFiniteDivisor { divisor });
    }
    if divisor == 0.0 {
        return Err(VecMathError::ZeroDivisor);
    }
    Ok(v.iter().map(|x| x / divisor).collect())
}

/// Element-wise sum of two equal-length vectors.
pub fn vector_add(a: &[f32], b: &[f32]) -> Result<Vec<f32>, VecMathError> {
    check_len(a, b)?;
    Ok(a.iter().zip(b.iter()).map(|(x, y)| x + y).collect())
}

/// Accumulate `v` into `acc` without allocating.
pub fn vector_add_assign(acc: &mut [f32], v: &[f32]) -> Result<(), VecMathError> {
    check_len(acc, v)?;
    for (slot, x) in acc.iter_mut().zip(v.iter()) {
        *slot += x;
    }
    Ok(())
}

/// A vector of `n` zeros.
#[inline]
pub fn zeroes(n: usize) -> Vec<f32> {
    vec![0.0; n]
}
