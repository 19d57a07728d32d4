use crate::ops::{max_abs, norm};

/// Scale `v` to unit length in place. The zero vector is left untouched.
///
/// The vector is first divided by its largest component, which keeps the
/// squared sum in range for any finite input.
pub fn l2_normalize_in_place(v: &mut [f32]) {
    let scale = max_abs(v);
    if scale == 0.0 || !scale.is_finite() {
        return;
    }
    for x in v.iter_mut() {
        *x /= scale;
    }
    let inv_norm = norm(v).recip();
    for x in v.iter_mut() {
        *x *= inv_norm;
    }
}

/// Copy of `v` rescaled so its magnitude equals `magnitude`.
///
/// Equivalent to dividing by `norm(v) / magnitude`, but a zero vector (or a
/// zero magnitude) yields zeros instead of NaN.
pub fn rescale_to_magnitude(v: &[f32], magnitude: f32) -> Vec<f32> {
    if magnitude == 0.0 {
        return vec![0.0; v.len()];
    }
    let mut out = v.to_vec();
    l2_normalize_in_place(&mut out);
    for x in out.iter_mut() {
        *x *= magnitude;
    }
    out
}
