use num_traits::Float;

/// Dot product of two vectors.
pub fn dot<F: Float>(a: &[F], b: &[F]) -> F {
    debug_assert_eq!(a.len(), b.len());
    let mut s = F::zero();
    for i in 0..a.len() {
        s = s + a[i] * b[i];
    }
    s
}

/// Squared Euclidean norm.
pub fn norm_squared<F: Float>(v: &[F]) -> F {
    let mut s = F::zero();
    for &x in v {
        s = s + x * x;
    }
    s
}

/// Euclidean norm.
pub fn norm<F: Float>(v: &[F]) -> F {
    norm_squared(v).sqrt()
}

/// Infinity norm. Zero for an empty vector.
pub fn norm_inf<F: Float>(v: &[F]) -> F {
    v.iter().fold(F::zero(), |acc, &x| acc.max(x.abs()))
}

/// `out = a - b`.
pub(crate) fn sub_into<F: Float>(out: &mut [F], a: &[F], b: &[F]) {
    debug_assert_eq!(out.len(), a.len());
    debug_assert_eq!(a.len(), b.len());
    for i in 0..out.len() {
        out[i] = a[i] - b[i];
    }
}

/// `out = x - alpha * v`.
pub(crate) fn step_into<F: Float>(out: &mut [F], x: &[F], alpha: F, v: &[F]) {
    debug_assert_eq!(out.len(), x.len());
    debug_assert_eq!(x.len(), v.len());
    for i in 0..out.len() {
        out[i] = x[i] - alpha * v[i];
    }
}

/// `y += alpha * x`.
pub(crate) fn axpy<F: Float>(y: &mut [F], alpha: F, x: &[F]) {
    debug_assert_eq!(y.len(), x.len());
    for i in 0..y.len() {
        y[i] = y[i] + alpha * x[i];
    }
}

pub(crate) fn scale<F: Float>(v: &mut [F], alpha: F) {
    for x in v.iter_mut() {
        *x = *x * alpha;
    }
}

/// Literal `c` converted to `F`.
///
/// Only called with literals in the normal range of `f32` (`0.5`, `0.95`,
/// `1e-6`), for which `F::from` returns `Some` for every `Float` type in
/// use, so the epsilon fallback is never taken.
#[inline]
pub(crate) fn constant<F: Float>(c: f64) -> F {
    F::from(c).unwrap_or_else(F::epsilon)
}
