use num_traits::Float;

use crate::vec_ops::{axpy, dot, norm, scale};

/// Configuration of the L-BFGS memory.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LbfgsParams<F> {
    /// Number of recent (s, y) pairs to store (default: 10).
    pub memory: usize,
    /// A pair is admitted only if `sᵀy > curvature_tol · ‖s‖ ‖y‖`
    /// (default: 1e-10).
    pub curvature_tol: F,
}

impl Default for LbfgsParams<f64> {
    fn default() -> Self {
        LbfgsParams {
            memory: 10,
            curvature_tol: 1e-10,
        }
    }
}

impl Default for LbfgsParams<f32> {
    fn default() -> Self {
        LbfgsParams {
            memory: 10,
            curvature_tol: 1e-6,
        }
    }
}

/// Limited-memory inverse Hessian estimate.
///
/// Stores at most `memory` curvature pairs in a ring buffer allocated up
/// front; the oldest pair is overwritten once the buffer is full.
#[derive(Debug, Clone)]
pub struct Lbfgs<F> {
    s: Vec<Vec<F>>,
    y: Vec<Vec<F>>,
    rho: Vec<F>,
    alpha: Vec<F>,
    /// Slot that receives the next pair.
    head: usize,
    len: usize,
    curvature_tol: F,
}

impl<F: Float> Lbfgs<F> {
    /// Empty memory for vectors of length `n`.
    ///
    /// Panics if `params.memory == 0`.
    pub fn new(n: usize, params: &LbfgsParams<F>) -> Self {
        assert!(params.memory > 0, "L-BFGS memory must be at least 1");
        let m = params.memory;
        Lbfgs {
            s: vec![vec![F::zero(); n]; m],
            y: vec![vec![F::zero(); n]; m],
            rho: vec![F::zero(); m],
            alpha: vec![F::zero(); m],
            head: 0,
            len: 0,
            curvature_tol: params.curvature_tol,
        }
    }

    /// Number of stored pairs.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.s.len()
    }

    /// Forget all pairs.
    pub fn reset(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    /// Offer the pair `(s, y)`.
    ///
    /// Returns `false` and leaves the memory untouched when the pair fails
    /// the curvature test.
    pub fn update(&mut self, s: &[F], y: &[F]) -> bool {
        debug_assert_eq!(s.len(), y.len());
        let sy = dot(s, y);
        let bound = self.curvature_tol * norm(s) * norm(y);
        if !sy.is_finite() || sy <= bound {
            return false;
        }

        let slot = self.head;
        self.s[slot].copy_from_slice(s);
        self.y[slot].copy_from_slice(y);
        self.rho[slot] = sy.recip();

        self.head = (self.head + 1) % self.capacity();
        self.len = (self.len + 1).min(self.capacity());
        true
    }

    /// `d = scale · H v` by the two-loop recursion.
    ///
    /// With an empty memory `H = I`. Otherwise the initial matrix is
    /// `(sᵀy / yᵀy) I` from the newest pair.
    pub fn apply(&mut self, scale_by: F, v: &[F], d: &mut [F]) {
        debug_assert_eq!(v.len(), d.len());
        d.copy_from_slice(v);

        if self.len > 0 {
            // newest to oldest
            for k in (0..self.len).rev() {
                let i = self.slot(k);
                let a = self.rho[i] * dot(&self.s[i], d);
                self.alpha[i] = a;
                axpy(d, -a, &self.y[i]);
            }

            let newest = self.slot(self.len - 1);
            let yy = dot(&self.y[newest], &self.y[newest]);
            if yy > F::zero() {
                let h0 = self.rho[newest].recip() / yy;
                scale(d, h0);
            }

            // oldest to newest
            for k in 0..self.len {
                let i = self.slot(k);
                let beta = self.rho[i] * dot(&self.y[i], d);
                axpy(d, self.alpha[i] - beta, &self.s[i]);
            }
        }

        scale(d, scale_by);
    }

    /// Buffer index of the `k`-th oldest stored pair.
    fn slot(&self, k: usize) -> usize {
        let cap = self.capacity();
        (self.head + cap - self.len + k) % cap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory(n: usize, m: usize) -> Lbfgs<f64> {
        Lbfgs::new(
            n,
            &LbfgsParams {
                memory: m,
                ..Default::default()
            },
        )
    }

    #[test]
    fn empty_memory_scales_input() {
        let mut lbfgs = memory(2, 3);
        let mut d = [0.0; 2];
        lbfgs.apply(2.0, &[1.0, -3.0], &mut d);
        assert_eq!(d, [2.0, -6.0]);
    }

    #[test]
    fn recovers_diagonal_inverse() {
        let mut lbfgs = memory(2, 5);
        assert!(lbfgs.update(&[1.0, 0.0], &[4.0, 0.0]));
        assert!(lbfgs.update(&[0.0, 1.0], &[0.0, 0.5]));
        let mut d = [0.0; 2];
        lbfgs.apply(1.0, &[2.0, 3.0], &mut d);
        assert!((d[0] - 0.5).abs() < 1e-14);
        assert!((d[1] - 6.0).abs() < 1e-14);
    }

    #[test]
    fn rejects_non_positive_curvature() {
        let mut lbfgs = memory(2, 5);
        assert!(!lbfgs.update(&[1.0, 0.0], &[-1.0, 0.0]));
        assert!(!lbfgs.update(&[1.0, 0.0], &[0.0, 1.0]));
        assert!(!lbfgs.update(&[0.0, 0.0], &[0.0, 0.0]));
        assert!(lbfgs.is_empty());
    }

    #[test]
    fn evicts_oldest_when_full() {
        let mut lbfgs = memory(1, 2);
        assert!(lbfgs.update(&[1.0], &[1.0]));
        assert!(lbfgs.update(&[1.0], &[2.0]));
        assert!(lbfgs.update(&[1.0], &[8.0]));
        assert_eq!(lbfgs.len(), 2);

        // in one dimension the newest pair alone determines H = s / y
        let mut d = [0.0];
        lbfgs.apply(1.0, &[8.0], &mut d);
        assert!((d[0] - 1.0).abs() < 1e-14);
    }

    #[test]
    fn reset_clears_history() {
        let mut lbfgs = memory(1, 2);
        lbfgs.update(&[1.0], &[4.0]);
        lbfgs.reset();
        assert!(lbfgs.is_empty());
        let mut d = [0.0];
        lbfgs.apply(1.0, &[3.0], &mut d);
        assert_eq!(d, [3.0]);
    }
}
