use std::fmt;

use num_traits::Float;

use crate::error::InputError;

/// Which of the two problem sets a bound belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SetRole {
    /// Feasible set `C` of the decision variables.
    C,
    /// Target set `D` of the constraint map.
    D,
}

impl fmt::Display for SetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetRole::C => write!(f, "C"),
            SetRole::D => write!(f, "D"),
        }
    }
}

/// Rectangular set `{ v : lower <= v <= upper }`.
///
/// Bounds may be infinite; an infinite bound never clamps. Equal lower and
/// upper bounds describe an equality constraint.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoxSet<F> {
    lower: Vec<F>,
    upper: Vec<F>,
}

impl<F: Float> BoxSet<F> {
    /// Create a box from bound vectors of equal length.
    ///
    /// Bound ordering is not checked here; see [`BoxSet::validate`].
    ///
    /// Panics if the lengths differ.
    pub fn new(lower: Vec<F>, upper: Vec<F>) -> Self {
        assert_eq!(
            lower.len(),
            upper.len(),
            "lower and upper bounds must have the same length"
        );
        BoxSet { lower, upper }
    }

    /// The whole space `R^dim`.
    pub fn unbounded(dim: usize) -> Self {
        BoxSet {
            lower: vec![F::neg_infinity(); dim],
            upper: vec![F::infinity(); dim],
        }
    }

    /// The single point `{ value }`.
    pub fn point(value: Vec<F>) -> Self {
        BoxSet {
            lower: value.clone(),
            upper: value,
        }
    }

    /// The origin of `R^dim`, i.e. `g(x) = 0`.
    pub fn zeros(dim: usize) -> Self {
        Self::point(vec![F::zero(); dim])
    }

    /// Same scalar bounds on every component.
    pub fn uniform(dim: usize, lower: F, upper: F) -> Self {
        BoxSet {
            lower: vec![lower; dim],
            upper: vec![upper; dim],
        }
    }

    pub fn dim(&self) -> usize {
        self.lower.len()
    }

    pub fn lower(&self) -> &[F] {
        &self.lower
    }

    pub fn upper(&self) -> &[F] {
        &self.upper
    }

    /// Reject bounds that make the projection ill-defined.
    pub fn validate(&self, role: SetRole) -> Result<(), InputError> {
        for (index, (&lo, &hi)) in self.lower.iter().zip(&self.upper).enumerate() {
            if lo.is_nan() || hi.is_nan() {
                return Err(InputError::NanBound { set: role, index });
            }
            if lo > hi {
                return Err(InputError::InvertedBounds {
                    set: role,
                    index,
                    lower: lo.to_f64().unwrap_or(f64::NAN),
                    upper: hi.to_f64().unwrap_or(f64::NAN),
                });
            }
        }
        Ok(())
    }

    /// Componentwise membership test.
    pub fn contains(&self, v: &[F]) -> bool {
        debug_assert_eq!(v.len(), self.dim());
        v.iter()
            .zip(self.lower.iter().zip(&self.upper))
            .all(|(&vi, (&lo, &hi))| lo <= vi && vi <= hi)
    }

    /// Euclidean projection of `v`, written to `out`.
    ///
    /// NaN components pass through unchanged.
    pub fn project_into(&self, v: &[F], out: &mut [F]) {
        debug_assert_eq!(v.len(), self.dim());
        debug_assert_eq!(out.len(), self.dim());
        for i in 0..out.len() {
            out[i] = clamp(v[i], self.lower[i], self.upper[i]);
        }
    }

    pub fn project_in_place(&self, v: &mut [F]) {
        debug_assert_eq!(v.len(), self.dim());
        for (i, vi) in v.iter_mut().enumerate() {
            *vi = clamp(*vi, self.lower[i], self.upper[i]);
        }
    }

    /// Euclidean projection of `v`.
    pub fn project(&self, v: &[F]) -> Vec<F> {
        let mut out = vec![F::zero(); v.len()];
        self.project_into(v, &mut out);
        out
    }

    /// Clamp Lagrange multipliers associated with this set.
    ///
    /// A side with a finite bound limits `y_i` to `bound` in magnitude; a side
    /// with an infinite bound forces that sign of `y_i` to zero.
    pub fn project_multipliers(&self, y: &mut [F], bound: F) {
        debug_assert_eq!(y.len(), self.dim());
        for (i, yi) in y.iter_mut().enumerate() {
            let y_lb = if self.lower[i] == F::neg_infinity() {
                F::zero()
            } else {
                -bound
            };
            let y_ub = if self.upper[i] == F::infinity() {
                F::zero()
            } else {
                bound
            };
            *yi = yi.max(y_lb).min(y_ub);
        }
    }
}

#[inline]
fn clamp<F: Float>(v: F, lo: F, hi: F) -> F {
    if v < lo {
        lo
    } else if v > hi {
        hi
    } else {
        v
    }
}
