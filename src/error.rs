use thiserror::Error;

use crate::set::SetRole;

/// Malformed problem data detected before the first iteration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    /// A penalty weight is not a finite positive number.
    #[error("penalty weight sigma[{index}] = {value} must be finite and strictly positive")]
    NonPositiveWeight { index: usize, value: f64 },

    /// Lower bound exceeds upper bound.
    #[error("set {set}: lower bound {lower} exceeds upper bound {upper} at index {index}")]
    InvertedBounds {
        set: SetRole,
        index: usize,
        lower: f64,
        upper: f64,
    },

    /// A bound is NaN.
    #[error("set {set}: NaN bound at index {index}")]
    NanBound { set: SetRole, index: usize },
}

/// Failure outcomes of a PANOC solve.
///
/// `E` is the error type of the problem's oracles, passed through unchanged.
#[derive(Debug, Error)]
pub enum PanocError<E> {
    /// The outer loop ran out of iterations before the fixed-point residual
    /// dropped below the tolerance.
    #[error("maximum iterations exceeded after {iterations} iterations (residual {residual:e})")]
    MaxIterationsExceeded { iterations: usize, residual: f64 },

    /// The step-size adaptation kept failing the descent test, or the
    /// Lipschitz estimate is not finite.
    #[error(
        "step-size adaptation did not satisfy the descent condition at iteration {iteration} \
         after {updates} updates (L = {lipschitz:e})"
    )]
    NumericalOverflow {
        iteration: usize,
        updates: usize,
        lipschitz: f64,
    },

    /// Penalty weights or set bounds violate the input contract.
    #[error("degenerate projection: {0}")]
    DegenerateProjection(#[from] InputError),

    /// A solver parameter is out of range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: &'static str,
    },

    /// An in/out buffer does not match the problem dimensions.
    #[error("dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The reporter requested cancellation.
    #[error("solve interrupted after {iterations} iterations")]
    Interrupted { iterations: usize },

    /// An oracle call failed.
    #[error("oracle evaluation failed: {0}")]
    Oracle(#[source] E),
}

impl<E> PanocError<E> {
    /// True for outcomes caused by the iteration itself rather than by
    /// malformed input or a failing oracle.
    pub fn is_convergence_failure(&self) -> bool {
        matches!(
            self,
            PanocError::MaxIterationsExceeded { .. }
                | PanocError::NumericalOverflow { .. }
                | PanocError::Interrupted { .. }
        )
    }
}
