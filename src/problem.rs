use num_traits::Float;

use crate::set::BoxSet;

/// Oracle interface of a problem
///
/// ```text
/// minimize f(x)  subject to  x ∈ C,  g(x) ∈ D
/// ```
///
/// with `x ∈ R^n` and `g(x) ∈ R^m`.
///
/// Methods take `&self`: the solver never mutates a problem, so one instance
/// can be shared by several solves running on different threads. Oracles
/// that cannot fail use [`std::convert::Infallible`] as their error type.
pub trait Problem<F: Float> {
    /// Error reported by a failing oracle; returned to the caller as
    /// [`PanocError::Oracle`](crate::PanocError::Oracle).
    type Error: std::error::Error + 'static;

    /// Feasible set of the decision variables.
    fn c(&self) -> &BoxSet<F>;

    /// Target set of the constraint map.
    fn d(&self) -> &BoxSet<F>;

    /// Number of decision variables `n`.
    fn num_vars(&self) -> usize {
        self.c().dim()
    }

    /// Number of constraints `m`.
    fn num_constraints(&self) -> usize {
        self.d().dim()
    }

    /// Objective value `f(x)`.
    fn f(&self, x: &[F]) -> Result<F, Self::Error>;

    /// Objective gradient `∇f(x)`, written to `grad`.
    fn grad_f(&self, x: &[F], grad: &mut [F]) -> Result<(), Self::Error>;

    /// Constraint map `g(x)`, written to `gx`.
    fn g(&self, x: &[F], gx: &mut [F]) -> Result<(), Self::Error>;

    /// Adjoint product `∇g(x) y = Jg(x)ᵀ y`, written to `grad`.
    fn grad_g(&self, x: &[F], y: &[F], grad: &mut [F]) -> Result<(), Self::Error>;
}

impl<F: Float, P: Problem<F> + ?Sized> Problem<F> for &P {
    type Error = P::Error;

    fn c(&self) -> &BoxSet<F> {
        (**self).c()
    }

    fn d(&self) -> &BoxSet<F> {
        (**self).d()
    }

    fn num_vars(&self) -> usize {
        (**self).num_vars()
    }

    fn num_constraints(&self) -> usize {
        (**self).num_constraints()
    }

    fn f(&self, x: &[F]) -> Result<F, Self::Error> {
        (**self).f(x)
    }

    fn grad_f(&self, x: &[F], grad: &mut [F]) -> Result<(), Self::Error> {
        (**self).grad_f(x, grad)
    }

    fn g(&self, x: &[F], gx: &mut [F]) -> Result<(), Self::Error> {
        (**self).g(x, gx)
    }

    fn grad_g(&self, x: &[F], y: &[F], grad: &mut [F]) -> Result<(), Self::Error> {
        (**self).grad_g(x, y, grad)
    }
}
