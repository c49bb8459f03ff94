use std::mem;

use num_traits::Float;

use crate::lipschitz::StepSize;
use crate::set::BoxSet;
use crate::vec_ops::{dot, norm_squared, step_into, sub_into};

/// Quantities attached to one primal point `x`.
#[derive(Debug, Clone)]
pub(crate) struct Iterate<F> {
    pub(crate) x: Vec<F>,
    /// Projected gradient step `Π(x - γ∇ψ(x), C)`.
    pub(crate) x_hat: Vec<F>,
    /// Fixed-point residual `x - x̂`.
    pub(crate) r: Vec<F>,
    /// Slack `ẑ(x)`.
    pub(crate) z_hat: Vec<F>,
    pub(crate) grad_psi: Vec<F>,
    pub(crate) psi: F,
    pub(crate) grad_psi_dot_r: F,
    pub(crate) norm_sq_r: F,
}

impl<F: Float> Iterate<F> {
    pub(crate) fn new(n: usize, m: usize) -> Self {
        Iterate {
            x: vec![F::zero(); n],
            x_hat: vec![F::zero(); n],
            r: vec![F::zero(); n],
            z_hat: vec![F::zero(); m],
            grad_psi: vec![F::zero(); n],
            psi: F::zero(),
            grad_psi_dot_r: F::zero(),
            norm_sq_r: F::zero(),
        }
    }

    /// Recompute `x̂`, `r`, `⟨∇ψ, r⟩` and `‖r‖²` from `x` and `∇ψ(x)` with
    /// step `γ`.
    pub(crate) fn gradient_step(&mut self, c: &BoxSet<F>, gamma: F) {
        step_into(&mut self.x_hat, &self.x, gamma, &self.grad_psi);
        c.project_in_place(&mut self.x_hat);
        sub_into(&mut self.r, &self.x, &self.x_hat);
        self.grad_psi_dot_r = dot(&self.grad_psi, &self.r);
        self.norm_sq_r = norm_squared(&self.r);
    }

    /// Forward-backward envelope at this point.
    pub(crate) fn phi(&self, step: &StepSize<F>) -> F {
        step.phi(self.psi, self.grad_psi_dot_r, self.norm_sq_r)
    }
}

/// Fixed arena of vectors for one solve.
///
/// `current` and `candidate` are swapped when a step is accepted, so no
/// vector is reallocated inside the loop.
pub(crate) struct Workspace<F> {
    pub(crate) current: Iterate<F>,
    pub(crate) candidate: Iterate<F>,
    /// `ẑ(x̂ₖ)`.
    pub(crate) z_hat_trial: Vec<F>,
    /// `∇ψ(x̂ₖ)`.
    pub(crate) grad_psi_hat: Vec<F>,
    /// `γ⁻¹r + ∇ψ(x̂) - ∇ψ(x)`, the stopping residual vector.
    pub(crate) fixed_point: Vec<F>,
    /// Quasi-Newton direction.
    pub(crate) direction: Vec<F>,
    pub(crate) s: Vec<F>,
    pub(crate) y: Vec<F>,
}

impl<F: Float> Workspace<F> {
    pub(crate) fn new(n: usize, m: usize) -> Self {
        Workspace {
            current: Iterate::new(n, m),
            candidate: Iterate::new(n, m),
            z_hat_trial: vec![F::zero(); m],
            grad_psi_hat: vec![F::zero(); n],
            fixed_point: vec![F::zero(); n],
            direction: vec![F::zero(); n],
            s: vec![F::zero(); n],
            y: vec![F::zero(); n],
        }
    }

    /// Curvature pair `s = xₖ₊₁ - xₖ`, `y = rₖ₊₁ - rₖ` of the pending step.
    pub(crate) fn curvature_pair(&mut self) -> (&[F], &[F]) {
        sub_into(&mut self.s, &self.candidate.x, &self.current.x);
        sub_into(&mut self.y, &self.candidate.r, &self.current.r);
        (&self.s, &self.y)
    }

    /// Make the candidate the current iterate.
    pub(crate) fn advance(&mut self) {
        mem::swap(&mut self.current, &mut self.candidate);
    }
}
