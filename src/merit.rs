//! Augmented merit function of the penalized problem.
//!
//! With penalty weights `Σ` and multipliers `y`, PANOC minimizes
//!
//! ```text
//! ψ(x) = f(x) + ½ dist²_Σ(g(x) + Σ⁻¹y, D)
//! ```
//!
//! over `x ∈ C`. The free functions below are the building blocks; they only
//! write their declared outputs and give identical results for identical
//! inputs.

use num_traits::Float;

use crate::problem::Problem;
use crate::set::BoxSet;
use crate::vec_ops::{axpy, constant, norm_inf, sub_into};

/// Slack estimate `ẑ = Π(g(x) + Σ⁻¹y, D)`.
pub fn calc_z_hat<F: Float>(d: &BoxSet<F>, g_x: &[F], sigma_inv_y: &[F], z_hat: &mut [F]) {
    debug_assert_eq!(g_x.len(), sigma_inv_y.len());
    debug_assert_eq!(g_x.len(), z_hat.len());
    for i in 0..z_hat.len() {
        z_hat[i] = g_x[i] + sigma_inv_y[i];
    }
    d.project_in_place(z_hat);
}

/// Multiplier estimate `ŷ = Σ ∘ (g(x) - ẑ) + y`.
pub fn calc_y_hat<F: Float>(z_hat: &[F], g_x: &[F], y: &[F], sigma: &[F], y_hat: &mut [F]) {
    debug_assert_eq!(z_hat.len(), g_x.len());
    debug_assert_eq!(y.len(), sigma.len());
    debug_assert_eq!(y_hat.len(), y.len());
    for i in 0..y_hat.len() {
        y_hat[i] = sigma[i] * (g_x[i] - z_hat[i]) + y[i];
    }
}

/// Merit value `ψ(x) = f(x) + ½ Σᵢ σᵢ (g(x)ᵢ + σᵢ⁻¹yᵢ - ẑᵢ)²`.
///
/// `g_x` and `z_hat` must belong to the same `x`.
pub fn calc_psi<F: Float, P: Problem<F>>(
    problem: &P,
    x: &[F],
    g_x: &[F],
    sigma_inv_y: &[F],
    z_hat: &[F],
    sigma: &[F],
) -> Result<F, P::Error> {
    let mut penalty = F::zero();
    for i in 0..z_hat.len() {
        let d = g_x[i] + sigma_inv_y[i] - z_hat[i];
        penalty = penalty + sigma[i] * d * d;
    }
    Ok(problem.f(x)? + constant::<F>(0.5) * penalty)
}

/// Merit gradient `∇ψ(x) = ∇f(x) + ∇g(x) ŷ`.
///
/// `grad_g` is scratch space of length `n`.
pub fn calc_grad_psi<F: Float, P: Problem<F>>(
    problem: &P,
    x: &[F],
    y_hat: &[F],
    grad_g: &mut [F],
    grad_psi: &mut [F],
) -> Result<(), P::Error> {
    problem.grad_f(x, grad_psi)?;
    problem.grad_g(x, y_hat, grad_g)?;
    for i in 0..grad_psi.len() {
        grad_psi[i] = grad_psi[i] + grad_g[i];
    }
    Ok(())
}

/// Fixed-point residual of the proximal gradient map,
/// `‖γ⁻¹r + ∇ψ(x̂) - ∇ψ(x)‖_∞`.
///
/// `scratch` (length `n`) receives the residual vector.
pub fn stopping_residual<F: Float>(
    gamma: F,
    r: &[F],
    grad_psi_hat: &[F],
    grad_psi: &[F],
    scratch: &mut [F],
) -> F {
    sub_into(scratch, grad_psi_hat, grad_psi);
    axpy(scratch, gamma.recip(), r);
    norm_inf(scratch)
}

/// Evaluates ψ and ∇ψ for one solve.
///
/// Holds the constant data of the solve (`Σ`, `y`, `Σ⁻¹y`) and scratch
/// buffers. After every evaluation `constraint()` and `y_hat()` refer to the
/// most recently evaluated point.
pub(crate) struct Merit<'a, F, P> {
    problem: &'a P,
    sigma: &'a [F],
    y: &'a [F],
    sigma_inv_y: Vec<F>,
    g: Vec<F>,
    grad_g: Vec<F>,
    y_hat: Vec<F>,
    f_evals: usize,
    grad_evals: usize,
}

impl<'a, F: Float, P: Problem<F>> Merit<'a, F, P> {
    pub(crate) fn new(problem: &'a P, sigma: &'a [F], y: &'a [F]) -> Self {
        let n = problem.num_vars();
        let m = problem.num_constraints();
        let sigma_inv_y = y.iter().zip(sigma).map(|(&yi, &si)| yi / si).collect();
        Merit {
            problem,
            sigma,
            y,
            sigma_inv_y,
            g: vec![F::zero(); m],
            grad_g: vec![F::zero(); n],
            y_hat: vec![F::zero(); m],
            f_evals: 0,
            grad_evals: 0,
        }
    }

    pub(crate) fn problem(&self) -> &'a P {
        self.problem
    }

    /// `g` at the last evaluated point.
    pub(crate) fn constraint(&self) -> &[F] {
        &self.g
    }

    /// `ŷ` at the last point where the gradient was evaluated.
    pub(crate) fn y_hat(&self) -> &[F] {
        &self.y_hat
    }

    pub(crate) fn f_evals(&self) -> usize {
        self.f_evals
    }

    pub(crate) fn grad_evals(&self) -> usize {
        self.grad_evals
    }

    /// `ẑ` and `ψ` at `x`.
    pub(crate) fn value(&mut self, x: &[F], z_hat: &mut [F]) -> Result<F, P::Error> {
        self.problem.g(x, &mut self.g)?;
        calc_z_hat(self.problem.d(), &self.g, &self.sigma_inv_y, z_hat);
        self.psi(x, z_hat)
    }

    /// `ẑ`, `ŷ` and `∇ψ` at `x`.
    pub(crate) fn gradient(
        &mut self,
        x: &[F],
        z_hat: &mut [F],
        grad_psi: &mut [F],
    ) -> Result<(), P::Error> {
        self.problem.g(x, &mut self.g)?;
        calc_z_hat(self.problem.d(), &self.g, &self.sigma_inv_y, z_hat);
        calc_y_hat(z_hat, &self.g, self.y, self.sigma, &mut self.y_hat);
        self.grad_evals += 1;
        calc_grad_psi(self.problem, x, &self.y_hat, &mut self.grad_g, grad_psi)
    }

    /// `ẑ`, `ŷ`, `∇ψ` and `ψ` at `x` with a single evaluation of `g`.
    pub(crate) fn value_and_gradient(
        &mut self,
        x: &[F],
        z_hat: &mut [F],
        grad_psi: &mut [F],
    ) -> Result<F, P::Error> {
        self.gradient(x, z_hat, grad_psi)?;
        self.psi(x, z_hat)
    }

    fn psi(&mut self, x: &[F], z_hat: &[F]) -> Result<F, P::Error> {
        self.f_evals += 1;
        calc_psi(
            self.problem,
            x,
            &self.g,
            &self.sigma_inv_y,
            z_hat,
            self.sigma,
        )
    }
}

/// Constraint residual `g(x̂) - ẑ` reported on convergence.
pub(crate) fn constraint_residual<F: Float>(g_x: &[F], z_hat: &[F], err_z: &mut [F]) {
    for i in 0..err_z.len() {
        err_z[i] = g_x[i] - z_hat[i];
    }
}
