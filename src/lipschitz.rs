use num_traits::Float;

use crate::merit::Merit;
use crate::problem::Problem;
use crate::vec_ops::{constant, norm, sub_into};

/// Parameters of the Lipschitz estimate and its in-loop adaptation.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LipschitzParams<F> {
    /// Relative finite-difference perturbation (default: 1e-6).
    pub epsilon: F,
    /// Absolute finite-difference perturbation (default: 1e-12).
    pub delta: F,
    /// Floor applied to the initial estimate, so a locally flat gradient
    /// does not produce an infinite step (default: 1e-6).
    pub l_min: F,
    /// Maximum number of doublings of `L` within one iteration before the
    /// solve fails with `NumericalOverflow` (default: 64).
    pub max_updates: usize,
}

impl Default for LipschitzParams<f64> {
    fn default() -> Self {
        LipschitzParams {
            epsilon: 1e-6,
            delta: 1e-12,
            l_min: 1e-6,
            max_updates: 64,
        }
    }
}

impl Default for LipschitzParams<f32> {
    fn default() -> Self {
        LipschitzParams {
            epsilon: 1e-3,
            delta: 1e-6,
            l_min: 1e-4,
            max_updates: 32,
        }
    }
}

/// Lipschitz estimate `L` with the proximal step `γ` and the line-search
/// constant `σ` derived from it.
///
/// The three values only change together.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepSize<F> {
    lipschitz: F,
    gamma: F,
    sigma: F,
}

impl<F: Float> StepSize<F> {
    /// `γ = 0.95 / L`, `σ = γ (1 - γL) / 2`.
    pub fn from_lipschitz(lipschitz: F) -> Self {
        let gamma = constant::<F>(0.95) / lipschitz;
        let sigma = gamma * (F::one() - gamma * lipschitz) * constant(0.5);
        StepSize {
            lipschitz,
            gamma,
            sigma,
        }
    }

    pub fn lipschitz(&self) -> F {
        self.lipschitz
    }

    pub fn gamma(&self) -> F {
        self.gamma
    }

    pub fn sigma(&self) -> F {
        self.sigma
    }

    /// Double `L`, halve `γ` and `σ`.
    pub fn tighten(&mut self) {
        let two = F::one() + F::one();
        self.lipschitz = self.lipschitz * two;
        self.gamma = self.gamma / two;
        self.sigma = self.sigma / two;
    }

    /// Right-hand side of the descent test
    /// `ψ(x̂) <= ψ(x) - ⟨∇ψ(x), r⟩ + (L/2)‖r‖² + 1e-6 |ψ(x)|`.
    pub fn descent_bound(&self, psi: F, grad_psi_dot_r: F, norm_sq_r: F) -> F {
        let margin = constant::<F>(1e-6) * psi.abs();
        psi - grad_psi_dot_r + constant::<F>(0.5) * self.lipschitz * norm_sq_r + margin
    }

    /// Forward-backward envelope `φ = ψ - ⟨∇ψ, r⟩ + ‖r‖² / (2γ)`.
    pub fn phi(&self, psi: F, grad_psi_dot_r: F, norm_sq_r: F) -> F {
        psi - grad_psi_dot_r + constant::<F>(0.5) / self.gamma * norm_sq_r
    }

    /// Required decrease of `φ` per accepted step, `σ‖r‖² / γ²`.
    pub fn sufficient_decrease(&self, norm_sq_r: F) -> F {
        self.sigma * norm_sq_r / (self.gamma * self.gamma)
    }
}

/// Finite-difference perturbation `h_i = max(|x_i| ε, δ)`.
pub fn finite_difference_step<F: Float>(x: &[F], params: &LipschitzParams<F>, h: &mut [F]) {
    debug_assert_eq!(x.len(), h.len());
    for i in 0..h.len() {
        h[i] = (x[i].abs() * params.epsilon).max(params.delta);
    }
}

/// `L ≈ ‖∇ψ(x + h) - ∇ψ(x)‖ / ‖h‖`.
///
/// `grad_psi` is `∇ψ(x)`. The raw quotient is returned; it may be zero or
/// non-finite.
pub(crate) fn estimate_lipschitz<F: Float, P: Problem<F>>(
    merit: &mut Merit<'_, F, P>,
    x: &[F],
    grad_psi: &[F],
    params: &LipschitzParams<F>,
) -> Result<F, P::Error> {
    let n = x.len();
    let m = merit.problem().num_constraints();
    let mut h = vec![F::zero(); n];
    finite_difference_step(x, params, &mut h);

    let mut x_h = vec![F::zero(); n];
    for i in 0..n {
        x_h[i] = x[i] + h[i];
    }
    let mut z_h = vec![F::zero(); m];
    let mut grad_h = vec![F::zero(); n];
    merit.gradient(&x_h, &mut z_h, &mut grad_h)?;

    let mut diff = x_h;
    sub_into(&mut diff, &grad_h, grad_psi);
    Ok(norm(&diff) / norm(&h))
}
