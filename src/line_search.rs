use num_traits::Float;

use crate::lipschitz::StepSize;
use crate::merit::Merit;
use crate::problem::Problem;
use crate::report::{LineSearchEvent, Reporter};
use crate::vec_ops::constant;
use crate::workspace::Workspace;

/// Parameters for the backtracking search on the forward-backward envelope.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineSearchParams<F> {
    /// Smallest step `τ` tried before the search is declared stalled
    /// (default: 1e-12).
    pub tau_min: F,
}

impl Default for LineSearchParams<f64> {
    fn default() -> Self {
        LineSearchParams { tau_min: 1e-12 }
    }
}

impl Default for LineSearchParams<f32> {
    fn default() -> Self {
        LineSearchParams { tau_min: 1e-6 }
    }
}

/// How a line search ended.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LineSearchOutcome<F> {
    /// Last step tried.
    pub(crate) tau: F,
    /// False when `τ` dropped below `τ_min` without sufficient decrease.
    pub(crate) accepted: bool,
}

/// Backtracking on `φ` along `xₖ₊₁ = xₖ - (1-τ) rₖ - τ dₖ`, `τ = 1, ½, ¼, …`.
///
/// Reads `ws.current` and `ws.direction`; leaves the last trial point fully
/// evaluated in `ws.candidate`, whether or not it was accepted.
pub(crate) fn line_search<F, P, R>(
    merit: &mut Merit<'_, F, P>,
    ws: &mut Workspace<F>,
    step: &StepSize<F>,
    params: &LineSearchParams<F>,
    reporter: &mut R,
    iteration: usize,
) -> Result<LineSearchOutcome<F>, P::Error>
where
    F: Float,
    P: Problem<F>,
    R: Reporter<F>,
{
    let c = merit.problem().c();
    let current = &ws.current;
    let candidate = &mut ws.candidate;
    let direction = &ws.direction;

    let phi = current.phi(step);
    let threshold = phi - step.sufficient_decrease(current.norm_sq_r);
    let half = constant::<F>(0.5);
    let mut tau = F::one();

    loop {
        let one_minus_tau = F::one() - tau;
        for i in 0..candidate.x.len() {
            candidate.x[i] = current.x[i] - one_minus_tau * current.r[i] - tau * direction[i];
        }
        candidate.psi = merit.value_and_gradient(
            &candidate.x,
            &mut candidate.z_hat,
            &mut candidate.grad_psi,
        )?;
        candidate.gradient_step(c, step.gamma());
        let phi_candidate = candidate.phi(step);

        let event = LineSearchEvent {
            iteration,
            tau,
            phi,
            phi_candidate,
            threshold,
        };

        if phi_candidate <= threshold {
            reporter.on_line_search_accept(&event);
            return Ok(LineSearchOutcome {
                tau,
                accepted: true,
            });
        }

        let next_tau = tau * half;
        if next_tau < params.tau_min {
            reporter.on_line_search_stalled(&event);
            return Ok(LineSearchOutcome {
                tau,
                accepted: false,
            });
        }
        reporter.on_line_search_retry(&event);
        tau = next_tau;
    }
}
