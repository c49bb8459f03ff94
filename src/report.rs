use num_traits::Float;

use crate::result::PanocStats;

/// Start of an outer iteration, after the stopping measure was evaluated.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IterationEvent<F> {
    pub iteration: usize,
    /// `ψ(xₖ)`.
    pub psi: F,
    /// Fixed-point residual `εₖ`.
    pub residual: F,
    pub lipschitz: F,
    pub gamma: F,
    /// `‖rₖ‖`.
    pub norm_r: F,
    /// Correction pairs held by L-BFGS entering this iteration.
    pub lbfgs_pairs: usize,
}

/// One doubling of `L` after a failed descent test.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepSizeEvent<F> {
    pub iteration: usize,
    /// 1-based count of doublings within this iteration.
    pub update: usize,
    pub lipschitz: F,
    pub gamma: F,
    pub sigma: F,
}

/// One trial step `τ` of the line search.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineSearchEvent<F> {
    pub iteration: usize,
    pub tau: F,
    /// `φ(xₖ)`.
    pub phi: F,
    /// `φ(xₖ₊₁)` at this trial step.
    pub phi_candidate: F,
    /// Acceptance threshold `φ(xₖ) - σ‖rₖ‖²/γ²`.
    pub threshold: F,
}

/// Observer of solver progress.
///
/// All methods default to doing nothing. `should_stop` is polled once per
/// outer iteration and can cancel the solve.
pub trait Reporter<F> {
    fn on_iteration(&mut self, event: &IterationEvent<F>) {
        let _ = event;
    }

    fn on_step_size_update(&mut self, event: &StepSizeEvent<F>) {
        let _ = event;
    }

    /// A trial step was rejected and `τ` will be halved.
    fn on_line_search_retry(&mut self, event: &LineSearchEvent<F>) {
        let _ = event;
    }

    fn on_line_search_accept(&mut self, event: &LineSearchEvent<F>) {
        let _ = event;
    }

    /// `τ` fell below `τ_min`; the last trial point is used anyway.
    fn on_line_search_stalled(&mut self, event: &LineSearchEvent<F>) {
        let _ = event;
    }

    fn on_finish(&mut self, stats: &PanocStats<F>) {
        let _ = stats;
    }

    fn should_stop(&mut self, iteration: usize) -> bool {
        let _ = iteration;
        false
    }
}

impl<F, R: Reporter<F> + ?Sized> Reporter<F> for &mut R {
    fn on_iteration(&mut self, event: &IterationEvent<F>) {
        (**self).on_iteration(event);
    }

    fn on_step_size_update(&mut self, event: &StepSizeEvent<F>) {
        (**self).on_step_size_update(event);
    }

    fn on_line_search_retry(&mut self, event: &LineSearchEvent<F>) {
        (**self).on_line_search_retry(event);
    }

    fn on_line_search_accept(&mut self, event: &LineSearchEvent<F>) {
        (**self).on_line_search_accept(event);
    }

    fn on_line_search_stalled(&mut self, event: &LineSearchEvent<F>) {
        (**self).on_line_search_stalled(event);
    }

    fn on_finish(&mut self, stats: &PanocStats<F>) {
        (**self).on_finish(stats);
    }

    fn should_stop(&mut self, iteration: usize) -> bool {
        (**self).should_stop(iteration)
    }
}

/// Reporter that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl<F> Reporter<F> for NoopReporter {}

/// Forwards events to the [`log`] facade under target `panoc`.
///
/// Iterations are logged at `debug`, step-size updates and line-search trials
/// at `trace`, stalls at `warn` and the final summary at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl<F: Float> Reporter<F> for LogReporter {
    fn on_iteration(&mut self, e: &IterationEvent<F>) {
        log::debug!(
            target: "panoc",
            "iter={} psi={:.6e} eps={:.3e} L={:.3e} gamma={:.3e} norm_r={:.3e} pairs={}",
            e.iteration,
            as_f64(e.psi),
            as_f64(e.residual),
            as_f64(e.lipschitz),
            as_f64(e.gamma),
            as_f64(e.norm_r),
            e.lbfgs_pairs,
        );
    }

    fn on_step_size_update(&mut self, e: &StepSizeEvent<F>) {
        log::trace!(
            target: "panoc",
            "iter={} update={} L={:.3e} gamma={:.3e} sigma={:.3e}",
            e.iteration,
            e.update,
            as_f64(e.lipschitz),
            as_f64(e.gamma),
            as_f64(e.sigma),
        );
    }

    fn on_line_search_retry(&mut self, e: &LineSearchEvent<F>) {
        log::trace!(
            target: "panoc",
            "iter={} tau={:.3e} phi={:.6e} phi_next={:.6e} threshold={:.6e} rejected",
            e.iteration,
            as_f64(e.tau),
            as_f64(e.phi),
            as_f64(e.phi_candidate),
            as_f64(e.threshold),
        );
    }

    fn on_line_search_accept(&mut self, e: &LineSearchEvent<F>) {
        log::trace!(
            target: "panoc",
            "iter={} tau={:.3e} phi_next={:.6e} accepted",
            e.iteration,
            as_f64(e.tau),
            as_f64(e.phi_candidate),
        );
    }

    fn on_line_search_stalled(&mut self, e: &LineSearchEvent<F>) {
        log::warn!(
            target: "panoc",
            "iter={} line search stalled at tau={:.3e} (phi={:.6e}, phi_next={:.6e})",
            e.iteration,
            as_f64(e.tau),
            as_f64(e.phi),
            as_f64(e.phi_candidate),
        );
    }

    fn on_finish(&mut self, stats: &PanocStats<F>) {
        log::info!(
            target: "panoc",
            "converged iterations={} eps={:.3e} L={:.3e} step_size_updates={} stalls={} f_evals={} grad_evals={}",
            stats.iterations,
            as_f64(stats.residual),
            as_f64(stats.lipschitz),
            stats.step_size_updates,
            stats.line_search_failures,
            stats.f_evals,
            stats.grad_evals,
        );
    }
}

fn as_f64<F: Float>(v: F) -> f64 {
    v.to_f64().unwrap_or(f64::NAN)
}
