use num_traits::Float;

use crate::error::{InputError, PanocError};
use crate::lbfgs::{Lbfgs, LbfgsParams};
use crate::line_search::{line_search, LineSearchParams};
use crate::lipschitz::{estimate_lipschitz, LipschitzParams, StepSize};
use crate::merit::{constraint_residual, stopping_residual, Merit};
use crate::problem::Problem;
use crate::report::{IterationEvent, NoopReporter, Reporter, StepSizeEvent};
use crate::result::PanocStats;
use crate::set::SetRole;
use crate::workspace::Workspace;

/// Configuration for the PANOC solver.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PanocParams<F> {
    /// Maximum number of outer iterations (default: 100).
    pub max_iter: usize,
    /// Quasi-Newton memory.
    pub lbfgs: LbfgsParams<F>,
    /// Initial Lipschitz estimate and step-size adaptation.
    pub lipschitz: LipschitzParams<F>,
    /// Line search on the forward-backward envelope.
    pub line_search: LineSearchParams<F>,
}

impl Default for PanocParams<f64> {
    fn default() -> Self {
        PanocParams {
            max_iter: 100,
            lbfgs: LbfgsParams::default(),
            lipschitz: LipschitzParams::default(),
            line_search: LineSearchParams::default(),
        }
    }
}

impl Default for PanocParams<f32> {
    fn default() -> Self {
        PanocParams {
            max_iter: 100,
            lbfgs: LbfgsParams::default(),
            lipschitz: LipschitzParams::default(),
            line_search: LineSearchParams::default(),
        }
    }
}

impl<F: Float> PanocParams<F> {
    fn validate<E>(&self) -> Result<(), PanocError<E>> {
        fn invalid<E>(name: &'static str, reason: &'static str) -> Result<(), PanocError<E>> {
            Err(PanocError::InvalidParameter { name, reason })
        }
        let positive = |v: F| v > F::zero() && v.is_finite();

        if self.max_iter == 0 {
            return invalid("max_iter", "must be at least 1");
        }
        if self.lbfgs.memory == 0 {
            return invalid("lbfgs.memory", "must be at least 1");
        }
        if !(self.lbfgs.curvature_tol >= F::zero() && self.lbfgs.curvature_tol.is_finite()) {
            return invalid("lbfgs.curvature_tol", "must be finite and non-negative");
        }
        if !positive(self.lipschitz.epsilon) {
            return invalid("lipschitz.epsilon", "must be finite and positive");
        }
        if !positive(self.lipschitz.delta) {
            return invalid("lipschitz.delta", "must be finite and positive");
        }
        if !positive(self.lipschitz.l_min) {
            return invalid("lipschitz.l_min", "must be finite and positive");
        }
        if !(positive(self.line_search.tau_min) && self.line_search.tau_min < F::one()) {
            return invalid("line_search.tau_min", "must lie in (0, 1)");
        }
        Ok(())
    }
}

/// PANOC solver for
///
/// ```text
/// minimize f(x)  subject to  x ∈ C,  g(x) ∈ D
/// ```
///
/// with fixed penalty weights `Σ` and multipliers `y`.
///
/// The solver keeps no state between solves: every call estimates a fresh
/// step size and starts with an empty L-BFGS memory. Progress is reported
/// through the attached [`Reporter`], which defaults to [`NoopReporter`].
#[derive(Debug, Clone)]
pub struct PanocSolver<F, R = NoopReporter> {
    params: PanocParams<F>,
    reporter: R,
}

impl<F: Float> PanocSolver<F> {
    pub fn new(params: PanocParams<F>) -> Self {
        PanocSolver {
            params,
            reporter: NoopReporter,
        }
    }
}

impl<F: Float, R: Reporter<F>> PanocSolver<F, R> {
    /// Replace the reporter.
    pub fn with_reporter<R2: Reporter<F>>(self, reporter: R2) -> PanocSolver<F, R2> {
        PanocSolver {
            params: self.params,
            reporter,
        }
    }

    pub fn params(&self) -> &PanocParams<F> {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut PanocParams<F> {
        &mut self.params
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn reporter_mut(&mut self) -> &mut R {
        &mut self.reporter
    }

    pub fn into_reporter(self) -> R {
        self.reporter
    }

    /// Run PANOC from the initial guess in `x`.
    ///
    /// - `x` (in/out, length `n`): initial guess; the solution `x̂` on success.
    /// - `z` (out, length `m`): slack `ẑ` at the solution.
    /// - `y` (in/out, length `m`): multipliers; replaced by `ŷ` on success.
    /// - `err_z` (out, length `m`): constraint residual `g(x̂) - ẑ`.
    /// - `sigma` (length `m`): strictly positive penalty weights.
    /// - `eps`: tolerance on the fixed-point residual.
    ///
    /// The buffers are written only on success.
    #[allow(clippy::too_many_arguments)]
    pub fn solve<P: Problem<F>>(
        &mut self,
        problem: &P,
        x: &mut [F],
        z: &mut [F],
        y: &mut [F],
        err_z: &mut [F],
        sigma: &[F],
        eps: F,
    ) -> Result<PanocStats<F>, PanocError<P::Error>> {
        let n = problem.num_vars();
        let m = problem.num_constraints();
        check_inputs(problem, x, z, y, err_z, sigma)?;
        self.params.validate::<P::Error>()?;
        if !(eps > F::zero()) {
            return Err(PanocError::InvalidParameter {
                name: "eps",
                reason: "tolerance must be positive",
            });
        }

        let params = &self.params;
        let reporter = &mut self.reporter;
        let c = problem.c();

        let y0 = y.to_vec();
        let mut merit = Merit::new(problem, sigma, &y0);
        let mut ws = Workspace::new(n, m);
        let mut lbfgs = Lbfgs::new(n, &params.lbfgs);

        // Initial point: ẑ₀, ∇ψ₀, ψ₀ and the step size
        ws.current.x.copy_from_slice(x);
        {
            let cur = &mut ws.current;
            cur.psi = merit
                .value_and_gradient(&cur.x, &mut cur.z_hat, &mut cur.grad_psi)
                .map_err(PanocError::Oracle)?;
        }
        let lipschitz =
            estimate_lipschitz(&mut merit, &ws.current.x, &ws.current.grad_psi, &params.lipschitz)
                .map_err(PanocError::Oracle)?;
        if !lipschitz.is_finite() {
            return Err(PanocError::NumericalOverflow {
                iteration: 0,
                updates: 0,
                lipschitz: lipschitz.to_f64().unwrap_or(f64::NAN),
            });
        }
        let mut step = StepSize::from_lipschitz(lipschitz.max(params.lipschitz.l_min));
        ws.current.gradient_step(c, step.gamma());

        let mut step_size_updates = 0;
        let mut line_search_failures = 0;
        let mut last_tau = F::one();
        let mut residual = F::infinity();

        for k in 0..params.max_iter {
            if reporter.should_stop(k) {
                return Err(PanocError::Interrupted { iterations: k });
            }

            // ẑ, ŷ, ∇ψ and ψ at x̂ₖ
            let mut psi_hat = merit
                .value_and_gradient(
                    &ws.current.x_hat,
                    &mut ws.z_hat_trial,
                    &mut ws.grad_psi_hat,
                )
                .map_err(PanocError::Oracle)?;

            residual = stopping_residual(
                step.gamma(),
                &ws.current.r,
                &ws.grad_psi_hat,
                &ws.current.grad_psi,
                &mut ws.fixed_point,
            );
            reporter.on_iteration(&IterationEvent {
                iteration: k,
                psi: ws.current.psi,
                residual,
                lipschitz: step.lipschitz(),
                gamma: step.gamma(),
                norm_r: ws.current.norm_sq_r.sqrt(),
                lbfgs_pairs: lbfgs.len(),
            });

            if residual <= eps {
                x.copy_from_slice(&ws.current.x_hat);
                z.copy_from_slice(&ws.z_hat_trial);
                y.copy_from_slice(merit.y_hat());
                constraint_residual(merit.constraint(), z, err_z);

                let stats = PanocStats {
                    iterations: k,
                    residual,
                    lipschitz: step.lipschitz(),
                    gamma: step.gamma(),
                    sigma: step.sigma(),
                    step_size_updates,
                    line_search_failures,
                    last_tau,
                    f_evals: merit.f_evals(),
                    grad_evals: merit.grad_evals(),
                };
                reporter.on_finish(&stats);
                return Ok(stats);
            }

            // Shrink γ until the descent lemma holds at x̂ₖ
            let mut updates = 0;
            loop {
                let cur = &ws.current;
                let bound = step.descent_bound(cur.psi, cur.grad_psi_dot_r, cur.norm_sq_r);
                if !(psi_hat > bound) {
                    break;
                }
                if updates == params.lipschitz.max_updates {
                    return Err(PanocError::NumericalOverflow {
                        iteration: k,
                        updates,
                        lipschitz: step.lipschitz().to_f64().unwrap_or(f64::NAN),
                    });
                }
                lbfgs.reset();
                step.tighten();
                updates += 1;
                step_size_updates += 1;
                reporter.on_step_size_update(&StepSizeEvent {
                    iteration: k,
                    update: updates,
                    lipschitz: step.lipschitz(),
                    gamma: step.gamma(),
                    sigma: step.sigma(),
                });

                ws.current.gradient_step(c, step.gamma());
                psi_hat = merit
                    .value(&ws.current.x_hat, &mut ws.z_hat_trial)
                    .map_err(PanocError::Oracle)?;
            }

            lbfgs.apply(F::one(), &ws.current.r, &mut ws.direction);

            let outcome = line_search(
                &mut merit,
                &mut ws,
                &step,
                &params.line_search,
                &mut *reporter,
                k,
            )
            .map_err(PanocError::Oracle)?;
            if !outcome.accepted {
                line_search_failures += 1;
            }
            last_tau = outcome.tau;

            let (s, yk) = ws.curvature_pair();
            lbfgs.update(s, yk);
            ws.advance();
        }

        Err(PanocError::MaxIterationsExceeded {
            iterations: params.max_iter,
            residual: residual.to_f64().unwrap_or(f64::NAN),
        })
    }
}

/// Solve with a default solver and no reporter.
///
/// Shorthand for `PanocSolver::new(params.clone()).solve(...)`.
#[allow(clippy::too_many_arguments)]
pub fn panoc<F: Float, P: Problem<F>>(
    problem: &P,
    x: &mut [F],
    z: &mut [F],
    y: &mut [F],
    err_z: &mut [F],
    sigma: &[F],
    eps: F,
    params: &PanocParams<F>,
) -> Result<PanocStats<F>, PanocError<P::Error>> {
    PanocSolver::new(params.clone()).solve(problem, x, z, y, err_z, sigma, eps)
}

fn check_inputs<F: Float, P: Problem<F>>(
    problem: &P,
    x: &[F],
    z: &[F],
    y: &[F],
    err_z: &[F],
    sigma: &[F],
) -> Result<(), PanocError<P::Error>> {
    let n = problem.num_vars();
    let m = problem.num_constraints();
    if n == 0 {
        return Err(PanocError::InvalidParameter {
            name: "n",
            reason: "problem has no decision variables",
        });
    }

    let lengths = [
        ("x", n, x.len()),
        ("C", n, problem.c().dim()),
        ("D", m, problem.d().dim()),
        ("z", m, z.len()),
        ("y", m, y.len()),
        ("err_z", m, err_z.len()),
        ("sigma", m, sigma.len()),
    ];
    for (what, expected, actual) in lengths {
        if expected != actual {
            return Err(PanocError::DimensionMismatch {
                what,
                expected,
                actual,
            });
        }
    }

    problem.c().validate(SetRole::C)?;
    problem.d().validate(SetRole::D)?;
    for (index, &s) in sigma.iter().enumerate() {
        if !(s > F::zero() && s.is_finite()) {
            return Err(InputError::NonPositiveWeight {
                index,
                value: s.to_f64().unwrap_or(f64::NAN),
            }
            .into());
        }
    }
    Ok(())
}
