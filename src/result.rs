/// Summary of a converged PANOC solve.
///
/// The solution itself is written to the caller's `x`, `z`, `y` and `err_z`
/// buffers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PanocStats<F> {
    /// Number of outer iterations performed.
    pub iterations: usize,
    /// Final fixed-point residual `εₖ`.
    pub residual: F,
    /// Final Lipschitz estimate `L`.
    pub lipschitz: F,
    /// Final proximal step `γ`.
    pub gamma: F,
    /// Final line-search constant `σ`.
    pub sigma: F,
    /// Total number of doublings of `L` inside the loop.
    pub step_size_updates: usize,
    /// Number of line searches that ended with `τ < τ_min`.
    pub line_search_failures: usize,
    /// Step `τ` accepted by the last line search (1 when no line search ran).
    pub last_tau: F,
    /// Evaluations of `f`.
    pub f_evals: usize,
    /// Evaluations of `∇f` (each paired with one of `∇g`).
    pub grad_evals: usize,
}
