//! PANOC (proximal averaged Newton-type method for optimal control) for
//! problems of the form
//!
//! ```text
//! minimize f(x)  subject to  x ∈ C,  g(x) ∈ D
//! ```
//!
//! where `C` and `D` are boxes and the constraint `g(x) ∈ D` is handled by a
//! quadratic penalty with fixed weights and multipliers.

pub mod error;
pub mod lbfgs;
pub mod line_search;
pub mod lipschitz;
pub mod merit;
pub mod solver;
pub mod problem;
pub mod report;
pub mod result;
pub mod set;
pub mod vec_ops;
mod workspace;

pub use error::{InputError, PanocError};
pub use lbfgs::{Lbfgs, LbfgsParams};
pub use line_search::LineSearchParams;
pub use lipschitz::{LipschitzParams, StepSize};
pub use merit::{calc_grad_psi, calc_psi, calc_y_hat, calc_z_hat, stopping_residual};
pub use solver::{panoc, PanocParams, PanocSolver};
pub use problem::Problem;
pub use report::{
    IterationEvent, LineSearchEvent, LogReporter, NoopReporter, Reporter, StepSizeEvent,
};
pub use result::PanocStats;
pub use set::{BoxSet, SetRole};
