#![allow(dead_code)]

use std::convert::Infallible;

use panoc::{
    BoxSet, IterationEvent, LineSearchEvent, PanocStats, Problem, Reporter, StepSizeEvent,
};

/// Problem assembled from plain functions.
pub struct FnProblem {
    pub f: fn(&[f64]) -> f64,
    pub grad_f: fn(&[f64], &mut [f64]),
    pub g: fn(&[f64], &mut [f64]),
    pub grad_g: fn(&[f64], &[f64], &mut [f64]),
    pub c: BoxSet<f64>,
    pub d: BoxSet<f64>,
}

impl Problem<f64> for FnProblem {
    type Error = Infallible;

    fn c(&self) -> &BoxSet<f64> {
        &self.c
    }

    fn d(&self) -> &BoxSet<f64> {
        &self.d
    }

    fn f(&self, x: &[f64]) -> Result<f64, Infallible> {
        Ok((self.f)(x))
    }

    fn grad_f(&self, x: &[f64], grad: &mut [f64]) -> Result<(), Infallible> {
        (self.grad_f)(x, grad);
        Ok(())
    }

    fn g(&self, x: &[f64], gx: &mut [f64]) -> Result<(), Infallible> {
        (self.g)(x, gx);
        Ok(())
    }

    fn grad_g(&self, x: &[f64], y: &[f64], grad: &mut [f64]) -> Result<(), Infallible> {
        (self.grad_g)(x, y, grad);
        Ok(())
    }
}

fn no_constraints(_x: &[f64], _gx: &mut [f64]) {}

fn no_constraints_adjoint(_x: &[f64], _y: &[f64], grad: &mut [f64]) {
    grad.fill(0.0);
}

impl FnProblem {
    /// Unconstrained problem with `m = 0`.
    pub fn unconstrained(
        n: usize,
        f: fn(&[f64]) -> f64,
        grad_f: fn(&[f64], &mut [f64]),
    ) -> Self {
        FnProblem {
            f,
            grad_f,
            g: no_constraints,
            grad_g: no_constraints_adjoint,
            c: BoxSet::unbounded(n),
            d: BoxSet::unbounded(0),
        }
    }
}

// ─── Objectives ────────────────────────────────────────────────────────────

pub fn square(x: &[f64]) -> f64 {
    x.iter().map(|v| v * v).sum()
}

pub fn square_grad(x: &[f64], grad: &mut [f64]) {
    for i in 0..x.len() {
        grad[i] = 2.0 * x[i];
    }
}

pub fn rosenbrock(x: &[f64]) -> f64 {
    let t1 = 1.0 - x[0];
    let t2 = x[1] - x[0] * x[0];
    t1 * t1 + 100.0 * t2 * t2
}

pub fn rosenbrock_grad(x: &[f64], grad: &mut [f64]) {
    let t2 = x[1] - x[0] * x[0];
    grad[0] = -2.0 * (1.0 - x[0]) - 400.0 * x[0] * t2;
    grad[1] = 200.0 * t2;
}

/// Mild quadratic with a stiff wall at `x = 1`:
/// `f(x) = 0.005 x² - x + 500 max(0, x - 1)²`.
pub fn steep_wall(x: &[f64]) -> f64 {
    let over = (x[0] - 1.0).max(0.0);
    0.005 * x[0] * x[0] - x[0] + 500.0 * over * over
}

pub fn steep_wall_grad(x: &[f64], grad: &mut [f64]) {
    let over = (x[0] - 1.0).max(0.0);
    grad[0] = 0.01 * x[0] - 1.0 + 1000.0 * over;
}

/// `g(x) = x₀ + x₁`.
pub fn sum_constraint(x: &[f64], gx: &mut [f64]) {
    gx[0] = x[0] + x[1];
}

/// `g(x) = x₀ + x₁ - 1`.
pub fn sum_minus_one(x: &[f64], gx: &mut [f64]) {
    gx[0] = x[0] + x[1] - 1.0;
}

pub fn sum_adjoint(_x: &[f64], y: &[f64], grad: &mut [f64]) {
    grad[0] = y[0];
    grad[1] = y[0];
}

// ─── Reporter ──────────────────────────────────────────────────────────────

/// Records every event; optionally requests a stop at a given iteration.
#[derive(Default)]
pub struct Recorder {
    pub iterations: Vec<IterationEvent<f64>>,
    pub updates: Vec<StepSizeEvent<f64>>,
    pub retries: Vec<LineSearchEvent<f64>>,
    pub accepted: Vec<LineSearchEvent<f64>>,
    pub stalled: Vec<LineSearchEvent<f64>>,
    pub finished: Option<PanocStats<f64>>,
    pub stop_at: Option<usize>,
}

impl Reporter<f64> for Recorder {
    fn on_iteration(&mut self, event: &IterationEvent<f64>) {
        self.iterations.push(event.clone());
    }

    fn on_step_size_update(&mut self, event: &StepSizeEvent<f64>) {
        self.updates.push(event.clone());
    }

    fn on_line_search_retry(&mut self, event: &LineSearchEvent<f64>) {
        self.retries.push(event.clone());
    }

    fn on_line_search_accept(&mut self, event: &LineSearchEvent<f64>) {
        self.accepted.push(event.clone());
    }

    fn on_line_search_stalled(&mut self, event: &LineSearchEvent<f64>) {
        self.stalled.push(event.clone());
    }

    fn on_finish(&mut self, stats: &PanocStats<f64>) {
        self.finished = Some(stats.clone());
    }

    fn should_stop(&mut self, iteration: usize) -> bool {
        self.stop_at == Some(iteration)
    }
}
