use std::time::{Duration, Instant};

use good_lp::{default_solver, variable, variables, Expression, ResolutionError, Solution as _, SolverModel, Variable};
use thiserror::Error;
use tracing::debug;

use crate::model::{Comparator, Model, Solution, VarDomain};

/// Backend-facing options for one solve.
#[derive(Clone, Copy, Debug, Default)]
pub struct SolveOptions {
    /// Wall-clock budget. `None` means run to completion.
    pub time_limit: Option<Duration>,
}

/// What a [`SolverAdapter`] came back with.
#[derive(Clone, Debug)]
pub enum Outcome {
    /// The assignment is proven best.
    Optimal {
        /// The proven-best assignment.
        solution: Solution,
        /// Its exact objective value.
        objective: i64,
    },
    /// A valid assignment without an optimality proof.
    Feasible {
        /// The assignment found.
        solution: Solution,
        /// Its exact objective value.
        objective: i64,
    },
    /// No assignment satisfies the constraints.
    Infeasible,
    /// The time budget ran out.
    TimedOut {
        /// The best assignment found before the deadline, if any.
        best: Option<Solution>,
    },
}

/// Failures surfaced by [`Board::solve`](crate::board::Board::solve).
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum SolveError {
    /// The constraints admit no enclosure at all.
    #[error("no feasible enclosure within {max_walls} walls")]
    Infeasible {
        /// The wall budget that proved too tight.
        max_walls: u32,
    },
    /// The time budget ran out with nothing usable in hand.
    #[error("solve timed out without an incumbent")]
    TimedOut,
    /// The backend failed for its own reasons.
    #[error("solver backend error: {0}")]
    Backend(String),
    /// The assignment's recomputed score disagrees with the backend's objective.
    #[error("score mismatch: recomputed {computed}, backend reported {reported}")]
    ScoreMismatch {
        /// Score recomputed from the tile states.
        computed: i64,
        /// Objective value the backend reported.
        reported: i64,
    },
}

/// Something that can optimize a [`Model`]. The built-in implementation is
/// [`MilpSolver`]; tests substitute their own.
pub trait SolverAdapter {
    /// Run the model to an [`Outcome`], or fail outright.
    fn solve(&self, model: &Model, options: &SolveOptions) -> Result<Outcome, SolveError>;
}

/// The bundled mixed-integer backend.
///
/// The backend has no native deadline support, so the time limit is enforced
/// after the fact: a solve that finishes late still yields its assignment,
/// reported as [`Outcome::TimedOut`] with the incumbent attached.
pub struct MilpSolver;

impl SolverAdapter for MilpSolver {
    fn solve(&self, model: &Model, options: &SolveOptions) -> Result<Outcome, SolveError> {
        let start = Instant::now();

        let outcome = match run_backend(model) {
            Ok(solution) => {
                let objective = model.objective_value(&solution);
                Outcome::Optimal { solution, objective }
            }
            Err(ResolutionError::Infeasible) => Outcome::Infeasible,
            Err(other) => return Err(SolveError::Backend(other.to_string())),
        };

        let elapsed = start.elapsed();
        let deadline_passed = options.time_limit.is_some_and(|limit| elapsed > limit);
        let outcome = match outcome {
            Outcome::Optimal { solution, .. } | Outcome::Feasible { solution, .. }
                if deadline_passed =>
            {
                Outcome::TimedOut { best: Some(solution) }
            }
            other => other,
        };

        let status = match &outcome {
            Outcome::Optimal { .. } => "optimal",
            Outcome::Feasible { .. } => "feasible",
            Outcome::Infeasible => "infeasible",
            Outcome::TimedOut { .. } => "timed out",
        };
        debug!(status, elapsed_ms = elapsed.as_millis() as u64, "milp solve finished");
        Ok(outcome)
    }
}

fn run_backend(model: &Model) -> Result<Solution, ResolutionError> {
    let mut vars = variables!();
    let handles: Vec<Variable> = model
        .domains()
        .iter()
        .map(|domain| match *domain {
            VarDomain::Bool => vars.add(variable().binary()),
            VarDomain::Int { lo, hi } => vars.add(variable().integer().min(lo as f64).max(hi as f64)),
        })
        .collect();

    // a fully pinned model never reaches the backend
    if handles.is_empty() {
        let pinned = Solution::new(Vec::new());
        return if model.constraints().iter().all(|constraint| constraint.holds(&pinned)) {
            Ok(pinned)
        } else {
            Err(ResolutionError::Infeasible)
        };
    }

    // the objective's constant term only shifts the optimum, so it stays out
    let mut objective = Expression::with_capacity(model.objective().terms().len());
    for &(coeff, var) in model.objective().terms() {
        objective.add_mul(coeff as f64, handles[var.index()]);
    }

    let mut problem = vars.maximise(objective).using(default_solver);
    for constraint in model.constraints() {
        let terms = constraint.expr().terms();

        // rows without variables are decided here, not by the backend
        if terms.is_empty() {
            let lhs = constraint.expr().constant();
            let holds = match constraint.comparator() {
                Comparator::Leq => lhs <= constraint.rhs(),
                Comparator::Eq => lhs == constraint.rhs(),
                Comparator::Geq => lhs >= constraint.rhs(),
            };
            if !holds {
                return Err(ResolutionError::Infeasible);
            }
            continue;
        }

        let mut lhs = Expression::with_capacity(terms.len());
        for &(coeff, var) in terms {
            lhs.add_mul(coeff as f64, handles[var.index()]);
        }
        let rhs = (constraint.rhs() - constraint.expr().constant()) as f64;
        problem = problem.with(match constraint.comparator() {
            Comparator::Leq => lhs.leq(rhs),
            Comparator::Eq => lhs.eq(rhs),
            Comparator::Geq => lhs.geq(rhs),
        });
    }

    let backend_solution = problem.solve()?;
    let values = handles.iter().map(|&handle| backend_solution.value(handle).round() as i64).collect();
    Ok(Solution::new(values))
}
