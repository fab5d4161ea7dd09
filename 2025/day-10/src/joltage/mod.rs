//! Fewest button presses that raise every joltage counter exactly to its target.
//!
//! A machine is pruned of buttons that can never be pressed, split into
//! independent components, and each component is handed to the exact or the
//! heuristic solver depending on its size. Component results are summed; one
//! infeasible component makes the machine infeasible.

mod backward;
mod budget;
pub mod components;
mod config;
mod forward;
mod frontier;
mod greedy;
mod outcome;
mod problem;
pub mod strategy;

#[cfg(test)]
pub(crate) mod test_support;

use rayon::prelude::*;

pub use config::{FallbackPolicy, SolverConfig};
pub use outcome::{Outcome, SearchObserver, SearchStats, SolveReport};
pub use problem::{Button, Counters, Problem, ProblemError, MAX_COUNTERS};

#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(counters = problem.num_counters(), buttons = problem.buttons().len())
)]
pub fn solve_machine(problem: &Problem, config: &SolverConfig) -> SolveReport {
    let pruned = problem.without_unusable_buttons();

    components::decompose(&pruned)
        .par_iter()
        .map(|component| solve_component(&component.problem, config))
        .reduce(SolveReport::default, SolveReport::merge)
}

fn solve_component(problem: &Problem, config: &SolverConfig) -> SolveReport {
    let trivial = |outcome| SolveReport {
        outcome,
        stats: SearchStats {
            components: 1,
            ..Default::default()
        },
    };

    if problem.total() == 0 {
        return trivial(Outcome::Optimal(0));
    }
    if problem.buttons().is_empty() {
        return trivial(Outcome::Infeasible);
    }

    let solver = strategy::select(problem, config);
    tracing::debug!(
        solver = solver.name(),
        counters = problem.num_counters(),
        buttons = problem.buttons().len(),
        total = problem.total(),
        "solving component"
    );
    solver.solve(problem, config, &mut ())
}
