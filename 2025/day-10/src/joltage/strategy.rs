use super::config::SolverConfig;
use super::outcome::{SearchObserver, SolveReport};
use super::problem::Problem;
use super::{backward, forward};

/// A way of finding the minimum press count for one component.
pub trait ComponentSolver: Sync {
    fn name(&self) -> &'static str;

    fn solve(
        &self,
        problem: &Problem,
        config: &SolverConfig,
        observer: &mut dyn SearchObserver,
    ) -> SolveReport;
}

/// Forward A* over the full state space. Always optimal, unbounded in work.
pub struct Exact;

impl ComponentSolver for Exact {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn solve(
        &self,
        problem: &Problem,
        _config: &SolverConfig,
        observer: &mut dyn SearchObserver,
    ) -> SolveReport {
        forward::solve(problem, observer)
    }
}

/// Budgeted backward A* seeded with a greedy bound. May return a best effort.
pub struct Heuristic;

impl ComponentSolver for Heuristic {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn solve(
        &self,
        problem: &Problem,
        config: &SolverConfig,
        observer: &mut dyn SearchObserver,
    ) -> SolveReport {
        backward::solve(problem, config, observer)
    }
}

/// Picks the exact solver when the component fits all of its size limits.
pub fn select(problem: &Problem, config: &SolverConfig) -> &'static dyn ComponentSolver {
    let small = problem.num_counters() <= config.exact_max_counters
        && problem.buttons().len() <= config.exact_max_buttons
        && problem.total() <= config.exact_max_total;

    if small {
        return &Exact;
    }
    &Heuristic
}
