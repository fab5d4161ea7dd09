//! Bounded backward A* from the full deficit vector down to zero.
//!
//! Seeded with the greedy bound and cut off by a [`Budget`]. When the budget
//! runs out first, the greedy press count is returned as a best effort.

use std::collections::HashMap;

use super::budget::Budget;
use super::config::SolverConfig;
use super::frontier::{Frontier, Node};
use super::greedy;
use super::outcome::{Outcome, SearchObserver, SearchStats, SolveReport};
use super::problem::{ceil_div, coverage_bound, mask_where, Counters, Problem};

/// Max-coverage table over every counter subset.
struct SubsetBound {
    /// `coverage[s]`: most counters of subset `s` a single button touches.
    coverage: Vec<u32>,
    /// Scratch for per-subset deficit sums.
    sums: Vec<u32>,
}

impl SubsetBound {
    fn new(problem: &Problem) -> Self {
        let size = 1usize << problem.num_counters();
        let coverage = (0..size)
            .map(|subset| {
                problem
                    .buttons()
                    .iter()
                    .map(|b| b.coverage(subset as u16))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        Self {
            coverage,
            sums: vec![0; size],
        }
    }

    /// Largest `ceil(deficit(s) / coverage(s))` over subsets with work left.
    fn estimate(&mut self, deficits: &[u16]) -> Option<u32> {
        let mut bound = 0;
        for subset in 1..self.sums.len() {
            let lowest = subset.trailing_zeros() as usize;
            let sum = self.sums[subset & (subset - 1)] + u32::from(deficits[lowest]);
            self.sums[subset] = sum;
            if sum == 0 {
                continue;
            }
            match self.coverage[subset] {
                0 => return None,
                cap => bound = bound.max(ceil_div(sum, cap)),
            }
        }
        Some(bound)
    }
}

struct LowerBound<'p> {
    problem: &'p Problem,
    subsets: Option<SubsetBound>,
}

impl<'p> LowerBound<'p> {
    fn new(problem: &'p Problem, config: &SolverConfig) -> Self {
        let subsets = (problem.num_counters() <= config.subset_heuristic_max_counters)
            .then(|| SubsetBound::new(problem));
        Self { problem, subsets }
    }

    /// `None` means the deficits can provably not be cleared.
    fn estimate(&mut self, deficits: &Counters) -> Option<u32> {
        let remaining = deficits.iter().map(|&d| u32::from(d)).sum();
        let closed = mask_where(deficits, |_, d| d == 0);
        let whole = coverage_bound(self.problem.buttons(), remaining, closed)?;
        match self.subsets.as_mut() {
            Some(subsets) => Some(whole.max(subsets.estimate(deficits)?)),
            None => Some(whole),
        }
    }
}

pub fn solve(
    problem: &Problem,
    config: &SolverConfig,
    observer: &mut dyn SearchObserver,
) -> SolveReport {
    let upper_bound = greedy::upper_bound(problem);
    let mut budget = Budget::new(config.state_budget(upper_bound), config.time_limit);
    let mut bound = LowerBound::new(problem, config);

    let outcome = search(problem, upper_bound, &mut bound, &mut budget, observer);

    let stats = SearchStats {
        explored: budget.explored(),
        components: 1,
        budget_exhausted: budget.is_exhausted(),
    };
    if budget.is_exhausted() && outcome == Outcome::Infeasible {
        tracing::warn!(
            explored = stats.explored,
            "budget exhausted without any solution, reporting infeasible"
        );
    }
    tracing::debug!(
        counters = problem.num_counters(),
        buttons = problem.buttons().len(),
        ?upper_bound,
        explored = stats.explored,
        %outcome,
        "backward search finished"
    );

    SolveReport { outcome, stats }
}

fn search(
    problem: &Problem,
    upper_bound: Option<u32>,
    bound: &mut LowerBound,
    budget: &mut Budget,
    observer: &mut dyn SearchObserver,
) -> Outcome {
    let start = problem.target_state();
    let Some(h) = bound.estimate(&start) else {
        return Outcome::Infeasible;
    };
    let within_bound = |estimate: u32| upper_bound.map_or(true, |ub| estimate <= ub);

    let mut best: HashMap<Counters, u32> = HashMap::new();
    let mut frontier = Frontier::new();
    best.insert(start.clone(), 0);
    frontier.push(Node {
        estimate: h,
        cost: 0,
        state: start,
    });

    while let Some(Node { cost, state, .. }) = frontier.pop() {
        if best.get(&state).is_some_and(|&c| c < cost) {
            continue;
        }
        if !budget.spend() {
            return match upper_bound {
                Some(ub) => Outcome::BestEffort(ub),
                None => Outcome::Infeasible,
            };
        }
        observer.on_expand(&state, cost);

        if state.iter().all(|&d| d == 0) {
            return Outcome::Optimal(cost);
        }
        if upper_bound.is_some_and(|ub| cost >= ub) {
            continue;
        }

        // Only buttons that avoid every cleared counter: the rest would go negative,
        // and each of these reduces at least one positive deficit.
        let cleared = mask_where(&state, |_, d| d == 0);
        for button in problem
            .buttons()
            .iter()
            .filter(|b| !b.is_empty() && !b.touches(cleared))
        {
            let mut next = state.clone();
            for i in button.counters() {
                next[i] -= 1;
            }

            let next_cost = cost + 1;
            if best.get(&next).is_some_and(|&c| c <= next_cost) {
                continue;
            }
            best.insert(next.clone(), next_cost);

            let Some(h) = bound.estimate(&next) else {
                continue;
            };
            if within_bound(next_cost + h) {
                frontier.push(Node {
                    estimate: next_cost + h,
                    cost: next_cost,
                    state: next,
                });
            }
        }
    }

    // Every node that could beat the greedy bound was expanded.
    match upper_bound {
        Some(ub) => Outcome::Optimal(ub),
        None => Outcome::Infeasible,
    }
}
