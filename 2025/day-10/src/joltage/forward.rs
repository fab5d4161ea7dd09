//! Exact forward A* from all-zero counters up to the targets.
//!
//! Only used on components small enough that the full state space is cheap to
//! walk, so it runs without a budget and always returns a proven minimum.

use std::collections::HashMap;

use super::frontier::{Frontier, Node};
use super::outcome::{Outcome, SearchObserver, SearchStats, SolveReport};
use super::problem::{coverage_bound, mask_where, Counters, Problem};

/// Admissible: one press raises the remaining total by at most the number of
/// unsatisfied counters a still-pressable button touches.
fn heuristic(problem: &Problem, state: &Counters) -> Option<u32> {
    let remaining = problem
        .targets()
        .iter()
        .zip(state)
        .map(|(&t, &v)| u32::from(t - v))
        .sum();
    coverage_bound(problem.buttons(), remaining, closed_mask(problem, state))
}

/// Counters already at their target. Pressing any button touching them overshoots.
fn closed_mask(problem: &Problem, state: &Counters) -> u16 {
    let targets = problem.targets();
    mask_where(state, |i, v| v >= targets[i])
}

pub fn solve(problem: &Problem, observer: &mut dyn SearchObserver) -> SolveReport {
    let mut stats = SearchStats {
        components: 1,
        ..Default::default()
    };
    let goal = problem.target_state();
    let start = problem.start();

    let Some(h) = heuristic(problem, &start) else {
        return SolveReport {
            outcome: Outcome::Infeasible,
            stats,
        };
    };

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
        stats.explored += 1;
        observer.on_expand(&state, cost);

        if state == goal {
            return SolveReport {
                outcome: Outcome::Optimal(cost),
                stats,
            };
        }

        let closed = closed_mask(problem, &state);
        for button in problem.buttons().iter().filter(|b| !b.touches(closed)) {
            let mut next = state.clone();
            for i in button.counters() {
                next[i] += 1;
            }

            let next_cost = cost + 1;
            if best.get(&next).is_some_and(|&c| c <= next_cost) {
                continue;
            }
            best.insert(next.clone(), next_cost);

            if let Some(h) = heuristic(problem, &next) {
                frontier.push(Node {
                    estimate: next_cost + h,
                    cost: next_cost,
                    state: next,
                });
            }
        }
    }

    SolveReport {
        outcome: Outcome::Infeasible,
        stats,
    }
}
