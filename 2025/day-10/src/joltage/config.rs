use std::time::Duration;

// -----------------------------------------------------------------------------
// Constants & Configuration
// -----------------------------------------------------------------------------

/// Components at or below all three limits go to the exact forward search.
const EXACT_MAX_COUNTERS: usize = 6;
const EXACT_MAX_BUTTONS: usize = 6;
const EXACT_MAX_TOTAL: u32 = 60;

/// The subset lower bound walks `2^counters` subsets per state.
const SUBSET_HEURISTIC_MAX_COUNTERS: usize = 12;

/// Explored-state budget of the backward search, picked from the greedy bound.
const STATES_WITHOUT_BOUND: usize = 50_000;
const TIGHT_BOUND: u32 = 10;
const STATES_FOR_TIGHT_BOUND: usize = 100_000;
const MEDIUM_BOUND: u32 = 30;
const STATES_FOR_MEDIUM_BOUND: usize = 50_000;
const STATES_PER_BOUND_PRESS: usize = 500;
const STATES_FOR_LOOSE_BOUND: usize = 50_000;

/// What to report for a machine with no known press sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Count `2 * sum(targets)` presses and log a warning.
    #[default]
    Estimate,
    /// Fail the whole run.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    pub exact_max_counters: usize,
    pub exact_max_buttons: usize,
    pub exact_max_total: u32,
    pub subset_heuristic_max_counters: usize,
    /// Overrides the adaptive state budget of the backward search.
    pub max_states: Option<usize>,
    /// Wall-clock limit for a single backward search.
    pub time_limit: Option<Duration>,
    pub fallback: FallbackPolicy,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            exact_max_counters: EXACT_MAX_COUNTERS,
            exact_max_buttons: EXACT_MAX_BUTTONS,
            exact_max_total: EXACT_MAX_TOTAL,
            subset_heuristic_max_counters: SUBSET_HEURISTIC_MAX_COUNTERS,
            max_states: None,
            time_limit: None,
            fallback: FallbackPolicy::default(),
        }
    }
}

impl SolverConfig {
    /// State budget for a backward search whose greedy bound is `upper_bound`.
    pub fn state_budget(&self, upper_bound: Option<u32>) -> usize {
        if let Some(states) = self.max_states {
            return states;
        }
        match upper_bound {
            None => STATES_WITHOUT_BOUND,
            Some(ub) if ub <= TIGHT_BOUND => STATES_FOR_TIGHT_BOUND,
            Some(ub) if ub <= MEDIUM_BOUND => STATES_FOR_MEDIUM_BOUND,
            Some(ub) => STATES_FOR_LOOSE_BOUND.min(ub as usize * STATES_PER_BOUND_PRESS),
        }
    }
}
