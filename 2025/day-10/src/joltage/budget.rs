use std::time::{Duration, Instant};

/// How often the wall clock is consulted, in explored states.
const CLOCK_CHECK_INTERVAL: usize = 1024;

/// Caps the work of one search: explored states and, optionally, wall-clock time.
#[derive(Debug, Clone, Copy)]
pub struct Budget {
    max_states: usize,
    deadline: Option<Instant>,
    explored: usize,
    exhausted: bool,
}

impl Budget {
    pub fn new(max_states: usize, time_limit: Option<Duration>) -> Self {
        Self {
            max_states,
            deadline: time_limit.and_then(|limit| Instant::now().checked_add(limit)),
            explored: 0,
            exhausted: false,
        }
    }

    /// Records one explored state. Returns `false` once the budget is spent.
    pub fn spend(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        if self.explored >= self.max_states || self.past_deadline() {
            self.exhausted = true;
            return false;
        }
        self.explored += 1;
        true
    }

    fn past_deadline(&self) -> bool {
        self.explored % CLOCK_CHECK_INTERVAL == 0
            && self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    pub fn explored(&self) -> usize {
        self.explored
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}
