use std::fmt;

/// Result of solving a component or a whole machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Proven minimum number of presses.
    Optimal(u32),
    /// A valid press count that the search could not prove minimal before its
    /// budget ran out.
    BestEffort(u32),
    /// No press sequence reaches the targets (or none was found within budget).
    Infeasible,
}

impl Outcome {
    /// Press count, if any solution is known.
    pub fn presses(self) -> Option<u32> {
        match self {
            Outcome::Optimal(n) | Outcome::BestEffort(n) => Some(n),
            Outcome::Infeasible => None,
        }
    }

    pub fn is_optimal(self) -> bool {
        matches!(self, Outcome::Optimal(_))
    }

    /// Outcome of two independent subproblems solved side by side.
    pub fn combine(self, other: Self) -> Self {
        use Outcome::*;
        match (self, other) {
            (Infeasible, _) | (_, Infeasible) => Infeasible,
            (Optimal(a), Optimal(b)) => Optimal(a + b),
            (Optimal(a) | BestEffort(a), Optimal(b) | BestEffort(b)) => BestEffort(a + b),
        }
    }
}

impl Default for Outcome {
    fn default() -> Self {
        Outcome::Optimal(0)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Optimal(n) => write!(f, "{n}"),
            Outcome::BestEffort(n) => write!(f, "<= {n}"),
            Outcome::Infeasible => f.write_str("infeasible"),
        }
    }
}

/// Search telemetry, returned alongside every [`Outcome`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// States taken off a frontier and expanded.
    pub explored: usize,
    /// Components solved.
    pub components: usize,
    /// Set when a state budget or deadline cut a search short.
    pub budget_exhausted: bool,
}

impl SearchStats {
    pub fn merge(self, other: Self) -> Self {
        Self {
            explored: self.explored + other.explored,
            components: self.components + other.components,
            budget_exhausted: self.budget_exhausted || other.budget_exhausted,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveReport {
    pub outcome: Outcome,
    pub stats: SearchStats,
}

impl SolveReport {
    pub fn merge(self, other: Self) -> Self {
        Self {
            outcome: self.outcome.combine(other.outcome),
            stats: self.stats.merge(other.stats),
        }
    }
}

/// Sees every state a search expands.
pub trait SearchObserver {
    fn on_expand(&mut self, state: &[u16], cost: u32);
}

impl SearchObserver for () {
    fn on_expand(&mut self, _state: &[u16], _cost: u32) {}
}
