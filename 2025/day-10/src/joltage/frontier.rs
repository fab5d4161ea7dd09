use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::problem::Counters;

#[derive(Debug, PartialEq, Eq)]
pub(super) struct Node {
    /// `cost + heuristic`
    pub estimate: u32,
    pub cost: u32,
    pub state: Counters,
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap on the estimate; among equal estimates, deeper nodes first.
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| self.cost.cmp(&other.cost))
            .then_with(|| other.state.cmp(&self.state))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub(super) type Frontier = BinaryHeap<Node>;
