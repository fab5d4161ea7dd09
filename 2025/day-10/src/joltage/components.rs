use std::collections::VecDeque;

use super::problem::{Button, Counters, Problem, MAX_COUNTERS};

/// A connected piece of the counter/button incidence graph, re-indexed locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Global indices of the counters, in local order.
    pub counters: Vec<usize>,
    /// Global indices of the buttons, in local order.
    pub buttons: Vec<usize>,
    pub problem: Problem,
}

/// Splits `problem` into independent components.
///
/// No button of one component touches a counter of another, so the minimum
/// press count of the whole is the sum over its components. Every counter
/// lands in exactly one component, including isolated ones.
pub fn decompose(problem: &Problem) -> Vec<Component> {
    let n = problem.num_counters();
    let buttons = problem.buttons();

    // counter -> buttons touching it
    let mut incident = vec![Vec::new(); n];
    for (b, button) in buttons.iter().enumerate() {
        for c in button.counters() {
            incident[c].push(b);
        }
    }

    let mut seen_counter = vec![false; n];
    let mut seen_button = vec![false; buttons.len()];
    let mut components = Vec::new();

    for root in 0..n {
        if seen_counter[root] {
            continue;
        }

        let mut counters = Vec::new();
        let mut members = Vec::new();
        let mut queue = VecDeque::from([root]);
        seen_counter[root] = true;

        while let Some(c) = queue.pop_front() {
            counters.push(c);
            for &b in &incident[c] {
                if seen_button[b] {
                    continue;
                }
                seen_button[b] = true;
                members.push(b);
                for next in buttons[b].counters() {
                    if !seen_counter[next] {
                        seen_counter[next] = true;
                        queue.push_back(next);
                    }
                }
            }
        }

        counters.sort_unstable();
        members.sort_unstable();
        components.push(extract(problem, counters, members));
    }

    components
}

fn extract(problem: &Problem, counters: Vec<usize>, members: Vec<usize>) -> Component {
    let mut local = [0; MAX_COUNTERS];
    for (i, &c) in counters.iter().enumerate() {
        local[c] = i;
    }

    let targets = counters
        .iter()
        .map(|&c| problem.targets()[c])
        .collect::<Counters>();
    let buttons = members
        .iter()
        .map(|&b| Button::from_indices(problem.buttons()[b].counters().map(|c| local[c])))
        .collect();

    Component {
        counters,
        buttons: members,
        problem: Problem::from_parts(targets, buttons),
    }
}
