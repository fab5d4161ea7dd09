use proptest::prelude::*;

use super::outcome::SearchObserver;
use super::problem::{Button, Problem};

/// Button wiring written the way the manual does, e.g. `"(0,2) (1) (0,1,2)"`.
pub fn wiring(notation: &str) -> Vec<Vec<usize>> {
    notation
        .split_whitespace()
        .map(|group| {
            group
                .trim_start_matches('(')
                .trim_end_matches(')')
                .split(',')
                .filter(|i| !i.is_empty())
                .map(|i| i.parse::<usize>().unwrap())
                .collect()
        })
        .collect()
}

pub fn problem(targets: &[u16], buttons: &str) -> Problem {
    Problem::new(
        targets,
        wiring(buttons).into_iter().map(Button::from_indices),
    )
    .unwrap()
}

/// Records every expanded state.
#[derive(Default)]
pub struct Trace(pub Vec<Vec<u16>>);

impl SearchObserver for Trace {
    fn on_expand(&mut self, state: &[u16], _cost: u32) {
        self.0.push(state.to_vec());
    }
}

/// Exhaustive reference: fewest presses over all press-count vectors.
pub fn brute_force(targets: &[u16], buttons: &[Button]) -> Option<u32> {
    fn go(targets: &[u16], buttons: &[Button], acc: &mut Vec<u16>) -> Option<u32> {
        let Some((first, rest)) = buttons.split_first() else {
            return (acc.as_slice() == targets).then_some(0);
        };
        let room = first
            .counters()
            .map(|i| targets[i] - acc[i])
            .min()
            .unwrap_or(0);
        let mut best = None;
        for presses in 0..=room {
            for i in first.counters() {
                acc[i] += presses;
            }
            if let Some(n) = go(targets, rest, acc) {
                let total = n + u32::from(presses);
                best = Some(best.map_or(total, |b: u32| b.min(total)));
            }
            for i in first.counters() {
                acc[i] -= presses;
            }
        }
        best
    }
    go(targets, buttons, &mut vec![0; targets.len()])
}

/// Up to four counters with targets up to 4, and up to four non-empty buttons.
pub fn small_problem() -> impl Strategy<Value = (Vec<u16>, Vec<Button>)> {
    (1usize..=4).prop_flat_map(|n| {
        (
            prop::collection::vec(0u16..=4, n),
            prop::collection::vec((1u16..(1 << n)).prop_map(Button::from_mask), 1..=4),
        )
    })
}
