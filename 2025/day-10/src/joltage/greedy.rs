use super::problem::{mask_where, Problem};

/// Press count of a greedy descent from the targets: repeatedly press the
/// button covering the most positive deficits without overshooting.
///
/// `None` when the descent gets stuck before every deficit reaches zero.
pub fn upper_bound(problem: &Problem) -> Option<u32> {
    let mut deficits = problem.target_state();
    let mut presses = 0;

    loop {
        let closed = mask_where(&deficits, |_, d| d == 0);
        if deficits.iter().all(|&d| d == 0) {
            return Some(presses);
        }

        // First widest button wins, keeping the descent deterministic.
        let button = problem
            .buttons()
            .iter()
            .filter(|b| !b.is_empty() && !b.touches(closed))
            .rev()
            .max_by_key(|b| b.width())?;

        for i in button.counters() {
            deficits[i] -= 1;
        }
        presses += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::joltage::forward;
    use crate::joltage::test_support::{problem, small_problem};
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case::exact(&[2, 1], "(0) (1) (0,1)", Some(2))]
    #[case::zero(&[0, 0], "(0)", Some(0))]
    #[case::stuck(&[1, 2], "(0,1)", None)]
    // Greedy grabs {0,1,2} and strands counter 3; {0,1} + {2,3} was needed.
    #[case::greedy_trap(&[1, 1, 1, 1], "(0,1,2) (0,1) (2,3)", None)]
    // Greedy takes {0,1} twice then mops up singly: 4 presses against the optimal 3.
    #[case::loose(&[2, 2, 1, 1], "(0,1) (0,2) (1,3) (2) (3)", Some(4))]
    fn greedy(#[case] targets: &[u16], #[case] buttons: &str, #[case] expected: Option<u32>) {
        assert_eq!(upper_bound(&problem(targets, buttons)), expected);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn never_beats_the_optimum((targets, buttons) in small_problem()) {
            let p = Problem::new(&targets, buttons).unwrap();
            if let Some(ub) = upper_bound(&p) {
                let optimum = forward::solve(&p, &mut ()).outcome.presses();
                prop_assert!(optimum.is_some_and(|opt| opt <= ub));
            }
        }
    }
}
