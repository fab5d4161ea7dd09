use itertools::Itertools;
use miette::Diagnostic;
use num_integer::Integer;
use thiserror::Error;

/// Widest machine the solver accepts. Button wiring is stored as a `u16` mask.
pub const MAX_COUNTERS: usize = 16;

/// Counter values (forward search) or remaining deficits (backward search).
///
/// Fixed capacity so states hash and compare as plain values.
pub type Counters = heapless::Vec<u16, MAX_COUNTERS>;

/// A button's contribution vector: bit `i` set means one press adds 1 to counter `i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Button(u16);

impl Button {
    /// Indices must be below [`MAX_COUNTERS`]; anything wider is dropped.
    pub fn from_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        Self(
            indices
                .into_iter()
                .filter(|&i| i < MAX_COUNTERS)
                .fold(0, |mask, i| mask | (1 << i)),
        )
    }

    pub const fn from_mask(mask: u16) -> Self {
        Self(mask)
    }

    pub const fn mask(self) -> u16 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// How many counters this button touches.
    pub const fn width(self) -> u32 {
        self.0.count_ones()
    }

    /// How many counters of `subset` this button touches.
    pub const fn coverage(self, subset: u16) -> u32 {
        (self.0 & subset).count_ones()
    }

    /// Whether this button touches any counter in `subset`.
    pub const fn touches(self, subset: u16) -> bool {
        self.0 & subset != 0
    }

    /// Counter indices this button is wired to, ascending.
    pub fn counters(self) -> impl Iterator<Item = usize> {
        (0..MAX_COUNTERS).filter(move |&i| self.0 & (1 << i) != 0)
    }
}

#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum ProblemError {
    #[error("{0} counters exceed the supported maximum of {max}", max = MAX_COUNTERS)]
    #[diagnostic(code(factory::too_many_counters))]
    TooManyCounters(usize),

    #[error("button mask {mask:#b} touches counters beyond the {counters} available")]
    #[diagnostic(code(factory::button_out_of_range))]
    ButtonOutOfRange { mask: u16, counters: usize },
}

/// Target counter values plus the buttons that can be pressed to reach them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    targets: Counters,
    buttons: Vec<Button>,
}

impl Problem {
    pub fn new(
        targets: &[u16],
        buttons: impl IntoIterator<Item = Button>,
    ) -> Result<Self, ProblemError> {
        if targets.len() > MAX_COUNTERS {
            return Err(ProblemError::TooManyCounters(targets.len()));
        }
        let valid = full_mask(targets.len());
        let buttons = buttons.into_iter().collect::<Vec<_>>();
        if let Some(b) = buttons.iter().find(|b| b.mask() & !valid != 0) {
            return Err(ProblemError::ButtonOutOfRange {
                mask: b.mask(),
                counters: targets.len(),
            });
        }

        Ok(Self {
            targets: targets.iter().copied().collect(),
            buttons,
        })
    }

    /// Caller guarantees every button mask stays within `targets`.
    pub(crate) fn from_parts(targets: Counters, buttons: Vec<Button>) -> Self {
        debug_assert!(buttons
            .iter()
            .all(|b| b.mask() & !full_mask(targets.len()) == 0));
        Self { targets, buttons }
    }

    pub fn targets(&self) -> &[u16] {
        &self.targets
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    pub fn num_counters(&self) -> usize {
        self.targets.len()
    }

    /// Sum of all targets: the number of increments any solution must deliver.
    pub fn total(&self) -> u32 {
        self.targets.iter().map(|&t| u32::from(t)).sum()
    }

    /// Mask of counters whose target is zero.
    pub fn zero_mask(&self) -> u16 {
        mask_where(&self.targets, |_, t| t == 0)
    }

    /// Drops buttons that can never be part of a solution, and duplicates.
    ///
    /// A button wired to a counter with target 0 would overshoot on its first
    /// press, so it is unusable. Buttons dominated by a superset are kept: the
    /// superset may overshoot where the smaller button does not.
    pub fn without_unusable_buttons(&self) -> Self {
        let zero = self.zero_mask();
        let buttons = self
            .buttons
            .iter()
            .copied()
            .filter(|b| !b.is_empty() && !b.touches(zero))
            .unique()
            .collect();

        Self {
            targets: self.targets.clone(),
            buttons,
        }
    }

    pub(crate) fn start(&self) -> Counters {
        self.targets.iter().map(|_| 0).collect()
    }

    pub(crate) fn target_state(&self) -> Counters {
        self.targets.clone()
    }
}

pub(crate) const fn full_mask(counters: usize) -> u16 {
    if counters >= MAX_COUNTERS {
        u16::MAX
    } else {
        (1 << counters) - 1
    }
}

/// Mask of positions `i` where `pred(i, values[i])` holds.
pub(crate) fn mask_where(values: &[u16], pred: impl Fn(usize, u16) -> bool) -> u16 {
    values
        .iter()
        .enumerate()
        .filter(|&(i, &v)| pred(i, v))
        .fold(0, |mask, (i, _)| mask | (1 << i))
}

pub(crate) fn ceil_div(numerator: u32, denominator: u32) -> u32 {
    Integer::div_ceil(&numerator, &denominator)
}

/// `ceil(remaining / best_cover)` over the buttons that avoid every `closed`
/// counter. `None` when work remains but no such button helps.
pub(crate) fn coverage_bound(buttons: &[Button], remaining: u32, closed: u16) -> Option<u32> {
    if remaining == 0 {
        return Some(0);
    }
    let open = !closed;
    let cover = buttons
        .iter()
        .filter(|b| !b.touches(closed))
        .map(|b| b.coverage(open))
        .max()
        .unwrap_or(0);

    (cover > 0).then(|| ceil_div(remaining, cover))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::joltage::test_support::wiring;

    fn buttons(notation: &str) -> Vec<Button> {
        wiring(notation).into_iter().map(Button::from_indices).collect()
    }

    #[test]
    fn button_masks() {
        let b = Button::from_indices([0, 2, 3]);
        assert_eq!(b.mask(), 0b1101);
        assert_eq!(b.width(), 3);
        assert_eq!(b.coverage(0b0110), 1);
        assert!(b.touches(0b1000));
        assert!(!b.touches(0b0010));
        assert_eq!(b.counters().collect::<Vec<_>>(), vec![0, 2, 3]);
    }

    #[test]
    fn rejects_buttons_wider_than_targets() {
        let err = Problem::new(&[1, 1], [Button::from_mask(0b100)]).unwrap_err();
        assert_eq!(
            err,
            ProblemError::ButtonOutOfRange {
                mask: 0b100,
                counters: 2
            }
        );
    }

    #[test]
    fn rejects_too_many_counters() {
        let targets = [1u16; MAX_COUNTERS + 1];
        assert_eq!(
            Problem::new(&targets, []).unwrap_err(),
            ProblemError::TooManyCounters(MAX_COUNTERS + 1)
        );
    }

    #[test]
    fn prunes_buttons_touching_zero_targets_and_duplicates() {
        let problem = Problem::new(
            &[2, 0, 3],
            buttons("(0) (0,1) () (0,2) (2,0) (2)"),
        )
        .unwrap();
        let pruned = problem.without_unusable_buttons();
        assert_eq!(pruned.targets(), problem.targets());
        assert_eq!(pruned.buttons(), buttons("(0) (0,2) (2)").as_slice());
    }

    #[test]
    fn keeps_dominated_buttons() {
        // {0} is dominated by {0,1}, but it is the only way to finish counter 0.
        let problem = Problem::new(&[2, 1], buttons("(0) (0,1)")).unwrap();
        assert_eq!(problem.without_unusable_buttons().buttons().len(), 2);
    }

    #[test]
    fn coverage_bound_ignores_closed_buttons() {
        let bs = buttons("(0,1,2) (0) (1)");
        // Counter 2 is closed, so the wide button is unusable and the best cover is 1.
        assert_eq!(coverage_bound(&bs, 5, 0b100), Some(5));
        assert_eq!(coverage_bound(&bs, 5, 0), Some(2));
        assert_eq!(coverage_bound(&bs, 0, 0b111), Some(0));
        assert_eq!(coverage_bound(&bs, 3, 0b011), None);
    }

    #[test]
    fn totals_and_masks() {
        let problem = Problem::new(&[3, 0, 4], []).unwrap();
        assert_eq!(problem.total(), 7);
        assert_eq!(problem.zero_mask(), 0b010);
        assert_eq!(problem.start().as_slice(), &[0, 0, 0]);
        assert_eq!(full_mask(3), 0b111);
        assert_eq!(full_mask(MAX_COUNTERS), u16::MAX);
    }
}
