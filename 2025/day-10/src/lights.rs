use std::collections::VecDeque;

use crate::machine::Row;

/// Above this many free variables the `2^k` null-space walk is abandoned for
/// a search over light states.
pub const MAX_GRAY_FREE_VARS: usize = 20;

/// The toggle equations of one machine over GF(2).
///
/// One equation per light, one variable per button: `A x = b` where column
/// `j` of `A` is the set of lights button `j` toggles and `b` is the target
/// pattern. Pressing a button twice is a no-op, so the fewest presses is the
/// minimum Hamming weight over all solutions `x`.
pub struct LinearSystem {
    /// Augmented matrix [A | b], reduced in place by [`LinearSystem::rref`].
    matrix: Vec<Row>,
    num_vars: usize,
    num_eqs: usize,
    /// Pivot row of every column, `None` for free variables.
    col_to_pivot: Vec<Option<usize>>,
    free_vars: Vec<usize>,
    /// Light masks for the state-space fallback.
    target: u32,
    toggles: Vec<u32>,
}

impl LinearSystem {
    /// `lights` must have at most `MAX_COUNTERS` entries and every button
    /// index must be in range; both are checked when the machine is parsed.
    pub(crate) fn new(lights: &Row, buttons: &[Vec<usize>]) -> Self {
        let num_eqs = lights.len();
        let num_vars = buttons.len();

        let mut matrix = vec![Row::repeat(false, num_vars + 1); num_eqs];
        for (c, button) in buttons.iter().enumerate() {
            for &light in button.iter().filter(|&&l| l < num_eqs) {
                // A light listed twice toggles twice.
                let flipped = !matrix[light][c];
                matrix[light].set(c, flipped);
            }
        }
        for light in lights.iter_ones() {
            matrix[light].set(num_vars, true);
        }

        let to_mask = |bits: Row| {
            bits.iter_ones()
                .filter(|&i| i < num_eqs)
                .fold(0u32, |mask, i| mask | 1 << i)
        };
        let toggles = (0..num_vars)
            .map(|c| to_mask(matrix.iter().map(|row| row[c]).collect()))
            .collect();

        Self {
            matrix,
            num_vars,
            num_eqs,
            col_to_pivot: vec![None; num_vars],
            free_vars: Vec::new(),
            target: to_mask(lights.clone()),
            toggles,
        }
    }

    /// Gauss-Jordan elimination to reduced row echelon form.
    ///
    /// Returns `false` when a row reads `0 = 1`, i.e. the lights cannot be
    /// reached by any combination of presses.
    fn rref(&mut self) -> bool {
        self.col_to_pivot.fill(None);
        self.free_vars.clear();
        let mut pivot_row = 0;

        for c in 0..self.num_vars {
            let Some(r) = (pivot_row..self.num_eqs).find(|&r| self.matrix[r][c]) else {
                self.free_vars.push(c);
                continue;
            };

            self.matrix.swap(pivot_row, r);
            self.col_to_pivot[c] = Some(pivot_row);

            let pivot = self.matrix[pivot_row].clone();
            for (i, row) in self.matrix.iter_mut().enumerate() {
                if i != pivot_row && row[c] {
                    *row ^= &pivot;
                }
            }
            pivot_row += 1;
        }

        self.matrix[pivot_row..]
            .iter()
            .all(|row| !row[self.num_vars])
    }

    /// Particular solution with every free variable at zero, plus one
    /// null-space basis vector per free variable.
    fn solution_space(&self) -> (Row, Vec<Row>) {
        let mut particular = Row::repeat(false, self.num_vars);
        for (c, pivot) in self.col_to_pivot.iter().enumerate() {
            if let Some(r) = *pivot {
                particular.set(c, self.matrix[r][self.num_vars]);
            }
        }

        // In RREF a pivot row only mentions its own pivot and free columns, so
        // with a single free variable `f` raised, pivot `c` equals row[f].
        let basis = self
            .free_vars
            .iter()
            .map(|&f| {
                let mut v = Row::repeat(false, self.num_vars);
                v.set(f, true);
                for (c, pivot) in self.col_to_pivot.iter().enumerate() {
                    if let Some(r) = *pivot {
                        v.set(c, self.matrix[r][f]);
                    }
                }
                v
            })
            .collect();

        (particular, basis)
    }

    /// Fewest button presses that produce the target light pattern.
    pub fn min_presses(&mut self) -> Option<usize> {
        if !self.rref() {
            return None;
        }

        if self.free_vars.len() > MAX_GRAY_FREE_VARS {
            tracing::debug!(
                free_vars = self.free_vars.len(),
                lights = self.num_eqs,
                "too many free variables, searching light states"
            );
            return self.min_by_search();
        }
        Some(self.min_by_gray_code())
    }

    /// Walks all `2^k` free-variable assignments in Gray-code order, so each
    /// step is a single XOR with one basis vector.
    fn min_by_gray_code(&self) -> usize {
        let (mut current, basis) = self.solution_space();
        let mut best = current.count_ones();

        for i in 1..1usize << basis.len() {
            current ^= &basis[i.trailing_zeros() as usize];
            best = best.min(current.count_ones());
        }
        best
    }

    /// Breadth-first search over the `2^lights` reachable patterns.
    fn min_by_search(&self) -> Option<usize> {
        let mut dist = vec![usize::MAX; 1 << self.num_eqs];
        let mut queue = VecDeque::from([0u32]);
        dist[0] = 0;

        while let Some(state) = queue.pop_front() {
            let d = dist[state as usize];
            if state == self.target {
                return Some(d);
            }
            for &toggle in &self.toggles {
                let next = state ^ toggle;
                if dist[next as usize] == usize::MAX {
                    dist[next as usize] = d + 1;
                    queue.push_back(next);
                }
            }
        }
        None
    }
}
