use std::fmt;

use anyhow::anyhow;
use itertools::Itertools;

/// A permutation of `{0, ..., n - 1}`, stored by its images.
///
/// Permutations are displayed in one-line notation, shifted to be 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Permutation(Vec<usize>);

impl Permutation {
    pub fn identity(n: usize) -> Self {
        Self((0..n).collect())
    }

    /// Builds a permutation from its 1-based one-line notation.
    pub fn from_one_line(one_line: &[usize]) -> anyhow::Result<Self> {
        let n = one_line.len();
        let mut seen = vec![false; n];
        for &x in one_line {
            if x == 0 || x > n || std::mem::replace(&mut seen[x - 1], true) {
                return Err(anyhow!("{one_line:?} is not a permutation"));
            }
        }
        Ok(Self(one_line.iter().map(|x| x - 1).collect()))
    }

    /// Builds the permutation of `{0, ..., n - 1}` with the given (0-based) cycles.
    pub fn from_cycles(n: usize, cycles: &[Vec<usize>]) -> Self {
        let mut images: Vec<usize> = (0..n).collect();
        for cycle in cycles {
            for (&a, &b) in cycle.iter().circular_tuple_windows() {
                images[a] = b;
            }
        }
        Self(images)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn images(&self) -> &[usize] {
        &self.0
    }

    pub fn apply(&self, i: usize) -> usize {
        self.0[i]
    }

    pub fn is_identity(&self) -> bool {
        self.0.iter().enumerate().all(|(i, &x)| i == x)
    }

    pub fn inverse(&self) -> Self {
        let mut result = vec![0; self.len()];
        for (i, &x) in self.0.iter().enumerate() {
            result[x] = i;
        }
        Self(result)
    }

    /// The composition `self ∘ other`, which applies `other` first.
    pub fn compose(&self, other: &Self) -> Self {
        assert_eq!(self.len(), other.len());
        Self(other.0.iter().map(|&i| self.0[i]).collect())
    }

    /// The nontrivial cycles, each starting with its smallest element, sorted by that element.
    pub fn cycle_tuples(&self) -> Vec<Vec<usize>> {
        let mut seen = vec![false; self.len()];
        let mut result = Vec::new();
        for start in 0..self.len() {
            if seen[start] {
                continue;
            }
            let mut cycle = vec![start];
            seen[start] = true;
            let mut i = self.0[start];
            while i != start {
                seen[i] = true;
                cycle.push(i);
                i = self.0[i];
            }
            if cycle.len() > 1 {
                result.push(cycle);
            }
        }
        result
    }

    pub fn sign(&self) -> i32 {
        let transpositions: usize = self.cycle_tuples().iter().map(|c| c.len() - 1).sum();
        if transpositions % 2 == 0 {
            1
        } else {
            -1
        }
    }

    /// The 1-based cycle notation, e.g. `(1,4,10)(2,5,11)`. The identity is `()`.
    pub fn cycle_notation(&self) -> String {
        let cycles = self.cycle_tuples();
        if cycles.is_empty() {
            return "()".to_string();
        }
        cycles
            .iter()
            .map(|c| format!("({})", c.iter().map(|x| x + 1).format(",")))
            .collect()
    }

    /// The standard permutation of a word: the letters are ranked by value, with ties broken
    /// from left to right, and position `i` is sent to the rank of its letter.
    ///
    /// # Example
    /// ```
    /// # use algebra::combinatorics::Permutation;
    /// let s = Permutation::standard_permutation(&[3, 1, 3, 2]);
    /// assert_eq!(s.to_string(), "[3, 1, 4, 2]");
    /// ```
    pub fn standard_permutation<T: Ord>(word: &[T]) -> Self {
        let mut order: Vec<usize> = (0..word.len()).collect();
        order.sort_by(|&a, &b| word[a].cmp(&word[b]));
        Self(order).inverse()
    }

    /// The minimal permutation `s` such that `i ↦ t[s(i)]` is weakly decreasing.
    pub fn reverse_sorting_permutation<T: Ord>(t: &[T]) -> Self {
        let mut order: Vec<usize> = (0..t.len()).collect();
        order.sort_by(|&a, &b| t[b].cmp(&t[a]));
        Self(order)
    }

    /// The smallest word whose standard permutation is `self`.
    pub fn destandardize(&self) -> Vec<usize> {
        let n = self.len();
        let sigma = self.inverse();
        let mut w = vec![0; n];
        let mut c = 0;
        for i in 0..n {
            w[sigma.0[i]] = c;
            if i + 1 < n && sigma.0[i + 1] < sigma.0[i] {
                c += 1;
            }
        }
        w
    }
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.iter().map(|x| x + 1).format(", "))
    }
}

/// All permutations of `{0, ..., n - 1}` that fix every point outside `positions`.
pub fn permutations_of(positions: &[usize], n: usize) -> Vec<Permutation> {
    positions
        .iter()
        .copied()
        .permutations(positions.len())
        .map(|images| {
            let mut result: Vec<usize> = (0..n).collect();
            for (&from, to) in positions.iter().zip(images) {
                result[from] = to;
            }
            Permutation(result)
        })
        .collect()
}
