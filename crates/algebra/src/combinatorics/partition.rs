use std::{fmt, str::FromStr};

use anyhow::{anyhow, Context};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::StandardTableau;

/// An integer partition, stored as its weakly decreasing list of positive parts.
///
/// Partitions compare lexicographically on their parts, so `[1, 1] < [2] < [2, 1] < [3]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Partition(Vec<usize>);

impl Partition {
    /// Builds a partition from its parts. Trailing zeros are dropped.
    ///
    /// # Panics
    /// Panics if the parts are not weakly decreasing.
    pub fn new(parts: &[usize]) -> Self {
        match Self::try_from(parts.to_vec()) {
            Ok(p) => p,
            Err(e) => panic!("{e}"),
        }
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn parts(&self) -> &[usize] {
        &self.0
    }

    /// The sum of the parts.
    pub fn size(&self) -> usize {
        self.0.iter().sum()
    }

    /// The number of nonzero parts.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The `i`th part, or zero past the end.
    pub fn part(&self, i: usize) -> usize {
        self.0.get(i).copied().unwrap_or(0)
    }

    pub fn conjugate(&self) -> Self {
        let first = self.part(0);
        Self(
            (0..first)
                .map(|j| self.0.iter().take_while(|&&x| x > j).count())
                .collect(),
        )
    }

    /// The standard tableau whose rows are filled with consecutive integers, top to bottom.
    pub fn initial_tableau(&self) -> StandardTableau {
        let mut next = 1;
        let rows = self
            .0
            .iter()
            .map(|&l| {
                let row = (next..next + l).collect();
                next += l;
                row
            })
            .collect();
        StandardTableau::new_unchecked(rows)
    }

    /// The number of standard tableaux of this shape, by the hook length formula.
    pub fn dimension(&self) -> u128 {
        let conjugate = self.conjugate();
        let factorial: u128 = (1..=self.size() as u128).product();
        let hooks: u128 = self
            .0
            .iter()
            .enumerate()
            .flat_map(|(i, &row)| (0..row).map(move |j| (i, row, j)))
            .map(|(i, row, j)| ((row - j) + (conjugate.part(j) - i) - 1) as u128)
            .product();
        factorial / hooks
    }

    /// Whether `self` dominates `other`, i.e. every partial sum of `self` is at least the
    /// corresponding partial sum of `other`. Both must have the same size.
    pub fn dominates(&self, other: &Self) -> bool {
        if self.size() != other.size() {
            return false;
        }
        let mut a = 0;
        let mut b = 0;
        for i in 0..std::cmp::max(self.len(), other.len()) {
            a += self.part(i);
            b += other.part(i);
            if a < b {
                return false;
            }
        }
        true
    }

    /// The positions of the outer corners, i.e. the rows whose last cell can be removed.
    pub fn corners(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len()).filter(move |&i| self.part(i) > self.part(i + 1))
    }

    /// Removes the last cell of row `i`.
    pub(crate) fn remove_cell(&self, i: usize) -> Self {
        let mut parts = self.0.clone();
        parts[i] -= 1;
        if parts[i] == 0 {
            parts.pop();
        }
        Self(parts)
    }
}

impl TryFrom<Vec<usize>> for Partition {
    type Error = anyhow::Error;

    fn try_from(mut parts: Vec<usize>) -> anyhow::Result<Self> {
        while parts.last() == Some(&0) {
            parts.pop();
        }
        if parts.iter().tuple_windows().any(|(a, b)| a < b) {
            return Err(anyhow!("{parts:?} is not weakly decreasing"));
        }
        if parts.contains(&0) {
            return Err(anyhow!("{parts:?} has a zero part"));
        }
        Ok(Self(parts))
    }
}

impl From<Partition> for Vec<usize> {
    fn from(p: Partition) -> Self {
        p.0
    }
}

impl FromStr for Partition {
    type Err = anyhow::Error;

    /// Accepts `3,2,1`, `3 2 1` and `[3, 2, 1]`.
    fn from_str(s: &str) -> anyhow::Result<Self> {
        let inner = s
            .trim()
            .trim_start_matches(['[', '('])
            .trim_end_matches([']', ')']);
        let parts = inner
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|x| !x.is_empty())
            .map(|x| {
                x.parse::<usize>()
                    .with_context(|| format!("Invalid part '{x}' in partition '{s}'"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Self::try_from(parts)
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.iter().format(", "))
    }
}

/// All partitions of `n`, in reverse lexicographic order.
pub fn partitions(n: usize) -> Vec<Partition> {
    partitions_with_max_length(n, n)
}

/// All partitions of `n` with at most `max_length` parts, in reverse lexicographic order.
///
/// # Example
/// ```
/// # use algebra::combinatorics::partitions_with_max_length;
/// let ps: Vec<String> = partitions_with_max_length(4, 2)
///     .iter()
///     .map(ToString::to_string)
///     .collect();
/// assert_eq!(ps, ["[4]", "[3, 1]", "[2, 2]"]);
/// ```
pub fn partitions_with_max_length(n: usize, max_length: usize) -> Vec<Partition> {
    fn fill(
        remaining: usize,
        max_part: usize,
        max_length: usize,
        current: &mut Vec<usize>,
        result: &mut Vec<Partition>,
    ) {
        if remaining == 0 {
            result.push(Partition(current.clone()));
            return;
        }
        if current.len() == max_length {
            return;
        }
        for part in (1..=std::cmp::min(remaining, max_part)).rev() {
            current.push(part);
            fill(remaining - part, part, max_length, current, result);
            current.pop();
        }
    }

    let mut result = Vec::new();
    fill(n, n, max_length, &mut Vec::new(), &mut result);
    result
}

#[cfg(test)]
mod tests {
    use expect_test::expect;
    use rstest::rstest;

    use super::*;

    #[test]
    fn partitions_of_five() {
        expect![[r#"
            [5]
            [4, 1]
            [3, 2]
            [3, 1, 1]
            [2, 2, 1]
            [2, 1, 1, 1]
            [1, 1, 1, 1, 1]"#]]
        .assert_eq(&partitions(5).iter().join("\n"));
        assert_eq!(partitions(0), vec![Partition::empty()]);
    }

    #[rstest]
    #[case(&[3, 2, 1], &[3, 2, 1])]
    #[case(&[4, 1], &[2, 1, 1, 1])]
    #[case(&[], &[])]
    fn conjugate(#[case] parts: &[usize], #[case] expected: &[usize]) {
        assert_eq!(Partition::new(parts).conjugate(), Partition::new(expected));
    }

    #[rstest]
    #[case(&[3], 1)]
    #[case(&[2, 1], 2)]
    #[case(&[3, 2, 1], 16)]
    #[case(&[4, 2], 9)]
    #[case(&[1, 1, 1, 1], 1)]
    fn dimension(#[case] parts: &[usize], #[case] expected: u128) {
        assert_eq!(Partition::new(parts).dimension(), expected);
    }

    #[test]
    fn parse() {
        let expected = Partition::new(&[3, 2, 1]);
        assert_eq!("3,2,1".parse::<Partition>().unwrap(), expected);
        assert_eq!("[3, 2, 1]".parse::<Partition>().unwrap(), expected);
        assert_eq!("3 2 1 0".parse::<Partition>().unwrap(), expected);
        assert_eq!("[]".parse::<Partition>().unwrap(), Partition::empty());
        assert!("1,2".parse::<Partition>().is_err());
        assert!("a".parse::<Partition>().is_err());
    }

    #[test]
    fn ordering() {
        let mut ps = vec![
            Partition::new(&[2]),
            Partition::new(&[1, 1]),
            Partition::empty(),
            Partition::new(&[2, 1]),
        ];
        ps.sort();
        assert_eq!(ps.iter().join(" < "), "[] < [1, 1] < [2] < [2, 1]");
    }

    #[test]
    fn dominance() {
        let a = Partition::new(&[3, 1]);
        let b = Partition::new(&[2, 2]);
        assert!(a.dominates(&b));
        assert!(!b.dominates(&a));
        assert!(a.dominates(&a));
    }

    #[test]
    fn serde() {
        let p = Partition::new(&[2, 1]);
        assert_eq!(serde_json::to_string(&p).unwrap(), "[2,1]");
        assert_eq!(serde_json::from_str::<Partition>("[2,1]").unwrap(), p);
        assert!(serde_json::from_str::<Partition>("[1,2]").is_err());
    }
}
