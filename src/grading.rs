//! Gradings of the subspaces computed by [`crate::closure::GradedSubspace`], and the rules for
//! shifting them by an operator.

use std::fmt;

use algebra::combinatorics::Partition;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// A grading whose degrees can be read as exponents of a Hilbert polynomial.
pub trait Grading {
    /// The exponents of the monomial recording this degree. Degrees of a computed subspace are
    /// never negative.
    fn exponents(&self) -> Vec<u32>;
}

impl Grading for () {
    fn exponents(&self) -> Vec<u32> {
        Vec::new()
    }
}

impl Grading for i32 {
    fn exponents(&self) -> Vec<u32> {
        assert!(*self >= 0, "negative degree {self}");
        vec![*self as u32]
    }
}

/// A multidegree in `ℤ^r`, one entry per row of variables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Degree(Vec<i32>);

impl Degree {
    pub fn new(entries: Vec<i32>) -> Self {
        Self(entries)
    }

    pub fn zero(r: usize) -> Self {
        Self(vec![0; r])
    }

    pub fn entries(&self) -> &[i32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_non_negative(&self) -> bool {
        self.0.iter().all(|&x| x >= 0)
    }

    pub fn is_weakly_decreasing(&self) -> bool {
        self.0.iter().tuple_windows().all(|(a, b)| a >= b)
    }

    /// The partition with these parts, if they are non-negative and weakly decreasing.
    pub fn to_partition(&self) -> Option<Partition> {
        if !self.is_non_negative() {
            return None;
        }
        Partition::try_from(self.0.iter().map(|&x| x as usize).collect::<Vec<_>>()).ok()
    }

    fn sum(&self, other: &Self) -> Self {
        assert_eq!(self.len(), other.len());
        Self(self.0.iter().zip(&other.0).map(|(a, b)| a + b).collect())
    }
}

impl From<Vec<i32>> for Degree {
    fn from(entries: Vec<i32>) -> Self {
        Self(entries)
    }
}

impl Grading for Degree {
    fn exponents(&self) -> Vec<u32> {
        assert!(self.is_non_negative(), "negative degree {self}");
        self.0.iter().map(|&x| x as u32).collect()
    }
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.iter().format(", "))
    }
}

/// The componentwise sum, or `None` if some entry is negative.
///
/// # Example
/// ```
/// # use harmonics::grading::{add_degree, Degree};
/// let d = Degree::new(vec![3, 2, 1]);
/// assert_eq!(add_degree(&d, &Degree::new(vec![-2, 1, 4])), Some(Degree::new(vec![1, 3, 5])));
/// assert_eq!(add_degree(&d, &Degree::new(vec![2, 1, -2])), None);
/// ```
pub fn add_degree(d1: &Degree, d2: &Degree) -> Option<Degree> {
    let d = d1.sum(d2);
    d.is_non_negative().then_some(d)
}

/// The componentwise sum sorted decreasingly, or `None` if some entry is negative.
pub fn add_degree_symmetric(d1: &Degree, d2: &Degree) -> Option<Degree> {
    let mut d = add_degree(d1, d2)?;
    d.0.sort_unstable_by(|a, b| b.cmp(a));
    Some(d)
}

/// Degrees of isotypic components: a multidegree together with the shape of the component. An
/// operator moves to the shape of its own degree.
pub fn add_degree_isotyp(
    d1: &(Degree, Partition),
    d2: &(Degree, Partition),
) -> (Degree, Partition) {
    (d1.0.sum(&d2.0), d2.1.clone())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn d(x: &[i32]) -> Degree {
        Degree::new(x.to_vec())
    }

    #[rstest]
    #[case(&[-2, 0, 0], Some(&[2, 1, 1][..]))]
    #[case(&[-2, 1, 4], Some(&[5, 3, 1][..]))]
    #[case(&[2, 1, 1], Some(&[5, 3, 2][..]))]
    #[case(&[2, 1, -2], None)]
    fn symmetric_sums(#[case] shift: &[i32], #[case] expected: Option<&[i32]>) {
        assert_eq!(
            add_degree_symmetric(&d(&[3, 2, 1]), &d(shift)),
            expected.map(d)
        );
    }

    #[test]
    fn isotypic_sum() {
        let d1 = (d(&[3, 0]), Partition::new(&[2, 1]));
        let d2 = (d(&[-1, 0]), Partition::new(&[3]));
        assert_eq!(add_degree_isotyp(&d1, &d2), (d(&[2, 0]), Partition::new(&[3])));
    }

    #[test]
    fn display_and_partitions() {
        assert_eq!(d(&[3, 5]).to_string(), "(3, 5)");
        assert!(!d(&[3, 5]).is_weakly_decreasing());
        assert_eq!(d(&[3, 1, 0]).to_partition(), Some(Partition::new(&[3, 1])));
        assert_eq!(d(&[1, 3]).to_partition(), None);
        assert_eq!(Degree::zero(2).to_partition(), Some(Partition::empty()));
    }
}
