use std::fmt;

use itertools::Itertools;

use crate::prime::ValidPrime;

/// A dense vector over F_p. Entries are always reduced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FpVector {
    p: ValidPrime,
    entries: Vec<u32>,
}

impl FpVector {
    pub fn new(p: ValidPrime, len: usize) -> Self {
        Self {
            p,
            entries: vec![0; len],
        }
    }

    pub fn from_slice(p: ValidPrime, slice: &[u32]) -> Self {
        Self {
            p,
            entries: slice.iter().map(|&x| x % p.as_u32()).collect(),
        }
    }

    pub fn prime(&self) -> ValidPrime {
        self.p
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, index: usize) -> u32 {
        self.entries[index]
    }

    pub fn set_entry(&mut self, index: usize, value: u32) {
        self.entries[index] = value % self.p.as_u32();
    }

    /// Adds `c` times `other` to `self`.
    pub fn add(&mut self, other: &Self, c: u32) {
        debug_assert_eq!(self.len(), other.len());
        if c == 0 {
            return;
        }
        let p = self.p;
        for (x, &y) in self.entries.iter_mut().zip(&other.entries) {
            if y != 0 {
                *x = p.sum(*x, p.product(c, y));
            }
        }
    }

    pub fn scale(&mut self, c: u32) {
        let p = self.p;
        for x in &mut self.entries {
            *x = p.product(*x, c);
        }
    }

    pub fn assign(&mut self, other: &Self) {
        self.entries.clone_from(&other.entries);
    }

    pub fn is_zero(&self) -> bool {
        self.entries.iter().all(|&x| x == 0)
    }

    /// Pads the vector with zeros until it has length `len`.
    pub fn extend_len(&mut self, len: usize) {
        if len > self.entries.len() {
            self.entries.resize(len, 0);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.iter().copied()
    }

    pub fn iter_nonzero(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.entries
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, x)| x != 0)
    }

    pub fn first_nonzero(&self) -> Option<(usize, u32)> {
        self.iter_nonzero().next()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.entries
    }
}

impl fmt::Display for FpVector {
    /// The alternate form prints the entries as signed representatives.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(
                f,
                "[{}]",
                self.iter().map(|x| self.p.to_signed(x)).format(", ")
            )
        } else {
            write!(f, "[{}]", self.entries.iter().format(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use super::*;

    #[test]
    fn add_and_scale() {
        let p = ValidPrime::new(7);
        let mut v = FpVector::from_slice(p, &[1, 2, 3, 0]);
        let w = FpVector::from_slice(p, &[6, 0, 5, 1]);
        v.add(&w, 2);
        assert_eq!(v.as_slice(), &[6, 2, 6, 2]);
        v.scale(3);
        assert_eq!(v.as_slice(), &[4, 6, 4, 6]);
        assert_eq!(v.first_nonzero(), Some((0, 4)));
    }

    #[test]
    fn extend() {
        let p = ValidPrime::new(5);
        let mut v = FpVector::from_slice(p, &[1, 4]);
        v.extend_len(4);
        assert_eq!(v.len(), 4);
        expect![["[1, 4, 0, 0]"]].assert_eq(&v.to_string());
        expect![["[1, -1, 0, 0]"]].assert_eq(&format!("{v:#}"));
    }
}
