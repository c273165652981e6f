//! Sparse multivariate polynomials over a prime field.
//!
//! A [`Polynomial`] does not know the names of its variables. Those live in a
//! [`PolynomialRing`], which prints and parses polynomials.

mod parser;
mod ring;

use std::{cmp::Ordering, collections::BTreeMap};

use fp::prime::ValidPrime;

use crate::combinatorics::Permutation;

pub use parser::{parse_polynomial, PolynomialNode};
pub use ring::PolynomialRing;

/// The exponent vector of a monomial.
///
/// Monomials are ordered by degree reverse lexicographic order: first by total degree, then
/// the monomial with the smaller exponent in the last variable where they differ is larger.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Monomial(Vec<u32>);

impl Monomial {
    pub fn new(exponents: Vec<u32>) -> Self {
        Self(exponents)
    }

    pub fn one(nvars: usize) -> Self {
        Self(vec![0; nvars])
    }

    /// The monomial `x_var`.
    pub fn variable(nvars: usize, var: usize) -> Self {
        let mut result = Self::one(nvars);
        result.0[var] = 1;
        result
    }

    pub fn exponents(&self) -> &[u32] {
        &self.0
    }

    pub fn nvars(&self) -> usize {
        self.0.len()
    }

    pub fn degree(&self) -> u32 {
        self.0.iter().sum()
    }

    /// The componentwise difference, or `None` if some entry would be negative.
    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        self.0
            .iter()
            .zip(&other.0)
            .map(|(&a, &b)| a.checked_sub(b))
            .collect::<Option<Vec<_>>>()
            .map(Self)
    }

    pub fn mul(&self, other: &Self) -> Self {
        Self(self.0.iter().zip(&other.0).map(|(a, b)| a + b).collect())
    }

    /// Renames variable `i` to variable `images[i]`.
    pub fn permute(&self, images: &[usize]) -> Self {
        let mut result = vec![0; self.0.len()];
        for (i, &e) in self.0.iter().enumerate() {
            result[images[i]] = e;
        }
        Self(result)
    }
}

impl PartialOrd for Monomial {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Monomial {
    fn cmp(&self, other: &Self) -> Ordering {
        self.degree().cmp(&other.degree()).then_with(|| {
            self.0
                .iter()
                .zip(&other.0)
                .rev()
                .find(|(a, b)| a != b)
                .map_or(Ordering::Equal, |(a, b)| b.cmp(a))
        })
    }
}

/// Returns `X^e(∂)(X^f)` as `(g, c)` representing `c X^g`, or `None` if it vanishes. Here
/// `g = f - e` and `c = prod f_i! / g_i!`.
pub fn polynomial_derivative_on_basis(
    p: ValidPrime,
    e: &Monomial,
    f: &Monomial,
) -> Option<(Monomial, u32)> {
    let g = f.checked_sub(e)?;
    let c = f
        .0
        .iter()
        .zip(&g.0)
        .fold(1, |acc, (&fi, &gi)| p.product(acc, p.factorial_ratio(fi, gi)));
    if c == 0 {
        return None;
    }
    Some((g, c))
}

/// A polynomial in `nvars` variables over F_p, stored as a map from monomials to nonzero
/// coefficients.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Polynomial {
    p: ValidPrime,
    nvars: usize,
    terms: BTreeMap<Monomial, u32>,
}

impl Polynomial {
    pub fn zero(p: ValidPrime, nvars: usize) -> Self {
        Self {
            p,
            nvars,
            terms: BTreeMap::new(),
        }
    }

    pub fn constant(p: ValidPrime, nvars: usize, c: u32) -> Self {
        Self::monomial(p, Monomial::one(nvars), c)
    }

    pub fn variable(p: ValidPrime, nvars: usize, var: usize) -> Self {
        Self::monomial(p, Monomial::variable(nvars, var), 1)
    }

    pub fn monomial(p: ValidPrime, m: Monomial, c: u32) -> Self {
        let mut result = Self::zero(p, m.nvars());
        result.add_term(m, c);
        result
    }

    pub fn prime(&self) -> ValidPrime {
        self.p
    }

    pub fn nvars(&self) -> usize {
        self.nvars
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// The number of nonzero terms.
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// The terms in increasing monomial order.
    pub fn terms(&self) -> impl DoubleEndedIterator<Item = (&Monomial, u32)> + '_ {
        self.terms.iter().map(|(m, &c)| (m, c))
    }

    pub fn coefficient(&self, m: &Monomial) -> u32 {
        self.terms.get(m).copied().unwrap_or(0)
    }

    /// Adds `c X^m`.
    pub fn add_term(&mut self, m: Monomial, c: u32) {
        debug_assert_eq!(m.nvars(), self.nvars);
        let c = c % self.p.as_u32();
        if c == 0 {
            return;
        }
        let p = self.p;
        match self.terms.entry(m) {
            std::collections::btree_map::Entry::Vacant(e) => {
                e.insert(c);
            }
            std::collections::btree_map::Entry::Occupied(mut e) => {
                let sum = p.sum(*e.get(), c);
                if sum == 0 {
                    e.remove();
                } else {
                    *e.get_mut() = sum;
                }
            }
        }
    }

    /// Adds `c` times `other` to `self`.
    pub fn add(&mut self, other: &Self, c: u32) {
        assert_eq!(self.nvars, other.nvars);
        let c = c % self.p.as_u32();
        if c == 0 {
            return;
        }
        for (m, d) in other.terms() {
            self.add_term(m.clone(), self.p.product(c, d));
        }
    }

    pub fn scale(&mut self, c: u32) {
        let p = self.p;
        let c = c % p.as_u32();
        if c == 0 {
            self.terms.clear();
            return;
        }
        for x in self.terms.values_mut() {
            *x = p.product(*x, c);
        }
    }

    pub fn neg(&self) -> Self {
        let mut result = self.clone();
        result.scale(self.p.as_u32() - 1);
        result
    }

    pub fn mul(&self, other: &Self) -> Self {
        assert_eq!(self.nvars, other.nvars);
        let p = self.p;
        let mut result = Self::zero(p, self.nvars);
        for (m1, c1) in self.terms() {
            for (m2, c2) in other.terms() {
                result.add_term(m1.mul(m2), p.product(c1, c2));
            }
        }
        result
    }

    pub fn pow(&self, mut k: u32) -> Self {
        let mut result = Self::constant(self.p, self.nvars, 1);
        let mut base = self.clone();
        while k > 0 {
            if k & 1 == 1 {
                result = result.mul(&base);
            }
            k >>= 1;
            if k > 0 {
                base = base.mul(&base);
            }
        }
        result
    }

    /// The total degree, or `None` for the zero polynomial.
    pub fn degree(&self) -> Option<u32> {
        self.terms.keys().next_back().map(Monomial::degree)
    }

    /// The largest monomial with a nonzero coefficient.
    pub fn leading_exponents(&self) -> Option<&Monomial> {
        self.terms.keys().next_back()
    }

    /// The same polynomial in a ring with `nvars` variables, the original variables coming first.
    pub fn embed(&self, nvars: usize) -> Self {
        assert!(nvars >= self.nvars);
        Self {
            p: self.p,
            nvars,
            terms: self
                .terms
                .iter()
                .map(|(m, &c)| {
                    let mut e = m.0.clone();
                    e.resize(nvars, 0);
                    (Monomial(e), c)
                })
                .collect(),
        }
    }

    /// `∂^k/∂x_var^k`.
    pub fn derivative(&self, var: usize, k: u32) -> Self {
        let p = self.p;
        let mut result = Self::zero(p, self.nvars);
        for (m, c) in self.terms() {
            let e = m.0[var];
            if e < k {
                continue;
            }
            let mut m = m.clone();
            m.0[var] = e - k;
            result.add_term(m, p.product(c, p.factorial_ratio(e, e - k)));
        }
        result
    }

    /// Applies `self(∂)`, the differential operator obtained by substituting `∂/∂x_i` for every
    /// variable `x_i`, to `q`.
    pub fn polynomial_derivative(&self, q: &Self) -> Self {
        assert_eq!(self.nvars, q.nvars);
        let p = self.p;
        let mut result = Self::zero(p, self.nvars);
        for (e, c1) in self.terms() {
            for (f, c2) in q.terms() {
                if let Some((g, c3)) = polynomial_derivative_on_basis(p, e, f) {
                    result.add_term(g, p.product(p.product(c1, c2), c3));
                }
            }
        }
        result
    }

    /// Renames variable `i` to `images[i]`.
    pub fn permute_variables(&self, images: &[usize]) -> Self {
        assert_eq!(images.len(), self.nvars);
        let mut result = Self::zero(self.p, self.nvars);
        for (m, c) in self.terms() {
            result.add_term(m.permute(images), c);
        }
        result
    }

    /// Acts by a permutation `sigma` of `0..block` simultaneously on every block of `block`
    /// consecutive variables, sending variable `i + block * j` to `sigma(i) + block * j`.
    pub fn act(&self, sigma: &Permutation, block: usize) -> Self {
        assert_eq!(sigma.len(), block);
        if sigma.is_identity() {
            return self.clone();
        }
        assert_eq!(self.nvars % block, 0);
        let images: Vec<usize> = (0..self.nvars)
            .map(|v| sigma.apply(v % block) + block * (v / block))
            .collect();
        self.permute_variables(&images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(e: &[u32]) -> Monomial {
        Monomial::new(e.to_vec())
    }

    #[test]
    fn monomial_order() {
        let mut ms = vec![
            m(&[0, 1, 2]),
            m(&[2, 1, 0]),
            m(&[1, 0, 2]),
            m(&[0, 2, 1]),
            m(&[1, 2, 0]),
            m(&[2, 0, 1]),
            m(&[3, 0, 0]),
            m(&[0, 0, 1]),
        ];
        ms.sort();
        ms.reverse();
        let exponents: Vec<&[u32]> = ms.iter().map(Monomial::exponents).collect();
        assert_eq!(
            exponents,
            [
                &[3, 0, 0][..],
                &[2, 1, 0],
                &[1, 2, 0],
                &[2, 0, 1],
                &[0, 2, 1],
                &[1, 0, 2],
                &[0, 1, 2],
                &[0, 0, 1],
            ]
        );
    }

    #[test]
    fn derivative_on_basis() {
        let p = fp::prime::DEFAULT_PRIME;
        let check = |e: &[u32], f: &[u32], g: &[u32], c: u32| {
            assert_eq!(
                polynomial_derivative_on_basis(p, &m(e), &m(f)),
                Some((m(g), c))
            );
        };
        check(&[4, 0], &[4, 0], &[0, 0], 24);
        check(&[0, 3], &[0, 3], &[0, 0], 6);
        check(&[0, 1], &[0, 3], &[0, 2], 3);
        check(&[2, 0], &[4, 0], &[2, 0], 12);
        check(&[2, 1], &[4, 3], &[2, 2], 36);
        assert_eq!(polynomial_derivative_on_basis(p, &m(&[1, 3]), &m(&[1, 2])), None);
        assert_eq!(polynomial_derivative_on_basis(p, &m(&[2, 0]), &m(&[1, 2])), None);
    }

    #[test]
    fn arithmetic() {
        let p = ValidPrime::new(7);
        let x = Polynomial::variable(p, 2, 0);
        let y = Polynomial::variable(p, 2, 1);
        let mut s = x.clone();
        s.add(&y, 1);
        let square = s.pow(2);
        assert_eq!(square.num_terms(), 3);
        assert_eq!(square.coefficient(&m(&[1, 1])), 2);
        assert_eq!(square.degree(), Some(2));
        assert_eq!(square.leading_exponents(), Some(&m(&[2, 0])));

        let mut zero = square.clone();
        zero.add(&square, 6);
        assert!(zero.is_zero());
        assert_eq!(zero.degree(), None);

        assert_eq!(x.pow(7).derivative(0, 7).coefficient(&m(&[0, 0])), 0);
        assert_eq!(x.pow(3).derivative(0, 2).coefficient(&m(&[1, 0])), 6);
    }

    #[test]
    fn act_by_blocks() {
        let p = ValidPrime::new(5);
        // x0 * x1^2 * x3 in two blocks of two variables
        let f = Polynomial::monomial(p, m(&[1, 2, 0, 1]), 3);
        let sigma = Permutation::from_one_line(&[2, 1]).unwrap();
        let g = f.act(&sigma, 2);
        assert_eq!(g.coefficient(&m(&[2, 1, 1, 0])), 3);
        assert_eq!(g.num_terms(), 1);
        assert_eq!(f.embed(5).coefficient(&m(&[1, 2, 0, 1, 0])), 3);
    }

    #[test]
    fn act_on_empty_blocks() {
        let p = ValidPrime::new(5);
        let one = Polynomial::constant(p, 0, 1);
        assert_eq!(one.act(&Permutation::identity(0), 0), one);
    }
}
