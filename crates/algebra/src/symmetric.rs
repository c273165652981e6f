//! Symmetric functions: expansions of the monomial and power sum symmetric functions as
//! polynomials, Kostka numbers, and characters written in the Schur basis.

use std::{cell::RefCell, collections::BTreeMap, fmt};

use fp::prime::ValidPrime;
use rustc_hash::FxHashMap as HashMap;

use crate::{
    combinatorics::{next_multiset_permutation, partitions_with_max_length, Partition},
    polynomial::{Monomial, Polynomial},
};

/// The monomial symmetric function `m_nu` in `nvars` variables. This is zero if `nu` has more
/// than `nvars` parts.
pub fn monomial_symmetric(p: ValidPrime, nu: &Partition, nvars: usize) -> Polynomial {
    let mut result = Polynomial::zero(p, nvars);
    if nu.len() > nvars {
        return result;
    }
    let mut exponents: Vec<u32> = (0..nvars).map(|i| nu.part(i) as u32).collect();
    exponents.sort_unstable();
    loop {
        result.add_term(Monomial::new(exponents.clone()), 1);
        if !next_multiset_permutation(&mut exponents) {
            break;
        }
    }
    result
}

/// The power sum `p_k = x_0^k + ... + x_{nvars - 1}^k`.
pub fn power_sum(p: ValidPrime, k: u32, nvars: usize) -> Polynomial {
    let mut result = Polynomial::zero(p, nvars);
    for i in 0..nvars {
        let mut e = vec![0; nvars];
        e[i] = k;
        result.add_term(Monomial::new(e), 1);
    }
    result
}

thread_local! {
    static KOSTKA_CACHE: RefCell<HashMap<(Partition, Partition), u64>> =
        RefCell::new(HashMap::default());
}

/// The number of semistandard tableaux of shape `lambda` and content `mu`.
pub fn kostka_number(lambda: &Partition, mu: &Partition) -> u64 {
    if lambda.size() != mu.size() {
        return 0;
    }
    if mu.is_empty() {
        return 1;
    }
    let key = (lambda.clone(), mu.clone());
    if let Some(k) = KOSTKA_CACHE.with(|c| c.borrow().get(&key).copied()) {
        return k;
    }

    // The cells containing the largest letter form a horizontal strip.
    let strip = mu.part(mu.len() - 1);
    let rest = Partition::new(&mu.parts()[..mu.len() - 1]);
    let mut inner = Vec::with_capacity(lambda.len());
    let result = sum_over_horizontal_strips(lambda, strip, 0, &mut inner, &rest);

    KOSTKA_CACHE.with(|c| c.borrow_mut().insert(key, result));
    result
}

/// Sums `K(nu, rest)` over the partitions `nu` such that `lambda / nu` is a horizontal strip of
/// size `remaining`, the first `row` parts of `nu` being fixed in `inner`.
fn sum_over_horizontal_strips(
    lambda: &Partition,
    remaining: usize,
    row: usize,
    inner: &mut Vec<usize>,
    rest: &Partition,
) -> u64 {
    if row == lambda.len() {
        if remaining != 0 {
            return 0;
        }
        return kostka_number(&Partition::new(inner), rest);
    }
    let top = lambda.part(row);
    let bottom = lambda.part(row + 1);
    let mut total = 0;
    for removed in 0..=std::cmp::min(remaining, top - bottom) {
        inner.push(top - removed);
        total += sum_over_horizontal_strips(lambda, remaining - removed, row + 1, inner, rest);
        inner.pop();
    }
    total
}

/// A finite sum `sum c_lambda s_lambda` of Schur functions with integer coefficients.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchurExpansion {
    terms: BTreeMap<Partition, i64>,
}

impl SchurExpansion {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn add_term(&mut self, lambda: Partition, c: i64) {
        if c == 0 {
            return;
        }
        let entry = self.terms.entry(lambda).or_insert(0);
        *entry += c;
        if *entry == 0 {
            self.terms.retain(|_, c| *c != 0);
        }
    }

    pub fn from_terms(terms: impl IntoIterator<Item = (Partition, i64)>) -> Self {
        let mut result = Self::zero();
        for (lambda, c) in terms {
            result.add_term(lambda, c);
        }
        result
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn coefficient(&self, lambda: &Partition) -> i64 {
        self.terms.get(lambda).copied().unwrap_or(0)
    }

    /// The terms in increasing order of partitions.
    pub fn terms(&self) -> impl Iterator<Item = (&Partition, i64)> + '_ {
        self.terms.iter().map(|(l, &c)| (l, c))
    }

    /// Converts `sum c_nu m_nu` to the Schur basis.
    pub fn from_monomial_coefficients(coefficients: impl IntoIterator<Item = (Partition, i64)>) -> Self {
        Self::monomial_to_schur(coefficients, None)
    }

    /// The Schur expansion of a symmetric function given by its coefficients in the monomial
    /// basis, keeping only the partitions with at most `max_length` parts.
    ///
    /// `s_lambda` only involves `m_nu` for `nu` dominated by `lambda`, and such `nu` are at
    /// least as long as `lambda`. So the terms of length at most `max_length` only depend on the
    /// monomial coefficients of length at most `max_length`.
    fn monomial_to_schur(
        coefficients: impl IntoIterator<Item = (Partition, i64)>,
        max_length: Option<usize>,
    ) -> Self {
        let fits = |nu: &Partition| max_length.map_or(true, |l| nu.len() <= l);
        let mut remaining: BTreeMap<Partition, i64> = BTreeMap::new();
        for (nu, c) in coefficients {
            if c != 0 && fits(&nu) {
                *remaining.entry(nu).or_insert(0) += c;
            }
        }
        remaining.retain(|_, c| *c != 0);

        let mut result = Self::zero();
        // The lexicographically largest partition is maximal for dominance.
        while let Some((lambda, c)) = remaining.pop_last() {
            let n = lambda.size();
            for nu in partitions_with_max_length(n, max_length.unwrap_or(n)) {
                if nu >= lambda || !lambda.dominates(&nu) {
                    continue;
                }
                let k = kostka_number(&lambda, &nu) as i64;
                if k == 0 {
                    continue;
                }
                let entry = remaining.entry(nu.clone()).or_insert(0);
                *entry -= c * k;
                if *entry == 0 {
                    remaining.remove(&nu);
                }
            }
            result.add_term(lambda, c);
        }
        result
    }

    /// The Schur expansion of a multigraded Hilbert series in `r` variables, keeping only the
    /// partitions with at most `r` parts.
    ///
    /// The series must be symmetric. It is given by its dimensions in each multidegree. Only
    /// the weakly decreasing multidegrees are read, as they are the coefficients in the
    /// monomial basis.
    pub fn from_hilbert_dimensions<'a>(
        dimensions: impl IntoIterator<Item = (&'a [usize], usize)>,
        r: usize,
    ) -> Self {
        let coefficients = dimensions.into_iter().filter_map(|(degree, dim)| {
            let nu = Partition::try_from(degree.to_vec()).ok()?;
            Some((nu, dim as i64))
        });
        Self::monomial_to_schur(coefficients, Some(r))
    }

    /// Keeps the terms whose partitions have at most `length` parts.
    pub fn restrict_partition_lengths(&self, length: usize) -> Self {
        Self {
            terms: self
                .terms
                .iter()
                .filter(|(l, _)| l.len() <= length)
                .map(|(l, &c)| (l.clone(), c))
                .collect(),
        }
    }

    /// Keeps the terms `s_lambda` with `|lambda| < d`.
    pub fn truncate(&self, d: usize) -> Self {
        Self {
            terms: self
                .terms
                .iter()
                .filter(|(l, _)| l.size() < d)
                .map(|(l, &c)| (l.clone(), c))
                .collect(),
        }
    }
}

/// Writes `sum c_i x_i`, omitting unit coefficients.
fn write_sum<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    terms: impl Iterator<Item = (T, i64)>,
) -> fmt::Result {
    let mut empty = true;
    for (x, c) in terms {
        match (empty, c < 0) {
            (true, true) => write!(f, "-")?,
            (true, false) => (),
            (false, true) => write!(f, " - ")?,
            (false, false) => write!(f, " + ")?,
        }
        empty = false;
        if c.unsigned_abs() != 1 {
            write!(f, "{}*", c.unsigned_abs())?;
        }
        write!(f, "{x}")?;
    }
    if empty {
        write!(f, "0")?;
    }
    Ok(())
}

impl fmt::Display for SchurExpansion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_sum(f, self.terms().map(|(l, c)| (format!("s{l}"), c)))
    }
}

/// A sum `sum c s_lambda # s_mu` in the tensor square of the ring of symmetric functions. The
/// left factor is a `GL_r` character and the right one an `S_n` character.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bicharacter {
    terms: BTreeMap<(Partition, Partition), i64>,
}

impl Bicharacter {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn coefficient(&self, lambda: &Partition, mu: &Partition) -> i64 {
        self.terms
            .get(&(lambda.clone(), mu.clone()))
            .copied()
            .unwrap_or(0)
    }

    pub fn terms(&self) -> impl Iterator<Item = (&Partition, &Partition, i64)> + '_ {
        self.terms.iter().map(|((l, m), &c)| (l, m, c))
    }

    /// Adds `f # s_mu`.
    pub fn add_tensor(&mut self, f: &SchurExpansion, mu: &Partition) {
        for (lambda, c) in f.terms() {
            let entry = self.terms.entry((lambda.clone(), mu.clone())).or_insert(0);
            *entry += c;
        }
        self.terms.retain(|_, c| *c != 0);
    }

    /// The coefficient of `s_mu` on the right, as a `GL_r` character.
    pub fn right_coefficient(&self, mu: &Partition) -> SchurExpansion {
        SchurExpansion::from_terms(
            self.terms()
                .filter(|(_, m, _)| *m == mu)
                .map(|(l, _, c)| (l.clone(), c)),
        )
    }

    /// Keeps the terms `s_lambda # s_mu` with `|lambda| < d` and `|mu| < d`.
    pub fn bitruncate(&self, d: usize) -> Self {
        Self {
            terms: self
                .terms
                .iter()
                .filter(|((l, m), _)| l.size() < d && m.size() < d)
                .map(|(k, &c)| (k.clone(), c))
                .collect(),
        }
    }
}

impl fmt::Display for Bicharacter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_sum(f, self.terms().map(|(l, m, c)| (format!("s{l} # s{m}"), c)))
    }
}
