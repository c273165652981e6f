//! Young idempotents, antisymmetric normal forms and higher Specht polynomials.
//!
//! Polynomials in this module live in `r` rows of `n` variables, variable `j + n * i` being the
//! `j`th variable of row `i`. The symmetric group `S_n` permutes the columns. When `r = 1` this is
//! the usual action on `n` variables.

use std::{cmp::Ordering, fmt, str::FromStr, sync::Arc};

use algebra::{
    combinatorics::{partitions_with_max_length, standard_tableaux, Partition, StandardTableau},
    polynomial::{Monomial, Polynomial},
    symmetric::{monomial_symmetric, power_sum},
};
use anyhow::anyhow;
use fp::prime::ValidPrime;
use parking_lot::Mutex;
use rustc_hash::FxHashMap as HashMap;

use crate::closure::{annihilator_basis, Operator};

/// Applies the Young idempotent of `t` to `p`, where `p` has `r` rows of `t.size()` variables.
///
/// This symmetrizes along the row stabilizer of `t` and then antisymmetrizes along its column
/// stabilizer, the cell containing `i` standing for the `i - 1`th column of variables. With
/// `use_antisymmetry`, the antisymmetrization is replaced by taking the antisymmetric normal
/// form, which is cheaper and represents the same element.
///
/// The result is not normalized.
pub fn apply_young_idempotent(p: &Polynomial, t: &StandardTableau, use_antisymmetry: bool) -> Polynomial {
    let n = t.size();
    if n == 0 {
        return p.clone();
    }
    let mut symmetrized = Polynomial::zero(p.prime(), p.nvars());
    for sigma in t.row_stabilizer() {
        symmetrized.add(&p.act(&sigma, n), 1);
    }

    if use_antisymmetry {
        return antisymmetric_normal(
            &symmetrized,
            n,
            p.nvars() / n,
            &antisymmetries_of_tableau(t),
        );
    }

    let prime = p.prime();
    let mut result = Polynomial::zero(prime, p.nvars());
    for sigma in t.column_stabilizer() {
        result.add(&symmetrized.act(&sigma, n), prime.from_i64(sigma.sign() as i64));
    }
    result
}

/// The columns of `t`, with entries shifted to be 0-based.
pub fn antisymmetries_of_tableau(t: &StandardTableau) -> Vec<Vec<usize>> {
    t.conjugate()
        .rows()
        .iter()
        .map(|column| column.iter().map(|x| x - 1).collect())
        .collect()
}

/// Swaps the columns `i1` and `i2` of `exponents`, seen as an `r x n` array.
///
/// # Example
/// ```
/// # use harmonics::young::diagonal_swap;
/// let mut e = [1, 2, 3, 4, 5, 6, 7, 8];
/// diagonal_swap(&mut e, 4, 2, 1, 3);
/// assert_eq!(e, [1, 4, 3, 2, 5, 8, 7, 6]);
/// ```
pub fn diagonal_swap(exponents: &mut [u32], n: usize, r: usize, i1: usize, i2: usize) {
    for i in 0..r {
        exponents.swap(i * n + i1, i * n + i2);
    }
}

/// Compares the columns `i1` and `i2` of `exponents`, seen as an `r x n` array,
/// lexicographically from the first row down.
pub fn diagonal_cmp(exponents: &[u32], n: usize, r: usize, i1: usize, i2: usize) -> Ordering {
    (0..r)
        .map(|i| exponents[i * n + i1].cmp(&exponents[i * n + i2]))
        .find(|c| c.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Sorts the columns of `exponents` decreasingly within each group of `positions`, where the
/// order is relative to the order of the positions. Returns the sorted exponents and the sign of
/// the sorting permutation, or `None` if two columns in a group coincide.
pub fn diagonal_antisort(
    exponents: &[u32],
    n: usize,
    r: usize,
    positions: &[Vec<usize>],
) -> Option<(Vec<u32>, i32)> {
    let mut exponents = exponents.to_vec();
    let mut sign = 1;
    for group in positions {
        for i in 1..group.len() {
            for j in (0..i).rev() {
                match diagonal_cmp(&exponents, n, r, group[j], group[j + 1]) {
                    Ordering::Equal => return None,
                    Ordering::Less => {
                        diagonal_swap(&mut exponents, n, r, group[j], group[j + 1]);
                        sign = -sign;
                    }
                    Ordering::Greater => (),
                }
            }
        }
    }
    Some((exponents, sign))
}

/// The canonical representative of `p` modulo the relations making `p` antisymmetric in each
/// group of columns of `positions`. Each monomial is replaced by its antisorted version, signed,
/// and monomials with two equal columns in a group vanish.
pub fn antisymmetric_normal(p: &Polynomial, n: usize, r: usize, positions: &[Vec<usize>]) -> Polynomial {
    let prime = p.prime();
    let mut result = Polynomial::zero(prime, p.nvars());
    for (m, c) in p.terms() {
        if let Some((exponents, sign)) = diagonal_antisort(m.exponents(), n, r, positions) {
            let c = if sign < 0 { prime.negate(c) } else { c };
            result.add_term(Monomial::new(exponents), c);
        }
    }
    result
}

/// The three families of higher Specht polynomials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpechtMode {
    /// A basis of the coinvariants compatible with the action of `S_n`.
    Plain,
    /// The harmonic representative of the plain polynomial.
    Harmonic,
    /// The plain polynomial of the conjugate tableaux applied as a differential operator on the
    /// Vandermonde determinant.
    Dual,
}

impl FromStr for SpechtMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim() {
            "plain" | "" => Ok(Self::Plain),
            "harmonic" => Ok(Self::Harmonic),
            "dual" => Ok(Self::Dual),
            _ => Err(anyhow!("Unknown mode '{s}', expected plain, harmonic or dual")),
        }
    }
}

impl fmt::Display for SpechtMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Plain => "plain",
            Self::Harmonic => "harmonic",
            Self::Dual => "dual",
        };
        f.write_str(s)
    }
}

type SpechtKey = (StandardTableau, StandardTableau, SpechtMode, bool);

/// Computes higher Specht polynomials in `n` variables, `n` being the size of the tableaux, and
/// remembers them.
pub struct HigherSpecht {
    p: ValidPrime,
    cache: Mutex<HashMap<SpechtKey, Polynomial>>,
}

impl HigherSpecht {
    pub fn new(p: ValidPrime) -> Self {
        Self {
            p,
            cache: Mutex::new(HashMap::default()),
        }
    }

    pub fn prime(&self) -> ValidPrime {
        self.p
    }

    /// The higher Specht polynomial `H_{P, Q}`. `Q` defaults to the initial tableau of the shape
    /// of `P`.
    ///
    /// For a fixed `P`, the polynomials `H_{P, Q}` span an irreducible `S_n`-module of the shape of
    /// `P`, and the family of all `H_{P, Q}` is a basis of the coinvariants. When `P` is the initial
    /// tableau, `H_{P, Q}` is a usual Specht polynomial.
    ///
    /// # Panics
    /// If `Q` does not have the shape of `P`.
    pub fn higher_specht(
        &self,
        p: &StandardTableau,
        q: Option<&StandardTableau>,
        mode: SpechtMode,
        use_antisymmetry: bool,
    ) -> Polynomial {
        let q = q.cloned().unwrap_or_else(|| p.shape().initial_tableau());
        assert_eq!(p.shape(), q.shape(), "{p:?} and {q:?} have different shapes");

        let key = (p.clone(), q, mode, use_antisymmetry);
        if let Some(result) = self.cache.lock().get(&key) {
            return result.clone();
        }
        let (p, q, ..) = &key;
        let result = match mode {
            SpechtMode::Plain => self.plain(p, q, use_antisymmetry),
            SpechtMode::Harmonic => self.harmonic(p, q, use_antisymmetry),
            SpechtMode::Dual => self.dual(p, q),
        };
        self.cache.lock().insert(key, result.clone());
        result
    }

    fn plain(&self, p: &StandardTableau, q: &StandardTableau, use_antisymmetry: bool) -> Polynomial {
        let n = p.size();
        let mut exponents = vec![0; n];
        for (d, i) in p.index_filling().iter().flatten().zip(q.entries()) {
            exponents[i - 1] = *d as u32;
        }
        let m = Polynomial::monomial(self.p, Monomial::new(exponents), 1);
        apply_young_idempotent(&m, q, use_antisymmetry)
    }

    /// The unique harmonic polynomial in the span of the plain polynomial of `(P, Q)` and the
    /// products of plain polynomials of lower cocharge with monomial symmetric functions.
    fn harmonic(&self, p: &StandardTableau, q: &StandardTableau, use_antisymmetry: bool) -> Polynomial {
        let n = p.size();
        let d = p.cocharge();

        let mut basis = vec![self.higher_specht(p, Some(q), SpechtMode::Plain, use_antisymmetry)];
        for p2 in standard_tableaux(&p.shape()) {
            let d2 = p2.cocharge();
            if d2 >= d {
                continue;
            }
            let h = self.higher_specht(&p2, Some(q), SpechtMode::Plain, use_antisymmetry);
            for nu in partitions_with_max_length(d - d2, n) {
                basis.push(h.mul(&monomial_symmetric(self.p, &nu, n)));
            }
        }

        let antisymmetries = antisymmetries_of_tableau(q);
        let normalize = |f: Polynomial| {
            if use_antisymmetry {
                antisymmetric_normal(&f, n, 1, &antisymmetries)
            } else {
                f
            }
        };
        let basis: Vec<Polynomial> = basis.into_iter().map(normalize).collect();
        let operators: Vec<Polynomial> = (1..=n as u32).map(|k| power_sum(self.p, k, n)).collect();

        let mut ann = annihilator_basis(&basis, &operators, |e, f| normalize(e.polynomial_derivative(f)));
        assert_eq!(
            ann.len(),
            1,
            "harmonic projection of {p:?}, {q:?} is not one dimensional"
        );
        tracing::trace!(?p, ?q, candidates = basis.len(), "harmonic higher Specht");
        ann.swap_remove(0)
    }

    fn dual(&self, p: &StandardTableau, q: &StandardTableau) -> Polynomial {
        let n = p.size();
        let h = self.higher_specht(&p.conjugate(), Some(&q.conjugate()), SpechtMode::Plain, false);
        let vandermonde = Partition::new(&vec![1; n]).initial_tableau();
        let vandermonde = self.higher_specht(&vandermonde, None, SpechtMode::Plain, false);
        h.polynomial_derivative(&vandermonde)
    }
}

impl fmt::Debug for HigherSpecht {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HigherSpecht")
            .field("p", &self.p)
            .field("cached", &self.cache.lock().len())
            .finish()
    }
}

/// The operator `f ↦ e_mu(∂f/∂x_var)`, where `e_mu` is the Young idempotent of the initial tableau
/// of `mu`.
pub fn deriv_comp_young(var: usize, mu: &Partition) -> Operator<Polynomial> {
    let t = mu.initial_tableau();
    Arc::new(move |f: &Polynomial| apply_young_idempotent(&f.derivative(var, 1), &t, false))
}

/// The operator `f ↦ e_mu(sum_i x_i ∂^k f/∂x_i^k)`, the sum running over `vars`.
pub fn deriv_comp_young_power(vars: Vec<usize>, k: u32, mu: &Partition) -> Operator<Polynomial> {
    let t = mu.initial_tableau();
    Arc::new(move |f: &Polynomial| {
        let mut g = Polynomial::zero(f.prime(), f.nvars());
        for &i in &vars {
            let x = Polynomial::variable(f.prime(), f.nvars(), i);
            g.add(&x.mul(&f.derivative(i, k)), 1);
        }
        apply_young_idempotent(&g, &t, false)
    })
}

#[cfg(test)]
mod tests {
    use algebra::polynomial::PolynomialRing;
    use expect_test::expect;
    use fp::prime::DEFAULT_PRIME;
    use rstest::rstest;

    use super::*;

    fn xyz() -> PolynomialRing {
        PolynomialRing::new(DEFAULT_PRIME, ["x", "y", "z"])
    }

    fn diagonal_ring(n: usize, r: usize) -> PolynomialRing {
        PolynomialRing::new(
            DEFAULT_PRIME,
            (0..r).flat_map(|i| (0..n).map(move |j| format!("x{i}{j}"))),
        )
    }

    fn tableau(s: &str) -> StandardTableau {
        StandardTableau::try_from(s).unwrap()
    }

    #[rstest]
    #[case("x^2*y", "1/2/3", "x^2*y - x*y^2 - x^2*z + y^2*z + x*z^2 - y*z^2")]
    #[case("x^2*y", "1 2 3", "x^2*y + x*y^2 + x^2*z + y^2*z + x*z^2 + y*z^2")]
    #[case("x*y^3", "1 2/3", "x^3*y + x*y^3 - y^3*z - y*z^3")]
    #[case("x*y*z^2", "1 2/3", "-2*x^2*y*z + 2*x*y*z^2")]
    fn young_idempotent(#[case] p: &str, #[case] t: &str, #[case] expected: &str) {
        let ring = xyz();
        let p = ring.parse(p).unwrap();
        let result = apply_young_idempotent(&p, &tableau(t), false);
        assert_eq!(ring.element_to_string(&result), expected);
    }

    #[test]
    fn swap_and_compare() {
        let mut e = [1, 2, 3, 4, 5, 6, 7, 8];
        diagonal_swap(&mut e, 2, 4, 0, 1);
        assert_eq!(e, [2, 1, 4, 3, 6, 5, 8, 7]);

        let e = [1, 1, 2, 2, 0, 1, 1, 0];
        assert_eq!(diagonal_cmp(&e, 4, 2, 0, 1), Ordering::Less);
        assert_eq!(diagonal_cmp(&e, 4, 2, 1, 0), Ordering::Greater);
        assert_eq!(diagonal_cmp(&e, 4, 2, 2, 3), Ordering::Greater);
        assert_eq!(diagonal_cmp(&e, 4, 2, 3, 3), Ordering::Equal);
    }

    #[rstest]
    #[case(&[2, 1], 2, 1, vec![vec![0, 1]], Some((vec![2, 1], 1)))]
    #[case(&[1, 2], 2, 1, vec![vec![0, 1]], Some((vec![2, 1], -1)))]
    #[case(&[2, 2], 2, 1, vec![vec![0, 1]], None)]
    #[case(&[1, 2, 3, 4], 2, 2, vec![vec![0, 1]], Some((vec![2, 1, 4, 3], -1)))]
    #[case(&[1, 2, 4, 3], 2, 2, vec![vec![0, 1]], Some((vec![2, 1, 3, 4], -1)))]
    #[case(&[1, 2, 3], 3, 1, vec![vec![0, 1, 2]], Some((vec![3, 2, 1], -1)))]
    #[case(&[1, 3, 2], 3, 1, vec![vec![0, 1, 2]], Some((vec![3, 2, 1], 1)))]
    #[case(&[1, 2, 3, 4, 5, 6], 6, 1, vec![vec![0, 2, 4]], Some((vec![5, 2, 3, 4, 1, 6], -1)))]
    #[case(&[1, 2, 3], 3, 1, vec![vec![2, 1, 0]], Some((vec![1, 2, 3], 1)))]
    #[case(&[3, 2, 1], 3, 1, vec![vec![2, 1, 0]], Some((vec![1, 2, 3], -1)))]
    #[case(&[1, 2, 3, 4, 5, 6], 6, 1, vec![vec![0, 2, 4], vec![1, 3, 5]], Some((vec![5, 6, 3, 4, 1, 2], 1)))]
    fn antisort(
        #[case] exponents: &[u32],
        #[case] n: usize,
        #[case] r: usize,
        #[case] positions: Vec<Vec<usize>>,
        #[case] expected: Option<(Vec<u32>, i32)>,
    ) {
        assert_eq!(diagonal_antisort(exponents, n, r, &positions), expected);
    }

    #[rstest]
    #[case(vec![vec![0, 1, 2, 3]], "-2*x00^2*x01*x11^3*x12")]
    #[case(vec![vec![0, 1]], "2*x00*x03^2*x10^3*x11")]
    #[case(vec![vec![0, 3]], "-2*x00^2*x03*x11*x13^3 - x10")]
    fn normal_form(#[case] positions: Vec<Vec<usize>>, #[case] expected: &str) {
        let ring = diagonal_ring(4, 2);
        let p = ring
            .parse("2 * x00*x03^2*x11*x10^3 + x13 + 3")
            .unwrap();
        let result = antisymmetric_normal(&p, 4, 2, &positions);
        assert_eq!(ring.element_to_string(&result), expected);
    }

    #[test]
    fn normal_form_with_collision() {
        let ring = diagonal_ring(3, 3);
        let p = ring
            .parse("-2*x10*x11*x20 - 2*x10^2*x21 + 2*x10*x11*x21")
            .unwrap();
        let result = antisymmetric_normal(&p, 3, 3, &[vec![0, 1, 2]]);
        assert_eq!(ring.element_to_string(&result), "-4*x10*x11*x20 - 2*x10^2*x21");
    }

    #[test]
    fn plain_specht() {
        let ring = xyz();
        let h = HigherSpecht::new(DEFAULT_PRIME);
        let mut out = String::new();
        for (p, q) in [
            ("1 2 3", "1 2 3"),
            ("1 3/2", "1 3/2"),
            ("1 3/2", "1 2/3"),
            ("1 2/3", "1 3/2"),
            ("1 2/3", "1 2/3"),
            ("1/2/3", "1/2/3"),
        ] {
            let f = h.higher_specht(&tableau(p), Some(&tableau(q)), SpechtMode::Plain, false);
            out.push_str(&format!("{p} | {q}: {}\n", ring.element_to_string(&f)));
        }
        expect![[r#"
            1 2 3 | 1 2 3: 6
            1 3/2 | 1 3/2: -x*z + y*z
            1 3/2 | 1 2/3: -x*y + y*z
            1 2/3 | 1 3/2: -2*x + 2*y
            1 2/3 | 1 2/3: -2*x + 2*z
            1/2/3 | 1/2/3: -x^2*y + x*y^2 + x^2*z - y^2*z - x*z^2 + y*z^2
        "#]]
        .assert_eq(&out);
    }

    #[test]
    fn default_second_tableau() {
        let h = HigherSpecht::new(DEFAULT_PRIME);
        let p = tableau("1 3/2");
        assert_eq!(
            h.higher_specht(&p, None, SpechtMode::Plain, false),
            h.higher_specht(&p, Some(&tableau("1 2/3")), SpechtMode::Plain, false)
        );
    }

    #[test]
    fn harmonic_specht() {
        let ring = xyz();
        let h = HigherSpecht::new(DEFAULT_PRIME);
        let p = tableau("1 3/2");
        let f = h.higher_specht(&p, Some(&p), SpechtMode::Harmonic, false);
        assert_eq!(
            ring.element_to_string(&f),
            "1/3*x^2 - 1/3*y^2 - 2/3*x*z + 2/3*y*z"
        );

        let t = tableau("1 2/3");
        assert_eq!(
            h.higher_specht(&t, None, SpechtMode::Harmonic, false),
            h.higher_specht(&t, None, SpechtMode::Plain, false)
        );
    }

    #[test]
    fn harmonic_is_annihilated_by_power_sums() {
        let h = HigherSpecht::new(DEFAULT_PRIME);
        for t in standard_tableaux(&Partition::new(&[2, 2])) {
            let f = h.higher_specht(&t, None, SpechtMode::Harmonic, false);
            assert!(!f.is_zero());
            for k in 1..=4 {
                assert!(power_sum(DEFAULT_PRIME, k, 4).polynomial_derivative(&f).is_zero());
            }
        }
    }

    #[test]
    fn dual_specht() {
        let ring = xyz();
        let h = HigherSpecht::new(DEFAULT_PRIME);
        let f = h.higher_specht(&tableau("1 2 3"), None, SpechtMode::Dual, false);
        assert_eq!(ring.element_to_string(&f), "12");
        let f = h.higher_specht(&tableau("1/2/3"), None, SpechtMode::Dual, false);
        assert_eq!(
            ring.element_to_string(&f),
            "-6*x^2*y + 6*x*y^2 + 6*x^2*z - 6*y^2*z - 6*x*z^2 + 6*y*z^2"
        );
    }

    #[test]
    fn derivative_then_young() {
        let ring = xyz();
        let op = deriv_comp_young(0, &Partition::new(&[3]));
        let p = ring.parse("x^2*y").unwrap();
        assert_eq!(ring.element_to_string(&op(&p)), "4*x*y + 4*x*z + 4*y*z");

        let op = deriv_comp_young_power(vec![0, 1, 2], 1, &Partition::new(&[1, 1, 1]));
        let vandermonde = HigherSpecht::new(DEFAULT_PRIME).higher_specht(
            &tableau("1/2/3"),
            None,
            SpechtMode::Plain,
            false,
        );
        let mut expected = vandermonde.clone();
        expected.scale(DEFAULT_PRIME.from_i64(3 * 6));
        assert_eq!(op(&vandermonde), expected);
    }

    #[rstest]
    fn empty_tableau(
        #[values(SpechtMode::Plain, SpechtMode::Harmonic, SpechtMode::Dual)] mode: SpechtMode,
        #[values(false, true)] use_antisymmetry: bool,
    ) {
        let h = HigherSpecht::new(DEFAULT_PRIME);
        let t = Partition::empty().initial_tableau();
        let one = Polynomial::constant(DEFAULT_PRIME, 0, 1);
        assert_eq!(h.higher_specht(&t, None, mode, use_antisymmetry), one);
        assert_eq!(apply_young_idempotent(&one, &t, use_antisymmetry), one);
    }

    #[test]
    fn mode_from_str() {
        assert_eq!("dual".parse::<SpechtMode>().unwrap(), SpechtMode::Dual);
        assert_eq!("harmonic".parse::<SpechtMode>().unwrap().to_string(), "harmonic");
        assert!("antiharmonic".parse::<SpechtMode>().is_err());
    }
}
