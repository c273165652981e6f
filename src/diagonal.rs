//! Polynomials in `r` rows of `n` variables, with `S_n` permuting the columns and `GL_r` acting on
//! the rows, and the spaces of diagonally harmonic polynomials they contain.

use std::{collections::BTreeMap, fmt, sync::Arc};

use algebra::{
    combinatorics::{partitions, standard_tableaux, Partition, Permutation, StandardTableau},
    polynomial::{Polynomial, PolynomialRing},
    symmetric::{Bicharacter, SchurExpansion},
};
use fp::prime::ValidPrime;
use parking_lot::Mutex;
use rustc_hash::FxHashMap as HashMap;

use crate::{
    closure::{annihilator_basis, GradedSubspace, Operator},
    grading::{add_degree, add_degree_symmetric, Degree},
    young::{antisymmetries_of_tableau, antisymmetric_normal, HigherSpecht, SpechtMode},
};

/// Which polarization operators to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Only the operators moving degree from a row to a later row.
    Down,
    /// Every pair of distinct rows.
    Both,
}

/// Shortcuts for computing harmonic spaces. None of them changes the resulting character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HarmonicOptions {
    /// Only compute the subspaces whose multidegree is weakly decreasing, moving every image back
    /// there by permuting the rows.
    pub use_symmetry: bool,
    /// Store polynomials in antisymmetric normal form with respect to the columns of the shape.
    pub use_antisymmetry: bool,
    /// Only compute the `GL_r` highest weight vectors. Implies `use_symmetry`.
    pub use_lie: bool,
}

impl HarmonicOptions {
    pub fn all() -> Self {
        Self {
            use_symmetry: true,
            use_antisymmetry: true,
            use_lie: true,
        }
    }
}

pub type HarmonicSpace = GradedSubspace<Degree, Polynomial>;

/// `∑_j x_{i2, j} ∂^d/∂x_{i1, j}^d p`, see [`DiagonalPolynomialRing::polarization`].
#[allow(clippy::too_many_arguments)]
fn polarize(
    p: &Polynomial,
    n: usize,
    r: usize,
    i1: usize,
    i2: usize,
    d: u32,
    use_symmetry: bool,
    antisymmetries: Option<&[Vec<usize>]>,
) -> Polynomial {
    let prime = p.prime();
    let mut result = Polynomial::zero(prime, p.nvars());
    for j in 0..n {
        let x = Polynomial::variable(prime, p.nvars(), i2 * n + j);
        result.add(&x.mul(&p.derivative(i1 * n + j, d)), 1);
    }
    if result.is_zero() {
        return result;
    }
    if use_symmetry {
        if let Some(degree) = multidegree(&result, n, r) {
            if !degree.is_weakly_decreasing() {
                let s = Permutation::reverse_sorting_permutation(degree.entries());
                result = result.permute_variables(row_permutation(&s.inverse(), n).images());
            }
        }
    }
    if let Some(antisymmetries) = antisymmetries {
        result = antisymmetric_normal(&result, n, r, antisymmetries);
    }
    result
}

fn multidegree(p: &Polynomial, n: usize, r: usize) -> Option<Degree> {
    let (m, _) = p.terms().next_back()?;
    let e = m.exponents();
    Some(Degree::new(
        (0..r)
            .map(|i| e[i * n..(i + 1) * n].iter().sum::<u32>() as i32)
            .collect(),
    ))
}

fn row_permutation(sigma: &Permutation, n: usize) -> Permutation {
    let r = sigma.len();
    let cycles: Vec<Vec<usize>> = sigma
        .cycle_tuples()
        .iter()
        .flat_map(|c| (0..n).map(move |j| c.iter().map(|&i| i * n + j).collect()))
        .collect();
    Permutation::from_cycles(n * r, &cycles)
}

/// The polynomial ring in the variables `x_{i, j}` for `0 <= i < r` and `0 <= j < n`, printed
/// `x{i}{j}`. Variable `x_{i, j}` has index `i * n + j`.
///
/// Harmonic spaces are remembered, so clones of a ring share them.
#[derive(Clone)]
pub struct DiagonalPolynomialRing {
    n: usize,
    r: usize,
    ring: PolynomialRing,
    specht: Arc<HigherSpecht>,
    spaces: Arc<Mutex<HashMap<(Partition, HarmonicOptions), Arc<HarmonicSpace>>>>,
}

impl DiagonalPolynomialRing {
    pub fn new(p: ValidPrime, n: usize, r: usize) -> Self {
        let names = (0..r).flat_map(|i| (0..n).map(move |j| format!("x{i}{j}")));
        Self {
            n,
            r,
            ring: PolynomialRing::new(p, names),
            specht: Arc::new(HigherSpecht::new(p)),
            spaces: Arc::default(),
        }
    }

    pub fn prime(&self) -> ValidPrime {
        self.ring.prime()
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn r(&self) -> usize {
        self.r
    }

    /// The underlying polynomial ring, for parsing and printing.
    pub fn ring(&self) -> &PolynomialRing {
        &self.ring
    }

    pub fn gen(&self, i: usize, j: usize) -> Polynomial {
        self.ring.gen(i * self.n + j)
    }

    /// The variables as an `r x n` matrix.
    pub fn algebra_generators(&self) -> Vec<Vec<Polynomial>> {
        (0..self.r)
            .map(|i| (0..self.n).map(|j| self.gen(i, j)).collect())
            .collect()
    }

    pub fn element_to_string(&self, p: &Polynomial) -> String {
        self.ring.element_to_string(p)
    }

    /// The degrees of a multihomogeneous polynomial in each row, or `None` for zero.
    ///
    /// # Example
    /// ```
    /// # use harmonics::diagonal::DiagonalPolynomialRing;
    /// let ring = DiagonalPolynomialRing::new(fp::prime::DEFAULT_PRIME, 3, 2);
    /// let p = ring.ring().parse("x00*x01^2*x10^2*x11^3").unwrap();
    /// assert_eq!(ring.multidegree(&p).unwrap().to_string(), "(3, 5)");
    /// assert_eq!(ring.multidegree(&ring.ring().zero()), None);
    /// ```
    pub fn multidegree(&self, p: &Polynomial) -> Option<Degree> {
        multidegree(p, self.n, self.r)
    }

    /// The permutation of the variables induced by the permutation `sigma` of the rows.
    ///
    /// # Example
    /// ```
    /// # use harmonics::diagonal::DiagonalPolynomialRing;
    /// # use algebra::combinatorics::Permutation;
    /// let ring = DiagonalPolynomialRing::new(fp::prime::DEFAULT_PRIME, 3, 5);
    /// let sigma = Permutation::from_cycles(5, &[vec![0, 1, 3], vec![2, 4]]);
    /// assert_eq!(
    ///     ring.row_permutation(&sigma).cycle_notation(),
    ///     "(1,4,10)(2,5,11)(3,6,12)(7,13)(8,14)(9,15)"
    /// );
    /// ```
    pub fn row_permutation(&self, sigma: &Permutation) -> Permutation {
        assert_eq!(sigma.len(), self.r);
        row_permutation(sigma, self.n)
    }

    /// The polarization operator `∑_j x_{i2, j} ∂^d/∂x_{i1, j}^d` applied to `p`.
    ///
    /// With `use_symmetry`, a result whose multidegree is not weakly decreasing has its rows
    /// permuted so that it is. With `antisymmetries`, the result is put in antisymmetric normal
    /// form.
    pub fn polarization(
        &self,
        p: &Polynomial,
        i1: usize,
        i2: usize,
        d: u32,
        use_symmetry: bool,
        antisymmetries: Option<&[Vec<usize>]>,
    ) -> Polynomial {
        polarize(p, self.n, self.r, i1, i2, d, use_symmetry, antisymmetries)
    }

    fn polarization_operator(
        &self,
        i1: usize,
        i2: usize,
        d: u32,
        use_symmetry: bool,
        antisymmetries: Option<Vec<Vec<usize>>>,
    ) -> Operator<Polynomial> {
        let (n, r) = (self.n, self.r);
        Arc::new(move |p: &Polynomial| {
            polarize(p, n, r, i1, i2, d, use_symmetry, antisymmetries.as_deref())
        })
    }

    /// The polarization operators of differential degree `d` with `min_degree < d < n`, indexed
    /// by the degree shift they induce: `-d` on row `i1` and `+1` on row `i2`.
    pub fn polarization_operators_by_degree(
        &self,
        side: Side,
        use_symmetry: bool,
        antisymmetries: Option<&[Vec<usize>]>,
        min_degree: usize,
    ) -> BTreeMap<Degree, Vec<Operator<Polynomial>>> {
        let mut result = BTreeMap::new();
        for d in min_degree + 1..self.n {
            for i1 in 0..self.r {
                for i2 in 0..self.r {
                    let keep = match side {
                        Side::Down => i1 < i2,
                        Side::Both => i1 != i2,
                    };
                    if !keep {
                        continue;
                    }
                    let mut shift = vec![0; self.r];
                    shift[i1] = -(d as i32);
                    shift[i2] = 1;
                    let op = self.polarization_operator(
                        i1,
                        i2,
                        d as u32,
                        use_symmetry,
                        antisymmetries.map(<[_]>::to_vec),
                    );
                    result.insert(Degree::new(shift), vec![op]);
                }
            }
        }
        result
    }

    /// The higher Specht polynomial of `(P, Q)` in the first row of variables.
    pub fn higher_specht(
        &self,
        p: &StandardTableau,
        q: Option<&StandardTableau>,
        mode: SpechtMode,
        use_antisymmetry: bool,
    ) -> Polynomial {
        assert_eq!(p.size(), self.n);
        self.specht
            .higher_specht(p, q, mode, use_antisymmetry)
            .embed(self.n * self.r)
    }

    /// The `mu`-isotypic component of the diagonally harmonic polynomials, or rather its
    /// intersection with the polynomials antisymmetric in the columns of the initial tableau of
    /// `mu`. It is the closure of the harmonic higher Specht polynomials of shape `mu` under
    /// polarization.
    pub fn harmonic_space_by_shape(
        &self,
        mu: &Partition,
        options: HarmonicOptions,
    ) -> Arc<HarmonicSpace> {
        let key = (mu.clone(), options);
        if let Some(space) = self.spaces.lock().get(&key) {
            return Arc::clone(space);
        }
        let space = Arc::new(self.build_harmonic_space(mu, options));
        Arc::clone(self.spaces.lock().entry(key).or_insert(space))
    }

    fn build_harmonic_space(&self, mu: &Partition, options: HarmonicOptions) -> HarmonicSpace {
        let r = self.r;
        let mut generators: BTreeMap<Degree, Vec<Polynomial>> = BTreeMap::new();
        for t in standard_tableaux(mu) {
            let p = self.higher_specht(&t, None, SpechtMode::Harmonic, options.use_antisymmetry);
            let mut d = vec![0; r];
            d[0] = p.degree().unwrap_or(0) as i32;
            generators.entry(Degree::new(d)).or_default().push(p);
        }

        let antisymmetries = options
            .use_antisymmetry
            .then(|| antisymmetries_of_tableau(&mu.initial_tableau()));
        let use_symmetry = options.use_symmetry || options.use_lie;

        let mut operators = self.polarization_operators_by_degree(
            Side::Down,
            use_symmetry,
            antisymmetries.as_deref(),
            usize::from(options.use_lie),
        );
        if options.use_lie {
            let (n, r) = (self.n, self.r);
            let lie = (0..r.saturating_sub(1))
                .map(|i| {
                    let antisymmetries = antisymmetries.clone();
                    Arc::new(move |v: &Polynomial| {
                        let a = antisymmetries.as_deref();
                        let up = polarize(v, n, r, i + 1, i, 1, false, a);
                        polarize(&up, n, r, i, i + 1, 1, false, a)
                    }) as Operator<Polynomial>
                })
                .collect();
            operators.insert(Degree::zero(r), lie);
        }

        tracing::debug!(
            %mu,
            generators = generators.values().map(Vec::len).sum::<usize>(),
            operators = operators.values().map(Vec::len).sum::<usize>(),
            "building harmonic space"
        );
        if use_symmetry {
            GradedSubspace::new(self.prime(), generators, operators, add_degree_symmetric)
        } else {
            GradedSubspace::new(self.prime(), generators, operators, add_degree)
        }
    }

    /// The `GL_r` character of the `mu`-isotypic component of the diagonally harmonic
    /// polynomials, restricted to partitions of length at most `r`.
    #[tracing::instrument(skip(self), fields(n = self.n, r = self.r))]
    pub fn harmonic_character(&self, mu: &Partition, options: HarmonicOptions) -> SchurExpansion {
        let space = self.harmonic_space_by_shape(mu, options);
        space.finalize();
        if !options.use_lie {
            let dimensions: Vec<(Vec<usize>, usize)> = space
                .dimensions()
                .into_iter()
                .map(|(d, dim)| (d.entries().iter().map(|&x| x as usize).collect(), dim))
                .collect();
            return SchurExpansion::from_hilbert_dimensions(
                dimensions.iter().map(|(d, dim)| (d.as_slice(), *dim)),
                self.r,
            );
        }

        // Highest weight vectors are the ones killed by every raising operator.
        let antisymmetries = options
            .use_antisymmetry
            .then(|| antisymmetries_of_tableau(&mu.initial_tableau()));
        let raising: Vec<(usize, usize)> = (1..self.r)
            .flat_map(|i1| (0..i1).map(move |i2| (i1, i2)))
            .collect();
        let mut result = SchurExpansion::zero();
        // With use_lie the degrees are weakly decreasing, hence partitions.
        for d in space.degrees() {
            let basis = space.basis(&d);
            let count = annihilator_basis(&basis, &raising, |&(i1, i2), b| {
                self.polarization(b, i1, i2, 1, false, antisymmetries.as_deref())
            })
            .len();
            if let Some(lambda) = d.to_partition() {
                result.add_term(lambda, count as i64);
            }
        }
        result
    }

    /// The `GL_r x S_n` bicharacter `∑_mu f_mu # s_mu` of the diagonally harmonic polynomials.
    pub fn harmonic_bicharacter(&self, options: HarmonicOptions) -> Bicharacter {
        let mut result = Bicharacter::zero();
        for mu in partitions(self.n) {
            let f = self.harmonic_character(&mu, options);
            tracing::info!(%mu, character = %f);
            result.add_tensor(&f, &mu);
        }
        result
    }
}

impl fmt::Display for DiagonalPolynomialRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Diagonal polynomial ring with {} rows of {} variables over GF({})",
            self.r,
            self.n,
            self.prime()
        )
    }
}

impl fmt::Debug for DiagonalPolynomialRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;
    use fp::prime::DEFAULT_PRIME;
    use rstest::rstest;

    use super::*;

    fn ring(n: usize, r: usize) -> DiagonalPolynomialRing {
        DiagonalPolynomialRing::new(DEFAULT_PRIME, n, r)
    }

    #[test]
    fn display() {
        let r = ring(5, 3);
        assert_eq!(
            r.to_string(),
            "Diagonal polynomial ring with 3 rows of 5 variables over GF(2147483647)"
        );
        let r = ring(4, 3);
        let gens: Vec<Vec<String>> = r
            .algebra_generators()
            .iter()
            .map(|row| row.iter().map(|x| r.element_to_string(x)).collect())
            .collect();
        assert_eq!(gens[2][3], "x23");
        assert_eq!(gens[1][0], "x10");
        assert_eq!(r.element_to_string(&r.gen(1, 2)), "x12");
    }

    #[rstest]
    #[case(1, 2, 2, "6*x00*x10*x11*x20")]
    #[case(1, 2, 1, "3*x00*x10^2*x11*x20 + x00*x10^3*x21")]
    #[case(1, 0, 2, "6*x00^2*x10*x11")]
    #[case(2, 0, 1, "x01")]
    fn polarization(#[case] i1: usize, #[case] i2: usize, #[case] d: u32, #[case] expected: &str) {
        let r = ring(4, 3);
        let p = r.ring().parse("x00*x10^3*x11 + x21").unwrap();
        let result = r.polarization(&p, i1, i2, d, false, None);
        assert_eq!(r.element_to_string(&result), expected);
    }

    #[test]
    fn polarization_with_symmetry() {
        let r = ring(3, 2);
        let p = r.ring().parse("x00*x01").unwrap();
        // x10*x01 + x00*x11 has degree (1, 1), which is already sorted
        let q = r.polarization(&p, 0, 1, 1, true, None);
        assert_eq!(r.element_to_string(&q), "x01*x10 + x00*x11");
        // x10 has degree (0, 1), which is moved back to the first row
        let x = r.gen(0, 0);
        assert_eq!(r.element_to_string(&r.polarization(&x, 0, 1, 1, false, None)), "x10");
        assert_eq!(r.element_to_string(&r.polarization(&x, 0, 1, 1, true, None)), "x00");
    }

    #[test]
    fn operators_by_degree() {
        let keys = |r: &DiagonalPolynomialRing, side| {
            r.polarization_operators_by_degree(side, false, None, 0)
                .keys()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ")
        };
        expect!["(-3, 1) (-2, 1) (-1, 1)"].assert_eq(&keys(&ring(4, 2), Side::Down));
        expect!["(-3, 1) (-2, 1) (-1, 1) (1, -3) (1, -2) (1, -1)"]
            .assert_eq(&keys(&ring(4, 2), Side::Both));
        expect!["(-2, 0, 1) (-2, 1, 0) (-1, 0, 1) (-1, 1, 0) (0, -2, 1) (0, -1, 1)"]
            .assert_eq(&keys(&ring(3, 3), Side::Down));

        let r = ring(4, 3);
        let ops = r.polarization_operators_by_degree(Side::Both, false, None, 0);
        let p = r.ring().parse("x00*x10^3*x11 + x21").unwrap();
        let op = &ops[&Degree::new(vec![1, -2, 0])][0];
        assert_eq!(r.element_to_string(&op(&p)), "6*x00^2*x10*x11");
        let op = &ops[&Degree::new(vec![0, -1, 1])][0];
        assert_eq!(
            r.element_to_string(&op(&p)),
            "3*x00*x10^2*x11*x20 + x00*x10^3*x21"
        );
    }

    #[test]
    fn specht_in_first_row() {
        let r = ring(3, 2);
        let mut out = String::new();
        for use_antisymmetry in [false, true] {
            for mu in partitions(3) {
                for t in standard_tableaux(&mu) {
                    let p = r.higher_specht(&t, None, SpechtMode::Plain, use_antisymmetry);
                    out.push_str(&r.element_to_string(&p));
                    out.push('\n');
                }
            }
        }
        expect![[r#"
            6
            -x00*x01 + x01*x02
            -2*x00 + 2*x02
            -x00^2*x01 + x00*x01^2 + x00^2*x02 - x01^2*x02 - x00*x02^2 + x01*x02^2
            6
            -x00*x01
            -2*x00
            -x00^2*x01
        "#]]
        .assert_eq(&out);
    }

    #[test]
    fn harmonic_space_is_cached() {
        let r = ring(3, 2);
        let mu = Partition::new(&[2, 1]);
        let a = r.harmonic_space_by_shape(&mu, HarmonicOptions::default());
        let b = r.clone().harmonic_space_by_shape(&mu, HarmonicOptions::default());
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.dimension(), 5);
    }
}
