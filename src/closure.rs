//! Linear algebra on vectors given by their coordinates in a basis indexed by arbitrary keys,
//! such as polynomials indexed by monomials.
//!
//! The main object is [`GradedSubspace`], the smallest graded subspace containing some
//! generators and stable under a family of linear operators. It is computed with a work list:
//! every time a new basis vector is found, the images under all operators are queued, and the
//! images that turn out to be independent are queued in turn.

use std::{
    collections::BTreeMap,
    fmt,
    hash::Hash,
    iter::Sum,
    ops::AddAssign,
    sync::Arc,
};

use algebra::polynomial::{Monomial, Polynomial};
use fp::{
    matrix::{Matrix, Subspace},
    prime::ValidPrime,
    vector::FpVector,
};
use parking_lot::Mutex;
use rustc_hash::FxHashMap as HashMap;

use crate::grading::Grading;

/// An element of a vector space over F_p with a distinguished basis.
pub trait SparseVector: Clone {
    type Key: Clone + Eq + Hash;

    fn prime(&self) -> ValidPrime;

    /// The basis elements with a nonzero coefficient, together with that coefficient.
    fn items(&self) -> impl Iterator<Item = (Self::Key, u32)> + '_;

    /// The zero vector of the space containing `self`.
    fn zero_like(&self) -> Self;

    /// Adds `c` times `other` to `self`.
    fn add_scaled(&mut self, other: &Self, c: u32);

    fn is_zero(&self) -> bool;
}

impl SparseVector for Polynomial {
    type Key = Monomial;

    fn prime(&self) -> ValidPrime {
        Polynomial::prime(self)
    }

    /// Largest monomial first, so that matrices read like the printed polynomials.
    fn items(&self) -> impl Iterator<Item = (Monomial, u32)> + '_ {
        self.terms().rev().map(|(m, c)| (m.clone(), c))
    }

    fn zero_like(&self) -> Self {
        Self::zero(Polynomial::prime(self), self.nvars())
    }

    fn add_scaled(&mut self, other: &Self, c: u32) {
        self.add(other, c);
    }

    fn is_zero(&self) -> bool {
        Polynomial::is_zero(self)
    }
}

impl SparseVector for FpVector {
    type Key = usize;

    fn prime(&self) -> ValidPrime {
        FpVector::prime(self)
    }

    fn items(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.iter_nonzero()
    }

    fn zero_like(&self) -> Self {
        Self::new(FpVector::prime(self), self.len())
    }

    fn add_scaled(&mut self, other: &Self, c: u32) {
        self.add(other, c);
    }

    fn is_zero(&self) -> bool {
        FpVector::is_zero(self)
    }
}

/// Assigns consecutive column indices to keys, in order of first appearance.
#[derive(Debug, Clone)]
struct Ranker<K> {
    ranks: HashMap<K, usize>,
    keys: Vec<K>,
}

impl<K: Clone + Eq + Hash> Ranker<K> {
    fn new() -> Self {
        Self {
            ranks: HashMap::default(),
            keys: Vec::new(),
        }
    }

    fn rank(&mut self, key: K) -> usize {
        if let Some(&i) = self.ranks.get(&key) {
            return i;
        }
        let i = self.keys.len();
        self.keys.push(key.clone());
        self.ranks.insert(key, i);
        i
    }

    fn len(&self) -> usize {
        self.keys.len()
    }

    /// The coordinates of `v` in the ranked keys. Unseen keys are ranked first, so the result
    /// has one entry per key seen so far.
    fn plain_vector<V: SparseVector<Key = K>>(&mut self, p: ValidPrime, v: &V) -> FpVector {
        let items: Vec<(usize, u32)> = v.items().map(|(k, c)| (self.rank(k), c)).collect();
        let mut result = FpVector::new(p, self.len());
        for (i, c) in items {
            result.set_entry(i, c);
        }
        result
    }
}

/// Counters shared by the matrices of a computation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub add_vector: usize,
    pub extend: usize,
    pub dimension: usize,
}

impl AddAssign for Stats {
    fn add_assign(&mut self, other: Self) {
        self.add_vector += other.add_vector;
        self.extend += other.extend;
        self.dimension += other.dimension;
    }
}

impl Sum for Stats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        let mut result = Self::default();
        for x in iter {
            result += x;
        }
        result
    }
}

/// A list of vectors, viewed as the rows of a matrix whose columns are the keys met so far.
#[derive(Debug, Clone)]
pub struct MatrixOfVectors<V: SparseVector> {
    p: ValidPrime,
    ranker: Ranker<V::Key>,
    rows: Vec<FpVector>,
    stats: Stats,
}

impl<V: SparseVector> MatrixOfVectors<V> {
    pub fn new(p: ValidPrime) -> Self {
        Self {
            p,
            ranker: Ranker::new(),
            rows: Vec::new(),
            stats: Stats::default(),
        }
    }

    pub fn from_vectors(p: ValidPrime, vectors: impl IntoIterator<Item = V>) -> Self {
        let mut result = Self::new(p);
        for v in vectors {
            result.add_vector(&v);
        }
        result
    }

    /// Adds `v` at the bottom.
    pub fn add_vector(&mut self, v: &V) {
        self.stats.add_vector += 1;
        let row = self.ranker.plain_vector(self.p, v);
        self.rows.push(row);
    }

    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    pub fn columns(&self) -> usize {
        self.ranker.len()
    }

    /// The key of each column.
    pub fn keys(&self) -> &[V::Key] {
        &self.ranker.keys
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn matrix(&self) -> Matrix {
        let columns = self.columns();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut row = row.clone();
                row.extend_len(columns);
                row
            })
            .collect();
        Matrix::from_rows(self.p, rows, columns)
    }
}

impl<V: SparseVector> fmt::Display for MatrixOfVectors<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "A {}x{} matrix of vectors",
            self.rows(),
            self.columns()
        )
    }
}

/// A list of linearly independent vectors, kept together with the row echelon form of their
/// span.
#[derive(Debug, Clone)]
pub struct EchelonMatrixOfVectors<V: SparseVector> {
    p: ValidPrime,
    ranker: Ranker<V::Key>,
    span: Subspace,
    basis: Vec<V>,
    stats: Stats,
}

impl<V: SparseVector> EchelonMatrixOfVectors<V> {
    pub fn new(p: ValidPrime) -> Self {
        Self {
            p,
            ranker: Ranker::new(),
            span: Subspace::new(p, 0),
            basis: Vec::new(),
            stats: Stats::default(),
        }
    }

    /// Adds `v` to the basis if it is not in the span of the basis. Returns whether it was
    /// added.
    pub fn extend(&mut self, v: V) -> bool {
        self.stats.extend += 1;
        if v.is_zero() {
            return false;
        }
        let row = self.ranker.plain_vector(self.p, &v);
        if row.len() > self.span.ambient_dimension() {
            self.span.extend_ambient(row.len());
        }
        if !self.span.add_vector(&row) {
            return false;
        }
        self.stats.dimension += 1;
        self.basis.push(v);
        true
    }

    pub fn cardinality(&self) -> usize {
        self.basis.len()
    }

    /// The vectors that were added, in order.
    pub fn basis(&self) -> &[V] {
        &self.basis
    }

    /// The reduced row echelon form of the span.
    pub fn matrix(&self) -> &Matrix {
        self.span.matrix()
    }

    pub fn keys(&self) -> &[V::Key] {
        &self.ranker.keys
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }
}

impl<V: SparseVector> fmt::Display for EchelonMatrixOfVectors<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "A {}x{} echelon matrix of vectors",
            self.cardinality(),
            self.ranker.len()
        )
    }
}

/// A basis of the vectors `x` in the span of `basis` with `action(s, x) = 0` for every `s` in
/// `operators`. The elements of `basis` must be linearly independent.
///
/// The result is the image of a basis of the kernel in reduced row echelon form. In particular
/// the first nonzero coefficient of each result, in terms of `basis`, is 1.
pub fn annihilator_basis<V, W, S>(
    basis: &[V],
    operators: &[S],
    action: impl Fn(&S, &V) -> W,
) -> Vec<V>
where
    V: SparseVector,
    W: SparseVector,
{
    let Some(first) = basis.first() else {
        return Vec::new();
    };
    let p = first.prime();

    let mut rows: Vec<Vec<u32>> = vec![Vec::new(); basis.len()];
    for s in operators {
        let block = MatrixOfVectors::from_vectors(p, basis.iter().map(|b| action(s, b))).matrix();
        for (i, row) in rows.iter_mut().enumerate() {
            row.extend(block[i].iter());
        }
    }
    let columns = rows.first().map_or(0, Vec::len);
    let rows: Vec<FpVector> = rows.iter().map(|row| FpVector::from_slice(p, row)).collect();

    let (first_source_column, mut m) = Matrix::augmented_with_identity(p, &rows, columns);
    m.row_reduce();
    let kernel = m.compute_kernel(first_source_column);

    kernel
        .basis()
        .map(|v| {
            let mut result = first.zero_like();
            for (i, c) in v.iter_nonzero() {
                result.add_scaled(&basis[i], c);
            }
            result
        })
        .collect()
}

/// A linear operator, shared between the degrees it applies to.
pub type Operator<V> = Arc<dyn Fn(&V) -> V + Send + Sync>;

type AddDegrees<D> = Box<dyn Fn(&D, &D) -> Option<D> + Send + Sync>;

#[derive(Debug)]
struct Task<D, V> {
    vector: Arc<V>,
    degree: D,
    /// The position of the operator in `GradedSubspace::operators`.
    operator: (usize, usize),
}

struct State<D, V: SparseVector> {
    bases: BTreeMap<D, EchelonMatrixOfVectors<V>>,
    todo: Vec<Task<D, V>>,
}

/// The smallest graded subspace containing some generators and stable under some operators.
///
/// Generators are grouped by degree and operators by the degree shift they induce. The image of
/// a vector of degree `d1` under an operator of degree `d2` lies in degree `add_degrees(d1, d2)`.
/// When this is `None`, the image is known to vanish and is not computed.
///
/// The closure is computed lazily by [`GradedSubspace::finalize`], which every accessor calls.
pub struct GradedSubspace<D, V: SparseVector> {
    p: ValidPrime,
    operators: Vec<(D, Vec<Operator<V>>)>,
    add_degrees: AddDegrees<D>,
    state: Mutex<State<D, V>>,
}

impl<D, V> GradedSubspace<D, V>
where
    D: Clone + Ord + fmt::Debug,
    V: SparseVector,
{
    pub fn new(
        p: ValidPrime,
        generators: impl IntoIterator<Item = (D, Vec<V>)>,
        operators: impl IntoIterator<Item = (D, Vec<Operator<V>>)>,
        add_degrees: impl Fn(&D, &D) -> Option<D> + Send + Sync + 'static,
    ) -> Self {
        let mut result = Self {
            p,
            operators: operators.into_iter().collect(),
            add_degrees: Box::new(add_degrees),
            state: Mutex::new(State {
                bases: BTreeMap::new(),
                todo: Vec::new(),
            }),
        };

        let state = result.state.get_mut();
        for (d, gens) in generators {
            let basis = state
                .bases
                .entry(d.clone())
                .or_insert_with(|| EchelonMatrixOfVectors::new(p));
            let added: Vec<V> = gens.into_iter().filter(|v| basis.extend(v.clone())).collect();
            Self::push_todo(
                &result.operators,
                &result.add_degrees,
                &mut state.todo,
                &d,
                added,
            );
        }
        result
    }

    fn push_todo(
        operators: &[(D, Vec<Operator<V>>)],
        add_degrees: &AddDegrees<D>,
        todo: &mut Vec<Task<D, V>>,
        d1: &D,
        vectors: Vec<V>,
    ) {
        let vectors: Vec<Arc<V>> = vectors.into_iter().map(Arc::new).collect();
        for (i, (d2, ops)) in operators.iter().enumerate() {
            let Some(d3) = add_degrees(d1, d2) else {
                continue;
            };
            for v in &vectors {
                for j in 0..ops.len() {
                    todo.push(Task {
                        vector: Arc::clone(v),
                        degree: d3.clone(),
                        operator: (i, j),
                    });
                }
            }
        }
    }

    pub fn prime(&self) -> ValidPrime {
        self.p
    }

    /// Runs the work list until it is empty. Calling this again is a no-op.
    #[tracing::instrument(skip_all, fields(dimension, extensions))]
    pub fn finalize(&self) {
        let mut state = self.state.lock();
        let State { bases, todo } = &mut *state;
        if todo.is_empty() {
            return;
        }
        while let Some(task) = todo.pop() {
            let (i, j) = task.operator;
            let w = (self.operators[i].1[j])(task.vector.as_ref());
            if w.is_zero() {
                continue;
            }
            let basis = bases
                .entry(task.degree.clone())
                .or_insert_with(|| EchelonMatrixOfVectors::new(self.p));
            if basis.extend(w.clone()) {
                Self::push_todo(
                    &self.operators,
                    &self.add_degrees,
                    todo,
                    &task.degree,
                    vec![w],
                );
            }
        }

        let stats: Stats = bases.values().map(EchelonMatrixOfVectors::stats).sum();
        let span = tracing::Span::current();
        span.record("dimension", stats.dimension);
        span.record("extensions", stats.extend);
        tracing::debug!(
            dimension = stats.dimension,
            extensions = stats.extend,
            degrees = bases.len(),
            "closure complete"
        );
    }

    pub fn dimension(&self) -> usize {
        self.finalize();
        self.state
            .lock()
            .bases
            .values()
            .map(EchelonMatrixOfVectors::cardinality)
            .sum()
    }

    /// The dimension in every degree that was reached. This may include degrees of dimension 0.
    pub fn dimensions(&self) -> BTreeMap<D, usize> {
        self.finalize();
        self.state
            .lock()
            .bases
            .iter()
            .map(|(d, basis)| (d.clone(), basis.cardinality()))
            .collect()
    }

    /// The degrees with a nonzero dimension.
    pub fn degrees(&self) -> Vec<D> {
        self.finalize();
        self.state
            .lock()
            .bases
            .iter()
            .filter(|(_, basis)| basis.cardinality() > 0)
            .map(|(d, _)| d.clone())
            .collect()
    }

    /// A basis of the subspace in degree `d`, made of generators and images of basis vectors.
    pub fn basis(&self, d: &D) -> Vec<V> {
        self.finalize();
        self.state
            .lock()
            .bases
            .get(d)
            .map_or_else(Vec::new, |basis| basis.basis().to_vec())
    }

    pub fn stats(&self) -> Stats {
        self.state
            .lock()
            .bases
            .values()
            .map(EchelonMatrixOfVectors::stats)
            .sum()
    }

    /// The subspace in reduced row echelon form, with columns indexed by basis keys in order of
    /// first appearance. Only meaningful when there is a single degree.
    pub fn matrix(&self) -> Matrix {
        self.finalize();
        let state = self.state.lock();
        assert_eq!(state.bases.len(), 1, "matrix is only defined in the ungraded case");
        let basis = state.bases.values().next();
        basis.map_or_else(|| Matrix::new(self.p, 0, 0), |b| b.matrix().clone())
    }

    /// `sum_d dim_d q^d`, as a polynomial with one variable per entry of the degrees.
    pub fn hilbert_polynomial(&self) -> Polynomial
    where
        D: Grading,
    {
        let dimensions = self.dimensions();
        let nvars = dimensions.keys().next().map_or(0, |d| d.exponents().len());
        let mut result = Polynomial::zero(self.p, nvars);
        for (d, dim) in dimensions {
            result.add_term(Monomial::new(d.exponents()), self.p.from_i64(dim as i64));
        }
        result
    }
}

impl<V: SparseVector> GradedSubspace<(), V> {
    /// The smallest subspace containing `generators` and stable under `operators`.
    pub fn ungraded(p: ValidPrime, generators: Vec<V>, operators: Vec<Operator<V>>) -> Self {
        Self::new(p, [((), generators)], [((), operators)], |_, _| Some(()))
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;
    use fp::prime::DEFAULT_PRIME;

    use super::*;

    fn vector(x: &[u32]) -> FpVector {
        FpVector::from_slice(DEFAULT_PRIME, x)
    }

    #[test]
    fn orthogonal_complement() {
        let p = DEFAULT_PRIME;
        let basis: Vec<FpVector> = (0..4)
            .map(|i| {
                let mut v = FpVector::new(p, 4);
                v.set_entry(i, 1);
                v
            })
            .collect();
        let scalar = |u: &FpVector, v: &FpVector| {
            let s = u
                .iter()
                .zip(v.iter())
                .fold(0, |acc, (a, b)| p.sum(acc, p.product(a, b)));
            FpVector::from_slice(p, &[s])
        };
        let ann = annihilator_basis(&basis, &[vector(&[1, 1, 0, 0]), vector(&[0, 0, 1, 1])], scalar);
        let out: Vec<String> = ann.iter().map(|v| format!("{v:#}")).collect();
        expect![[r#"["[1, -1, 0, 0]", "[0, 0, 1, -1]"]"#]].assert_eq(&format!("{out:?}"));
    }

    #[test]
    fn annihilator_without_operators() {
        let basis = [vector(&[1, 2, 0]), vector(&[0, 0, 5])];
        let ops: [FpVector; 0] = [];
        let ann = annihilator_basis(&basis, &ops, |_, b: &FpVector| b.clone());
        assert_eq!(ann, basis);
    }

    #[test]
    fn echelon_matrix() {
        let mut m = EchelonMatrixOfVectors::new(DEFAULT_PRIME);
        assert!(m.extend(vector(&[2, 2, 3, 0, 0])));
        assert!(!m.extend(vector(&[4, 4, 6, 0, 0])));
        assert!(!m.extend(vector(&[0, 0, 0, 0, 0])));
        assert!(m.extend(vector(&[0, 0, 0, 0, 1])));
        assert_eq!(m.cardinality(), 2);
        assert_eq!(m.to_string(), "A 2x4 echelon matrix of vectors");
        assert_eq!(
            m.stats(),
            Stats {
                add_vector: 0,
                extend: 4,
                dimension: 2
            }
        );
    }

    #[test]
    fn matrix_of_vectors_grows_columns() {
        let m = MatrixOfVectors::from_vectors(
            DEFAULT_PRIME,
            [vector(&[1, 0, 0]), vector(&[0, 2, 0]), vector(&[0, 1, 1])],
        );
        assert_eq!(m.to_string(), "A 3x3 matrix of vectors");
        assert_eq!(m.keys(), &[0, 1, 2]);
        assert_eq!(
            m.matrix().to_vec(),
            vec![vec![1, 0, 0], vec![0, 2, 0], vec![0, 1, 1]]
        );
    }
}
