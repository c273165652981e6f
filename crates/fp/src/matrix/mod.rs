mod subspace;

use std::{
    fmt,
    ops::{Index, IndexMut},
};

pub use subspace::Subspace;

use crate::{prime::ValidPrime, vector::FpVector};

/// A matrix over F_p, stored as a list of rows.
///
/// `pivots` is only meaningful after [`Matrix::row_reduce`]. Then `pivots[i]` is the row whose
/// pivot lies in column `i`, or `-1` if column `i` has no pivot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    p: ValidPrime,
    columns: usize,
    vectors: Vec<FpVector>,
    pivots: Vec<isize>,
}

impl Matrix {
    pub fn new(p: ValidPrime, rows: usize, columns: usize) -> Self {
        Self {
            p,
            columns,
            vectors: (0..rows).map(|_| FpVector::new(p, columns)).collect(),
            pivots: vec![-1; columns],
        }
    }

    pub fn from_rows(p: ValidPrime, vectors: Vec<FpVector>, columns: usize) -> Self {
        for v in &vectors {
            assert_eq!(v.len(), columns);
        }
        Self {
            p,
            columns,
            vectors,
            pivots: vec![-1; columns],
        }
    }

    /// # Example
    /// ```
    /// # use fp::{matrix::Matrix, prime::ValidPrime};
    /// let p = ValidPrime::new(7);
    /// let m = Matrix::from_vec(p, &[vec![1, 3, 6], vec![0, 3, 4]]);
    /// assert_eq!(m.to_vec(), vec![vec![1, 3, 6], vec![0, 3, 4]]);
    /// ```
    pub fn from_vec(p: ValidPrime, input: &[Vec<u32>]) -> Self {
        let columns = input.first().map_or(0, Vec::len);
        let vectors = input
            .iter()
            .map(|row| FpVector::from_slice(p, row))
            .collect();
        Self::from_rows(p, vectors, columns)
    }

    /// Builds `[A | I]` where the rows of `A` are `rows`. Returns the index of the first column
    /// of the identity block together with the matrix.
    pub fn augmented_with_identity(p: ValidPrime, rows: &[FpVector], columns: usize) -> (usize, Self) {
        let n = rows.len();
        let vectors = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let mut v = FpVector::new(p, columns + n);
                for (j, x) in row.iter_nonzero() {
                    v.set_entry(j, x);
                }
                v.set_entry(columns + i, 1);
                v
            })
            .collect();
        (columns, Self::from_rows(p, vectors, columns + n))
    }

    pub fn to_vec(&self) -> Vec<Vec<u32>> {
        self.vectors.iter().map(|v| v.iter().collect()).collect()
    }

    pub fn prime(&self) -> ValidPrime {
        self.p
    }

    pub fn rows(&self) -> usize {
        self.vectors.len()
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn pivots(&self) -> &[isize] {
        &self.pivots
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FpVector> {
        self.vectors.iter()
    }

    pub fn push_row(&mut self, row: FpVector) {
        assert_eq!(row.len(), self.columns);
        self.vectors.push(row);
    }

    pub(crate) fn insert_row(&mut self, index: usize, row: FpVector) {
        assert_eq!(row.len(), self.columns);
        self.vectors.insert(index, row);
    }

    pub(crate) fn pivots_mut(&mut self) -> &mut Vec<isize> {
        &mut self.pivots
    }

    /// Appends zero columns until there are `columns` of them.
    pub fn extend_columns(&mut self, columns: usize) {
        if columns <= self.columns {
            return;
        }
        for v in &mut self.vectors {
            v.extend_len(columns);
        }
        self.pivots.resize(columns, -1);
        self.columns = columns;
    }

    pub fn swap_rows(&mut self, i: usize, j: usize) {
        self.vectors.swap(i, j);
    }

    /// Puts the matrix in reduced row echelon form and returns its rank. The nonzero rows come
    /// first, sorted by pivot column.
    ///
    /// # Example
    /// ```
    /// # use fp::{matrix::Matrix, prime::ValidPrime};
    /// let p = ValidPrime::new(7);
    /// let mut m = Matrix::from_vec(p, &[vec![1, 3, 6], vec![0, 3, 4]]);
    /// assert_eq!(m.row_reduce(), 2);
    /// assert_eq!(m.to_vec(), vec![vec![1, 0, 2], vec![0, 1, 6]]);
    /// assert_eq!(m.pivots(), &[0, 1, -1]);
    /// ```
    pub fn row_reduce(&mut self) -> usize {
        let p = self.p;
        let rows = self.rows();
        self.pivots = vec![-1; self.columns];

        let mut pivot_row = 0;
        for col in 0..self.columns {
            if pivot_row == rows {
                break;
            }
            let Some(r) = (pivot_row..rows).find(|&r| self.vectors[r].entry(col) != 0) else {
                continue;
            };
            self.vectors.swap(pivot_row, r);

            let c = self.vectors[pivot_row].entry(col);
            self.vectors[pivot_row].scale(p.inverse(c));

            let pivot = self.vectors[pivot_row].clone();
            for (i, row) in self.vectors.iter_mut().enumerate() {
                if i == pivot_row {
                    continue;
                }
                let e = row.entry(col);
                if e != 0 {
                    row.add(&pivot, p.negate(e));
                }
            }
            self.pivots[col] = pivot_row as isize;
            pivot_row += 1;
        }
        pivot_row
    }

    /// Given a row reduced matrix of the form `[A | I]` where `I` starts at
    /// `first_source_column`, returns the kernel of `A` acting on row vectors, as a subspace of
    /// the ambient space of the identity block.
    ///
    /// # Example
    /// ```
    /// # use fp::{matrix::Matrix, prime::ValidPrime, vector::FpVector};
    /// let p = ValidPrime::new(3);
    /// let rows = [
    ///     FpVector::from_slice(p, &[1, 1]),
    ///     FpVector::from_slice(p, &[2, 2]),
    /// ];
    /// let (first_source_column, mut m) = Matrix::augmented_with_identity(p, &rows, 2);
    /// m.row_reduce();
    /// let ker = m.compute_kernel(first_source_column);
    /// assert_eq!(ker.dimension(), 1);
    /// assert_eq!(ker.matrix().to_vec(), vec![vec![1, 1]]);
    /// ```
    pub fn compute_kernel(&self, first_source_column: usize) -> Subspace {
        let source_dimension = self.columns - first_source_column;
        let first_kernel_row = self.pivots[..first_source_column]
            .iter()
            .filter(|&&x| x >= 0)
            .count();

        let mut kernel = Subspace::new(self.p, source_dimension);
        for row in &self.vectors[first_kernel_row..] {
            let v = FpVector::from_slice(self.p, &row.as_slice()[first_source_column..]);
            if !v.is_zero() {
                kernel.add_vector(&v);
            }
        }
        kernel
    }
}

impl Index<usize> for Matrix {
    type Output = FpVector;

    fn index(&self, i: usize) -> &FpVector {
        &self.vectors[i]
    }
}

impl IndexMut<usize> for Matrix {
    fn index_mut(&mut self, i: usize) -> &mut FpVector {
        &mut self.vectors[i]
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.vectors {
            if f.alternate() {
                writeln!(f, "{row:#}")?;
            } else {
                writeln!(f, "{row}")?;
            }
        }
        Ok(())
    }
}

#[cfg(feature = "proptest")]
pub mod arbitrary {
    use proptest::prelude::*;

    use super::*;

    pub const MAX_ROWS: usize = 12;
    pub const MAX_COLUMNS: usize = 12;

    pub fn arb_matrix(p: ValidPrime) -> impl Strategy<Value = Matrix> {
        (1..=MAX_ROWS, 1..=MAX_COLUMNS).prop_flat_map(move |(rows, columns)| {
            proptest::collection::vec(
                proptest::collection::vec(0..p.as_u32(), columns),
                rows,
            )
            .prop_map(move |v| Matrix::from_vec(p, &v))
        })
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use super::*;

    #[test]
    fn row_reduce_with_zero_column() {
        let p = ValidPrime::new(5);
        let mut m = Matrix::from_vec(p, &[vec![0, 2, 4], vec![0, 1, 2], vec![0, 0, 3]]);
        assert_eq!(m.row_reduce(), 2);
        assert_eq!(m.pivots(), &[-1, 0, 1]);
        expect![[r#"
            [0, 1, 0]
            [0, 0, 1]
            [0, 0, 0]
        "#]]
        .assert_eq(&m.to_string());
    }

    #[test]
    fn kernel() {
        let p = ValidPrime::new(7);
        let rows = [
            FpVector::from_slice(p, &[1, 0, 2]),
            FpVector::from_slice(p, &[0, 1, 1]),
            FpVector::from_slice(p, &[1, 1, 3]),
        ];
        let (first, mut m) = Matrix::augmented_with_identity(p, &rows, 3);
        m.row_reduce();
        let ker = m.compute_kernel(first);
        assert_eq!(ker.dimension(), 1);
        expect![[r#"
            [1, 1, -1]
        "#]]
        .assert_eq(&format!("{ker:#}"));
    }

    #[test]
    fn extend_columns() {
        let p = ValidPrime::new(3);
        let mut m = Matrix::from_vec(p, &[vec![1, 2]]);
        m.extend_columns(4);
        assert_eq!(m.to_vec(), vec![vec![1, 2, 0, 0]]);
        assert_eq!(m.pivots().len(), 4);
    }
}
