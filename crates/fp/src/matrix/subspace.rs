use std::fmt;

use super::Matrix;
use crate::{prime::ValidPrime, vector::FpVector};

/// A subspace of a vector space.
///
/// The rows of `matrix` form a basis of the subspace in reduced row echelon form, sorted by
/// pivot column. Unlike a general [`Matrix`], the matrix of a subspace never contains zero rows,
/// and its pivots are kept up to date by every method.
#[derive(Debug, Clone, PartialEq, Eq)]
#[repr(transparent)]
pub struct Subspace {
    matrix: Matrix,
}

impl Subspace {
    pub fn new(p: ValidPrime, ambient_dimension: usize) -> Self {
        Self {
            matrix: Matrix::new(p, 0, ambient_dimension),
        }
    }

    pub fn prime(&self) -> ValidPrime {
        self.matrix.prime()
    }

    pub fn pivots(&self) -> &[isize] {
        self.matrix.pivots()
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    pub fn dimension(&self) -> usize {
        self.matrix.rows()
    }

    pub fn is_empty(&self) -> bool {
        self.dimension() == 0
    }

    pub fn ambient_dimension(&self) -> usize {
        self.matrix.columns()
    }

    /// Grows the ambient space by appending zero coordinates.
    pub fn extend_ambient(&mut self, dim: usize) {
        self.matrix.extend_columns(dim);
    }

    /// Projects a vector to a complement of the subspace. The complement is the set of vectors
    /// that have a 0 in every column where there is a pivot in `matrix`.
    pub fn reduce(&self, vector: &mut FpVector) {
        assert_eq!(vector.len(), self.ambient_dimension());
        let p = self.prime();
        for (col, &row) in self.pivots().iter().enumerate() {
            if row < 0 {
                continue;
            }
            let c = vector.entry(col);
            if c != 0 {
                vector.add(&self.matrix[row as usize], p.negate(c));
            }
        }
    }

    pub fn contains(&self, vector: &FpVector) -> bool {
        let mut vector = vector.clone();
        self.reduce(&mut vector);
        vector.is_zero()
    }

    /// Adds a vector to the subspace, keeping the basis reduced. Returns whether the dimension
    /// went up.
    pub fn add_vector(&mut self, vector: &FpVector) -> bool {
        let p = self.prime();
        let mut v = vector.clone();
        self.reduce(&mut v);
        let Some((col, c)) = v.first_nonzero() else {
            return false;
        };
        v.scale(p.inverse(c));

        for i in 0..self.matrix.rows() {
            let e = self.matrix[i].entry(col);
            if e != 0 {
                self.matrix[i].add(&v, p.negate(e));
            }
        }

        let position = self
            .pivots()
            .iter()
            .take(col)
            .filter(|&&row| row >= 0)
            .count();
        self.matrix.insert_row(position, v);
        for row in self.matrix.pivots_mut().iter_mut() {
            if *row >= position as isize {
                *row += 1;
            }
        }
        self.matrix.pivots_mut()[col] = position as isize;
        true
    }

    /// Returns a basis of the subspace.
    pub fn basis(&self) -> impl Iterator<Item = &FpVector> {
        self.matrix.iter()
    }
}

impl fmt::Display for Subspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.matrix, f)
    }
}
