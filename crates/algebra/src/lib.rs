//! Combinatorics and polynomial arithmetic over prime fields: partitions, permutations and
//! standard tableaux, sparse multivariate polynomials with a parser, and symmetric functions.

pub mod combinatorics;
pub mod polynomial;
pub mod symmetric;
