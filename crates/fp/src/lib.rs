//! Dense linear algebra over prime fields.
//!
//! Everything in the workspace computes over a prime field F_p with p a fairly large prime, so
//! that dimensions agree with the dimensions over the rationals. Vectors are stored densely as
//! reduced residues; the interesting entry points are [`matrix::Matrix::row_reduce`] and
//! [`matrix::Subspace`].

#![allow(clippy::many_single_char_names)]
#![allow(clippy::unreadable_literal)]

pub mod matrix;
pub mod prime;
pub mod vector;
