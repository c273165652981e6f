//! `harmonics` computes the space of diagonally harmonic polynomials in `r` rows of `n`
//! variables, one isotypic component at a time.
//!
//! The space is built as the closure of the harmonic higher Specht polynomials of a shape `mu`
//! under the polarization operators, see [`diagonal::DiagonalPolynomialRing`]. Its multigraded
//! dimensions give a `GL_r` character, and summing over all shapes gives the `GL_r x S_n`
//! bicharacter. Results are persisted on disk by [`character::CharacterDatabase`] so that long
//! computations only run once.
//!
//! All computations happen over a large prime field, see [`fp::prime::DEFAULT_PRIME`].
//!
//! # Binary
//! The `harmonics` binary exposes the main entry points as subcommands. Parameters are read from
//! the positional arguments, and prompted for on stderr when missing:
//! ```text
//! $ harmonics character 2,2,1,1
//! $ harmonics bicharacter 3 2 n n n
//! $ harmonics specht "1 3/2" "" harmonic n
//! ```
//!
//! # Logging
//! Progress is reported through `tracing`. Set `RUST_LOG=harmonics=debug` to see the dimension
//! statistics of every closure computation and `RUST_LOG=info` to see the persistent cache being
//! read and written.
//!
//! # Environment
//! - `HARMONICS_PRIME`: the characteristic of the ground field, at least [`utils::MIN_PRIME`].
//! - `HARMONICS_SAVE_DIR`: the directory of the persistent cache (default `func_persist`).
//! - `HARMONICS_THREADS`: the number of worker threads, with the `concurrent` feature.

#![allow(clippy::many_single_char_names)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]
#![warn(clippy::default_trait_access)]
#![warn(clippy::if_not_else)]
#![warn(clippy::needless_continue)]
#![warn(clippy::redundant_closure_for_method_calls)]
#![warn(clippy::explicit_iter_loop)]
#![warn(clippy::explicit_into_iter_loop)]

pub mod character;
pub mod closure;
pub mod diagonal;
pub mod grading;
pub mod save;
pub mod utils;
pub mod young;
