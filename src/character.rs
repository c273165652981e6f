//! The harmonic characters of every isotypic component, computed with enough rows and stored
//! in a persistent cache.
//!
//! For `mu` a partition of `n`, the `GL_r` character `f_mu` of the `mu`-isotypic component of the
//! diagonally harmonic polynomials stabilizes once `r >= n - 1`. Its terms of length at most `r`
//! only need `r` rows. The `[1^n]` component needs `n - 1` rows and every other one `n - 2`.

use std::time::{Duration, Instant};

use algebra::{
    combinatorics::{partitions, Partition},
    symmetric::{Bicharacter, SchurExpansion},
};
use fp::prime::ValidPrime;
#[cfg(feature = "concurrent")]
use rayon::prelude::*;

use crate::{
    diagonal::{DiagonalPolynomialRing, HarmonicOptions},
    save::PersistentCache,
    utils,
};

/// The stored form of a character: its terms, in increasing order of partitions.
pub type CharacterTerms = Vec<(Partition, i64)>;

const PREFIX: &str = "harmonic_character_plain";

/// `3,2,1` for `[3, 2, 1]`.
fn partition_hash(mu: &Partition) -> String {
    mu.parts()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// The number of rows needed to know the character of the `mu`-isotypic component.
pub fn rows_needed(mu: &Partition) -> usize {
    let n = mu.size();
    let r = if mu.len() == n {
        n.saturating_sub(1)
    } else {
        n.saturating_sub(2)
    };
    r.max(1)
}

pub struct CharacterDatabase {
    p: ValidPrime,
    cache: PersistentCache<Partition, CharacterTerms>,
}

impl CharacterDatabase {
    pub fn new(p: ValidPrime, dir: impl Into<std::path::PathBuf>) -> Self {
        Self {
            p,
            cache: PersistentCache::new(dir, PREFIX, partition_hash),
        }
    }

    /// Reads the prime and the directory from the environment, see [`utils`].
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::new(utils::prime_from_env()?, utils::save_dir()))
    }

    /// The terms of the character of the `mu`-isotypic component, computed with
    /// [`rows_needed`] rows and every shortcut, or read from the cache.
    pub fn harmonic_character_plain(&self, mu: &Partition) -> anyhow::Result<CharacterTerms> {
        self.cache.get_or_insert_with(mu, || {
            let ring = DiagonalPolynomialRing::new(self.p, mu.size(), rows_needed(mu));
            tracing::info!(%mu, %ring, "computing harmonic character");
            ring.harmonic_character(mu, HarmonicOptions::all())
                .terms()
                .map(|(lambda, c)| (lambda.clone(), c))
                .collect()
        })
    }

    /// The `GL` character of the `mu`-isotypic component of the diagonally harmonic polynomials.
    ///
    /// # Example
    /// ```
    /// # use harmonics::character::CharacterDatabase;
    /// # use algebra::combinatorics::Partition;
    /// let dir = tempfile::tempdir().unwrap();
    /// let db = CharacterDatabase::new(fp::prime::DEFAULT_PRIME, dir.path());
    /// let f = db.harmonic_character(&Partition::new(&[2, 1])).unwrap();
    /// assert_eq!(f.to_string(), "s[1] + s[2]");
    /// ```
    pub fn harmonic_character(&self, mu: &Partition) -> anyhow::Result<SchurExpansion> {
        Ok(SchurExpansion::from_terms(self.harmonic_character_plain(mu)?))
    }

    /// The characters of every isotypic component for `S_n`, with the time each took. The
    /// components are computed in parallel with the `concurrent` feature.
    pub fn harmonic_characters(
        &self,
        n: usize,
    ) -> anyhow::Result<Vec<(Partition, Duration, SchurExpansion)>> {
        let timed = |mu: Partition| -> anyhow::Result<(Partition, Duration, SchurExpansion)> {
            let start = Instant::now();
            let f = self.harmonic_character(&mu)?;
            Ok((mu, start.elapsed(), f))
        };

        #[cfg(feature = "concurrent")]
        let shapes = partitions(n).into_par_iter();
        #[cfg(not(feature = "concurrent"))]
        let shapes = partitions(n).into_iter();

        shapes.map(timed).collect()
    }

    /// The bicharacter `∑ f_mu # s_mu` over every `mu` in the cache, so truncated to whatever
    /// has been computed so far.
    pub fn harmonic_bicharacter_truncated_series(&self) -> anyhow::Result<Bicharacter> {
        let mut result = Bicharacter::zero();
        for (mu, terms) in self.cache.dict()? {
            result.add_tensor(&SchurExpansion::from_terms(terms), &mu);
        }
        Ok(result)
    }
}
