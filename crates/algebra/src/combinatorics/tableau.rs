use std::fmt;

use anyhow::{anyhow, ensure};
use itertools::Itertools;

use super::{permutations_of, Partition, Permutation};

/// A standard Young tableau with entries `1..=n`, increasing along rows and down columns. Row 0
/// is the longest row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StandardTableau {
    rows: Vec<Vec<usize>>,
}

impl StandardTableau {
    pub fn new(rows: Vec<Vec<usize>>) -> anyhow::Result<Self> {
        let shape: Vec<usize> = rows.iter().map(Vec::len).collect();
        Partition::try_from(shape.clone())?;
        ensure!(
            !shape.contains(&0),
            "Tableau {rows:?} has an empty row"
        );

        let n: usize = shape.iter().sum();
        let mut entries: Vec<usize> = rows.iter().flatten().copied().collect();
        entries.sort_unstable();
        ensure!(
            entries.iter().copied().eq(1..=n),
            "Entries of {rows:?} are not 1..={n}"
        );

        for (i, row) in rows.iter().enumerate() {
            ensure!(
                row.iter().tuple_windows().all(|(a, b)| a < b),
                "Row {i} of {rows:?} is not increasing"
            );
            if i > 0 {
                ensure!(
                    row.iter().zip(&rows[i - 1]).all(|(b, a)| a < b),
                    "Columns of {rows:?} are not increasing"
                );
            }
        }
        Ok(Self { rows })
    }

    pub(crate) fn new_unchecked(rows: Vec<Vec<usize>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<usize>] {
        &self.rows
    }

    pub fn shape(&self) -> Partition {
        Partition::new(&self.rows.iter().map(Vec::len).collect::<Vec<_>>())
    }

    pub fn size(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn conjugate(&self) -> Self {
        let width = self.rows.first().map_or(0, Vec::len);
        Self {
            rows: (0..width)
                .map(|j| {
                    self.rows
                        .iter()
                        .take_while(|row| row.len() > j)
                        .map(|row| row[j])
                        .collect()
                })
                .collect(),
        }
    }

    /// The entries read row by row, starting with the first row.
    pub fn entries(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.iter().flatten().copied()
    }

    /// The rows read from the last one to the first, each from left to right.
    pub fn reading_word(&self) -> Vec<usize> {
        self.rows.iter().rev().flatten().copied().collect()
    }

    fn stabilizer(&self, blocks: &[Vec<usize>]) -> Vec<Permutation> {
        let n = self.size();
        blocks
            .iter()
            .filter(|block| block.len() > 1)
            .fold(vec![Permutation::identity(n)], |group, block| {
                let positions: Vec<usize> = block.iter().map(|x| x - 1).collect();
                let factor = permutations_of(&positions, n);
                group
                    .iter()
                    .cartesian_product(&factor)
                    .map(|(g, h)| g.compose(h))
                    .collect()
            })
    }

    /// The permutations of `0..n` that preserve the (0-based) set of entries of every row.
    pub fn row_stabilizer(&self) -> Vec<Permutation> {
        self.stabilizer(&self.rows)
    }

    /// The permutations of `0..n` that preserve the (0-based) set of entries of every column.
    pub fn column_stabilizer(&self) -> Vec<Permutation> {
        self.stabilizer(&self.conjugate().rows)
    }

    /// The index filling: the semistandard filling of lowest content whose standardized reading
    /// word is the reading word of `self`. Its rows match the rows of `self`.
    ///
    /// # Example
    /// ```
    /// # use algebra::combinatorics::StandardTableau;
    /// let t = StandardTableau::new(vec![vec![1, 2, 4], vec![3, 5]]).unwrap();
    /// assert_eq!(t.index_filling(), vec![vec![0, 0, 1], vec![1, 2]]);
    /// assert_eq!(t.cocharge(), 4);
    /// ```
    pub fn index_filling(&self) -> Vec<Vec<usize>> {
        let reading_word = self.reading_word();
        let word = Permutation::standard_permutation(&reading_word).destandardize();
        let mut word = word.into_iter();
        let mut filling: Vec<Vec<usize>> = self.rows.iter().map(|row| vec![0; row.len()]).collect();
        for row in filling.iter_mut().rev() {
            for x in row.iter_mut() {
                *x = word.next().unwrap_or_default();
            }
        }
        filling
    }

    /// The sum of the entries of the index filling.
    pub fn cocharge(&self) -> usize {
        self.index_filling().iter().flatten().sum()
    }
}

impl fmt::Display for StandardTableau {
    /// Uses French notation: the first row is at the bottom.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.size().to_string().len() + 2;
        let lines = self.rows.iter().rev().map(|row| {
            row.iter()
                .map(|x| format!("{x:>width$}"))
                .collect::<String>()
        });
        write!(f, "{}", lines.format("\n"))
    }
}

/// All standard tableaux of a given shape.
///
/// They are listed in the order obtained by placing the largest entry in the highest possible
/// corner first.
pub fn standard_tableaux(shape: &Partition) -> Vec<StandardTableau> {
    fn fill(shape: &Partition) -> Vec<Vec<Vec<usize>>> {
        let n = shape.size();
        if n == 0 {
            return vec![vec![]];
        }
        let mut result = Vec::new();
        for i in shape.corners().collect::<Vec<_>>() {
            for mut rows in fill(&shape.remove_cell(i)) {
                if rows.len() == i {
                    rows.push(Vec::new());
                }
                rows[i].push(n);
                result.push(rows);
            }
        }
        result
    }

    fill(shape)
        .into_iter()
        .map(StandardTableau::new_unchecked)
        .collect()
}

impl TryFrom<&str> for StandardTableau {
    type Error = anyhow::Error;

    /// Parses rows separated by `/`, e.g. `1 3 / 2`.
    fn try_from(s: &str) -> anyhow::Result<Self> {
        let rows = s
            .split('/')
            .map(|row| {
                row.split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|x| !x.is_empty())
                    .map(|x| {
                        x.parse::<usize>()
                            .map_err(|e| anyhow!("Invalid entry '{x}' in tableau '{s}': {e}"))
                    })
                    .collect::<anyhow::Result<Vec<_>>>()
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Self::new(rows)
    }
}
