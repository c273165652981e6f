//! Partitions, permutations and standard tableaux, as needed to index and build the
//! representations of the symmetric group.

mod partition;
mod permutation;
mod tableau;

pub use partition::{partitions, partitions_with_max_length, Partition};
pub use permutation::{permutations_of, Permutation};
pub use tableau::{standard_tableaux, StandardTableau};

/// Rearranges `v` into the next distinct permutation in lexicographic order. Returns `false`,
/// leaving `v` sorted increasingly, once the last one has been reached.
///
/// Starting from a sorted vector, this enumerates every distinct rearrangement of a multiset
/// exactly once.
///
/// # Example
/// ```
/// # use algebra::combinatorics::next_multiset_permutation;
/// let mut v = [0, 1, 1];
/// let mut all = vec![v];
/// while next_multiset_permutation(&mut v) {
///     all.push(v);
/// }
/// assert_eq!(all, [[0, 1, 1], [1, 0, 1], [1, 1, 0]]);
/// ```
pub fn next_multiset_permutation<T: Ord>(v: &mut [T]) -> bool {
    let Some(i) = (1..v.len()).rev().find(|&i| v[i - 1] < v[i]) else {
        v.reverse();
        return false;
    };
    let pivot = i - 1;
    // There is always such a j since v[i] > v[pivot].
    let j = (i..v.len()).rev().find(|&j| v[j] > v[pivot]).unwrap_or(i);
    v.swap(pivot, j);
    v[i..].reverse();
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiset_permutations() {
        let mut v = [0, 0, 1, 2];
        let mut count = 1;
        while next_multiset_permutation(&mut v) {
            count += 1;
        }
        assert_eq!(count, 12);
        assert_eq!(v, [0, 0, 1, 2]);

        let mut empty: [u32; 0] = [];
        assert!(!next_multiset_permutation(&mut empty));
    }
}
