//! Pair enumeration and per-atom neighbor bookkeeping.
//!
//! For a cluster of n atoms the potential works over the m = n(n-1)/2
//! unordered pairs, laid out in row-major upper-triangular order: (0,1),
//! (0,2), ..., (0,n-1), (1,2), ... The many-body band term additionally needs,
//! for every atom, the linear indices of all pairs that contain it, so that
//! per-pair quantities can be aggregated per atom before the square root is
//! applied. [`PairTable`] builds all of this once per cluster; evaluation
//! calls only read it.

use crate::element::Element;
use crate::parameters::PairParameters;

/// One unordered atom pair with its resolved interaction parameters.
#[derive(Debug, Clone, Copy)]
pub struct Pair {
    /// Index of the first atom (i < j).
    pub i: usize,
    /// Index of the second atom.
    pub j: usize,
    /// Interaction parameters for the pair's element combination.
    pub params: PairParameters,
}

/// Cached pair arena for a fixed element sequence.
///
/// Holds the upper-triangular pair records and the per-atom neighbor groups.
/// Built once when a [`crate::potential::Gupta`] engine is constructed and
/// shared by every subsequent energy, gradient and Hessian call.
#[derive(Debug, Clone)]
pub struct PairTable {
    /// Number of atoms n.
    pub num_atoms: usize,
    /// All n(n-1)/2 pairs in upper-triangular order.
    pub pairs: Vec<Pair>,
    /// For each atom i, the linear pair indices of all pairs containing i,
    /// in ascending order of the other atom's index.
    pub neighbors: Vec<Vec<usize>>,
}

impl PairTable {
    /// Builds the pair arena for an element sequence.
    pub fn build(elements: &[Element]) -> Self {
        let n = elements.len();
        let mut pairs = Vec::with_capacity(n * (n.max(1) - 1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                pairs.push(Pair {
                    i,
                    j,
                    params: PairParameters::lookup(elements[i], elements[j]),
                });
            }
        }

        let neighbors = (0..n)
            .map(|i| {
                (0..n)
                    .filter(|&j| j != i)
                    .map(|j| pair_index(n, i, j))
                    .collect()
            })
            .collect();

        Self {
            num_atoms: n,
            pairs,
            neighbors,
        }
    }

    /// Number of pairs m = n(n-1)/2.
    pub fn num_pairs(&self) -> usize {
        self.pairs.len()
    }
}

/// Linear index of the unordered pair (i, j) in upper-triangular order.
///
/// Symmetric in its arguments; `i` and `j` must be distinct and below `n`.
pub fn pair_index(n: usize, i: usize, j: usize) -> usize {
    let (i, j) = if j < i { (j, i) } else { (i, j) };
    n * i + j - ((i + 2) * (i + 1)) / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_index_enumeration_order() {
        // n = 4: (0,1) (0,2) (0,3) (1,2) (1,3) (2,3)
        let expected = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];
        for (k, (i, j)) in expected.iter().enumerate() {
            assert_eq!(pair_index(4, *i, *j), k);
        }
    }

    #[test]
    fn test_pair_index_is_symmetric() {
        let n = 7;
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    assert_eq!(pair_index(n, i, j), pair_index(n, j, i));
                }
            }
        }
    }

    #[test]
    fn test_build_matches_pair_index() {
        let elements = vec![Element::Fe, Element::Co, Element::Ni, Element::Fe];
        let table = PairTable::build(&elements);
        assert_eq!(table.num_pairs(), 6);
        for (k, pair) in table.pairs.iter().enumerate() {
            assert!(pair.i < pair.j);
            assert_eq!(pair_index(4, pair.i, pair.j), k);
        }
    }

    #[test]
    fn test_pair_parameters_resolved() {
        let elements = vec![Element::Fe, Element::Ni];
        let table = PairTable::build(&elements);
        assert_eq!(
            table.pairs[0].params,
            PairParameters::lookup(Element::Fe, Element::Ni)
        );
    }

    #[test]
    fn test_neighbor_groups() {
        let elements = vec![Element::Fe, Element::Fe, Element::Fe, Element::Fe];
        let table = PairTable::build(&elements);
        // Atom 0 participates in (0,1) (0,2) (0,3) -> indices 0, 1, 2
        assert_eq!(table.neighbors[0], vec![0, 1, 2]);
        // Atom 2 participates in (0,2) (1,2) (2,3) -> indices 1, 3, 5
        assert_eq!(table.neighbors[2], vec![1, 3, 5]);
        // Every atom belongs to n - 1 pairs, every pair to 2 atoms
        for group in &table.neighbors {
            assert_eq!(group.len(), 3);
        }
        let total: usize = table.neighbors.iter().map(Vec::len).sum();
        assert_eq!(total, 2 * table.num_pairs());
    }
}
