//! Bond-distance report over all atom pairs.
//!
//! A diagnostic listing of every pair closer than a fixed global cutoff,
//! independent of element type, together with the mean of the reported
//! distances. Shares the pairwise distance primitive with the potential but
//! applies the threshold to all pairs rather than per-atom groups.

use crate::cluster::Cluster;

/// Default cutoff below which a pair counts as bonded, in Angstroms.
///
/// The comparison is inclusive: a pair at exactly this distance is reported.
pub const DEFAULT_BOND_THRESHOLD: f64 = 2.513;

/// One reported bond.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bond {
    /// Index of the first atom (i < j).
    pub i: usize,
    /// Index of the second atom.
    pub j: usize,
    /// Pair distance in Angstroms.
    pub distance: f64,
}

/// Bonds within the cutoff plus their mean distance.
#[derive(Debug, Clone)]
pub struct BondReport {
    /// Bonded pairs in upper-triangular enumeration order.
    pub bonds: Vec<Bond>,
    /// Arithmetic mean of the reported distances, `None` when no pair is
    /// within the cutoff. The `Option` stands in for the empty-mean fault an
    /// unguarded average would produce; callers must handle the empty case.
    pub mean_distance: Option<f64>,
}

/// Reports every pair with distance at or below `threshold`.
///
/// # Examples
///
/// ```
/// use ogupta::bonds::{bond_report, DEFAULT_BOND_THRESHOLD};
/// use ogupta::cluster::Cluster;
/// use ogupta::element::Element;
///
/// let cluster = Cluster::new(
///     vec![Element::Fe, Element::Fe],
///     vec![0.0, 0.0, 0.0, 0.0, 0.0, 2.45],
/// );
/// let report = bond_report(&cluster, DEFAULT_BOND_THRESHOLD);
/// assert_eq!(report.bonds.len(), 1);
/// assert!((report.mean_distance.unwrap() - 2.45).abs() < 1e-12);
/// ```
pub fn bond_report(cluster: &Cluster, threshold: f64) -> BondReport {
    let n = cluster.num_atoms;
    let mut bonds = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            let distance = cluster.distance(i, j);
            if distance <= threshold {
                bonds.push(Bond { i, j, distance });
            }
        }
    }

    let mean_distance = if bonds.is_empty() {
        None
    } else {
        Some(bonds.iter().map(|b| b.distance).sum::<f64>() / bonds.len() as f64)
    };

    BondReport {
        bonds,
        mean_distance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;

    #[test]
    fn test_threshold_is_inclusive() {
        let at = Cluster::new(
            vec![Element::Fe, Element::Fe],
            vec![0.0, 0.0, 0.0, 0.0, 0.0, 2.513000],
        );
        assert_eq!(bond_report(&at, DEFAULT_BOND_THRESHOLD).bonds.len(), 1);

        let above = Cluster::new(
            vec![Element::Fe, Element::Fe],
            vec![0.0, 0.0, 0.0, 0.0, 0.0, 2.513001],
        );
        assert!(bond_report(&above, DEFAULT_BOND_THRESHOLD).bonds.is_empty());
    }

    #[test]
    fn test_empty_report_has_no_mean() {
        let cluster = Cluster::new(
            vec![Element::Ni, Element::Ni],
            vec![0.0, 0.0, 0.0, 0.0, 0.0, 10.0],
        );
        let report = bond_report(&cluster, DEFAULT_BOND_THRESHOLD);
        assert!(report.bonds.is_empty());
        assert_eq!(report.mean_distance, None);
    }

    #[test]
    fn test_enumeration_order_and_mean() {
        // Equilateral-ish triangle: all three pairs bonded.
        let cluster = Cluster::new(
            vec![Element::Fe, Element::Co, Element::Ni],
            vec![0.0, 0.0, 0.0, 2.4, 0.0, 0.0, 1.2, 2.0, 0.0],
        );
        let report = bond_report(&cluster, DEFAULT_BOND_THRESHOLD);
        let pairs: Vec<(usize, usize)> = report.bonds.iter().map(|b| (b.i, b.j)).collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);

        let mean = report.mean_distance.unwrap();
        let expected: f64 =
            report.bonds.iter().map(|b| b.distance).sum::<f64>() / report.bonds.len() as f64;
        assert!((mean - expected).abs() < 1e-15);
    }

    #[test]
    fn test_threshold_ignores_element_types() {
        // Same geometry, different composition: identical report shape.
        let coords = vec![0.0, 0.0, 0.0, 0.0, 0.0, 2.3];
        let fe = Cluster::new(vec![Element::Fe, Element::Fe], coords.clone());
        let ni = Cluster::new(vec![Element::Ni, Element::Co], coords);
        assert_eq!(
            bond_report(&fe, DEFAULT_BOND_THRESHOLD).bonds.len(),
            bond_report(&ni, DEFAULT_BOND_THRESHOLD).bonds.len()
        );
    }
}
