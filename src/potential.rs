//! Gupta potential energy evaluation.
//!
//! The Gupta potential [1] combines a pairwise Born-Mayer repulsion with a
//! many-body attractive band term. With the normalized strain
//! s = r/R0 - 1 for each pair:
//!
//! ```text
//! Ur = A * exp(-P * s)            (repulsive, per pair)
//! Ub = XI^2 * exp(-2 * Q * s)     (band, per pair)
//! U  = 2 * sum_pairs(Ur) - sum_atoms(sqrt(sum_{pairs of atom}(Ub)))
//! ```
//!
//! The square root is applied per atom to the sum of that atom's pair
//! contributions, not per pair; this non-linearity is what makes the
//! potential many-body and is why [`PairTable`] precomputes the per-atom
//! neighbor groups.
//!
//! Reference:
//! [1] R. P. Gupta, Lattice relaxation at a metal surface,
//!     Phys. Rev. B 23, 6265 (1981). <https://doi.org/10.1103/PhysRevB.23.6265>

use crate::cluster::Cluster;
use crate::element::Element;
use crate::pairs::PairTable;
use nalgebra::DVector;
use thiserror::Error;

/// Errors raised by potential evaluation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuptaError {
    /// Coordinate buffer does not hold one 3-vector per atom.
    #[error("coordinate vector has {actual} entries, expected {expected} (3 per atom, {atoms} atoms)")]
    ShapeMismatch {
        /// Expected number of entries (3 * atom count).
        expected: usize,
        /// Number of entries actually supplied.
        actual: usize,
        /// Atom count of the cluster the engine was built for.
        atoms: usize,
    },
    /// The potential is only defined for clusters of at least two atoms.
    #[error("cluster has {0} atom(s), at least 2 are required")]
    TooFewAtoms(usize),
}

/// Result alias for potential operations.
pub type Result<T> = std::result::Result<T, GuptaError>;

/// Per-pair and per-atom quantities shared by the energy and its derivatives.
///
/// One evaluation pass over the coordinates produces everything the band
/// term's non-linearity needs: pair distances, the two exponential terms and
/// the per-atom band density rho_i = sum of Ub over the atom's pairs.
#[derive(Debug)]
pub(crate) struct PairQuantities {
    /// Pair distances r_k in Angstroms.
    pub dist: Vec<f64>,
    /// Repulsive terms Ur_k.
    pub repulsive: Vec<f64>,
    /// Band terms Ub_k.
    pub band: Vec<f64>,
    /// Per-atom band densities rho_i.
    pub density: Vec<f64>,
}

/// Gupta potential engine for a fixed element sequence.
///
/// Construction resolves every pair's parameters and builds the neighbor
/// groups once; evaluation calls are pure functions of the coordinates and
/// retain nothing between calls, so an external minimizer may invoke them in
/// any order.
///
/// # Examples
///
/// ```
/// use nalgebra::DVector;
/// use ogupta::element::Element;
/// use ogupta::potential::Gupta;
///
/// let gupta = Gupta::new(vec![Element::Fe, Element::Fe])?;
/// let coords = DVector::from_vec(vec![0.0, 0.0, 0.0, 0.0, 0.0, 2.5530]);
/// let energy = gupta.energy(&coords)?;
/// assert!((energy - (-2.96950)).abs() < 1e-10);
/// # Ok::<(), ogupta::potential::GuptaError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Gupta {
    elements: Vec<Element>,
    pub(crate) table: PairTable,
}

impl Gupta {
    /// Creates an engine for the given element sequence.
    ///
    /// # Errors
    ///
    /// Returns [`GuptaError::TooFewAtoms`] for clusters with fewer than two
    /// atoms.
    pub fn new(elements: Vec<Element>) -> Result<Self> {
        if elements.len() < 2 {
            return Err(GuptaError::TooFewAtoms(elements.len()));
        }
        let table = PairTable::build(&elements);
        Ok(Self { elements, table })
    }

    /// Creates an engine for a cluster's element sequence.
    pub fn for_cluster(cluster: &Cluster) -> Result<Self> {
        Self::new(cluster.elements.clone())
    }

    /// Number of atoms the engine was built for.
    pub fn num_atoms(&self) -> usize {
        self.elements.len()
    }

    /// The element sequence the engine was built for.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Verifies that `coords` holds exactly one 3-vector per atom.
    pub(crate) fn check_shape(&self, coords: &DVector<f64>) -> Result<()> {
        let expected = 3 * self.elements.len();
        if coords.len() != expected {
            return Err(GuptaError::ShapeMismatch {
                expected,
                actual: coords.len(),
                atoms: self.elements.len(),
            });
        }
        Ok(())
    }

    /// Single pass over all pairs: distances, exponential terms, band densities.
    ///
    /// Shape must have been checked by the caller. Summation runs in pair
    /// index order, so results are bit-reproducible across calls.
    pub(crate) fn pair_quantities(&self, coords: &DVector<f64>) -> PairQuantities {
        let m = self.table.num_pairs();
        let mut dist = Vec::with_capacity(m);
        let mut repulsive = Vec::with_capacity(m);
        let mut band = Vec::with_capacity(m);

        for pair in &self.table.pairs {
            let a = pair.i * 3;
            let b = pair.j * 3;
            let dx = coords[a] - coords[b];
            let dy = coords[a + 1] - coords[b + 1];
            let dz = coords[a + 2] - coords[b + 2];
            let r = (dx * dx + dy * dy + dz * dz).sqrt();

            let p = &pair.params;
            let strain = r / p.r0 - 1.0;
            let ur = p.a * (-p.p * strain).exp();
            let ub = p.xi * p.xi * (-2.0 * p.q * strain).exp();

            dist.push(r);
            repulsive.push(ur);
            band.push(ub);
        }

        // The band non-linearity needs per-atom sums; the neighbor groups
        // gather each atom's pair contributions in ascending pair order.
        let density = self
            .table
            .neighbors
            .iter()
            .map(|group| group.iter().map(|&k| band[k]).sum())
            .collect();

        PairQuantities {
            dist,
            repulsive,
            band,
            density,
        }
    }

    /// Total potential energy in eV for the given coordinates.
    ///
    /// Coordinates are the flat vector [x1, y1, z1, x2, y2, z2, ...] in
    /// Angstroms. A pair distance of exactly zero yields a very large but
    /// finite repulsive penalty, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`GuptaError::ShapeMismatch`] if the buffer does not hold
    /// 3 entries per atom.
    pub fn energy(&self, coords: &DVector<f64>) -> Result<f64> {
        self.check_shape(coords)?;
        let pq = self.pair_quantities(coords);

        let repulsion: f64 = pq.repulsive.iter().sum();
        let cohesion: f64 = pq.density.iter().map(|rho| rho.sqrt()).sum();
        Ok(2.0 * repulsion - cohesion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dimer(r: f64) -> DVector<f64> {
        DVector::from_vec(vec![0.0, 0.0, 0.0, 0.0, 0.0, r])
    }

    #[test]
    fn test_rejects_single_atom() {
        assert_eq!(
            Gupta::new(vec![Element::Fe]).unwrap_err(),
            GuptaError::TooFewAtoms(1)
        );
    }

    #[test]
    fn test_shape_mismatch() {
        let gupta = Gupta::new(vec![Element::Fe, Element::Fe]).unwrap();
        let bad = DVector::from_vec(vec![0.0; 9]);
        assert_eq!(
            gupta.energy(&bad).unwrap_err(),
            GuptaError::ShapeMismatch {
                expected: 6,
                actual: 9,
                atoms: 2,
            }
        );
    }

    #[test]
    fn test_fe_dimer_at_equilibrium_strain() {
        // At r = R0 the strain vanishes: U = 2*A - 2*XI.
        let gupta = Gupta::new(vec![Element::Fe, Element::Fe]).unwrap();
        let energy = gupta.energy(&dimer(2.5530)).unwrap();
        let expected = 2.0 * 0.13315 - 2.0 * 1.6179;
        assert!((energy - expected).abs() < 1e-12);
        assert!((expected - (-2.96950)).abs() < 1e-12);
    }

    #[test]
    fn test_heteronuclear_dimer_at_equilibrium_strain() {
        let gupta = Gupta::new(vec![Element::Co, Element::Ni]).unwrap();
        let energy = gupta.energy(&dimer(2.4934)).unwrap();
        assert!((energy - (2.0 * 0.05970 - 2.0 * 1.2618)).abs() < 1e-12);
    }

    #[test]
    fn test_coincident_atoms_give_finite_penalty() {
        let gupta = Gupta::new(vec![Element::Ni, Element::Ni]).unwrap();
        let energy = gupta.energy(&dimer(0.0)).unwrap();
        assert!(energy.is_finite());
        assert!(energy > 1e5);
    }

    #[test]
    fn test_band_density_sums_each_atoms_pairs() {
        let gupta = Gupta::new(vec![Element::Fe, Element::Co, Element::Ni]).unwrap();
        let coords = DVector::from_vec(vec![0.0, 0.0, 0.0, 2.4, 0.0, 0.0, 1.2, 2.1, 0.0]);
        let pq = gupta.pair_quantities(&coords);

        // Pairs in order: (0,1) (0,2) (1,2).
        assert!((pq.density[0] - (pq.band[0] + pq.band[1])).abs() < 1e-15);
        assert!((pq.density[1] - (pq.band[0] + pq.band[2])).abs() < 1e-15);
        assert!((pq.density[2] - (pq.band[1] + pq.band[2])).abs() < 1e-15);
    }

    #[test]
    fn test_energy_is_referentially_transparent() {
        let gupta = Gupta::new(vec![Element::Fe, Element::Co, Element::Ni]).unwrap();
        let coords = DVector::from_vec(vec![0.0, 0.0, 0.0, 2.4, 0.0, 0.0, 1.2, 2.1, 0.0]);
        let first = gupta.energy(&coords).unwrap();
        let second = gupta.energy(&coords).unwrap();
        assert_eq!(first, second);
    }
}
