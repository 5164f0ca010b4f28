//! Core cluster data structure for atomic configurations.
//!
//! This module provides the fundamental data type for representing a
//! transition-metal cluster: the ordered element sequence together with the
//! Cartesian coordinates of every atom. Coordinates use a flat representation
//! where the positions are stored as a single vector in the order
//! [x1, y1, z1, x2, y2, z2, ...].
//!
//! All coordinates are in Angstroms and energies derived from them in eV.

use crate::element::{Element, UnsupportedElementError};
use nalgebra::DVector;

/// Euclidean distance between two atoms in a flat coordinate vector.
///
/// This is the shared geometry primitive behind the potential's pairwise
/// reduction and the bond report: atom `i` occupies the three entries starting
/// at `3 * i`.
pub fn atom_distance(coords: &DVector<f64>, i: usize, j: usize) -> f64 {
    let a = i * 3;
    let b = j * 3;
    let dx = coords[a] - coords[b];
    let dy = coords[a + 1] - coords[b + 1];
    let dz = coords[a + 2] - coords[b + 2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// An atomic cluster: element sequence plus Cartesian coordinates.
///
/// Row `i` of the conceptual n×3 coordinate matrix is the position of atom
/// `i` in the element sequence; in the flat storage it occupies the three
/// entries starting at `3 * i`. The element sequence is fixed at construction
/// while the coordinates may be replaced between evaluations (the potential
/// engine caches nothing from a `Cluster`, see [`crate::potential::Gupta`]).
///
/// # Examples
///
/// ```
/// use ogupta::cluster::Cluster;
/// use ogupta::element::Element;
///
/// let elements = vec![Element::Fe, Element::Fe];
/// let coords = vec![0.0, 0.0, 0.0, 0.0, 0.0, 2.553];
/// let cluster = Cluster::new(elements, coords);
/// assert_eq!(cluster.num_atoms, 2);
/// assert!((cluster.distance(0, 1) - 2.553).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct Cluster {
    /// Elements of each atom in order.
    pub elements: Vec<Element>,
    /// Flattened Cartesian coordinates [x1, y1, z1, x2, y2, z2, ...] in Angstroms.
    pub coords: DVector<f64>,
    /// Number of atoms in the cluster.
    pub num_atoms: usize,
}

impl Cluster {
    /// Creates a new `Cluster` from an element list and a flat coordinate vector.
    ///
    /// # Panics
    ///
    /// Panics if `coords.len() != elements.len() * 3`, ensuring data consistency.
    pub fn new(elements: Vec<Element>, coords: Vec<f64>) -> Self {
        let num_atoms = elements.len();
        assert_eq!(coords.len(), num_atoms * 3);
        Self {
            elements,
            coords: DVector::from_vec(coords),
            num_atoms,
        }
    }

    /// Creates a `Cluster` from raw element symbols, rejecting unsupported ones.
    ///
    /// Symbols are resolved through the closed [`Element`] enumeration, so a
    /// cluster containing anything outside {Fe, Co, Ni} fails here, before any
    /// parameter lookup can happen.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedElementError`] naming the first offending symbol.
    pub fn from_symbols<S: AsRef<str>>(
        symbols: &[S],
        coords: Vec<f64>,
    ) -> Result<Self, UnsupportedElementError> {
        let elements = symbols
            .iter()
            .map(|s| s.as_ref().parse::<Element>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(elements, coords))
    }

    /// Returns the Cartesian coordinates [x, y, z] of atom `atom_idx`.
    pub fn atom_coords(&self, atom_idx: usize) -> [f64; 3] {
        let i = atom_idx * 3;
        [self.coords[i], self.coords[i + 1], self.coords[i + 2]]
    }

    /// Euclidean distance between atoms `i` and `j` in Angstroms.
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        atom_distance(&self.coords, i, j)
    }

    /// Compact composition formula such as `Fe2Co10Ni`.
    ///
    /// Elements appear in the fixed order Fe, Co, Ni with counts of one left
    /// implicit, which matches the naming convention used for cluster input
    /// files.
    pub fn formula(&self) -> String {
        let mut counts = [0usize; 3];
        for el in &self.elements {
            counts[*el as usize] += 1;
        }
        let mut formula = String::new();
        for (el, count) in [Element::Fe, Element::Co, Element::Ni].iter().zip(counts) {
            match count {
                0 => {}
                1 => formula.push_str(el.symbol()),
                _ => {
                    formula.push_str(el.symbol());
                    formula.push_str(&count.to_string());
                }
            }
        }
        formula
    }
}
