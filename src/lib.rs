#![deny(missing_docs)]

//! ogupta - Gupta potential modeling of Fe/Co/Ni transition-metal clusters
//!
//! This crate implements the Gupta empirical many-body potential for atomic
//! clusters of the late 3d transition metals iron, cobalt and nickel, and
//! derives energy, forces (gradient) and curvature (Hessian) from atomic
//! coordinates. It serves as a scoring and derivative oracle for structure
//! relaxation and vibrational analysis.
//!
//! # The Potential
//!
//! For each unordered atom pair with distance r and parameters
//! (A, XI, P, Q, R0), the normalized strain is s = r/R0 - 1 and
//!
//! ```text
//! Ur = A * exp(-P * s)            repulsive Born-Mayer term
//! Ub = XI^2 * exp(-2 * Q * s)     band (hopping) term
//! U  = 2 * Σ_pairs Ur  -  Σ_atoms sqrt( Σ_{pairs of atom} Ub )
//! ```
//!
//! The per-atom square root makes the attractive part non-pairwise-additive:
//! it models electronic band-structure cohesion, which is why the crate
//! precomputes per-atom neighbor groups once per cluster.
//!
//! # Quick Start
//!
//! ```
//! use nalgebra::DVector;
//! use ogupta::element::Element;
//! use ogupta::potential::Gupta;
//!
//! fn main() -> Result<(), ogupta::potential::GuptaError> {
//!     // An Fe dimer at the Fe-Fe equilibrium distance
//!     let gupta = Gupta::new(vec![Element::Fe, Element::Fe])?;
//!     let coords = DVector::from_vec(vec![0.0, 0.0, 0.0, 0.0, 0.0, 2.5530]);
//!
//!     let energy = gupta.energy(&coords)?;
//!     let gradient = gupta.gradient(&coords)?;
//!     let hessian = gupta.hessian(&coords)?;
//!
//!     assert_eq!(gradient.len(), 6);
//!     assert_eq!(hessian.shape(), (6, 6));
//!     println!("U = {:.6} eV", energy);
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`element`] - Closed enumeration of the supported elements
//! - [`parameters`] - Pairwise interaction constants
//! - [`pairs`] - Pair enumeration and per-atom neighbor groups
//! - [`cluster`] - Element sequence plus coordinates
//! - [`potential`] - Energy evaluation
//! - [`derivatives`] - Analytic gradient and Hessian
//! - [`bonds`] - Bond-distance report
//! - [`io`] - XYZ file reading and writing
//! - [`optimizer`] - L-BFGS structural relaxation
//! - [`settings`] - INI configuration layer
//!
//! # Units
//!
//! Coordinates and distances in Angstroms, energies in eV, gradients in
//! eV/Angstrom, Hessians in eV/Angstrom^2.
//!
//! # References
//!
//! - R. P. Gupta, Lattice relaxation at a metal surface,
//!   *Phys. Rev. B* **1981**, 23, 6265.
//!   [DOI: 10.1103/PhysRevB.23.6265](https://doi.org/10.1103/PhysRevB.23.6265)
//! - F. Cleri and V. Rosato, Tight-binding potentials for transition metals
//!   and alloys, *Phys. Rev. B* **1993**, 48, 22.
//!   [DOI: 10.1103/PhysRevB.48.22](https://doi.org/10.1103/PhysRevB.48.22)
//!
//! # License
//!
//! MIT License - see [LICENSE](../LICENSE) file for details

pub mod bonds;
pub mod cluster;
pub mod derivatives;
pub mod element;
pub mod io;
pub mod optimizer;
pub mod pairs;
pub mod parameters;
pub mod potential;
pub mod settings;

pub use cluster::Cluster;
pub use element::Element;
pub use potential::Gupta;
