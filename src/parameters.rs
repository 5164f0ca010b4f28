//! Gupta potential parameters for Fe/Co/Ni interactions.
//!
//! Parameters are taken from the fits for the late 3d transition metals and
//! cover all six unordered combinations of {Fe, Co, Ni}. Because [`Element`]
//! is a closed enumeration, the pair lookup is a total function: every
//! representable pair has exactly one entry, so no lookup failure mode exists
//! once a cluster's symbols have been resolved.

use crate::element::Element;

/// Interaction parameters for one unordered element pair.
///
/// # Units
///
/// - `a`, `xi`: cohesive energy scales in eV
/// - `p`, `q`: dimensionless elastic constants
/// - `r0`: equilibrium lattice parameter in Angstroms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairParameters {
    /// Repulsive (Born-Mayer) prefactor A in eV.
    pub a: f64,
    /// Band (hopping integral) prefactor XI in eV.
    pub xi: f64,
    /// Repulsive exponent P.
    pub p: f64,
    /// Band exponent Q.
    pub q: f64,
    /// Equilibrium interatomic distance R0 in Angstroms.
    pub r0: f64,
}

const FE_FE: PairParameters = PairParameters {
    a: 0.13315,
    xi: 1.6179,
    p: 10.5000,
    q: 2.6000,
    r0: 2.5530,
};
const FE_CO: PairParameters = PairParameters {
    a: 0.11246,
    xi: 1.5515,
    p: 11.0380,
    q: 2.4379,
    r0: 2.5248,
};
const FE_NI: PairParameters = PairParameters {
    a: 0.07075,
    xi: 1.3157,
    p: 13.3599,
    q: 1.7582,
    r0: 2.5213,
};
const CO_CO: PairParameters = PairParameters {
    a: 0.09500,
    xi: 1.4880,
    p: 11.6040,
    q: 2.2860,
    r0: 2.4970,
};
const CO_NI: PairParameters = PairParameters {
    a: 0.05970,
    xi: 1.2618,
    p: 14.0447,
    q: 1.6486,
    r0: 2.4934,
};
const NI_NI: PairParameters = PairParameters {
    a: 0.03760,
    xi: 1.0700,
    p: 16.9990,
    q: 1.1890,
    r0: 2.4900,
};

impl PairParameters {
    /// Looks up the interaction parameters for an unordered element pair.
    ///
    /// The lookup is symmetric: `lookup(a, b)` and `lookup(b, a)` return the
    /// same entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use ogupta::element::Element;
    /// use ogupta::parameters::PairParameters;
    ///
    /// let params = PairParameters::lookup(Element::Fe, Element::Ni);
    /// assert_eq!(params, PairParameters::lookup(Element::Ni, Element::Fe));
    /// assert!((params.r0 - 2.5213).abs() < 1e-12);
    /// ```
    pub fn lookup(a: Element, b: Element) -> PairParameters {
        use Element::*;
        match (a, b) {
            (Fe, Fe) => FE_FE,
            (Fe, Co) | (Co, Fe) => FE_CO,
            (Fe, Ni) | (Ni, Fe) => FE_NI,
            (Co, Co) => CO_CO,
            (Co, Ni) | (Ni, Co) => CO_NI,
            (Ni, Ni) => NI_NI,
        }
    }
}
