//! Chemical elements supported by the Gupta parameterization.
//!
//! The potential is parameterized for the late 3d transition metals Fe, Co
//! and Ni only. Element symbols are resolved into the closed [`Element`]
//! enumeration when a cluster is constructed; anything outside the supported
//! set is rejected at that point with an [`UnsupportedElementError`], so the
//! evaluation core never deals with raw strings.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error raised when an element symbol outside the supported set is requested.
///
/// Carries the offending symbol so callers can report exactly which atom of
/// an input file could not be resolved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported element symbol '{symbol}' (supported: Fe, Co, Ni)")]
pub struct UnsupportedElementError {
    /// The symbol that failed to resolve.
    pub symbol: String,
}

/// A transition metal covered by the parameter table.
///
/// The set is closed on purpose: every unordered pair of variants has an
/// entry in the parameter table, which makes the pair lookup a total
/// function (see [`crate::parameters::PairParameters::lookup`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Element {
    /// Iron
    Fe,
    /// Cobalt
    Co,
    /// Nickel
    Ni,
}

impl Element {
    /// Returns the conventional chemical symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Element::Fe => "Fe",
            Element::Co => "Co",
            Element::Ni => "Ni",
        }
    }
}

impl FromStr for Element {
    type Err = UnsupportedElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Fe" => Ok(Element::Fe),
            "Co" => Ok(Element::Co),
            "Ni" => Ok(Element::Ni),
            _ => Err(UnsupportedElementError {
                symbol: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_supported_symbols() {
        assert_eq!("Fe".parse::<Element>().unwrap(), Element::Fe);
        assert_eq!("Co".parse::<Element>().unwrap(), Element::Co);
        assert_eq!("Ni".parse::<Element>().unwrap(), Element::Ni);
    }

    #[test]
    fn test_rejects_unknown_symbol() {
        let err = "Cu".parse::<Element>().unwrap_err();
        assert_eq!(err.symbol, "Cu");
        assert!(err.to_string().contains("Cu"));
    }

    #[test]
    fn test_rejects_case_variants() {
        // Symbols are case-sensitive, like in an XYZ file
        assert!("fe".parse::<Element>().is_err());
        assert!("FE".parse::<Element>().is_err());
    }

    #[test]
    fn test_symbol_round_trip() {
        for el in [Element::Fe, Element::Co, Element::Ni] {
            assert_eq!(el.symbol().parse::<Element>().unwrap(), el);
        }
    }
}
