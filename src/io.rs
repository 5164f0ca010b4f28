//! XYZ coordinate file reading and writing.
//!
//! The XYZ format is a plain-text interchange format for atomic structures:
//! line 1 holds the atom count, line 2 a free-form comment (optionally
//! carrying an energy value), followed by one `Element X Y Z` record per
//! atom with whitespace-separated fields. Coordinates are in Angstroms.

use crate::cluster::Cluster;
use crate::element::UnsupportedElementError;
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Error type for XYZ file operations.
#[derive(Error, Debug)]
pub enum XyzError {
    /// I/O error when reading or writing files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed file content with descriptive message
    #[error("Parse error: {0}")]
    Parse(String),
    /// Atom record names an element outside the supported set
    #[error(transparent)]
    Element(#[from] UnsupportedElementError),
}

/// Type alias for XYZ operation results
type Result<T> = std::result::Result<T, XyzError>;

/// Contents of one XYZ file: the cluster and its comment line.
#[derive(Debug, Clone)]
pub struct XyzFile {
    /// Parsed atoms and coordinates.
    pub cluster: Cluster,
    /// The free-form second line, whitespace-trimmed.
    pub comment: String,
}

lazy_static! {
    // A decimal point or an exponent is mandatory: bare integers in a
    // comment (atom counts, formula subscripts) are not energies.
    static ref FLOAT_RE: Regex =
        Regex::new(r"[-+]?\d+\.\d+(?:[eE][-+]?\d+)?|[-+]?\d+[eE][-+]?\d+")
            .expect("valid float regex");
}

/// Reads an XYZ file.
///
/// The atom count on line 1 is authoritative: the reader parses exactly that
/// many records and fails if any is missing, malformed, or followed by
/// further non-blank content. Trailing blank lines are tolerated. Extra
/// columns after the coordinates are ignored.
///
/// # Errors
///
/// - [`XyzError::Io`] when the file cannot be read
/// - [`XyzError::Parse`] for a malformed count line, truncated file, records
///   with missing or non-numeric coordinates, or surplus records
/// - [`XyzError::Element`] when an atom record names an unsupported element
pub fn read_xyz(path: &Path) -> Result<XyzFile> {
    let content = fs::read_to_string(path)?;
    let mut lines = content.lines();

    let count_line = lines
        .next()
        .ok_or_else(|| XyzError::Parse("empty file".to_string()))?;
    let num_atoms: usize = count_line.trim().parse().map_err(|_| {
        XyzError::Parse(format!("invalid atom count line: '{}'", count_line.trim()))
    })?;

    let comment = lines
        .next()
        .ok_or_else(|| XyzError::Parse("missing comment line".to_string()))?
        .trim()
        .to_string();

    let mut symbols = Vec::with_capacity(num_atoms);
    let mut coords = Vec::with_capacity(num_atoms * 3);
    for record in 0..num_atoms {
        let line = lines.next().ok_or_else(|| {
            XyzError::Parse(format!(
                "expected {} atom records, file ends after {}",
                num_atoms, record
            ))
        })?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(XyzError::Parse(format!(
                "atom record {} has {} fields, expected element and 3 coordinates: '{}'",
                record + 1,
                fields.len(),
                line.trim()
            )));
        }
        symbols.push(fields[0].to_string());
        for field in &fields[1..4] {
            let value: f64 = field.parse().map_err(|_| {
                XyzError::Parse(format!(
                    "invalid coordinate '{}' in atom record {}",
                    field,
                    record + 1
                ))
            })?;
            coords.push(value);
        }
    }

    if let Some(line) = lines.find(|line| !line.trim().is_empty()) {
        return Err(XyzError::Parse(format!(
            "unexpected content after {} atom records: '{}'",
            num_atoms,
            line.trim()
        )));
    }

    let cluster = Cluster::from_symbols(&symbols, coords)?;
    Ok(XyzFile { cluster, comment })
}

/// Writes a cluster to an XYZ file.
///
/// Coordinates are written with 8 decimal places, which round-trips the
/// precision relevant to the potential.
pub fn write_xyz(cluster: &Cluster, comment: &str, path: &Path) -> Result<()> {
    let mut content = format!("{}\n{}\n", cluster.num_atoms, comment);
    for i in 0..cluster.num_atoms {
        let coords = cluster.atom_coords(i);
        content.push_str(&format!(
            "{}  {:.8}  {:.8}  {:.8}\n",
            cluster.elements[i], coords[0], coords[1], coords[2]
        ));
    }
    fs::write(path, content)?;
    Ok(())
}

/// Extracts the first floating-point number from a comment line, if any.
///
/// Relaxed structures are written with their energy in the comment line;
/// this recovers that value when a run restarts from such a file.
pub fn energy_from_comment(comment: &str) -> Option<f64> {
    FLOAT_RE
        .find(comment)
        .and_then(|m| m.as_str().parse().ok())
}
