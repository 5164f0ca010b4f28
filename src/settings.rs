//! Configuration management.
//!
//! Runtime defaults can be overridden through an optional INI file named
//! `ogupta.cfg` in the working directory. Missing file, missing sections and
//! missing keys all fall back to the built-in defaults; an unreadable or
//! malformed file is reported with a warning and otherwise ignored, so a
//! broken configuration never blocks a calculation.
//!
//! # Configuration File Format
//!
//! ```ini
//! [optimizer]
//! max_iterations = 1000
//! gradient_tolerance = 1e-8
//! memory_size = 10
//! max_step = 0.3
//!
//! [bonds]
//! threshold = 2.513
//!
//! [general]
//! print_level = 0
//! ```

use crate::bonds::DEFAULT_BOND_THRESHOLD;
use crate::optimizer::MinimizeConfig;
use configparser::ini::Ini;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default configuration file name looked up in the working directory.
pub const CONFIG_FILE: &str = "ogupta.cfg";

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error when reading or writing configuration files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// INI parsing error
    #[error("INI parsing error: {0}")]
    IniParse(String),
    /// Invalid configuration value
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// All program settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Relaxation parameters
    pub optimizer: OptimizerSettings,
    /// Bond report parameters
    pub bonds: BondSettings,
    /// General program settings
    pub general: GeneralSettings,
}

/// Relaxation parameters, mirroring [`MinimizeConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerSettings {
    /// Iteration cap (default: 1000)
    pub max_iterations: u32,
    /// Gradient max-norm tolerance in eV/Angstrom (default: 1e-8)
    pub gradient_tolerance: f64,
    /// L-BFGS history size (default: 10)
    pub memory_size: usize,
    /// Per-atom step cap in Angstroms (default: 0.3)
    pub max_step: f64,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        let config = MinimizeConfig::default();
        Self {
            max_iterations: config.max_iterations,
            gradient_tolerance: config.gradient_tolerance,
            memory_size: config.memory_size,
            max_step: config.max_step,
        }
    }
}

impl OptimizerSettings {
    /// Builds the minimizer configuration these settings describe.
    pub fn to_config(&self) -> MinimizeConfig {
        MinimizeConfig {
            max_iterations: self.max_iterations,
            gradient_tolerance: self.gradient_tolerance,
            memory_size: self.memory_size,
            max_step: self.max_step,
            ..MinimizeConfig::default()
        }
    }
}

/// Bond report parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BondSettings {
    /// Inclusive bond cutoff in Angstroms (default: 2.513)
    pub threshold: f64,
}

impl Default for BondSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_BOND_THRESHOLD,
        }
    }
}

/// General program settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Output verbosity: 0 = quiet, 1 = normal, 2 = verbose (default: 0)
    pub print_level: u32,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self { print_level: 0 }
    }
}

impl Settings {
    /// Loads settings, applying `ogupta.cfg` from the working directory when
    /// present.
    ///
    /// A missing file silently yields the defaults. An unreadable or
    /// malformed file is logged as a warning and the defaults are used, so
    /// this function never fails the run.
    pub fn load() -> Settings {
        let path = Path::new(CONFIG_FILE);
        if !path.exists() {
            return Settings::default();
        }
        match Self::load_from(path) {
            Ok(settings) => {
                info!("Configuration loaded from: {}", path.display());
                settings
            }
            Err(e) => {
                warn!("Failed to load {}: {}, using defaults", path.display(), e);
                Settings::default()
            }
        }
    }

    /// Loads settings from a specific INI file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on I/O failure, unparsable INI content, or
    /// values that do not parse as the expected numeric types.
    pub fn load_from(path: &Path) -> Result<Settings, ConfigError> {
        let content = fs::read_to_string(path)?;
        let mut ini = Ini::new();
        ini.read(content)
            .map_err(|e| ConfigError::IniParse(format!("Failed to parse INI: {}", e)))?;

        let mut settings = Settings::default();

        if let Some(section) = ini.get_map_ref().get("optimizer") {
            settings.optimizer = Self::parse_optimizer(section)?;
        }
        if let Some(section) = ini.get_map_ref().get("bonds") {
            settings.bonds = Self::parse_bonds(section)?;
        }
        if let Some(section) = ini.get_map_ref().get("general") {
            settings.general = Self::parse_general(section)?;
        }

        Ok(settings)
    }

    /// Parses the optimizer section from INI configuration.
    fn parse_optimizer(
        section: &HashMap<String, Option<String>>,
    ) -> Result<OptimizerSettings, ConfigError> {
        let mut optimizer = OptimizerSettings::default();

        if let Some(Some(max_iterations)) = section.get("max_iterations") {
            optimizer.max_iterations = max_iterations.parse().map_err(|_| {
                ConfigError::InvalidValue(format!("Invalid max_iterations: {}", max_iterations))
            })?;
        }
        if let Some(Some(gradient_tolerance)) = section.get("gradient_tolerance") {
            optimizer.gradient_tolerance = gradient_tolerance.parse().map_err(|_| {
                ConfigError::InvalidValue(format!(
                    "Invalid gradient_tolerance: {}",
                    gradient_tolerance
                ))
            })?;
        }
        if let Some(Some(memory_size)) = section.get("memory_size") {
            optimizer.memory_size = memory_size.parse().map_err(|_| {
                ConfigError::InvalidValue(format!("Invalid memory_size: {}", memory_size))
            })?;
        }
        if let Some(Some(max_step)) = section.get("max_step") {
            optimizer.max_step = max_step.parse().map_err(|_| {
                ConfigError::InvalidValue(format!("Invalid max_step: {}", max_step))
            })?;
        }

        Ok(optimizer)
    }

    /// Parses the bonds section from INI configuration.
    fn parse_bonds(section: &HashMap<String, Option<String>>) -> Result<BondSettings, ConfigError> {
        let mut bonds = BondSettings::default();

        if let Some(Some(threshold)) = section.get("threshold") {
            bonds.threshold = threshold.parse().map_err(|_| {
                ConfigError::InvalidValue(format!("Invalid threshold: {}", threshold))
            })?;
        }

        Ok(bonds)
    }

    /// Parses the general section from INI configuration.
    fn parse_general(
        section: &HashMap<String, Option<String>>,
    ) -> Result<GeneralSettings, ConfigError> {
        let mut general = GeneralSettings::default();

        if let Some(Some(print_level)) = section.get("print_level") {
            general.print_level = print_level.parse().map_err(|_| {
                ConfigError::InvalidValue(format!("Invalid print_level: {}", print_level))
            })?;
        }

        Ok(general)
    }

    /// Creates an `ogupta.cfg` template file with all options and defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be written.
    pub fn create_template(path: &Path) -> Result<(), ConfigError> {
        fs::write(path, Self::template_content())?;
        info!("Created settings template at: {}", path.display());
        Ok(())
    }

    /// Generates the content for an `ogupta.cfg` template file.
    fn template_content() -> String {
        let optimizer = OptimizerSettings::default();
        let bonds = BondSettings::default();
        let general = GeneralSettings::default();
        format!(
            r#"# ogupta configuration file
#
# Place this file in the working directory as ogupta.cfg to override the
# built-in defaults. Missing sections or values fall back to the defaults
# shown below.

[optimizer]
# Maximum number of L-BFGS iterations (default: {})
max_iterations = {}

# Convergence tolerance on the gradient max-norm in eV/Angstrom (default: {:e})
gradient_tolerance = {:e}

# Number of correction pairs kept for the inverse Hessian approximation
# (default: {})
memory_size = {}

# Maximum displacement of any single atom per step in Angstroms (default: {})
max_step = {}

[bonds]
# Inclusive cutoff below which a pair counts as bonded, in Angstroms
# (default: {})
threshold = {}

[general]
# Output verbosity (default: {})
# 0 = quiet, 1 = normal, 2 = verbose
print_level = {}
"#,
            optimizer.max_iterations,
            optimizer.max_iterations,
            optimizer.gradient_tolerance,
            optimizer.gradient_tolerance,
            optimizer.memory_size,
            optimizer.memory_size,
            optimizer.max_step,
            optimizer.max_step,
            bonds.threshold,
            bonds.threshold,
            general.print_level,
            general.print_level,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_minimizer_defaults() {
        let settings = Settings::default();
        let config = settings.optimizer.to_config();
        let reference = MinimizeConfig::default();
        assert_eq!(config.max_iterations, reference.max_iterations);
        assert_eq!(config.gradient_tolerance, reference.gradient_tolerance);
        assert_eq!(config.memory_size, reference.memory_size);
        assert_eq!(config.max_step, reference.max_step);
        assert_eq!(settings.bonds.threshold, DEFAULT_BOND_THRESHOLD);
    }

    #[test]
    fn test_template_round_trips_through_parser() {
        let mut ini = Ini::new();
        ini.read(Settings::template_content()).unwrap();
        assert!(ini.get_map_ref().contains_key("optimizer"));
        assert!(ini.get_map_ref().contains_key("bonds"));
        assert!(ini.get_map_ref().contains_key("general"));
    }

    #[test]
    fn test_partial_override() {
        let dir = std::env::temp_dir().join("ogupta_settings_test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("partial.cfg");
        fs::write(&path, "[optimizer]\nmax_iterations = 50\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.optimizer.max_iterations, 50);
        // Everything not named keeps its default
        assert_eq!(
            settings.optimizer.memory_size,
            OptimizerSettings::default().memory_size
        );
        assert_eq!(settings.bonds.threshold, DEFAULT_BOND_THRESHOLD);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_invalid_value_is_an_error() {
        let dir = std::env::temp_dir().join("ogupta_settings_test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("invalid.cfg");
        fs::write(&path, "[bonds]\nthreshold = wide\n").unwrap();

        assert!(matches!(
            Settings::load_from(&path),
            Err(ConfigError::InvalidValue(_))
        ));

        fs::remove_file(&path).unwrap();
    }
}
