//! Configuration file support
//!
//! A TOML file with every field optional:
//!
//! ```toml
//! [predicates]
//! function = ["GENE", "ENZYME"]
//!
//! [grounding]
//! category_inference = "signature"   # or "name-prefix"
//! guards = "ignore"                  # or "enforce"
//!
//! [encoder]
//! noise_threshold = 1e-12
//! ```
//!
//! Lookup order for `load_default`: `KBSDP_CONFIG`, then `kbsdp.toml` in the
//! current directory, then built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::ground::{CategoryInference, GroundingOptions, GuardMode};
use crate::signature::PredicateSignatures;

/// Configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Relation name → ordered argument categories
    pub predicates: PredicateSignatures,

    /// Grounding settings
    pub grounding: GroundingConfig,

    /// Encoder settings
    pub encoder: EncoderConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundingConfig {
    pub category_inference: CategoryInference,
    pub guards: GuardMode,
}

impl GroundingConfig {
    pub fn options(&self) -> GroundingOptions {
        GroundingOptions {
            inference: self.category_inference,
            guards: self.guards,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Coefficients with magnitude at or below this are treated as zero
    pub noise_threshold: f64,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            noise_threshold: crate::sdp::NOISE_THRESHOLD,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            predicates: PredicateSignatures::pathway_defaults(),
            grounding: GroundingConfig::default(),
            encoder: EncoderConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Find and load a configuration file, falling back to defaults
    pub fn load_default() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var("KBSDP_CONFIG") {
            return Self::load(Path::new(&path));
        }
        let local = PathBuf::from("kbsdp.toml");
        if local.exists() {
            return Self::load(&local);
        }
        Ok(Self::default())
    }
}
