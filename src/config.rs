//! Problem-level configuration.
//!
//! Describes the shape of the term (weeks, days per week) every time in an
//! instance must share, and the ITC optimization weights used to fold the
//! penalty components of a timetable into a single objective.
//!
//! # Examples
//!
//! ```
//! use u_timetable::config::TimetableConfig;
//!
//! let config = TimetableConfig::from_toml_str(r#"
//!     [geometry]
//!     nr_weeks = 13
//!     nr_days = 5
//!
//!     [weights]
//!     time = 2
//!     distribution = 10
//! "#).unwrap();
//!
//! assert_eq!(config.geometry.nr_weeks, 13);
//! assert_eq!(config.weights.room, 1);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::MAX_DAYS;

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration for a timetabling instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableConfig {
    /// Term shape.
    #[serde(default)]
    pub geometry: TermGeometry,

    /// Objective weights.
    #[serde(default)]
    pub weights: OptimizationWeights,
}

/// Number of weeks in the term and days in each week.
///
/// Every `Time` of an instance carries week and day bit-vectors of exactly
/// these widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermGeometry {
    #[serde(default = "default_nr_weeks")]
    pub nr_weeks: usize,
    #[serde(default = "default_nr_days")]
    pub nr_days: usize,
}

/// ITC 2019 optimization weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationWeights {
    #[serde(default = "default_weight")]
    pub time: u64,
    #[serde(default = "default_weight")]
    pub room: u64,
    #[serde(default = "default_weight")]
    pub distribution: u64,
    #[serde(default = "default_weight")]
    pub student: u64,
}

fn default_nr_weeks() -> usize {
    1
}

fn default_nr_days() -> usize {
    MAX_DAYS
}

fn default_weight() -> u64 {
    1
}

impl Default for TermGeometry {
    fn default() -> Self {
        Self {
            nr_weeks: default_nr_weeks(),
            nr_days: default_nr_days(),
        }
    }
}

impl TermGeometry {
    /// Creates a geometry with the given term shape.
    pub fn new(nr_weeks: usize, nr_days: usize) -> Self {
        Self { nr_weeks, nr_days }
    }
}

impl Default for OptimizationWeights {
    fn default() -> Self {
        Self {
            time: 1,
            room: 1,
            distribution: 1,
            student: 1,
        }
    }
}

impl TimetableConfig {
    /// Creates a default configuration (one week of seven days, unit weights).
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and validates configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::from_toml_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads configuration from a TOML file without validating it.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Sets the term geometry.
    pub fn with_geometry(mut self, geometry: TermGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Sets the optimization weights.
    pub fn with_weights(mut self, weights: OptimizationWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Checks that the geometry describes a usable term.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.geometry.nr_weeks == 0 {
            return Err(ConfigError::Invalid(
                "nr_weeks must be at least 1".to_string(),
            ));
        }
        if self.geometry.nr_days == 0 || self.geometry.nr_days > MAX_DAYS {
            return Err(ConfigError::Invalid(format!(
                "nr_days must be between 1 and {MAX_DAYS}, got {}",
                self.geometry.nr_days
            )));
        }
        Ok(())
    }
}
