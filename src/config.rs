//! Calculator settings.
//!
//! Settings come from an optional TOML file and can be overridden from the
//! command line. Every field has a default, so an empty file is valid:
//!
//! ```toml
//! precision = 100
//! strategy = "exhaustive"
//! max_twins = 80
//! ```

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::optimizer::MAX_TWINS;
use crate::solver::DEFAULT_PRECISION;

/// How the goal optimizer walks the twin-count range.
///
/// The same lowercase names are accepted in config files and on the
/// command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SearchStrategy {
    /// Evaluate every twin count; always finds the global minimum.
    #[default]
    Exhaustive,
    /// Narrow a bracket around a local minimum; exact only when the wait
    /// time is unimodal in the twin count.
    Bracketed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Significant digits used by the root solver
    pub precision: u64,
    pub strategy: SearchStrategy,
    /// Cap on the total number of twins a unit can have
    pub max_twins: u64,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        CalculatorConfig {
            precision: DEFAULT_PRECISION,
            strategy: SearchStrategy::default(),
            max_twins: MAX_TWINS,
        }
    }
}

impl CalculatorConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: CalculatorConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.precision == 0 {
            return Err(Error::InvalidConfig(
                "precision must be at least 1 digit".to_string(),
            ));
        }
        Ok(())
    }
}
