use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{RegressionErr, Result};

pub const DEFAULT_LEARNING_RATE: f64 = 0.01;
pub const DEFAULT_MAX_EPOCHS: usize = 1000;
pub const DEFAULT_BATCH_SIZE: usize = 32;

/// Hyperparameters for a training run.
///
/// Every field is optional in the JSON form and falls back to its default:
///
/// ```json
/// { "learning_rate": 0.05, "max_epochs": 500, "batch_size": 16, "seed": 7 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainerConfig {
    pub learning_rate: f64,
    pub max_epochs: usize,
    pub batch_size: usize,
    /// Seeds the shuffle generator. `None` draws a fresh seed from the OS.
    pub seed: Option<u64>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            max_epochs: DEFAULT_MAX_EPOCHS,
            batch_size: DEFAULT_BATCH_SIZE,
            seed: None,
        }
    }
}

impl TrainerConfig {
    /// Parses a configuration from a JSON document.
    ///
    /// # Errors
    /// Returns `RegressionErr::Config` if the document is not valid JSON or
    /// holds unknown or mistyped fields.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| RegressionErr::Config(format!("invalid JSON: {e}")))
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    /// Returns `RegressionErr::Config` if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| RegressionErr::Config(format!("cannot read '{}': {e}", path.display())))?;

        Self::from_json_str(&content)
    }

    /// Checks every hyperparameter against its valid range.
    ///
    /// # Errors
    /// Returns `RegressionErr::InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(RegressionErr::InvalidConfig("batch size must be positive"));
        }

        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(RegressionErr::InvalidConfig(
                "learning rate must be a positive finite number",
            ));
        }

        if self.max_epochs == 0 {
            return Err(RegressionErr::InvalidConfig("max epochs must be positive"));
        }

        Ok(())
    }
}
