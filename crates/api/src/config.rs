//! Editor configuration.

use anyhow::Context as _;
use node::{GridSettings, DEFAULT_STATUS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings the properties editor reads. Every field has a default, so an
/// empty JSON object is a valid config file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub grid: GridSettings,
    /// Status written into newly assigned compartments.
    pub default_status: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid: GridSettings::default(),
            default_status: DEFAULT_STATUS.to_string(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(json).context("invalid editor config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("in {}", path.display()))
    }

    fn validate(&self) -> anyhow::Result<()> {
        let grid = &self.grid;
        for (name, step) in [
            ("fineStep", grid.fine_step),
            ("coarseStep", grid.coarse_step),
            ("compartmentCell", grid.compartment_cell),
        ] {
            anyhow::ensure!(step.is_finite() && step > 0.0, "grid.{name} must be positive, got {step}");
        }
        anyhow::ensure!(!self.default_status.trim().is_empty(), "defaultStatus must not be empty");
        Ok(())
    }
}
