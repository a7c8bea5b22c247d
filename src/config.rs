use crate::error::{BoardError, Result};
use crate::render::LayoutConfig;
use crate::seed::SeedMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Board-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSettings {
    pub name: String,
    pub seed_mode: SeedMode,
    /// JSON seed file; the built-in client table is used when absent
    pub seed_file: Option<PathBuf>,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            name: "Shipping Requests".to_string(),
            seed_mode: SeedMode::Seeded,
            seed_file: None,
        }
    }
}

/// Synthetic drag parameters used by the drag check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragSettings {
    pub steps: u32,
    pub step_delay_ms: u64,
}

impl Default for DragSettings {
    fn default() -> Self {
        Self {
            steps: 20,
            step_delay_ms: 10,
        }
    }
}

/// Top-level configuration, read from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub board: BoardSettings,
    pub layout: LayoutConfig,
    pub drag: DragSettings,
}

impl BoardConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML config file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(BoardError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let contents = fs::read_to_string(path).await?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        let layout = &self.layout;
        let dimensions = [
            ("layout.column_width", layout.column_width),
            ("layout.header_height", layout.header_height),
            ("layout.card_height", layout.card_height),
        ];
        for (name, value) in dimensions {
            if !(value.is_finite() && value > 0.0) {
                return Err(BoardError::Config(format!("{name} must be positive, got {value}")));
            }
        }
        if !(layout.min_column_height.is_finite() && layout.min_column_height >= 0.0) {
            return Err(BoardError::Config(
                "layout.min_column_height must not be negative".to_string(),
            ));
        }
        if self.drag.steps == 0 {
            return Err(BoardError::Config("drag.steps must be at least 1".to_string()));
        }
        Ok(())
    }
}
