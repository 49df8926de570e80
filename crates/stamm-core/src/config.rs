//! Configuration for scene geometry and archive storage.
//!
//! Load order: `stamm.toml` → environment variables → defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name looked up in the project directory.
pub const CONFIG_FILE: &str = "stamm.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StammConfig {
    pub scene: SceneConfig,
    pub storage: StorageConfig,
}

/// Pixel geometry used when a layout is turned into a drawable scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub box_width: f64,
    pub box_height: f64,
    /// Horizontal gap between neighbouring boxes.
    pub x_padding: f64,
    /// Vertical gap between generations.
    pub y_padding: f64,
    /// Offset of the first generation from the top edge.
    pub margin: f64,
    /// Smallest left offset of a centred row.
    pub min_left: f64,
    /// Added to the content extent on both axes.
    pub scene_padding: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            box_width: 160.0,
            box_height: 60.0,
            x_padding: 50.0,
            y_padding: 120.0,
            margin: 50.0,
            min_left: 20.0,
            scene_padding: 100.0,
        }
    }
}

/// Compression method for entries written into a `.stamm` archive.
/// Reading detects the method per entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compression {
    Stored,
    #[default]
    Deflate,
    Zstd,
}

/// Storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub compression: Compression,
}

/// Helper to parse an env var and apply it to a config field.
fn env_override<T: std::str::FromStr>(var: &str, target: &mut T) {
    if let Ok(v) = std::env::var(var)
        && let Ok(n) = v.parse()
    {
        *target = n;
    }
}

impl StammConfig {
    /// Load config from `stamm.toml` in the project root, with env var overrides.
    /// Falls back to defaults if no config file exists.
    pub fn load(project_root: &Path) -> Result<Self> {
        let config_path = project_root.join(CONFIG_FILE);

        let mut config: Self = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("failed to read {}", config_path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("invalid config in {}", config_path.display()))?
        } else {
            Self::default()
        };

        env_override("STAMM_BOX_WIDTH", &mut config.scene.box_width);
        env_override("STAMM_BOX_HEIGHT", &mut config.scene.box_height);
        env_override("STAMM_X_PADDING", &mut config.scene.x_padding);
        env_override("STAMM_Y_PADDING", &mut config.scene.y_padding);

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let scene = &self.scene;
        if scene.box_width <= 0.0 || scene.box_height <= 0.0 {
            anyhow::bail!(
                "box size must be positive, got {}x{}",
                scene.box_width,
                scene.box_height
            );
        }
        if scene.x_padding < 0.0 || scene.y_padding < 0.0 || scene.margin < 0.0 {
            anyhow::bail!("paddings and margin must not be negative");
        }
        Ok(())
    }
}
