use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::layout::LayoutConfig;
use crate::network::GenerationParams;

pub const PRESET_FILE_NAME: &str = "preset.json";

/// Saved generation and layout parameters. Graphs are never persisted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preset {
    pub generation: GenerationParams,
    pub layout: LayoutConfig,
}

impl Preset {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read preset {}", path.display()))?;
        let preset = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse preset {}", path.display()))?;
        info!(path = %path.display(), "loaded preset");
        Ok(preset)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let text = serde_json::to_string_pretty(self).context("failed to encode preset")?;
        fs::write(path, text)
            .with_context(|| format!("failed to write preset {}", path.display()))?;
        info!(path = %path.display(), "saved preset");
        Ok(())
    }
}
