use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

use crate::config::core::AppConfig;

const CONFIG_FILE: &str = "learngl.toml";

/// Loads the user's config, writing the defaults first if none exists yet.
pub fn load_or_create_config() -> Result<AppConfig> {
    let config_path = get_config_path()?;
    load_or_create_config_at(&config_path)
}

pub fn load_or_create_config_at(config_path: &Path) -> Result<AppConfig> {
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    if !config_path.exists() {
        let default_config = AppConfig::default();
        let toml_content = toml::to_string_pretty(&default_config)?;
        std::fs::write(config_path, toml_content).context("Failed to write default config")?;
        return Ok(default_config);
    }

    let content = std::fs::read_to_string(config_path).context("Failed to read config file")?;
    toml::from_str(&content).context("Failed to parse config file")
}

fn get_config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "learngl", "LearnGL")
        .context("Couldn't determine project directory")?;
    Ok(proj_dirs.config_dir().join(CONFIG_FILE))
}
