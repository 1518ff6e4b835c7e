use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::render::texture::{SamplerSettings, TextureFilter, TextureWrap};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderConfig {
    /// Abort on shader compile/link errors instead of logging and drawing on.
    pub strict: bool,
    /// Replaces the lesson's built-in vertex stage. Either path may be set alone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertex_path: Option<PathBuf>,
    /// Replaces the lesson's built-in fragment stage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fragment_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    pub path: PathBuf,
    pub flip_vertically: bool,
    pub wrap: TextureWrap,
    pub min_filter: TextureFilter,
    pub mag_filter: TextureFilter,
}

impl TextureConfig {
    pub fn sampler(&self) -> SamplerSettings {
        SamplerSettings {
            wrap: self.wrap,
            min_filter: self.min_filter,
            mag_filter: self.mag_filter,
        }
    }
}

impl Default for TextureConfig {
    fn default() -> Self {
        let sampler = SamplerSettings::default();
        Self {
            path: PathBuf::from("assets/textures/container.jpg"),
            flip_vertically: true,
            wrap: sampler.wrap,
            min_filter: sampler.min_filter,
            mag_filter: sampler.mag_filter,
        }
    }
}
