use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::config::rendering::{ShaderConfig, TextureConfig};
use crate::config::window::WindowConfig;
use crate::render::scene::Lesson;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
    pub lesson: Lesson,
    pub clear_color: [f32; 4],
    pub window: WindowConfig,
    pub shaders: ShaderConfig,
    pub texture: TextureConfig,
}

impl AppConfig {
    /// Unknown level names fall back to `Info`.
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            lesson: Lesson::TexturedQuad,
            clear_color: [0.2, 0.3, 0.3, 1.0],
            window: WindowConfig::default(),
            shaders: ShaderConfig::default(),
            texture: TextureConfig::default(),
        }
    }
}
