pub mod core;
pub mod file;
pub mod rendering;
pub mod window;

pub use self::core::AppConfig;
pub use file::{load_or_create_config, load_or_create_config_at};
pub use rendering::{ShaderConfig, TextureConfig};
pub use window::WindowConfig;
