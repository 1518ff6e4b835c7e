pub mod config;
pub mod render;
pub mod utils;
pub mod window;

// Re-export commonly used types
pub use config::core::AppConfig;
pub use render::backend::{GlBackend, NativeGl};
pub use render::layout::{VertexAttribute, VertexLayout};
pub use render::scene::{Lesson, Scene};
pub use render::shaders::{compile_program, ShaderPolicy, ShaderProgram, ShaderSource};
pub use utils::error::{Error, Result};
pub use window::RenderWindow;
