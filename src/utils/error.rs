use thiserror::Error;

use crate::render::layout::LayoutError;
use crate::render::shaders::ShaderError;
use crate::render::texture::ResourceError;
use crate::window::ContextError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error("Vertex layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Context error: {0}")]
    Context(#[from] ContextError),

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

pub type Result<T> = std::result::Result<T, Error>;
