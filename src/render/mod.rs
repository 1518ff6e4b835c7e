pub mod backend;
pub mod layout;
pub mod mesh;
pub mod resources;
pub mod scene;
pub mod shaders;
pub mod texture;

pub use mesh::{Mesh, MeshData};
pub use scene::Scene;
pub use shaders::ShaderProgram;
pub use texture::Texture;
