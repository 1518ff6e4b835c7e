// scene.rs - the fixed lessons and their per-frame draw

use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::render::backend::{GlBackend, Primitive};
use crate::render::layout::{LayoutError, VertexLayout};
use crate::render::mesh::{Mesh, MeshData};
use crate::render::shaders::{compile_program, ShaderPolicy, ShaderProgram, ShaderSource};
use crate::render::texture::Texture;
use crate::utils::error::Result;

/// Built-in shader sources, one pair per lesson.
pub mod lesson_shaders {
    pub const TRIANGLE_VERTEX: &str = r#"#version 330 core
layout (location = 0) in vec3 aPos;

void main()
{
    gl_Position = vec4(aPos.x, aPos.y, aPos.z, 1.0);
}
"#;

    pub const TRIANGLE_FRAGMENT: &str = r#"#version 330 core
out vec4 FragColor;

void main()
{
    FragColor = vec4(1.0f, 0.5f, 0.2f, 1.0f);
}
"#;

    pub const COLORED_VERTEX: &str = r#"#version 330 core
layout (location = 0) in vec3 aPos;
layout (location = 1) in vec3 aColor;
layout (location = 2) in vec2 aTexCoord;

out vec3 ourColor;
out vec2 TexCoord;

void main()
{
    gl_Position = vec4(aPos, 1.0);
    ourColor = aColor;
    TexCoord = aTexCoord;
}
"#;

    pub const COLORED_FRAGMENT: &str = r#"#version 330 core
out vec4 FragColor;

in vec3 ourColor;
in vec2 TexCoord;

void main()
{
    FragColor = vec4(ourColor, 1.0);
}
"#;

    pub const TEXTURED_FRAGMENT: &str = r#"#version 330 core
out vec4 FragColor;

in vec3 ourColor;
in vec2 TexCoord;

uniform sampler2D texture1;

void main()
{
    FragColor = texture(texture1, TexCoord) * vec4(ourColor, 1.0);
}
"#;
}

/// Sampler uniform of the textured lesson, bound to texture unit 0.
pub const TEXTURE_SAMPLER_UNIFORM: &str = "texture1";

#[rustfmt::skip]
const TRIANGLE_VERTICES: [f32; 9] = [
    -0.5, -0.5, 0.0,
     0.5, -0.5, 0.0,
     0.0,  0.5, 0.0,
];

#[rustfmt::skip]
const QUAD_VERTICES: [f32; 32] = [
    // positions       // colors        // texture coords
     0.5,  0.5, 0.0,   1.0, 0.0, 0.0,   1.0, 1.0, // top right
     0.5, -0.5, 0.0,   0.0, 1.0, 0.0,   1.0, 0.0, // bottom right
    -0.5, -0.5, 0.0,   0.0, 0.0, 1.0,   0.0, 0.0, // bottom left
    -0.5,  0.5, 0.0,   1.0, 1.0, 0.0,   0.0, 1.0, // top left
];

#[rustfmt::skip]
const QUAD_INDICES: [u32; 6] = [
    0, 1, 3, // first triangle
    1, 2, 3, // second triangle
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Lesson {
    Triangle,
    IndexedQuad,
    TexturedQuad,
}

impl Lesson {
    pub fn mesh_data(self) -> MeshData {
        match self {
            Lesson::Triangle => MeshData {
                vertices: TRIANGLE_VERTICES.to_vec(),
                indices: Vec::new(),
            },
            Lesson::IndexedQuad | Lesson::TexturedQuad => MeshData {
                vertices: QUAD_VERTICES.to_vec(),
                indices: QUAD_INDICES.to_vec(),
            },
        }
    }

    pub fn layout(self) -> std::result::Result<VertexLayout, LayoutError> {
        match self {
            Lesson::Triangle => VertexLayout::interleaved_f32(&[(0, 3)]),
            Lesson::IndexedQuad | Lesson::TexturedQuad => {
                VertexLayout::interleaved_f32(&[(0, 3), (1, 3), (2, 2)])
            }
        }
    }

    pub fn sources(self) -> (ShaderSource, ShaderSource) {
        use lesson_shaders::*;

        let (vertex, fragment) = match self {
            Lesson::Triangle => (TRIANGLE_VERTEX, TRIANGLE_FRAGMENT),
            Lesson::IndexedQuad => (COLORED_VERTEX, COLORED_FRAGMENT),
            Lesson::TexturedQuad => (COLORED_VERTEX, TEXTURED_FRAGMENT),
        };
        (ShaderSource::new(vertex), ShaderSource::new(fragment))
    }

    pub fn is_textured(self) -> bool {
        self == Lesson::TexturedQuad
    }
}

/// Everything one lesson draws each frame: built once, released on drop.
pub struct Scene<'gl, B: GlBackend> {
    gl: &'gl B,
    lesson: Lesson,
    program: Option<ShaderProgram<'gl, B>>,
    mesh: Mesh<'gl, B>,
    texture: Option<Texture<'gl, B>>,
}

impl<'gl, B: GlBackend> Scene<'gl, B> {
    pub fn build(gl: &'gl B, config: &AppConfig) -> Result<Self> {
        let lesson = config.lesson;
        let policy = ShaderPolicy::from_strict(config.shaders.strict);
        log::info!("Building lesson {:?} ({:?} shaders)", lesson, policy);

        // Each override replaces only its own stage.
        let (builtin_vertex, builtin_fragment) = lesson.sources();
        let vertex = match &config.shaders.vertex_path {
            Some(path) => ShaderSource::from_file(path),
            None => Ok(builtin_vertex),
        };
        let fragment = match &config.shaders.fragment_path {
            Some(path) => ShaderSource::from_file(path),
            None => Ok(builtin_fragment),
        };
        let built = vertex
            .and_then(|vs| fragment.map(|fs| (vs, fs)))
            .and_then(|(vs, fs)| compile_program(gl, &vs, &fs));
        let mut program = policy.resolve(built)?;

        if lesson.is_textured() {
            if let Some(program) = program.as_mut() {
                program.set_uniform_i32(TEXTURE_SAMPLER_UNIFORM, 0)?;
            }
        }

        let mesh = Mesh::upload(gl, &lesson.mesh_data(), &lesson.layout()?, Primitive::Triangles)?;

        let texture = lesson.is_textured().then(|| {
            Texture::from_file_or_blank(
                gl,
                &config.texture.path,
                &config.texture.sampler(),
                config.texture.flip_vertically,
            )
        });

        Ok(Self {
            gl,
            lesson,
            program,
            mesh,
            texture,
        })
    }

    pub fn lesson(&self) -> Lesson {
        self.lesson
    }

    pub fn has_program(&self) -> bool {
        self.program.is_some()
    }

    pub fn mesh(&self) -> &Mesh<'gl, B> {
        &self.mesh
    }

    pub fn texture(&self) -> Option<&Texture<'gl, B>> {
        self.texture.as_ref()
    }

    pub fn draw(&self) {
        match &self.program {
            Some(program) => program.set_used(),
            None => self.gl.use_program(0),
        }
        if let Some(texture) = &self.texture {
            texture.bind(0);
        }
        self.mesh.draw();
    }

    pub fn render_frame(&self, clear_color: [f32; 4]) {
        self.gl.clear_color(clear_color);
        self.gl.clear();
        self.draw();
    }
}
