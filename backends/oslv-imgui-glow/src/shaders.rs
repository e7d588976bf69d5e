//! Shader program loading for GUI rendering

use crate::{GlProgram, GlUniformLocation, InitError, InitResult};
use glow::{Context, HasContext};
use std::fs;
use std::path::{Path, PathBuf};

/// Attribute location of the vertex position
pub const ATTRIB_POSITION: u32 = 0;
/// Attribute location of the texture coordinate
pub const ATTRIB_TEX_COORD: u32 = 1;
/// Attribute location of the packed vertex color
pub const ATTRIB_COLOR: u32 = 2;

const ATTRIBUTES: [(u32, &str); 3] = [
    (ATTRIB_POSITION, "in_position"),
    (ATTRIB_TEX_COORD, "in_texCoord"),
    (ATTRIB_COLOR, "in_color"),
];

const UNIFORM_PROJECTION: &str = "projection_matrix";
const UNIFORM_TEXTURE: &str = "in_fontTexture";

/// Locations of the vertex and fragment shader sources on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderPaths {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

impl ShaderPaths {
    pub fn new(vertex: impl Into<PathBuf>, fragment: impl Into<PathBuf>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }
}

/// Linked shader program and its uniform locations
pub struct Shaders {
    pub program: Option<GlProgram>,
    pub projection_location: Option<GlUniformLocation>,
    pub texture_location: Option<GlUniformLocation>,
}

impl Shaders {
    /// Read both sources from disk, then compile and link them
    pub fn from_files(gl: &Context, paths: &ShaderPaths) -> InitResult<Self> {
        let vertex_source = read_source(&paths.vertex)?;
        let fragment_source = read_source(&paths.fragment)?;
        tracing::debug!(
            target: "oslv-imgui-glow",
            vertex = %paths.vertex.display(),
            fragment = %paths.fragment.display(),
            "compiling GUI shaders"
        );
        Self::compile(gl, &vertex_source, &fragment_source)
    }

    /// Compile and link a program from in-memory sources.
    ///
    /// Attribute locations are bound before linking, so the sources need no
    /// `layout(location = ...)` qualifiers.
    pub fn compile(gl: &Context, vertex_source: &str, fragment_source: &str) -> InitResult<Self> {
        unsafe {
            let vertex_shader = gl
                .create_shader(glow::VERTEX_SHADER)
                .map_err(InitError::CreateShader)?;
            gl.shader_source(vertex_shader, vertex_source);
            gl.compile_shader(vertex_shader);

            if !gl.get_shader_compile_status(vertex_shader) {
                let error = gl.get_shader_info_log(vertex_shader);
                gl.delete_shader(vertex_shader);
                return Err(InitError::CompileShader(format!("Vertex shader: {}", error)));
            }

            let fragment_shader = match gl.create_shader(glow::FRAGMENT_SHADER) {
                Ok(shader) => shader,
                Err(e) => {
                    gl.delete_shader(vertex_shader);
                    return Err(InitError::CreateShader(e));
                }
            };
            gl.shader_source(fragment_shader, fragment_source);
            gl.compile_shader(fragment_shader);

            if !gl.get_shader_compile_status(fragment_shader) {
                let error = gl.get_shader_info_log(fragment_shader);
                gl.delete_shader(vertex_shader);
                gl.delete_shader(fragment_shader);
                return Err(InitError::CompileShader(format!(
                    "Fragment shader: {}",
                    error
                )));
            }

            let program = match gl.create_program() {
                Ok(program) => program,
                Err(e) => {
                    gl.delete_shader(vertex_shader);
                    gl.delete_shader(fragment_shader);
                    return Err(InitError::CreateShader(e));
                }
            };
            gl.attach_shader(program, vertex_shader);
            gl.attach_shader(program, fragment_shader);
            for (location, name) in ATTRIBUTES {
                gl.bind_attrib_location(program, location, name);
            }
            gl.link_program(program);

            if !gl.get_program_link_status(program) {
                let error = gl.get_program_info_log(program);
                gl.delete_shader(vertex_shader);
                gl.delete_shader(fragment_shader);
                gl.delete_program(program);
                return Err(InitError::LinkProgram(error));
            }

            gl.detach_shader(program, vertex_shader);
            gl.detach_shader(program, fragment_shader);
            gl.delete_shader(vertex_shader);
            gl.delete_shader(fragment_shader);

            let projection_location = gl.get_uniform_location(program, UNIFORM_PROJECTION);
            let texture_location = gl.get_uniform_location(program, UNIFORM_TEXTURE);
            if projection_location.is_none() {
                tracing::warn!(target: "oslv-imgui-glow", "uniform `{UNIFORM_PROJECTION}` not found");
            }

            Ok(Self {
                program: Some(program),
                projection_location,
                texture_location,
            })
        }
    }

    /// Delete the program; later calls are no-ops
    pub fn destroy(&mut self, gl: &Context) {
        if let Some(program) = self.program.take() {
            unsafe { gl.delete_program(program) };
        }
    }
}

fn read_source(path: &Path) -> InitResult<String> {
    fs::read_to_string(path).map_err(|source| InitError::ReadShader {
        path: path.to_path_buf(),
        source,
    })
}
