//! Error types for the ImGui render bridge

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while setting up the bridge
#[derive(Error, Debug)]
pub enum InitError {
    /// Failed to create OpenGL buffer object
    #[error("Failed to create buffer object: {0}")]
    CreateBufferObject(String),

    /// Failed to create OpenGL texture
    #[error("Failed to create texture: {0}")]
    CreateTexture(String),

    /// Failed to read a shader source file from disk
    #[error("Failed to read shader source {}: {source}", path.display())]
    ReadShader {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create OpenGL shader
    #[error("Failed to create shader: {0}")]
    CreateShader(String),

    /// Failed to compile shader
    #[error("Failed to compile shader: {0}")]
    CompileShader(String),

    /// Failed to link shader program
    #[error("Failed to link program: {0}")]
    LinkProgram(String),

    /// Failed to create vertex array object
    #[error("Failed to create vertex array: {0}")]
    CreateVertexArray(String),

    /// The font atlas produced no usable pixel data
    #[error("Font atlas unavailable: {0}")]
    FontAtlas(String),
}

/// Errors that can occur during rendering
#[derive(Error, Debug)]
pub enum RenderError {
    /// A draw command carried a user callback; the bridge only replays plain geometry
    #[error("Unsupported draw command: user callbacks are not implemented")]
    UnsupportedCallback,

    /// Failed to (re)create a GPU resource mid-frame
    #[error("OpenGL error: {0}")]
    OpenGLError(String),

    /// Draw command referenced a texture the bridge cannot resolve
    #[error("Invalid texture: {0}")]
    InvalidTexture(String),

    /// Bridge resources were already released
    #[error("Renderer was destroyed")]
    RendererDestroyed,

    /// Rebuilding the font texture failed
    #[error("Font texture rebuild failed: {0}")]
    FontRebuild(#[from] InitError),
}

/// Result type for initialization operations
pub type InitResult<T> = Result<T, InitError>;

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
