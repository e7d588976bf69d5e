//! Dear ImGui to OpenGL bridge for the Open Source Level Viewer
//!
//! This crate owns everything the GUI needs on the GPU side (a shader program,
//! grow-only vertex/index buffers and the font atlas texture) and replays the
//! draw lists Dear ImGui produces each frame as scissor-clipped indexed draws.
//! It also forwards polled window input into Dear ImGui's IO state.
//!
//! # Example
//!
//! ```rust,no_run
//! use oslv_imgui_glow::{ImguiBridge, InputSource, ShaderPaths};
//! use std::rc::Rc;
//!
//! # fn frame(gl: glow::Context, input: &dyn InputSource) -> Result<(), Box<dyn std::error::Error>> {
//! let gl = Rc::new(gl);
//! let shaders = ShaderPaths::new("assets/shaders/imgui.vert", "assets/shaders/imgui.frag");
//! let mut bridge = ImguiBridge::new(gl, [1600, 900], &shaders)?;
//!
//! // Each tick:
//! let ui = bridge.update(1.0 / 60.0, input);
//! ui.text("hello");
//! bridge.render()?;
//! # Ok(())
//! # }
//! ```

// Re-export glow to make it easier for users to use the correct version.
pub use glow;
use glow::{Context, HasContext};

mod bridge;
mod buffers;
mod error;
mod frame;
mod input;
mod renderer;
mod replay;
mod shaders;
mod texture;
mod theme;
mod versions;

pub use bridge::*;
pub use buffers::*;
pub use error::*;
pub use frame::*;
pub use input::*;
pub use renderer::*;
pub use replay::*;
pub use shaders::*;
pub use texture::*;
pub use theme::*;
pub use versions::*;

pub type GlBuffer = <Context as HasContext>::Buffer;
pub type GlTexture = <Context as HasContext>::Texture;
pub type GlVertexArray = <Context as HasContext>::VertexArray;
pub type GlProgram = <Context as HasContext>::Program;
pub type GlUniformLocation = <Context as HasContext>::UniformLocation;

/// Convert a slice to a byte slice
#[inline]
fn to_byte_slice<T>(slice: &[T]) -> &[u8] {
    unsafe { std::slice::from_raw_parts(slice.as_ptr() as *const u8, std::mem::size_of_val(slice)) }
}
