//! Open Source Level Viewer
//!
//! Opens one OpenGL window, clears it every frame and draws the main menu
//! bar through [`oslv_imgui_glow`]. [`run`] blocks until the window closes.
//!
//! ```no_run
//! use oslv_app::{ViewerConfig, run};
//!
//! fn main() {
//!     run(ViewerConfig::default()).unwrap();
//! }
//! ```

mod app;
mod config;
mod error;
mod input;
mod menu;
mod viewer;
mod window;

pub use app::run;
pub use config::{RedrawMode, SHADER_DIR, ViewerConfig, default_shader_paths};
pub use error::ViewerError;
pub use input::{InputState, to_imgui_mouse_button, winit_key_to_imgui_key};
pub use menu::{MenuAction, draw_main_menu};
pub use viewer::{FrameHandler, Viewer};
pub use window::GlWindow;
