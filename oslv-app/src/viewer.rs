//! Per-frame work of the viewer

use std::rc::Rc;
use std::time::Instant;

use glow::HasContext;
use oslv_imgui_glow::{ImguiBridge, InputSource};
use tracing::{debug, info};
use winit::dpi::PhysicalSize;

use crate::{ViewerConfig, ViewerError, draw_main_menu};

/// Hooks the window loop calls into; all calls happen on the loop thread
pub trait FrameHandler {
    /// The framebuffer now has `size` pixels
    fn resized(&mut self, size: PhysicalSize<u32>);

    fn scale_factor_changed(&mut self, scale_factor: f64);

    /// Build and draw one frame. Presenting is left to the caller.
    fn render_frame(&mut self, input: &dyn InputSource) -> Result<(), ViewerError>;

    /// A character was typed
    fn text_input(&mut self, character: char);

    /// Wheel movement in lines, `[horizontal, vertical]`
    fn scrolled(&mut self, delta: [f32; 2]);

    /// Release GPU resources while the GL context is still current
    fn shutdown(&mut self);
}

/// Clears the window and draws the main menu through the GUI bridge
pub struct Viewer {
    gl: Rc<glow::Context>,
    bridge: ImguiBridge,
    clear_color: [f32; 4],
    last_frame: Option<Instant>,
    first_delta_time: f32,
}

impl Viewer {
    pub fn new(
        gl: Rc<glow::Context>,
        size: PhysicalSize<u32>,
        scale_factor: f64,
        config: &ViewerConfig,
    ) -> Result<Self, ViewerError> {
        let mut bridge = ImguiBridge::new(Rc::clone(&gl), [size.width, size.height], &config.shaders)?;
        bridge.set_scale_factor(scale_factor as f32);

        unsafe {
            gl.enable(glow::DEPTH_TEST);
        }

        Ok(Self {
            gl,
            bridge,
            clear_color: config.clear_color,
            last_frame: None,
            first_delta_time: config.initial_delta_time,
        })
    }

    fn next_delta_time(&mut self) -> f32 {
        let now = Instant::now();
        let delta = match self.last_frame {
            Some(last) => (now - last).as_secs_f32(),
            None => self.first_delta_time,
        };
        self.last_frame = Some(now);
        delta
    }
}

impl FrameHandler for Viewer {
    fn resized(&mut self, size: PhysicalSize<u32>) {
        self.bridge.on_resize(size.width, size.height);
    }

    fn scale_factor_changed(&mut self, scale_factor: f64) {
        debug!("scale factor changed to {scale_factor}");
        self.bridge.set_scale_factor(scale_factor as f32);
    }

    fn render_frame(&mut self, input: &dyn InputSource) -> Result<(), ViewerError> {
        let delta_time = self.next_delta_time();
        let ui = self.bridge.update(delta_time, input);

        let [r, g, b, a] = self.clear_color;
        unsafe {
            self.gl.clear_color(r, g, b, a);
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }

        if let Some(action) = draw_main_menu(ui) {
            info!("menu item selected: {}", action.label());
        }

        self.bridge.render()?;
        Ok(())
    }

    fn text_input(&mut self, character: char) {
        self.bridge.press_char(character);
    }

    fn scrolled(&mut self, delta: [f32; 2]) {
        self.bridge.mouse_scroll(delta);
    }

    fn shutdown(&mut self) {
        self.bridge.dispose();
    }
}
