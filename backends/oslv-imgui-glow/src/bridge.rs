//! The bridge facade driven by the window loop

use std::rc::Rc;

use dear_imgui_rs::{Context, Ui};

use crate::{
    DrawDataRenderer, FrameMetrics, FramePacer, FrameState, GlowRenderer, InitResult, InputSource,
    Modifiers, RenderAction, RenderResult, ShaderPaths, accepts_text_char, forward_input,
    forward_modifiers, theme,
};

/// Dear ImGui context plus everything needed to draw it.
///
/// One bridge drives one window. With the default [`GlowRenderer`] it holds
/// the GL context through an `Rc` and is therefore neither `Send` nor `Sync`.
pub struct ImguiBridge<R: DrawDataRenderer = GlowRenderer> {
    context: Context,
    renderer: R,
    pacer: FramePacer,
    window_size: [u32; 2],
    scale_factor: f32,
    pending_chars: Vec<char>,
}

impl ImguiBridge<GlowRenderer> {
    /// Create the GUI context, theme it, and set up the GPU resources.
    ///
    /// `window_size` is the framebuffer size in pixels.
    pub fn new(
        gl: Rc<glow::Context>,
        window_size: [u32; 2],
        shader_paths: &ShaderPaths,
    ) -> InitResult<Self> {
        let mut context = Context::create();
        let _ = context.set_ini_filename::<std::path::PathBuf>(None);
        theme::apply_theme(&mut context);

        let renderer = GlowRenderer::new(gl, &mut context, shader_paths)?;
        tracing::info!(
            target: "oslv-imgui-glow",
            width = window_size[0],
            height = window_size[1],
            "GUI bridge initialized"
        );

        Ok(Self::from_parts(context, renderer, window_size))
    }
}

impl<R: DrawDataRenderer> ImguiBridge<R> {
    /// Pair an existing context with a renderer.
    ///
    /// The context's font atlas must already be built and known to `renderer`.
    pub fn from_parts(context: Context, renderer: R, window_size: [u32; 2]) -> Self {
        Self {
            context,
            renderer,
            pacer: FramePacer::new(),
            window_size,
            scale_factor: 1.0,
            pending_chars: Vec::new(),
        }
    }

    /// Record the new framebuffer size. GPU buffers are left alone.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.window_size = [width, height];
    }

    pub fn window_size(&self) -> [u32; 2] {
        self.window_size
    }

    /// Record the window's pixels-per-point ratio
    pub fn set_scale_factor(&mut self, scale_factor: f32) {
        self.scale_factor = scale_factor;
    }

    /// Begin a frame and hand out its [`Ui`].
    ///
    /// A frame still open from the previous call is finalized first. Input is
    /// polled from `input` and replaces whatever mouse and key state the
    /// context held before.
    pub fn update(&mut self, delta_time: f32, input: &dyn InputSource) -> &mut Ui {
        if self.pacer.begin() {
            tracing::trace!(target: "oslv-imgui-glow", "finalizing unrendered frame");
            self.context.render();
        }

        let metrics = FrameMetrics::new(self.window_size, self.scale_factor, delta_time);
        let io = self.context.io_mut();
        io.set_display_size(metrics.display_size);
        io.set_display_framebuffer_scale(metrics.framebuffer_scale);
        io.set_delta_time(metrics.delta_time);
        forward_input(io, input);
        forward_modifiers(io, Modifiers::from_source(input));
        for character in self.pending_chars.drain(..) {
            io.add_input_character(character);
        }

        self.context.frame()
    }

    /// Finalize the open frame's draw lists without drawing them yet.
    /// Does nothing when no frame is open.
    pub fn submit_frame(&mut self) {
        if self.pacer.submit() {
            self.context.render();
        }
    }

    /// Draw the current frame into the bound framebuffer
    pub fn render(&mut self) -> RenderResult<()> {
        match self.pacer.take_for_render() {
            RenderAction::Skip => Ok(()),
            RenderAction::FinalizeAndReplay => {
                let draw_data = self.context.render();
                self.renderer.render_draw_data(draw_data, self.window_size)
            }
            RenderAction::Replay => match self.context.draw_data() {
                Some(draw_data) => self.renderer.render_draw_data(draw_data, self.window_size),
                None => Ok(()),
            },
        }
    }

    /// Queue a typed character for the next frame
    pub fn press_char(&mut self, character: char) {
        if accepts_text_char(character) {
            self.pending_chars.push(character);
        }
    }

    /// Forward a wheel movement in lines, `[horizontal, vertical]`
    pub fn mouse_scroll(&mut self, offset: [f32; 2]) {
        self.context.io_mut().add_mouse_wheel_event(offset);
    }

    /// Re-upload the font atlas after fonts changed
    pub fn on_font_atlas_invalidated(&mut self) -> RenderResult<()> {
        if self.pacer.submit() {
            self.context.render();
        }
        self.renderer.reload_font_texture(&mut self.context)
    }

    /// Reapply the viewer theme; idempotent
    pub fn apply_theme(&mut self) {
        theme::apply_theme(&mut self.context);
    }

    pub fn frame_state(&self) -> FrameState {
        self.pacer.state()
    }

    pub fn finalized_frames(&self) -> u64 {
        self.pacer.finalized_frames()
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Release all GPU resources. Safe to call more than once.
    pub fn dispose(&mut self) {
        self.renderer.release();
    }
}
