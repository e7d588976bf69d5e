//! GPU side of the bridge: program, buffers, vertex layout and replay

use dear_imgui_rs::{
    BackendFlags, Context as ImGuiContext, TextureId,
    render::{DrawData, DrawIdx, DrawVert},
};
use glow::{Context, HasContext};
use std::mem::size_of;
use std::rc::Rc;

use crate::{
    ATTRIB_COLOR, ATTRIB_POSITION, ATTRIB_TEX_COORD, ClipSpace, DrawStep, DrawTarget, GlProgram,
    GlTexture, GlUniformLocation, GlVersion, GlVertexArray, INITIAL_INDEX_BUFFER_BYTES,
    INITIAL_VERTEX_BUFFER_BYTES, InitError, InitResult, RenderError, RenderResult, ScissorRect,
    ShaderPaths, Shaders, StreamBuffer, TextureRegistry, ortho_projection, replay_commands,
    to_byte_slice, upload_font_atlas,
};

/// Backend that turns finalized draw data into pixels.
///
/// [`ImguiBridge`](crate::ImguiBridge) owns the GUI context and the frame
/// sequencing; everything that touches the GPU goes through this trait.
pub trait DrawDataRenderer {
    /// Replay `draw_data`; `framebuffer_size` is the window size in pixels
    fn render_draw_data(&mut self, draw_data: &DrawData, framebuffer_size: [u32; 2])
    -> RenderResult<()>;

    /// Re-upload the font atlas of `imgui_context`
    fn reload_font_texture(&mut self, imgui_context: &mut ImGuiContext) -> RenderResult<()>;

    /// Free GPU resources; must tolerate repeated calls
    fn release(&mut self);
}

/// OpenGL renderer for Dear ImGui draw data.
///
/// Every GL object is created in [`GlowRenderer::new`] and released by
/// [`GlowRenderer::destroy`] (or on drop). The vertex layout is recorded once in
/// a vertex array object; per frame only buffer contents change.
pub struct GlowRenderer {
    gl: Rc<Context>,
    gl_version: GlVersion,
    shaders: Option<Shaders>,
    vertex_array: Option<GlVertexArray>,
    vertex_buffer: Option<StreamBuffer>,
    index_buffer: Option<StreamBuffer>,
    font_texture: Option<GlTexture>,
    font_texture_id: Option<TextureId>,
    textures: TextureRegistry,
    is_destroyed: bool,
}

impl GlowRenderer {
    /// Create all GPU objects and upload the font atlas of `imgui_context`.
    ///
    /// Objects created before a failing step are released when the partially
    /// built renderer is dropped.
    pub fn new(
        gl: Rc<Context>,
        imgui_context: &mut ImGuiContext,
        shader_paths: &ShaderPaths,
    ) -> InitResult<Self> {
        let gl_version = GlVersion::read(&gl);
        tracing::info!(target: "oslv-imgui-glow", "detected {}", gl_version);

        let mut renderer = Self {
            gl,
            gl_version,
            shaders: None,
            vertex_array: None,
            vertex_buffer: None,
            index_buffer: None,
            font_texture: None,
            font_texture_id: None,
            textures: TextureRegistry::new(),
            is_destroyed: false,
        };

        renderer.create_device_objects(shader_paths)?;
        renderer.configure_imgui_context(imgui_context);
        renderer.upload_font_texture(imgui_context)?;

        Ok(renderer)
    }

    /// Whether draws can pass a per-command base vertex
    fn uses_base_vertex(&self) -> bool {
        cfg!(feature = "vertex_offset_support") && self.gl_version.vertex_offset_support()
    }

    fn configure_imgui_context(&self, imgui_context: &mut ImGuiContext) {
        let io = imgui_context.io_mut();
        let mut flags = io.backend_flags();
        if self.uses_base_vertex() {
            flags.insert(BackendFlags::RENDERER_HAS_VTX_OFFSET);
        } else {
            flags.remove(BackendFlags::RENDERER_HAS_VTX_OFFSET);
            tracing::warn!(
                target: "oslv-imgui-glow",
                "{} lacks glDrawElementsBaseVertex; draw lists are limited to 64k vertices",
                self.gl_version
            );
        }
        io.set_backend_flags(flags);
    }

    fn create_device_objects(&mut self, shader_paths: &ShaderPaths) -> InitResult<()> {
        let gl = Rc::clone(&self.gl);
        self.shaders = Some(Shaders::from_files(&gl, shader_paths)?);
        self.vertex_buffer = Some(StreamBuffer::new(
            &gl,
            glow::ARRAY_BUFFER,
            INITIAL_VERTEX_BUFFER_BYTES,
        )?);
        self.index_buffer = Some(StreamBuffer::new(
            &gl,
            glow::ELEMENT_ARRAY_BUFFER,
            INITIAL_INDEX_BUFFER_BYTES,
        )?);

        let vao = unsafe { gl.create_vertex_array() }.map_err(InitError::CreateVertexArray)?;
        self.vertex_array = Some(vao);

        let stride = size_of::<DrawVert>() as i32;
        let pos_offset = memoffset::offset_of!(DrawVert, pos) as i32;
        let uv_offset = memoffset::offset_of!(DrawVert, uv) as i32;
        let color_offset = memoffset::offset_of!(DrawVert, col) as i32;

        unsafe {
            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(
                glow::ARRAY_BUFFER,
                self.vertex_buffer.as_ref().and_then(StreamBuffer::handle),
            );
            // The element binding is part of the vertex array state
            gl.bind_buffer(
                glow::ELEMENT_ARRAY_BUFFER,
                self.index_buffer.as_ref().and_then(StreamBuffer::handle),
            );

            gl.enable_vertex_attrib_array(ATTRIB_POSITION);
            gl.enable_vertex_attrib_array(ATTRIB_TEX_COORD);
            gl.enable_vertex_attrib_array(ATTRIB_COLOR);
            gl.vertex_attrib_pointer_f32(ATTRIB_POSITION, 2, glow::FLOAT, false, stride, pos_offset);
            gl.vertex_attrib_pointer_f32(ATTRIB_TEX_COORD, 2, glow::FLOAT, false, stride, uv_offset);
            // Packed RGBA8, normalized to [0, 1]
            gl.vertex_attrib_pointer_f32(
                ATTRIB_COLOR,
                4,
                glow::UNSIGNED_BYTE,
                true,
                stride,
                color_offset,
            );

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }

        Ok(())
    }

    fn upload_font_texture(&mut self, imgui_context: &mut ImGuiContext) -> InitResult<()> {
        let gl = Rc::clone(&self.gl);
        let (texture, id) = upload_font_atlas(&gl, imgui_context, &mut self.textures)?;
        self.font_texture = Some(texture);
        self.font_texture_id = Some(id);
        Ok(())
    }

    /// Replace the font texture with the context's current atlas
    pub fn rebuild_font_texture(&mut self, imgui_context: &mut ImGuiContext) -> RenderResult<()> {
        if self.is_destroyed {
            return Err(RenderError::RendererDestroyed);
        }
        self.release_font_texture();
        self.upload_font_texture(imgui_context)?;
        Ok(())
    }

    fn release_font_texture(&mut self) {
        if let Some(id) = self.font_texture_id.take() {
            self.textures.remove(id);
        }
        if let Some(texture) = self.font_texture.take() {
            unsafe { self.gl.delete_texture(texture) };
        }
    }

    /// Replay `draw_data` into the current framebuffer.
    ///
    /// `framebuffer_size` is the window size in pixels; scissor rectangles are
    /// flipped against its height. A zero-sized framebuffer draws nothing.
    pub fn render(&mut self, draw_data: &DrawData, framebuffer_size: [u32; 2]) -> RenderResult<()> {
        if self.is_destroyed {
            return Err(RenderError::RendererDestroyed);
        }

        let [fb_width, fb_height] = framebuffer_size;
        if fb_width == 0 || fb_height == 0 {
            return Ok(());
        }

        let gl = Rc::clone(&self.gl);

        let shaders = self.shaders.as_ref().ok_or(RenderError::RendererDestroyed)?;
        let state = RenderState {
            program: shaders.program,
            projection_location: shaders.projection_location.clone(),
            texture_location: shaders.texture_location.clone(),
            vertex_array: self.vertex_array,
            viewport: [fb_width as i32, fb_height as i32],
            projection: ortho_projection(draw_data.display_pos, draw_data.display_size),
        };
        let clip = ClipSpace {
            display_pos: draw_data.display_pos,
            framebuffer_scale: draw_data.framebuffer_scale,
            framebuffer_height: fb_height as f32,
        };

        let depth_test_enabled = unsafe { gl.is_enabled(glow::DEPTH_TEST) };
        state.apply(&gl);

        let result = self.render_draw_lists(&gl, &state, &clip, draw_data);

        unsafe {
            gl.bind_vertex_array(None);
            gl.use_program(None);
            gl.disable(glow::SCISSOR_TEST);
            gl.disable(glow::BLEND);
            if depth_test_enabled {
                gl.enable(glow::DEPTH_TEST);
            }
        }

        result
    }

    fn render_draw_lists(
        &mut self,
        gl: &Context,
        state: &RenderState,
        clip: &ClipSpace,
        draw_data: &DrawData,
    ) -> RenderResult<()> {
        let use_base_vertex = self.uses_base_vertex();
        let (Some(vertex_buffer), Some(index_buffer)) =
            (self.vertex_buffer.as_mut(), self.index_buffer.as_mut())
        else {
            return Err(RenderError::RendererDestroyed);
        };

        for draw_list in draw_data.draw_lists() {
            vertex_buffer.upload(gl, to_byte_slice(draw_list.vtx_buffer()));
            index_buffer.upload(gl, to_byte_slice(draw_list.idx_buffer()));

            let mut target = GlDrawTarget {
                gl,
                state,
                textures: &self.textures,
                font_texture: self.font_texture,
                use_base_vertex,
            };
            replay_commands(
                &mut target,
                clip,
                draw_list.commands().map(DrawStep::from),
            )?;
        }

        Ok(())
    }

    /// Release every GL object. Later calls are no-ops.
    pub fn destroy(&mut self) {
        if self.is_destroyed {
            return;
        }
        let gl = Rc::clone(&self.gl);

        self.release_font_texture();
        self.textures.clear(&gl);
        if let Some(mut shaders) = self.shaders.take() {
            shaders.destroy(&gl);
        }
        if let Some(vao) = self.vertex_array.take() {
            unsafe { gl.delete_vertex_array(vao) };
        }
        if let Some(mut buffer) = self.vertex_buffer.take() {
            buffer.destroy(&gl);
        }
        if let Some(mut buffer) = self.index_buffer.take() {
            buffer.destroy(&gl);
        }

        self.is_destroyed = true;
        tracing::debug!(target: "oslv-imgui-glow", "renderer resources released");
    }
}

impl Drop for GlowRenderer {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl DrawDataRenderer for GlowRenderer {
    fn render_draw_data(
        &mut self,
        draw_data: &DrawData,
        framebuffer_size: [u32; 2],
    ) -> RenderResult<()> {
        self.render(draw_data, framebuffer_size)
    }

    fn reload_font_texture(&mut self, imgui_context: &mut ImGuiContext) -> RenderResult<()> {
        self.rebuild_font_texture(imgui_context)
    }

    fn release(&mut self) {
        self.destroy();
    }
}

/// Pipeline state set before replay and again on `ResetRenderState`
struct RenderState {
    program: Option<GlProgram>,
    projection_location: Option<GlUniformLocation>,
    texture_location: Option<GlUniformLocation>,
    vertex_array: Option<GlVertexArray>,
    viewport: [i32; 2],
    projection: [[f32; 4]; 4],
}

impl RenderState {
    fn apply(&self, gl: &Context) {
        unsafe {
            // Alpha blending, no culling or depth/stencil testing, scissor enabled
            gl.enable(glow::BLEND);
            gl.blend_equation(glow::FUNC_ADD);
            gl.blend_func_separate(
                glow::SRC_ALPHA,
                glow::ONE_MINUS_SRC_ALPHA,
                glow::ONE,
                glow::ONE_MINUS_SRC_ALPHA,
            );
            gl.disable(glow::CULL_FACE);
            gl.disable(glow::DEPTH_TEST);
            gl.disable(glow::STENCIL_TEST);
            gl.enable(glow::SCISSOR_TEST);

            gl.viewport(0, 0, self.viewport[0], self.viewport[1]);

            gl.use_program(self.program);
            if let Some(location) = self.texture_location.as_ref() {
                gl.uniform_1_i32(Some(location), 0);
            }
            if let Some(location) = self.projection_location.as_ref() {
                gl.uniform_matrix_4_f32_slice(Some(location), false, self.projection.as_flattened());
            }
            gl.active_texture(glow::TEXTURE0);
            gl.bind_vertex_array(self.vertex_array);
        }
    }
}

/// [`DrawTarget`] issuing real GL calls
struct GlDrawTarget<'a> {
    gl: &'a Context,
    state: &'a RenderState,
    textures: &'a TextureRegistry,
    font_texture: Option<GlTexture>,
    use_base_vertex: bool,
}

impl DrawTarget for GlDrawTarget<'_> {
    fn bind_texture(&mut self, texture_id: TextureId) -> RenderResult<()> {
        let texture = self
            .textures
            .get(texture_id)
            .or(self.font_texture)
            .ok_or_else(|| {
                RenderError::InvalidTexture(format!("Texture ID {:?} not found", texture_id))
            })?;
        unsafe { self.gl.bind_texture(glow::TEXTURE_2D, Some(texture)) };
        Ok(())
    }

    fn set_scissor(&mut self, rect: ScissorRect) {
        unsafe { self.gl.scissor(rect.x, rect.y, rect.width, rect.height) };
    }

    fn draw_elements(&mut self, count: usize, idx_offset: usize, vtx_offset: usize) {
        let index_type = if size_of::<DrawIdx>() == 2 {
            glow::UNSIGNED_SHORT
        } else {
            glow::UNSIGNED_INT
        };
        let byte_offset = (idx_offset * size_of::<DrawIdx>()) as i32;

        unsafe {
            if self.use_base_vertex {
                self.gl.draw_elements_base_vertex(
                    glow::TRIANGLES,
                    count as i32,
                    index_type,
                    byte_offset,
                    vtx_offset as i32,
                );
            } else {
                self.gl
                    .draw_elements(glow::TRIANGLES, count as i32, index_type, byte_offset);
            }
        }
    }

    fn reset_render_state(&mut self) -> RenderResult<()> {
        self.state.apply(self.gl);
        Ok(())
    }
}
