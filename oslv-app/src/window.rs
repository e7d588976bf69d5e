//! Platform window plus its OpenGL context and surface

use std::num::NonZeroU32;
use std::rc::Rc;

use glow::HasContext;
use glutin::{
    config::{ConfigTemplateBuilder, GlConfig},
    context::{
        ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext,
        PossiblyCurrentContext, Version,
    },
    display::{GetGlDisplay, GlDisplay},
    surface::{GlSurface, Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface},
};
use raw_window_handle::HasWindowHandle;
use tracing::{info, warn};
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;

use crate::{ViewerConfig, ViewerError};

/// A window with a current OpenGL 3.3 core context
pub struct GlWindow {
    // Drop order: the surface and context go before the window they render to
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    gl: Rc<glow::Context>,
    window: Window,
}

impl GlWindow {
    pub fn new(event_loop: &ActiveEventLoop, config: &ViewerConfig) -> Result<Self, ViewerError> {
        let (width, height) = config.window_size;
        let window_attributes = Window::default_attributes()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(width, height));

        let (window, gl_config) = glutin_winit::DisplayBuilder::new()
            .with_window_attributes(Some(window_attributes))
            .build(
                event_loop,
                ConfigTemplateBuilder::new().with_depth_size(24),
                |configs| {
                    // glutin only calls the picker when at least one config matched
                    configs
                        .reduce(|best, config| {
                            if config.num_samples() > best.num_samples() {
                                config
                            } else {
                                best
                            }
                        })
                        .expect("config picker called without configs")
                },
            )
            .map_err(|e| ViewerError::WindowCreation(e.to_string()))?;
        let window = window
            .ok_or_else(|| ViewerError::WindowCreation("display builder returned no window".into()))?;

        let raw_handle = window.window_handle()?.as_raw();
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .build(Some(raw_handle));
        let context = unsafe {
            gl_config
                .display()
                .create_context(&gl_config, &context_attributes)?
        };

        let size = window.inner_size();
        let surface_attributes = SurfaceAttributesBuilder::<WindowSurface>::new()
            .with_srgb(Some(false))
            .build(raw_handle, non_zero(size.width), non_zero(size.height));
        let surface = unsafe {
            gl_config
                .display()
                .create_window_surface(&gl_config, &surface_attributes)?
        };
        let context = context.make_current(&surface)?;

        let interval = if config.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(e) = surface.set_swap_interval(&context, interval) {
            warn!("Failed to set swap interval: {e}");
        }

        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|s| {
                context.display().get_proc_address(s).cast()
            })
        };
        unsafe {
            gl.viewport(0, 0, size.width as i32, size.height as i32);
        }
        info!(
            "Created {}x{} window with {}",
            size.width,
            size.height,
            unsafe { gl.get_parameter_string(glow::VERSION) }
        );

        Ok(Self {
            surface,
            context,
            gl: Rc::new(gl),
            window,
        })
    }

    pub fn gl(&self) -> &Rc<glow::Context> {
        &self.gl
    }

    pub fn inner_size(&self) -> PhysicalSize<u32> {
        self.window.inner_size()
    }

    pub fn scale_factor(&self) -> f64 {
        self.window.scale_factor()
    }

    /// Match the GL viewport and the surface to a new window size.
    /// A zero-sized (minimized) window keeps its previous surface.
    pub fn resize(&self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        unsafe {
            self.gl
                .viewport(0, 0, size.width as i32, size.height as i32);
        }
        self.surface
            .resize(&self.context, non_zero(size.width), non_zero(size.height));
    }

    pub fn swap_buffers(&self) -> Result<(), ViewerError> {
        self.surface.swap_buffers(&self.context)?;
        Ok(())
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

fn non_zero(value: u32) -> NonZeroU32 {
    NonZeroU32::new(value).unwrap_or(NonZeroU32::MIN)
}
