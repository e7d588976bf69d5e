//! Event loop driving the viewer window

use tracing::{error, info};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

use crate::{FrameHandler, GlWindow, InputState, RedrawMode, Viewer, ViewerConfig, ViewerError};

/// Pixel deltas from touchpads are reported in pixels; this many make a line
const PIXELS_PER_LINE: f64 = 100.0;

/// Open the viewer window and run until it is closed.
///
/// Any error raised inside the loop stops it and is returned here.
pub fn run(config: ViewerConfig) -> Result<(), ViewerError> {
    let event_loop = EventLoop::new()?;
    match config.redraw {
        RedrawMode::Poll => event_loop.set_control_flow(ControlFlow::Poll),
        RedrawMode::Wait => event_loop.set_control_flow(ControlFlow::Wait),
    }

    let mut app = App::new(config);
    info!("Starting viewer event loop");
    event_loop.run_app(&mut app)?;

    match app.failure.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

struct Running {
    // Dropped before the window so GL objects are freed while the context lives
    handler: Box<dyn FrameHandler>,
    window: GlWindow,
}

struct App {
    config: ViewerConfig,
    running: Option<Running>,
    input: InputState,
    failure: Option<ViewerError>,
}

impl App {
    fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            running: None,
            input: InputState::new(),
            failure: None,
        }
    }

    fn start(&self, event_loop: &ActiveEventLoop) -> Result<Running, ViewerError> {
        let window = GlWindow::new(event_loop, &self.config)?;
        let viewer = Viewer::new(
            window.gl().clone(),
            window.inner_size(),
            window.scale_factor(),
            &self.config,
        )?;
        Ok(Running {
            handler: Box::new(viewer),
            window,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, e: ViewerError) {
        error!("{e}");
        if let Some(running) = self.running.as_mut() {
            running.handler.shutdown();
        }
        self.failure = Some(e);
        event_loop.exit();
    }
}

fn scroll_lines(delta: MouseScrollDelta) -> [f32; 2] {
    match delta {
        MouseScrollDelta::LineDelta(x, y) => [x, y],
        MouseScrollDelta::PixelDelta(pos) => [
            (pos.x / PIXELS_PER_LINE) as f32,
            (pos.y / PIXELS_PER_LINE) as f32,
        ],
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        match self.start(event_loop) {
            Ok(running) => {
                info!("Window created");
                running.window.request_redraw();
                self.running = Some(running);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(running) = self.running.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                running.handler.shutdown();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                running.window.resize(size);
                running.handler.resized(size);
                running.window.request_redraw();
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                running.handler.scale_factor_changed(scale_factor);
                let size = running.window.inner_size();
                running.window.resize(size);
                running.handler.resized(size);
                running.window.request_redraw();
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input
                    .cursor_moved(position, running.window.scale_factor());
            }
            WindowEvent::CursorLeft { .. } => self.input.cursor_left(),
            WindowEvent::MouseInput { state, button, .. } => {
                self.input.mouse_input(button, state);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                running.handler.scrolled(scroll_lines(delta));
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.input.keyboard_input(&event);
                if event.state == ElementState::Pressed {
                    if let Some(text) = event.text.as_deref() {
                        text.chars().for_each(|c| running.handler.text_input(c));
                    }
                }
            }
            WindowEvent::Focused(false) => self.input.release_all(),
            WindowEvent::RedrawRequested => {
                let result = running
                    .handler
                    .render_frame(&self.input)
                    .and_then(|()| running.window.swap_buffers());
                if let Err(e) = result {
                    self.fail(event_loop, e);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let (Some(running), RedrawMode::Poll) = (&self.running, self.config.redraw) {
            running.window.request_redraw();
        }
    }
}
