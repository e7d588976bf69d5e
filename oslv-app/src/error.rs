use thiserror::Error;

/// Fatal viewer errors; each one ends the process with a non-zero exit code
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("Window creation failed: {0}")]
    WindowCreation(String),
    #[error("Window handle unavailable: {0}")]
    WindowHandle(#[from] raw_window_handle::HandleError),
    #[error("OpenGL context error: {0}")]
    Gl(#[from] glutin::error::Error),
    #[error("GUI initialization failed: {0}")]
    BridgeInit(#[from] oslv_imgui_glow::InitError),
    #[error("GUI rendering failed: {0}")]
    BridgeRender(#[from] oslv_imgui_glow::RenderError),
}
