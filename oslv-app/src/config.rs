use std::path::{Path, PathBuf};

use oslv_imgui_glow::ShaderPaths;

/// Shader directory, relative to the executable or the working directory
pub const SHADER_DIR: &str = "assets/shaders";

/// Redraw behavior for the event loop
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RedrawMode {
    /// Always redraw (ControlFlow::Poll)
    Poll,
    /// Redraw only when an event arrives (ControlFlow::Wait)
    Wait,
}

/// Viewer window and loop configuration
#[derive(Clone, Debug)]
pub struct ViewerConfig {
    pub window_title: String,
    /// Logical window size
    pub window_size: (f64, f64),
    pub clear_color: [f32; 4],
    pub vsync: bool,
    pub redraw: RedrawMode,
    pub shaders: ShaderPaths,
    /// Delta time reported for the first frame, in seconds
    pub initial_delta_time: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_title: "Open Source Level Viewer".to_string(),
            window_size: (1600.0, 900.0),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            vsync: true,
            redraw: RedrawMode::Poll,
            shaders: default_shader_paths(),
            initial_delta_time: 1.0 / 60.0,
        }
    }
}

/// The bundled GUI shaders.
///
/// `assets/shaders` next to the executable wins; otherwise the directory is
/// taken relative to the working directory.
pub fn default_shader_paths() -> ShaderPaths {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    let dir = locate_shader_dir(exe_dir.as_deref());
    ShaderPaths::new(dir.join("imgui.vert"), dir.join("imgui.frag"))
}

fn locate_shader_dir(exe_dir: Option<&Path>) -> PathBuf {
    exe_dir
        .map(|dir| dir.join(SHADER_DIR))
        .filter(|dir| dir.is_dir())
        .unwrap_or_else(|| PathBuf::from(SHADER_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_describe_the_viewer_window() {
        let config = ViewerConfig::default();
        assert_eq!(config.window_title, "Open Source Level Viewer");
        assert_eq!(config.window_size, (1600.0, 900.0));
        assert_eq!(config.redraw, RedrawMode::Poll);
        assert!(config.initial_delta_time > 0.0);
    }

    #[test]
    fn shaders_ship_with_the_crate() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join(SHADER_DIR);
        assert!(dir.join("imgui.vert").is_file());
        assert!(dir.join("imgui.frag").is_file());
    }

    #[test]
    fn shader_dir_next_to_executable_wins() {
        let exe_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
        assert_eq!(locate_shader_dir(Some(exe_dir)), exe_dir.join(SHADER_DIR));
    }

    #[test]
    fn shader_dir_falls_back_to_working_directory() {
        let tmp = std::env::temp_dir();
        let expected = PathBuf::from(SHADER_DIR);
        assert_eq!(locate_shader_dir(None), expected);
        if !tmp.join(SHADER_DIR).is_dir() {
            assert_eq!(locate_shader_dir(Some(&tmp)), expected);
        }
    }

    #[test]
    fn default_paths_resolve_under_assets() {
        let paths = default_shader_paths();
        assert!(paths.vertex.ends_with("assets/shaders/imgui.vert"));
        assert!(paths.fragment.ends_with("assets/shaders/imgui.frag"));
        // cargo runs tests from the package root, where the assets live
        assert!(paths.vertex.is_file(), "{:?}", paths.vertex);
    }
}
