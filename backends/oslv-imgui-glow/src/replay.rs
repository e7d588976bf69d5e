//! Replaying draw commands against a draw target
//!
//! The command walk is separated from the GL calls so the ordering rules
//! (texture, then scissor, then draw; callbacks abort the pass) hold for any
//! [`DrawTarget`], including the recording target used in tests.

use crate::{RenderError, RenderResult};
use dear_imgui_rs::render::DrawCmd;
use dear_imgui_rs::{TextureId, sys};

/// One draw command as the bridge understands it
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawStep {
    Elements {
        /// Number of indices to draw
        count: usize,
        /// `[min_x, min_y, max_x, max_y]` in display coordinates
        clip_rect: [f32; 4],
        texture_id: TextureId,
        /// Offset added to every index (base vertex)
        vtx_offset: usize,
        /// First index, counted in indices not bytes
        idx_offset: usize,
    },
    ResetRenderState,
    /// A command carrying a user callback
    Callback,
}

impl From<DrawCmd> for DrawStep {
    fn from(command: DrawCmd) -> Self {
        match command {
            DrawCmd::Elements {
                count,
                cmd_params,
                raw_cmd,
            } => {
                // Resolve through Dear ImGui so atlas textures report their uploaded id
                let texture_id = unsafe {
                    let mut cmd_copy = *raw_cmd;
                    TextureId::new(sys::ImDrawCmd_GetTexID(&mut cmd_copy) as u64)
                };
                DrawStep::Elements {
                    count,
                    clip_rect: cmd_params.clip_rect,
                    texture_id,
                    vtx_offset: cmd_params.vtx_offset,
                    idx_offset: cmd_params.idx_offset,
                }
            }
            DrawCmd::ResetRenderState => DrawStep::ResetRenderState,
            DrawCmd::RawCallback { .. } => DrawStep::Callback,
        }
    }
}

/// Scissor rectangle in framebuffer pixels, origin bottom-left
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScissorRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Mapping from display coordinates to framebuffer pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipSpace {
    pub display_pos: [f32; 2],
    pub framebuffer_scale: [f32; 2],
    /// Height the Y axis is flipped against (the window height in pixels)
    pub framebuffer_height: f32,
}

impl ClipSpace {
    /// Project a clip rectangle into a GL scissor box.
    ///
    /// Returns `None` for rectangles with no area; those draw nothing.
    pub fn scissor_rect(&self, clip_rect: [f32; 4]) -> Option<ScissorRect> {
        let [pos_x, pos_y] = self.display_pos;
        let [scale_x, scale_y] = self.framebuffer_scale;
        let min_x = (clip_rect[0] - pos_x) * scale_x;
        let min_y = (clip_rect[1] - pos_y) * scale_y;
        let max_x = (clip_rect[2] - pos_x) * scale_x;
        let max_y = (clip_rect[3] - pos_y) * scale_y;

        if max_x <= min_x || max_y <= min_y {
            return None;
        }

        Some(ScissorRect {
            x: min_x as i32,
            y: (self.framebuffer_height - max_y) as i32,
            width: (max_x - min_x) as i32,
            height: (max_y - min_y) as i32,
        })
    }
}

/// Column-major orthographic projection covering the display rectangle
pub fn ortho_projection(display_pos: [f32; 2], display_size: [f32; 2]) -> [[f32; 4]; 4] {
    let l = display_pos[0];
    let r = display_pos[0] + display_size[0];
    let t = display_pos[1];
    let b = display_pos[1] + display_size[1];
    [
        [2.0 / (r - l), 0.0, 0.0, 0.0],
        [0.0, 2.0 / (t - b), 0.0, 0.0],
        [0.0, 0.0, -1.0, 0.0],
        [(r + l) / (l - r), (t + b) / (b - t), 0.0, 1.0],
    ]
}

/// Sink for replayed draw commands
pub trait DrawTarget {
    fn bind_texture(&mut self, texture_id: TextureId) -> RenderResult<()>;

    fn set_scissor(&mut self, rect: ScissorRect);

    fn draw_elements(&mut self, count: usize, idx_offset: usize, vtx_offset: usize);

    fn reset_render_state(&mut self) -> RenderResult<()>;
}

/// Replay the commands of one draw list.
///
/// A callback command aborts the replay with [`RenderError::UnsupportedCallback`];
/// commands before it have already been issued.
pub fn replay_commands<T, I>(target: &mut T, clip: &ClipSpace, steps: I) -> RenderResult<()>
where
    T: DrawTarget + ?Sized,
    I: IntoIterator<Item = DrawStep>,
{
    for step in steps {
        match step {
            DrawStep::Elements {
                count,
                clip_rect,
                texture_id,
                vtx_offset,
                idx_offset,
            } => {
                let Some(scissor) = clip.scissor_rect(clip_rect) else {
                    continue;
                };
                target.bind_texture(texture_id)?;
                target.set_scissor(scissor);
                target.draw_elements(count, idx_offset, vtx_offset);
            }
            DrawStep::ResetRenderState => target.reset_render_state()?,
            DrawStep::Callback => return Err(RenderError::UnsupportedCallback),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;

    #[derive(Debug, PartialEq)]
    enum Call {
        Bind(u64),
        Scissor(ScissorRect),
        Draw {
            count: usize,
            idx_offset: usize,
            vtx_offset: usize,
        },
        Reset,
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl DrawTarget for Recorder {
        fn bind_texture(&mut self, texture_id: TextureId) -> RenderResult<()> {
            self.calls.push(Call::Bind(texture_id.id()));
            Ok(())
        }

        fn set_scissor(&mut self, rect: ScissorRect) {
            self.calls.push(Call::Scissor(rect));
        }

        fn draw_elements(&mut self, count: usize, idx_offset: usize, vtx_offset: usize) {
            self.calls.push(Call::Draw {
                count,
                idx_offset,
                vtx_offset,
            });
        }

        fn reset_render_state(&mut self) -> RenderResult<()> {
            self.calls.push(Call::Reset);
            Ok(())
        }
    }

    const WINDOW: ClipSpace = ClipSpace {
        display_pos: [0.0, 0.0],
        framebuffer_scale: [1.0, 1.0],
        framebuffer_height: 900.0,
    };

    fn elements(clip_rect: [f32; 4], texture: u64, idx_offset: usize) -> DrawStep {
        DrawStep::Elements {
            count: 6,
            clip_rect,
            texture_id: TextureId::new(texture),
            vtx_offset: 4,
            idx_offset,
        }
    }

    #[test]
    fn scissor_flips_y_against_window_height() {
        let rect = WINDOW.scissor_rect([0.0, 0.0, 1600.0, 300.0]).unwrap();
        assert_eq!(rect.y, 600);
        assert_eq!(
            rect,
            ScissorRect {
                x: 0,
                y: 600,
                width: 1600,
                height: 300
            }
        );
    }

    #[test]
    fn scissor_scales_to_framebuffer_pixels() {
        let hidpi = ClipSpace {
            display_pos: [0.0, 0.0],
            framebuffer_scale: [2.0, 2.0],
            framebuffer_height: 1800.0,
        };
        let rect = hidpi.scissor_rect([10.0, 20.0, 110.0, 70.0]).unwrap();
        assert_eq!(
            rect,
            ScissorRect {
                x: 20,
                y: 1660,
                width: 200,
                height: 100
            }
        );
    }

    #[test]
    fn empty_clip_rects_are_rejected() {
        assert_eq!(WINDOW.scissor_rect([10.0, 10.0, 10.0, 50.0]), None);
        assert_eq!(WINDOW.scissor_rect([10.0, 50.0, 40.0, 20.0]), None);
    }

    #[test]
    fn replay_binds_then_scissors_then_draws() {
        let mut target = Recorder::default();
        let steps = [
            elements([0.0, 0.0, 1600.0, 300.0], 1, 0),
            elements([0.0, 0.0, 0.0, 0.0], 2, 6),
            elements([100.0, 100.0, 200.0, 200.0], 3, 12),
        ];
        replay_commands(&mut target, &WINDOW, steps).unwrap();
        assert_eq!(
            target.calls,
            vec![
                Call::Bind(1),
                Call::Scissor(ScissorRect {
                    x: 0,
                    y: 600,
                    width: 1600,
                    height: 300
                }),
                Call::Draw {
                    count: 6,
                    idx_offset: 0,
                    vtx_offset: 4
                },
                Call::Bind(3),
                Call::Scissor(ScissorRect {
                    x: 100,
                    y: 700,
                    width: 100,
                    height: 100
                }),
                Call::Draw {
                    count: 6,
                    idx_offset: 12,
                    vtx_offset: 4
                },
            ]
        );
    }

    #[test]
    fn callback_aborts_replay() {
        let mut target = Recorder::default();
        let steps = [
            elements([0.0, 0.0, 10.0, 10.0], 1, 0),
            DrawStep::Callback,
            elements([0.0, 0.0, 10.0, 10.0], 1, 6),
        ];
        let err = replay_commands(&mut target, &WINDOW, steps).unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedCallback));
        assert_eq!(target.calls.len(), 3, "commands after the callback must not run");
    }

    #[test]
    fn reset_render_state_is_forwarded() {
        let mut target = Recorder::default();
        replay_commands(&mut target, &WINDOW, [DrawStep::ResetRenderState]).unwrap();
        assert_eq!(target.calls, vec![Call::Reset]);
    }

    #[test]
    fn ortho_maps_display_corners_to_clip_space() {
        let m = ortho_projection([0.0, 0.0], [1600.0, 900.0]);
        assert_relative_eq!(m[0][0], 2.0 / 1600.0);
        assert_relative_eq!(m[1][1], -2.0 / 900.0);
        assert_relative_eq!(m[3][0], -1.0);
        assert_relative_eq!(m[3][1], 1.0);
        // bottom-right display corner lands on (1, -1)
        let x = m[0][0] * 1600.0 + m[3][0];
        let y = m[1][1] * 900.0 + m[3][1];
        assert_relative_eq!(x, 1.0);
        assert_relative_eq!(y, -1.0);
    }
}
