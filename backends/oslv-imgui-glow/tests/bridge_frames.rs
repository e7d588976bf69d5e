use dear_imgui_rs::{self as imgui, Key, MouseButton, render::DrawData, sys};
use oslv_imgui_glow::{
    ClipSpace, DrawDataRenderer, DrawStep, DrawTarget, FrameState, ImguiBridge, InputSource,
    RenderError, RenderResult, ScissorRect, replay_commands,
};
use std::sync::{Mutex, OnceLock};

fn test_guard() -> std::sync::MutexGuard<'static, ()> {
    static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
    GUARD.get_or_init(|| Mutex::new(())).lock().unwrap()
}

#[derive(Default)]
struct Counter {
    draws: usize,
}

impl DrawTarget for Counter {
    fn bind_texture(&mut self, _texture_id: imgui::TextureId) -> RenderResult<()> {
        Ok(())
    }

    fn set_scissor(&mut self, _rect: ScissorRect) {}

    fn draw_elements(&mut self, _count: usize, _idx_offset: usize, _vtx_offset: usize) {
        self.draws += 1;
    }

    fn reset_render_state(&mut self) -> RenderResult<()> {
        Ok(())
    }
}

/// Replays draw data the way the GL renderer does, minus the GL calls
#[derive(Default)]
struct HeadlessRenderer {
    rendered_frames: usize,
    target: Counter,
    font_reloads: usize,
    releases: usize,
}

impl DrawDataRenderer for HeadlessRenderer {
    fn render_draw_data(
        &mut self,
        draw_data: &DrawData,
        framebuffer_size: [u32; 2],
    ) -> RenderResult<()> {
        self.rendered_frames += 1;
        let clip = ClipSpace {
            display_pos: draw_data.display_pos,
            framebuffer_scale: draw_data.framebuffer_scale,
            framebuffer_height: framebuffer_size[1] as f32,
        };
        for draw_list in draw_data.draw_lists() {
            replay_commands(
                &mut self.target,
                &clip,
                draw_list.commands().map(DrawStep::from),
            )?;
        }
        Ok(())
    }

    fn reload_font_texture(&mut self, _imgui_context: &mut imgui::Context) -> RenderResult<()> {
        self.font_reloads += 1;
        Ok(())
    }

    fn release(&mut self) {
        self.releases += 1;
    }
}

#[derive(Default)]
struct HeldKeys(Vec<Key>);

impl InputSource for HeldKeys {
    fn cursor_position(&self) -> Option<[f32; 2]> {
        None
    }

    fn is_mouse_down(&self, _button: MouseButton) -> bool {
        false
    }

    fn is_key_down(&self, key: Key) -> bool {
        self.0.contains(&key)
    }
}

fn headless_bridge() -> ImguiBridge<HeadlessRenderer> {
    let mut ctx = imgui::Context::create();
    let _ = ctx.set_ini_filename::<std::path::PathBuf>(None);
    let _ = ctx.font_atlas_mut().build();
    ImguiBridge::from_parts(ctx, HeadlessRenderer::default(), [1600, 900])
}

const DT: f32 = 1.0 / 60.0;

unsafe extern "C" fn ignored_callback(_list: *const sys::ImDrawList, _cmd: *const sys::ImDrawCmd) {}

#[test]
fn update_twice_then_render_finalizes_each_frame() {
    let _guard = test_guard();
    let mut bridge = headless_bridge();
    let input = HeldKeys::default();

    bridge.update(DT, &input).text("first");
    bridge.update(DT, &input).text("second");
    assert_eq!(bridge.finalized_frames(), 1);

    bridge.render().unwrap();
    assert_eq!(bridge.finalized_frames(), 2);
    assert_eq!(bridge.frame_state(), FrameState::Idle);
    assert_eq!(bridge.renderer().rendered_frames, 1);
    assert!(bridge.renderer().target.draws > 0);
}

#[test]
fn submitted_frame_is_replayed_once() {
    let _guard = test_guard();
    let mut bridge = headless_bridge();
    let input = HeldKeys::default();

    bridge.update(DT, &input).text("submitted");
    bridge.submit_frame();
    assert_eq!(bridge.frame_state(), FrameState::Finalized);

    bridge.render().unwrap();
    bridge.render().unwrap();
    assert_eq!(bridge.finalized_frames(), 1);
    assert_eq!(bridge.renderer().rendered_frames, 1);
}

#[test]
fn render_without_update_does_nothing() {
    let _guard = test_guard();
    let mut bridge = headless_bridge();

    bridge.render().unwrap();
    assert_eq!(bridge.renderer().rendered_frames, 0);
    assert_eq!(bridge.finalized_frames(), 0);
}

#[test]
fn user_callback_in_draw_list_aborts_render() {
    let _guard = test_guard();
    let mut bridge = headless_bridge();
    let input = HeldKeys::default();

    {
        let ui = bridge.update(DT, &input);
        let draw_list = ui.get_foreground_draw_list();
        unsafe {
            draw_list.add_callback(Some(ignored_callback), std::ptr::null_mut(), 0);
        }
    }

    let err = bridge.render().unwrap_err();
    assert!(matches!(err, RenderError::UnsupportedCallback), "{err}");
    assert_eq!(bridge.frame_state(), FrameState::Idle);
}

#[test]
fn right_ctrl_reaches_io_as_ctrl_modifier() {
    let _guard = test_guard();
    let mut bridge = headless_bridge();
    let input = HeldKeys(vec![Key::RightCtrl]);

    bridge.update(DT, &input);
    assert!(bridge.context().io().key_ctrl());
    assert!(!bridge.context().io().key_shift());
    bridge.render().unwrap();
}

#[test]
fn font_invalidation_finalizes_open_frame_first() {
    let _guard = test_guard();
    let mut bridge = headless_bridge();
    let input = HeldKeys::default();

    bridge.update(DT, &input);
    bridge.on_font_atlas_invalidated().unwrap();
    assert_eq!(bridge.renderer().font_reloads, 1);
    assert_eq!(bridge.frame_state(), FrameState::Finalized);
    assert_eq!(bridge.finalized_frames(), 1);

    bridge.render().unwrap();
    assert_eq!(bridge.renderer().rendered_frames, 1);
}

#[test]
fn resize_is_reported_and_dispose_releases() {
    let _guard = test_guard();
    let mut bridge = headless_bridge();

    bridge.on_resize(800, 600);
    assert_eq!(bridge.window_size(), [800, 600]);

    bridge.dispose();
    bridge.dispose();
    assert_eq!(bridge.renderer().releases, 2);
}
