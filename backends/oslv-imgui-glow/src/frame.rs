//! Frame lifecycle bookkeeping
//!
//! Dear ImGui expects exactly one frame to be open between `NewFrame` and
//! `Render`. The bridge opens a frame in `update`, and the frame is finalized
//! either by `submit_frame`, by `render`, or by the next `update` when the
//! caller never rendered. [`FramePacer`] tracks which of those applies without
//! touching the GUI context itself, so the transitions can be checked in
//! isolation.

/// Where the current render cycle stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameState {
    /// No frame open and nothing waiting for the GPU
    #[default]
    Idle,
    /// `NewFrame` was called; widgets may still be submitted
    Open,
    /// The draw lists are final but not yet replayed on the GPU
    Finalized,
}

/// What `render` has to do with the GUI context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderAction {
    /// Nothing was begun this cycle
    Skip,
    /// Finalize the open frame, then replay its draw data
    FinalizeAndReplay,
    /// Replay draw data that `submit_frame` already finalized
    Replay,
}

/// State machine `Idle -> Open -> Finalized -> Idle`
#[derive(Debug, Default)]
pub struct FramePacer {
    state: FrameState,
    finalized_frames: u64,
}

impl FramePacer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == FrameState::Open
    }

    /// Number of frames whose draw data has been finalized so far
    pub fn finalized_frames(&self) -> u64 {
        self.finalized_frames
    }

    /// Open a new frame.
    ///
    /// Returns `true` when the previous frame is still open and has to be
    /// finalized before the next one starts.
    pub fn begin(&mut self) -> bool {
        let finalize_previous = self.is_open();
        if finalize_previous {
            self.finalized_frames += 1;
        }
        self.state = FrameState::Open;
        finalize_previous
    }

    /// Close the open frame. Returns `true` when there was one to close.
    pub fn submit(&mut self) -> bool {
        if !self.is_open() {
            return false;
        }
        self.state = FrameState::Finalized;
        self.finalized_frames += 1;
        true
    }

    /// Consume the current frame for GPU submission
    pub fn take_for_render(&mut self) -> RenderAction {
        let action = match self.state {
            FrameState::Idle => RenderAction::Skip,
            FrameState::Open => {
                self.finalized_frames += 1;
                RenderAction::FinalizeAndReplay
            }
            FrameState::Finalized => RenderAction::Replay,
        };
        self.state = FrameState::Idle;
        action
    }
}

/// Seconds substituted for a non-positive delta time; Dear ImGui asserts on `DeltaTime <= 0`.
pub const MIN_DELTA_TIME: f32 = 1.0e-5;

/// IO values derived from the window each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMetrics {
    /// Logical display size (window pixels divided by the scale factor)
    pub display_size: [f32; 2],
    pub framebuffer_scale: [f32; 2],
    pub delta_time: f32,
}

impl FrameMetrics {
    pub fn new(window_size: [u32; 2], scale_factor: f32, delta_time: f32) -> Self {
        let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        Self {
            display_size: [
                window_size[0] as f32 / scale,
                window_size[1] as f32 / scale,
            ],
            framebuffer_scale: [scale, scale],
            delta_time: if delta_time > 0.0 {
                delta_time
            } else {
                MIN_DELTA_TIME
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn full_cycle_returns_to_idle() {
        let mut pacer = FramePacer::new();
        assert!(!pacer.begin());
        assert_eq!(pacer.state(), FrameState::Open);
        assert!(pacer.submit());
        assert_eq!(pacer.state(), FrameState::Finalized);
        assert_eq!(pacer.take_for_render(), RenderAction::Replay);
        assert_eq!(pacer.state(), FrameState::Idle);
        assert_eq!(pacer.finalized_frames(), 1);
    }

    #[test]
    fn render_finalizes_an_open_frame() {
        let mut pacer = FramePacer::new();
        pacer.begin();
        assert_eq!(pacer.take_for_render(), RenderAction::FinalizeAndReplay);
        assert_eq!(pacer.finalized_frames(), 1);
    }

    #[test]
    fn begin_twice_finalizes_once_per_call() {
        let mut pacer = FramePacer::new();
        assert!(!pacer.begin());
        assert!(pacer.begin(), "second begin must finalize the first frame");
        assert_eq!(pacer.finalized_frames(), 1);
        assert_eq!(pacer.take_for_render(), RenderAction::FinalizeAndReplay);
        assert_eq!(pacer.finalized_frames(), 2);
    }

    #[test]
    fn submit_without_open_frame_is_noop() {
        let mut pacer = FramePacer::new();
        assert!(!pacer.submit());
        assert_eq!(pacer.state(), FrameState::Idle);
        pacer.begin();
        assert!(pacer.submit());
        assert!(!pacer.submit());
        assert_eq!(pacer.finalized_frames(), 1);
    }

    #[test]
    fn render_when_idle_skips() {
        let mut pacer = FramePacer::new();
        assert_eq!(pacer.take_for_render(), RenderAction::Skip);
        assert_eq!(pacer.finalized_frames(), 0);
    }

    #[test]
    fn begin_after_submit_drops_unrendered_frame_without_refinalizing() {
        let mut pacer = FramePacer::new();
        pacer.begin();
        pacer.submit();
        assert!(!pacer.begin());
        assert_eq!(pacer.finalized_frames(), 1);
    }

    #[test]
    fn metrics_divide_window_by_scale() {
        let metrics = FrameMetrics::new([1600, 900], 2.0, 0.016);
        assert_eq!(metrics.display_size, [800.0, 450.0]);
        assert_eq!(metrics.framebuffer_scale, [2.0, 2.0]);
        assert_eq!(metrics.delta_time, 0.016);
    }

    #[test]
    fn metrics_guard_degenerate_inputs() {
        let metrics = FrameMetrics::new([1600, 900], 0.0, 0.0);
        assert_eq!(metrics.display_size, [1600.0, 900.0]);
        assert_eq!(metrics.delta_time, MIN_DELTA_TIME);
        assert_eq!(FrameMetrics::new([0, 0], 1.0, -1.0).display_size, [0.0, 0.0]);
    }
}
