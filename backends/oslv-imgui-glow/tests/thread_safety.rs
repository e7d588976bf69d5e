use static_assertions::assert_not_impl_any;

// The bridge shares the GL context through `Rc` and owns a Dear ImGui context
#[test]
fn bridge_thread_markers() {
    assert_not_impl_any!(oslv_imgui_glow::ImguiBridge: Send, Sync);
    assert_not_impl_any!(oslv_imgui_glow::GlowRenderer: Send, Sync);
}
