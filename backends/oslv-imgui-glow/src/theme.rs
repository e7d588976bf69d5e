//! The viewer's dark GUI theme as plain data
//!
//! Based on the dark style posted in ocornut/imgui#707. Colors are keyed by
//! [`StyleColor`]; metrics are plain numbers. [`apply_theme`] writes both into
//! a context and is idempotent.

use dear_imgui_rs::{ColorOverride, Context, StyleColor, Theme, ThemePreset};

/// Style color overrides, RGBA in `0.0..=1.0`
pub const THEME_COLORS: &[(StyleColor, [f32; 4])] = &[
    (StyleColor::Text, [1.00, 1.00, 1.00, 1.00]),
    (StyleColor::TextDisabled, [0.50, 0.50, 0.50, 1.00]),
    (StyleColor::WindowBg, [0.10, 0.10, 0.10, 1.00]),
    (StyleColor::ChildBg, [0.00, 0.00, 0.00, 0.00]),
    (StyleColor::PopupBg, [0.19, 0.19, 0.19, 0.92]),
    (StyleColor::Border, [0.19, 0.19, 0.19, 0.29]),
    (StyleColor::BorderShadow, [0.00, 0.00, 0.00, 0.24]),
    (StyleColor::FrameBg, [0.05, 0.05, 0.05, 0.54]),
    (StyleColor::FrameBgHovered, [0.19, 0.19, 0.19, 0.54]),
    (StyleColor::FrameBgActive, [0.20, 0.22, 0.23, 1.00]),
    (StyleColor::TitleBg, [0.00, 0.00, 0.00, 1.00]),
    (StyleColor::TitleBgActive, [0.06, 0.06, 0.06, 1.00]),
    (StyleColor::TitleBgCollapsed, [0.00, 0.00, 0.00, 1.00]),
    (StyleColor::MenuBarBg, [0.14, 0.14, 0.14, 1.00]),
    (StyleColor::ScrollbarBg, [0.05, 0.05, 0.05, 0.54]),
    (StyleColor::ScrollbarGrab, [0.34, 0.34, 0.34, 0.54]),
    (StyleColor::ScrollbarGrabHovered, [0.40, 0.40, 0.40, 0.54]),
    (StyleColor::ScrollbarGrabActive, [0.56, 0.56, 0.56, 0.54]),
    (StyleColor::CheckMark, [0.33, 0.67, 0.86, 1.00]),
    (StyleColor::SliderGrab, [0.34, 0.34, 0.34, 0.54]),
    (StyleColor::SliderGrabActive, [0.56, 0.56, 0.56, 0.54]),
    (StyleColor::Button, [0.05, 0.05, 0.05, 0.54]),
    (StyleColor::ButtonHovered, [0.19, 0.19, 0.19, 0.54]),
    (StyleColor::ButtonActive, [0.20, 0.22, 0.23, 1.00]),
    (StyleColor::Header, [0.00, 0.00, 0.00, 0.52]),
    (StyleColor::HeaderHovered, [0.00, 0.00, 0.00, 0.36]),
    (StyleColor::HeaderActive, [0.20, 0.22, 0.23, 0.33]),
    (StyleColor::Separator, [0.28, 0.28, 0.28, 0.29]),
    (StyleColor::SeparatorHovered, [0.44, 0.44, 0.44, 0.29]),
    (StyleColor::SeparatorActive, [0.40, 0.44, 0.47, 1.00]),
    (StyleColor::ResizeGrip, [0.28, 0.28, 0.28, 0.29]),
    (StyleColor::ResizeGripHovered, [0.44, 0.44, 0.44, 0.29]),
    (StyleColor::ResizeGripActive, [0.40, 0.44, 0.47, 1.00]),
    (StyleColor::Tab, [0.00, 0.00, 0.00, 0.52]),
    (StyleColor::TabHovered, [0.14, 0.14, 0.14, 1.00]),
    (StyleColor::TabSelected, [0.20, 0.20, 0.20, 0.36]),
    (StyleColor::TabDimmed, [0.00, 0.00, 0.00, 0.52]),
    (StyleColor::TabDimmedSelected, [0.14, 0.14, 0.14, 1.00]),
    (StyleColor::DockingPreview, [0.33, 0.67, 0.86, 1.00]),
    (StyleColor::DockingEmptyBg, [1.00, 0.00, 0.00, 1.00]),
    (StyleColor::PlotLines, [1.00, 0.00, 0.00, 1.00]),
    (StyleColor::PlotLinesHovered, [1.00, 0.00, 0.00, 1.00]),
    (StyleColor::PlotHistogram, [1.00, 0.00, 0.00, 1.00]),
    (StyleColor::PlotHistogramHovered, [1.00, 0.00, 0.00, 1.00]),
    (StyleColor::TableHeaderBg, [0.00, 0.00, 0.00, 0.52]),
    (StyleColor::TableBorderStrong, [0.00, 0.00, 0.00, 0.52]),
    (StyleColor::TableBorderLight, [0.28, 0.28, 0.28, 0.29]),
    (StyleColor::TableRowBg, [0.00, 0.00, 0.00, 0.00]),
    (StyleColor::TableRowBgAlt, [1.00, 1.00, 1.00, 0.06]),
    (StyleColor::TextSelectedBg, [0.20, 0.22, 0.23, 1.00]),
    (StyleColor::DragDropTarget, [0.33, 0.67, 0.86, 1.00]),
    (StyleColor::NavCursor, [1.00, 0.00, 0.00, 1.00]),
    (StyleColor::NavWindowingHighlight, [1.00, 0.00, 0.00, 0.70]),
    (StyleColor::NavWindowingDimBg, [1.00, 0.00, 0.00, 0.20]),
    (StyleColor::ModalWindowDimBg, [1.00, 0.00, 0.00, 0.35]),
];

/// Spacing, border and rounding metrics of the theme
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeMetrics {
    pub window_padding: [f32; 2],
    pub frame_padding: [f32; 2],
    pub cell_padding: [f32; 2],
    pub item_spacing: [f32; 2],
    pub item_inner_spacing: [f32; 2],
    pub indent_spacing: f32,
    pub scrollbar_size: f32,
    pub grab_min_size: f32,
    pub window_border_size: f32,
    pub child_border_size: f32,
    pub popup_border_size: f32,
    pub frame_border_size: f32,
    pub tab_border_size: f32,
    pub window_rounding: f32,
    pub child_rounding: f32,
    pub frame_rounding: f32,
    pub popup_rounding: f32,
    pub scrollbar_rounding: f32,
    pub grab_rounding: f32,
    pub tab_rounding: f32,
}

pub const THEME_METRICS: ThemeMetrics = ThemeMetrics {
    window_padding: [8.0, 8.0],
    frame_padding: [5.0, 2.0],
    cell_padding: [6.0, 6.0],
    item_spacing: [6.0, 6.0],
    item_inner_spacing: [6.0, 6.0],
    indent_spacing: 25.0,
    scrollbar_size: 15.0,
    grab_min_size: 10.0,
    window_border_size: 1.0,
    child_border_size: 1.0,
    popup_border_size: 1.0,
    frame_border_size: 1.0,
    tab_border_size: 1.0,
    window_rounding: 7.0,
    child_rounding: 4.0,
    frame_rounding: 3.0,
    popup_rounding: 4.0,
    scrollbar_rounding: 9.0,
    grab_rounding: 3.0,
    tab_rounding: 4.0,
};

/// Build the theme description from the data tables
pub fn viewer_theme() -> Theme {
    let mut theme = Theme::default();
    theme.preset = ThemePreset::None;
    theme.colors = THEME_COLORS
        .iter()
        .map(|&(id, rgba)| ColorOverride { id, rgba })
        .collect();

    let m = THEME_METRICS;
    theme.style.window_padding = Some(m.window_padding);
    theme.style.frame_padding = Some(m.frame_padding);
    theme.style.cell_padding = Some(m.cell_padding);
    theme.style.item_spacing = Some(m.item_spacing);
    theme.style.item_inner_spacing = Some(m.item_inner_spacing);
    theme.style.indent_spacing = Some(m.indent_spacing);
    theme.style.scrollbar_size = Some(m.scrollbar_size);
    theme.style.grab_min_size = Some(m.grab_min_size);
    theme.style.window_border_size = Some(m.window_border_size);
    theme.style.child_border_size = Some(m.child_border_size);
    theme.style.popup_border_size = Some(m.popup_border_size);
    theme.style.frame_border_size = Some(m.frame_border_size);
    theme.style.tab_border_size = Some(m.tab_border_size);
    theme.style.window_rounding = Some(m.window_rounding);
    theme.style.child_rounding = Some(m.child_rounding);
    theme.style.frame_rounding = Some(m.frame_rounding);
    theme.style.popup_rounding = Some(m.popup_rounding);
    theme.style.scrollbar_rounding = Some(m.scrollbar_rounding);
    theme.style.grab_rounding = Some(m.grab_rounding);
    theme.style.tab_rounding = Some(m.tab_rounding);
    theme
}

/// Write the viewer theme into `context`
pub fn apply_theme(context: &mut Context) {
    viewer_theme().apply_to_context(context);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_color_role_appears_once() {
        let mut seen = HashSet::new();
        for (id, _) in THEME_COLORS {
            assert!(seen.insert(*id as i32), "{id:?} listed twice");
        }
        assert_eq!(seen.len(), THEME_COLORS.len());
        assert!(THEME_COLORS.len() >= 50);
    }

    #[test]
    fn colors_are_normalized() {
        for (id, rgba) in THEME_COLORS {
            assert!(
                rgba.iter().all(|c| (0.0..=1.0).contains(c)),
                "{id:?} out of range: {rgba:?}"
            );
        }
    }

    #[test]
    fn theme_carries_every_table_entry() {
        let theme = viewer_theme();
        assert_eq!(theme.colors.len(), THEME_COLORS.len());
        assert_eq!(theme.style.window_rounding, Some(7.0));
        assert_eq!(theme.style.frame_padding, Some([5.0, 2.0]));
    }

    #[test]
    fn menu_bar_background_matches_table() {
        let (_, rgba) = THEME_COLORS
            .iter()
            .find(|(id, _)| *id == StyleColor::MenuBarBg)
            .copied()
            .unwrap();
        assert_eq!(rgba, [0.14, 0.14, 0.14, 1.0]);
    }
}
