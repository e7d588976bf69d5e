//! The viewer's main menu bar

use dear_imgui_rs::Ui;

/// A File menu entry the user clicked
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Open,
    Save,
    SaveAs,
}

impl MenuAction {
    pub const ALL: [MenuAction; 3] = [MenuAction::Open, MenuAction::Save, MenuAction::SaveAs];

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::Open => "Open",
            MenuAction::Save => "Save",
            MenuAction::SaveAs => "Save As",
        }
    }

    /// Shortcut text shown next to the label; display only, not bound to keys
    pub fn shortcut(self) -> &'static str {
        match self {
            MenuAction::Open => "CTRL+O",
            MenuAction::Save => "CTRL+S",
            MenuAction::SaveAs => "CTRL+Shift+S",
        }
    }
}

/// Emit the top-level menu bar and report which item, if any, was clicked
pub fn draw_main_menu(ui: &Ui) -> Option<MenuAction> {
    let mut clicked = None;
    if let Some(_bar) = ui.begin_main_menu_bar() {
        ui.menu("File", || {
            clicked = menu_item(ui, MenuAction::Open).or(clicked);
            ui.separator();
            clicked = menu_item(ui, MenuAction::Save).or(clicked);
            clicked = menu_item(ui, MenuAction::SaveAs).or(clicked);
        });
    }
    clicked
}

fn menu_item(ui: &Ui, action: MenuAction) -> Option<MenuAction> {
    ui.menu_item_with_shortcut(action.label(), action.shortcut())
        .then_some(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn labels_and_shortcuts() {
        let entries: Vec<_> = MenuAction::ALL
            .iter()
            .map(|a| (a.label(), a.shortcut()))
            .collect();
        assert_eq!(
            entries,
            vec![
                ("Open", "CTRL+O"),
                ("Save", "CTRL+S"),
                ("Save As", "CTRL+Shift+S"),
            ]
        );
    }
}
