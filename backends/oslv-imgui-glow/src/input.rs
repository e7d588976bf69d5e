//! Forwarding polled window input into Dear ImGui

use bitflags::bitflags;
use dear_imgui_rs::{Io, Key, MouseButton};

/// Polled input state of the window the GUI is drawn into.
///
/// The bridge reads this once per frame; implementors only report the
/// current state and never push events themselves.
pub trait InputSource {
    /// Cursor position in logical window coordinates, `None` when the cursor
    /// is outside the window
    fn cursor_position(&self) -> Option<[f32; 2]>;

    fn is_mouse_down(&self, button: MouseButton) -> bool;

    fn is_key_down(&self, key: Key) -> bool;
}

/// Mouse buttons forwarded every frame
pub const TRACKED_MOUSE_BUTTONS: [MouseButton; 3] =
    [MouseButton::Left, MouseButton::Right, MouseButton::Middle];

/// Keyboard keys whose down state is forwarded every frame
pub const TRACKED_KEYS: &[Key] = &[
    Key::Tab,
    Key::LeftArrow,
    Key::RightArrow,
    Key::UpArrow,
    Key::DownArrow,
    Key::PageUp,
    Key::PageDown,
    Key::Home,
    Key::End,
    Key::Insert,
    Key::Delete,
    Key::Backspace,
    Key::Space,
    Key::Enter,
    Key::Escape,
    Key::LeftCtrl,
    Key::LeftShift,
    Key::LeftAlt,
    Key::LeftSuper,
    Key::RightCtrl,
    Key::RightShift,
    Key::RightAlt,
    Key::RightSuper,
    Key::Menu,
    Key::Key0,
    Key::Key1,
    Key::Key2,
    Key::Key3,
    Key::Key4,
    Key::Key5,
    Key::Key6,
    Key::Key7,
    Key::Key8,
    Key::Key9,
    Key::A,
    Key::B,
    Key::C,
    Key::D,
    Key::E,
    Key::F,
    Key::G,
    Key::H,
    Key::I,
    Key::J,
    Key::K,
    Key::L,
    Key::M,
    Key::N,
    Key::O,
    Key::P,
    Key::Q,
    Key::R,
    Key::S,
    Key::T,
    Key::U,
    Key::V,
    Key::W,
    Key::X,
    Key::Y,
    Key::Z,
    Key::F1,
    Key::F2,
    Key::F3,
    Key::F4,
    Key::F5,
    Key::F6,
    Key::F7,
    Key::F8,
    Key::F9,
    Key::F10,
    Key::F11,
    Key::F12,
    Key::Apostrophe,
    Key::Comma,
    Key::Minus,
    Key::Period,
    Key::Slash,
    Key::Semicolon,
    Key::Equal,
    Key::LeftBracket,
    Key::Backslash,
    Key::RightBracket,
    Key::GraveAccent,
    Key::CapsLock,
    Key::ScrollLock,
    Key::NumLock,
    Key::PrintScreen,
    Key::Pause,
    Key::KeypadDecimal,
    Key::KeypadDivide,
    Key::KeypadMultiply,
    Key::KeypadSubtract,
    Key::KeypadAdd,
    Key::KeypadEnter,
    Key::KeypadEqual,
];

bitflags! {
    /// Combined modifier state; each flag is set when either side's key is down
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const CTRL = 1 << 0;
        const SHIFT = 1 << 1;
        const ALT = 1 << 2;
        const SUPER = 1 << 3;
    }
}

impl Modifiers {
    const SIDES: [(Modifiers, Key, Key); 4] = [
        (Modifiers::CTRL, Key::LeftCtrl, Key::RightCtrl),
        (Modifiers::SHIFT, Key::LeftShift, Key::RightShift),
        (Modifiers::ALT, Key::LeftAlt, Key::RightAlt),
        (Modifiers::SUPER, Key::LeftSuper, Key::RightSuper),
    ];

    /// OR the left and right variant of every modifier key
    pub fn from_source(source: &dyn InputSource) -> Self {
        Self::SIDES
            .iter()
            .filter(|(_, left, right)| source.is_key_down(*left) || source.is_key_down(*right))
            .fold(Modifiers::empty(), |acc, (flag, _, _)| acc | *flag)
    }
}

/// Whether a character belongs in the GUI's text-input queue
pub fn accepts_text_char(character: char) -> bool {
    !character.is_control() || matches!(character, '\t' | '\n' | '\r')
}

/// Overwrite mouse and key state in `io` from `source`
pub fn forward_input(io: &mut Io, source: &dyn InputSource) {
    let position = source
        .cursor_position()
        .unwrap_or([-f32::MAX, -f32::MAX]);
    io.add_mouse_pos_event(position);

    for button in TRACKED_MOUSE_BUTTONS {
        io.add_mouse_button_event(button, source.is_mouse_down(button));
    }

    for &key in TRACKED_KEYS {
        io.add_key_event(key, source.is_key_down(key));
    }
}

/// Report the merged modifier state through the `Mod*` keys.
///
/// Dear ImGui derives `io.KeyCtrl` and friends from these, not from the
/// left/right keys, so they are sent separately.
pub fn forward_modifiers(io: &mut Io, modifiers: Modifiers) {
    let mod_keys = [
        (Modifiers::CTRL, Key::ModCtrl),
        (Modifiers::SHIFT, Key::ModShift),
        (Modifiers::ALT, Key::ModAlt),
        (Modifiers::SUPER, Key::ModSuper),
    ];
    for (flag, key) in mod_keys {
        io.add_key_event(key, modifiers.contains(flag));
    }
}
