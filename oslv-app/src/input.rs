//! Polled window input
//!
//! [`InputState`] folds winit window events into the current mouse and
//! keyboard state, which the GUI bridge reads once per frame.

use std::collections::HashMap;

use dear_imgui_rs::{Key, MouseButton as ImGuiMouseButton};
use oslv_imgui_glow::InputSource;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, KeyEvent, MouseButton as WinitMouseButton};
use winit::keyboard::{Key as WinitKey, KeyLocation, NamedKey, PhysicalKey};

/// Convert a winit mouse button to the Dear ImGui button it drives
pub fn to_imgui_mouse_button(button: WinitMouseButton) -> Option<ImGuiMouseButton> {
    match button {
        WinitMouseButton::Left => Some(ImGuiMouseButton::Left),
        WinitMouseButton::Right => Some(ImGuiMouseButton::Right),
        WinitMouseButton::Middle => Some(ImGuiMouseButton::Middle),
        _ => None,
    }
}

/// Convert a winit logical key to a Dear ImGui key, using the location to
/// tell left/right modifiers and keypad keys apart
pub fn winit_key_to_imgui_key(key: &WinitKey, location: KeyLocation) -> Option<Key> {
    match key {
        WinitKey::Character(s) => {
            let ch = s.chars().next()?;
            match (ch.to_ascii_lowercase(), location) {
                ('0', _) => Some(Key::Key0),
                ('1', _) => Some(Key::Key1),
                ('2', _) => Some(Key::Key2),
                ('3', _) => Some(Key::Key3),
                ('4', _) => Some(Key::Key4),
                ('5', _) => Some(Key::Key5),
                ('6', _) => Some(Key::Key6),
                ('7', _) => Some(Key::Key7),
                ('8', _) => Some(Key::Key8),
                ('9', _) => Some(Key::Key9),

                ('a', _) => Some(Key::A),
                ('b', _) => Some(Key::B),
                ('c', _) => Some(Key::C),
                ('d', _) => Some(Key::D),
                ('e', _) => Some(Key::E),
                ('f', _) => Some(Key::F),
                ('g', _) => Some(Key::G),
                ('h', _) => Some(Key::H),
                ('i', _) => Some(Key::I),
                ('j', _) => Some(Key::J),
                ('k', _) => Some(Key::K),
                ('l', _) => Some(Key::L),
                ('m', _) => Some(Key::M),
                ('n', _) => Some(Key::N),
                ('o', _) => Some(Key::O),
                ('p', _) => Some(Key::P),
                ('q', _) => Some(Key::Q),
                ('r', _) => Some(Key::R),
                ('s', _) => Some(Key::S),
                ('t', _) => Some(Key::T),
                ('u', _) => Some(Key::U),
                ('v', _) => Some(Key::V),
                ('w', _) => Some(Key::W),
                ('x', _) => Some(Key::X),
                ('y', _) => Some(Key::Y),
                ('z', _) => Some(Key::Z),

                ('\'', _) => Some(Key::Apostrophe),
                (',', _) => Some(Key::Comma),
                ('-', KeyLocation::Numpad) => Some(Key::KeypadSubtract),
                ('-', _) => Some(Key::Minus),
                ('.', KeyLocation::Numpad) => Some(Key::KeypadDecimal),
                ('.', _) => Some(Key::Period),
                ('/', KeyLocation::Numpad) => Some(Key::KeypadDivide),
                ('/', _) => Some(Key::Slash),
                ('*', KeyLocation::Numpad) => Some(Key::KeypadMultiply),
                ('+', KeyLocation::Numpad) => Some(Key::KeypadAdd),
                (';', _) => Some(Key::Semicolon),
                ('=', KeyLocation::Numpad) => Some(Key::KeypadEqual),
                ('=', _) => Some(Key::Equal),
                ('[', _) => Some(Key::LeftBracket),
                ('\\', _) => Some(Key::Backslash),
                (']', _) => Some(Key::RightBracket),
                ('`', _) => Some(Key::GraveAccent),

                _ => None,
            }
        }
        WinitKey::Named(named_key) => match named_key {
            NamedKey::ArrowDown => Some(Key::DownArrow),
            NamedKey::ArrowLeft => Some(Key::LeftArrow),
            NamedKey::ArrowRight => Some(Key::RightArrow),
            NamedKey::ArrowUp => Some(Key::UpArrow),
            NamedKey::End => Some(Key::End),
            NamedKey::Home => Some(Key::Home),
            NamedKey::PageDown => Some(Key::PageDown),
            NamedKey::PageUp => Some(Key::PageUp),

            NamedKey::Backspace => Some(Key::Backspace),
            NamedKey::Delete => Some(Key::Delete),
            NamedKey::Insert => Some(Key::Insert),

            NamedKey::Tab => Some(Key::Tab),
            NamedKey::Space => Some(Key::Space),
            NamedKey::Enter => match location {
                KeyLocation::Numpad => Some(Key::KeypadEnter),
                _ => Some(Key::Enter),
            },
            NamedKey::Escape => Some(Key::Escape),

            // Unknown locations count as the left key
            NamedKey::Shift => match location {
                KeyLocation::Right => Some(Key::RightShift),
                _ => Some(Key::LeftShift),
            },
            NamedKey::Control => match location {
                KeyLocation::Right => Some(Key::RightCtrl),
                _ => Some(Key::LeftCtrl),
            },
            NamedKey::Alt => match location {
                KeyLocation::Right => Some(Key::RightAlt),
                _ => Some(Key::LeftAlt),
            },
            NamedKey::Super => match location {
                KeyLocation::Right => Some(Key::RightSuper),
                _ => Some(Key::LeftSuper),
            },

            NamedKey::F1 => Some(Key::F1),
            NamedKey::F2 => Some(Key::F2),
            NamedKey::F3 => Some(Key::F3),
            NamedKey::F4 => Some(Key::F4),
            NamedKey::F5 => Some(Key::F5),
            NamedKey::F6 => Some(Key::F6),
            NamedKey::F7 => Some(Key::F7),
            NamedKey::F8 => Some(Key::F8),
            NamedKey::F9 => Some(Key::F9),
            NamedKey::F10 => Some(Key::F10),
            NamedKey::F11 => Some(Key::F11),
            NamedKey::F12 => Some(Key::F12),

            NamedKey::CapsLock => Some(Key::CapsLock),
            NamedKey::ScrollLock => Some(Key::ScrollLock),
            NamedKey::NumLock => Some(Key::NumLock),

            NamedKey::PrintScreen => Some(Key::PrintScreen),
            NamedKey::Pause => Some(Key::Pause),
            NamedKey::ContextMenu => Some(Key::Menu),

            _ => None,
        },
        _ => None,
    }
}

/// Current mouse and keyboard state of one window.
///
/// Keys are remembered by physical key, so a release is matched to its press
/// even when the logical key changed in between (Shift+1 releasing as `!`).
#[derive(Debug, Default)]
pub struct InputState {
    cursor: Option<[f32; 2]>,
    mouse_down: [bool; 3],
    keys_down: HashMap<PhysicalKey, Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a cursor move; `scale_factor` converts pixels to logical units
    pub fn cursor_moved(&mut self, position: PhysicalPosition<f64>, scale_factor: f64) {
        let logical = position.to_logical::<f64>(scale_factor);
        self.cursor = Some([logical.x as f32, logical.y as f32]);
    }

    pub fn cursor_left(&mut self) {
        self.cursor = None;
    }

    pub fn mouse_input(&mut self, button: WinitMouseButton, state: ElementState) {
        if let Some(index) = to_imgui_mouse_button(button).and_then(button_index) {
            self.mouse_down[index] = state.is_pressed();
        }
    }

    pub fn keyboard_input(&mut self, event: &KeyEvent) {
        self.key_changed(
            event.physical_key,
            &event.logical_key,
            event.location,
            event.state,
        );
    }

    fn key_changed(
        &mut self,
        physical_key: PhysicalKey,
        logical_key: &WinitKey,
        location: KeyLocation,
        state: ElementState,
    ) {
        match state {
            ElementState::Pressed => {
                if let Some(key) = winit_key_to_imgui_key(logical_key, location) {
                    self.keys_down.insert(physical_key, key);
                }
            }
            ElementState::Released => {
                self.keys_down.remove(&physical_key);
            }
        }
    }

    /// Forget held keys and buttons, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        self.keys_down.clear();
        self.mouse_down = [false; 3];
    }
}

fn button_index(button: ImGuiMouseButton) -> Option<usize> {
    match button {
        ImGuiMouseButton::Left => Some(0),
        ImGuiMouseButton::Right => Some(1),
        ImGuiMouseButton::Middle => Some(2),
        _ => None,
    }
}

impl InputSource for InputState {
    fn cursor_position(&self) -> Option<[f32; 2]> {
        self.cursor
    }

    fn is_mouse_down(&self, button: ImGuiMouseButton) -> bool {
        button_index(button).is_some_and(|index| self.mouse_down[index])
    }

    fn is_key_down(&self, key: Key) -> bool {
        self.keys_down.values().any(|&down| down == key)
    }
}
