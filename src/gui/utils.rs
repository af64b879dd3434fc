//! GUI utility functions.

use eframe::egui;
use padmap::keys::{KeyCode, parse_key_name};

/// Converts an egui key to its key code.
pub fn key_to_code(key: egui::Key) -> Option<KeyCode> {
    let key_name = match key {
        egui::Key::A => "A",
        egui::Key::B => "B",
        egui::Key::C => "C",
        egui::Key::D => "D",
        egui::Key::E => "E",
        egui::Key::F => "F",
        egui::Key::G => "G",
        egui::Key::H => "H",
        egui::Key::I => "I",
        egui::Key::J => "J",
        egui::Key::K => "K",
        egui::Key::L => "L",
        egui::Key::M => "M",
        egui::Key::N => "N",
        egui::Key::O => "O",
        egui::Key::P => "P",
        egui::Key::Q => "Q",
        egui::Key::R => "R",
        egui::Key::S => "S",
        egui::Key::T => "T",
        egui::Key::U => "U",
        egui::Key::V => "V",
        egui::Key::W => "W",
        egui::Key::X => "X",
        egui::Key::Y => "Y",
        egui::Key::Z => "Z",
        egui::Key::Num0 => "0",
        egui::Key::Num1 => "1",
        egui::Key::Num2 => "2",
        egui::Key::Num3 => "3",
        egui::Key::Num4 => "4",
        egui::Key::Num5 => "5",
        egui::Key::Num6 => "6",
        egui::Key::Num7 => "7",
        egui::Key::Num8 => "8",
        egui::Key::Num9 => "9",
        egui::Key::F1 => "F1",
        egui::Key::F2 => "F2",
        egui::Key::F3 => "F3",
        egui::Key::F4 => "F4",
        egui::Key::F5 => "F5",
        egui::Key::F6 => "F6",
        egui::Key::F7 => "F7",
        egui::Key::F8 => "F8",
        egui::Key::F9 => "F9",
        egui::Key::F10 => "F10",
        egui::Key::F11 => "F11",
        egui::Key::F12 => "F12",
        egui::Key::Delete => "DELETE",
        egui::Key::Insert => "INSERT",
        egui::Key::Home => "HOME",
        egui::Key::End => "END",
        egui::Key::PageUp => "PAGEUP",
        egui::Key::PageDown => "PAGEDOWN",
        egui::Key::Space => "SPACE",
        egui::Key::Tab => "TAB",
        egui::Key::Escape => "ESCAPE",
        egui::Key::Enter => "RETURN",
        egui::Key::Backspace => "BACK",
        egui::Key::ArrowLeft => "LEFT",
        egui::Key::ArrowRight => "RIGHT",
        egui::Key::ArrowUp => "UP",
        egui::Key::ArrowDown => "DOWN",
        egui::Key::Semicolon => "OEM_1",
        egui::Key::Equals => "OEM_PLUS",
        egui::Key::Comma => "OEM_COMMA",
        egui::Key::Minus => "OEM_MINUS",
        egui::Key::Period => "OEM_PERIOD",
        egui::Key::Slash => "OEM_2",
        egui::Key::Backtick => "OEM_3",
        egui::Key::OpenBracket => "OEM_4",
        egui::Key::Backslash => "OEM_5",
        egui::Key::CloseBracket => "OEM_6",
        egui::Key::Quote => "OEM_7",
        _ => return None,
    };
    parse_key_name(key_name)
}

/// Key codes for modifiers that became pressed between two frames.
///
/// egui reports modifiers as state, not key events, so presses are found by
/// comparing consecutive snapshots. Left and right are not distinguished;
/// the left-hand code is used.
pub fn pressed_modifiers(before: egui::Modifiers, now: egui::Modifiers) -> Vec<KeyCode> {
    let mut pressed = Vec::new();
    if now.shift && !before.shift {
        pressed.push(KeyCode(0xA0));
    }
    if now.ctrl && !before.ctrl {
        pressed.push(KeyCode(0xA2));
    }
    if now.alt && !before.alt {
        pressed.push(KeyCode(0xA4));
    }
    pressed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_to_code_letters() {
        assert_eq!(key_to_code(egui::Key::A), Some(KeyCode(0x41)));
        assert_eq!(key_to_code(egui::Key::Z), Some(KeyCode(0x5A)));
    }

    #[test]
    fn test_key_to_code_special() {
        assert_eq!(key_to_code(egui::Key::Escape), Some(KeyCode::ESCAPE));
        assert_eq!(key_to_code(egui::Key::Enter), Some(KeyCode(0x0D)));
        assert_eq!(key_to_code(egui::Key::F12), Some(KeyCode(0x7B)));
        assert_eq!(key_to_code(egui::Key::Semicolon), Some(KeyCode(0xBA)));
    }

    #[test]
    fn test_pressed_modifiers() {
        let none = egui::Modifiers::NONE;
        assert_eq!(pressed_modifiers(none, egui::Modifiers::SHIFT), vec![KeyCode(0xA0)]);
        assert!(pressed_modifiers(egui::Modifiers::SHIFT, egui::Modifiers::SHIFT).is_empty());
        assert!(pressed_modifiers(egui::Modifiers::SHIFT, none).is_empty());
    }
}
