//! Physical key codes and their names.
//!
//! Key codes follow the Windows virtual-key numbering, which is what the
//! capture layer produces and what the configuration file stores by name.

use std::fmt;
use std::str::FromStr;

use crate::error::BindError;

/// A physical keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(pub u32);

impl KeyCode {
    pub const ESCAPE: KeyCode = KeyCode(0x1B);

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Human readable name, as used in the bindings list and config file.
    pub fn name(self) -> String {
        key_name(self)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&key_name(*self))
    }
}

impl FromStr for KeyCode {
    type Err = BindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_key_name(s).ok_or_else(|| BindError::UnknownKey(s.to_string()))
    }
}

/// Converts a key code to its name.
#[inline]
pub fn key_name(key: KeyCode) -> String {
    let vk = key.0;
    match vk {
        // A-Z, 0-9
        0x41..=0x5A | 0x30..=0x39 => char::from_u32(vk)
            .map(|c| c.to_string())
            .unwrap_or_default(),
        // Numpad 0-9
        0x60..=0x69 => format!("NUMPAD{}", vk - 0x60),
        // F1-F24
        0x70..=0x87 => format!("F{}", vk - 0x70 + 1),
        // Navigation keys
        0x20 => "SPACE".to_string(),
        0x0D => "RETURN".to_string(),
        0x09 => "TAB".to_string(),
        0x1B => "ESCAPE".to_string(),
        0x08 => "BACK".to_string(),
        0x2E => "DELETE".to_string(),
        0x2D => "INSERT".to_string(),
        0x24 => "HOME".to_string(),
        0x23 => "END".to_string(),
        0x21 => "PAGEUP".to_string(),
        0x22 => "PAGEDOWN".to_string(),
        0x26 => "UP".to_string(),
        0x28 => "DOWN".to_string(),
        0x25 => "LEFT".to_string(),
        0x27 => "RIGHT".to_string(),
        // Lock and special keys
        0x14 => "CAPITAL".to_string(),
        0x90 => "NUMLOCK".to_string(),
        0x91 => "SCROLL".to_string(),
        0x13 => "PAUSE".to_string(),
        0x2C => "SNAPSHOT".to_string(),
        // Numpad operators
        0x6A => "MULTIPLY".to_string(),
        0x6B => "ADD".to_string(),
        0x6C => "SEPARATOR".to_string(),
        0x6D => "SUBTRACT".to_string(),
        0x6E => "DECIMAL".to_string(),
        0x6F => "DIVIDE".to_string(),
        // OEM keys
        0xBA => "OEM_1".to_string(),
        0xBB => "OEM_PLUS".to_string(),
        0xBC => "OEM_COMMA".to_string(),
        0xBD => "OEM_MINUS".to_string(),
        0xBE => "OEM_PERIOD".to_string(),
        0xBF => "OEM_2".to_string(),
        0xC0 => "OEM_3".to_string(),
        0xDB => "OEM_4".to_string(),
        0xDC => "OEM_5".to_string(),
        0xDD => "OEM_6".to_string(),
        0xDE => "OEM_7".to_string(),
        0xDF => "OEM_8".to_string(),
        0xE2 => "OEM_102".to_string(),
        // Modifiers
        0xA2 => "LCTRL".to_string(),
        0xA3 => "RCTRL".to_string(),
        0xA4 => "LALT".to_string(),
        0xA5 => "RALT".to_string(),
        0xA0 => "LSHIFT".to_string(),
        0xA1 => "RSHIFT".to_string(),
        0x5B => "LWIN".to_string(),
        0x5C => "RWIN".to_string(),
        _ => format!("VK_{:02X}", vk),
    }
}

/// Parses a key name back into a key code. Case-insensitive, accepts a few
/// common aliases and the `VK_xx` hex form produced for unnamed keys.
pub fn parse_key_name(name: &str) -> Option<KeyCode> {
    let key = name.trim().to_uppercase();

    // letters and digits
    if key.len() == 1
        && let Some(c) = key.chars().next()
        && (c.is_ascii_alphabetic() || c.is_ascii_digit())
    {
        return Some(KeyCode(c as u32));
    }

    // F1-F24
    if let Some(rest) = key.strip_prefix('F')
        && let Ok(num) = rest.parse::<u32>()
        && (1..=24).contains(&num)
    {
        return Some(KeyCode(0x70 + num - 1));
    }

    if let Some(rest) = key.strip_prefix("NUMPAD")
        && let Ok(num) = rest.parse::<u32>()
        && num <= 9
    {
        return Some(KeyCode(0x60 + num));
    }

    if let Some(hex) = key.strip_prefix("VK_")
        && let Ok(vk) = u32::from_str_radix(hex, 16)
    {
        return Some(KeyCode(vk));
    }

    let vk = match key.as_str() {
        "ESC" | "ESCAPE" => 0x1B,
        "ENTER" | "RETURN" => 0x0D,
        "TAB" => 0x09,
        "PAUSE" => 0x13,
        "CAPSLOCK" | "CAPITAL" => 0x14,
        "SPACE" => 0x20,
        "BACKSPACE" | "BACK" => 0x08,
        "DELETE" => 0x2E,
        "INSERT" => 0x2D,
        "HOME" => 0x24,
        "END" => 0x23,
        "PAGEUP" => 0x21,
        "PAGEDOWN" => 0x22,
        "UP" => 0x26,
        "DOWN" => 0x28,
        "LEFT" => 0x25,
        "RIGHT" => 0x27,
        "LSHIFT" => 0xA0,
        "RSHIFT" => 0xA1,
        "LCTRL" => 0xA2,
        "RCTRL" => 0xA3,
        "LALT" => 0xA4,
        "RALT" => 0xA5,
        "LWIN" => 0x5B,
        "RWIN" => 0x5C,
        "NUMLOCK" => 0x90,
        "SCROLL" => 0x91,
        "SNAPSHOT" => 0x2C,
        "MULTIPLY" => 0x6A,
        "ADD" => 0x6B,
        "SEPARATOR" => 0x6C,
        "SUBTRACT" => 0x6D,
        "DECIMAL" => 0x6E,
        "DIVIDE" => 0x6F,
        "OEM_1" | "SEMICOLON" => 0xBA,
        "OEM_PLUS" => 0xBB,
        "OEM_COMMA" | "COMMA" => 0xBC,
        "OEM_MINUS" | "MINUS" => 0xBD,
        "OEM_PERIOD" | "PERIOD" => 0xBE,
        "OEM_2" | "SLASH" => 0xBF,
        "OEM_3" => 0xC0,
        "OEM_4" => 0xDB,
        "OEM_5" => 0xDC,
        "OEM_6" => 0xDD,
        "OEM_7" => 0xDE,
        "OEM_8" => 0xDF,
        "OEM_102" => 0xE2,
        _ => return None,
    };
    Some(KeyCode(vk))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_and_digits() {
        assert_eq!(parse_key_name("A"), Some(KeyCode(0x41)));
        assert_eq!(parse_key_name("z"), Some(KeyCode(0x5A)));
        assert_eq!(parse_key_name("7"), Some(KeyCode(0x37)));
        assert_eq!(key_name(KeyCode(0x4B)), "K");
    }

    #[test]
    fn test_function_and_numpad_keys() {
        assert_eq!(parse_key_name("F1"), Some(KeyCode(0x70)));
        assert_eq!(parse_key_name("f24"), Some(KeyCode(0x87)));
        assert_eq!(parse_key_name("F25"), None);
        assert_eq!(parse_key_name("NUMPAD3"), Some(KeyCode(0x63)));
        assert_eq!(key_name(KeyCode(0x7B)), "F12");
    }

    #[test]
    fn test_aliases() {
        assert_eq!(parse_key_name("ESC"), Some(KeyCode::ESCAPE));
        assert_eq!(parse_key_name("enter"), Some(KeyCode(0x0D)));
        assert_eq!(parse_key_name("semicolon"), Some(KeyCode(0xBA)));
    }

    #[test]
    fn test_unnamed_key_uses_hex_form() {
        let key = KeyCode(0xE9);
        assert_eq!(key_name(key), "VK_E9");
        assert_eq!(parse_key_name("VK_E9"), Some(key));
    }

    #[test]
    fn test_names_parse_back() {
        for vk in 0u32..=0xFE {
            let key = KeyCode(vk);
            assert_eq!(parse_key_name(&key_name(key)), Some(key), "vk {:#x}", vk);
        }
    }

    #[test]
    fn test_unknown_name_is_error() {
        let err = "NOPE".parse::<KeyCode>().unwrap_err();
        assert!(matches!(err, BindError::UnknownKey(ref s) if s == "NOPE"));
    }
}
