//! Virtual pad model: logical controls, pad types and pad naming.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Number of virtual controller ports.
pub const MAX_PORTS: usize = 2;

/// One named input on the virtual controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum PadControl {
    L2,
    R2,
    L1,
    R1,
    Triangle,
    Circle,
    Cross,
    Square,
    Select,
    L3,
    R3,
    Start,
    Up,
    Right,
    Down,
    Left,
    LStickUp,
    LStickRight,
    LStickDown,
    LStickLeft,
    RStickUp,
    RStickRight,
    RStickDown,
    RStickLeft,
}

impl PadControl {
    pub const COUNT: usize = 24;

    /// All controls in table order.
    pub const ALL: [PadControl; Self::COUNT] = [
        PadControl::L2,
        PadControl::R2,
        PadControl::L1,
        PadControl::R1,
        PadControl::Triangle,
        PadControl::Circle,
        PadControl::Cross,
        PadControl::Square,
        PadControl::Select,
        PadControl::L3,
        PadControl::R3,
        PadControl::Start,
        PadControl::Up,
        PadControl::Right,
        PadControl::Down,
        PadControl::Left,
        PadControl::LStickUp,
        PadControl::LStickRight,
        PadControl::LStickDown,
        PadControl::LStickLeft,
        PadControl::RStickUp,
        PadControl::RStickRight,
        PadControl::RStickDown,
        PadControl::RStickLeft,
    ];

    /// Position of the control in [`PadControl::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Display label shown in the bindings list and the capture prompt.
    pub const fn label(self) -> &'static str {
        match self {
            PadControl::L2 => "L2",
            PadControl::R2 => "R2",
            PadControl::L1 => "L1",
            PadControl::R1 => "R1",
            PadControl::Triangle => "Triangle",
            PadControl::Circle => "Circle",
            PadControl::Cross => "Cross",
            PadControl::Square => "Square",
            PadControl::Select => "Select",
            PadControl::L3 => "L3",
            PadControl::R3 => "R3",
            PadControl::Start => "Start",
            PadControl::Up => "Up",
            PadControl::Right => "Right",
            PadControl::Down => "Down",
            PadControl::Left => "Left",
            PadControl::LStickUp => "L_Up",
            PadControl::LStickRight => "L_Right",
            PadControl::LStickDown => "L_Down",
            PadControl::LStickLeft => "L_Left",
            PadControl::RStickUp => "R_Up",
            PadControl::RStickRight => "R_Right",
            PadControl::RStickDown => "R_Down",
            PadControl::RStickLeft => "R_Left",
        }
    }
}

impl std::fmt::Display for PadControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PadControl {
    type Err = ();

    /// Accepts the display label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PadControl::ALL
            .iter()
            .copied()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}

/// Kind of controller plugged into a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum PadType {
    Unplugged,
    #[default]
    DualShock2,
}

impl PadType {
    pub fn all() -> &'static [PadType] {
        &[PadType::Unplugged, PadType::DualShock2]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PadType::Unplugged => "Unplugged",
            PadType::DualShock2 => "DualShock 2",
        }
    }
}

/// Human readable name of a (port, slot) socket.
pub fn pad_name(port: usize, slot: usize) -> String {
    if slot == 0 {
        format!("Pad {}", port + 1)
    } else {
        format!("Pad {}-{}", port + 1, slot + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_table_order() {
        for (i, control) in PadControl::ALL.iter().enumerate() {
            assert_eq!(control.index(), i);
        }
    }

    #[test]
    fn test_labels_are_unique() {
        let mut labels: Vec<&str> = PadControl::ALL.iter().map(|c| c.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), PadControl::COUNT);
    }

    #[test]
    fn test_parse_label() {
        assert_eq!("Triangle".parse(), Ok(PadControl::Triangle));
        assert_eq!("l_up".parse(), Ok(PadControl::LStickUp));
        assert_eq!("Turbo".parse::<PadControl>(), Err(()));
    }

    #[test]
    fn test_pad_name() {
        assert_eq!(pad_name(0, 0), "Pad 1");
        assert_eq!(pad_name(1, 0), "Pad 2");
        assert_eq!(pad_name(1, 2), "Pad 2-3");
    }
}
