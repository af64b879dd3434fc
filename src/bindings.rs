//! Per-port binding table.
//!
//! The control → key array is the source of truth. The key → control map
//! (the keysym map) is a secondary index that every mutation updates in the
//! same call, so a key never points at a control that no longer claims it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::error::BindError;
use crate::keys::KeyCode;
use crate::pad::PadControl;

/// What happens when a key that already drives another control is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// The key moves: its previous control is left unbound.
    #[default]
    Steal,
    /// The bind fails with [`BindError::KeyInUse`].
    Reject,
}

/// Side effects of a successful bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BindChange {
    /// Key the control was bound to before.
    pub previous_key: Option<KeyCode>,
    /// Control that lost the key to this bind.
    pub displaced: Option<PadControl>,
}

/// Key bindings of one controller port.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BindingTable {
    keys: [Option<KeyCode>; PadControl::COUNT],
    keysym: BTreeMap<KeyCode, PadControl>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table pre-filled with the default keyboard layout.
    pub fn with_default_layout() -> Self {
        let mut table = Self::new();
        for &(control, key) in DEFAULT_LAYOUT {
            table.insert(control, key);
        }
        table
    }

    /// Key currently bound to `control`.
    #[inline]
    pub fn key_for(&self, control: PadControl) -> Option<KeyCode> {
        self.keys[control.index()]
    }

    /// Control currently driven by `key`.
    #[inline]
    pub fn control_for(&self, key: KeyCode) -> Option<PadControl> {
        self.keysym.get(&key).copied()
    }

    /// Keysym map entries in key-code order.
    pub fn keysym_map(&self) -> impl Iterator<Item = (KeyCode, PadControl)> + '_ {
        self.keysym.iter().map(|(&k, &c)| (k, c))
    }

    /// Bound controls in table order.
    pub fn iter(&self) -> impl Iterator<Item = (PadControl, KeyCode)> + '_ {
        PadControl::ALL
            .iter()
            .filter_map(|&c| self.key_for(c).map(|k| (c, k)))
    }

    pub fn len(&self) -> usize {
        self.keysym.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keysym.is_empty()
    }

    /// Binds `key` to `control`, replacing the control's previous key.
    pub fn bind(
        &mut self,
        control: PadControl,
        key: KeyCode,
        policy: ConflictPolicy,
    ) -> Result<BindChange, BindError> {
        let owner = self.control_for(key);
        if let Some(other) = owner
            && other != control
            && policy == ConflictPolicy::Reject
        {
            return Err(BindError::KeyInUse {
                key,
                control: other,
            });
        }

        let previous_key = self.unbind_control(control);
        let displaced = match owner {
            Some(other) if other != control => {
                self.unbind_control(other);
                Some(other)
            }
            _ => None,
        };

        self.insert(control, key);
        debug!(?control, %key, ?previous_key, ?displaced, "binding updated");

        Ok(BindChange {
            previous_key,
            displaced,
        })
    }

    /// Removes the binding of `control`, returning its key.
    pub fn unbind_control(&mut self, control: PadControl) -> Option<KeyCode> {
        let key = self.keys[control.index()].take()?;
        self.keysym.remove(&key);
        Some(key)
    }

    /// Removes the binding of `key`, returning the control it drove.
    pub fn unbind_key(&mut self, key: KeyCode) -> Option<PadControl> {
        let control = self.keysym.remove(&key)?;
        self.keys[control.index()] = None;
        Some(control)
    }

    pub fn clear(&mut self) {
        self.keys = [None; PadControl::COUNT];
        self.keysym.clear();
    }

    /// Replaces the whole table with `bindings`, later entries winning.
    /// Returns the controls that lost their key along the way.
    pub fn replace_all<I>(&mut self, bindings: I) -> SmallVec<[PadControl; 4]>
    where
        I: IntoIterator<Item = (PadControl, KeyCode)>,
    {
        self.clear();
        let mut displaced = SmallVec::new();
        for (control, key) in bindings {
            if let Ok(change) = self.bind(control, key, ConflictPolicy::Steal)
                && let Some(other) = change.displaced
            {
                displaced.push(other);
            }
        }
        displaced
    }

    fn insert(&mut self, control: PadControl, key: KeyCode) {
        self.keys[control.index()] = Some(key);
        self.keysym.insert(key, control);
    }
}

/// Default keyboard layout for a DualShock 2 pad.
pub const DEFAULT_LAYOUT: &[(PadControl, KeyCode)] = &[
    (PadControl::L2, KeyCode(0x41)),        // A
    (PadControl::R2, KeyCode(0xBA)),        // ;
    (PadControl::L1, KeyCode(0x57)),        // W
    (PadControl::R1, KeyCode(0x50)),        // P
    (PadControl::Triangle, KeyCode(0x49)),  // I
    (PadControl::Circle, KeyCode(0x4C)),    // L
    (PadControl::Cross, KeyCode(0x4B)),     // K
    (PadControl::Square, KeyCode(0x4A)),    // J
    (PadControl::Select, KeyCode(0x56)),    // V
    (PadControl::Start, KeyCode(0x4E)),     // N
    (PadControl::Up, KeyCode(0x45)),        // E
    (PadControl::Right, KeyCode(0x46)),     // F
    (PadControl::Down, KeyCode(0x44)),      // D
    (PadControl::Left, KeyCode(0x53)),      // S
];
