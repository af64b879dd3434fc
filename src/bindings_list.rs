//! Rows of the bindings list view, derived from a port's keysym map.

use crate::config::PadConfig;
use crate::error::BindError;
use crate::keys::KeyCode;
use crate::pad::PadControl;

/// Device column value for keyboard bindings.
pub const KEYBOARD_DEVICE: &str = "Keyboard";

/// One row: device, key name, control label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingRow {
    pub device: &'static str,
    pub key_name: String,
    pub control_label: &'static str,
    pub key: KeyCode,
    pub control: PadControl,
}

/// Read-only projection of one port's bindings.
#[derive(Debug, Clone, Default)]
pub struct BindingsList {
    port: usize,
    rows: Vec<BindingRow>,
    selected: Option<usize>,
}

impl BindingsList {
    pub fn new(port: usize) -> Self {
        Self {
            port,
            rows: Vec::new(),
            selected: None,
        }
    }

    pub fn port(&self) -> usize {
        self.port
    }

    pub fn rows(&self) -> &[BindingRow] {
        &self.rows
    }

    /// Rebuilds every row from `config`. The selection survives when the
    /// selected key is still bound.
    pub fn refresh(&mut self, config: &PadConfig) -> Result<(), BindError> {
        let selected_key = self.selected_row().map(|r| r.key);

        self.rows.clear();
        for (key, control) in config.keysym_map(self.port)? {
            self.rows.push(BindingRow {
                device: KEYBOARD_DEVICE,
                key_name: key.name(),
                control_label: control.label(),
                key,
                control,
            });
        }

        self.selected = selected_key.and_then(|k| self.rows.iter().position(|r| r.key == k));
        Ok(())
    }

    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index.filter(|&i| i < self.rows.len());
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_row(&self) -> Option<&BindingRow> {
        self.selected.and_then(|i| self.rows.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pad::PadType;

    #[test]
    fn test_rows_match_keysym_map() {
        let config = PadConfig::default();
        let mut list = BindingsList::new(0);
        list.refresh(&config).unwrap();

        let expected = config.keysym_map(0).unwrap().count();
        assert_eq!(list.rows().len(), expected);
        assert!(list.rows().iter().all(|r| r.device == KEYBOARD_DEVICE));

        let cross = list
            .rows()
            .iter()
            .find(|r| r.control == PadControl::Cross)
            .unwrap();
        assert_eq!(cross.key_name, "K");
        assert_eq!(cross.control_label, "Cross");
    }

    #[test]
    fn test_empty_port_has_no_rows() {
        let config = PadConfig::default();
        let mut list = BindingsList::new(1);
        list.refresh(&config).unwrap();
        assert!(list.rows().is_empty());
    }

    #[test]
    fn test_selection_tracks_key() {
        let mut config = PadConfig::default();
        let mut list = BindingsList::new(0);
        list.refresh(&config).unwrap();

        let idx = list
            .rows()
            .iter()
            .position(|r| r.control == PadControl::Start)
            .unwrap();
        list.select(Some(idx));
        let key = list.selected_row().unwrap().key;

        config.unbind_key(0, KeyCode(0x41)).unwrap();
        list.refresh(&config).unwrap();
        assert_eq!(list.selected_row().map(|r| r.key), Some(key));

        config.populate(0, PadType::Unplugged).unwrap();
        list.refresh(&config).unwrap();
        assert_eq!(list.selected(), None);
    }

    #[test]
    fn test_refresh_unknown_port() {
        let config = PadConfig::default();
        let mut list = BindingsList::new(3);
        assert_eq!(
            list.refresh(&config),
            Err(BindError::InvalidPort { port: 3 })
        );
    }
}
