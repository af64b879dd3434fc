//! Core modules of the padmap gamepad binding panel.
//!
//! The GUI lives in the binary; everything here is toolkit independent.

pub mod bindings;
pub mod bindings_list;
pub mod capture;
pub mod config;
pub mod error;
pub mod keys;
pub mod pad;
pub mod rebind;

pub use bindings::{BindChange, BindingTable, ConflictPolicy};
pub use config::{PadConfig, PortConfig};
pub use error::BindError;
pub use keys::KeyCode;
pub use pad::{PadControl, PadType};
pub use rebind::{KeyRebinder, RebindOutcome};
