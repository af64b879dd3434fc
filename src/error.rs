use thiserror::Error;

use crate::keys::KeyCode;
use crate::pad::PadControl;

/// Errors raised while editing bindings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BindError {
    #[error("port {port} is not configured")]
    InvalidPort { port: usize },

    #[error("key {key} is already bound to {control}")]
    KeyInUse { key: KeyCode, control: PadControl },

    #[error("unknown key name '{0}'")]
    UnknownKey(String),

    #[error("a key capture is already in progress")]
    CaptureBusy,
}
