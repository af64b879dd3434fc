//! Key rebinding interaction: prompt, capture, apply.

use std::time::Duration;

use crossbeam_channel::Sender;
use tracing::warn;

use crate::bindings::BindChange;
use crate::capture::{CancelToken, CaptureEvent, CaptureOutcome, CaptureTarget, KeyCapture};
use crate::config::PadConfig;
use crate::error::BindError;
use crate::keys::KeyCode;
use crate::pad::PadControl;

/// Status text shown while no capture is running.
pub const IDLE_STATUS: &str = "Gamepad Configuration.";

/// Finished rebind interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebindOutcome {
    Bound {
        port: usize,
        control: PadControl,
        key: KeyCode,
        change: BindChange,
    },
    Cancelled,
    TimedOut,
}

/// Drives one capture at a time and writes the result into a [`PadConfig`].
pub struct KeyRebinder {
    capture: KeyCapture,
    status: String,
}

impl KeyRebinder {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            capture: KeyCapture::new(timeout),
            status: IDLE_STATUS.to_string(),
        }
    }

    /// Rebinder using the timeout configured in `config`.
    pub fn from_config(config: &PadConfig) -> Self {
        Self::new(timeout_from_ms(config.capture_timeout_ms))
    }

    pub fn set_timeout_ms(&mut self, ms: u64) {
        self.capture.set_timeout(timeout_from_ms(ms));
    }

    /// Prompt or idle message for the status bar.
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_capturing(&self) -> bool {
        self.capture.is_active()
    }

    pub fn target(&self) -> Option<CaptureTarget> {
        self.capture.target()
    }

    /// Handle for key event producers.
    pub fn sender(&self) -> Sender<CaptureEvent> {
        self.capture.sender()
    }

    /// Starts rebinding `control` on `port`.
    pub fn start(
        &mut self,
        config: &PadConfig,
        port: usize,
        control: PadControl,
    ) -> Result<CancelToken, BindError> {
        config.port(port)?;
        let token = self.capture.begin(CaptureTarget { port, control })?;
        self.status = format!(
            "Press a key to set '{}' to, or Escape to cancel.",
            control.label()
        );
        Ok(token)
    }

    pub fn cancel(&self) {
        self.capture.cancel();
    }

    /// Polls the capture and applies a captured key to `config`.
    ///
    /// Returns `Ok(None)` while waiting or idle. A rejected key ends the
    /// interaction with an error and leaves `config` untouched.
    pub fn poll(&mut self, config: &mut PadConfig) -> Result<Option<RebindOutcome>, BindError> {
        let outcome = match self.capture.poll() {
            CaptureOutcome::Idle | CaptureOutcome::Pending => return Ok(None),
            CaptureOutcome::Cancelled { .. } => RebindOutcome::Cancelled,
            CaptureOutcome::TimedOut { .. } => RebindOutcome::TimedOut,
            CaptureOutcome::Captured { target, key } => {
                self.status = IDLE_STATUS.to_string();
                let change = config
                    .set_keyboard_key(target.port, key, target.control)
                    .inspect_err(|e| warn!(error = %e, "rebind rejected"))?;
                RebindOutcome::Bound {
                    port: target.port,
                    control: target.control,
                    key,
                    change,
                }
            }
        };
        self.status = IDLE_STATUS.to_string();
        Ok(Some(outcome))
    }
}

impl Default for KeyRebinder {
    fn default() -> Self {
        Self::new(None)
    }
}

fn timeout_from_ms(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_follows_capture() {
        let config = PadConfig::default();
        let mut rebinder = KeyRebinder::default();
        assert_eq!(rebinder.status(), IDLE_STATUS);

        rebinder.start(&config, 0, PadControl::Triangle).unwrap();
        assert_eq!(
            rebinder.status(),
            "Press a key to set 'Triangle' to, or Escape to cancel."
        );

        rebinder.cancel();
        let mut config = config;
        assert_eq!(
            rebinder.poll(&mut config).unwrap(),
            Some(RebindOutcome::Cancelled)
        );
        assert_eq!(rebinder.status(), IDLE_STATUS);
    }

    #[test]
    fn test_start_rejects_unknown_port() {
        let config = PadConfig::default();
        let mut rebinder = KeyRebinder::default();
        assert_eq!(
            rebinder.start(&config, 7, PadControl::L1).unwrap_err(),
            BindError::InvalidPort { port: 7 }
        );
        assert!(!rebinder.is_capturing());
        assert_eq!(rebinder.status(), IDLE_STATUS);
    }

    #[test]
    fn test_timeout_from_ms() {
        assert_eq!(timeout_from_ms(0), None);
        assert_eq!(timeout_from_ms(1500), Some(Duration::from_millis(1500)));
    }
}
