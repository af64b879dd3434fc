//! Key capture: waits for the next key press without blocking the UI thread.
//!
//! Producers push [`CaptureEvent`]s into a channel. The owner of a
//! [`KeyCapture`] calls [`KeyCapture::poll`] once per frame; the poll never
//! blocks and reports the outcome once a key, a cancel request, or the
//! timeout arrives.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use tracing::{debug, info};

use crate::error::BindError;
use crate::keys::KeyCode;
use crate::pad::PadControl;

/// Input delivered to a pending capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureEvent {
    Key(KeyCode),
    /// In-band cancel, sent for the Escape key.
    Cancel,
}

impl CaptureEvent {
    /// Maps a key press to an event, Escape becoming a cancel request.
    pub fn from_key(key: KeyCode) -> Self {
        if key == KeyCode::ESCAPE {
            CaptureEvent::Cancel
        } else {
            CaptureEvent::Key(key)
        }
    }
}

/// Out-of-band cancellation for one capture.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Control waiting for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureTarget {
    pub port: usize,
    pub control: PadControl,
}

/// Result of one [`KeyCapture::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// No capture in progress.
    Idle,
    /// Still waiting.
    Pending,
    Captured { target: CaptureTarget, key: KeyCode },
    Cancelled { target: CaptureTarget },
    TimedOut { target: CaptureTarget },
}

#[derive(Debug)]
struct PendingCapture {
    target: CaptureTarget,
    token: CancelToken,
    deadline: Option<Instant>,
}

/// Non-blocking "await next key" primitive.
pub struct KeyCapture {
    sender: Sender<CaptureEvent>,
    receiver: Receiver<CaptureEvent>,
    timeout: Option<Duration>,
    pending: Option<PendingCapture>,
}

impl KeyCapture {
    /// `timeout` of `None` waits until a key or cancel arrives.
    pub fn new(timeout: Option<Duration>) -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self {
            sender,
            receiver,
            timeout,
            pending: None,
        }
    }

    /// Handle for producers of key events.
    pub fn sender(&self) -> Sender<CaptureEvent> {
        self.sender.clone()
    }

    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    pub fn is_active(&self) -> bool {
        self.pending.is_some()
    }

    pub fn target(&self) -> Option<CaptureTarget> {
        self.pending.as_ref().map(|p| p.target)
    }

    /// Starts waiting for a key for `target`. Events queued before this call
    /// are discarded.
    pub fn begin(&mut self, target: CaptureTarget) -> Result<CancelToken, BindError> {
        if self.pending.is_some() {
            return Err(BindError::CaptureBusy);
        }
        let stale = self.receiver.try_iter().count();
        if stale > 0 {
            debug!(stale, "discarded queued capture events");
        }

        let token = CancelToken::new();
        self.pending = Some(PendingCapture {
            target,
            token: token.clone(),
            deadline: self.timeout.map(|t| Instant::now() + t),
        });
        info!(port = target.port, control = %target.control, "key capture started");
        Ok(token)
    }

    /// Cancels the capture in progress, if any.
    pub fn cancel(&self) {
        if let Some(pending) = &self.pending {
            pending.token.cancel();
        }
    }

    /// Checks for a finished capture. Never blocks.
    pub fn poll(&mut self) -> CaptureOutcome {
        self.poll_at(Instant::now())
    }

    fn poll_at(&mut self, now: Instant) -> CaptureOutcome {
        let Some(pending) = &self.pending else {
            return CaptureOutcome::Idle;
        };
        let target = pending.target;

        if pending.token.is_cancelled() {
            self.pending = None;
            info!(control = %target.control, "key capture cancelled");
            return CaptureOutcome::Cancelled { target };
        }

        match self.receiver.try_recv() {
            Ok(CaptureEvent::Key(key)) => {
                self.pending = None;
                info!(control = %target.control, %key, "key captured");
                CaptureOutcome::Captured { target, key }
            }
            Ok(CaptureEvent::Cancel) => {
                self.pending = None;
                info!(control = %target.control, "key capture cancelled");
                CaptureOutcome::Cancelled { target }
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => {
                if pending.deadline.is_some_and(|d| now >= d) {
                    self.pending = None;
                    info!(control = %target.control, "key capture timed out");
                    CaptureOutcome::TimedOut { target }
                } else {
                    CaptureOutcome::Pending
                }
            }
        }
    }
}

impl Default for KeyCapture {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: CaptureTarget = CaptureTarget {
        port: 0,
        control: PadControl::Cross,
    };

    #[test]
    fn test_idle_without_capture() {
        let mut capture = KeyCapture::default();
        assert_eq!(capture.poll(), CaptureOutcome::Idle);
    }

    #[test]
    fn test_pending_until_key() {
        let mut capture = KeyCapture::default();
        let sender = capture.sender();
        capture.begin(TARGET).unwrap();

        assert_eq!(capture.poll(), CaptureOutcome::Pending);
        assert_eq!(capture.poll(), CaptureOutcome::Pending);

        sender.send(CaptureEvent::Key(KeyCode(0x4B))).unwrap();
        assert_eq!(
            capture.poll(),
            CaptureOutcome::Captured {
                target: TARGET,
                key: KeyCode(0x4B)
            }
        );
        assert!(!capture.is_active());
        assert_eq!(capture.poll(), CaptureOutcome::Idle);
    }

    #[test]
    fn test_escape_cancels() {
        let mut capture = KeyCapture::default();
        capture.begin(TARGET).unwrap();
        capture
            .sender()
            .send(CaptureEvent::from_key(KeyCode::ESCAPE))
            .unwrap();
        assert_eq!(capture.poll(), CaptureOutcome::Cancelled { target: TARGET });
    }

    #[test]
    fn test_token_cancels() {
        let mut capture = KeyCapture::default();
        let token = capture.begin(TARGET).unwrap();
        token.cancel();
        capture.sender().send(CaptureEvent::Key(KeyCode(0x41))).unwrap();
        assert_eq!(capture.poll(), CaptureOutcome::Cancelled { target: TARGET });
    }

    #[test]
    fn test_begin_discards_stale_events() {
        let mut capture = KeyCapture::default();
        capture.sender().send(CaptureEvent::Key(KeyCode(0x41))).unwrap();
        capture.begin(TARGET).unwrap();
        assert_eq!(capture.poll(), CaptureOutcome::Pending);
    }

    #[test]
    fn test_second_begin_is_busy() {
        let mut capture = KeyCapture::default();
        capture.begin(TARGET).unwrap();
        assert_eq!(capture.begin(TARGET).unwrap_err(), BindError::CaptureBusy);
    }

    #[test]
    fn test_timeout() {
        let mut capture = KeyCapture::new(Some(Duration::from_millis(50)));
        capture.begin(TARGET).unwrap();
        let now = Instant::now();

        assert_eq!(capture.poll_at(now), CaptureOutcome::Pending);
        assert_eq!(
            capture.poll_at(now + Duration::from_secs(1)),
            CaptureOutcome::TimedOut { target: TARGET }
        );
    }
}
