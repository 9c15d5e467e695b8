//! Scan session state machine.
//!
//! Drives the capture loop: polls the device for frames, hands each ready
//! frame to the recognition strategy, checks the result against the
//! credential set, and terminates on a match, cancellation, or device
//! failure.
//!
//! One recognition attempt is in flight at a time: tick N+1 is never
//! scheduled before tick N's outcome resolves, so results cannot reorder.
//! The capture device is released exactly once on every terminal
//! transition.

use anyhow::Result;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::capture::{CaptureDevice, Frame};
use crate::config::ScanConfig;
use crate::credentials::CredentialSet;
use crate::grant::SessionGrant;
use crate::scan::strategy::RecognitionStrategy;

/// Session lifecycle states.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScanState {
    /// Not started yet
    Idle,
    /// Waiting for the device to buffer a ready frame
    Capturing,
    /// A frame has been handed to the recognition strategy
    AwaitingRecognition,
    /// Terminal: the recognized card matched the credential set
    Matched(String),
    /// Terminal: cancelled from outside (user navigated away)
    Cancelled,
    /// Terminal: unrecoverable device error
    Failed(String),
}

impl ScanState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ScanState::Matched(_) | ScanState::Cancelled | ScanState::Failed(_)
        )
    }
}

impl std::fmt::Display for ScanState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanState::Idle => write!(f, "Idle"),
            ScanState::Capturing => write!(f, "Capturing"),
            ScanState::AwaitingRecognition => write!(f, "Awaiting recognition"),
            ScanState::Matched(card) => write!(f, "Matched: {}", card),
            ScanState::Cancelled => write!(f, "Cancelled"),
            ScanState::Failed(msg) => write!(f, "Failed: {}", msg),
        }
    }
}

/// Clonable handle for cancelling a running session from another thread
/// (hotkey handler, UI navigation).
#[derive(Clone, Debug)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// A fresh, uncancelled handle, for wiring cancellation sources up
    /// before the session exists.
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// One scan attempt over one exclusively owned capture device.
pub struct ScanSession<D: CaptureDevice> {
    /// Current state
    pub state: ScanState,
    device: D,
    strategy: RecognitionStrategy,
    credentials: CredentialSet,
    config: ScanConfig,
    cancel: Arc<AtomicBool>,
    pending_frame: Option<Frame>,
    device_released: bool,
    started_at: Instant,
}

impl<D: CaptureDevice> ScanSession<D> {
    pub fn new(
        device: D,
        strategy: RecognitionStrategy,
        credentials: CredentialSet,
        config: ScanConfig,
    ) -> Self {
        Self::with_cancel_handle(device, strategy, credentials, config, CancelHandle::new())
    }

    /// Builds a session around an existing cancel handle, so the embedder
    /// can hook up its cancellation source (hotkey, navigation) first.
    pub fn with_cancel_handle(
        device: D,
        strategy: RecognitionStrategy,
        credentials: CredentialSet,
        config: ScanConfig,
        handle: CancelHandle,
    ) -> Self {
        Self {
            state: ScanState::Idle,
            device,
            strategy,
            credentials,
            config,
            cancel: handle.flag,
            pending_frame: None,
            device_released: false,
            started_at: Instant::now(),
        }
    }

    /// Handle for cancelling this session; the flag is owned by the session,
    /// not process-wide.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            flag: self.cancel.clone(),
        }
    }

    /// The matched card number, once the session reached `Matched`.
    pub fn matched_card(&self) -> Option<&str> {
        match &self.state {
            ScanState::Matched(card) => Some(card),
            _ => None,
        }
    }

    /// A session grant for the matched card, once the session reached
    /// `Matched`.
    pub fn grant(&self) -> Option<SessionGrant> {
        self.matched_card()
            .map(|card| SessionGrant::new(card.to_string()))
    }

    /// Advances the state machine by one step.
    ///
    /// Returns `Ok(true)` if the session should keep ticking, `Ok(false)`
    /// once a terminal state is reached.
    pub fn step(&mut self) -> Result<bool> {
        // Cancellation is checked before scheduling each tick. A recognition
        // attempt that was already in flight when the flag flipped completes
        // inside its own step and is discarded there.
        if self.cancel.load(Ordering::SeqCst) {
            crate::log("Scan cancelled");
            self.enter_terminal(ScanState::Cancelled);
            return Ok(false);
        }

        match &self.state {
            ScanState::Idle => {
                crate::log("Starting scan session, acquiring capture device");
                self.started_at = Instant::now();
                match self.device.start(&self.config.capture) {
                    Ok(()) => {
                        self.state = ScanState::Capturing;
                        Ok(true)
                    }
                    Err(e) => {
                        // Fatal: never retried automatically
                        crate::log(&format!("Capture device unavailable: {}", e));
                        self.enter_terminal(ScanState::Failed(format!(
                            "Capture device unavailable: {}",
                            e
                        )));
                        Ok(false)
                    }
                }
            }

            ScanState::Capturing => match self.device.poll_frame() {
                Ok(Some(frame)) => {
                    self.pending_frame = Some(frame);
                    self.state = ScanState::AwaitingRecognition;
                    Ok(true)
                }
                Ok(None) => {
                    // No readiness bound here; liveness rests on the device
                    // eventually producing frames or on cancellation
                    self.sleep(self.config.poll_interval_ms);
                    Ok(true)
                }
                Err(e) => {
                    crate::log(&format!("Capture device error: {}", e));
                    self.enter_terminal(ScanState::Failed(format!("Capture device error: {}", e)));
                    Ok(false)
                }
            },

            ScanState::AwaitingRecognition => {
                let Some(frame) = self.pending_frame.take() else {
                    self.state = ScanState::Capturing;
                    return Ok(true);
                };

                let result = self.strategy.recognize(frame);

                // A cancel that landed mid-attempt discards the result,
                // match or not
                if self.cancel.load(Ordering::SeqCst) {
                    crate::log("Scan cancelled, discarding recognition result");
                    self.enter_terminal(ScanState::Cancelled);
                    return Ok(false);
                }

                if let Some((card, pin)) = result.pair() {
                    if self.credentials.find(card, pin).is_some() {
                        crate::log(&format!(
                            "Card {} recognized via {:?} tier in {:.1}s",
                            card,
                            result.source,
                            self.started_at.elapsed().as_secs_f32()
                        ));
                        let card = card.to_string();
                        // Settle delay lets user-facing feedback register
                        // before the session reports completion
                        self.sleep(self.config.settle_delay_ms);
                        self.enter_terminal(ScanState::Matched(card));
                        return Ok(false);
                    }
                    crate::log("Recognized pair did not match any credential");
                }

                self.sleep(self.config.retry_delay_ms);
                self.state = ScanState::Capturing;
                Ok(true)
            }

            ScanState::Matched(_) | ScanState::Cancelled | ScanState::Failed(_) => Ok(false),
        }
    }

    /// Runs the session to a terminal state.
    pub fn run(&mut self) -> &ScanState {
        loop {
            match self.step() {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    crate::log(&format!("Scan session error: {}", e));
                    self.enter_terminal(ScanState::Failed(e.to_string()));
                    break;
                }
            }
        }

        match &self.state {
            ScanState::Matched(card) => {
                crate::log(&format!("Scan session matched card {}", card));
            }
            ScanState::Cancelled => {
                crate::log("Scan session cancelled");
            }
            ScanState::Failed(msg) => {
                crate::log(&format!("Scan session failed: {}", msg));
            }
            _ => {}
        }

        &self.state
    }

    fn enter_terminal(&mut self, next: ScanState) {
        self.release_device();
        self.state = next;
    }

    fn release_device(&mut self) {
        if !self.device_released {
            self.device.stop();
            self.device_released = true;
        }
    }

    fn sleep(&self, ms: u64) {
        if ms > 0 {
            std::thread::sleep(Duration::from_millis(ms));
        }
    }
}
