//! Scan loop: two-tier recognition driven by a session state machine.
//!
//! This module provides:
//! - `RecognitionStrategy`: remote-service-first recognition with local
//!   engine fallback
//! - `ScanSession`: the capture/recognize/match loop and its states
//! - `CancelHandle`: cross-thread cancellation of a running session

pub mod session;
pub mod strategy;

pub use session::{CancelHandle, ScanSession, ScanState};
pub use strategy::{Recognition, RecognitionSource, RecognitionStrategy};
