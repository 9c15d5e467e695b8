//! Capture device seam.
//!
//! The camera is an external collaborator: the kiosk front end hands the
//! session something that can start, buffer frames, and stop. The active
//! `ScanSession` owns the handle exclusively and releases it on every
//! terminal transition.

use anyhow::Result;
use image::{ImageBuffer, Rgba};
use serde::{Deserialize, Serialize};

/// One captured camera frame (RGBA, 8 bits per channel).
///
/// Produced once per capture tick and consumed by the recognition pipeline;
/// frames are never retained across ticks.
pub type Frame = ImageBuffer<Rgba<u8>, Vec<u8>>;

/// Preferred camera facing and resolution, forwarded to the device on start.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CapturePreference {
    /// Which camera to prefer ("environment" = rear-facing)
    pub facing: String,
    /// Ideal frame width in pixels
    pub width: u32,
    /// Ideal frame height in pixels
    pub height: u32,
}

impl Default for CapturePreference {
    fn default() -> Self {
        Self {
            facing: "environment".to_string(),
            width: 1920,
            height: 1080,
        }
    }
}

/// Camera handle owned by a scan session.
pub trait CaptureDevice {
    /// Acquires the device. Failure (permission denied, device unavailable)
    /// is fatal to the session; it is never retried automatically.
    fn start(&mut self, pref: &CapturePreference) -> Result<()>;

    /// Returns the next buffered frame, or `None` when the device has not
    /// buffered a ready frame yet. An error means the device is gone.
    fn poll_frame(&mut self) -> Result<Option<Frame>>;

    /// Stops capture and releases all underlying tracks. Idempotent.
    fn stop(&mut self);
}
