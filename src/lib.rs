//! Kiosk Card Scanner
//!
//! Authentication core for a self-service kiosk: recovers a card number and
//! PIN from a live camera feed (remote OCR service first, on-device engine
//! as fallback) or validates a typed pair, then grants a timed in-memory
//! session.
//!
//! The pipeline is: capture device → frame → binarization → recognition →
//! token extraction → credential match → session grant. Rendering, audio
//! feedback, and credential provisioning live outside this crate; the seams
//! are the `CaptureDevice`, `RemoteRecognizer`, and `OcrEngine` traits plus
//! the injected `CredentialSet`.

pub mod capture;
pub mod config;
pub mod credentials;
pub mod grant;
pub mod ocr;
pub mod scan;

pub use capture::{CaptureDevice, CapturePreference, Frame};
pub use config::{ScanConfig, TokenCharset, get_config, init_config};
pub use credentials::{Credential, CredentialSet};
pub use grant::SessionGrant;
pub use scan::{
    CancelHandle, Recognition, RecognitionSource, RecognitionStrategy, ScanSession, ScanState,
};

use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

/// Optional log file path, set by the embedding application.
static LOG_FILE: Mutex<Option<PathBuf>> = Mutex::new(None);

/// Logs a message to stdout with a timestamp, and to the log file if one
/// has been set via [`set_log_file`].
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, msg);
    print!("{}", line);
    if let Ok(guard) = LOG_FILE.lock() {
        if let Some(path) = guard.as_ref() {
            if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
                let _ = file.write_all(line.as_bytes());
            }
        }
    }
}

/// Routes log output to a file in addition to stdout. Pass `None` to go back
/// to stdout only.
pub fn set_log_file(path: Option<PathBuf>) {
    if let Ok(mut guard) = LOG_FILE.lock() {
        *guard = path;
    }
}
