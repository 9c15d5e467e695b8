//! Configuration for the scan pipeline.
//!
//! Loads settings from scan_config.json at startup. Provides the remote OCR
//! endpoint, engine options, and the timing parameters of the capture loop.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use crate::capture::CapturePreference;

/// Global configuration instance, initialized once at startup.
static CONFIG: OnceLock<ScanConfig> = OnceLock::new();

/// Which characters qualify as token material during extraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenCharset {
    /// ASCII digits only (card numbers and PINs)
    Digits,
    /// Digits plus ASCII letters, for deployments with named cards
    Alphanumeric,
}

impl Default for TokenCharset {
    fn default() -> Self {
        TokenCharset::Digits
    }
}

/// Complete scan pipeline configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Base URL of the remote recognition service
    #[serde(default = "default_ocr_endpoint")]
    pub ocr_endpoint: String,
    /// Request timeout for the remote service (milliseconds). Must be finite
    /// so the local fallback is reachable in bounded time.
    #[serde(default = "default_remote_timeout_ms")]
    pub remote_timeout_ms: u64,
    /// JPEG quality (0-100) for frames uploaded to the remote service
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    /// Delay between frame-readiness polls (milliseconds)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Delay before the next tick after a failed recognition attempt
    /// (milliseconds)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Settle delay after a match, allowing user-facing feedback to register
    /// (milliseconds)
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// Token charset for the local recognition path
    #[serde(default)]
    pub token_charset: TokenCharset,
    /// Characters the local engine may emit
    #[serde(default = "default_char_whitelist")]
    pub char_whitelist: String,
    /// Language packs for the local engine
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
    /// Explicit path to the tesseract executable; `None` uses PATH
    #[serde(default)]
    pub tesseract_path: Option<String>,
    /// Camera preference handed to the capture device
    #[serde(default)]
    pub capture: CapturePreference,
}

fn default_ocr_endpoint() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_remote_timeout_ms() -> u64 {
    3000
}

fn default_jpeg_quality() -> u8 {
    80
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_retry_delay_ms() -> u64 {
    400
}

fn default_settle_delay_ms() -> u64 {
    800
}

fn default_char_whitelist() -> String {
    "0123456789".to_string()
}

fn default_languages() -> Vec<String> {
    vec!["eng".to_string(), "ara".to_string()]
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ocr_endpoint: default_ocr_endpoint(),
            remote_timeout_ms: default_remote_timeout_ms(),
            jpeg_quality: default_jpeg_quality(),
            poll_interval_ms: default_poll_interval_ms(),
            retry_delay_ms: default_retry_delay_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            token_charset: TokenCharset::default(),
            char_whitelist: default_char_whitelist(),
            languages: default_languages(),
            tesseract_path: None,
            capture: CapturePreference::default(),
        }
    }
}

/// Loads configuration from scan_config.json or returns defaults.
/// Looks for scan_config.json in the same directory as the executable.
fn load_config() -> ScanConfig {
    let config_path = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("scan_config.json")))
        .unwrap_or_else(|| Path::new("scan_config.json").to_path_buf());

    crate::log(&format!("Looking for config at: {}", config_path.display()));

    if config_path.exists() {
        match fs::read_to_string(config_path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    crate::log("Config loaded from scan_config.json");
                    return config;
                }
                Err(e) => {
                    crate::log(&format!(
                        "Failed to parse scan_config.json: {}. Using defaults.",
                        e
                    ));
                }
            },
            Err(e) => {
                crate::log(&format!(
                    "Failed to read scan_config.json: {}. Using defaults.",
                    e
                ));
            }
        }
    } else {
        crate::log("scan_config.json not found. Using default config.");
    }

    ScanConfig::default()
}

/// Initializes the global configuration. Call once at startup.
pub fn init_config() {
    let _ = CONFIG.set(load_config());
}

/// Returns a reference to the global configuration.
/// Panics if called before init_config().
pub fn get_config() -> &'static ScanConfig {
    CONFIG
        .get()
        .expect("Config not initialized. Call init_config() first.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScanConfig::default();
        assert_eq!(config.remote_timeout_ms, 3000);
        assert_eq!(config.poll_interval_ms, 100);
        assert_eq!(config.retry_delay_ms, 400);
        assert_eq!(config.settle_delay_ms, 800);
        assert_eq!(config.token_charset, TokenCharset::Digits);
        assert_eq!(config.char_whitelist, "0123456789");
        assert_eq!(config.languages, vec!["eng", "ara"]);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ScanConfig =
            serde_json::from_str(r#"{"ocr_endpoint": "http://kiosk.local/api"}"#).unwrap();
        assert_eq!(config.ocr_endpoint, "http://kiosk.local/api");
        assert_eq!(config.remote_timeout_ms, 3000);
        assert_eq!(config.capture.facing, "environment");
    }

    #[test]
    fn test_token_charset_parses_lowercase() {
        let config: ScanConfig =
            serde_json::from_str(r#"{"token_charset": "alphanumeric"}"#).unwrap();
        assert_eq!(config.token_charset, TokenCharset::Alphanumeric);
    }
}
