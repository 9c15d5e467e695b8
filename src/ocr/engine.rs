//! On-device recognition engine seam.
//!
//! Production shells out to a system Tesseract binary with a digit whitelist
//! and single-line segmentation; tests substitute fakes through the
//! `OcrEngine` trait. Engine failure of any kind is absorbed by the caller
//! as "no usable local result".

use anyhow::{Result, anyhow};
use image::{ImageBuffer, Luma};
use std::path::PathBuf;
use std::process::Command;
use tempfile::NamedTempFile;

/// Engine configuration: recognition alphabet, languages, segmentation.
#[derive(Clone, Debug)]
pub struct EngineOptions {
    /// Characters the engine may emit
    pub whitelist: String,
    /// Language packs, joined with '+' for Tesseract (e.g. eng+ara)
    pub languages: Vec<String>,
    /// Treat the input as a single line of text
    pub single_line: bool,
}

impl EngineOptions {
    /// Digit-only, single-line options covering Latin and Arabic glyph sets.
    pub fn digits() -> Self {
        Self {
            whitelist: "0123456789".to_string(),
            languages: vec!["eng".to_string(), "ara".to_string()],
            single_line: true,
        }
    }
}

/// On-device character recognition over a binarized image.
pub trait OcrEngine {
    /// Runs recognition and returns the raw recognized text.
    fn recognize(
        &self,
        img: &ImageBuffer<Luma<u8>, Vec<u8>>,
        options: &EngineOptions,
    ) -> Result<String>;
}

/// Tesseract subprocess engine.
pub struct TesseractEngine {
    executable: PathBuf,
}

impl TesseractEngine {
    /// Uses `tesseract` from PATH.
    pub fn new() -> Self {
        Self {
            executable: PathBuf::from("tesseract"),
        }
    }

    /// Uses an explicitly configured executable.
    pub fn with_executable(path: impl Into<PathBuf>) -> Self {
        Self {
            executable: path.into(),
        }
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(
        &self,
        img: &ImageBuffer<Luma<u8>, Vec<u8>>,
        options: &EngineOptions,
    ) -> Result<String> {
        // Hand the image over via a temporary PNG; Tesseract reads files,
        // not pipes, on all platforms we care about.
        let temp_input = NamedTempFile::with_suffix(".png")?;
        img.save(temp_input.path())?;

        let mut cmd = Command::new(&self.executable);
        cmd.arg(temp_input.path())
            .arg("stdout")
            .arg("-l")
            .arg(options.languages.join("+"))
            .arg("--psm")
            .arg(if options.single_line { "7" } else { "6" });
        if !options.whitelist.is_empty() {
            cmd.arg("-c")
                .arg(format!("tessedit_char_whitelist={}", options.whitelist));
        }

        let output = cmd.output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("Tesseract failed: {}", stderr));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
