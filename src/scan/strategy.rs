//! Two-tier recognition: remote service first, on-device fallback.
//!
//! The remote tier is preferred because the backend runs a stronger engine;
//! the local tier keeps the kiosk working when the backend is unreachable.
//! A recognize() call never fails: every tier error collapses into a result
//! with absent fields, and the session just schedules another tick.

use anyhow::Result;
use image::codecs::jpeg::JpegEncoder;
use std::io::Cursor;
use std::time::Duration;

use crate::capture::Frame;
use crate::config::{ScanConfig, TokenCharset};
use crate::ocr::engine::{EngineOptions, OcrEngine, TesseractEngine};
use crate::ocr::extract::extract_tokens;
use crate::ocr::preprocess::{binarize, luma_plane};
use crate::ocr::remote::{HttpRecognizer, RemoteRecognizer, RemoteScan};

/// Which tier produced a recognition result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecognitionSource {
    Remote,
    Local,
}

/// Outcome of one recognition attempt. Both fields are absent when neither
/// tier produced a usable pair. Consumed immediately by the session.
#[derive(Clone, Debug)]
pub struct Recognition {
    pub card: Option<String>,
    pub pin: Option<String>,
    pub source: RecognitionSource,
}

impl Recognition {
    fn empty() -> Self {
        Self {
            card: None,
            pin: None,
            source: RecognitionSource::Local,
        }
    }

    /// Both fields, when present.
    pub fn pair(&self) -> Option<(&str, &str)> {
        match (&self.card, &self.pin) {
            (Some(card), Some(pin)) => Some((card, pin)),
            _ => None,
        }
    }
}

/// Remote-first, local-fallback recognition over a single frame.
pub struct RecognitionStrategy {
    remote: Box<dyn RemoteRecognizer>,
    engine: Box<dyn OcrEngine>,
    options: EngineOptions,
    charset: TokenCharset,
    jpeg_quality: u8,
}

impl RecognitionStrategy {
    pub fn new(
        remote: Box<dyn RemoteRecognizer>,
        engine: Box<dyn OcrEngine>,
        config: &ScanConfig,
    ) -> Self {
        Self {
            remote,
            engine,
            options: EngineOptions {
                whitelist: config.char_whitelist.clone(),
                languages: config.languages.clone(),
                single_line: true,
            },
            charset: config.token_charset,
            jpeg_quality: config.jpeg_quality,
        }
    }

    /// Production wiring: HTTP service client plus system Tesseract.
    pub fn from_config(config: &ScanConfig) -> Result<Self> {
        let remote = HttpRecognizer::new(
            &config.ocr_endpoint,
            Duration::from_millis(config.remote_timeout_ms),
        )?;
        let engine = match &config.tesseract_path {
            Some(path) => TesseractEngine::with_executable(path),
            None => TesseractEngine::new(),
        };
        Ok(Self::new(Box::new(remote), Box::new(engine), config))
    }

    /// Recognizes one frame. Never fails; tier errors collapse into a
    /// result with absent fields.
    pub fn recognize(&self, frame: Frame) -> Recognition {
        match self.try_remote(&frame) {
            Ok(scan) if scan.pair().is_some() => {
                return Recognition {
                    card: scan.card,
                    pin: scan.pin,
                    source: RecognitionSource::Remote,
                };
            }
            Ok(_) => crate::log("Remote OCR returned no usable pair, trying local engine"),
            Err(e) => crate::log(&format!("Remote OCR failed ({}), trying local engine", e)),
        }
        self.recognize_local(frame)
    }

    fn try_remote(&self, frame: &Frame) -> Result<RemoteScan> {
        let jpeg = encode_jpeg(frame, self.jpeg_quality)?;
        self.remote.recognize(&jpeg)
    }

    /// Local tier: binarize, run the engine, take the first two tokens as
    /// (card, pin). Engine failure yields an absent result.
    fn recognize_local(&self, mut frame: Frame) -> Recognition {
        binarize(&mut frame);
        let text = match self.engine.recognize(&luma_plane(&frame), &self.options) {
            Ok(text) => text,
            Err(e) => {
                crate::log(&format!("Local OCR failed: {}", e));
                return Recognition::empty();
            }
        };

        let mut tokens = extract_tokens(&text, self.charset).into_iter();
        match (tokens.next(), tokens.next()) {
            (Some(card), Some(pin)) => Recognition {
                card: Some(card),
                pin: Some(pin),
                source: RecognitionSource::Local,
            },
            _ => Recognition::empty(),
        }
    }
}

/// Encodes an RGBA frame as JPEG for the remote service.
fn encode_jpeg(frame: &Frame, quality: u8) -> Result<Vec<u8>> {
    // JPEG has no alpha channel; drop it before encoding
    let rgb = image::DynamicImage::ImageRgba8(frame.clone()).to_rgb8();
    let mut buf = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buf, quality).encode_image(&rgb)?;
    Ok(buf.into_inner())
}
