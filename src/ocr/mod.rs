//! OCR pipeline pieces.
//!
//! This module provides:
//! - Frame binarization tuned for low-contrast camera captures
//! - Token extraction from raw recognized text
//! - The on-device engine seam (Tesseract subprocess in production)
//! - The remote recognition service client

pub mod engine;
pub mod extract;
pub mod preprocess;
pub mod remote;

pub use engine::{EngineOptions, OcrEngine, TesseractEngine};
pub use extract::extract_tokens;
pub use preprocess::{binarize, luma_plane};
pub use remote::{HttpRecognizer, RemoteRecognizer, RemoteScan};
