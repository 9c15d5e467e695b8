//! Token extraction from raw recognized text.
//!
//! OCR output is noisy: stray punctuation, line breaks, single misread
//! glyphs. Extraction keeps maximal runs of charset characters and drops
//! anything three characters or shorter. Order is preserved as found, since
//! engines emit top-to-bottom, left-to-right and the card number is printed
//! above the PIN.

use regex::Regex;
use std::sync::OnceLock;

use crate::config::TokenCharset;

/// Tokens shorter than this are OCR noise (stray digits, misreads).
const MIN_TOKEN_LEN: usize = 4;

fn digit_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]+").expect("digit token pattern is valid"))
}

fn alnum_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9A-Za-z]+").expect("alnum token pattern is valid"))
}

/// Extracts candidate tokens from raw OCR text.
///
/// Every character outside the charset acts as a separator; qualifying runs
/// are returned in reading order. No qualifying tokens is an ordinary empty
/// result, not an error.
pub fn extract_tokens(raw: &str, charset: TokenCharset) -> Vec<String> {
    let re = match charset {
        TokenCharset::Digits => digit_runs(),
        TokenCharset::Alphanumeric => alnum_runs(),
    };
    re.find_iter(raw)
        .map(|m| m.as_str().to_string())
        .filter(|t| t.len() >= MIN_TOKEN_LEN)
        .collect()
}
