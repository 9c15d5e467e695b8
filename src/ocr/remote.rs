//! Remote recognition service client.
//!
//! POSTs a JPEG-compressed frame to the kiosk backend's /ocr endpoint as a
//! multipart form. Any failure mode here (network error, timeout, non-2xx,
//! body missing fields) is the caller's cue to fall back to the local
//! engine; nothing is surfaced to the user.

use anyhow::{Result, anyhow};
use serde::Deserialize;
use std::time::Duration;

/// Card/PIN pair reported by the remote service. Either field may be
/// missing or null; extra response fields are ignored.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RemoteScan {
    pub card: Option<String>,
    pub pin: Option<String>,
}

impl RemoteScan {
    /// Both fields, when the service reported both.
    pub fn pair(&self) -> Option<(&str, &str)> {
        match (&self.card, &self.pin) {
            (Some(card), Some(pin)) => Some((card, pin)),
            _ => None,
        }
    }
}

/// Remote recognition over a compressed frame.
pub trait RemoteRecognizer {
    /// Submits a JPEG payload. `Err` covers network and protocol failures;
    /// a 2xx body with missing fields is `Ok` with absent fields.
    fn recognize(&self, jpeg: &[u8]) -> Result<RemoteScan>;
}

/// reqwest-backed client with a bounded request timeout.
pub struct HttpRecognizer {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpRecognizer {
    /// `endpoint` is the service base URL, e.g. `http://localhost:5000/api`.
    /// The timeout must be finite so the local fallback stays reachable.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }
}

impl RemoteRecognizer for HttpRecognizer {
    fn recognize(&self, jpeg: &[u8]) -> Result<RemoteScan> {
        let part = reqwest::blocking::multipart::Part::bytes(jpeg.to_vec())
            .file_name("scan.jpg")
            .mime_str("image/jpeg")?;
        let form = reqwest::blocking::multipart::Form::new().part("image", part);

        let response = self
            .client
            .post(format!("{}/ocr", self.endpoint))
            .multipart(form)
            .send()?;

        if !response.status().is_success() {
            return Err(anyhow!("OCR service returned HTTP {}", response.status()));
        }

        Ok(response.json()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_requires_both_fields() {
        let both = RemoteScan {
            card: Some("2269727192".to_string()),
            pin: Some("455427".to_string()),
        };
        assert_eq!(both.pair(), Some(("2269727192", "455427")));

        let card_only = RemoteScan {
            card: Some("2269727192".to_string()),
            pin: None,
        };
        assert!(card_only.pair().is_none());
        assert!(RemoteScan::default().pair().is_none());
    }

    #[test]
    fn test_response_parsing_tolerates_extra_and_missing_fields() {
        // The backend also sends success/valid/message; nulls and missing
        // fields both deserialize to absent.
        let scan: RemoteScan = serde_json::from_str(
            r#"{"success": true, "card": "1234567890", "pin": "123456", "valid": true, "message": "ok"}"#,
        )
        .unwrap();
        assert_eq!(scan.pair(), Some(("1234567890", "123456")));

        let empty: RemoteScan =
            serde_json::from_str(r#"{"success": false, "card": null, "pin": null}"#).unwrap();
        assert!(empty.pair().is_none());

        let bare: RemoteScan = serde_json::from_str("{}").unwrap();
        assert!(bare.pair().is_none());
    }

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let client =
            HttpRecognizer::new("http://localhost:5000/api/", Duration::from_millis(3000)).unwrap();
        assert_eq!(client.endpoint, "http://localhost:5000/api");
    }
}
