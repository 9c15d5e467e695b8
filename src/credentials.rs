//! Credential set and matching.
//!
//! Provisioning supplies the kiosk a static card/PIN list; this module only
//! parses and matches it. Both the scan path and the manual login form go
//! through [`CredentialSet::find`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One provisioned card/PIN pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub card: String,
    pub pin: String,
}

/// Read-only credential list supplied by provisioning.
///
/// Uniqueness of card numbers is not enforced; a duplicate pair resolves to
/// the earliest entry.
#[derive(Clone, Debug, Default)]
pub struct CredentialSet {
    entries: Vec<Credential>,
}

impl CredentialSet {
    pub fn new(entries: Vec<Credential>) -> Self {
        Self { entries }
    }

    /// Loads a credential file: a JSON array of `{card, pin}` objects.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read credential file {}", path.display()))?;
        Self::from_json(&contents)
    }

    /// Parses a JSON array of `{card, pin}` objects.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<Credential> =
            serde_json::from_str(json).context("Failed to parse credential list")?;
        Ok(Self::new(entries))
    }

    /// Exact-match lookup on both fields. First match wins; absence is an
    /// ordinary negative outcome, not an error.
    pub fn find(&self, card: &str, pin: &str) -> Option<&Credential> {
        self.entries.iter().find(|c| c.card == card && c.pin == pin)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set() -> CredentialSet {
        CredentialSet::new(vec![
            Credential {
                card: "2269727192".to_string(),
                pin: "455427".to_string(),
            },
            Credential {
                card: "admin".to_string(),
                pin: "12345".to_string(),
            },
        ])
    }

    #[test]
    fn test_find_known_pair() {
        let creds = set();
        let found = creds.find("2269727192", "455427").unwrap();
        assert_eq!(found.card, "2269727192");
    }

    #[test]
    fn test_find_wrong_pin_is_absent() {
        assert!(set().find("2269727192", "000000").is_none());
    }

    #[test]
    fn test_find_unknown_card_is_absent() {
        assert!(set().find("1111111111", "455427").is_none());
    }

    #[test]
    fn test_both_fields_must_match() {
        // card from one entry, pin from another
        assert!(set().find("2269727192", "12345").is_none());
    }

    #[test]
    fn test_duplicate_pair_resolves_to_earliest() {
        let creds = CredentialSet::new(vec![
            Credential {
                card: "1234567890".to_string(),
                pin: "111111".to_string(),
            },
            Credential {
                card: "1234567890".to_string(),
                pin: "111111".to_string(),
            },
        ]);
        let found = creds.find("1234567890", "111111").unwrap();
        assert!(std::ptr::eq(found, creds.entries.first().unwrap()));
        assert_eq!(creds.len(), 2);
    }

    #[test]
    fn test_from_json() {
        let creds = CredentialSet::from_json(
            r#"[{"card": "1234567890", "pin": "123456"}, {"card": "9876543210", "pin": "654321"}]"#,
        )
        .unwrap();
        assert_eq!(creds.len(), 2);
        assert!(creds.find("9876543210", "654321").is_some());
    }

    #[test]
    fn test_from_json_malformed_is_error() {
        assert!(CredentialSet::from_json("not json").is_err());
    }

    #[test]
    fn test_empty_set_matches_nothing() {
        let creds = CredentialSet::default();
        assert!(creds.is_empty());
        assert!(creds.find("", "").is_none());
    }
}
