//! # Translation Lookup
//!
//! Pure key → text lookup. Configured overrides win, then the built-in
//! English catalogue, then the key itself so a missing entry is visible
//! rather than blank.

use std::collections::BTreeMap;

use crate::issuance::{QR_CODE_LABEL_KEY, WALLET_URL_LABEL_KEY};

/// Translate a message key into display text.
pub trait Translate {
    /// Look up `key`. Must be pure: the same key always yields the same text.
    fn translate(&self, key: &str) -> String;
}

const BUILTIN: &[(&str, &str)] = &[
    (QR_CODE_LABEL_KEY, "QR code"),
    (WALLET_URL_LABEL_KEY, "Wallet URL"),
    ("credential_wallet_url_title", "Issue to web wallet"),
    ("credential_wallet_url_subtitle", "Enter the address of your web wallet"),
    ("credential_qr_code_title", "Scan to receive your credential"),
];

/// Translation catalogue with configurable overrides.
#[derive(Debug, Clone, Default)]
pub struct Translations {
    overrides: BTreeMap<String, String>,
}

impl Translations {
    /// A catalogue with the given overrides on top of the built-in labels.
    pub fn with_overrides(overrides: BTreeMap<String, String>) -> Self {
        Self { overrides }
    }
}

impl Translate for Translations {
    fn translate(&self, key: &str) -> String {
        if let Some(text) = self.overrides.get(key) {
            return text.clone();
        }
        BUILTIN
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, text)| (*text).to_string())
            .unwrap_or_else(|| key.to_string())
    }
}

impl<F> Translate for F
where
    F: Fn(&str) -> String,
{
    fn translate(&self, key: &str) -> String {
        self(key)
    }
}
