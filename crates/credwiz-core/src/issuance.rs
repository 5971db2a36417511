//! # Issuance Selections
//!
//! The values a user picks while walking the wizard: which credential type
//! to issue (step 1) and how the finished offer is delivered (step 2).
//!
//! ## Issue Methods
//!
//! | Wire value  | Variant                  | Presentation          |
//! |-------------|--------------------------|-----------------------|
//! | `qrCode`    | [`IssueMethod::QrCode`]  | QR code modal         |
//! | `walletUrl` | [`IssueMethod::WalletUrl`] | wallet-URL modal    |
//! | anything else | [`IssueMethod::Other`] | rejected at dispatch  |

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::i18n::Translate;

/// Translation key for the QR code method label.
pub const QR_CODE_LABEL_KEY: &str = "credential_issuance_method_qr_code_label";
/// Translation key for the wallet-URL method label.
pub const WALLET_URL_LABEL_KEY: &str = "credential_issuance_method_wallet_url_label";

/// How a finished credential offer is delivered to the holder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IssueMethod {
    /// Display the offer as a QR code.
    QrCode,
    /// Ask for a web wallet address and hand the offer to it.
    WalletUrl,
    /// A value the wizard does not know how to present.
    Other(String),
}

impl IssueMethod {
    /// The methods the wizard can present, in display order.
    /// The first entry is the default selection.
    pub const KNOWN: [IssueMethod; 2] = [IssueMethod::QrCode, IssueMethod::WalletUrl];

    /// The wire value.
    pub fn as_str(&self) -> &str {
        match self {
            Self::QrCode => "qrCode",
            Self::WalletUrl => "walletUrl",
            Self::Other(s) => s,
        }
    }

    /// Translation key of the human-readable label, if this is a known method.
    pub fn label_key(&self) -> Option<&'static str> {
        match self {
            Self::QrCode => Some(QR_CODE_LABEL_KEY),
            Self::WalletUrl => Some(WALLET_URL_LABEL_KEY),
            Self::Other(_) => None,
        }
    }

    /// Whether the dispatcher has a presentation for this method.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<&str> for IssueMethod {
    fn from(s: &str) -> Self {
        match s {
            "qrCode" => Self::QrCode,
            "walletUrl" => Self::WalletUrl,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for IssueMethod {
    fn from(s: String) -> Self {
        match s.as_str() {
            "qrCode" => Self::QrCode,
            "walletUrl" => Self::WalletUrl,
            _ => Self::Other(s),
        }
    }
}

impl From<IssueMethod> for String {
    fn from(m: IssueMethod) -> Self {
        match m {
            IssueMethod::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for IssueMethod {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl std::fmt::Display for IssueMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An issue method paired with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueMethodSelection {
    /// Human-readable label.
    pub label: String,
    /// The method itself.
    pub value: IssueMethod,
}

impl IssueMethodSelection {
    /// Build the selection for `method`, labelling it through `translate`.
    ///
    /// Unknown methods are labelled with their wire value.
    pub fn labelled(method: IssueMethod, translate: &dyn Translate) -> Self {
        let label = match method.label_key() {
            Some(key) => translate.translate(key),
            None => method.as_str().to_string(),
        };
        Self { label, value: method }
    }
}

/// The selectable issue methods, labelled, in [`IssueMethod::KNOWN`] order.
pub fn issue_method_selections(translate: &dyn Translate) -> Vec<IssueMethodSelection> {
    IssueMethod::KNOWN
        .into_iter()
        .map(|m| IssueMethodSelection::labelled(m, translate))
        .collect()
}

/// The credential type chosen at step 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialTypeSelection {
    /// Human-readable label.
    pub label: String,
    /// Credential type identifier (e.g., `"VerifiedEmployee"`).
    pub value: String,
    /// Identifier of the JSON schema describing this type's subject, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_id: Option<String>,
}

impl CredentialTypeSelection {
    /// A selection whose label is its value.
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
            schema_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Translations;

    #[test]
    fn test_known_wire_values() {
        assert_eq!(IssueMethod::QrCode.as_str(), "qrCode");
        assert_eq!(IssueMethod::WalletUrl.as_str(), "walletUrl");
        assert_eq!(IssueMethod::from("qrCode"), IssueMethod::QrCode);
        assert_eq!(IssueMethod::from("walletUrl"), IssueMethod::WalletUrl);
    }

    #[test]
    fn test_unknown_value_is_kept() {
        let m: IssueMethod = "bluetooth".parse().unwrap();
        assert_eq!(m, IssueMethod::Other("bluetooth".to_string()));
        assert!(!m.is_supported());
        assert_eq!(m.to_string(), "bluetooth");
    }

    #[test]
    fn test_serde_uses_wire_value() {
        let json = serde_json::to_string(&IssueMethod::WalletUrl).unwrap();
        assert_eq!(json, "\"walletUrl\"");
        let parsed: IssueMethod = serde_json::from_str("\"nfc\"").unwrap();
        assert_eq!(parsed, IssueMethod::Other("nfc".to_string()));
    }

    #[test]
    fn test_default_is_first_known() {
        assert_eq!(IssueMethod::KNOWN[0], IssueMethod::QrCode);
    }

    #[test]
    fn test_selections_are_labelled() {
        let selections = issue_method_selections(&Translations::default());
        assert_eq!(selections.len(), 2);
        assert_eq!(selections[0].value, IssueMethod::QrCode);
        assert_eq!(selections[0].label, "QR code");
        assert_eq!(selections[1].label, "Wallet URL");
    }

    #[test]
    fn test_unknown_selection_label_is_wire_value() {
        let sel = IssueMethodSelection::labelled(IssueMethod::from("nfc"), &Translations::default());
        assert_eq!(sel.label, "nfc");
    }

    #[test]
    fn test_credential_type_new() {
        let t = CredentialTypeSelection::new("X");
        assert_eq!(t.label, "X");
        assert_eq!(t.value, "X");
        assert!(t.schema_id.is_none());
    }
}
