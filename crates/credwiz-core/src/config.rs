//! # Wizard Configuration
//!
//! YAML configuration for a wizard deployment. Every field has a default,
//! so an empty document (or no file at all) yields a working wizard.
//!
//! ```yaml
//! default_issue_method: walletUrl
//! offer_expiry_secs: 300
//! translations:
//!   credential_issuance_method_qr_code_label: "QR-Code"
//! ```
//!
//! The file path is taken from [`CONFIG_ENV_VAR`] when not given explicitly.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CredwizError;
use crate::i18n::Translations;
use crate::issuance::IssueMethod;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "CREDWIZ_CONFIG";

/// Deployment configuration for the issuance wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    /// Method preselected when the wizard mounts.
    pub default_issue_method: IssueMethod,
    /// Expiry handed to the offer generator, in seconds.
    pub offer_expiry_secs: Option<u64>,
    /// Translation overrides, keyed by message key.
    pub translations: BTreeMap<String, String>,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            default_issue_method: IssueMethod::KNOWN[0].clone(),
            offer_expiry_secs: None,
            translations: BTreeMap::new(),
        }
    }
}

impl WizardConfig {
    /// Parse a YAML document.
    pub fn from_yaml_str(source_name: &str, yaml: &str) -> Result<Self, CredwizError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| CredwizError::Config {
            source_name: source_name.to_string(),
            reason: format!("invalid YAML: {e}"),
        })
    }

    /// Load a YAML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CredwizError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| CredwizError::Config {
            source_name: path.display().to_string(),
            reason: format!("cannot read file: {e}"),
        })?;
        let config = Self::from_yaml_str(&path.display().to_string(), &content)?;
        tracing::debug!(path = %path.display(), "loaded wizard configuration");
        Ok(config)
    }

    /// Load the file named by `CREDWIZ_CONFIG`, or the defaults when unset.
    pub fn from_env() -> Result<Self, CredwizError> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::load(path.trim()),
            _ => Ok(Self::default()),
        }
    }

    /// The translation catalogue described by this configuration.
    pub fn translations(&self) -> Translations {
        Translations::with_overrides(self.translations.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Translate;
    use crate::issuance::QR_CODE_LABEL_KEY;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = WizardConfig::default();
        assert_eq!(config.default_issue_method, IssueMethod::QrCode);
        assert!(config.offer_expiry_secs.is_none());
        assert!(config.translations.is_empty());
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(WizardConfig::from_yaml_str("inline", "").unwrap(), WizardConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let config = WizardConfig::from_yaml_str(
            "inline",
            "default_issue_method: walletUrl\noffer_expiry_secs: 120\n",
        )
        .unwrap();
        assert_eq!(config.default_issue_method, IssueMethod::WalletUrl);
        assert_eq!(config.offer_expiry_secs, Some(120));
    }

    #[test]
    fn test_translations_override() {
        let config = WizardConfig::from_yaml_str(
            "inline",
            "translations:\n  credential_issuance_method_qr_code_label: QR-Code\n",
        )
        .unwrap();
        assert_eq!(config.translations().translate(QR_CODE_LABEL_KEY), "QR-Code");
    }

    #[test]
    fn test_invalid_yaml_reports_source() {
        let err = WizardConfig::from_yaml_str("wizard.yaml", "offer_expiry_secs: [").unwrap_err();
        assert!(err.to_string().contains("wizard.yaml"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_issue_method: walletUrl").unwrap();
        let config = WizardConfig::load(file.path()).unwrap();
        assert_eq!(config.default_issue_method, IssueMethod::WalletUrl);
    }

    #[test]
    fn test_load_missing_file() {
        let err = WizardConfig::load("/nonexistent/credwiz.yaml").unwrap_err();
        assert!(matches!(err, CredwizError::Config { .. }));
    }
}
