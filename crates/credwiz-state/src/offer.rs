//! # Credential Offers
//!
//! A credential offer is produced asynchronously once an issuance modal is
//! open. The generator and the wallet-URL submission target are external
//! collaborators, abstracted as traits so hosts and tests can supply their
//! own.

use async_trait::async_trait;
use credwiz_core::{CredentialTypeSelection, ModalSessionId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::OfferError;

/// A generated credential offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrValueResult {
    /// Offer identifier assigned by the generator.
    pub id: String,
    /// The offer URI rendered as QR code or handed to a wallet.
    pub uri_value: String,
    /// Lifetime of the offer, if it expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_in_sec: Option<u64>,
}

impl QrValueResult {
    /// When the offer expires, counted from `issued_at`.
    pub fn expires_at(&self, issued_at: Timestamp) -> Option<Timestamp> {
        self.expiry_in_sec.map(|secs| issued_at.plus_secs(secs))
    }
}

/// Which modal the offer is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModalKind {
    /// The QR code modal.
    QrCode,
    /// The wallet-URL modal.
    WalletUrl,
}

impl std::fmt::Display for ModalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QrCode => f.write_str("qrCode"),
            Self::WalletUrl => f.write_str("walletUrl"),
        }
    }
}

/// What the generator is asked to produce an offer for.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferRequest {
    /// The modal session the offer belongs to.
    pub modal: ModalSessionId,
    /// How the offer will be presented.
    pub presentation: ModalKind,
    /// Credential type chosen at step 1.
    pub credential_type: Option<CredentialTypeSelection>,
    /// Subject data entered at step 1.
    pub subject: Option<Value>,
    /// Requested lifetime, from configuration.
    pub expiry_in_sec: Option<u64>,
}

/// Produces credential offers.
#[async_trait]
pub trait OfferGenerator: Send + Sync {
    /// Generate an offer for `request`.
    async fn generate(&self, request: OfferRequest) -> Result<QrValueResult, OfferError>;

    /// Invoked when a stored offer has outlived `expiry_in_sec`.
    async fn on_expiry(&self, _expired: &QrValueResult) -> Result<(), OfferError> {
        Ok(())
    }
}

/// Receives wallet addresses submitted from the wallet-URL modal.
#[async_trait]
pub trait WalletUrlSubmitter: Send + Sync {
    /// Hand the offer URI to the wallet at `wallet_url`.
    async fn submit(&self, wallet_url: &str, offer: &QrValueResult) -> Result<(), OfferError>;
}
