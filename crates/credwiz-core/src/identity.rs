//! # Session Identity Newtypes
//!
//! One wizard session spans a mount of the wizard; each opened modal gets
//! its own modal session. Late asynchronous results are matched against
//! these identifiers, so they must never be interchangeable.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for one mounted wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WizardSessionId(pub Uuid);

/// Unique identifier for one opening of an issuance modal.
///
/// A fresh id is minted every time a modal opens, so an offer generated
/// for a modal that was since closed can never be attached to its successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModalSessionId(pub Uuid);

impl WizardSessionId {
    /// Generate a new random wizard session identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl ModalSessionId {
    /// Generate a new random modal session identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for WizardSessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for ModalSessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for WizardSessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "wizard:{}", self.0)
    }
}

impl std::fmt::Display for ModalSessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "modal:{}", self.0)
    }
}
