//! # credwiz-core: Foundational Types for the Issuance Wizard
//!
//! Defines the vocabulary shared by every other crate in the workspace.
//! It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `WizardSessionId` and
//!    `ModalSessionId` cannot be confused with each other or with bare UUIDs.
//!
//! 2. **Open-ended issuance methods.** `IssueMethod` names the two methods
//!    the wizard can present (`qrCode`, `walletUrl`) and keeps any other
//!    value verbatim so the dispatcher can reject it with context instead
//!    of losing it at deserialization.
//!
//! 3. **Translation is a trait.** Labels are looked up through
//!    [`Translate`]; the wizard never hardcodes user-facing text.
//!
//! 4. **UTC-only timestamps.** `Timestamp` is UTC with seconds precision.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `credwiz-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod config;
pub mod error;
pub mod i18n;
pub mod identity;
pub mod issuance;
pub mod temporal;

pub use config::{WizardConfig, CONFIG_ENV_VAR};
pub use error::CredwizError;
pub use i18n::{Translate, Translations};
pub use identity::{ModalSessionId, WizardSessionId};
pub use issuance::{issue_method_selections, CredentialTypeSelection, IssueMethod, IssueMethodSelection};
pub use temporal::Timestamp;
