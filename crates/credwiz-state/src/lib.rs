//! # credwiz-state: Issuance Wizard State Machine
//!
//! Drives a two-step credential issuance flow:
//!
//! 1. **Details**: pick a credential type and fill in the subject form.
//!    The form is validated against the subject schema; constants the
//!    schema declares are filled in automatically.
//! 2. **Issue method**: pick how the offer is delivered. Confirming opens
//!    the QR code or wallet-URL modal, which generates the offer.
//!
//! Closing a modal returns to step 1 with the entered data cleared. Host
//! back events step backward one step at a time and also clear the data.
//!
//! ## Modules
//!
//! - [`controller`]: the wizard state and its operations.
//! - [`gate`]: when the primary action is disabled.
//! - [`dispatch`]: issue method to modal mapping and single-flight offers.
//! - [`navigation`]: host back events, with RAII listener registration.
//! - [`session`]: a mounted wizard with the asynchronous offer flow.

pub mod controller;
pub mod dispatch;
pub mod error;
pub mod gate;
pub mod navigation;
pub mod offer;
pub mod session;
pub mod step;
pub mod view;

pub use controller::{
    AdvanceOutcome, FormRevision, StepTransitionRecord, TransitionCause, WizardController, WizardState,
    TRANSITION_LOG_CAPACITY,
};
pub use dispatch::{is_valid_wallet_url, IssuanceDispatcher, OfferTicket};
pub use error::{AdvanceBlock, OfferError, WizardError};
pub use navigation::{BackListener, BackNavigationHost, HistoryHost, ListenerId, NavigationBridge, NavigationSubscription};
pub use offer::{ModalKind, OfferGenerator, OfferRequest, QrValueResult, WalletUrlSubmitter};
pub use session::{OfferOutcome, WizardSession};
pub use step::{IssueCredentialRoute, WizardStep, MAX_INTERACTIVE_STEPS};
pub use view::WizardView;
