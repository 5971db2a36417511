//! # Wizard Errors
//!
//! Every error is local to the operation that raised it and leaves the
//! wizard in a usable state. Closing a modal never fails, so the user can
//! always get back to step 1.

use std::fmt;

use credwiz_core::ModalSessionId;
use thiserror::Error;

/// Why `advance()` could not move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceBlock {
    /// Step 1 form data has validation errors.
    ValidationPending {
        /// Number of reported errors.
        error_count: usize,
    },
    /// Step 2 has no issue method selected.
    IssueMethodMissing,
    /// The wizard is not on an interactive step.
    OutOfRange,
}

impl fmt::Display for AdvanceBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationPending { error_count } => {
                write!(f, "form data has {error_count} validation error(s)")
            }
            Self::IssueMethodMissing => f.write_str("no issue method selected"),
            Self::OutOfRange => f.write_str("issue credential step exceeds maximum steps"),
        }
    }
}

/// Errors raised by wizard operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    /// `advance()` was called from a state it cannot advance from.
    /// Recoverable: correct the form, pick a method, or go back.
    #[error("issue credential step {step} cannot advance: {reason}")]
    StepSequenceExceeded {
        /// Step number at the time of the call.
        step: u8,
        /// What blocked the transition.
        reason: AdvanceBlock,
    },

    /// Dispatch reached a method with no presentation.
    /// Recoverable: select a known method and advance again.
    #[error("issuance method '{method}' not supported")]
    UnsupportedIssuanceMethod {
        /// The offending wire value.
        method: String,
    },
}

/// Errors raised while generating or delivering a credential offer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OfferError {
    /// No issuance modal is open.
    #[error("no issuance modal is open")]
    NoOpenModal,

    /// An offer was already requested for this modal session.
    #[error("credential offer already requested for {modal}")]
    AlreadyRequested {
        /// The modal session holding the request.
        modal: ModalSessionId,
    },

    /// The wallet-URL modal is not the one open.
    #[error("wallet URL modal is not open")]
    WalletUrlModalClosed,

    /// The wallet address was empty.
    #[error("wallet address must not be empty")]
    EmptyWalletUrl,

    /// The wallet address is not an `http(s)://` URL with a host.
    #[error("web wallet address must be a valid https:// url")]
    InvalidWalletUrl,

    /// No offer has been stored for the open modal yet.
    #[error("credential offer URI unavailable")]
    OfferUnavailable,

    /// The offer generator failed.
    #[error("credential offer generation failed: {0}")]
    Generation(String),

    /// The wallet-URL submission target failed.
    #[error("wallet URL submission failed: {0}")]
    Submission(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_sequence_message() {
        let e = WizardError::StepSequenceExceeded {
            step: 0,
            reason: AdvanceBlock::OutOfRange,
        };
        assert_eq!(
            e.to_string(),
            "issue credential step 0 cannot advance: issue credential step exceeds maximum steps"
        );
    }

    #[test]
    fn test_validation_pending_message() {
        let e = WizardError::StepSequenceExceeded {
            step: 1,
            reason: AdvanceBlock::ValidationPending { error_count: 2 },
        };
        assert!(e.to_string().contains("2 validation error(s)"));
    }

    #[test]
    fn test_unsupported_method_carries_value() {
        let e = WizardError::UnsupportedIssuanceMethod {
            method: "bluetooth".to_string(),
        };
        assert_eq!(e.to_string(), "issuance method 'bluetooth' not supported");
    }
}
