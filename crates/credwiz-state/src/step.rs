//! # Wizard Steps and Routes
//!
//! ```text
//!            advance()                     advance()
//! Details(1) ─────────▶ IssueMethod(2) ───────────▶ dispatch (step stays 2)
//!     ▲                      │
//!     └──── retreat() ───────┘
//!
//! back signal:  IssueMethod ─▶ Details ─▶ Exited(0)
//! reset():      any ─▶ Details
//! ```
//!
//! `Exited` is where a back signal on step 1 leaves the wizard: the host
//! has navigated away from the flow. It has no route and cannot advance.

use serde::{Deserialize, Serialize};

use crate::error::{AdvanceBlock, WizardError};

/// Number of steps the user walks through before dispatch.
pub const MAX_INTERACTIVE_STEPS: u8 = 2;

/// Position of the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WizardStep {
    /// Left the flow through back-navigation from step 1.
    Exited,
    /// Step 1: credential type and subject details.
    Details,
    /// Step 2: issue method selection.
    IssueMethod,
}

impl WizardStep {
    /// The step number shown to the user (0 for `Exited`).
    pub fn number(&self) -> u8 {
        match self {
            Self::Exited => 0,
            Self::Details => 1,
            Self::IssueMethod => 2,
        }
    }

    /// The step with the given number, if any.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            0 => Some(Self::Exited),
            1 => Some(Self::Details),
            2 => Some(Self::IssueMethod),
            _ => None,
        }
    }

    /// Whether the user interacts with this step.
    pub fn is_interactive(&self) -> bool {
        (1..=MAX_INTERACTIVE_STEPS).contains(&self.number())
    }

    /// One step back, as taken by a back signal. `None` at `Exited`.
    pub fn previous(&self) -> Option<Self> {
        match self {
            Self::Exited => None,
            Self::Details => Some(Self::Exited),
            Self::IssueMethod => Some(Self::Details),
        }
    }

    /// The route presenting this step.
    ///
    /// # Errors
    ///
    /// `StepSequenceExceeded` with [`AdvanceBlock::OutOfRange`] for `Exited`.
    pub fn route(&self) -> Result<IssueCredentialRoute, WizardError> {
        match self {
            Self::Details => Ok(IssueCredentialRoute::Details),
            Self::IssueMethod => Ok(IssueCredentialRoute::IssueMethod),
            Self::Exited => Err(WizardError::StepSequenceExceeded {
                step: self.number(),
                reason: AdvanceBlock::OutOfRange,
            }),
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Exited => "EXITED",
            Self::Details => "DETAILS",
            Self::IssueMethod => "ISSUE_METHOD",
        };
        f.write_str(s)
    }
}

/// Host routes of the interactive steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCredentialRoute {
    /// Route of step 1.
    Details,
    /// Route of step 2.
    IssueMethod,
}

impl IssueCredentialRoute {
    /// Path the host navigates to.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Details => "/credentials/issue/details",
            Self::IssueMethod => "/credentials/issue/method",
        }
    }
}
