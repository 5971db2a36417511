//! Render snapshot of the wizard.

use credwiz_core::{CredentialTypeSelection, IssueMethodSelection, WizardSessionId};
use credwiz_schema::CredentialFormData;
use serde::Serialize;

use crate::offer::QrValueResult;

/// Everything the host needs to render the wizard at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardView {
    pub session: WizardSessionId,
    /// Step number, 0 once the wizard has been exited.
    pub step: u8,
    /// Path of the current step's route.
    pub route: Option<String>,
    pub max_interactive_steps: u8,
    pub disabled: bool,
    pub credential_type: Option<CredentialTypeSelection>,
    pub credential_form_data: Option<CredentialFormData>,
    pub issue_method: Option<IssueMethodSelection>,
    pub issue_methods: Vec<IssueMethodSelection>,
    pub show_qr_modal: bool,
    pub show_wallet_url_modal: bool,
    /// Offer stored for the open modal.
    pub offer: Option<QrValueResult>,
}
