//! # Validation Gate
//!
//! Decides whether the primary action of the current step is disabled.
//! The result is derived from wizard state on every read and never stored.
//!
//! | step        | disabled when                       |
//! |-------------|-------------------------------------|
//! | Details     | form data present with errors       |
//! | IssueMethod | no issue method selected            |
//! | Exited      | never                               |

use credwiz_core::IssueMethodSelection;
use credwiz_schema::CredentialFormData;

use crate::error::AdvanceBlock;
use crate::step::WizardStep;

/// Why the primary action of `step` is disabled, or `None` if it is enabled.
///
/// Step 1 is only blocked by reported errors; no form data at all does not
/// block it.
pub fn blocking_reason(
    step: WizardStep,
    form_data: Option<&CredentialFormData>,
    issue_method: Option<&IssueMethodSelection>,
) -> Option<AdvanceBlock> {
    match step {
        WizardStep::Details => form_data
            .filter(|form| !form.is_valid())
            .map(|form| AdvanceBlock::ValidationPending {
                error_count: form.error_count(),
            }),
        WizardStep::IssueMethod => issue_method
            .is_none()
            .then_some(AdvanceBlock::IssueMethodMissing),
        WizardStep::Exited => None,
    }
}

/// Whether the primary action of `step` is disabled.
pub fn is_disabled(
    step: WizardStep,
    form_data: Option<&CredentialFormData>,
    issue_method: Option<&IssueMethodSelection>,
) -> bool {
    blocking_reason(step, form_data, issue_method).is_some()
}

/// Recompute the gate after a state change and surface any step 1
/// validation errors to the diagnostic log.
pub(crate) fn report(
    step: WizardStep,
    form_data: Option<&CredentialFormData>,
    issue_method: Option<&IssueMethodSelection>,
) -> bool {
    let reason = blocking_reason(step, form_data, issue_method);
    if let (WizardStep::Details, Some(form)) = (step, form_data) {
        if !form.is_valid() {
            let messages: Vec<String> = form.errors.iter().map(ToString::to_string).collect();
            tracing::warn!(
                error_count = form.error_count(),
                errors = ?messages,
                "credential form data has validation errors"
            );
        }
    }
    reason.is_some()
}
