//! # Wizard Controller
//!
//! Owns the wizard state and exposes the operations the host binds to its
//! UI. Every operation runs to completion before the next one starts; the
//! only concurrency is around results that arrive later (form validation,
//! offer generation), which are matched against tickets:
//!
//! - [`FormRevision`] carries the session epoch and a sequence number.
//!   Validation results for an older epoch, or older than the last applied
//!   revision, are dropped. The epoch advances on every reset and every
//!   back signal.
//! - [`OfferTicket`] is bound to one modal session; see
//!   [`crate::dispatch`].
//!
//! ## Gating
//!
//! `disabled()` is recomputed from state on every read. After each
//! mutation the gate is re-evaluated once and step 1 validation errors are
//! logged at `warn`.

use credwiz_core::{
    issue_method_selections, CredentialTypeSelection, IssueMethodSelection, Timestamp, WizardConfig,
    WizardSessionId,
};
use credwiz_schema::{sync_const_values, CredentialFormData};
use serde::{Deserialize, Serialize};

use crate::dispatch::{IssuanceDispatcher, OfferTicket};
use crate::error::{AdvanceBlock, OfferError, WizardError};
use crate::gate;
use crate::offer::{ModalKind, OfferRequest, QrValueResult};
use crate::step::{IssueCredentialRoute, WizardStep, MAX_INTERACTIVE_STEPS};
use crate::view::WizardView;

// ─── State ───────────────────────────────────────────────────────────

/// The user's progress through the wizard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardState {
    /// Current step.
    pub step: WizardStep,
    /// Credential type chosen at step 1.
    pub credential_type: Option<CredentialTypeSelection>,
    /// Latest form data for the credential subject.
    pub form_data: Option<CredentialFormData>,
    /// Issue method chosen at step 2.
    pub issue_method: Option<IssueMethodSelection>,
}

/// What caused a step transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionCause {
    Advance,
    Retreat,
    Reset,
    BackNavigation,
}

/// Record of a step transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepTransitionRecord {
    /// Step before the transition.
    pub from_step: WizardStep,
    /// Step after the transition.
    pub to_step: WizardStep,
    /// When the transition occurred.
    pub timestamp: Timestamp,
    /// What triggered it.
    pub cause: TransitionCause,
}

/// Ticket for one asynchronous form validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormRevision {
    epoch: u64,
    sequence: u64,
}

impl FormRevision {
    /// Session epoch the revision was issued in.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Position of the revision within the epoch.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Result of a successful `advance()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Moved to the given step.
    Moved(WizardStep),
    /// Stayed on the last step and opened the given modal.
    Dispatched(ModalKind),
}

// ─── Controller ──────────────────────────────────────────────────────

/// Transition records kept per wizard. Older records are dropped first.
pub const TRANSITION_LOG_CAPACITY: usize = 128;

/// The issuance wizard.
#[derive(Debug, Clone)]
pub struct WizardController {
    session: WizardSessionId,
    state: WizardState,
    issue_methods: Vec<IssueMethodSelection>,
    dispatcher: IssuanceDispatcher,
    offer_expiry_secs: Option<u64>,
    epoch: u64,
    issued_revision: u64,
    applied_revision: u64,
    transitions: Vec<StepTransitionRecord>,
}

impl Default for WizardController {
    fn default() -> Self {
        Self::new(&WizardConfig::default())
    }
}

impl WizardController {
    /// Mount a wizard on step 1 with the configured default issue method.
    pub fn new(config: &WizardConfig) -> Self {
        let translations = config.translations();
        let default_method = IssueMethodSelection::labelled(config.default_issue_method.clone(), &translations);
        let session = WizardSessionId::new();
        tracing::info!(%session, default_method = %default_method.value, "issuance wizard mounted");
        Self {
            session,
            state: WizardState {
                step: WizardStep::Details,
                credential_type: None,
                form_data: None,
                issue_method: Some(default_method),
            },
            issue_methods: issue_method_selections(&translations),
            dispatcher: IssuanceDispatcher::new(),
            offer_expiry_secs: config.offer_expiry_secs,
            epoch: 0,
            issued_revision: 0,
            applied_revision: 0,
            transitions: Vec::new(),
        }
    }

    // ── Accessors ───────────────────────────────────────────────────

    pub fn session(&self) -> WizardSessionId {
        self.session
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn step(&self) -> WizardStep {
        self.state.step
    }

    /// Route of the current step, `None` once the wizard has been exited.
    pub fn route(&self) -> Option<IssueCredentialRoute> {
        self.state.step.route().ok()
    }

    pub fn credential_type(&self) -> Option<&CredentialTypeSelection> {
        self.state.credential_type.as_ref()
    }

    pub fn form_data(&self) -> Option<&CredentialFormData> {
        self.state.form_data.as_ref()
    }

    pub fn issue_method(&self) -> Option<&IssueMethodSelection> {
        self.state.issue_method.as_ref()
    }

    /// The selectable issue methods, labelled.
    pub fn issue_methods(&self) -> &[IssueMethodSelection] {
        &self.issue_methods
    }

    pub fn max_interactive_steps(&self) -> u8 {
        MAX_INTERACTIVE_STEPS
    }

    /// Whether the primary action of the current step is disabled.
    pub fn disabled(&self) -> bool {
        gate::is_disabled(
            self.state.step,
            self.state.form_data.as_ref(),
            self.state.issue_method.as_ref(),
        )
    }

    pub fn show_qr_modal(&self) -> bool {
        self.dispatcher.qr_modal_visible()
    }

    pub fn show_wallet_url_modal(&self) -> bool {
        self.dispatcher.wallet_url_modal_visible()
    }

    pub fn dispatcher(&self) -> &IssuanceDispatcher {
        &self.dispatcher
    }

    /// Current session epoch.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The most recent step transitions, oldest first, at most
    /// [`TRANSITION_LOG_CAPACITY`] of them.
    pub fn transitions(&self) -> &[StepTransitionRecord] {
        &self.transitions
    }

    /// Snapshot of everything the host renders.
    pub fn view(&self) -> WizardView {
        WizardView {
            session: self.session,
            step: self.state.step.number(),
            route: self.route().map(|r| r.path().to_string()),
            max_interactive_steps: MAX_INTERACTIVE_STEPS,
            disabled: self.disabled(),
            credential_type: self.state.credential_type.clone(),
            credential_form_data: self.state.form_data.clone(),
            issue_method: self.state.issue_method.clone(),
            issue_methods: self.issue_methods.clone(),
            show_qr_modal: self.show_qr_modal(),
            show_wallet_url_modal: self.show_wallet_url_modal(),
            offer: self.dispatcher.offer().cloned(),
        }
    }

    // ── Navigation ──────────────────────────────────────────────────

    /// Move forward one step, or dispatch issuance from the last step.
    ///
    /// # Errors
    ///
    /// `StepSequenceExceeded` if the gate is closed or the wizard has been
    /// exited; `UnsupportedIssuanceMethod` if the selected method has no
    /// modal. State is unchanged on error.
    pub fn advance(&mut self) -> Result<AdvanceOutcome, WizardError> {
        let step = self.state.step;
        if step == WizardStep::Exited {
            return Err(self.blocked(AdvanceBlock::OutOfRange));
        }
        if let Some(reason) = gate::blocking_reason(
            step,
            self.state.form_data.as_ref(),
            self.state.issue_method.as_ref(),
        ) {
            return Err(self.blocked(reason));
        }

        match step {
            WizardStep::Details => {
                self.do_transition(WizardStep::IssueMethod, TransitionCause::Advance);
                Ok(AdvanceOutcome::Moved(WizardStep::IssueMethod))
            }
            _ => {
                let method = match &self.state.issue_method {
                    Some(selection) => selection.value.clone(),
                    None => return Err(self.blocked(AdvanceBlock::IssueMethodMissing)),
                };
                let session = self.session;
                self.dispatcher.dispatch(&method).map_err(|e| {
                    tracing::warn!(%session, error = %e, "issuance dispatch rejected");
                    e
                })?;
                IssuanceDispatcher::modal_for(&method).map(AdvanceOutcome::Dispatched)
            }
        }
    }

    /// Move back one step from the last step. A no-op elsewhere.
    pub fn retreat(&mut self) -> WizardStep {
        if self.state.step == WizardStep::IssueMethod {
            self.dispatcher.close_all();
            self.do_transition(WizardStep::Details, TransitionCause::Retreat);
        }
        self.state.step
    }

    /// Return to step 1 with the credential type and form data cleared.
    /// The issue method selection is kept.
    pub fn reset(&mut self) {
        self.restart(WizardStep::Details, TransitionCause::Reset);
    }

    /// Apply one back signal from the host: step back and clear the
    /// entered data. A no-op once the wizard has been exited.
    pub fn on_back_navigation(&mut self) -> WizardStep {
        match self.state.step.previous() {
            Some(previous) => self.restart(previous, TransitionCause::BackNavigation),
            None => tracing::debug!(session = %self.session, "back signal ignored after exit"),
        }
        self.state.step
    }

    // ── Selections ──────────────────────────────────────────────────

    pub fn on_select_credential_type_change(&mut self, selection: CredentialTypeSelection) {
        tracing::debug!(session = %self.session, credential_type = %selection.value, "credential type selected");
        self.state.credential_type = Some(selection);
        self.refresh_gate();
    }

    pub fn on_issue_method_change(&mut self, selection: IssueMethodSelection) {
        tracing::debug!(session = %self.session, method = %selection.value, "issue method selected");
        self.state.issue_method = Some(selection);
        self.refresh_gate();
    }

    /// Drop the issue method selection, as when the host control is cleared.
    pub fn clear_issue_method(&mut self) {
        self.state.issue_method = None;
        self.refresh_gate();
    }

    /// Store form data from the renderer, filling schema constants the
    /// first error's parent schema declares.
    pub fn on_credential_form_data_change(&mut self, form: CredentialFormData) {
        let revision = self.form_revision();
        self.apply_form_data(revision, form);
    }

    /// Reserve a revision for a validation about to run asynchronously.
    pub fn form_revision(&mut self) -> FormRevision {
        self.issued_revision += 1;
        FormRevision {
            epoch: self.epoch,
            sequence: self.issued_revision,
        }
    }

    /// Store the result of the validation started under `revision`, unless
    /// a newer result was stored or the session was reset since. Returns
    /// whether it was stored.
    pub fn apply_form_data(&mut self, revision: FormRevision, mut form: CredentialFormData) -> bool {
        if revision.epoch != self.epoch || revision.sequence <= self.applied_revision {
            tracing::debug!(
                session = %self.session,
                epoch = revision.epoch,
                sequence = revision.sequence,
                "stale form data dropped"
            );
            return false;
        }
        self.applied_revision = revision.sequence;
        let written = sync_const_values(&mut form);
        if written > 0 {
            tracing::debug!(session = %self.session, written, "schema constants filled");
        }
        self.state.form_data = Some(form);
        self.refresh_gate();
        true
    }

    // ── Modals ──────────────────────────────────────────────────────

    pub fn on_close_qr_modal(&mut self) {
        self.dispatcher.close(ModalKind::QrCode);
        self.reset();
    }

    pub fn on_close_wallet_url_modal(&mut self) {
        self.dispatcher.close(ModalKind::WalletUrl);
        self.reset();
    }

    /// Claim offer generation for the open modal and describe what to
    /// generate.
    pub fn begin_offer_generation(&mut self) -> Result<(OfferTicket, OfferRequest), OfferError> {
        let ticket = self.dispatcher.begin_offer()?;
        let request = OfferRequest {
            modal: ticket.modal(),
            presentation: ticket.presentation(),
            credential_type: self.state.credential_type.clone(),
            subject: self.state.form_data.as_ref().map(|f| f.data.clone()),
            expiry_in_sec: self.offer_expiry_secs,
        };
        Ok((ticket, request))
    }

    /// Store a generated offer. Returns `false` if the modal it was
    /// generated for has since closed.
    pub fn accept_offer(&mut self, ticket: &OfferTicket, offer: QrValueResult) -> bool {
        self.dispatcher.accept_offer(ticket, offer, Timestamp::now())
    }

    /// Release a claim whose generation failed.
    pub fn abandon_offer(&mut self, ticket: &OfferTicket) -> bool {
        self.dispatcher.abandon_offer(ticket)
    }

    /// The offer stored for the open modal.
    pub fn offer(&self) -> Option<&QrValueResult> {
        self.dispatcher.offer()
    }

    /// Remove the stored offer if it has expired by `now`.
    pub fn take_expired_offer(&mut self, now: Timestamp) -> Option<QrValueResult> {
        self.dispatcher.take_expired_offer(now)
    }

    /// Check a wallet address and return the offer to hand over.
    pub fn wallet_url_submission(&self, wallet_url: &str) -> Result<QrValueResult, OfferError> {
        self.dispatcher.wallet_url_submission(wallet_url)
    }

    // ── Internals ───────────────────────────────────────────────────

    fn blocked(&self, reason: AdvanceBlock) -> WizardError {
        let step = self.state.step;
        tracing::warn!(session = %self.session, %step, %reason, "advance blocked");
        WizardError::StepSequenceExceeded {
            step: step.number(),
            reason,
        }
    }

    fn restart(&mut self, to: WizardStep, cause: TransitionCause) {
        self.dispatcher.close_all();
        self.state.credential_type = None;
        self.state.form_data = None;
        self.epoch += 1;
        self.do_transition(to, cause);
        self.refresh_gate();
    }

    fn refresh_gate(&self) {
        let disabled = gate::report(
            self.state.step,
            self.state.form_data.as_ref(),
            self.state.issue_method.as_ref(),
        );
        tracing::trace!(session = %self.session, step = %self.state.step, disabled, "gate evaluated");
    }

    fn do_transition(&mut self, to: WizardStep, cause: TransitionCause) {
        tracing::info!(session = %self.session, from = %self.state.step, %to, ?cause, "wizard step transition");
        if self.transitions.len() >= TRANSITION_LOG_CAPACITY {
            let excess = self.transitions.len() + 1 - TRANSITION_LOG_CAPACITY;
            self.transitions.drain(..excess);
        }
        self.transitions.push(StepTransitionRecord {
            from_step: self.state.step,
            to_step: to,
            timestamp: Timestamp::now(),
            cause,
        });
        self.state.step = to;
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
