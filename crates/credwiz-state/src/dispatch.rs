//! # Issuance Dispatch
//!
//! Routes the confirmed issue method to its presentation modal and owns the
//! modal lifecycle:
//!
//! ```text
//!   Closed ── dispatch(qrCode) ──▶ QrCode{session} ── close ──▶ Closed
//!     │                                                          ▲
//!     └──── dispatch(walletUrl) ─▶ WalletUrl{session} ── close ──┘
//! ```
//!
//! At most one modal is open at a time; the open modal is a single
//! `Option`, so the two visibility flags can never both be true.
//!
//! ## Offer Single-Flight
//!
//! Each opening mints a fresh [`ModalSessionId`]. Offer generation is
//! started with [`IssuanceDispatcher::begin_offer`], which hands out an
//! [`OfferTicket`] bound to that session and refuses a second request while
//! one is in flight or stored. A result is accepted only if its ticket still
//! names the open modal, so offers for a closed modal are dropped.

use credwiz_core::{IssueMethod, ModalSessionId, Timestamp};
use url::Url;

use crate::error::{OfferError, WizardError};
use crate::offer::{ModalKind, QrValueResult};

#[derive(Debug, Clone, PartialEq)]
enum OfferSlot {
    Idle,
    InFlight,
    Ready {
        offer: QrValueResult,
        stored_at: Timestamp,
    },
}

#[derive(Debug, Clone, PartialEq)]
struct OpenModal {
    kind: ModalKind,
    session: ModalSessionId,
    offer: OfferSlot,
}

/// Claim on the result of one offer generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfferTicket {
    modal: ModalSessionId,
    presentation: ModalKind,
}

impl OfferTicket {
    /// The modal session the offer was requested for.
    pub fn modal(&self) -> ModalSessionId {
        self.modal
    }

    /// The modal kind the offer was requested for.
    pub fn presentation(&self) -> ModalKind {
        self.presentation
    }
}

/// Maps issue methods to modals and tracks the open one.
#[derive(Debug, Clone, Default)]
pub struct IssuanceDispatcher {
    open: Option<OpenModal>,
}

impl IssuanceDispatcher {
    /// A dispatcher with no modal open.
    pub fn new() -> Self {
        Self::default()
    }

    /// The modal presenting `method`.
    ///
    /// # Errors
    ///
    /// `UnsupportedIssuanceMethod` for anything but `qrCode` and `walletUrl`.
    pub fn modal_for(method: &IssueMethod) -> Result<ModalKind, WizardError> {
        match method {
            IssueMethod::QrCode => Ok(ModalKind::QrCode),
            IssueMethod::WalletUrl => Ok(ModalKind::WalletUrl),
            IssueMethod::Other(value) => Err(WizardError::UnsupportedIssuanceMethod {
                method: value.clone(),
            }),
        }
    }

    /// Open the modal for `method`.
    ///
    /// Dispatching the method whose modal is already open keeps that modal
    /// and its offer. Dispatching a different method replaces it.
    pub fn dispatch(&mut self, method: &IssueMethod) -> Result<ModalSessionId, WizardError> {
        let kind = Self::modal_for(method)?;
        if let Some(open) = &self.open {
            if open.kind == kind {
                tracing::debug!(modal = %open.session, %kind, "issuance modal already open");
                return Ok(open.session);
            }
        }
        let session = ModalSessionId::new();
        tracing::info!(modal = %session, %kind, "issuance modal opened");
        self.open = Some(OpenModal {
            kind,
            session,
            offer: OfferSlot::Idle,
        });
        Ok(session)
    }

    /// Close the modal of `kind` if it is the open one.
    pub fn close(&mut self, kind: ModalKind) -> bool {
        match &self.open {
            Some(open) if open.kind == kind => {
                tracing::info!(modal = %open.session, %kind, "issuance modal closed");
                self.open = None;
                true
            }
            _ => false,
        }
    }

    /// Close whatever modal is open, returning its kind.
    pub fn close_all(&mut self) -> Option<ModalKind> {
        let open = self.open.take()?;
        tracing::info!(modal = %open.session, kind = %open.kind, "issuance modal closed");
        Some(open.kind)
    }

    /// Kind of the open modal.
    pub fn open_modal(&self) -> Option<ModalKind> {
        self.open.as_ref().map(|o| o.kind)
    }

    /// Session of the open modal.
    pub fn modal_session(&self) -> Option<ModalSessionId> {
        self.open.as_ref().map(|o| o.session)
    }

    pub fn qr_modal_visible(&self) -> bool {
        self.open_modal() == Some(ModalKind::QrCode)
    }

    pub fn wallet_url_modal_visible(&self) -> bool {
        self.open_modal() == Some(ModalKind::WalletUrl)
    }

    /// Claim offer generation for the open modal.
    ///
    /// # Errors
    ///
    /// `NoOpenModal` if nothing is open, `AlreadyRequested` if an offer is
    /// in flight or stored for this modal session.
    pub fn begin_offer(&mut self) -> Result<OfferTicket, OfferError> {
        let open = self.open.as_mut().ok_or(OfferError::NoOpenModal)?;
        if open.offer != OfferSlot::Idle {
            return Err(OfferError::AlreadyRequested {
                modal: open.session,
            });
        }
        open.offer = OfferSlot::InFlight;
        tracing::debug!(modal = %open.session, "credential offer requested");
        Ok(OfferTicket {
            modal: open.session,
            presentation: open.kind,
        })
    }

    /// Store `offer` if `ticket` still names the open modal. Returns whether
    /// it was stored.
    pub fn accept_offer(&mut self, ticket: &OfferTicket, offer: QrValueResult, now: Timestamp) -> bool {
        match self.open.as_mut() {
            Some(open) if open.session == ticket.modal && open.offer == OfferSlot::InFlight => {
                tracing::info!(modal = %open.session, offer_id = %offer.id, "credential offer stored");
                open.offer = OfferSlot::Ready {
                    offer,
                    stored_at: now,
                };
                true
            }
            _ => {
                tracing::debug!(modal = %ticket.modal, offer_id = %offer.id, "stale credential offer dropped");
                false
            }
        }
    }

    /// Release a claim whose generation failed so it can be retried.
    pub fn abandon_offer(&mut self, ticket: &OfferTicket) -> bool {
        match self.open.as_mut() {
            Some(open) if open.session == ticket.modal && open.offer == OfferSlot::InFlight => {
                open.offer = OfferSlot::Idle;
                true
            }
            _ => false,
        }
    }

    /// The offer stored for the open modal.
    pub fn offer(&self) -> Option<&QrValueResult> {
        match self.open.as_ref().map(|o| &o.offer) {
            Some(OfferSlot::Ready { offer, .. }) => Some(offer),
            _ => None,
        }
    }

    /// Whether generation is in flight for the open modal.
    pub fn offer_pending(&self) -> bool {
        matches!(self.open.as_ref().map(|o| &o.offer), Some(OfferSlot::InFlight))
    }

    /// Remove and return the stored offer if it expired at or before `now`.
    /// Offers without an expiry never expire.
    pub fn take_expired_offer(&mut self, now: Timestamp) -> Option<QrValueResult> {
        let open = self.open.as_mut()?;
        let expired = match &open.offer {
            OfferSlot::Ready { offer, stored_at } => offer.expires_at(*stored_at).is_some_and(|at| at <= now),
            _ => false,
        };
        if !expired {
            return None;
        }
        match std::mem::replace(&mut open.offer, OfferSlot::Idle) {
            OfferSlot::Ready { offer, .. } => {
                tracing::info!(modal = %open.session, offer_id = %offer.id, "credential offer expired");
                Some(offer)
            }
            _ => None,
        }
    }

    /// Check a wallet address against the open wallet-URL modal and return
    /// the offer to hand over.
    ///
    /// # Errors
    ///
    /// `WalletUrlModalClosed`, `EmptyWalletUrl` for a blank address,
    /// `InvalidWalletUrl` for anything but an `http(s)://` URL with a host,
    /// or `OfferUnavailable` if no offer is stored yet.
    pub fn wallet_url_submission(&self, wallet_url: &str) -> Result<QrValueResult, OfferError> {
        if !self.wallet_url_modal_visible() {
            return Err(OfferError::WalletUrlModalClosed);
        }
        let wallet_url = wallet_url.trim();
        if wallet_url.is_empty() {
            return Err(OfferError::EmptyWalletUrl);
        }
        if !is_valid_wallet_url(wallet_url) {
            return Err(OfferError::InvalidWalletUrl);
        }
        self.offer().cloned().ok_or(OfferError::OfferUnavailable)
    }
}

/// Whether `wallet_url` is an absolute `http` or `https` URL with a host.
/// The wallet-URL modal keeps its submit action disabled until this holds.
pub fn is_valid_wallet_url(wallet_url: &str) -> bool {
    match Url::parse(wallet_url.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty()),
        Err(_) => false,
    }
}
