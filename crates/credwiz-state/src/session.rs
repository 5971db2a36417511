//! # Wizard Session
//!
//! A mounted wizard: the controller plus its back-navigation bridge and the
//! asynchronous offer flow. Queued back signals are applied before the
//! controller is handed out for mutation, before every offer operation, and
//! again once a generator returns, so an offer that
//! completes after the user navigated away is dropped rather than shown.

use std::sync::Arc;

use credwiz_core::{Timestamp, WizardConfig};

use crate::controller::WizardController;
use crate::error::OfferError;
use crate::navigation::{BackNavigationHost, NavigationBridge};
use crate::offer::{OfferGenerator, QrValueResult, WalletUrlSubmitter};

/// Outcome of [`WizardSession::generate_offer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfferOutcome {
    /// The offer was stored for the open modal.
    Stored(QrValueResult),
    /// The modal closed while the offer was being generated.
    Discarded,
}

/// A wizard mounted on a navigation host.
#[derive(Debug)]
pub struct WizardSession {
    controller: WizardController,
    bridge: NavigationBridge,
}

impl WizardSession {
    /// Mount a wizard and subscribe to `host`'s back events.
    pub fn mount(config: &WizardConfig, host: Arc<dyn BackNavigationHost>) -> Self {
        Self {
            controller: WizardController::new(config),
            bridge: NavigationBridge::attach(host),
        }
    }

    pub fn controller(&self) -> &WizardController {
        &self.controller
    }

    /// The controller, with queued back signals applied first so that an
    /// operation never acts on a step the user already left.
    pub fn controller_mut(&mut self) -> &mut WizardController {
        self.pump_navigation();
        &mut self.controller
    }

    /// Apply queued back signals. Returns how many were applied.
    pub fn pump_navigation(&mut self) -> usize {
        self.bridge.pump(&mut self.controller)
    }

    /// Wait for the next back signal and apply it.
    pub async fn next_back_signal(&mut self) -> bool {
        self.bridge.next(&mut self.controller).await
    }

    /// Generate and store an offer for the open modal.
    ///
    /// # Errors
    ///
    /// `NoOpenModal` or `AlreadyRequested` if generation cannot start, or
    /// the generator's own error, after which generation may be retried.
    pub async fn generate_offer(&mut self, generator: &dyn OfferGenerator) -> Result<OfferOutcome, OfferError> {
        self.pump_navigation();
        let (ticket, request) = self.controller.begin_offer_generation()?;
        let result = generator.generate(request).await;
        self.pump_navigation();

        match result {
            Ok(offer) => {
                if self.controller.accept_offer(&ticket, offer.clone()) {
                    Ok(OfferOutcome::Stored(offer))
                } else {
                    Ok(OfferOutcome::Discarded)
                }
            }
            Err(e) => {
                tracing::warn!(modal = %ticket.modal(), error = %e, "credential offer generation failed");
                self.controller.abandon_offer(&ticket);
                Err(e)
            }
        }
    }

    /// Drop the stored offer if it expired by `now`, notifying `generator`.
    /// Returns whether an offer expired.
    pub async fn expire_offer(&mut self, generator: &dyn OfferGenerator, now: Timestamp) -> Result<bool, OfferError> {
        match self.controller.take_expired_offer(now) {
            Some(expired) => {
                generator.on_expiry(&expired).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Hand the stored offer to the wallet at `wallet_url`.
    ///
    /// # Errors
    ///
    /// `WalletUrlModalClosed`, `EmptyWalletUrl`, `InvalidWalletUrl`,
    /// `OfferUnavailable`, or the submitter's own error.
    pub async fn submit_wallet_url(
        &mut self,
        submitter: &dyn WalletUrlSubmitter,
        wallet_url: &str,
    ) -> Result<(), OfferError> {
        self.pump_navigation();
        let offer = self.controller.wallet_url_submission(wallet_url)?;
        let wallet_url = wallet_url.trim();
        submitter.submit(wallet_url, &offer).await?;
        tracing::info!(offer_id = %offer.id, wallet_url, "credential offer sent to wallet");
        Ok(())
    }

    /// Unsubscribe from the host and hand back the controller.
    pub fn unmount(mut self) -> WizardController {
        self.bridge.detach();
        tracing::info!(session = %self.controller.session(), "issuance wizard unmounted");
        self.controller
    }
}
