//! # Back-Navigation Bridge
//!
//! Connects the host's "back" events to the wizard. The bridge registers a
//! listener with the host when attached and removes it exactly once, when
//! the bridge (or its [`NavigationSubscription`]) is released or dropped.
//!
//! Listeners run on the host's thread and only enqueue a signal; the
//! wizard applies queued signals in order when the owner pumps the bridge,
//! so no wizard state is touched from inside a host callback.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::controller::WizardController;

/// Callback a host invokes on each back event.
pub type BackListener = Box<dyn Fn() + Send + Sync>;

/// Handle identifying a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// A host that reports "back" events.
pub trait BackNavigationHost: Send + Sync {
    /// Register `listener`.
    fn add_back_listener(&self, listener: BackListener) -> ListenerId;

    /// Remove a listener. Returns whether it was registered.
    fn remove_back_listener(&self, id: ListenerId) -> bool;
}

// ─── In-memory host ──────────────────────────────────────────────────

/// Browser-history style host kept in memory.
#[derive(Default)]
pub struct HistoryHost {
    listeners: Mutex<BTreeMap<ListenerId, Arc<dyn Fn() + Send + Sync>>>,
    next_id: AtomicU64,
}

impl HistoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire a back event at every registered listener. Returns how many
    /// listeners were notified.
    pub fn go_back(&self) -> usize {
        let listeners: Vec<_> = self.listeners.lock().values().cloned().collect();
        for listener in &listeners {
            listener();
        }
        listeners.len()
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }
}

impl std::fmt::Debug for HistoryHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryHost")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl BackNavigationHost for HistoryHost {
    fn add_back_listener(&self, listener: BackListener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().insert(id, Arc::from(listener));
        id
    }

    fn remove_back_listener(&self, id: ListenerId) -> bool {
        self.listeners.lock().remove(&id).is_some()
    }
}

// ─── Subscription ────────────────────────────────────────────────────

/// Registration of one listener, removed on release or drop.
pub struct NavigationSubscription {
    host: Arc<dyn BackNavigationHost>,
    id: Option<ListenerId>,
}

impl NavigationSubscription {
    /// Register `listener` with `host`.
    pub fn register(host: Arc<dyn BackNavigationHost>, listener: BackListener) -> Self {
        let id = host.add_back_listener(listener);
        tracing::debug!(listener = id.0, "back listener registered");
        Self { host, id: Some(id) }
    }

    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }

    /// Remove the listener. Only the first call has an effect.
    pub fn release(&mut self) -> bool {
        match self.id.take() {
            Some(id) => {
                let removed = self.host.remove_back_listener(id);
                tracing::debug!(listener = id.0, removed, "back listener released");
                true
            }
            None => false,
        }
    }
}

impl Drop for NavigationSubscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for NavigationSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationSubscription")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

// ─── Bridge ──────────────────────────────────────────────────────────

/// Queues host back events for the wizard.
#[derive(Debug)]
pub struct NavigationBridge {
    signals: mpsc::UnboundedReceiver<()>,
    subscription: NavigationSubscription,
}

impl NavigationBridge {
    /// Subscribe to `host`.
    pub fn attach(host: Arc<dyn BackNavigationHost>) -> Self {
        let (tx, signals) = mpsc::unbounded_channel();
        let subscription = NavigationSubscription::register(
            host,
            Box::new(move || {
                // The receiver is gone once the bridge is dropped.
                let _ = tx.send(());
            }),
        );
        Self { signals, subscription }
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_active()
    }

    /// Apply every queued back signal to `controller`, in order. Returns
    /// how many were applied.
    pub fn pump(&mut self, controller: &mut WizardController) -> usize {
        let mut applied = 0;
        while self.signals.try_recv().is_ok() {
            controller.on_back_navigation();
            applied += 1;
        }
        applied
    }

    /// Wait for the next back signal and apply it. Returns `false` once
    /// the host has dropped the listener and the queue is drained.
    pub async fn next(&mut self, controller: &mut WizardController) -> bool {
        match self.signals.recv().await {
            Some(()) => {
                controller.on_back_navigation();
                true
            }
            None => false,
        }
    }

    /// Remove the host listener. Signals already queued can still be pumped.
    pub fn detach(&mut self) -> bool {
        self.subscription.release()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::WizardStep;

    #[test]
    fn test_host_fires_all_listeners() {
        let host = HistoryHost::new();
        let hits = Arc::new(AtomicU64::new(0));
        for _ in 0..2 {
            let hits = hits.clone();
            host.add_back_listener(Box::new(move || {
                hits.fetch_add(1, Ordering::SeqCst);
            }));
        }
        assert_eq!(host.go_back(), 2);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_subscription_released_once() {
        let host = Arc::new(HistoryHost::new());
        let mut sub = NavigationSubscription::register(host.clone(), Box::new(|| {}));
        assert_eq!(host.listener_count(), 1);
        assert!(sub.release());
        assert!(!sub.release());
        assert_eq!(host.listener_count(), 0);
    }

    #[test]
    fn test_subscription_released_on_drop() {
        let host = Arc::new(HistoryHost::new());
        {
            let _sub = NavigationSubscription::register(host.clone(), Box::new(|| {}));
            assert_eq!(host.listener_count(), 1);
        }
        assert_eq!(host.listener_count(), 0);
    }

    #[test]
    fn test_pump_applies_signals_in_order() {
        let host = Arc::new(HistoryHost::new());
        let mut bridge = NavigationBridge::attach(host.clone());
        let mut w = WizardController::default();

        host.go_back();
        host.go_back();
        assert_eq!(w.step(), WizardStep::Details);
        assert_eq!(bridge.pump(&mut w), 2);
        assert_eq!(w.step(), WizardStep::Exited);
        assert_eq!(bridge.pump(&mut w), 0);
    }

    #[test]
    fn test_detached_bridge_stops_listening() {
        let host = Arc::new(HistoryHost::new());
        let mut bridge = NavigationBridge::attach(host.clone());
        assert!(bridge.detach());
        assert!(!bridge.detach());
        assert_eq!(host.listener_count(), 0);
        assert_eq!(host.go_back(), 0);
    }

    #[tokio::test]
    async fn test_next_waits_for_signal() {
        let host = Arc::new(HistoryHost::new());
        let mut bridge = NavigationBridge::attach(host.clone());
        let mut w = WizardController::default();
        host.go_back();
        assert!(bridge.next(&mut w).await);
        assert_eq!(w.step(), WizardStep::Exited);
    }
}
