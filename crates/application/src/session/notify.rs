//! Fire-and-forget signaling of session-state changes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

/// Observer of session-state transitions.
///
/// Both methods default to no-ops so observers implement only what they
/// care about. Dispatch is synchronous and fire-and-forget; observers must
/// not block.
pub trait SessionObserver: Send + Sync {
    /// A credential pair was saved or cleared.
    fn credentials_changed(&self) {}

    /// The credential pair was silently renewed.
    fn credentials_refreshed(&self, message: &str) {
        let _ = message;
    }
}

/// Registry and dispatcher for session observers.
///
/// The refreshed signal can be suppressed globally; the changed signal
/// always fires.
pub struct NotificationBus {
    observers: RwLock<Vec<Arc<dyn SessionObserver>>>,
    refresh_notice: AtomicBool,
}

impl NotificationBus {
    /// Creates a bus; `refresh_notice` controls the refreshed signal.
    #[must_use]
    pub fn new(refresh_notice: bool) -> Self {
        Self {
            observers: RwLock::new(Vec::new()),
            refresh_notice: AtomicBool::new(refresh_notice),
        }
    }

    /// Registers an observer for the lifetime of the bus.
    pub fn subscribe(&self, observer: Arc<dyn SessionObserver>) {
        if let Ok(mut observers) = self.observers.write() {
            observers.push(observer);
        }
    }

    /// Enables or disables the refreshed signal at runtime.
    pub fn set_refresh_notice(&self, enabled: bool) {
        self.refresh_notice.store(enabled, Ordering::Relaxed);
    }

    /// Signals that the credential pair was saved or cleared.
    pub fn emit_changed(&self) {
        if let Ok(observers) = self.observers.read() {
            for observer in observers.iter() {
                observer.credentials_changed();
            }
        }
    }

    /// Signals a successful silent renewal, unless suppressed.
    pub fn emit_refreshed(&self, message: &str) {
        if !self.refresh_notice.load(Ordering::Relaxed) {
            return;
        }
        if let Ok(observers) = self.observers.read() {
            for observer in observers.iter() {
                observer.credentials_refreshed(message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct CountingObserver {
        changed: AtomicUsize,
        refreshed: AtomicUsize,
    }

    impl SessionObserver for CountingObserver {
        fn credentials_changed(&self) {
            self.changed.fetch_add(1, Ordering::SeqCst);
        }

        fn credentials_refreshed(&self, _message: &str) {
            self.refreshed.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_dispatches_to_all_observers() {
        let bus = NotificationBus::new(true);
        let first = Arc::new(CountingObserver::default());
        let second = Arc::new(CountingObserver::default());
        bus.subscribe(first.clone());
        bus.subscribe(second.clone());

        bus.emit_changed();
        bus.emit_refreshed("renewed");

        assert_eq!(first.changed.load(Ordering::SeqCst), 1);
        assert_eq!(second.refreshed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_refresh_notice_suppression() {
        let bus = NotificationBus::new(false);
        let observer = Arc::new(CountingObserver::default());
        bus.subscribe(observer.clone());

        bus.emit_refreshed("renewed");
        assert_eq!(observer.refreshed.load(Ordering::SeqCst), 0);

        // Changed always fires, and the flag can be flipped back on.
        bus.emit_changed();
        bus.set_refresh_notice(true);
        bus.emit_refreshed("renewed");
        assert_eq!(observer.changed.load(Ordering::SeqCst), 1);
        assert_eq!(observer.refreshed.load(Ordering::SeqCst), 1);
    }
}
