//! Idempotent wake-up flag for the idle capture loop.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

// ── Trigger ──────────────────────────────────────────────────────

/// Single-slot activation signal.
///
/// Firing an already-pending trigger is a no-op, so any number of
/// concurrent subscribers schedule at most one capture cycle per idle
/// period.
#[derive(Debug, Default)]
pub struct Trigger {
    pending: AtomicBool,
    notify: Notify,
}

impl Trigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the trigger. Returns `true` if this call armed it, `false` if
    /// a wake-up was already pending.
    pub fn fire(&self) -> bool {
        if self.pending.swap(true, Ordering::AcqRel) {
            return false;
        }
        // `Notify` stores at most one permit when nobody is waiting.
        self.notify.notify_one();
        true
    }

    /// Whether a wake-up is pending and not yet consumed.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Wait until the trigger is fired, then disarm it.
    pub async fn wait(&self) {
        self.notify.notified().await;
        self.pending.store(false, Ordering::Release);
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn second_fire_is_noop() {
        let trigger = Trigger::new();
        assert!(trigger.fire());
        assert!(!trigger.fire());
        assert!(trigger.is_pending());
    }

    #[tokio::test]
    async fn wait_consumes_pending_fire() {
        let trigger = Trigger::new();
        trigger.fire();
        tokio::time::timeout(Duration::from_secs(1), trigger.wait())
            .await
            .expect("pending fire should wake immediately");
        assert!(!trigger.is_pending());
    }

    #[tokio::test]
    async fn many_fires_yield_one_wakeup() {
        let trigger = Arc::new(Trigger::new());
        let mut handles = Vec::new();
        for _ in 0..32 {
            let t = Arc::clone(&trigger);
            handles.push(tokio::spawn(async move { t.fire() }));
        }
        let mut armed = 0;
        for h in handles {
            if h.await.unwrap() {
                armed += 1;
            }
        }
        assert_eq!(armed, 1);

        trigger.wait().await;
        // No second permit was queued.
        let second = tokio::time::timeout(Duration::from_millis(50), trigger.wait()).await;
        assert!(second.is_err());
    }

    #[tokio::test]
    async fn fire_wakes_blocked_waiter() {
        let trigger = Arc::new(Trigger::new());
        let t = Arc::clone(&trigger);
        let waiter = tokio::spawn(async move { t.wait().await });
        tokio::task::yield_now().await;
        trigger.fire();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake")
            .unwrap();
    }
}
