use tokio::sync::{Mutex, MutexGuard};

/// Single-slot gate serialising dashboard refreshes.
///
/// At most one refresh runs at a time. Timer ticks use [`RefreshGate::try_enter`]
/// and are skipped while a refresh is in flight; user actions use
/// [`RefreshGate::enter`] and wait their turn, so the latest selection is
/// always applied after the current refresh finishes.
#[derive(Debug, Default)]
pub struct RefreshGate {
    slot: Mutex<()>,
}

pub type RefreshPermit<'a> = MutexGuard<'a, ()>;

impl RefreshGate {
    pub fn new() -> Self {
        Self { slot: Mutex::new(()) }
    }

    /// Take the slot if free, otherwise `None`
    pub fn try_enter(&self) -> Option<RefreshPermit<'_>> {
        self.slot.try_lock().ok()
    }

    /// Wait for the slot
    pub async fn enter(&self) -> RefreshPermit<'_> {
        self.slot.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_try_enter_is_refused_while_busy() {
        let gate = RefreshGate::new();

        let permit = gate.try_enter();
        assert!(permit.is_some());
        assert!(gate.try_enter().is_none());

        drop(permit);
        assert!(gate.try_enter().is_some());
    }

    #[tokio::test]
    async fn test_enter_waits_for_running_refresh() {
        let gate = Arc::new(RefreshGate::new());
        let permit = gate.enter().await;

        let waiter = {
            let gate = gate.clone();
            tokio::spawn(async move {
                let _permit = gate.enter().await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(permit);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
    }
}
