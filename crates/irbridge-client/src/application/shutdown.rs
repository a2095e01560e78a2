//! Cooperative shutdown flag shared by every background loop.
//!
//! Loops check [`Shutdown::is_triggered`] at the top of each iteration; code
//! that waits (socket reads, reconnect sleeps) `select!`s on
//! [`Shutdown::wait`] so it wakes immediately instead of after the wait.

use std::sync::Arc;

use tokio::sync::watch;

/// Clonable handle to the single process-wide shutdown flag.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            rx,
        }
    }

    /// Sets the flag.  Idempotent.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the flag is set (immediately if it already is).
    pub async fn wait(&self) {
        let mut rx = self.rx.clone();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = rx.wait_for(|&stop| stop).await;
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_new_flag_is_not_triggered() {
        assert!(!Shutdown::new().is_triggered());
    }

    #[test]
    fn test_trigger_is_visible_through_clones() {
        let a = Shutdown::new();
        let b = a.clone();
        a.trigger();
        assert!(b.is_triggered());
    }

    #[tokio::test]
    async fn test_wait_returns_after_trigger_from_other_task() {
        // Arrange
        let shutdown = Shutdown::new();
        let remote = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            remote.trigger();
        });

        // Act / Assert – must not hang
        tokio::time::timeout(Duration::from_secs(2), shutdown.wait())
            .await
            .expect("wait must resolve after trigger");
    }

    #[tokio::test]
    async fn test_wait_returns_immediately_when_already_triggered() {
        let shutdown = Shutdown::new();
        shutdown.trigger();
        tokio::time::timeout(Duration::from_millis(100), shutdown.wait())
            .await
            .expect("already triggered");
    }
}
