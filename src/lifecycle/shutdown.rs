//! Per-server shutdown trigger.

use std::future::Future;
use tokio::sync::broadcast;

/// One-shot stop trigger for a serving task.
///
/// The task awaits [`Shutdown::signal`]; the owner calls
/// [`Shutdown::trigger`]. Dropping the `Shutdown` closes the channel, which
/// the task also treats as a stop.
#[derive(Debug)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Future resolving once [`trigger`](Self::trigger) is called or the
    /// coordinator is dropped. Suitable for `with_graceful_shutdown`.
    pub fn signal(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.tx.subscribe();
        async move {
            let _ = rx.recv().await;
        }
    }

    pub fn trigger(&self) {
        let _ = self.tx.send(());
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

    #[tokio::test]
    async fn trigger_resolves_signal() {
        let shutdown = Shutdown::new();
        let waiter = tokio::spawn(shutdown.signal());
        shutdown.trigger();
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn drop_resolves_signal() {
        let shutdown = Shutdown::new();
        let waiter = tokio::spawn(shutdown.signal());
        drop(shutdown);
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn signal_waits_for_trigger() {
        let shutdown = Shutdown::new();
        let signal = shutdown.signal();
        assert!(tokio::time::timeout(Duration::from_millis(50), signal).await.is_err());
    }
}
