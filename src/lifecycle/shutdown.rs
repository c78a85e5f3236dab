//! Shutdown coordination for the service.
//!
//! Backed by a `watch` channel rather than a broadcast, so a signal taken
//! after `trigger` still resolves immediately.

use tokio::sync::watch;

/// Owner side: flips the service into shutdown exactly once.
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

/// Waiter side, handed to the HTTP server.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownSignal {
    /// Resolve once shutdown is triggered, or once the `Shutdown` is dropped.
    pub async fn wait(mut self) {
        let _ = self.rx.wait_for(|triggered| *triggered).await;
    }
}
