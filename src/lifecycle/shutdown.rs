//! One-shot shutdown coordination for background tasks.

use std::sync::Once;
use tokio::sync::watch;

/// Coordinator for cooperative shutdown.
///
/// Backed by a watch channel so the signal is level-triggered: a task that
/// subscribes after [`Shutdown::trigger`] observes it immediately.
#[derive(Debug)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
    once: Once,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self {
            tx,
            once: Once::new(),
        }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Trigger the shutdown signal.
    ///
    /// Returns true for the single call that actually fired it.
    pub fn trigger(&self) -> bool {
        let mut fired = false;
        self.once.call_once(|| {
            self.tx.send_replace(true);
            fired = true;
        });
        fired
    }

    /// Whether the signal has been fired.
    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving half of a [`Shutdown`].
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Wait until shutdown is triggered. Returns immediately if it already was.
    ///
    /// Also returns if the coordinator is dropped.
    pub async fn recv(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }

    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }
}
