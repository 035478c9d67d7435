//! Cooperative cancellation plumbing.
//!
//! A [`CancelHandle`] is the caller-facing side; the read loop holds a
//! [`CancelReceiver`]. Cancellation is a level, not an edge: a handle
//! triggered before the loop even starts is still observed.

use tokio::sync::watch;

/// Create a connected handle/receiver pair for one call.
pub fn cancel_pair() -> (CancelHandle, CancelReceiver) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx: std::sync::Arc::new(tx) }, CancelReceiver { rx })
}

/// Caller-facing cancellation handle. Cheap to clone; all clones share the
/// same signal.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: std::sync::Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    /// Trigger the cancellation signal. Idempotent.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Obtain a receiver observing this handle's signal.
    pub fn subscribe(&self) -> CancelReceiver {
        CancelReceiver {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read-loop side of the cancellation signal.
#[derive(Debug, Clone)]
pub struct CancelReceiver {
    rx: watch::Receiver<bool>,
}

impl CancelReceiver {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once the signal is triggered.
    ///
    /// If every handle has been dropped without cancelling, the call can no
    /// longer be cancelled and this future stays pending.
    pub async fn cancelled(&mut self) {
        if self.rx.wait_for(|cancelled| *cancelled).await.is_err() {
            futures::future::pending::<()>().await;
        }
    }
}
