//! Timer for the self-clearing submission notice.
//!
//! Arming the clock spawns a task that sleeps for the notice duration and then
//! posts a ticket back over a channel. The owner applies the ticket on its own
//! task, so the expiry never interleaves with a running handler. Re-arming,
//! disarming or dropping the clock aborts the pending task, and tickets from
//! replaced timers are discarded on receipt.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::trace;

use crate::error::{Error, Result};

/// Identifies one arming of the clock.
pub type Ticket = u64;

/// A pending expiry. Aborts its task when dropped.
#[derive(Debug)]
struct PendingExpiry {
    ticket: Ticket,
    task: JoinHandle<()>,
}

impl Drop for PendingExpiry {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// One-shot, re-armable expiry timer.
#[derive(Debug)]
pub struct NoticeClock {
    runtime: Handle,
    tx: mpsc::UnboundedSender<Ticket>,
    rx: mpsc::UnboundedReceiver<Ticket>,
    next_ticket: Ticket,
    pending: Option<PendingExpiry>,
}

impl NoticeClock {
    /// Create a clock on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Runtime`] when called outside a tokio runtime.
    pub fn new() -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| Error::Runtime(e.to_string()))?;
        Ok(Self::with_runtime(runtime))
    }

    /// Create a clock that spawns its timers on `runtime`.
    #[must_use]
    pub fn with_runtime(runtime: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            runtime,
            tx,
            rx,
            next_ticket: 0,
            pending: None,
        }
    }

    /// Start a timer that expires after `after`, replacing any pending one.
    pub fn arm(&mut self, after: Duration) -> Ticket {
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        let tx = self.tx.clone();

        let task = self.runtime.spawn(async move {
            tokio::time::sleep(after).await;
            // The receiver only goes away with the clock, which aborts us first
            let _ = tx.send(ticket);
        });

        // Assigning drops, and so aborts, the previous timer
        self.pending = Some(PendingExpiry { ticket, task });
        trace!(ticket, ?after, "Armed notice timer");
        ticket
    }

    /// Cancel the pending timer, if any.
    pub fn disarm(&mut self) {
        if let Some(pending) = self.pending.take() {
            trace!(ticket = pending.ticket, "Disarmed notice timer");
        }
    }

    /// Whether a timer is pending.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Ticket of the pending timer.
    #[must_use]
    pub fn pending_ticket(&self) -> Option<Ticket> {
        self.pending.as_ref().map(|p| p.ticket)
    }

    /// Abort handle of the pending timer task.
    #[must_use]
    pub fn abort_handle(&self) -> Option<AbortHandle> {
        self.pending.as_ref().map(|p| p.task.abort_handle())
    }

    /// Wait for the pending timer to expire.
    ///
    /// Never resolves while the clock is disarmed. Cancel-safe.
    pub async fn expired(&mut self) -> Ticket {
        loop {
            // The clock holds a sender, so the channel never closes
            let Some(ticket) = self.rx.recv().await else {
                std::future::pending::<()>().await;
                continue;
            };
            if self.accept(ticket) {
                return ticket;
            }
        }
    }

    /// Collect an expiry that has already fired, without waiting.
    pub fn try_expired(&mut self) -> Option<Ticket> {
        while let Ok(ticket) = self.rx.try_recv() {
            if self.accept(ticket) {
                return Some(ticket);
            }
        }
        None
    }

    fn accept(&mut self, ticket: Ticket) -> bool {
        if self.pending_ticket() == Some(ticket) {
            self.pending = None;
            true
        } else {
            trace!(ticket, "Discarded stale notice expiry");
            false
        }
    }
}
