//! External interruption of actor suspensions.
//!
//! An interrupt is sticky: once raised for an actor, its current suspension
//! ends with [`WalkinError::Interrupted`] and so does any later one.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use crate::error::{Result, WalkinError};
use crate::types::ActorId;

/// Raises interrupts for the actors of a run. Cheap to clone.
#[derive(Debug, Clone)]
pub struct InterruptHandle {
    senders: Arc<Vec<watch::Sender<bool>>>,
}

impl InterruptHandle {
    pub fn new(actor_count: usize) -> Self {
        let senders = (0..actor_count).map(|_| watch::channel(false).0).collect();
        Self {
            senders: Arc::new(senders),
        }
    }

    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }

    /// Interrupts one actor. Returns false for an unknown id.
    pub fn interrupt(&self, actor: ActorId) -> bool {
        match self.senders.get(actor) {
            Some(sender) => {
                sender.send_replace(true);
                true
            }
            None => false,
        }
    }

    pub fn interrupt_all(&self) {
        for sender in self.senders.iter() {
            sender.send_replace(true);
        }
    }

    /// True once any actor has been interrupted.
    pub fn is_interrupted(&self) -> bool {
        self.senders.iter().any(|s| *s.borrow())
    }

    pub(crate) fn subscribe(&self, actor: ActorId) -> Option<Interrupt> {
        self.senders.get(actor).map(|s| Interrupt {
            receiver: s.subscribe(),
        })
    }
}

/// One actor's view of its interrupt flag.
#[derive(Debug)]
pub struct Interrupt {
    receiver: watch::Receiver<bool>,
}

impl Interrupt {
    /// An interrupt that can never fire.
    pub fn never() -> Self {
        let (_, receiver) = watch::channel(false);
        Self { receiver }
    }

    pub fn is_raised(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Sleeps for `duration` unless interrupted first.
    pub async fn sleep(&mut self, duration: Duration) -> Result<()> {
        let deadline = Instant::now() + duration;

        let interrupted = tokio::select! {
            _ = tokio::time::sleep_until(deadline) => return Ok(()),
            raised = self.receiver.wait_for(|raised| *raised) => raised.is_ok(),
        };

        if interrupted {
            return Err(WalkinError::Interrupted);
        }

        // Handle dropped: nobody can interrupt us any more.
        tokio::time::sleep_until(deadline).await;
        Ok(())
    }
}
