//! Trailing-edge coalescing of saves.
//!
//! The engine has one pending slot. Scheduling a save replaces whatever is in
//! the slot; the replaced save never runs and its handle resolves to `None`.
//! Once a save has left the slot and started, nothing cancels it.

use std::sync::atomic::Ordering;
use std::sync::{Arc, MutexGuard, PoisonError};

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::ContentEngine;
use crate::document::model::ContentDocument;
use crate::events::SaveOutcome;

pub(super) struct PendingSave {
    ticket: u64,
    document: ContentDocument,
    reply: oneshot::Sender<SaveOutcome>,
    timer: Option<JoinHandle<()>>,
}

/// Handle to a debounced save.
#[derive(Debug)]
pub struct DebouncedSave {
    reply: oneshot::Receiver<SaveOutcome>,
}

impl DebouncedSave {
    /// Wait for the save. `None` if it was superseded or cancelled.
    pub async fn outcome(self) -> Option<SaveOutcome> {
        self.reply.await.ok()
    }
}

impl ContentEngine {
    /// Schedule a save after the configured quiet period, replacing any save
    /// still waiting in the slot.
    pub fn save_debounced(self: &Arc<Self>, document: ContentDocument) -> DebouncedSave {
        let (reply, rx) = oneshot::channel();
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);

        let mut slot = self.pending_slot();
        if let Some(previous) = slot.take() {
            tracing::debug!(ticket = previous.ticket, "Superseding pending save");
            previous.cancel();
        }

        let engine = Arc::clone(self);
        let delay = self.config.debounce;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(pending) = engine.take_pending(ticket) {
                pending.run(&engine).await;
            }
        });

        *slot = Some(PendingSave {
            ticket,
            document,
            reply,
            timer: Some(timer),
        });

        DebouncedSave { reply: rx }
    }

    /// Run the pending save now instead of waiting for its timer.
    pub async fn flush_pending(&self) -> Option<SaveOutcome> {
        let mut pending = self.pending_slot().take()?;
        if let Some(timer) = pending.timer.take() {
            timer.abort();
        }
        Some(pending.run(self).await)
    }

    /// Drop the pending save without running it. Returns whether one existed.
    pub fn cancel_pending(&self) -> bool {
        match self.pending_slot().take() {
            Some(pending) => {
                pending.cancel();
                true
            }
            None => false,
        }
    }

    pub fn has_pending_save(&self) -> bool {
        self.pending_slot().is_some()
    }

    fn take_pending(&self, ticket: u64) -> Option<PendingSave> {
        let mut slot = self.pending_slot();
        match slot.as_ref() {
            Some(pending) if pending.ticket == ticket => slot.take(),
            _ => None,
        }
    }

    fn pending_slot(&self) -> MutexGuard<'_, Option<PendingSave>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PendingSave {
    async fn run(self, engine: &ContentEngine) -> SaveOutcome {
        let outcome = engine.save(&self.document).await;
        // The caller may have dropped its handle.
        let _ = self.reply.send(outcome.clone());
        outcome
    }

    fn cancel(mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}
