//! Acknowledgement tracking for messages handed to application code.
//!
//! An acknowledger remembers every delivery the consumer has accepted but not
//! yet durably acknowledged. Entries are keyed by receipt handle, so any
//! tracked message can be acknowledged independently of the others.
//!
//! # Lifecycle of an entry
//!
//! ```text
//! absent --notify_message_received--> tracked
//! tracked --acknowledge | remove_messages | forget_unacknowledged--> absent
//! ```
//!
//! No terminal marker is kept: once removed, an entry is indistinguishable
//! from one that was never delivered.

use crate::client::{QueueClient, Session};
use crate::error::AcknowledgeError;
use crate::message::{MessageIdentifier, ReceiptHandle, ReceivedMessage};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{info, warn};

#[cfg(test)]
#[path = "acknowledger_tests.rs"]
mod tests;

/// Bookkeeping interface between a consumer and the queue it reads from
#[async_trait]
pub trait Acknowledger: Send + Sync {
    /// Durably acknowledge a delivered message by deleting it from its queue.
    ///
    /// The message stops being tracked only after the delete succeeds.
    async fn acknowledge(&self, message: &ReceivedMessage) -> Result<(), AcknowledgeError>;

    /// Start tracking a delivered message until it is acknowledged or forgotten
    fn notify_message_received(&self, message: &ReceivedMessage);

    /// Snapshot of every tracked message, in no particular order
    fn unacknowledged_messages(&self) -> Vec<MessageIdentifier>;

    /// Stop tracking all messages without deleting them, so they can be redelivered
    fn forget_unacknowledged(&self);

    /// Stop tracking messages that were already deleted by other means
    fn remove_messages(&self, messages: &[MessageIdentifier]);
}

/// Acknowledges messages one at a time, in any order.
///
/// This type is meant to be driven by a single consumer: operations are not
/// atomic with respect to each other. The internal map is still guarded by a
/// lock so that accidental concurrent use cannot corrupt it.
pub struct UnorderedAcknowledger {
    client: Arc<dyn QueueClient>,
    session: Arc<dyn Session>,
    // Key is the receipt handle of the delivery
    unacked: RwLock<HashMap<ReceiptHandle, MessageIdentifier>>,
}

impl UnorderedAcknowledger {
    /// Create new acknowledger for one consumer session
    pub fn new(client: Arc<dyn QueueClient>, session: Arc<dyn Session>) -> Self {
        Self {
            client,
            session,
            unacked: RwLock::new(HashMap::new()),
        }
    }

    /// Number of messages currently tracked
    pub fn unacknowledged_count(&self) -> usize {
        self.entries().len()
    }

    /// Check whether the delivery with the given receipt handle is tracked
    pub fn is_unacknowledged(&self, receipt: &ReceiptHandle) -> bool {
        self.entries().contains_key(receipt)
    }

    // Every critical section is a single map operation, so a poisoned lock
    // still guards a consistent map.
    fn entries(&self) -> RwLockReadGuard<'_, HashMap<ReceiptHandle, MessageIdentifier>> {
        self.unacked.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn entries_mut(&self) -> RwLockWriteGuard<'_, HashMap<ReceiptHandle, MessageIdentifier>> {
        self.unacked.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Acknowledger for UnorderedAcknowledger {
    async fn acknowledge(&self, message: &ReceivedMessage) -> Result<(), AcknowledgeError> {
        self.session.check_open()?;

        if let Err(e) = self
            .client
            .delete_message(&message.queue_url, &message.receipt_handle)
            .await
        {
            warn!(
                queue_url = %message.queue_url,
                receipt_handle = %message.receipt_handle,
                message_id = %message.message_id,
                error = %e,
                "Failed to delete message, keeping it unacknowledged"
            );
            return Err(AcknowledgeError::DeleteFailed {
                queue_url: message.queue_url.to_string(),
                receipt_handle: message.receipt_handle.to_string(),
                source: e,
            });
        }

        let mut entries = self.entries_mut();
        entries.remove(&message.receipt_handle);
        info!(
            receipt_handle = %message.receipt_handle,
            message_id = %message.message_id,
            unacknowledged = entries.len(),
            "Acknowledged message"
        );

        Ok(())
    }

    fn notify_message_received(&self, message: &ReceivedMessage) {
        let identifier = MessageIdentifier::from(message);

        let mut entries = self.entries_mut();
        entries.insert(message.receipt_handle.clone(), identifier);
        info!(
            receipt_handle = %message.receipt_handle,
            message_id = %message.message_id,
            unacknowledged = entries.len(),
            "Received message"
        );
    }

    fn unacknowledged_messages(&self) -> Vec<MessageIdentifier> {
        self.entries().values().cloned().collect()
    }

    fn forget_unacknowledged(&self) {
        let mut entries = self.entries_mut();
        let forgotten = entries.len();
        entries.clear();
        info!(forgotten, "Forgot unacknowledged messages");
    }

    fn remove_messages(&self, messages: &[MessageIdentifier]) {
        let mut entries = self.entries_mut();
        let before = entries.len();
        for message in messages {
            entries.remove(message.receipt_handle());
        }
        info!(
            requested = messages.len(),
            removed = before - entries.len(),
            unacknowledged = entries.len(),
            "Removed messages deleted elsewhere"
        );
    }
}
