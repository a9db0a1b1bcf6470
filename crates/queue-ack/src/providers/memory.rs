//! In-memory queue client implementation for testing and development.
//!
//! This module provides a small pull-based queue that behaves like a
//! visibility-timeout queue:
//! - Receiving moves a message in-flight under a fresh receipt handle
//! - Deleting by receipt handle removes an in-flight message for good
//! - Releasing in-flight messages makes them deliverable again, with an
//!   incremented delivery count
//!
//! It is intended for unit and integration tests of consumers and for local
//! development without a cloud account.

use crate::client::QueueClient;
use crate::error::QueueError;
use crate::message::{MessageId, QueueUrl, ReceiptHandle, ReceivedMessage, Timestamp};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock, RwLockWriteGuard};
use tracing::debug;

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;

// ============================================================================
// Internal Storage Structures
// ============================================================================

/// Internal queue state for a single queue
#[derive(Default)]
struct InMemoryQueue {
    /// Messages waiting to be received (FIFO order)
    messages: VecDeque<StoredMessage>,
    /// Messages received but not yet deleted, keyed by receipt handle
    in_flight: HashMap<ReceiptHandle, StoredMessage>,
    /// Sequence number assigned to the next enqueued message
    next_sequence: u64,
}

/// A message stored in the queue with delivery metadata
#[derive(Clone)]
struct StoredMessage {
    sequence: u64,
    message_id: MessageId,
    body: Bytes,
    delivery_count: u32,
}

// ============================================================================
// InMemoryQueueClient
// ============================================================================

/// In-memory queue client
#[derive(Clone, Default)]
pub struct InMemoryQueueClient {
    storage: Arc<RwLock<HashMap<QueueUrl, InMemoryQueue>>>,
}

impl InMemoryQueueClient {
    /// Create new empty in-memory queue client
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a queue. Creating an existing queue leaves it untouched.
    pub fn create_queue(&self, queue: &QueueUrl) -> Result<(), QueueError> {
        self.storage()?.entry(queue.clone()).or_default();
        Ok(())
    }

    /// Enqueue a message body
    pub fn send_message(&self, queue: &QueueUrl, body: Bytes) -> Result<MessageId, QueueError> {
        let mut storage = self.storage()?;
        let stored = queue_mut(&mut storage, queue)?;

        let message_id = MessageId::new();
        let sequence = stored.next_sequence;
        stored.next_sequence += 1;
        stored.messages.push_back(StoredMessage {
            sequence,
            message_id: message_id.clone(),
            body,
            delivery_count: 0,
        });

        Ok(message_id)
    }

    /// Receive up to `max_messages` messages, moving each in-flight
    pub fn receive_messages(
        &self,
        queue: &QueueUrl,
        max_messages: u32,
    ) -> Result<Vec<ReceivedMessage>, QueueError> {
        let mut storage = self.storage()?;
        let stored = queue_mut(&mut storage, queue)?;

        let mut received = Vec::new();
        while received.len() < max_messages as usize {
            let Some(mut message) = stored.messages.pop_front() else {
                break;
            };

            message.delivery_count += 1;
            let receipt_handle = ReceiptHandle::generate();
            received.push(ReceivedMessage {
                queue_url: queue.clone(),
                receipt_handle: receipt_handle.clone(),
                message_id: message.message_id.clone(),
                body: message.body.clone(),
                attributes: HashMap::new(),
                delivery_count: message.delivery_count,
                delivered_at: Timestamp::now(),
            });
            stored.in_flight.insert(receipt_handle, message);
        }

        debug!(queue_url = %queue, count = received.len(), "Received messages");
        Ok(received)
    }

    /// Return every in-flight message to the queue, as if its visibility
    /// timeout had expired. Old receipt handles become invalid.
    pub fn release_in_flight(&self, queue: &QueueUrl) -> Result<usize, QueueError> {
        let mut storage = self.storage()?;
        let stored = queue_mut(&mut storage, queue)?;

        let released = stored.in_flight.len();
        let mut returning: Vec<StoredMessage> =
            stored.in_flight.drain().map(|(_, message)| message).collect();
        // Released messages go ahead of waiting ones, in their original send order
        returning.sort_by_key(|message| message.sequence);
        for message in returning.into_iter().rev() {
            stored.messages.push_front(message);
        }

        debug!(queue_url = %queue, released, "Released in-flight messages");
        Ok(released)
    }

    /// Number of messages waiting to be received
    pub fn visible_count(&self, queue: &QueueUrl) -> Result<usize, QueueError> {
        let mut storage = self.storage()?;
        Ok(queue_mut(&mut storage, queue)?.messages.len())
    }

    /// Number of messages received but not deleted
    pub fn in_flight_count(&self, queue: &QueueUrl) -> Result<usize, QueueError> {
        let mut storage = self.storage()?;
        Ok(queue_mut(&mut storage, queue)?.in_flight.len())
    }

    fn storage(
        &self,
    ) -> Result<RwLockWriteGuard<'_, HashMap<QueueUrl, InMemoryQueue>>, QueueError> {
        self.storage.write().map_err(|e| QueueError::ProviderError {
            provider: "InMemory".to_string(),
            code: "LockPoisoned".to_string(),
            message: e.to_string(),
        })
    }
}

fn queue_mut<'a>(
    storage: &'a mut HashMap<QueueUrl, InMemoryQueue>,
    queue: &QueueUrl,
) -> Result<&'a mut InMemoryQueue, QueueError> {
    storage.get_mut(queue).ok_or_else(|| QueueError::QueueNotFound {
        queue_url: queue.to_string(),
    })
}

#[async_trait]
impl QueueClient for InMemoryQueueClient {
    async fn delete_message(
        &self,
        queue: &QueueUrl,
        receipt: &ReceiptHandle,
    ) -> Result<(), QueueError> {
        let mut storage = self.storage()?;
        let stored = queue_mut(&mut storage, queue)?;

        match stored.in_flight.remove(receipt) {
            Some(message) => {
                debug!(
                    queue_url = %queue,
                    message_id = %message.message_id,
                    "Deleted message"
                );
                Ok(())
            }
            None => Err(QueueError::MessageNotFound {
                receipt: receipt.to_string(),
            }),
        }
    }
}
