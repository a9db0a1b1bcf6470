//! Collaborator traits consumed by acknowledgers.

use crate::error::{AcknowledgeError, QueueError};
use crate::message::{QueueUrl, ReceiptHandle};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;

/// Interface to the remote queue used for durable acknowledgement
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueueClient: Send + Sync {
    /// Permanently remove one delivered message from the queue
    async fn delete_message(
        &self,
        queue: &QueueUrl,
        receipt: &ReceiptHandle,
    ) -> Result<(), QueueError>;
}

/// Liveness gate for the consumer session that owns an acknowledger
pub trait Session: Send + Sync {
    /// Check whether the session has been shut down
    fn is_closed(&self) -> bool;

    /// Fail fast with [`AcknowledgeError::SessionClosed`] once the session is closed
    fn check_open(&self) -> Result<(), AcknowledgeError> {
        if self.is_closed() {
            return Err(AcknowledgeError::SessionClosed);
        }

        Ok(())
    }
}

/// Session state for a single consumer
#[derive(Debug)]
pub struct ConsumerSession {
    id: String,
    closed: AtomicBool,
}

impl ConsumerSession {
    /// Create new open session with a random ID
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            closed: AtomicBool::new(false),
        }
    }

    /// Get session ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Close the session. Closing an already closed session is a no-op.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            info!(session_id = %self.id, "Consumer session closed");
        }
    }
}

impl Default for ConsumerSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Session for ConsumerSession {
    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
