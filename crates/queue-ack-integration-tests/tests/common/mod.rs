//! Common test utilities for queue-ack integration tests
//!
//! This module provides:
//! - A queue client wrapper that can be told to fail deletes
//! - A minimal consumer that receives and records deliveries
//! - Shared fixtures

use async_trait::async_trait;
use queue_ack::{
    Acknowledger, ConsumerSession, InMemoryQueueClient, QueueClient, QueueError, QueueUrl,
    ReceiptHandle, ReceivedMessage, UnorderedAcknowledger,
};
use std::sync::{Arc, Mutex};

pub const QUEUE: &str = "http://localhost:9324/000000000000/integration";

pub fn queue_url() -> QueueUrl {
    QUEUE.parse().unwrap()
}

// ============================================================================
// Failing Queue Client
// ============================================================================

/// Queue client that delegates to an in-memory queue but can fail deletes
#[derive(Clone)]
#[allow(dead_code)]
pub struct FlakyQueueClient {
    inner: InMemoryQueueClient,
    failures_remaining: Arc<Mutex<u32>>,
    delete_calls: Arc<Mutex<Vec<ReceiptHandle>>>,
}

#[allow(dead_code)]
impl FlakyQueueClient {
    pub fn new(inner: InMemoryQueueClient) -> Self {
        Self {
            inner,
            failures_remaining: Arc::new(Mutex::new(0)),
            delete_calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fail the next `count` delete calls with a connection error
    pub fn fail_next_deletes(&self, count: u32) {
        *self.failures_remaining.lock().unwrap() = count;
    }

    pub fn delete_calls(&self) -> Vec<ReceiptHandle> {
        self.delete_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueueClient for FlakyQueueClient {
    async fn delete_message(
        &self,
        queue: &QueueUrl,
        receipt: &ReceiptHandle,
    ) -> Result<(), QueueError> {
        self.delete_calls.lock().unwrap().push(receipt.clone());

        {
            let mut remaining = self.failures_remaining.lock().unwrap();
            if *remaining > 0 {
                *remaining -= 1;
                return Err(QueueError::ConnectionFailed {
                    message: "simulated network failure".to_string(),
                });
            }
        }

        self.inner.delete_message(queue, receipt).await
    }
}

// ============================================================================
// Test Consumer
// ============================================================================

/// Minimal pull consumer: one queue, one session, one acknowledger
#[allow(dead_code)]
pub struct TestConsumer {
    pub queue: InMemoryQueueClient,
    pub session: Arc<ConsumerSession>,
    pub acknowledger: UnorderedAcknowledger,
}

#[allow(dead_code)]
impl TestConsumer {
    /// Consumer acknowledging through the in-memory queue itself
    pub fn new(queue: InMemoryQueueClient) -> Self {
        let client: Arc<dyn QueueClient> = Arc::new(queue.clone());
        Self::with_client(queue, client)
    }

    /// Consumer acknowledging through a different client
    pub fn with_client(queue: InMemoryQueueClient, client: Arc<dyn QueueClient>) -> Self {
        let session = Arc::new(ConsumerSession::new());
        let acknowledger = UnorderedAcknowledger::new(client, session.clone());
        Self {
            queue,
            session,
            acknowledger,
        }
    }

    /// Receive up to `max` messages and record each delivery
    pub fn receive(&self, max: u32) -> Vec<ReceivedMessage> {
        let messages = self.queue.receive_messages(&queue_url(), max).unwrap();
        for message in &messages {
            self.acknowledger.notify_message_received(message);
        }
        messages
    }
}

/// In-memory queue holding `count` messages with bodies "message-0".."message-N"
pub fn seeded_queue(count: usize) -> InMemoryQueueClient {
    let queue = InMemoryQueueClient::new();
    queue.create_queue(&queue_url()).unwrap();
    for n in 0..count {
        queue
            .send_message(&queue_url(), format!("message-{}", n).into())
            .unwrap();
    }
    queue
}
