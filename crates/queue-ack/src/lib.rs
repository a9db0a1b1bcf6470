//! # Queue Ack
//!
//! Acknowledgement tracking for pull-based queue consumers.
//!
//! A consumer receives messages, hands them to application code and later
//! acknowledges them by deleting them from the queue. Between delivery and
//! acknowledgement the message is *unacknowledged*; this crate keeps that set
//! so a consumer can acknowledge messages in any order, drop tracking when a
//! session is rolled back, and reconcile after deletes made elsewhere.
//!
//! ## Module Organization
//!
//! - [`acknowledger`] - The `Acknowledger` trait and `UnorderedAcknowledger`
//! - [`client`] - Queue client and session collaborator traits
//! - [`error`] - Error types for acknowledgement and queue operations
//! - [`message`] - Message identifiers and delivered messages
//! - [`config`] - Layered consumer configuration
//! - [`observability`] - Logging initialisation
//! - [`providers`] - In-memory and (with the `aws` feature) SQS queue clients

// Module declarations
pub mod acknowledger;
pub mod client;
pub mod config;
pub mod error;
pub mod message;
pub mod observability;
pub mod providers;

// Re-export commonly used types at crate root for convenience
pub use acknowledger::{Acknowledger, UnorderedAcknowledger};
pub use client::{ConsumerSession, QueueClient, Session};
pub use config::{ConsumerConfig, LoggingConfig, SqsConfig};
pub use error::{AcknowledgeError, ConfigurationError, QueueError, ValidationError};
pub use message::{
    MessageId, MessageIdentifier, QueueUrl, ReceiptHandle, ReceivedMessage, Timestamp,
};
pub use providers::InMemoryQueueClient;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
