//! Message types for acknowledgement tracking including core domain identifiers.

use crate::error::ValidationError;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

// ============================================================================
// Core Domain Identifiers
// ============================================================================

/// Validated queue identity, expressed as the absolute URL of the queue
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QueueUrl(String);

impl QueueUrl {
    /// Create new queue URL with validation
    pub fn new(url: String) -> Result<Self, ValidationError> {
        if url.is_empty() {
            return Err(ValidationError::Required {
                field: "queue_url".to_string(),
            });
        }

        let parsed = url::Url::parse(&url).map_err(|e| ValidationError::InvalidFormat {
            field: "queue_url".to_string(),
            message: e.to_string(),
        })?;

        if !parsed.has_host() {
            return Err(ValidationError::InvalidFormat {
                field: "queue_url".to_string(),
                message: "must include a host".to_string(),
            });
        }

        Ok(Self(url))
    }

    /// Get queue URL as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QueueUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for QueueUrl {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for QueueUrl {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<QueueUrl> for String {
    fn from(value: QueueUrl) -> Self {
        value.0
    }
}

/// Opaque token issued by the queue for one delivery of a message.
///
/// The queue never reuses a handle for a different delivery while it is
/// outstanding, which makes the handle a safe key for tracking that delivery.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReceiptHandle(String);

impl ReceiptHandle {
    /// Create new receipt handle with validation
    pub fn new(handle: String) -> Result<Self, ValidationError> {
        if handle.is_empty() {
            return Err(ValidationError::Required {
                field: "receipt_handle".to_string(),
            });
        }

        Ok(Self(handle))
    }

    /// Generate a fresh random handle
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Get handle as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReceiptHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ReceiptHandle {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for ReceiptHandle {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ReceiptHandle> for String {
    fn from(value: ReceiptHandle) -> Self {
        value.0
    }
}

/// Unique identifier assigned to a message by the queue
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageId(String);

impl MessageId {
    /// Generate new random message ID
    pub fn new() -> Self {
        let id = uuid::Uuid::new_v4();
        Self(id.to_string())
    }

    /// Get message ID as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MessageId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ValidationError::Required {
                field: "message_id".to_string(),
            });
        }

        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for MessageId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MessageId> for String {
    fn from(value: MessageId) -> Self {
        value.0
    }
}

/// Timestamp wrapper for consistent time handling
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create timestamp for current time
    pub fn now() -> Self {
        Self(Utc::now())
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S UTC"))
    }
}

// ============================================================================
// Message Types
// ============================================================================

/// A message delivered to the consumer by the queue
#[derive(Debug, Clone)]
pub struct ReceivedMessage {
    pub queue_url: QueueUrl,
    pub receipt_handle: ReceiptHandle,
    pub message_id: MessageId,
    pub body: Bytes,
    pub attributes: HashMap<String, String>,
    pub delivery_count: u32,
    pub delivered_at: Timestamp,
}

impl ReceivedMessage {
    /// Create a first-delivery message with no attributes
    pub fn new(
        queue_url: QueueUrl,
        receipt_handle: ReceiptHandle,
        message_id: MessageId,
        body: Bytes,
    ) -> Self {
        Self {
            queue_url,
            receipt_handle,
            message_id,
            body,
            attributes: HashMap::new(),
            delivery_count: 1,
            delivered_at: Timestamp::now(),
        }
    }

    /// Add message attribute
    pub fn with_attribute(mut self, key: String, value: String) -> Self {
        self.attributes.insert(key, value);
        self
    }

    /// Identity of this delivery, as tracked until it is acknowledged
    pub fn identifier(&self) -> MessageIdentifier {
        MessageIdentifier::from(self)
    }
}

/// Immutable identity of one delivered message instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageIdentifier {
    queue_url: QueueUrl,
    receipt_handle: ReceiptHandle,
    message_id: MessageId,
}

impl MessageIdentifier {
    pub fn new(queue_url: QueueUrl, receipt_handle: ReceiptHandle, message_id: MessageId) -> Self {
        Self {
            queue_url,
            receipt_handle,
            message_id,
        }
    }

    pub fn queue_url(&self) -> &QueueUrl {
        &self.queue_url
    }

    pub fn receipt_handle(&self) -> &ReceiptHandle {
        &self.receipt_handle
    }

    pub fn message_id(&self) -> &MessageId {
        &self.message_id
    }
}

impl From<&ReceivedMessage> for MessageIdentifier {
    fn from(message: &ReceivedMessage) -> Self {
        Self::new(
            message.queue_url.clone(),
            message.receipt_handle.clone(),
            message.message_id.clone(),
        )
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
