//! Error types for acknowledgement and queue operations.

use chrono::Duration;
use thiserror::Error;

/// Errors surfaced to the caller of an acknowledger operation
#[derive(Debug, Error)]
pub enum AcknowledgeError {
    #[error("Session is closed")]
    SessionClosed,

    #[error("Failed to delete message '{receipt_handle}' from {queue_url}: {source}")]
    DeleteFailed {
        queue_url: String,
        receipt_handle: String,
        #[source]
        source: QueueError,
    },
}

impl AcknowledgeError {
    /// Check if the caller may re-invoke `acknowledge` with a chance of success.
    ///
    /// A failed delete leaves the message tracked, so retrying is always
    /// possible; this only reports whether the underlying failure looks
    /// transient.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::SessionClosed => false,
            Self::DeleteFailed { source, .. } => source.is_transient(),
        }
    }
}

/// Failures reported by a queue client
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Queue not found: {queue_url}")]
    QueueNotFound { queue_url: String },

    #[error("Message not found or receipt expired: {receipt}")]
    MessageNotFound { receipt: String },

    #[error("Operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Permission denied for operation: {operation}")]
    PermissionDenied { operation: String },

    #[error("Provider error ({provider}): {code} - {message}")]
    ProviderError {
        provider: String,
        code: String,
        message: String,
    },
}

impl QueueError {
    /// Check if error is transient and should be retried
    pub fn is_transient(&self) -> bool {
        match self {
            Self::QueueNotFound { .. } => false,
            Self::MessageNotFound { .. } => false,
            Self::Timeout { .. } => true,
            Self::ConnectionFailed { .. } => true,
            Self::AuthenticationFailed { .. } => false,
            Self::PermissionDenied { .. } => false,
            Self::ProviderError { .. } => true, // Provider-specific errors are usually transient
        }
    }

    /// Get suggested retry delay
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Timeout { .. } => Some(Duration::seconds(1)),
            Self::ConnectionFailed { .. } => Some(Duration::seconds(5)),
            _ => None,
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {key}")]
    Missing { key: String },

    #[error("Configuration parsing failed: {message}")]
    Parsing { message: String },
}

/// Validation errors
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    Required { field: String },

    #[error("Invalid format for {field}: {message}")]
    InvalidFormat { field: String, message: String },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
