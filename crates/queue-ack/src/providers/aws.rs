//! AWS SQS queue client implementation.
//!
//! Acknowledgement maps onto the SQS `DeleteMessage` action, addressed by the
//! queue URL and the receipt handle of one delivery. SQS rejects handles that
//! were never issued or belong to an older delivery of the message.
//!
//! # Example
//!
//! ```no_run
//! use queue_ack::config::SqsConfig;
//! use queue_ack::providers::SqsQueueClient;
//!
//! # async fn example() {
//! let config = SqsConfig {
//!     region: "eu-west-1".to_string(),
//!     endpoint_url: None,
//! };
//! let client = SqsQueueClient::from_config(&config).await;
//! # }
//! ```

use crate::client::QueueClient;
use crate::config::SqsConfig;
use crate::error::QueueError;
use crate::message::{QueueUrl, ReceiptHandle};
use async_trait::async_trait;
use aws_sdk_sqs::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_sqs::Client;
use chrono::Duration;
use tracing::{debug, instrument};

#[cfg(test)]
#[path = "aws_tests.rs"]
mod tests;

const PROVIDER: &str = "AwsSqs";

/// SQS-backed queue client
#[derive(Debug, Clone)]
pub struct SqsQueueClient {
    client: Client,
}

impl SqsQueueClient {
    /// Wrap an existing SDK client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build an SDK client from the default credential chain and the given settings
    pub async fn from_config(config: &SqsConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()));

        // Endpoint override for local testing
        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        let shared_config = loader.load().await;
        Self::new(Client::new(&shared_config))
    }

    /// Overall operation timeout configured on the SDK client, if any
    fn operation_timeout(&self) -> Option<std::time::Duration> {
        self.client
            .config()
            .timeout_config()
            .and_then(|timeouts| timeouts.operation_timeout())
    }
}

#[async_trait]
impl QueueClient for SqsQueueClient {
    #[instrument(skip(self, queue), fields(queue_url = %queue))]
    async fn delete_message(
        &self,
        queue: &QueueUrl,
        receipt: &ReceiptHandle,
    ) -> Result<(), QueueError> {
        self.client
            .delete_message()
            .queue_url(queue.as_str())
            .receipt_handle(receipt.as_str())
            .send()
            .await
            .map_err(|e| match &e {
                SdkError::TimeoutError(_) => timeout_error(self.operation_timeout(), e.to_string()),
                SdkError::DispatchFailure(_) => QueueError::ConnectionFailed {
                    message: e.to_string(),
                },
                _ => classify_service_error(
                    e.code(),
                    e.message().unwrap_or_default(),
                    queue,
                    receipt,
                ),
            })?;

        debug!(receipt_handle = %receipt, "Deleted message from SQS");
        Ok(())
    }
}

/// A timed out call reports the configured operation timeout; without one the
/// elapsed time is unknown and the failure is reported as a connection failure.
fn timeout_error(configured: Option<std::time::Duration>, message: String) -> QueueError {
    match configured.and_then(|timeout| Duration::from_std(timeout).ok()) {
        Some(duration) => QueueError::Timeout { duration },
        None => QueueError::ConnectionFailed { message },
    }
}

/// Map an SQS error code onto the provider-neutral error taxonomy
fn classify_service_error(
    code: Option<&str>,
    message: &str,
    queue: &QueueUrl,
    receipt: &ReceiptHandle,
) -> QueueError {
    match code {
        Some("AWS.SimpleQueueService.NonExistentQueue") | Some("QueueDoesNotExist") => {
            QueueError::QueueNotFound {
                queue_url: queue.to_string(),
            }
        }
        Some("ReceiptHandleIsInvalid") | Some("InvalidIdFormat") => QueueError::MessageNotFound {
            receipt: receipt.to_string(),
        },
        Some("AccessDenied") | Some("AccessDeniedException") => QueueError::PermissionDenied {
            operation: "DeleteMessage".to_string(),
        },
        Some("InvalidClientTokenId")
        | Some("UnrecognizedClientException")
        | Some("SignatureDoesNotMatch")
        | Some("ExpiredToken") => QueueError::AuthenticationFailed {
            message: message.to_string(),
        },
        other => QueueError::ProviderError {
            provider: PROVIDER.to_string(),
            code: other.unwrap_or("Unknown").to_string(),
            message: message.to_string(),
        },
    }
}
