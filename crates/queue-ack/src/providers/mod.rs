//! Queue client implementations.
//!
//! This module contains concrete implementations of the `QueueClient` trait
//! for different queue backends.

#[cfg(feature = "aws")]
pub mod aws;
pub mod memory;

#[cfg(feature = "aws")]
pub use aws::SqsQueueClient;
pub use memory::InMemoryQueueClient;
