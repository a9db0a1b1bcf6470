//! Tests for the in-memory queue client.

use super::*;

fn orders() -> QueueUrl {
    "http://localhost:9324/000000000000/orders".parse().unwrap()
}

fn client_with_queue() -> InMemoryQueueClient {
    let client = InMemoryQueueClient::new();
    client.create_queue(&orders()).unwrap();
    client
}

// ============================================================================
// Queue Management Tests
// ============================================================================

mod queue_management {
    use super::*;

    #[test]
    fn test_new_queue_is_empty() {
        let client = client_with_queue();

        assert_eq!(client.visible_count(&orders()).unwrap(), 0);
        assert_eq!(client.in_flight_count(&orders()).unwrap(), 0);
    }

    #[test]
    fn test_create_queue_is_idempotent() {
        let client = client_with_queue();
        client.send_message(&orders(), "a".into()).unwrap();

        client.create_queue(&orders()).unwrap();

        assert_eq!(client.visible_count(&orders()).unwrap(), 1);
    }

    #[test]
    fn test_unknown_queue_is_reported() {
        let client = InMemoryQueueClient::new();

        let result = client.send_message(&orders(), "a".into());

        match result {
            Err(QueueError::QueueNotFound { queue_url }) => {
                assert_eq!(queue_url, orders().as_str());
            }
            other => panic!("Expected QueueNotFound error, got: {:?}", other),
        }
    }

    #[test]
    fn test_clones_share_storage() {
        let client = client_with_queue();
        let clone = client.clone();

        clone.send_message(&orders(), "shared".into()).unwrap();

        assert_eq!(client.visible_count(&orders()).unwrap(), 1);
    }
}

// ============================================================================
// Receive Tests
// ============================================================================

mod receive {
    use super::*;

    #[test]
    fn test_receive_moves_messages_in_flight() {
        let client = client_with_queue();
        let first = client.send_message(&orders(), "one".into()).unwrap();
        client.send_message(&orders(), "two".into()).unwrap();
        client.send_message(&orders(), "three".into()).unwrap();

        let received = client.receive_messages(&orders(), 2).unwrap();

        assert_eq!(received.len(), 2);
        assert_eq!(received[0].message_id, first);
        assert_eq!(received[0].body, Bytes::from_static(b"one"));
        assert_eq!(received[0].delivery_count, 1);
        assert_eq!(received[0].queue_url, orders());
        assert_ne!(received[0].receipt_handle, received[1].receipt_handle);
        assert_eq!(client.visible_count(&orders()).unwrap(), 1);
        assert_eq!(client.in_flight_count(&orders()).unwrap(), 2);
    }

    #[test]
    fn test_receive_from_empty_queue_returns_nothing() {
        let client = client_with_queue();

        let received = client.receive_messages(&orders(), 10).unwrap();

        assert!(received.is_empty());
    }

    #[test]
    fn test_released_messages_are_redelivered_in_send_order() {
        let client = client_with_queue();
        let first = client.send_message(&orders(), "one".into()).unwrap();
        let second = client.send_message(&orders(), "two".into()).unwrap();
        let third = client.send_message(&orders(), "three".into()).unwrap();
        let initial = client.receive_messages(&orders(), 2).unwrap();

        let released = client.release_in_flight(&orders()).unwrap();
        let redelivered = client.receive_messages(&orders(), 10).unwrap();

        assert_eq!(released, 2);
        let ids: Vec<_> = redelivered.iter().map(|m| m.message_id.clone()).collect();
        assert_eq!(ids, vec![first, second, third]);
        assert_eq!(redelivered[0].delivery_count, 2);
        assert_eq!(redelivered[2].delivery_count, 1);
        assert_ne!(redelivered[0].receipt_handle, initial[0].receipt_handle);
    }
}

// ============================================================================
// Delete Tests
// ============================================================================

mod delete {
    use super::*;

    #[tokio::test]
    async fn test_delete_in_flight_message() {
        let client = client_with_queue();
        client.send_message(&orders(), "one".into()).unwrap();
        let received = client.receive_messages(&orders(), 1).unwrap();

        let result = client
            .delete_message(&orders(), &received[0].receipt_handle)
            .await;

        assert!(result.is_ok());
        assert_eq!(client.in_flight_count(&orders()).unwrap(), 0);
        assert_eq!(client.release_in_flight(&orders()).unwrap(), 0);
        assert_eq!(client.visible_count(&orders()).unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_unknown_receipt_fails() {
        let client = client_with_queue();
        let receipt: ReceiptHandle = "never-issued".parse().unwrap();

        let result = client.delete_message(&orders(), &receipt).await;

        assert!(matches!(
            result,
            Err(QueueError::MessageNotFound { receipt }) if receipt == "never-issued"
        ));
    }

    #[tokio::test]
    async fn test_delete_with_stale_receipt_after_release_fails() {
        let client = client_with_queue();
        client.send_message(&orders(), "one".into()).unwrap();
        let stale = client.receive_messages(&orders(), 1).unwrap();
        client.release_in_flight(&orders()).unwrap();

        let result = client
            .delete_message(&orders(), &stale[0].receipt_handle)
            .await;

        assert!(matches!(result, Err(QueueError::MessageNotFound { .. })));
        assert_eq!(client.visible_count(&orders()).unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_on_unknown_queue_fails() {
        let client = InMemoryQueueClient::new();

        let result = client
            .delete_message(&orders(), &ReceiptHandle::generate())
            .await;

        assert!(matches!(result, Err(QueueError::QueueNotFound { .. })));
    }
}
