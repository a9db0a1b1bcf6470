//! Tests for the crate-root API.

use super::*;
use std::sync::Arc;

#[test]
fn test_root_reexports_compose() {
    let client = InMemoryQueueClient::new();
    let session = Arc::new(ConsumerSession::new());
    let acknowledger = UnorderedAcknowledger::new(Arc::new(client), session);

    assert_eq!(acknowledger.unacknowledged_count(), 0);
}

#[tokio::test]
async fn test_acknowledge_through_in_memory_queue() {
    let queue: QueueUrl = "http://localhost:9324/000000000000/jobs".parse().unwrap();
    let client = InMemoryQueueClient::new();
    client.create_queue(&queue).unwrap();
    client.send_message(&queue, "job".into()).unwrap();

    let acknowledger =
        UnorderedAcknowledger::new(Arc::new(client.clone()), Arc::new(ConsumerSession::new()));
    let received = client.receive_messages(&queue, 1).unwrap();
    acknowledger.notify_message_received(&received[0]);

    acknowledger.acknowledge(&received[0]).await.unwrap();

    assert!(acknowledger.unacknowledged_messages().is_empty());
    assert_eq!(client.in_flight_count(&queue).unwrap(), 0);
}
