use super::Connection;
use crate::hub::Topic;
use tungstenite::protocol::Message as WsMessage;

#[test]
fn connections_get_distinct_ids() {
    let (a, _rx_a) = Connection::channel(Topic::new("post:1"), "alice");
    let (b, _rx_b) = Connection::channel(Topic::new("post:1"), "alice");
    assert_ne!(a.id(), b.id());
    assert_eq!(a.topic(), b.topic());
    assert_eq!(a.subscriber(), "alice");
}

#[test]
fn clones_share_identity_and_outbox() {
    let (conn, mut rx) = Connection::channel(Topic::new("post:1"), "alice");
    let copy = conn.clone();
    assert_eq!(conn.id(), copy.id());

    copy.deliver(WsMessage::text("hi")).unwrap();
    assert_eq!(rx.try_recv().unwrap(), WsMessage::text("hi"));
}

#[test]
fn deliver_fails_after_receiver_dropped() {
    let (conn, rx) = Connection::channel(Topic::new("post:1"), "alice");
    assert!(!conn.is_closed());
    drop(rx);
    assert!(conn.is_closed());
    assert!(conn.deliver(WsMessage::text("hi")).is_err());
}
