//! End-to-end: publisher → hub → WebSocket subscribers over real sockets.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tungstenite::protocol::Message as WsMessage;

use crate::auth::JwtVerifier;
use crate::hub::{Event, Hub, HubHandle, PostId, Topic};
use crate::publisher::{CommentChange, CommentPublisher};
use crate::transport::{comments_path, serve};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn start() -> (String, HubHandle, Arc<JwtVerifier>) {
    let hub = Hub::spawn(32);
    let verifier = Arc::new(JwtVerifier::new("integration"));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("ws://{}", listener.local_addr().unwrap());
    tokio::spawn(serve(
        listener,
        hub.clone(),
        verifier.clone(),
        Duration::from_secs(5),
    ));
    (base, hub, verifier)
}

async fn connect(base: &str, verifier: &JwtVerifier, user: &str, post: PostId) -> Client {
    let token = verifier.issue(user, chrono::Duration::minutes(5)).unwrap();
    let url = format!("{base}{}?token={token}", comments_path(post));
    connect_async(url).await.expect("client connect").0
}

async fn await_count(hub: &HubHandle, topic: &Topic, expected: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while hub.subscriber_count(topic).await.unwrap() != expected {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("subscriber count never settled");
}

async fn next_change(ws: &mut Client) -> CommentChange {
    let frame = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("timed out")
        .expect("stream ended")
        .expect("read failed");
    let WsMessage::Text(text) = frame else {
        panic!("Expected a text message, got {frame:?}");
    };
    let event: Event = serde_json::from_str(text.as_str()).unwrap();
    serde_json::from_value(event.data().clone()).unwrap()
}

#[tokio::test]
async fn integration_two_watchers_one_bystander() {
    let (base, hub, verifier) = start().await;
    let post_42 = PostId::new(42).unwrap();
    let post_43 = PostId::new(43).unwrap();

    let mut a = connect(&base, &verifier, "a", post_42).await;
    let mut b = connect(&base, &verifier, "b", post_42).await;
    let mut c = connect(&base, &verifier, "c", post_43).await;
    await_count(&hub, &Topic::for_post(post_42), 2).await;
    await_count(&hub, &Topic::for_post(post_43), 1).await;

    let publisher = CommentPublisher::new(hub.clone());
    let change = CommentChange::Deleted { comment_id: 7 };
    publisher.publish(post_42, &change).await.unwrap();

    assert_eq!(next_change(&mut a).await, change);
    assert_eq!(next_change(&mut b).await, change);

    // c only ever sees its own post's events
    let marker = CommentChange::Deleted { comment_id: 99 };
    publisher.publish(post_43, &marker).await.unwrap();
    assert_eq!(next_change(&mut c).await, marker);
}

#[tokio::test]
async fn integration_survivor_keeps_receiving_after_peer_leaves() {
    const STORM: u64 = 200;

    let (base, hub, verifier) = start().await;
    let post = PostId::new(9).unwrap();
    let topic = Topic::for_post(post);

    let leaving = connect(&base, &verifier, "leaving", post).await;
    let mut survivor = connect(&base, &verifier, "survivor", post).await;
    await_count(&hub, &topic, 2).await;

    let publisher = CommentPublisher::new(hub.clone());
    let storm = tokio::spawn(async move {
        for likes in 0..STORM {
            let change = CommentChange::Liked {
                comment_id: 1,
                user_id: "fan".to_string(),
                likes,
            };
            publisher.publish(post, &change).await.unwrap();
            tokio::task::yield_now().await;
        }
    });

    drop(leaving);
    storm.await.unwrap();

    for expected in 0..STORM {
        match next_change(&mut survivor).await {
            CommentChange::Liked { likes, .. } => assert_eq!(likes, expected),
            other => panic!("unexpected change {other:?}"),
        }
    }
    await_count(&hub, &topic, 1).await;
}
