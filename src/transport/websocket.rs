//! WebSocket transport
//!
//! One task per accepted socket. Responsibilities:
//! - Admit or reject the handshake (`upgrade::admit`) before anything is
//!   registered
//! - Build the `Connection` and register it with the hub
//! - Forward the connection's outbox to the socket (writer task)
//! - Watch the socket for disconnection (reader task); inbound frames are
//!   not part of the protocol and are discarded
//! - When either side ends, unregister exactly once, then release the socket
//!
//! The reader and writer run as their own tasks so that a panic in either is
//! observed as a join error and still leads to the unregister.

use std::fmt::Display;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::SplitStream;
use futures_util::{Sink, SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinError;
use tokio_tungstenite::{WebSocketStream, accept_hdr_async};
use tracing::{debug, info, warn};
use tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tungstenite::protocol::Message as WsMessage;

use crate::auth::TokenVerifier;
use crate::connection::Connection;
use crate::hub::HubHandle;
use crate::transport::upgrade::{self, Admission};
use crate::utils::error::ServerError;

type WsSource = SplitStream<WebSocketStream<TcpStream>>;

/// How long the writer gets to send a close frame once the connection is
/// unregistered.
const CLOSE_GRACE: Duration = Duration::from_secs(5);

/// Back-off after a failed `accept`, e.g. when out of file descriptors.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Why a supervised connection ended.
#[derive(Debug)]
pub(crate) enum Disconnect {
    PeerClosed,
    Transport(String),
    /// The outbox closed; only happens after unregister.
    Released,
    Aborted(String),
}

impl Disconnect {
    fn from_join(result: Result<Disconnect, JoinError>) -> Self {
        result.unwrap_or_else(|e| Disconnect::Aborted(e.to_string()))
    }
}

/// Bind `addr` and serve upgrades until the process shuts down.
///
/// Failing to bind is the only error; everything after that is handled per
/// connection.
pub async fn start_websocket_server(
    addr: &str,
    hub: HubHandle,
    verifier: Arc<dyn TokenVerifier>,
    handshake_timeout: Duration,
) -> Result<(), ServerError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })?;

    info!("comment stream listening on ws://{addr}");
    serve(listener, hub, verifier, handshake_timeout).await;
    Ok(())
}

/// Accept connections on `listener` forever. Peers that have not completed
/// the upgrade within `handshake_timeout` are dropped.
pub async fn serve(
    listener: TcpListener,
    hub: HubHandle,
    verifier: Arc<dyn TokenVerifier>,
    handshake_timeout: Duration,
) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                tokio::spawn(handle_connection(
                    stream,
                    peer,
                    hub.clone(),
                    verifier.clone(),
                    handshake_timeout,
                ));
            }
            Err(e) => {
                warn!(error = %e, "accept failed");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
            }
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    hub: HubHandle,
    verifier: Arc<dyn TokenVerifier>,
    handshake_timeout: Duration,
) {
    let mut admission: Option<Admission> = None;
    let callback = |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
        match upgrade::admit(request.uri(), verifier.as_ref()) {
            Ok(admitted) => {
                admission = Some(admitted);
                Ok(response)
            }
            Err(rejection) => {
                warn!(
                    %peer,
                    path = request.uri().path(),
                    reason = %rejection,
                    "upgrade rejected"
                );
                Err(rejection.into_response())
            }
        }
    };

    let handshake = tokio::time::timeout(handshake_timeout, accept_hdr_async(stream, callback));
    let ws_stream = match handshake.await {
        Ok(Ok(ws)) => ws,
        Ok(Err(e)) => {
            debug!(%peer, error = %e, "websocket handshake failed");
            return;
        }
        Err(_) => {
            debug!(%peer, "websocket handshake timed out");
            return;
        }
    };
    let Some(admission) = admission else {
        return;
    };

    let (ws_sender, ws_receiver) = ws_stream.split();
    let (connection, inbox) = Connection::channel(admission.topic, admission.subscriber.id);
    let connection_id = connection.id();
    let topic = connection.topic().clone();

    hub.register(connection.clone()).await;
    info!(
        %connection_id,
        %topic,
        subscriber = connection.subscriber(),
        %peer,
        "subscriber connected"
    );

    let reason = supervise(
        &hub,
        connection,
        forward_events(inbox, ws_sender),
        watch_for_disconnect(ws_receiver),
    )
    .await;

    info!(%connection_id, %topic, ?reason, "subscriber disconnected");
}

/// Run a registered connection's writer and reader until either ends, then
/// unregister it exactly once and release the transport.
///
/// Both halves run as their own tasks, so a panic in either surfaces as
/// `Disconnect::Aborted` instead of skipping the unregister.
pub(crate) async fn supervise<W, R>(
    hub: &HubHandle,
    connection: Connection,
    writer: W,
    reader: R,
) -> Disconnect
where
    W: Future<Output = Disconnect> + Send + 'static,
    R: Future<Output = Disconnect> + Send + 'static,
{
    let mut writer = tokio::spawn(writer);
    let mut reader = tokio::spawn(reader);

    let (reason, writer_done) = tokio::select! {
        result = &mut reader => (Disconnect::from_join(result), false),
        result = &mut writer => (Disconnect::from_join(result), true),
    };

    hub.unregister(&connection).await;
    // once the hub drops its clone too, the outbox closes and the writer
    // sends a close frame and exits
    drop(connection);
    reader.abort();
    if !writer_done && tokio::time::timeout(CLOSE_GRACE, &mut writer).await.is_err() {
        writer.abort();
    }

    reason
}

/// Drain the outbox onto the socket until the outbox closes or a write fails.
pub(crate) async fn forward_events<S>(
    mut inbox: UnboundedReceiver<WsMessage>,
    mut sink: S,
) -> Disconnect
where
    S: Sink<WsMessage> + Unpin,
    S::Error: Display,
{
    while let Some(frame) = inbox.recv().await {
        if let Err(e) = sink.send(frame).await {
            return Disconnect::Transport(e.to_string());
        }
    }
    let _ = sink.close().await;
    Disconnect::Released
}

/// Block until the peer goes away.
async fn watch_for_disconnect(mut source: WsSource) -> Disconnect {
    while let Some(frame) = source.next().await {
        match frame {
            Ok(WsMessage::Close(_)) => return Disconnect::PeerClosed,
            Ok(_) => {}
            Err(e) => return Disconnect::Transport(e.to_string()),
        }
    }
    Disconnect::PeerClosed
}
