//! Connection session
//!
//! Runs one joined connection: a reader task that records and broadcasts
//! inbound messages, a writer task that drains the delivery queue onto the
//! socket, and the teardown that follows whichever side ends first.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::Message;
use campus_common::ChatConfig;
use campus_service::ChatEnvelope;
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use super::{Connection, ConnectionState, MessageRecorder};
use crate::handlers::{HandlerError, HandlerResult};
use crate::hub::{BroadcastEvent, HubHandle, RoomMember};
use crate::protocol::{close_frame, encode_envelope, CloseCode, InboundMessage};

/// Drives a single connection from join to close
pub struct ConnectionSession {
    connection: Arc<Connection>,
    hub: HubHandle,
    recorder: Arc<dyn MessageRecorder>,
    queue_capacity: usize,
    close_grace: Duration,
}

impl ConnectionSession {
    pub fn new(
        connection: Arc<Connection>,
        hub: HubHandle,
        recorder: Arc<dyn MessageRecorder>,
        config: &ChatConfig,
    ) -> Self {
        Self {
            connection,
            hub,
            recorder,
            queue_capacity: config.queue_capacity.max(1),
            close_grace: config.close_grace(),
        }
    }

    pub fn connection(&self) -> &Arc<Connection> {
        &self.connection
    }

    /// Run the connection until either side ends it
    ///
    /// Generic over the transport halves so it can be driven without a
    /// real socket.
    pub async fn run<Si, St, E>(self, sink: Si, stream: St)
    where
        Si: Sink<Message> + Unpin + Send + 'static,
        St: Stream<Item = Result<Message, E>> + Unpin + Send + 'static,
        E: Display + Send + 'static,
    {
        let conn = Arc::clone(&self.connection);
        let (queue_tx, queue_rx) = mpsc::channel::<Arc<ChatEnvelope>>(self.queue_capacity);
        let (evict_tx, mut evicted) = oneshot::channel();
        let member = RoomMember::new(
            conn.id(),
            conn.room_id(),
            conn.user_id(),
            queue_tx,
            evict_tx,
        );

        if let Err(e) = self.hub.join(member).await {
            warn!(connection_id = %conn.id(), error = %e, "Join failed");
            conn.advance(ConnectionState::Leaving);
            let mut sink = sink;
            let _ = sink.send(close_frame(CloseCode::UnknownError)).await;
            let _ = sink.close().await;
            conn.advance(ConnectionState::Closed);
            return;
        }
        conn.advance(ConnectionState::Joined);
        info!(
            connection_id = %conn.id(),
            user_id = %conn.user_id(),
            room_id = %conn.room_id(),
            "Connection joined"
        );

        let (close_tx, close_rx) = oneshot::channel();
        let mut writer = tokio::spawn(write_loop(sink, queue_rx, close_rx, Arc::clone(&conn)));
        let mut reader: JoinHandle<Option<CloseCode>> = tokio::spawn(read_loop(
            stream,
            Arc::clone(&conn),
            Arc::clone(&self.recorder),
            self.hub.clone(),
        ));

        let mut writer_done = false;
        let close_code = tokio::select! {
            result = &mut reader => result.unwrap_or(Some(CloseCode::UnknownError)),
            _ = &mut writer => {
                writer_done = true;
                debug!(connection_id = %conn.id(), "Writer ended");
                None
            }
            signal = &mut evicted => {
                if signal.is_ok() {
                    warn!(
                        connection_id = %conn.id(),
                        room_id = %conn.room_id(),
                        "Evicted from room"
                    );
                    Some(CloseCode::RateLimited)
                } else {
                    Some(CloseCode::UnknownError)
                }
            }
        };

        conn.advance(ConnectionState::Leaving);

        // The writer must hold the close code before leaving closes its queue
        match close_code {
            Some(code) if !writer_done => {
                let _ = close_tx.send(code);
            }
            _ => drop(close_tx),
        }
        self.hub.leave(conn.room_id(), conn.id()).await;
        reader.abort();

        if !writer_done && tokio::time::timeout(self.close_grace, &mut writer).await.is_err() {
            warn!(connection_id = %conn.id(), "Writer did not finish in time; aborting");
            writer.abort();
        }

        conn.advance(ConnectionState::Closed);
        info!(
            connection_id = %conn.id(),
            room_id = %conn.room_id(),
            close_code = ?close_code,
            connected_ms = conn.connected_for().as_millis(),
            "Connection closed"
        );
    }
}

/// Drain the delivery queue onto the socket
///
/// Stops when the queue closes, a write fails, or the session asks it to
/// close; whatever is already queued is flushed before the close frame.
async fn write_loop<Si>(
    mut sink: Si,
    mut queue: mpsc::Receiver<Arc<ChatEnvelope>>,
    mut close: oneshot::Receiver<CloseCode>,
    conn: Arc<Connection>,
) where
    Si: Sink<Message> + Unpin + Send,
{
    let code = loop {
        tokio::select! {
            biased;
            item = queue.recv() => match item {
                Some(envelope) => {
                    if !send_envelope(&mut sink, &envelope).await {
                        debug!(connection_id = %conn.id(), "Write failed");
                        break None;
                    }
                }
                // Dropped by the hub; the session still decides the close code
                None => break (&mut close).await.ok(),
            },
            code = &mut close => {
                while let Ok(envelope) = queue.try_recv() {
                    if !send_envelope(&mut sink, &envelope).await {
                        break;
                    }
                }
                break code.ok();
            }
        }
    };
    if let Some(code) = code {
        let _ = sink.send(close_frame(code)).await;
    }
    let _ = sink.close().await;
}

async fn send_envelope<Si>(sink: &mut Si, envelope: &ChatEnvelope) -> bool
where
    Si: Sink<Message> + Unpin,
{
    match encode_envelope(envelope) {
        Ok(frame) => sink.send(frame).await.is_ok(),
        Err(e) => {
            warn!(message_id = %envelope.id, error = %e, "Failed to encode envelope");
            true
        }
    }
}

/// Read frames until the client leaves or sends something undecodable
async fn read_loop<St, E>(
    mut stream: St,
    conn: Arc<Connection>,
    recorder: Arc<dyn MessageRecorder>,
    hub: HubHandle,
) -> Option<CloseCode>
where
    St: Stream<Item = Result<Message, E>> + Unpin + Send,
    E: Display,
{
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                if let Err(e) = handle_text(&text, &conn, recorder.as_ref(), &hub).await {
                    if let Some(code) = e.to_close_code() {
                        debug!(connection_id = %conn.id(), error = %e, "Closing connection");
                        return Some(code);
                    }
                    match &e {
                        HandlerError::Rejected(_) => {
                            debug!(connection_id = %conn.id(), error = %e, "Message dropped");
                        }
                        _ => warn!(connection_id = %conn.id(), error = %e, "Message not stored"),
                    }
                }
            }
            Ok(Message::Binary(_)) => {
                debug!(connection_id = %conn.id(), "Binary frames not supported");
                return Some(CloseCode::DecodeError);
            }
            Ok(Message::Ping(_) | Message::Pong(_)) => {
                trace!(connection_id = %conn.id(), "Ping/pong");
            }
            Ok(Message::Close(_)) => {
                debug!(connection_id = %conn.id(), "Client closed connection");
                return None;
            }
            Err(e) => {
                warn!(connection_id = %conn.id(), error = %e, "Transport error");
                return Some(CloseCode::UnknownError);
            }
        }
    }
    None
}

/// Record one inbound message, then broadcast the stored result
async fn handle_text(
    text: &str,
    conn: &Connection,
    recorder: &dyn MessageRecorder,
    hub: &HubHandle,
) -> HandlerResult<()> {
    let inbound =
        InboundMessage::from_json(text).map_err(|e| HandlerError::InvalidPayload(e.to_string()))?;

    let envelope = recorder
        .record(conn.room_id(), conn.identity(), inbound.into_request())
        .await
        .map_err(HandlerError::from_service)?;

    hub.broadcast(BroadcastEvent::new(conn.room_id(), envelope)).await;
    Ok(())
}
