//! Server push socket.
//!
//! # Responsibilities
//! - Keep one websocket open to the server's push endpoint
//! - Parse text frames into [`ServerMessage`]s and hand them to the owner
//! - Reconnect on abnormal closes per [`ConnectionMachine`]
//! - Close with code 1000 when the owner asks
//!
//! The task owns the connection and its reconnect timer. Status is
//! published through a `watch` channel so callers can probe it any time.

use std::sync::Arc;

use futures_util::StreamExt;
use serde::Serialize;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use url::Url;

use crate::observability::metrics;
use crate::sync::error::SyncError;
use crate::sync::machine::{CloseKind, ConnectionMachine, ConnectionState, ReconnectPolicy};
use crate::sync::message::ServerMessage;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;
type Handler = Arc<dyn Fn(ServerMessage) + Send + Sync>;

/// Point-in-time view of the socket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocketStatus {
    pub state: ConnectionState,
    pub reconnect_attempts: u32,
    pub realtime_disabled: bool,
    pub url: String,
}

/// Derive the push URL: `http` becomes `ws`, `https` becomes `wss`, and
/// `socket_path` is appended to the base path.
pub fn socket_url(base: &Url, socket_path: &str) -> Result<Url, SyncError> {
    let scheme = match base.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => {
            return Err(SyncError::SocketUnavailable(format!(
                "unsupported scheme '{}'",
                other
            )))
        }
    };
    let rest = &base.as_str()[base.scheme().len()..];
    let joined = format!(
        "{}{}/{}",
        scheme,
        rest.trim_end_matches('/'),
        socket_path.trim_start_matches('/')
    );
    Url::parse(&joined).map_err(|e| SyncError::SocketUnavailable(format!("{}: {}", joined, e)))
}

/// Handle to the running socket task.
pub struct SocketChannel {
    status: watch::Receiver<SocketStatus>,
    close_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl SocketChannel {
    /// Start connecting to `url`. `handler` runs on the socket task for
    /// every well-formed frame.
    pub fn spawn<F>(url: Url, policy: ReconnectPolicy, handler: F) -> Self
    where
        F: Fn(ServerMessage) + Send + Sync + 'static,
    {
        let (status_tx, status) = watch::channel(SocketStatus {
            state: ConnectionState::Disconnected,
            reconnect_attempts: 0,
            realtime_disabled: false,
            url: url.to_string(),
        });
        let (close_tx, close_rx) = watch::channel(false);
        let task = tokio::spawn(run(url, policy, Arc::new(handler), status_tx, close_rx));

        Self {
            status,
            close_tx,
            task: Some(task),
        }
    }

    pub fn status(&self) -> SocketStatus {
        self.status.borrow().clone()
    }

    /// Receiver that observes every status change.
    pub fn watch_status(&self) -> watch::Receiver<SocketStatus> {
        self.status.clone()
    }

    /// Close intentionally and wait for the task to finish. Idempotent.
    pub async fn close(&mut self) {
        let _ = self.close_tx.send(true);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Socket task failed");
            }
        }
    }
}

impl std::fmt::Debug for SocketChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocketChannel")
            .field("status", &*self.status.borrow())
            .finish()
    }
}

fn publish(tx: &watch::Sender<SocketStatus>, machine: &ConnectionMachine, url: &Url) {
    tx.send_replace(SocketStatus {
        state: machine.state(),
        reconnect_attempts: machine.attempts(),
        realtime_disabled: machine.is_disabled(),
        url: url.to_string(),
    });
}

async fn run(
    url: Url,
    policy: ReconnectPolicy,
    handler: Handler,
    status_tx: watch::Sender<SocketStatus>,
    mut close_rx: watch::Receiver<bool>,
) {
    let mut machine = ConnectionMachine::new(policy);

    loop {
        if *close_rx.borrow() || !machine.connect() {
            break;
        }
        publish(&status_tx, &machine, &url);
        tracing::debug!(url = %url, attempt = machine.attempts(), "Socket connecting");

        let connected = tokio::select! {
            res = tokio_tungstenite::connect_async(url.as_str()) => res,
            _ = close_rx.changed() => {
                machine.stop();
                break;
            }
        };

        let kind = match connected {
            Ok((ws, _)) => {
                machine.opened();
                publish(&status_tx, &machine, &url);
                metrics::record_socket_connected(true);
                tracing::info!(url = %url, "Socket connected");

                let kind = session(ws, &handler, &mut close_rx).await;
                metrics::record_socket_connected(false);
                tracing::info!(url = %url, close = ?kind, "Socket disconnected");
                kind
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Socket connection failed");
                CloseKind::Abnormal
            }
        };

        let delay = machine.closed(kind);
        publish(&status_tx, &machine, &url);

        match delay {
            Some(delay) => {
                metrics::record_reconnect_scheduled();
                tracing::info!(
                    attempt = machine.attempts(),
                    delay_ms = delay.as_millis() as u64,
                    "Socket reconnect scheduled"
                );
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = close_rx.changed() => {
                        machine.stop();
                        break;
                    }
                }
            }
            None => {
                if machine.is_disabled() {
                    tracing::warn!(
                        max_attempts = policy.max_attempts,
                        "Socket reconnect budget exhausted, real-time updates disabled"
                    );
                }
                break;
            }
        }
    }

    publish(&status_tx, &machine, &url);
    tracing::debug!(url = %url, "Socket task exiting");
}

async fn session(
    mut ws: Socket,
    handler: &Handler,
    close_rx: &mut watch::Receiver<bool>,
) -> CloseKind {
    loop {
        tokio::select! {
            frame = ws.next() => match frame {
                Some(Ok(Message::Text(text))) => dispatch(text.as_str(), handler),
                Some(Ok(Message::Close(frame))) => {
                    let clean = frame
                        .as_ref()
                        .map(|f| f.code == CloseCode::Normal)
                        .unwrap_or(false);
                    return if clean { CloseKind::Clean } else { CloseKind::Abnormal };
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "Socket error");
                    return CloseKind::Abnormal;
                }
                None => return CloseKind::Abnormal,
            },
            _ = close_rx.changed() => {
                let frame = CloseFrame {
                    code: CloseCode::Normal,
                    reason: "Client disconnecting".into(),
                };
                if let Err(e) = ws.close(Some(frame)).await {
                    tracing::debug!(error = %e, "Socket close handshake failed");
                }
                return CloseKind::Intentional;
            }
        }
    }
}

fn dispatch(text: &str, handler: &Handler) {
    match ServerMessage::parse(text) {
        Ok(ServerMessage::Unknown(kind)) => {
            tracing::debug!(kind = %kind, "Ignoring socket message");
        }
        Ok(message) => {
            if let ServerMessage::Test { message: Some(body) } = &message {
                tracing::info!(message = %body, "Socket test message");
            }
            handler(message);
        }
        Err(e) => tracing::warn!(error = %e, frame = %text, "Dropping socket frame"),
    }
}
