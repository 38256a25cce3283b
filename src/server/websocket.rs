// src/server/websocket.rs

//! WebSocket notification server speaking the LiveReload command protocol.
//!
//! Only the two commands browsers need are handled: the `hello` handshake
//! and `reload` pushes. Every accepted connection gets its own broadcast
//! receiver, so `notify_clients` never blocks on slow subscribers.
//!
//! The same listener answers a plain `GET /livereload.js` with the bundled
//! client library, which is what the bootstrap snippet loads.

use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::bootstrap::CLIENT_LIBRARY_PATH;
use crate::errors::ServerError;

use super::{NotificationServer, ServerFactory, ServerOptions, SharedServer};

/// Protocol version announced in the handshake.
pub const PROTOCOL_OFFICIAL_7: &str = "http://livereload.com/protocols/official-7";

const BROADCAST_CAPACITY: usize = 256;

/// Browser-side client served at `/livereload.js`.
pub const CLIENT_SCRIPT: &str = include_str!("livereload.js");

const MAX_REQUEST_LINE: usize = 2048;
const MAX_REQUEST_HEADERS: usize = 100;
const REQUEST_LINE_TIMEOUT: Duration = Duration::from_secs(5);

/// Messages exchanged with browser clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum ProtocolMessage {
    Hello {
        #[serde(default)]
        protocols: Vec<String>,
        #[serde(rename = "serverName", default, skip_serializing_if = "Option::is_none")]
        server_name: Option<String>,
    },
    Reload {
        path: String,
        #[serde(rename = "liveCSS")]
        live_css: bool,
    },
    /// Any command we do not act on (`info`, `url`, ...).
    #[serde(other)]
    Unknown,
}

impl ProtocolMessage {
    fn server_hello(server_name: &str) -> Self {
        ProtocolMessage::Hello {
            protocols: vec![PROTOCOL_OFFICIAL_7.to_string()],
            server_name: Some(server_name.to_string()),
        }
    }
}

/// Production [`NotificationServer`].
pub struct LiveReloadServer {
    options: ServerOptions,
    broadcaster: broadcast::Sender<ProtocolMessage>,
    local_addr: Mutex<Option<SocketAddr>>,
    accept_task: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for LiveReloadServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveReloadServer")
            .field("options", &self.options)
            .field("local_addr", &self.local_addr())
            .finish_non_exhaustive()
    }
}

impl LiveReloadServer {
    pub fn new(options: ServerOptions) -> Self {
        let (broadcaster, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            options,
            broadcaster,
            local_addr: Mutex::new(None),
            accept_task: Mutex::new(None),
        }
    }

    /// Number of currently connected subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.broadcaster.receiver_count()
    }
}

impl Drop for LiveReloadServer {
    fn drop(&mut self) {
        let task = self
            .accept_task
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            task.abort();
        }
    }
}

impl NotificationServer for LiveReloadServer {
    fn listen(
        &self,
        port: u16,
    ) -> Pin<Box<dyn Future<Output = Result<SocketAddr, ServerError>> + Send + '_>> {
        Box::pin(async move {
            if let Some(addr) = self.local_addr() {
                return Ok(addr);
            }

            let addr = format!("{}:{}", self.options.host, port);
            let listener = TcpListener::bind(&addr)
                .await
                .map_err(|source| ServerError::Bind {
                    addr: addr.clone(),
                    source,
                })?;
            let bound = listener
                .local_addr()
                .map_err(|source| ServerError::Bind { addr, source })?;

            let task = tokio::spawn(accept_loop(
                listener,
                self.broadcaster.clone(),
                self.options.server_name.clone(),
            ));

            *self.accept_task.lock().unwrap_or_else(PoisonError::into_inner) = Some(task);
            *self.local_addr.lock().unwrap_or_else(PoisonError::into_inner) = Some(bound);

            debug!(%bound, "notification server bound");
            Ok(bound)
        })
    }

    fn notify_clients(&self, files: &[String]) {
        let subscribers = self.broadcaster.receiver_count();
        for file in files {
            // No receivers is not an error: nobody has a page open yet.
            let _ = self.broadcaster.send(ProtocolMessage::Reload {
                path: file.clone(),
                live_css: true,
            });
        }
        info!(files = ?files, subscribers, "notified live-reload clients");
    }

    fn is_listening(&self) -> bool {
        self.local_addr().is_some()
    }

    fn local_addr(&self) -> Option<SocketAddr> {
        *self.local_addr.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Builds [`LiveReloadServer`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveReloadServerFactory;

impl ServerFactory for LiveReloadServerFactory {
    fn create(&self, options: &ServerOptions) -> SharedServer {
        Arc::new(LiveReloadServer::new(options.clone()))
    }
}

async fn accept_loop(
    listener: TcpListener,
    broadcaster: broadcast::Sender<ProtocolMessage>,
    server_name: String,
) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                // Subscribe before the handshake so no reload sent after the
                // client's hello can be missed.
                let rx = broadcaster.subscribe();
                let server_name = server_name.clone();
                tokio::spawn(async move {
                    let served = match route_request(&stream).await {
                        Ok(Route::ClientScript) => {
                            debug!(%peer, "serving live-reload client library");
                            serve_client_script(stream).await
                        }
                        Ok(Route::Upgrade) => {
                            debug!(%peer, "live-reload client connected");
                            serve_client(stream, rx, &server_name).await
                        }
                        Err(err) => Err(err),
                    };
                    match served {
                        Ok(()) => debug!(%peer, "live-reload client disconnected"),
                        Err(err) => debug!(%peer, error = %err, "live-reload client dropped"),
                    }
                });
            }
            Err(err) => {
                warn!(error = %err, "failed to accept live-reload client");
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        }
    }
}

/// What an accepted connection asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    ClientScript,
    Upgrade,
}

/// Classify a request by its request line.
///
/// Anything other than `GET /livereload.js` goes to the websocket handshake.
fn route_for_request_line(line: &str) -> Route {
    let mut parts = line.split_whitespace();
    let method = parts.next().unwrap_or_default();
    let target = parts.next().unwrap_or_default();
    let path = target.split('?').next().unwrap_or_default();

    if method == "GET" && path.strip_prefix('/') == Some(CLIENT_LIBRARY_PATH) {
        Route::ClientScript
    } else {
        Route::Upgrade
    }
}

/// Peek at the request line without consuming it, so the websocket
/// handshake still sees the full request.
async fn route_request(stream: &TcpStream) -> Result<Route> {
    tokio::time::timeout(REQUEST_LINE_TIMEOUT, peek_request_line(stream))
        .await
        .context("timed out waiting for request line")?
}

async fn peek_request_line(stream: &TcpStream) -> Result<Route> {
    let mut buf = [0u8; MAX_REQUEST_LINE];
    loop {
        let n = stream.peek(&mut buf).await?;
        if n == 0 {
            bail!("connection closed before request line");
        }
        if let Some(end) = buf[..n].windows(2).position(|w| w == b"\r\n") {
            let line = String::from_utf8_lossy(&buf[..end]);
            return Ok(route_for_request_line(&line));
        }
        if n == buf.len() {
            return Ok(Route::Upgrade);
        }
        // Only part of the request line has arrived.
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

async fn serve_client_script(stream: TcpStream) -> Result<()> {
    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    for _ in 0..=MAX_REQUEST_HEADERS {
        line.clear();
        let n = reader.read_line(&mut line).await?;
        if n == 0 || line.trim_end().is_empty() {
            break;
        }
    }

    let mut stream = reader.into_inner();
    let head = format!(
        "HTTP/1.1 200 OK\r\n\
         Content-Type: application/javascript; charset=utf-8\r\n\
         Content-Length: {}\r\n\
         Cache-Control: no-cache\r\n\
         Connection: close\r\n\r\n",
        CLIENT_SCRIPT.len()
    );
    stream.write_all(head.as_bytes()).await?;
    stream.write_all(CLIENT_SCRIPT.as_bytes()).await?;
    stream.shutdown().await?;
    Ok(())
}

async fn serve_client(
    stream: TcpStream,
    mut rx: broadcast::Receiver<ProtocolMessage>,
    server_name: &str,
) -> Result<()> {
    let ws = tokio_tungstenite::accept_async(stream)
        .await
        .context("websocket handshake")?;
    let (mut sink, mut source) = ws.split();

    loop {
        tokio::select! {
            incoming = source.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    if let Ok(ProtocolMessage::Hello { .. }) = serde_json::from_str::<ProtocolMessage>(&text) {
                        let hello = serde_json::to_string(&ProtocolMessage::server_hello(server_name))?;
                        sink.send(Message::text(hello)).await?;
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err.into()),
            },
            outgoing = rx.recv() => match outgoing {
                Ok(message) => {
                    sink.send(Message::text(serde_json::to_string(&message)?)).await?;
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "live-reload client lagging; dropped notifications");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    Ok(())
}
