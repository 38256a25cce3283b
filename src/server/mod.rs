// src/server/mod.rs

//! Notification transport seam.
//!
//! The lifecycle controller never talks to sockets directly. It asks a
//! [`ServerFactory`] for a [`NotificationServer`] (through the
//! [`registry::EndpointRegistry`], so instances on the same address share
//! one server), tells it to listen once, and afterwards only calls
//! [`NotificationServer::notify_clients`].
//!
//! - [`websocket`] is the transport used in production.
//! - Tests provide their own implementation that records notifications
//!   instead of opening sockets.

use std::fmt;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;

use crate::errors::ServerError;

pub mod registry;
pub mod websocket;

pub use registry::{Acquired, EndpointRegistry, StartCell, StartResult};
pub use websocket::{LiveReloadServer, LiveReloadServerFactory};

/// Shared handle to a running (or failed-to-start) notification server.
pub type SharedServer = Arc<dyn NotificationServer>;

/// Options handed to a [`ServerFactory`] when an endpoint is first created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerOptions {
    /// Interface to bind, e.g. `0.0.0.0`.
    pub host: String,
    /// Name announced to clients during the handshake.
    pub server_name: String,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            server_name: env!("CARGO_PKG_NAME").to_string(),
        }
    }
}

/// A server that browsers subscribe to for change notifications.
pub trait NotificationServer: Send + Sync + fmt::Debug {
    /// Bind to `port` and start accepting subscribers.
    ///
    /// Resolves to the bound address. Errors raised after a successful bind
    /// (accept failures, broken connections) are handled inside the server.
    fn listen(
        &self,
        port: u16,
    ) -> Pin<Box<dyn Future<Output = Result<SocketAddr, ServerError>> + Send + '_>>;

    /// Push the names of changed files to every subscriber.
    fn notify_clients(&self, files: &[String]);

    /// Whether `listen` has succeeded.
    fn is_listening(&self) -> bool;

    /// Bound address, once listening.
    fn local_addr(&self) -> Option<SocketAddr>;
}

/// Constructs notification servers for the registry.
pub trait ServerFactory: Send + Sync {
    fn create(&self, options: &ServerOptions) -> SharedServer;
}
