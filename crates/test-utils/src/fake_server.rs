use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use livebridge::errors::ServerError;
use livebridge::server::{NotificationServer, ServerFactory, ServerOptions, SharedServer};

/// A notification server that:
/// - never opens a socket
/// - counts `listen` calls
/// - records every batch of changed files it was asked to push.
#[derive(Debug, Default)]
pub struct FakeServer {
    fail_bind: bool,
    bind_delay: Option<Duration>,
    listen_calls: AtomicUsize,
    bound: Mutex<Option<SocketAddr>>,
    notifications: Mutex<Vec<Vec<String>>>,
}

impl FakeServer {
    pub fn listen_calls(&self) -> usize {
        self.listen_calls.load(Ordering::SeqCst)
    }

    /// Every `notify_clients` call so far, oldest first.
    pub fn notifications(&self) -> Vec<Vec<String>> {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl NotificationServer for FakeServer {
    fn listen(
        &self,
        port: u16,
    ) -> Pin<Box<dyn Future<Output = Result<SocketAddr, ServerError>> + Send + '_>> {
        Box::pin(async move {
            self.listen_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.bind_delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail_bind {
                return Err(ServerError::Bind {
                    addr: format!("127.0.0.1:{port}"),
                    source: std::io::Error::from(std::io::ErrorKind::AddrInUse),
                });
            }
            let addr = SocketAddr::from(([127, 0, 0, 1], port));
            *self.bound.lock().unwrap_or_else(PoisonError::into_inner) = Some(addr);
            Ok(addr)
        })
    }

    fn notify_clients(&self, files: &[String]) {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(files.to_vec());
    }

    fn is_listening(&self) -> bool {
        self.local_addr().is_some()
    }

    fn local_addr(&self) -> Option<SocketAddr> {
        *self.bound.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Factory handing out `FakeServer`s and keeping them for inspection.
#[derive(Debug, Default)]
pub struct FakeServerFactory {
    fail_bind: bool,
    bind_delay: Option<Duration>,
    created: Mutex<Vec<Arc<FakeServer>>>,
}

impl FakeServerFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Servers created by this factory fail to bind with `AddrInUse`.
    pub fn failing() -> Self {
        Self {
            fail_bind: true,
            ..Self::default()
        }
    }

    /// Servers created by this factory take `delay` to bind.
    pub fn slow(delay: Duration) -> Self {
        Self {
            bind_delay: Some(delay),
            ..Self::default()
        }
    }

    /// Servers created so far, in creation order.
    pub fn created(&self) -> Vec<Arc<FakeServer>> {
        self.created
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn created_count(&self) -> usize {
        self.created().len()
    }
}

impl ServerFactory for FakeServerFactory {
    fn create(&self, _options: &ServerOptions) -> SharedServer {
        let server = Arc::new(FakeServer {
            fail_bind: self.fail_bind,
            bind_delay: self.bind_delay,
            ..FakeServer::default()
        });
        self.created
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::clone(&server));
        server
    }
}
