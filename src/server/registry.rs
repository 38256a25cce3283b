// src/server/registry.rs

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OnceCell;
use tracing::debug;

use crate::types::EndpointId;

use super::{ServerFactory, ServerOptions, SharedServer};

/// Outcome of the single bind attempt made for an endpoint.
///
/// `Err` holds the rendered bind error, for controllers that joined the
/// endpoint rather than binding it themselves.
pub type StartResult = std::result::Result<SocketAddr, String>;

/// Start state shared by every holder of one endpoint.
///
/// The first caller of `get_or_init` binds; callers arriving while that
/// bind is in flight wait for its result instead of observing a
/// half-started server.
pub type StartCell = Arc<OnceCell<StartResult>>;

/// Result of [`EndpointRegistry::acquire`].
#[derive(Debug, Clone)]
pub struct Acquired {
    pub server: SharedServer,
    /// True when this call constructed the server.
    pub created: bool,
    pub start: StartCell,
}

#[derive(Debug, Clone)]
struct Entry {
    server: SharedServer,
    start: StartCell,
}

/// Process-wide table of endpoint -> notification server.
///
/// Construct one per process (or per test) and share it by `Arc` with every
/// lifecycle controller. Entries live as long as the registry.
#[derive(Debug, Default)]
pub struct EndpointRegistry {
    endpoints: Mutex<HashMap<EndpointId, Entry>>,
}

impl EndpointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the server for `id`, creating it with `factory` if absent.
    ///
    /// Performs no network operation. Lookup and insert happen under one
    /// lock, so concurrent callers never create two servers for one id.
    pub fn acquire(
        &self,
        id: &EndpointId,
        factory: &dyn ServerFactory,
        options: &ServerOptions,
    ) -> Acquired {
        let mut endpoints = self.endpoints.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(entry) = endpoints.get(id) {
            debug!(endpoint = %id, "reusing registered notification server");
            return Acquired {
                server: entry.server.clone(),
                created: false,
                start: Arc::clone(&entry.start),
            };
        }

        let entry = Entry {
            server: factory.create(options),
            start: Arc::new(OnceCell::new()),
        };
        endpoints.insert(id.clone(), entry.clone());
        debug!(endpoint = %id, "registered new notification server");

        Acquired {
            server: entry.server,
            created: true,
            start: entry.start,
        }
    }

    pub fn get(&self, id: &EndpointId) -> Option<SharedServer> {
        let endpoints = self.endpoints.lock().unwrap_or_else(PoisonError::into_inner);
        endpoints.get(id).map(|entry| entry.server.clone())
    }

    pub fn len(&self) -> usize {
        let endpoints = self.endpoints.lock().unwrap_or_else(PoisonError::into_inner);
        endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
