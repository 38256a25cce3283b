// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("failed to fingerprint output file '{file}': {source}")]
    Fingerprint {
        file: String,
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("Unknown instance: {0}")]
    UnknownInstance(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failures reported by a notification transport.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("could not listen on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("transport error: {0}")]
    Transport(String),
}

impl ServerError {
    /// True when the endpoint address is already taken by another process.
    pub fn is_addr_in_use(&self) -> bool {
        matches!(
            self,
            ServerError::Bind { source, .. } if source.kind() == io::ErrorKind::AddrInUse
        )
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addr_in_use_is_classified_as_bind_conflict() {
        let err = ServerError::Bind {
            addr: "0.0.0.0:35729".to_string(),
            source: io::Error::from(io::ErrorKind::AddrInUse),
        };
        assert!(err.is_addr_in_use());

        let other = ServerError::Bind {
            addr: "0.0.0.0:80".to_string(),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert!(!other.is_addr_in_use());
        assert!(!ServerError::Transport("closed".into()).is_addr_in_use());
    }
}
