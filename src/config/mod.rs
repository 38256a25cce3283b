// src/config/mod.rs

//! Configuration loading and validation for livebridge.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate and resolve per-instance engine configs (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_or_default};
pub use model::{
    BridgeSection, ConfigFile, EngineConfig, InstanceSection, RawConfigFile,
    DEFAULT_INSTANCE, DEFAULT_PORT,
};
