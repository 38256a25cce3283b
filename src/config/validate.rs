// src/config/validate.rs

use std::collections::BTreeMap;

use crate::config::model::{
    ConfigFile, EngineConfig, InstanceSection, RawConfigFile, DEFAULT_INSTANCE,
};
use crate::errors::{BridgeError, Result};
use crate::matcher::build_matcher;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = BridgeError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let mut instances = BTreeMap::new();

        if raw.instance.is_empty() {
            let cfg = InstanceSection::default().resolve(&raw.bridge);
            validate_engine_config(DEFAULT_INSTANCE, &cfg)?;
            instances.insert(DEFAULT_INSTANCE.to_string(), cfg);
        } else {
            for (name, section) in raw.instance.iter() {
                let cfg = section.resolve(&raw.bridge);
                validate_engine_config(name, &cfg)?;
                instances.insert(name.clone(), cfg);
            }
        }

        Ok(ConfigFile::new_unchecked(instances))
    }
}

/// Check one resolved instance config.
///
/// - `protocol`, `hostname` and `listen_host` are non-empty
/// - `protocol` contains no `:` or `/` (it is spliced into a URL)
/// - the `ignore` pattern compiles under its syntax
pub fn validate_engine_config(name: &str, cfg: &EngineConfig) -> Result<()> {
    if cfg.protocol.trim().is_empty() {
        return Err(BridgeError::ConfigError(format!(
            "instance '{name}': protocol must not be empty"
        )));
    }
    if cfg.protocol.contains(':') || cfg.protocol.contains('/') {
        return Err(BridgeError::ConfigError(format!(
            "instance '{name}': protocol should be a bare scheme like \"http\" (got {:?})",
            cfg.protocol
        )));
    }
    if cfg.hostname.trim().is_empty() {
        return Err(BridgeError::ConfigError(format!(
            "instance '{name}': hostname must not be empty"
        )));
    }
    if cfg.endpoint.host.trim().is_empty() {
        return Err(BridgeError::ConfigError(format!(
            "instance '{name}': listen_host must not be empty"
        )));
    }
    if let Some(rule) = &cfg.ignore {
        build_matcher(rule).map_err(|e| match e {
            BridgeError::ConfigError(msg) => {
                BridgeError::ConfigError(format!("instance '{name}': {msg}"))
            }
            other => other,
        })?;
    }
    Ok(())
}
