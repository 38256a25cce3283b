// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::bootstrap::BootstrapConfig;
use crate::server::ServerOptions;
use crate::types::{EndpointId, IgnoreRule, IgnoreSyntax};

/// Port LiveReload clients connect to unless told otherwise.
pub const DEFAULT_PORT: u16 = 35729;

/// Name of the implicit instance used when no `[instance.<name>]` exists.
pub const DEFAULT_INSTANCE: &str = "default";

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [bridge]
/// port = 35729
/// ignore = '\.map$'
/// append_script_tag = true
///
/// [instance.admin]
/// port = 35730
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    /// Settings shared by every instance, from `[bridge]`.
    #[serde(default)]
    pub bridge: BridgeSection,

    /// Named engine instances from `[instance.<name>]`.
    ///
    /// Each field left unset falls back to `[bridge]`.
    #[serde(default)]
    pub instance: BTreeMap<String, InstanceSection>,
}

/// `[bridge]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeSection {
    #[serde(default = "default_port")]
    pub port: u16,

    /// Interface the notification server binds.
    ///
    /// Part of the endpoint sharing key together with `port`. Two instances
    /// on the same port but different hosts get separate servers, and
    /// whichever binds second usually fails with "address in use" and runs
    /// degraded. Give such instances the same host to share one server.
    #[serde(default = "default_listen_host")]
    pub listen_host: String,

    /// Output files whose name matches this pattern are never fingerprinted
    /// nor reported.
    #[serde(default)]
    pub ignore: Option<String>,

    #[serde(default)]
    pub ignore_syntax: IgnoreSyntax,

    /// Suppress the "listening on port" line.
    #[serde(default)]
    pub quiet: bool,

    /// Protocol browsers use to fetch the client library.
    #[serde(default = "default_protocol")]
    pub protocol: String,

    /// Host browsers use to fetch the client library.
    #[serde(default = "default_hostname")]
    pub hostname: String,

    /// Prepend the bootstrap snippet to generated output.
    #[serde(default)]
    pub append_script_tag: bool,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_listen_host() -> String {
    "0.0.0.0".to_string()
}

fn default_protocol() -> String {
    "http".to_string()
}

fn default_hostname() -> String {
    "localhost".to_string()
}

impl Default for BridgeSection {
    fn default() -> Self {
        Self {
            port: default_port(),
            listen_host: default_listen_host(),
            ignore: None,
            ignore_syntax: IgnoreSyntax::default(),
            quiet: false,
            protocol: default_protocol(),
            hostname: default_hostname(),
            append_script_tag: false,
        }
    }
}

/// `[instance.<name>]` section: per-instance overrides of `[bridge]`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstanceSection {
    #[serde(default)]
    pub port: Option<u16>,
    /// Overrides `[bridge].listen_host`; see there for how it affects sharing.
    #[serde(default)]
    pub listen_host: Option<String>,
    #[serde(default)]
    pub ignore: Option<String>,
    #[serde(default)]
    pub ignore_syntax: Option<IgnoreSyntax>,
    #[serde(default)]
    pub quiet: Option<bool>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub append_script_tag: Option<bool>,
}

impl InstanceSection {
    /// Layer this instance's overrides on top of `bridge`.
    pub fn resolve(&self, bridge: &BridgeSection) -> EngineConfig {
        let syntax = self.ignore_syntax.unwrap_or(bridge.ignore_syntax);
        let ignore = self.ignore.clone().or_else(|| bridge.ignore.clone());
        EngineConfig {
            endpoint: EndpointId::new(
                self.listen_host
                    .clone()
                    .unwrap_or_else(|| bridge.listen_host.clone()),
                self.port.unwrap_or(bridge.port),
            ),
            ignore: ignore.map(|pattern| IgnoreRule { pattern, syntax }),
            quiet: self.quiet.unwrap_or(bridge.quiet),
            protocol: self.protocol.clone().unwrap_or_else(|| bridge.protocol.clone()),
            hostname: self.hostname.clone().unwrap_or_else(|| bridge.hostname.clone()),
            append_script_tag: self.append_script_tag.unwrap_or(bridge.append_script_tag),
        }
    }
}

/// Immutable configuration of one lifecycle controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Where the notification server listens; also the sharing key.
    pub endpoint: EndpointId,
    pub ignore: Option<IgnoreRule>,
    pub quiet: bool,
    pub protocol: String,
    pub hostname: String,
    pub append_script_tag: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        InstanceSection::default().resolve(&BridgeSection::default())
    }
}

impl EngineConfig {
    pub fn server_options(&self) -> ServerOptions {
        ServerOptions {
            host: self.endpoint.host.clone(),
            ..ServerOptions::default()
        }
    }

    /// Bootstrap settings; `port` is the bound port when known.
    pub fn bootstrap(&self, port: Option<u16>) -> BootstrapConfig {
        BootstrapConfig {
            protocol: self.protocol.clone(),
            hostname: self.hostname.clone(),
            port: port.unwrap_or(self.endpoint.port),
        }
    }
}

/// Validated configuration: one resolved [`EngineConfig`] per instance.
///
/// Build it with `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    instances: BTreeMap<String, EngineConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(instances: BTreeMap<String, EngineConfig>) -> Self {
        Self { instances }
    }

    pub fn instances(&self) -> &BTreeMap<String, EngineConfig> {
        &self.instances
    }

    pub fn instance(&self, name: &str) -> Option<&EngineConfig> {
        self.instances.get(name)
    }
}
