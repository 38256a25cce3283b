use livebridge::config::{ConfigFile, EngineConfig, InstanceSection, RawConfigFile};
use livebridge::controller::BuildOutput;
use livebridge::fs::mock::MockFileSystem;
use livebridge::types::{EndpointId, IgnoreRule};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.bridge.port = port;
        self
    }

    pub fn listen_host(mut self, host: &str) -> Self {
        self.config.bridge.listen_host = host.to_string();
        self
    }

    pub fn quiet(mut self) -> Self {
        self.config.bridge.quiet = true;
        self
    }

    pub fn ignore(mut self, pattern: &str) -> Self {
        self.config.bridge.ignore = Some(pattern.to_string());
        self
    }

    pub fn with_instance(mut self, name: &str, section: InstanceSection) -> Self {
        self.config.instance.insert(name.to_string(), section);
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a single controller's `EngineConfig`.
///
/// Starts from the defaults but listens on loopback and stays quiet.
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    pub fn new(port: u16) -> Self {
        Self {
            config: EngineConfig {
                endpoint: EndpointId::new("127.0.0.1", port),
                quiet: true,
                ..EngineConfig::default()
            },
        }
    }

    pub fn host(mut self, host: &str) -> Self {
        self.config.endpoint.host = host.to_string();
        self
    }

    pub fn ignore(mut self, rule: IgnoreRule) -> Self {
        self.config.ignore = Some(rule);
        self
    }

    pub fn append_script_tag(mut self, val: bool) -> Self {
        self.config.append_script_tag = val;
        self
    }

    pub fn hostname(mut self, hostname: &str) -> Self {
        self.config.hostname = hostname.to_string();
        self
    }

    pub fn build(self) -> EngineConfig {
        self.config
    }
}

/// Builds a `BuildOutput` and writes its files into a `MockFileSystem`.
///
/// Every asset `name` lands at `dist/<name>`.
pub struct BuildOutputBuilder {
    fs: MockFileSystem,
    output: BuildOutput,
}

impl BuildOutputBuilder {
    pub fn new(fs: &MockFileSystem, id: &str) -> Self {
        Self {
            fs: fs.clone(),
            output: BuildOutput::new(id),
        }
    }

    /// Emit `name` with `content`.
    pub fn asset(mut self, name: &str, content: &str) -> Self {
        let path = format!("dist/{name}");
        self.fs.add_file(&path, content);
        self.output = self.output.with_asset(name, path);
        self
    }

    /// Report `name` as emitted without writing it.
    pub fn missing_asset(mut self, name: &str) -> Self {
        let path = format!("dist/{name}");
        self.fs.remove_file(&path);
        self.output = self.output.with_asset(name, path);
        self
    }

    pub fn build(self) -> BuildOutput {
        self.output
    }
}
