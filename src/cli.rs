// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::BridgeSection;
use crate::types::IgnoreSyntax;

/// Command-line arguments for `livebridge`.
///
/// The bridge reads build lifecycle events as JSON lines on STDIN and
/// answers each one with a JSON line on STDOUT. Flags below override the
/// `[bridge]` section of the config file; `[instance.*]` values still win.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "livebridge",
    version,
    about = "Notify LiveReload browsers about changed build outputs.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Livebridge.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Port the notification server listens on.
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Output files whose name matches this pattern are not reported.
    #[arg(long, value_name = "PATTERN")]
    pub ignore: Option<String>,

    /// Syntax of `--ignore` (regex or glob).
    #[arg(long, value_name = "SYNTAX")]
    pub ignore_syntax: Option<IgnoreSyntax>,

    /// Do not print the "listening" line.
    #[arg(long)]
    pub quiet: bool,

    /// Prepend the bootstrap snippet to generated output.
    #[arg(long)]
    pub append_script_tag: bool,

    /// Protocol browsers use to fetch the client library.
    #[arg(long, value_name = "PROTOCOL")]
    pub protocol: Option<String>,

    /// Host browsers use to fetch the client library.
    #[arg(long, value_name = "HOST")]
    pub hostname: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `LIVEBRIDGE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the resolved instances, then exit.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// Apply flags that were given on top of a `[bridge]` section.
    pub fn apply_overrides(&self, bridge: &mut BridgeSection) {
        if let Some(port) = self.port {
            bridge.port = port;
        }
        if let Some(ref ignore) = self.ignore {
            bridge.ignore = Some(ignore.clone());
        }
        if let Some(syntax) = self.ignore_syntax {
            bridge.ignore_syntax = syntax;
        }
        if self.quiet {
            bridge.quiet = true;
        }
        if self.append_script_tag {
            bridge.append_script_tag = true;
        }
        if let Some(ref protocol) = self.protocol {
            bridge.protocol = protocol.clone();
        }
        if let Some(ref hostname) = self.hostname {
            bridge.hostname = hostname.clone();
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
