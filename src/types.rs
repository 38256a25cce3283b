use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Address a notification server listens on.
///
/// Used as the sharing key in the endpoint registry: every controller
/// configured with the same `EndpointId` talks to the same server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndpointId {
    pub host: String,
    pub port: u16,
}

impl EndpointId {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Pattern syntax used for the `ignore` rule.
///
/// - `Regex`: the pattern is searched anywhere in the output file name.
/// - `Glob`: the whole output file name must match the glob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IgnoreSyntax {
    Regex,
    Glob,
}

impl Default for IgnoreSyntax {
    fn default() -> Self {
        IgnoreSyntax::Regex
    }
}

impl FromStr for IgnoreSyntax {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "regex" => Ok(IgnoreSyntax::Regex),
            "glob" => Ok(IgnoreSyntax::Glob),
            other => Err(format!(
                "invalid ignore_syntax: {other} (expected \"regex\" or \"glob\")"
            )),
        }
    }
}

/// An ignore pattern together with the syntax it is written in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreRule {
    pub pattern: String,
    pub syntax: IgnoreSyntax,
}

impl IgnoreRule {
    pub fn regex(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            syntax: IgnoreSyntax::Regex,
        }
    }

    pub fn glob(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            syntax: IgnoreSyntax::Glob,
        }
    }
}
