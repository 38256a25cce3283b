// src/matcher.rs

//! Ignore rules for build output.
//!
//! The controller only needs to ask "does this output file name match the
//! ignore rule?"; the concrete pattern syntax lives behind [`NameMatcher`].

use std::fmt;

use globset::{Glob, GlobMatcher as CompiledGlob};
use regex::Regex;

use crate::errors::{BridgeError, Result};
use crate::types::{IgnoreRule, IgnoreSyntax};

/// Predicate over output file names.
pub trait NameMatcher: Send + Sync + fmt::Debug {
    fn matches(&self, name: &str) -> bool;
}

/// Matches when the regex is found anywhere in the name.
#[derive(Debug, Clone)]
pub struct RegexMatcher {
    regex: Regex,
}

impl RegexMatcher {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| {
            BridgeError::ConfigError(format!("invalid ignore regex {pattern:?}: {e}"))
        })?;
        Ok(Self { regex })
    }
}

impl NameMatcher for RegexMatcher {
    fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

/// Matches when the whole name matches the glob.
#[derive(Clone)]
pub struct GlobMatcher {
    pattern: String,
    glob: CompiledGlob,
}

impl fmt::Debug for GlobMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobMatcher")
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

impl GlobMatcher {
    pub fn new(pattern: &str) -> Result<Self> {
        let glob = Glob::new(pattern).map_err(|e| {
            BridgeError::ConfigError(format!("invalid ignore glob {pattern:?}: {e}"))
        })?;
        Ok(Self {
            pattern: pattern.to_string(),
            glob: glob.compile_matcher(),
        })
    }
}

impl NameMatcher for GlobMatcher {
    fn matches(&self, name: &str) -> bool {
        self.glob.is_match(name)
    }
}

/// Compile an ignore rule into a matcher.
pub fn build_matcher(rule: &IgnoreRule) -> Result<Box<dyn NameMatcher>> {
    Ok(match rule.syntax {
        IgnoreSyntax::Regex => Box::new(RegexMatcher::new(&rule.pattern)?),
        IgnoreSyntax::Glob => Box::new(GlobMatcher::new(&rule.pattern)?),
    })
}
