// src/controller/build.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Description of one finished build, as reported by the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOutput {
    /// Build identifier (e.g. the compilation hash).
    #[serde(default)]
    pub id: String,

    /// Emitted output files keyed by output name.
    #[serde(default)]
    pub assets: BTreeMap<String, Asset>,

    /// Identifiers of child builds, if the pipeline nests them.
    #[serde(default)]
    pub children: Vec<String>,
}

/// Where an emitted output file was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub exists_at: PathBuf,
}

impl BuildOutput {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Add an output file written to `path`.
    pub fn with_asset(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.assets.insert(
            name.into(),
            Asset {
                exists_at: path.into(),
            },
        );
        self
    }
}

/// What a build-done step did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub build_id: String,
    /// Output files whose content changed since the last successful build,
    /// in name order.
    pub changed: Vec<String>,
    /// Whether the changed set was dispatched to a live endpoint.
    pub notified: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_pipeline_shape() {
        let build: BuildOutput = serde_json::from_str(
            r#"{
                "id": "a1b2",
                "assets": {
                    "main.js": {"existsAt": "/tmp/dist/main.js"},
                    "main.js.map": {"existsAt": "/tmp/dist/main.js.map"}
                },
                "children": ["c3"]
            }"#,
        )
        .unwrap();

        assert_eq!(build.id, "a1b2");
        assert_eq!(build.children, vec!["c3"]);
        assert_eq!(
            build.assets["main.js"].exists_at,
            PathBuf::from("/tmp/dist/main.js")
        );
        assert_eq!(
            build,
            BuildOutput {
                children: vec!["c3".to_string()],
                ..BuildOutput::new("a1b2")
                    .with_asset("main.js", "/tmp/dist/main.js")
                    .with_asset("main.js.map", "/tmp/dist/main.js.map")
            }
        );
    }

    #[test]
    fn missing_fields_default() {
        let build: BuildOutput = serde_json::from_str("{}").unwrap();
        assert_eq!(build, BuildOutput::default());
    }
}
