// tests/config_loading.rs

use std::io::Write;

use tempfile::NamedTempFile;

use livebridge::config::{load_and_validate, load_or_default, DEFAULT_INSTANCE};
use livebridge::errors::BridgeError;
use livebridge::types::{EndpointId, IgnoreRule};

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn bridge_only_config_yields_default_instance() {
    let file = write_config(
        r#"
[bridge]
port = 4000
ignore = '\.map$'
append_script_tag = true
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.instances().len(), 1);

    let instance = cfg.instance(DEFAULT_INSTANCE).unwrap();
    assert_eq!(instance.endpoint, EndpointId::new("0.0.0.0", 4000));
    assert_eq!(instance.ignore, Some(IgnoreRule::regex(r"\.map$")));
    assert!(instance.append_script_tag);
}

#[test]
fn instances_inherit_and_override_bridge_settings() {
    let file = write_config(
        r#"
[bridge]
hostname = "dev.local"
quiet = true

[instance.app]

[instance.admin]
port = 35730
ignore = "*.map"
ignore_syntax = "glob"
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.instances().len(), 2);
    assert!(cfg.instance(DEFAULT_INSTANCE).is_none());

    let app = cfg.instance("app").unwrap();
    assert_eq!(app.endpoint.port, 35729);
    assert_eq!(app.hostname, "dev.local");
    assert!(app.quiet);

    let admin = cfg.instance("admin").unwrap();
    assert_eq!(admin.endpoint.port, 35730);
    assert_eq!(admin.ignore, Some(IgnoreRule::glob("*.map")));
    assert_eq!(admin.hostname, "dev.local");
}

#[test]
fn invalid_ignore_pattern_is_a_config_error() {
    let file = write_config(
        r#"
[instance.app]
ignore = "(unclosed"
"#,
    );

    match load_and_validate(file.path()) {
        Err(BridgeError::ConfigError(msg)) => assert!(msg.contains("instance 'app'"), "{msg}"),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn malformed_toml_is_reported() {
    let file = write_config("[bridge\nport = 1");
    assert!(matches!(
        load_and_validate(file.path()),
        Err(BridgeError::TomlError(_))
    ));
}

#[test]
fn explicit_missing_path_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    assert!(matches!(
        load_or_default(Some(missing.as_path())),
        Err(BridgeError::IoError(_))
    ));
}
