// tests/build_cycles.rs

mod common;
use crate::common::{
    controller_with, init_tracing, BuildOutputBuilder, EngineConfigBuilder, FakeServerFactory,
};

use std::sync::Arc;

use livebridge::errors::BridgeError;
use livebridge::fs::mock::MockFileSystem;
use livebridge::server::EndpointRegistry;
use livebridge::types::IgnoreRule;

#[tokio::test]
async fn only_changed_and_new_files_are_reported() {
    init_tracing();

    let registry = Arc::new(EndpointRegistry::new());
    let factory = Arc::new(FakeServerFactory::new());
    let fs = MockFileSystem::new();
    let mut ctrl = controller_with(
        EngineConfigBuilder::new(35740).build(),
        &registry,
        factory.clone(),
        &fs,
    );
    ctrl.on_watch_start().await;

    let first = BuildOutputBuilder::new(&fs, "1")
        .asset("a", "h1")
        .asset("b", "h2")
        .build();
    let report = ctrl.on_build_done(&first).unwrap();
    assert_eq!(report.changed, vec!["a", "b"]);

    let second = BuildOutputBuilder::new(&fs, "2")
        .asset("a", "h1")
        .asset("b", "h3")
        .asset("c", "h4")
        .build();
    let report = ctrl.on_build_done(&second).unwrap();
    assert_eq!(report.changed, vec!["b", "c"]);
    assert!(report.notified);

    let server = &factory.created()[0];
    assert_eq!(
        server.notifications(),
        vec![vec!["a".to_string(), "b".to_string()], vec!["b".to_string(), "c".to_string()]]
    );
}

#[tokio::test]
async fn removed_files_are_not_reported() {
    let registry = Arc::new(EndpointRegistry::new());
    let factory = Arc::new(FakeServerFactory::new());
    let fs = MockFileSystem::new();
    let mut ctrl = controller_with(
        EngineConfigBuilder::new(35741).build(),
        &registry,
        factory,
        &fs,
    );
    ctrl.on_watch_start().await;

    ctrl.on_build_done(
        &BuildOutputBuilder::new(&fs, "1")
            .asset("a", "x")
            .asset("b", "y")
            .build(),
    )
    .unwrap();

    let report = ctrl
        .on_build_done(&BuildOutputBuilder::new(&fs, "2").asset("a", "x").build())
        .unwrap();
    assert!(report.changed.is_empty());
    assert!(ctrl.fingerprints().get("b").is_none());
}

#[tokio::test]
async fn identical_rebuild_still_dispatches_an_empty_set() {
    let registry = Arc::new(EndpointRegistry::new());
    let factory = Arc::new(FakeServerFactory::new());
    let fs = MockFileSystem::new();
    let mut ctrl = controller_with(
        EngineConfigBuilder::new(35742).build(),
        &registry,
        factory.clone(),
        &fs,
    );
    ctrl.on_watch_start().await;

    let build = BuildOutputBuilder::new(&fs, "1").asset("a", "same").build();
    ctrl.on_build_done(&build).unwrap();
    let report = ctrl.on_build_done(&build).unwrap();

    assert!(report.changed.is_empty());
    assert!(report.notified);
    assert_eq!(factory.created()[0].notifications().len(), 2);
}

#[tokio::test]
async fn failed_build_makes_next_build_report_everything() {
    let registry = Arc::new(EndpointRegistry::new());
    let factory = Arc::new(FakeServerFactory::new());
    let fs = MockFileSystem::new();
    let mut ctrl = controller_with(
        EngineConfigBuilder::new(35743).build(),
        &registry,
        factory,
        &fs,
    );
    ctrl.on_watch_start().await;

    let build = BuildOutputBuilder::new(&fs, "1")
        .asset("a", "x")
        .asset("b", "y")
        .build();
    ctrl.on_build_done(&build).unwrap();

    ctrl.on_build_failed();
    ctrl.on_build_failed();

    let report = ctrl.on_build_done(&build).unwrap();
    assert_eq!(report.changed, vec!["a", "b"]);
}

#[tokio::test]
async fn ignored_names_never_appear_in_reports() {
    let registry = Arc::new(EndpointRegistry::new());
    let factory = Arc::new(FakeServerFactory::new());
    let fs = MockFileSystem::new();
    let mut ctrl = controller_with(
        EngineConfigBuilder::new(35744)
            .ignore(IgnoreRule::glob("*.map"))
            .build(),
        &registry,
        factory,
        &fs,
    );
    ctrl.on_watch_start().await;

    let first = BuildOutputBuilder::new(&fs, "1")
        .asset("main.js", "code")
        .asset("main.js.map", "v1")
        .build();
    assert_eq!(ctrl.on_build_done(&first).unwrap().changed, vec!["main.js"]);

    let second = BuildOutputBuilder::new(&fs, "2")
        .asset("main.js", "code")
        .asset("main.js.map", "v2")
        .build();
    assert!(ctrl.on_build_done(&second).unwrap().changed.is_empty());
}

#[tokio::test]
async fn missing_output_file_is_reported_as_fingerprint_error() {
    let registry = Arc::new(EndpointRegistry::new());
    let factory = Arc::new(FakeServerFactory::new());
    let fs = MockFileSystem::new();
    let mut ctrl = controller_with(
        EngineConfigBuilder::new(35745).build(),
        &registry,
        factory,
        &fs,
    );
    ctrl.on_watch_start().await;

    ctrl.on_build_done(&BuildOutputBuilder::new(&fs, "1").asset("a", "x").build())
        .unwrap();

    let broken = BuildOutputBuilder::new(&fs, "2")
        .asset("a", "x")
        .missing_asset("gone.js")
        .build();
    let err = ctrl.on_build_done(&broken).unwrap_err();
    assert!(matches!(err, BridgeError::Fingerprint { ref file, .. } if file == "gone.js"));
    assert!(ctrl.fingerprints().is_empty());
}
