// tests/websocket_reload.rs

mod common;
use crate::common::{
    controller_with, init_tracing, with_timeout, BuildOutputBuilder, EngineConfigBuilder,
};

use std::sync::Arc;

use futures_util::{SinkExt, Stream, StreamExt};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use livebridge::controller::StartOutcome;
use livebridge::fs::mock::MockFileSystem;
use livebridge::server::{EndpointRegistry, LiveReloadServerFactory};

async fn next_json<S>(stream: &mut S) -> serde_json::Value
where
    S: Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        match stream.next().await {
            Some(Ok(Message::Text(text))) => return serde_json::from_str(&text).unwrap(),
            Some(Ok(_)) => continue,
            other => panic!("websocket closed unexpectedly: {other:?}"),
        }
    }
}

#[tokio::test]
async fn browser_client_receives_reload_for_changed_files() {
    init_tracing();

    let registry = Arc::new(EndpointRegistry::new());
    let fs = MockFileSystem::new();
    // Port 0: let the OS pick a free port.
    let mut ctrl = controller_with(
        EngineConfigBuilder::new(0).append_script_tag(true).build(),
        &registry,
        Arc::new(LiveReloadServerFactory),
        &fs,
    );

    let addr = match ctrl.on_watch_start().await {
        StartOutcome::Listening { addr } => addr,
        other => panic!("expected listening start, got {other:?}"),
    };
    assert_ne!(addr.port(), 0);

    // The bootstrap snippet points at the port actually bound.
    let snippet = ctrl.startup_hook("");
    assert!(snippet.contains(&format!("http://localhost:{}/livereload.js", addr.port())));

    let url = format!("ws://127.0.0.1:{}/livereload", addr.port());
    let (ws, _) = with_timeout(connect_async(url.as_str())).await.unwrap();
    let (mut tx, mut rx) = ws.split();

    tx.send(Message::text(
        r#"{"command":"hello","protocols":["http://livereload.com/protocols/official-7"]}"#,
    ))
    .await
    .unwrap();
    let hello = with_timeout(next_json(&mut rx)).await;
    assert_eq!(hello["command"], "hello");
    assert_eq!(hello["serverName"], "livebridge");

    ctrl.on_build_done(
        &BuildOutputBuilder::new(&fs, "1")
            .asset("app.css", "body{}")
            .asset("main.js", "main()")
            .build(),
    )
    .unwrap();

    let first = with_timeout(next_json(&mut rx)).await;
    let second = with_timeout(next_json(&mut rx)).await;
    assert_eq!(
        first,
        serde_json::json!({"command": "reload", "path": "app.css", "liveCSS": true})
    );
    assert_eq!(second["path"], "main.js");
}
