// src/lib.rs

pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod controller;
pub mod engine;
pub mod errors;
pub mod fingerprint;
pub mod fs;
pub mod logging;
pub mod matcher;
pub mod server;
pub mod types;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{load_or_default, ConfigFile};
use crate::engine::{spawn_stdin_reader, EngineCore, PipelineEvent, Runtime, StdoutReplySink};
use crate::fs::RealFileSystem;
use crate::server::{EndpointRegistry, LiveReloadServerFactory};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (file + CLI overrides)
/// - one lifecycle controller per instance, sharing an endpoint registry
/// - the STDIN event reader and STDOUT reply sink
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let mut raw = load_or_default(args.config.as_deref())?;
    args.apply_overrides(&mut raw.bridge);
    let cfg = ConfigFile::try_from(raw)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let registry = Arc::new(EndpointRegistry::new());
    let core = EngineCore::from_config(
        &cfg,
        registry,
        Arc::new(LiveReloadServerFactory),
        Arc::new(RealFileSystem),
    )?;
    info!(instances = cfg.instances().len(), "livebridge configured");

    let (tx, rx) = mpsc::channel::<PipelineEvent>(64);

    let _reader = spawn_stdin_reader(tx.clone());

    // Ctrl-C → graceful shutdown.
    {
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            debug!("Ctrl-C received");
            let _ = tx.send(PipelineEvent::Shutdown).await;
        });
    }
    drop(tx);

    let runtime = Runtime::new(core, rx, StdoutReplySink::new());
    runtime.run().await?;
    Ok(())
}

/// Simple dry-run output: print every resolved instance.
fn print_dry_run(cfg: &ConfigFile) {
    println!("livebridge dry-run");
    println!();

    println!("instances ({}):", cfg.instances().len());
    for (name, instance) in cfg.instances() {
        println!("  - {name}");
        println!("      endpoint: {}", instance.endpoint);
        if let Some(ref rule) = instance.ignore {
            println!("      ignore: {} ({:?})", rule.pattern, rule.syntax);
        }
        println!("      quiet: {}", instance.quiet);
        println!(
            "      client library: {}",
            instance.bootstrap(None).script_url()
        );
        println!("      append_script_tag: {}", instance.append_script_tag);
    }
}
