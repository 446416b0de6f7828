// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod mail;
pub mod quarantine;
pub mod types;
pub mod watch;

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::ConfigFile;
use crate::engine::{EventClassifier, Runtime};
use crate::errors::Result;
use crate::fs::RealFileSystem;
use crate::mail::{Dispatcher, NotificationBatch, SmtpMailer};
use crate::types::local_hostname;
use crate::watch::{spawn_watcher, FsEvent, WatchRegistry, EVENT_CHANNEL_CAPACITY};

/// High-level entry point used by `main.rs`, after the config has been
/// loaded and validated.
///
/// This wires together:
/// - the watch registry
/// - the notification batch + dispatcher task (SMTP transport)
/// - the filesystem watcher feeding the bounded event channel
/// - Ctrl-C handling
/// - the event loop
pub async fn run(args: CliArgs, cfg: ConfigFile) -> Result<()> {
    let registry = Arc::new(WatchRegistry::from_config(&cfg)?);

    if args.dry_run {
        print_dry_run(&cfg, &registry);
        return Ok(());
    }

    let global = cfg.global();
    let hostname = local_hostname();
    debug!(%hostname, "resolved hostname");

    // Notification batch shared by the classifier (push) and dispatcher (drain).
    let batch = NotificationBatch::new();
    let transport = Arc::new(SmtpMailer::new(global.smtp_server.clone(), global.smtp_port));
    let dispatcher = Dispatcher::new(batch.clone(), transport, global.smtp_from.clone()).spawn();

    let (events_tx, events_rx) = mpsc::channel::<FsEvent>(EVENT_CHANNEL_CAPACITY);
    let _watcher_handle = spawn_watcher(&registry, events_tx)?;

    // Ctrl-C → leave the event loop.
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for Ctrl+C: {e}");
            return;
        }
        info!("received interrupt signal");
        let _ = shutdown_tx.send(());
    });

    let classifier = EventClassifier::new(
        Arc::clone(&registry),
        Arc::new(RealFileSystem),
        global.email.clone(),
        hostname,
    );

    let runtime = Runtime::new(classifier, batch, dispatcher, events_rx, shutdown_rx);
    runtime.run().await?;
    Ok(())
}

/// Simple dry-run output: print global settings and the compiled rules.
fn print_dry_run(cfg: &ConfigFile, registry: &WatchRegistry) {
    let global = cfg.global();
    println!("fscanary dry-run");
    println!("  email = {}", global.email);
    println!("  smtp  = {}:{} (from {})", global.smtp_server, global.smtp_port, global.smtp_from);
    println!("  logging = {}", global.logging);
    println!();

    println!("watches ({}):", registry.len());
    for rule in registry.rules() {
        println!("  - {}", rule.title());
        println!("      path: {:?}", rule.paths());
        println!("      pattern: {:?}", rule.include_patterns().collect::<Vec<_>>());
        if !rule.exclude_patterns().is_empty() {
            println!("      exclude: {:?}", rule.exclude_patterns());
        }
        println!("      notify: {}", rule.notify_enabled());
        if let Some(dest) = rule.quarantine_dest() {
            println!("      quarantine: {}", dest.display());
        }
    }

    debug!("dry-run complete (no watches installed)");
}
