//! CLI entrypoint for the squad orchestrator
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod console;

use anyhow::{Context, Result};
use clap::Parser;
use console::Console;
use squad_application::{EventScope, OrchestrationEngine};
use squad_infrastructure::{
    ConfigLoader, ExpirySweeper, FixedWindowRateLimiter, InMemoryCredentialStore,
    TracingAuditSink,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "squad-orchestrator")]
#[command(about = "Consensus-driven shared context for human+AI squads")]
struct Cli {
    /// Path to a config file (overrides squad.toml discovery)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip config files and use built-in defaults
    #[arg(long)]
    no_config: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Echo every engine event to the log
    #[arg(long)]
    trace_events: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn,audit=info"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Load and validate configuration
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("failed to load configuration")?
    };
    config.validate().context("invalid configuration")?;

    info!(
        mode = %config.engine.consensus_mode,
        timeout = config.engine.commit_timeout_seconds,
        "starting squad orchestrator"
    );

    // === Dependency Injection ===
    let credentials = Arc::new(InMemoryCredentialStore::new());
    let audit = Arc::new(TracingAuditSink::new());
    let engine = Arc::new(
        OrchestrationEngine::new(credentials, audit).with_defaults(config.engine_defaults()),
    );

    if cli.trace_events {
        engine.hub().subscribe(
            EventScope::Global,
            Arc::new(|event| {
                tracing::event!(
                    Level::INFO,
                    kind = %event.kind,
                    squad_id = %event.squad_id,
                    data = %event.data,
                    "engine event"
                );
            }),
        );
    }

    // Background expiry sweep for no-objection proposals
    let sweeper = config
        .sweeper
        .enabled
        .then(|| ExpirySweeper::new(Duration::from_secs(config.sweeper.interval_seconds)));
    let sweep_handle = sweeper.as_ref().map(|s| s.spawn(Arc::clone(&engine)));

    let limiter = FixedWindowRateLimiter::new(
        config.limits.max_actions,
        Duration::from_secs(config.limits.window_seconds),
    );
    Console::new(Arc::clone(&engine), limiter).run().await?;

    if let Some(sweeper) = &sweeper {
        sweeper.stop();
    }
    if let Some(handle) = sweep_handle {
        handle.await?;
    }
    info!("shutting down");
    Ok(())
}
