//! # npc_app
//!
//! Standalone binary that wires the clock, tick scheduler, spawn manager,
//! and respawn scheduler together against the in-memory reference world.
//! Template and spawn data are not read from disk (static ingestion is out
//! of scope); a small hardcoded demo population stands in for it.

mod demo;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use npc_spawn::{NpcKind, RespawnScheduler, SpawnManager};
use npc_world::{CancellationToken, Clock, InMemoryWorld, TickScheduler};

/// CLI for running the NPC simulation core standalone, for local demos and
/// manual smoke testing.
#[derive(Parser, Debug)]
#[command(name = "npc_app", about = "NPC simulation core demo runner")]
struct Cli {
    /// Scheduler tick rate, in Hz. Defaults to the usual 1 Hz cadence;
    /// overridable for faster local iteration.
    #[arg(long, default_value_t = 1.0)]
    tick_rate: f64,

    /// Log level passed to `tracing_subscriber`'s env filter (e.g. `info`,
    /// `debug`, `npc_ai=trace`).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Stop after this many ticks. `0` runs until interrupted.
    #[arg(long, default_value_t = 0)]
    max_ticks: u64,

    /// Enable gated debug logging on AI hot paths (intention transitions,
    /// etc.), on top of whatever `log_level` otherwise filters.
    #[arg(long, default_value_t = false)]
    ai_debug_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log_level)?)
        .init();

    info!(tick_rate = cli.tick_rate, max_ticks = cli.max_ticks, "npc_app starting");

    npc_interfaces::set_debug_enabled(cli.ai_debug_logs);

    let world = Arc::new(InMemoryWorld::new());
    let templates = Arc::new(demo::DemoTemplateRepository::new());
    let spawns = demo::DemoSpawnRepository::new();

    let scheduler = Arc::new(TickScheduler::new());
    let mut manager = SpawnManager::new(
        templates,
        world.clone(),
        world.clone(),
        scheduler.clone(),
    );
    manager.load_spawns(&spawns);
    manager.spawn_all(|template_id| demo::kind_for_template(template_id));

    info!(spawn_count = manager.spawn_count(), "spawns loaded, population primed");

    let respawn = Arc::new(RespawnScheduler::new());

    let period = Duration::from_secs_f64(1.0 / cli.tick_rate.max(0.001));
    let clock = Clock::new(period);
    let cancel = CancellationToken::new();

    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            ctrl_c_cancel.cancel();
        }
    });

    let mut ticks_run: u64 = 0;
    let max_ticks = cli.max_ticks;
    let tick_cancel = cancel.clone();
    clock
        .run(&cancel, || {
            scheduler.tick_all();
            respawn.drain_due(&manager);
            ticks_run += 1;
            if max_ticks > 0 && ticks_run >= max_ticks {
                tick_cancel.cancel();
            }
        })
        .await;

    info!(ticks_run, "npc_app shut down");
    Ok(())
}
