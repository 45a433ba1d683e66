//! DriftMap Simulation Harness CLI
//!
//! Runs the full stack end to end: seeded synthetic agents walk around an
//! origin and report into an in-memory store, a `LocationService` broadcasts
//! live snapshots, and simulated subscribers consume them. Prints a run
//! summary and exits non-zero if any subscriber starved.

mod world;

use clap::Parser;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, Level};
use tracing_subscriber::FmtSubscriber;

use chrono::Utc;
use driftmap_feed::{FeedConfig, LocationService, MemoryStore};
use world::{SimWorld, WorldConfig};

/// DriftMap end-to-end simulation CLI
#[derive(Parser, Debug)]
#[command(name = "driftmap-sim")]
#[command(about = "Run the DriftMap feed against synthetic agents", long_about = None)]
struct Args {
    /// Master seed for determinism
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Number of walking agents
    #[arg(short, long, default_value = "6")]
    agents: usize,

    /// Number of live-feed subscribers
    #[arg(long, default_value = "3")]
    subscribers: usize,

    /// Run duration in seconds
    #[arg(short, long, default_value = "10")]
    duration: f64,

    /// Snapshot broadcast interval in seconds
    #[arg(long, default_value = "1")]
    interval: u64,

    /// World tick interval in milliseconds
    #[arg(long, default_value = "250")]
    step_ms: u64,

    /// Heatmap grid resolution (points per axis)
    #[arg(long, default_value = "60")]
    resolution: usize,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON output for CI parsing
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    if !args.json {
        info!("DriftMap simulation harness");
        info!(
            "seed={} agents={} subscribers={} duration={}s",
            args.seed, args.agents, args.subscribers, args.duration
        );
    }

    let store = Arc::new(MemoryStore::new());
    let config = FeedConfig {
        heatmap_resolution: args.resolution,
        update_interval_seconds: args.interval,
        ..FeedConfig::default()
    };
    let service = LocationService::new(store.clone(), config);

    // Attach subscribers before the world starts moving
    let mut subscriber_tasks = Vec::new();
    for _ in 0..args.subscribers {
        let mut feed = service.open_live_feed();
        subscriber_tasks.push(tokio::spawn(async move {
            let mut received = 0usize;
            while let Some(snapshot) = feed.recv().await {
                received += 1;
                debug!(
                    "subscriber {} snapshot #{}: {} samples, {} active",
                    feed.id(),
                    received,
                    snapshot.recent_samples.len(),
                    snapshot.active_agents.len()
                );
            }
            received
        }));
    }

    // Drive the world
    let world_config = WorldConfig {
        seed: args.seed,
        num_agents: args.agents,
        ..WorldConfig::default()
    };
    let mut world = SimWorld::new(world_config, store.clone());

    let started = Instant::now();
    let mut ticker = tokio::time::interval(Duration::from_millis(args.step_ms));
    while started.elapsed().as_secs_f64() < args.duration {
        ticker.tick().await;
        if let Err(e) = world.tick(Utc::now()) {
            error!("world tick failed: {e}");
        }
    }

    // Inspect the artifacts while everything is still live
    let heatmap = match service.get_heatmap().await {
        Ok(artifact) => artifact,
        Err(e) => {
            error!("heatmap query failed: {e}");
            std::process::exit(1);
        }
    };
    let active = service.get_active_agents().await.unwrap_or_default();
    let first_agent = match world.agent_ids().first() {
        Some(&id) => id,
        None => {
            error!("no agents in the world; nothing to trace");
            std::process::exit(1);
        }
    };
    let path = match service.get_agent_path(first_agent).await {
        Ok(path) => path,
        Err(e) => {
            error!("path query failed: {e}");
            std::process::exit(1);
        }
    };

    service.shutdown().await;

    let mut snapshot_counts = Vec::new();
    for task in subscriber_tasks {
        snapshot_counts.push(task.await.unwrap_or(0));
    }

    let peak_density = if heatmap.field.is_empty() {
        0.0
    } else {
        heatmap.field.values.max()
    };
    let starved = snapshot_counts.iter().any(|&c| c == 0);

    if args.json {
        let summary = serde_json::json!({
            "seed": args.seed,
            "samples_written": world.samples_written(),
            "distance_km": world.total_distance_km(),
            "heatmap_shape": heatmap.field.shape(),
            "peak_density": peak_density,
            "markers": heatmap.markers.len(),
            "active_agents": active.len(),
            "path_points": path.len(),
            "snapshots_per_subscriber": snapshot_counts,
            "passed": !starved,
        });
        println!("{}", serde_json::to_string_pretty(&summary).unwrap());
    } else {
        info!("");
        info!("Run summary");
        info!("  samples written:   {}", world.samples_written());
        info!("  distance walked:   {:.2} km", world.total_distance_km());
        info!(
            "  heatmap:           {:?} grid, peak density {:.3}, {} markers",
            heatmap.field.shape(),
            peak_density,
            heatmap.markers.len()
        );
        info!("  active agents:     {}", active.len());
        info!("  path[{}]:   {} points", first_agent, path.len());
        info!("  snapshots:         {:?}", snapshot_counts);

        if starved {
            error!("one or more subscribers never received a snapshot");
        } else {
            info!("all subscribers were fed");
        }
    }

    if starved {
        std::process::exit(1);
    }
}
