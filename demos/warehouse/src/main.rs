//! warehouse — traffic arbitration demo for the ft fleet workspace.
//!
//! Runs a small robot fleet on a warehouse floor, handing out random pick
//! tasks and sending robots to charge when their battery runs low.  The
//! lane and intersection arbiter keeps them from colliding.
//!
//! ```text
//! warehouse [layout.json]
//! ```
//!
//! Without an argument the built-in floor from `network.rs` is used.  Logs go
//! to stderr and `logs/fleet_logs.txt`; CSV output to `output/warehouse/`.
//! Set `RUST_LOG` to change the log level (default `info`).

mod network;

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use ft_arbiter::{Severity, TrafficEvent};
use ft_core::{AgentId, AgentStatus, FleetConfig, FleetRng, NodeId, Tick};
use ft_fleet::{FleetBuilder, FleetObserver, FleetSim};
use ft_graph::{BfsRouter, NavGraph, load_nav_graph};
use ft_output::{CsvWriter, FleetOutputObserver, OutputWriter};
use ft_registry::FleetRegistry;

use network::build_warehouse;

// ── Constants ─────────────────────────────────────────────────────────────────

const ROBOT_COUNT:           usize = 5;
const SEED:                  u64   = 7;
const TOTAL_TICKS:           u64   = 120;
const TICK_DURATION_MS:      u32   = 1_000;
const OUTPUT_INTERVAL_TICKS: u64   = 10;
const DISPATCH_EVERY_TICKS:  u64   = 3;
const TASK_PROBABILITY:      f64   = 0.6;

const LOG_DIR:    &str = "logs";
const LOG_FILE:   &str = "fleet_logs.txt";
const OUTPUT_DIR: &str = "output/warehouse";

// ── Logging ───────────────────────────────────────────────────────────────────

/// Human-readable lines on stderr plus a copy in `logs/fleet_logs.txt`.
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// whole run.
fn setup_logging() -> Result<WorkerGuard> {
    std::fs::create_dir_all(LOG_DIR).context("creating log directory")?;
    let file_appender = tracing_appender::rolling::never(LOG_DIR, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
        .init();
    Ok(guard)
}

// ── Observer wrapper to count rows ───────────────────────────────────────────

struct CountingObserver<W: OutputWriter> {
    inner:         FleetOutputObserver<W>,
    events:        usize,
    warnings:      usize,
    snapshot_rows: usize,
    moves:         usize,
}

impl<W: OutputWriter> CountingObserver<W> {
    fn new(inner: FleetOutputObserver<W>) -> Self {
        Self { inner, events: 0, warnings: 0, snapshot_rows: 0, moves: 0 }
    }
}

impl<W: OutputWriter> FleetObserver for CountingObserver<W> {
    fn on_traffic_event(&mut self, tick: Tick, event: &TrafficEvent) {
        self.events += 1;
        if event.severity() == Severity::Warn {
            self.warnings += 1;
        }
        self.inner.on_traffic_event(tick, event);
    }

    fn on_tick_end(&mut self, tick: Tick, moved: usize) {
        self.moves += moved;
        self.inner.on_tick_end(tick, moved);
    }

    fn on_snapshot(&mut self, tick: Tick, registry: &FleetRegistry) {
        self.snapshot_rows += registry.active_count();
        self.inner.on_snapshot(tick, registry);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.inner.on_sim_end(final_tick);
    }
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

/// Send low-battery robots to charge, then give each remaining free robot a
/// random pick location with probability `TASK_PROBABILITY`.
fn dispatch(sim: &mut FleetSim<BfsRouter>, rng: &mut FleetRng) -> Result<usize> {
    let mut assigned = sim.check_battery_levels()?;

    let node_count = sim.graph.node_count() as u32;
    let free: Vec<AgentId> = sim
        .registry
        .ids()
        .filter(|&a| {
            matches!(
                sim.registry.status[a.index()],
                AgentStatus::Idle | AgentStatus::TaskComplete
            )
        })
        .collect();

    for agent in free {
        if sim.chargers.of(agent).is_some() {
            continue;
        }
        if !rng.gen_bool(TASK_PROBABILITY) {
            continue;
        }
        let destination = NodeId(rng.gen_range(0..node_count));
        if sim.assign_task(agent, destination)? {
            assigned += 1;
        }
    }
    Ok(assigned)
}

fn load_graph() -> Result<NavGraph> {
    match std::env::args().nth(1) {
        Some(path) => load_nav_graph(Path::new(&path))
            .with_context(|| format!("loading layout {path}")),
        None => Ok(build_warehouse().0),
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let _guard = setup_logging()?;

    println!("=== warehouse — fleet traffic arbitration ===");
    println!("Robots: {ROBOT_COUNT}  |  Ticks: {TOTAL_TICKS}  |  Seed: {SEED}");
    println!();

    // 1. Floor layout.
    let graph = load_graph()?;
    if graph.is_empty() {
        bail!("layout has no nodes");
    }
    println!(
        "Floor: {} nodes, {} lanes, {} intersections, {} chargers",
        graph.node_count(),
        graph.lane_count(),
        graph.intersections().len(),
        graph.chargers().len(),
    );

    // 2. One robot per non-charger node, in id order.
    let positions: Vec<NodeId> = (0..graph.node_count() as u32)
        .map(NodeId)
        .filter(|&n| !graph.is_charger(n))
        .take(ROBOT_COUNT)
        .collect();
    if positions.len() < ROBOT_COUNT {
        bail!("layout has room for only {} robots", positions.len());
    }

    // 3. Config.
    let config = FleetConfig {
        tick_duration_ms:      TICK_DURATION_MS,
        total_ticks:           TOTAL_TICKS,
        seed:                  SEED,
        output_interval_ticks: OUTPUT_INTERVAL_TICKS,
        ..FleetConfig::default()
    };

    // 4. Build the fleet.
    let mut sim = FleetBuilder::new(config.clone(), graph, BfsRouter)
        .initial_positions(positions)
        .build()?;
    let mut rng = FleetRng::new(config.seed);

    // 5. Output.
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let mut obs = CountingObserver::new(FleetOutputObserver::new(writer, &config));

    // 6. Run, dispatching new work every few ticks.
    let t0 = Instant::now();
    let mut tasks = 0;
    while sim.now() < config.end_tick() {
        if sim.now().0.is_multiple_of(DISPATCH_EVERY_TICKS) {
            tasks += dispatch(&mut sim, &mut rng)?;
        }
        sim.step(&mut obs);
    }
    obs.on_sim_end(sim.now());
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 7. Summary.
    println!("Run complete in {:.3} s", elapsed.as_secs_f64());
    println!("  tasks assigned       : {tasks}");
    println!("  lane traversals      : {}", obs.moves);
    println!("  traffic events       : {} ({} warnings)", obs.events, obs.warnings);
    println!("  agent_snapshots.csv  : {} rows", obs.snapshot_rows);
    println!();

    println!("{:<8} {:<14} {:<8} {:>8}", "Robot", "Status", "Node", "Battery");
    println!("{}", "-".repeat(41));
    for agent in sim.registry.ids() {
        let i = agent.index();
        println!(
            "{:<8} {:<14} {:<8} {:>7.1}%",
            agent.0,
            sim.registry.status[i].as_str(),
            sim.registry.location[i].0,
            sim.registry.battery[i],
        );
    }

    Ok(())
}
