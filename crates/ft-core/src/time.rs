//! Fleet time model and run configuration.
//!
//! Time is a monotonically increasing `Tick` counter.  One tick is one
//! movement step for every agent: an agent that is granted its lane crosses
//! it within the tick.  `FleetClock` maps ticks to elapsed wall time for
//! logging and output:
//!
//!   elapsed_ms = tick * tick_duration_ms

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute fleet tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── FleetClock ────────────────────────────────────────────────────────────────

/// Tracks the current tick and converts it to elapsed milliseconds.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FleetClock {
    /// How many real milliseconds one tick represents.
    pub tick_duration_ms: u32,
    /// The current tick — advanced by `FleetClock::advance()` each step.
    pub current_tick: Tick,
}

impl FleetClock {
    pub fn new(tick_duration_ms: u32) -> Self {
        Self {
            tick_duration_ms,
            current_tick: Tick::ZERO,
        }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Elapsed milliseconds since tick 0.
    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        self.current_tick.0 * self.tick_duration_ms as u64
    }

    /// Elapsed milliseconds at an arbitrary `tick`.
    #[inline]
    pub fn ms_at(&self, tick: Tick) -> u64 {
        tick.0 * self.tick_duration_ms as u64
    }
}

impl fmt::Display for FleetClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.elapsed_ms() / 1_000;
        write!(f, "{} ({}m{:02}s)", self.current_tick, secs / 60, secs % 60)
    }
}

// ── FleetConfig ───────────────────────────────────────────────────────────────

/// Top-level fleet run configuration.
///
/// Typically built from constants or a JSON file by the application crate and
/// handed to the fleet builder.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FleetConfig {
    /// Milliseconds per tick.  Only affects reporting.
    pub tick_duration_ms: u32,

    /// Total ticks to run with `FleetSim::run`.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical runs.
    pub seed: u64,

    /// Battery percentage consumed per lane traversal.
    pub battery_drain_per_move: f32,

    /// Battery percentage each spawned agent starts with.
    pub initial_battery: f32,

    /// Battery percentage gained per tick while docked at a charger.
    pub charge_per_tick: f32,

    /// At or below this battery percentage an idle agent is sent to charge
    /// by `FleetSim::check_battery_levels`.
    pub low_battery_threshold: f32,

    /// Waiting agents re-request their blocked lane every tick in addition to
    /// being woken by the arbiter.
    pub poll_waiting: bool,

    /// Emit a registry snapshot every N ticks.  0 disables snapshots.
    pub output_interval_ticks: u64,
}

impl FleetConfig {
    /// The tick at which `run` stops (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `FleetClock` pre-configured for this run.
    pub fn make_clock(&self) -> FleetClock {
        FleetClock::new(self.tick_duration_ms)
    }
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            tick_duration_ms:       1_000,
            total_ticks:            100,
            seed:                   42,
            battery_drain_per_move: 2.0,
            initial_battery:        100.0,
            charge_per_tick:        20.0,
            low_battery_threshold:  30.0,
            poll_waiting:           true,
            output_interval_ticks:  1,
        }
    }
}
