//! Fleet observer trait for progress reporting and data collection.

use ft_arbiter::TrafficEvent;
use ft_core::Tick;
use ft_registry::FleetRegistry;

/// Callbacks invoked by [`FleetSim::step`][crate::FleetSim::step] at key
/// points in the tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — conflict counter
///
/// ```rust,ignore
/// struct Conflicts(usize);
///
/// impl FleetObserver for Conflicts {
///     fn on_traffic_event(&mut self, _tick: Tick, event: &TrafficEvent) {
///         if event.severity() == Severity::Warn {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait FleetObserver {
    /// Called at the very start of each tick, before any agent moves.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once per arbitration event produced during the tick, in the
    /// order the arbiter recorded them.
    fn on_traffic_event(&mut self, _tick: Tick, _event: &TrafficEvent) {}

    /// Called at the end of each tick.
    ///
    /// `moved` is the number of agents that traversed a lane this tick.
    fn on_tick_end(&mut self, _tick: Tick, _moved: usize) {}

    /// Called at snapshot intervals (every `config.output_interval_ticks`
    /// ticks) with read-only access to the whole registry.
    fn on_snapshot(&mut self, _tick: Tick, _registry: &FleetRegistry) {}

    /// Called once after the final tick of [`FleetSim::run`][crate::FleetSim::run].
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`FleetObserver`] that does nothing.
pub struct NoopObserver;

impl FleetObserver for NoopObserver {}
