//! Fluent builder for constructing a [`FleetSim`].

use ft_arbiter::{ArbiterConfig, TrafficArbiter};
use ft_core::{FleetConfig, NodeId};
use ft_graph::{NavGraph, Router};
use ft_registry::FleetRegistry;

use crate::{ChargerReservations, FleetError, FleetResult, FleetSim};

/// Fluent builder for [`FleetSim<R>`].
///
/// # Required inputs
///
/// - [`FleetConfig`] — total ticks, battery model, polling, …
/// - [`NavGraph`] — the shared topology
/// - `R: Router` — the path planner (e.g. [`ft_graph::BfsRouter`])
///
/// # Optional inputs (have defaults)
///
/// | Method                   | Default                    |
/// |--------------------------|----------------------------|
/// | `.arbiter_config(c)`     | `ArbiterConfig::default()` |
/// | `.initial_positions(v)`  | No agents                  |
/// | `.initial_battery(v)`    | `config.initial_battery`   |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = FleetBuilder::new(config, graph, BfsRouter)
///     .initial_positions(vec![NodeId(0), NodeId(5)])
///     .build()?;
/// sim.run(&mut NoopObserver);
/// ```
pub struct FleetBuilder<R: Router> {
    config:    FleetConfig,
    graph:     NavGraph,
    router:    R,
    arbiter:   ArbiterConfig,
    positions: Vec<NodeId>,
    battery:   Option<Vec<f32>>,
}

impl<R: Router> FleetBuilder<R> {
    pub fn new(config: FleetConfig, graph: NavGraph, router: R) -> Self {
        Self {
            config,
            graph,
            router,
            arbiter:   ArbiterConfig::default(),
            positions: Vec::new(),
            battery:   None,
        }
    }

    pub fn arbiter_config(mut self, config: ArbiterConfig) -> Self {
        self.arbiter = config;
        self
    }

    /// One agent is spawned per entry, in order, so agent `i` starts at
    /// `positions[i]`.
    pub fn initial_positions(mut self, positions: Vec<NodeId>) -> Self {
        self.positions = positions;
        self
    }

    /// Per-agent starting battery (must match `initial_positions` length).
    pub fn initial_battery(mut self, battery: Vec<f32>) -> Self {
        self.battery = Some(battery);
        self
    }

    /// Validate inputs, spawn the initial agents, and return a ready-to-run
    /// [`FleetSim`].
    pub fn build(self) -> FleetResult<FleetSim<R>> {
        let agent_count = self.positions.len();

        if self.config.battery_drain_per_move < 0.0 {
            return Err(FleetError::Config(format!(
                "battery_drain_per_move must be non-negative, got {}",
                self.config.battery_drain_per_move
            )));
        }

        let battery = match self.battery {
            Some(b) => {
                if b.len() != agent_count {
                    return Err(FleetError::AgentCountMismatch {
                        expected: agent_count,
                        got:      b.len(),
                        what:     "initial battery levels",
                    });
                }
                b
            }
            None => vec![self.config.initial_battery; agent_count],
        };

        if let Some(&bad) = self.positions.iter().find(|&&n| !self.graph.contains(n)) {
            return Err(FleetError::UnknownNode(bad));
        }

        let mut registry = FleetRegistry::with_capacity(agent_count);
        for (&node, &level) in self.positions.iter().zip(&battery) {
            registry.spawn(node, level);
        }

        tracing::info!(
            nodes = self.graph.node_count(),
            lanes = self.graph.lane_count(),
            agents = agent_count,
            "fleet initialized"
        );

        Ok(FleetSim {
            clock:    self.config.make_clock(),
            config:   self.config,
            graph:    self.graph,
            router:   self.router,
            registry,
            arbiter:  TrafficArbiter::new(self.arbiter),
            chargers: ChargerReservations::new(),
        })
    }
}
