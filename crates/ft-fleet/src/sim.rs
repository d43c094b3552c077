//! The `FleetSim` struct and its tick loop.

use ft_arbiter::TrafficArbiter;
use ft_core::{AgentId, AgentStatus, FleetClock, FleetConfig, NodeId, Tick};
use ft_graph::{GraphError, NavGraph, Router};
use ft_registry::{AgentRegistry, FleetRegistry};

use crate::{ChargerReservations, FleetError, FleetObserver, FleetResult};

/// The movement controller.
///
/// `FleetSim<R>` owns the graph, the planner, the agent registry and the
/// traffic arbiter, and advances every agent one lane per tick:
///
/// 1. **Acquire**: a `Moving` agent reserves the intersection at its next
///    node if that node is one, then takes the lane ahead with
///    [`TrafficArbiter::try_acquire_lane`].  A denial leaves the agent
///    `Waiting`.  An agent never holds a lane into an intersection it has
///    not been granted: an intersection taken in the same attempt is given
///    back when the lane is denied.
/// 2. **Traverse**: step onto the next node, release the intersection left
///    behind, free the lane just crossed (waking one waiter), drain battery.
/// 3. **Look ahead**: acquire the next lane immediately, or finish the task.
///
/// Agents are processed in ascending `AgentId` order so runs are
/// deterministic.  Create via [`FleetBuilder`][crate::FleetBuilder].
pub struct FleetSim<R: Router> {
    pub config: FleetConfig,

    pub clock: FleetClock,

    /// Read-only topology.
    pub graph: NavGraph,

    /// Path planner used by `assign_task`.
    pub router: R,

    /// Agent state (SoA arrays).
    pub registry: FleetRegistry,

    /// Lane and intersection arbitration.
    pub arbiter: TrafficArbiter,

    /// Charging stations claimed by agents heading to or docked at them.
    pub chargers: ChargerReservations,
}

impl<R: Router> FleetSim<R> {
    // ── Agents ────────────────────────────────────────────────────────────

    /// Place a new idle agent at `node` with the configured starting battery.
    pub fn spawn(&mut self, node: NodeId) -> FleetResult<AgentId> {
        if !self.graph.contains(node) {
            return Err(FleetError::UnknownNode(node));
        }
        Ok(self.registry.spawn(node, self.config.initial_battery))
    }

    /// Remove `agent`: every lane and intersection it holds is released and
    /// it leaves all queues.  Returns the number of resources released.
    pub fn remove_agent(&mut self, agent: AgentId) -> FleetResult<usize> {
        if !self.registry.contains(agent) {
            return Err(FleetError::UnknownAgent(agent));
        }
        let released = self.arbiter.forget_agent(agent, &mut self.registry);
        self.release_charger(agent);
        self.registry.retire(agent);
        Ok(released)
    }

    /// Plan a route for `agent` to `destination` and start it moving.
    ///
    /// Returns `Ok(false)` without changing anything when the agent is
    /// already busy, already at `destination`, has no route there, or the
    /// first lane of the route is held by another agent.
    pub fn assign_task(&mut self, agent: AgentId, destination: NodeId) -> FleetResult<bool> {
        let status = self.registry.status(agent).ok_or(FleetError::UnknownAgent(agent))?;
        if !self.graph.contains(destination) {
            return Err(FleetError::UnknownNode(destination));
        }
        if status.is_active() {
            tracing::info!(%agent, %status, "robot busy, task not assigned");
            return Ok(false);
        }

        let start = self.registry.location[agent.index()];
        let path = match self.router.route(&self.graph, start, destination) {
            Ok(p) => p,
            Err(GraphError::NoPath { .. }) => {
                tracing::warn!(%agent, from = %start, to = %destination, "no path to destination");
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };
        if path.is_trivial() {
            tracing::info!(%agent, node = %start, "robot already at destination");
            return Ok(false);
        }

        let first = path.nodes[1];
        if !self.arbiter.is_lane_free(start, first, agent) {
            tracing::info!(%agent, from = %start, to = %first, "first lane occupied, task not assigned");
            return Ok(false);
        }

        tracing::info!(%agent, from = %start, to = %destination, lanes = path.lane_count(), "task assigned");
        self.registry.set_path(agent, path.nodes);
        self.registry.set_status(agent, AgentStatus::Moving);
        self.arbiter.register_intention(agent, start, first);
        Ok(true)
    }

    /// Reserve the nearest free charger for `agent` and route it there.
    ///
    /// Chargers reserved by another agent, or with another agent standing on
    /// them, are skipped.  Candidates are ranked by route length, then by
    /// straight-line distance.  An agent standing on a free charger docks
    /// immediately.  An agent that already holds a reservation keeps it.
    ///
    /// Returns the reserved charger, or `None` if the agent is busy, no free
    /// charger is reachable, or the first lane is blocked.
    pub fn send_to_charger(&mut self, agent: AgentId) -> FleetResult<Option<NodeId>> {
        let status = self.registry.status(agent).ok_or(FleetError::UnknownAgent(agent))?;
        if let Some(reserved) = self.chargers.of(agent) {
            return Ok(Some(reserved));
        }
        if status.is_active() {
            tracing::info!(%agent, %status, "robot busy, not sent to charger");
            return Ok(None);
        }

        let here = self.registry.location[agent.index()];
        if self.graph.is_charger(here) && !self.chargers.is_taken_for(here, agent) {
            self.chargers.reserve(agent, here);
            self.registry.set_status(agent, AgentStatus::Charging);
            tracing::info!(%agent, charger = %here, "robot docked at charger");
            return Ok(Some(here));
        }

        let Some(charger) = self.nearest_free_charger(agent)? else {
            tracing::warn!(%agent, "no free charging station reachable");
            return Ok(None);
        };
        if !self.assign_task(agent, charger)? {
            return Ok(None);
        }
        self.chargers.reserve(agent, charger);
        tracing::info!(%agent, %charger, "charging station reserved");
        Ok(Some(charger))
    }

    /// Send every idle agent whose battery is at or below
    /// `config.low_battery_threshold` to a charger.
    ///
    /// Agents that are moving, waiting, charging, already hold a reservation,
    /// or have a flat battery are left alone.  Returns how many were sent.
    pub fn check_battery_levels(&mut self) -> FleetResult<usize> {
        let threshold = self.config.low_battery_threshold;
        let agents: Vec<AgentId> = self.registry.ids().collect();
        let mut sent = 0;
        for agent in agents {
            let i = agent.index();
            let status = self.registry.status[i];
            let level = self.registry.battery[i];
            if status.is_active()
                || status == AgentStatus::Charging
                || self.chargers.of(agent).is_some()
                || level <= 0.0
                || level > threshold
            {
                continue;
            }
            tracing::warn!(%agent, battery = level, "battery low, heading to charger");
            if self.send_to_charger(agent)?.is_some() {
                sent += 1;
            } else {
                tracing::error!(%agent, battery = level, "battery low, but no charging station available");
            }
        }
        Ok(sent)
    }

    /// Nearest charger `agent` may claim, by route length.
    fn nearest_free_charger(&self, agent: AgentId) -> FleetResult<Option<NodeId>> {
        let here = self.registry.location[agent.index()];
        let origin = self.graph.node_pos[here.index()];
        let mut best: Option<(usize, f32, NodeId)> = None;

        for charger in self.graph.chargers() {
            if charger == here
                || self.chargers.is_taken_for(charger, agent)
                || self.is_occupied_by_other(charger, agent)
            {
                continue;
            }
            let lanes = match self.router.route(&self.graph, here, charger) {
                Ok(path) => path.lane_count(),
                Err(GraphError::NoPath { .. }) => continue,
                Err(e) => return Err(e.into()),
            };
            let dist = origin.distance_sq(self.graph.node_pos[charger.index()]);
            if best.is_none_or(|(l, d, _)| (lanes, dist) < (l, d)) {
                best = Some((lanes, dist, charger));
            }
        }
        Ok(best.map(|(_, _, charger)| charger))
    }

    fn is_occupied_by_other(&self, node: NodeId, agent: AgentId) -> bool {
        self.registry
            .ids()
            .any(|other| other != agent && self.registry.location[other.index()] == node)
    }

    fn release_charger(&mut self, agent: AgentId) {
        if let Some(charger) = self.chargers.release(agent) {
            tracing::info!(%agent, %charger, "charging station free");
        }
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Run from the current tick to `config.end_tick()`.
    pub fn run<O: FleetObserver>(&mut self, observer: &mut O) {
        while self.clock.current_tick < self.config.end_tick() {
            self.step(observer);
        }
        observer.on_sim_end(self.clock.current_tick);
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks<O: FleetObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.step(observer);
        }
    }

    /// Advance every agent by one tick.  Returns how many traversed a lane.
    pub fn step<O: FleetObserver>(&mut self, observer: &mut O) -> usize {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);

        let agents: Vec<AgentId> = self.registry.ids().collect();
        let mut moved = 0;
        for agent in agents {
            if self.step_agent(agent) {
                moved += 1;
            }
        }

        for event in self.arbiter.drain_events() {
            observer.on_traffic_event(now, &event);
        }
        observer.on_tick_end(now, moved);
        if self.config.output_interval_ticks > 0
            && now.0.is_multiple_of(self.config.output_interval_ticks)
        {
            observer.on_snapshot(now, &self.registry);
        }

        self.clock.advance();
        moved
    }

    /// The current tick.
    pub fn now(&self) -> Tick {
        self.clock.current_tick
    }

    // ── Per-agent movement ────────────────────────────────────────────────

    fn step_agent(&mut self, agent: AgentId) -> bool {
        match self.registry.status(agent) {
            Some(AgentStatus::Moving) => self.advance_agent(agent),
            Some(AgentStatus::Waiting) if self.config.poll_waiting => self.advance_agent(agent),
            Some(AgentStatus::Charging) => {
                self.charge_agent(agent);
                false
            }
            _ => false,
        }
    }

    fn advance_agent(&mut self, agent: AgentId) -> bool {
        let i = agent.index();
        let here = self.registry.location[i];
        let Some(next) = self.registry.next_node(agent) else {
            self.finish_task(agent);
            return false;
        };
        if self.registry.battery[i] <= 0.0 {
            self.strand(agent);
            return false;
        }

        if !self.acquire_move(agent, here, next) {
            return false;
        }
        if self.registry.status[i] == AgentStatus::Waiting {
            self.registry.set_status(agent, AgentStatus::Moving);
        }

        // Traverse (here → next).
        self.registry.advance(agent);
        if self.arbiter.intersection_holder(here) == Some(agent) {
            self.arbiter.release_intersection(agent, here, &mut self.registry);
        }
        self.arbiter.free_lane(here, next, agent, &mut self.registry);
        let battery = self.registry.drain_battery(agent, self.config.battery_drain_per_move);
        tracing::debug!(%agent, from = %here, to = %next, battery, "robot moved");

        match self.registry.next_node(agent) {
            Some(ahead) => {
                self.arbiter.register_intention(agent, next, ahead);
                self.acquire_move(agent, next, ahead);
            }
            None => self.finish_task(agent),
        }
        true
    }

    /// Take what the move `from → to` needs: the intersection at `to` first,
    /// then the lane.  On any denial the agent is left `Waiting`.
    fn acquire_move(&mut self, agent: AgentId, from: NodeId, to: NodeId) -> bool {
        let gated = self.graph.is_intersection(to);
        let held = gated && self.arbiter.intersection_holder(to) == Some(agent);
        if gated && !self.arbiter.request_intersection(agent, to) {
            self.registry.set_status(agent, AgentStatus::Waiting);
            return false;
        }
        if self.arbiter.try_acquire_lane(agent, from, to, &mut self.registry) {
            return true;
        }
        if gated && !held {
            self.arbiter.release_intersection(agent, to, &mut self.registry);
        }
        false
    }

    /// End of path: release the destination intersection and either dock or
    /// report completion.
    fn finish_task(&mut self, agent: AgentId) {
        let i = agent.index();
        let here = self.registry.location[i];
        if self.arbiter.intersection_holder(here) == Some(agent) {
            self.arbiter.release_intersection(agent, here, &mut self.registry);
        }
        self.arbiter.clear_intention(agent);

        if self.graph.is_charger(here)
            && self.registry.battery[i] < 100.0
            && !self.chargers.is_taken_for(here, agent)
        {
            self.chargers.reserve(agent, here);
            self.registry.set_status(agent, AgentStatus::Charging);
            tracing::info!(%agent, node = %here, "robot docked at charger");
        } else {
            self.release_charger(agent);
            self.registry.set_status(agent, AgentStatus::TaskComplete);
            tracing::info!(%agent, node = %here, "task complete");
        }
    }

    /// Battery depleted mid-route: give everything back and stop.
    fn strand(&mut self, agent: AgentId) {
        let here = self.registry.location[agent.index()];
        tracing::error!(%agent, node = %here, "robot ran out of battery");
        self.arbiter.forget_agent(agent, &mut self.registry);
        self.release_charger(agent);
        self.registry.clear_path(agent);
        self.registry.set_status(agent, AgentStatus::Idle);
    }

    fn charge_agent(&mut self, agent: AgentId) {
        let level = self.registry.charge(agent, self.config.charge_per_tick);
        if level >= 100.0 {
            self.registry.set_status(agent, AgentStatus::Idle);
            tracing::info!(%agent, battery = level, "robot fully charged");
            self.release_charger(agent);
        }
    }
}
