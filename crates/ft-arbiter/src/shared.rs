//! `SharedArbiter` — one arbiter and its agent registry behind one lock.
//!
//! Agents that run on their own threads share a clone of the same
//! `SharedArbiter`.  Each method takes the lock once and runs the whole
//! operation under it, wake scans and status flips included, so the arbiter
//! state and the registry never diverge between two observers.

use std::sync::{Arc, Mutex, MutexGuard};

use ft_core::{AgentId, LaneKey, NodeId};
use ft_registry::AgentRegistry;

use crate::{ArbiterConfig, LaneWait, TrafficArbiter, TrafficEvent};

struct State<G> {
    arbiter:  TrafficArbiter,
    registry: G,
}

/// Thread-safe handle to a [`TrafficArbiter`] and the registry it notifies.
pub struct SharedArbiter<G> {
    inner: Arc<Mutex<State<G>>>,
}

impl<G> Clone for SharedArbiter<G> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<G: AgentRegistry> SharedArbiter<G> {
    pub fn new(config: ArbiterConfig, registry: G) -> Self {
        Self::from_parts(TrafficArbiter::new(config), registry)
    }

    pub fn from_parts(arbiter: TrafficArbiter, registry: G) -> Self {
        Self {
            inner: Arc::new(Mutex::new(State { arbiter, registry })),
        }
    }

    /// A panic inside a previous critical section does not wedge the other
    /// handles: the tables are left as that call mutated them.
    fn lock(&self) -> MutexGuard<'_, State<G>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run `f` with exclusive access to both the arbiter and the registry.
    ///
    /// Use this for compound steps that must not interleave with other
    /// agents, e.g. reading a location and then acquiring the lane ahead.
    pub fn with<T>(&self, f: impl FnOnce(&mut TrafficArbiter, &mut G) -> T) -> T {
        let mut state = self.lock();
        let State { arbiter, registry } = &mut *state;
        f(arbiter, registry)
    }

    // ── Lanes ─────────────────────────────────────────────────────────────

    pub fn is_lane_free(&self, u: NodeId, v: NodeId, agent: AgentId) -> bool {
        self.lock().arbiter.is_lane_free(u, v, agent)
    }

    pub fn lane_holder(&self, u: NodeId, v: NodeId) -> Option<AgentId> {
        self.lock().arbiter.lane_holder(u, v)
    }

    pub fn occupy_lane(&self, u: NodeId, v: NodeId, agent: AgentId) -> bool {
        self.lock().arbiter.occupy_lane(u, v, agent)
    }

    pub fn free_lane(&self, u: NodeId, v: NodeId, agent: AgentId) -> bool {
        self.with(|arb, reg| arb.free_lane(u, v, agent, reg))
    }

    pub fn request_lane(&self, agent: AgentId, current: NodeId, next: NodeId) -> bool {
        self.with(|arb, reg| arb.request_lane(agent, current, next, reg))
    }

    /// Check and occupy under a single lock acquisition.
    pub fn try_acquire_lane(&self, agent: AgentId, current: NodeId, next: NodeId) -> bool {
        self.with(|arb, reg| arb.try_acquire_lane(agent, current, next, reg))
    }

    pub fn lane_wait(&self, agent: AgentId) -> Option<LaneWait> {
        self.lock().arbiter.lane_wait(agent)
    }

    /// Snapshot of every occupied lane, sorted by lane key.
    pub fn occupied_lanes(&self) -> Vec<(LaneKey, AgentId)> {
        let mut lanes: Vec<_> = self.lock().arbiter.occupied_lanes().collect();
        lanes.sort_unstable();
        lanes
    }

    // ── Intersections ─────────────────────────────────────────────────────

    pub fn request_intersection(&self, agent: AgentId, node: NodeId) -> bool {
        self.lock().arbiter.request_intersection(agent, node)
    }

    pub fn release_intersection(&self, agent: AgentId, node: NodeId) -> bool {
        self.with(|arb, reg| arb.release_intersection(agent, node, reg))
    }

    pub fn intersection_holder(&self, node: NodeId) -> Option<AgentId> {
        self.lock().arbiter.intersection_holder(node)
    }

    pub fn intersection_queue(&self, node: NodeId) -> Vec<AgentId> {
        self.lock().arbiter.intersection_queue(node)
    }

    // ── Lifecycle / events ────────────────────────────────────────────────

    pub fn forget_agent(&self, agent: AgentId) -> usize {
        self.with(|arb, reg| arb.forget_agent(agent, reg))
    }

    pub fn drain_events(&self) -> Vec<TrafficEvent> {
        self.lock().arbiter.drain_events()
    }
}
