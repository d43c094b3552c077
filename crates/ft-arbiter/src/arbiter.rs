//! The `TrafficArbiter` — request/occupy/free/release protocol and wake logic.

use ft_core::{AgentId, AgentStatus, LaneKey, NodeId};
use ft_registry::AgentRegistry;

use crate::{
    ArbiterConfig, Intention, Intentions, IntersectionTable, LaneTable, LaneWait,
    LaneWaitRegistry, TrafficEvent,
};

/// Owns all concurrency-control state for the shared graph.
///
/// Every method takes `&mut self`, so a single arbiter is serializable by
/// construction: one call runs to completion before the next starts.  To
/// share one arbiter between threads, use [`SharedArbiter`][crate::SharedArbiter],
/// which also puts the agent registry under the same lock.
///
/// # Outcomes
///
/// Nothing here returns `Err` or panics on contention.  Every operation
/// reports a boolean and logs one line per transition:
///
/// | Outcome             | Return  | Log                                  |
/// |---------------------|---------|--------------------------------------|
/// | Granted / freed     | `true`  | info                                 |
/// | Already held by you | `true`  | none                                 |
/// | Held by another     | `false` | warn (occupy) / info (request, queued) |
/// | Free of a resource you don't hold | `false` | warn if someone else holds it, info otherwise |
///
/// Node ids are not validated.  Fencing unknown nodes is the planner's job.
#[derive(Debug, Default)]
pub struct TrafficArbiter {
    config:        ArbiterConfig,
    lanes:         LaneTable,
    waits:         LaneWaitRegistry,
    intersections: IntersectionTable,
    intentions:    Intentions,
    events:        Vec<TrafficEvent>,
}

impl TrafficArbiter {
    pub fn new(config: ArbiterConfig) -> Self {
        tracing::info!(record_events = config.record_events, "traffic arbiter initialized");
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ArbiterConfig {
        &self.config
    }

    // ── Events ────────────────────────────────────────────────────────────

    fn record(&mut self, event: TrafficEvent) {
        event.emit();
        if self.config.record_events {
            self.events.push(event);
        }
    }

    /// Take every buffered event, oldest first.
    pub fn drain_events(&mut self) -> Vec<TrafficEvent> {
        std::mem::take(&mut self.events)
    }

    /// Buffered events not yet drained.
    pub fn events(&self) -> &[TrafficEvent] {
        &self.events
    }

    // ── Intentions ────────────────────────────────────────────────────────

    /// Record `agent`'s declared next move.  Never consulted by arbitration.
    pub fn register_intention(&mut self, agent: AgentId, current: NodeId, next: NodeId) {
        self.intentions.register(agent, current, next);
    }

    pub fn clear_intention(&mut self, agent: AgentId) {
        self.intentions.clear(agent);
    }

    pub fn intention(&self, agent: AgentId) -> Option<Intention> {
        self.intentions.get(agent)
    }

    // ── Lane queries ──────────────────────────────────────────────────────

    pub fn lanes(&self) -> &LaneTable {
        &self.lanes
    }

    /// All `(lane, holder)` pairs, in no particular order.
    pub fn occupied_lanes(&self) -> impl Iterator<Item = (LaneKey, AgentId)> + '_ {
        self.lanes.iter()
    }

    pub fn lane_holder(&self, u: NodeId, v: NodeId) -> Option<AgentId> {
        self.lanes.holder(LaneKey::new(u, v))
    }

    /// `true` if lane `(u, v)` has no holder, or `agent` holds it.
    pub fn is_lane_free(&self, u: NodeId, v: NodeId, agent: AgentId) -> bool {
        self.lanes.is_free_for(LaneKey::new(u, v), agent)
    }

    /// `true` if anybody holds lane `(u, v)`.
    pub fn is_lane_occupied(&self, u: NodeId, v: NodeId) -> bool {
        self.lane_holder(u, v).is_some()
    }

    /// The lane `agent` is blocked on, if any.
    pub fn lane_wait(&self, agent: AgentId) -> Option<LaneWait> {
        self.waits.get(agent)
    }

    /// Every outstanding lane wait, in wake-scan order.
    pub fn lane_waits(&self) -> Vec<(AgentId, LaneWait)> {
        self.waits.iter().collect()
    }

    // ── Lane protocol ─────────────────────────────────────────────────────

    /// Make `agent` the holder of lane `(u, v)`.
    ///
    /// Fails without mutating anything if another agent holds the lane.
    /// Holding it already is a no-op success.  A pending wait for exactly
    /// this lane is cleared.
    pub fn occupy_lane(&mut self, u: NodeId, v: NodeId, agent: AgentId) -> bool {
        let lane = LaneKey::new(u, v);
        match self.lanes.holder(lane) {
            Some(holder) if holder != agent => {
                self.record(TrafficEvent::LaneConflict { agent, lane, holder });
                return false;
            }
            Some(_) => {}
            None => {
                self.lanes.set(lane, agent);
                self.record(TrafficEvent::LaneOccupied { agent, lane });
            }
        }
        if self.waits.remove_if_lane(agent, lane) {
            tracing::debug!(%agent, %lane, "entering intended lane, no longer waiting");
        }
        true
    }

    /// Release lane `(u, v)` held by `agent` and admit one waiting agent.
    ///
    /// Only the holder may free a lane.  Freeing a lane held by someone else,
    /// or not held at all, returns `false`, changes nothing, and wakes
    /// nobody.
    pub fn free_lane<R>(&mut self, u: NodeId, v: NodeId, agent: AgentId, registry: &mut R) -> bool
    where
        R: AgentRegistry + ?Sized,
    {
        let lane = LaneKey::new(u, v);
        match self.lanes.holder(lane) {
            Some(holder) if holder == agent => {
                self.lanes.clear(lane);
                self.record(TrafficEvent::LaneFreed { agent, lane });
                self.wake_lane(lane, agent, registry);
                true
            }
            holder => {
                self.record(TrafficEvent::LaneNotHeld { agent, lane, holder });
                false
            }
        }
    }

    /// Ask whether `agent` may move from `current` onto lane
    /// `(current, next)`.
    ///
    /// A free lane returns `true` and changes nothing; the caller is expected
    /// to [`occupy_lane`](Self::occupy_lane) next.  An occupied lane records
    /// a lane wait for `agent` (replacing any earlier one), sets its status to
    /// `Waiting`, and returns `false`.
    pub fn request_lane<R>(
        &mut self,
        agent:    AgentId,
        current:  NodeId,
        next:     NodeId,
        registry: &mut R,
    ) -> bool
    where
        R: AgentRegistry + ?Sized,
    {
        let lane = LaneKey::new(current, next);
        if self.lanes.is_free_for(lane, agent) {
            return true;
        }

        let wait = LaneWait { current, next };
        let previous = self.waits.insert(agent, wait);
        registry.set_status(agent, AgentStatus::Waiting);

        // A repeat request for the same lane is a poll, not a new wait.
        if previous != Some(wait) {
            if let Some(old) = previous {
                tracing::debug!(%agent, from = %old.lane(), to = %lane, "lane wait superseded");
            }
            self.record(TrafficEvent::LaneWaiting { agent, lane, at: current });
        }
        false
    }

    /// [`request_lane`](Self::request_lane) and
    /// [`occupy_lane`](Self::occupy_lane) as one step.
    ///
    /// On success `agent` holds the lane, and a `Waiting` agent is flipped
    /// back to `Moving`.  On failure the agent is recorded waiting exactly as
    /// `request_lane` does.  This is the form concurrent callers must use: a
    /// separate check and occupy can interleave with another agent's grant.
    pub fn try_acquire_lane<R>(
        &mut self,
        agent:    AgentId,
        current:  NodeId,
        next:     NodeId,
        registry: &mut R,
    ) -> bool
    where
        R: AgentRegistry + ?Sized,
    {
        if !self.request_lane(agent, current, next, registry) {
            return false;
        }
        let granted = self.occupy_lane(current, next, agent);
        if granted && registry.status(agent) == Some(AgentStatus::Waiting) {
            registry.set_status(agent, AgentStatus::Moving);
        }
        granted
    }

    // ── Lane wake ─────────────────────────────────────────────────────────

    /// Admit at most one agent to the just-freed `lane`.
    ///
    /// The lane-wait registry is scanned first; if nobody there matches, the
    /// agent registry is scanned for `Waiting` agents standing at either end
    /// of the lane and facing the other.  `releaser` is never re-admitted.
    fn wake_lane<R>(&mut self, lane: LaneKey, releaser: AgentId, registry: &mut R) -> Option<AgentId>
    where
        R: AgentRegistry + ?Sized,
    {
        self.check_waiting_agents(lane, releaser, registry)
            .or_else(|| self.process_waiting_agents(lane, releaser, registry))
    }

    /// Wake path 1: the lane-wait registry, in registry order.
    fn check_waiting_agents<R>(
        &mut self,
        lane:     LaneKey,
        releaser: AgentId,
        registry: &mut R,
    ) -> Option<AgentId>
    where
        R: AgentRegistry + ?Sized,
    {
        for agent in self.waits.waiting_on(lane) {
            if agent == releaser || !self.lanes.is_free_for(lane, agent) {
                continue;
            }
            let Some(wait) = self.waits.get(agent) else {
                continue;
            };
            if self.occupy_lane(wait.current, wait.next, agent) {
                self.waits.remove(agent);
                self.grant_after_wait(agent, lane, registry);
                return Some(agent);
            }
        }
        None
    }

    /// Wake path 2: `Waiting` agents whose location and next node form the
    /// freed lane, in either orientation.
    fn process_waiting_agents<R>(
        &mut self,
        lane:     LaneKey,
        releaser: AgentId,
        registry: &mut R,
    ) -> Option<AgentId>
    where
        R: AgentRegistry + ?Sized,
    {
        for agent in registry.agent_ids() {
            if agent == releaser || registry.status(agent) != Some(AgentStatus::Waiting) {
                continue;
            }
            let (Some(at), Some(next)) = (registry.location(agent), registry.next_node(agent)) else {
                continue;
            };
            if LaneKey::new(at, next) != lane || !self.lanes.is_free_for(lane, agent) {
                continue;
            }
            if self.occupy_lane(at, next, agent) {
                self.grant_after_wait(agent, lane, registry);
                return Some(agent);
            }
        }
        None
    }

    fn grant_after_wait<R>(&mut self, agent: AgentId, lane: LaneKey, registry: &mut R)
    where
        R: AgentRegistry + ?Sized,
    {
        if registry.status(agent) == Some(AgentStatus::Waiting) {
            registry.set_status(agent, AgentStatus::Moving);
        }
        self.record(TrafficEvent::LaneGranted { agent, lane });
    }

    // ── Intersection queries ──────────────────────────────────────────────

    pub fn intersections(&self) -> &IntersectionTable {
        &self.intersections
    }

    pub fn intersection_holder(&self, node: NodeId) -> Option<AgentId> {
        self.intersections.holder(node)
    }

    /// Agents queued for `node`, head first.
    pub fn intersection_queue(&self, node: NodeId) -> Vec<AgentId> {
        self.intersections.queue(node)
    }

    // ── Intersection protocol ─────────────────────────────────────────────

    /// Reserve intersection `node` for `agent`.
    ///
    /// Free → reserved, `true`.  Already reserved by `agent` → `true`.
    /// Reserved by another → `agent` joins the node's FIFO queue (once) and
    /// the call returns `false`; the agent is admitted by a later release.
    pub fn request_intersection(&mut self, agent: AgentId, node: NodeId) -> bool {
        match self.intersections.holder(node) {
            None => {
                self.intersections.set(node, agent);
                self.record(TrafficEvent::IntersectionReserved { agent, node });
                true
            }
            Some(holder) if holder == agent => true,
            Some(_) => {
                let (position, inserted) = self.intersections.enqueue(node, agent);
                if inserted {
                    self.record(TrafficEvent::IntersectionQueued { agent, node, position });
                }
                false
            }
        }
    }

    /// Release intersection `node` held by `agent` and admit the head of its
    /// queue.
    ///
    /// Returns `false`, changing nothing, if `agent` is not the holder.
    pub fn release_intersection<R>(&mut self, agent: AgentId, node: NodeId, registry: &mut R) -> bool
    where
        R: AgentRegistry + ?Sized,
    {
        match self.intersections.holder(node) {
            Some(holder) if holder == agent => {
                self.intersections.clear(node);
                self.record(TrafficEvent::IntersectionReleased { agent, node });
                self.process_intersection_queue(node, registry);
                true
            }
            holder => {
                self.record(TrafficEvent::IntersectionNotHeld { agent, node, holder });
                false
            }
        }
    }

    /// Hand the free intersection `node` to the head of its queue.
    fn process_intersection_queue<R>(&mut self, node: NodeId, registry: &mut R) -> Option<AgentId>
    where
        R: AgentRegistry + ?Sized,
    {
        if self.intersections.holder(node).is_some() {
            return None;
        }
        let next = self.intersections.pop_front(node)?;
        self.intersections.set(node, next);
        if registry.status(next) == Some(AgentStatus::Waiting) {
            registry.set_status(next, AgentStatus::Moving);
        }
        self.record(TrafficEvent::IntersectionGranted { agent: next, node });
        Some(next)
    }

    // ── Agent lifecycle ───────────────────────────────────────────────────

    /// Drop every trace of `agent`: queue entries, lane wait and intention
    /// are removed, then every lane and intersection it holds is released
    /// through the normal free/release path so waiters are woken.
    ///
    /// Returns the number of resources released.
    pub fn forget_agent<R>(&mut self, agent: AgentId, registry: &mut R) -> usize
    where
        R: AgentRegistry + ?Sized,
    {
        let dequeued = self.intersections.dequeue_everywhere(agent);
        if !dequeued.is_empty() {
            tracing::debug!(%agent, nodes = ?dequeued, "removed from intersection queues");
        }
        self.waits.remove(agent);
        self.intentions.clear(agent);

        let mut released = 0;
        for lane in self.lanes.held_by(agent) {
            if self.free_lane(lane.lo, lane.hi, agent, registry) {
                released += 1;
            }
        }
        for node in self.intersections.held_by(agent) {
            if self.release_intersection(agent, node, registry) {
                released += 1;
            }
        }
        released
    }
}
