//! Integration tests for ft-fleet.

use ft_arbiter::TrafficEvent;
use ft_core::{AgentId, AgentStatus, FleetConfig, NodeId, Point, Tick};
use ft_graph::{BfsRouter, NavGraph, NavGraphBuilder, NodeAttrs};
use ft_registry::{AgentRegistry, FleetRegistry};

use crate::{FleetBuilder, FleetObserver, FleetSim};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn test_config(total_ticks: u64) -> FleetConfig {
    FleetConfig {
        total_ticks,
        output_interval_ticks: 1,
        ..FleetConfig::default()
    }
}

/// ```text
///   0 ── 1 ── [2] ── 3 ── 4(charger)        5 (isolated)
/// ```
///
/// Node 2 is an intersection.
fn corridor() -> NavGraph {
    let mut b = NavGraphBuilder::new();
    for x in 0..4 {
        b.add_node(Point::new(x as f32, 0.0));
    }
    b.add_node_with(
        Point::new(4.0, 0.0),
        NodeAttrs { is_charger: true, ..NodeAttrs::default() },
    );
    b.add_node(Point::new(9.0, 9.0));
    for x in 0..4 {
        b.add_lane(NodeId(x), NodeId(x + 1));
    }
    b.mark_intersection(NodeId(2));
    b.build()
}

/// ```text
///   0 ──┐
///       [2] ── 3
///   1 ──┘
/// ```
fn merge() -> NavGraph {
    let mut b = NavGraphBuilder::new();
    b.add_node(Point::new(0.0, 0.0));
    b.add_node(Point::new(0.0, 2.0));
    b.add_node(Point::new(1.0, 1.0));
    b.add_node(Point::new(2.0, 1.0));
    b.add_lane(NodeId(0), NodeId(2));
    b.add_lane(NodeId(1), NodeId(2));
    b.add_lane(NodeId(2), NodeId(3));
    b.mark_intersection(NodeId(2));
    b.build()
}

/// ```text
///   0(charger) ── 1 ── 2 ── 3 ── 4 ── 5(charger)
/// ```
fn two_chargers() -> NavGraph {
    let charger = NodeAttrs { is_charger: true, ..NodeAttrs::default() };
    let mut b = NavGraphBuilder::new();
    b.add_node_with(Point::new(0.0, 0.0), charger.clone());
    for x in 1..5 {
        b.add_node(Point::new(x as f32, 0.0));
    }
    b.add_node_with(Point::new(5.0, 0.0), charger);
    for x in 0..5 {
        b.add_lane(NodeId(x), NodeId(x + 1));
    }
    b.build()
}

fn sim_with_battery(graph: NavGraph, positions: &[u32], battery: &[f32]) -> FleetSim<BfsRouter> {
    FleetBuilder::new(test_config(20), graph, BfsRouter)
        .initial_positions(positions.iter().map(|&n| NodeId(n)).collect())
        .initial_battery(battery.to_vec())
        .build()
        .unwrap()
}

fn sim_at(graph: NavGraph, config: FleetConfig, positions: &[u32]) -> FleetSim<BfsRouter> {
    FleetBuilder::new(config, graph, BfsRouter)
        .initial_positions(positions.iter().map(|&n| NodeId(n)).collect())
        .build()
        .unwrap()
}

/// Records everything the sim reports.
#[derive(Default)]
struct Recorder {
    ticks:     Vec<Tick>,
    events:    Vec<TrafficEvent>,
    moved:     usize,
    snapshots: usize,
    ended:     Option<Tick>,
}

impl FleetObserver for Recorder {
    fn on_tick_start(&mut self, tick: Tick) {
        self.ticks.push(tick);
    }

    fn on_traffic_event(&mut self, _tick: Tick, event: &TrafficEvent) {
        self.events.push(event.clone());
    }

    fn on_tick_end(&mut self, _tick: Tick, moved: usize) {
        self.moved += moved;
    }

    fn on_snapshot(&mut self, _tick: Tick, _registry: &FleetRegistry) {
        self.snapshots += 1;
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.ended = Some(final_tick);
    }
}

// ── FleetBuilder validation ───────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;
    use crate::FleetError;

    #[test]
    fn spawns_one_agent_per_position() {
        let sim = sim_at(corridor(), test_config(10), &[0, 3]);
        assert_eq!(sim.registry.count(), 2);
        assert_eq!(sim.registry.location(AgentId(1)), Some(NodeId(3)));
        assert_eq!(sim.registry.battery(AgentId(0)), Some(100.0));
    }

    #[test]
    fn unknown_position_errors() {
        let result = FleetBuilder::new(test_config(10), corridor(), BfsRouter)
            .initial_positions(vec![NodeId(0), NodeId(42)])
            .build();
        assert!(matches!(result, Err(FleetError::UnknownNode(NodeId(42)))));
    }

    #[test]
    fn battery_count_mismatch_errors() {
        let result = FleetBuilder::new(test_config(10), corridor(), BfsRouter)
            .initial_positions(vec![NodeId(0), NodeId(1)])
            .initial_battery(vec![50.0])
            .build();
        assert!(matches!(result, Err(FleetError::AgentCountMismatch { .. })));
    }

    #[test]
    fn negative_drain_is_rejected() {
        let config = FleetConfig { battery_drain_per_move: -1.0, ..test_config(10) };
        let result = FleetBuilder::new(config, corridor(), BfsRouter).build();
        assert!(matches!(result, Err(FleetError::Config(_))));
    }

    #[test]
    fn spawn_after_build_checks_node() {
        let mut sim = sim_at(corridor(), test_config(10), &[]);
        assert_eq!(sim.spawn(NodeId(4)).unwrap(), AgentId(0));
        assert!(sim.spawn(NodeId(99)).is_err());
    }
}

// ── Task assignment ───────────────────────────────────────────────────────────

#[cfg(test)]
mod assign_tests {
    use super::*;
    use crate::FleetError;

    #[test]
    fn assign_plans_path_and_starts_moving() {
        let mut sim = sim_at(corridor(), test_config(10), &[0]);
        let a = AgentId(0);
        assert!(sim.assign_task(a, NodeId(3)).unwrap());
        assert_eq!(sim.registry.status(a), Some(AgentStatus::Moving));
        assert_eq!(sim.registry.next_node(a), Some(NodeId(1)));
        assert_eq!(sim.registry.destination[a.index()], NodeId(3));
        assert_eq!(sim.arbiter.intention(a).map(|i| i.next), Some(NodeId(1)));
    }

    #[test]
    fn already_there_is_refused() {
        let mut sim = sim_at(corridor(), test_config(10), &[2]);
        assert!(!sim.assign_task(AgentId(0), NodeId(2)).unwrap());
        assert_eq!(sim.registry.status(AgentId(0)), Some(AgentStatus::Idle));
    }

    #[test]
    fn busy_agent_is_refused() {
        let mut sim = sim_at(corridor(), test_config(10), &[0]);
        assert!(sim.assign_task(AgentId(0), NodeId(3)).unwrap());
        assert!(!sim.assign_task(AgentId(0), NodeId(1)).unwrap());
        assert_eq!(sim.registry.destination[0], NodeId(3));
    }

    #[test]
    fn occupied_first_lane_is_refused() {
        let mut sim = sim_at(corridor(), test_config(10), &[0, 1]);
        sim.arbiter.occupy_lane(NodeId(0), NodeId(1), AgentId(1));
        assert!(!sim.assign_task(AgentId(0), NodeId(3)).unwrap());
        assert_eq!(sim.registry.status(AgentId(0)), Some(AgentStatus::Idle));
    }

    #[test]
    fn unreachable_destination_is_refused() {
        let mut sim = sim_at(corridor(), test_config(10), &[0]);
        assert!(!sim.assign_task(AgentId(0), NodeId(5)).unwrap());
    }

    #[test]
    fn unknown_agent_or_node_errors() {
        let mut sim = sim_at(corridor(), test_config(10), &[0]);
        assert!(matches!(
            sim.assign_task(AgentId(7), NodeId(1)),
            Err(FleetError::UnknownAgent(AgentId(7)))
        ));
        assert!(matches!(
            sim.assign_task(AgentId(0), NodeId(70)),
            Err(FleetError::UnknownNode(NodeId(70)))
        ));
    }
}

// ── Movement ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod movement_tests {
    use super::*;

    #[test]
    fn single_agent_reaches_destination() {
        let mut sim = sim_at(corridor(), test_config(10), &[0]);
        let a = AgentId(0);
        sim.assign_task(a, NodeId(3)).unwrap();

        let mut rec = Recorder::default();
        sim.run_ticks(4, &mut rec);

        assert_eq!(sim.registry.location(a), Some(NodeId(3)));
        assert_eq!(sim.registry.status(a), Some(AgentStatus::TaskComplete));
        assert_eq!(sim.registry.battery(a), Some(94.0));
        assert_eq!(rec.moved, 3);
        assert!(sim.arbiter.lanes().is_empty());
        assert_eq!(sim.arbiter.intersection_holder(NodeId(2)), None);
        assert!(rec
            .events
            .contains(&TrafficEvent::IntersectionReserved { agent: a, node: NodeId(2) }));
    }

    /// A at 0 and B at 2 head for each other's start.  A takes lane (1, 2)
    /// ahead of B, so B waits; A's free hands the lane to B.
    #[test]
    fn head_on_agents_share_a_lane_in_turn() {
        let mut sim = sim_at(corridor(), test_config(10), &[0, 2]);
        let (a, b) = (AgentId(0), AgentId(1));
        sim.assign_task(a, NodeId(2)).unwrap();
        sim.assign_task(b, NodeId(0)).unwrap();

        let mut rec = Recorder::default();
        sim.step(&mut rec);
        assert_eq!(sim.registry.status(b), Some(AgentStatus::Waiting));
        assert_eq!(sim.arbiter.lane_holder(NodeId(1), NodeId(2)), Some(a));

        sim.run_ticks(4, &mut rec);
        assert_eq!(sim.registry.location(a), Some(NodeId(2)));
        assert_eq!(sim.registry.location(b), Some(NodeId(0)));
        assert_eq!(sim.registry.status(a), Some(AgentStatus::TaskComplete));
        assert_eq!(sim.registry.status(b), Some(AgentStatus::TaskComplete));
        assert!(sim.arbiter.lanes().is_empty());
        assert!(rec.events.iter().any(|e| matches!(e, TrafficEvent::LaneWaiting { agent, .. } if *agent == b)));
        assert!(rec.events.iter().any(|e| matches!(e, TrafficEvent::LaneGranted { agent, .. } if *agent == b)));
    }

    #[test]
    fn lanes_are_never_double_occupied() {
        let mut sim = sim_at(corridor(), test_config(20), &[0, 1, 3, 4]);
        sim.assign_task(AgentId(0), NodeId(4)).unwrap();
        sim.assign_task(AgentId(2), NodeId(0)).unwrap();
        sim.assign_task(AgentId(3), NodeId(1)).unwrap();

        struct Checker;
        impl FleetObserver for Checker {
            fn on_traffic_event(&mut self, _tick: Tick, event: &TrafficEvent) {
                assert!(!matches!(event, TrafficEvent::LaneNotHeld { .. }));
            }
        }

        for _ in 0..20 {
            sim.step(&mut Checker);
            let mut held: Vec<_> = sim.arbiter.lanes().iter().map(|(k, _)| k).collect();
            let count = held.len();
            held.sort_unstable();
            held.dedup();
            assert_eq!(held.len(), count);
        }
    }

    #[test]
    fn intersection_is_admitted_in_order() {
        let mut sim = sim_at(merge(), test_config(10), &[0, 1]);
        let (a, b) = (AgentId(0), AgentId(1));
        sim.assign_task(a, NodeId(3)).unwrap();
        sim.assign_task(b, NodeId(3)).unwrap();

        let mut rec = Recorder::default();
        sim.step(&mut rec);
        assert_eq!(sim.arbiter.intersection_holder(NodeId(2)), Some(a));
        assert_eq!(sim.arbiter.intersection_queue(NodeId(2)), vec![b]);
        assert_eq!(sim.registry.status(b), Some(AgentStatus::Waiting));

        sim.run_ticks(3, &mut rec);
        assert_eq!(sim.registry.status(a), Some(AgentStatus::TaskComplete));
        assert_eq!(sim.registry.status(b), Some(AgentStatus::TaskComplete));
        assert!(rec
            .events
            .contains(&TrafficEvent::IntersectionGranted { agent: b, node: NodeId(2) }));
        assert_eq!(sim.arbiter.intersections().reserved_count(), 0);
    }

    /// A crosses the corridor eastwards while B heads west through the same
    /// intersection.  Whoever holds node 2 gets the lanes on both sides of
    /// it, so the two pass each other instead of blocking forever.
    #[test]
    fn opposing_agents_pass_through_an_intersection() {
        let mut sim = sim_at(corridor(), test_config(50), &[0, 3]);
        let (a, b) = (AgentId(0), AgentId(1));
        sim.assign_task(a, NodeId(4)).unwrap();
        sim.assign_task(b, NodeId(0)).unwrap();

        let mut rec = Recorder::default();
        sim.run_ticks(50, &mut rec);

        assert_eq!(sim.registry.location(a), Some(NodeId(4)));
        assert_eq!(sim.registry.location(b), Some(NodeId(0)));
        assert!(!sim.registry.status(a).unwrap().is_active());
        assert_eq!(sim.registry.status(b), Some(AgentStatus::TaskComplete));
        assert!(sim.arbiter.lanes().is_empty());
        assert_eq!(sim.arbiter.intersection_holder(NodeId(2)), None);
        assert!(rec
            .events
            .contains(&TrafficEvent::IntersectionGranted { agent: b, node: NodeId(2) }));
    }

    /// The lane into node 2 is held, so the intersection taken for the same
    /// move is handed back at once.
    #[test]
    fn denied_lane_gives_back_the_intersection() {
        let mut sim = sim_at(corridor(), test_config(10), &[0, 2]);
        let (a, c) = (AgentId(0), AgentId(1));
        sim.arbiter.occupy_lane(NodeId(1), NodeId(2), c);
        sim.assign_task(a, NodeId(3)).unwrap();

        let mut rec = Recorder::default();
        sim.step(&mut rec);

        assert_eq!(sim.registry.location(a), Some(NodeId(1)));
        assert_eq!(sim.registry.status(a), Some(AgentStatus::Waiting));
        assert_eq!(sim.arbiter.intersection_holder(NodeId(2)), None);
        assert!(rec
            .events
            .contains(&TrafficEvent::IntersectionReleased { agent: a, node: NodeId(2) }));
    }

    #[test]
    fn arbiter_wake_alone_resumes_waiters() {
        let config = FleetConfig { poll_waiting: false, ..test_config(10) };
        let mut sim = sim_at(corridor(), config, &[0, 2]);
        sim.assign_task(AgentId(0), NodeId(2)).unwrap();
        sim.assign_task(AgentId(1), NodeId(0)).unwrap();
        sim.run_ticks(5, &mut crate::NoopObserver);
        assert_eq!(sim.registry.status(AgentId(1)), Some(AgentStatus::TaskComplete));
    }
}

// ── Battery & lifecycle ───────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle_tests {
    use super::*;

    #[test]
    fn empty_battery_strands_and_releases() {
        let mut sim = FleetBuilder::new(test_config(10), corridor(), BfsRouter)
            .initial_positions(vec![NodeId(0)])
            .initial_battery(vec![2.0])
            .build()
            .unwrap();
        let a = AgentId(0);
        sim.assign_task(a, NodeId(3)).unwrap();

        sim.step(&mut crate::NoopObserver);
        assert_eq!(sim.registry.battery(a), Some(0.0));
        assert_eq!(sim.arbiter.lane_holder(NodeId(1), NodeId(2)), Some(a));

        sim.step(&mut crate::NoopObserver);
        assert_eq!(sim.registry.status(a), Some(AgentStatus::Idle));
        assert_eq!(sim.registry.location(a), Some(NodeId(1)));
        assert_eq!(sim.registry.next_node(a), None);
        assert!(sim.arbiter.lanes().is_empty());
    }

    #[test]
    fn docks_and_charges_to_full() {
        let mut sim = FleetBuilder::new(test_config(10), corridor(), BfsRouter)
            .initial_positions(vec![NodeId(3)])
            .initial_battery(vec![50.0])
            .build()
            .unwrap();
        let a = AgentId(0);
        assert_eq!(sim.send_to_charger(a).unwrap(), Some(NodeId(4)));

        sim.step(&mut crate::NoopObserver);
        assert_eq!(sim.registry.status(a), Some(AgentStatus::Charging));
        assert_eq!(sim.registry.battery(a), Some(48.0));

        sim.run_ticks(3, &mut crate::NoopObserver);
        assert_eq!(sim.registry.battery(a), Some(100.0));
        assert_eq!(sim.registry.status(a), Some(AgentStatus::Idle));
    }

    #[test]
    fn remove_agent_hands_over_its_lane() {
        let mut sim = sim_at(corridor(), test_config(10), &[0, 2]);
        let (a, b) = (AgentId(0), AgentId(1));
        sim.assign_task(a, NodeId(2)).unwrap();
        sim.assign_task(b, NodeId(0)).unwrap();
        sim.step(&mut crate::NoopObserver);
        assert_eq!(sim.registry.status(b), Some(AgentStatus::Waiting));

        assert_eq!(sim.remove_agent(a).unwrap(), 1);
        assert!(!sim.registry.contains(a));
        assert_eq!(sim.arbiter.lane_holder(NodeId(1), NodeId(2)), Some(b));
        assert_eq!(sim.registry.status(b), Some(AgentStatus::Moving));
        assert!(sim.remove_agent(a).is_err());
    }

    #[test]
    fn run_reports_every_tick() {
        let mut sim = sim_at(corridor(), test_config(5), &[0]);
        let mut rec = Recorder::default();
        sim.run(&mut rec);
        assert_eq!(rec.ticks.len(), 5);
        assert_eq!(rec.snapshots, 5);
        assert_eq!(rec.ended, Some(Tick(5)));
        assert_eq!(sim.now(), Tick(5));
    }
}

// ── Charger reservations ──────────────────────────────────────────────────────

#[cfg(test)]
mod charger_tests {
    use super::*;

    #[test]
    fn low_agents_spread_over_chargers() {
        let mut sim = sim_with_battery(two_chargers(), &[1, 2], &[20.0, 20.0]);
        let (a, b) = (AgentId(0), AgentId(1));

        assert_eq!(sim.check_battery_levels().unwrap(), 2);
        assert_eq!(sim.chargers.of(a), Some(NodeId(0)));
        assert_eq!(sim.chargers.of(b), Some(NodeId(5)));
        assert_eq!(sim.registry.destination[b.index()], NodeId(5));

        // Both already have a reservation.
        assert_eq!(sim.check_battery_levels().unwrap(), 0);
    }

    #[test]
    fn occupied_charger_is_skipped() {
        let mut sim = sim_with_battery(two_chargers(), &[0, 1], &[100.0, 50.0]);
        assert_eq!(sim.send_to_charger(AgentId(1)).unwrap(), Some(NodeId(5)));
        assert_eq!(sim.chargers.holder(NodeId(0)), None);
    }

    /// ```text
    ///         2 ──── 3
    ///         │      │
    ///   4 ─── 0      1
    /// ```
    ///
    /// 1 and 4 are chargers.  1 is nearer as the crow flies but three lanes
    /// away; 4 is one lane away.
    #[test]
    fn shorter_route_beats_straight_line() {
        let charger = NodeAttrs { is_charger: true, ..NodeAttrs::default() };
        let mut b = NavGraphBuilder::new();
        b.add_node(Point::new(0.0, 0.0));
        b.add_node_with(Point::new(1.0, 0.0), charger.clone());
        b.add_node(Point::new(0.0, 5.0));
        b.add_node(Point::new(1.0, 5.0));
        b.add_node_with(Point::new(-3.0, 0.0), charger);
        b.add_lane(NodeId(0), NodeId(2));
        b.add_lane(NodeId(2), NodeId(3));
        b.add_lane(NodeId(3), NodeId(1));
        b.add_lane(NodeId(0), NodeId(4));

        let mut sim = sim_with_battery(b.build(), &[0], &[40.0]);
        assert_eq!(sim.send_to_charger(AgentId(0)).unwrap(), Some(NodeId(4)));
    }

    #[test]
    fn standing_on_a_free_charger_docks_at_once() {
        let mut sim = sim_with_battery(two_chargers(), &[0], &[25.0]);
        let a = AgentId(0);
        assert_eq!(sim.check_battery_levels().unwrap(), 1);
        assert_eq!(sim.registry.status(a), Some(AgentStatus::Charging));
        assert_eq!(sim.chargers.of(a), Some(NodeId(0)));
    }

    #[test]
    fn reservation_is_freed_once_charged() {
        let mut sim = sim_with_battery(two_chargers(), &[4], &[60.0]);
        let a = AgentId(0);
        assert_eq!(sim.send_to_charger(a).unwrap(), Some(NodeId(5)));

        sim.step(&mut crate::NoopObserver);
        assert_eq!(sim.registry.status(a), Some(AgentStatus::Charging));
        assert_eq!(sim.chargers.of(a), Some(NodeId(5)));

        sim.run_ticks(3, &mut crate::NoopObserver);
        assert_eq!(sim.registry.status(a), Some(AgentStatus::Idle));
        assert!(sim.chargers.is_empty());
    }

    #[test]
    fn stranded_agent_gives_up_its_charger() {
        let mut sim = sim_with_battery(two_chargers(), &[2], &[2.0]);
        let a = AgentId(0);
        assert_eq!(sim.send_to_charger(a).unwrap(), Some(NodeId(0)));

        sim.run_ticks(2, &mut crate::NoopObserver);
        assert_eq!(sim.registry.status(a), Some(AgentStatus::Idle));
        assert_eq!(sim.registry.location(a), Some(NodeId(1)));
        assert!(sim.chargers.is_empty());
    }

    #[test]
    fn charger_reserved_by_another_is_not_docked() {
        let mut sim = sim_with_battery(two_chargers(), &[4, 3], &[50.0, 20.0]);
        let (b, a) = (AgentId(0), AgentId(1));
        assert_eq!(sim.send_to_charger(a).unwrap(), Some(NodeId(5)));
        assert!(sim.assign_task(b, NodeId(5)).unwrap());

        sim.step(&mut crate::NoopObserver);
        assert_eq!(sim.registry.location(b), Some(NodeId(5)));
        assert_eq!(sim.registry.status(b), Some(AgentStatus::TaskComplete));
        assert_eq!(sim.chargers.holder(NodeId(5)), Some(a));
    }

    #[test]
    fn busy_flat_or_healthy_agents_are_not_sent() {
        let mut sim = sim_with_battery(two_chargers(), &[1, 3, 4], &[20.0, 80.0, 0.0]);
        assert!(sim.assign_task(AgentId(0), NodeId(3)).unwrap());
        assert_eq!(sim.check_battery_levels().unwrap(), 0);
        assert!(sim.chargers.is_empty());
    }

    #[test]
    fn removing_an_agent_frees_its_charger() {
        let mut sim = sim_with_battery(two_chargers(), &[1], &[20.0]);
        let a = AgentId(0);
        assert_eq!(sim.send_to_charger(a).unwrap(), Some(NodeId(0)));
        sim.remove_agent(a).unwrap();
        assert!(sim.chargers.is_empty());
    }
}
