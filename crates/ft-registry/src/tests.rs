//! Unit tests for ft-registry.

#[cfg(test)]
mod population {
    use ft_core::{AgentId, AgentStatus, NodeId};
    use crate::{AgentRegistry, FleetRegistry};

    #[test]
    fn spawn_assigns_sequential_ids() {
        let mut reg = FleetRegistry::new();
        let a = reg.spawn(NodeId(3), 100.0);
        let b = reg.spawn(NodeId(4), 80.0);
        assert_eq!(a, AgentId(0));
        assert_eq!(b, AgentId(1));
        assert_eq!(reg.count(), 2);
        assert_eq!(reg.location(b), Some(NodeId(4)));
        assert_eq!(reg.status(a), Some(AgentStatus::Idle));
        assert_eq!(reg.battery(b), Some(80.0));
        assert_eq!(reg.next_node(a), None);
    }

    #[test]
    fn unknown_agent_queries_are_none() {
        let mut reg = FleetRegistry::new();
        assert!(!reg.contains(AgentId(0)));
        assert_eq!(reg.status(AgentId(0)), None);
        assert!(!reg.set_status(AgentId(0), AgentStatus::Moving));
        assert_eq!(reg.location(AgentId::INVALID), None);
    }

    #[test]
    fn retire_keeps_slot_but_unregisters() {
        let mut reg = FleetRegistry::with_capacity(2);
        let a = reg.spawn(NodeId(0), 100.0);
        let b = reg.spawn(NodeId(1), 100.0);
        assert!(reg.retire(a));
        assert!(!reg.retire(a));
        assert!(!reg.contains(a));
        assert_eq!(reg.count(), 2);
        assert_eq!(reg.active_count(), 1);
        assert_eq!(reg.agent_ids(), vec![b]);
    }

    #[test]
    fn set_status_roundtrip() {
        let mut reg = FleetRegistry::new();
        let a = reg.spawn(NodeId(0), 100.0);
        assert!(reg.set_status(a, AgentStatus::Waiting));
        assert_eq!(reg.status(a), Some(AgentStatus::Waiting));
    }
}

#[cfg(test)]
mod paths {
    use ft_core::{AgentStatus, NodeId};
    use crate::{AgentRegistry, FleetRegistry};

    #[test]
    fn multi_node_path_sets_next_and_destination() {
        let mut reg = FleetRegistry::new();
        let a = reg.spawn(NodeId(0), 100.0);
        reg.set_path(a, vec![NodeId(0), NodeId(1), NodeId(2)]);
        assert_eq!(reg.next_node(a), Some(NodeId(1)));
        assert_eq!(reg.destination[a.index()], NodeId(2));
        assert_eq!(reg.remaining_path(a), &[NodeId(1), NodeId(2)]);
    }

    #[test]
    fn advance_walks_the_path() {
        let mut reg = FleetRegistry::new();
        let a = reg.spawn(NodeId(0), 100.0);
        reg.set_path(a, vec![NodeId(0), NodeId(1), NodeId(2)]);

        assert_eq!(reg.advance(a), Some(NodeId(0)));
        assert_eq!(reg.location(a), Some(NodeId(1)));
        assert_eq!(reg.next_node(a), Some(NodeId(2)));

        assert_eq!(reg.advance(a), Some(NodeId(1)));
        assert_eq!(reg.location(a), Some(NodeId(2)));
        assert_eq!(reg.next_node(a), None);
        assert!(reg.remaining_path(a).is_empty());

        assert_eq!(reg.advance(a), None);
    }

    #[test]
    fn single_node_path_at_location_completes() {
        let mut reg = FleetRegistry::new();
        let a = reg.spawn(NodeId(5), 100.0);
        reg.set_path(a, vec![NodeId(5)]);
        assert_eq!(reg.status(a), Some(AgentStatus::TaskComplete));
        assert_eq!(reg.next_node(a), None);
    }

    #[test]
    fn empty_path_reverts_moving_to_idle() {
        let mut reg = FleetRegistry::new();
        let a = reg.spawn(NodeId(0), 100.0);
        reg.set_path(a, vec![NodeId(0), NodeId(1)]);
        reg.set_status(a, AgentStatus::Moving);
        reg.set_path(a, vec![]);
        assert_eq!(reg.status(a), Some(AgentStatus::Idle));
        assert_eq!(reg.next_node(a), None);
    }

    #[test]
    fn empty_path_leaves_charging_alone() {
        let mut reg = FleetRegistry::new();
        let a = reg.spawn(NodeId(0), 100.0);
        reg.set_status(a, AgentStatus::Charging);
        reg.set_path(a, vec![]);
        assert_eq!(reg.status(a), Some(AgentStatus::Charging));
    }
}

#[cfg(test)]
mod battery {
    use ft_core::NodeId;
    use crate::FleetRegistry;

    #[test]
    fn drain_clamps_at_zero() {
        let mut reg = FleetRegistry::new();
        let a = reg.spawn(NodeId(0), 3.0);
        assert_eq!(reg.drain_battery(a, 2.0), 1.0);
        assert_eq!(reg.drain_battery(a, 2.0), 0.0);
    }

    #[test]
    fn charge_caps_at_full() {
        let mut reg = FleetRegistry::new();
        let a = reg.spawn(NodeId(0), 90.0);
        assert_eq!(reg.charge(a, 20.0), 100.0);
    }
}
