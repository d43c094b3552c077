//! `ft-fleet` — movement controller for the fleet traffic workspace.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   for agent in registry (ascending AgentId):
//!     Moving            → reserve the intersection at the next node (if
//!                         any), acquire the lane ahead, traverse, free the
//!                         lane behind, acquire the next move
//!     Waiting           → retry acquisition if `poll_waiting`, else wait
//!                         for the arbiter to flip it back to Moving
//!     Charging          → gain `charge_per_tick`; Idle once full, which
//!                         frees its charger reservation
//!   forward drained TrafficEvents to the observer
//!   snapshot every `output_interval_ticks`
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ft_core::{FleetConfig, NodeId};
//! use ft_fleet::{FleetBuilder, NoopObserver};
//! use ft_graph::BfsRouter;
//!
//! let mut sim = FleetBuilder::new(FleetConfig::default(), graph, BfsRouter)
//!     .initial_positions(vec![NodeId(0), NodeId(3)])
//!     .build()?;
//! sim.assign_task(AgentId(0), NodeId(5))?;
//! sim.run(&mut NoopObserver);
//! ```

pub mod builder;
pub mod chargers;
pub mod error;
pub mod observer;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::FleetBuilder;
pub use chargers::ChargerReservations;
pub use error::{FleetError, FleetResult};
pub use observer::{FleetObserver, NoopObserver};
pub use sim::FleetSim;
