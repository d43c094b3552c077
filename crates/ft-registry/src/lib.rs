//! `ft-registry` — the agent registry collaborator.
//!
//! The traffic arbiter never owns agents.  It reads an agent's status,
//! location and next node, and flips its status between `Waiting` and
//! `Moving`, through the [`AgentRegistry`] trait.  [`FleetRegistry`] is the
//! in-memory Structure-of-Arrays implementation used by the movement
//! controller and the tests.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`registry`]  | `AgentRegistry` trait                                   |
//! | [`store`]     | `FleetRegistry` (SoA arrays: status, location, path, …) |

pub mod registry;
pub mod store;

#[cfg(test)]
mod tests;

pub use registry::AgentRegistry;
pub use store::FleetRegistry;
