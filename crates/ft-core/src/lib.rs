//! `ft-core` — foundational types for the fleet traffic workspace.
//!
//! This crate is a dependency of every other `ft-*` crate.  It has no `ft-*`
//! dependencies and minimal external ones (only `rand`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `NodeId`                                   |
//! | [`lane`]        | `LaneKey` — canonical undirected lane identifier      |
//! | [`status`]      | `AgentStatus` enum                                    |
//! | [`geo`]         | `Point` (planar x/y)                                  |
//! | [`time`]        | `Tick`, `FleetClock`, `FleetConfig`                   |
//! | [`rng`]         | `FleetRng` (seeded, deterministic)                    |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod geo;
pub mod ids;
pub mod lane;
pub mod rng;
pub mod status;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use geo::Point;
pub use ids::{AgentId, NodeId};
pub use lane::LaneKey;
pub use rng::FleetRng;
pub use status::AgentStatus;
pub use time::{FleetClock, FleetConfig, Tick};
