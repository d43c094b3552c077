//! `ft-arbiter` — mutual exclusion on lanes and intersections.
//!
//! The [`TrafficArbiter`] owns every piece of concurrency-control state for
//! the shared graph and exposes a request/release protocol to each agent's
//! movement loop.  A denied request never blocks: it returns `false`, records
//! the agent as waiting, and the agent is re-admitted by a later release.
//!
//! # Crate layout
//!
//! | Module            | Contents                                              |
//! |-------------------|-------------------------------------------------------|
//! | [`lanes`]         | `LaneTable` — lane key → holder                       |
//! | [`waits`]         | `LaneWaitRegistry` (insertion-ordered), `Intentions`  |
//! | [`intersections`] | `IntersectionTable` — node → holder + FIFO queue      |
//! | [`arbiter`]       | `TrafficArbiter` — the protocol and wake logic        |
//! | [`event`]         | `TrafficEvent`, `Severity` — one per transition       |
//! | [`config`]        | `ArbiterConfig`                                       |
//! | [`shared`]        | `SharedArbiter<G>` — arbiter + registry behind one lock |
//!
//! # Re-admission order
//!
//! | Resource     | Wake path                         | Order                     |
//! |--------------|-----------------------------------|---------------------------|
//! | Lane         | lane-wait scan, then waiting-agent scan | first match in registry order |
//! | Intersection | queue advance                     | strict FIFO per node      |
//!
//! One agent is admitted per successful free/release.  Lane re-admission is
//! not FIFO by request time: a wait that is superseded keeps its original
//! slot in the lane-wait registry.

pub mod arbiter;
pub mod config;
pub mod event;
pub mod intersections;
pub mod lanes;
pub mod shared;
pub mod waits;


pub use arbiter::TrafficArbiter;
pub use config::ArbiterConfig;
pub use event::{Severity, TrafficEvent};
pub use intersections::IntersectionTable;
pub use lanes::LaneTable;
pub use shared::SharedArbiter;
pub use waits::{Intention, Intentions, LaneWait, LaneWaitRegistry};
