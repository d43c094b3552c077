//! `ft-graph` — navigation graph, loading, and path planning.
//!
//! The graph is an external, read-only input to the traffic arbiter: the
//! arbiter only ever sees `NodeId` pairs.  This crate builds that topology and
//! answers the planner's shortest-path queries.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`network`] | `NavGraph` (CSR + R-tree), `NavGraphBuilder`, `NodeAttrs`   |
//! | [`loader`]  | `load_nav_graph`, `load_nav_graph_str` (JSON levels format) |
//! | [`router`]  | `Router` trait, `Path`, `BfsRouter`                         |
//! | [`error`]   | `GraphError`, `GraphResult<T>`                              |

pub mod error;
pub mod loader;
pub mod network;
pub mod router;


pub use error::{GraphError, GraphResult};
pub use loader::{load_nav_graph, load_nav_graph_str};
pub use network::{NavGraph, NavGraphBuilder, NodeAttrs};
pub use router::{BfsRouter, Path, Router};
