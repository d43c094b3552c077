//! JSON navigation-graph loader.
//!
//! # File format
//!
//! ```json
//! {
//!   "levels": {
//!     "level1": {
//!       "vertices": [[0.0, 0.0, {"name": "dock", "is_charger": true}],
//!                    [4.0, 0.0, {}]],
//!       "lanes":    [[0, 1, {"speed_limit": 1.5}]]
//!     }
//!   }
//! }
//! ```
//!
//! The first level found among `level1`, `l0`, `l1` (in that order) is loaded;
//! other levels are ignored.  Vertex ids are the positions in `vertices`.
//! Unknown attribute keys are ignored.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use ft_core::{NodeId, Point};

use crate::network::{NavGraph, NavGraphBuilder, NodeAttrs};
use crate::{GraphError, GraphResult};

/// Level keys tried in order.
const LEVEL_KEYS: &[&str] = &["level1", "l0", "l1"];

// ── JSON records ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct GraphFile {
    levels: HashMap<String, Level>,
}

#[derive(Deserialize)]
struct Level {
    #[serde(default)]
    vertices: Vec<(f32, f32, VertexRecord)>,
    #[serde(default)]
    lanes: Vec<(u32, u32, serde_json::Value)>,
}

#[derive(Deserialize, Default)]
struct VertexRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    is_charger: bool,
    #[serde(default)]
    is_intersection: bool,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a navigation graph from a JSON file at `path`.
pub fn load_nav_graph(path: &Path) -> GraphResult<NavGraph> {
    let mut json = String::new();
    BufReader::new(File::open(path)?).read_to_string(&mut json)?;
    load_nav_graph_str(&json)
}

/// Load a navigation graph from an in-memory JSON document.
pub fn load_nav_graph_str(json: &str) -> GraphResult<NavGraph> {
    let mut file: GraphFile = serde_json::from_str(json)?;

    let level = LEVEL_KEYS
        .iter()
        .find_map(|key| file.levels.remove(*key))
        .ok_or(GraphError::MissingLevel { expected: LEVEL_KEYS })?;

    let vertex_count = level.vertices.len();
    let mut b = NavGraphBuilder::new();

    for (x, y, v) in level.vertices {
        b.add_node_with(
            Point::new(x, y),
            NodeAttrs {
                name:            v.name,
                is_charger:      v.is_charger,
                is_intersection: v.is_intersection,
            },
        );
    }

    for (index, (u, v, _attrs)) in level.lanes.into_iter().enumerate() {
        for vertex in [u, v] {
            if vertex as usize >= vertex_count {
                return Err(GraphError::DanglingLane { index, vertex, count: vertex_count });
            }
        }
        b.add_lane(NodeId(u), NodeId(v));
    }

    Ok(b.build())
}
