//! Navigation graph representation and builder.
//!
//! # Data layout
//!
//! Lanes are undirected, but the adjacency is stored as **Compressed Sparse
//! Row (CSR)** directed edges, one per direction.  Given a `NodeId n`, its
//! outgoing edges occupy:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! Edge arrays are sorted by source node (then by destination, for stable
//! neighbor order), so breadth-first search over a node's neighbors is a
//! contiguous scan.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(x, y)` to the nearest `NodeId`, used to snap
//! a clicked or reported position to the closest vertex.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use ft_core::{NodeId, Point};

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f32; 2],
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── Node attributes ───────────────────────────────────────────────────────────

/// Per-vertex metadata carried over from the layout file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeAttrs {
    /// Optional human label ("dock_a", "charger_2", …).
    pub name: Option<String>,
    /// Vertex hosts a charging station.
    pub is_charger: bool,
    /// Vertex is an exclusive-access intersection.
    pub is_intersection: bool,
}

impl NodeAttrs {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), ..Self::default() }
    }
}

// ── NavGraph ──────────────────────────────────────────────────────────────────

/// Undirected lane graph in CSR format plus a spatial index for node snapping.
///
/// Fields are `pub` for direct indexed access.  Do not construct directly;
/// use [`NavGraphBuilder`] or the JSON loader.
pub struct NavGraph {
    /// Layout position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<Point>,

    /// Metadata of each node.  Indexed by `NodeId`.
    pub node_attrs: Vec<NodeAttrs>,

    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    /// Source node of each directed edge.
    pub edge_from: Vec<NodeId>,

    /// Destination node of each directed edge.
    pub edge_to: Vec<NodeId>,

    spatial_idx: RTree<NodeEntry>,
}

impl NavGraph {
    /// Construct an empty graph with no nodes or lanes.
    pub fn empty() -> Self {
        NavGraphBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    /// Number of directed edges (twice the lane count).
    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    /// Number of undirected lanes.
    pub fn lane_count(&self) -> usize {
        self.edge_to.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// `true` if `node` is a vertex of this graph.
    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_pos.len()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the neighbors of `node`, in ascending `NodeId` order.
    #[inline]
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        self.edge_to[start..end].iter().copied()
    }

    /// Number of lanes touching `node`.
    #[inline]
    pub fn degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// `true` if a lane connects `u` and `v` (either direction).
    pub fn has_lane(&self, u: NodeId, v: NodeId) -> bool {
        self.contains(u) && self.contains(v) && self.neighbors(u).any(|n| n == v)
    }

    // ── Attributes ────────────────────────────────────────────────────────

    #[inline]
    pub fn attrs(&self, node: NodeId) -> Option<&NodeAttrs> {
        self.node_attrs.get(node.index())
    }

    pub fn is_charger(&self, node: NodeId) -> bool {
        self.attrs(node).is_some_and(|a| a.is_charger)
    }

    pub fn is_intersection(&self, node: NodeId) -> bool {
        self.attrs(node).is_some_and(|a| a.is_intersection)
    }

    /// All charger vertices, ascending.
    pub fn chargers(&self) -> Vec<NodeId> {
        self.filter_nodes(|a| a.is_charger)
    }

    /// All intersection vertices, ascending.
    pub fn intersections(&self) -> Vec<NodeId> {
        self.filter_nodes(|a| a.is_intersection)
    }

    /// First vertex whose `name` equals `name`.
    pub fn vertex_by_name(&self, name: &str) -> Option<NodeId> {
        self.node_attrs
            .iter()
            .position(|a| a.name.as_deref() == Some(name))
            .map(|i| NodeId(i as u32))
    }

    fn filter_nodes(&self, pred: impl Fn(&NodeAttrs) -> bool) -> Vec<NodeId> {
        self.node_attrs
            .iter()
            .enumerate()
            .filter(|(_, a)| pred(a))
            .map(|(i, _)| NodeId(i as u32))
            .collect()
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Return the `NodeId` of the nearest vertex to `pos`.
    ///
    /// Returns `None` only if the graph has no nodes.
    pub fn snap_to_node(&self, pos: Point) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.x, pos.y])
            .map(|e| e.id)
    }
}

// ── NavGraphBuilder ───────────────────────────────────────────────────────────

/// Construct a [`NavGraph`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use ft_core::Point;
/// use ft_graph::NavGraphBuilder;
///
/// let mut b = NavGraphBuilder::new();
/// let a = b.add_node(Point::new(0.0, 0.0));
/// let c = b.add_node(Point::new(1.0, 0.0));
/// b.add_lane(a, c);
/// let graph = b.build();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.lane_count(), 1);
/// ```
pub struct NavGraphBuilder {
    nodes:               Vec<Point>,
    attrs:               Vec<NodeAttrs>,
    lanes:               Vec<(NodeId, NodeId)>,
    junction_min_degree: Option<usize>,
}

impl NavGraphBuilder {
    pub fn new() -> Self {
        Self {
            nodes:               Vec::new(),
            attrs:               Vec::new(),
            lanes:               Vec::new(),
            junction_min_degree: None,
        }
    }

    /// Add a vertex with default attributes and return its `NodeId`
    /// (sequential from 0).
    pub fn add_node(&mut self, pos: Point) -> NodeId {
        self.add_node_with(pos, NodeAttrs::default())
    }

    pub fn add_node_with(&mut self, pos: Point, attrs: NodeAttrs) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        self.attrs.push(attrs);
        id
    }

    /// Add an undirected lane between `a` and `b`.
    ///
    /// Self-loops and duplicate lanes are dropped at `build()`.
    pub fn add_lane(&mut self, a: NodeId, b: NodeId) {
        self.lanes.push((a, b));
    }

    /// Flag `node` as an exclusive-access intersection.
    pub fn mark_intersection(&mut self, node: NodeId) {
        if let Some(a) = self.attrs.get_mut(node.index()) {
            a.is_intersection = true;
        }
    }

    /// At `build()`, also flag every vertex with at least `min_degree` lanes
    /// as an intersection.
    pub fn junctions_from_degree(mut self, min_degree: usize) -> Self {
        self.junction_min_degree = Some(min_degree);
        self
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn lane_count(&self) -> usize { self.lanes.len() }

    /// Consume the builder and produce a [`NavGraph`].
    pub fn build(self) -> NavGraph {
        let node_count = self.nodes.len();

        // Expand each lane into both directions, drop self-loops and repeats.
        let mut directed: Vec<(NodeId, NodeId)> = self
            .lanes
            .iter()
            .filter(|(a, b)| a != b)
            .flat_map(|&(a, b)| [(a, b), (b, a)])
            .collect();
        directed.sort_unstable();
        directed.dedup();

        let edge_from: Vec<NodeId> = directed.iter().map(|e| e.0).collect();
        let edge_to:   Vec<NodeId> = directed.iter().map(|e| e.1).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for &(from, _) in &directed {
            node_out_start[from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }

        let mut node_attrs = self.attrs;
        if let Some(min_degree) = self.junction_min_degree {
            for (i, attrs) in node_attrs.iter_mut().enumerate() {
                let degree = (node_out_start[i + 1] - node_out_start[i]) as usize;
                if degree >= min_degree {
                    attrs.is_intersection = true;
                }
            }
        }

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry {
                point: [pos.x, pos.y],
                id: NodeId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        NavGraph {
            node_pos: self.nodes,
            node_attrs,
            node_out_start,
            edge_from,
            edge_to,
            spatial_idx,
        }
    }
}

impl Default for NavGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
