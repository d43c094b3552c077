//! Built-in warehouse floor used when no layout file is given.
//!
//! ```text
//!   C0 ── A1 ── A2 ── A3
//!          │     │     │
//!          B1 ──[B2]── B3
//!          │     │     │
//!         D1 ── D2 ── D3 ── C1
//! ```
//!
//! `C0`/`C1` are charging stations; the middle row is the cross aisle and
//! `B2`, where four lanes meet, is an intersection.  Neighbouring
//! intersections can hold each other up, so only the centre one is marked.

use ft_core::{NodeId, Point};
use ft_graph::{NavGraph, NavGraphBuilder, NodeAttrs};

/// Build the 11-node demo floor.
///
/// Returns `(graph, [charger_west, charger_east])`.
pub fn build_warehouse() -> (NavGraph, [NodeId; 2]) {
    let mut b = NavGraphBuilder::new();

    let charger_west = b.add_node_with(
        Point::new(0.0, 0.0),
        NodeAttrs { is_charger: true, ..NodeAttrs::named("charger_west") },
    );

    let mut grid = [[NodeId(0); 3]; 3];
    for (row, label) in ["aisle", "cross", "dock"].iter().enumerate() {
        for col in 0..3 {
            let pos = Point::new((col + 1) as f32 * 4.0, row as f32 * 3.0);
            grid[row][col] = b.add_node_with(pos, NodeAttrs::named(format!("{label}_{}", col + 1)));
        }
    }

    let charger_east = b.add_node_with(
        Point::new(16.0, 6.0),
        NodeAttrs { is_charger: true, ..NodeAttrs::named("charger_east") },
    );

    for row in 0..3 {
        for col in 0..2 {
            b.add_lane(grid[row][col], grid[row][col + 1]);
        }
    }
    for col in 0..3 {
        b.add_lane(grid[0][col], grid[1][col]);
        b.add_lane(grid[1][col], grid[2][col]);
    }
    b.add_lane(charger_west, grid[0][0]);
    b.add_lane(grid[2][2], charger_east);

    b.mark_intersection(grid[1][1]);

    (b.build(), [charger_west, charger_east])
}
