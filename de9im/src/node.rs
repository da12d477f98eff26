//! Nodes of a topology graph.

use std::collections::BTreeMap;

use crate::geom::Point;
use crate::label::{Label, Location};

#[derive(Clone, Debug)]
pub struct Node {
    pub coord: Point,
    pub label: Label,
}

impl Node {
    pub fn new(coord: Point) -> Self {
        Node {
            coord,
            label: Label::empty_line(),
        }
    }
}

/// The nodes of a graph, keyed by coordinate. Iteration order is the `Point`
/// order (x, then y), which keeps everything downstream deterministic.
#[derive(Clone, Debug, Default)]
pub struct NodeMap {
    map: BTreeMap<Point, Node>,
}

impl NodeMap {
    pub fn add(&mut self, coord: Point) -> &mut Node {
        self.map.entry(coord).or_insert_with(|| Node::new(coord))
    }

    pub fn find(&self, coord: Point) -> Option<&Node> {
        self.map.get(&coord)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.map.values()
    }
}

/// Sets the `on` location of a node, overwriting whatever was there.
pub fn insert_point(nodes: &mut NodeMap, index: usize, coord: Point, loc: Location) {
    nodes.add(coord).label.set_on(index, loc);
}

/// Adds a boundary point under the mod-2 rule: a point that occurs in the
/// boundary an even number of times is interior.
pub fn insert_boundary_point(nodes: &mut NodeMap, index: usize, coord: Point) {
    nodes.add(coord).label.toggle_boundary(index);
}
