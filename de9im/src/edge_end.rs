//! Edge ends: the directed stubs an edge contributes at each node it passes
//! through.
//!
//! Once an edge's intersection points are known, the edge is conceptually
//! split there. At every split point the edge contributes up to two stubs,
//! one toward the previous piece of linework and one toward the next. The
//! stubs around one node, sorted counter-clockwise, are what node labelling
//! works on.

use std::cmp::Ordering;

use crate::edge::{Edge, EdgeIntersection};
use crate::geom::{orient, Point};
use crate::label::Label;

#[derive(Clone, Debug)]
pub struct EdgeEnd {
    /// The node this stub is attached to.
    pub coord: Point,
    /// A second point giving the stub's direction away from the node.
    pub dir: Point,
    pub label: Label,
    /// The first coordinate of the parent edge, identifying which piece of
    /// original linework the stub came from.
    pub edge_start: Point,
}

impl EdgeEnd {
    fn quadrant(&self) -> u8 {
        let dx = (self.dir.x - self.coord.x).into_inner();
        let dy = (self.dir.y - self.coord.y).into_inner();
        debug_assert!(dx != 0.0 || dy != 0.0);
        match (dx >= 0.0, dy >= 0.0) {
            (true, true) => 0,
            (false, true) => 1,
            (false, false) => 2,
            (true, false) => 3,
        }
    }

    /// Counter-clockwise-from-east order of stub directions around a shared
    /// node. The quadrant decides first; within a quadrant the orientation
    /// test does, so the comparison is exact.
    pub fn compare_direction(&self, other: &EdgeEnd) -> Ordering {
        debug_assert_eq!(self.coord, other.coord);
        if self.dir == other.dir {
            return Ordering::Equal;
        }
        match self.quadrant().cmp(&other.quadrant()) {
            Ordering::Equal => match orient(other.coord, other.dir, self.dir) {
                1 => Ordering::Greater,
                -1 => Ordering::Less,
                _ => Ordering::Equal,
            },
            unequal => unequal,
        }
    }
}

/// Splits every edge at its intersection points and collects the stubs.
pub fn edge_ends(edges: &mut [Edge]) -> Vec<EdgeEnd> {
    let mut out = Vec::new();
    for e in edges.iter_mut() {
        if e.pts.len() < 2 {
            continue;
        }
        e.add_endpoints();
        let items: Vec<EdgeIntersection> = e.intersections.iter().copied().collect();
        for k in 0..items.len() {
            let prev = k.checked_sub(1).map(|k| items[k]);
            let next = items.get(k + 1).copied();
            out.extend(stub_towards_prev(e, items[k], prev));
            out.extend(stub_towards_next(e, items[k], next));
        }
    }
    out
}

/// The stub pointing back along the edge, or `None` at the edge's start.
/// Since it runs against the edge direction, its side locations are flipped.
fn stub_towards_prev(
    edge: &Edge,
    curr: EdgeIntersection,
    prev: Option<EdgeIntersection>,
) -> Option<EdgeEnd> {
    let mut i_prev = curr.segment_index;
    if curr.dist.into_inner() == 0.0 {
        if i_prev == 0 {
            return None;
        }
        i_prev -= 1;
    }
    let mut dir = edge.pts[i_prev];
    // A nearer intersection on the same segment truncates the stub.
    if let Some(prev) = prev {
        if prev.segment_index >= i_prev {
            dir = prev.coord;
        }
    }
    if dir == curr.coord {
        return None;
    }
    let mut label = edge.label;
    label.flip();
    Some(EdgeEnd {
        coord: curr.coord,
        dir,
        label,
        edge_start: edge.pts[0],
    })
}

/// The stub pointing forward along the edge, or `None` at the edge's end.
fn stub_towards_next(
    edge: &Edge,
    curr: EdgeIntersection,
    next: Option<EdgeIntersection>,
) -> Option<EdgeEnd> {
    let i_next = curr.segment_index + 1;
    let dir = match next {
        Some(n) if n.segment_index == curr.segment_index => n.coord,
        _ if i_next < edge.pts.len() => edge.pts[i_next],
        _ => return None,
    };
    if dir == curr.coord {
        return None;
    }
    Some(EdgeEnd {
        coord: curr.coord,
        dir,
        label: edge.label,
        edge_start: edge.pts[0],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::{Location, Position};

    fn p(x: f64, y: f64) -> Point {
        Point::from((x, y))
    }

    fn end(coord: Point, dir: Point) -> EdgeEnd {
        EdgeEnd {
            coord,
            dir,
            label: Label::empty_line(),
            edge_start: coord,
        }
    }

    #[test]
    fn direction_order_is_ccw_from_east() {
        let o = p(0.0, 0.0);
        let dirs = [
            p(1.0, 0.0),
            p(1.0, 1.0),
            p(0.0, 1.0),
            p(-1.0, 1.0),
            p(-1.0, 0.0),
            p(-1.0, -1.0),
            p(0.0, -1.0),
            p(1.0, -1.0),
        ];
        for w in dirs.windows(2) {
            assert_eq!(
                end(o, w[0]).compare_direction(&end(o, w[1])),
                Ordering::Less,
                "{:?} should sort before {:?}",
                w[0],
                w[1]
            );
        }
    }

    #[test]
    fn parallel_stubs_compare_equal() {
        let o = p(0.0, 0.0);
        assert_eq!(
            end(o, p(1.0, 1.0)).compare_direction(&end(o, p(2.0, 2.0))),
            Ordering::Equal
        );
    }

    #[test]
    fn open_line_produces_interior_stubs_at_endpoints() {
        let mut edges = vec![Edge::new(
            vec![p(0.0, 0.0), p(2.0, 0.0)],
            Label::line(0, Location::Interior),
        )];
        let ends = edge_ends(&mut edges);
        // One forward stub at the start, one backward stub at the end.
        assert_eq!(ends.len(), 2);
        assert_eq!(ends[0].coord, p(0.0, 0.0));
        assert_eq!(ends[0].dir, p(2.0, 0.0));
        assert_eq!(ends[1].coord, p(2.0, 0.0));
        assert_eq!(ends[1].dir, p(0.0, 0.0));
    }

    #[test]
    fn intersection_splits_an_edge_into_four_stubs() {
        let mut edges = vec![Edge::new(
            vec![p(0.0, 0.0), p(2.0, 0.0)],
            Label::line(0, Location::Interior),
        )];
        edges[0].add_intersection(p(1.0, 0.0), 0);
        let ends = edge_ends(&mut edges);
        assert_eq!(ends.len(), 4);
        let at_split: Vec<&EdgeEnd> = ends.iter().filter(|e| e.coord == p(1.0, 0.0)).collect();
        assert_eq!(at_split.len(), 2);
    }

    #[test]
    fn backward_stub_flips_sides() {
        let mut edges = vec![Edge::new(
            vec![p(0.0, 0.0), p(2.0, 0.0)],
            Label::area(0, Location::Boundary, Location::Interior, Location::Exterior),
        )];
        let ends = edge_ends(&mut edges);
        let fwd = &ends[0];
        let back = &ends[1];
        assert_eq!(fwd.label.location_at(0, Position::Left), Some(Location::Interior));
        assert_eq!(back.label.location_at(0, Position::Left), Some(Location::Exterior));
    }

    #[test]
    fn ring_start_gets_stubs_both_ways() {
        let mut edges = vec![Edge::new(
            vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0), p(0.0, 0.0)],
            Label::area(0, Location::Boundary, Location::Exterior, Location::Interior),
        )];
        let ends = edge_ends(&mut edges);
        assert_eq!(ends.len(), 2);
        assert!(ends.iter().all(|e| e.coord == p(0.0, 0.0)));
        assert!(ends.iter().any(|e| e.dir == p(1.0, 0.0)));
        assert!(ends.iter().any(|e| e.dir == p(0.0, 1.0)));
    }
}
