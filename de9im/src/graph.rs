//! The topology graph of a single input geometry.

use crate::edge::Edge;
use crate::geom::Point;
use crate::geometry::{is_ccw, Geometry, Polygon};
use crate::intersect::LineIntersector;
use crate::label::{Label, Location};
use crate::node::{insert_boundary_point, insert_point, Node, NodeMap};
use crate::noding::SegmentIntersector;

/// The edges and nodes of one input geometry, tagged with which of the two
/// relate arguments it is (`0` or `1`). Labels written by this graph go into
/// that element of each [`Label`].
#[derive(Clone, Debug)]
pub struct GeometryGraph {
    arg_index: usize,
    geometry: Geometry,
    pub(crate) edges: Vec<Edge>,
    nodes: NodeMap,
}

impl GeometryGraph {
    pub fn new(arg_index: usize, geometry: Geometry) -> Self {
        assert!(arg_index < 2);
        let mut edges = Vec::new();
        let mut nodes = NodeMap::default();
        match &geometry {
            Geometry::Point(p) => {
                insert_point(&mut nodes, arg_index, *p, Location::Interior);
            }
            Geometry::Line(pts) => add_line(&mut edges, &mut nodes, arg_index, pts),
            Geometry::Area(polys) => {
                for poly in polys {
                    add_polygon(&mut edges, &mut nodes, arg_index, poly);
                }
            }
        }
        GeometryGraph {
            arg_index,
            geometry,
            edges,
            nodes,
        }
    }

    pub fn arg_index(&self) -> usize {
        self.arg_index
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn boundary_points(&self) -> Vec<Point> {
        self.nodes
            .iter()
            .filter(|n| n.label.location(self.arg_index) == Some(Location::Boundary))
            .map(|n| n.coord)
            .collect()
    }

    /// Nodes this geometry against itself: records self-intersections on the
    /// edges and turns them into graph nodes. Returns the intersection
    /// report, which is what area validity checking looks at.
    pub fn self_nodes(&mut self, li: &LineIntersector) -> SegmentIntersector {
        let mut si = SegmentIntersector::new(true, false);
        si.compute_self_intersections(li, &mut self.edges);
        self.add_self_intersection_nodes();
        si
    }

    /// Nodes this geometry against another one. Proper crossings are only
    /// recorded on the edges when `include_proper` is set; either way any
    /// intersection marks both edges as not isolated.
    pub fn edge_intersections(
        &mut self,
        other: &mut GeometryGraph,
        li: &LineIntersector,
        include_proper: bool,
    ) -> SegmentIntersector {
        let mut si = SegmentIntersector::new(include_proper, true);
        let mut boundary = self.boundary_points();
        boundary.extend(other.boundary_points());
        si.set_boundary_points(boundary);
        si.compute_cross_intersections(li, &mut self.edges, &mut other.edges);
        si
    }

    fn add_self_intersection_nodes(&mut self) {
        let arg = self.arg_index;
        for e in &self.edges {
            let e_loc = e.label.location(arg);
            for ei in e.intersections.iter() {
                // An existing boundary node wins over any self-intersection.
                let already_boundary = self
                    .nodes
                    .find(ei.coord)
                    .is_some_and(|n| n.label.location(arg) == Some(Location::Boundary));
                if already_boundary {
                    continue;
                }
                if e_loc == Some(Location::Boundary) {
                    insert_boundary_point(&mut self.nodes, arg, ei.coord);
                } else {
                    insert_point(&mut self.nodes, arg, ei.coord, Location::Interior);
                }
            }
        }
    }
}

fn dedup(pts: &[Point]) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(pts.len());
    for &p in pts {
        if out.last() != Some(&p) {
            out.push(p);
        }
    }
    out
}

fn add_line(edges: &mut Vec<Edge>, nodes: &mut NodeMap, arg: usize, pts: &[Point]) {
    let pts = dedup(pts);
    if pts.len() < 2 {
        return;
    }
    // Endpoints go through the mod-2 rule, so the endpoints of a closed line
    // coincide and cancel to interior.
    insert_boundary_point(nodes, arg, pts[0]);
    insert_boundary_point(nodes, arg, *pts.last().unwrap());
    edges.push(Edge::new(pts, Label::line(arg, Location::Interior)));
}

fn add_polygon(edges: &mut Vec<Edge>, nodes: &mut NodeMap, arg: usize, poly: &Polygon) {
    add_ring(edges, nodes, arg, &poly.shell, Location::Exterior, Location::Interior);
    for hole in &poly.holes {
        add_ring(edges, nodes, arg, hole, Location::Interior, Location::Exterior);
    }
}

/// `cw_left` and `cw_right` are the side locations assuming the ring winds
/// clockwise; they are swapped for counter-clockwise rings.
fn add_ring(
    edges: &mut Vec<Edge>,
    nodes: &mut NodeMap,
    arg: usize,
    ring: &[Point],
    cw_left: Location,
    cw_right: Location,
) {
    let pts = dedup(ring);
    if pts.len() < 4 {
        return;
    }
    let (left, right) = if is_ccw(&pts) {
        (cw_right, cw_left)
    } else {
        (cw_left, cw_right)
    };
    insert_point(nodes, arg, pts[0], Location::Boundary);
    edges.push(Edge::new(
        pts,
        Label::area(arg, Location::Boundary, left, right),
    ));
}
