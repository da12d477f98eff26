//! Brute-force noding: finding the intersections among the segments of one
//! or two edge sets, and recording them on the edges.

use crate::edge::Edge;
use crate::geom::Point;
use crate::intersect::{LineIntersector, SegmentIntersection};

/// Runs segment/segment intersection over edge sets and doubles as the
/// report of what was found.
///
/// `include_proper` controls whether proper crossings are recorded on the
/// edges (they are always reported via the flags). When noding a geometry
/// against itself it is on; when noding two geometries against each other it
/// is off, because proper crossings are folded into the result wholesale
/// rather than node by node.
#[derive(Clone, Debug)]
pub struct SegmentIntersector {
    include_proper: bool,
    record_isolated: bool,
    boundary_points: Vec<Point>,
    has_intersection: bool,
    has_proper: bool,
    has_proper_interior: bool,
    proper_point: Option<Point>,
}

impl SegmentIntersector {
    pub fn new(include_proper: bool, record_isolated: bool) -> Self {
        SegmentIntersector {
            include_proper,
            record_isolated,
            boundary_points: Vec::new(),
            has_intersection: false,
            has_proper: false,
            has_proper_interior: false,
            proper_point: None,
        }
    }

    /// Provides the boundary points of the input geometries, used to tell
    /// proper interior intersections from proper intersections at a boundary
    /// point.
    pub fn set_boundary_points(&mut self, pts: Vec<Point>) {
        self.boundary_points = pts;
    }

    pub fn has_intersection(&self) -> bool {
        self.has_intersection
    }

    pub fn has_proper_intersection(&self) -> bool {
        self.has_proper
    }

    pub fn has_proper_interior_intersection(&self) -> bool {
        self.has_proper_interior
    }

    pub fn proper_intersection_point(&self) -> Option<Point> {
        self.proper_point
    }

    /// Nodes every pair of distinct segments within one edge set.
    pub fn compute_self_intersections(&mut self, li: &LineIntersector, edges: &mut [Edge]) {
        for i in 0..edges.len() {
            for j in i..edges.len() {
                for s0 in 0..edges[i].pts.len().saturating_sub(1) {
                    let s1_start = if i == j { s0 + 1 } else { 0 };
                    for s1 in s1_start..edges[j].pts.len().saturating_sub(1) {
                        let hit = {
                            let (a0, a1) = (edges[i].pts[s0], edges[i].pts[s0 + 1]);
                            let (b0, b1) = (edges[j].pts[s1], edges[j].pts[s1 + 1]);
                            li.intersect(a0, a1, b0, b1)
                        };
                        if matches!(hit, SegmentIntersection::None) {
                            continue;
                        }
                        // Adjacent segments of one edge always meet at their
                        // shared vertex; that's not a node.
                        if i == j && is_trivial(&edges[i], s0, s1, &hit) {
                            continue;
                        }
                        self.record(&hit);
                        if self.should_record_points(&hit) {
                            add_to_edge(&mut edges[i], s0, &hit);
                            add_to_edge(&mut edges[j], s1, &hit);
                        }
                    }
                }
            }
        }
    }

    /// Nodes every segment of one edge set against every segment of another.
    pub fn compute_cross_intersections(
        &mut self,
        li: &LineIntersector,
        edges0: &mut [Edge],
        edges1: &mut [Edge],
    ) {
        for e0 in edges0.iter_mut() {
            for e1 in edges1.iter_mut() {
                for s0 in 0..e0.pts.len().saturating_sub(1) {
                    for s1 in 0..e1.pts.len().saturating_sub(1) {
                        let hit = li.intersect(e0.pts[s0], e0.pts[s0 + 1], e1.pts[s1], e1.pts[s1 + 1]);
                        if matches!(hit, SegmentIntersection::None) {
                            continue;
                        }
                        if self.record_isolated {
                            e0.isolated = false;
                            e1.isolated = false;
                        }
                        self.record(&hit);
                        if self.should_record_points(&hit) {
                            add_to_edge(e0, s0, &hit);
                            add_to_edge(e1, s1, &hit);
                        }
                    }
                }
            }
        }
    }

    fn record(&mut self, hit: &SegmentIntersection) {
        self.has_intersection = true;
        if let SegmentIntersection::Point { pt, proper: true } = hit {
            self.has_proper = true;
            self.proper_point = Some(*pt);
            if !self.boundary_points.contains(pt) {
                self.has_proper_interior = true;
            }
        }
    }

    fn should_record_points(&self, hit: &SegmentIntersection) -> bool {
        self.include_proper || !matches!(hit, SegmentIntersection::Point { proper: true, .. })
    }
}

fn add_to_edge(edge: &mut Edge, seg: usize, hit: &SegmentIntersection) {
    match hit {
        SegmentIntersection::None => {}
        SegmentIntersection::Point { pt, .. } => edge.add_intersection(*pt, seg),
        SegmentIntersection::Overlap { pts } => {
            for pt in pts {
                edge.add_intersection(*pt, seg);
            }
        }
    }
}

/// A single-point intersection of one edge with itself is trivial when the
/// two segments are adjacent along the edge, including the wraparound pair
/// of a closed edge.
fn is_trivial(edge: &Edge, s0: usize, s1: usize, hit: &SegmentIntersection) -> bool {
    if !matches!(hit, SegmentIntersection::Point { .. }) {
        return false;
    }
    if s0.abs_diff(s1) == 1 {
        return true;
    }
    if edge.is_closed() {
        let max_seg = edge.pts.len() - 2;
        if (s0 == 0 && s1 == max_seg) || (s1 == 0 && s0 == max_seg) {
            return true;
        }
    }
    false
}
