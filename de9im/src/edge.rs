//! Edges of a topology graph and the intersection points recorded on them.

use ordered_float::NotNan;

use crate::geom::Point;
use crate::label::Label;

/// An intersection point on an edge, positioned by the segment it falls on
/// and the squared distance from that segment's start. The (segment, dist)
/// pair orders the points along the edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeIntersection {
    pub coord: Point,
    pub segment_index: usize,
    pub dist: NotNan<f64>,
}

/// The intersection points of one edge, kept sorted and deduplicated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EdgeIntersectionList {
    items: Vec<EdgeIntersection>,
}

impl EdgeIntersectionList {
    pub fn add(&mut self, coord: Point, segment_index: usize, dist: NotNan<f64>) {
        let key = (segment_index, dist);
        match self
            .items
            .binary_search_by_key(&key, |ei| (ei.segment_index, ei.dist))
        {
            Ok(_) => {}
            Err(i) => self.items.insert(
                i,
                EdgeIntersection {
                    coord,
                    segment_index,
                    dist,
                },
            ),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &EdgeIntersection> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A chain of segments carrying a single topological label.
#[derive(Clone, Debug)]
pub struct Edge {
    pub pts: Vec<Point>,
    pub label: Label,
    pub intersections: EdgeIntersectionList,
    /// True until an intersection with the other graph is found. Isolated
    /// edges don't take part in node labelling and are classified wholesale
    /// instead.
    pub isolated: bool,
}

impl Edge {
    pub fn new(pts: Vec<Point>, label: Label) -> Self {
        Edge {
            pts,
            label,
            intersections: EdgeIntersectionList::default(),
            isolated: true,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.pts.first() == self.pts.last()
    }

    /// Records an intersection point found on segment `segment_index`. A hit
    /// at the segment's far endpoint is normalized to lie at the start of the
    /// next segment, so every point has a single canonical position.
    pub fn add_intersection(&mut self, pt: Point, segment_index: usize) {
        let mut seg = segment_index;
        if self.pts.get(segment_index + 1) == Some(&pt) {
            seg = segment_index + 1;
        }
        self.intersections.add(pt, seg, dist2(self.pts[seg], pt));
    }

    /// Marks the edge's own endpoints as intersection points, so that stub
    /// computation sees the full linework.
    pub fn add_endpoints(&mut self) {
        let zero = NotNan::new(0.0).unwrap();
        let last = self.pts.len() - 1;
        self.intersections.add(self.pts[0], 0, zero);
        self.intersections.add(self.pts[last], last, zero);
    }
}

fn dist2(a: Point, b: Point) -> NotNan<f64> {
    let dx = (b.x - a.x).into_inner();
    let dy = (b.y - a.y).into_inner();
    NotNan::new(dx * dx + dy * dy).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::{Label, Location};

    fn p(x: f64, y: f64) -> Point {
        Point::from((x, y))
    }

    fn edge(pts: Vec<Point>) -> Edge {
        Edge::new(pts, Label::line(0, Location::Interior))
    }

    #[test]
    fn intersections_sort_along_the_edge() {
        let mut e = edge(vec![p(0.0, 0.0), p(2.0, 0.0), p(2.0, 2.0)]);
        e.add_intersection(p(2.0, 1.0), 1);
        e.add_intersection(p(1.0, 0.0), 0);
        e.add_intersection(p(1.5, 0.0), 0);
        let coords: Vec<Point> = e.intersections.iter().map(|ei| ei.coord).collect();
        assert_eq!(coords, vec![p(1.0, 0.0), p(1.5, 0.0), p(2.0, 1.0)]);
    }

    #[test]
    fn far_endpoint_hit_moves_to_next_segment() {
        let mut e = edge(vec![p(0.0, 0.0), p(2.0, 0.0), p(2.0, 2.0)]);
        e.add_intersection(p(2.0, 0.0), 0);
        let ei = e.intersections.iter().next().unwrap();
        assert_eq!(ei.segment_index, 1);
        assert_eq!(ei.dist.into_inner(), 0.0);
    }

    #[test]
    fn duplicate_positions_collapse() {
        let mut e = edge(vec![p(0.0, 0.0), p(2.0, 0.0), p(2.0, 2.0)]);
        e.add_intersection(p(2.0, 0.0), 0);
        e.add_intersection(p(2.0, 0.0), 1);
        e.add_endpoints();
        e.add_endpoints();
        assert_eq!(e.intersections.len(), 3);
    }
}
