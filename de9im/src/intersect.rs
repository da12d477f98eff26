//! Robust segment/segment intersection.

use crate::geom::{orient, Envelope, Point};

/// The result of intersecting two segments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentIntersection {
    None,
    /// A single intersection point. `proper` means the point lies strictly in
    /// the interior of both segments; when it is false the point is always
    /// one of the four input endpoints.
    Point { pt: Point, proper: bool },
    /// A collinear overlap, reported by its two extreme points (which are
    /// always input endpoints).
    Overlap { pts: [Point; 2] },
}

/// Computes segment intersections. Classification (intersecting or not,
/// proper or not) is decided entirely by the exact [`orient`] predicate;
/// only the coordinates of a proper crossing are rounded.
#[derive(Clone, Copy, Debug, Default)]
pub struct LineIntersector;

impl LineIntersector {
    pub fn intersect(
        &self,
        p1: Point,
        p2: Point,
        q1: Point,
        q2: Point,
    ) -> SegmentIntersection {
        if !seg_env(p1, p2).intersects(&seg_env(q1, q2)) {
            return SegmentIntersection::None;
        }
        let pq1 = orient(p1, p2, q1);
        let pq2 = orient(p1, p2, q2);
        if (pq1 > 0 && pq2 > 0) || (pq1 < 0 && pq2 < 0) {
            return SegmentIntersection::None;
        }
        let qp1 = orient(q1, q2, p1);
        let qp2 = orient(q1, q2, p2);
        if (qp1 > 0 && qp2 > 0) || (qp1 < 0 && qp2 < 0) {
            return SegmentIntersection::None;
        }
        if pq1 == 0 && pq2 == 0 && qp1 == 0 && qp2 == 0 {
            return collinear(p1, p2, q1, q2);
        }
        if pq1 == 0 || pq2 == 0 || qp1 == 0 || qp2 == 0 {
            // An endpoint of one segment lies on the other.
            let pt = if p1 == q1 || p1 == q2 {
                p1
            } else if p2 == q1 || p2 == q2 {
                p2
            } else if pq1 == 0 {
                q1
            } else if pq2 == 0 {
                q2
            } else if qp1 == 0 {
                p1
            } else {
                p2
            };
            return SegmentIntersection::Point { pt, proper: false };
        }
        SegmentIntersection::Point {
            pt: crossing_point(p1, p2, q1, q2),
            proper: true,
        }
    }
}

fn seg_env(a: Point, b: Point) -> Envelope {
    let mut env = Envelope::of(a);
    env.expand(b);
    env
}

fn collinear(p1: Point, p2: Point, q1: Point, q2: Point) -> SegmentIntersection {
    let env_p = seg_env(p1, p2);
    let env_q = seg_env(q1, q2);
    let mut pts: Vec<Point> = Vec::new();
    for c in [q1, q2] {
        if env_p.contains(c) && !pts.contains(&c) {
            pts.push(c);
        }
    }
    for c in [p1, p2] {
        if env_q.contains(c) && !pts.contains(&c) {
            pts.push(c);
        }
    }
    match pts.len() {
        0 => SegmentIntersection::None,
        1 => SegmentIntersection::Point {
            pt: pts[0],
            proper: false,
        },
        _ => {
            pts.sort();
            SegmentIntersection::Overlap {
                pts: [pts[0], *pts.last().unwrap()],
            }
        }
    }
}

// The exact predicates certified a proper crossing, but the f64 cross
// product of two near-parallel directions can still cancel to zero. The
// parameter is therefore kept finite and inside the segment, so the
// result is always a finite approximation of the crossing.
fn crossing_point(p1: Point, p2: Point, q1: Point, q2: Point) -> Point {
    let (px, py) = (p1.x.into_inner(), p1.y.into_inner());
    let dpx = p2.x.into_inner() - px;
    let dpy = p2.y.into_inner() - py;
    let dqx = q2.x.into_inner() - q1.x.into_inner();
    let dqy = q2.y.into_inner() - q1.y.into_inner();
    let denom = dpx * dqy - dpy * dqx;
    let t = ((q1.x.into_inner() - px) * dqy - (q1.y.into_inner() - py) * dqx) / denom;
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.5 };
    Point::from((px + t * dpx, py + t * dpy))
}
