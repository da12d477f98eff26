//! The input geometry model.

use crate::geom::{orient, Envelope, Point};
use crate::matrix::Dim;

/// A polygon: one shell ring and zero or more hole rings.
///
/// Rings are closed (the first point is repeated at the end) and may wind in
/// either direction; orientation is normalized when the topology graph is
/// built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polygon {
    pub shell: Vec<Point>,
    pub holes: Vec<Vec<Point>>,
}

impl Polygon {
    pub fn new(shell: Vec<Point>, holes: Vec<Vec<Point>>) -> Self {
        Polygon { shell, holes }
    }
}

/// A geometry of homogeneous dimension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Geometry {
    Point(Point),
    Line(Vec<Point>),
    Area(Vec<Polygon>),
}

impl Geometry {
    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Point(_) => false,
            Geometry::Line(pts) => pts.len() < 2,
            Geometry::Area(polys) => polys.is_empty(),
        }
    }

    pub fn dimension(&self) -> Dim {
        match self {
            Geometry::Point(_) => Dim::P,
            Geometry::Line(_) => Dim::L,
            Geometry::Area(_) => Dim::A,
        }
    }

    /// The dimension of the geometry's boundary. Points and closed lines
    /// have an empty boundary.
    pub fn boundary_dimension(&self) -> Dim {
        match self {
            Geometry::Point(_) => Dim::Empty,
            Geometry::Line(pts) => {
                if is_closed(pts) {
                    Dim::Empty
                } else {
                    Dim::P
                }
            }
            Geometry::Area(_) => Dim::L,
        }
    }

    /// `None` when the geometry is empty.
    pub fn envelope(&self) -> Option<Envelope> {
        match self {
            Geometry::Point(p) => Some(Envelope::of(*p)),
            Geometry::Line(pts) => {
                if self.is_empty() {
                    None
                } else {
                    Envelope::from_points(pts.iter().copied())
                }
            }
            Geometry::Area(polys) => {
                let mut envs = polys
                    .iter()
                    .filter_map(|poly| Envelope::from_points(poly.shell.iter().copied()));
                let mut env = envs.next()?;
                for e in envs {
                    env.merge(&e);
                }
                Some(env)
            }
        }
    }
}

pub fn is_closed(line: &[Point]) -> bool {
    line.len() >= 2 && line.first() == line.last()
}

/// Whether a closed ring winds counter-clockwise.
///
/// Decided by the orientation at the ring's minimal vertex, so it is robust
/// against rings that are locally collinear elsewhere. Collinear (zero-area)
/// rings report `false`.
pub fn is_ccw(ring: &[Point]) -> bool {
    debug_assert!(is_closed(ring));
    // Drop the closing duplicate.
    let pts = &ring[..ring.len() - 1];
    let n = pts.len();
    if n < 3 {
        return false;
    }
    let m = (0..n).min_by_key(|&i| pts[i]).unwrap();
    // Walk away from any vertices coinciding with the minimal one.
    let mut prev = (m + n - 1) % n;
    while pts[prev] == pts[m] && prev != m {
        prev = (prev + n - 1) % n;
    }
    let mut next = (m + 1) % n;
    while pts[next] == pts[m] && next != m {
        next = (next + 1) % n;
    }
    orient(pts[prev], pts[m], pts[next]) > 0
}
