//! Point-in-geometry location.

use crate::geom::{orient, Envelope, Point};
use crate::geometry::{is_closed, Geometry, Polygon};
use crate::label::Location;

/// Locates a point relative to a geometry, without building a topology graph.
/// Used to classify the isolated parts of the merged graph.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointLocator;

impl PointLocator {
    pub fn locate(&self, p: Point, g: &Geometry) -> Location {
        if g.is_empty() {
            return Location::Exterior;
        }
        match g {
            Geometry::Point(q) => {
                if p == *q {
                    Location::Interior
                } else {
                    Location::Exterior
                }
            }
            Geometry::Line(pts) => locate_on_line(p, pts),
            Geometry::Area(polys) => {
                let mut loc = Location::Exterior;
                for poly in polys {
                    match locate_in_polygon(p, poly) {
                        Location::Boundary => return Location::Boundary,
                        Location::Interior => loc = Location::Interior,
                        Location::Exterior => {}
                    }
                }
                loc
            }
        }
    }

    /// Like [`locate`](Self::locate), but treats anything that isn't an area
    /// as having no interior: a point can only be exterior to it.
    pub fn locate_in_areas(&self, p: Point, g: &Geometry) -> Location {
        match g {
            Geometry::Area(_) => self.locate(p, g),
            _ => Location::Exterior,
        }
    }
}

fn on_segment(p: Point, a: Point, b: Point) -> bool {
    if orient(a, b, p) != 0 {
        return false;
    }
    let mut env = Envelope::of(a);
    env.expand(b);
    env.contains(p)
}

fn locate_on_line(p: Point, pts: &[Point]) -> Location {
    match Envelope::from_points(pts.iter().copied()) {
        Some(env) if env.contains(p) => {}
        _ => return Location::Exterior,
    }
    if !is_closed(pts) && (p == pts[0] || p == *pts.last().unwrap()) {
        return Location::Boundary;
    }
    for w in pts.windows(2) {
        if on_segment(p, w[0], w[1]) {
            return Location::Interior;
        }
    }
    Location::Exterior
}

fn locate_in_polygon(p: Point, poly: &Polygon) -> Location {
    match locate_in_ring(p, &poly.shell) {
        Location::Exterior => Location::Exterior,
        Location::Boundary => Location::Boundary,
        Location::Interior => {
            for hole in &poly.holes {
                match locate_in_ring(p, hole) {
                    Location::Interior => return Location::Exterior,
                    Location::Boundary => return Location::Boundary,
                    Location::Exterior => {}
                }
            }
            Location::Interior
        }
    }
}

/// Crossing-count location of a point in a closed ring, independent of the
/// ring's winding direction.
fn locate_in_ring(p: Point, ring: &[Point]) -> Location {
    let mut crossings = 0;
    for w in ring.windows(2) {
        let (a, b) = (w[0], w[1]);
        if on_segment(p, a, b) {
            return Location::Boundary;
        }
        // Half-open straddle test, so a crossing through a vertex is counted
        // once. A collinear straddling segment would have returned above.
        if a.y <= p.y && p.y < b.y && orient(a, b, p) > 0 {
            crossings += 1;
        }
        if b.y <= p.y && p.y < a.y && orient(a, b, p) < 0 {
            crossings += 1;
        }
    }
    if crossings % 2 == 1 {
        Location::Interior
    } else {
        Location::Exterior
    }
}
