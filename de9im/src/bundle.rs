//! Bundles of edge ends around a node, and the labelling of a node's star.

use crate::edge_end::EdgeEnd;
use crate::geometry::Geometry;
use crate::label::{Label, Location, Position};
use crate::locate::PointLocator;
use crate::matrix::{Dim, IntersectionMatrix};

/// All the edge ends at one node that point in the same direction, merged
/// into a single labelled unit.
#[derive(Clone, Debug)]
pub struct EdgeEndBundle {
    pub label: Label,
    ends: Vec<EdgeEnd>,
}

impl EdgeEndBundle {
    fn new(end: EdgeEnd) -> Self {
        EdgeEndBundle {
            label: end.label,
            ends: vec![end],
        }
    }

    pub fn ends(&self) -> &[EdgeEnd] {
        &self.ends
    }

    fn rep(&self) -> &EdgeEnd {
        &self.ends[0]
    }

    pub fn coord(&self) -> crate::geom::Point {
        self.rep().coord
    }

    /// Recomputes the bundle label from its members. The bundle is
    /// area-flavoured if any member is.
    fn compute_label(&mut self) {
        let is_area = self.ends.iter().any(|e| e.label.is_area());
        self.label = if is_area {
            Label::empty_area()
        } else {
            Label::empty_line()
        };
        for index in 0..2 {
            self.compute_label_on(index);
            if is_area {
                self.compute_label_side(index, Position::Left);
                self.compute_label_side(index, Position::Right);
            }
        }
    }

    /// The on-location of a bundle follows the mod-2 rule over its members'
    /// boundary occurrences; with no boundary members, any interior member
    /// makes the bundle interior.
    fn compute_label_on(&mut self, index: usize) {
        let mut boundary_count = 0;
        let mut found_interior = false;
        for e in &self.ends {
            match e.label.location(index) {
                Some(Location::Boundary) => boundary_count += 1,
                Some(Location::Interior) => found_interior = true,
                _ => {}
            }
        }
        let mut loc = None;
        if found_interior {
            loc = Some(Location::Interior);
        }
        if boundary_count > 0 {
            loc = Some(if boundary_count % 2 == 1 {
                Location::Boundary
            } else {
                Location::Interior
            });
        }
        if let Some(loc) = loc {
            self.label.set_on(index, loc);
        }
    }

    /// A side is interior if any area member says so; exterior members only
    /// count when no interior one exists.
    fn compute_label_side(&mut self, index: usize, pos: Position) {
        for e in &self.ends {
            if e.label.is_area() {
                match e.label.location_at(index, pos) {
                    Some(Location::Interior) => {
                        self.label.set(index, pos, Location::Interior);
                        return;
                    }
                    Some(Location::Exterior) => self.label.set(index, pos, Location::Exterior),
                    _ => {}
                }
            }
        }
    }

    pub fn update_im(&self, im: &mut IntersectionMatrix) {
        update_im_from_label(&self.label, im);
    }
}

/// Folds a fully resolved edge label into the matrix: the on-locations meet
/// in at least a line, and for area labels each pair of side regions meets
/// in at least an area.
pub(crate) fn update_im_from_label(label: &Label, im: &mut IntersectionMatrix) {
    im.set_at_least_if_valid(label.location(0), label.location(1), Dim::L);
    if label.is_area() {
        im.set_at_least_if_valid(
            label.location_at(0, Position::Left),
            label.location_at(1, Position::Left),
            Dim::A,
        );
        im.set_at_least_if_valid(
            label.location_at(0, Position::Right),
            label.location_at(1, Position::Right),
            Dim::A,
        );
    }
}

/// The bundles around one node, ordered counter-clockwise starting from
/// east.
#[derive(Clone, Debug, Default)]
pub struct BundleStar {
    bundles: Vec<EdgeEndBundle>,
}

impl BundleStar {
    /// Adds an edge end, merging it into an existing bundle when one already
    /// points the same way.
    pub fn insert(&mut self, end: EdgeEnd) {
        match self
            .bundles
            .binary_search_by(|b| b.rep().compare_direction(&end))
        {
            Ok(i) => self.bundles[i].ends.push(end),
            Err(i) => self.bundles.insert(i, EdgeEndBundle::new(end)),
        }
    }

    pub fn bundles(&self) -> &[EdgeEndBundle] {
        &self.bundles
    }

    /// Resolves every bundle label around the node.
    ///
    /// After the members' labels are merged, side locations are propagated
    /// around the star, and any locations still unknown are resolved against
    /// the geometries directly: if the geometry's linework through this node
    /// collapsed to a boundary line, the surroundings are exterior,
    /// otherwise the node's position in the geometry decides.
    pub fn compute_labelling(&mut self, geoms: [&Geometry; 2], locator: &PointLocator) {
        for b in &mut self.bundles {
            b.compute_label();
        }
        self.propagate_side_labels(0);
        self.propagate_side_labels(1);

        let mut collapsed = [false, false];
        for b in &self.bundles {
            for (index, flag) in collapsed.iter_mut().enumerate() {
                if b.label.is_line_at(index) && b.label.location(index) == Some(Location::Boundary)
                {
                    *flag = true;
                }
            }
        }
        let mut cached: [Option<Location>; 2] = [None, None];
        for bi in 0..self.bundles.len() {
            let coord = self.bundles[bi].coord();
            for index in 0..2 {
                if self.bundles[bi].label.is_any_null(index) {
                    let loc = if collapsed[index] {
                        Location::Exterior
                    } else {
                        *cached[index]
                            .get_or_insert_with(|| locator.locate_in_areas(coord, geoms[index]))
                    };
                    self.bundles[bi].label.set_all_if_null(index, loc);
                }
            }
        }
    }

    /// Walks the star counter-clockwise carrying the region location across
    /// each bundle: the region right of a bundle must match the region the
    /// walk arrives with, and the walk leaves with the bundle's left region.
    fn propagate_side_labels(&mut self, index: usize) {
        // Start from the left side of the last bundle with known sides, i.e.
        // the region swept first when leaving east.
        let mut start_loc = None;
        for b in &self.bundles {
            if b.label.is_area_at(index) {
                if let Some(left) = b.label.location_at(index, Position::Left) {
                    start_loc = Some(left);
                }
            }
        }
        let Some(mut curr_loc) = start_loc else {
            return;
        };
        for b in &mut self.bundles {
            if b.label.location(index).is_none() {
                b.label.set_on(index, curr_loc);
            }
            if !b.label.is_area_at(index) {
                continue;
            }
            let left = b.label.location_at(index, Position::Left);
            match b.label.location_at(index, Position::Right) {
                Some(right) => {
                    assert!(
                        right == curr_loc,
                        "side location conflict at {:?}",
                        b.coord()
                    );
                    let Some(left) = left else {
                        panic!("area bundle with one null side at {:?}", b.coord());
                    };
                    curr_loc = left;
                }
                None => {
                    debug_assert!(left.is_none());
                    b.label.set(index, Position::Right, curr_loc);
                    b.label.set(index, Position::Left, curr_loc);
                }
            }
        }
    }

    /// Checks that the area labels of geometry 0 are consistent around this
    /// node: walking the star, adjacent bundles must agree on the region
    /// between them, and no bundle may have the same region on both sides.
    pub fn is_area_labels_consistent(&mut self) -> bool {
        for b in &mut self.bundles {
            b.compute_label();
        }
        self.check_area_labels_consistent(0)
    }

    fn check_area_labels_consistent(&self, index: usize) -> bool {
        let Some(last) = self.bundles.last() else {
            return true;
        };
        let start_loc = last.label.location_at(index, Position::Left);
        let Some(mut curr_loc) = start_loc else {
            panic!("found unlabelled area edge at {:?}", last.coord());
        };
        for b in &self.bundles {
            assert!(
                b.label.is_area_at(index),
                "found non-area edge at {:?}",
                b.coord()
            );
            let left = b.label.location_at(index, Position::Left);
            let right = b.label.location_at(index, Position::Right);
            if left == right {
                return false;
            }
            let (Some(left), Some(right)) = (left, right) else {
                return false;
            };
            if right != curr_loc {
                return false;
            }
            curr_loc = left;
        }
        true
    }

    pub fn update_im(&self, im: &mut IntersectionMatrix) {
        for b in &self.bundles {
            b.update_im(im);
        }
    }
}
