//! Topological labels attached to graph components.
//!
//! A label records, for each of the two input geometries, where a node or edge
//! lies relative to that geometry. Line-like components carry a single "on"
//! location; edges bounding an area additionally carry the locations of the
//! regions to their left and right (sides are relative to the edge's
//! coordinate direction).

/// Where a point lies relative to a geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Location {
    Interior,
    Boundary,
    Exterior,
}

/// One of the three positions a label stores for an area edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Position {
    On,
    Left,
    Right,
}

/// The locations of a graph component relative to a single geometry.
///
/// Locations start out unknown (`None`) and are filled in as the merged graph
/// is labelled.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum TopologyLocation {
    Line {
        on: Option<Location>,
    },
    Area {
        on: Option<Location>,
        left: Option<Location>,
        right: Option<Location>,
    },
}

impl TopologyLocation {
    pub fn empty_line() -> Self {
        TopologyLocation::Line { on: None }
    }

    pub fn empty_area() -> Self {
        TopologyLocation::Area {
            on: None,
            left: None,
            right: None,
        }
    }

    pub fn is_area(&self) -> bool {
        matches!(self, TopologyLocation::Area { .. })
    }

    pub fn get(&self, pos: Position) -> Option<Location> {
        match (self, pos) {
            (TopologyLocation::Line { on }, Position::On) => *on,
            (TopologyLocation::Line { .. }, _) => None,
            (TopologyLocation::Area { on, .. }, Position::On) => *on,
            (TopologyLocation::Area { left, .. }, Position::Left) => *left,
            (TopologyLocation::Area { right, .. }, Position::Right) => *right,
        }
    }

    /// Panics when asked to set a side location on a line.
    pub fn set(&mut self, pos: Position, loc: Location) {
        match (self, pos) {
            (TopologyLocation::Line { on }, Position::On) => *on = Some(loc),
            (TopologyLocation::Line { .. }, _) => panic!("side location on a line"),
            (TopologyLocation::Area { on, .. }, Position::On) => *on = Some(loc),
            (TopologyLocation::Area { left, .. }, Position::Left) => *left = Some(loc),
            (TopologyLocation::Area { right, .. }, Position::Right) => *right = Some(loc),
        }
    }

    pub fn set_all(&mut self, loc: Location) {
        match self {
            TopologyLocation::Line { on } => *on = Some(loc),
            TopologyLocation::Area { on, left, right } => {
                *on = Some(loc);
                *left = Some(loc);
                *right = Some(loc);
            }
        }
    }

    pub fn set_all_if_null(&mut self, loc: Location) {
        match self {
            TopologyLocation::Line { on } => {
                on.get_or_insert(loc);
            }
            TopologyLocation::Area { on, left, right } => {
                on.get_or_insert(loc);
                left.get_or_insert(loc);
                right.get_or_insert(loc);
            }
        }
    }

    pub fn is_null(&self) -> bool {
        match self {
            TopologyLocation::Line { on } => on.is_none(),
            TopologyLocation::Area { on, left, right } => {
                on.is_none() && left.is_none() && right.is_none()
            }
        }
    }

    pub fn is_any_null(&self) -> bool {
        match self {
            TopologyLocation::Line { on } => on.is_none(),
            TopologyLocation::Area { on, left, right } => {
                on.is_none() || left.is_none() || right.is_none()
            }
        }
    }

    /// Swaps the left and right locations. Used when reversing an edge's
    /// direction.
    pub fn flip(&mut self) {
        if let TopologyLocation::Area { left, right, .. } = self {
            std::mem::swap(left, right);
        }
    }
}

impl std::fmt::Debug for TopologyLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn c(loc: Option<Location>) -> char {
            match loc {
                Some(Location::Interior) => 'I',
                Some(Location::Boundary) => 'B',
                Some(Location::Exterior) => 'E',
                None => '.',
            }
        }
        match self {
            TopologyLocation::Line { on } => write!(f, "{}", c(*on)),
            TopologyLocation::Area { on, left, right } => {
                write!(f, "{}{}{}", c(*left), c(*on), c(*right))
            }
        }
    }
}

/// A pair of [`TopologyLocation`]s, one per input geometry.
///
/// Both elements always have the same shape: a label is either line-flavoured
/// or area-flavoured with respect to both geometries at once.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Label {
    elt: [TopologyLocation; 2],
}

impl std::fmt::Debug for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}|{:?}", self.elt[0], self.elt[1])
    }
}

impl Label {
    pub fn empty_line() -> Self {
        Label {
            elt: [TopologyLocation::empty_line(), TopologyLocation::empty_line()],
        }
    }

    pub fn empty_area() -> Self {
        Label {
            elt: [TopologyLocation::empty_area(), TopologyLocation::empty_area()],
        }
    }

    /// A line-flavoured label with `on` set for geometry `index` only.
    pub fn line(index: usize, on: Location) -> Self {
        let mut label = Label::empty_line();
        label.set_on(index, on);
        label
    }

    /// An area-flavoured label with all three positions set for geometry
    /// `index` only.
    pub fn area(index: usize, on: Location, left: Location, right: Location) -> Self {
        let mut label = Label::empty_area();
        label.set_on(index, on);
        label.set(index, Position::Left, left);
        label.set(index, Position::Right, right);
        label
    }

    pub fn location(&self, index: usize) -> Option<Location> {
        self.elt[index].get(Position::On)
    }

    pub fn location_at(&self, index: usize, pos: Position) -> Option<Location> {
        self.elt[index].get(pos)
    }

    pub fn set_on(&mut self, index: usize, loc: Location) {
        self.elt[index].set(Position::On, loc);
    }

    pub fn set(&mut self, index: usize, pos: Position, loc: Location) {
        self.elt[index].set(pos, loc);
    }

    pub fn set_all_locations(&mut self, index: usize, loc: Location) {
        self.elt[index].set_all(loc);
    }

    pub fn set_all_if_null(&mut self, index: usize, loc: Location) {
        self.elt[index].set_all_if_null(loc);
    }

    /// Toggles the `on` location for `index` between boundary and interior.
    /// A point that appears in a geometry's boundary an even number of times
    /// is interior to it (the mod-2 boundary rule).
    pub fn toggle_boundary(&mut self, index: usize) {
        let loc = if self.location(index) == Some(Location::Boundary) {
            Location::Interior
        } else {
            Location::Boundary
        };
        self.set_on(index, loc);
    }

    pub fn flip(&mut self) {
        self.elt[0].flip();
        self.elt[1].flip();
    }

    pub fn is_area(&self) -> bool {
        self.elt[0].is_area() || self.elt[1].is_area()
    }

    pub fn is_area_at(&self, index: usize) -> bool {
        self.elt[index].is_area()
    }

    pub fn is_line_at(&self, index: usize) -> bool {
        !self.elt[index].is_area()
    }

    pub fn is_null(&self, index: usize) -> bool {
        self.elt[index].is_null()
    }

    pub fn is_any_null(&self, index: usize) -> bool {
        self.elt[index].is_any_null()
    }

    /// How many geometries this label has any location for.
    pub fn geometry_count(&self) -> usize {
        self.elt.iter().filter(|e| !e.is_null()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_swaps_sides() {
        let mut label = Label::area(0, Location::Boundary, Location::Exterior, Location::Interior);
        label.flip();
        assert_eq!(label.location_at(0, Position::Left), Some(Location::Interior));
        assert_eq!(label.location_at(0, Position::Right), Some(Location::Exterior));
        assert_eq!(label.location(0), Some(Location::Boundary));
    }

    #[test]
    fn toggle_boundary_is_mod_2() {
        let mut label = Label::empty_line();
        label.toggle_boundary(0);
        assert_eq!(label.location(0), Some(Location::Boundary));
        label.toggle_boundary(0);
        assert_eq!(label.location(0), Some(Location::Interior));
        label.toggle_boundary(0);
        assert_eq!(label.location(0), Some(Location::Boundary));
    }

    #[test]
    fn set_all_if_null_preserves_existing() {
        let mut label = Label::empty_area();
        label.set(1, Position::Left, Location::Interior);
        label.set_all_if_null(1, Location::Exterior);
        assert_eq!(label.location_at(1, Position::Left), Some(Location::Interior));
        assert_eq!(label.location_at(1, Position::Right), Some(Location::Exterior));
        assert_eq!(label.location(1), Some(Location::Exterior));
    }

    #[test]
    fn geometry_count_ignores_null_elements() {
        assert_eq!(Label::empty_line().geometry_count(), 0);
        assert_eq!(Label::line(1, Location::Interior).geometry_count(), 1);
        let mut label = Label::line(1, Location::Interior);
        label.set_on(0, Location::Exterior);
        assert_eq!(label.geometry_count(), 2);
    }
}
