//! The dimensionally extended 9-intersection matrix.

use crate::label::Location;

/// The dimension of a set of points in the plane: empty, 0 (points),
/// 1 (lines), or 2 (areas).
///
/// The variants are ordered so that `max` gives the dominating dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dim {
    Empty,
    P,
    L,
    A,
}

impl Dim {
    pub fn to_char(self) -> char {
        match self {
            Dim::Empty => 'F',
            Dim::P => '0',
            Dim::L => '1',
            Dim::A => '2',
        }
    }

    pub fn from_char(c: char) -> Option<Dim> {
        match c {
            'F' => Some(Dim::Empty),
            '0' => Some(Dim::P),
            '1' => Some(Dim::L),
            '2' => Some(Dim::A),
            _ => None,
        }
    }
}

const LOCATIONS: [Location; 3] = [Location::Interior, Location::Boundary, Location::Exterior];

fn idx(loc: Location) -> usize {
    match loc {
        Location::Interior => 0,
        Location::Boundary => 1,
        Location::Exterior => 2,
    }
}

/// A 3x3 matrix giving, for each pair of (interior, boundary, exterior) of
/// the two geometries, the dimension of the intersection of those two point
/// sets.
///
/// Cells are accumulated as lower bounds: the labelling passes call
/// [`set_at_least`](IntersectionMatrix::set_at_least) as they discover
/// intersections, so a cell only ever grows.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct IntersectionMatrix {
    cells: [[Dim; 3]; 3],
}

impl Default for IntersectionMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl IntersectionMatrix {
    pub fn new() -> Self {
        IntersectionMatrix {
            cells: [[Dim::Empty; 3]; 3],
        }
    }

    pub fn get(&self, a: Location, b: Location) -> Dim {
        self.cells[idx(a)][idx(b)]
    }

    pub fn set(&mut self, a: Location, b: Location, dim: Dim) {
        self.cells[idx(a)][idx(b)] = dim;
    }

    pub fn set_at_least(&mut self, a: Location, b: Location, dim: Dim) {
        let cell = &mut self.cells[idx(a)][idx(b)];
        *cell = (*cell).max(dim);
    }

    /// Like [`set_at_least`](Self::set_at_least), but a no-op when either
    /// location is unknown.
    pub fn set_at_least_if_valid(
        &mut self,
        a: Option<Location>,
        b: Option<Location>,
        dim: Dim,
    ) {
        if let (Some(a), Some(b)) = (a, b) {
            self.set_at_least(a, b, dim);
        }
    }

    /// Applies a 9-character row-major pattern as a lower bound; `F` cells
    /// are left alone.
    pub fn set_at_least_pattern(&mut self, pattern: &str) {
        assert_eq!(pattern.len(), 9);
        for (k, c) in pattern.chars().enumerate() {
            let dim = Dim::from_char(c).unwrap_or_else(|| panic!("bad pattern char {c:?}"));
            if dim != Dim::Empty {
                self.set_at_least(LOCATIONS[k / 3], LOCATIONS[k % 3], dim);
            }
        }
    }

    pub fn transposed(&self) -> Self {
        let mut out = *self;
        for i in 0..3 {
            for j in 0..3 {
                out.cells[i][j] = self.cells[j][i];
            }
        }
        out
    }
}

impl std::fmt::Display for IntersectionMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.cells {
            for dim in row {
                write!(f, "{}", dim.to_char())?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for IntersectionMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "IM({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        assert_eq!(IntersectionMatrix::new().to_string(), "FFFFFFFFF");
    }

    #[test]
    fn set_at_least_never_shrinks() {
        let mut im = IntersectionMatrix::new();
        im.set_at_least(Location::Interior, Location::Boundary, Dim::A);
        im.set_at_least(Location::Interior, Location::Boundary, Dim::P);
        assert_eq!(im.get(Location::Interior, Location::Boundary), Dim::A);
    }

    #[test]
    fn pattern_is_row_major() {
        let mut im = IntersectionMatrix::new();
        im.set_at_least_pattern("F0FFFFFF2");
        assert_eq!(im.get(Location::Interior, Location::Boundary), Dim::P);
        assert_eq!(im.get(Location::Exterior, Location::Exterior), Dim::A);
        assert_eq!(im.to_string(), "F0FFFFFF2");
    }

    #[test]
    fn transpose_swaps_rows_and_columns() {
        let mut im = IntersectionMatrix::new();
        im.set_at_least_pattern("101FF0212");
        assert_eq!(im.transposed().to_string(), "1F20FF112");
        assert_eq!(im.transposed().transposed(), im);
    }

    #[test]
    fn if_valid_ignores_unknown() {
        let mut im = IntersectionMatrix::new();
        im.set_at_least_if_valid(None, Some(Location::Interior), Dim::L);
        im.set_at_least_if_valid(Some(Location::Interior), None, Dim::L);
        assert_eq!(im.to_string(), "FFFFFFFFF");
    }
}
