use ordered_float::NotNan;

// Points are sorted by `x` and then by `y`, so they can key ordered maps.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    pub x: NotNan<f64>,
    pub y: NotNan<f64>,
}

impl std::fmt::Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}

impl Point {
    pub fn new(x: NotNan<f64>, y: NotNan<f64>) -> Self {
        Point { x, y }
    }
}

// Panics on nans. Should be fine as long as everything is finite.
impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self {
            x: x.try_into().unwrap(),
            y: y.try_into().unwrap(),
        }
    }
}

/// The sign of the orientation determinant of `(p, q, r)`: `1` if they wind
/// counter-clockwise, `-1` if clockwise, `0` if collinear.
///
/// This is the predicate underlying every topological decision in this crate;
/// the sign is exact for finite inputs.
pub fn orient(p: Point, q: Point, r: Point) -> i8 {
    let det = robust::orient2d(coord(p), coord(q), coord(r));
    if det > 0.0 {
        1
    } else if det < 0.0 {
        -1
    } else {
        0
    }
}

fn coord(p: Point) -> robust::Coord<f64> {
    robust::Coord {
        x: p.x.into_inner(),
        y: p.y.into_inner(),
    }
}

/// An axis-aligned bounding box. The bounds are closed, so a degenerate
/// envelope (a single point) still intersects anything containing that point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Envelope {
    pub min: Point,
    pub max: Point,
}

impl Envelope {
    pub fn of(p: Point) -> Self {
        Envelope { min: p, max: p }
    }

    pub fn from_points(ps: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut ps = ps.into_iter();
        let mut env = Envelope::of(ps.next()?);
        for p in ps {
            env.expand(p);
        }
        Some(env)
    }

    pub fn expand(&mut self, p: Point) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn merge(&mut self, other: &Envelope) {
        self.expand(other.min);
        self.expand(other.max);
    }

    /// Touching envelopes count as intersecting.
    pub fn intersects(&self, other: &Envelope) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    pub fn contains(&self, p: Point) -> bool {
        (self.min.x..=self.max.x).contains(&p.x) && (self.min.y..=self.max.y).contains(&p.y)
    }
}
