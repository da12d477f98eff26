//! Topological relationships between planar geometries.
//!
//! The entry point is [`relate`], which computes the DE-9IM intersection
//! matrix of two geometries: for each pair of (interior, boundary, exterior)
//! point sets, the dimension of their intersection. [`RelateComputer`] also
//! exposes the area validity checks built on the same machinery.

mod bundle;
mod edge;
mod edge_end;
mod geom;
mod geometry;
mod graph;
mod intersect;
mod label;
mod locate;
mod matrix;
mod node;
mod noding;
mod relate;

pub use geom::{orient, Envelope, Point};
pub use geometry::{Geometry, Polygon};
pub use graph::GeometryGraph;
pub use intersect::{LineIntersector, SegmentIntersection};
pub use label::{Label, Location, Position};
pub use locate::PointLocator;
pub use matrix::{Dim, IntersectionMatrix};
pub use noding::SegmentIntersector;
pub use relate::{relate, RelateComputer};
