//! 2D geometry kernel.
//!
//! Purpose
//! - Provide the polygon types and the handful of operations the higher
//!   level modules need: measurements, point location, clipping by convex
//!   polygons, segment clipping and dissolving tilings.
//! - Stay explicit about tolerances: every predicate takes or derives an
//!   absolute tolerance from `GeomCfg` and the data's bounds.
//!
//! Scope
//! - Clip operands are convex (`ConvexPoly`), subjects may be any polygon
//!   with holes or multipolygon.
//! - `dissolve` merges pieces with disjoint interiors only.

mod clip;
pub mod convex;
mod metrics;
mod overlay;
mod predicates;
mod types;

pub use clip::{clip_convex, clip_segment};
pub use convex::{convex_hull, ConvexPoly, Halfplane, HalfplaneIntersection};
pub use metrics::{polygon_area, ring_length, ring_signed_area};
pub use overlay::dissolve;
pub use predicates::{
    contact, intersects, locate_in_polygon, point_segment_distance, segments_intersect,
    snap_vertices, Contact, Location,
};
pub use types::{Areal, Bounds, GeomCfg, LineString, MultiPolygon, Polygon, Vec2};

#[cfg(test)]
mod tests;
