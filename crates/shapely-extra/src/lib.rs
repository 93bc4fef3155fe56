//! Extra useful functions for 2D geometry.
//!
//! Layout
//! - `geom`: polygon types, measurements, predicates and the clipping kernel
//!   every other module builds on.
//! - `angles`, `lines`: small helpers on points and polylines.
//! - `shapes`: hexagons, squares and circle approximations.
//! - `grid`: point, square and hexagon grids over a region.
//! - `random`: seeded sampling of points and Voronoi splits.
//! - `measure`: major and minor axes of a region.
//! - `split`: splitting a region into parts with prescribed area weights.
//!
//! Conventions
//! - Points are `Vec2 = nalgebra::Vector2<f64>`.
//! - Operations with preconditions return `Result<_, GeomError>`.
//! - Randomized operations take `Option<u64>` seeds; the same seed replays
//!   the same output.

pub mod angles;
pub mod error;
pub mod geom;
pub mod grid;
pub mod lines;
pub mod measure;
pub mod random;
pub mod shapes;
pub mod split;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{GeomError, Result};
pub use geom::{Areal, Bounds, GeomCfg, LineString, MultiPolygon, Polygon, Vec2};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::angles::{Angle, Attach, LineEnd};
    pub use crate::geom::{
        clip_convex, dissolve, intersects, Areal, Bounds, ConvexPoly, LineString, MultiPolygon,
        Polygon, Vec2,
    };
    pub use crate::grid::{hexagon_grid, point_grid, square_grid, GridCell};
    pub use crate::lines::{extend_line, Extension, Side};
    pub use crate::measure::{major_axis, minor_axis};
    pub use crate::random::{sample_points_in_polygon, sample_polygons, SplitMethod};
    pub use crate::shapes::{circle, hexagon, square, CircleSize, Size, Tolerance};
    pub use crate::split::{split_by_weights, BlockSplitter};
    pub use crate::{GeomError, Result};
}
