//! Basic 2D types: points, polylines, polygons, bounds and tolerances.
//!
//! - `Vec2`: a point or vector (nalgebra column vector).
//! - `LineString`: open polyline.
//! - `Polygon`: exterior ring plus holes, stored open and oriented
//!   (exterior counter-clockwise, holes clockwise).
//! - `MultiPolygon`: a list of polygons.
//! - `Areal`: the shared read-only surface of polygons and multipolygons.
//! - `GeomCfg`: centralizes the relative tolerance used for snapping.

use nalgebra::Vector2;

use super::metrics::{centroid_of, region_area, ring_length, ring_signed_area};
use super::predicates::{locate, Location};

pub type Vec2 = Vector2<f64>;

/// Geometry configuration (tolerances).
#[derive(Clone, Copy, Debug)]
pub struct GeomCfg {
    /// Snap tolerance as a fraction of the data's bounding-box diagonal.
    pub eps_rel: f64,
    /// Lower clamp for the absolute tolerance.
    pub eps_abs_min: f64,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self {
            eps_rel: 1e-9,
            eps_abs_min: 1e-15,
        }
    }
}

impl GeomCfg {
    /// Absolute tolerance appropriate for data spanning `bounds`.
    #[inline]
    pub fn tol_for(&self, bounds: &Bounds) -> f64 {
        if bounds.is_empty() {
            return self.eps_abs_min;
        }
        (self.eps_rel * bounds.diagonal()).max(self.eps_abs_min)
    }
}

/// Axis-aligned bounding box. `Bounds::empty()` contains nothing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    #[inline]
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    #[inline]
    pub fn empty() -> Self {
        Self::new(
            f64::INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::NEG_INFINITY,
        )
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec2>) -> Self {
        let mut b = Self::empty();
        for p in points {
            b.include(*p);
        }
        b
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.min_x <= self.max_x && self.min_y <= self.max_y)
    }

    #[inline]
    pub fn include(&mut self, p: Vec2) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[inline]
    pub fn diagonal(&self) -> f64 {
        self.width().hypot(self.height())
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            0.5 * (self.min_x + self.max_x),
            0.5 * (self.min_y + self.max_y),
        )
    }

    /// Grow by `d` on every side.
    #[inline]
    pub fn expand(&self, d: f64) -> Self {
        Self::new(
            self.min_x - d,
            self.min_y - d,
            self.max_x + d,
            self.max_y + d,
        )
    }

    #[inline]
    pub fn union(&self, other: &Bounds) -> Self {
        Self::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    /// Closed-box overlap test with slack `tol`.
    #[inline]
    pub fn overlaps(&self, other: &Bounds, tol: f64) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min_x <= other.max_x + tol
            && other.min_x <= self.max_x + tol
            && self.min_y <= other.max_y + tol
            && other.min_y <= self.max_y + tol
    }

    /// The box as a counter-clockwise polygon.
    pub fn to_polygon(&self) -> Polygon {
        Polygon::from_exterior(vec![
            Vec2::new(self.min_x, self.min_y),
            Vec2::new(self.max_x, self.min_y),
            Vec2::new(self.max_x, self.max_y),
            Vec2::new(self.min_x, self.max_y),
        ])
    }
}

/// Open polyline.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineString {
    pub coords: Vec<Vec2>,
}

impl LineString {
    #[inline]
    pub fn new(coords: Vec<Vec2>) -> Self {
        Self { coords }
    }

    pub fn from_xy(coords: &[(f64, f64)]) -> Self {
        Self::new(coords.iter().map(|&(x, y)| Vec2::new(x, y)).collect())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    #[inline]
    pub fn num_coords(&self) -> usize {
        self.coords.len()
    }

    #[inline]
    pub fn start(&self) -> Option<Vec2> {
        self.coords.first().copied()
    }

    #[inline]
    pub fn end(&self) -> Option<Vec2> {
        self.coords.last().copied()
    }

    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.coords.windows(2).map(|w| (w[0], w[1]))
    }

    pub fn length(&self) -> f64 {
        self.segments().map(|(a, b)| (b - a).norm()).sum()
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_points(&self.coords)
    }

    /// Point at `distance` along the line, clamped to `[0, length]`.
    pub fn interpolate(&self, distance: f64) -> Option<Vec2> {
        let first = self.start()?;
        let mut remaining = distance.max(0.0);
        for (a, b) in self.segments() {
            let seg = (b - a).norm();
            if remaining <= seg {
                if seg == 0.0 {
                    return Some(a);
                }
                return Some(a + (b - a) * (remaining / seg));
            }
            remaining -= seg;
        }
        Some(self.end().unwrap_or(first))
    }
}

/// Polygon with optional holes.
///
/// Invariants:
/// - Rings are open (the closing vertex is not repeated).
/// - Exterior is counter-clockwise, holes are clockwise.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon {
    exterior: Vec<Vec2>,
    interiors: Vec<Vec<Vec2>>,
}

impl Polygon {
    /// Build from raw rings; closes, dedups and orients them.
    pub fn new(exterior: Vec<Vec2>, interiors: Vec<Vec<Vec2>>) -> Self {
        Self {
            exterior: normalize_ring(exterior, true),
            interiors: interiors
                .into_iter()
                .map(|r| normalize_ring(r, false))
                .filter(|r| r.len() >= 3)
                .collect(),
        }
    }

    pub fn from_exterior(exterior: Vec<Vec2>) -> Self {
        Self::new(exterior, Vec::new())
    }

    pub fn from_xy(exterior: &[(f64, f64)]) -> Self {
        Self::from_exterior(exterior.iter().map(|&(x, y)| Vec2::new(x, y)).collect())
    }

    /// Rings already open and oriented (output of the overlay).
    pub(crate) fn from_oriented(exterior: Vec<Vec2>, interiors: Vec<Vec<Vec2>>) -> Self {
        Self {
            exterior,
            interiors,
        }
    }

    #[inline]
    pub fn exterior(&self) -> &[Vec2] {
        &self.exterior
    }

    #[inline]
    pub fn interiors(&self) -> &[Vec<Vec2>] {
        &self.interiors
    }

    /// Exterior first, then holes.
    pub fn rings(&self) -> impl Iterator<Item = &[Vec2]> + '_ {
        std::iter::once(self.exterior.as_slice()).chain(self.interiors.iter().map(Vec::as_slice))
    }

    pub(crate) fn rings_mut(&mut self) -> impl Iterator<Item = &mut Vec<Vec2>> + '_ {
        std::iter::once(&mut self.exterior).chain(self.interiors.iter_mut())
    }

    /// Exterior as a closed polyline.
    pub fn exterior_line(&self) -> LineString {
        let mut coords = self.exterior.clone();
        if let Some(&first) = self.exterior.first() {
            coords.push(first);
        }
        LineString::new(coords)
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Polygon {
        let off = Vec2::new(dx, dy);
        Polygon {
            exterior: self.exterior.iter().map(|p| p + off).collect(),
            interiors: self
                .interiors
                .iter()
                .map(|r| r.iter().map(|p| p + off).collect())
                .collect(),
        }
    }

    pub(crate) fn renormalize(&mut self) {
        let exterior = std::mem::take(&mut self.exterior);
        let interiors = std::mem::take(&mut self.interiors);
        *self = Polygon::new(exterior, interiors);
    }
}

/// Collection of polygons with disjoint interiors.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultiPolygon(pub Vec<Polygon>);

impl MultiPolygon {
    #[inline]
    pub fn num_parts(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Polygon> {
        self.0.iter()
    }

    pub fn into_polygons(self) -> Vec<Polygon> {
        self.0
    }
}

impl From<Polygon> for MultiPolygon {
    fn from(p: Polygon) -> Self {
        if p.is_empty() {
            MultiPolygon::default()
        } else {
            MultiPolygon(vec![p])
        }
    }
}

impl FromIterator<Polygon> for MultiPolygon {
    fn from_iter<I: IntoIterator<Item = Polygon>>(iter: I) -> Self {
        MultiPolygon(iter.into_iter().filter(|p| !p.is_empty()).collect())
    }
}

/// Read-only surface shared by `Polygon` and `MultiPolygon`.
pub trait Areal {
    fn polygons(&self) -> &[Polygon];

    fn is_empty(&self) -> bool {
        self.polygons().iter().all(|p| p.exterior.len() < 3)
    }

    fn area(&self) -> f64 {
        region_area(self.polygons())
    }

    /// Total length of all rings.
    fn perimeter(&self) -> f64 {
        self.polygons()
            .iter()
            .flat_map(|p| p.rings())
            .map(ring_length)
            .sum()
    }

    fn bounds(&self) -> Bounds {
        let mut b = Bounds::empty();
        for p in self.polygons() {
            for q in &p.exterior {
                b.include(*q);
            }
        }
        b
    }

    fn centroid(&self) -> Option<Vec2> {
        centroid_of(self.polygons())
    }

    fn locate(&self, p: Vec2, tol: f64) -> Location {
        locate(self.polygons(), p, tol)
    }

    /// Strict interior test (a point on the boundary is not contained).
    fn contains_point(&self, p: Vec2) -> bool {
        let tol = GeomCfg::default().tol_for(&self.bounds());
        self.locate(p, tol) == Location::Interior
    }
}

impl Areal for Polygon {
    fn polygons(&self) -> &[Polygon] {
        std::slice::from_ref(self)
    }
}

impl Areal for MultiPolygon {
    fn polygons(&self) -> &[Polygon] {
        &self.0
    }
}

/// Open the ring, drop consecutive duplicates and orient it.
fn normalize_ring(mut ring: Vec<Vec2>, ccw: bool) -> Vec<Vec2> {
    ring.dedup();
    while ring.len() >= 2 && ring.first() == ring.last() {
        ring.pop();
    }
    if ring.len() < 3 {
        return ring;
    }
    let a = ring_signed_area(&ring);
    if (a > 0.0) != ccw && a != 0.0 {
        ring.reverse();
    }
    ring
}
