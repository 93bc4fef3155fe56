//! Point location, segment tests and polygon contact predicates.
//!
//! All tests take an absolute tolerance `tol`; points within `tol` of a ring
//! are on the boundary.

use super::metrics::cross2;
use super::types::{Areal, GeomCfg, Polygon, Vec2};

/// Where a point lies relative to a region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    Interior,
    Boundary,
    Exterior,
}

/// How two polygons touch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Contact {
    None,
    /// Boundaries meet only in isolated points.
    Point,
    /// Boundaries share a segment of positive length.
    Edge,
}

/// Closed-ring edges `(v_i, v_{i+1})`, wrapping around.
pub(crate) fn ring_edges(ring: &[Vec2]) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
    let n = ring.len();
    (0..n).map(move |i| (ring[i], ring[(i + 1) % n]))
}

pub fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f64 {
    let d = b - a;
    let len2 = d.norm_squared();
    if len2 == 0.0 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&d) / len2).clamp(0.0, 1.0);
    (p - (a + d * t)).norm()
}

/// Even-odd crossing test; the boundary is not treated specially.
fn ring_contains(p: Vec2, ring: &[Vec2]) -> bool {
    let mut inside = false;
    for (a, b) in ring_edges(ring) {
        if (a.y > p.y) != (b.y > p.y) {
            let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x {
                inside = !inside;
            }
        }
    }
    inside
}

fn on_ring(p: Vec2, ring: &[Vec2], tol: f64) -> bool {
    ring_edges(ring).any(|(a, b)| point_segment_distance(p, a, b) <= tol)
}

pub fn locate_in_polygon(p: Vec2, poly: &Polygon, tol: f64) -> Location {
    if poly.exterior().len() < 3 {
        return Location::Exterior;
    }
    if poly.rings().any(|r| on_ring(p, r, tol)) {
        return Location::Boundary;
    }
    if !ring_contains(p, poly.exterior()) {
        return Location::Exterior;
    }
    if poly.interiors().iter().any(|h| ring_contains(p, h)) {
        return Location::Exterior;
    }
    Location::Interior
}

pub(crate) fn locate(polys: &[Polygon], p: Vec2, tol: f64) -> Location {
    let mut boundary = false;
    for poly in polys {
        match locate_in_polygon(p, poly, tol) {
            Location::Interior => return Location::Interior,
            Location::Boundary => boundary = true,
            Location::Exterior => {}
        }
    }
    if boundary {
        Location::Boundary
    } else {
        Location::Exterior
    }
}

/// Closed segments `ab` and `cd` share a point (touching counts).
pub fn segments_intersect(a: Vec2, b: Vec2, c: Vec2, d: Vec2, tol: f64) -> bool {
    if a.x.max(b.x) + tol < c.x.min(d.x)
        || c.x.max(d.x) + tol < a.x.min(b.x)
        || a.y.max(b.y) + tol < c.y.min(d.y)
        || c.y.max(d.y) + tol < a.y.min(b.y)
    {
        return false;
    }
    let o1 = cross2(b - a, c - a);
    let o2 = cross2(b - a, d - a);
    let o3 = cross2(d - c, a - c);
    let o4 = cross2(d - c, b - c);
    let proper = ((o1 > 0.0 && o2 < 0.0) || (o1 < 0.0 && o2 > 0.0))
        && ((o3 > 0.0 && o4 < 0.0) || (o3 < 0.0 && o4 > 0.0));
    proper
        || point_segment_distance(c, a, b) <= tol
        || point_segment_distance(d, a, b) <= tol
        || point_segment_distance(a, c, d) <= tol
        || point_segment_distance(b, c, d) <= tol
}

/// True when the two regions share at least one point.
pub fn intersects<A, B>(a: &A, b: &B) -> bool
where
    A: Areal + ?Sized,
    B: Areal + ?Sized,
{
    let ba = a.bounds();
    let bb = b.bounds();
    if ba.is_empty() || bb.is_empty() {
        return false;
    }
    let tol = GeomCfg::default().tol_for(&ba.union(&bb));
    if !ba.overlaps(&bb, tol) {
        return false;
    }
    let vertices = |r: &[Polygon]| -> Vec<Vec2> {
        r.iter()
            .flat_map(|p| p.rings())
            .flat_map(|ring| ring.iter().copied())
            .collect()
    };
    if vertices(a.polygons())
        .into_iter()
        .any(|p| b.locate(p, tol) != Location::Exterior)
    {
        return true;
    }
    if vertices(b.polygons())
        .into_iter()
        .any(|p| a.locate(p, tol) != Location::Exterior)
    {
        return true;
    }
    for pa in a.polygons() {
        for ra in pa.rings() {
            for (p, q) in ring_edges(ra) {
                for pb in b.polygons() {
                    for rb in pb.rings() {
                        if ring_edges(rb).any(|(r, s)| segments_intersect(p, q, r, s, tol)) {
                            return true;
                        }
                    }
                }
            }
        }
    }
    false
}

/// Length of the overlap of two (nearly) collinear segments; negative or
/// zero when they are not collinear or do not overlap.
fn collinear_overlap(a: Vec2, b: Vec2, c: Vec2, d: Vec2, tol: f64) -> f64 {
    let ab = b - a;
    let len = ab.norm();
    if len <= tol {
        return 0.0;
    }
    let dir = ab / len;
    let off_c = cross2(dir, c - a).abs();
    let off_d = cross2(dir, d - a).abs();
    if off_c > tol || off_d > tol {
        return 0.0;
    }
    let tc = (c - a).dot(&dir);
    let td = (d - a).dot(&dir);
    len.min(tc.max(td)) - 0.0f64.max(tc.min(td))
}

/// Classify how the boundaries of `a` and `b` touch.
pub fn contact(a: &Polygon, b: &Polygon, tol: f64) -> Contact {
    if !a.bounds().overlaps(&b.bounds(), tol) {
        return Contact::None;
    }
    let mut touched = false;
    for ra in a.rings() {
        for (p, q) in ring_edges(ra) {
            for rb in b.rings() {
                for (r, s) in ring_edges(rb) {
                    if !segments_intersect(p, q, r, s, tol) {
                        continue;
                    }
                    if collinear_overlap(p, q, r, s, tol) > tol {
                        return Contact::Edge;
                    }
                    touched = true;
                }
            }
        }
    }
    if touched {
        Contact::Point
    } else {
        Contact::None
    }
}

/// Move every vertex of `target` that lies within `tol` of a vertex of
/// `reference` onto that vertex.
pub fn snap_vertices(target: &mut Polygon, reference: &Polygon, tol: f64) {
    let anchors: Vec<Vec2> = reference
        .rings()
        .flat_map(|r| r.iter().copied())
        .collect();
    let mut moved = false;
    for ring in target.rings_mut() {
        for v in ring.iter_mut() {
            let nearest = anchors
                .iter()
                .map(|a| ((a - *v).norm(), *a))
                .filter(|(d, _)| *d <= tol)
                .min_by(|x, y| x.0.total_cmp(&y.0));
            if let Some((d, a)) = nearest {
                if d > 0.0 {
                    *v = a;
                    moved = true;
                }
            }
        }
    }
    if moved {
        target.renormalize();
    }
}
