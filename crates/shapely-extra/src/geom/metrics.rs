//! Areas, lengths and centroids of rings and polygons.

use super::types::{Polygon, Vec2};

#[inline]
pub(crate) fn cross2(a: Vec2, b: Vec2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Shoelace area; positive for counter-clockwise rings.
pub fn ring_signed_area(ring: &[Vec2]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    // Shift to the first vertex to keep far-from-origin rings accurate.
    let o = ring[0];
    let mut s = 0.0;
    for i in 1..ring.len() - 1 {
        s += cross2(ring[i] - o, ring[i + 1] - o);
    }
    0.5 * s
}

/// Perimeter of a closed ring.
pub fn ring_length(ring: &[Vec2]) -> f64 {
    let n = ring.len();
    if n < 2 {
        return 0.0;
    }
    (0..n).map(|i| (ring[(i + 1) % n] - ring[i]).norm()).sum()
}

pub fn polygon_area(p: &Polygon) -> f64 {
    let shell = ring_signed_area(p.exterior()).abs();
    let holes: f64 = p
        .interiors()
        .iter()
        .map(|r| ring_signed_area(r).abs())
        .sum();
    (shell - holes).max(0.0)
}

pub(crate) fn region_area(polys: &[Polygon]) -> f64 {
    polys.iter().map(polygon_area).sum()
}

/// Area centroid over all rings (holes subtract); None for zero area.
pub(crate) fn centroid_of(polys: &[Polygon]) -> Option<Vec2> {
    let origin = polys.iter().find_map(|p| p.exterior().first().copied())?;
    let mut a = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for p in polys {
        for ring in p.rings() {
            let n = ring.len();
            if n < 3 {
                continue;
            }
            for i in 0..n {
                let u = ring[i] - origin;
                let v = ring[(i + 1) % n] - origin;
                let c = cross2(u, v);
                a += c;
                cx += (u.x + v.x) * c;
                cy += (u.y + v.y) * c;
            }
        }
    }
    a *= 0.5;
    if a.abs() < 1e-300 {
        return None;
    }
    Some(origin + Vec2::new(cx / (6.0 * a), cy / (6.0 * a)))
}
