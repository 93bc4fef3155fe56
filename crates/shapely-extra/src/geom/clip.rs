//! Clipping regions by convex polygons and segments by regions.

use super::convex::{ConvexPoly, Halfplane};
use super::metrics::cross2;
use super::overlay::rebuild;
use super::predicates::{ring_edges, Location};
use super::types::{Areal, GeomCfg, LineString, MultiPolygon, Vec2};

/// Intersection of `region` with the convex polygon `convex`.
///
/// Each ring is cut half-plane by half-plane; the rebuild then removes the
/// zero-width bridges this leaves along the cut lines, so a region falling
/// apart comes back as separate polygons.
pub fn clip_convex<A: Areal + ?Sized>(region: &A, convex: &ConvexPoly) -> MultiPolygon {
    let rb = region.bounds();
    if rb.is_empty() {
        return MultiPolygon::default();
    }
    let tol = GeomCfg::default().tol_for(&rb);
    if let Some(cb) = convex.bounds() {
        if !cb.overlaps(&rb, tol) {
            return MultiPolygon::default();
        }
    }
    let all_inside = region
        .polygons()
        .iter()
        .flat_map(|p| p.rings())
        .flat_map(|r| r.iter())
        .all(|&p| convex.contains_eps(p, tol));
    if all_inside {
        return region.polygons().iter().cloned().collect();
    }
    let mut rings = Vec::new();
    for poly in region.polygons() {
        for ring in poly.rings() {
            let mut cur = ring.to_vec();
            for h in &convex.hs {
                if cur.len() < 3 {
                    break;
                }
                cur = clip_ring(&cur, h);
            }
            if cur.len() >= 3 {
                rings.push(cur);
            }
        }
    }
    if rings.is_empty() {
        return MultiPolygon::default();
    }
    rebuild(rings, tol)
}

/// Sutherland-Hodgman step against one half-plane.
fn clip_ring(ring: &[Vec2], h: &Halfplane) -> Vec<Vec2> {
    let n = ring.len();
    let mut out = Vec::with_capacity(n + 2);
    for k in 0..n {
        let prev = ring[(k + n - 1) % n];
        let cur = ring[k];
        let sp = h.eval(prev);
        let sc = h.eval(cur);
        if sc <= 0.0 {
            if sp > 0.0 {
                out.push(prev + (cur - prev) * (sp / (sp - sc)));
            }
            out.push(cur);
        } else if sp <= 0.0 {
            out.push(prev + (cur - prev) * (sp / (sp - sc)));
        }
    }
    out
}

/// Pieces of the segment `a → b` inside `region` (boundary included),
/// ordered from `a`.
pub fn clip_segment<A: Areal + ?Sized>(a: Vec2, b: Vec2, region: &A) -> Vec<LineString> {
    let d = b - a;
    let len2 = d.norm_squared();
    if len2 == 0.0 || region.is_empty() {
        return Vec::new();
    }
    let tol = GeomCfg::default().tol_for(&region.bounds());
    let mut ts = vec![0.0, 1.0];
    for poly in region.polygons() {
        for ring in poly.rings() {
            for (p, q) in ring_edges(ring) {
                let e = q - p;
                let denom = cross2(d, e);
                let ap = p - a;
                if denom.abs() <= 1e-14 * d.norm() * e.norm() {
                    // Parallel: only collinear edges contribute their endpoints.
                    if cross2(d, ap).abs() / d.norm() <= tol {
                        ts.push(ap.dot(&d) / len2);
                        ts.push((q - a).dot(&d) / len2);
                    }
                    continue;
                }
                let t = cross2(ap, e) / denom;
                let u = cross2(ap, d) / denom;
                if (0.0..=1.0).contains(&u) {
                    ts.push(t);
                }
            }
        }
    }
    ts.retain(|t| (0.0..=1.0).contains(t));
    ts.sort_by(|x, y| x.total_cmp(y));
    ts.dedup_by(|x, y| (*x - *y).abs() * len2.sqrt() <= tol);

    let mut parts: Vec<(f64, f64)> = Vec::new();
    for w in ts.windows(2) {
        let (t0, t1) = (w[0], w[1]);
        let mid = a + d * (0.5 * (t0 + t1));
        if region.locate(mid, tol) == Location::Exterior {
            continue;
        }
        match parts.last_mut() {
            Some(last) if (last.1 - t0).abs() * len2.sqrt() <= tol => last.1 = t1,
            _ => parts.push((t0, t1)),
        }
    }
    parts
        .into_iter()
        .map(|(t0, t1)| LineString::new(vec![a + d * t0, a + d * t1]))
        .collect()
}
