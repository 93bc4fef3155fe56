//! Ring rebuilding for clipped rings and disjoint pieces.
//!
//! Input rings are oriented with the interior on their left. The rebuild:
//! 1. snaps vertices closer than `tol` onto one representative,
//! 2. splits edges at vertices lying on them (T-junctions),
//! 3. cancels pairs of opposite edges (shared boundaries, clip bridges),
//! 4. relinks the surviving edges into rings, turning left-most at
//!    vertices with several exits,
//! 5. sorts rings into shells and holes by orientation.

use std::collections::HashMap;
use std::f64::consts::PI;

use tracing::trace;

use super::metrics::{cross2, ring_length, ring_signed_area};
use super::predicates::{locate_in_polygon, Location};
use super::types::{Areal, Bounds, GeomCfg, MultiPolygon, Polygon, Vec2};

/// Union of pieces with pairwise disjoint interiors.
///
/// Shared edges disappear; enclosed gaps come back as holes. Overlapping
/// pieces are not merged.
pub fn dissolve<A: Areal>(pieces: &[A]) -> MultiPolygon {
    let mut bounds = Bounds::empty();
    let mut rings = Vec::new();
    for piece in pieces {
        bounds = bounds.union(&piece.bounds());
        for poly in piece.polygons() {
            rings.extend(poly.rings().filter(|r| r.len() >= 3).map(<[Vec2]>::to_vec));
        }
    }
    if rings.is_empty() {
        return MultiPolygon::default();
    }
    rebuild(rings, GeomCfg::default().tol_for(&bounds))
}

pub(crate) fn rebuild(rings: Vec<Vec<Vec2>>, tol: f64) -> MultiPolygon {
    let mut pool = VertexPool::new(tol);
    let mut edges: Vec<(usize, usize)> = Vec::new();
    for ring in &rings {
        let ids: Vec<usize> = ring.iter().map(|p| pool.insert(*p)).collect();
        let n = ids.len();
        for i in 0..n {
            let (a, b) = (ids[i], ids[(i + 1) % n]);
            if a != b {
                edges.push((a, b));
            }
        }
    }
    let pts = pool.pts;
    let edges = split_at_vertices(&pts, edges, tol);
    let alive = cancel_opposite(edges);
    let loops = link_rings(&pts, &alive);
    trace!(
        vertices = pts.len(),
        edges = alive.len(),
        rings = loops.len(),
        "rebuilt rings"
    );
    assemble(loops, tol)
}

struct VertexPool {
    pts: Vec<Vec2>,
    cells: HashMap<(i64, i64), Vec<usize>>,
    tol: f64,
}

impl VertexPool {
    fn new(tol: f64) -> Self {
        Self {
            pts: Vec::new(),
            cells: HashMap::new(),
            tol,
        }
    }

    #[inline]
    fn key(&self, p: Vec2) -> (i64, i64) {
        (
            (p.x / self.tol).floor() as i64,
            (p.y / self.tol).floor() as i64,
        )
    }

    fn insert(&mut self, p: Vec2) -> usize {
        let (kx, ky) = self.key(p);
        for dx in -1i64..=1 {
            for dy in -1i64..=1 {
                let cell = (kx.saturating_add(dx), ky.saturating_add(dy));
                if let Some(ids) = self.cells.get(&cell) {
                    if let Some(&id) = ids.iter().find(|&&id| (self.pts[id] - p).norm() <= self.tol) {
                        return id;
                    }
                }
            }
        }
        let id = self.pts.len();
        self.pts.push(p);
        self.cells.entry((kx, ky)).or_default().push(id);
        id
    }
}

/// Split every edge at the vertices lying on its interior.
fn split_at_vertices(pts: &[Vec2], edges: Vec<(usize, usize)>, tol: f64) -> Vec<(usize, usize)> {
    let mut order: Vec<usize> = (0..pts.len()).collect();
    order.sort_by(|&i, &j| pts[i].x.total_cmp(&pts[j].x));
    let xs: Vec<f64> = order.iter().map(|&i| pts[i].x).collect();

    let mut out = Vec::with_capacity(edges.len());
    for (a, b) in edges {
        let (pa, pb) = (pts[a], pts[b]);
        let d = pb - pa;
        let len = d.norm();
        if len <= tol {
            continue;
        }
        let dir = d / len;
        let lo = xs.partition_point(|&x| x < pa.x.min(pb.x) - tol);
        let hi = xs.partition_point(|&x| x <= pa.x.max(pb.x) + tol);
        let (y_lo, y_hi) = (pa.y.min(pb.y) - tol, pa.y.max(pb.y) + tol);
        let mut hits: Vec<(f64, usize)> = order[lo..hi]
            .iter()
            .copied()
            .filter(|&v| v != a && v != b)
            .filter_map(|v| {
                let p = pts[v];
                if p.y < y_lo || p.y > y_hi {
                    return None;
                }
                let rel = p - pa;
                let t = rel.dot(&dir);
                (t > tol && t < len - tol && cross2(dir, rel).abs() <= tol).then_some((t, v))
            })
            .collect();
        if hits.is_empty() {
            out.push((a, b));
            continue;
        }
        hits.sort_by(|x, y| x.0.total_cmp(&y.0));
        let mut prev = a;
        for (_, v) in hits {
            if v != prev {
                out.push((prev, v));
                prev = v;
            }
        }
        if prev != b {
            out.push((prev, b));
        }
    }
    out
}

/// Drop every pair of opposite edges; survivors keep their input order.
fn cancel_opposite(edges: Vec<(usize, usize)>) -> Vec<(usize, usize)> {
    let mut open: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
    let mut alive = vec![true; edges.len()];
    for (k, &(a, b)) in edges.iter().enumerate() {
        if let Some(twin) = open.get_mut(&(b, a)).and_then(Vec::pop) {
            alive[twin] = false;
            alive[k] = false;
            continue;
        }
        open.entry((a, b)).or_default().push(k);
    }
    edges
        .into_iter()
        .zip(alive)
        .filter_map(|(e, keep)| keep.then_some(e))
        .collect()
}

fn link_rings(pts: &[Vec2], edges: &[(usize, usize)]) -> Vec<Vec<Vec2>> {
    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); pts.len()];
    for (k, &(a, _)) in edges.iter().enumerate() {
        outgoing[a].push(k);
    }
    let mut used = vec![false; edges.len()];
    let mut rings = Vec::new();
    for first in 0..edges.len() {
        if used[first] {
            continue;
        }
        used[first] = true;
        let (start, mut cur) = edges[first];
        let mut prev = start;
        let mut ids = vec![start];
        let mut closed = false;
        for _ in 0..edges.len() {
            if cur == start {
                closed = true;
                break;
            }
            ids.push(cur);
            let din = pts[cur] - pts[prev];
            let mut best: Option<(usize, f64)> = None;
            for &k in &outgoing[cur] {
                if used[k] {
                    continue;
                }
                let next = edges[k].1;
                let dout = pts[next] - pts[cur];
                let turn = if next == prev {
                    -PI
                } else {
                    cross2(din, dout).atan2(din.dot(&dout))
                };
                if best.map_or(true, |(_, t)| turn > t) {
                    best = Some((k, turn));
                }
            }
            let Some((k, _)) = best else {
                break;
            };
            used[k] = true;
            prev = cur;
            cur = edges[k].1;
        }
        if closed && ids.len() >= 3 {
            rings.push(ids.into_iter().map(|i| pts[i]).collect());
        } else {
            trace!(len = ids.len(), "dropped open chain");
        }
    }
    rings
}

/// Remove vertices that continue straight on.
fn drop_collinear(mut ring: Vec<Vec2>, tol: f64) -> Vec<Vec2> {
    let mut changed = true;
    while changed && ring.len() > 3 {
        changed = false;
        let n = ring.len();
        for i in 0..n {
            let prev = ring[(i + n - 1) % n];
            let cur = ring[i];
            let next = ring[(i + 1) % n];
            let span = (next - prev).norm();
            if span <= tol {
                continue;
            }
            let off = cross2(next - prev, cur - prev).abs() / span;
            if off <= tol && (cur - prev).dot(&(next - cur)) > 0.0 {
                ring.remove(i);
                changed = true;
                break;
            }
        }
    }
    ring
}

fn assemble(rings: Vec<Vec<Vec2>>, tol: f64) -> MultiPolygon {
    let mut shells: Vec<(Vec<Vec2>, f64)> = Vec::new();
    let mut holes: Vec<Vec<Vec2>> = Vec::new();
    for ring in rings {
        let ring = drop_collinear(ring, tol);
        let a = ring_signed_area(&ring);
        if a.abs() <= tol * ring_length(&ring) {
            continue;
        }
        if a > 0.0 {
            shells.push((ring, a));
        } else {
            holes.push(ring);
        }
    }
    let mut shell_holes: Vec<Vec<Vec<Vec2>>> = vec![Vec::new(); shells.len()];
    let mut by_area: Vec<usize> = (0..shells.len()).collect();
    by_area.sort_by(|&i, &j| shells[i].1.total_cmp(&shells[j].1));
    let probes: Vec<Polygon> = shells
        .iter()
        .map(|(r, _)| Polygon::from_oriented(r.clone(), Vec::new()))
        .collect();
    for hole in holes {
        let owner = by_area
            .iter()
            .copied()
            .find(|&s| {
                hole.iter()
                    .any(|&p| locate_in_polygon(p, &probes[s], tol) == Location::Interior)
            })
            .or_else(|| {
                by_area.iter().copied().find(|&s| {
                    hole.iter()
                        .all(|&p| locate_in_polygon(p, &probes[s], tol) != Location::Exterior)
                })
            });
        match owner {
            Some(s) => shell_holes[s].push(hole),
            None => trace!(len = hole.len(), "dropped hole without shell"),
        }
    }
    shells
        .into_iter()
        .zip(shell_holes)
        .map(|((shell, _), holes)| Polygon::from_oriented(shell, holes))
        .collect()
}
