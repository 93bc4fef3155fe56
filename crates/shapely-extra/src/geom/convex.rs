//! Strict, ordered H-representation of convex polygons (`ConvexPoly`).
//!
//! Every clip operand in this crate is convex: grid squares, hexagons,
//! bounding boxes and Voronoi cells. Keeping them as half-planes makes
//! ring clipping a sequence of single half-plane cuts and the Voronoi
//! construction a plain half-plane intersection.
//!
//! Invariants of `ConvexPoly`:
//! - Unit normals (||n||=1).
//! - Angle-sorted by atan2(n.y, n.x) in (-π, π] (stable).
//! - Parallels coalesced (keep the most restrictive c for each direction).

use std::collections::VecDeque;
use std::f64::consts::PI;

use super::metrics::cross2;
use super::types::{Bounds, Polygon, Vec2};

/// Closed half-plane `n · x <= c`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Halfplane {
    pub n: Vec2,
    pub c: f64,
}

impl Halfplane {
    #[inline]
    pub fn new(n: Vec2, c: f64) -> Self {
        Self { n, c }
    }

    /// `n·p - c`: non-positive inside.
    #[inline]
    pub fn eval(&self, p: Vec2) -> f64 {
        self.n.dot(&p) - self.c
    }

    #[inline]
    pub fn satisfies_eps(&self, p: Vec2, eps: f64) -> bool {
        self.eval(p) <= eps
    }

    /// Points at least as close to `a` as to `b`.
    #[inline]
    pub fn bisector(a: Vec2, b: Vec2) -> Self {
        let n = b - a;
        Self::new(n, n.dot(&((a + b) * 0.5)))
    }
}

/// Convex polygon as an ordered list of half-planes.
#[derive(Clone, Debug, Default)]
pub struct ConvexPoly {
    pub hs: Vec<Halfplane>,
}

impl ConvexPoly {
    /// Canonicalize, sort and coalesce an arbitrary set of half-planes.
    pub fn from_halfplanes(hs: impl IntoIterator<Item = Halfplane>) -> Self {
        let mut keyed: Vec<(f64, Halfplane)> = hs
            .into_iter()
            .filter_map(|h| canonicalize_unit(h.n, h.c))
            .map(|(n, c)| (angle_of(n), Halfplane::new(n, c)))
            .collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        let mut out = Vec::with_capacity(keyed.len());
        for (_, h) in keyed {
            push_or_coalesce(&mut out, h.n, h.c);
        }
        ConvexPoly { hs: out }
    }

    /// Axis-aligned box.
    pub fn from_bounds(b: &Bounds) -> Self {
        Self::from_halfplanes([
            Halfplane::new(Vec2::new(1.0, 0.0), b.max_x),
            Halfplane::new(Vec2::new(-1.0, 0.0), -b.min_x),
            Halfplane::new(Vec2::new(0.0, 1.0), b.max_y),
            Halfplane::new(Vec2::new(0.0, -1.0), -b.min_y),
        ])
    }

    /// Convex hull of `points` with outward edge normals.
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let hull = convex_hull(points)?;
        if hull.len() < 3 {
            return None;
        }
        let n = hull.len();
        Some(Self::from_halfplanes((0..n).map(|k| {
            let p = hull[k];
            let edge = hull[(k + 1) % n] - p;
            // For CCW hull order, outward normal is 90° CW: (edge.y, -edge.x)
            let nrm = Vec2::new(edge.y, -edge.x);
            Halfplane::new(nrm, nrm.dot(&p))
        })))
    }

    /// Hull of the polygon's exterior; exact for convex polygons.
    pub fn from_polygon(p: &Polygon) -> Option<Self> {
        Self::from_points(p.exterior())
    }

    /// Insert a half-plane and preserve invariants (binary search by angle, coalesce parallels).
    pub fn insert_halfplane(&mut self, h: Halfplane) {
        if let Some((n, c)) = canonicalize_unit(h.n, h.c) {
            let key = angle_of(n);
            let lo = self.hs.partition_point(|x| angle_of(x.n) <= key);
            if lo > 0 && (self.hs[lo - 1].n - n).norm() < 1e-9 {
                if c < self.hs[lo - 1].c {
                    self.hs[lo - 1].c = c;
                }
                return;
            }
            if lo < self.hs.len() && (self.hs[lo].n - n).norm() < 1e-9 {
                if c < self.hs[lo].c {
                    self.hs[lo].c = c;
                }
                return;
            }
            self.hs.insert(lo, Halfplane::new(n, c));
        }
    }

    /// Intersect with another convex poly (merge two sorted streams + coalesce).
    pub fn intersect(&self, other: &ConvexPoly) -> ConvexPoly {
        let mut i = 0usize;
        let mut j = 0usize;
        let mut out: Vec<Halfplane> = Vec::with_capacity(self.hs.len() + other.hs.len());
        while i < self.hs.len() && j < other.hs.len() {
            let ai = angle_of(self.hs[i].n);
            let bj = angle_of(other.hs[j].n);
            if (ai - bj).abs() < 1e-12 {
                let c = self.hs[i].c.min(other.hs[j].c);
                push_or_coalesce(&mut out, self.hs[i].n, c);
                i += 1;
                j += 1;
            } else if ai < bj {
                push_or_coalesce(&mut out, self.hs[i].n, self.hs[i].c);
                i += 1;
            } else {
                push_or_coalesce(&mut out, other.hs[j].n, other.hs[j].c);
                j += 1;
            }
        }
        for h in self.hs[i..].iter().chain(other.hs[j..].iter()) {
            push_or_coalesce(&mut out, h.n, h.c);
        }
        ConvexPoly { hs: out }
    }

    /// Membership with slack: `eps > 0` is permissive, `eps < 0` strict.
    #[inline]
    pub fn contains_eps(&self, p: Vec2, eps: f64) -> bool {
        self.hs.iter().all(|h| h.satisfies_eps(p, eps))
    }

    /// Intersection of half-planes using a deque sweep on angle-sorted, coalesced constraints.
    ///
    /// `eps > 0` enlarges all half-planes (c → c+eps), `eps < 0` shrinks them.
    pub fn halfplane_intersection_eps(&self, eps: f64) -> HalfplaneIntersection {
        hpi_ordered(&self.hs, eps)
    }

    #[inline]
    pub fn halfplane_intersection(&self) -> HalfplaneIntersection {
        self.halfplane_intersection_eps(0.0)
    }

    /// Counter-clockwise vertices, or None if empty or unbounded.
    pub fn vertices(&self) -> Option<Vec<Vec2>> {
        let mut verts = self.halfplane_intersection().vertices()?;
        let scale = verts.iter().map(|v| v.norm()).fold(1.0, f64::max);
        let tol = 1e-12 * scale;
        verts.dedup_by(|a, b| (*a - *b).norm() <= tol);
        while verts.len() >= 2 && (verts[0] - verts[verts.len() - 1]).norm() <= tol {
            verts.pop();
        }
        (verts.len() >= 3).then_some(verts)
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.vertices().map(|v| Bounds::from_points(&v))
    }

    pub fn to_polygon(&self) -> Option<Polygon> {
        self.vertices().map(Polygon::from_exterior)
    }
}

/// Half-plane intersection result: empty, unbounded, or vertices.
#[derive(Clone, Debug)]
pub enum HalfplaneIntersection {
    Empty,
    Unbounded,
    Bounded(Vec<Vec2>),
}

impl HalfplaneIntersection {
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, HalfplaneIntersection::Empty)
    }
    #[inline]
    pub fn is_bounded(&self) -> bool {
        matches!(self, HalfplaneIntersection::Bounded(_))
    }
    #[inline]
    pub fn vertices(self) -> Option<Vec<Vec2>> {
        if let HalfplaneIntersection::Bounded(v) = self {
            Some(v)
        } else {
            None
        }
    }
}

fn hpi_ordered(hs: &[Halfplane], eps: f64) -> HalfplaneIntersection {
    if hs.is_empty() {
        return HalfplaneIntersection::Unbounded;
    }
    // Opposite parallel pair n·x <= c1, (-n)·x <= c2 is empty iff -c2 > c1.
    let angles: Vec<f64> = hs.iter().map(|h| angle_of(h.n)).collect();
    for (i, hi) in hs.iter().enumerate() {
        let target = wrap_angle(angles[i] + PI);
        let lo = angles.partition_point(|&a| a < target);
        if lo < angles.len() && (angles[lo] - target).abs() < 1e-12 && -hs[lo].c > hi.c + eps {
            return HalfplaneIntersection::Empty;
        }
    }
    let mut dq: VecDeque<usize> = VecDeque::new();
    let inter = |i1: usize, i2: usize| -> Option<Vec2> { line_intersection(hs[i1], hs[i2]) };

    for (i, h) in hs.iter().enumerate() {
        while dq.len() >= 2 {
            let l1 = dq[dq.len() - 2];
            let l2 = dq[dq.len() - 1];
            if let Some(p) = inter(l1, l2) {
                if h.satisfies_eps(p, eps) {
                    break;
                }
            }
            dq.pop_back();
        }
        while dq.len() >= 2 {
            if let Some(p) = inter(dq[0], dq[1]) {
                if h.satisfies_eps(p, eps) {
                    break;
                }
            }
            dq.pop_front();
        }
        dq.push_back(i);
    }
    while dq.len() >= 3 {
        let l1 = dq[dq.len() - 2];
        let l2 = dq[dq.len() - 1];
        if let Some(p) = inter(l1, l2) {
            if hs[dq[0]].satisfies_eps(p, eps) {
                break;
            }
        }
        dq.pop_back();
    }
    while dq.len() >= 3 {
        if let Some(p) = inter(dq[0], dq[1]) {
            if hs[dq[dq.len() - 1]].satisfies_eps(p, eps) {
                break;
            }
        }
        dq.pop_front();
    }
    if dq.is_empty() {
        return HalfplaneIntersection::Empty;
    }
    if dq.len() < 3 {
        return HalfplaneIntersection::Unbounded;
    }
    let m = dq.len();
    let mut verts = Vec::with_capacity(m);
    for k in 0..m {
        match inter(dq[k], dq[(k + 1) % m]) {
            Some(p) => verts.push(p),
            None => return HalfplaneIntersection::Unbounded,
        }
    }
    // A wrapped-around sweep whose corners violate some constraint is empty.
    let violated = verts.iter().any(|&p| {
        let slack = eps.max(0.0) + 1e-9 * (1.0 + p.norm());
        hs.iter().any(|h| !h.satisfies_eps(p, slack))
    });
    if violated {
        return HalfplaneIntersection::Empty;
    }
    HalfplaneIntersection::Bounded(verts)
}

/// Angle of a normal in (-π, π]; -0.0 components do not split directions.
#[inline]
pub(crate) fn angle_of(n: Vec2) -> f64 {
    let a = n.y.atan2(n.x);
    if a <= -PI {
        a + 2.0 * PI
    } else {
        a
    }
}

#[inline]
pub(crate) fn wrap_angle(a: f64) -> f64 {
    let mut x = a;
    while x <= -PI {
        x += 2.0 * PI;
    }
    while x > PI {
        x -= 2.0 * PI;
    }
    x
}

#[inline]
fn canonicalize_unit(n: Vec2, c: f64) -> Option<(Vec2, f64)> {
    let norm = n.norm();
    if !(norm.is_finite()) || norm <= 0.0 {
        return None;
    }
    Some((n / norm, c / norm))
}

#[inline]
fn push_or_coalesce(out: &mut Vec<Halfplane>, n: Vec2, c: f64) {
    if let Some(last) = out.last_mut() {
        if (last.n - n).norm() < 1e-9 {
            if c < last.c {
                last.c = c;
            }
            return;
        }
    }
    out.push(Halfplane::new(n, c));
}

fn line_intersection(h1: Halfplane, h2: Halfplane) -> Option<Vec2> {
    let a = nalgebra::matrix![h1.n.x, h1.n.y; h2.n.x, h2.n.y];
    if a.determinant().abs() < 1e-12 {
        return None;
    }
    let inv = a.try_inverse()?;
    Some(inv * Vec2::new(h1.c, h2.c))
}

/// Andrew's monotone chain convex hull (returns hull in CCW order, collinear points dropped).
pub fn convex_hull(points: &[Vec2]) -> Option<Vec<Vec2>> {
    if points.len() < 2 {
        return None;
    }
    let mut pts: Vec<Vec2> = points.to_vec();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    pts.dedup_by(|a, b| (*a - *b).norm() < 1e-12);
    if pts.len() < 2 {
        return None;
    }
    let turn = |a: Vec2, b: Vec2, c: Vec2| cross2(b - a, c - a);
    let mut lower: Vec<Vec2> = Vec::with_capacity(pts.len());
    for p in &pts {
        while lower.len() >= 2 && turn(lower[lower.len() - 2], lower[lower.len() - 1], *p) <= 0.0 {
            lower.pop();
        }
        lower.push(*p);
    }
    let mut upper: Vec<Vec2> = Vec::with_capacity(pts.len());
    for p in pts.iter().rev() {
        while upper.len() >= 2 && turn(upper[upper.len() - 2], upper[upper.len() - 1], *p) <= 0.0 {
            upper.pop();
        }
        upper.push(*p);
    }
    lower.pop();
    upper.pop();
    lower.extend(upper);
    Some(lower)
}
