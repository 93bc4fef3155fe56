//! Random points in regions and on lines, and random splits of regions.
//!
//! Determinism
//! - Every function takes `seed: Option<u64>`. `Some(s)` seeds a `StdRng`
//!   so the same call replays the same output; `None` draws from entropy.
//! - One RNG is threaded through all attempts of a call, so retries see
//!   fresh candidates.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::error::{GeomError, Result};
use crate::geom::{
    clip_convex, Areal, Bounds, ConvexPoly, GeomCfg, Halfplane, LineString, MultiPolygon, Vec2,
};

/// Rejection-sampling rounds before giving up.
pub const MAX_SAMPLING_ATTEMPTS: usize = 50;

/// RNG for an optional seed.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

#[inline]
fn uniform_in<R: Rng>(rng: &mut R, b: &Bounds) -> Vec2 {
    Vec2::new(
        b.min_x + rng.gen::<f64>() * b.width(),
        b.min_y + rng.gen::<f64>() * b.height(),
    )
}

pub(crate) fn points_in_region<A, R>(region: &A, n: usize, rng: &mut R) -> Result<Vec<Vec2>>
where
    A: Areal + ?Sized,
    R: Rng,
{
    if n == 0 {
        return Ok(Vec::new());
    }
    if region.is_empty() {
        return Err(GeomError::degenerate("cannot sample an empty region"));
    }
    let b = region.bounds();
    let mut out = Vec::with_capacity(n);
    for attempt in 1..=MAX_SAMPLING_ATTEMPTS {
        for _ in 0..2 * n {
            let p = uniform_in(rng, &b);
            if region.contains_point(p) {
                out.push(p);
                if out.len() == n {
                    debug!(n, attempt, "sampled points in region");
                    return Ok(out);
                }
            }
        }
        trace!(attempt, found = out.len(), wanted = n, "sampling round");
    }
    Err(GeomError::SamplingExhausted {
        attempts: MAX_SAMPLING_ATTEMPTS,
        found: out.len(),
        wanted: n,
    })
}

/// `n` uniformly random points strictly inside `region`.
pub fn sample_points_in_polygon<A: Areal + ?Sized>(
    region: &A,
    n: usize,
    seed: Option<u64>,
) -> Result<Vec<Vec2>> {
    points_in_region(region, n, &mut rng_from_seed(seed))
}

pub(crate) fn points_on_line<R: Rng>(
    line: &LineString,
    n: usize,
    ordered: bool,
    rng: &mut R,
) -> Result<Vec<Vec2>> {
    if line.is_empty() {
        return Err(GeomError::degenerate("cannot sample an empty line"));
    }
    let len = line.length();
    let mut ds: Vec<f64> = (0..n).map(|_| rng.gen::<f64>() * len).collect();
    if ordered {
        ds.sort_by(f64::total_cmp);
    }
    Ok(ds.into_iter().filter_map(|d| line.interpolate(d)).collect())
}

/// `n` points at uniformly random distances along `line`; sorted by
/// distance from the start when `ordered`.
pub fn sample_points_on_line(
    line: &LineString,
    n: usize,
    ordered: bool,
    seed: Option<u64>,
) -> Result<Vec<Vec2>> {
    points_on_line(line, n, ordered, &mut rng_from_seed(seed))
}

/// How `sample_polygons` splits a region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SplitMethod {
    /// Voronoi cells of random sites inside the region.
    #[default]
    Voronoi,
}

/// Voronoi cells of `sites`, bounded by `frame`; one cell per site, in order.
///
/// A cell is the intersection of the frame with the bisector half-planes
/// towards every other distinct site. Sites outside the frame, or within
/// tolerance of an earlier site, yield `None`.
pub fn voronoi_cells(sites: &[Vec2], frame: &Bounds) -> Vec<Option<ConvexPoly>> {
    let base = ConvexPoly::from_bounds(frame);
    let tol = GeomCfg::default().tol_for(frame);
    let inside = |p: Vec2| {
        p.x >= frame.min_x - tol
            && p.x <= frame.max_x + tol
            && p.y >= frame.min_y - tol
            && p.y <= frame.max_y + tol
    };
    sites
        .iter()
        .enumerate()
        .map(|(i, &s)| {
            if !inside(s) || sites[..i].iter().any(|t| (s - t).norm() <= tol) {
                trace!(site = i, "no voronoi cell");
                return None;
            }
            // Repeats of this site are skipped; a zero bisector would be dropped anyway.
            let bisectors = sites
                .iter()
                .enumerate()
                .filter(|&(j, t)| j != i && (s - t).norm() > tol)
                .map(|(_, &t)| Halfplane::bisector(s, t));
            let cell = ConvexPoly::from_halfplanes(base.hs.iter().copied().chain(bisectors));
            // Rebuild from the vertices so only the active constraints remain.
            ConvexPoly::from_points(&cell.vertices()?)
        })
        .collect()
}

/// Split `region` into `n` random pieces that tile it.
pub fn sample_polygons<A: Areal + ?Sized>(
    region: &A,
    n: usize,
    method: SplitMethod,
    seed: Option<u64>,
) -> Result<Vec<MultiPolygon>> {
    if n == 0 {
        return Err(GeomError::invalid("n", "must be at least 1"));
    }
    let mut rng = rng_from_seed(seed);
    let sites = points_in_region(region, n, &mut rng)?;
    match method {
        SplitMethod::Voronoi => {
            let b = region.bounds();
            let frame = b.expand(b.diagonal().max(1.0));
            let pieces: Vec<MultiPolygon> = voronoi_cells(&sites, &frame)
                .into_iter()
                .flatten()
                .map(|cell| clip_convex(region, &cell))
                .filter(|p| !p.is_empty())
                .collect();
            debug!(n, pieces = pieces.len(), "voronoi split");
            Ok(pieces)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::dissolve;
    use crate::shapes::{hexagon, square, Size};
    use nalgebra::vector;

    fn hex() -> crate::geom::Polygon {
        hexagon(vector![10.0, 10.0], Size::Area(100.0)).unwrap()
    }

    fn sq() -> crate::geom::Polygon {
        square(vector![10.0, 10.0], Size::Area(100.0)).unwrap()
    }

    #[test]
    fn samples_requested_count_inside() {
        let h = hex();
        for seed in 0..5 {
            let pts = sample_points_in_polygon(&h, 500, Some(seed)).unwrap();
            assert_eq!(pts.len(), 500);
            assert!(pts.iter().all(|&p| h.contains_point(p)));
        }
    }

    #[test]
    fn seeds_replay_and_differ() {
        let h = hex();
        let a = sample_points_in_polygon(&h, 500, Some(100)).unwrap();
        let b = sample_points_in_polygon(&h, 500, Some(100)).unwrap();
        let c = sample_points_in_polygon(&h, 500, Some(101)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn unseeded_sampling_works() {
        assert_eq!(sample_points_in_polygon(&hex(), 10, None).unwrap().len(), 10);
    }

    #[test]
    fn thin_region_exhausts_attempts() {
        // A sliver whose area is a tiny fraction of its bounds.
        let sliver = crate::geom::Polygon::from_xy(&[(0.0, 0.0), (1000.0, 1000.0), (0.0, 1e-9)]);
        let err = sample_points_in_polygon(&sliver, 5, Some(1)).unwrap_err();
        assert!(matches!(
            err,
            GeomError::SamplingExhausted { attempts: MAX_SAMPLING_ATTEMPTS, wanted: 5, .. }
        ));
    }

    #[test]
    fn empty_region_is_rejected() {
        let empty = MultiPolygon::default();
        assert!(sample_points_in_polygon(&empty, 3, Some(0)).is_err());
        assert!(sample_points_in_polygon(&empty, 0, Some(0)).unwrap().is_empty());
    }

    #[test]
    fn line_samples_are_on_the_line_and_ordered() {
        let line = LineString::from_xy(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        let pts = sample_points_on_line(&line, 100, true, Some(7)).unwrap();
        assert_eq!(pts.len(), 100);
        let along = |p: &Vec2| if p.y == 0.0 { p.x } else { 10.0 + p.y };
        for w in pts.windows(2) {
            assert!(along(&w[0]) <= along(&w[1]));
        }
        assert!(pts.iter().all(|p| (p.y == 0.0 && (0.0..=10.0).contains(&p.x)) || p.x == 10.0));
    }

    #[test]
    fn voronoi_pieces_tile_the_square() {
        let s = sq();
        for seed in 0..3 {
            let pieces = sample_polygons(&s, 200, SplitMethod::Voronoi, Some(seed)).unwrap();
            assert_eq!(pieces.len(), 200);
            let summed: f64 = pieces.iter().map(|p| p.area()).sum();
            assert!((summed - s.area()).abs() < 1e-9 * s.area());
            let union = dissolve(&pieces);
            assert!((union.area() - summed).abs() < 1e-9 * s.area());
            assert_eq!(union.num_parts(), 1);
        }
    }

    #[test]
    fn voronoi_split_replays_with_seed() {
        let s = sq();
        let a = sample_polygons(&s, 50, SplitMethod::Voronoi, Some(100)).unwrap();
        let b = sample_polygons(&s, 50, SplitMethod::Voronoi, Some(100)).unwrap();
        let c = sample_polygons(&s, 50, SplitMethod::Voronoi, Some(101)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn voronoi_cells_of_two_sites_split_the_frame() {
        let frame = Bounds::new(0.0, 0.0, 4.0, 2.0);
        let cells = voronoi_cells(&[vector![1.0, 1.0], vector![3.0, 1.0]], &frame);
        let left = cells[0].as_ref().unwrap().to_polygon().unwrap();
        let right = cells[1].as_ref().unwrap().to_polygon().unwrap();
        assert!((left.area() - 4.0).abs() < 1e-12);
        assert!((right.bounds().min_x - 2.0).abs() < 1e-12);
    }

    fn cell_area(cell: &Option<ConvexPoly>) -> Option<f64> {
        cell.as_ref().and_then(|c| c.to_polygon()).map(|p| p.area())
    }

    #[test]
    fn repeated_sites_get_no_second_cell() {
        let frame = Bounds::new(0.0, 0.0, 4.0, 2.0);
        let sites = [vector![1.0, 1.0], vector![1.0, 1.0], vector![3.0, 1.0]];
        let cells = voronoi_cells(&sites, &frame);
        assert_eq!(cells.len(), 3);
        assert!(cells[1].is_none());
        let areas: Vec<f64> = cells.iter().filter_map(cell_area).collect();
        assert_eq!(areas.len(), 2);
        assert!((areas[0] - 4.0).abs() < 1e-12);
        assert!((areas.iter().sum::<f64>() - 8.0).abs() < 1e-12);
    }

    #[test]
    fn sites_outside_the_frame_get_no_cell() {
        let frame = Bounds::new(0.0, 0.0, 4.0, 2.0);
        let cells = voronoi_cells(&[vector![-1.0, 1.0], vector![3.0, 1.0]], &frame);
        assert!(cells[0].is_none());
        assert!((cell_area(&cells[1]).unwrap() - 6.0).abs() < 1e-12);
    }
}
