//! Major and minor axes of a region, estimated from random samples.
//!
//! - Major axis: the longest segment between points sampled on the exterior
//!   rings.
//! - Minor axis: among perpendiculars to the major axis at sampled points,
//!   the one with the longest chord through the region.

use tracing::debug;

use crate::angles::{perpendicular_line_at_endpoint, Attach, LineEnd};
use crate::error::{GeomError, Result};
use crate::geom::{clip_segment, Areal, LineString, Vec2};
use crate::random::{points_on_line, rng_from_seed};

fn check_samples(n: usize) -> Result<()> {
    if n < 2 {
        return Err(GeomError::invalid("n_sample_points", format!("need at least 2, got {n}")));
    }
    Ok(())
}

/// Farthest pair of `pts`; the first pair in row-major order wins ties.
fn farthest_pair(pts: &[Vec2]) -> Option<(Vec2, Vec2)> {
    let mut best: Option<(f64, usize, usize)> = None;
    for i in 0..pts.len() {
        for j in 0..pts.len() {
            let d = (pts[i] - pts[j]).norm_squared();
            if best.map_or(true, |(b, _, _)| d > b) {
                best = Some((d, i, j));
            }
        }
    }
    best.map(|(_, i, j)| (pts[i], pts[j]))
}

/// Longest distance between `n_sample_points` random points on the exterior
/// rings. Multi-part regions spread the samples proportionally to ring
/// length, with at least one per part.
pub fn major_axis<A: Areal + ?Sized>(
    region: &A,
    n_sample_points: usize,
    seed: Option<u64>,
) -> Result<LineString> {
    check_samples(n_sample_points)?;
    if region.is_empty() {
        return Err(GeomError::degenerate("region is empty"));
    }
    let rings: Vec<LineString> = region
        .polygons()
        .iter()
        .filter(|p| p.exterior().len() >= 3)
        .map(|p| p.exterior_line())
        .collect();
    let total: f64 = rings.iter().map(LineString::length).sum();
    let mut rng = rng_from_seed(seed);
    let mut pts = Vec::with_capacity(n_sample_points + rings.len());
    for ring in &rings {
        let n = if rings.len() == 1 {
            n_sample_points
        } else {
            ((ring.length() / total * n_sample_points as f64) as usize).max(1)
        };
        pts.extend(points_on_line(ring, n, true, &mut rng)?);
    }
    let (a, b) = farthest_pair(&pts).ok_or_else(|| GeomError::degenerate("no sample points"))?;
    Ok(LineString::new(vec![a, b]))
}

/// Longest chord of `region` perpendicular to its major axis.
///
/// Candidates are perpendiculars at `n_sample_points` random points along
/// the major axis, as long as the bounds diagonal and cut to the region. A
/// chord that leaves the region is bridged from its first to its last
/// point. Passing the major axis avoids recomputing it; either way the same
/// seed gives the same result.
pub fn minor_axis<A: Areal + ?Sized>(
    region: &A,
    major: Option<&LineString>,
    n_sample_points: usize,
    seed: Option<u64>,
) -> Result<LineString> {
    check_samples(n_sample_points)?;
    let computed;
    let major = match major {
        Some(m) => m,
        None => {
            computed = major_axis(region, n_sample_points, seed)?;
            &computed
        }
    };
    let (Some(start), Some(end)) = (major.start(), major.end()) else {
        return Err(GeomError::degenerate("major axis is empty"));
    };
    if start == end {
        return Err(GeomError::degenerate("major axis has zero length"));
    }
    let reach = region.bounds().diagonal();
    let mut rng = rng_from_seed(seed);
    let mut best: Option<(f64, LineString)> = None;
    for p in points_on_line(major, n_sample_points, true, &mut rng)? {
        let probe = LineString::new(vec![p - (end - start), p]);
        let cross =
            perpendicular_line_at_endpoint(&probe, 2.0 * reach, LineEnd::End, Attach::Center)?;
        let parts = clip_segment(cross.coords[0], cross.coords[1], region);
        let (Some(first), Some(last)) = (parts.first(), parts.last()) else {
            continue;
        };
        let (Some(a), Some(b)) = (first.start(), last.end()) else {
            continue;
        };
        let chord = LineString::new(vec![a, b]);
        let len = chord.length();
        if best.as_ref().map_or(true, |(l, _)| len > *l) {
            best = Some((len, chord));
        }
    }
    let (len, chord) = best.ok_or_else(|| GeomError::degenerate("no perpendicular meets the region"))?;
    debug!(length = len, major = major.length(), "minor axis");
    Ok(chord)
}
