//! Splitting a region into parts with prescribed area weights.
//!
//! Model
//! - Cover the region with square blocks and cut them to it; multi-part
//!   cuts become separate pieces.
//! - Link pieces that touch (shared edge: 1, shared corner only: 1.5) and
//!   take all-pairs shortest paths. The farthest connected pair fixes a
//!   start piece; pieces are ordered by path distance from it.
//! - A split is a list of `k - 1` cut indices into that order; each part is
//!   a contiguous run of pieces, so parts grow across the region from the
//!   start piece.
//!
//! The cut indices minimising the mean absolute difference between target
//! weights and realised area fractions are found exactly by dynamic
//! programming over prefix areas.

use nalgebra::DMatrix;
use tracing::debug;

use crate::error::{GeomError, Result};
use crate::geom::{
    clip_convex, contact, dissolve, Areal, Bounds, Contact, ConvexPoly, GeomCfg, MultiPolygon,
    Polygon,
};

/// Path length between pieces sharing an edge.
const EDGE_STEP: f64 = 1.0;
/// Path length between pieces sharing only a corner.
const CORNER_STEP: f64 = 1.5;

/// Cap on blocks; the distance matrix is quadratic and the path search cubic in their count.
pub const MAX_BLOCKS: usize = 2_500;

/// Weighted splitter over a block decomposition of a region.
#[derive(Clone, Debug)]
pub struct BlockSplitter {
    region: MultiPolygon,
    weights: Vec<f64>,
    block_size: f64,
    /// Pieces in path order once prepared.
    pieces: Option<Vec<Polygon>>,
    splits: Option<Vec<usize>>,
}

impl BlockSplitter {
    /// `weights` are positive and sum to 1; `block_size` is the block side
    /// as a fraction of the smaller bounds extent, in `(0, 1)`.
    pub fn new<A: Areal + ?Sized>(region: &A, weights: Vec<f64>, block_size: f64) -> Result<Self> {
        if !(block_size > 0.0 && block_size < 1.0) {
            return Err(GeomError::invalid(
                "block_size",
                format!("must be in (0, 1), got {block_size}"),
            ));
        }
        if weights.is_empty() {
            return Err(GeomError::invalid("weights", "need at least one weight"));
        }
        if weights.iter().any(|w| !(w.is_finite() && *w > 0.0)) {
            return Err(GeomError::invalid("weights", "every weight must be positive"));
        }
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(GeomError::invalid("weights", format!("must sum to 1, got {sum}")));
        }
        if region.is_empty() {
            return Err(GeomError::degenerate("region is empty"));
        }
        Ok(Self {
            region: region.polygons().iter().cloned().collect(),
            weights,
            block_size,
            pieces: None,
            splits: None,
        })
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Pieces in path order; empty before `prepare`.
    pub fn pieces(&self) -> &[Polygon] {
        self.pieces.as_deref().unwrap_or_default()
    }

    pub fn splits(&self) -> Option<&[usize]> {
        self.splits.as_deref()
    }

    /// Build the block pieces and their path order.
    pub fn prepare(&mut self) -> Result<()> {
        let b = self.region.bounds();
        let side = b.width().min(b.height()) * self.block_size;
        if !(side > 0.0) {
            return Err(GeomError::degenerate("region has zero width or height"));
        }
        let (nx, ny) = block_counts(&b, side);
        if nx.saturating_mul(ny) > MAX_BLOCKS {
            return Err(GeomError::invalid(
                "block_size",
                format!("{nx}x{ny} blocks exceed {MAX_BLOCKS}"),
            ));
        }
        let pieces = block_pieces(&self.region, &b, side);
        if pieces.len() < self.weights.len() {
            return Err(GeomError::degenerate(format!(
                "{} pieces cannot form {} parts",
                pieces.len(),
                self.weights.len()
            )));
        }
        let tol = GeomCfg::default().tol_for(&b);
        let dist = shortest_paths(&adjacency(&pieces, tol));
        let (start, far, d) = farthest_pair(&dist).unwrap_or((0, 0, 0.0));
        let mut order: Vec<usize> = (0..pieces.len()).collect();
        order.sort_by(|&i, &j| dist[(start, i)].total_cmp(&dist[(start, j)]));
        debug!(pieces = pieces.len(), side, start, far, path = d, "prepared block pieces");
        let mut slots: Vec<Option<Polygon>> = pieces.into_iter().map(Some).collect();
        self.pieces = Some(order.into_iter().filter_map(|i| slots[i].take()).collect());
        self.splits = None;
        Ok(())
    }

    /// Find the best cut indices; `prepare` must have run.
    pub fn optimize(&mut self) -> Result<&[usize]> {
        let pieces = self.pieces.as_ref().ok_or(GeomError::NotPrepared)?;
        let areas: Vec<f64> = pieces.iter().map(Areal::area).collect();
        let (splits, cost) = optimal_splits(&areas, &self.weights);
        debug!(?splits, cost, "optimized splits");
        Ok(self.splits.insert(splits).as_slice())
    }

    /// Parts for the given cut indices, which must be strictly increasing
    /// and leave every part non-empty.
    pub fn make_shapes(&self, splits: &[usize]) -> Result<Vec<MultiPolygon>> {
        let pieces = self.pieces.as_ref().ok_or(GeomError::NotPrepared)?;
        if splits.len() + 1 != self.weights.len() {
            return Err(GeomError::invalid(
                "splits",
                format!("need {} indices, got {}", self.weights.len() - 1, splits.len()),
            ));
        }
        let mut bounds = Vec::with_capacity(splits.len() + 2);
        bounds.push(0);
        bounds.extend_from_slice(splits);
        bounds.push(pieces.len());
        if bounds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(GeomError::invalid(
                "splits",
                format!("must be strictly increasing within (0, {}): {splits:?}", pieces.len()),
            ));
        }
        Ok(bounds
            .windows(2)
            .map(|w| dissolve(&pieces[w[0]..w[1]]))
            .collect())
    }

    /// Parts for the optimized cut indices.
    pub fn final_shapes(&self) -> Result<Vec<MultiPolygon>> {
        let splits = self.splits.as_ref().ok_or(GeomError::NotOptimized)?;
        self.make_shapes(splits)
    }
}

/// Prepare, optimize and return the parts in one call.
pub fn split_by_weights<A: Areal + ?Sized>(
    region: &A,
    weights: Vec<f64>,
    block_size: f64,
) -> Result<Vec<MultiPolygon>> {
    let mut splitter = BlockSplitter::new(region, weights, block_size)?;
    splitter.prepare()?;
    splitter.optimize()?;
    splitter.final_shapes()
}

/// Area of each part as a fraction of their total.
pub fn area_fractions(parts: &[MultiPolygon]) -> Vec<f64> {
    let total: f64 = parts.iter().map(Areal::area).sum();
    if total <= 0.0 {
        return vec![0.0; parts.len()];
    }
    parts.iter().map(|p| p.area() / total).collect()
}

fn block_counts(b: &Bounds, side: f64) -> (usize, usize) {
    (
        ((b.width() / side).ceil() as usize).max(1),
        ((b.height() / side).ceil() as usize).max(1),
    )
}

fn block_pieces(region: &MultiPolygon, b: &Bounds, side: f64) -> Vec<Polygon> {
    let (nx, ny) = block_counts(b, side);
    let mut out = Vec::new();
    for i in 0..nx {
        let x = b.min_x + i as f64 * side;
        for j in 0..ny {
            let y = b.min_y + j as f64 * side;
            let block = ConvexPoly::from_bounds(&Bounds::new(x, y, x + side, y + side));
            out.extend(clip_convex(region, &block).into_polygons());
        }
    }
    out
}

fn adjacency(pieces: &[Polygon], tol: f64) -> DMatrix<f64> {
    let n = pieces.len();
    let mut adj = DMatrix::from_element(n, n, f64::INFINITY);
    for i in 0..n {
        adj[(i, i)] = 0.0;
        for j in i + 1..n {
            let step = match contact(&pieces[i], &pieces[j], tol) {
                Contact::Edge => EDGE_STEP,
                Contact::Point => CORNER_STEP,
                Contact::None => continue,
            };
            adj[(i, j)] = step;
            adj[(j, i)] = step;
        }
    }
    adj
}

/// Floyd-Warshall; unreachable pairs stay infinite.
fn shortest_paths(adj: &DMatrix<f64>) -> DMatrix<f64> {
    let n = adj.nrows();
    let mut d = adj.clone();
    for k in 0..n {
        for i in 0..n {
            let dik = d[(i, k)];
            if dik.is_infinite() {
                continue;
            }
            for j in 0..n {
                let via = dik + d[(k, j)];
                if via < d[(i, j)] {
                    d[(i, j)] = via;
                }
            }
        }
    }
    d
}

/// Farthest pair with a finite path; the first in row-major order on ties.
fn farthest_pair(d: &DMatrix<f64>) -> Option<(usize, usize, f64)> {
    let mut best: Option<(usize, usize, f64)> = None;
    for i in 0..d.nrows() {
        for j in 0..d.ncols() {
            let v = d[(i, j)];
            if v.is_finite() && best.map_or(true, |(_, _, b)| v > b) {
                best = Some((i, j, v));
            }
        }
    }
    best
}

/// Cut indices into `areas` minimising the mean absolute weight error,
/// with every part non-empty. Requires `areas.len() >= weights.len()`.
fn optimal_splits(areas: &[f64], weights: &[f64]) -> (Vec<usize>, f64) {
    let n = areas.len();
    let k = weights.len();
    let mut prefix = vec![0.0; n + 1];
    for (i, a) in areas.iter().enumerate() {
        prefix[i + 1] = prefix[i] + a;
    }
    let total = prefix[n];
    if total <= 0.0 || k == 0 || n < k {
        return (Vec::new(), f64::INFINITY);
    }
    let err = |g: usize, i: usize, j: usize| (weights[g] - (prefix[j] - prefix[i]) / total).abs();

    // cost[g][j]: best error sum of parts 0..=g covering pieces 0..j.
    let mut cost = vec![vec![f64::INFINITY; n + 1]; k];
    let mut back = vec![vec![0usize; n + 1]; k];
    for j in 1..=n {
        cost[0][j] = err(0, 0, j);
    }
    for g in 1..k {
        for j in g + 1..=n {
            for i in g..j {
                let c = cost[g - 1][i] + err(g, i, j);
                if c < cost[g][j] {
                    cost[g][j] = c;
                    back[g][j] = i;
                }
            }
        }
    }
    let mut splits = vec![0usize; k - 1];
    let mut j = n;
    for g in (1..k).rev() {
        j = back[g][j];
        splits[g - 1] = j;
    }
    (splits, cost[k - 1][n] / k as f64)
}
