//! Point, square and hexagon grids over a region.
//!
//! Cell grids are laid out over the region's bounds grown by one cell side,
//! so cells crossing the boundary are always generated. Cells that do not
//! touch the region are dropped; with `clip` the rest are cut to it.

use tracing::debug;

use crate::error::{GeomError, Result};
use crate::geom::{
    clip_convex, intersects, snap_vertices, Areal, Bounds, ConvexPoly, MultiPolygon, Polygon, Vec2,
};
use crate::shapes::{hexagon, hexagon_side_for_area, square, Size};

/// Guard against grids that would not fit in memory.
pub const MAX_GRID_POINTS: usize = 50_000_000;

/// Cap on candidate cells of a square or hexagon grid; each cell owns a ring.
pub const MAX_GRID_CELLS: usize = 1_000_000;

fn check_cells(n_cols: usize, n_rows: usize) -> Result<()> {
    if n_cols.saturating_mul(n_rows) > MAX_GRID_CELLS {
        return Err(GeomError::invalid(
            "cell",
            format!("{n_cols}x{n_rows} cell grid exceeds {MAX_GRID_CELLS} cells"),
        ));
    }
    Ok(())
}

/// Cell size of a square or hexagon grid.
pub type GridCell = Size;

fn side_of(cell: GridCell, hex: bool) -> Result<f64> {
    let s = match cell {
        Size::Sidelength(s) => s,
        Size::Area(a) if hex => hexagon_side_for_area(a),
        Size::Area(a) => a.sqrt(),
    };
    if !(s.is_finite() && s > 0.0) {
        return Err(GeomError::invalid("cell", format!("side length must be positive, got {s}")));
    }
    Ok(s)
}

/// Number of samples `lo, lo + step, ...` strictly below `hi`.
fn arange_len(lo: f64, hi: f64, step: f64) -> usize {
    if hi <= lo {
        0
    } else {
        ((hi - lo) / step).ceil() as usize
    }
}

/// Points `min + (i·d, j·d)` over the bounds of `region` that lie strictly
/// inside it, x-major.
pub fn point_grid<A: Areal + ?Sized>(region: &A, distance: f64) -> Result<Vec<Vec2>> {
    if !(distance.is_finite() && distance > 0.0) {
        return Err(GeomError::invalid("distance", format!("must be positive, got {distance}")));
    }
    let b = region.bounds();
    if b.is_empty() {
        return Ok(Vec::new());
    }
    let nx = arange_len(b.min_x, b.max_x, distance);
    let ny = arange_len(b.min_y, b.max_y, distance);
    if nx.saturating_mul(ny) > MAX_GRID_POINTS {
        return Err(GeomError::invalid(
            "distance",
            format!("{nx}x{ny} grid exceeds {MAX_GRID_POINTS} points"),
        ));
    }
    let mut out = Vec::new();
    for i in 0..nx {
        let x = b.min_x + i as f64 * distance;
        for j in 0..ny {
            let p = Vec2::new(x, b.min_y + j as f64 * distance);
            if region.contains_point(p) {
                out.push(p);
            }
        }
    }
    debug!(nx, ny, kept = out.len(), "point grid");
    Ok(out)
}

fn keep_cells<A: Areal + ?Sized>(region: &A, cells: Vec<Polygon>, clip: bool) -> Vec<MultiPolygon> {
    cells
        .into_iter()
        .filter(|c| intersects(c, region))
        .filter_map(|c| {
            if !clip {
                return Some(MultiPolygon::from(c));
            }
            let cut = clip_convex(region, &ConvexPoly::from_polygon(&c)?);
            (!cut.is_empty()).then_some(cut)
        })
        .collect()
}

/// Axis-aligned squares covering `region`.
pub fn square_grid<A: Areal + ?Sized>(
    region: &A,
    cell: GridCell,
    clip: bool,
) -> Result<Vec<MultiPolygon>> {
    let side = side_of(cell, false)?;
    let b = region.bounds();
    if b.is_empty() {
        return Ok(Vec::new());
    }
    let frame = b.expand(side);
    check_cells(
        arange_len(frame.min_x, frame.max_x, side),
        arange_len(frame.min_y, frame.max_y, side),
    )?;
    let frame = frame.to_polygon();
    let cells = point_grid(&frame, side)?
        .into_iter()
        .map(|c| square(c, Size::Sidelength(side)))
        .collect::<Result<Vec<_>>>()?;
    let total = cells.len();
    let out = keep_cells(region, cells, clip);
    debug!(side, total, kept = out.len(), clip, "square grid");
    Ok(out)
}

/// Neighbour offsets `(dcol, drow)` in a layout where odd columns sit half
/// a row higher than even ones.
const fn neighbours(col: usize) -> [(isize, isize); 6] {
    if col % 2 == 0 {
        [(0, 1), (0, -1), (1, 0), (1, -1), (-1, 0), (-1, -1)]
    } else {
        [(0, 1), (0, -1), (1, 0), (1, 1), (-1, 0), (-1, 1)]
    }
}

/// Flat-topped hexagons covering `region`.
///
/// Columns are `1.5·h` apart, rows `√3·h`. Neighbouring hexagons are snapped
/// onto each other so shared edges match exactly.
pub fn hexagon_grid<A: Areal + ?Sized>(
    region: &A,
    cell: GridCell,
    clip: bool,
) -> Result<Vec<MultiPolygon>> {
    let h = side_of(cell, true)?;
    let b = region.bounds();
    if b.is_empty() {
        return Ok(Vec::new());
    }
    let Bounds {
        min_x,
        min_y,
        max_x,
        max_y,
    } = b.expand(h);
    let dx = 1.5 * h;
    let dy = 3f64.sqrt() * h;
    let n_cols = arange_len(min_x, max_x, dx);
    let n_rows = arange_len(min_y, max_y, dy);
    check_cells(n_cols, n_rows)?;

    // Row-major storage: index = row * n_cols + col.
    let mut cells = Vec::with_capacity(n_cols * n_rows);
    for row in 0..n_rows {
        for col in 0..n_cols {
            let shift = if col % 2 == 1 { 0.5 } else { 0.0 };
            let center = Vec2::new(
                min_x + dx * col as f64,
                min_y + dy * (row as f64 + shift),
            );
            cells.push(hexagon(center, Size::Sidelength(h))?);
        }
    }

    let tol = 0.01 * h;
    for row in 0..n_rows {
        for col in 0..n_cols {
            let target = cells[row * n_cols + col].clone();
            for (dc, dr) in neighbours(col) {
                let (Some(c), Some(r)) = (col.checked_add_signed(dc), row.checked_add_signed(dr))
                else {
                    continue;
                };
                if c < n_cols && r < n_rows {
                    snap_vertices(&mut cells[r * n_cols + c], &target, tol);
                }
            }
        }
    }

    let total = cells.len();
    let out = keep_cells(region, cells, clip);
    debug!(side = h, n_cols, n_rows, total, kept = out.len(), clip, "hexagon grid");
    Ok(out)
}
