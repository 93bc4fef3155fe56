//! Grid, sampling and axis bindings on tuple polygons.

use crate::common::{line_out, map_geom_err, multipolygon_out, region_in, PyPolygon, PyRing};
use pyo3::prelude::*;
use shapely_extra::prelude::*;

fn cell(sidelength: Option<f64>, area: Option<f64>) -> GridCell {
    area.map_or(Size::Sidelength(sidelength.unwrap_or(1.0)), Size::Area)
}

#[pyfunction]
#[pyo3(name = "point_grid")]
fn py_point_grid(region: Vec<PyPolygon>, distance: f64) -> PyResult<Vec<(f64, f64)>> {
    let region = region_in(&region)?;
    let pts = point_grid(&region, distance).map_err(map_geom_err)?;
    Ok(pts.into_iter().map(|p| (p.x, p.y)).collect())
}

#[pyfunction]
#[pyo3(name = "square_grid", signature = (region, sidelength=None, area=None, clip=false))]
fn py_square_grid(
    region: Vec<PyPolygon>,
    sidelength: Option<f64>,
    area: Option<f64>,
    clip: bool,
) -> PyResult<Vec<Vec<PyPolygon>>> {
    let region = region_in(&region)?;
    let cells = square_grid(&region, cell(sidelength, area), clip).map_err(map_geom_err)?;
    Ok(cells.iter().map(multipolygon_out).collect())
}

#[pyfunction]
#[pyo3(name = "hexagon_grid", signature = (region, sidelength=None, area=None, clip=false))]
fn py_hexagon_grid(
    region: Vec<PyPolygon>,
    sidelength: Option<f64>,
    area: Option<f64>,
    clip: bool,
) -> PyResult<Vec<Vec<PyPolygon>>> {
    let region = region_in(&region)?;
    let cells = hexagon_grid(&region, cell(sidelength, area), clip).map_err(map_geom_err)?;
    Ok(cells.iter().map(multipolygon_out).collect())
}

#[pyfunction]
#[pyo3(name = "sample_points", signature = (region, n, seed=None))]
fn py_sample_points(region: Vec<PyPolygon>, n: usize, seed: Option<u64>) -> PyResult<Vec<(f64, f64)>> {
    let region = region_in(&region)?;
    let pts = sample_points_in_polygon(&region, n, seed).map_err(map_geom_err)?;
    Ok(pts.into_iter().map(|p| (p.x, p.y)).collect())
}

/// `(major, minor)` axes as two-point lines.
#[pyfunction]
#[pyo3(name = "axes", signature = (region, n_sample_points=100, seed=None))]
fn py_axes(
    region: Vec<PyPolygon>,
    n_sample_points: usize,
    seed: Option<u64>,
) -> PyResult<(PyRing, PyRing)> {
    let region = region_in(&region)?;
    let major = major_axis(&region, n_sample_points, seed).map_err(map_geom_err)?;
    let minor = minor_axis(&region, Some(&major), n_sample_points, seed).map_err(map_geom_err)?;
    Ok((line_out(&major), line_out(&minor)))
}

#[pyfunction]
#[pyo3(name = "split_by_weights", signature = (region, weights, block_size=0.05))]
fn py_split_by_weights(
    region: Vec<PyPolygon>,
    weights: Vec<f64>,
    block_size: f64,
) -> PyResult<Vec<Vec<PyPolygon>>> {
    let region = region_in(&region)?;
    let parts = split_by_weights(&region, weights, block_size).map_err(map_geom_err)?;
    Ok(parts.iter().map(multipolygon_out).collect())
}

pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_point_grid, m)?)?;
    m.add_function(wrap_pyfunction!(py_square_grid, m)?)?;
    m.add_function(wrap_pyfunction!(py_hexagon_grid, m)?)?;
    m.add_function(wrap_pyfunction!(py_sample_points, m)?)?;
    m.add_function(wrap_pyfunction!(py_axes, m)?)?;
    m.add_function(wrap_pyfunction!(py_split_by_weights, m)?)?;
    Ok(())
}
