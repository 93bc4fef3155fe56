use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use shapely_extra::{GeomError, LineString, MultiPolygon, Polygon, Vec2};

pub type PyRing = Vec<(f64, f64)>;
/// `(exterior, interiors)`; rings are returned closed.
pub type PyPolygon = (PyRing, Vec<PyRing>);

fn ring_in(r: &[(f64, f64)]) -> Vec<Vec2> {
    r.iter().map(|&(x, y)| Vec2::new(x, y)).collect()
}

fn ring_out(r: &[Vec2]) -> PyRing {
    r.iter().chain(r.first()).map(|p| (p.x, p.y)).collect()
}

pub fn polygon_in(p: &PyPolygon) -> Polygon {
    Polygon::new(ring_in(&p.0), p.1.iter().map(|h| ring_in(h)).collect())
}

pub fn polygon_out(p: &Polygon) -> PyPolygon {
    (ring_out(p.exterior()), p.interiors().iter().map(|h| ring_out(h)).collect())
}

pub fn region_in(parts: &[PyPolygon]) -> PyResult<MultiPolygon> {
    let region: MultiPolygon = parts.iter().map(polygon_in).collect();
    if region.num_parts() == 0 {
        return Err(PyValueError::new_err("region has no polygon with 3 or more vertices"));
    }
    Ok(region)
}

pub fn multipolygon_out(m: &MultiPolygon) -> Vec<PyPolygon> {
    m.iter().map(polygon_out).collect()
}

pub fn line_in(coords: &[(f64, f64)]) -> LineString {
    LineString::from_xy(coords)
}

pub fn line_out(l: &LineString) -> PyRing {
    l.coords.iter().map(|p| (p.x, p.y)).collect()
}

pub fn map_geom_err(err: GeomError) -> PyErr {
    PyValueError::new_err(err.to_string())
}
