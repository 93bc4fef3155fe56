//! Shape and angle bindings.

use crate::common::{line_in, line_out, map_geom_err, polygon_out, PyPolygon, PyRing};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use shapely_extra::angles::{self, Angle, Attach, LineEnd};
use shapely_extra::shapes::{self, CircleSize, Size, Tolerance};
use shapely_extra::Vec2;

fn size(sidelength: Option<f64>, area: Option<f64>) -> Size {
    match (sidelength, area) {
        (_, Some(a)) => Size::Area(a),
        (Some(s), None) => Size::Sidelength(s),
        (None, None) => Size::default(),
    }
}

fn line_end(at: &str) -> PyResult<LineEnd> {
    match at {
        "start" => Ok(LineEnd::Start),
        "end" => Ok(LineEnd::End),
        other => Err(PyValueError::new_err(format!("unknown line end {other:?}"))),
    }
}

fn attach(side: &str) -> PyResult<Attach> {
    match side {
        "center" => Ok(Attach::Center),
        "left" => Ok(Attach::Left),
        "right" => Ok(Attach::Right),
        other => Err(PyValueError::new_err(format!("unknown attachment {other:?}"))),
    }
}

#[pyfunction]
#[pyo3(signature = (center, sidelength=None, area=None))]
fn hexagon(center: (f64, f64), sidelength: Option<f64>, area: Option<f64>) -> PyResult<PyPolygon> {
    let c = Vec2::new(center.0, center.1);
    shapes::hexagon(c, size(sidelength, area))
        .map(|p| polygon_out(&p))
        .map_err(map_geom_err)
}

#[pyfunction]
#[pyo3(signature = (center, sidelength=None, area=None))]
fn square(center: (f64, f64), sidelength: Option<f64>, area: Option<f64>) -> PyResult<PyPolygon> {
    let c = Vec2::new(center.0, center.1);
    shapes::square(c, size(sidelength, area))
        .map(|p| polygon_out(&p))
        .map_err(map_geom_err)
}

/// Circle given by exactly one of radius, circumference or area.
#[pyfunction]
#[pyo3(signature = (center, radius=None, circumference=None, area=None, rel_tol=0.01, abs_tol=None))]
fn circle(
    center: (f64, f64),
    radius: Option<f64>,
    circumference: Option<f64>,
    area: Option<f64>,
    rel_tol: f64,
    abs_tol: Option<f64>,
) -> PyResult<PyPolygon> {
    let size = match (radius, circumference, area) {
        (Some(r), None, None) => CircleSize::Radius(r),
        (None, Some(c), None) => CircleSize::Circumference(c),
        (None, None, Some(a)) => CircleSize::Area(a),
        _ => {
            return Err(PyValueError::new_err(
                "give exactly one of radius, circumference, area",
            ))
        }
    };
    let tol = abs_tol.map_or(Tolerance::Relative(rel_tol), Tolerance::Absolute);
    shapes::circle(Vec2::new(center.0, center.1), size, tol)
        .map(|p| polygon_out(&p))
        .map_err(map_geom_err)
}

#[pyfunction]
fn angle_between_points(p0: (f64, f64), p1: (f64, f64)) -> f64 {
    angles::angle_between_points(Vec2::new(p0.0, p0.1), Vec2::new(p1.0, p1.1))
}

#[pyfunction]
fn angle_diff(a1: f64, a2: f64) -> f64 {
    angles::angle_diff(a1, a2)
}

#[pyfunction]
#[pyo3(signature = (origin, angle, distance, degrees=false))]
fn point_from_angle_and_distance(
    origin: (f64, f64),
    angle: f64,
    distance: f64,
    degrees: bool,
) -> (f64, f64) {
    let angle = if degrees {
        Angle::Degrees(angle)
    } else {
        Angle::Radians(angle)
    };
    let p = angles::point_from_angle_and_distance(Vec2::new(origin.0, origin.1), angle, distance);
    (p.x, p.y)
}

#[pyfunction]
#[pyo3(signature = (line, length, at="end", side="center", midpoint=false))]
fn perpendicular_line(
    line: PyRing,
    length: f64,
    at: &str,
    side: &str,
    midpoint: bool,
) -> PyResult<PyRing> {
    let line = line_in(&line);
    let (at, side) = (line_end(at)?, attach(side)?);
    let out = if midpoint {
        angles::perpendicular_line_at_midpoint(&line, length, at, side)
    } else {
        angles::perpendicular_line_at_endpoint(&line, length, at, side)
    };
    out.map(|l| line_out(&l)).map_err(map_geom_err)
}

pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(hexagon, m)?)?;
    m.add_function(wrap_pyfunction!(square, m)?)?;
    m.add_function(wrap_pyfunction!(circle, m)?)?;
    m.add_function(wrap_pyfunction!(angle_between_points, m)?)?;
    m.add_function(wrap_pyfunction!(angle_diff, m)?)?;
    m.add_function(wrap_pyfunction!(point_from_angle_and_distance, m)?)?;
    m.add_function(wrap_pyfunction!(perpendicular_line, m)?)?;
    Ok(())
}
