//! Regular shapes: hexagons, squares and densified circles.

use std::f64::consts::PI;

use tracing::debug;

use crate::error::{GeomError, Result};
use crate::geom::{Polygon, Vec2};

/// Upper bound (exclusive) on segments per quarter circle.
pub const MAX_QUAD_SEGS: usize = 10_000;

/// Size of a hexagon or square.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Size {
    Sidelength(f64),
    Area(f64),
}

impl Default for Size {
    fn default() -> Self {
        Size::Sidelength(1.0)
    }
}

fn positive(name: &'static str, v: f64) -> Result<f64> {
    if v.is_finite() && v > 0.0 {
        Ok(v)
    } else {
        Err(GeomError::invalid(name, format!("must be positive and finite, got {v}")))
    }
}

/// Side length of a regular hexagon with the given area.
#[inline]
pub fn hexagon_side_for_area(area: f64) -> f64 {
    (2.0 * area / (3.0 * 3f64.sqrt())).sqrt()
}

/// Flat-topped regular hexagon; vertex `i` sits at `60°·i` from the center.
pub fn hexagon(center: Vec2, size: Size) -> Result<Polygon> {
    let h = match size {
        Size::Sidelength(s) => positive("sidelength", s)?,
        Size::Area(a) => hexagon_side_for_area(positive("area", a)?),
    };
    Ok(regular_polygon(center, h, 6))
}

/// Axis-aligned square.
pub fn square(center: Vec2, size: Size) -> Result<Polygon> {
    let side = match size {
        Size::Sidelength(s) => positive("sidelength", s)?,
        Size::Area(a) => positive("area", a)?.sqrt(),
    };
    let h = 0.5 * side;
    Ok(Polygon::from_xy(&[
        (center.x - h, center.y - h),
        (center.x + h, center.y - h),
        (center.x + h, center.y + h),
        (center.x - h, center.y + h),
    ]))
}

/// Regular `n`-gon with circumradius `r` and a vertex at angle zero.
pub fn regular_polygon(center: Vec2, r: f64, n: usize) -> Polygon {
    Polygon::from_exterior(
        (0..n)
            .map(|i| {
                let a = 2.0 * PI * i as f64 / n as f64;
                center + Vec2::new(r * a.cos(), r * a.sin())
            })
            .collect(),
    )
}

/// How a circle's size is given.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CircleSize {
    Radius(f64),
    Circumference(f64),
    Area(f64),
}

impl CircleSize {
    pub fn radius(self) -> Result<f64> {
        match self {
            CircleSize::Radius(r) => positive("radius", r),
            CircleSize::Circumference(c) => Ok(positive("circumference", c)? / (2.0 * PI)),
            CircleSize::Area(a) => Ok((positive("area", a)? / PI).sqrt()),
        }
    }
}

/// Allowed deviation of the polygon area from `πr²`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tolerance {
    /// Fraction of the true area.
    Relative(f64),
    Absolute(f64),
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance::Relative(0.01)
    }
}

impl Tolerance {
    fn absolute(self, true_area: f64) -> Result<f64> {
        match self {
            Tolerance::Relative(f) => Ok(positive("rel_tolerance", f)? * true_area),
            Tolerance::Absolute(t) => positive("abs_tolerance", t),
        }
    }
}

/// Area of a regular `n`-gon inscribed in a circle of radius `r`.
#[inline]
fn inscribed_area(r: f64, n: usize) -> f64 {
    0.5 * n as f64 * r * r * (2.0 * PI / n as f64).sin()
}

/// Circle approximated by a regular `4q`-gon, with the smallest `q` whose
/// area is within `tolerance` of the true area. Gives up densifying at
/// `MAX_QUAD_SEGS - 1` segments per quarter.
pub fn circle(center: Vec2, size: CircleSize, tolerance: Tolerance) -> Result<Polygon> {
    let r = size.radius()?;
    let true_area = PI * r * r;
    let tol = tolerance.absolute(true_area)?;
    let mut quad_segs = MAX_QUAD_SEGS - 1;
    for q in 1..MAX_QUAD_SEGS {
        if (true_area - inscribed_area(r, 4 * q)).abs() <= tol {
            quad_segs = q;
            break;
        }
    }
    debug!(radius = r, quad_segs, tol, "densified circle");
    Ok(regular_polygon(center, r, 4 * quad_segs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Areal;
    use nalgebra::vector;

    fn approx(a: f64, b: f64, rel: f64) -> bool {
        (a - b).abs() <= rel * b.abs().max(1e-300)
    }

    #[test]
    fn hexagon_area_matches_side() {
        let s = 10.0;
        let hex = hexagon(vector![0.0, 0.0], Size::Sidelength(s)).unwrap();
        assert!(approx(hex.area(), 3.0 * 3f64.sqrt() * s * s / 2.0, 1e-12));
        let again = hexagon(vector![0.0, 0.0], Size::Area(hex.area())).unwrap();
        assert!(approx(again.area(), hex.area(), 1e-12));
    }

    #[test]
    fn hexagon_is_flat_topped() {
        let hex = hexagon(vector![0.0, 0.0], Size::Sidelength(1.0)).unwrap();
        assert_eq!(hex.exterior().len(), 6);
        assert!((hex.exterior()[0] - vector![1.0, 0.0]).norm() < 1e-15);
        let b = hex.bounds();
        assert!(approx(b.height(), 3f64.sqrt(), 1e-12));
    }

    #[test]
    fn shapes_are_centred() {
        for c in [vector![123.0, 123.0], vector![-500.0, -500.0]] {
            let shapes = [
                hexagon(c, Size::Sidelength(100.0)).unwrap(),
                hexagon(c, Size::Area(100.0)).unwrap(),
                square(c, Size::Area(100.0)).unwrap(),
                circle(c, CircleSize::Area(100.0), Tolerance::default()).unwrap(),
                circle(c, CircleSize::Circumference(100.0), Tolerance::default()).unwrap(),
            ];
            for s in &shapes {
                assert!((s.centroid().unwrap() - c).norm() < 1e-9);
            }
        }
    }

    #[test]
    fn square_areas() {
        let big = square(vector![0.0, 0.0], Size::Sidelength(1000.0)).unwrap();
        assert!((big.area() - 1e6).abs() < 0.1);
        let tiny = square(vector![0.0, 0.0], Size::Sidelength(1e-6)).unwrap();
        assert!(approx(tiny.area(), 1e-12, 1e-9));
    }

    #[test]
    fn circle_area_within_absolute_tolerance() {
        let r = 1000.0;
        let c = circle(vector![0.0, 0.0], CircleSize::Radius(r), Tolerance::Absolute(0.1)).unwrap();
        assert!((c.area() - PI * r * r).abs() <= 0.1);

        let r = 0.01;
        let c = circle(vector![0.0, 0.0], CircleSize::Radius(r), Tolerance::Absolute(1e-8)).unwrap();
        assert!((c.area() - PI * r * r).abs() <= 1e-8);
    }

    #[test]
    fn circle_uses_fewest_segments() {
        let c = circle(vector![0.0, 0.0], CircleSize::Radius(1.0), Tolerance::default()).unwrap();
        let n = c.exterior().len();
        assert_eq!(n % 4, 0);
        assert!((c.area() - PI).abs() <= 0.01 * PI);
        let coarser = regular_polygon(vector![0.0, 0.0], 1.0, n - 4);
        assert!((coarser.area() - PI).abs() > 0.01 * PI);
    }

    #[test]
    fn bad_sizes_are_rejected() {
        let o = vector![0.0, 0.0];
        assert!(square(o, Size::Area(-1.0)).is_err());
        assert!(hexagon(o, Size::Sidelength(f64::NAN)).is_err());
        assert!(circle(o, CircleSize::Radius(1.0), Tolerance::Relative(0.0)).is_err());
        assert!(circle(o, CircleSize::Radius(0.0), Tolerance::default()).is_err());
    }
}
