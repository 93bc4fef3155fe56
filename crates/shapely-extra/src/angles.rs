//! Angles between points and perpendicular lines.
//!
//! Angles are measured from the positive x-axis, counter-clockwise, in
//! radians unless an `Angle` says otherwise.

use std::f64::consts::PI;

use crate::error::{GeomError, Result};
use crate::geom::{LineString, Vec2};

/// Decimal places kept by `angle_diff` and `point_from_angle_and_distance`,
/// so that e.g. `sin(π)` comes out as exactly zero.
pub const DECIMAL_PRECISION: i32 = 8;

#[inline]
pub(crate) fn round_to(x: f64, decimals: i32) -> f64 {
    let s = 10f64.powi(decimals);
    (x * s).round() / s
}

#[inline]
pub fn radians_to_degrees(r: f64) -> f64 {
    r.to_degrees()
}

#[inline]
pub fn degrees_to_radians(d: f64) -> f64 {
    d.to_radians()
}

/// Angle of `p1 - p0` in `[-π, π]`.
#[inline]
pub fn angle_between_points(p0: Vec2, p1: Vec2) -> f64 {
    let d = p1 - p0;
    d.y.atan2(d.x)
}

/// Unoriented smallest difference of two angles in `[-π, π]`, in `[0, π]`.
pub fn angle_diff(a1: f64, a2: f64) -> f64 {
    let mut d = (a1 - a2).abs();
    if d > PI {
        d = 2.0 * PI - d;
    }
    round_to(d, DECIMAL_PRECISION)
}

/// Smallest angle at `middle` between the legs to `start` and `end`.
pub fn angle_between_vectors(start: Vec2, middle: Vec2, end: Vec2) -> f64 {
    angle_diff(
        angle_between_points(middle, start),
        angle_between_points(middle, end),
    )
}

/// An angle with its unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Angle {
    Degrees(f64),
    Radians(f64),
}

impl Angle {
    #[inline]
    pub fn radians(self) -> f64 {
        match self {
            Angle::Degrees(d) => degrees_to_radians(d),
            Angle::Radians(r) => r,
        }
    }
}

/// Point at `distance` from `origin` in direction `angle`.
pub fn point_from_angle_and_distance(origin: Vec2, angle: Angle, distance: f64) -> Vec2 {
    let a = angle.radians();
    let off = Vec2::new(
        round_to(a.cos() * distance, DECIMAL_PRECISION),
        round_to(a.sin() * distance, DECIMAL_PRECISION),
    );
    origin + off
}

/// Which end of a line a perpendicular is built at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineEnd {
    Start,
    #[default]
    End,
}

/// How a perpendicular line sits on its anchor point.
///
/// The perpendicular runs from its counter-clockwise end to its clockwise
/// end. `Left` puts the first point on the anchor, `Right` the second.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Attach {
    #[default]
    Center,
    Left,
    Right,
}

impl Attach {
    /// Distances of the first (counter-clockwise) and second points from the anchor.
    fn split(self, length: f64) -> (f64, f64) {
        match self {
            Attach::Center => (0.5 * length, 0.5 * length),
            Attach::Left => (0.0, length),
            Attach::Right => (length, 0.0),
        }
    }
}

fn perpendicular(anchor: Vec2, direction: f64, length: f64, attach: Attach) -> LineString {
    let (d1, d2) = attach.split(length);
    let first = point_from_angle_and_distance(anchor, Angle::Radians(direction + PI / 2.0), d1);
    let second = point_from_angle_and_distance(anchor, Angle::Radians(direction - PI / 2.0), d2);
    LineString::new(vec![first, second])
}

fn check_length(length: f64) -> Result<()> {
    if !(length.is_finite() && length > 0.0) {
        return Err(GeomError::invalid("length", format!("must be positive, got {length}")));
    }
    Ok(())
}

/// Segment of `length` perpendicular to the first or last segment of `line`,
/// through that end point.
///
/// At `LineEnd::Start` the reference direction points out of the line
/// (from the second vertex to the first).
pub fn perpendicular_line_at_endpoint(
    line: &LineString,
    length: f64,
    at: LineEnd,
    attach: Attach,
) -> Result<LineString> {
    check_length(length)?;
    let c = &line.coords;
    if c.len() < 2 {
        return Err(GeomError::degenerate("line needs at least 2 coordinates"));
    }
    let (from, anchor) = match at {
        LineEnd::End => (c[c.len() - 2], c[c.len() - 1]),
        LineEnd::Start => (c[1], c[0]),
    };
    Ok(perpendicular(
        anchor,
        angle_between_points(from, anchor),
        length,
        attach,
    ))
}

/// Segment of `length` through the second (or second-to-last) vertex,
/// perpendicular to the mean direction of the two segments meeting there.
pub fn perpendicular_line_at_midpoint(
    line: &LineString,
    length: f64,
    at: LineEnd,
    attach: Attach,
) -> Result<LineString> {
    check_length(length)?;
    let c = &line.coords;
    if c.len() < 3 {
        return Err(GeomError::degenerate("line needs at least 3 coordinates"));
    }
    let n = c.len();
    let (p1, anchor, p3) = match at {
        LineEnd::End => (c[n - 3], c[n - 2], c[n - 1]),
        LineEnd::Start => (c[2], c[1], c[0]),
    };
    let a1 = angle_between_points(p1, anchor);
    let a2 = angle_between_points(anchor, p3);
    // Mean along the short arc, so headings of 179° and -179° average to 180°.
    let mut delta = a2 - a1;
    if delta > PI {
        delta -= 2.0 * PI;
    } else if delta < -PI {
        delta += 2.0 * PI;
    }
    Ok(perpendicular(anchor, a1 + 0.5 * delta, length, attach))
}
