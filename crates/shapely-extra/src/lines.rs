//! Polyline helpers.

use crate::angles::{angle_between_points, point_from_angle_and_distance, Angle};
use crate::error::{GeomError, Result};
use crate::geom::LineString;

/// How much to add to a line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Extension {
    /// Absolute length.
    Length(f64),
    /// Fraction of the current length; `1.0` doubles the line.
    Fraction(f64),
}

/// Which end(s) of a line to extend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Side {
    Start,
    End,
    #[default]
    Both,
}

/// Extend `line` past its ends along the direction of its end segments.
///
/// With `Side::Both` each end gets half of the extension. New vertices are
/// added; existing ones are never moved.
pub fn extend_line(line: &LineString, extension: Extension, side: Side) -> Result<LineString> {
    if line.num_coords() < 2 {
        return Err(GeomError::degenerate("line needs at least 2 coordinates"));
    }
    let mut length = match extension {
        Extension::Length(l) => l,
        Extension::Fraction(f) => line.length() * f,
    };
    if !(length.is_finite() && length > 0.0) {
        return Err(GeomError::invalid(
            "extension",
            format!("must give a positive length, got {length}"),
        ));
    }
    if side == Side::Both {
        length *= 0.5;
    }

    let mut coords = line.coords.clone();
    if matches!(side, Side::Start | Side::Both) {
        let (old, inner) = (coords[0], coords[1]);
        let a = angle_between_points(inner, old);
        coords.insert(0, point_from_angle_and_distance(old, Angle::Radians(a), length));
    }
    if matches!(side, Side::End | Side::Both) {
        let n = coords.len();
        let (inner, old) = (coords[n - 2], coords[n - 1]);
        let a = angle_between_points(inner, old);
        coords.push(point_from_angle_and_distance(old, Angle::Radians(a), length));
    }
    Ok(LineString::new(coords))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagonal() -> LineString {
        LineString::from_xy(&[(-1.0, -1.0), (1.0, 1.0)])
    }

    #[test]
    fn start_extension_keeps_end() {
        let l = diagonal();
        let l2 = extend_line(&l, Extension::Fraction(0.5), Side::Start).unwrap();
        assert_eq!(l.end(), l2.end());
        assert_ne!(l.start(), l2.start());
    }

    #[test]
    fn end_extension_keeps_start() {
        let l = diagonal();
        let l2 = extend_line(&l, Extension::Fraction(0.5), Side::End).unwrap();
        assert_eq!(l.start(), l2.start());
        assert_ne!(l.end(), l2.end());
    }

    #[test]
    fn every_side_adds_the_same_length() {
        let l = diagonal();
        for side in [Side::Start, Side::End, Side::Both] {
            let l2 = extend_line(&l, Extension::Fraction(1.0), side).unwrap();
            assert!((l2.length() - 2.0 * l.length()).abs() < 1e-7, "{side:?}");
        }
        let l3 = extend_line(&l, Extension::Length(2.0), Side::Both).unwrap();
        assert!((l3.length() - l.length() - 2.0).abs() < 1e-7);
        assert_eq!(l3.num_coords(), 4);
    }

    #[test]
    fn follows_end_segments() {
        let l = LineString::from_xy(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        let l2 = extend_line(&l, Extension::Length(2.0), Side::Both).unwrap();
        assert_eq!(l2.start(), Some(nalgebra::vector![-1.0, 0.0]));
        assert_eq!(l2.end(), Some(nalgebra::vector![1.0, 2.0]));
    }

    #[test]
    fn rejects_non_positive_extension() {
        let l = diagonal();
        assert!(extend_line(&l, Extension::Length(0.0), Side::End).is_err());
        assert!(extend_line(&l, Extension::Fraction(-1.0), Side::End).is_err());
        let point = LineString::from_xy(&[(0.0, 0.0)]);
        assert!(extend_line(&point, Extension::Length(1.0), Side::End).is_err());
    }
}
