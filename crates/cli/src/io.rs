//! JSON documents read and written by the CLI.
//!
//! A polygon is `{"exterior": [[x, y], ...], "interiors": [[[x, y], ...], ...]}`;
//! a region is either one polygon or a list of them.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use shapely_extra::{Areal, LineString, MultiPolygon, Polygon, Vec2};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolygonDoc {
    pub exterior: Vec<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interiors: Vec<Vec<[f64; 2]>>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum RegionDoc {
    Single(PolygonDoc),
    Multi(Vec<PolygonDoc>),
}

#[inline]
pub fn xy(p: Vec2) -> [f64; 2] {
    [p.x, p.y]
}

fn ring(coords: &[[f64; 2]]) -> Vec<Vec2> {
    coords.iter().map(|&[x, y]| Vec2::new(x, y)).collect()
}

impl From<&Polygon> for PolygonDoc {
    fn from(p: &Polygon) -> Self {
        // Closed rings, as most GIS tooling expects.
        let closed = |r: &[Vec2]| -> Vec<[f64; 2]> {
            r.iter().chain(r.first()).copied().map(xy).collect()
        };
        Self {
            exterior: closed(p.exterior()),
            interiors: p.interiors().iter().map(|h| closed(h)).collect(),
        }
    }
}

impl From<&PolygonDoc> for Polygon {
    fn from(d: &PolygonDoc) -> Self {
        Polygon::new(ring(&d.exterior), d.interiors.iter().map(|h| ring(h)).collect())
    }
}

impl RegionDoc {
    pub fn into_region(self) -> MultiPolygon {
        match self {
            RegionDoc::Single(p) => MultiPolygon::from(Polygon::from(&p)),
            RegionDoc::Multi(ps) => ps.iter().map(Polygon::from).collect(),
        }
    }
}

pub fn multipolygon_doc(m: &MultiPolygon) -> Vec<PolygonDoc> {
    m.iter().map(PolygonDoc::from).collect()
}

pub fn line_doc(l: &LineString) -> Vec<[f64; 2]> {
    l.coords.iter().copied().map(xy).collect()
}

/// Read a region from a JSON file; fails on empty regions.
pub fn read_region(path: &Path) -> Result<MultiPolygon> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let doc: RegionDoc = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing region JSON in {}", path.display()))?;
    let region = doc.into_region();
    if region.is_empty() {
        bail!("{} holds no polygon with at least 3 vertices", path.display());
    }
    Ok(region)
}

/// Write pretty JSON to `out`, creating parent directories.
pub fn write_json<T: Serialize>(out: &Path, value: &T) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    fs::write(out, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", out.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reads_single_and_multi_regions() {
        let dir = tempdir().unwrap();
        let single = dir.path().join("single.json");
        fs::write(&single, r#"{"exterior": [[0,0],[2,0],[2,2],[0,2],[0,0]]}"#).unwrap();
        let r = read_region(&single).unwrap();
        assert_eq!(r.num_parts(), 1);
        assert!((r.area() - 4.0).abs() < 1e-12);

        let multi = dir.path().join("multi.json");
        fs::write(
            &multi,
            r#"[{"exterior": [[0,0],[1,0],[1,1]]},
                {"exterior": [[5,5],[9,5],[9,9],[5,9]], "interiors": [[[6,6],[7,6],[7,7],[6,7]]]}]"#,
        )
        .unwrap();
        let r = read_region(&multi).unwrap();
        assert_eq!(r.num_parts(), 2);
        assert!((r.area() - 0.5 - 15.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_empty_and_malformed_input() {
        let dir = tempdir().unwrap();
        let empty = dir.path().join("empty.json");
        fs::write(&empty, "[]").unwrap();
        assert!(read_region(&empty).is_err());
        let bad = dir.path().join("bad.json");
        fs::write(&bad, r#"{"outside": []}"#).unwrap();
        assert!(read_region(&bad).is_err());
        assert!(read_region(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn polygon_docs_are_closed() {
        let p = Polygon::from_xy(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        let doc = PolygonDoc::from(&p);
        assert_eq!(doc.exterior.len(), 4);
        assert_eq!(doc.exterior.first(), doc.exterior.last());
        assert_eq!(Polygon::from(&doc), p);
    }

    #[test]
    fn write_json_creates_parents() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("nested/deeper/out.json");
        write_json(&out, &vec![[1.0, 2.0]]).unwrap();
        let back: Vec<[f64; 2]> = serde_json::from_slice(&fs::read(out).unwrap()).unwrap();
        assert_eq!(back, vec![[1.0, 2.0]]);
    }
}
