mod io;
mod provenance;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::{json, Value};
use shapely_extra::prelude::*;
use shapely_extra::split::area_fractions;
use std::path::PathBuf;
use tracing_subscriber::fmt::SubscriberBuilder;
use tracing_subscriber::EnvFilter;

use crate::io::{line_doc, multipolygon_doc, read_region, write_json, xy, PolygonDoc};
use crate::provenance::Payload;

#[derive(Parser)]
#[command(name = "shapely-extra")]
#[command(version, about = "Shapes, grids, sampling, axes and weighted splits as JSON")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Args, Clone, Debug)]
struct Output {
    /// Write JSON here (plus a provenance sidecar) instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Clone, Debug)]
struct CellSize {
    /// Side length of a cell (or the point spacing)
    #[arg(long, default_value_t = 1.0)]
    side: f64,
    /// Cell area; overrides --side
    #[arg(long)]
    area: Option<f64>,
}

impl CellSize {
    fn size(&self) -> Size {
        match self.area {
            Some(a) => Size::Area(a),
            None => Size::Sidelength(self.side),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum ShapeKind {
    Hexagon,
    Square,
    Circle,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum GridKind {
    Point,
    Square,
    Hexagon,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum SampleKind {
    Points,
    Polygons,
}

#[derive(Subcommand, Clone, Debug)]
enum Action {
    /// Build a single regular shape
    Shape {
        #[arg(long, value_enum)]
        kind: ShapeKind,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        x: f64,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        y: f64,
        #[command(flatten)]
        cell: CellSize,
        /// Circle radius; overrides --side for circles
        #[arg(long)]
        radius: Option<f64>,
        /// Circle circumference; overrides --radius
        #[arg(long)]
        circumference: Option<f64>,
        /// Relative area tolerance for circles
        #[arg(long, default_value_t = 0.01)]
        rel_tol: f64,
        /// Absolute area tolerance for circles; overrides --rel-tol
        #[arg(long)]
        abs_tol: Option<f64>,
        #[command(flatten)]
        output: Output,
    },
    /// Cover a region with points, squares or hexagons
    Grid {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, value_enum)]
        kind: GridKind,
        #[command(flatten)]
        cell: CellSize,
        /// Cut cells to the region
        #[arg(long)]
        clip: bool,
        #[command(flatten)]
        output: Output,
    },
    /// Random points inside a region, or a random Voronoi split of it
    Sample {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, value_enum)]
        kind: SampleKind,
        #[arg(long)]
        n: usize,
        #[arg(long)]
        seed: Option<u64>,
        #[command(flatten)]
        output: Output,
    },
    /// Major and minor axis of a region
    Axes {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value_t = 100)]
        n_sample_points: usize,
        #[arg(long, default_value_t = 1)]
        seed: u64,
        #[command(flatten)]
        output: Output,
    },
    /// Split a region into parts with the given area weights
    Split {
        #[arg(long)]
        input: PathBuf,
        /// Comma-separated weights summing to 1, e.g. 0.2,0.3,0.5
        #[arg(long, value_delimiter = ',', required = true)]
        weights: Vec<f64>,
        /// Block side as a fraction of the smaller bounds extent
        #[arg(long, default_value_t = 0.05)]
        block_size: f64,
        #[command(flatten)]
        output: Output,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let cmd = Cmd::parse();
    let (payload, doc, out) = execute(cmd.action)?;
    emit(&payload, &doc, out)
}

/// Write `doc` to `out` with a sidecar, or print it.
fn emit(payload: &Payload, doc: &Value, out: Option<PathBuf>) -> Result<()> {
    match out {
        Some(path) => {
            write_json(&path, doc)?;
            let sidecar = provenance::write_sidecar(&path, payload)?;
            tracing::info!(out = %path.display(), sidecar = %sidecar.display(), "wrote");
        }
        None => println!("{}", serde_json::to_string_pretty(doc)?),
    }
    Ok(())
}

type Outcome = (Payload, Value, Option<PathBuf>);

fn execute(action: Action) -> Result<Outcome> {
    match action {
        Action::Shape {
            kind,
            x,
            y,
            cell,
            radius,
            circumference,
            rel_tol,
            abs_tol,
            output,
        } => {
            tracing::info!(?kind, x, y, "shape");
            let center = Vec2::new(x, y);
            let poly = match kind {
                ShapeKind::Hexagon => hexagon(center, cell.size())?,
                ShapeKind::Square => square(center, cell.size())?,
                ShapeKind::Circle => {
                    let size = match (cell.area, circumference, radius) {
                        (Some(a), _, _) => CircleSize::Area(a),
                        (None, Some(c), _) => CircleSize::Circumference(c),
                        (None, None, Some(r)) => CircleSize::Radius(r),
                        (None, None, None) => CircleSize::Radius(cell.side),
                    };
                    let tol = abs_tol.map_or(Tolerance::Relative(rel_tol), Tolerance::Absolute);
                    circle(center, size, tol)?
                }
            };
            let payload = Payload::new(
                "shape",
                json!({"kind": kind, "center": [x, y], "side": cell.side, "area": cell.area,
                       "radius": radius, "circumference": circumference,
                       "rel_tol": rel_tol, "abs_tol": abs_tol}),
            )
            .with_summary(json!({"vertices": poly.exterior().len(), "area": poly.area()}));
            Ok((payload, serde_json::to_value(PolygonDoc::from(&poly))?, output.out))
        }
        Action::Grid {
            input,
            kind,
            cell,
            clip,
            output,
        } => {
            let region = read_region(&input)?;
            tracing::info!(input = %input.display(), ?kind, clip, "grid");
            let params = json!({"input": input, "kind": kind, "side": cell.side,
                                "area": cell.area, "clip": clip});
            let (doc, count) = match kind {
                GridKind::Point => {
                    let pts = point_grid(&region, cell.side)?;
                    let doc: Vec<[f64; 2]> = pts.into_iter().map(xy).collect();
                    let n = doc.len();
                    (serde_json::to_value(doc)?, n)
                }
                GridKind::Square | GridKind::Hexagon => {
                    let cells = if kind == GridKind::Square {
                        square_grid(&region, cell.size(), clip)?
                    } else {
                        hexagon_grid(&region, cell.size(), clip)?
                    };
                    let doc: Vec<_> = cells.iter().map(multipolygon_doc).collect();
                    (serde_json::to_value(doc)?, cells.len())
                }
            };
            let payload = Payload::new("grid", params).with_summary(json!({"count": count}));
            Ok((payload, doc, output.out))
        }
        Action::Sample {
            input,
            kind,
            n,
            seed,
            output,
        } => {
            let region = read_region(&input)?;
            tracing::info!(input = %input.display(), ?kind, n, seed, "sample");
            let doc = match kind {
                SampleKind::Points => {
                    let pts = sample_points_in_polygon(&region, n, seed)?;
                    serde_json::to_value(pts.into_iter().map(xy).collect::<Vec<_>>())?
                }
                SampleKind::Polygons => {
                    let pieces = sample_polygons(&region, n, SplitMethod::Voronoi, seed)?;
                    serde_json::to_value(pieces.iter().map(multipolygon_doc).collect::<Vec<_>>())?
                }
            };
            let payload = Payload::new(
                "sample",
                json!({"input": input, "kind": kind, "n": n, "seed": seed}),
            );
            Ok((payload, doc, output.out))
        }
        Action::Axes {
            input,
            n_sample_points,
            seed,
            output,
        } => {
            let region = read_region(&input)?;
            tracing::info!(input = %input.display(), n_sample_points, seed, "axes");
            let major = major_axis(&region, n_sample_points, Some(seed))?;
            let minor = minor_axis(&region, Some(&major), n_sample_points, Some(seed))?;
            let doc = json!({"major": line_doc(&major), "minor": line_doc(&minor)});
            let payload = Payload::new(
                "axes",
                json!({"input": input, "n_sample_points": n_sample_points, "seed": seed}),
            )
            .with_summary(json!({"major_length": major.length(), "minor_length": minor.length()}));
            Ok((payload, doc, output.out))
        }
        Action::Split {
            input,
            weights,
            block_size,
            output,
        } => {
            let region = read_region(&input)?;
            tracing::info!(input = %input.display(), ?weights, block_size, "split");
            let mut splitter = BlockSplitter::new(&region, weights.clone(), block_size)
                .context("configuring block splitter")?;
            splitter.prepare()?;
            let splits = splitter.optimize()?.to_vec();
            let parts = splitter.final_shapes()?;
            let fractions = area_fractions(&parts);
            tracing::info!(pieces = splitter.pieces().len(), ?splits, ?fractions, "split done");
            let doc = json!({
                "weights": weights,
                "fractions": fractions,
                "parts": parts.iter().map(multipolygon_doc).collect::<Vec<_>>()
            });
            let payload = Payload::new(
                "split",
                json!({"input": input, "weights": weights, "block_size": block_size}),
            )
            .with_summary(json!({"pieces": splitter.pieces().len(), "splits": splits}));
            Ok((payload, doc, output.out))
        }
        Action::Report => {
            let payload = Payload::new("report", json!({}));
            let doc = provenance::document(&payload, &[]);
            Ok((payload, doc, None))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn run(args: &[&str]) -> Outcome {
        let cmd = Cmd::try_parse_from(std::iter::once("shapely-extra").chain(args.iter().copied()))
            .unwrap();
        execute(cmd.action).unwrap()
    }

    fn write_square(dir: &Path) -> PathBuf {
        let path = dir.join("square.json");
        fs::write(&path, r#"{"exterior": [[0,0],[10,0],[10,10],[0,10]]}"#).unwrap();
        path
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cmd::command().debug_assert();
    }

    #[test]
    fn shape_prints_closed_polygon() {
        let (_, doc, out) = run(&["shape", "--kind", "hexagon", "--x", "-1", "--side", "2"]);
        assert!(out.is_none());
        let poly: PolygonDoc = serde_json::from_value(doc).unwrap();
        assert_eq!(poly.exterior.len(), 7);
        assert_eq!(poly.exterior[0], [1.0, 0.0]);
    }

    #[test]
    fn circle_honours_absolute_tolerance() {
        let (payload, _, _) =
            run(&["shape", "--kind", "circle", "--radius", "3", "--abs-tol", "0.001"]);
        let area = payload.summary["area"].as_f64().unwrap();
        assert!((area - std::f64::consts::PI * 9.0).abs() <= 0.001);
    }

    #[test]
    fn grid_writes_output_and_sidecar() {
        let dir = tempdir().unwrap();
        let input = write_square(dir.path());
        let out = dir.path().join("out/cells.json");
        let (payload, doc, target) = run(&[
            "grid",
            "--input",
            input.to_str().unwrap(),
            "--kind",
            "square",
            "--side",
            "5",
            "--clip",
            "--out",
            out.to_str().unwrap(),
        ]);
        emit(&payload, &doc, target).unwrap();
        let cells: Vec<Vec<PolygonDoc>> = serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
        // Centers at 0, 5 and 10 on both axes.
        assert_eq!(cells.len(), 9);
        let area: f64 = cells
            .iter()
            .flatten()
            .map(|d| shapely_extra::Polygon::from(d).area())
            .sum();
        assert!((area - 100.0).abs() < 1e-9);
        let sidecar: Value =
            serde_json::from_slice(&fs::read(dir.path().join("out/cells.provenance.json")).unwrap())
                .unwrap();
        assert_eq!(sidecar["command"], "grid");
        assert_eq!(sidecar["summary"]["count"], 9);
    }

    #[test]
    fn sampling_is_seeded() {
        let dir = tempdir().unwrap();
        let input = write_square(dir.path());
        let args = [
            "sample",
            "--input",
            input.to_str().unwrap(),
            "--kind",
            "points",
            "--n",
            "20",
            "--seed",
            "4",
        ];
        let (_, a, _) = run(&args);
        let (_, b, _) = run(&args);
        assert_eq!(a, b);
        assert_eq!(a.as_array().unwrap().len(), 20);
    }

    #[test]
    fn split_reports_fractions() {
        let dir = tempdir().unwrap();
        let input = write_square(dir.path());
        let (_, doc, _) = run(&[
            "split",
            "--input",
            input.to_str().unwrap(),
            "--weights",
            "0.5,0.5",
            "--block-size",
            "0.1",
        ]);
        let fractions: Vec<f64> = serde_json::from_value(doc["fractions"].clone()).unwrap();
        assert_eq!(fractions.len(), 2);
        assert!(fractions.iter().all(|f| (f - 0.5).abs() < 1e-9));
    }

    #[test]
    fn axes_and_report() {
        let dir = tempdir().unwrap();
        let input = write_square(dir.path());
        let (_, doc, _) = run(&["axes", "--input", input.to_str().unwrap()]);
        assert_eq!(doc["major"].as_array().unwrap().len(), 2);
        assert_eq!(doc["minor"].as_array().unwrap().len(), 2);
        let (_, report, _) = run(&["report"]);
        assert_eq!(report["command"], "report");
        assert!(report["code_rev"].is_string());
    }

    #[test]
    fn bad_weights_fail() {
        let dir = tempdir().unwrap();
        let input = write_square(dir.path());
        let cmd = Cmd::try_parse_from([
            "shapely-extra",
            "split",
            "--input",
            input.to_str().unwrap(),
            "--weights",
            "0.5,0.2",
        ])
        .unwrap();
        assert!(execute(cmd.action).is_err());
    }
}
