use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use polars::prelude::*;
use serde::Serialize;
use shapeid::outline::OutlineSummary;
use shapeid::parse::{format_points, parse_points};
use shapeid::rand::{draw_polygon, ReplayToken, SampleCfg};
use shapeid::{detect_shape, ClassifyCfg, Outline, Vec2};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;
use tracing_subscriber::EnvFilter;

mod config;
mod provenance;

#[derive(Parser)]
#[command(name = "shapeid")]
#[command(about = "Identify polygon shapes from clicked points")]
struct Cmd {
    /// TOML file with classifier tolerances
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Angle similarity window in degrees
    #[arg(long, global = true)]
    angle_tol: Option<f64>,
    /// Edge similarity window as a fraction of the mean edge
    #[arg(long, global = true)]
    length_tol: Option<f64>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Classify one outline given as "x,y x,y ..."
    Classify {
        #[arg(long, allow_hyphen_values = true)]
        points: String,
        /// Print a JSON report instead of the bare label
        #[arg(long)]
        json: bool,
    },
    /// Classify every outline in a CSV with columns shape,x,y
    Batch {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a random (optionally jittered) regular polygon and its label
    Sample {
        #[arg(long, default_value_t = 5)]
        sides: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 0)]
        index: u64,
        /// Angular and radial jitter amplitude
        #[arg(long, default_value_t = 0.0)]
        jitter: f64,
    },
    /// Print a small provenance JSON block
    Report,
}

/// One classified outline.
#[derive(Debug, Serialize)]
struct Classified {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    label: String,
    valid: bool,
    #[serde(flatten)]
    summary: OutlineSummary,
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let cmd = Cmd::parse();
    let cfg = config::load(
        cmd.config.as_deref(),
        config::Overrides {
            angle_tol: cmd.angle_tol,
            length_tol: cmd.length_tol,
        },
    )?;
    match cmd.action {
        Action::Classify { points, json } => classify(&points, json, &cfg),
        Action::Batch { input, out } => batch(&input, &out, &cfg).map(|_| ()),
        Action::Sample {
            sides,
            seed,
            index,
            jitter,
        } => sample(sides, ReplayToken { seed, index }, jitter, &cfg),
        Action::Report => report(&cfg),
    }
}

fn classify_points(id: Option<String>, points: &[Vec2], cfg: &ClassifyCfg) -> Classified {
    let outline = Outline::from_points(points, cfg);
    let shape = detect_shape(&outline, cfg);
    Classified {
        id,
        label: shape.to_string(),
        valid: shape.is_valid(),
        summary: outline.summary(),
    }
}

fn classify(points: &str, json: bool, cfg: &ClassifyCfg) -> Result<()> {
    let pts = parse_points(points).context("parsing --points")?;
    tracing::info!(points = pts.len(), "classify");
    let res = classify_points(None, &pts, cfg);
    if json {
        println!("{}", serde_json::to_string_pretty(&res)?);
    } else {
        println!("{}", res.label);
    }
    Ok(())
}

/// Group `(id, x, y)` rows into outlines, keeping first-appearance order of ids.
fn group_rows<I>(rows: I) -> Vec<(String, Vec<Vec2>)>
where
    I: IntoIterator<Item = (String, f64, f64)>,
{
    let mut order: Vec<(String, Vec<Vec2>)> = Vec::new();
    let mut slot: HashMap<String, usize> = HashMap::new();
    for (id, x, y) in rows {
        let k = *slot.entry(id.clone()).or_insert_with(|| {
            order.push((id, Vec::new()));
            order.len() - 1
        });
        order[k].1.push(Vec2::new(x, y));
    }
    order
}

fn read_outlines(input: &Path) -> Result<Vec<(String, Vec<Vec2>)>> {
    let df = LazyCsvReader::new(input)
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .finish()?
        .collect()
        .with_context(|| format!("reading {}", input.display()))?;
    tracing::info!(rows = df.height(), cols = df.width(), "input_csv_shape");
    let ids = df.column("shape")?.cast(&DataType::String)?;
    let xs = df.column("x")?.cast(&DataType::Float64)?;
    let ys = df.column("y")?.cast(&DataType::Float64)?;
    let mut rows = Vec::with_capacity(df.height());
    for (row, ((id, x), y)) in ids
        .str()?
        .into_iter()
        .zip(xs.f64()?.into_iter())
        .zip(ys.f64()?.into_iter())
        .enumerate()
    {
        match (id, x, y) {
            (Some(id), Some(x), Some(y)) if x.is_finite() && y.is_finite() => {
                rows.push((id.to_string(), x, y))
            }
            _ => bail!("row {row}: shape, x and y must all be present and finite"),
        }
    }
    Ok(group_rows(rows))
}

fn batch(input: &Path, out: &Path, cfg: &ClassifyCfg) -> Result<Vec<Classified>> {
    tracing::info!(input = %input.display(), out = %out.display(), "batch");
    let outlines = read_outlines(input)?;
    let results: Vec<Classified> = outlines
        .into_iter()
        .map(|(id, pts)| classify_points(Some(id), &pts, cfg))
        .collect();
    let invalid = results.iter().filter(|r| !r.valid).count();
    tracing::info!(outlines = results.len(), invalid, "batch_done");

    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    std::fs::write(out, serde_json::to_vec_pretty(&results)?)
        .with_context(|| format!("writing {}", out.display()))?;

    let payload = provenance::Payload::new(
        serde_json::json!({
            "input": input.to_string_lossy(),
            "outlines": results.len(),
        }),
        serde_json::to_value(cfg)?,
    );
    provenance::write_sidecar(out, payload)?;
    Ok(results)
}

/// Draw a sample polygon; returns its clicks (closed) and classification.
fn sample_outline(
    sides: usize,
    tok: ReplayToken,
    jitter: f64,
    cfg: &ClassifyCfg,
) -> Result<(Vec<Vec2>, Classified)> {
    if sides == 0 {
        bail!("--sides must be at least 1");
    }
    let scfg = SampleCfg {
        sides,
        angle_jitter_frac: jitter,
        radial_jitter: jitter,
        ..SampleCfg::default()
    };
    let mut pts = draw_polygon(scfg, tok);
    let res = classify_points(None, &pts, cfg);
    // Emit closed, the way a user would click it.
    if let Some(&first) = pts.first() {
        pts.push(first);
    }
    Ok((pts, res))
}

fn sample(sides: usize, tok: ReplayToken, jitter: f64, cfg: &ClassifyCfg) -> Result<()> {
    tracing::info!(sides, seed = tok.seed, index = tok.index, jitter, "sample");
    let (pts, res) = sample_outline(sides, tok, jitter, cfg)?;
    println!("{}", format_points(&pts));
    println!("{}", res.label);
    Ok(())
}

fn report_doc(cfg: &ClassifyCfg) -> Result<serde_json::Value> {
    let payload = provenance::Payload::new(serde_json::json!({}), serde_json::to_value(cfg)?);
    Ok(provenance::document(&payload, &[]))
}

fn report(cfg: &ClassifyCfg) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&report_doc(cfg)?)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn rows_group_by_first_appearance() {
        let rows = vec![
            ("b".to_string(), 0.0, 0.0),
            ("a".to_string(), 1.0, 1.0),
            ("b".to_string(), 2.0, 0.0),
        ];
        let groups = group_rows(rows);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "b");
        assert_eq!(groups[0].1, vec![Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0)]);
        assert_eq!(groups[1].0, "a");
    }

    #[test]
    fn classified_json_has_label_and_measurements() {
        let pts = parse_points("0,0 10,0 10,10 0,10 0,0").unwrap();
        let res = classify_points(None, &pts, &ClassifyCfg::default());
        let v = serde_json::to_value(&res).unwrap();
        assert_eq!(v["label"], "Square");
        assert_eq!(v["vertices"], 4);
        assert_eq!(v["area"], 100.0);
        assert!(v.get("id").is_none());
    }

    #[test]
    fn batch_writes_results_and_sidecar() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("clicks.csv");
        fs::write(
            &input,
            "shape,x,y\n\
             sq,0,0\nsq,10,0\nsq,10,10\nsq,0,10\nsq,0,0\n\
             tri,0,0\ntri,4,0\ntri,0,3\n\
             dot,5,5\n",
        )
        .unwrap();
        let out = dir.path().join("out").join("labels.json");
        let results = batch(&input, &out, &ClassifyCfg::default()).unwrap();
        let labels: Vec<&str> = results.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Square", "Right Triangle", "Point"]);
        assert!(out.exists());
        assert!(dir.path().join("out").join("labels.provenance.json").exists());
        let parsed: serde_json::Value = serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
        assert_eq!(parsed[1]["id"], "tri");
    }

    #[test]
    fn batch_rejects_missing_columns() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("bad.csv");
        fs::write(&input, "id,x,y\na,0,0\n").unwrap();
        let out = dir.path().join("labels.json");
        assert!(batch(&input, &out, &ClassifyCfg::default()).is_err());
    }

    #[test]
    fn sample_is_closed_and_reproducible() {
        let cfg = ClassifyCfg::default();
        let tok = ReplayToken { seed: 11, index: 2 };
        let (pts, res) = sample_outline(6, tok, 0.0, &cfg).unwrap();
        assert_eq!(pts.len(), 7);
        assert_eq!(pts.first(), pts.last());
        assert_eq!(res.label, "Hexagon");
        // the printed clicks classify the same way
        let again = parse_points(&format_points(&pts)).unwrap();
        assert_eq!(classify_points(None, &again, &cfg).label, "Hexagon");
        let (pts2, _) = sample_outline(6, tok, 0.0, &cfg).unwrap();
        assert_eq!(pts, pts2);
        assert!(sample_outline(0, tok, 0.0, &cfg).is_err());
    }

    #[test]
    fn report_carries_config_and_version() {
        let cfg = ClassifyCfg {
            angle_tol: 2.5,
            ..ClassifyCfg::default()
        };
        let doc = report_doc(&cfg).unwrap();
        assert_eq!(doc["config"]["angle_tol"], 2.5);
        assert_eq!(doc["version"], shapeid::VERSION);
        assert_eq!(doc["outputs"], serde_json::json!([]));
    }
}
