//! Classify a few hand-clicked outlines and print the labels.
//!
//! Usage:
//!   cargo run -p shapeid --example click_sequences

use shapeid::parse::parse_points;
use shapeid::{detect_shape, ClassifyCfg, Outline};

const CLICKS: &[&str] = &[
    "10,10",
    "10,10 60,35",
    "10,10 60,10 35,53.3 10,10",
    "10,10 10,40 50,10 50,40",
    "10,10 50,10 50,50 10,50 10,10",
    "0,0 40,0 60,30 20,30 0,0",
];

fn main() {
    let cfg = ClassifyCfg::default();
    for (i, clicks) in CLICKS.iter().enumerate() {
        let points = match parse_points(clicks) {
            Ok(p) => p,
            Err(err) => {
                eprintln!("sample {i}: {err}");
                continue;
            }
        };
        let outline = Outline::from_points(&points, &cfg);
        let shape = detect_shape(&outline, &cfg);
        let centroid = outline
            .centroid()
            .map(|c| format!("({:.1}, {:.1})", c.x, c.y))
            .unwrap_or_else(|| "-".to_string());
        println!("sample {i}: {shape} [V={}, label at {centroid}]", outline.len());
    }
}
