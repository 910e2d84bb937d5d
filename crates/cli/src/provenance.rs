//! Provenance for classifier outputs: which build, which tolerances, which input.

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What produced an output: run parameters plus the effective classifier config.
pub struct Payload {
    pub params: Value,
    pub config: Value,
}

impl Payload {
    pub fn new(params: Value, config: Value) -> Self {
        Self { params, config }
    }
}

/// Provenance document: code revision, crate version, config, params, outputs.
#[track_caller]
pub fn document(payload: &Payload, outputs: &[String]) -> Value {
    let at = Location::caller();
    json!({
        "code_rev": code_rev(),
        "version": shapeid::VERSION,
        "callsite": format!("{}:{}", at.file(), at.line()),
        "config": payload.config,
        "params": payload.params,
        "outputs": outputs
    })
}

/// Write the provenance document for `artifact` next to it and return its path.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let doc = document(&payload, &[artifact.display().to_string()]);
    let path = sidecar_path(artifact);
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let bytes = serde_json::to_vec_pretty(&doc)?;
    fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// `out/labels.json` -> `out/labels.provenance.json`.
fn sidecar_path(artifact: &Path) -> PathBuf {
    if artifact.file_name().is_none() {
        return artifact.join("artifact.provenance.json");
    }
    artifact.with_extension("provenance.json")
}

/// Git revision from the build env, the runtime env, or `git`, else "unknown".
pub fn code_rev() -> String {
    let from_env = option_env!("GIT_COMMIT")
        .map(str::to_string)
        .or_else(|| std::env::var("GIT_COMMIT").ok())
        .filter(|rev| !rev.is_empty());
    from_env
        .or_else(|| {
            let out = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
            out.status
                .success()
                .then(|| String::from_utf8_lossy(&out.stdout).trim().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn sidecar_sits_next_to_artifact() {
        assert_eq!(
            sidecar_path(Path::new("runs/labels.json")),
            Path::new("runs/labels.provenance.json")
        );
        assert_eq!(
            sidecar_path(Path::new("runs/labels")),
            Path::new("runs/labels.provenance.json")
        );
    }

    #[test]
    fn sidecar_records_tolerances_for_a_batch_run() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("nested").join("labels.json");
        let payload = Payload::new(
            json!({"input": "clicks.csv", "outlines": 3}),
            json!({"angle_tol": 5.0, "length_tol": 0.1}),
        );
        let path = write_sidecar(&artifact, payload).unwrap();
        assert_eq!(path, dir.path().join("nested").join("labels.provenance.json"));
        let doc: Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(doc["config"]["length_tol"], 0.1);
        assert_eq!(doc["params"]["outlines"], 3);
        assert_eq!(doc["outputs"], json!([artifact.display().to_string()]));
        assert!(doc["callsite"].as_str().unwrap().contains("provenance.rs"));
        assert!(!doc["code_rev"].as_str().unwrap().is_empty());
    }
}
