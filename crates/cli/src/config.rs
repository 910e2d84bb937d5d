//! Classifier configuration for the CLI.
//!
//! Sources, lowest to highest priority:
//! 1. `ClassifyCfg::default()`
//! 2. `--config <file.toml>`
//! 3. Environment variables (`SHAPEID_ANGLE_TOL=3.0` -> `angle_tol`)
//! 4. Command-line flags (`--angle-tol`, `--length-tol`)

use anyhow::{anyhow, bail, Context, Result};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use shapeid::ClassifyCfg;
use std::path::Path;

/// Flag values that override file and environment settings.
#[derive(Clone, Copy, Debug, Default)]
pub struct Overrides {
    pub angle_tol: Option<f64>,
    pub length_tol: Option<f64>,
}

pub fn load(file: Option<&Path>, overrides: Overrides) -> Result<ClassifyCfg> {
    let mut figment = Figment::from(Serialized::defaults(ClassifyCfg::default()));
    if let Some(path) = file {
        if !path.exists() {
            bail!("config file {} does not exist", path.display());
        }
        figment = figment.merge(Toml::file(path));
    }
    figment = figment.merge(Env::prefixed("SHAPEID_"));
    let mut cfg: ClassifyCfg = figment.extract().context("reading classifier config")?;
    if let Some(v) = overrides.angle_tol {
        cfg.angle_tol = v;
    }
    if let Some(v) = overrides.length_tol {
        cfg.length_tol = v;
    }
    cfg.validate().map_err(|msg| anyhow!("invalid classifier config: {msg}"))?;
    tracing::debug!(?cfg, "config");
    Ok(cfg)
}
