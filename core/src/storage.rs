use std::path::Path;

use anyhow::{Context, Result};

use crate::config::EngineCfg;
use crate::genetics::GeneCatalog;

/// Leser inn motor-konfig fra disk (JSON).
/// Hvis filen ikke finnes, returneres standardkonfig.
pub fn load_config(path: impl AsRef<Path>) -> Result<EngineCfg> {
    let path = path.as_ref();
    if !path.exists() {
        log::warn!("config not found at {}, using defaults", path.display());
        return Ok(EngineCfg::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: EngineCfg = serde_json::from_str(&contents)
        .with_context(|| format!("parsing config {}", path.display()))?;
    log::info!("config loaded from {}", path.display());
    Ok(cfg)
}

/// Lagrer konfig til disk som JSON (pretty-print).
pub fn save_config(cfg: &EngineCfg, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(cfg)?;
    std::fs::write(path, json).with_context(|| format!("writing config {}", path.display()))?;
    log::info!("config saved to {}", path.display());
    Ok(())
}

/// Leser genkatalog fra disk; mangler filen brukes den innebygde.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<GeneCatalog> {
    let path = path.as_ref();
    if !path.exists() {
        log::warn!("gene catalog not found at {}, using builtin", path.display());
        return Ok(GeneCatalog::builtin().clone());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading gene catalog {}", path.display()))?;
    let catalog: GeneCatalog = serde_json::from_str(&contents)
        .with_context(|| format!("parsing gene catalog {}", path.display()))?;
    log::info!(
        "gene catalog loaded from {} ({} categories)",
        path.display(),
        catalog.categories().len()
    );
    Ok(catalog)
}

pub fn save_catalog(catalog: &GeneCatalog, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(catalog)?;
    std::fs::write(path, json).with_context(|| format!("writing gene catalog {}", path.display()))?;
    Ok(())
}
