//! `fruitdex build` and `fruitdex validate`.

use std::path::{Path, PathBuf};

use serde::Serialize;

use fruitdex_io::{load, names, FileStore};
use fruitdex_recon::{CatalogConfig, ReconReport, ReconSummary};

use crate::exit_codes::EXIT_STRICT_DIAGNOSTICS;
use crate::CliError;

/// Stdout document for `build --json`.
#[derive(Serialize)]
struct BuildOutput<'a> {
    output: String,
    summary: &'a ReconSummary,
    report: &'a ReconReport,
}

fn load_config(path: Option<&Path>) -> Result<CatalogConfig, CliError> {
    match path {
        Some(path) => {
            let config = CatalogConfig::from_path(path)?;
            log::info!("config '{}' from {}", config.name, path.display());
            Ok(config)
        }
        None => Ok(CatalogConfig::default()),
    }
}

pub fn cmd_build(
    storage: PathBuf,
    config_path: Option<PathBuf>,
    output: Option<PathBuf>,
    json_output: bool,
    strict: bool,
) -> Result<(), CliError> {
    let config = load_config(config_path.as_deref())?;
    let store = FileStore::new(storage);

    let sources = load::sources(&store)?;
    let result = fruitdex_recon::run(&config, &sources.input)?;
    let catalog = fruitdex_recon::assemble(&result, sources.stock, sources.specials);

    let written = match output {
        Some(path) => {
            write_catalog(&path, &catalog)?;
            path
        }
        None => store.write_json(names::ALL, &catalog)?,
    };

    for line in result.report.lines() {
        eprintln!("{line}");
    }
    let s = &result.summary;
    eprintln!(
        "catalog: {} fruits, {} skins, {} gamepasses; {} mismatches, {} unresolved -> {}",
        s.fruits,
        s.skins,
        s.gamepasses,
        s.mismatches,
        s.unresolved,
        written.display(),
    );

    if json_output {
        let doc = BuildOutput {
            output: written.display().to_string(),
            summary: &result.summary,
            report: &result.report,
        };
        let json = serde_json::to_string_pretty(&doc)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{json}");
    }

    if strict && !result.report.is_clean() {
        return Err(CliError {
            code: EXIT_STRICT_DIAGNOSTICS,
            message: "catalog written with unmatched or unresolved skins".into(),
            hint: Some("rerun without --strict to accept the report".into()),
        });
    }
    Ok(())
}

fn write_catalog(path: &Path, catalog: &fruitdex_recon::Catalog) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(catalog)
        .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| CliError::io(format!("cannot create {}: {e}", parent.display())))?;
    }
    std::fs::write(path, json)
        .map_err(|e| CliError::io(format!("cannot write {}: {e}", path.display())))
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = CatalogConfig::from_path(&config_path)?;
    match &config.bridge {
        Some(bridge) => eprintln!(
            "valid: catalog '{}' with {} alias(es), bridge '{}' -> {} successor(s)",
            config.name,
            config.aliases.len(),
            bridge.source,
            bridge.successors.len(),
        ),
        None => eprintln!(
            "valid: catalog '{}' with {} alias(es), no bridge",
            config.name,
            config.aliases.len(),
        ),
    }
    Ok(())
}
