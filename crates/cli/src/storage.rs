//! Storage maintenance commands: `shape`, `seed`, `status`.

use std::path::PathBuf;
use std::time::Duration;

use fruitdex_io::{names, seed, shape, FileStore};

use crate::CliError;

pub fn cmd_shape(storage: PathBuf) -> Result<(), CliError> {
    let store = FileStore::new(storage);
    let report = shape::shape_storage(&store)?;
    if report.written.is_empty() {
        return Err(CliError::io(format!(
            "no raw dumps in {}",
            store.root().display()
        ))
        .with_hint(format!(
            "expected {} and/or {}",
            names::RAW_BFV,
            names::RAW_FRUITY
        )));
    }
    for (name, count) in &report.written {
        eprintln!("wrote {name} ({count} records)");
    }
    Ok(())
}

pub fn cmd_seed(storage: PathBuf, force: bool) -> Result<(), CliError> {
    let store = FileStore::new(storage);
    if seed::write_seed(&store, force)? {
        eprintln!("wrote {}", store.path(names::INFO).display());
    } else {
        eprintln!(
            "kept existing {} (use --force to overwrite)",
            store.path(names::INFO).display()
        );
    }
    Ok(())
}

pub fn cmd_status(storage: PathBuf, ttl: u64, json_output: bool) -> Result<(), CliError> {
    if ttl == 0 {
        return Err(CliError::usage("--ttl must be at least 1 second"));
    }
    let store = FileStore::new(storage);
    let statuses = store.statuses(names::WELL_KNOWN, Duration::from_secs(ttl));

    if json_output {
        let json = serde_json::to_string_pretty(&statuses)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{json}");
        return Ok(());
    }

    eprintln!("storage: {}", store.root().display());
    for s in &statuses {
        let state = match (s.exists, s.fresh) {
            (false, _) => "missing",
            (true, true) => "fresh",
            (true, false) => "stale",
        };
        match s.age_secs {
            Some(age) => eprintln!("  {:<28} {:<8} {:>10} B  {age}s ago", s.name, state, s.size),
            None => eprintln!("  {:<28} {state}", s.name),
        }
    }
    Ok(())
}
