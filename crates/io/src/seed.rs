// Embedded metadata seed

use serde_json::Value;

use crate::error::StoreError;
use crate::names;
use crate::store::FileStore;

const INFO_JSON: &str = include_str!("../data/info.json");

/// The static metadata list shipped with the crate.
pub fn info_catalog() -> Result<Value, StoreError> {
    serde_json::from_str(INFO_JSON).map_err(|e| StoreError::Json {
        path: "<embedded info seed>".into(),
        message: e.to_string(),
    })
}

/// Write the seed to storage. Returns `false` when an existing file was kept.
pub fn write_seed(store: &FileStore, force: bool) -> Result<bool, StoreError> {
    if store.exists(names::INFO) && !force {
        log::info!("{} exists, keeping it", store.path(names::INFO).display());
        return Ok(false);
    }
    store.write_json(names::INFO, &info_catalog()?)?;
    Ok(true)
}
