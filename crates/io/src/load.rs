// Lenient record loading from shaped documents

use serde::de::DeserializeOwned;
use serde_json::Value;

use fruitdex_recon::model::{ReconInput, Stock};

use crate::error::StoreError;
use crate::names;
use crate::seed;
use crate::store::FileStore;

/// Everything one `build` needs, read from storage.
#[derive(Debug, Clone, Default)]
pub struct Sources {
    pub input: ReconInput,
    pub stock: Stock,
    pub specials: Vec<Value>,
}

/// Convert a JSON array element by element, skipping elements that do not fit.
pub fn records<T: DeserializeOwned>(doc: Value, source: &str) -> Vec<T> {
    let Value::Array(items) = doc else {
        log::warn!("{source}: expected a JSON array, ignoring document");
        return Vec::new();
    };
    let total = items.len();
    let out: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("{source}: skipping malformed record {i}: {e}");
                None
            }
        })
        .collect();
    log::debug!("{source}: loaded {} of {total} records", out.len());
    out
}

fn required<T: DeserializeOwned>(store: &FileStore, name: &str) -> Result<Vec<T>, StoreError> {
    Ok(records(store.read_json(name)?, name))
}

fn optional<T: DeserializeOwned>(store: &FileStore, name: &str) -> Result<Vec<T>, StoreError> {
    Ok(store
        .read_optional(name)?
        .map(|doc| records(doc, name))
        .unwrap_or_default())
}

/// Read every shaped document.
///
/// The primary fruit list is required. Skins, secondary values, gamepasses,
/// stock and specials degrade to empty; a missing info document falls back
/// to the embedded seed.
pub fn sources(store: &FileStore) -> Result<Sources, StoreError> {
    let primary = required(store, names::BFV_FRUITS)?;
    let listings = optional(store, names::BFV_SKINS)?;
    let secondary = optional(store, names::FRUITY_FRUITS)?;

    let info = match store.read_optional::<Value>(names::INFO)? {
        Some(doc) => records(doc, names::INFO),
        None => {
            log::info!("{} absent, using embedded seed", names::INFO);
            records(seed::info_catalog()?, "embedded seed")
        }
    };

    // Secondary-source passes come first.
    let mut gamepasses = optional(store, names::FRUITY_GAMEPASSES)?;
    gamepasses.extend(optional(store, names::BFV_GAMEPASSES)?);

    let stock = match store.read_optional::<Value>(names::STOCK)? {
        Some(doc) => serde_json::from_value(doc).unwrap_or_else(|e| {
            log::warn!("{}: unexpected shape ({e}), using empty stock", names::STOCK);
            Stock::default()
        }),
        None => Stock::default(),
    };
    let specials = optional(store, names::BFV_SPECIALS)?;

    Ok(Sources {
        input: ReconInput {
            listings,
            primary,
            secondary,
            info,
            gamepasses,
        },
        stock,
        specials,
    })
}
