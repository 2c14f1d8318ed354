// Source shaping: raw collaborator dumps -> per-kind record documents

use serde_json::{Map, Value};

use crate::error::StoreError;
use crate::names;
use crate::store::FileStore;

/// Noise keys removed from every primary-source item.
const DROP_KEYS: &[&str] = &[
    "id",
    "position",
    "image",
    "updatedAt",
    "itemId",
    "createdAt",
    "history",
    "hype",
    "bestUsedFor",
    "value",
    "trend",
    "tier",
    "type",
    "demand",
    "regDemand",
    "permDemand",
];

/// Fruit-only keys removed from passes, skins and specials.
const NON_FRUIT_KEYS: &[&str] = &[
    "category",
    "rarity",
    "beliPrice",
    "fruitType",
    "permTrend",
    "permValue",
];

/// Name marker separating specials from skin listings.
const SPECIAL_MARKER: &str = "Dragon Token";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrimaryDocuments {
    pub fruits: Vec<Value>,
    pub gamepasses: Vec<Value>,
    pub skins: Vec<Value>,
    pub specials: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SecondaryDocuments {
    pub fruits: Vec<Value>,
    pub gamepasses: Vec<Value>,
}

/// Documents written by [`shape_storage`], by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapeReport {
    pub written: Vec<(String, usize)>,
}

// ---------------------------------------------------------------------------
// Primary values dump
// ---------------------------------------------------------------------------

/// Merge `metadata` into the item without overwriting, then drop noise keys.
pub fn normalize_item(mut item: Map<String, Value>) -> Map<String, Value> {
    if let Some(Value::Object(meta)) = item.remove("metadata") {
        for (k, v) in meta {
            item.entry(k).or_insert(v);
        }
    }
    for key in DROP_KEYS {
        item.remove(*key);
    }
    item
}

/// Partition a `{ "items": [...] }` dump by category.
pub fn shape_primary(dump: &Value) -> Result<PrimaryDocuments, StoreError> {
    let items = dump
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| StoreError::Shape("primary dump has no 'items' array".into()))?;

    let mut docs = PrimaryDocuments::default();
    for raw in items {
        let Value::Object(raw) = raw else {
            log::warn!("skipping non-object item in primary dump");
            continue;
        };
        let mut item = normalize_item(raw.clone());
        let category = item
            .get("category")
            .and_then(Value::as_str)
            .unwrap_or("")
            .trim()
            .to_string();

        match category.as_str() {
            "Fruits" => {
                item.remove("category");
                docs.fruits.push(Value::Object(item));
            }
            "Gamepasses" => {
                strip(&mut item, NON_FRUIT_KEYS);
                docs.gamepasses.push(Value::Object(item));
            }
            _ => {
                let special = item
                    .get("name")
                    .and_then(Value::as_str)
                    .is_some_and(|n| n.contains(SPECIAL_MARKER));
                strip(&mut item, NON_FRUIT_KEYS);
                if special {
                    item.remove("robuxPrice");
                    docs.specials.push(Value::Object(item));
                } else {
                    docs.skins.push(Value::Object(item));
                }
            }
        }
    }

    log::info!(
        "primary dump: {} fruits, {} gamepasses, {} skins, {} specials",
        docs.fruits.len(),
        docs.gamepasses.len(),
        docs.skins.len(),
        docs.specials.len()
    );
    Ok(docs)
}

// ---------------------------------------------------------------------------
// Secondary scraped dump
// ---------------------------------------------------------------------------

/// Flatten `values: [{raw, numeric}, ...]` tiers into named fields.
pub fn shape_secondary(dump: &Value) -> Result<SecondaryDocuments, StoreError> {
    let fruits = secondary_list(dump, "fruits")?
        .iter()
        .filter_map(|v| flatten_tiers(v, &["regValue", "permValue"]))
        .collect();
    let gamepasses = secondary_list(dump, "gamepasses")?
        .iter()
        .filter_map(|v| flatten_tiers(v, &["regValue"]))
        .collect();

    Ok(SecondaryDocuments { fruits, gamepasses })
}

fn secondary_list<'a>(dump: &'a Value, key: &str) -> Result<&'a Vec<Value>, StoreError> {
    dump.get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| StoreError::Shape(format!("secondary dump has no '{key}' array")))
}

fn flatten_tiers(entry: &Value, tiers: &[&str]) -> Option<Value> {
    let Value::Object(entry) = entry else {
        log::warn!("skipping non-object entry in secondary dump");
        return None;
    };
    let mut entry = entry.clone();
    let values = match entry.remove("values") {
        Some(Value::Array(values)) => values,
        _ => Vec::new(),
    };
    for (i, prefix) in tiers.iter().enumerate() {
        match values.get(i) {
            Some(tier) => {
                let numeric = tier.get("numeric").cloned().unwrap_or(Value::Null);
                let raw = tier.get("raw").cloned().unwrap_or(Value::Null);
                entry.insert(format!("{prefix}Numeric"), numeric);
                entry.insert(format!("{prefix}Raw"), raw);
            }
            None => log::warn!(
                "'{}' has no value tier {i}",
                entry.get("name").and_then(Value::as_str).unwrap_or("?")
            ),
        }
    }
    Some(Value::Object(entry))
}

// ---------------------------------------------------------------------------
// Storage step
// ---------------------------------------------------------------------------

/// Shape whichever raw dumps are present in storage and write the results.
pub fn shape_storage(store: &FileStore) -> Result<ShapeReport, StoreError> {
    let mut report = ShapeReport::default();

    if let Some(dump) = store.read_optional::<Value>(names::RAW_BFV)? {
        let docs = shape_primary(&dump)?;
        for (name, list) in [
            (names::BFV_FRUITS, &docs.fruits),
            (names::BFV_GAMEPASSES, &docs.gamepasses),
            (names::BFV_SKINS, &docs.skins),
            (names::BFV_SPECIALS, &docs.specials),
        ] {
            store.write_json(name, list)?;
            report.written.push((name.to_string(), list.len()));
        }
    }

    if let Some(dump) = store.read_optional::<Value>(names::RAW_FRUITY)? {
        let docs = shape_secondary(&dump)?;
        for (name, list) in [
            (names::FRUITY_FRUITS, &docs.fruits),
            (names::FRUITY_GAMEPASSES, &docs.gamepasses),
        ] {
            store.write_json(name, list)?;
            report.written.push((name.to_string(), list.len()));
        }
    }

    Ok(report)
}

fn strip(item: &mut Map<String, Value>, keys: &[&str]) {
    for key in keys {
        item.remove(*key);
    }
}
