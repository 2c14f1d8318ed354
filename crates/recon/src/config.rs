use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;

use crate::alias::AliasTable;
use crate::error::ReconError;
use crate::normalize::normalize_words;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_name")]
    pub name: String,
    /// Display name -> display name. Both sides are compared by normalized words.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
    /// Family Bridge special case. Absent table disables it.
    #[serde(default)]
    pub bridge: Option<BridgeConfig>,
}

fn default_name() -> String {
    "catalog".into()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            name: "default".into(),
            aliases: BTreeMap::from([("Lightning".into(), "Rumble".into())]),
            bridge: Some(BridgeConfig::default()),
        }
    }
}

// ---------------------------------------------------------------------------
// Bridge
// ---------------------------------------------------------------------------

/// One item whose skins are redistributed across successor items.
///
/// `family` lists every item (source included) whose seen-by-source skin
/// sets are unioned before mismatch reporting.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    pub source: String,
    pub successors: Vec<String>,
    #[serde(default)]
    pub family: Vec<String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            source: "Dragon".into(),
            successors: vec!["East Dragon".into(), "West Dragon".into()],
            family: vec!["Dragon".into(), "East Dragon".into(), "West Dragon".into()],
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl CatalogConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: CatalogConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &std::path::Path) -> Result<Self, ReconError> {
        let input = std::fs::read_to_string(path)
            .map_err(|e| ReconError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml(&input)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        let sources: HashSet<String> = self.aliases.keys().map(|k| normalize_words(k)).collect();

        for (from, to) in &self.aliases {
            if normalize_words(from).is_empty() || normalize_words(to).is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "alias '{from}' -> '{to}': both names must contain letters"
                )));
            }
            let target = normalize_words(to);
            if target != normalize_words(from) && sources.contains(&target) {
                return Err(ReconError::AliasChain {
                    from: from.clone(),
                    to: to.clone(),
                });
            }
        }

        if let Some(ref bridge) = self.bridge {
            if normalize_words(&bridge.source).is_empty() {
                return Err(ReconError::ConfigValidation(
                    "bridge source must contain letters".into(),
                ));
            }
            if bridge.successors.is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "bridge '{}': at least one successor is required",
                    bridge.source
                )));
            }
            // Compare as the bridge resolves them, through the alias table.
            let aliases = self.alias_table();
            let source_key = aliases.canonical_key(&bridge.source);
            if bridge.successors.iter().any(|s| aliases.canonical_key(s) == source_key) {
                return Err(ReconError::BridgeSelfTarget(bridge.source.clone()));
            }
        }

        Ok(())
    }

    pub fn alias_table(&self) -> AliasTable {
        AliasTable::from_pairs(self.aliases.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
