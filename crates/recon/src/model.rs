use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::de;

// ---------------------------------------------------------------------------
// Input: source-shaped observations
// ---------------------------------------------------------------------------

/// A skin entry nested under an item (primary values source or info seed).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkinEntry {
    #[serde(default, deserialize_with = "de::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub rarity: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub obtainment: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub ingame_image: Option<String>,
    #[serde(rename = "regValue", default)]
    pub reg_value: Option<Value>,
    #[serde(rename = "robuxPrice", default)]
    pub robux_price: Option<Value>,
    #[serde(default, deserialize_with = "de::truthy")]
    pub tradeable: Option<bool>,
    #[serde(rename = "regTrend", default, deserialize_with = "de::text")]
    pub reg_trend: Option<String>,
}

/// Per-ability awakening cost breakdown.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AwakeningPrice {
    #[serde(default)]
    pub z: Option<Value>,
    #[serde(default)]
    pub x: Option<Value>,
    #[serde(default)]
    pub c: Option<Value>,
    #[serde(default)]
    pub v: Option<Value>,
    #[serde(default)]
    pub f: Option<Value>,
}

/// Primary values source: one record per item, numerics plus nested skins.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryFruit {
    #[serde(default, deserialize_with = "de::text")]
    pub name: Option<String>,
    #[serde(default)]
    pub reg_value: Option<Value>,
    #[serde(default)]
    pub perm_value: Option<Value>,
    #[serde(default)]
    pub robux_price: Option<Value>,
    #[serde(default, deserialize_with = "de::truthy")]
    pub tradeable: Option<bool>,
    #[serde(default, deserialize_with = "de::text")]
    pub rarity: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub reg_trend: Option<String>,
    #[serde(default)]
    pub beli_price: Option<Value>,
    #[serde(default, deserialize_with = "de::text")]
    pub fruit_type: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub perm_trend: Option<String>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub awakening_price: Option<AwakeningPrice>,
    #[serde(default, deserialize_with = "de::lenient_list")]
    pub skins: Vec<SkinEntry>,
}

/// Secondary numeric-only source.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondaryFruit {
    #[serde(default, deserialize_with = "de::text")]
    pub name: Option<String>,
    #[serde(default)]
    pub reg_value_numeric: Option<Value>,
    #[serde(default)]
    pub perm_value_numeric: Option<Value>,
    #[serde(default)]
    pub robux_price: Option<Value>,
}

/// One material requirement of an upgrade.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upgrade {
    #[serde(default, deserialize_with = "de::string")]
    pub name: String,
    #[serde(default, deserialize_with = "de::int")]
    pub amount: i64,
}

/// Metadata/enrichment source (static seed).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InfoFruit {
    #[serde(default, deserialize_with = "de::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub rarity: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "de::text")]
    pub fruit_type: Option<String>,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub robux_price: Option<Value>,
    #[serde(default)]
    pub awakening: Option<Value>,
    #[serde(default, deserialize_with = "de::lenient_list")]
    pub upgrading: Vec<Upgrade>,
    #[serde(default, deserialize_with = "de::lenient_list")]
    pub skins: Vec<SkinEntry>,
}

/// Skins-only source: compound, unresolved names like "Purple Lightning".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkinListing {
    #[serde(default, deserialize_with = "de::text")]
    pub name: Option<String>,
    #[serde(default)]
    pub reg_value: Option<Value>,
    #[serde(default)]
    pub robux_price: Option<Value>,
    #[serde(default, deserialize_with = "de::truthy")]
    pub tradeable: Option<bool>,
    #[serde(default, deserialize_with = "de::text")]
    pub reg_trend: Option<String>,
}

/// A purchasable pass from either values source.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamepassListing {
    #[serde(default, deserialize_with = "de::text")]
    pub name: Option<String>,
    #[serde(default)]
    pub reg_value: Option<Value>,
    #[serde(default)]
    pub reg_value_numeric: Option<Value>,
    #[serde(default)]
    pub robux_price: Option<Value>,
    #[serde(default, deserialize_with = "de::truthy")]
    pub tradeable: Option<bool>,
    #[serde(default, deserialize_with = "de::text")]
    pub reg_trend: Option<String>,
}

/// Fully materialized inputs for one reconciliation run.
#[derive(Debug, Clone, Default)]
pub struct ReconInput {
    pub listings: Vec<SkinListing>,
    pub primary: Vec<PrimaryFruit>,
    pub secondary: Vec<SecondaryFruit>,
    pub info: Vec<InfoFruit>,
    pub gamepasses: Vec<GamepassListing>,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwakeningCost {
    pub z: i64,
    pub x: i64,
    pub c: i64,
    pub v: i64,
    pub f: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkinRecord {
    pub name: String,
    pub rarity: String,
    pub image: String,
    pub ingame_image: String,
    pub obtainment: String,
    #[serde(rename = "regTrend")]
    pub reg_trend: String,
    #[serde(rename = "regValue")]
    pub reg_value: i64,
    pub tradeable: bool,
    #[serde(rename = "robuxPrice")]
    pub robux_price: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FruitRecord {
    pub name: String,
    pub reg_value: i64,
    pub perm_value: i64,
    pub rarity: String,
    pub reg_trend: String,
    pub beli_price: i64,
    pub fruit_type: String,
    pub perm_trend: String,
    pub tradeable: bool,
    pub robux_price: i64,
    pub image: String,
    pub awakening: AwakeningCost,
    pub upgrading: Vec<Upgrade>,
    pub skins: Vec<SkinRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamepassRecord {
    pub name: String,
    pub reg_trend: String,
    pub reg_value: i64,
    pub tradeable: bool,
    pub robux_price: i64,
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchKind {
    /// Keys seen by one source only, ignoring keys present in the final skin map.
    Unmatched,
    /// Raw source-vs-source difference.
    Presence,
}

impl std::fmt::Display for MismatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unmatched => write!(f, "unmatched"),
            Self::Presence => write!(f, "presence"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkinMismatch {
    pub fruit: String,
    pub kind: MismatchKind,
    pub only_in_listings: Vec<String>,
    pub only_in_info: Vec<String>,
}

impl std::fmt::Display for SkinMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "- {}: only_in_listings={:?}, only_in_info={:?}",
            self.fruit, self.only_in_listings, self.only_in_info
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconReport {
    pub mismatches: Vec<SkinMismatch>,
    /// Sorted, de-duplicated skin listing names no strategy could attribute.
    pub unresolved: Vec<String>,
}

impl ReconReport {
    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty() && self.unresolved.is_empty()
    }

    /// Operator-facing text lines.
    pub fn lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        if !self.mismatches.is_empty() {
            out.push("UNMATCHED SKINS (by fruit):".to_string());
            out.extend(self.mismatches.iter().map(|m| m.to_string()));
        }
        if !self.unresolved.is_empty() {
            out.push("STILL UNRESOLVED SKIN LISTINGS:".to_string());
            out.extend(self.unresolved.iter().map(|n| format!(" - {n}")));
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconSummary {
    pub fruits: usize,
    pub skins: usize,
    pub gamepasses: usize,
    pub mismatches: usize,
    pub unresolved: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub summary: ReconSummary,
    pub fruits: Vec<FruitRecord>,
    pub gamepasses: Vec<GamepassRecord>,
    pub report: ReconReport,
}

/// Stock rotation as delivered by the stock collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    #[serde(default)]
    pub normal: Vec<Value>,
    #[serde(default)]
    pub mirage: Vec<Value>,
}

/// The combined document served to clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub stock: Stock,
    pub fruits: Vec<FruitRecord>,
    pub gamepasses: Vec<GamepassRecord>,
    pub specials: Vec<Value>,
}
