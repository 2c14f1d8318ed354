//! Reduce buckets to output records and collect the skin mismatch report.

use std::collections::BTreeSet;

use crate::aggregate::{AwakeningParts, Buckets, ItemBucket, SkinAggregator};
use crate::model::{AwakeningCost, FruitRecord, MismatchKind, SkinMismatch, SkinRecord};
use crate::normalize::{pick_display_name, pretty_from_key};
use crate::numeric::{mean_rounded, mentions_trading, most_frequent_nonempty, robux_from_text};

/// Output records in bucket-creation order, plus per-item mismatches.
pub fn finalize(buckets: &Buckets) -> (Vec<FruitRecord>, Vec<SkinMismatch>) {
    let mut fruits = Vec::with_capacity(buckets.len());
    let mut mismatches = Vec::new();

    for (_, bucket) in buckets.iter() {
        let record = finalize_item(bucket);
        mismatches.extend(skin_mismatches(&record.name, bucket));
        fruits.push(record);
    }

    (fruits, mismatches)
}

fn finalize_item(b: &ItemBucket) -> FruitRecord {
    let reg_value = mean_rounded(&b.reg_values);
    let robux_price = mean_rounded(&b.robux_prices);
    let reg_trend = b.reg_trend.clone().unwrap_or_default();

    let skins = b
        .skins
        .iter()
        .map(|(_, agg)| finalize_skin(agg, reg_value, &reg_trend, robux_price))
        .collect();

    FruitRecord {
        name: pick_display_name(&b.names),
        reg_value,
        perm_value: mean_rounded(&b.perm_values),
        rarity: b.rarity.clone().unwrap_or_default(),
        reg_trend,
        beli_price: b.beli_price.unwrap_or(0),
        fruit_type: b
            .info_type
            .clone()
            .or_else(|| b.fruit_type.clone())
            .unwrap_or_default(),
        perm_trend: b.perm_trend.clone().unwrap_or_default(),
        tradeable: b.tradeables.iter().any(|t| *t),
        robux_price,
        image: String::new(),
        awakening: awakening_cost(b.awakening.unwrap_or_default(), b.awakening_fallback),
        upgrading: b.upgrading.clone(),
        skins,
    }
}

/// Total is the sum of the breakdown, or the scalar fallback when that sum is 0.
fn awakening_cost(parts: AwakeningParts, fallback: i64) -> AwakeningCost {
    let sum = parts.sum();
    AwakeningCost {
        z: parts.z,
        x: parts.x,
        c: parts.c,
        v: parts.v,
        f: parts.f,
        total: if sum != 0 { sum } else { fallback },
    }
}

fn finalize_skin(
    agg: &SkinAggregator,
    item_value: i64,
    item_trend: &str,
    item_robux: i64,
) -> SkinRecord {
    let obtainment = agg.obtainment.clone().unwrap_or_default();

    let reg_value = match mean_rounded(&agg.reg_values) {
        0 => item_value,
        v => v,
    };
    let reg_trend = match most_frequent_nonempty(&agg.reg_trends) {
        t if t.is_empty() => item_trend.to_string(),
        t => t,
    };
    let robux_price = match mean_rounded(&agg.robux_prices) {
        0 => robux_from_text(&obtainment)
            .filter(|v| *v != 0)
            .unwrap_or(item_robux),
        v => v,
    };

    SkinRecord {
        name: pick_display_name(&agg.names),
        rarity: agg.rarity.clone().unwrap_or_default(),
        image: agg.image.clone().unwrap_or_default(),
        ingame_image: agg.ingame_image.clone().unwrap_or_default(),
        tradeable: agg.tradeables.iter().any(|t| *t) || mentions_trading(&obtainment),
        obtainment,
        reg_trend,
        reg_value,
        robux_price,
    }
}

fn skin_mismatches(fruit: &str, b: &ItemBucket) -> Vec<SkinMismatch> {
    let present: BTreeSet<String> = b.skins.keys().map(str::to_string).collect();
    let listings = &b.listing_skin_keys;
    let info = &b.info_skin_keys;

    let mut out = Vec::new();

    let unmatched_listings = only_in(listings, info, Some(&present));
    let unmatched_info = only_in(info, listings, Some(&present));
    if !unmatched_listings.is_empty() || !unmatched_info.is_empty() {
        out.push(SkinMismatch {
            fruit: fruit.to_string(),
            kind: MismatchKind::Unmatched,
            only_in_listings: display_names(b, &unmatched_listings),
            only_in_info: display_names(b, &unmatched_info),
        });
    }

    let presence_listings = only_in(listings, info, None);
    let presence_info = only_in(info, listings, None);
    if !presence_listings.is_empty() || !presence_info.is_empty() {
        out.push(SkinMismatch {
            fruit: fruit.to_string(),
            kind: MismatchKind::Presence,
            only_in_listings: display_names(b, &presence_listings),
            only_in_info: display_names(b, &presence_info),
        });
    }

    out
}

fn only_in(
    keys: &BTreeSet<String>,
    other: &BTreeSet<String>,
    present: Option<&BTreeSet<String>>,
) -> Vec<String> {
    keys.iter()
        .filter(|k| !other.contains(*k))
        .filter(|k| present.map_or(true, |p| !p.contains(*k)))
        .cloned()
        .collect()
}

/// First recorded skin name for each key, else the key title-cased; sorted.
fn display_names(b: &ItemBucket, keys: &[String]) -> Vec<String> {
    let mut names: Vec<String> = keys
        .iter()
        .map(|k| {
            b.skins
                .get(k)
                .and_then(|agg| agg.names.first().cloned())
                .unwrap_or_else(|| pretty_from_key(k))
        })
        .collect();
    names.sort();
    names
}
