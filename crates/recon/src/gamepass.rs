//! Skin-less aggregator for purchasable passes from both values sources.
//!
//! The value is `regValueNumeric`, or `regValue` when the former is absent or null.

use crate::model::{GamepassListing, GamepassRecord};
use crate::normalize::{normalize, pick_display_name};
use crate::numeric::{mean_rounded, most_frequent_nonempty, numeric_only};
use crate::ordered::OrderedMap;

#[derive(Debug, Default)]
struct PassBucket {
    names: Vec<String>,
    reg_values: Vec<i64>,
    robux_prices: Vec<i64>,
    trends: Vec<String>,
    tradeables: Vec<bool>,
}

/// Merge listings keyed by letters-only name, in first-seen order.
pub fn merge_gamepasses(listings: &[GamepassListing]) -> Vec<GamepassRecord> {
    let mut buckets: OrderedMap<PassBucket> = OrderedMap::new();

    for listing in listings {
        let Some(name) = listing.name.as_deref().filter(|n| !n.is_empty()) else {
            continue;
        };
        let bucket = buckets.get_or_insert_with(&normalize(name), PassBucket::default);
        bucket.names.push(name.to_string());

        let value = listing
            .reg_value_numeric
            .as_ref()
            .or(listing.reg_value.as_ref())
            .and_then(numeric_only);
        bucket.reg_values.extend(value);
        bucket
            .robux_prices
            .extend(listing.robux_price.as_ref().and_then(numeric_only));
        bucket.trends.push(listing.reg_trend.clone().unwrap_or_default());
        bucket.tradeables.push(listing.tradeable.unwrap_or(false));
    }

    let records: Vec<GamepassRecord> = buckets
        .iter()
        .map(|(_, b)| GamepassRecord {
            name: pick_display_name(&b.names),
            reg_trend: most_frequent_nonempty(&b.trends),
            reg_value: mean_rounded(&b.reg_values),
            tradeable: b.tradeables.iter().any(|t| *t),
            robux_price: mean_rounded(&b.robux_prices),
        })
        .collect();
    log::debug!("merged {} gamepass listings into {}", listings.len(), records.len());
    records
}
