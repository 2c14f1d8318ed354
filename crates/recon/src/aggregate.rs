//! Per-item buckets and the four ordered aggregation passes.
//!
//! Pass order is fixed: skin listings, primary values, secondary values,
//! info seed. Every pass may create buckets; later passes only add
//! observations. Numeric fields are collected as raw observation lists and
//! only reduced at finalization.

use std::collections::{BTreeSet, HashMap};

use serde_json::Value;

use crate::alias::AliasTable;
use crate::model::{
    AwakeningPrice, InfoFruit, PrimaryFruit, SecondaryFruit, SkinEntry, SkinListing, Upgrade,
};
use crate::normalize::normalize_words;
use crate::numeric::{coerce_int, mentions_trading, robux_from_text, to_int_loose};
use crate::ordered::OrderedMap;
use crate::resolve::{Resolution, SkinResolver};

// ---------------------------------------------------------------------------
// Skin aggregator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct SkinAggregator {
    pub names: Vec<String>,
    pub rarity: Option<String>,
    pub obtainment: Option<String>,
    pub image: Option<String>,
    pub ingame_image: Option<String>,
    pub reg_values: Vec<i64>,
    pub reg_trends: Vec<String>,
    pub robux_prices: Vec<i64>,
    pub tradeables: Vec<bool>,
}

impl SkinAggregator {
    fn named(name: &str) -> Self {
        Self {
            names: vec![name.to_string()],
            ..Self::default()
        }
    }

    fn add_name(&mut self, name: &str) {
        if !self.names.iter().any(|n| n == name) {
            self.names.push(name.to_string());
        }
    }

    fn observe_numbers(
        &mut self,
        reg_value: Option<&Value>,
        robux_price: Option<&Value>,
        tradeable: Option<bool>,
        reg_trend: Option<&str>,
    ) {
        if let Some(v) = reg_value.and_then(coerce_int) {
            self.reg_values.push(v);
        }
        if let Some(v) = robux_price.and_then(coerce_int) {
            self.robux_prices.push(v);
        }
        if let Some(t) = tradeable {
            self.tradeables.push(t);
        }
        if let Some(trend) = reg_trend.filter(|t| !t.is_empty()) {
            self.reg_trends.push(trend.to_string());
        }
    }

    fn observe_listing(&mut self, listing: &SkinListing) {
        self.observe_numbers(
            listing.reg_value.as_ref(),
            listing.robux_price.as_ref(),
            listing.tradeable,
            listing.reg_trend.as_deref(),
        );
    }

    fn observe_entry(&mut self, entry: &SkinEntry) {
        fill_first(&mut self.rarity, entry.rarity.as_deref());
        fill_first(&mut self.obtainment, entry.obtainment.as_deref());
        if self.image.is_none() {
            self.image.clone_from(&entry.image);
        }
        if self.ingame_image.is_none() {
            self.ingame_image.clone_from(&entry.ingame_image);
        }
        self.observe_numbers(
            entry.reg_value.as_ref(),
            entry.robux_price.as_ref(),
            entry.tradeable,
            entry.reg_trend.as_deref(),
        );
    }

    /// Facts implied by the free-text obtainment description.
    fn infer_from_obtainment(&mut self, text: &str) {
        if mentions_trading(text) {
            self.tradeables.push(true);
        }
        if let Some(robux) = robux_from_text(text) {
            self.robux_prices.push(robux);
        }
    }

    /// Fold another aggregator's observations into this one.
    pub fn merge_from(&mut self, other: &SkinAggregator) {
        for name in &other.names {
            self.add_name(name);
        }
        fill_first(&mut self.rarity, other.rarity.as_deref());
        fill_first(&mut self.obtainment, other.obtainment.as_deref());
        if self.image.is_none() {
            self.image.clone_from(&other.image);
        }
        if self.ingame_image.is_none() {
            self.ingame_image.clone_from(&other.ingame_image);
        }
        self.reg_values.extend_from_slice(&other.reg_values);
        self.reg_trends.extend_from_slice(&other.reg_trends);
        self.robux_prices.extend_from_slice(&other.robux_prices);
        self.tradeables.extend_from_slice(&other.tradeables);
    }
}

// ---------------------------------------------------------------------------
// Item bucket
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AwakeningParts {
    pub z: i64,
    pub x: i64,
    pub c: i64,
    pub v: i64,
    pub f: i64,
}

impl AwakeningParts {
    fn from_price(price: &AwakeningPrice) -> Self {
        let part = |v: &Option<Value>| v.as_ref().map(to_int_loose).unwrap_or(0);
        Self {
            z: part(&price.z),
            x: part(&price.x),
            c: part(&price.c),
            v: part(&price.v),
            f: part(&price.f),
        }
    }

    /// Saturates at the `i64` bounds.
    pub fn sum(&self) -> i64 {
        [self.z, self.x, self.c, self.v, self.f]
            .into_iter()
            .fold(0i64, i64::saturating_add)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ItemBucket {
    pub names: Vec<String>,
    pub reg_values: Vec<i64>,
    pub perm_values: Vec<i64>,
    pub robux_prices: Vec<i64>,
    pub tradeables: Vec<bool>,
    pub rarity: Option<String>,
    pub reg_trend: Option<String>,
    pub beli_price: Option<i64>,
    pub fruit_type: Option<String>,
    pub perm_trend: Option<String>,
    pub awakening: Option<AwakeningParts>,
    pub awakening_fallback: i64,
    pub upgrading: Vec<Upgrade>,
    pub info_type: Option<String>,
    pub skins: OrderedMap<SkinAggregator>,
    /// Skin keys mentioned by the listings / primary values sources.
    pub listing_skin_keys: BTreeSet<String>,
    /// Skin keys mentioned by the info seed.
    pub info_skin_keys: BTreeSet<String>,
}

impl ItemBucket {
    fn named(name: &str) -> Self {
        Self {
            names: vec![name.to_string()],
            ..Self::default()
        }
    }

    /// Skin sub-aggregator for `name`, created on first sight.
    pub fn skin(&mut self, name: &str) -> (&mut SkinAggregator, String) {
        let key = normalize_words(name);
        let agg = self
            .skins
            .get_or_insert_with(&key, || SkinAggregator::named(name));
        agg.add_name(name);
        (agg, key)
    }
}

/// All buckets of one run, iterated in creation order.
#[derive(Debug, Default)]
pub struct Buckets {
    items: OrderedMap<ItemBucket>,
}

impl Buckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bucket for `key`; an existing bucket records `display` as another variant.
    pub fn entry(&mut self, key: &str, display: &str) -> &mut ItemBucket {
        let mut created = false;
        let bucket = self.items.get_or_insert_with(key, || {
            created = true;
            ItemBucket::named(display)
        });
        if !created {
            bucket.names.push(display.to_string());
        }
        bucket
    }

    /// Bucket for `key`; `display` is only used when the bucket is new.
    pub fn get_or_create(&mut self, key: &str, display: &str) -> &mut ItemBucket {
        self.items.get_or_insert_with(key, || ItemBucket::named(display))
    }

    pub fn get(&self, key: &str) -> Option<&ItemBucket> {
        self.items.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ItemBucket> {
        self.items.get_mut(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<ItemBucket> {
        self.items.remove(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.items.keys().map(str::to_string).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ItemBucket)> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Passes
// ---------------------------------------------------------------------------

/// Pass 0: compound skin listings. Returns the names no strategy could attribute.
pub fn absorb_listings(
    buckets: &mut Buckets,
    listings: &[SkinListing],
    resolver: &SkinResolver<'_>,
) -> Vec<String> {
    let mut unresolved = Vec::new();

    for listing in listings {
        let Some(name) = listing.name.as_deref().filter(|n| !n.trim().is_empty()) else {
            continue;
        };
        let affiliation = match resolver.resolve(name) {
            Resolution::Resolved(a) => a,
            Resolution::Unresolved => {
                log::warn!("unresolved skin listing: {name}");
                unresolved.push(name.to_string());
                continue;
            }
        };
        log::debug!(
            "listing '{name}' -> item '{}', skin '{}' ({:?})",
            affiliation.owner,
            affiliation.skin,
            affiliation.strategy
        );

        let bucket = buckets.entry(&affiliation.owner_key, &affiliation.owner);
        let (agg, skey) = bucket.skin(&affiliation.skin);
        agg.observe_listing(listing);
        bucket.listing_skin_keys.insert(skey);
    }

    unresolved
}

/// Pass 1: primary values source, including skins nested in-record.
pub fn absorb_primary(buckets: &mut Buckets, primary: &[PrimaryFruit], aliases: &AliasTable) {
    for fruit in primary {
        let Some(name) = fruit.name.as_deref().filter(|n| !n.is_empty()) else {
            continue;
        };
        let bucket = buckets.entry(&aliases.canonical_key(name), name);

        push_coerced(&mut bucket.reg_values, fruit.reg_value.as_ref());
        push_coerced(&mut bucket.perm_values, fruit.perm_value.as_ref());
        push_coerced(&mut bucket.robux_prices, fruit.robux_price.as_ref());
        bucket.tradeables.push(fruit.tradeable.unwrap_or(false));

        fill_first(&mut bucket.rarity, fruit.rarity.as_deref());
        fill_first(&mut bucket.reg_trend, fruit.reg_trend.as_deref());
        fill_first(&mut bucket.fruit_type, fruit.fruit_type.as_deref());
        fill_first(&mut bucket.perm_trend, fruit.perm_trend.as_deref());
        if bucket.beli_price.is_none() {
            bucket.beli_price = fruit.beli_price.as_ref().and_then(coerce_int);
        }
        if bucket.awakening.is_none() {
            bucket.awakening = fruit.awakening_price.as_ref().map(AwakeningParts::from_price);
        }

        for entry in &fruit.skins {
            let Some(skin_name) = entry.name.as_deref().filter(|n| !n.is_empty()) else {
                continue;
            };
            let (agg, skey) = bucket.skin(skin_name);
            agg.observe_entry(entry);
            bucket.listing_skin_keys.insert(skey);
        }
    }
}

/// Pass 2: secondary numeric-only source.
pub fn absorb_secondary(buckets: &mut Buckets, secondary: &[SecondaryFruit], aliases: &AliasTable) {
    for fruit in secondary {
        let Some(name) = fruit.name.as_deref().filter(|n| !n.is_empty()) else {
            continue;
        };
        let bucket = buckets.entry(&aliases.canonical_key(name), name);
        push_coerced(&mut bucket.reg_values, fruit.reg_value_numeric.as_ref());
        push_coerced(&mut bucket.perm_values, fruit.perm_value_numeric.as_ref());
        push_coerced(&mut bucket.robux_prices, fruit.robux_price.as_ref());
    }
}

/// Pass 3: info seed enrichment.
///
/// When several info records share a key, only the last one is applied.
pub fn absorb_info(buckets: &mut Buckets, info: &[InfoFruit], aliases: &AliasTable) {
    let mut last: HashMap<String, usize> = HashMap::new();
    for (i, fruit) in info.iter().enumerate() {
        if let Some(ref name) = fruit.name {
            last.insert(aliases.canonical_key(name), i);
        }
    }

    for (i, fruit) in info.iter().enumerate() {
        let Some(name) = fruit.name.as_deref().filter(|n| !n.is_empty()) else {
            continue;
        };
        let key = aliases.canonical_key(name);
        if last.get(&key) != Some(&i) {
            continue;
        }
        let bucket = buckets.get_or_create(&key, name);

        if let Some(t) = fruit.fruit_type.as_deref().filter(|t| !t.is_empty()) {
            bucket.info_type = Some(t.to_string());
        }
        push_coerced(&mut bucket.robux_prices, fruit.robux_price.as_ref());
        if bucket.beli_price.is_none() {
            bucket.beli_price = fruit.price.as_ref().and_then(coerce_int);
        }
        fill_first(&mut bucket.rarity, fruit.rarity.as_deref());
        bucket.upgrading = fruit.upgrading.clone();
        let awakening = fruit.awakening.as_ref().map(to_int_loose).unwrap_or(0);
        if awakening > 0 {
            bucket.awakening_fallback = awakening;
        }

        for entry in &fruit.skins {
            let Some(skin_name) = entry.name.as_deref().filter(|n| !n.is_empty()) else {
                continue;
            };
            let (agg, skey) = bucket.skin(skin_name);
            agg.observe_entry(entry);
            agg.infer_from_obtainment(entry.obtainment.as_deref().unwrap_or(""));
            bucket.info_skin_keys.insert(skey);
        }
    }
}

fn push_coerced(list: &mut Vec<i64>, value: Option<&Value>) {
    if let Some(v) = value.and_then(coerce_int) {
        list.push(v);
    }
}

/// First-seen-wins for non-empty text.
fn fill_first(slot: &mut Option<String>, value: Option<&str>) {
    if slot.is_none() {
        if let Some(v) = value.filter(|v| !v.is_empty()) {
            *slot = Some(v.to_string());
        }
    }
}
