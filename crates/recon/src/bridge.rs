//! Family Bridge: redistribute one item's skins across its successor items.
//!
//! Runs once after every aggregation pass. A missing source bucket is a
//! no-op; the family-wide union of seen-by-source skin keys still applies.

use std::collections::BTreeSet;

use crate::aggregate::Buckets;
use crate::alias::AliasTable;
use crate::config::BridgeConfig;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BridgeOutcome {
    /// Whether the source bucket existed and was removed.
    pub bridged: bool,
    /// Skins copied into each successor.
    pub skins_moved: usize,
    /// Family buckets whose seen-by-source sets were unioned.
    pub family_members: usize,
}

pub fn apply(buckets: &mut Buckets, bridge: &BridgeConfig, aliases: &AliasTable) -> BridgeOutcome {
    let mut outcome = BridgeOutcome::default();
    let source_key = aliases.canonical_key(&bridge.source);

    if let Some(source) = buckets.remove(&source_key) {
        outcome.bridged = true;
        outcome.skins_moved = source.skins.len();

        for successor in &bridge.successors {
            let key = aliases.canonical_key(successor);
            let target = buckets.entry(&key, successor);
            for (skey, agg) in source.skins.iter() {
                let merged = target.skins.get_or_insert_with(skey, Default::default);
                merged.merge_from(agg);
                target.listing_skin_keys.insert(skey.to_string());
                target.info_skin_keys.insert(skey.to_string());
            }
        }
        log::info!(
            "bridged '{}' into {:?} ({} skins)",
            bridge.source,
            bridge.successors,
            outcome.skins_moved
        );
    } else {
        log::debug!("bridge source '{}' absent, nothing to move", bridge.source);
    }

    let family: Vec<String> = {
        let mut seen = BTreeSet::new();
        bridge
            .family
            .iter()
            .map(|n| aliases.canonical_key(n))
            .filter(|k| buckets.contains(k) && seen.insert(k.clone()))
            .collect()
    };
    if family.is_empty() {
        return outcome;
    }

    let mut listing_union = BTreeSet::new();
    let mut info_union = BTreeSet::new();
    for key in &family {
        if let Some(b) = buckets.get(key) {
            listing_union.extend(b.listing_skin_keys.iter().cloned());
            info_union.extend(b.info_skin_keys.iter().cloned());
        }
    }
    for key in &family {
        if let Some(b) = buckets.get_mut(key) {
            b.listing_skin_keys.extend(listing_union.iter().cloned());
            b.info_skin_keys.extend(info_union.iter().cloned());
        }
    }
    outcome.family_members = family.len();
    outcome
}
