use serde_json::Value;

use crate::aggregate::{absorb_info, absorb_listings, absorb_primary, absorb_secondary, Buckets};
use crate::config::CatalogConfig;
use crate::error::ReconError;
use crate::evidence::compute_summary;
use crate::finalize::finalize;
use crate::gamepass::merge_gamepasses;
use crate::model::{Catalog, ReconInput, ReconReport, ReconResult, Stock};
use crate::resolve::SkinResolver;

/// Run reconciliation per config. Returns finalized records, report and summary.
///
/// Every call builds fresh buckets; identical input yields identical output.
pub fn run(config: &CatalogConfig, input: &ReconInput) -> Result<ReconResult, ReconError> {
    config.validate()?;
    let aliases = config.alias_table();

    let gamepasses = merge_gamepasses(&input.gamepasses);

    // Known item names: primary source first, then the info seed.
    let item_names: Vec<String> = input
        .primary
        .iter()
        .filter_map(|f| f.name.clone())
        .chain(input.info.iter().filter_map(|f| f.name.clone()))
        .collect();
    let resolver = SkinResolver::new(&item_names, &input.info, &aliases);

    let mut buckets = Buckets::new();
    let mut unresolved = absorb_listings(&mut buckets, &input.listings, &resolver);
    log::debug!(
        "pass 0: {} listings, {} buckets, {} unresolved",
        input.listings.len(),
        buckets.len(),
        unresolved.len()
    );
    absorb_primary(&mut buckets, &input.primary, &aliases);
    log::debug!("pass 1: {} primary records, {} buckets", input.primary.len(), buckets.len());
    absorb_secondary(&mut buckets, &input.secondary, &aliases);
    log::debug!("pass 2: {} secondary records, {} buckets", input.secondary.len(), buckets.len());
    absorb_info(&mut buckets, &input.info, &aliases);
    log::debug!("pass 3: {} info records, {} buckets", input.info.len(), buckets.len());

    if let Some(ref bridge) = config.bridge {
        let outcome = crate::bridge::apply(&mut buckets, bridge, &aliases);
        log::debug!("bridge: {outcome:?}");
    }

    let (fruits, mismatches) = finalize(&buckets);

    unresolved.sort();
    unresolved.dedup();
    let report = ReconReport {
        mismatches,
        unresolved,
    };
    let summary = compute_summary(&fruits, &gamepasses, &report);
    log::info!(
        "catalog '{}': {} fruits, {} skins, {} gamepasses, {} mismatches, {} unresolved",
        config.name,
        summary.fruits,
        summary.skins,
        summary.gamepasses,
        summary.mismatches,
        summary.unresolved
    );

    Ok(ReconResult {
        summary,
        fruits,
        gamepasses,
        report,
    })
}

/// Combine a run with the pass-through documents into the served catalog.
pub fn assemble(result: &ReconResult, stock: Stock, specials: Vec<Value>) -> Catalog {
    Catalog {
        stock,
        fruits: result.fruits.clone(),
        gamepasses: result.gamepasses.clone(),
        specials,
    }
}
