//! `fruitdex-recon`: multi-source item catalog reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded source records, returns one
//! averaged record per item plus a diagnostic report. No CLI or IO
//! dependencies.

pub mod aggregate;
pub mod alias;
pub mod bridge;
pub mod config;
mod de;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod finalize;
pub mod gamepass;
pub mod model;
pub mod normalize;
pub mod numeric;
pub mod ordered;
pub mod resolve;

pub use config::{BridgeConfig, CatalogConfig};
pub use engine::{assemble, run};
pub use error::ReconError;
pub use model::{Catalog, ReconInput, ReconReport, ReconResult, ReconSummary};
