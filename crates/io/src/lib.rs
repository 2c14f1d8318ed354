// File store, source shaping and seed data

pub mod error;
pub mod load;
pub mod seed;
pub mod shape;
pub mod store;

pub use error::StoreError;
pub use store::{EntryStatus, FileStore};

/// Well-known document names inside the storage directory.
pub mod names {
    pub const BFV_FRUITS: &str = "data_bfv_fruits.json";
    pub const BFV_GAMEPASSES: &str = "data_bfv_gamepasses.json";
    pub const BFV_SKINS: &str = "data_bfv_skins.json";
    pub const BFV_SPECIALS: &str = "data_bfv_specials.json";
    pub const FRUITY_FRUITS: &str = "data_fruity_fruits.json";
    pub const FRUITY_GAMEPASSES: &str = "data_fruity_gamepasses.json";
    pub const INFO: &str = "info.json";
    pub const STOCK: &str = "stock.json";
    pub const ALL: &str = "all.json";
    pub const RAW_BFV: &str = "raw_bfv.json";
    pub const RAW_FRUITY: &str = "raw_fruity.json";

    /// Every document `status` reports on, in pipeline order.
    pub const WELL_KNOWN: &[&str] = &[
        RAW_BFV,
        RAW_FRUITY,
        BFV_FRUITS,
        BFV_GAMEPASSES,
        BFV_SKINS,
        BFV_SPECIALS,
        FRUITY_FRUITS,
        FRUITY_GAMEPASSES,
        INFO,
        STOCK,
        ALL,
    ];
}
