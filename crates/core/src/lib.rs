pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod lookbook;
pub mod memory;
pub mod stylist;
pub mod suggestions;

pub use catalog::{Catalog, CatalogError};
pub use config::{AppConfig, ConfigError, LoadOptions, StorageBackend};
pub use domain::product::{Product, ProductColor, ProductId};
pub use domain::profile::{BehaviorEvent, PreferenceProfile, TrackedItem, WeightMap};
pub use errors::DomainError;
pub use lookbook::{LookSlot, Lookbook, LookbookError};
pub use stylist::{extract_product_mentions, ChatMessage, ProductMentions, StylistRequest};
pub use suggestions::{
    Outfit, OutfitItem, OutfitRequest, RankedProduct, ReplaceOutcome, Strategy, SuggestionEngine,
};
