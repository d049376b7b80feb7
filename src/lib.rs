//! variantgen - Market variant configuration generator
//!
//! This crate resolves device-market "variant" configurations for a product
//! line from hierarchical text descriptors and renders per-market XML
//! configuration documents. The resolution engine canonicalizes raw country
//! lists into stable sub-region keys and cascades layered overrides — settings
//! replace by key, content accumulates additively — into one consistent
//! configuration per market.

pub mod codelist;
pub mod content;
pub mod country;
pub mod discovery;
pub mod layout;
pub mod pipeline;
pub mod registry;
pub mod render;
pub mod settings;
pub mod storage;
pub mod subregion;
pub mod summary;
pub mod variant;

pub use codelist::{Codelist, MarketRecord};
pub use country::{CountryRecord, CountryTable};
pub use pipeline::{PipelineConfig, PipelineError, PipelineResult};
pub use subregion::{SubRegionKey, SubRegionResolver};
pub use variant::VariantDescriptor;
