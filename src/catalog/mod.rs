//! Item Catalog
//!
//! The static item list the quiz runs against, plus the offline pipeline
//! that refreshes it from the vendor feed.
//!
//! ## Module Structure
//!
//! - `item`: Item records, tag vocabulary, alias canonicalization
//! - `store`: validated ordered catalog with per-mode candidate filters
//! - `feed`: vendor feed types and the filter/normalize pipeline

pub mod item;
pub mod store;
pub mod feed;

// Re-export key types
pub use item::{Item, ItemId, VALID_TAGS, is_valid_tag, canonicalize_tags};
pub use store::{Catalog, CatalogError};
pub use feed::{FeedDocument, FeedError, build_catalog};
