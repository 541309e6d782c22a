//! Sizing Module
//!
//! Template-driven element sizing for collection hosts:
//!
//! - [`TemplateSizer`] - template lookup, size queries and the cache around them
//! - [`SizeCache`] - measured sizes per template identity
//! - [`MaterializationTracker`] - how far the host has realized its data

mod cache;
mod materialization;
mod measure;
mod resolver;

pub use cache::SizeCache;
pub use materialization::MaterializationTracker;
pub use resolver::{SizerConfig, TemplateSizer, FALLBACK_ITEM_SIZE, OVERSIZE_THRESHOLD};
