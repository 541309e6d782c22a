//! # spark-collection
//!
//! Template measurement and materialization tracking for collection views.
//!
//! Built on [Taffy](https://github.com/DioxusLabs/taffy) for layout and
//! [spark-signals](https://github.com/RLabs-Inc/spark-signals) for reactivity.
//!
//! ## Architecture
//!
//! A collection host asks its [`TemplateSizer`] how big a header, footer,
//! section header or item is. The sizer picks the governing template, checks
//! its cache and, on a miss, measures the template off-screen:
//!
//! ```text
//! size query → sync selector → template lookup → cache → scratch measurement → fallback
//! ```
//!
//! Template lookup honors the materialization frontier: data past the
//! furthest realized position is never touched, so virtualized sources are
//! not forced to enumerate.
//!
//! ## Modules
//!
//! - [`types`] - Core types (Size, IndexPath, ElementKind, Dimension, etc.)
//! - [`engine`] - Host registry and handles
//! - [`layout`] - Taffy-backed visual tree and text measurement
//! - [`template`] - Templates, selectors and host template settings
//! - [`source`] - Flat and grouped data sources
//! - [`sizing`] - Template sizer, size cache and materialization tracker
//! - [`host`] - The host trait and the reference collection view

pub mod engine;
pub mod error;
pub mod host;
pub mod layout;
pub mod sizing;
pub mod source;
pub mod template;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used items
pub use types::*;

pub use error::{LayoutError, Result};

pub use engine::{
    allocate_handle, get_host, get_registered_count, is_registered, on_release, register_host,
    release_host, reset_registry, try_get_host, HostHandle,
};

pub use layout::{measure_text_height, string_width, Container, ContainerState, VisualTree};

pub use template::{
    resolve_template, same_selector, ContainerStyle, DataTemplate, NodeStyle, TemplateId,
    TemplateKey, TemplateNode, TemplateSelector, TemplateSettings,
};

pub use source::{CollectionSource, DataItem, Group, GroupedSource, ListSource};

pub use sizing::{
    MaterializationTracker, SizeCache, SizerConfig, TemplateSizer, FALLBACK_ITEM_SIZE,
    OVERSIZE_THRESHOLD,
};

pub use host::{CollectionHost, CollectionView};
