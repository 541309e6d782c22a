//! Data sources for collection views.
//!
//! A source exposes items by [`IndexPath`] and, when grouped, one group
//! object per section. Sources may be lazily populated; the sizer only calls
//! [`CollectionSource::item_at`] for materialized positions.

use std::any::Any;
use std::rc::Rc;

use crate::types::IndexPath;

/// An opaque data object handed to template selectors.
pub type DataItem = Rc<dyn Any>;

/// Random access to already-observed items of a (possibly grouped) source.
pub trait CollectionSource {
    /// Number of sections (1 for a flat list).
    fn section_count(&self) -> usize;

    /// Number of items in `section`.
    fn item_count(&self, section: usize) -> usize;

    /// The item at `path`, if it exists.
    fn item_at(&self, path: IndexPath) -> Option<DataItem>;

    /// The group object for `section`, if the source is grouped.
    fn group_at(&self, section: usize) -> Option<DataItem> {
        let _ = section;
        None
    }

    /// Whether sections carry group objects.
    fn is_grouped(&self) -> bool {
        false
    }
}

// =============================================================================
// Flat List
// =============================================================================

/// A single-section source backed by a vector.
pub struct ListSource {
    items: Vec<DataItem>,
}

impl ListSource {
    pub fn new<T: Any>(items: Vec<T>) -> Self {
        Self {
            items: items.into_iter().map(|item| Rc::new(item) as DataItem).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl CollectionSource for ListSource {
    fn section_count(&self) -> usize {
        1
    }

    fn item_count(&self, section: usize) -> usize {
        if section == 0 { self.items.len() } else { 0 }
    }

    fn item_at(&self, path: IndexPath) -> Option<DataItem> {
        if path.section != 0 {
            return None;
        }
        self.items.get(path.item).cloned()
    }
}

// =============================================================================
// Grouped
// =============================================================================

/// One section of a [`GroupedSource`].
pub struct Group {
    pub key: DataItem,
    pub items: Vec<DataItem>,
}

impl Group {
    pub fn new<K: Any, T: Any>(key: K, items: Vec<T>) -> Self {
        Self {
            key: Rc::new(key),
            items: items.into_iter().map(|item| Rc::new(item) as DataItem).collect(),
        }
    }
}

/// A sectioned source: one group object plus items per section.
pub struct GroupedSource {
    groups: Vec<Group>,
}

impl GroupedSource {
    pub fn new(groups: Vec<Group>) -> Self {
        Self { groups }
    }
}

impl CollectionSource for GroupedSource {
    fn section_count(&self) -> usize {
        self.groups.len()
    }

    fn item_count(&self, section: usize) -> usize {
        self.groups.get(section).map_or(0, |group| group.items.len())
    }

    fn item_at(&self, path: IndexPath) -> Option<DataItem> {
        self.groups.get(path.section)?.items.get(path.item).cloned()
    }

    fn group_at(&self, section: usize) -> Option<DataItem> {
        self.groups.get(section).map(|group| group.key.clone())
    }

    fn is_grouped(&self) -> bool {
        true
    }
}
