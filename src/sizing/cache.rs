//! Size Cache - Measured sizes per template identity.
//!
//! One entry per [`TemplateKey`] across all element kinds. Alongside the
//! sizes the cache pools the container each template was measured in, so a
//! host can recycle it instead of instantiating the template again.
//!
//! Everything is dropped together when the active item template selector
//! changes: the same template may now be chosen for different items.

use std::collections::HashMap;
use std::rc::Rc;

use crate::layout::Container;
use crate::template::{same_selector, TemplateKey, TemplateSelector};
use crate::types::Size;

#[derive(Default)]
pub struct SizeCache {
    sizes: HashMap<TemplateKey, Size>,
    containers: HashMap<TemplateKey, Container>,
    /// Selector the current entries were measured under.
    selector: Option<Rc<dyn TemplateSelector>>,
}

impl SizeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: TemplateKey) -> Option<Size> {
        self.sizes.get(&key).copied()
    }

    /// Store a measurement and the container it was taken in.
    ///
    /// Returns the container previously pooled under `key`, if any.
    pub fn insert(&mut self, key: TemplateKey, size: Size, container: Container) -> Option<Container> {
        self.sizes.insert(key, size);
        self.containers.insert(key, container)
    }

    /// Remove the pooled container for `key`. The size stays cached.
    pub fn take_container(&mut self, key: TemplateKey) -> Option<Container> {
        self.containers.remove(&key)
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Drop every size and return the pooled containers for release.
    pub fn clear(&mut self) -> Vec<Container> {
        self.sizes.clear();
        self.containers.drain().map(|(_, container)| container).collect()
    }

    /// Record the active selector.
    ///
    /// When it differs from the recorded one (pointer identity) the cache is
    /// cleared and the evicted containers are returned; `None` means the
    /// selector is unchanged.
    pub fn sync_selector(
        &mut self,
        current: Option<&Rc<dyn TemplateSelector>>,
    ) -> Option<Vec<Container>> {
        if same_selector(self.selector.as_ref(), current) {
            return None;
        }
        self.selector = current.cloned();
        Some(self.clear())
    }
}
