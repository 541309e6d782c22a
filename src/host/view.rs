//! Collection View - A complete [`CollectionHost`] over a data source.
//!
//! # Example
//!
//! ```ignore
//! use spark_collection::{CollectionView, DataTemplate, IndexPath, ListSource, Size, TemplateNode};
//!
//! let view = CollectionView::mount(ListSource::new(vec!["a", "b", "c"]))?;
//! view.set_item_template(Some(DataTemplate::shared("row", TemplateNode::fixed(40, 1))));
//!
//! // Materialization pass
//! view.materialize(IndexPath::new(0, 0));
//!
//! let size = view.item_size(IndexPath::new(0, 0), Size::with_width(80.0))?;
//!
//! view.unmount();
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use spark_signals::{signal, Signal};

use super::CollectionHost;
use crate::engine::{allocate_handle, register_host, release_host, HostHandle};
use crate::error::Result;
use crate::layout::VisualTree;
use crate::sizing::{SizerConfig, TemplateSizer};
use crate::source::{CollectionSource, DataItem};
use crate::template::{ContainerStyle, DataTemplate, TemplateSelector, TemplateSettings};
use crate::types::{IndexPath, Size};

/// A mounted collection view.
///
/// Mounting registers the view in the host registry; its sizer reaches it
/// through the returned handle only.
pub struct CollectionView {
    handle: HostHandle,
    tree: RefCell<VisualTree>,
    source: RefCell<Box<dyn CollectionSource>>,
    settings: RefCell<TemplateSettings>,
    sizer: RefCell<TemplateSizer>,
    /// Bumped on every full reload.
    generation: Signal<u64>,
}

impl CollectionView {
    // =========================================================================
    // Lifecycle
    // =========================================================================

    pub fn mount(source: impl CollectionSource + 'static) -> Result<Rc<Self>> {
        Self::mount_with_config(source, SizerConfig::default())
    }

    pub fn mount_with_config(
        source: impl CollectionSource + 'static,
        config: SizerConfig,
    ) -> Result<Rc<Self>> {
        let handle = allocate_handle();
        let view = Rc::new(Self {
            handle,
            tree: RefCell::new(VisualTree::new()?),
            source: RefCell::new(Box::new(source)),
            settings: RefCell::new(TemplateSettings::default()),
            sizer: RefCell::new(TemplateSizer::with_config(handle, config)),
            generation: signal(0),
        });
        register_host(handle, view.clone());
        log::debug!("collection view {} mounted", handle.index());
        Ok(view)
    }

    /// Remove the view from the registry. Size queries fail afterwards.
    pub fn unmount(&self) {
        log::debug!("collection view {} unmounted", self.handle.index());
        release_host(self.handle);
    }

    pub fn handle(&self) -> HostHandle {
        self.handle
    }

    // =========================================================================
    // Templates & Styles
    // =========================================================================

    pub fn set_item_template(&self, template: Option<Rc<DataTemplate>>) {
        self.settings.borrow_mut().item_template = template;
    }

    /// Replacing the selector invalidates every cached size on the next query.
    pub fn set_item_template_selector(&self, selector: Option<Rc<dyn TemplateSelector>>) {
        self.settings.borrow_mut().item_template_selector = selector;
    }

    pub fn set_header_template(&self, template: Option<Rc<DataTemplate>>) {
        self.settings.borrow_mut().header_template = template;
    }

    pub fn set_footer_template(&self, template: Option<Rc<DataTemplate>>) {
        self.settings.borrow_mut().footer_template = template;
    }

    pub fn set_group_header_template(&self, template: Option<Rc<DataTemplate>>) {
        self.settings.borrow_mut().group_header_template = template;
    }

    pub fn set_group_header_template_selector(&self, selector: Option<Rc<dyn TemplateSelector>>) {
        self.settings.borrow_mut().group_header_template_selector = selector;
    }

    pub fn set_item_container_style(&self, style: Option<Rc<ContainerStyle>>) {
        self.settings.borrow_mut().item_container_style = style;
    }

    pub fn set_group_header_container_style(&self, style: Option<Rc<ContainerStyle>>) {
        self.settings.borrow_mut().group_header_container_style = style;
    }

    // =========================================================================
    // Data
    // =========================================================================

    /// Swap the data source. Implies a full reload.
    pub fn set_source(&self, source: impl CollectionSource + 'static) {
        *self.source.borrow_mut() = Box::new(source);
        self.reload_data();
    }

    /// Full reload: the frontier returns to (0, 0) and the generation bumps.
    pub fn reload_data(&self) {
        self.sizer.borrow_mut().reload_data();
        self.generation.set(self.generation.get() + 1);
    }

    /// Realize the item at `path`, advancing the materialization frontier.
    ///
    /// Returns `None` (and leaves the frontier alone) if the source has no
    /// item there.
    pub fn materialize(&self, path: IndexPath) -> Option<DataItem> {
        let item = self.source.borrow().item_at(path)?;
        self.sizer.borrow_mut().note_materialized(path);
        Some(item)
    }

    pub fn section_count(&self) -> usize {
        self.source.borrow().section_count()
    }

    pub fn item_count(&self, section: usize) -> usize {
        self.source.borrow().item_count(section)
    }

    /// Number of full reloads so far.
    ///
    /// Note: This creates a reactive dependency when called from a derived/effect.
    pub fn data_generation(&self) -> u64 {
        self.generation.get()
    }

    /// The reload generation signal, for wiring into effects.
    pub fn generation_signal(&self) -> Signal<u64> {
        self.generation.clone()
    }

    pub fn frontier(&self) -> IndexPath {
        self.sizer.borrow().frontier()
    }

    pub fn is_materialized(&self, path: IndexPath) -> bool {
        self.sizer.borrow().is_materialized(path)
    }

    // =========================================================================
    // Sizing
    // =========================================================================

    pub fn header_size(&self, available: Size) -> Result<Size> {
        self.sizer.borrow_mut().header_size(available)
    }

    pub fn footer_size(&self, available: Size) -> Result<Size> {
        self.sizer.borrow_mut().footer_size(available)
    }

    pub fn section_header_size(&self, section: usize, available: Size) -> Result<Size> {
        self.sizer.borrow_mut().section_header_size(section, available)
    }

    pub fn item_size(&self, path: IndexPath, available: Size) -> Result<Size> {
        self.sizer.borrow_mut().item_size(path, available)
    }

    pub fn template_for_item(&self, path: IndexPath) -> Result<Option<Rc<DataTemplate>>> {
        self.sizer.borrow().template_for_item(path)
    }

    pub fn cached_size(&self, template: Option<&Rc<DataTemplate>>) -> Option<Size> {
        self.sizer.borrow().cached_size(template)
    }

    /// Drop all cached sizes, e.g. after a theme change.
    pub fn invalidate_sizes(&self) {
        self.sizer.borrow_mut().invalidate();
    }
}

impl CollectionHost for CollectionView {
    fn visual_tree(&self) -> &RefCell<VisualTree> {
        &self.tree
    }

    fn settings(&self) -> TemplateSettings {
        self.settings.borrow().clone()
    }

    fn display_item(&self, path: IndexPath) -> Option<DataItem> {
        self.source.borrow().item_at(path)
    }

    fn group_at_display_section(&self, section: usize) -> Option<DataItem> {
        let source = self.source.borrow();
        if !source.is_grouped() {
            return None;
        }
        source.group_at(section)
    }
}
