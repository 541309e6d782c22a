//! Template Sizer - Answers "how big is this element?" for a collection host.
//!
//! Every size query follows the same path:
//!
//! 1. Sync the active item template selector (a change clears the cache)
//! 2. Determine the template, honoring the materialization frontier
//! 3. Return the cached size, or measure off-screen and cache
//! 4. Apply the item fallback (raw zero → `fallback_item_size`)
//!
//! The sizer never holds its host strongly. It resolves its [`HostHandle`]
//! through the registry on each query and fails with
//! [`LayoutError::HostReleased`] once the host is gone.
//!
//! Selectors run inside a size query and must not call back into the sizer.

use std::rc::Rc;

use taffy::NodeId;

use super::cache::SizeCache;
use super::materialization::MaterializationTracker;
use super::measure::{measure_template, release};
use crate::engine::{get_host, try_get_host, HostHandle};
use crate::error::{LayoutError, Result};
use crate::host::CollectionHost;
use crate::layout::Container;
use crate::template::{resolve_template, DataTemplate, TemplateKey, TemplateSettings};
use crate::types::{ElementKind, IndexPath, Size};

// =============================================================================
// Configuration
// =============================================================================

/// Size reported for an item whose template measures to exactly zero.
pub const FALLBACK_ITEM_SIZE: Size = Size::new(44.0, 44.0);

/// Measurements above this in either dimension are logged as suspicious.
pub const OVERSIZE_THRESHOLD: f32 = f32::MAX / 2.0;

/// Tunables for a [`TemplateSizer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizerConfig {
    pub fallback_item_size: Size,
    pub oversize_threshold: f32,
}

impl Default for SizerConfig {
    fn default() -> Self {
        Self {
            fallback_item_size: FALLBACK_ITEM_SIZE,
            oversize_threshold: OVERSIZE_THRESHOLD,
        }
    }
}

// =============================================================================
// Template Sizer
// =============================================================================

pub struct TemplateSizer {
    owner: HostHandle,
    config: SizerConfig,
    cache: SizeCache,
    tracker: MaterializationTracker,
    /// Created on first measurement, removed on drop.
    scratch: Option<NodeId>,
}

impl TemplateSizer {
    /// Sizer for the host registered (or about to be registered) under `owner`.
    pub fn new(owner: HostHandle) -> Self {
        Self::with_config(owner, SizerConfig::default())
    }

    pub fn with_config(owner: HostHandle, config: SizerConfig) -> Self {
        Self {
            owner,
            config,
            cache: SizeCache::new(),
            tracker: MaterializationTracker::new(),
            scratch: None,
        }
    }

    pub fn owner(&self) -> HostHandle {
        self.owner
    }

    pub fn config(&self) -> SizerConfig {
        self.config
    }

    fn host(&self) -> Result<Rc<dyn CollectionHost>> {
        get_host(self.owner).ok_or(LayoutError::HostReleased(self.owner))
    }

    // =========================================================================
    // Materialization
    // =========================================================================

    /// Full data reload: only (0, 0) counts as materialized again.
    ///
    /// Cached sizes survive; they depend on templates, not data.
    pub fn reload_data(&mut self) {
        log::debug!("host {}: data reloaded, frontier reset", self.owner.index());
        self.tracker.reset();
    }

    /// Record that the host has materialized `path`.
    pub fn note_materialized(&mut self, path: IndexPath) {
        if self.tracker.advance_to(path) {
            log::trace!(
                "host {}: frontier advanced to ({}, {})",
                self.owner.index(),
                path.section,
                path.item
            );
        }
    }

    pub fn frontier(&self) -> IndexPath {
        self.tracker.frontier()
    }

    pub fn is_materialized(&self, path: IndexPath) -> bool {
        self.tracker.is_materialized(path)
    }

    pub fn is_section_materialized(&self, section: usize) -> bool {
        self.tracker.is_section_materialized(section)
    }

    // =========================================================================
    // Template Lookup
    // =========================================================================

    /// Template governing the item at `path`.
    ///
    /// A materialized item is resolved by the host's
    /// [`CollectionHost::resolve_item_template`]. Beyond the frontier the item
    /// may not exist yet, so neither the data source nor the host is
    /// consulted and the base template applies.
    pub fn template_for_item(&self, path: IndexPath) -> Result<Option<Rc<DataTemplate>>> {
        let host = self.host()?;
        let settings = host.settings();
        Ok(self.item_template(host.as_ref(), &settings, path))
    }

    /// Template governing the header of `section`. Same rule, at section granularity.
    pub fn template_for_group_header(&self, section: usize) -> Result<Option<Rc<DataTemplate>>> {
        let host = self.host()?;
        let settings = host.settings();
        Ok(self.group_header_template(host.as_ref(), &settings, section))
    }

    fn item_template(
        &self,
        host: &dyn CollectionHost,
        settings: &TemplateSettings,
        path: IndexPath,
    ) -> Option<Rc<DataTemplate>> {
        if !self.tracker.is_materialized(path) {
            return settings.item_template.clone();
        }
        match host.display_item(path) {
            Some(item) => host.resolve_item_template(&item),
            None => settings.item_template.clone(),
        }
    }

    fn group_header_template(
        &self,
        host: &dyn CollectionHost,
        settings: &TemplateSettings,
        section: usize,
    ) -> Option<Rc<DataTemplate>> {
        if !self.tracker.is_section_materialized(section) {
            return settings.group_header_template.clone();
        }
        let group = host.group_at_display_section(section);
        resolve_template(
            settings.group_header_template.as_ref(),
            settings.group_header_template_selector.as_ref(),
            group.as_ref(),
            ElementKind::SectionHeader,
        )
    }

    // =========================================================================
    // Size Queries
    // =========================================================================

    pub fn header_size(&mut self, available: Size) -> Result<Size> {
        let (host, settings) = self.begin_query()?;
        let template = settings.header_template.clone();
        self.optional_size(host.as_ref(), &settings, template, ElementKind::Header, available)
    }

    pub fn footer_size(&mut self, available: Size) -> Result<Size> {
        let (host, settings) = self.begin_query()?;
        let template = settings.footer_template.clone();
        self.optional_size(host.as_ref(), &settings, template, ElementKind::Footer, available)
    }

    pub fn section_header_size(&mut self, section: usize, available: Size) -> Result<Size> {
        let (host, settings) = self.begin_query()?;
        let template = self.group_header_template(host.as_ref(), &settings, section);
        self.optional_size(
            host.as_ref(),
            &settings,
            template,
            ElementKind::SectionHeader,
            available,
        )
    }

    /// Size of the item at `path`.
    ///
    /// A raw (0, 0) measurement is reported as the configured fallback. The
    /// cache keeps the raw value.
    pub fn item_size(&mut self, path: IndexPath, available: Size) -> Result<Size> {
        let (host, settings) = self.begin_query()?;
        let template = self.item_template(host.as_ref(), &settings, path);
        let size = self.lookup_or_measure(
            host.as_ref(),
            &settings,
            template.as_ref(),
            ElementKind::Item,
            available,
        )?;

        if size.is_zero() {
            return Ok(self.config.fallback_item_size);
        }
        Ok(size)
    }

    /// Cached size of `template`, measuring it as `kind` on a miss.
    pub fn get_or_measure(
        &mut self,
        template: Option<&Rc<DataTemplate>>,
        kind: ElementKind,
        available: Size,
    ) -> Result<Size> {
        let (host, settings) = self.begin_query()?;
        self.lookup_or_measure(host.as_ref(), &settings, template, kind, available)
    }

    /// Resolve the host and sync the selector. Every query starts here.
    fn begin_query(&mut self) -> Result<(Rc<dyn CollectionHost>, TemplateSettings)> {
        let host = self.host()?;
        let settings = host.settings();
        self.sync_selector(host.as_ref(), &settings);
        Ok((host, settings))
    }

    fn sync_selector(&mut self, host: &dyn CollectionHost, settings: &TemplateSettings) {
        if let Some(evicted) = self
            .cache
            .sync_selector(settings.item_template_selector.as_ref())
        {
            log::debug!(
                "host {}: item template selector changed, dropping {} cached container(s)",
                self.owner.index(),
                evicted.len()
            );
            for container in evicted {
                release(host, container);
            }
        }
    }

    /// Header, footer and section header: no template means no element.
    fn optional_size(
        &mut self,
        host: &dyn CollectionHost,
        settings: &TemplateSettings,
        template: Option<Rc<DataTemplate>>,
        kind: ElementKind,
        available: Size,
    ) -> Result<Size> {
        match template {
            Some(template) => {
                self.lookup_or_measure(host, settings, Some(&template), kind, available)
            }
            None => Ok(Size::ZERO),
        }
    }

    fn lookup_or_measure(
        &mut self,
        host: &dyn CollectionHost,
        settings: &TemplateSettings,
        template: Option<&Rc<DataTemplate>>,
        kind: ElementKind,
        available: Size,
    ) -> Result<Size> {
        let key = TemplateKey::of(template);
        if let Some(size) = self.cache.get(key) {
            log::trace!("size cache hit for {:?}", key);
            return Ok(size);
        }

        let scratch = self.scratch_root(host)?;
        let (size, container) = measure_template(host, settings, scratch, template, kind, available)?;

        if size.exceeds(self.config.oversize_threshold) {
            log::warn!(
                "{:?} template {} measured to an extreme size {}x{}; check for an unconstrained layout",
                kind,
                template.map_or("<none>", |t| t.name()),
                size.width,
                size.height
            );
        }
        log::debug!(
            "measured {:?} template {}: {}x{}",
            kind,
            template.map_or("<none>", |t| t.name()),
            size.width,
            size.height
        );

        if let Some(previous) = self.cache.insert(key, size, container) {
            release(host, previous);
        }
        Ok(size)
    }

    fn scratch_root(&mut self, host: &dyn CollectionHost) -> Result<NodeId> {
        if let Some(scratch) = self.scratch {
            return Ok(scratch);
        }
        let scratch = host.visual_tree().borrow_mut().new_scratch_root()?;
        self.scratch = Some(scratch);
        Ok(scratch)
    }

    // =========================================================================
    // Cache Access
    // =========================================================================

    /// Drop every cached size and pooled container.
    pub fn invalidate(&mut self) {
        let evicted = self.cache.clear();
        log::debug!(
            "host {}: size cache invalidated ({} container(s))",
            self.owner.index(),
            evicted.len()
        );
        match try_get_host(self.owner) {
            Some(host) => {
                for container in evicted {
                    release(host.as_ref(), container);
                }
            }
            None => drop(evicted),
        }
    }

    /// Cached size of `template` without measuring.
    pub fn cached_size(&self, template: Option<&Rc<DataTemplate>>) -> Option<Size> {
        self.cache.get(TemplateKey::of(template))
    }

    /// Hand the container `template` was measured in over to the caller.
    ///
    /// The container is detached and no longer owned by the sizer; the
    /// cached size stays.
    pub fn take_measured_container(
        &mut self,
        template: Option<&Rc<DataTemplate>>,
    ) -> Option<Container> {
        self.cache.take_container(TemplateKey::of(template))
    }

    /// Number of cached sizes.
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    /// The scratch layout root, once created.
    pub fn scratch_node(&self) -> Option<NodeId> {
        self.scratch
    }
}

impl Drop for TemplateSizer {
    fn drop(&mut self) {
        // A released host took its tree with it.
        let Some(host) = try_get_host(self.owner) else {
            return;
        };
        for container in self.cache.clear() {
            release(host.as_ref(), container);
        }
        if let Some(scratch) = self.scratch.take() {
            if let Ok(mut tree) = host.visual_tree().try_borrow_mut() {
                let _ = tree.remove_subtree(scratch);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::reset_registry;
    use crate::layout::ContainerState;
    use crate::testing::{capture_logs, captured_at, counting_selector, TestHost};
    use log::Level;
    use crate::source::{DataItem, Group, GroupedSource, ListSource};
    use crate::template::{ContainerStyle, TemplateNode, TemplateSelector};
    use crate::types::Spacing;

    fn setup() {
        reset_registry();
    }

    fn row(width: u16, height: u16) -> Rc<DataTemplate> {
        DataTemplate::shared("row", TemplateNode::fixed(width, height))
    }

    #[test]
    fn test_cache_hit_skips_measurement() {
        setup();
        let host = TestHost::mount(ListSource::new(vec![1u32, 2, 3]));
        let template = row(20, 2);
        host.settings_mut().item_template = Some(template.clone());
        let mut sizer = TemplateSizer::new(host.handle());

        let first = sizer.item_size(IndexPath::new(0, 0), Size::with_width(80.0)).unwrap();
        let second = sizer.item_size(IndexPath::new(0, 5), Size::with_width(80.0)).unwrap();

        assert_eq!(first, Size::new(20.0, 2.0));
        assert_eq!(second, first);
        assert_eq!(host.measure_calls(), 1);
        assert_eq!(host.containers_created(), 1);
        assert_eq!(sizer.cached_size(Some(&template)), Some(first));
    }

    #[test]
    fn test_selector_change_remeasures() {
        setup();
        let host = TestHost::mount(ListSource::new(vec![1u32]));
        let template = row(10, 1);
        host.settings_mut().item_template = Some(template.clone());
        let mut sizer = TemplateSizer::new(host.handle());

        sizer.get_or_measure(Some(&template), ElementKind::Item, Size::INFINITE).unwrap();
        assert_eq!(host.measure_calls(), 1);

        let (selector, _calls) = counting_selector(None);
        host.settings_mut().item_template_selector = Some(selector);

        sizer.get_or_measure(Some(&template), ElementKind::Item, Size::INFINITE).unwrap();
        assert_eq!(host.measure_calls(), 2);

        // Unchanged selector: hit again.
        sizer.get_or_measure(Some(&template), ElementKind::Item, Size::INFINITE).unwrap();
        assert_eq!(host.measure_calls(), 2);
    }

    #[test]
    fn test_selector_change_releases_pooled_containers() {
        setup();
        let host = TestHost::mount(ListSource::new(vec![1u32]));
        let template = row(10, 1);
        let mut sizer = TemplateSizer::new(host.handle());

        sizer.get_or_measure(Some(&template), ElementKind::Item, Size::INFINITE).unwrap();
        let before = host.node_count();

        let (selector, _calls) = counting_selector(None);
        host.settings_mut().item_template_selector = Some(selector);
        sizer.get_or_measure(None, ElementKind::Item, Size::INFINITE).unwrap();

        // Old container (2 nodes) released, empty container (1 node) added.
        assert_eq!(host.node_count(), before - 1);
        assert!(sizer.cached_size(Some(&template)).is_none());
    }

    #[test]
    fn test_unmaterialized_item_skips_selector() {
        setup();
        let host = TestHost::mount(ListSource::new(vec![1u32, 2, 3]));
        let base = row(10, 1);
        let selected = row(10, 4);
        let (selector, calls) = counting_selector(Some(selected.clone()));
        {
            let mut settings = host.settings_mut();
            settings.item_template = Some(base.clone());
            settings.item_template_selector = Some(selector);
        }
        let sizer = TemplateSizer::new(host.handle());

        let template = sizer.template_for_item(IndexPath::new(0, 2)).unwrap();
        assert_eq!(template.map(|t| t.id()), Some(base.id()));
        assert_eq!(calls.get(), 0);
        assert_eq!(host.display_item_calls(), 0);

        let template = sizer.template_for_item(IndexPath::ORIGIN).unwrap();
        assert_eq!(template.map(|t| t.id()), Some(selected.id()));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_materialized_item_uses_selector() {
        setup();
        let host = TestHost::mount(ListSource::new(vec![1u32, 2, 3]));
        let base = row(10, 1);
        let tall = row(10, 5);
        let tall_clone = tall.clone();
        let selector: Rc<dyn TemplateSelector> = Rc::new(move |item: &DataItem, _: ElementKind| {
            let value = item.downcast_ref::<u32>()?;
            (*value == 3).then(|| tall_clone.clone())
        });
        {
            let mut settings = host.settings_mut();
            settings.item_template = Some(base);
            settings.item_template_selector = Some(selector);
        }
        let mut sizer = TemplateSizer::new(host.handle());

        // Before materialization: base template.
        let size = sizer.item_size(IndexPath::new(0, 2), Size::INFINITE).unwrap();
        assert_eq!(size, Size::new(10.0, 1.0));

        sizer.note_materialized(IndexPath::new(0, 2));
        let size = sizer.item_size(IndexPath::new(0, 2), Size::INFINITE).unwrap();
        assert_eq!(size, Size::new(10.0, 5.0));
        assert_eq!(sizer.cached_size(Some(&tall)), Some(size));
    }

    #[test]
    fn test_zero_item_falls_back() {
        setup();
        let host = TestHost::mount(ListSource::new(vec![1u32]));
        let mut sizer = TemplateSizer::new(host.handle());

        // No template at all: empty container measures to zero.
        let size = sizer.item_size(IndexPath::new(0, 9), Size::with_width(80.0)).unwrap();
        assert_eq!(size, FALLBACK_ITEM_SIZE);
        assert_eq!(sizer.cached_size(None), Some(Size::ZERO));
    }

    #[test]
    fn test_custom_fallback() {
        setup();
        let host = TestHost::mount(ListSource::new(vec![1u32]));
        let config = SizerConfig {
            fallback_item_size: Size::new(80.0, 1.0),
            ..SizerConfig::default()
        };
        let mut sizer = TemplateSizer::with_config(host.handle(), config);

        let size = sizer.item_size(IndexPath::ORIGIN, Size::with_width(80.0)).unwrap();
        assert_eq!(size, Size::new(80.0, 1.0));
    }

    #[test]
    fn test_fallback_only_for_items() {
        setup();
        let host = TestHost::mount(ListSource::new(vec![1u32]));
        host.settings_mut().header_template =
            Some(DataTemplate::shared("empty", TemplateNode::new()));
        let mut sizer = TemplateSizer::new(host.handle());

        assert_eq!(sizer.header_size(Size::with_width(80.0)).unwrap(), Size::ZERO);
        assert_eq!(host.measure_calls(), 1);
    }

    #[test]
    fn test_null_header_builds_no_container() {
        setup();
        let host = TestHost::mount(ListSource::new(vec![1u32]));
        let mut sizer = TemplateSizer::new(host.handle());

        assert_eq!(sizer.header_size(Size::INFINITE).unwrap(), Size::ZERO);
        assert_eq!(sizer.footer_size(Size::INFINITE).unwrap(), Size::ZERO);
        assert_eq!(sizer.section_header_size(0, Size::INFINITE).unwrap(), Size::ZERO);
        assert_eq!(host.containers_created(), 0);
        assert_eq!(host.measure_calls(), 0);
        assert!(sizer.scratch_node().is_none());
    }

    #[test]
    fn test_teardown_after_success() {
        setup();
        let host = TestHost::mount(ListSource::new(vec![1u32]));
        let template = row(12, 3);
        let mut sizer = TemplateSizer::new(host.handle());

        sizer.get_or_measure(Some(&template), ElementKind::Item, Size::INFINITE).unwrap();

        // During the pass the container was in the live tree with a forced context.
        assert!(host.was_attached_during_measure());
        assert!(host.was_context_forced_during_measure());

        let scratch = sizer.scratch_node().expect("scratch root created");
        let container = sizer.take_measured_container(Some(&template)).expect("pooled");
        let tree = host.tree().borrow();
        assert_eq!(tree.child_count(tree.root()), 0);
        assert!(tree.parent(scratch).is_none());
        assert!(tree.parent(container.node()).is_none());
        assert!(!container.state().contains(ContainerState::DATA_CONTEXT_FORCED));
        assert!(container.state().contains(ContainerState::MEASURED));
    }

    #[test]
    fn test_teardown_after_failure() {
        setup();
        let host = TestHost::mount(ListSource::new(vec![1u32]));
        host.fail_next_measure();
        let template = row(12, 3);
        let mut sizer = TemplateSizer::new(host.handle());
        let baseline = host.node_count();

        let result = sizer.get_or_measure(Some(&template), ElementKind::Item, Size::INFINITE);
        assert!(matches!(result, Err(LayoutError::Measure(_))));
        assert!(host.was_attached_during_measure());

        let scratch = sizer.scratch_node().expect("scratch root created");
        {
            let tree = host.tree().borrow();
            assert_eq!(tree.child_count(tree.root()), 0);
            assert!(tree.parent(scratch).is_none());
            assert_eq!(tree.child_count(scratch), 0);
        }
        // Only the scratch root remains from the failed pass.
        assert_eq!(host.node_count(), baseline + 1);
        assert!(sizer.cached_size(Some(&template)).is_none());

        // Nothing cached: the next query measures again.
        let size = sizer.get_or_measure(Some(&template), ElementKind::Item, Size::INFINITE).unwrap();
        assert_eq!(size, Size::new(12.0, 3.0));
    }

    #[test]
    fn test_oversize_warns_once_and_is_returned() {
        setup();
        capture_logs();
        let host = TestHost::mount(ListSource::new(vec![1u32]));
        let mut sizer = TemplateSizer::new(host.handle());

        sizer.get_or_measure(Some(&row(10, 1)), ElementKind::Item, Size::INFINITE).unwrap();
        assert!(captured_at(Level::Warn).is_empty());

        host.force_measured_size(Size::new(10.0, f32::MAX));
        let runaway = DataTemplate::shared("runaway", TemplateNode::fixed(10, 1));
        let size = sizer.get_or_measure(Some(&runaway), ElementKind::Item, Size::INFINITE).unwrap();
        assert_eq!(size, Size::new(10.0, f32::MAX));

        let warnings = captured_at(Level::Warn);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("runaway"));

        // Cache hit: no second warning.
        sizer.get_or_measure(Some(&runaway), ElementKind::Item, Size::INFINITE).unwrap();
        assert_eq!(captured_at(Level::Warn).len(), 1);
        assert_eq!(host.measure_calls(), 2);
    }

    #[test]
    fn test_host_resolves_materialized_items() {
        setup();
        let host = TestHost::mount(ListSource::new(vec![1u32, 2, 3]));
        host.settings_mut().item_template = Some(row(1, 1));
        host.override_item_template(row(7, 7));
        let mut sizer = TemplateSizer::new(host.handle());

        // Beyond the frontier the host is never asked.
        let size = sizer.item_size(IndexPath::new(0, 2), Size::INFINITE).unwrap();
        assert_eq!(size, Size::new(1.0, 1.0));
        assert_eq!(host.resolve_calls(), 0);
        assert_eq!(host.display_item_calls(), 0);

        let size = sizer.item_size(IndexPath::ORIGIN, Size::INFINITE).unwrap();
        assert_eq!(size, Size::new(7.0, 7.0));
        assert_eq!(host.resolve_calls(), 1);
    }

    #[test]
    fn test_missing_item_skips_host_resolution() {
        setup();
        let host = TestHost::mount(ListSource::new(Vec::<u32>::new()));
        let base = row(2, 2);
        host.settings_mut().item_template = Some(base.clone());
        host.override_item_template(row(7, 7));
        let sizer = TemplateSizer::new(host.handle());

        // Origin is always materialized, but the source is empty.
        let template = sizer.template_for_item(IndexPath::ORIGIN).unwrap();
        assert_eq!(template.map(|t| t.id()), Some(base.id()));
        assert_eq!(host.display_item_calls(), 1);
        assert_eq!(host.resolve_calls(), 0);
    }

    #[test]
    fn test_item_container_style_applied() {
        setup();
        let host = TestHost::mount(ListSource::new(vec![1u32]));
        let template = row(10, 2);
        {
            let mut settings = host.settings_mut();
            settings.item_template = Some(template.clone());
            settings.item_container_style = Some(Rc::new(ContainerStyle {
                padding: Spacing::all(1),
                ..ContainerStyle::default()
            }));
        }
        let mut sizer = TemplateSizer::new(host.handle());

        let size = sizer.item_size(IndexPath::ORIGIN, Size::INFINITE).unwrap();
        assert_eq!(size, Size::new(12.0, 4.0));

        // Header/footer never take a container style.
        let size = sizer.get_or_measure(
            Some(&DataTemplate::shared("banner", TemplateNode::fixed(10, 2))),
            ElementKind::Header,
            Size::INFINITE,
        );
        assert_eq!(size.unwrap(), Size::new(10.0, 2.0));
    }

    #[test]
    fn test_group_header_lookup() {
        setup();
        let host = TestHost::mount(GroupedSource::new(vec![
            Group::new("a", vec![1u32, 2]),
            Group::new("b", vec![3u32]),
        ]));
        let base = DataTemplate::shared("group", TemplateNode::fixed(20, 1));
        let fancy = DataTemplate::shared("fancy", TemplateNode::fixed(20, 3));
        let (selector, calls) = counting_selector(Some(fancy.clone()));
        {
            let mut settings = host.settings_mut();
            settings.group_header_template = Some(base.clone());
            settings.group_header_template_selector = Some(selector);
        }
        let mut sizer = TemplateSizer::new(host.handle());

        let unmaterialized = sizer.template_for_group_header(1).unwrap();
        assert_eq!(unmaterialized.map(|t| t.id()), Some(base.id()));
        assert_eq!(calls.get(), 0);

        assert_eq!(sizer.section_header_size(1, Size::INFINITE).unwrap(), Size::new(20.0, 1.0));
        assert_eq!(calls.get(), 0);

        sizer.note_materialized(IndexPath::new(1, 0));
        assert_eq!(sizer.section_header_size(1, Size::INFINITE).unwrap(), Size::new(20.0, 3.0));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_reload_resets_frontier_keeps_cache() {
        setup();
        let host = TestHost::mount(ListSource::new(vec![1u32, 2]));
        let template = row(4, 4);
        host.settings_mut().item_template = Some(template.clone());
        let mut sizer = TemplateSizer::new(host.handle());

        sizer.note_materialized(IndexPath::new(0, 1));
        sizer.item_size(IndexPath::new(0, 1), Size::INFINITE).unwrap();
        sizer.reload_data();

        assert_eq!(sizer.frontier(), IndexPath::ORIGIN);
        assert!(!sizer.is_materialized(IndexPath::new(0, 1)));
        assert_eq!(sizer.cached_size(Some(&template)), Some(Size::new(4.0, 4.0)));
    }

    #[test]
    fn test_shared_key_across_kinds() {
        setup();
        let host = TestHost::mount(ListSource::new(vec![1u32]));
        let template = row(6, 2);
        let mut sizer = TemplateSizer::new(host.handle());

        sizer.get_or_measure(Some(&template), ElementKind::Header, Size::INFINITE).unwrap();
        sizer.get_or_measure(Some(&template), ElementKind::Item, Size::INFINITE).unwrap();
        assert_eq!(host.measure_calls(), 1);
        assert_eq!(sizer.cached_count(), 1);
    }

    #[test]
    fn test_invalidate_releases_nodes() {
        setup();
        let host = TestHost::mount(ListSource::new(vec![1u32]));
        let mut sizer = TemplateSizer::new(host.handle());
        let baseline = host.node_count();

        sizer.get_or_measure(Some(&row(3, 3)), ElementKind::Item, Size::INFINITE).unwrap();
        sizer.invalidate();

        assert_eq!(sizer.cached_count(), 0);
        // Scratch root stays for the next pass.
        assert_eq!(host.node_count(), baseline + 1);
    }

    #[test]
    fn test_released_host() {
        setup();
        let host = TestHost::mount(ListSource::new(vec![1u32]));
        let mut sizer = TemplateSizer::new(host.handle());
        host.unmount();

        let result = sizer.header_size(Size::INFINITE);
        assert!(matches!(result, Err(LayoutError::HostReleased(h)) if h == host.handle()));
        assert!(sizer.template_for_item(IndexPath::ORIGIN).is_err());
    }

    #[test]
    fn test_drop_removes_scratch_root() {
        setup();
        let host = TestHost::mount(ListSource::new(vec![1u32]));
        let baseline = host.node_count();
        {
            let mut sizer = TemplateSizer::new(host.handle());
            sizer.get_or_measure(Some(&row(3, 3)), ElementKind::Item, Size::INFINITE).unwrap();
            assert!(host.node_count() > baseline);
        }
        assert_eq!(host.node_count(), baseline);
    }
}
