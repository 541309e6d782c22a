//! Instrumented host and selectors for unit tests.

use std::cell::{Cell, RefCell, RefMut};
use std::rc::Rc;
use std::sync::Once;

use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::engine::{allocate_handle, register_host, release_host, HostHandle};
use crate::error::{LayoutError, Result};
use crate::host::CollectionHost;
use crate::layout::{Container, ContainerState, VisualTree};
use crate::source::{CollectionSource, DataItem};
use crate::template::{resolve_template, DataTemplate, TemplateSelector, TemplateSettings};
use crate::types::{ElementKind, IndexPath, Size};

/// A registered host that counts what the sizer asks of it.
pub(crate) struct TestHost {
    handle: HostHandle,
    tree: RefCell<VisualTree>,
    source: Box<dyn CollectionSource>,
    settings: RefCell<TemplateSettings>,
    measure_calls: Cell<usize>,
    containers_created: Cell<usize>,
    display_item_calls: Cell<usize>,
    resolve_calls: Cell<usize>,
    template_override: RefCell<Option<Rc<DataTemplate>>>,
    fail_next: Cell<bool>,
    forced_size: Cell<Option<Size>>,
    attached_during_measure: Cell<bool>,
    context_forced_during_measure: Cell<bool>,
}

impl TestHost {
    pub(crate) fn mount(source: impl CollectionSource + 'static) -> Rc<Self> {
        let handle = allocate_handle();
        let host = Rc::new(Self {
            handle,
            tree: RefCell::new(VisualTree::new().unwrap()),
            source: Box::new(source),
            settings: RefCell::new(TemplateSettings::default()),
            measure_calls: Cell::new(0),
            containers_created: Cell::new(0),
            display_item_calls: Cell::new(0),
            resolve_calls: Cell::new(0),
            template_override: RefCell::new(None),
            fail_next: Cell::new(false),
            forced_size: Cell::new(None),
            attached_during_measure: Cell::new(false),
            context_forced_during_measure: Cell::new(false),
        });
        register_host(handle, host.clone());
        host
    }

    pub(crate) fn handle(&self) -> HostHandle {
        self.handle
    }

    pub(crate) fn unmount(&self) {
        release_host(self.handle);
    }

    pub(crate) fn settings_mut(&self) -> RefMut<'_, TemplateSettings> {
        self.settings.borrow_mut()
    }

    pub(crate) fn tree(&self) -> &RefCell<VisualTree> {
        &self.tree
    }

    pub(crate) fn node_count(&self) -> usize {
        self.tree.borrow().node_count()
    }

    pub(crate) fn measure_calls(&self) -> usize {
        self.measure_calls.get()
    }

    pub(crate) fn containers_created(&self) -> usize {
        self.containers_created.get()
    }

    pub(crate) fn display_item_calls(&self) -> usize {
        self.display_item_calls.get()
    }

    /// Calls to `resolve_item_template`.
    pub(crate) fn resolve_calls(&self) -> usize {
        self.resolve_calls.get()
    }

    /// Answer every `resolve_item_template` with `template`, ignoring settings.
    pub(crate) fn override_item_template(&self, template: Rc<DataTemplate>) {
        *self.template_override.borrow_mut() = Some(template);
    }

    /// Make the next `measure_child` fail after observing the tree.
    pub(crate) fn fail_next_measure(&self) {
        self.fail_next.set(true);
    }

    /// Report `size` from every `measure_child` instead of laying out.
    pub(crate) fn force_measured_size(&self, size: Size) {
        self.forced_size.set(Some(size));
    }

    pub(crate) fn was_attached_during_measure(&self) -> bool {
        self.attached_during_measure.get()
    }

    pub(crate) fn was_context_forced_during_measure(&self) -> bool {
        self.context_forced_during_measure.get()
    }

    fn new_container(&self, kind: ElementKind) -> Result<Container> {
        self.containers_created.set(self.containers_created.get() + 1);
        self.tree.borrow_mut().new_container(kind)
    }
}

impl CollectionHost for TestHost {
    fn visual_tree(&self) -> &RefCell<VisualTree> {
        &self.tree
    }

    fn settings(&self) -> TemplateSettings {
        self.settings.borrow().clone()
    }

    fn display_item(&self, path: IndexPath) -> Option<DataItem> {
        self.display_item_calls.set(self.display_item_calls.get() + 1);
        self.source.item_at(path)
    }

    fn group_at_display_section(&self, section: usize) -> Option<DataItem> {
        self.source.group_at(section)
    }

    fn resolve_item_template(&self, item: &DataItem) -> Option<Rc<DataTemplate>> {
        self.resolve_calls.set(self.resolve_calls.get() + 1);
        if let Some(template) = self.template_override.borrow().clone() {
            return Some(template);
        }
        let settings = self.settings.borrow();
        resolve_template(
            settings.item_template.as_ref(),
            settings.item_template_selector.as_ref(),
            Some(item),
            ElementKind::Item,
        )
    }

    fn create_item_container(&self) -> Result<Container> {
        self.new_container(ElementKind::Item)
    }

    fn create_group_header_container(&self) -> Result<Container> {
        self.new_container(ElementKind::SectionHeader)
    }

    fn create_header_footer_container(&self, kind: ElementKind) -> Result<Container> {
        self.new_container(kind)
    }

    fn measure_child(&self, container: &Container, available: Size) -> Result<Size> {
        self.measure_calls.set(self.measure_calls.get() + 1);
        self.attached_during_measure
            .set(self.tree.borrow().is_attached(container.node()));
        self.context_forced_during_measure.set(
            container.state().contains(ContainerState::DATA_CONTEXT_FORCED)
                && container.data_context().is_none(),
        );

        if self.fail_next.replace(false) {
            return Err(LayoutError::Measure("injected failure".to_string()));
        }
        if let Some(size) = self.forced_size.get() {
            return Ok(size);
        }
        self.tree.borrow_mut().measure_child(container.node(), available)
    }
}

/// A selector that always answers `result` and counts its invocations.
pub(crate) fn counting_selector(
    result: Option<Rc<DataTemplate>>,
) -> (Rc<dyn TemplateSelector>, Rc<Cell<usize>>) {
    let calls = Rc::new(Cell::new(0));
    let calls_clone = calls.clone();
    let selector: Rc<dyn TemplateSelector> = Rc::new(move |_: &DataItem, _: ElementKind| {
        calls_clone.set(calls_clone.get() + 1);
        result.clone()
    });
    (selector, calls)
}

// =============================================================================
// Log Capture
// =============================================================================

thread_local! {
    static CAPTURED: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let _ = CAPTURED.try_with(|captured| {
            if let Ok(mut captured) = captured.try_borrow_mut() {
                captured.push((record.level(), record.args().to_string()));
            }
        });
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INSTALL: Once = Once::new();

/// Route log records into a per-thread buffer and clear it.
pub(crate) fn capture_logs() {
    INSTALL.call_once(|| {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(LevelFilter::Trace);
    });
    CAPTURED.with(|captured| captured.borrow_mut().clear());
}

/// Records at exactly `level` captured on this thread since `capture_logs`.
pub(crate) fn captured_at(level: Level) -> Vec<String> {
    CAPTURED.with(|captured| {
        captured
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message.clone())
            .collect()
    })
}
