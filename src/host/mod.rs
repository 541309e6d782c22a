//! Collection Host - What a sizer needs from the view that owns it.
//!
//! The real collection view (cell reuse, scrolling, rendering) lives outside
//! this crate. A sizer only consumes the narrow surface below: the visual
//! tree to measure in, container factories, the configured templates, and
//! access to already-materialized data.
//!
//! [`CollectionView`] is a complete host over a [`CollectionSource`](crate::source::CollectionSource).

mod view;

pub use view::*;

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::Result;
use crate::layout::{Container, VisualTree};
use crate::source::DataItem;
use crate::template::{resolve_template, DataTemplate, TemplateSettings};
use crate::types::{ElementKind, IndexPath, Size};

/// A view that owns a [`TemplateSizer`](crate::sizing::TemplateSizer).
pub trait CollectionHost {
    /// The tree containers are measured in.
    fn visual_tree(&self) -> &RefCell<VisualTree>;

    /// Snapshot of the configured templates, selectors and container styles.
    fn settings(&self) -> TemplateSettings;

    /// Display-order item at `path`. Only called for materialized positions.
    fn display_item(&self, path: IndexPath) -> Option<DataItem>;

    /// Group object of the section shown at `section`.
    fn group_at_display_section(&self, section: usize) -> Option<DataItem>;

    fn create_item_container(&self) -> Result<Container> {
        self.visual_tree().borrow_mut().new_container(ElementKind::Item)
    }

    fn create_group_header_container(&self) -> Result<Container> {
        self.visual_tree()
            .borrow_mut()
            .new_container(ElementKind::SectionHeader)
    }

    fn create_header_footer_container(&self, kind: ElementKind) -> Result<Container> {
        self.visual_tree().borrow_mut().new_container(kind)
    }

    /// Item template for a data object under the current settings.
    fn resolve_item_template(&self, item: &DataItem) -> Option<Rc<DataTemplate>> {
        let settings = self.settings();
        resolve_template(
            settings.item_template.as_ref(),
            settings.item_template_selector.as_ref(),
            Some(item),
            ElementKind::Item,
        )
    }

    /// Measure an attached container against an available size.
    fn measure_child(&self, container: &Container, available: Size) -> Result<Size> {
        self.visual_tree()
            .borrow_mut()
            .measure_child(container.node(), available)
    }
}
