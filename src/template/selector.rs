//! Template selection and the host's template settings.

use core::fmt;
use std::rc::Rc;

use super::{ContainerStyle, DataTemplate};
use crate::source::DataItem;
use crate::types::ElementKind;

/// Picks a template for a data object.
///
/// Selectors are only consulted for materialized items; see
/// [`TemplateSizer::template_for_item`](crate::sizing::TemplateSizer::template_for_item).
pub trait TemplateSelector {
    fn select_template(&self, item: &DataItem, kind: ElementKind) -> Option<Rc<DataTemplate>>;
}

impl<F> TemplateSelector for F
where
    F: Fn(&DataItem, ElementKind) -> Option<Rc<DataTemplate>>,
{
    fn select_template(&self, item: &DataItem, kind: ElementKind) -> Option<Rc<DataTemplate>> {
        self(item, kind)
    }
}

/// Resolve the template for a data object.
///
/// A selector with a data object is asked first; when it declines (or either
/// is missing) the base template applies.
pub fn resolve_template(
    template: Option<&Rc<DataTemplate>>,
    selector: Option<&Rc<dyn TemplateSelector>>,
    data: Option<&DataItem>,
    kind: ElementKind,
) -> Option<Rc<DataTemplate>> {
    if let (Some(selector), Some(data)) = (selector, data) {
        if let Some(selected) = selector.select_template(data, kind) {
            return Some(selected);
        }
    }
    template.cloned()
}

/// Pointer identity of two optional selectors.
pub fn same_selector(
    a: Option<&Rc<dyn TemplateSelector>>,
    b: Option<&Rc<dyn TemplateSelector>>,
) -> bool {
    match (a, b) {
        (None, None) => true,
        // Compare data pointers only; vtable pointers may differ across codegen units.
        (Some(a), Some(b)) => std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b)),
        _ => false,
    }
}

// =============================================================================
// Template Settings
// =============================================================================

/// Templates, selectors and container styles configured on a host.
#[derive(Clone, Default)]
pub struct TemplateSettings {
    pub item_template: Option<Rc<DataTemplate>>,
    pub item_template_selector: Option<Rc<dyn TemplateSelector>>,
    pub header_template: Option<Rc<DataTemplate>>,
    pub footer_template: Option<Rc<DataTemplate>>,
    pub group_header_template: Option<Rc<DataTemplate>>,
    pub group_header_template_selector: Option<Rc<dyn TemplateSelector>>,
    pub item_container_style: Option<Rc<ContainerStyle>>,
    pub group_header_container_style: Option<Rc<ContainerStyle>>,
}

impl TemplateSettings {
    /// Container style for an element kind; header and footer are never styled.
    pub fn container_style(&self, kind: ElementKind) -> Option<&Rc<ContainerStyle>> {
        match kind {
            ElementKind::Item => self.item_container_style.as_ref(),
            ElementKind::SectionHeader => self.group_header_container_style.as_ref(),
            ElementKind::Header | ElementKind::Footer => None,
        }
    }
}

struct DebugifyOption<'a, T>(&'a Option<T>);
impl<T> fmt::Debug for DebugifyOption<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.is_some() {
            write!(f, "Some(..)")
        } else {
            write!(f, "None")
        }
    }
}

impl fmt::Debug for TemplateSettings {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TemplateSettings")
            .field("item_template", &self.item_template.as_ref().map(|t| t.name()))
            .field("item_template_selector", &DebugifyOption(&self.item_template_selector))
            .field("header_template", &self.header_template.as_ref().map(|t| t.name()))
            .field("footer_template", &self.footer_template.as_ref().map(|t| t.name()))
            .field(
                "group_header_template",
                &self.group_header_template.as_ref().map(|t| t.name()),
            )
            .field(
                "group_header_template_selector",
                &DebugifyOption(&self.group_header_template_selector),
            )
            .field("item_container_style", &self.item_container_style)
            .field("group_header_container_style", &self.group_header_container_style)
            .finish()
    }
}
