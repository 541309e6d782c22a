//! Off-screen Measurement
//!
//! A template is measured by instantiating it into a fresh container, hanging
//! that container under the sizer's scratch root, and hanging the scratch root
//! under the live root for exactly as long as the host's measure pass runs.
//! [`MeasureScope`] owns that attachment: dropping it detaches both nodes and
//! clears the container's forced data context, whether or not the measure
//! pass succeeded.

use std::cell::RefCell;
use std::rc::Rc;

use taffy::NodeId;

use crate::error::Result;
use crate::host::CollectionHost;
use crate::layout::{Container, VisualTree};
use crate::template::{DataTemplate, TemplateSettings};
use crate::types::{ElementKind, Size};

// =============================================================================
// Scope Guard
// =============================================================================

/// Temporary attachment of a container to the live tree.
pub(crate) struct MeasureScope<'a> {
    tree: &'a RefCell<VisualTree>,
    scratch: NodeId,
    container: &'a mut Container,
}

impl<'a> MeasureScope<'a> {
    pub(crate) fn new(
        tree: &'a RefCell<VisualTree>,
        scratch: NodeId,
        container: &'a mut Container,
    ) -> Self {
        Self {
            tree,
            scratch,
            container,
        }
    }

    /// Scratch root under the live root, container under the scratch root.
    ///
    /// Partial attachment is undone by `Drop` like a full one.
    pub(crate) fn attach(&self) -> Result<()> {
        let mut tree = self.tree.borrow_mut();
        tree.attach_to_root(self.scratch)?;
        tree.add_child(self.scratch, self.container.node())?;
        Ok(())
    }

    pub(crate) fn container(&self) -> &Container {
        &*self.container
    }
}

impl Drop for MeasureScope<'_> {
    fn drop(&mut self) {
        match self.tree.try_borrow_mut() {
            Ok(mut tree) => {
                tree.detach(self.scratch);
                tree.detach(self.container.node());
            }
            Err(_) => {
                log::error!("visual tree still borrowed after measurement; scratch root left attached");
            }
        }
        self.container.clear_data_context();
    }
}

// =============================================================================
// Measurement
// =============================================================================

/// Measure `template` as an element of `kind`.
///
/// Returns the size and the container it was measured in. On failure the
/// container's nodes are released before the error is returned.
pub(crate) fn measure_template(
    host: &dyn CollectionHost,
    settings: &TemplateSettings,
    scratch: NodeId,
    template: Option<&Rc<DataTemplate>>,
    kind: ElementKind,
    available: Size,
) -> Result<(Size, Container)> {
    let mut container = match kind {
        ElementKind::Item => host.create_item_container()?,
        ElementKind::SectionHeader => host.create_group_header_container()?,
        ElementKind::Header | ElementKind::Footer => host.create_header_footer_container(kind)?,
    };

    // Nothing may bind against an inherited data context while detached.
    container.force_data_context(None);

    match measure_in(host, settings, scratch, &mut container, template, kind, available) {
        Ok(size) => {
            container.mark_measured();
            Ok((size, container))
        }
        Err(err) => {
            container.clear_data_context();
            release(host, container);
            Err(err)
        }
    }
}

fn measure_in(
    host: &dyn CollectionHost,
    settings: &TemplateSettings,
    scratch: NodeId,
    container: &mut Container,
    template: Option<&Rc<DataTemplate>>,
    kind: ElementKind,
    available: Size,
) -> Result<Size> {
    {
        let mut tree = host.visual_tree().borrow_mut();
        if let Some(style) = settings.container_style(kind) {
            tree.apply_container_style(container, style)?;
        }
        tree.set_content_template(container, template)?;
    }

    let scope = MeasureScope::new(host.visual_tree(), scratch, container);
    scope.attach()?;
    host.measure_child(scope.container(), available)
}

/// Give a container's nodes back to the host's tree.
pub(crate) fn release(host: &dyn CollectionHost, container: Container) {
    match host.visual_tree().try_borrow_mut() {
        Ok(mut tree) => {
            if let Err(err) = tree.release_container(container) {
                log::debug!("failed to release measurement container: {}", err);
            }
        }
        Err(_) => log::debug!("visual tree busy; measurement container leaked"),
    }
}
