//! Visual Tree - The host's Taffy tree with a live root.
//!
//! Everything reachable from [`VisualTree::root`] is "in the real tree".
//! Containers and the sizer's scratch root are created detached and only
//! attached for the duration of a measurement pass.

use taffy::{NodeId, TaffyTree, TraversePartialTree};

use crate::error::Result;
use crate::source::DataItem;
use crate::template::{ContainerStyle, DataTemplate, TemplateNode};
use crate::types::{ElementKind, Size};

use super::taffy_bridge::{
    base_container_style, build_container_style, build_node_style, measure_node,
    scratch_root_style, to_available_space, NodeContext,
};

use std::rc::Rc;

bitflags::bitflags! {
    /// Lifecycle flags of a container.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ContainerState: u8 {
        const NONE = 0;
        /// A container style has been applied.
        const STYLED = 1 << 0;
        /// A content template has been instantiated.
        const TEMPLATED = 1 << 1;
        /// The inherited data context is overridden.
        const DATA_CONTEXT_FORCED = 1 << 2;
        /// The container has been through at least one measurement pass.
        const MEASURED = 1 << 3;
    }
}

// =============================================================================
// Container
// =============================================================================

/// A layout node that hosts one element's template content.
#[derive(Debug)]
pub struct Container {
    kind: ElementKind,
    node: NodeId,
    content: Option<NodeId>,
    template: Option<Rc<DataTemplate>>,
    style: Option<Rc<ContainerStyle>>,
    data_context: Option<DataItem>,
    state: ContainerState,
}

impl Container {
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// The container's own layout node.
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn state(&self) -> ContainerState {
        self.state
    }

    pub fn content_template(&self) -> Option<&Rc<DataTemplate>> {
        self.template.as_ref()
    }

    pub fn container_style(&self) -> Option<&Rc<ContainerStyle>> {
        self.style.as_ref()
    }

    /// The effective data context; `None` while forced to null.
    pub fn data_context(&self) -> Option<&DataItem> {
        self.data_context.as_ref()
    }

    /// Override the inherited data context.
    pub fn force_data_context(&mut self, value: Option<DataItem>) {
        self.data_context = value;
        self.state.insert(ContainerState::DATA_CONTEXT_FORCED);
    }

    /// Drop any override and go back to inheriting.
    pub fn clear_data_context(&mut self) {
        self.data_context = None;
        self.state.remove(ContainerState::DATA_CONTEXT_FORCED);
    }

    pub(crate) fn mark_measured(&mut self) {
        self.state.insert(ContainerState::MEASURED);
    }
}

// =============================================================================
// Visual Tree
// =============================================================================

/// Taffy-backed visual tree owned by a collection host.
pub struct VisualTree {
    taffy: TaffyTree<NodeContext>,
    root: NodeId,
}

impl VisualTree {
    /// Create a tree with an empty live root.
    pub fn new() -> Result<Self> {
        let mut taffy = TaffyTree::new();
        let root = taffy.new_leaf(scratch_root_style())?;
        Ok(Self { taffy, root })
    }

    /// The live root.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Total nodes currently allocated, attached or not.
    pub fn node_count(&self) -> usize {
        self.taffy.total_node_count()
    }

    // =========================================================================
    // Structure
    // =========================================================================

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.taffy.parent(node)
    }

    pub fn child_count(&self, node: NodeId) -> usize {
        self.taffy.child_count(node)
    }

    /// True when `node` is reachable from the live root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == self.root {
                return true;
            }
            current = self.taffy.parent(id);
        }
        false
    }

    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        Ok(self.taffy.add_child(parent, child)?)
    }

    /// Attach a node directly under the live root.
    pub fn attach_to_root(&mut self, node: NodeId) -> Result<()> {
        self.add_child(self.root, node)
    }

    /// Detach `node` from its parent, if it has one.
    ///
    /// Returns true if the node was attached.
    pub fn detach(&mut self, node: NodeId) -> bool {
        match self.taffy.parent(node) {
            Some(parent) => self.taffy.remove_child(parent, node).is_ok(),
            None => false,
        }
    }

    /// Remove a node and all of its descendants.
    pub fn remove_subtree(&mut self, node: NodeId) -> Result<()> {
        self.detach(node);
        for child in self.taffy.children(node)? {
            self.remove_subtree(child)?;
        }
        self.taffy.remove(node)?;
        Ok(())
    }

    // =========================================================================
    // Scratch Root & Containers
    // =========================================================================

    /// Create a detached scratch layout root.
    pub fn new_scratch_root(&mut self) -> Result<NodeId> {
        Ok(self.taffy.new_leaf(scratch_root_style())?)
    }

    /// Create a detached, unstyled, empty container.
    pub fn new_container(&mut self, kind: ElementKind) -> Result<Container> {
        let node = self.taffy.new_leaf(base_container_style())?;
        Ok(Container {
            kind,
            node,
            content: None,
            template: None,
            style: None,
            data_context: None,
            state: ContainerState::NONE,
        })
    }

    /// Apply a container style.
    pub fn apply_container_style(
        &mut self,
        container: &mut Container,
        style: &Rc<ContainerStyle>,
    ) -> Result<()> {
        self.taffy.set_style(container.node, build_container_style(style))?;
        container.style = Some(style.clone());
        container.state.insert(ContainerState::STYLED);
        Ok(())
    }

    /// Replace a container's content with an instance of `template`.
    ///
    /// `None` leaves the container empty.
    pub fn set_content_template(
        &mut self,
        container: &mut Container,
        template: Option<&Rc<DataTemplate>>,
    ) -> Result<()> {
        if let Some(content) = container.content.take() {
            self.remove_subtree(content)?;
        }
        container.template = template.cloned();
        container.state.remove(ContainerState::TEMPLATED);

        if let Some(template) = template {
            let content = self.instantiate(template.root())?;
            self.taffy.add_child(container.node, content)?;
            container.content = Some(content);
            container.state.insert(ContainerState::TEMPLATED);
        }
        Ok(())
    }

    /// Build the node tree for a template node.
    fn instantiate(&mut self, node: &TemplateNode) -> Result<NodeId> {
        let style = build_node_style(&node.style, node.text.is_some());
        let id = match &node.text {
            Some(text) => self
                .taffy
                .new_leaf_with_context(style, NodeContext::Text(text.clone()))?,
            None => self.taffy.new_leaf(style)?,
        };
        for child in &node.children {
            let child_id = self.instantiate(child)?;
            self.taffy.add_child(id, child_id)?;
        }
        Ok(id)
    }

    /// Release a container's nodes.
    pub fn release_container(&mut self, container: Container) -> Result<()> {
        self.remove_subtree(container.node)
    }

    // =========================================================================
    // Measurement
    // =========================================================================

    /// Measure a node against an available size.
    ///
    /// Layout runs from the node's parent (the scratch root during a
    /// measurement pass) so the parent's alignment decides the cross size;
    /// a parentless node is laid out as its own root.
    pub fn measure_child(&mut self, node: NodeId, available: Size) -> Result<Size> {
        let layout_root = self.taffy.parent(node).unwrap_or(node);
        self.taffy
            .compute_layout_with_measure(layout_root, to_available_space(available), measure_node)?;
        let layout = self.taffy.layout(node)?;
        Ok(Size::new(layout.size.width, layout.size.height))
    }
}
