//! Templates - Declarative descriptions of an element's visual subtree.
//!
//! A [`DataTemplate`] is a tree of [`TemplateNode`]s. Instantiating it into a
//! container builds one layout node per template node (see
//! [`VisualTree::set_content_template`](crate::layout::VisualTree::set_content_template)).
//!
//! Template identity is what the size cache keys on. Each template gets a
//! [`TemplateId`] when it is constructed and clones keep that id, so two
//! handles to the same template always land on the same cache entry.

mod selector;

pub use selector::*;

use std::cell::Cell;
use std::rc::Rc;

use crate::types::{Dimension, FlexDirection, Spacing};

// =============================================================================
// Identity
// =============================================================================

thread_local! {
    /// Counter for template ids.
    static TEMPLATE_COUNTER: Cell<u64> = const { Cell::new(0) };
}

/// Identity of a template definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TemplateId(u64);

impl TemplateId {
    fn next() -> Self {
        TEMPLATE_COUNTER.with(|counter| {
            let id = counter.get();
            counter.set(id + 1);
            TemplateId(id)
        })
    }
}

/// Size cache key.
///
/// `None` is the reserved "no template" sentinel: an item without any
/// template still measures (to zero) and gets one cache slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKey {
    None,
    Template(TemplateId),
}

impl TemplateKey {
    /// Key for an optional template.
    pub fn of(template: Option<&Rc<DataTemplate>>) -> Self {
        match template {
            Some(template) => TemplateKey::Template(template.id()),
            None => TemplateKey::None,
        }
    }
}

// =============================================================================
// Node Style
// =============================================================================

/// Layout properties of a single template node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodeStyle {
    pub width: Dimension,
    pub height: Dimension,
    pub min_width: Dimension,
    pub min_height: Dimension,
    pub padding: Spacing,
    pub flex_direction: FlexDirection,
    pub gap: u16,
}

/// Style applied to the container that hosts a template.
///
/// Item containers take the item container style; group header containers
/// take the group header container style. Header/footer containers are never
/// styled.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContainerStyle {
    pub padding: Spacing,
    pub min_width: Dimension,
    pub min_height: Dimension,
}

// =============================================================================
// Template Node
// =============================================================================

/// One node of a template's visual subtree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TemplateNode {
    pub style: NodeStyle,
    /// Text content; a node with text is measured as a text leaf.
    pub text: Option<String>,
    pub children: Vec<TemplateNode>,
}

impl TemplateNode {
    /// An empty box.
    pub fn new() -> Self {
        Self::default()
    }

    /// A text leaf.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            text: Some(content.into()),
            ..Self::default()
        }
    }

    /// A box of fixed size in cells.
    pub fn fixed(width: u16, height: u16) -> Self {
        Self::new().width(Dimension::Cells(width)).height(Dimension::Cells(height))
    }

    pub fn width(mut self, width: Dimension) -> Self {
        self.style.width = width;
        self
    }

    pub fn height(mut self, height: Dimension) -> Self {
        self.style.height = height;
        self
    }

    pub fn min_height(mut self, min_height: Dimension) -> Self {
        self.style.min_height = min_height;
        self
    }

    pub fn padding(mut self, padding: Spacing) -> Self {
        self.style.padding = padding;
        self
    }

    pub fn direction(mut self, direction: FlexDirection) -> Self {
        self.style.flex_direction = direction;
        self
    }

    pub fn gap(mut self, gap: u16) -> Self {
        self.style.gap = gap;
        self
    }

    pub fn child(mut self, child: TemplateNode) -> Self {
        self.children.push(child);
        self
    }

    /// Number of nodes in this subtree, including itself.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TemplateNode::node_count).sum::<usize>()
    }
}

// =============================================================================
// Data Template
// =============================================================================

/// A named, identified template definition.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTemplate {
    id: TemplateId,
    name: String,
    root: TemplateNode,
}

impl DataTemplate {
    /// Create a template with a fresh identity.
    pub fn new(name: impl Into<String>, root: TemplateNode) -> Self {
        Self {
            id: TemplateId::next(),
            name: name.into(),
            root,
        }
    }

    /// Create a template wrapped for sharing between settings and selectors.
    pub fn shared(name: impl Into<String>, root: TemplateNode) -> Rc<Self> {
        Rc::new(Self::new(name, root))
    }

    pub fn id(&self) -> TemplateId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &TemplateNode {
        &self.root
    }
}
