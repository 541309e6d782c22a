//! Taffy Bridge - Template styles to Taffy styles, and the text measure function.
//!
//! Template nodes, container styles and the scratch root are all plain Taffy
//! nodes. Text leaves carry a [`NodeContext`] so Taffy calls back into
//! [`measure_node`] for their intrinsic size.

use taffy::{
    AlignItems as TaffyAlignItems, AvailableSpace, Dimension as TaffyDimension, Display,
    FlexDirection as TaffyFlexDirection, LengthPercentage, NodeId, Rect, Size as TaffySize, Style,
};

use crate::template::{ContainerStyle, NodeStyle};
use crate::types::{Dimension, FlexDirection, Size, Spacing};

use super::text_measure::{max_line_width, measure_text_height};

/// Per-node context stored in the Taffy tree.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeContext {
    /// A text leaf and its content.
    Text(String),
}

// =============================================================================
// CONVERSIONS
// =============================================================================

/// Convert our Dimension to Taffy's Dimension.
pub(crate) fn to_taffy_dimension(dim: Dimension) -> TaffyDimension {
    match dim {
        Dimension::Auto => TaffyDimension::Auto,
        Dimension::Cells(n) => TaffyDimension::Length(n as f32),
        Dimension::Percent(p) => TaffyDimension::Percent(p / 100.0),
    }
}

fn to_taffy_flex_direction(dir: FlexDirection) -> TaffyFlexDirection {
    match dir {
        FlexDirection::Column => TaffyFlexDirection::Column,
        FlexDirection::Row => TaffyFlexDirection::Row,
        FlexDirection::ColumnReverse => TaffyFlexDirection::ColumnReverse,
        FlexDirection::RowReverse => TaffyFlexDirection::RowReverse,
    }
}

fn to_taffy_padding(padding: Spacing) -> Rect<LengthPercentage> {
    Rect {
        top: LengthPercentage::Length(padding.top as f32),
        right: LengthPercentage::Length(padding.right as f32),
        bottom: LengthPercentage::Length(padding.bottom as f32),
        left: LengthPercentage::Length(padding.left as f32),
    }
}

/// Convert an available size; non-finite dimensions become max-content.
///
/// Unconstrained must stay unconstrained: Taffy sizes against `MaxContent`
/// correctly but a huge `Definite` value leaks into percentage and stretch math.
pub fn to_available_space(available: Size) -> TaffySize<AvailableSpace> {
    fn axis(value: f32) -> AvailableSpace {
        if value.is_finite() {
            AvailableSpace::Definite(value.max(0.0))
        } else {
            AvailableSpace::MaxContent
        }
    }

    TaffySize {
        width: axis(available.width),
        height: axis(available.height),
    }
}

// =============================================================================
// STYLE BUILDING
// =============================================================================

/// Build a Taffy Style for a template node.
pub fn build_node_style(node: &NodeStyle, is_text: bool) -> Style {
    let mut style = Style {
        display: Display::Flex,
        flex_direction: to_taffy_flex_direction(node.flex_direction),
        size: TaffySize {
            width: to_taffy_dimension(node.width),
            height: to_taffy_dimension(node.height),
        },
        min_size: TaffySize {
            width: to_taffy_dimension(node.min_width),
            height: to_taffy_dimension(node.min_height),
        },
        padding: to_taffy_padding(node.padding),
        gap: TaffySize {
            width: LengthPercentage::Length(node.gap as f32),
            height: LengthPercentage::Length(node.gap as f32),
        },
        flex_shrink: 0.0,
        ..Default::default()
    };

    // Text sizes from the measure function.
    if is_text {
        style.size = TaffySize::auto();
    }

    style
}

/// Style of a freshly created, unstyled container.
pub fn base_container_style() -> Style {
    Style {
        display: Display::Flex,
        flex_direction: TaffyFlexDirection::Column,
        flex_shrink: 0.0,
        ..Default::default()
    }
}

/// Container style with a [`ContainerStyle`] applied on top of the base.
pub fn build_container_style(container: &ContainerStyle) -> Style {
    Style {
        padding: to_taffy_padding(container.padding),
        min_size: TaffySize {
            width: to_taffy_dimension(container.min_width),
            height: to_taffy_dimension(container.min_height),
        },
        ..base_container_style()
    }
}

/// Style of the scratch layout root.
///
/// Children align to the start so a container's cross size is its
/// fit-content size rather than the full available width.
pub fn scratch_root_style() -> Style {
    Style {
        display: Display::Flex,
        flex_direction: TaffyFlexDirection::Column,
        align_items: Some(TaffyAlignItems::FlexStart),
        ..Default::default()
    }
}

// =============================================================================
// TEXT MEASUREMENT
// =============================================================================

/// Measure function for text leaves.
pub fn measure_node(
    known_dimensions: TaffySize<Option<f32>>,
    available_space: TaffySize<AvailableSpace>,
    _node_id: NodeId,
    context: Option<&mut NodeContext>,
    _style: &Style,
) -> TaffySize<f32> {
    let Some(NodeContext::Text(content)) = context else {
        return TaffySize::ZERO;
    };

    if content.is_empty() {
        return TaffySize::ZERO;
    }

    let text_width = max_line_width(content);
    let wrap_width = match available_space.width {
        AvailableSpace::Definite(w) => (w.max(0.0) as u16).min(text_width),
        AvailableSpace::MinContent => text_width,
        AvailableSpace::MaxContent => text_width,
    };
    let width = known_dimensions.width.unwrap_or(wrap_width as f32);
    let text_height = measure_text_height(content, (width as u16).max(1));

    TaffySize {
        width,
        height: known_dimensions.height.unwrap_or(text_height as f32),
    }
}
