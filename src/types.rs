//! Core types for spark-collection.
//!
//! Geometry, index paths and the layout vocabulary that templates are
//! described in. Everything here is `Copy` and cheap to compare.

use std::cmp::Ordering;

// =============================================================================
// Size
// =============================================================================

/// A width/height pair in layout cells.
///
/// `f32::INFINITY` in an available size means "unconstrained" along that axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Zero size.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Unconstrained in both directions.
    pub const INFINITE: Self = Self::new(f32::INFINITY, f32::INFINITY);

    /// Create a new size.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Constrained width, unconstrained height (the usual shape for a vertical list).
    pub const fn with_width(width: f32) -> Self {
        Self::new(width, f32::INFINITY)
    }

    /// True when both dimensions are exactly zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }

    /// True when either dimension exceeds `threshold`.
    #[inline]
    pub fn exceeds(&self, threshold: f32) -> bool {
        self.width > threshold || self.height > threshold
    }
}

// =============================================================================
// Index Path
// =============================================================================

/// Position of an item in a sectioned collection.
///
/// Ordering is lexicographic: section first, then item within the section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IndexPath {
    pub section: usize,
    pub item: usize,
}

impl IndexPath {
    /// The first item of the first section.
    pub const ORIGIN: Self = Self::new(0, 0);

    pub const fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }
}

impl PartialOrd for IndexPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IndexPath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.section
            .cmp(&other.section)
            .then(self.item.cmp(&other.item))
    }
}

impl From<(usize, usize)> for IndexPath {
    fn from((section, item): (usize, usize)) -> Self {
        Self::new(section, item)
    }
}

// =============================================================================
// Element Kind
// =============================================================================

/// The rendering role of a measured element.
///
/// Selects the container factory and which container style applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Header,
    Footer,
    SectionHeader,
    Item,
}

// =============================================================================
// Layout Vocabulary
// =============================================================================

/// Dimension value for width/height properties.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Dimension {
    /// Size from content.
    #[default]
    Auto,
    /// Absolute size in cells.
    Cells(u16),
    /// Percentage of parent size (0-100).
    Percent(f32),
}

impl From<u16> for Dimension {
    fn from(value: u16) -> Self {
        if value == 0 {
            Self::Auto
        } else {
            Self::Cells(value)
        }
    }
}

/// Main axis direction for a template node's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum FlexDirection {
    #[default]
    Column = 0,
    Row = 1,
    ColumnReverse = 2,
    RowReverse = 3,
}

/// Per-edge spacing in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Spacing {
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
    pub left: u16,
}

impl Spacing {
    /// Same spacing on every edge.
    pub const fn all(n: u16) -> Self {
        Self { top: n, right: n, bottom: n, left: n }
    }

    /// Vertical and horizontal spacing.
    pub const fn symmetric(vertical: u16, horizontal: u16) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }
}
