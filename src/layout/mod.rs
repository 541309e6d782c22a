//! Layout Module
//!
//! The host-side layout engine used for off-screen measurement, built on
//! [Taffy](https://github.com/DioxusLabs/taffy).
//!
//! # Architecture
//!
//! 1. Templates describe node trees in our own vocabulary (`Dimension`, `Spacing`, ...)
//! 2. The bridge converts them to Taffy styles, with a measure function for text
//! 3. [`VisualTree`] owns the Taffy tree, its live root and the container nodes
//! 4. `measure_child` lays out a container from its parent and reads back its size

mod text_measure;
mod taffy_bridge;
mod visual_tree;

pub use text_measure::*;
pub use taffy_bridge::{to_available_space, NodeContext};
pub use visual_tree::{Container, ContainerState, VisualTree};
