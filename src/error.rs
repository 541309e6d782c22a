//! Errors raised while resolving or measuring templates.

use core::fmt;

use taffy::TaffyError;

use crate::engine::HostHandle;

/// Errors that may occur while sizing collection elements.
///
/// A missing template is never an error; it resolves to a zero size or the
/// "no template" cache key instead.
#[derive(Debug)]
pub enum LayoutError {
    /// The host behind a sizer's handle has been unmounted.
    HostReleased(HostHandle),
    /// The layout engine rejected a tree operation.
    Taffy(TaffyError),
    /// A host's measurement pass failed.
    Measure(String),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::HostReleased(handle) => {
                write!(f, "collection host {} has been released", handle.index())
            }
            LayoutError::Taffy(err) => write!(f, "layout engine error: {}", err),
            LayoutError::Measure(reason) => write!(f, "measurement failed: {}", reason),
        }
    }
}

impl std::error::Error for LayoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LayoutError::Taffy(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaffyError> for LayoutError {
    fn from(err: TaffyError) -> Self {
        LayoutError::Taffy(err)
    }
}

pub type Result<T> = std::result::Result<T, LayoutError>;
