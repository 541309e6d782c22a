//! Materialization Tracker
//!
//! Records the furthest [`IndexPath`] the host's materialization pass has
//! reached. Positions at or before the frontier are safe to resolve against
//! the data source; positions after it may not exist yet in a virtualized
//! source and must not be enumerated.
//!
//! The frontier lives in a signal, so reading it from a derived or effect
//! creates a dependency that re-runs when the frontier moves or resets.

use spark_signals::{signal, Signal};

use crate::types::IndexPath;

/// Furthest materialized position, ordered by (section, item).
pub struct MaterializationTracker {
    frontier: Signal<IndexPath>,
}

impl MaterializationTracker {
    /// A tracker at the origin.
    pub fn new() -> Self {
        Self {
            frontier: signal(IndexPath::ORIGIN),
        }
    }

    /// Current frontier.
    ///
    /// Note: This creates a reactive dependency when called from a derived/effect.
    pub fn frontier(&self) -> IndexPath {
        self.frontier.get()
    }

    /// Move the frontier back to (0, 0). Called on a full data reload.
    pub fn reset(&self) {
        self.frontier.set(IndexPath::ORIGIN);
    }

    /// Record that `path` has been materialized.
    ///
    /// The frontier never moves backwards; returns true if it advanced.
    pub fn advance_to(&self, path: IndexPath) -> bool {
        if path > self.frontier.get() {
            self.frontier.set(path);
            true
        } else {
            false
        }
    }

    /// Whether `path` is at or before the frontier.
    pub fn is_materialized(&self, path: IndexPath) -> bool {
        path <= self.frontier.get()
    }

    /// Whether `section` is at or before the frontier's section.
    pub fn is_section_materialized(&self, section: usize) -> bool {
        section <= self.frontier.get().section
    }
}

impl Default for MaterializationTracker {
    fn default() -> Self {
        Self::new()
    }
}
