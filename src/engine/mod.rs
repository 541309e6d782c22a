//! Host registry.
//!
//! Collection hosts own their sizers; sizers reach back to their host only
//! through a [`HostHandle`] resolved against a thread-local registry:
//!
//! ```text
//! CollectionView ──owns──▶ TemplateSizer
//!       ▲                        │
//!       └──── get_host(handle) ◀─┘   (None after release_host)
//! ```

mod registry;

pub use registry::*;
