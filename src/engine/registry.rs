//! Host Registry - Handle allocation for collection hosts.
//!
//! Sizers refer to their owning host through a `HostHandle` instead of a
//! strong pointer, so a host never outlives its own unmount:
//! - Monotonic handle allocation (handles are never reused)
//! - Handle → host lookup that yields `None` once the host is released
//! - Destroy callbacks run on release

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::host::CollectionHost;

// =============================================================================
// Handle
// =============================================================================

/// Non-owning reference to a registered collection host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostHandle(usize);

impl HostHandle {
    /// Raw registry index.
    pub const fn index(&self) -> usize {
        self.0
    }
}

// =============================================================================
// Registry State
// =============================================================================

thread_local! {
    /// Map handle index → host.
    static HOSTS: RefCell<HashMap<usize, Rc<dyn CollectionHost>>> = RefCell::new(HashMap::new());

    /// Next handle index. Never decremented, so a stale handle cannot alias a new host.
    static NEXT_INDEX: RefCell<usize> = const { RefCell::new(0) };

    /// Destroy callbacks registered per handle.
    static DESTROY_CALLBACKS: RefCell<HashMap<usize, Vec<Box<dyn FnOnce()>>>> = RefCell::new(HashMap::new());
}

// =============================================================================
// Handle Allocation
// =============================================================================

/// Allocate a handle for a host that is about to be constructed.
///
/// The host usually needs its own handle to build its sizer, so allocation
/// and registration are separate steps.
pub fn allocate_handle() -> HostHandle {
    NEXT_INDEX.with(|next| {
        let mut next = next.borrow_mut();
        let index = *next;
        *next += 1;
        HostHandle(index)
    })
}

/// Register a host under a previously allocated handle.
///
/// Replaces any host already registered under the same handle.
pub fn register_host(handle: HostHandle, host: Rc<dyn CollectionHost>) {
    HOSTS.with(|hosts| {
        hosts.borrow_mut().insert(handle.0, host);
    });
}

/// Release a host.
///
/// Runs destroy callbacks, then drops the registry's reference. The host
/// itself is dropped once the last outside `Rc` goes away.
pub fn release_host(handle: HostHandle) {
    run_destroy_callbacks(handle);

    // Take the host out first so its Drop runs outside the registry borrow.
    let host = HOSTS.with(|hosts| hosts.borrow_mut().remove(&handle.0));
    drop(host);
}

// =============================================================================
// Destroy Callbacks
// =============================================================================

/// Register a callback to run when the host behind `handle` is released.
pub fn on_release(handle: HostHandle, callback: impl FnOnce() + 'static) {
    DESTROY_CALLBACKS.with(|callbacks| {
        callbacks
            .borrow_mut()
            .entry(handle.0)
            .or_default()
            .push(Box::new(callback));
    });
}

fn run_destroy_callbacks(handle: HostHandle) {
    let callbacks = DESTROY_CALLBACKS.with(|callbacks| callbacks.borrow_mut().remove(&handle.0));
    if let Some(callbacks) = callbacks {
        for callback in callbacks {
            callback();
        }
    }
}

// =============================================================================
// Lookups
// =============================================================================

/// Resolve a handle to its host, if it is still registered.
pub fn get_host(handle: HostHandle) -> Option<Rc<dyn CollectionHost>> {
    HOSTS.with(|hosts| hosts.borrow().get(&handle.0).cloned())
}

/// Like [`get_host`], but never panics.
///
/// Returns `None` while the registry is borrowed or after the thread-local
/// has been destroyed, which is when hosts are dropped at thread exit.
pub fn try_get_host(handle: HostHandle) -> Option<Rc<dyn CollectionHost>> {
    HOSTS
        .try_with(|hosts| {
            hosts
                .try_borrow()
                .ok()
                .and_then(|hosts| hosts.get(&handle.0).cloned())
        })
        .ok()
        .flatten()
}

/// Check if a handle still resolves.
pub fn is_registered(handle: HostHandle) -> bool {
    HOSTS.with(|hosts| hosts.borrow().contains_key(&handle.0))
}

/// Count of currently registered hosts.
pub fn get_registered_count() -> usize {
    HOSTS.with(|hosts| hosts.borrow().len())
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Reset all registry state (for testing).
pub fn reset_registry() {
    let hosts = HOSTS.with(|hosts| std::mem::take(&mut *hosts.borrow_mut()));
    drop(hosts);
    DESTROY_CALLBACKS.with(|callbacks| callbacks.borrow_mut().clear());
    NEXT_INDEX.with(|next| *next.borrow_mut() = 0);
}
