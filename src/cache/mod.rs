//! Template store abstraction
//!
//! The resolver reads parent templates from a cache that something else keeps
//! current (in a cluster, a watch-driven informer). This module defines the two
//! seams the resolver depends on and the in-process implementations of them:
//!
//! - [`TemplateStore`] - concurrent read access by `namespace/name` key
//! - [`StoreProvider`] - hands out the store, or nothing when the template
//!   extension is not deployed
//! - [`MemoryTemplateStore`] - DashMap-backed store with the write side an
//!   informer drives (`add`, `update`, `delete`, `replace`)
//! - [`StaticStoreProvider`] - a provider fixed at construction time
//!
//! # Ownership
//!
//! Stores hand out `Arc<Template>`: readers never hold a store lock while they
//! work with a template, and the store's own value is never exposed mutably.
//! Callers that need an owned, independently mutable template clone it; the
//! resolver always does.

mod memory;

pub use memory::{MemoryTemplateStore, object_key};

use std::fmt;
use std::sync::Arc;

use crate::core::{StoreError, Template};

/// Read access to a template cache.
///
/// Implementations must be safe to call from many threads at once.
pub trait TemplateStore: Send + Sync {
    /// Look up a template by `namespace/name` key.
    ///
    /// Returns `Ok(None)` when the key is not cached. `Err` is reserved for
    /// faults in the store itself.
    fn get_by_key(&self, key: &str) -> Result<Option<Arc<Template>>, StoreError>;
}

/// Supplies the process-wide template store, if there is one.
///
/// Must be cheap and idempotent; it is called once per resolution.
pub trait StoreProvider: Send + Sync {
    /// The template store, or `None` when templates are not available in
    /// this deployment.
    fn store(&self) -> Option<Arc<dyn TemplateStore>>;
}

/// A [`StoreProvider`] whose answer is fixed when it is built.
#[derive(Clone, Default)]
pub struct StaticStoreProvider {
    store: Option<Arc<dyn TemplateStore>>,
}

impl StaticStoreProvider {
    pub fn new(store: Arc<dyn TemplateStore>) -> Self {
        Self {
            store: Some(store),
        }
    }

    /// A provider for deployments without the template extension.
    pub fn unavailable() -> Self {
        Self {
            store: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.store.is_some()
    }
}

impl fmt::Debug for StaticStoreProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticStoreProvider").field("available", &self.is_available()).finish()
    }
}

impl StoreProvider for StaticStoreProvider {
    fn store(&self) -> Option<Arc<dyn TemplateStore>> {
        self.store.clone()
    }
}
