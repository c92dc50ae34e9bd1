//! In-memory concurrent template store.

use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use super::TemplateStore;
use crate::core::{ObjectMeta, StoreError, Template};

/// Store key of an object: `namespace/name`, or `name` when cluster-scoped.
pub fn object_key(meta: &ObjectMeta) -> String {
    match meta.namespace.as_deref() {
        Some(namespace) if !namespace.is_empty() => format!("{namespace}/{}", meta.name),
        _ => meta.name.clone(),
    }
}

/// DashMap-backed [`TemplateStore`].
///
/// Reads take a shard read lock only long enough to clone the `Arc`. The
/// write methods are what an informer would call as it observes templates
/// being created, changed and deleted.
#[derive(Debug, Default)]
pub struct MemoryTemplateStore {
    templates: DashMap<String, Arc<Template>>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store holding `templates`.
    pub fn from_templates(templates: impl IntoIterator<Item = Template>) -> Self {
        let store = Self::new();
        store.replace(templates);
        store
    }

    /// Insert or overwrite a template under its object key. Returns the key.
    pub fn add(&self, template: Template) -> String {
        let key = object_key(&template.metadata);
        debug!("Caching template {key}");
        self.templates.insert(key.clone(), Arc::new(template));
        key
    }

    /// Same as [`add`](Self::add); kept separate to mirror informer events.
    pub fn update(&self, template: Template) -> String {
        self.add(template)
    }

    /// Remove a template. Readers holding an `Arc` to it keep their value.
    pub fn delete(&self, key: &str) -> Option<Arc<Template>> {
        let removed = self.templates.remove(key).map(|(_, template)| template);
        if removed.is_some() {
            debug!("Evicted template {key}");
        }
        removed
    }

    /// Replace the whole content, as a full resync would.
    ///
    /// The new set is written before stale keys are dropped, so a template
    /// present before and after the resync stays visible throughout. Readers
    /// may briefly see stale keys alongside the new ones.
    pub fn replace(&self, templates: impl IntoIterator<Item = Template>) {
        let keep: HashSet<String> =
            templates.into_iter().map(|template| self.add(template)).collect();
        self.templates.retain(|key, _| {
            let retained = keep.contains(key);
            if !retained {
                debug!("Evicted template {key}");
            }
            retained
        });
    }

    /// Sorted list of cached keys.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> =
            self.templates.iter().map(|entry| entry.key().clone()).collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl TemplateStore for MemoryTemplateStore {
    fn get_by_key(&self, key: &str) -> Result<Option<Arc<Template>>, StoreError> {
        Ok(self.templates.get(key).map(|entry| Arc::clone(entry.value())))
    }
}
