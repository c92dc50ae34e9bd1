//! Parent template resolution
//!
//! [`TemplateResolver::resolve`] answers "which template was this VM created
//! from?" with a single in-memory lookup. Outcomes, checked in order:
//!
//! | Situation | Result |
//! |-----------|--------|
//! | No template store in this deployment | `Ok(None)` |
//! | VM has no derivable template key | `Ok(None)` |
//! | Store lookup faults | `Err(VmtplError::Store(_))` |
//! | Key derivable but not cached | `Err(VmtplError::TemplateNotFound { .. })` |
//! | Found | `Ok(Some(template))`, an owned clone |
//!
//! The first two are both ordinary absences and look the same to the caller.
//! The not-found case is different: the VM says a template exists, the cache
//! disagrees, and the caller decides what that means for admission.

use std::sync::Arc;
use tracing::debug;

use super::key::{AnnotationKeys, KeyDeriver, TemplateKey};
use crate::cache::StoreProvider;
use crate::core::{Template, VirtualMachine, VmtplError};

/// Resolves the parent template of a VM against a shared template store.
///
/// Holds no mutable state; one resolver can serve any number of concurrent
/// requests.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use vmtpl_cli::cache::{MemoryTemplateStore, StaticStoreProvider};
/// use vmtpl_cli::core::{Template, VirtualMachine};
/// use vmtpl_cli::resolver::TemplateResolver;
///
/// let store = Arc::new(MemoryTemplateStore::new());
/// store.add(Template::new("openshift", "fedora-small"));
///
/// let resolver = TemplateResolver::with_default_keys(Arc::new(StaticStoreProvider::new(store)));
///
/// let vm = VirtualMachine::new("fedora-vm")
///     .with_annotation("vm.cnv.io/template-namespace", "openshift")
///     .with_annotation("vm.cnv.io/template", "fedora-small");
///
/// let parent = resolver.resolve(&vm).unwrap().unwrap();
/// assert_eq!(parent.name(), "fedora-small");
///
/// // A VM without template annotations simply has no parent
/// assert!(resolver.resolve(&VirtualMachine::new("baked")).unwrap().is_none());
/// ```
#[derive(Clone)]
pub struct TemplateResolver {
    provider: Arc<dyn StoreProvider>,
    deriver: KeyDeriver,
}

impl TemplateResolver {
    pub fn new(provider: Arc<dyn StoreProvider>, keys: AnnotationKeys) -> Self {
        Self {
            provider,
            deriver: KeyDeriver::new(keys),
        }
    }

    /// Resolver reading the standard `vm.cnv.io/*` annotations.
    pub fn with_default_keys(provider: Arc<dyn StoreProvider>) -> Self {
        Self::new(provider, AnnotationKeys::default())
    }

    /// Derive the template key of `vm` without touching the store.
    pub fn key_for(&self, vm: &VirtualMachine) -> Option<TemplateKey> {
        self.deriver.derive(vm)
    }

    /// Resolve the parent template of `vm`.
    ///
    /// The returned template is a clone: mutating it never affects the store
    /// or what any other caller receives.
    ///
    /// # Errors
    ///
    /// - [`VmtplError::Store`] if the store lookup itself fails
    /// - [`VmtplError::TemplateNotFound`] if the VM names a template the store
    ///   does not hold
    pub fn resolve(&self, vm: &VirtualMachine) -> Result<Option<Template>, VmtplError> {
        let Some(store) = self.provider.store() else {
            debug!("No template store available, skipping parent lookup for VM {}", vm.name());
            return Ok(None);
        };

        let Some(key) = self.deriver.derive(vm) else {
            return Ok(None);
        };

        let Some(cached) = store.get_by_key(key.as_str())? else {
            return Err(VmtplError::TemplateNotFound {
                key: key.into_string(),
                vm: vm.name().to_string(),
            });
        };

        debug!("Resolved parent template {key} for VM {}", vm.name());
        Ok(Some(Template::clone(&cached)))
    }
}

impl std::fmt::Debug for TemplateResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateResolver")
            .field("store_available", &self.provider.store().is_some())
            .field("annotation_keys", self.deriver.annotation_keys())
            .finish()
    }
}
