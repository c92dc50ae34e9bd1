//! Cache key derivation from VM annotations
//!
//! A VM records its parent template indirectly, through two annotations:
//!
//! | Annotation | Meaning |
//! |------------|---------|
//! | `vm.cnv.io/template-namespace` | Namespace of the parent template |
//! | `vm.cnv.io/template` | Name of the parent template |
//!
//! [`KeyDeriver::derive`] joins the two into a [`TemplateKey`] of the form
//! `namespace/name`, the same key the template store indexes by. A VM that
//! lacks either annotation has no derivable key; that is an ordinary "baked"
//! VM, reported with a warning and `None`, never an error.

use std::fmt;
use tracing::warn;

use crate::core::VirtualMachine;

/// Annotation holding the parent template name.
pub const ANNOTATION_TEMPLATE_NAME: &str = "vm.cnv.io/template";

/// Annotation holding the parent template namespace.
pub const ANNOTATION_TEMPLATE_NAMESPACE: &str = "vm.cnv.io/template-namespace";

/// Composite `namespace/name` key identifying a template in the store.
///
/// Built only by [`KeyDeriver`] or [`TemplateKey::new`], so both halves are
/// always non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateKey {
    key: String,
    split: usize,
}

impl TemplateKey {
    /// Join a namespace and a name. Returns `None` if either is empty.
    pub fn new(namespace: &str, name: &str) -> Option<Self> {
        if namespace.is_empty() || name.is_empty() {
            return None;
        }

        Some(Self {
            key: format!("{namespace}/{name}"),
            split: namespace.len(),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.key[..self.split]
    }

    pub fn name(&self) -> &str {
        &self.key[self.split + 1..]
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }

    pub fn into_string(self) -> String {
        self.key
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl AsRef<str> for TemplateKey {
    fn as_ref(&self) -> &str {
        &self.key
    }
}

/// Names of the two annotations a [`KeyDeriver`] reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationKeys {
    pub template_name: String,
    pub template_namespace: String,
}

impl Default for AnnotationKeys {
    fn default() -> Self {
        Self {
            template_name: ANNOTATION_TEMPLATE_NAME.to_string(),
            template_namespace: ANNOTATION_TEMPLATE_NAMESPACE.to_string(),
        }
    }
}

/// Derives template cache keys from VM annotations.
#[derive(Debug, Clone, Default)]
pub struct KeyDeriver {
    keys: AnnotationKeys,
}

impl KeyDeriver {
    pub const fn new(keys: AnnotationKeys) -> Self {
        Self {
            keys,
        }
    }

    pub const fn annotation_keys(&self) -> &AnnotationKeys {
        &self.keys
    }

    /// Derive the parent template key of `vm`, if it records one.
    ///
    /// Returns `None`, after logging a warning, when the annotation map is
    /// absent or when either the namespace or the name annotation is missing
    /// or empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vmtpl_cli::core::VirtualMachine;
    /// use vmtpl_cli::resolver::KeyDeriver;
    ///
    /// let deriver = KeyDeriver::default();
    ///
    /// let vm = VirtualMachine::new("fedora-vm")
    ///     .with_annotation("vm.cnv.io/template-namespace", "openshift")
    ///     .with_annotation("vm.cnv.io/template", "fedora-small");
    /// let key = deriver.derive(&vm).unwrap();
    /// assert_eq!(key.as_str(), "openshift/fedora-small");
    ///
    /// assert!(deriver.derive(&VirtualMachine::new("baked")).is_none());
    /// ```
    pub fn derive(&self, vm: &VirtualMachine) -> Option<TemplateKey> {
        let Some(annotations) = vm.annotations() else {
            warn!("VM {} missing annotations entirely", vm.name());
            return None;
        };

        let namespace = annotations.get(&self.keys.template_namespace).map_or("", String::as_str);
        if namespace.is_empty() {
            warn!("VM {} missing template namespace annotation", vm.name());
            return None;
        }

        let name = annotations.get(&self.keys.template_name).map_or("", String::as_str);
        if name.is_empty() {
            warn!("VM {} missing template annotation", vm.name());
            return None;
        }

        TemplateKey::new(namespace, name)
    }
}
