//! Resource model for virtual machines and templates
//!
//! This module defines the subset of the Kubernetes/OpenShift object model that
//! template resolution needs. Objects deserialize from the same YAML or JSON
//! shape a cluster would serve (`apiVersion`, `kind`, `metadata`, camelCase
//! fields), so manifests can be read straight from disk.
//!
//! # Core Types
//!
//! - [`ObjectMeta`] - Name, namespace, labels and annotations of an object
//! - [`VirtualMachine`] - The resource whose parent template is resolved
//! - [`Template`] - The parent template as held by the template store
//! - [`TemplateParameter`] - A single template parameter
//!
//! # Examples
//!
//! ```rust
//! use vmtpl_cli::core::VirtualMachine;
//!
//! let vm: VirtualMachine = serde_yaml::from_str(
//!     r#"
//! apiVersion: kubevirt.io/v1
//! kind: VirtualMachine
//! metadata:
//!   name: fedora-vm
//!   annotations:
//!     vm.cnv.io/template: fedora-desktop-small
//!     vm.cnv.io/template-namespace: openshift
//! "#,
//! )
//! .unwrap();
//!
//! assert_eq!(vm.name(), "fedora-vm");
//! assert_eq!(vm.annotation("vm.cnv.io/template"), Some("fedora-desktop-small"));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind string for virtual machine manifests.
pub const VIRTUAL_MACHINE_KIND: &str = "VirtualMachine";

/// Kind string for template manifests.
pub const TEMPLATE_KIND: &str = "Template";

/// Identity and free-form metadata shared by every object.
///
/// `annotations` is an `Option` on purpose: a manifest without an
/// `annotations:` block is distinct from one with an empty block, and key
/// derivation reports the two cases differently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    /// Object name, unique within its namespace
    #[serde(default)]
    pub name: String,

    /// Namespace the object lives in, `None` for cluster-scoped or unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Labels attached to the object
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    /// Annotations attached to the object, `None` when the map is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
}

impl ObjectMeta {
    /// Create metadata with just a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder-style namespace setter.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Builder-style annotation setter. Creates the annotation map if absent.
    #[must_use]
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.get_or_insert_with(BTreeMap::new).insert(key.into(), value.into());
        self
    }

    /// Look up a single annotation value.
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.as_ref()?.get(key).map(String::as_str)
    }
}

/// A virtual machine definition.
///
/// Only metadata is interpreted; the `spec` and `status` blocks are kept as
/// raw JSON so that manifests round-trip without loss.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default)]
    pub metadata: ObjectMeta,

    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub spec: serde_json::Value,

    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub status: serde_json::Value,
}

impl VirtualMachine {
    /// Create a VM with the given name and no annotations.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            api_version: Some("kubevirt.io/v1".to_string()),
            kind: Some(VIRTUAL_MACHINE_KIND.to_string()),
            metadata: ObjectMeta::named(name),
            ..Self::default()
        }
    }

    /// Builder-style annotation setter.
    #[must_use]
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata = self.metadata.with_annotation(key, value);
        self
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn annotations(&self) -> Option<&BTreeMap<String, String>> {
        self.metadata.annotations.as_ref()
    }

    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.metadata.annotation(key)
    }
}

/// A single template parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateParameter {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Generator name, e.g. `expression`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generate: Option<String>,

    /// Input for the generator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,

    #[serde(default)]
    pub required: bool,
}

/// A VM template as held by the template store.
///
/// The store owns its copy for as long as the template is cached; callers
/// receive clones (see [`crate::resolver::TemplateResolver`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default)]
    pub metadata: ObjectMeta,

    /// Message shown to the user after instantiation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Raw objects the template instantiates
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub objects: Vec<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<TemplateParameter>,

    /// Labels applied to every instantiated object
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

impl Template {
    /// Create a template in `namespace` with the given name.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            api_version: Some("template.openshift.io/v1".to_string()),
            kind: Some(TEMPLATE_KIND.to_string()),
            metadata: ObjectMeta::named(name).with_namespace(namespace),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.metadata.namespace.as_deref()
    }

    /// Find a parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&TemplateParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}
