//! Test fixtures for VMs, templates and manifest files

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{Template, TemplateParameter, VirtualMachine};
use crate::resolver::{ANNOTATION_TEMPLATE_NAME, ANNOTATION_TEMPLATE_NAMESPACE};

/// VM annotated with a parent template.
pub fn templated_vm(name: &str, namespace: &str, template: &str) -> VirtualMachine {
    VirtualMachine::new(name)
        .with_annotation(ANNOTATION_TEMPLATE_NAMESPACE, namespace)
        .with_annotation(ANNOTATION_TEMPLATE_NAME, template)
}

/// VM with no annotation map at all.
pub fn baked_vm(name: &str) -> VirtualMachine {
    VirtualMachine::new(name)
}

/// Template with one object, one parameter and a label, so clones have
/// something to diverge on.
pub fn template(namespace: &str, name: &str) -> Template {
    let mut template = Template::new(namespace, name);
    template.labels.insert("template.kubevirt.io/type".to_string(), "base".to_string());
    template.objects.push(serde_json::json!({
        "apiVersion": "kubevirt.io/v1",
        "kind": "VirtualMachine",
        "metadata": { "name": "${NAME}" },
    }));
    template.parameters.push(TemplateParameter {
        name: "NAME".to_string(),
        required: true,
        ..TemplateParameter::default()
    });
    template
}

/// YAML manifest text for a template.
pub fn template_yaml(namespace: &str, name: &str) -> String {
    format!(
        r#"apiVersion: template.openshift.io/v1
kind: Template
metadata:
  name: {name}
  namespace: {namespace}
labels:
  template.kubevirt.io/type: base
objects:
  - apiVersion: kubevirt.io/v1
    kind: VirtualMachine
    metadata:
      name: ${{NAME}}
parameters:
  - name: NAME
    required: true
"#
    )
}

/// YAML manifest text for a VM annotated with a parent template.
pub fn templated_vm_yaml(name: &str, namespace: &str, template: &str) -> String {
    format!(
        r#"apiVersion: kubevirt.io/v1
kind: VirtualMachine
metadata:
  name: {name}
  annotations:
    {ANNOTATION_TEMPLATE_NAME}: "{template}"
    {ANNOTATION_TEMPLATE_NAMESPACE}: "{namespace}"
spec:
  running: false
"#
    )
}

/// YAML manifest text for a VM without annotations.
pub fn baked_vm_yaml(name: &str) -> String {
    format!(
        r#"apiVersion: kubevirt.io/v1
kind: VirtualMachine
metadata:
  name: {name}
spec:
  running: false
"#
    )
}

/// Write `content` to `dir/file_name`, creating parent directories.
pub fn write_manifest(dir: &Path, file_name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(file_name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
