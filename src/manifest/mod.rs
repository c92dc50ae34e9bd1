//! Manifest loading
//!
//! Reads VirtualMachine and Template objects from YAML or JSON files so the
//! CLI can seed a template store snapshot and pick the VMs to resolve.
//!
//! - YAML files may hold several documents separated by `---`
//! - `.json` files hold a single object
//! - `kind: List` objects are flattened into their `items`
//! - Directories are walked recursively; only `.yaml`, `.yml` and `.json`
//!   files are read, in sorted order
//!
//! Anything other than a VirtualMachine or a Template is rejected rather than
//! silently skipped.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::core::resource::{TEMPLATE_KIND, VIRTUAL_MACHINE_KIND};
use crate::core::{Template, VirtualMachine, VmtplError};

const MANIFEST_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// Objects read from one or more manifest files.
#[derive(Debug, Clone, Default)]
pub struct ManifestSet {
    pub virtual_machines: Vec<VirtualMachine>,
    pub templates: Vec<Template>,
}

impl ManifestSet {
    pub fn is_empty(&self) -> bool {
        self.virtual_machines.is_empty() && self.templates.is_empty()
    }

    pub fn extend(&mut self, other: Self) {
        self.virtual_machines.extend(other.virtual_machines);
        self.templates.extend(other.templates);
    }

    fn push(&mut self, value: serde_json::Value, file: &str) -> Result<(), VmtplError> {
        let invalid = |reason: String| VmtplError::InvalidManifest {
            file: file.to_string(),
            reason,
        };

        let kind = value.get("kind").and_then(serde_json::Value::as_str).unwrap_or_default();
        match kind {
            VIRTUAL_MACHINE_KIND => {
                let vm: VirtualMachine =
                    serde_json::from_value(value).map_err(|e| invalid(e.to_string()))?;
                self.virtual_machines.push(vm);
            }
            TEMPLATE_KIND => {
                let template: Template =
                    serde_json::from_value(value).map_err(|e| invalid(e.to_string()))?;
                self.templates.push(template);
            }
            "List" => {
                let items = match value.get("items") {
                    Some(serde_json::Value::Array(items)) => items.clone(),
                    Some(serde_json::Value::Null) | None => Vec::new(),
                    Some(_) => return Err(invalid("List items must be an array".to_string())),
                };
                for item in items {
                    self.push(item, file)?;
                }
            }
            "" => return Err(invalid("object has no kind".to_string())),
            other => return Err(invalid(format!("unsupported kind '{other}'"))),
        }

        Ok(())
    }
}

/// Parse manifest text. `file` names the source in errors and picks the
/// format: JSON for a `.json` suffix, YAML otherwise.
pub fn parse_manifest(content: &str, file: &str) -> Result<ManifestSet, VmtplError> {
    let parse_error = |reason: String| VmtplError::ManifestParseError {
        file: file.to_string(),
        reason,
    };

    let mut set = ManifestSet::default();

    if file.ends_with(".json") {
        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?;
        set.push(value, file)?;
        return Ok(set);
    }

    for document in serde_yaml::Deserializer::from_str(content) {
        let value =
            serde_yaml::Value::deserialize(document).map_err(|e| parse_error(e.to_string()))?;
        if value.is_null() {
            continue;
        }
        let value = serde_json::to_value(value).map_err(|e| parse_error(e.to_string()))?;
        set.push(value, file)?;
    }

    Ok(set)
}

/// Load one manifest file.
pub async fn load_file(path: &Path) -> Result<ManifestSet> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read manifest: {}", path.display()))?;

    let set = parse_manifest(&content, &path.display().to_string())?;
    debug!(
        "Loaded {} VM(s) and {} template(s) from {}",
        set.virtual_machines.len(),
        set.templates.len(),
        path.display()
    );
    Ok(set)
}

/// Load every manifest under `paths`; files are read directly, directories
/// are walked.
pub async fn load_paths(paths: &[PathBuf]) -> Result<ManifestSet> {
    let mut set = ManifestSet::default();

    for path in paths {
        let metadata = fs::metadata(path)
            .await
            .with_context(|| format!("Failed to access manifest path: {}", path.display()))?;

        if metadata.is_dir() {
            for file in discover_manifests(path).await? {
                set.extend(load_file(&file).await?);
            }
        } else {
            set.extend(load_file(path).await?);
        }
    }

    Ok(set)
}

async fn discover_manifests(root: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = fs::read_dir(&dir)
            .await
            .with_context(|| format!("Failed to read directory: {}", dir.display()))?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_dir() {
                pending.push(path);
            } else if is_manifest(&path) {
                found.push(path);
            }
        }
    }

    found.sort();
    Ok(found)
}

fn is_manifest(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| MANIFEST_EXTENSIONS.contains(&ext))
}
