//! Configuration for vmtpl
//!
//! Configuration is optional; every field has a default matching a standard
//! KubeVirt deployment. A file, when used, is TOML:
//!
//! ```toml
//! [annotations]
//! template-name = "vm.cnv.io/template"
//! template-namespace = "vm.cnv.io/template-namespace"
//!
//! [store]
//! # false behaves like a cluster without the template extension
//! enabled = true
//! ```
//!
//! # Location
//!
//! 1. An explicit path (`--config`)
//! 2. The `VMTPL_CONFIG` environment variable
//! 3. Built-in defaults
//!
//! # Examples
//!
//! ```rust,no_run
//! use vmtpl_cli::config::ResolverConfig;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ResolverConfig::load_with_optional(None).await?;
//! let keys = config.annotation_keys();
//! println!("template annotation: {}", keys.template_name);
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::core::VmtplError;
use crate::resolver::{ANNOTATION_TEMPLATE_NAME, ANNOTATION_TEMPLATE_NAMESPACE, AnnotationKeys};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "VMTPL_CONFIG";

/// Annotation names used to find a VM's parent template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct AnnotationConfig {
    #[serde(default = "default_template_name")]
    pub template_name: String,

    #[serde(default = "default_template_namespace")]
    pub template_namespace: String,
}

fn default_template_name() -> String {
    ANNOTATION_TEMPLATE_NAME.to_string()
}

fn default_template_namespace() -> String {
    ANNOTATION_TEMPLATE_NAMESPACE.to_string()
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            template_name: default_template_name(),
            template_namespace: default_template_namespace(),
        }
    }
}

/// Template store switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct StoreConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

const fn default_enabled() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            enabled: true,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverConfig {
    #[serde(default)]
    pub annotations: AnnotationConfig,

    #[serde(default)]
    pub store: StoreConfig,
}

impl ResolverConfig {
    /// Load from `path`, else from `VMTPL_CONFIG`, else defaults.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = path.or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

        match path {
            Some(path) => Self::load_from(&path).await,
            None => {
                debug!("No configuration file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load and validate a configuration file.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), VmtplError> {
        for (field, value) in [
            ("annotations.template-name", &self.annotations.template_name),
            ("annotations.template-namespace", &self.annotations.template_namespace),
        ] {
            if value.trim().is_empty() {
                return Err(VmtplError::ConfigError {
                    message: format!("{field} must not be empty"),
                });
            }
        }

        if self.annotations.template_name == self.annotations.template_namespace {
            return Err(VmtplError::ConfigError {
                message: "annotations.template-name and annotations.template-namespace must differ"
                    .to_string(),
            });
        }

        Ok(())
    }

    pub fn annotation_keys(&self) -> AnnotationKeys {
        AnnotationKeys {
            template_name: self.annotations.template_name.clone(),
            template_namespace: self.annotations.template_namespace.clone(),
        }
    }
}
