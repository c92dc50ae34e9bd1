//! Resolve parent templates for VM manifests.
//!
//! ```bash
//! vmtpl resolve --templates ./templates --vm ./vm.yaml
//! vmtpl resolve -t common-templates.yaml --vm ./vms/ --format json
//! vmtpl resolve --no-store --vm ./vm.yaml   # cluster without templates
//! ```
//!
//! Every VM is resolved and reported; the command fails if any resolution
//! failed, with the first failure as its error.

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use super::OutputFormat;
use crate::cache::{MemoryTemplateStore, StaticStoreProvider, object_key};
use crate::config::ResolverConfig;
use crate::core::{Template, VmtplError};
use crate::manifest;
use crate::resolver::TemplateResolver;

#[derive(Args, Debug)]
pub struct ResolveCommand {
    /// Template manifests (files or directories) to load into the store
    #[arg(short = 't', long = "templates", num_args = 1..)]
    templates: Vec<PathBuf>,

    /// VM manifests (files or directories) to resolve
    #[arg(long = "vm", required = true, num_args = 1..)]
    vms: Vec<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Behave as if the template extension were not deployed
    #[arg(long)]
    no_store: bool,
}

/// Outcome for one VM.
#[derive(Debug, Serialize)]
struct Resolution {
    vm: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    template: Option<Template>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ResolveCommand {
    pub async fn execute(self, config: &ResolverConfig) -> Result<()> {
        let vms = manifest::load_paths(&self.vms).await?.virtual_machines;
        if vms.is_empty() {
            bail!("No VirtualMachine objects found in the given --vm paths");
        }

        let provider = if self.no_store || !config.store.enabled {
            info!("Template store disabled");
            StaticStoreProvider::unavailable()
        } else {
            let templates = manifest::load_paths(&self.templates).await?.templates;
            let store = MemoryTemplateStore::from_templates(templates);
            info!("Template store holds {} template(s)", store.len());
            StaticStoreProvider::new(Arc::new(store))
        };

        let resolver = TemplateResolver::new(Arc::new(provider), config.annotation_keys());

        let mut first_error: Option<VmtplError> = None;
        let mut resolutions = Vec::with_capacity(vms.len());

        for vm in &vms {
            let resolution = match resolver.resolve(vm) {
                Ok(Some(template)) => Resolution {
                    vm: vm.name().to_string(),
                    key: Some(object_key(&template.metadata)),
                    template: Some(template),
                    error: None,
                },
                Ok(None) => Resolution {
                    vm: vm.name().to_string(),
                    key: None,
                    template: None,
                    error: None,
                },
                Err(err) => {
                    let key = match &err {
                        VmtplError::TemplateNotFound { key, .. } => Some(key.clone()),
                        _ => None,
                    };
                    let resolution = Resolution {
                        vm: vm.name().to_string(),
                        key,
                        template: None,
                        error: Some(err.to_string()),
                    };
                    first_error.get_or_insert(err);
                    resolution
                }
            };
            resolutions.push(resolution);
        }

        match self.format {
            OutputFormat::Text => print_text(&resolutions),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&resolutions)?),
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&resolutions)?),
        }

        match first_error {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}

fn print_text(resolutions: &[Resolution]) {
    for resolution in resolutions {
        match (&resolution.key, &resolution.error) {
            (_, Some(error)) => println!("{}: {}", resolution.vm.bold(), error.red()),
            (Some(key), None) => println!("{}: {}", resolution.vm.bold(), key.green()),
            (None, None) => println!("{}: {}", resolution.vm.bold(), "no parent template".yellow()),
        }
    }
}
