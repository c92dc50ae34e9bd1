//! Print the template cache key of VM manifests.
//!
//! ```bash
//! vmtpl key --vm ./vms/
//! ```
//!
//! VMs without a derivable key print `-`. This never consults a store.

use anyhow::{Result, bail};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use super::OutputFormat;
use crate::config::ResolverConfig;
use crate::manifest;
use crate::resolver::KeyDeriver;

#[derive(Args, Debug)]
pub struct KeyCommand {
    /// VM manifests (files or directories)
    #[arg(long = "vm", required = true, num_args = 1..)]
    vms: Vec<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct DerivedKey {
    vm: String,
    key: Option<String>,
}

impl KeyCommand {
    pub async fn execute(self, config: &ResolverConfig) -> Result<()> {
        let vms = manifest::load_paths(&self.vms).await?.virtual_machines;
        if vms.is_empty() {
            bail!("No VirtualMachine objects found in the given --vm paths");
        }

        let deriver = KeyDeriver::new(config.annotation_keys());
        let keys: Vec<DerivedKey> = vms
            .iter()
            .map(|vm| DerivedKey {
                vm: vm.name().to_string(),
                key: deriver.derive(vm).map(|key| key.into_string()),
            })
            .collect();

        match self.format {
            OutputFormat::Text => {
                for derived in &keys {
                    println!("{}\t{}", derived.vm, derived.key.as_deref().unwrap_or("-"));
                }
            }
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&keys)?),
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&keys)?),
        }

        Ok(())
    }
}
