//! vmtpl - parent template resolution for virtual machines
//!
//! A KubeVirt VM created from an OpenShift template records that template in
//! two annotations. Admission-time validation needs the template itself, and
//! must get it without a network round trip: it reads from a local,
//! eventually-consistent template cache that a watch keeps current.
//!
//! This crate implements that read path:
//!
//! 1. [`resolver::KeyDeriver`] turns a VM's annotations into a
//!    `namespace/name` cache key, or reports that the VM has no parent
//! 2. [`resolver::TemplateResolver`] performs one lookup in the shared
//!    [`cache::TemplateStore`] and returns an owned copy of the template
//!
//! Missing templates are classified rather than collapsed:
//!
//! | Situation | Outcome |
//! |-----------|---------|
//! | Template extension not deployed | `Ok(None)` |
//! | VM without template annotations | `Ok(None)` |
//! | Store fault | `Err(VmtplError::Store)` |
//! | Annotated template not cached | `Err(VmtplError::TemplateNotFound)` |
//!
//! # Core Modules
//!
//! - [`cache`] - Template store traits and the in-memory DashMap store
//! - [`config`] - Annotation names and store switch (TOML)
//! - [`core`] - Resource model and error types
//! - [`manifest`] - YAML/JSON manifest loading
//! - [`resolver`] - Key derivation and template resolution
//! - [`cli`] - The `vmtpl` command line
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Resolve VMs against a snapshot of templates
//! vmtpl resolve --templates ./templates --vm ./vms
//!
//! # Show which key each VM derives to
//! vmtpl key --vm ./vms --format json
//! ```

// Core functionality modules
pub mod cache;
pub mod cli;
pub mod config;
pub mod core;
pub mod manifest;
pub mod resolver;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
