//! Error handling for vmtpl
//!
//! Two error enums cover the crate:
//! - [`StoreError`] - faults raised by a template store itself, such as a
//!   corrupted index. Never used for "not found".
//! - [`VmtplError`] - everything the resolver and the CLI can report, including
//!   store faults, which pass through unchanged.
//!
//! Expected absences (no template extension deployed, VM without template
//! annotations) are not errors at all: the resolver returns `Ok(None)` for them.
//!
//! [`ErrorContext`] and [`user_friendly_error`] turn any error reaching the CLI
//! into a colored message with details and a suggestion.
//!
//! # Examples
//!
//! ```rust,no_run
//! use vmtpl_cli::core::{VmtplError, user_friendly_error};
//!
//! let error = VmtplError::TemplateNotFound {
//!     key: "openshift/fedora-small".to_string(),
//!     vm: "fedora-vm".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Fault raised by a template store lookup.
///
/// A store returns these only when it cannot answer the question at all. A
/// key that is simply not cached is `Ok(None)`, not an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store's internal index is unusable
    #[error("template store index is unusable: {reason}")]
    Poisoned { reason: String },
}

/// The main error type for vmtpl operations
#[derive(Error, Debug, Clone)]
pub enum VmtplError {
    /// The VM names a parent template that the store does not hold
    #[error("unable to find template object {key} for VM {vm}")]
    TemplateNotFound {
        /// Derived cache key (`namespace/name`)
        key: String,
        /// Name of the VM that references the template
        vm: String,
    },

    /// The template store failed; carried through unchanged
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid manifest file syntax in {file}")]
    ManifestParseError { file: String, reason: String },

    #[error("Invalid manifest {file}: {reason}")]
    InvalidManifest { file: String, reason: String },

    #[error("IO error: {0}")]
    IoError(String),

    #[error("{message}")]
    Other { message: String },
}

/// Error wrapper with details and a suggestion for display in the terminal
#[derive(Debug)]
pub struct ErrorContext {
    pub error: VmtplError,
    pub suggestion: Option<String>,
    pub details: Option<String>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(error: VmtplError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print to stderr: error in red, details in yellow, suggestion in green.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

/// Convert any error into an [`ErrorContext`] for CLI display.
///
/// Known [`VmtplError`] and [`StoreError`] values get tailored suggestions;
/// I/O and TOML errors are mapped onto the closest variant; anything else is
/// shown with its full cause chain.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(vmtpl_error) = error.downcast_ref::<VmtplError>() {
        return create_error_context(vmtpl_error.clone());
    }

    if let Some(store_error) = error.downcast_ref::<StoreError>() {
        return create_error_context(VmtplError::Store(store_error.clone()));
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(VmtplError::IoError(io_error.to_string()))
                    .with_suggestion("Check that the file or directory exists and the path is correct")
                    .with_details("A manifest or configuration file could not be found");
            }
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(VmtplError::IoError(io_error.to_string()))
                    .with_suggestion("Check file ownership and permissions")
                    .with_details("vmtpl does not have permission to read the file");
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(VmtplError::ConfigError {
            message: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax of the configuration file")
        .with_details("Only the [annotations] and [store] tables are recognised");
    }

    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(VmtplError::Other {
        message,
    })
}

fn create_error_context(error: VmtplError) -> ErrorContext {
    let (suggestion, details): (Option<&str>, Option<String>) = match &error {
        VmtplError::TemplateNotFound { .. } => (
            Some("Check that the template exists in the namespace named by the VM's vm.cnv.io/template-namespace annotation"),
            Some("The VM declares a parent template but the template cache does not hold it. The cache may not have synced yet, or the template was deleted".to_string()),
        ),
        VmtplError::Store(StoreError::Poisoned { .. }) => (
            None,
            Some("The template cache is in an inconsistent state; the admission decision is indeterminate".to_string()),
        ),
        VmtplError::ConfigError { .. } => {
            (Some("Check the configuration file passed with --config or VMTPL_CONFIG"), None)
        }
        VmtplError::ManifestParseError { reason, .. } => (
            Some("Manifests must be YAML (multiple documents separated by ---) or JSON"),
            Some(reason.clone()),
        ),
        VmtplError::InvalidManifest { .. } => {
            (Some("Only VirtualMachine and Template objects are accepted"), None)
        }
        VmtplError::IoError(_) | VmtplError::Other { .. } => (None, None),
    };

    let mut ctx = ErrorContext::new(error);
    if let Some(suggestion) = suggestion {
        ctx = ctx.with_suggestion(suggestion);
    }
    if let Some(details) = details {
        ctx = ctx.with_details(details);
    }
    ctx
}
