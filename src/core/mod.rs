//! Core types for vmtpl
//!
//! - [`error`] - [`VmtplError`], [`StoreError`], [`ErrorContext`] and
//!   [`user_friendly_error`]
//! - [`resource`] - [`VirtualMachine`], [`Template`] and their metadata

pub mod error;
pub mod resource;

pub use error::{ErrorContext, StoreError, VmtplError, user_friendly_error};
pub use resource::{ObjectMeta, Template, TemplateParameter, VirtualMachine};
