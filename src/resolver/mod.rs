//! Parent template resolution for virtual machines
//!
//! - [`key`] - derives the `namespace/name` cache key from VM annotations
//! - [`template`] - looks the key up in the shared template store and hands
//!   back an owned copy
//!
//! Control flow: `TemplateResolver::resolve(vm)` → `KeyDeriver::derive(vm)` →
//! `TemplateStore::get_by_key(key)` → clone.

pub mod key;
pub mod template;

pub use key::{
    ANNOTATION_TEMPLATE_NAME, ANNOTATION_TEMPLATE_NAMESPACE, AnnotationKeys, KeyDeriver, TemplateKey,
};
pub use template::TemplateResolver;
