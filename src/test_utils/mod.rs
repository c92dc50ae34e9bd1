//! Test utilities for vmtpl
//!
//! Shared by unit tests and the integration suite (via the `test-utils`
//! feature):
//! - [`init_test_logging`] - one-time tracing setup that writes through the
//!   test harness
//! - [`fixtures`] - VM, template and manifest builders
//!
//! # Example
//!
//! ```rust,no_run
//! use vmtpl_cli::test_utils::fixtures::{template, templated_vm};
//!
//! let vm = templated_vm("vm1", "ns1", "tpl1");
//! let tmpl = template("ns1", "tpl1");
//! ```

pub mod fixtures;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` if given, else `RUST_LOG`; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
