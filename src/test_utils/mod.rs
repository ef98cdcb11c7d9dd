//! Test utilities for confmerge
//!
//! Available to unit tests and, through the `test-utils` feature, to the
//! integration tests in `tests/`.
//!
//! # Example
//!
//! ```rust,no_run
//! use confmerge::test_utils::{ProjectFixture, init_test_logging};
//!
//! init_test_logging(None);
//! let project = ProjectFixture::basic().unwrap();
//! assert!(project.manifest_path().exists());
//! ```

pub mod fixtures;

pub use fixtures::{ManifestFixture, ProjectFixture};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` when given, otherwise
/// `RUST_LOG`; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=confmerge=trace cargo test
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
            .with_ansi(true)
            .try_init();
    });
}
