//! Shared utilities
//!
//! - [`fs`] - directory creation, staged writes and path normalisation

pub mod fs;

pub use fs::{StagedFile, ensure_dir, json_bytes, normalize_path};
