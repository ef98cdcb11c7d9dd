//! Core types for confmerge
//!
//! Error handling shared by every layer of the crate:
//! - [`ConfmergeError`] - enumerated failure modes
//! - [`ErrorContext`] - user-facing wrapper with suggestions and details
//! - [`user_friendly_error`] - convert any [`anyhow::Error`] for CLI display

pub mod error;

pub use error::{ConfmergeError, ErrorContext, user_friendly_error};
