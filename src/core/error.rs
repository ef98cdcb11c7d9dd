//! Error handling for confmerge
//!
//! The error system follows two principles:
//! 1. **Strongly-typed errors** ([`ConfmergeError`]) for precise handling in code
//! 2. **User-friendly messages** ([`ErrorContext`]) with actionable suggestions for CLI users
//!
//! # Error Categories
//!
//! - **Manifests**: [`ConfmergeError::ManifestNotFound`], [`ConfmergeError::ManifestParseError`],
//!   [`ConfmergeError::ManifestValidationError`]
//! - **Configuration errors**: [`ConfmergeError::InvalidAlternatives`],
//!   [`ConfmergeError::UnsupportedFormat`], [`ConfmergeError::CyclicReference`]
//! - **Read failures**: [`ConfmergeError::ConfigFileNotFound`],
//!   [`ConfmergeError::ConfigFileParseError`], [`ConfmergeError::FileSystemError`]
//! - **Everything else**: [`ConfmergeError::Other`]
//!
//! Graph anomalies (missing dependency targets, dependency cycles) are not errors
//! and have no variant here.
//!
//! # Examples
//!
//! ```rust,no_run
//! use confmerge::core::{ConfmergeError, ErrorContext, user_friendly_error};
//!
//! let error = ConfmergeError::ManifestNotFound;
//! let context = user_friendly_error(anyhow::Error::from(error));
//! context.display(); // Shows colored error with suggestions
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for confmerge operations.
///
/// Every fatal variant carries the package name or file path that caused it, so
/// the message alone is enough to locate the offending declaration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfmergeError {
    /// Manifest file (confmerge.toml) not found
    ///
    /// confmerge searches for `confmerge.toml` starting from the current working
    /// directory and walking up the directory tree.
    #[error("Manifest file confmerge.toml not found in current directory or any parent directory")]
    ManifestNotFound,

    /// Manifest parsing error
    #[error("Invalid manifest file syntax in {file}")]
    ManifestParseError {
        /// Path to the manifest file that failed to parse
        file: String,
        /// Specific reason for the parsing failure
        reason: String,
    },

    /// Manifest validation error
    #[error("Manifest validation failed: {reason}")]
    ManifestValidationError {
        /// Reason why manifest validation failed
        reason: String,
    },

    /// The root package's `alternatives` declaration is neither an inline
    /// mapping nor a file path.
    #[error("Invalid alternatives declaration in package '{package}': {reason}")]
    InvalidAlternatives {
        /// Name of the package declaring the alternatives
        package: String,
        /// Why the declaration was rejected
        reason: String,
    },

    /// A declared configuration file does not exist at its resolved path.
    #[error("Configuration file declared by '{package}' not found: {path}")]
    ConfigFileNotFound {
        /// Package that declared the file
        package: String,
        /// Resolved absolute path
        path: String,
    },

    /// A configuration file exists but could not be parsed.
    #[error("Failed to parse configuration file {path}")]
    ConfigFileParseError {
        /// Path to the file
        path: String,
        /// Parser message
        reason: String,
    },

    /// No format reader is registered for the file's extension.
    #[error("Unsupported configuration file format: {path}")]
    UnsupportedFormat {
        /// Path whose extension was not recognised
        path: String,
    },

    /// Category references form a cycle.
    ///
    /// # Fields
    /// - `category`: the category whose expansion re-entered itself
    /// - `chain`: the reference chain, e.g. `web → common → web`
    #[error("Cyclic category reference detected while expanding '{category}': {chain}")]
    CyclicReference {
        /// Category whose expansion re-entered itself
        category: String,
        /// Reference chain that closes the cycle
        chain: String,
    },

    /// An alternative build was requested that the root package does not declare.
    #[error("Alternative '{name}' is not declared by the root package")]
    UnknownAlternative {
        /// Requested alternative name
        name: String,
    },

    /// File system error
    #[error("File system error: {operation} ({path})")]
    FileSystemError {
        /// The file system operation that failed
        operation: String,
        /// Path where the file system error occurred
        path: String,
    },

    /// Any other failure, carrying its top-level message.
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

/// Error context wrapper that adds a suggestion and details to a [`ConfmergeError`].
///
/// Errors are displayed in red, details in yellow and suggestions in green.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: ConfmergeError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context without suggestion or details.
    #[must_use]
    pub const fn new(error: ConfmergeError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors.
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

impl std::error::Error for ErrorContext {}

/// Convert any error into a user-friendly [`ErrorContext`].
///
/// The first [`ConfmergeError`] found in the error chain decides the suggestion.
/// Errors of other types keep their full context chain in the details.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(known) = error.chain().find_map(|e| e.downcast_ref::<ConfmergeError>()) {
        let context = create_error_context(known.clone());
        let outer = error.to_string();
        if outer != known.to_string() && context.details.is_none() {
            return context.with_details(outer);
        }
        return context;
    }

    if let Some(toml_error) = error.chain().find_map(|e| e.downcast_ref::<toml::de::Error>()) {
        return ErrorContext::new(ConfmergeError::ManifestParseError {
            file: "confmerge.toml".to_string(),
            reason: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax in your confmerge.toml file. Verify quotes, brackets, and table names");
    }

    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();
    let context = ErrorContext::new(ConfmergeError::Other {
        message: error.to_string(),
    })
    .with_suggestion("Re-run with --verbose for more information");

    if chain.is_empty() {
        return context;
    }

    let mut details = String::from("Caused by:");
    for (i, cause) in chain.iter().enumerate() {
        details.push_str(&format!("\n  {}: {}", i + 1, cause));
    }
    context.with_details(details)
}

fn create_error_context(error: ConfmergeError) -> ErrorContext {
    match &error {
        ConfmergeError::ManifestNotFound => ErrorContext::new(error)
            .with_suggestion("Create a confmerge.toml in your project directory or pass --manifest-path")
            .with_details("confmerge searches for confmerge.toml in the current directory and its parents"),

        ConfmergeError::ManifestParseError { reason, .. } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_suggestion("Check the TOML syntax: quotes around strings, matching brackets, and valid table names")
                .with_details(details)
        }

        ConfmergeError::ManifestValidationError { .. } => ErrorContext::new(error)
            .with_suggestion("Make sure every installed package declares a unique [package] name"),

        ConfmergeError::InvalidAlternatives { .. } => ErrorContext::new(error)
            .with_suggestion("Declare alternatives as a table of name → category files, or as a path to a .toml/.json/.yaml file; names must be plain directory names")
            .with_details("No files were collected; the build was aborted before collection started"),

        ConfmergeError::ConfigFileNotFound { .. } => ErrorContext::new(error)
            .with_suggestion("Check the path relative to the declaring package's directory"),

        ConfmergeError::ConfigFileParseError { reason, .. } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_suggestion("The file must map category names to a path or a list of paths")
                .with_details(details)
        }

        ConfmergeError::UnsupportedFormat { .. } => ErrorContext::new(error)
            .with_suggestion("Use a .toml, .json, .yaml or .yml file"),

        ConfmergeError::CyclicReference { .. } => ErrorContext::new(error)
            .with_suggestion("Remove one of the `$category` entries so that category references no longer form a loop"),

        ConfmergeError::UnknownAlternative { .. } => ErrorContext::new(error)
            .with_suggestion("Run `confmerge show` without --alternative, or declare it under `alternatives` in the root manifest"),

        ConfmergeError::FileSystemError { .. } => ErrorContext::new(error)
            .with_suggestion("Check that the path exists and that you have permission to access it"),

        ConfmergeError::Other { .. } => ErrorContext::new(error)
            .with_suggestion("Re-run with --verbose for more information"),
    }
}
