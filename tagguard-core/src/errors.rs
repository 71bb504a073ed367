//! errors.rs - Custom error types for the tagguard-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// This enum represents all possible error types in the `tagguard-core` library.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TagGuardError {
    #[error("Failed to compile tag rule '{0}': {1}")]
    RuleCompilationError(String, regex::Error),

    #[error("Rule '{0}': pattern length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    #[error("Invalid rule configuration: {0}")]
    InvalidRuleConfig(String),

    #[error("Invalid parameters found in Parameters.{field}: '{value}'. Please review {reference}")]
    InvalidParameter {
        field: &'static str,
        value: String,
        reference: &'static str,
    },

    #[error("Failed to render annotation template '{0}': {1}")]
    TemplateError(String, String),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    #[error("A critical system error occurred: {0}")]
    AnyhowWrapper(#[from] anyhow::Error),

    #[error("A fatal error occurred: {0}")]
    Fatal(String),
}
