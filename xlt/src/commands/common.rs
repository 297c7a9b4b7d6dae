//! Common types and utilities for xlt commands.
//!
//! This module provides shared types, constants, and utility functions
//! used across all command implementations to ensure consistency.

use std::path::{Path, PathBuf};

use crate::error::{Result, XltError};

// ============================================================================
// Path Utilities
// ============================================================================

/// Sanitize a user-provided path to prevent path traversal attacks.
///
/// Ensures the resolved path is within the current working directory
/// or an allowed base directory.
///
/// # Arguments
/// * `path` - The user-provided path to sanitize
/// * `base_dir` - The allowed base directory (defaults to current dir)
///
/// # Returns
/// * `Result<PathBuf>` - The sanitized path or an error if traversal detected
///
/// # Security
/// This function protects against:
/// - Directory traversal using `..` components
/// - Symbolic link attacks
/// - Absolute path injection
#[allow(dead_code)]
pub fn sanitize_path(path: &Path, base_dir: Option<&Path>) -> Result<PathBuf> {
    let base = base_dir.unwrap_or_else(|| Path::new("."));
    let base_canonical =
        base.canonicalize().map_err(|e| XltError::Validation(format!("Invalid base directory: {}", e)))?;

    let path_canonical = path.canonicalize().unwrap_or_else(|_| {
        // For non-existent paths, resolve relative to base
        base.join(path).to_path_buf()
    });

    // Ensure the path is within the base directory
    if !path_canonical.starts_with(&base_canonical) {
        return Err(XltError::Validation("Path traversal detected: path must be within current directory".to_string()));
    }

    Ok(path_canonical)
}

// ============================================================================
// Error Messages
// ============================================================================

/// Standard error message templates.
///
/// These constants provide consistent error messages across all commands.
pub mod error_messages {
    /// Error when no input files are specified.
    pub const NO_INPUT_FILES: &str = "No input files specified";

    /// Error when input path does not exist.
    pub const INPUT_PATH_NOT_EXIST: &str = "Input path does not exist: {}";

    /// Error when input path is not a file.
    pub const INPUT_PATH_NOT_FILE: &str = "Input path is not a file: {}";

    /// Error when input path is not a directory.
    pub const INPUT_PATH_NOT_DIR: &str = "Input path is not a directory: {}";

    /// Error when output path is not a directory.
    pub const OUTPUT_PATH_NOT_DIR: &str = "Output path is not a directory: {}";

    /// Error when output file already exists.
    pub const OUTPUT_FILE_EXISTS: &str = "Output file already exists: {}";

    /// Error when a source-language tag doesn't match one of the four known languages.
    pub const UNKNOWN_LANGUAGE_TAG: &str = "Unknown source language tag: {}";

    /// Error when the source language cannot be inferred from a file extension.
    pub const CANNOT_INFER_LANGUAGE: &str = "Cannot infer source language from extension: {}";

    /// Error when files failed to process.
    pub const FILES_FAILED: &str = "{} file(s) failed to process";

    /// Error when file path is invalid.
    pub const INVALID_FILE_PATH: &str = "Invalid file path";
}

// ============================================================================
// Output Messages
// ============================================================================

/// Standard output message templates.
///
/// These constants provide consistent output messages across all commands.
pub mod output_messages {
    /// Generic info message format.
    pub const INFO: &str = "ℹ️ {}";

    /// Generic warning message format.
    pub const WARNING: &str = "⚠️ {}";

    /// Generic error message format.
    pub const ERROR: &str = "❌ {}";

    /// Message when a directory is created.
    pub const CREATED_DIR: &str = "✅ Created directory: {}";

    /// Message when a file is written.
    pub const CREATED_FILE: &str = "✅ Wrote: {}";

    /// Message when a file is transpiled.
    pub const PROCESSING_FILE: &str = "🔄 Transpiling: {}";

    /// Message when a target is written for a source file.
    pub const TRANSPILED_TARGET: &str = "✅ Transpiled: {} → {}";

    /// Message when transpilation of a batch is completed.
    pub const TRANSPILE_COMPLETED: &str = "✅ Transpilation completed in {:.2}s";

    /// Message showing files transpiled count.
    pub const FILES_TRANSPILED: &str = "📊 Files: {} succeeded, {} failed";

    /// Message showing per-file check outcome.
    pub const CHECK_RESULT: &str = "{} {}";
}
