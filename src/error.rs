//! Error types for preflight operations.
//!
//! This module defines [`PreflightError`], the primary error type used
//! throughout the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `PreflightError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `PreflightError::Other`) for unexpected errors
//! - Probe absence is not an error: probes return `Option`, and only the
//!   cluster query path produces `PreflightError` values

use thiserror::Error;

/// Core error type for preflight operations.
#[derive(Debug, Error)]
pub enum PreflightError {
    /// In-cluster service-account credentials could not be loaded.
    #[error("In-cluster credentials unavailable: {message}")]
    Credentials { message: String },

    /// The control-plane version request failed.
    #[error("Kubernetes API request failed: {message}")]
    ApiRequest { message: String },

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for preflight operations.
pub type Result<T> = std::result::Result<T, PreflightError>;
