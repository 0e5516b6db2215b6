//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish
//!   failure modes.
//! - Map client error types to appropriate exit codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//!
//! Invariants:
//! - Exit codes 1-5 are reserved for specific error categories.

use fleet_client::{CacheError, ProviderError, ResolveErrors};

/// Structured exit codes for fleet-ssh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Command completed successfully.
    Success = 0,

    /// Unhandled or generic failure.
    GeneralError = 1,

    /// A session for an account could not be established.
    AccessDenied = 2,

    /// Network or pagination failure while listing instances.
    QueryFailed = 3,

    /// Name not found: no cache, or a lookup miss with aborted fuzzy
    /// selection.
    NotFound = 4,

    /// Filesystem write or rename failure while persisting.
    PersistFailed = 5,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

impl From<&ProviderError> for ExitCode {
    fn from(err: &ProviderError) -> Self {
        match err {
            ProviderError::Access { .. } => ExitCode::AccessDenied,
            ProviderError::Query { .. } => ExitCode::QueryFailed,
        }
    }
}

impl From<&CacheError> for ExitCode {
    fn from(err: &CacheError) -> Self {
        match err {
            CacheError::Missing | CacheError::NotFound(_) => ExitCode::NotFound,
            CacheError::Persist { .. } => ExitCode::PersistFailed,
            CacheError::Read { .. } | CacheError::Codec { .. } => ExitCode::GeneralError,
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Extract the appropriate exit code from this error, walking the cause
    /// chain for known client error types.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        for cause in self.chain() {
            if let Some(err) = cause.downcast_ref::<CacheError>() {
                return ExitCode::from(err);
            }
            if let Some(err) = cause.downcast_ref::<ProviderError>() {
                return ExitCode::from(err);
            }
            if let Some(errs) = cause.downcast_ref::<ResolveErrors>() {
                // A single-account command failing is as strong as its only
                // error; otherwise treat the batch as a query failure.
                if let [only] = errs.0.as_slice() {
                    return ExitCode::from(only);
                }
                return ExitCode::QueryFailed;
            }
        }
        ExitCode::GeneralError
    }
}
