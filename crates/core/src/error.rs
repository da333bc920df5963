//! Error types for the CoursePilot domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; [`Error`] wraps them all.

use thiserror::Error;

/// The top-level error type for all CoursePilot operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Catalog / collaborator errors ---
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    // --- Resolution errors ---
    #[error("Resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    // --- Requisite parsing (strict mode only) ---
    #[error("Requisite error: {0}")]
    Requisite(#[from] RequisiteError),

    // --- Section validation ---
    #[error("Section error: {0}")]
    Section(#[from] SectionError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures reported by a catalog collaborator (record service, snapshot file).
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("Catalog request failed: {message} (status: {status_code})")]
    Status { status_code: u16, message: String },

    #[error("Catalog transport error: {0}")]
    Transport(String),

    #[error("Catalog request timed out: {0}")]
    Timeout(String),

    #[error("Catalog not configured: {0}")]
    NotConfigured(String),

    #[error("Malformed {entity} record: {reason}")]
    Malformed { entity: String, reason: String },
}

impl CatalogError {
    /// Whether a caller may reasonably retry the failed call.
    ///
    /// The engine itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            CatalogError::Transport(_) | CatalogError::Timeout(_) => true,
            CatalogError::Status { status_code, .. } => {
                *status_code == 429 || *status_code >= 500
            }
            CatalogError::NotConfigured(_) | CatalogError::Malformed { .. } => false,
        }
    }

    pub fn malformed(entity: impl Into<String>, reason: impl Into<String>) -> Self {
        CatalogError::Malformed {
            entity: entity.into(),
            reason: reason.into(),
        }
    }
}

/// A fatal failure of an eligibility or planning pass.
#[derive(Debug, Clone, Error)]
pub enum ResolutionError {
    #[error("catalog provider failed: {0}")]
    Provider(#[from] CatalogError),

    #[error("unknown user: {0}")]
    UnknownUser(String),
}

impl ResolutionError {
    pub fn is_retryable(&self) -> bool {
        match self {
            ResolutionError::Provider(e) => e.is_retryable(),
            ResolutionError::UnknownUser(_) => false,
        }
    }
}

/// Raised by strict requisite parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequisiteError {
    #[error("malformed requisite: AND-group {group} is empty")]
    EmptyGroup { group: usize },

    #[error("malformed requisite: AND-group {group} has an empty option")]
    EmptyOption { group: usize },

    #[error("malformed requisite: '{token}' is not a course code")]
    InvalidCode { token: String },
}

/// Why a section was rejected before scheduling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SectionError {
    #[error("section {crn}: start {start} is not before end {end}")]
    InvalidTimeRange {
        crn: String,
        start: String,
        end: String,
    },

    #[error("section {crn}: credits must be positive")]
    ZeroCredits { crn: String },

    #[error("section {crn}: references unknown course {course}")]
    UnknownCourse { crn: String, course: String },

    #[error("invalid weekday token: {0}")]
    InvalidDay(String),

    #[error("invalid time of day: {0}")]
    InvalidTime(String),
}
