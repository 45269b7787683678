//! Error type shared by the core domain modules.

/// Errors produced by domain-level validation and parsing.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Input failed a local validation rule. Always recoverable; the
    /// user corrects the input and retries. No network call is made.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A wire value could not be mapped into a domain type.
    #[error("Parse error: {0}")]
    Parse(String),
}
