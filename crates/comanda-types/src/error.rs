use thiserror::Error;

/// Reasons a session operation was not carried out.
///
/// `EmptyInput` and `Busy` are ignore reasons for `submit`: the controller
/// reports them to the caller but never records them as failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("input is empty")]
    EmptyInput,

    #[error("a response is still pending")]
    Busy,

    #[error("session not found")]
    NotFound,

    #[error("no query service configured for '{0}' sessions")]
    KindUnavailable(String),
}

impl SessionError {
    /// Machine-readable code for API envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::EmptyInput => "empty_input",
            SessionError::Busy => "busy",
            SessionError::NotFound => "not_found",
            SessionError::KindUnavailable(_) => "kind_unavailable",
        }
    }
}

/// Errors from catalog data access (used by trait definitions in comanda-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("failed to read data source: {0}")]
    Read(String),

    #[error("failed to parse data source: {0}")]
    Parse(String),

    #[error("entity not found")]
    NotFound,
}
