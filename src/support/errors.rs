use thiserror::Error;

/// Recoverable business errors surfaced to the caller as-is.
///
/// A command that fails with one of these leaves the store untouched and
/// writes nothing to the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.into(),
        }
    }

    /// Stable label used for metrics and CLI exit reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Validation(_) => "validation",
            Self::Conflict(_) => "conflict",
            Self::Unauthorized(_) => "authorization",
        }
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Infra(#[from] InfraError),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Domain(e) => e.kind(),
            Self::Infra(_) => "infrastructure",
        }
    }

    /// The business error, if this is one.
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(e) => Some(e),
            Self::Infra(_) => None,
        }
    }
}

impl From<bcrypt::BcryptError> for InfraError {
    fn from(e: bcrypt::BcryptError) -> Self {
        Self::Crypto(e.to_string())
    }
}

/// Result type for pure domain rules
pub type DomainResult<T> = Result<T, DomainError>;

/// Result type for facade commands, which may also fail on persistence
pub type AppResult<T> = Result<T, AppError>;
