use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Document unreadable: {0}")]
    DocumentUnreadable(String),
    #[error("No usable text extracted from {0}")]
    ExtractionEmpty(String),
    #[error("No email address found in document")]
    MissingIdentity,
    #[error("Persistence conflict for {email}: {detail}")]
    PersistenceConflict { email: String, detail: String },
    #[error("Invalid configuration: {0}")]
    Configuration(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Configuration problems stop the batch; everything else is scoped to one document.
    pub fn is_batch_fatal(&self) -> bool {
        matches!(self, CoreError::Configuration(_))
    }

    pub fn rejection_reason(&self) -> RejectionReason {
        match self {
            CoreError::DocumentUnreadable(_) => RejectionReason::DocumentUnreadable,
            CoreError::ExtractionEmpty(_) => RejectionReason::ExtractionEmpty,
            CoreError::MissingIdentity => RejectionReason::MissingIdentity,
            CoreError::PersistenceConflict { .. } => RejectionReason::PersistenceConflict,
            CoreError::Configuration(_) | CoreError::Io(_) => RejectionReason::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RejectionReason {
    DocumentUnreadable,
    ExtractionEmpty,
    MissingIdentity,
    PersistenceConflict,
    Internal,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::DocumentUnreadable => "document unreadable",
            RejectionReason::ExtractionEmpty => "no extractable text",
            RejectionReason::MissingIdentity => "missing email",
            RejectionReason::PersistenceConflict => "persistence conflict",
            RejectionReason::Internal => "internal error",
        }
    }
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
