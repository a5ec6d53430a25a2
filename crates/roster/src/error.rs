use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, RosterError>;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Failed to decode record: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid draft: {0}")]
    InvalidDraft(#[from] validator::ValidationErrors),

    #[error("Unknown athlete: {0}")]
    UnknownAthlete(Uuid),
}
