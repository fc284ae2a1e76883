use thiserror::Error;
use tinylink_core::{DecodeError, Interrupted, LinkId, StorageError, ValidationError};

pub type Result<T> = std::result::Result<T, ShortenerError>;

/// Failures surfaced by the shortener. Cache failures are absorbed and never
/// appear here.
#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("invalid short code: {0}")]
    InvalidShortCode(#[from] DecodeError),
    #[error("no link with id {0}")]
    NotFound(LinkId),
    #[error("operation interrupted: {0}")]
    Interrupted(#[from] Interrupted),
    #[error("storage error: {0}")]
    Storage(StorageError),
}

impl From<StorageError> for ShortenerError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::Interrupted(interrupted) => Self::Interrupted(interrupted),
            other => Self::Storage(other),
        }
    }
}

impl ShortenerError {
    /// Whether the caller, not the system, is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::InvalidShortCode(_) | Self::NotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_interruptions_stay_distinct() {
        let err = ShortenerError::from(StorageError::Interrupted(Interrupted::DeadlineExceeded));
        assert!(matches!(
            err,
            ShortenerError::Interrupted(Interrupted::DeadlineExceeded)
        ));

        let err = ShortenerError::from(StorageError::Unavailable("down".into()));
        assert!(matches!(err, ShortenerError::Storage(StorageError::Unavailable(_))));
        assert!(!err.is_client_error());
    }

    #[test]
    fn client_errors() {
        assert!(ShortenerError::from(ValidationError::Filtered).is_client_error());
        assert!(ShortenerError::from(DecodeError::Empty).is_client_error());
        assert!(ShortenerError::NotFound(LinkId::new(1)).is_client_error());
        assert!(!ShortenerError::from(Interrupted::Cancelled).is_client_error());
    }
}
