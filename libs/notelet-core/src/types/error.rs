use thiserror::Error;

#[derive(Debug, Error)]
pub enum NoteletError {
    #[error("page {0} not found")]
    PageNotFound(String),
    #[error("block {0} not found")]
    BlockNotFound(String),
    #[error("invalid block payload: {0}")]
    Validation(String),
    #[error("storage io: {0}")]
    StorageIo(String),
}

impl NoteletError {
    /// NotFound is absorbed by debounced saves: the block was deleted
    /// server-side or concurrently, not an error to surface.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PageNotFound(_) | Self::BlockNotFound(_))
    }
}

pub type NoteletResult<T = (), E = NoteletError> = Result<T, E>;
