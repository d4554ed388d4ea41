use notelet_core::NoteletError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NoteletStorageError {
    #[error("db error")]
    Db(#[from] sea_orm::DbErr),
    #[error("page {0} not found")]
    PageNotFound(String),
    #[error("block {0} not found")]
    BlockNotFound(String),
    #[error("invalid block payload: {0}")]
    Validation(String),
}

pub type NoteletStorageResult<T = ()> = Result<T, NoteletStorageError>;

impl From<NoteletStorageError> for NoteletError {
    fn from(err: NoteletStorageError) -> Self {
        match err {
            NoteletStorageError::PageNotFound(id) => NoteletError::PageNotFound(id),
            NoteletStorageError::BlockNotFound(id) => NoteletError::BlockNotFound(id),
            NoteletStorageError::Validation(message) => NoteletError::Validation(message),
            NoteletStorageError::Db(e) => NoteletError::StorageIo(e.to_string()),
        }
    }
}
