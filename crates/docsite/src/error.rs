use docsite_core::CoreError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl From<CoreError> for Error {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidArgument(msg) => Error::InvalidArgument(msg),
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Store(err.to_string())
    }
}

/// Result type for operations whose failure class matters to the caller
pub type StoreResult<T> = std::result::Result<T, Error>;
