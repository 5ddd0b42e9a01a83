use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid storage reference: {0}")]
    InvalidReference(String),
}
