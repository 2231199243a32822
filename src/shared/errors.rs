use thiserror::Error;

/// Storage-related errors for the task persistence file.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to access task file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse task data: {0}")]
    Parse(#[from] serde_json::Error),
}
