use thiserror::Error;

#[derive(Error, Debug)]
pub enum CartError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl CartError {
    pub fn storage(message: impl Into<String>) -> Self {
        CartError::Storage {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_error_display() {
        let err = CartError::storage("disk full");
        assert_eq!(err.to_string(), "Storage error: disk full");
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CartError = io.into();
        assert!(matches!(err, CartError::Io(_)));
        assert!(err.to_string().contains("denied"));
    }
}
