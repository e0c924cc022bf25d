use thiserror::Error;

// Error types for feed mapping
#[derive(Error, Debug)]
pub enum MapperError {
    #[error("Improperly configured: {0}")]
    ImproperlyConfigured(String),

    #[error("Import error: no module named {0}")]
    ImportError(String),

    #[error("Catalogue store error: {0}")]
    Store(String),

    #[error("XML write error: {0}")]
    Xml(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for MapperError {
    fn from(err: serde_json::Error) -> Self {
        MapperError::Config(err.to_string())
    }
}
