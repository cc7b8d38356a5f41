use thiserror::Error;

#[derive(Error, Debug)]
pub enum GrafanaError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error {code}: returns {body}")]
    Status { code: u16, body: String },

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("Folder not found: {0}")]
    FolderNotFound(String),
}

pub type Result<T> = std::result::Result<T, GrafanaError>;
