// ⚠️ Error types shared by the catalog, config and rendering layers

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Template rendering failed: {0}")]
    Template(#[from] askama::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Catalog error: {message}")]
    Catalog { message: String },
}

impl MapError {
    pub fn config(message: impl Into<String>) -> Self {
        MapError::Config {
            message: message.into(),
        }
    }

    pub fn catalog(message: impl Into<String>) -> Self {
        MapError::Catalog {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MapError>;
