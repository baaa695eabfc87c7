use reqwest::StatusCode;
use thiserror::Error;

/// Central error type for the auralis-client crate.
#[derive(Debug, Error)]
pub enum ClientError {
    // Generic fallback (wraps anyhow)
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),

    // Domain-specific variants
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Registration failed. Username or Email may be taken.")]
    RegistrationFailed,

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Request failed with status {status}: {detail}")]
    Http { status: StatusCode, detail: String },

    #[error("No stems to mix")]
    NoStems,

    #[error("Config error: {0}")]
    Config(String),

    #[error("Data dir not available")]
    StorageUnavailable,
}

// --- Implement From conversions for common errors ---
impl From<std::io::Error> for ClientError {
    fn from(e: std::io::Error) -> Self {
        ClientError::Anyhow(e.into())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Anyhow(e.into())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Anyhow(e.into())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(e: toml::de::Error) -> Self {
        ClientError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
