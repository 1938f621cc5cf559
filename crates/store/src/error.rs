use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} name must not be blank")]
    InvalidName { kind: &'static str },

    #[error("config key exceeds {max} characters")]
    KeyTooLong { max: usize },

    #[error("application '{0}' already exists")]
    AppExists(String),

    #[error("environment '{env}' already exists for application '{app}'")]
    EnvExists { app: String, env: String },

    #[error("application '{0}' not found")]
    AppNotFound(String),

    #[error("environment '{env}' not found for application '{app}'")]
    EnvNotFound { app: String, env: String },

    #[error("config item '{key}' not found in {app}/{env}")]
    ItemNotFound {
        app: String,
        env: String,
        key: String,
    },

    #[error("store lock poisoned")]
    Poisoned,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// True for errors that mean "the thing you asked for does not exist".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::AppNotFound(_) | Self::EnvNotFound { .. } | Self::ItemNotFound { .. }
        )
    }
}
