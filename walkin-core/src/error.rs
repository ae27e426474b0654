use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalkinError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A hold or backoff was interrupted; fatal to that actor only
    #[error("actor interrupted while suspended")]
    Interrupted,

    #[error("interrupt handle covers {handle} actors but the run has {actors}")]
    InterruptHandleMismatch { handle: usize, actors: usize },

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = WalkinError> = std::result::Result<T, E>;
