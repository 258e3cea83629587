//! Error types shared across the arcade core.
//!
//! Storage and audio errors never reach the player: the session logs them and
//! keeps going with in-memory state. Session errors are returned to the host
//! page so it can grey out a button or show the screen-time overlay.

/// Errors from the on-device storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage write rejected: {0}")]
    Quota(String),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors from sound effect / music playback.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("could not load audio '{0}'")]
    Load(String),
}

/// Errors surfaced by [`crate::session::ArcadeSession`] operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no player selected")]
    NoPlayer,

    #[error("screen time is up")]
    ScreenTimeExpired,

    #[error("not enough points: need {needed}, have {available}")]
    InsufficientPoints { needed: u64, available: u64 },

    #[error("unknown game '{0}'")]
    UnknownGame(String),

    #[error("unknown prize '{0}'")]
    UnknownPrize(String),

    #[error("{0} must be a finite number")]
    NonFinite(&'static str),

    #[error("invalid metrics: {0}")]
    InvalidMetrics(#[from] serde_json::Error),
}
