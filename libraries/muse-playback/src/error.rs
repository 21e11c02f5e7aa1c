//! Error types for playback control

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlayerError {
    /// The audio graph could not be activated (typically: the platform
    /// refuses to create a context before a user gesture)
    #[error("audio context could not be created: {0}")]
    Initialization(String),

    /// Builder operation attempted before `start()`
    #[error("builder not started")]
    NotStarted,

    /// Safe-variant operation attempted while the context is suspended or closed
    #[error("context closed or suspended")]
    NotReady,

    /// The native play call failed (decoding error, autoplay block, ...)
    #[error("playback failed: {0}")]
    Playback(String),

    /// The element reported an error, abort, or stall while loading a song
    #[error("failed to load '{path}': {reason}")]
    Load { path: String, reason: String },
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlayerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        assert_eq!(PlayerError::NotReady.to_string(), "context closed or suspended");

        let err = PlayerError::Load {
            path: "/music/a.ogg".to_string(),
            reason: "load stalled".to_string(),
        };
        assert_eq!(err.to_string(), "failed to load '/music/a.ogg': load stalled");
    }
}
