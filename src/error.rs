//! Error types for the Heartline gateway

use thiserror::Error;

/// Result type alias for Heartline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the Heartline gateway
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid user input
    #[error("input error: {0}")]
    Input(String),

    /// Audio transcription error
    #[error("transcription error: {0}")]
    Transcription(String),

    /// Reply generation error
    #[error("generation error: {0}")]
    Generation(String),

    /// Language detection error
    #[error("language detection error: {0}")]
    Detection(String),

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
