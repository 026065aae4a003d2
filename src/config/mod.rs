//! Configuration management for the Heartline gateway
//!
//! Precedence is env > config file > default. The one required value is the
//! Gemini API credential; its absence is a fatal startup condition, never a
//! runtime error.

pub mod file;

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::lang::VoiceLang;
use crate::{Error, Result};

/// Default Gemini model
const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Default per-request timeout for outbound calls
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Heartline gateway configuration
#[derive(Debug)]
pub struct Config {
    /// Gemini API credential
    pub api_key: SecretString,

    /// Model identifier for generation and transcription
    pub model: String,

    /// Voice configuration
    pub voice: VoiceConfig,

    /// Path to data directory (saved reply audio)
    pub data_dir: PathBuf,

    /// Per-request timeout for outbound calls
    pub request_timeout: Duration,
}

/// Voice processing configuration
#[derive(Debug, Clone, Copy)]
pub struct VoiceConfig {
    /// Default playback language, used when detection cannot decide
    pub default_lang: VoiceLang,

    /// Slow down synthesized speech
    pub slow: bool,
}

impl Config {
    /// Load configuration (env > config file > default)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the Gemini API key is missing from both
    /// the environment and the config file
    pub fn load() -> Result<Self> {
        let fc = file::load_config_file();

        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .or(fc.llm.api_key)
            .map(SecretString::from)
            .ok_or_else(|| {
                Error::Config("GEMINI_API_KEY is not set; refusing to start".to_string())
            })?;

        let model = std::env::var("GEMINI_MODEL")
            .ok()
            .or(fc.llm.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let default_lang = std::env::var("HEARTLINE_VOICE_LANG")
            .ok()
            .or(fc.voice.default_lang)
            .map(|s| s.parse())
            .transpose()?
            .unwrap_or(VoiceLang::En);

        let slow = std::env::var("HEARTLINE_SLOW_SPEECH")
            .ok()
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .or(fc.voice.slow)
            .unwrap_or(false);

        let request_timeout = std::env::var("HEARTLINE_REQUEST_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .or(fc.runtime.request_timeout_secs)
            .map_or(
                Duration::from_secs(DEFAULT_TIMEOUT_SECS),
                Duration::from_secs,
            );

        // Determine data directory (~/.local/share/heartline on Linux)
        let data_dir = directories::BaseDirs::new()
            .map_or_else(|| PathBuf::from("."), |d| d.data_dir().join("heartline"));
        std::fs::create_dir_all(&data_dir).ok();

        Ok(Self {
            api_key,
            model,
            voice: VoiceConfig { default_lang, slow },
            data_dir,
            request_timeout,
        })
    }
}
