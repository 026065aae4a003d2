//! TOML configuration file loading
//!
//! Supports `~/.config/heartline/config.toml` as a persistent config
//! source. All fields are optional, the file is a partial overlay on top of
//! defaults.

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct HeartlineConfigFile {
    /// Model configuration
    #[serde(default)]
    pub llm: LlmFileConfig,

    /// Voice/audio configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,

    /// Runtime configuration
    #[serde(default)]
    pub runtime: RuntimeFileConfig,
}

/// Model-related configuration
#[derive(Debug, Default, Deserialize)]
pub struct LlmFileConfig {
    /// Model identifier (e.g. "gemini-3-flash-preview")
    pub model: Option<String>,

    /// Gemini API key (env var takes precedence)
    pub api_key: Option<String>,
}

/// Voice processing configuration
#[derive(Debug, Default, Deserialize)]
pub struct VoiceFileConfig {
    /// Default playback language code ("en", "hi", "mr")
    pub default_lang: Option<String>,

    /// Slow down synthesized speech
    pub slow: Option<bool>,
}

/// Runtime configuration
#[derive(Debug, Default, Deserialize)]
pub struct RuntimeFileConfig {
    /// Per-request timeout for outbound calls, in seconds
    pub request_timeout_secs: Option<u64>,
}

/// Load the TOML config file from the standard path
///
/// Returns `HeartlineConfigFile::default()` if the file doesn't exist or
/// can't be parsed.
pub fn load_config_file() -> HeartlineConfigFile {
    let Some(path) = config_file_path() else {
        return HeartlineConfigFile::default();
    };

    if !path.exists() {
        return HeartlineConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                HeartlineConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            HeartlineConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/heartline/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("heartline").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_only_named_fields() {
        let parsed: HeartlineConfigFile = toml::from_str(
            r#"
            [voice]
            default_lang = "hi"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.voice.default_lang.as_deref(), Some("hi"));
        assert!(parsed.voice.slow.is_none());
        assert!(parsed.llm.model.is_none());
    }

    #[test]
    fn empty_file_parses_to_defaults() {
        let parsed: HeartlineConfigFile = toml::from_str("").unwrap();
        assert!(parsed.llm.api_key.is_none());
        assert!(parsed.runtime.request_timeout_secs.is_none());
    }
}
