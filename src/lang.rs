//! Playback language policy and language identification
//!
//! The voice allow-list {en, hi, mr} is policy data: replies detected as
//! anything else play in the session's configured default voice.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A language the synthesized voice can speak
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceLang {
    En,
    Hi,
    Mr,
}

impl VoiceLang {
    /// Every supported playback language
    pub const ALL: [Self; 3] = [Self::En, Self::Hi, Self::Mr];

    /// ISO 639-1 code used by the TTS endpoint
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Hi => "hi",
            Self::Mr => "mr",
        }
    }

    /// Human-readable name for settings display
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Hi => "Hindi",
            Self::Mr => "Marathi",
        }
    }
}

impl fmt::Display for VoiceLang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for VoiceLang {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Self::En),
            "hi" | "hindi" => Ok(Self::Hi),
            "mr" | "marathi" => Ok(Self::Mr),
            other => Err(Error::Input(format!(
                "unsupported voice language: {other} (expected en, hi, or mr)"
            ))),
        }
    }
}

/// Identifies the language of reply text
///
/// Backed by whatlang, which is deterministic across runs for the same
/// input. Identification on very short strings is best-effort and may
/// disagree with a human reading; callers fall back rather than trust it
/// blindly.
#[derive(Debug, Clone, Copy, Default)]
pub struct LanguageDetector;

impl LanguageDetector {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Detect the language of `text`, returning an ISO 639-1 code where one
    /// exists for the detected language and the ISO 639-3 code otherwise
    ///
    /// # Errors
    ///
    /// Returns [`Error::Detection`] when the text is empty or too ambiguous
    /// to classify.
    pub fn detect(&self, text: &str) -> Result<String> {
        let info = whatlang::detect(text)
            .ok_or_else(|| Error::Detection("text too short or ambiguous".to_string()))?;

        let code = match info.lang() {
            whatlang::Lang::Eng => "en",
            whatlang::Lang::Hin => "hi",
            whatlang::Lang::Mar => "mr",
            other => other.code(),
        };

        tracing::debug!(code, confidence = info.confidence(), "language identified");
        Ok(code.to_string())
    }
}

impl crate::pipeline::DetectLanguage for LanguageDetector {
    fn detect(&self, text: &str) -> Result<String> {
        Self::detect(self, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_and_labels() {
        assert_eq!("en".parse::<VoiceLang>().unwrap(), VoiceLang::En);
        assert_eq!("Hindi".parse::<VoiceLang>().unwrap(), VoiceLang::Hi);
        assert_eq!(" MR ".parse::<VoiceLang>().unwrap(), VoiceLang::Mr);
        assert!("fr".parse::<VoiceLang>().is_err());
    }

    #[test]
    fn code_round_trips_through_display() {
        for lang in VoiceLang::ALL {
            assert_eq!(lang.to_string().parse::<VoiceLang>().unwrap(), lang);
        }
    }

    #[test]
    fn detects_english_sentence() {
        let detector = LanguageDetector::new();
        let code = detector
            .detect("Hello, please take good care of your heart and eat well.")
            .unwrap();
        assert_eq!(code, "en");
    }

    #[test]
    fn out_of_set_language_returns_its_own_code() {
        let detector = LanguageDetector::new();
        let code = detector
            .detect("Пожалуйста, берегите своё сердце и больше гуляйте на свежем воздухе.")
            .unwrap();
        // Not in the voice set, so no 639-1 mapping is applied
        assert_eq!(code, "rus");
    }

    #[test]
    fn detection_is_deterministic() {
        let detector = LanguageDetector::new();
        let text = "Your blood pressure reading looks perfectly normal today.";
        let first = detector.detect(text).unwrap();
        for _ in 0..5 {
            assert_eq!(detector.detect(text).unwrap(), first);
        }
    }

    #[test]
    fn empty_text_is_a_detection_error() {
        let detector = LanguageDetector::new();
        assert!(matches!(detector.detect(""), Err(Error::Detection(_))));
    }
}
