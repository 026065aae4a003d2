//! Turn-taking conversation pipeline
//!
//! Orchestrates one user-initiated step: transcription (for audio input),
//! reply generation, playback-language resolution, and speech synthesis,
//! appending exactly one user turn and one assistant turn to the session's
//! conversation per successful invocation.

use std::sync::Arc;

use async_trait::async_trait;

use crate::conversation::{Conversation, Turn};
use crate::lang::VoiceLang;
use crate::prompt::wrap_user_query;
use crate::voice::AudioClip;
use crate::{Error, Result};

/// Converts recorded audio to text in its original script
#[async_trait]
pub trait Transcribe: Send + Sync {
    async fn transcribe(&self, audio: &[u8], mime: &str) -> Result<String>;
}

/// Produces the assistant reply for a delimiter-wrapped user message
#[async_trait]
pub trait GenerateReply: Send + Sync {
    async fn generate(&self, message: &str) -> Result<String>;
}

/// Identifies the language of a text, as an ISO code
pub trait DetectLanguage: Send + Sync {
    /// # Errors
    ///
    /// Returns error when the text is too short or ambiguous to classify
    fn detect(&self, text: &str) -> Result<String>;
}

/// Renders text as speech audio in a given voice language
#[async_trait]
pub trait Synthesize: Send + Sync {
    async fn synthesize(&self, text: &str, lang: VoiceLang) -> Result<AudioClip>;
}

/// One user-initiated input: typed text or a recording
#[derive(Debug, Clone)]
pub enum TurnInput {
    Text(String),
    Audio { bytes: Vec<u8>, mime: String },
}

impl TurnInput {
    /// Combine possibly-coincident typed text and recorded audio into one
    /// input
    ///
    /// The UI yields one path per interaction, but if both arrive the
    /// recording wins: its transcription replaces any typed text from the
    /// same interaction.
    #[must_use]
    pub fn prioritized(typed: Option<String>, audio: Option<(Vec<u8>, String)>) -> Option<Self> {
        match (typed, audio) {
            (_, Some((bytes, mime))) => Some(Self::Audio { bytes, mime }),
            (Some(text), None) => Some(Self::Text(text)),
            (None, None) => None,
        }
    }
}

/// Result of one pipeline invocation
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// The assistant turn just appended to the conversation
    pub reply: Turn,
    /// Synthesized audio for that turn, when synthesis succeeded
    pub audio: Option<AudioClip>,
    /// Non-fatal, user-visible notice (currently only synthesis failure)
    pub notice: Option<String>,
}

/// Orchestrates turns for one session
///
/// Owns the session's conversation and voice setting; nothing here is
/// shared across sessions.
pub struct TurnPipeline {
    transcriber: Arc<dyn Transcribe>,
    generator: Arc<dyn GenerateReply>,
    detector: Arc<dyn DetectLanguage>,
    synthesizer: Arc<dyn Synthesize>,
    conversation: Conversation,
    voice_lang: VoiceLang,
}

impl TurnPipeline {
    #[must_use]
    pub fn new(
        transcriber: Arc<dyn Transcribe>,
        generator: Arc<dyn GenerateReply>,
        detector: Arc<dyn DetectLanguage>,
        synthesizer: Arc<dyn Synthesize>,
        voice_lang: VoiceLang,
    ) -> Self {
        Self {
            transcriber,
            generator,
            detector,
            synthesizer,
            conversation: Conversation::new(),
            voice_lang,
        }
    }

    /// The session's conversation so far
    #[must_use]
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Current default voice language
    #[must_use]
    pub const fn voice_lang(&self) -> VoiceLang {
        self.voice_lang
    }

    /// Change the default voice language
    ///
    /// Affects only future fallback decisions; past turns keep the language
    /// they were tagged with.
    pub fn set_voice_lang(&mut self, lang: VoiceLang) {
        tracing::info!(voice = %lang, "voice setting changed");
        self.voice_lang = lang;
    }

    /// Process one user input and produce one assistant turn
    ///
    /// On success the conversation grows by exactly one user turn and one
    /// assistant turn. A transcription failure aborts before any append; a
    /// generation failure leaves the user turn in place and appends no
    /// assistant turn. Synthesis failure never fails the turn.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Input`] for empty input, [`Error::Transcription`] or
    /// [`Error::Generation`] when the respective service fails.
    pub async fn take_turn(&mut self, input: TurnInput) -> Result<TurnOutcome> {
        let message = match input {
            TurnInput::Text(text) => text,
            TurnInput::Audio { bytes, mime } => {
                self.transcriber.transcribe(&bytes, &mime).await?
            }
        };

        if message.trim().is_empty() {
            return Err(Error::Input("empty user message".to_string()));
        }

        // Delimited form goes to the generator; the conversation keeps the
        // raw message.
        let delimited = wrap_user_query(&message);
        self.conversation.push(Turn::user(message));

        let reply = self.generator.generate(&delimited).await?;

        let lang = self.resolve_playback_lang(&reply);
        let turn = Turn::assistant(reply, lang);
        self.conversation.push(turn.clone());

        // Only the just-appended assistant turn is synthesized; earlier
        // turns stay text-only.
        let (audio, notice) = match self.synthesizer.synthesize(&turn.content, lang).await {
            Ok(clip) => (Some(clip), None),
            Err(e) => {
                tracing::warn!(error = %e, "speech synthesis failed, reply stays text-only");
                (None, Some(format!("voice unavailable: {e}")))
            }
        };

        Ok(TurnOutcome {
            reply: turn,
            audio,
            notice,
        })
    }

    /// Pick the playback language for a reply: the detected code when it is
    /// in the voice set, the session default otherwise
    fn resolve_playback_lang(&self, reply: &str) -> VoiceLang {
        match self.detector.detect(reply) {
            Ok(code) => code.parse().unwrap_or_else(|_| {
                tracing::debug!(
                    code = %code,
                    fallback = %self.voice_lang,
                    "detected language outside voice set"
                );
                self.voice_lang
            }),
            Err(e) => {
                tracing::debug!(error = %e, fallback = %self.voice_lang, "language detection failed");
                self.voice_lang
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoGenerator;

    #[async_trait]
    impl GenerateReply for EchoGenerator {
        async fn generate(&self, message: &str) -> Result<String> {
            Ok(message.to_string())
        }
    }

    struct NoTranscriber;

    #[async_trait]
    impl Transcribe for NoTranscriber {
        async fn transcribe(&self, _audio: &[u8], _mime: &str) -> Result<String> {
            Err(Error::Transcription("unexpected transcription".to_string()))
        }
    }

    struct FixedDetector(&'static str);

    impl DetectLanguage for FixedDetector {
        fn detect(&self, _text: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct SilentSynth;

    #[async_trait]
    impl Synthesize for SilentSynth {
        async fn synthesize(&self, _text: &str, _lang: VoiceLang) -> Result<AudioClip> {
            Ok(AudioClip::mp3(vec![0xff]))
        }
    }

    fn pipeline(detected: &'static str, voice: VoiceLang) -> TurnPipeline {
        TurnPipeline::new(
            Arc::new(NoTranscriber),
            Arc::new(EchoGenerator),
            Arc::new(FixedDetector(detected)),
            Arc::new(SilentSynth),
            voice,
        )
    }

    #[test]
    fn audio_wins_over_coincident_typed_text() {
        let input = TurnInput::prioritized(
            Some("typed".to_string()),
            Some((vec![1, 2], "audio/wav".to_string())),
        );
        assert!(matches!(input, Some(TurnInput::Audio { .. })));

        let input = TurnInput::prioritized(Some("typed".to_string()), None);
        assert!(matches!(input, Some(TurnInput::Text(t)) if t == "typed"));

        assert!(TurnInput::prioritized(None, None).is_none());
    }

    #[test]
    fn whitespace_only_input_is_rejected_without_state_change() {
        let mut p = pipeline("en", VoiceLang::En);
        let err = tokio_test::block_on(p.take_turn(TurnInput::Text("   \n".to_string())))
            .unwrap_err();
        assert!(matches!(err, Error::Input(_)));
        assert!(p.conversation().is_empty());
    }

    #[test]
    fn detected_out_of_set_code_falls_back_to_voice_setting() {
        let mut p = pipeline("fr", VoiceLang::Hi);
        let outcome =
            tokio_test::block_on(p.take_turn(TurnInput::Text("bonjour".to_string()))).unwrap();
        assert_eq!(outcome.reply.lang, Some(VoiceLang::Hi));
    }
}
