//! Text-to-speech synthesis
//!
//! Uses the Google Translate TTS endpoint, which returns MP3 for a (text,
//! language) pair without authentication. The endpoint caps input length,
//! so longer replies are split into bounded chunks and the MP3 streams are
//! concatenated in order.

use std::time::Duration;

use crate::lang::VoiceLang;
use crate::voice::playback::AudioClip;
use crate::{Error, Result};

/// Synthesis endpoint
const TRANSLATE_TTS_URL: &str = "https://translate.google.com/translate_tts";

/// Maximum characters per synthesis request
const MAX_CHUNK_CHARS: usize = 100;

/// Synthesizes speech from text
pub struct TextToSpeech {
    client: reqwest::Client,
    slow: bool,
}

impl TextToSpeech {
    /// Create a new TTS instance
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new(slow: bool, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, slow })
    }

    /// Synthesize `text` in `lang`
    ///
    /// # Returns
    ///
    /// An MP3 [`AudioClip`]
    ///
    /// # Errors
    ///
    /// Returns [`Error::Tts`] on empty text or endpoint failure
    pub async fn synthesize(&self, text: &str, lang: VoiceLang) -> Result<AudioClip> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::Tts("nothing to synthesize".to_string()));
        }

        let chunks = split_text(text, MAX_CHUNK_CHARS);
        let total = chunks.len();
        tracing::debug!(lang = %lang, chunks = total, "starting synthesis");

        let speed = if self.slow { "0.3" } else { "1" };
        let mut bytes = Vec::new();

        let total_param = total.to_string();
        for (idx, chunk) in chunks.iter().enumerate() {
            let idx_param = idx.to_string();
            let textlen_param = chunk.chars().count().to_string();
            let response = self
                .client
                .get(TRANSLATE_TTS_URL)
                .query(&[
                    ("ie", "UTF-8"),
                    ("client", "tw-ob"),
                    ("tl", lang.code()),
                    ("ttsspeed", speed),
                    ("q", chunk.as_str()),
                    ("total", total_param.as_str()),
                    ("idx", idx_param.as_str()),
                    ("textlen", textlen_param.as_str()),
                ])
                .send()
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "TTS request failed");
                    e
                })?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                tracing::error!(status = %status, body = %body, "TTS endpoint error");
                return Err(Error::Tts(format!("TTS endpoint error {status}: {body}")));
            }

            bytes.extend_from_slice(&response.bytes().await?);
        }

        tracing::info!(lang = %lang, bytes = bytes.len(), "synthesis complete");
        Ok(AudioClip::mp3(bytes))
    }
}

#[async_trait::async_trait]
impl crate::pipeline::Synthesize for TextToSpeech {
    async fn synthesize(&self, text: &str, lang: VoiceLang) -> Result<AudioClip> {
        Self::synthesize(self, text, lang).await
    }
}

/// Split `text` into whitespace-respecting chunks of at most `max_chars`
/// characters each
///
/// Words longer than `max_chars` are hard-split so every chunk stays within
/// the endpoint limit.
fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();

        if word_chars > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_chars = 0;
            }
            let cs: Vec<char> = word.chars().collect();
            for piece in cs.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() {
            word_chars
        } else {
            current_chars + 1 + word_chars
        };

        if needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current.push_str(word);
            current_chars = word_chars;
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_chars = needed;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        let chunks = split_text("take care of your heart", 100);
        assert_eq!(chunks, vec!["take care of your heart"]);
    }

    #[test]
    fn chunks_respect_the_limit() {
        let text = "walk daily, eat leafy greens, sleep eight hours, and keep \
                    your blood pressure in check with regular readings";
        let chunks = split_text(text, 30);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 30, "chunk too long: {chunk}");
        }
    }

    #[test]
    fn no_words_are_lost() {
        let text = "monitor your pulse every morning before coffee";
        let chunks = split_text(text, 20);
        let rejoined = chunks.join(" ");
        assert_eq!(
            rejoined.split_whitespace().collect::<Vec<_>>(),
            text.split_whitespace().collect::<Vec<_>>()
        );
    }

    #[test]
    fn overlong_word_is_hard_split() {
        let word = "a".repeat(25);
        let chunks = split_text(&word, 10);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
        assert_eq!(chunks.concat(), word);
    }
}
