//! Gemini `generateContent` client
//!
//! One client serves both turn-pipeline calls to the model: reply
//! generation under the fixed system instruction, and audio transcription
//! via an inline audio part.

use std::time::Duration;

use base64::Engine;
use secrecy::{ExposeSecret, SecretString};

use crate::pipeline::{GenerateReply, Transcribe};
use crate::prompt::TRANSCRIBE_INSTRUCTION;
use crate::{Error, Result};

/// Gemini REST API base
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(serde::Serialize)]
struct GenerateRequest<'a> {
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    contents: Vec<Content<'a>>,
}

#[derive(serde::Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(serde::Serialize)]
struct Part<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl<'a> Part<'a> {
    const fn text(text: &'a str) -> Self {
        Self {
            text: Some(text),
            inline_data: None,
        }
    }

    fn audio(mime_type: &str, data: &[u8]) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.to_string(),
                data: base64::engine::general_purpose::STANDARD.encode(data),
            }),
        }
    }
}

#[derive(serde::Serialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(serde::Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(serde::Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(serde::Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(serde::Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Concatenated text of the first candidate, if the response carries any
fn reply_text(response: GenerateResponse) -> Option<String> {
    let parts = response
        .candidates?
        .into_iter()
        .next()?
        .content?
        .parts?;

    let text: String = parts.into_iter().filter_map(|p| p.text).collect();
    if text.is_empty() { None } else { Some(text) }
}

/// Client for the Gemini `generateContent` API
#[derive(Debug)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
    system_instruction: String,
}

impl GeminiClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns error if the API key is missing or the HTTP client cannot be
    /// built
    pub fn new(
        api_key: SecretString,
        model: String,
        system_instruction: String,
        timeout: Duration,
    ) -> Result<Self> {
        if api_key.expose_secret().is_empty() {
            return Err(Error::Config("Gemini API key required".to_string()));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            model,
            system_instruction,
        })
    }

    /// Generate a reply to a (delimiter-wrapped) user message
    ///
    /// # Errors
    ///
    /// Returns [`Error::Generation`] on API failure or an empty response
    pub async fn generate(&self, message: &str) -> Result<String> {
        tracing::debug!(model = %self.model, chars = message.len(), "requesting reply");

        let request = GenerateRequest {
            system_instruction: Some(Content {
                parts: vec![Part::text(&self.system_instruction)],
            }),
            contents: vec![Content {
                parts: vec![Part::text(message)],
            }],
        };

        let text = self.request_text(&request, Error::Generation).await?;
        tracing::info!(reply_chars = text.len(), "reply generated");
        Ok(text)
    }

    /// Transcribe recorded audio to text, preserving the original script
    ///
    /// # Arguments
    ///
    /// * `audio` - raw audio bytes
    /// * `mime` - declared MIME type of the recording (e.g. "audio/wav")
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transcription`] on API failure or an empty response
    pub async fn transcribe(&self, audio: &[u8], mime: &str) -> Result<String> {
        tracing::debug!(audio_bytes = audio.len(), mime, "starting transcription");

        let request = GenerateRequest {
            system_instruction: None,
            contents: vec![Content {
                parts: vec![Part::text(TRANSCRIBE_INSTRUCTION), Part::audio(mime, audio)],
            }],
        };

        let text = self.request_text(&request, Error::Transcription).await?;
        tracing::info!(transcript = %text, "transcription complete");
        Ok(text)
    }

    /// Issue one `generateContent` call and extract the reply text
    async fn request_text(
        &self,
        request: &GenerateRequest<'_>,
        wrap: fn(String) -> Error,
    ) -> Result<String> {
        let url = format!("{API_BASE}/models/{}:generateContent", self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Gemini request failed");
                e
            })?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(status = %status, "received response");

        if !status.is_success() {
            tracing::error!(status = %status, body = %body, "Gemini API error");
            return Err(wrap(format!("Gemini API error {status}: {body}")));
        }

        let parsed: GenerateResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, "failed to parse Gemini response");
            e
        })?;

        reply_text(parsed).ok_or_else(|| wrap("empty response from model".to_string()))
    }
}

#[async_trait::async_trait]
impl GenerateReply for GeminiClient {
    async fn generate(&self, message: &str) -> Result<String> {
        Self::generate(self, message).await
    }
}

#[async_trait::async_trait]
impl Transcribe for GeminiClient {
    async fn transcribe(&self, audio: &[u8], mime: &str) -> Result<String> {
        Self::transcribe(self, audio, mime).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_candidate_text() {
        let body = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "Eat well, "}, {"text": "walk daily."}]}}
            ]
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(reply_text(parsed).unwrap(), "Eat well, walk daily.");
    }

    #[test]
    fn empty_candidates_yield_none() {
        let parsed: GenerateResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(reply_text(parsed).is_none());

        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(reply_text(parsed).is_none());
    }

    #[test]
    fn audio_part_is_base64_encoded() {
        let part = Part::audio("audio/wav", &[1, 2, 3]);
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(json["inlineData"]["mimeType"], "audio/wav");
        assert_eq!(json["inlineData"]["data"], "AQID");
        assert!(json.get("text").is_none());
    }

    #[test]
    fn missing_key_is_a_config_error() {
        let err = GeminiClient::new(
            SecretString::from(String::new()),
            "gemini-3-flash-preview".to_string(),
            "be helpful".to_string(),
            Duration::from_secs(5),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
