//! Heartline - voice-first gateway for a cardiovascular health assistant
//!
//! This library provides the core functionality for the Heartline gateway:
//! - Turn-taking conversation pipeline with language-aware voice playback
//! - Gemini-backed reply generation and audio transcription
//! - Speech synthesis with inline (base64) audio delivery
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │              Presentation boundary                   │
//! │        typed text  │  recorded audio  │  REPL       │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                 Turn Pipeline                        │
//! │  transcribe → generate → detect language → speak    │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │              External services                       │
//! │   Gemini generateContent  │  Translate TTS          │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod conversation;
pub mod error;
pub mod gemini;
pub mod lang;
pub mod pipeline;
pub mod prompt;
pub mod voice;

pub use config::{Config, VoiceConfig};
pub use conversation::{Conversation, Role, Turn};
pub use error::{Error, Result};
pub use gemini::GeminiClient;
pub use lang::{LanguageDetector, VoiceLang};
pub use pipeline::{
    DetectLanguage, GenerateReply, Synthesize, Transcribe, TurnInput, TurnOutcome, TurnPipeline,
};
pub use voice::{AudioClip, TextToSpeech};
