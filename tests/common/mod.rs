//! Shared test fakes for the pipeline service seams
//!
//! No network, no audio hardware: each fake either returns a scripted value
//! or fails with a typed error.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use heartline::{
    AudioClip, DetectLanguage, Error, GenerateReply, Result, Synthesize, Transcribe, TurnPipeline,
    VoiceLang,
};

/// Replies with a fixed string and records every prompt it receives
pub struct ScriptedGenerator {
    reply: String,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl GenerateReply for ScriptedGenerator {
    async fn generate(&self, message: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(message.to_string());
        Ok(self.reply.clone())
    }
}

/// Always fails generation
pub struct FailingGenerator;

#[async_trait]
impl GenerateReply for FailingGenerator {
    async fn generate(&self, _message: &str) -> Result<String> {
        Err(Error::Generation("scripted generator outage".to_string()))
    }
}

/// Transcribes any audio to a fixed string
pub struct ScriptedTranscriber(pub String);

#[async_trait]
impl Transcribe for ScriptedTranscriber {
    async fn transcribe(&self, _audio: &[u8], _mime: &str) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Always fails transcription
pub struct FailingTranscriber;

#[async_trait]
impl Transcribe for FailingTranscriber {
    async fn transcribe(&self, _audio: &[u8], _mime: &str) -> Result<String> {
        Err(Error::Transcription("scripted transcriber outage".to_string()))
    }
}

/// Detector that returns a fixed code, or fails
pub enum ScriptedDetector {
    Code(&'static str),
    Fail,
}

impl DetectLanguage for ScriptedDetector {
    fn detect(&self, _text: &str) -> Result<String> {
        match self {
            Self::Code(code) => Ok((*code).to_string()),
            Self::Fail => Err(Error::Detection("scripted ambiguity".to_string())),
        }
    }
}

/// Produces a tiny fixed clip
pub struct ScriptedSynth;

#[async_trait]
impl Synthesize for ScriptedSynth {
    async fn synthesize(&self, _text: &str, _lang: VoiceLang) -> Result<AudioClip> {
        Ok(AudioClip::mp3(vec![0xff, 0xfb, 0x90, 0x00]))
    }
}

/// Always fails synthesis
pub struct FailingSynth;

#[async_trait]
impl Synthesize for FailingSynth {
    async fn synthesize(&self, _text: &str, _lang: VoiceLang) -> Result<AudioClip> {
        Err(Error::Tts("scripted synthesis outage".to_string()))
    }
}

/// Pipeline for typed-text tests (the transcriber is never reached)
pub fn text_pipeline(
    generator: Arc<dyn GenerateReply>,
    detector: Arc<dyn DetectLanguage>,
    synthesizer: Arc<dyn Synthesize>,
    voice: VoiceLang,
) -> TurnPipeline {
    TurnPipeline::new(
        Arc::new(FailingTranscriber),
        generator,
        detector,
        synthesizer,
        voice,
    )
}
