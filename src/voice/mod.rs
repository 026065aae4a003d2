//! Voice output module
//!
//! Speech synthesis and inline audio delivery. Speech input arrives as
//! recorded bytes and is transcribed upstream (see `gemini.rs`).

mod playback;
mod tts;

pub use playback::{AudioClip, MP3_MIME};
pub use tts::TextToSpeech;
