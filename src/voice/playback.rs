//! Synthesized audio delivery
//!
//! Audio is delivered to the presentation boundary as an inline clip: bytes
//! plus a MIME type, with base64 embedding for renderers that autoplay an
//! HTML `<audio>` element. There is no sound-card path here.

use std::path::Path;

use base64::Engine;

use crate::Result;

/// MIME type of synthesized speech
pub const MP3_MIME: &str = "audio/mp3";

/// One synthesized audio clip, ready for inline embedding or saving
#[derive(Debug, Clone)]
pub struct AudioClip {
    bytes: Vec<u8>,
    mime: &'static str,
}

impl AudioClip {
    /// Wrap MP3 bytes as a clip
    #[must_use]
    pub fn mp3(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime: MP3_MIME,
        }
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub const fn mime(&self) -> &'static str {
        self.mime
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Base64 data URL for inline embedding
    #[must_use]
    pub fn data_url(&self) -> String {
        let b64 = base64::engine::general_purpose::STANDARD.encode(&self.bytes);
        format!("data:{};base64,{b64}", self.mime)
    }

    /// HTML snippet that autoplays the clip when injected into a page
    #[must_use]
    pub fn autoplay_html(&self) -> String {
        format!(
            "<audio autoplay=\"true\">\n<source src=\"{}\" type=\"{}\">\n</audio>",
            self.data_url(),
            self.mime
        )
    }

    /// Write the raw audio bytes to `path`
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, &self.bytes)?;
        tracing::debug!(path = %path.display(), bytes = self.bytes.len(), "audio clip saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_carries_mime_and_base64_payload() {
        let clip = AudioClip::mp3(vec![0xff, 0xfb, 0x90, 0x00]);
        let url = clip.data_url();
        assert!(url.starts_with("data:audio/mp3;base64,"));
        // 4 bytes -> 8 base64 chars with padding
        assert_eq!(url.len(), "data:audio/mp3;base64,".len() + 8);
    }

    #[test]
    fn autoplay_html_embeds_the_data_url() {
        let clip = AudioClip::mp3(vec![1, 2, 3]);
        let html = clip.autoplay_html();
        assert!(html.starts_with("<audio autoplay=\"true\">"));
        assert!(html.contains(&clip.data_url()));
        assert!(html.contains("type=\"audio/mp3\""));
    }

    #[test]
    fn clip_reports_size() {
        let clip = AudioClip::mp3(vec![0; 128]);
        assert_eq!(clip.len(), 128);
        assert!(!clip.is_empty());
        assert_eq!(clip.mime(), "audio/mp3");
    }
}
