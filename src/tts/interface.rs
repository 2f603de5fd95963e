use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("TTS request failed: {0}")]
    Request(String),
    #[error("TTS service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("TTS service returned no audio")]
    EmptyAudio,
    #[error("speech engine failed: {0}")]
    Engine(String),
}

/// Text to MP3 synthesis, used by the HTTP service
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesize `text` and return the encoded audio (audio/mpeg)
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError>;
}

/// Speak text through the local audio output, used by the voice assistant
#[async_trait]
pub trait Speaker: Send + Sync {
    /// Returns once playback has finished
    async fn speak(&self, text: &str) -> Result<(), SpeechError>;
}
