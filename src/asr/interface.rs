//! ASR interface - recognition happens in a remote speech-to-text service

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecognitionError {
    /// Audio was captured but no words came out of it
    #[error("could not understand audio")]
    Unintelligible,
    #[error("speech recognition unavailable: {0}")]
    Unavailable(String),
    #[error("audio capture failed: {0}")]
    Capture(String),
}

#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Transcribe one WAV-encoded utterance
    async fn transcribe(&self, wav: Vec<u8>) -> Result<String, RecognitionError>;
}
