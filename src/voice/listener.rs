use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::asr::{CommandRecorder, RecognitionError, SpeechRecognizer};

/// Produces one recognized utterance per call
#[async_trait]
pub trait Listener: Send + Sync {
    async fn listen(&self) -> Result<String, RecognitionError>;
}

/// Records from the microphone and sends the audio for recognition
pub struct MicrophoneListener {
    recorder: CommandRecorder,
    recognizer: Arc<dyn SpeechRecognizer>,
}

impl MicrophoneListener {
    pub fn new(recorder: CommandRecorder, recognizer: Arc<dyn SpeechRecognizer>) -> Self {
        Self {
            recorder,
            recognizer,
        }
    }
}

#[async_trait]
impl Listener for MicrophoneListener {
    async fn listen(&self) -> Result<String, RecognitionError> {
        let wav = self.recorder.record().await?;
        info!("🔍 Recognizing...");
        let text = self.recognizer.transcribe(wav).await?;
        info!("🗣️ You said: {}", text);
        Ok(text)
    }
}
