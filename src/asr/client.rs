use async_trait::async_trait;
use reqwest::{multipart, Client};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::interface::{RecognitionError, SpeechRecognizer};

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: String,
}

/// Posts WAV audio as multipart field `file` to a whisper-style transcription endpoint
pub struct RemoteRecognizer {
    client: Client,
    url: String,
}

impl RemoteRecognizer {
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            url: url.into(),
        })
    }
}

#[async_trait]
impl SpeechRecognizer for RemoteRecognizer {
    async fn transcribe(&self, wav: Vec<u8>) -> Result<String, RecognitionError> {
        let part = multipart::Part::bytes(wav)
            .file_name("utterance.wav")
            .mime_str("audio/wav")
            .map_err(|e| RecognitionError::Unavailable(e.to_string()))?;
        let form = multipart::Form::new()
            .part("file", part)
            .text("response_format", "json");

        let response = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| RecognitionError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RecognitionError::Unavailable(format!("{}: {}", status, body)));
        }

        let result: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| RecognitionError::Unavailable(e.to_string()))?;

        let text = result.text.trim().to_string();
        if text.is_empty() {
            return Err(RecognitionError::Unintelligible);
        }
        debug!("Recognized: {}", text);
        Ok(text)
    }
}
