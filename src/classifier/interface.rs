use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Image bytes as received from an upload or read from disk
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

impl ImageUpload {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            file_name: None,
            content_type: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Label and confidence returned by the remote classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    /// Fraction in [0, 1] as reported by the classifier
    pub confidence: f64,
}

impl Prediction {
    pub fn narration(&self) -> String {
        crate::narration::narrate(&self.label, self.confidence)
    }
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Non-success status, transport failure or an unreadable body
    #[error("{message}")]
    RemoteService { message: String, details: String },
}

impl ClassifierError {
    pub fn remote(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self::RemoteService {
            message: message.into(),
            details: details.into(),
        }
    }
}

/// Prediction forwarder - the actual model lives behind a remote endpoint
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Send one image for classification. A single attempt is made.
    async fn predict(&self, image: ImageUpload) -> Result<Prediction, ClassifierError>;
}
