use async_trait::async_trait;
use axum::body::Bytes;
use reqwest::{multipart, Client};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use super::interface::{Classifier, ClassifierError, ImageUpload, Prediction};
use crate::narration::confidence_from_json;

const FALLBACK_FILE_NAME: &str = "image";

/// Client for the hosted plant classifier (multipart POST, field `file`)
#[derive(Debug, Clone)]
pub struct RemoteClassifier {
    client: Client,
    endpoint_url: String,
}

impl RemoteClassifier {
    pub fn new(endpoint_url: impl Into<String>, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint_url: endpoint_url.into(),
        })
    }

    /// An unparsable client content type is dropped rather than failing the upload.
    fn build_form(image: ImageUpload) -> multipart::Form {
        let file_name = image
            .file_name
            .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string());
        let bytes = Bytes::from(image.bytes);
        let length = bytes.len() as u64;
        let file_part = |bytes: Bytes| {
            multipart::Part::stream_with_length(bytes, length).file_name(file_name.clone())
        };

        let part = match image.content_type {
            Some(content_type) => file_part(bytes.clone())
                .mime_str(&content_type)
                .unwrap_or_else(|e| {
                    warn!("Ignoring image content type {:?}: {}", content_type, e);
                    file_part(bytes)
                }),
            None => file_part(bytes),
        };
        multipart::Form::new().part("file", part)
    }
}

/// Pull label and confidence out of the classifier's JSON body.
pub fn parse_prediction(body: &Value) -> Prediction {
    let label = body
        .get("predicted_class")
        .and_then(|v| v.as_str())
        .unwrap_or("Unknown")
        .to_string();
    let confidence = confidence_from_json(body.get("confidence"));
    Prediction { label, confidence }
}

#[async_trait]
impl Classifier for RemoteClassifier {
    async fn predict(&self, image: ImageUpload) -> Result<Prediction, ClassifierError> {
        debug!(
            "Forwarding {} bytes to classifier at {}",
            image.bytes.len(),
            self.endpoint_url
        );
        let form = Self::build_form(image);

        let response = self
            .client
            .post(&self.endpoint_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!("Classifier request failed: {}", e);
                ClassifierError::remote("Prediction API unreachable", e.to_string())
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClassifierError::remote("Prediction API failed", e.to_string()))?;

        if !status.is_success() {
            warn!("Classifier returned {}: {}", status, text);
            return Err(ClassifierError::remote("Prediction API failed", text));
        }

        let body: Value = serde_json::from_str(&text).map_err(|e| {
            ClassifierError::remote("Prediction API returned malformed JSON", e.to_string())
        })?;
        if !body.is_object() {
            return Err(ClassifierError::remote(
                "Prediction API returned malformed JSON",
                text,
            ));
        }

        Ok(parse_prediction(&body))
    }
}
