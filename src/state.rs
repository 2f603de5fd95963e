use std::sync::Arc;

use crate::audio_store::AudioStore;
use crate::classifier::{Classifier, RemoteClassifier};
use crate::config::Config;
use crate::tts::{Synthesizer, TTSFactory};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub classifier: Arc<dyn Classifier>,
    pub synthesizer: Arc<dyn Synthesizer>,
    pub audio: Arc<AudioStore>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let classifier = Arc::new(RemoteClassifier::new(
            &config.endpoint_url,
            config.request_timeout(),
        )?);
        let synthesizer = TTSFactory::create_synthesizer(&config)?;
        Ok(Self::with_backends(config, classifier, synthesizer))
    }

    /// Assemble state around already-built backends
    pub fn with_backends(
        config: Config,
        classifier: Arc<dyn Classifier>,
        synthesizer: Arc<dyn Synthesizer>,
    ) -> Self {
        let audio = Arc::new(AudioStore::new(
            config.server.audio_capacity,
            config.server.audio_file.clone(),
        ));
        Self {
            config,
            classifier,
            synthesizer,
            audio,
        }
    }
}
