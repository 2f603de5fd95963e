use std::sync::Arc;
use std::time::Duration;
use anyhow::Result;
use tracing::info;

use crate::config::Config;
use super::client::TranslateTtsClient;
use super::engine::CommandSpeaker;
use super::interface::{Speaker, Synthesizer};

/// Builds the speech backends from configuration
pub struct TTSFactory;

impl TTSFactory {
    /// MP3 synthesizer used by the HTTP service
    pub fn create_synthesizer(config: &Config) -> Result<Arc<dyn Synthesizer>> {
        info!(
            "Initializing TTS endpoint {} (language {})",
            config.speech.tts_url, config.speech.language
        );
        let client = TranslateTtsClient::new(
            &config.speech.tts_url,
            &config.speech.language,
            config.request_timeout(),
        )?;
        Ok(Arc::new(client))
    }

    /// Local speech engine used by the voice assistant
    pub fn create_speaker(config: &Config) -> Arc<dyn Speaker> {
        info!("Initializing speech engine: {}", config.speech.engine_program);
        Arc::new(CommandSpeaker::new(
            &config.speech.engine_program,
            config.speech.engine_args.clone(),
            Duration::from_millis(config.speech.pause_ms),
        ))
    }
}
