use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use plant_voice::asr::{CommandRecorder, RemoteRecognizer};
use plant_voice::classifier::RemoteClassifier;
use plant_voice::config::Config;
use plant_voice::tts::TTSFactory;
use plant_voice::voice::{MicrophoneListener, VoiceAssistant};

/// Voice loop: say "predict the plant" to classify the default image
#[derive(Debug, Parser)]
#[command(name = "plant-voice-assistant", version)]
struct Args {
    /// YAML or JSON config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Remote classifier endpoint
    #[arg(long)]
    endpoint_url: Option<String>,
    /// Image sent on every prediction request
    #[arg(long)]
    default_image_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    plant_voice::init_tracing();
    let args = Args::parse();

    let mut config = Config::resolve(args.config.as_deref())?;
    if let Some(url) = args.endpoint_url {
        config.endpoint_url = url;
    }
    if let Some(path) = args.default_image_path {
        config.default_image_path = path;
    }

    let classifier = Arc::new(RemoteClassifier::new(
        &config.endpoint_url,
        config.request_timeout(),
    )?);
    let recognizer = Arc::new(RemoteRecognizer::new(
        &config.voice.asr_url,
        config.request_timeout(),
    )?);
    let recorder = CommandRecorder::new(
        &config.voice.recorder_program,
        config.voice.recorder_args.clone(),
    );
    let listener = Arc::new(MicrophoneListener::new(recorder, recognizer));
    let speaker = TTSFactory::create_speaker(&config);

    let assistant = VoiceAssistant::new(
        listener,
        speaker,
        classifier,
        Duration::from_millis(config.voice.cycle_pause_ms),
    );

    tokio::select! {
        result = assistant.start(&config.default_image_path) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("🛑 Program stopped manually.");
        }
    }

    Ok(())
}
