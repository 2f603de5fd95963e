pub mod asr;
pub mod audio_store;
pub mod classifier;
pub mod config;
pub mod error;
pub mod narration;
pub mod routes;
pub mod state;
pub mod tts;
pub mod voice;

use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber; `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("plant_voice=debug,tower_http=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
