pub mod interface;
pub mod client;
pub mod engine;
pub mod factory;

pub use interface::{Speaker, SpeechError, Synthesizer};
pub use client::TranslateTtsClient;
pub use engine::CommandSpeaker;
pub use factory::TTSFactory;
