pub mod interface;
pub mod client;
pub mod recorder;

pub use interface::{RecognitionError, SpeechRecognizer};
pub use client::RemoteRecognizer;
pub use recorder::CommandRecorder;
