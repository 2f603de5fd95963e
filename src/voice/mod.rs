pub mod command;
pub mod listener;
pub mod assistant;

pub use command::VoiceCommand;
pub use listener::{Listener, MicrophoneListener};
pub use assistant::{load_image, ImageLoadError, VoiceAssistant};
