use tokio::process::Command;
use tracing::debug;

use super::interface::RecognitionError;

pub const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Captures one utterance by running an external recorder (arecord, sox, ffmpeg)
/// that writes a WAV file to the `{output}` argument.
pub struct CommandRecorder {
    program: String,
    args: Vec<String>,
}

impl CommandRecorder {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub async fn record(&self) -> Result<Vec<u8>, RecognitionError> {
        let file = tempfile::Builder::new()
            .prefix("plant-voice-")
            .suffix(".wav")
            .tempfile()
            .map_err(|e| RecognitionError::Capture(e.to_string()))?;
        let output = file.path().to_string_lossy().into_owned();

        let args: Vec<String> = self
            .args
            .iter()
            .map(|arg| arg.replace(OUTPUT_PLACEHOLDER, &output))
            .collect();

        debug!("🎙️ Listening via {} {:?}", self.program, args);
        let status = Command::new(&self.program)
            .args(&args)
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| RecognitionError::Capture(format!("{}: {}", self.program, e)))?;
        if !status.success() {
            return Err(RecognitionError::Capture(format!(
                "{} exited with {}",
                self.program, status
            )));
        }

        let wav = tokio::fs::read(file.path())
            .await
            .map_err(|e| RecognitionError::Capture(e.to_string()))?;
        if wav.is_empty() {
            return Err(RecognitionError::Unintelligible);
        }
        Ok(wav)
    }
}
