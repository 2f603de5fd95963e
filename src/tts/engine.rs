use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

use super::interface::{SpeechError, Speaker};

/// Speaks through a local TTS program (espeak-ng, say, ...).
///
/// Every utterance spawns a fresh engine process with the text as the last
/// argument, so no engine state carries over between calls. The text follows
/// a `--` so a leading dash is never read as an option.
pub struct CommandSpeaker {
    program: String,
    args: Vec<String>,
    pause: Duration,
}

impl CommandSpeaker {
    pub fn new(program: impl Into<String>, args: Vec<String>, pause: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            pause,
        }
    }
}

#[async_trait]
impl Speaker for CommandSpeaker {
    async fn speak(&self, text: &str) -> Result<(), SpeechError> {
        info!("🤖 {}", text);

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg("--")
            .arg(text)
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| SpeechError::Engine(format!("{}: {}", self.program, e)))?;

        if !status.success() {
            return Err(SpeechError::Engine(format!(
                "{} exited with {}",
                self.program, status
            )));
        }

        debug!("Utterance finished");
        if !self.pause.is_zero() {
            tokio::time::sleep(self.pause).await;
        }
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn checking_speaker(script: &str) -> CommandSpeaker {
        CommandSpeaker::new(
            "sh",
            vec!["-c".to_string(), script.to_string()],
            Duration::ZERO,
        )
    }

    #[tokio::test]
    async fn text_is_passed_as_last_argument() {
        let speaker = checking_speaker(r#"test "$#" = 1 && test "$1" = "hello there""#);
        speaker.speak("hello there").await.unwrap();
    }

    #[tokio::test]
    async fn leading_dash_text_follows_option_terminator() {
        let speaker = checking_speaker(r#"test "$0" = "--" && test "$1" = "-5 degrees outside""#);
        speaker.speak("-5 degrees outside").await.unwrap();
    }

    #[tokio::test]
    async fn failing_engine_is_reported() {
        let speaker = CommandSpeaker::new("false", vec![], Duration::ZERO);
        let err = speaker.speak("anything").await.unwrap_err();
        assert!(matches!(err, SpeechError::Engine(_)));
    }

    #[tokio::test]
    async fn missing_engine_is_reported() {
        let speaker = CommandSpeaker::new("plant-voice-no-such-engine", vec![], Duration::ZERO);
        let err = speaker.speak("anything").await.unwrap_err();
        assert!(err.to_string().contains("plant-voice-no-such-engine"));
    }
}
