const EXIT_WORDS: [&str; 3] = ["exit", "stop", "quit"];

/// What a recognized utterance asks the assistant to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceCommand {
    Exit,
    PredictPlant,
    Unknown,
}

impl VoiceCommand {
    /// Exit words win over a prediction request in the same sentence.
    pub fn parse(text: &str) -> Self {
        let lower = text.to_lowercase();
        let is_exit = lower
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| EXIT_WORDS.contains(&word));

        if is_exit {
            VoiceCommand::Exit
        } else if lower.contains("predict") && lower.contains("plant") {
            VoiceCommand::PredictPlant
        } else {
            VoiceCommand::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_words() {
        assert_eq!(VoiceCommand::parse("exit"), VoiceCommand::Exit);
        assert_eq!(VoiceCommand::parse("Stop"), VoiceCommand::Exit);
        assert_eq!(VoiceCommand::parse("please quit now."), VoiceCommand::Exit);
        assert_eq!(VoiceCommand::parse("stop predicting the plant"), VoiceCommand::Exit);
    }

    #[test]
    fn exit_needs_a_whole_word() {
        assert_eq!(VoiceCommand::parse("nonstop"), VoiceCommand::Unknown);
        assert_eq!(VoiceCommand::parse("exiting"), VoiceCommand::Unknown);
    }

    #[test]
    fn predict_needs_both_words() {
        assert_eq!(VoiceCommand::parse("Predict the plant"), VoiceCommand::PredictPlant);
        assert_eq!(VoiceCommand::parse("can you predict my plants"), VoiceCommand::PredictPlant);
        assert_eq!(VoiceCommand::parse("predict"), VoiceCommand::Unknown);
        assert_eq!(VoiceCommand::parse("what plant is this"), VoiceCommand::Unknown);
    }
}
