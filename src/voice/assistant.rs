use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::command::VoiceCommand;
use super::listener::Listener;
use crate::asr::RecognitionError;
use crate::classifier::{Classifier, ImageUpload};
use crate::tts::Speaker;

pub const GREETING: &str = "Hello! I'm your plant prediction assistant. Say 'Predict the plant' to analyze the image, or 'exit' to quit.";
pub const USAGE: &str = "Say 'Predict the plant' to analyze the plant, or 'exit' to quit.";
pub const ANALYZING: &str = "Analyzing the plant image, please wait...";
pub const PREDICTION_FAILED: &str = "Sorry, I could not predict the plant. Please try again.";
pub const FAREWELL: &str = "Goodbye!";

#[derive(Debug, Error)]
pub enum ImageLoadError {
    #[error("image not found at {0}")]
    NotFound(PathBuf),
    #[error("cannot read image at {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("image at {0} is empty")]
    Empty(PathBuf),
}

/// Read the default image once at startup.
pub async fn load_image(path: &Path) -> Result<ImageUpload, ImageLoadError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ImageLoadError::NotFound(path.to_path_buf()),
        _ => ImageLoadError::Unreadable {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    if bytes.is_empty() {
        return Err(ImageLoadError::Empty(path.to_path_buf()));
    }

    let mut image = ImageUpload::new(bytes);
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        image = image.with_file_name(name);
    }
    if let Some(content_type) = content_type_for(path) {
        image = image.with_content_type(content_type);
    }
    Ok(image)
}

fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

/// Listen → recognize → act → speak, one utterance at a time
pub struct VoiceAssistant {
    listener: Arc<dyn Listener>,
    speaker: Arc<dyn Speaker>,
    classifier: Arc<dyn Classifier>,
    cycle_pause: Duration,
}

impl VoiceAssistant {
    pub fn new(
        listener: Arc<dyn Listener>,
        speaker: Arc<dyn Speaker>,
        classifier: Arc<dyn Classifier>,
        cycle_pause: Duration,
    ) -> Self {
        Self {
            listener,
            speaker,
            classifier,
            cycle_pause,
        }
    }

    /// Greet, load the default image and loop until an exit phrase.
    pub async fn start(&self, image_path: &Path) -> Result<(), ImageLoadError> {
        self.say(GREETING).await;

        let image = match load_image(image_path).await {
            Ok(image) => image,
            Err(e) => {
                error!("{}", e);
                self.say(&format!(
                    "Error: Cannot load image at {}. Please check the path.",
                    image_path.display()
                ))
                .await;
                return Err(e);
            }
        };
        info!(
            "Loaded default image {} ({} bytes)",
            image_path.display(),
            image.bytes.len()
        );

        self.run(&image).await;
        Ok(())
    }

    pub async fn run(&self, image: &ImageUpload) {
        loop {
            match self.listener.listen().await {
                Ok(text) => {
                    if self.handle(&text, image).await == VoiceCommand::Exit {
                        break;
                    }
                }
                Err(RecognitionError::Unintelligible) => {
                    debug!("❌ Could not understand audio.");
                }
                Err(e) => {
                    warn!("⚠️ {}", e);
                }
            }

            if !self.cycle_pause.is_zero() {
                tokio::time::sleep(self.cycle_pause).await;
            }
        }
    }

    /// React to one recognized utterance and report which command it was.
    pub async fn handle(&self, text: &str, image: &ImageUpload) -> VoiceCommand {
        let command = VoiceCommand::parse(text);
        match command {
            VoiceCommand::Exit => self.say(FAREWELL).await,
            VoiceCommand::PredictPlant => {
                self.say(ANALYZING).await;
                let message = match self.classifier.predict(image.clone()).await {
                    Ok(prediction) => prediction.narration(),
                    Err(e) => {
                        error!("Error connecting to the prediction service: {}", e);
                        PREDICTION_FAILED.to_string()
                    }
                };
                self.say(&message).await;
            }
            VoiceCommand::Unknown => self.say(USAGE).await,
        }
        command
    }

    async fn say(&self, text: &str) {
        if let Err(e) = self.speaker.speak(text).await {
            warn!("Could not speak {:?}: {}", text, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{ClassifierError, Prediction};
    use crate::tts::SpeechError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replays scripted utterances; `None` plays as unrecognized audio.
    struct ScriptedListener {
        script: Mutex<VecDeque<Option<&'static str>>>,
        calls: AtomicUsize,
    }

    impl ScriptedListener {
        fn new(script: &[Option<&'static str>]) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.iter().copied().collect()),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Listener for ScriptedListener {
        async fn listen(&self) -> Result<String, RecognitionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.script.lock().unwrap().pop_front() {
                Some(Some(text)) => Ok(text.to_string()),
                Some(None) => Err(RecognitionError::Unintelligible),
                None => panic!("listened after the script ended"),
            }
        }
    }

    #[derive(Default)]
    struct RecordingSpeaker {
        spoken: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Speaker for RecordingSpeaker {
        async fn speak(&self, text: &str) -> Result<(), SpeechError> {
            self.spoken.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    struct CountingClassifier {
        fail: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Classifier for CountingClassifier {
        async fn predict(&self, _image: ImageUpload) -> Result<Prediction, ClassifierError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ClassifierError::remote("Prediction API failed", "down"));
            }
            Ok(Prediction {
                label: "mango".to_string(),
                confidence: 0.8734,
            })
        }
    }

    struct Harness {
        listener: Arc<ScriptedListener>,
        speaker: Arc<RecordingSpeaker>,
        classifier: Arc<CountingClassifier>,
        assistant: VoiceAssistant,
    }

    fn harness(script: &[Option<&'static str>], classifier_fails: bool) -> Harness {
        let listener = ScriptedListener::new(script);
        let speaker = Arc::new(RecordingSpeaker::default());
        let classifier = Arc::new(CountingClassifier {
            fail: classifier_fails,
            calls: AtomicUsize::new(0),
        });
        let assistant = VoiceAssistant::new(
            listener.clone(),
            speaker.clone(),
            classifier.clone(),
            Duration::ZERO,
        );
        Harness {
            listener,
            speaker,
            classifier,
            assistant,
        }
    }

    fn leaf() -> ImageUpload {
        ImageUpload::new(vec![1, 2, 3])
    }

    fn spoken(h: &Harness) -> Vec<String> {
        h.speaker.spoken.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn predict_then_exit() {
        let h = harness(&[Some("Predict the plant"), Some("exit")], false);
        h.assistant.run(&leaf()).await;

        assert_eq!(h.classifier.calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.listener.calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            spoken(&h),
            vec![
                ANALYZING.to_string(),
                "The plant is mango with confidence of 87.34 percent.".to_string(),
                FAREWELL.to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn exit_stops_listening_immediately() {
        let h = harness(&[Some("EXIT")], false);
        h.assistant.run(&leaf()).await;

        assert_eq!(h.listener.calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.classifier.calls.load(Ordering::SeqCst), 0);
        assert_eq!(spoken(&h), vec![FAREWELL.to_string()]);
    }

    #[tokio::test]
    async fn one_prediction_per_utterance() {
        let h = harness(
            &[
                Some("predict the plant"),
                Some("please predict this plant"),
                Some("quit"),
            ],
            false,
        );
        h.assistant.run(&leaf()).await;
        assert_eq!(h.classifier.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unrecognized_audio_is_silent() {
        let h = harness(&[None, None, Some("stop")], false);
        h.assistant.run(&leaf()).await;

        assert_eq!(h.listener.calls.load(Ordering::SeqCst), 3);
        assert_eq!(spoken(&h), vec![FAREWELL.to_string()]);
    }

    #[tokio::test]
    async fn other_text_gets_usage_reminder() {
        let h = harness(&[Some("hello there"), Some("exit")], false);
        h.assistant.run(&leaf()).await;

        assert_eq!(spoken(&h), vec![USAGE.to_string(), FAREWELL.to_string()]);
        assert_eq!(h.classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_prediction_is_apologized_for() {
        let h = harness(&[Some("predict the plant"), Some("exit")], true);
        h.assistant.run(&leaf()).await;

        assert_eq!(
            spoken(&h),
            vec![
                ANALYZING.to_string(),
                PREDICTION_FAILED.to_string(),
                FAREWELL.to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn start_greets_and_loads_image() {
        let mut file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        file.write_all(&[0xFF, 0xD8, 0xFF]).unwrap();

        let h = harness(&[Some("exit")], false);
        h.assistant.start(file.path()).await.unwrap();

        assert_eq!(spoken(&h), vec![GREETING.to_string(), FAREWELL.to_string()]);
    }

    #[tokio::test]
    async fn start_with_missing_image_never_listens() {
        let h = harness(&[], false);
        let err = h
            .assistant
            .start(Path::new("/no/such/dir/mango816.jpg"))
            .await
            .unwrap_err();

        assert!(matches!(err, ImageLoadError::NotFound(_)));
        assert_eq!(h.listener.calls.load(Ordering::SeqCst), 0);
        let spoken = spoken(&h);
        assert_eq!(spoken.len(), 2);
        assert!(spoken[1].contains("/no/such/dir/mango816.jpg"));
    }

    #[tokio::test]
    async fn load_image_sets_name_and_type() {
        let mut file = tempfile::Builder::new().suffix(".PNG").tempfile().unwrap();
        file.write_all(b"\x89PNG").unwrap();

        let image = load_image(file.path()).await.unwrap();
        assert_eq!(image.content_type.as_deref(), Some("image/png"));
        assert!(image.file_name.unwrap().ends_with(".PNG"));
    }

    #[tokio::test]
    async fn empty_image_is_rejected() {
        let file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        let err = load_image(file.path()).await.unwrap_err();
        assert!(matches!(err, ImageLoadError::Empty(_)));
    }
}
