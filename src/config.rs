use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Config file picked up from the working directory when nothing else is given.
pub const DEFAULT_CONFIG_FILE: &str = "plant-voice.yaml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Remote classifier endpoint shared by the service and the assistant.
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,
    #[serde(default = "default_image_path")]
    pub default_image_path: PathBuf,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub voice: VoiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Latest clip is also written here; `null` keeps audio in memory only.
    #[serde(default = "default_audio_file")]
    pub audio_file: Option<PathBuf>,
    #[serde(default = "default_audio_capacity")]
    pub audio_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SpeechConfig {
    #[serde(default = "default_tts_url")]
    pub tts_url: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_engine_program")]
    pub engine_program: String,
    #[serde(default = "default_engine_args")]
    pub engine_args: Vec<String>,
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct VoiceConfig {
    #[serde(default = "default_asr_url")]
    pub asr_url: String,
    #[serde(default = "default_recorder_program")]
    pub recorder_program: String,
    /// `{output}` is replaced with the temporary WAV path.
    #[serde(default = "default_recorder_args")]
    pub recorder_args: Vec<String>,
    #[serde(default = "default_cycle_pause_ms")]
    pub cycle_pause_ms: u64,
}

fn default_endpoint_url() -> String {
    "https://web-production-b516.up.railway.app/predict".to_string()
}

fn default_image_path() -> PathBuf {
    PathBuf::from("images/plant.jpg")
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_audio_file() -> Option<PathBuf> {
    Some(PathBuf::from("static/result.mp3"))
}

fn default_audio_capacity() -> usize {
    32
}

fn default_tts_url() -> String {
    "https://translate.google.com/translate_tts".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_engine_program() -> String {
    "espeak-ng".to_string()
}

fn default_engine_args() -> Vec<String> {
    vec!["-s".to_string(), "150".to_string()]
}

fn default_pause_ms() -> u64 {
    200
}

fn default_asr_url() -> String {
    "http://127.0.0.1:8080/inference".to_string()
}

fn default_recorder_program() -> String {
    "arecord".to_string()
}

fn default_recorder_args() -> Vec<String> {
    ["-q", "-f", "S16_LE", "-r", "16000", "-c", "1", "-d", "5", "{output}"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_cycle_pause_ms() -> u64 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint_url: default_endpoint_url(),
            default_image_path: default_image_path(),
            request_timeout_secs: None,
            server: ServerConfig::default(),
            speech: SpeechConfig::default(),
            voice: VoiceConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
            audio_file: default_audio_file(),
            audio_capacity: default_audio_capacity(),
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            tts_url: default_tts_url(),
            language: default_language(),
            engine_program: default_engine_program(),
            engine_args: default_engine_args(),
            pause_ms: default_pause_ms(),
        }
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            asr_url: default_asr_url(),
            recorder_program: default_recorder_program(),
            recorder_args: default_recorder_args(),
            cycle_pause_ms: default_cycle_pause_ms(),
        }
    }
}

impl Config {
    /// Load a YAML or JSON config file, substituting `${VAR}` placeholders.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Configuration file not found: {}", path.display());
        }

        let content = substitute_env(&load_text_file(path)?)?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        let config: Config = match ext.as_str() {
            "json" | "jsonld" => serde_json::from_str(&content)?,
            _ => serde_yaml::from_str(&content)?,
        };
        Ok(config)
    }

    /// Explicit path, then `CONFIG_PATH`, then `plant-voice.yaml`, then defaults.
    /// Environment overrides are applied on top of whatever was loaded.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        Self::resolve_with(explicit, Path::new(DEFAULT_CONFIG_FILE), |key| {
            std::env::var(key).ok()
        })
    }

    /// `resolve` with the fallback file and variable lookup supplied by the caller.
    pub fn resolve_with<F>(explicit: Option<&Path>, fallback: &Path, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_path = env("CONFIG_PATH").map(PathBuf::from);
        let mut config = match explicit.map(Path::to_path_buf).or(env_path) {
            Some(path) => {
                let config = Self::load(&path)?;
                debug!("Loaded configuration from {}", path.display());
                config
            }
            None if fallback.exists() => Self::load(fallback)?,
            None => Self::default(),
        };
        config.apply_overrides(env)?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// `PORT`, `PLANT_ENDPOINT_URL` and `DEFAULT_IMAGE_PATH` win over file values.
    pub fn apply_overrides<F>(&mut self, env: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = env("PORT") {
            self.server.port = port
                .trim()
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("Invalid PORT {:?}: {}", port, e))?;
        }
        if let Some(url) = env("PLANT_ENDPOINT_URL") {
            self.endpoint_url = url;
        }
        if let Some(path) = env("DEFAULT_IMAGE_PATH") {
            self.default_image_path = PathBuf::from(path);
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<std::time::Duration> {
        self.request_timeout_secs.map(std::time::Duration::from_secs)
    }
}

/// Replace `${VAR_NAME}` with the variable's value; unknown variables are left as-is.
fn substitute_env(content: &str) -> Result<String> {
    let pattern = Regex::new(r"\$\{(\w+)\}")?;
    let replaced = pattern.replace_all(content, |caps: &regex::Captures| {
        std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
    });
    Ok(replaced.into_owned())
}

/// Read text, stripping a UTF-8 BOM and falling back to GBK for non-UTF-8 files.
fn load_text_file(path: &Path) -> Result<String> {
    let mut bytes = fs::read(path)?;
    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        bytes.drain(0..3);
    }
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            let (cow, _, _) = encoding_rs::GBK.decode(e.as_bytes());
            Ok(cow.into_owned())
        }
    }
}
