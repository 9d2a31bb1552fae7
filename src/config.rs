//! Application configuration: file policies, thresholds, stage narration,
//! remote-mode endpoints and server paths.
//!
//! Loaded from `config/app.toml` (path overridable via
//! `INSUREGUARD_CONFIG_PATH`). Every field has a compiled-in default, so a
//! missing or unreadable file yields a fully working mock-mode
//! configuration.

use std::path::Path;
use std::time::Duration;
use std::{env, fs};

use serde::{Deserialize, Serialize};

use crate::assessment::ThresholdPolicy;
use crate::category::Category;
use crate::validate::FilePolicy;

pub const DEFAULT_CONFIG_PATH: &str = "config/app.toml";
pub const ENV_CONFIG_PATH: &str = "INSUREGUARD_CONFIG_PATH";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub upload: UploadConfig,
    pub analysis: AnalysisConfig,
    pub remote: RemoteConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub voice: FilePolicy,
    pub image: FilePolicy,
    pub text: FilePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub thresholds: ThresholdPolicy,
    pub voice_stage: StageConfig,
    pub image_stage: StageConfig,
    pub text_stage: StageConfig,
}

/// Narration for one category's stage: evenly spaced progress messages over
/// a total duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub duration_ms: u64,
    pub messages: Vec<String>,
}

/// Which analyzer backs stage results, and where the remote one lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerMode {
    /// Local pseudo-random simulation; uploads are skipped.
    Mock,
    /// Delegate to the remote store + analysis endpoint, mock on failure.
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub mode: AnalyzerMode,
    pub base_url: String,
    pub upload_voice_path: String,
    pub upload_image_path: String,
    pub analyze_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub upload_dir: String,
    pub static_dir: String,
}

impl AppConfig {
    /// Read and parse a specific file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path.as_ref())?;
        let cfg: AppConfig = toml::from_str(&data)?;
        Ok(cfg)
    }

    /// Resolve the config path from the environment and load it; a missing
    /// file gives defaults, a malformed file is reported and gives defaults.
    pub fn load_or_default() -> Self {
        let path = env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        if !Path::new(&path).exists() {
            return Self::default();
        }
        match Self::load_from_file(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(error = %e, %path, "config file unreadable, using defaults");
                Self::default()
            }
        }
    }

    pub fn policy(&self, category: Category) -> &FilePolicy {
        match category {
            Category::Voice => &self.upload.voice,
            Category::Image => &self.upload.image,
            Category::Text => &self.upload.text,
        }
    }
}

impl AnalysisConfig {
    pub fn stage(&self, category: Category) -> &StageConfig {
        match category {
            Category::Voice => &self.voice_stage,
            Category::Image => &self.image_stage,
            Category::Text => &self.text_stage,
        }
    }
}

impl StageConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

impl RemoteConfig {
    pub fn upload_url(&self, category: Category) -> String {
        let path = match category {
            Category::Voice => &self.upload_voice_path,
            // Text never goes through the store; callers guard on is_binary.
            _ => &self.upload_image_path,
        };
        format!("{}{}", self.base_url, path)
    }

    pub fn analyze_url(&self) -> String {
        format!("{}{}", self.base_url, self.analyze_path)
    }
}

// ---- Compiled-in defaults (mirror config/app.toml) ----

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            voice: FilePolicy {
                max_size: 10 * 1024 * 1024,
                accepted_extensions: strs(&[".mp3", ".wav", ".ogg", ".m4a"]),
                accepted_content_types: strs(&[
                    "audio/mpeg",
                    "audio/wav",
                    "audio/ogg",
                    "audio/mp4",
                ]),
            },
            image: FilePolicy {
                max_size: 5 * 1024 * 1024,
                accepted_extensions: strs(&[".jpg", ".jpeg", ".png", ".webp"]),
                accepted_content_types: strs(&["image/jpeg", "image/png", "image/webp"]),
            },
            text: FilePolicy {
                max_size: 2 * 1024 * 1024,
                accepted_extensions: strs(&[".txt", ".pdf", ".doc", ".docx"]),
                accepted_content_types: strs(&[
                    "text/plain",
                    "application/pdf",
                    "application/msword",
                    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                ]),
            },
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            thresholds: ThresholdPolicy::default(),
            voice_stage: StageConfig {
                duration_ms: 3000,
                messages: strs(&[
                    "Initializing voice analysis...",
                    "Analyzing voice patterns...",
                    "Detecting acoustic signatures...",
                    "Checking for voice manipulation...",
                    "Finalizing voice assessment...",
                ]),
            },
            image_stage: StageConfig {
                duration_ms: 3500,
                messages: strs(&[
                    "Loading image data...",
                    "Analyzing image metadata...",
                    "Detecting image manipulation...",
                    "Verifying image authenticity...",
                    "Completing image analysis...",
                ]),
            },
            text_stage: StageConfig {
                duration_ms: 3000,
                messages: strs(&[
                    "Processing text document...",
                    "Analyzing writing patterns...",
                    "Checking consistency...",
                    "Detecting anomalies...",
                    "Finalizing text verification...",
                ]),
            },
        }
    }
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            duration_ms: 3000,
            messages: strs(&["Analyzing..."]),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            mode: AnalyzerMode::Mock,
            base_url: "http://127.0.0.1:8000".to_string(),
            upload_voice_path: "/upload/voice".to_string(),
            upload_image_path: "/upload/image".to_string(),
            analyze_path: "/analyze".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            upload_dir: "uploads".to_string(),
            static_dir: "static".to_string(),
        }
    }
}

fn strs(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
