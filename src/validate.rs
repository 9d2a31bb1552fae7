//! Pure validation of a selected file against a per-category policy.
//!
//! Deliberate trust boundary: only the declared name/size/content type are
//! checked; file bytes are never sniffed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-category acceptance policy, loaded from static configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilePolicy {
    /// Maximum accepted size in bytes.
    pub max_size: u64,
    /// Accepted extensions including the leading dot, lowercase (".wav").
    pub accepted_extensions: Vec<String>,
    /// Accepted declared content types ("audio/wav").
    pub accepted_content_types: Vec<String>,
}

/// Descriptor of a user-selected file: what validation sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    pub name: String,
    pub size: u64,
    pub content_type: String,
}

impl FileMeta {
    pub fn new(name: impl Into<String>, size: u64, content_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            content_type: content_type.into(),
        }
    }

    /// Extension as the substring after the last `.`, lower-cased and
    /// dot-prefixed. A name without a dot yields the whole name dotted,
    /// which no policy accepts.
    pub fn extension(&self) -> String {
        let tail = self.name.rsplit('.').next().unwrap_or("");
        format!(".{}", tail.to_lowercase())
    }
}

/// Why a file was rejected. `Display` renders the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("File too large (max {})", format_file_size(*.max_size))]
    TooLarge { max_size: u64 },
    #[error("Invalid file type. Accepted: {}", .accepted.join(", "))]
    InvalidType { accepted: Vec<String> },
}

/// Accept or reject one file descriptor under one policy. Pure.
pub fn validate(file: &FileMeta, policy: &FilePolicy) -> Result<(), RejectReason> {
    if file.size > policy.max_size {
        return Err(RejectReason::TooLarge {
            max_size: policy.max_size,
        });
    }

    let extension = file.extension();
    let valid_extension = policy
        .accepted_extensions
        .iter()
        .any(|e| e.eq_ignore_ascii_case(&extension));
    let valid_content_type = policy
        .accepted_content_types
        .iter()
        .any(|c| c == &file.content_type);

    if !valid_extension || !valid_content_type {
        return Err(RejectReason::InvalidType {
            accepted: policy.accepted_extensions.clone(),
        });
    }

    Ok(())
}

/// 1024-based human-readable size, two decimals max ("5 MB", "1.5 KB").
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let exp = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exp as i32);
    let rounded = (value * 100.0).round() / 100.0;
    // Trim trailing zeros so whole numbers print as "5 MB", not "5.00 MB".
    let mut s = format!("{rounded:.2}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    format!("{} {}", s, UNITS[exp])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wav_policy() -> FilePolicy {
        FilePolicy {
            max_size: 10 * 1024 * 1024,
            accepted_extensions: vec![
                ".mp3".into(),
                ".wav".into(),
                ".ogg".into(),
                ".m4a".into(),
            ],
            accepted_content_types: vec![
                "audio/mpeg".into(),
                "audio/wav".into(),
                "audio/ogg".into(),
                "audio/mp4".into(),
            ],
        }
    }

    #[test]
    fn accepts_conformant_file() {
        let f = FileMeta::new("claim.wav", 2 * 1024 * 1024, "audio/wav");
        assert!(validate(&f, &wav_policy()).is_ok());
    }

    #[test]
    fn rejects_oversize_with_limit_in_message() {
        let f = FileMeta::new("claim.wav", 11 * 1024 * 1024, "audio/wav");
        let err = validate(&f, &wav_policy()).unwrap_err();
        assert!(matches!(err, RejectReason::TooLarge { .. }));
        assert_eq!(err.to_string(), "File too large (max 10 MB)");
    }

    #[test]
    fn rejects_bad_extension_even_with_good_content_type() {
        let f = FileMeta::new("claim.flac", 1024, "audio/wav");
        let err = validate(&f, &wav_policy()).unwrap_err();
        assert!(err.to_string().starts_with("Invalid file type. Accepted:"));
        assert!(err.to_string().contains(".wav"));
    }

    #[test]
    fn rejects_bad_content_type_even_with_good_extension() {
        let f = FileMeta::new("claim.wav", 1024, "application/octet-stream");
        let err = validate(&f, &wav_policy()).unwrap_err();
        assert!(matches!(err, RejectReason::InvalidType { .. }));
    }

    #[test]
    fn extension_is_case_insensitive_and_dot_prefixed() {
        assert_eq!(FileMeta::new("A.WAV", 0, "").extension(), ".wav");
        assert_eq!(FileMeta::new("a.b.ogg", 0, "").extension(), ".ogg");
        // No dot: the whole name becomes the "extension" and never matches.
        assert_eq!(FileMeta::new("noext", 0, "").extension(), ".noext");
        let f = FileMeta::new("noext", 1024, "audio/wav");
        assert!(validate(&f, &wav_policy()).is_err());
    }

    #[test]
    fn size_check_runs_before_type_check() {
        // Both constraints violated: the size reason wins.
        let f = FileMeta::new("huge.exe", u64::MAX, "application/x-msdownload");
        let err = validate(&f, &wav_policy()).unwrap_err();
        assert!(matches!(err, RejectReason::TooLarge { .. }));
    }

    #[test]
    fn human_sizes() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5 MB");
        assert_eq!(format_file_size(10 * 1024 * 1024), "10 MB");
    }
}
