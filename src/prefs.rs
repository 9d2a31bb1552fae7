//! Display preferences (theme + accent), persisted as a small JSON file.
//! A separate concern from the upload session: `UploadSession::reset` never
//! touches these.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// Fixed accent palette; anything outside it fails to parse and falls back
/// to the default preferences wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    #[default]
    Blue,
    Purple,
    Green,
    Orange,
    Red,
    Teal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UiPrefs {
    pub theme: Theme,
    pub accent: Accent,
}

impl UiPrefs {
    /// Missing or unreadable file yields defaults (dark / blue).
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(path) {
            Ok(s) => serde_json::from_str(&s).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Atomic write: temp file then rename, so a crash never leaves a
    /// half-written prefs file behind.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string());
        let mut f = fs::File::create(&tmp)?;
        f.write_all(json.as_bytes())?;
        fs::rename(tmp, path)?;
        Ok(())
    }

    pub fn toggle_theme(&mut self) {
        self.theme = match self.theme {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn unique_tmp_dir() -> PathBuf {
        let mut dir = std::env::temp_dir();
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        dir.push(format!("prefs_test_{}", nanos));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = unique_tmp_dir();
        let path = dir.join("prefs.json");

        let prefs = UiPrefs {
            theme: Theme::Light,
            accent: Accent::Teal,
        };
        prefs.save(&path).unwrap();
        assert_eq!(UiPrefs::load(&path), prefs);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let prefs = UiPrefs::load("/nonexistent/prefs.json");
        assert_eq!(prefs.theme, Theme::Dark);
        assert_eq!(prefs.accent, Accent::Blue);
    }

    #[test]
    fn unknown_accent_falls_back_to_defaults() {
        let dir = unique_tmp_dir();
        let path = dir.join("prefs.json");
        fs::write(&path, r#"{"theme":"light","accent":"magenta"}"#).unwrap();
        assert_eq!(UiPrefs::load(&path), UiPrefs::default());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn toggle_flips_theme_only() {
        let mut prefs = UiPrefs {
            theme: Theme::Dark,
            accent: Accent::Red,
        };
        prefs.toggle_theme();
        assert_eq!(prefs.theme, Theme::Light);
        assert_eq!(prefs.accent, Accent::Red);
    }
}
