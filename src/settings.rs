//! Application settings, persisted as a plain `key=value` file in the
//! platform config directory. Unknown keys and malformed lines are ignored
//! so old config files keep loading across versions.

use std::path::PathBuf;

/// UI theme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

pub struct AppSettings {
    /// Theme mode (Light or Dark)
    pub theme_mode: ThemeMode,
    /// Maximum number of undo snapshots kept in memory
    pub max_history_snapshots: usize,
    /// Memory cap for the undo history, in megabytes (0 = uncapped)
    pub history_memory_mb: u32,
    /// JPEG quality used when saving (1-100)
    pub jpeg_quality: u8,
    /// Ask before Reset throws away the edit history
    pub confirm_on_reset: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme_mode: ThemeMode::Light,
            max_history_snapshots: 50,
            history_memory_mb: 512,
            jpeg_quality: 90,
            confirm_on_reset: true,
        }
    }
}

impl AppSettings {
    /// Path to the settings file.
    /// On Linux:   ~/.config/edinity/edinity_settings.cfg  (XDG_CONFIG_HOME respected)
    /// On Windows: %APPDATA%\EdiNity\edinity_settings.cfg
    /// On macOS:   ~/Library/Application Support/EdiNity/edinity_settings.cfg
    /// Fallback:   same directory as the executable.
    pub(crate) fn settings_path() -> Option<PathBuf> {
        #[cfg(target_os = "linux")]
        {
            let config_dir = std::env::var("XDG_CONFIG_HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    let home = std::env::var("HOME").unwrap_or_else(|_| "~".to_string());
                    PathBuf::from(home).join(".config")
                })
                .join("edinity");
            let _ = std::fs::create_dir_all(&config_dir);
            return Some(config_dir.join("edinity_settings.cfg"));
        }
        #[cfg(target_os = "windows")]
        {
            let appdata = std::env::var("APPDATA")
                .or_else(|_| std::env::var("USERPROFILE"))
                .unwrap_or_else(|_| {
                    std::env::current_exe()
                        .ok()
                        .and_then(|p| p.parent().map(|d| d.to_string_lossy().into_owned()))
                        .unwrap_or_default()
                });
            let config_dir = PathBuf::from(appdata).join("EdiNity");
            let _ = std::fs::create_dir_all(&config_dir);
            return Some(config_dir.join("edinity_settings.cfg"));
        }
        #[cfg(target_os = "macos")]
        {
            let home = std::env::var("HOME").unwrap_or_else(|_| "~".to_string());
            let config_dir = PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("EdiNity");
            let _ = std::fs::create_dir_all(&config_dir);
            return Some(config_dir.join("edinity_settings.cfg"));
        }
        #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
        {
            std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|d| d.join("edinity_settings.cfg")))
        }
    }

    fn serialize(&self) -> String {
        let mode_str = match self.theme_mode {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        };
        format!(
            "theme_mode={mode_str}\n\
             max_history_snapshots={}\n\
             history_memory_mb={}\n\
             jpeg_quality={}\n\
             confirm_on_reset={}\n",
            self.max_history_snapshots,
            self.history_memory_mb,
            self.jpeg_quality,
            self.confirm_on_reset,
        )
    }

    fn parse(content: &str) -> Self {
        let mut s = Self::default();
        for line in content.lines() {
            let Some((key, val)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let val = val.trim();
            match key {
                "theme_mode" => {
                    s.theme_mode = match val {
                        "dark" => ThemeMode::Dark,
                        _ => ThemeMode::Light,
                    };
                }
                "max_history_snapshots" => {
                    s.max_history_snapshots = val.parse().unwrap_or(50);
                }
                "history_memory_mb" => {
                    s.history_memory_mb = val.parse().unwrap_or(512);
                }
                "jpeg_quality" => {
                    s.jpeg_quality = val.parse::<u8>().unwrap_or(90).clamp(1, 100);
                }
                "confirm_on_reset" => {
                    s.confirm_on_reset = val == "true";
                }
                _ => {}
            }
        }
        s
    }

    /// Save settings to disk.
    pub fn save(&self) {
        let Some(path) = Self::settings_path() else {
            return;
        };
        let _ = std::fs::write(path, self.serialize());
    }

    /// Load settings from disk (returns defaults if file missing or corrupt).
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::default();
        };
        let Ok(content) = std::fs::read_to_string(&path) else {
            return Self::default();
        };
        Self::parse(&content)
    }

    /// Undo history memory cap in bytes. `None` when uncapped.
    pub fn history_memory_bytes(&self) -> Option<usize> {
        if self.history_memory_mb == 0 {
            None
        } else {
            Some(self.history_memory_mb as usize * 1024 * 1024)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_preserves_every_field() {
        let s = AppSettings {
            theme_mode: ThemeMode::Dark,
            max_history_snapshots: 12,
            history_memory_mb: 64,
            jpeg_quality: 75,
            confirm_on_reset: false,
        };
        let parsed = AppSettings::parse(&s.serialize());
        assert_eq!(parsed.theme_mode, ThemeMode::Dark);
        assert_eq!(parsed.max_history_snapshots, 12);
        assert_eq!(parsed.history_memory_mb, 64);
        assert_eq!(parsed.jpeg_quality, 75);
        assert!(!parsed.confirm_on_reset);
    }

    #[test]
    fn unknown_keys_and_garbage_are_ignored() {
        let parsed = AppSettings::parse("nonsense\nfuture_key=42\ntheme_mode=dark\n");
        assert_eq!(parsed.theme_mode, ThemeMode::Dark);
        assert_eq!(parsed.max_history_snapshots, 50);
    }

    #[test]
    fn jpeg_quality_is_clamped() {
        let parsed = AppSettings::parse("jpeg_quality=0\n");
        assert_eq!(parsed.jpeg_quality, 1);
    }

    #[test]
    fn zero_memory_cap_means_uncapped() {
        let mut s = AppSettings::default();
        s.history_memory_mb = 0;
        assert_eq!(s.history_memory_bytes(), None);
        s.history_memory_mb = 2;
        assert_eq!(s.history_memory_bytes(), Some(2 * 1024 * 1024));
    }
}
