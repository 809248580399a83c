use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::language::Language;
use crate::app::infrastructure::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ThemeMode {
    Light,
    Dark,
    SystemDefault,
}

impl ThemeMode {
    /// Resolve to a concrete dark/light choice given what the desktop prefers.
    pub fn is_dark(self, system_prefers_dark: bool) -> bool {
        match self {
            ThemeMode::Light => false,
            ThemeMode::Dark => true,
            ThemeMode::SystemDefault => system_prefers_dark,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FontChoice {
    ScreenBold,
    Courier,
    HelveticaMono,
}

/// Syntax highlighting themes bundled with syntect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SyntaxTheme {
    #[default]
    Base16OceanDark,
    Base16OceanLight,
    Base16EightiesDark,
    Base16MochaDark,
    SolarizedDark,
    SolarizedLight,
    InspiredGitHub,
}

impl SyntaxTheme {
    /// Key into syntect's default `ThemeSet`.
    pub fn theme_key(&self) -> &'static str {
        match self {
            Self::Base16OceanDark => "base16-ocean.dark",
            Self::Base16OceanLight => "base16-ocean.light",
            Self::Base16EightiesDark => "base16-eighties.dark",
            Self::Base16MochaDark => "base16-mocha.dark",
            Self::SolarizedDark => "Solarized (dark)",
            Self::SolarizedLight => "Solarized (light)",
            Self::InspiredGitHub => "InspiredGitHub",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Base16OceanDark => "Base16 Ocean Dark",
            Self::Base16OceanLight => "Base16 Ocean Light",
            Self::Base16EightiesDark => "Base16 Eighties Dark",
            Self::Base16MochaDark => "Base16 Mocha Dark",
            Self::SolarizedDark => "Solarized Dark",
            Self::SolarizedLight => "Solarized Light",
            Self::InspiredGitHub => "Inspired GitHub",
        }
    }

    pub fn all() -> &'static [SyntaxTheme] {
        &[
            Self::Base16OceanDark,
            Self::Base16OceanLight,
            Self::Base16EightiesDark,
            Self::Base16MochaDark,
            Self::SolarizedDark,
            Self::SolarizedLight,
            Self::InspiredGitHub,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_theme_mode")]
    pub theme_mode: ThemeMode,

    #[serde(default = "default_font")]
    pub font: FontChoice,

    #[serde(default = "default_font_size")]
    pub font_size: u32,

    #[serde(default = "default_true")]
    pub line_numbers_enabled: bool,

    #[serde(default = "default_true")]
    pub word_wrap_enabled: bool,

    #[serde(default = "default_true")]
    pub highlighting_enabled: bool,

    #[serde(default = "default_syntax_theme_light")]
    pub syntax_theme_light: SyntaxTheme,

    #[serde(default = "default_syntax_theme_dark")]
    pub syntax_theme_dark: SyntaxTheme,

    /// Indent width used by the formatter.
    #[serde(default = "default_tab_size")]
    pub tab_size: u32,

    /// Delay between the last edit and the preview re-render. 0 renders on
    /// every keystroke.
    #[serde(default = "default_preview_debounce_ms")]
    pub preview_debounce_ms: u64,

    /// First port tried by the live browser preview server.
    #[serde(default = "default_live_preview_port")]
    pub live_preview_port: u16,

    #[serde(default = "default_true")]
    pub console_visible: bool,

    /// Tab selected at startup.
    #[serde(default)]
    pub initial_language: Language,
}

fn default_true() -> bool {
    true
}

fn default_theme_mode() -> ThemeMode {
    ThemeMode::SystemDefault
}

fn default_font() -> FontChoice {
    FontChoice::Courier
}

fn default_font_size() -> u32 {
    14
}

fn default_syntax_theme_light() -> SyntaxTheme {
    SyntaxTheme::InspiredGitHub
}

fn default_syntax_theme_dark() -> SyntaxTheme {
    SyntaxTheme::Base16OceanDark
}

fn default_tab_size() -> u32 {
    2
}

fn default_preview_debounce_ms() -> u64 {
    100
}

fn default_live_preview_port() -> u16 {
    7878
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme_mode: default_theme_mode(),
            font: default_font(),
            font_size: default_font_size(),
            line_numbers_enabled: true,
            word_wrap_enabled: true,
            highlighting_enabled: true,
            syntax_theme_light: default_syntax_theme_light(),
            syntax_theme_dark: default_syntax_theme_dark(),
            tab_size: default_tab_size(),
            preview_debounce_ms: default_preview_debounce_ms(),
            live_preview_port: default_live_preview_port(),
            console_visible: true,
            initial_language: Language::Markup,
        }
    }
}

impl AppSettings {
    pub fn current_syntax_theme(&self, is_dark: bool) -> SyntaxTheme {
        if is_dark {
            self.syntax_theme_dark
        } else {
            self.syntax_theme_light
        }
    }

    /// Load settings from the user config dir, writing defaults on first run.
    pub fn load() -> Self {
        let path = Self::get_config_path();
        if !path.exists() {
            let default = Self::default();
            if let Err(e) = default.save() {
                log::warn!("could not write default settings to {}: {}", path.display(), e);
            }
            return default;
        }
        Self::load_from(&path).unwrap_or_else(|e| {
            log::warn!("failed to read settings from {}: {}. Using defaults.", path.display(), e);
            Self::default()
        })
    }

    pub fn load_from(path: &Path) -> Result<Self, AppError> {
        let contents = fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&contents)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save(&self) -> Result<(), AppError> {
        self.save_to(&Self::get_config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::debug!("settings saved to {}", path.display());
        Ok(())
    }

    fn validate(&self) -> Result<(), AppError> {
        if !(6..=72).contains(&self.font_size) {
            return Err(AppError::Settings(format!(
                "font size {} out of range 6..=72",
                self.font_size
            )));
        }
        if self.tab_size == 0 || self.tab_size > 16 {
            return Err(AppError::Settings(format!(
                "tab size {} out of range 1..=16",
                self.tab_size
            )));
        }
        Ok(())
    }

    /// `<config_dir>/codebench/settings.json`
    pub fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("codebench");
        path.push("settings.json");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.font_size, 14);
        assert!(settings.line_numbers_enabled);
        assert!(settings.word_wrap_enabled);
        assert_eq!(settings.theme_mode, ThemeMode::SystemDefault);
        assert_eq!(settings.font, FontChoice::Courier);
        assert_eq!(settings.tab_size, 2);
        assert_eq!(settings.preview_debounce_ms, 100);
        assert_eq!(settings.initial_language, Language::Markup);
    }

    #[test]
    fn test_partial_config() {
        let json = r#"{"line_numbers_enabled": false, "initial_language": "css"}"#;
        let settings: AppSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.font_size, 14);
        assert!(!settings.line_numbers_enabled);
        assert_eq!(settings.initial_language, Language::Style);
        assert_eq!(settings.live_preview_port, 7878);
    }

    #[test]
    fn test_theme_mode_resolution() {
        assert!(!ThemeMode::Light.is_dark(true));
        assert!(ThemeMode::Dark.is_dark(false));
        assert!(ThemeMode::SystemDefault.is_dark(true));
        assert!(!ThemeMode::SystemDefault.is_dark(false));
    }

    #[test]
    fn test_current_syntax_theme() {
        let settings = AppSettings::default();
        assert_eq!(settings.current_syntax_theme(true), SyntaxTheme::Base16OceanDark);
        assert_eq!(settings.current_syntax_theme(false), SyntaxTheme::InspiredGitHub);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = AppSettings {
            theme_mode: ThemeMode::Dark,
            preview_debounce_ms: 0,
            console_visible: false,
            ..Default::default()
        };
        settings.save_to(&path).unwrap();
        let loaded = AppSettings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_rejects_out_of_range_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"font_size": 500}"#).unwrap();
        let err = AppSettings::load_from(&path).unwrap_err();
        assert!(matches!(err, AppError::Settings(_)));
    }

    #[test]
    fn test_load_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ nope").unwrap();
        assert!(matches!(AppSettings::load_from(&path), Err(AppError::Json(_))));
    }
}
