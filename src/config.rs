use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::calendar::CalendarSystem;
use crate::timeline::ViewMode;
use crate::utils;

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

const DATABASE_FILE: &str = "taqvim.db";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Empty means the profile's data directory
    #[serde(default)]
    pub database_path: String,
    #[serde(default)]
    pub default_calendar: CalendarSystem,
    #[serde(default)]
    pub timeline_view_mode: ViewMode,
    /// tracing filter directive, overridden by `TAQVIM_LOG`
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub key_bindings: KeyBindings,
    #[serde(default = "default_current_theme")]
    pub current_theme: String,
    #[serde(default)]
    pub themes: HashMap<String, Theme>,
    #[serde(default = "default_config_version")]
    pub config_version: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyBindings {
    #[serde(default = "default_quit")]
    pub quit: String,
    #[serde(default = "default_help")]
    pub help: String,
    #[serde(default = "default_tab_next")]
    pub tab_next: String,
    #[serde(default = "default_tab_prev")]
    pub tab_prev: String,
    #[serde(default = "default_tab_1")]
    pub tab_1: String,
    #[serde(default = "default_tab_2")]
    pub tab_2: String,
    #[serde(default = "default_tab_3")]
    pub tab_3: String,
    #[serde(default = "default_prev_month")]
    pub prev_month: String,
    #[serde(default = "default_next_month")]
    pub next_month: String,
    #[serde(default = "default_day_prev")]
    pub day_prev: String,
    #[serde(default = "default_day_next")]
    pub day_next: String,
    #[serde(default = "default_week_prev")]
    pub week_prev: String,
    #[serde(default = "default_week_next")]
    pub week_next: String,
    #[serde(default = "default_list_up")]
    pub list_up: String,
    #[serde(default = "default_list_down")]
    pub list_down: String,
    #[serde(default = "default_new")]
    pub new: String,
    #[serde(default = "default_edit")]
    pub edit: String,
    #[serde(default = "default_delete")]
    pub delete: String,
    #[serde(default = "default_save")]
    pub save: String,
    #[serde(default = "default_search")]
    pub search: String,
    #[serde(default = "default_toggle_calendar")]
    pub toggle_calendar: String,
    #[serde(default = "default_go_today")]
    pub go_today: String,
    #[serde(default = "default_cycle_view")]
    pub cycle_view: String,
    #[serde(default = "default_filter_completed")]
    pub filter_completed: String,
    #[serde(default = "default_filter_ongoing")]
    pub filter_ongoing: String,
    #[serde(default = "default_filter_planned")]
    pub filter_planned: String,
    #[serde(default = "default_mark_drag")]
    pub mark_drag: String,
    #[serde(default = "default_toggle_section")]
    pub toggle_section: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_fg")]
    pub fg: String,
    #[serde(default = "default_bg")]
    pub bg: String,
    #[serde(default = "default_highlight_bg")]
    pub highlight_bg: String,
    /// Empty means a contrast color derived from `highlight_bg`
    #[serde(default = "default_highlight_fg")]
    pub highlight_fg: String,
    #[serde(default = "default_tab_bg")]
    pub tab_bg: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: String::new(),
            default_calendar: CalendarSystem::default(),
            timeline_view_mode: ViewMode::default(),
            log_level: default_log_level(),
            key_bindings: KeyBindings::default(),
            current_theme: default_current_theme(),
            themes: HashMap::new(),
            config_version: Some(CURRENT_CONFIG_VERSION),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: default_quit(),
            help: default_help(),
            tab_next: default_tab_next(),
            tab_prev: default_tab_prev(),
            tab_1: default_tab_1(),
            tab_2: default_tab_2(),
            tab_3: default_tab_3(),
            prev_month: default_prev_month(),
            next_month: default_next_month(),
            day_prev: default_day_prev(),
            day_next: default_day_next(),
            week_prev: default_week_prev(),
            week_next: default_week_next(),
            list_up: default_list_up(),
            list_down: default_list_down(),
            new: default_new(),
            edit: default_edit(),
            delete: default_delete(),
            save: default_save(),
            search: default_search(),
            toggle_calendar: default_toggle_calendar(),
            go_today: default_go_today(),
            cycle_view: default_cycle_view(),
            filter_completed: default_filter_completed(),
            filter_ongoing: default_filter_ongoing(),
            filter_planned: default_filter_planned(),
            mark_drag: default_mark_drag(),
            toggle_section: default_toggle_section(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: default_fg(),
            bg: default_bg(),
            highlight_bg: default_highlight_bg(),
            highlight_fg: default_highlight_fg(),
            tab_bg: default_tab_bg(),
        }
    }
}

impl Theme {
    fn preset(fg: &str, bg: &str, highlight_bg: &str, highlight_fg: &str) -> Self {
        Self {
            fg: fg.to_string(),
            bg: bg.to_string(),
            highlight_bg: highlight_bg.to_string(),
            highlight_fg: highlight_fg.to_string(),
            tab_bg: default_tab_bg(),
        }
    }

    /// Themes that are always available
    pub fn get_preset_themes() -> HashMap<String, Theme> {
        HashMap::from([
            ("default".to_string(), Theme::default()),
            ("dark".to_string(), Theme::preset("white", "black", "cyan", "black")),
            ("light".to_string(), Theme::preset("black", "white", "blue", "white")),
            // Turquoise and gold, after the dashboard's web palette
            ("firuzeh".to_string(), Theme::preset("#e0f2f1", "black", "#00C49F", "")),
            ("monochrome".to_string(), Theme::preset("white", "black", "white", "black")),
        ])
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_current_theme() -> String {
    "default".to_string()
}

fn default_config_version() -> Option<u32> {
    Some(CURRENT_CONFIG_VERSION)
}

fn default_quit() -> String {
    "q".to_string()
}

fn default_help() -> String {
    "F1".to_string()
}

fn default_tab_next() -> String {
    "Tab".to_string()
}

fn default_tab_prev() -> String {
    "BackTab".to_string()
}

fn default_tab_1() -> String {
    "1".to_string()
}

fn default_tab_2() -> String {
    "2".to_string()
}

fn default_tab_3() -> String {
    "3".to_string()
}

fn default_prev_month() -> String {
    "PageUp".to_string()
}

fn default_next_month() -> String {
    "PageDown".to_string()
}

fn default_day_prev() -> String {
    "Left".to_string()
}

fn default_day_next() -> String {
    "Right".to_string()
}

fn default_week_prev() -> String {
    "Up".to_string()
}

fn default_week_next() -> String {
    "Down".to_string()
}

fn default_list_up() -> String {
    "k".to_string()
}

fn default_list_down() -> String {
    "j".to_string()
}

fn default_new() -> String {
    "n".to_string()
}

fn default_edit() -> String {
    "e".to_string()
}

fn default_delete() -> String {
    "d".to_string()
}

fn default_save() -> String {
    "Ctrl+s".to_string()
}

fn default_search() -> String {
    "/".to_string()
}

fn default_toggle_calendar() -> String {
    "c".to_string()
}

fn default_go_today() -> String {
    "t".to_string()
}

fn default_cycle_view() -> String {
    "v".to_string()
}

fn default_filter_completed() -> String {
    "F5".to_string()
}

fn default_filter_ongoing() -> String {
    "F6".to_string()
}

fn default_filter_planned() -> String {
    "F7".to_string()
}

fn default_mark_drag() -> String {
    "m".to_string()
}

fn default_toggle_section() -> String {
    "Space".to_string()
}

fn default_fg() -> String {
    "white".to_string()
}

fn default_bg() -> String {
    "black".to_string()
}

fn default_highlight_bg() -> String {
    "blue".to_string()
}

fn default_highlight_fg() -> String {
    "white".to_string()
}

fn default_tab_bg() -> String {
    "gray".to_string()
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config directory: {0}")]
    ConfigDirError(String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
    #[error("Theme not found: {0}")]
    ThemeNotFound(String),
}

impl Config {
    /// Load the profile's config file, creating it with defaults when missing
    pub fn load_with_profile(profile: utils::Profile) -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path(profile)?;
        Self::load_from_path(&config_path, profile)
    }

    /// Load a config file at an explicit location, creating it when missing.
    /// A blank `database_path` resolves to the profile's data directory.
    pub fn load_from_path(path: &Path, profile: utils::Profile) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let contents =
                fs::read_to_string(path).map_err(|e| ConfigError::ReadError(e.to_string()))?;
            toml::from_str::<Config>(&contents)?
        } else {
            let mut config = Config::default();
            config.save_to_path(path)?;
            info!(path = %path.display(), "created default config");
            config
        };

        if config.database_path.trim().is_empty() {
            config.database_path = Self::default_database_path_for_profile(profile);
        }
        if config.config_version != Some(CURRENT_CONFIG_VERSION) {
            warn!(version = ?config.config_version, "config version differs from current");
        }
        Ok(config)
    }

    pub fn save_to_path(&mut self, path: &Path) -> Result<(), ConfigError> {
        self.config_version = Some(CURRENT_CONFIG_VERSION);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError(e.to_string()))?;
            }
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::WriteError(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string).map_err(|e| ConfigError::WriteError(e.to_string()))?;
        Ok(())
    }

    pub fn get_config_path(profile: utils::Profile) -> Result<PathBuf, ConfigError> {
        let config_dir = utils::get_config_dir(profile).ok_or_else(|| {
            ConfigError::ConfigDirError("Could not determine config directory".to_string())
        })?;
        Ok(config_dir.join("config.toml"))
    }

    fn default_database_path_for_profile(profile: utils::Profile) -> String {
        match utils::get_data_dir(profile) {
            Some(data_dir) => data_dir.join(DATABASE_FILE).to_string_lossy().to_string(),
            None => format!("~/.local/share/{}/{}", profile.app_name(), DATABASE_FILE),
        }
    }

    /// Database path with `~` expanded
    pub fn get_database_path(&self) -> PathBuf {
        utils::expand_path(&self.database_path)
    }

    /// The selected theme: user-defined first, then presets, then the default.
    /// An empty `highlight_fg` is replaced by a contrast color for `highlight_bg`.
    pub fn get_active_theme(&self) -> Theme {
        use crate::tui::widgets::color::{format_color_for_display, get_contrast_text_color, parse_color};

        let mut theme = self
            .themes
            .get(&self.current_theme)
            .cloned()
            .or_else(|| Theme::get_preset_themes().remove(&self.current_theme))
            .unwrap_or_default();

        if theme.highlight_fg.is_empty() {
            let calculated = get_contrast_text_color(parse_color(&theme.highlight_bg));
            theme.highlight_fg = format_color_for_display(&calculated);
        }
        theme
    }

    pub fn set_theme(&mut self, name: &str) -> Result<(), ConfigError> {
        if !self.themes.contains_key(name) && !Theme::get_preset_themes().contains_key(name) {
            return Err(ConfigError::ThemeNotFound(name.to_string()));
        }
        self.current_theme = name.to_string();
        Ok(())
    }

    /// Preset and user-defined theme names, sorted
    pub fn get_available_themes(&self) -> Vec<String> {
        let mut themes: Vec<String> = Theme::get_preset_themes().into_keys().collect();
        for name in self.themes.keys() {
            if !themes.contains(name) {
                themes.push(name.clone());
            }
        }
        themes.sort();
        themes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.default_calendar, CalendarSystem::Persian);
        assert_eq!(config.timeline_view_mode, ViewMode::Monthly);
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.key_bindings.save, "Ctrl+s");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            default_calendar = "gregorian"
            timeline_view_mode = "quarterly"

            [key_bindings]
            quit = "x"
            "#,
        )
        .unwrap();
        assert_eq!(config.default_calendar, CalendarSystem::Gregorian);
        assert_eq!(config.timeline_view_mode, ViewMode::Quarterly);
        assert_eq!(config.key_bindings.quit, "x");
        assert_eq!(config.key_bindings.help, "F1");
    }

    #[test]
    fn toml_round_trip() {
        let mut config = Config::default();
        config.themes.insert("mine".to_string(), Theme::preset("red", "black", "red", ""));
        config.set_theme("mine").unwrap();

        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn themes_resolve_and_fill_contrast() {
        let mut config = Config::default();
        assert!(config.set_theme("nope").is_err());
        config.set_theme("firuzeh").unwrap();
        let theme = config.get_active_theme();
        assert!(!theme.highlight_fg.is_empty());

        let names = config.get_available_themes();
        assert!(names.windows(2).all(|w| w[0] <= w[1]));
        assert!(names.contains(&"monochrome".to_string()));
    }

    #[test]
    fn load_from_path_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from_path(&path, utils::Profile::Dev).unwrap();
        assert!(path.exists());
        assert!(config.database_path.ends_with(DATABASE_FILE));

        let reloaded = Config::load_from_path(&path, utils::Profile::Dev).unwrap();
        assert_eq!(reloaded, config);
    }
}
