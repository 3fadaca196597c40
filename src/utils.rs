use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

/// Profile mode for the application, chosen by the `--dev` flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Dev,
    Prod,
}

impl Profile {
    pub fn app_name(self) -> &'static str {
        match self {
            Profile::Dev => "taqvim-dev",
            Profile::Prod => "taqvim",
        }
    }
}

fn project_dirs(profile: Profile) -> Option<ProjectDirs> {
    ProjectDirs::from("com", "taqvim", profile.app_name())
}

/// Configuration directory; the dev profile gets its own
pub fn get_config_dir(profile: Profile) -> Option<PathBuf> {
    project_dirs(profile).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Data directory holding the database and the log file
pub fn get_data_dir(profile: Profile) -> Option<PathBuf> {
    project_dirs(profile).map(|dirs| dirs.data_dir().to_path_buf())
}

/// Expand `~` in a path string to the user's home directory
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(base) = BaseDirs::new() {
            return base.home_dir().join(rest);
        }
    }
    PathBuf::from(path)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedKeyBinding {
    pub key_code: KeyCode,
    pub requires_ctrl: bool,
}

impl ParsedKeyBinding {
    pub fn matches(&self, key: &KeyEvent) -> bool {
        if key.code != self.key_code {
            return false;
        }
        if self.requires_ctrl {
            has_primary_modifier(key.modifiers)
        } else {
            !has_primary_modifier(key.modifiers)
        }
    }
}

/// Ctrl everywhere; on macOS Option counts too
pub fn has_primary_modifier(modifiers: KeyModifiers) -> bool {
    #[cfg(target_os = "macos")]
    {
        modifiers.contains(KeyModifiers::CONTROL) || modifiers.contains(KeyModifiers::ALT)
    }

    #[cfg(not(target_os = "macos"))]
    {
        modifiers.contains(KeyModifiers::CONTROL)
    }
}

/// Key binding as shown in hints; macOS users see "Opt+" instead of "Ctrl+"
pub fn format_key_binding_for_display(key_binding: &str) -> String {
    #[cfg(target_os = "macos")]
    {
        key_binding.replace("Ctrl+", "Opt+")
    }

    #[cfg(not(target_os = "macos"))]
    {
        key_binding.to_string()
    }
}

/// Parse a config key binding: a single character ("q"), a named key
/// ("Enter", "F5", "BackTab") or either with a "Ctrl+" prefix.
pub fn parse_key_binding(key_str: &str) -> Result<ParsedKeyBinding, String> {
    let key_str = key_str.trim();

    if let Some(key_part) = key_str.strip_prefix("Ctrl+") {
        return Ok(ParsedKeyBinding {
            key_code: parse_key_code(key_part)?,
            requires_ctrl: true,
        });
    }

    Ok(ParsedKeyBinding {
        key_code: parse_key_code(key_str)?,
        requires_ctrl: false,
    })
}

fn parse_key_code(key_str: &str) -> Result<KeyCode, String> {
    let code = match key_str {
        "Enter" => KeyCode::Enter,
        "Esc" | "Escape" => KeyCode::Esc,
        "Backspace" => KeyCode::Backspace,
        "Tab" => KeyCode::Tab,
        "BackTab" => KeyCode::BackTab,
        "Space" | " " => KeyCode::Char(' '),
        "Left" => KeyCode::Left,
        "Right" => KeyCode::Right,
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        "PageUp" => KeyCode::PageUp,
        "PageDown" => KeyCode::PageDown,
        "Delete" => KeyCode::Delete,
        "Insert" => KeyCode::Insert,
        _ => {
            if let Some(n) = key_str.strip_prefix('F').and_then(|n| n.parse::<u8>().ok()) {
                if (1..=12).contains(&n) {
                    return Ok(KeyCode::F(n));
                }
            }
            let mut chars = key_str.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return Err(format!("Unknown key binding: {}", key_str)),
            }
        }
    };
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_function_and_ctrl_keys() {
        assert_eq!(parse_key_binding("BackTab").unwrap().key_code, KeyCode::BackTab);
        assert_eq!(parse_key_binding("F7").unwrap().key_code, KeyCode::F(7));
        assert_eq!(parse_key_binding("Space").unwrap().key_code, KeyCode::Char(' '));
        assert_eq!(parse_key_binding("/").unwrap().key_code, KeyCode::Char('/'));

        let save = parse_key_binding("Ctrl+s").unwrap();
        assert!(save.requires_ctrl);
        assert_eq!(save.key_code, KeyCode::Char('s'));

        assert!(parse_key_binding("F13").is_err());
        assert!(parse_key_binding("Hyper").is_err());
    }

    #[test]
    fn persian_letters_are_single_keys() {
        assert_eq!(parse_key_binding("ت").unwrap().key_code, KeyCode::Char('ت'));
    }

    #[test]
    fn ctrl_requirement_is_exact() {
        let binding = parse_key_binding("s").unwrap();
        assert!(binding.matches(&KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE)));
        assert!(!binding.matches(&KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)));

        let ctrl = parse_key_binding("Ctrl+s").unwrap();
        assert!(ctrl.matches(&KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)));
        assert!(!ctrl.matches(&KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE)));
    }

    #[test]
    fn dev_profile_has_its_own_name() {
        assert_ne!(Profile::Dev.app_name(), Profile::Prod.app_name());
        assert_eq!(expand_path("/tmp/x.db"), PathBuf::from("/tmp/x.db"));
    }
}
