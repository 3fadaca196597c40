use ratatui::style::{Color, Style};

use crate::Config;
use crate::models::{DependencyType, EventStatus};
use crate::notes::ImportanceBand;

/// Parse a theme or palette color.
/// Accepts terminal color names, `#RRGGBB`, `#RGB` and `rgb(r, g, b)`.
/// Anything else falls back to white.
pub fn parse_color(color_str: &str) -> Color {
    let s = color_str.trim().to_lowercase();

    match s.as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "gray" | "grey" | "lightgray" | "lightgrey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        "lightred" => Color::LightRed,
        "lightgreen" => Color::LightGreen,
        "lightyellow" => Color::LightYellow,
        "lightblue" => Color::LightBlue,
        "lightmagenta" => Color::LightMagenta,
        "lightcyan" => Color::LightCyan,
        _ if s.starts_with('#') => parse_hex_color(&s).unwrap_or(Color::White),
        _ if s.starts_with("rgb(") => parse_rgb_color(&s).unwrap_or(Color::White),
        _ => Color::White,
    }
}

fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.trim_start_matches('#');
    match hex.len() {
        6 => Some(Color::Rgb(
            u8::from_str_radix(hex.get(0..2)?, 16).ok()?,
            u8::from_str_radix(hex.get(2..4)?, 16).ok()?,
            u8::from_str_radix(hex.get(4..6)?, 16).ok()?,
        )),
        3 => {
            let mut channels = [0u8; 3];
            for (i, channel) in channels.iter_mut().enumerate() {
                let v = u8::from_str_radix(hex.get(i..i + 1)?, 16).ok()?;
                *channel = (v << 4) | v;
            }
            Some(Color::Rgb(channels[0], channels[1], channels[2]))
        }
        _ => None,
    }
}

fn parse_rgb_color(s: &str) -> Option<Color> {
    let content = s.strip_prefix("rgb(")?.strip_suffix(')')?;
    let parts: Vec<u8> = content
        .split(',')
        .map(|p| p.trim().parse::<u8>())
        .collect::<Result<_, _>>()
        .ok()?;
    match parts.as_slice() {
        [r, g, b] => Some(Color::Rgb(*r, *g, *b)),
        _ => None,
    }
}

pub fn format_color_for_display(color: &Color) -> String {
    match color {
        Color::Black => "black".to_string(),
        Color::Red => "red".to_string(),
        Color::Green => "green".to_string(),
        Color::Yellow => "yellow".to_string(),
        Color::Blue => "blue".to_string(),
        Color::Magenta => "magenta".to_string(),
        Color::Cyan => "cyan".to_string(),
        Color::White => "white".to_string(),
        Color::Gray => "gray".to_string(),
        Color::DarkGray => "darkgray".to_string(),
        Color::LightRed => "lightred".to_string(),
        Color::LightGreen => "lightgreen".to_string(),
        Color::LightYellow => "lightyellow".to_string(),
        Color::LightBlue => "lightblue".to_string(),
        Color::LightMagenta => "lightmagenta".to_string(),
        Color::LightCyan => "lightcyan".to_string(),
        Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
        Color::Indexed(i) => format!("indexed({})", i),
        Color::Reset => "reset".to_string(),
    }
}

/// WCAG relative luminance, 0.0 (dark) to 1.0 (light)
fn luminance(r: u8, g: u8, b: u8) -> f64 {
    let linear = |c: u8| {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
}

/// Black or white, whichever reads better on `background`
pub fn get_contrast_text_color(background: Color) -> Color {
    let dark = match background {
        Color::Rgb(r, g, b) => luminance(r, g, b) < 0.5,
        Color::Black | Color::Blue | Color::Magenta | Color::Red | Color::DarkGray => true,
        _ => false,
    };
    if dark { Color::White } else { Color::Black }
}

pub fn status_color(status: EventStatus) -> Color {
    parse_color(status.color())
}

pub fn dependency_color(kind: DependencyType) -> Color {
    parse_color(kind.color())
}

pub fn importance_color(importance: u8) -> Color {
    parse_color(ImportanceBand::from_importance(importance).color())
}

/// Resolved colors of the active theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub fg: Color,
    pub bg: Color,
    pub highlight_bg: Color,
    pub highlight_fg: Color,
    pub tab_bg: Color,
    /// Text on `tab_bg`
    pub tab_fg: Color,
}

impl Palette {
    pub fn from_config(config: &Config) -> Self {
        let theme = config.get_active_theme();
        let tab_bg = parse_color(&theme.tab_bg);
        Self {
            fg: parse_color(&theme.fg),
            bg: parse_color(&theme.bg),
            highlight_bg: parse_color(&theme.highlight_bg),
            highlight_fg: parse_color(&theme.highlight_fg),
            tab_bg,
            tab_fg: get_contrast_text_color(tab_bg),
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn highlight(&self) -> Style {
        Style::default().fg(self.highlight_fg).bg(self.highlight_bg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_hex_and_rgb() {
        assert_eq!(parse_color(" Grey "), Color::Gray);
        assert_eq!(parse_color("#0088FE"), Color::Rgb(0x00, 0x88, 0xFE));
        assert_eq!(parse_color("#fff"), Color::Rgb(255, 255, 255));
        assert_eq!(parse_color("rgb(1, 2, 3)"), Color::Rgb(1, 2, 3));
        assert_eq!(parse_color("rgb(1, 2)"), Color::White);
        assert_eq!(parse_color("#12345"), Color::White);
        assert_eq!(parse_color("turquoise"), Color::White);
    }

    #[test]
    fn display_round_trips_rgb() {
        let color = parse_color("#00c49f");
        assert_eq!(format_color_for_display(&color), "#00C49F");
        assert_eq!(parse_color(&format_color_for_display(&color)), color);
    }

    #[test]
    fn contrast_picks_readable_text() {
        assert_eq!(get_contrast_text_color(Color::Black), Color::White);
        assert_eq!(get_contrast_text_color(Color::Yellow), Color::Black);
        assert_eq!(get_contrast_text_color(Color::Rgb(0x16, 0xa3, 0x4a)), Color::White);
        assert_eq!(get_contrast_text_color(Color::Rgb(0xff, 0xbb, 0x28)), Color::Black);
    }

    #[test]
    fn domain_palettes_parse() {
        assert_eq!(status_color(EventStatus::Completed), Color::Rgb(0x16, 0xa3, 0x4a));
        assert_eq!(importance_color(95), Color::Red);
        assert_ne!(dependency_color(DependencyType::StartToFinish), Color::White);
    }

    #[test]
    fn palette_fills_highlight_text() {
        let config = Config {
            current_theme: "firuzeh".to_string(),
            ..Config::default()
        };
        let palette = Palette::from_config(&config);
        assert_eq!(palette.highlight_bg, Color::Rgb(0x00, 0xC4, 0x9F));
        assert_eq!(palette.highlight_fg, Color::White);
    }
}
