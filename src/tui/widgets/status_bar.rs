use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::widgets::Paragraph;

use crate::tui::widgets::color::Palette;

const SEPARATOR: &str = " • ";
const ELLIPSIS: &str = "...";

/// Join as many hints as fit in `width` columns, ending with "..." when some were dropped
pub fn fit_hints(hints: &[String], width: usize) -> String {
    let mut text = String::new();
    for (i, hint) in hints.iter().enumerate() {
        let separator = if i == 0 { "" } else { SEPARATOR };
        let would_be = text.chars().count() + separator.chars().count() + hint.chars().count();
        if would_be > width {
            let keep = width.saturating_sub(ELLIPSIS.len());
            if text.chars().count() > keep {
                text = text.chars().take(keep).collect();
            } else if text.is_empty() {
                text = hint.chars().take(keep).collect();
            }
            text.push_str(ELLIPSIS);
            break;
        }
        text.push_str(separator);
        text.push_str(hint);
    }
    text
}

/// One line: the status message when there is one, key hints otherwise
pub fn render_status_bar(f: &mut Frame, area: Rect, message: Option<&str>, key_hints: &[String], palette: &Palette) {
    let width = area.width as usize;
    let paragraph = match message {
        Some(message) => {
            let text = if message.chars().count() > width {
                let mut cut: String = message.chars().take(width.saturating_sub(ELLIPSIS.len())).collect();
                cut.push_str(ELLIPSIS);
                cut
            } else {
                message.to_string()
            };
            Paragraph::new(text).style(palette.highlight().add_modifier(Modifier::BOLD))
        }
        None => Paragraph::new(fit_hints(key_hints, width)).style(palette.base()),
    };
    f.render_widget(paragraph, area);
}
