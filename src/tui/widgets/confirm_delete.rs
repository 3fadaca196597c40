use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Modifier;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::tui::widgets::color::Palette;
use crate::tui::widgets::help::popup_area;

pub fn render_confirm_delete(f: &mut Frame, area: Rect, item_name: &str, palette: &Palette) {
    let popup = popup_area(area, 50, 35);
    f.render_widget(Clear, popup);

    let lines = vec![
        Line::from("این مورد حذف شود؟"),
        Line::from(""),
        Line::from(item_name.to_string()).style(palette.highlight().add_modifier(Modifier::BOLD)),
        Line::from(""),
        Line::from("y / Enter: حذف    n / Esc: انصراف"),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("تأیید حذف")
                .title_alignment(Alignment::Center)
                .style(palette.base()),
        )
        .style(palette.base())
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);

    f.render_widget(paragraph, popup);
}
