use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::ItemForm;
use crate::tui::widgets::color::Palette;
use crate::tui::widgets::help::popup_area;

const FIELD_HEIGHT: u16 = 3;

/// Popup height for a form: one boxed line per field plus the outer border
pub fn form_height(field_count: usize) -> u16 {
    field_count as u16 * FIELD_HEIGHT + 2
}

pub fn render_form(f: &mut Frame, area: Rect, form: &ItemForm, palette: &Palette) {
    let popup = popup_area(area, 70, 100);
    let height = form_height(form.fields.len()).min(popup.height);
    let popup = Rect::new(popup.x, popup.y + (popup.height - height) / 2, popup.width, height);
    if popup.width < 4 || popup.height < 4 {
        return;
    }
    f.render_widget(Clear, popup);

    let outer = Block::default()
        .borders(Borders::ALL)
        .title(form.title())
        .title_alignment(Alignment::Center)
        .style(palette.base());
    let inner = outer.inner(popup);
    f.render_widget(outer, popup);

    let field_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(form.fields.iter().map(|_| Constraint::Length(FIELD_HEIGHT)))
        .split(inner);

    let inactive = Style::default().fg(palette.fg).add_modifier(Modifier::DIM);

    for (index, (field, field_area)) in form.fields.iter().zip(field_areas.iter()).enumerate() {
        let active = index == form.current_field;
        let width = field_area.width.saturating_sub(2) as usize;
        let (text, cursor_col) = field.editor.visible(width);

        let paragraph = Paragraph::new(text)
            .style(if active { palette.highlight() } else { inactive })
            .block(Block::default().borders(Borders::ALL).title(field.label));
        f.render_widget(paragraph, *field_area);

        if active && field_area.height >= FIELD_HEIGHT {
            f.set_cursor_position((field_area.x + 1 + cursor_col as u16, field_area.y + 1));
        }
    }
}
