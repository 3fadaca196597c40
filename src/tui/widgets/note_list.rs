use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::adapter;
use crate::calendar::{self, CalendarSystem};
use crate::models::Note;
use crate::notes::ImportanceBand;
use crate::tui::widgets::color::{Palette, importance_color};

/// Label of a note row: title, type, importance band and, for agenda rows, the date
pub fn note_label(note: &Note, date_in: Option<CalendarSystem>) -> String {
    let band = ImportanceBand::from_importance(note.importance);
    let mut label = format!("{} ({}، {})", note.title, note.note_type.label(), band.label());
    if let Some(system) = date_in {
        let date = note
            .day()
            .and_then(|d| calendar::display_date(d, system).ok())
            .unwrap_or_else(|| note.date.clone());
        label = format!("{} | {}", date, label);
    }
    label
}

/// Notes as a selectable list. Agenda lists pass `date_in` to show each note's date.
pub fn render_note_list(
    f: &mut Frame,
    area: Rect,
    title: &str,
    notes: &[Note],
    selected: Option<usize>,
    date_in: Option<CalendarSystem>,
    palette: &Palette,
) {
    let block = Block::default().borders(Borders::ALL).title(title).style(palette.base());
    if notes.is_empty() {
        f.render_widget(Paragraph::new("یادداشتی ثبت نشده").block(block), area);
        return;
    }

    let items: Vec<ListItem> = notes
        .iter()
        .map(|note| {
            let mut spans = vec![
                Span::styled("● ", Style::default().fg(importance_color(note.importance))),
                Span::raw(note_label(note, date_in)),
            ];
            if adapter::is_timeline_note(note) {
                spans.push(Span::styled(" [نقشه راه]", Style::default().add_modifier(Modifier::DIM)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .style(palette.base())
        .highlight_style(palette.highlight())
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(selected);
    f.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoteType;

    #[test]
    fn agenda_labels_carry_the_date() {
        let note = Note::new("1", "2023-09-06", "جلسه")
            .with_type(NoteType::Meeting)
            .with_importance(70);
        assert_eq!(note_label(&note, None), format!("جلسه ({}، زیاد)", NoteType::Meeting.label()));

        let label = note_label(&note, Some(CalendarSystem::Persian));
        assert!(label.starts_with("۱۵ شهریور ۱۴۰۲ | جلسه"));
    }

    #[test]
    fn undated_notes_show_raw_date() {
        let note = Note::new("1", "someday", "x");
        assert!(note_label(&note, Some(CalendarSystem::Gregorian)).starts_with("someday | x"));
    }
}
