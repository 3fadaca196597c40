use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::models::TimelineEvent;
use crate::timeline::{self, DragState, ViewMode};
use crate::tui::widgets::color::{Palette, status_color};

/// A list row: a group header or the index of an event in the visible list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Header(String),
    Event(usize),
}

/// Rows of the grouped timeline. `events` must already be in date order.
pub fn build_rows(events: &[&TimelineEvent], mode: ViewMode) -> Vec<Row> {
    let mut rows = Vec::with_capacity(events.len());
    let mut index = 0;
    for (key, group) in timeline::group_events(events, mode) {
        rows.push(Row::Header(key));
        for _ in group {
            rows.push(Row::Event(index));
            index += 1;
        }
    }
    rows
}

/// Row holding the given event index
pub fn row_of(rows: &[Row], event_index: usize) -> Option<usize> {
    rows.iter().position(|r| *r == Row::Event(event_index))
}

pub fn render_timeline_list(
    f: &mut Frame,
    area: Rect,
    events: &[&TimelineEvent],
    mode: ViewMode,
    selected: Option<usize>,
    drag: &DragState,
    palette: &Palette,
) {
    let title = format!("نقشه راه ({})", mode.label());
    let block = Block::default().borders(Borders::ALL).title(title).style(palette.base());
    if events.is_empty() {
        f.render_widget(Paragraph::new("رویدادی یافت نشد").block(block), area);
        return;
    }

    let rows = build_rows(events, mode);
    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| match row {
            Row::Header(key) => ListItem::new(Line::from(Span::styled(
                key.clone(),
                Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ))),
            Row::Event(i) => {
                let event = events[*i];
                let marker = if drag.dragged.as_deref() == Some(event.id.as_str()) { "⇄ " } else { "" };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("  {} ", event.status.icon()), Style::default().fg(status_color(event.status))),
                    Span::raw(format!("{}{}  {}", marker, event.date, event.title)),
                ]))
            }
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .style(palette.base())
        .highlight_style(palette.highlight());

    let mut state = ListState::default();
    state.select(selected.and_then(|i| row_of(&rows, i)));
    f.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventStatus;

    #[test]
    fn headers_precede_their_events() {
        let events = [
            TimelineEvent::new("1", "a", "1402/06/15", EventStatus::Completed),
            TimelineEvent::new("2", "b", "1402/08/10", EventStatus::Completed),
            TimelineEvent::new("3", "c", "1403/01/20", EventStatus::Planned),
        ];
        let refs: Vec<&TimelineEvent> = events.iter().collect();

        let rows = build_rows(&refs, ViewMode::Yearly);
        assert_eq!(
            rows,
            [
                Row::Header("1402".to_string()),
                Row::Event(0),
                Row::Event(1),
                Row::Header("1403".to_string()),
                Row::Event(2),
            ]
        );
        assert_eq!(row_of(&rows, 2), Some(4));
        assert_eq!(row_of(&rows, 9), None);

        let quarterly = build_rows(&refs, ViewMode::Quarterly);
        assert_eq!(quarterly.len(), 6);
    }
}
