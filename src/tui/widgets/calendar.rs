use chrono::NaiveDate;
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::calendar::{MonthGrid, grid};
use crate::notes::NoteStore;
use crate::tui::widgets::color::{Palette, importance_color};

/// Columns per day cell
pub const CELL_WIDTH: usize = 4;

/// Text of one day cell, right-aligned in [`CELL_WIDTH`] columns
pub fn cell_text(grid: &MonthGrid, day: Option<u32>) -> String {
    let label = day.map(|d| grid.system.display_number(d)).unwrap_or_default();
    format!("{:>width$}", label, width = CELL_WIDTH - 1) + " "
}

/// Month grid with the selected day highlighted, today in bold and days
/// carrying notes colored by their most important note
pub fn render_calendar(
    f: &mut Frame,
    area: Rect,
    grid: &MonthGrid,
    notes: &NoteStore,
    selected_day: u32,
    today: NaiveDate,
    palette: &Palette,
) {
    let system = grid.system;
    let title = format!(
        " {} {} ",
        system.month_name(grid.month),
        system.display_number(grid.year)
    );

    let mut lines = Vec::new();
    let header: Vec<Span> = system
        .weekday_headers()
        .iter()
        .map(|w| Span::styled(format!("{:>width$} ", w, width = CELL_WIDTH - 1), Style::default().add_modifier(Modifier::DIM)))
        .collect();
    lines.push(Line::from(header));

    for week in grid.weeks() {
        let cells: Vec<Span> = week
            .into_iter()
            .map(|day| {
                let text = cell_text(grid, day);
                let Some(day) = day else {
                    return Span::raw(text);
                };

                let mut style = palette.base();
                let marker = grid
                    .iso_for_day(day)
                    .ok()
                    .and_then(|iso| notes.most_important(&iso).map(|n| n.importance));
                if let Some(importance) = marker {
                    style = style.fg(importance_color(importance)).add_modifier(Modifier::UNDERLINED);
                }
                if grid::is_today(grid.year, grid.month, day, system, today) {
                    style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
                }
                if day == selected_day {
                    style = palette.highlight().add_modifier(Modifier::BOLD);
                }
                Span::styled(text, style)
            })
            .collect();
        lines.push(Line::from(cells));
    }

    let paragraph = Paragraph::new(lines).style(palette.base()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_alignment(Alignment::Center)
            .style(palette.base()),
    );
    f.render_widget(paragraph, area);
}
