use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::activity::{MetricSet, format_amount, format_value};
use crate::models::SectionStatus;
use crate::sections::{SectionBoard, SectionShare};
use crate::tui::widgets::color::{Palette, parse_color};

/// Bar cells for a whole 100% share
const BAR_CELLS: usize = 20;

pub fn share_bar(share: f64) -> String {
    let cells = ((share.clamp(0.0, 100.0) / 100.0) * BAR_CELLS as f64).round() as usize;
    "█".repeat(cells)
}

fn share_item<'a>(share: &SectionShare<'a>) -> ListItem<'a> {
    let section = share.section;
    let status_style = match section.status {
        SectionStatus::Active | SectionStatus::Live => Style::default(),
        SectionStatus::Inactive => Style::default().add_modifier(Modifier::DIM),
    };
    ListItem::new(vec![
        Line::from(vec![
            Span::styled(format!("{} ", section.name), status_style.add_modifier(Modifier::BOLD)),
            Span::styled(format!("[{}]", section.status.label()), status_style),
        ]),
        Line::from(vec![
            Span::styled(share_bar(share.share), Style::default().fg(parse_color(share.color))),
            Span::raw(format!(" {}٪  {} تومان", crate::calendar::persian_digits(share.share), format_amount(section.revenue))),
        ]),
    ])
}

pub fn render_sections(f: &mut Frame, area: Rect, board: &SectionBoard, selected: Option<usize>, palette: &Palette) {
    let title = format!("بخش‌های کسب‌وکار | مجموع درآمد: {}", format_amount(board.total_revenue()));
    let block = Block::default().borders(Borders::ALL).title(title).style(palette.base());
    if board.is_empty() {
        f.render_widget(Paragraph::new("بخشی تعریف نشده").block(block), area);
        return;
    }

    let shares = board.shares();
    let items: Vec<ListItem> = shares.iter().map(share_item).collect();
    let list = List::new(items)
        .block(block)
        .style(palette.base())
        .highlight_style(palette.highlight())
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(selected);
    f.render_stateful_widget(list, area, &mut state);
}

pub fn render_metrics(f: &mut Frame, area: Rect, metrics: &MetricSet, palette: &Palette) {
    let lines: Vec<Line> = metrics
        .iter()
        .map(|metric| {
            let mark = if metric.enabled { "✓" } else { "✗" };
            let style = if metric.enabled {
                Style::default().fg(parse_color(&metric.color))
            } else {
                Style::default().add_modifier(Modifier::DIM)
            };
            Line::from(vec![
                Span::styled(format!("{} {} ", mark, metric.name), style),
                Span::raw(format!("({}) {}", metric.unit.label(), format_value(0.0, metric.unit))),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines).style(palette.base()).block(
        Block::default()
            .borders(Borders::ALL)
            .title("شاخص‌های فعالیت")
            .style(palette.base()),
    );
    f.render_widget(paragraph, area);
}
