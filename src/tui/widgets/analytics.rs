use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Gauge, Paragraph};

use crate::analytics::TimelineAnalytics;
use crate::calendar::persian_digits;
use crate::models::EventStatus;
use crate::tui::widgets::color::{Palette, status_color};

/// Months shown in the trend chart, most recent last
const TREND_MONTHS: usize = 6;

pub fn render_analytics(f: &mut Frame, area: Rect, analytics: &TimelineAnalytics, palette: &Palette) {
    let block = Block::default().borders(Borders::ALL).title("تحلیل نقشه راه").style(palette.base());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(4), Constraint::Length(6)])
        .split(inner);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(status_color(EventStatus::Completed)))
        .ratio((analytics.completion_rate / 100.0).clamp(0.0, 1.0))
        .label(format!("تکمیل: {}٪", persian_digits(analytics.completion_rate.round())));
    f.render_widget(gauge, chunks[0]);

    f.render_widget(Paragraph::new(summary_lines(analytics)).style(palette.base()), chunks[1]);

    let bars: Vec<Bar> = analytics
        .monthly
        .iter()
        .rev()
        .take(TREND_MONTHS)
        .rev()
        .map(|m| {
            Bar::default()
                .value(m.counts.total() as u64)
                .label(Line::from(m.month.get(2..).unwrap_or(&m.month).to_string()))
        })
        .collect();
    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(5)
        .bar_gap(1)
        .bar_style(Style::default().fg(palette.highlight_bg))
        .value_style(palette.highlight());
    f.render_widget(chart, chunks[2]);
}

pub fn summary_lines<'a>(analytics: &'a TimelineAnalytics) -> Vec<Line<'a>> {
    let mut lines: Vec<Line> = EventStatus::ALL
        .iter()
        .map(|status| {
            Line::from(vec![
                Span::styled(format!("{} ", status.icon()), Style::default().fg(status_color(*status))),
                Span::raw(format!("{}: {}", status.label(), persian_digits(analytics.counts.get(*status)))),
            ])
        })
        .collect();
    lines.push(Line::from(format!("مجموع: {}", persian_digits(analytics.total))));

    if !analytics.critical_path.is_empty() {
        lines.push(Line::from(Span::styled("مسیر بحرانی", Style::default().add_modifier(Modifier::BOLD))));
        for event in &analytics.critical_path {
            lines.push(Line::from(format!("  {} {}", event.date, event.title)));
        }
    }
    if !analytics.key_upcoming.is_empty() {
        lines.push(Line::from(Span::styled("رویدادهای کلیدی پیش رو", Style::default().add_modifier(Modifier::BOLD))));
        for event in &analytics.key_upcoming {
            lines.push(Line::from(format!("  {} {}", event.date, event.title)));
        }
    }
    lines
}
