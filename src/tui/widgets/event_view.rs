use chrono::NaiveDate;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::models::{AttachmentKind, TimelineDependency, TimelineEvent};
use crate::timeline;
use crate::tui::widgets::color::{Palette, dependency_color, status_color};

fn field<'a>(label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{}: ", label), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(value),
    ])
}

/// Detail lines of an event: fields, reminder, attachments and dependencies
pub fn event_lines<'a>(
    event: &'a TimelineEvent,
    events: &[TimelineEvent],
    dependencies: &[TimelineDependency],
    today: NaiveDate,
) -> Vec<Line<'a>> {
    let mut lines = vec![
        Line::from(Span::styled(event.title.as_str(), Style::default().add_modifier(Modifier::BOLD))),
        field("تاریخ", event.date.clone()),
        Line::from(vec![
            Span::styled("وضعیت: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("{} {}", event.status.icon(), event.status.label()),
                Style::default().fg(status_color(event.status)),
            ),
        ]),
    ];

    if let (Some(start), Some(end)) = (&event.start_date, &event.end_date) {
        lines.push(field("بازه", format!("{} تا {}", start, end)));
    }
    if let Some(progress) = event.progress {
        lines.push(field("پیشرفت", format!("{}%", progress)));
    }
    if let Some(priority) = event.priority {
        lines.push(field("اولویت", priority.as_str().to_string()));
    }
    if let Some(owner) = &event.owner {
        lines.push(field("مسئول", owner.clone()));
    }
    if let Some(reminder) = timeline::reminder_text(event, today) {
        lines.push(Line::from(Span::styled(reminder, Style::default().add_modifier(Modifier::ITALIC))));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(event.description.as_str()));
    if let Some(details) = &event.details {
        lines.push(Line::from(details.as_str()));
    }

    if !event.attachments.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("پیوست‌ها", Style::default().add_modifier(Modifier::BOLD))));
        for attachment in &event.attachments {
            let icon = match attachment.kind {
                AttachmentKind::Link => "🔗",
                AttachmentKind::File => "📄",
                AttachmentKind::Image => "🖼",
            };
            lines.push(Line::from(format!("{} {} ({})", icon, attachment.title, attachment.url)));
        }
    }

    let resolved = timeline::resolve_dependencies(dependencies, events);
    let described: Vec<(&TimelineDependency, String)> = timeline::related_dependencies(&resolved, &event.id)
        .into_iter()
        .map(|r| (r.dependency, timeline::describe_dependency(r, &event.id)))
        .collect();
    if !described.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("وابستگی‌ها", Style::default().add_modifier(Modifier::BOLD))));
        for (dependency, text) in described {
            let arrow = if dependency.kind.is_dashed() { "╌▶ " } else { "──▶ " };
            lines.push(Line::from(vec![
                Span::styled(arrow, Style::default().fg(dependency_color(dependency.kind))),
                Span::raw(text),
            ]));
        }
    }

    lines
}

pub fn render_event_view(
    f: &mut Frame,
    area: Rect,
    event: Option<&TimelineEvent>,
    events: &[TimelineEvent],
    dependencies: &[TimelineDependency],
    today: NaiveDate,
    palette: &Palette,
) {
    let block = Block::default().borders(Borders::ALL).title("جزئیات رویداد").style(palette.base());
    let lines = match event {
        Some(event) => event_lines(event, events, dependencies, today),
        None => vec![Line::from("رویدادی انتخاب نشده")],
    };
    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(palette.base())
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}
