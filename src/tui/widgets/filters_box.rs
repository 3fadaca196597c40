use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::models::EventStatus;
use crate::timeline::{EventFilter, ViewMode};
use crate::tui::widgets::color::Palette;

/// One-line description of the active timeline filter
pub fn filter_summary(filter: &EventFilter, view_mode: ViewMode) -> String {
    let statuses: Vec<&str> = EventStatus::ALL
        .iter()
        .filter(|s| filter.statuses.contains(*s))
        .map(|s| s.label())
        .collect();
    let statuses = if statuses.is_empty() {
        "هیچ وضعیتی".to_string()
    } else {
        statuses.join("، ")
    };

    let mut summary = format!("نما: {} | وضعیت: {}", view_mode.label(), statuses);
    if !filter.search.is_empty() {
        summary.push_str(&format!(" | جستجو: {}", filter.search));
    }
    summary
}

pub fn render_filters_box(f: &mut Frame, area: Rect, title: &str, summary: &str, palette: &Palette) {
    let paragraph = Paragraph::new(summary)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .style(palette.base()),
        )
        .style(palette.base())
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_names_shown_statuses_and_search() {
        let filter = EventFilter::only([EventStatus::Ongoing]).with_search("سایت");
        let summary = filter_summary(&filter, ViewMode::Quarterly);
        assert!(summary.contains(EventStatus::Ongoing.label()));
        assert!(!summary.contains(EventStatus::Planned.label()));
        assert!(summary.contains("جستجو: سایت"));
        assert!(summary.contains(ViewMode::Quarterly.label()));
    }

    #[test]
    fn empty_status_set_is_spelled_out() {
        let summary = filter_summary(&EventFilter::only([]), ViewMode::Monthly);
        assert!(summary.contains("هیچ وضعیتی"));
    }
}
