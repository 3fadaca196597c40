use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Tabs;

use crate::tui::app::Tab;
use crate::tui::widgets::color::Palette;

pub fn render_tabs(f: &mut Frame, area: Rect, current_tab: Tab, palette: &Palette) {
    // Padded titles on tab_bg read as boxes
    let pad = Style::default().bg(palette.tab_bg);
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|tab| {
            Line::from(vec![
                Span::styled("  ", pad),
                Span::styled(tab.title(), pad.fg(palette.tab_fg)),
                Span::styled("  ", pad),
            ])
        })
        .collect();

    let tabs = Tabs::new(titles)
        .select(current_tab.index())
        .style(palette.base())
        .highlight_style(palette.highlight().add_modifier(Modifier::BOLD))
        .divider("  ")
        .padding("", "");

    f.render_widget(tabs, area);
}
