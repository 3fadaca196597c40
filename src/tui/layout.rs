use ratatui::layout::{Constraint, Direction, Layout as RatLayout, Rect};

pub struct Layout {
    pub inner_area: Rect, // inside the outer border
    pub tabs_area: Rect,
    pub sidebar_area: Rect,
    pub main_area: Rect,
    pub filters_area: Rect,
    pub status_area: Rect,
}

impl Layout {
    /// Minimum terminal size. The sidebar holds a 7-column month grid
    /// (7 cells of 4 columns plus borders), the main pane needs room for titles.
    pub const MIN_WIDTH: u16 = 62;
    pub const MIN_HEIGHT: u16 = 16;

    const SIDEBAR_MIN: u16 = 32;
    const SIDEBAR_PERCENT: u16 = 45;

    pub fn calculate(size: Rect) -> Self {
        let width = size.width.max(Self::MIN_WIDTH + 2);
        let height = size.height.max(Self::MIN_HEIGHT + 2);
        let size = Rect::new(size.x, size.y, width, height);

        let inner_area = Rect::new(
            size.x + 1,
            size.y + 1,
            size.width.saturating_sub(2),
            size.height.saturating_sub(2),
        );

        let sidebar_width = (inner_area.width * Self::SIDEBAR_PERCENT / 100)
            .max(Self::SIDEBAR_MIN)
            .min(inner_area.width.saturating_sub(20));

        let vertical = RatLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // tabs
                Constraint::Min(1),    // sidebar + main
                Constraint::Length(3), // filters
                Constraint::Length(1), // status
            ])
            .split(inner_area);

        let horizontal = RatLayout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(sidebar_width), Constraint::Min(1)])
            .split(vertical[1]);

        Self {
            inner_area,
            tabs_area: vertical[0],
            sidebar_area: horizontal[0],
            main_area: horizontal[1],
            filters_area: vertical[2],
            status_area: vertical[3],
        }
    }
}
