use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout as RatLayout, Rect};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::analytics::TimelineAnalytics;
use crate::calendar::{self, CalendarSystem, persian_digits};
use crate::timeline;
use crate::tui::app::{App, Mode, Tab};
use crate::tui::layout::Layout;
use crate::tui::widgets::{
    analytics::render_analytics,
    calendar::render_calendar,
    color::Palette,
    confirm_delete::render_confirm_delete,
    event_view::render_event_view,
    filters_box::{filter_summary, render_filters_box},
    form::render_form,
    help::render_help,
    note_list::render_note_list,
    sections::{render_metrics, render_sections},
    status_bar::render_status_bar,
    tabs::render_tabs,
    timeline_list::render_timeline_list,
};
use crate::utils::format_key_binding_for_display as key;

pub fn render(f: &mut Frame, app: &App, layout: &Layout) {
    let palette = Palette::from_config(&app.config);

    let outer = Block::default()
        .borders(Borders::ALL)
        .title("Taqvim")
        .title_alignment(Alignment::Center)
        .style(palette.base());
    f.render_widget(outer, f.area());

    render_tabs(f, layout.tabs_area, app.current_tab, &palette);

    match app.current_tab {
        Tab::Calendar => render_calendar_tab(f, app, layout, &palette),
        Tab::Timeline => render_timeline_tab(f, app, layout, &palette),
        Tab::Sections => {
            render_sections(
                f,
                layout.sidebar_area,
                &app.dashboard.sections,
                app.section_list_state.selected(),
                &palette,
            );
            render_metrics(f, layout.main_area, &app.dashboard.metrics, &palette);
        }
    }

    let (filters_title, summary) = filters_text(app);
    render_filters_box(f, layout.filters_area, filters_title, &summary, &palette);

    render_status_bar(
        f,
        layout.status_area,
        app.status_message.as_deref(),
        &get_key_hints(app),
        &palette,
    );

    let overlay_area = layout.inner_area;
    match app.mode {
        Mode::Help => render_help(f, overlay_area, &app.config, &palette),
        Mode::Form => {
            if let Some(form) = &app.form {
                render_form(f, overlay_area, form, &palette);
            }
        }
        Mode::ConfirmDelete => {
            let name = app.pending_delete_label().unwrap_or_default();
            render_confirm_delete(f, overlay_area, &name, &palette);
        }
        Mode::View | Mode::Search => {}
    }
}

fn split_vertical(area: Rect, top: Constraint) -> (Rect, Rect) {
    let chunks = RatLayout::default()
        .direction(Direction::Vertical)
        .constraints([top, Constraint::Min(3)])
        .split(area);
    (chunks[0], chunks[1])
}

fn render_calendar_tab(f: &mut Frame, app: &App, layout: &Layout, palette: &Palette) {
    let notes = app.dashboard.calendar_notes();

    match app.grid() {
        Ok(grid) => {
            // Header row, weeks and borders
            let height = grid.weeks().len() as u16 + 3;
            let (grid_area, reminders_area) = split_vertical(layout.sidebar_area, Constraint::Length(height));
            render_calendar(f, grid_area, &grid, &notes, app.selected_day, app.today, palette);
            render_reminders(f, reminders_area, app, palette);
        }
        Err(e) => {
            let message = Paragraph::new(format!("تقویم قابل نمایش نیست: {}", e))
                .block(Block::default().borders(Borders::ALL))
                .style(palette.base());
            f.render_widget(message, layout.sidebar_area);
        }
    }

    let (day_area, agenda_area) = split_vertical(layout.main_area, Constraint::Percentage(50));
    let day_title = app
        .selected_date()
        .and_then(|d| calendar::display_date(d, app.system).ok())
        .unwrap_or_default();
    render_note_list(
        f,
        day_area,
        &day_title,
        &app.day_notes(),
        Some(app.note_index),
        None,
        palette,
    );
    render_note_list(
        f,
        agenda_area,
        "یادداشت‌های ماه",
        &app.month_agenda(),
        None,
        Some(app.system),
        palette,
    );
}

fn render_reminders(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let due = timeline::reminders_due(&app.dashboard.events, app.today);
    let text = if due.is_empty() {
        "یادآوری برای امروز نیست".to_string()
    } else {
        due.iter()
            .map(|e| format!("🔔 {}", e.title))
            .collect::<Vec<_>>()
            .join("\n")
    };
    let paragraph = Paragraph::new(text)
        .style(palette.base())
        .block(Block::default().borders(Borders::ALL).title("یادآوری‌های امروز"));
    f.render_widget(paragraph, area);
}

fn render_timeline_tab(f: &mut Frame, app: &App, layout: &Layout, palette: &Palette) {
    let visible = app.visible_events();
    render_timeline_list(
        f,
        layout.sidebar_area,
        &visible,
        app.view_mode,
        app.event_list_state.selected(),
        &app.drag,
        palette,
    );

    let (detail_area, analytics_area) = split_vertical(layout.main_area, Constraint::Percentage(50));
    render_event_view(
        f,
        detail_area,
        app.selected_event(),
        &app.dashboard.events,
        &app.dashboard.dependencies,
        app.today,
        palette,
    );
    let analytics = TimelineAnalytics::compute(&app.dashboard.events);
    render_analytics(f, analytics_area, &analytics, palette);
}

fn filters_text(app: &App) -> (&'static str, String) {
    match app.current_tab {
        Tab::Calendar => {
            let system = match app.system {
                CalendarSystem::Persian => "شمسی",
                CalendarSystem::Gregorian => "میلادی",
            };
            let today = calendar::display_date(app.today, app.system).unwrap_or_default();
            (
                "تقویم",
                format!("{} | امروز: {} ({} برای تغییر)", system, today, key(&app.config.key_bindings.toggle_calendar)),
            )
        }
        Tab::Timeline => {
            let mut summary = filter_summary(&app.filter, app.view_mode);
            if app.mode == Mode::Search {
                summary.push_str(" ▏");
            }
            ("فیلترها", summary)
        }
        Tab::Sections => {
            let active = app
                .dashboard
                .sections
                .sections
                .iter()
                .filter(|s| s.status != crate::models::SectionStatus::Inactive)
                .count();
            (
                "بخش‌ها",
                format!(
                    "{} بخش، {} فعال",
                    persian_digits(app.dashboard.sections.len()),
                    persian_digits(active)
                ),
            )
        }
    }
}

/// Key hints for the status bar, most useful first
pub fn get_key_hints(app: &App) -> Vec<String> {
    let k = &app.config.key_bindings;
    let hint = |binding: &str, label: &str| format!("{}: {}", key(binding), label);

    match app.mode {
        Mode::Help => vec![hint(&k.help, "بستن"), "Esc: بستن".to_string()],
        Mode::Search => vec!["Enter/Esc: پایان جستجو".to_string(), "Backspace: حذف".to_string()],
        Mode::Form => vec![
            hint(&k.save, "ذخیره"),
            "Tab: فیلد بعدی".to_string(),
            "Ctrl+z: بازگردانی".to_string(),
            "Esc: انصراف".to_string(),
        ],
        Mode::ConfirmDelete => vec!["y: حذف".to_string(), "n: انصراف".to_string()],
        Mode::View => {
            let mut hints = match app.current_tab {
                Tab::Calendar => vec![
                    hint(&k.new, "یادداشت"),
                    hint(&k.edit, "ویرایش"),
                    hint(&k.delete, "حذف"),
                    format!("{}/{}: ماه", key(&k.prev_month), key(&k.next_month)),
                    hint(&k.toggle_calendar, "تقویم"),
                    hint(&k.go_today, "امروز"),
                ],
                Tab::Timeline => vec![
                    hint(&k.new, "رویداد"),
                    hint(&k.edit, "ویرایش"),
                    hint(&k.search, "جستجو"),
                    hint(&k.cycle_view, "نما"),
                    hint(&k.mark_drag, "جابه‌جایی"),
                    format!(
                        "{}/{}/{}: فیلتر",
                        key(&k.filter_completed),
                        key(&k.filter_ongoing),
                        key(&k.filter_planned)
                    ),
                ],
                Tab::Sections => vec![
                    hint(&k.new, "بخش"),
                    hint(&k.toggle_section, "فعال/غیرفعال"),
                    hint(&k.delete, "حذف"),
                ],
            };
            hints.push(hint(&k.help, "راهنما"));
            hints.push(hint(&k.quit, "خروج"));
            hints
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, Database};
    use chrono::NaiveDate;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn app() -> App {
        let today = NaiveDate::from_ymd_opt(2023, 9, 6).unwrap();
        let mut app = App::with_today(Config::default(), Database::open_in_memory().unwrap(), today).unwrap();
        app.dashboard.seed_sample_roadmap().unwrap();
        app.clamp_selections();
        app
    }

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 32)).unwrap();
        terminal
            .draw(|f| {
                let layout = Layout::calculate(f.area());
                render(f, app, &layout);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn every_tab_and_overlay_renders() {
        let mut app = app();
        for tab in Tab::ALL {
            app.current_tab = tab;
            let screen = draw(&app);
            assert!(screen.contains("Taqvim"));
        }

        app.current_tab = Tab::Calendar;
        app.mode = Mode::Help;
        draw(&app);
        app.mode = Mode::View;
        app.open_new_form();
        draw(&app);
    }

    #[test]
    fn hints_follow_mode_and_tab() {
        let mut app = app();
        let hints = get_key_hints(&app);
        assert_eq!(hints.last().map(String::as_str), Some("q: خروج"));
        assert!(hints.iter().any(|h| h.contains("امروز")));

        app.current_tab = Tab::Timeline;
        assert!(get_key_hints(&app).iter().any(|h| h == "F5/F6/F7: فیلتر"));

        app.mode = Mode::ConfirmDelete;
        assert_eq!(get_key_hints(&app), ["y: حذف", "n: انصراف"]);
    }
}
