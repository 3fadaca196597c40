use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode, size as terminal_size,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use std::io;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::KeyBindings;
use crate::models::EventStatus;
use crate::tui::app::{App, Mode, Tab};
use crate::tui::error::TuiError;
use crate::tui::layout::Layout;
use crate::utils::{ParsedKeyBinding, parse_key_binding};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// What a key does in view mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Help,
    TabNext,
    TabPrev,
    GoTab(Tab),
    PrevMonth,
    NextMonth,
    DayPrev,
    DayNext,
    WeekPrev,
    WeekNext,
    ListUp,
    ListDown,
    New,
    Edit,
    Delete,
    Save,
    Search,
    ToggleCalendar,
    GoToday,
    CycleView,
    Filter(EventStatus),
    MarkDrag,
    ToggleSection,
}

/// Configured key bindings, parsed once at startup
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: Vec<(ParsedKeyBinding, Action)>,
}

impl KeyMap {
    pub fn from_config(keys: &KeyBindings) -> Result<Self, TuiError> {
        let table = [
            (&keys.quit, Action::Quit),
            (&keys.help, Action::Help),
            (&keys.tab_next, Action::TabNext),
            (&keys.tab_prev, Action::TabPrev),
            (&keys.tab_1, Action::GoTab(Tab::Calendar)),
            (&keys.tab_2, Action::GoTab(Tab::Timeline)),
            (&keys.tab_3, Action::GoTab(Tab::Sections)),
            (&keys.prev_month, Action::PrevMonth),
            (&keys.next_month, Action::NextMonth),
            (&keys.day_prev, Action::DayPrev),
            (&keys.day_next, Action::DayNext),
            (&keys.week_prev, Action::WeekPrev),
            (&keys.week_next, Action::WeekNext),
            (&keys.list_up, Action::ListUp),
            (&keys.list_down, Action::ListDown),
            (&keys.new, Action::New),
            (&keys.edit, Action::Edit),
            (&keys.delete, Action::Delete),
            (&keys.save, Action::Save),
            (&keys.search, Action::Search),
            (&keys.toggle_calendar, Action::ToggleCalendar),
            (&keys.go_today, Action::GoToday),
            (&keys.cycle_view, Action::CycleView),
            (&keys.filter_completed, Action::Filter(EventStatus::Completed)),
            (&keys.filter_ongoing, Action::Filter(EventStatus::Ongoing)),
            (&keys.filter_planned, Action::Filter(EventStatus::Planned)),
            (&keys.mark_drag, Action::MarkDrag),
            (&keys.toggle_section, Action::ToggleSection),
        ];

        let bindings = table
            .into_iter()
            .map(|(key, action)| {
                parse_key_binding(key)
                    .map(|binding| (binding, action))
                    .map_err(TuiError::KeyBindingError)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { bindings })
    }

    /// First action bound to the key
    pub fn action(&self, key: &KeyEvent) -> Option<Action> {
        self.bindings
            .iter()
            .find(|(binding, _)| binding.matches(key))
            .map(|(_, action)| *action)
    }

    pub fn is(&self, key: &KeyEvent, action: Action) -> bool {
        self.bindings
            .iter()
            .any(|(binding, bound)| *bound == action && binding.matches(key))
    }
}

/// Restores the terminal when dropped, panics included
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: true,
        })
    }

    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

pub fn run_event_loop(mut app: App) -> Result<(), TuiError> {
    // Checked before entering the alternate screen so the message stays visible
    let (width, height) = terminal_size()?;
    let (min_width, min_height) = (Layout::MIN_WIDTH + 2, Layout::MIN_HEIGHT + 2);
    if width < min_width || height < min_height {
        return Err(TuiError::RenderError(format!(
            "current {}x{}, minimum {}x{}",
            width, height, min_width, min_height
        )));
    }

    let mut guard = TerminalGuard::new()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    info!("dashboard started");

    loop {
        app.tick();

        let size = terminal.size()?;
        let area = Rect::new(0, 0, size.width, size.height);
        terminal.draw(|f| {
            let layout = Layout::calculate(area);
            crate::tui::render::render(f, &app, &layout);
        })?;

        if event::poll(POLL_INTERVAL)? {
            // Press only; Windows also reports releases
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press && handle_key_event(&mut app, key_event) {
                    break;
                }
            }
        }
    }

    guard.restore()?;
    info!("dashboard closed");
    Ok(())
}

/// Apply one key press. Returns `true` when the app should quit.
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> bool {
    match app.mode {
        Mode::Help => {
            if key.code == KeyCode::Esc || app.keymap.is(&key, Action::Help) {
                app.mode = Mode::View;
            }
            false
        }
        Mode::Search => {
            handle_search_mode(app, key);
            false
        }
        Mode::Form => {
            handle_form_mode(app, key);
            false
        }
        Mode::ConfirmDelete => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => app.confirm_delete(),
                KeyCode::Char('n') | KeyCode::Esc => app.cancel_delete(),
                _ => {}
            }
            false
        }
        Mode::View => handle_view_mode(app, key),
    }
}

fn handle_search_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => app.mode = Mode::View,
        KeyCode::Backspace => {
            app.filter.search.pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => app.filter.search.push(c),
        _ => return,
    }
    app.clamp_selections();
}

fn handle_form_mode(app: &mut App, key: KeyEvent) {
    if app.keymap.is(&key, Action::Save) || key.code == KeyCode::Enter {
        app.save_form();
        return;
    }

    let Some(form) = app.form.as_mut() else {
        app.mode = Mode::View;
        return;
    };

    match key.code {
        KeyCode::Esc => app.cancel_form(),
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.prev_field(),
        KeyCode::Char('z') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(editor) = form.current_editor_mut() {
                editor.undo();
            }
        }
        code => {
            let Some(editor) = form.current_editor_mut() else {
                return;
            };
            match code {
                KeyCode::Left => editor.move_cursor_left(),
                KeyCode::Right => editor.move_cursor_right(),
                KeyCode::Home => editor.move_cursor_home(),
                KeyCode::End => editor.move_cursor_end(),
                KeyCode::Backspace => editor.delete_char(),
                KeyCode::Delete => editor.delete_forward(),
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => editor.insert_char(c),
                _ => {}
            }
        }
    }
}

fn handle_view_mode(app: &mut App, key: KeyEvent) -> bool {
    if key.code == KeyCode::Esc && app.drag.is_active() {
        app.drag.cancel();
        app.set_status_message("جابه‌جایی لغو شد");
        return false;
    }

    let Some(action) = app.keymap.action(&key) else {
        if key.code == KeyCode::Enter {
            app.open_edit_form();
        }
        return false;
    };
    debug!(?action, tab = ?app.current_tab, "key action");

    match action {
        Action::Quit => return true,
        Action::Help => app.mode = Mode::Help,
        Action::TabNext => app.current_tab = app.current_tab.next(),
        Action::TabPrev => app.current_tab = app.current_tab.prev(),
        Action::GoTab(tab) => app.current_tab = tab,
        Action::New => app.open_new_form(),
        Action::Edit => app.open_edit_form(),
        Action::Delete => app.request_delete(),
        _ => match app.current_tab {
            Tab::Calendar => calendar_action(app, action),
            Tab::Timeline => timeline_action(app, action),
            Tab::Sections => sections_action(app, action),
        },
    }
    false
}

fn calendar_action(app: &mut App, action: Action) {
    match action {
        Action::PrevMonth => app.shift_month(-1),
        Action::NextMonth => app.shift_month(1),
        Action::DayPrev => app.move_day(-1),
        Action::DayNext => app.move_day(1),
        Action::WeekPrev => app.move_day(-7),
        Action::WeekNext => app.move_day(7),
        Action::ListUp => app.select_note(-1),
        Action::ListDown => app.select_note(1),
        Action::ToggleCalendar => app.toggle_calendar(),
        Action::GoToday => app.go_today(),
        _ => {}
    }
}

fn timeline_action(app: &mut App, action: Action) {
    match action {
        Action::ListUp | Action::WeekPrev => app.select_event(-1),
        Action::ListDown | Action::WeekNext => app.select_event(1),
        Action::PrevMonth => app.select_event(-5),
        Action::NextMonth => app.select_event(5),
        Action::Search => app.mode = Mode::Search,
        Action::CycleView => app.cycle_view_mode(),
        Action::Filter(status) => app.toggle_status_filter(status),
        Action::MarkDrag => app.mark_or_drop(),
        _ => {}
    }
}

fn sections_action(app: &mut App, action: Action) {
    match action {
        Action::ListUp | Action::WeekPrev => app.select_section(-1),
        Action::ListDown | Action::WeekNext => app.select_section(1),
        Action::ToggleSection => app.toggle_selected_section(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, Database};
    use chrono::NaiveDate;

    fn app() -> App {
        let today = NaiveDate::from_ymd_opt(2023, 9, 6).unwrap();
        App::with_today(Config::default(), Database::open_in_memory().unwrap(), today).unwrap()
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn default_bindings_map_to_actions() {
        let keymap = KeyMap::from_config(&KeyBindings::default()).unwrap();
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(keymap.action(&key(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(keymap.action(&key(KeyCode::PageUp)), Some(Action::PrevMonth));
        assert_eq!(
            keymap.action(&key(KeyCode::F(6))),
            Some(Action::Filter(EventStatus::Ongoing))
        );
        assert_eq!(keymap.action(&key(KeyCode::Char('2'))), Some(Action::GoTab(Tab::Timeline)));
        assert!(keymap.is(&KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL), Action::Save));
        assert_eq!(keymap.action(&key(KeyCode::Char('s'))), None);
    }

    #[test]
    fn invalid_binding_is_reported() {
        let keys = KeyBindings {
            quit: "Hyper+q".to_string(),
            ..KeyBindings::default()
        };
        assert!(matches!(KeyMap::from_config(&keys), Err(TuiError::KeyBindingError(_))));
    }

    #[test]
    fn quit_and_tab_switching() {
        let mut app = app();
        assert!(!press(&mut app, KeyCode::Tab));
        assert_eq!(app.current_tab, Tab::Timeline);
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.current_tab, Tab::Sections);
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn typing_in_form_does_not_trigger_bindings() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.mode, Mode::Form);
        type_text(&mut app, "quiet note");
        assert_eq!(app.mode, Mode::Form);
        handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));

        assert_eq!(app.mode, Mode::View);
        let notes = app.day_notes();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "quiet note");
    }

    #[test]
    fn search_edits_timeline_filter() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.mode, Mode::Search);
        type_text(&mut app, "سایت");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::View);
        assert_eq!(app.filter.search, "سای");
    }

    #[test]
    fn arrows_move_the_selected_day() {
        let mut app = app();
        press(&mut app, KeyCode::Right);
        assert_eq!(app.selected_day, 16);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected_day, 23);
        press(&mut app, KeyCode::PageDown);
        assert_eq!((app.view_month, app.selected_day), (7, 23));
    }

    #[test]
    fn delete_asks_for_confirmation() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        type_text(&mut app, "x");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.mode, Mode::ConfirmDelete);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.day_notes().len(), 1);
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.day_notes().is_empty());
    }
}
