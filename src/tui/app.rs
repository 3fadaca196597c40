use chrono::{Local, NaiveDate, TimeDelta};
use ratatui::widgets::ListState;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use crate::calendar::{self, CalendarDate, CalendarSystem, MonthGrid, grid};
use crate::dashboard::Dashboard;
use crate::models::{EventStatus, Note, NoteType, TimelineEvent};
use crate::notes::NoteDraft;
use crate::ranking::rank_notes;
use crate::timeline::{self, DragState, EventFilter, ViewMode};
use crate::tui::error::TuiError;
use crate::tui::events::KeyMap;
use crate::tui::widgets::editor::LineEditor;
use crate::{Config, Database};

/// How often the "today" reference is re-read from the clock
pub const TODAY_REFRESH: Duration = Duration::from_secs(60);
const STATUS_MESSAGE_TIMEOUT: Duration = Duration::from_secs(4);
const DEFAULT_IMPORTANCE: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Calendar,
    Timeline,
    Sections,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Calendar, Tab::Timeline, Tab::Sections];

    pub fn index(self) -> usize {
        match self {
            Tab::Calendar => 0,
            Tab::Timeline => 1,
            Tab::Sections => 2,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Tab::Calendar => "تقویم",
            Tab::Timeline => "نقشه راه",
            Tab::Sections => "بخش‌های کسب‌وکار",
        }
    }

    pub fn next(self) -> Self {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    View,
    Help,
    Search,
    Form,
    ConfirmDelete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Note,
    Event,
    Section,
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub editor: LineEditor,
}

impl FormField {
    fn new(label: &'static str, value: &str) -> Self {
        Self {
            label,
            editor: LineEditor::from_string(value),
        }
    }
}

/// Edit form shared by notes, events and sections; fields are plain text
/// and are validated when the form is saved.
#[derive(Debug, Clone)]
pub struct ItemForm {
    pub kind: FormKind,
    pub fields: Vec<FormField>,
    pub current_field: usize,
    /// `None` for new notes and sections
    pub editing_id: Option<String>,
    /// ISO day a note form belongs to
    pub date: String,
    /// Event being edited; fields the form does not show are kept from it
    base_event: Option<TimelineEvent>,
}

impl ItemForm {
    pub fn note(date: &str, note: Option<&Note>) -> Self {
        let importance = note.map_or(DEFAULT_IMPORTANCE, |n| n.importance).to_string();
        let note_type = note.map_or(NoteType::default(), |n| n.note_type.clone());
        Self {
            kind: FormKind::Note,
            fields: vec![
                FormField::new("عنوان", note.map_or("", |n| n.title.as_str())),
                FormField::new("توضیحات", note.map_or("", |n| n.content.as_str())),
                FormField::new("اهمیت (0-100)", &importance),
                FormField::new("نوع (meeting/task/deadline/event/reminder)", note_type.as_str()),
            ],
            current_field: 0,
            editing_id: note.map(|n| n.id.clone()),
            date: date.to_string(),
            base_event: None,
        }
    }

    pub fn event(event: &TimelineEvent) -> Self {
        Self {
            kind: FormKind::Event,
            fields: vec![
                FormField::new("عنوان", &event.title),
                FormField::new("تاریخ (YYYY/MM/DD)", &event.date),
                FormField::new("توضیحات", &event.description),
                FormField::new("وضعیت (completed/ongoing/planned)", event.status.as_str()),
                FormField::new("اولویت (low/medium/high)", event.priority.map_or("", |p| p.as_str())),
                FormField::new("مسئول", event.owner.as_deref().unwrap_or("")),
                FormField::new("یادآوری (YYYY/MM/DD)", event.reminder_date.as_deref().unwrap_or("")),
            ],
            current_field: 0,
            editing_id: Some(event.id.clone()),
            date: String::new(),
            base_event: Some(event.clone()),
        }
    }

    pub fn section() -> Self {
        Self {
            kind: FormKind::Section,
            fields: vec![
                FormField::new("نام بخش", ""),
                FormField::new("آیکون", "Star"),
                FormField::new("درآمد", ""),
            ],
            current_field: 0,
            editing_id: None,
            date: String::new(),
            base_event: None,
        }
    }

    pub fn title(&self) -> &'static str {
        match (self.kind, self.editing_id.is_some()) {
            (FormKind::Note, false) => "یادداشت جدید",
            (FormKind::Note, true) => "ویرایش یادداشت",
            (FormKind::Event, _) => "رویداد",
            (FormKind::Section, _) => "بخش جدید",
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % self.fields.len();
    }

    pub fn prev_field(&mut self) {
        self.current_field = (self.current_field + self.fields.len() - 1) % self.fields.len();
    }

    pub fn current_editor_mut(&mut self) -> Option<&mut LineEditor> {
        self.fields.get_mut(self.current_field).map(|f| &mut f.editor)
    }

    fn value(&self, index: usize) -> String {
        self.fields
            .get(index)
            .map(|f| f.editor.text().trim().to_string())
            .unwrap_or_default()
    }

    pub fn to_note_draft(&self) -> Result<NoteDraft, String> {
        let importance = match self.value(2) {
            v if v.is_empty() => DEFAULT_IMPORTANCE,
            v => v
                .parse::<u8>()
                .ok()
                .filter(|i| *i <= 100)
                .ok_or_else(|| format!("اهمیت نامعتبر: {}", v))?,
        };
        let note_type = match self.value(3) {
            v if v.is_empty() => NoteType::default(),
            v => NoteType::from(v.to_lowercase()),
        };
        Ok(NoteDraft {
            id: self.editing_id.clone(),
            date: self.date.clone(),
            title: self.value(0),
            content: self.value(1),
            importance,
            note_type,
        })
    }

    pub fn to_event(&self) -> Result<TimelineEvent, String> {
        let mut event = self
            .base_event
            .clone()
            .ok_or_else(|| "فرم رویداد نیست".to_string())?;

        let date = self.value(1);
        event.date = calendar::parse_persian(&date)
            .map_err(|_| format!("تاریخ نامعتبر: {}", date))?
            .to_string();
        event.title = self.value(0);
        event.description = self.value(2);
        event.status = self.value(3).parse::<EventStatus>()?;
        event.priority = match self.value(4) {
            v if v.is_empty() => None,
            v => Some(v.parse()?),
        };
        event.owner = Some(self.value(5)).filter(|v| !v.is_empty());
        event.reminder_date = match self.value(6) {
            v if v.is_empty() => None,
            v => Some(
                calendar::parse_persian(&v)
                    .map_err(|_| format!("تاریخ نامعتبر: {}", v))?
                    .to_string(),
            ),
        };
        Ok(event)
    }

    pub fn to_section(&self) -> Result<(String, String, f64), String> {
        let revenue = self.value(2);
        let revenue = revenue
            .parse::<f64>()
            .map_err(|_| format!("درآمد نامعتبر: {}", revenue))?;
        Ok((self.value(0), self.value(1), revenue))
    }
}

pub struct App {
    pub config: Config,
    pub keymap: KeyMap,
    pub database: Database,
    pub dashboard: Dashboard,
    pub current_tab: Tab,
    pub mode: Mode,

    pub today: NaiveDate,
    last_today_check: Instant,

    pub system: CalendarSystem,
    pub view_year: i32,
    pub view_month: u32,
    pub selected_day: u32,
    pub note_index: usize,

    pub filter: EventFilter,
    pub view_mode: ViewMode,
    pub drag: DragState,
    pub event_list_state: ListState,
    pub section_list_state: ListState,

    pub form: Option<ItemForm>,
    pub pending_delete: Option<String>,
    pub status_message: Option<String>,
    status_message_time: Option<Instant>,
}

impl App {
    pub fn new(config: Config, database: Database) -> Result<Self, TuiError> {
        Self::with_today(config, database, Local::now().date_naive())
    }

    pub fn with_today(config: Config, database: Database, today: NaiveDate) -> Result<Self, TuiError> {
        let keymap = KeyMap::from_config(&config.key_bindings)?;
        let dashboard = Dashboard::load(&database)?;
        let system = config.default_calendar;
        let shown = CalendarDate::from_naive(today).to_system(system)?;

        let mut app = Self {
            view_mode: config.timeline_view_mode,
            config,
            keymap,
            database,
            dashboard,
            current_tab: Tab::Calendar,
            mode: Mode::View,
            today,
            last_today_check: Instant::now(),
            system,
            view_year: shown.year,
            view_month: shown.month,
            selected_day: shown.day,
            note_index: 0,
            filter: EventFilter::default(),
            drag: DragState::default(),
            event_list_state: ListState::default(),
            section_list_state: ListState::default(),
            form: None,
            pending_delete: None,
            status_message: None,
            status_message_time: None,
        };
        app.clamp_selections();
        Ok(app)
    }

    pub fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_message_time = Some(Instant::now());
    }

    pub fn check_status_message_timeout(&mut self) {
        if let Some(time) = self.status_message_time {
            if time.elapsed() >= STATUS_MESSAGE_TIMEOUT {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    /// Periodic housekeeping between frames
    pub fn tick(&mut self) {
        if self.last_today_check.elapsed() >= TODAY_REFRESH {
            self.last_today_check = Instant::now();
            self.refresh_today(Local::now().date_naive());
        }
        self.check_status_message_timeout();
    }

    /// Move the today reference; returns whether the day changed
    pub fn refresh_today(&mut self, now: NaiveDate) -> bool {
        if now == self.today {
            return false;
        }
        info!(from = %self.today, to = %now, "day changed");
        self.today = now;
        true
    }

    /// Write the dashboard back. Failures are reported in the status bar.
    pub fn persist(&mut self) {
        if let Err(e) = self.dashboard.save(&mut self.database) {
            error!(error = %e, "failed to save dashboard");
            self.set_status_message(format!("ذخیره نشد: {}", e));
        }
    }

    // Calendar

    pub fn grid(&self) -> Result<MonthGrid, calendar::DateError> {
        MonthGrid::build(self.view_year, self.view_month as i32, self.system)
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        CalendarDate::new(self.system, self.view_year, self.view_month, self.selected_day)
            .and_then(|d| d.to_naive())
            .ok()
    }

    pub fn selected_iso(&self) -> Option<String> {
        self.selected_date().map(calendar::format_iso)
    }

    /// Notes of the selected day, user and timeline alike
    pub fn day_notes(&self) -> Vec<Note> {
        let Some(iso) = self.selected_iso() else {
            return Vec::new();
        };
        let notes = self.dashboard.calendar_notes();
        notes.by_date(&iso).into_iter().cloned().collect()
    }

    /// The viewed month's notes, upcoming first
    pub fn month_agenda(&self) -> Vec<Note> {
        let notes = self.dashboard.calendar_notes();
        rank_notes(notes.in_month(self.view_year, self.view_month, self.system), self.today)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn selected_note(&self) -> Option<Note> {
        self.day_notes().into_iter().nth(self.note_index)
    }

    pub fn select_note(&mut self, delta: i32) {
        let count = self.day_notes().len();
        self.note_index = step_index(self.note_index, delta, count);
    }

    /// Jump the calendar to the day containing `date`
    pub fn go_to_date(&mut self, date: NaiveDate) {
        match CalendarDate::from_naive(date).to_system(self.system) {
            Ok(shown) => {
                self.view_year = shown.year;
                self.view_month = shown.month;
                self.selected_day = shown.day;
                self.note_index = 0;
            }
            Err(e) => self.set_status_message(format!("تاریخ خارج از محدوده: {}", e)),
        }
    }

    pub fn go_today(&mut self) {
        self.go_to_date(self.today);
    }

    pub fn move_day(&mut self, delta: i64) {
        if let Some(date) = self.selected_date() {
            self.go_to_date(date + TimeDelta::days(delta));
        }
    }

    /// Show the neighbouring month, keeping the selected day where it fits
    pub fn shift_month(&mut self, delta: i32) {
        let shifted = grid::shift_month(self.view_year, self.view_month as i32, delta)
            .and_then(|(year, month)| Ok((year, month, calendar::days_in_month(self.system, year, month)?)));
        match shifted {
            Ok((year, month, length)) => {
                self.view_year = year;
                self.view_month = month;
                self.selected_day = self.selected_day.clamp(1, length);
                self.note_index = 0;
            }
            Err(e) => self.set_status_message(format!("ماه خارج از محدوده: {}", e)),
        }
    }

    /// Switch calendars, staying on the same day
    pub fn toggle_calendar(&mut self) {
        let date = self.selected_date().unwrap_or(self.today);
        self.system = self.system.toggle();
        self.go_to_date(date);
        debug!(system = %self.system, "calendar toggled");
    }

    // Timeline

    pub fn visible_events(&self) -> Vec<&TimelineEvent> {
        timeline::filter_events(&self.dashboard.events, &self.filter)
    }

    pub fn selected_event(&self) -> Option<&TimelineEvent> {
        let index = self.event_list_state.selected()?;
        self.visible_events().get(index).copied()
    }

    pub fn select_event(&mut self, delta: i32) {
        let count = self.visible_events().len();
        let current = self.event_list_state.selected().unwrap_or(0);
        self.event_list_state
            .select((count > 0).then(|| step_index(current, delta, count)));
    }

    pub fn toggle_status_filter(&mut self, status: EventStatus) {
        self.filter.toggle_status(status);
        let shown = if self.filter.statuses.contains(&status) { "نمایش" } else { "پنهان" };
        self.set_status_message(format!("{}: {}", status.label(), shown));
        self.clamp_selections();
    }

    pub fn cycle_view_mode(&mut self) {
        self.view_mode = self.view_mode.next();
    }

    /// First press marks the selected event, the second press on another
    /// event swaps their dates. Pressing on the marked event cancels.
    pub fn mark_or_drop(&mut self) {
        let Some(id) = self.selected_event().map(|e| e.id.clone()) else {
            return;
        };

        if !self.drag.is_active() {
            self.drag.start(id);
            self.set_status_message("رویداد مقصد را انتخاب کنید");
            return;
        }
        if self.drag.dragged.as_deref() == Some(id.as_str()) {
            self.drag.cancel();
            self.set_status_message("جابه‌جایی لغو شد");
            return;
        }

        self.drag.over(id.clone());
        if self.drag.drop_on(&mut self.dashboard.events, &id) {
            self.persist();
            self.set_status_message("تاریخ رویدادها جابه‌جا شد");
        } else {
            self.set_status_message("جابه‌جایی انجام نشد");
        }
        self.clamp_selections();
    }

    // Sections

    pub fn select_section(&mut self, delta: i32) {
        let count = self.dashboard.sections.len();
        let current = self.section_list_state.selected().unwrap_or(0);
        self.section_list_state
            .select((count > 0).then(|| step_index(current, delta, count)));
    }

    pub fn toggle_selected_section(&mut self) {
        let Some(index) = self.section_list_state.selected() else {
            return;
        };
        if let Some(status) = self.dashboard.sections.toggle(index) {
            self.persist();
            self.set_status_message(format!("وضعیت: {}", status.label()));
        }
    }

    pub fn clamp_selections(&mut self) {
        let events = self.visible_events().len();
        let selected = self.event_list_state.selected().unwrap_or(0);
        self.event_list_state
            .select((events > 0).then(|| selected.min(events - 1)));

        let sections = self.dashboard.sections.len();
        let selected = self.section_list_state.selected().unwrap_or(0);
        self.section_list_state
            .select((sections > 0).then(|| selected.min(sections - 1)));

        let notes = self.day_notes().len();
        self.note_index = self.note_index.min(notes.saturating_sub(1));
    }

    // Forms

    pub fn open_new_form(&mut self) {
        let form = match self.current_tab {
            Tab::Calendar => match self.selected_iso() {
                Some(iso) => ItemForm::note(&iso, None),
                None => return,
            },
            Tab::Timeline => match timeline::new_event(self.today) {
                Ok(event) => ItemForm::event(&event),
                Err(e) => {
                    self.set_status_message(format!("رویداد ساخته نشد: {}", e));
                    return;
                }
            },
            Tab::Sections => ItemForm::section(),
        };
        self.form = Some(form);
        self.mode = Mode::Form;
    }

    pub fn open_edit_form(&mut self) {
        let form = match self.current_tab {
            Tab::Calendar => self
                .selected_note()
                .map(|note| ItemForm::note(&note.date, Some(&note))),
            Tab::Timeline => self.selected_event().map(ItemForm::event),
            Tab::Sections => None,
        };
        if let Some(form) = form {
            self.form = Some(form);
            self.mode = Mode::Form;
        }
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
        self.mode = Mode::View;
    }

    /// Validate and store the open form. Invalid input keeps the form open.
    pub fn save_form(&mut self) {
        let Some(form) = self.form.as_ref() else {
            return;
        };

        let saved = match form.kind {
            FormKind::Note => form
                .to_note_draft()
                .map(|draft| self.dashboard.save_note(draft).is_some()),
            FormKind::Event => form
                .to_event()
                .map(|event| timeline::save_event(&mut self.dashboard.events, event)),
            FormKind::Section => form.to_section().map(|(name, icon, revenue)| {
                self.dashboard.sections.add(&name, &icon, revenue).is_some()
            }),
        };

        match saved {
            Ok(true) => {
                self.persist();
                self.cancel_form();
                self.clamp_selections();
                self.set_status_message("ذخیره شد");
            }
            Ok(false) => self.set_status_message("عنوان الزامی است"),
            Err(message) => self.set_status_message(message),
        }
    }

    // Deletion

    pub fn request_delete(&mut self) {
        let id = match self.current_tab {
            Tab::Calendar => match self.selected_note() {
                Some(note) if crate::adapter::is_timeline_note(&note) => {
                    self.set_status_message("این یادداشت از نقشه راه است؛ رویداد را ویرایش کنید");
                    return;
                }
                Some(note) => note.id,
                None => return,
            },
            Tab::Timeline => match self.selected_event() {
                Some(event) => event.id.clone(),
                None => return,
            },
            Tab::Sections => match self
                .section_list_state
                .selected()
                .and_then(|i| self.dashboard.sections.sections.get(i))
            {
                Some(section) => section.id.clone(),
                None => return,
            },
        };
        self.pending_delete = Some(id);
        self.mode = Mode::ConfirmDelete;
    }

    /// Title of the item awaiting delete confirmation
    pub fn pending_delete_label(&self) -> Option<String> {
        let id = self.pending_delete.as_deref()?;
        match self.current_tab {
            Tab::Calendar => self.dashboard.notes.get(id).map(|n| n.title.clone()),
            Tab::Timeline => self
                .dashboard
                .events
                .iter()
                .find(|e| e.id == id)
                .map(|e| e.title.clone()),
            Tab::Sections => self
                .dashboard
                .sections
                .sections
                .iter()
                .find(|s| s.id == id)
                .map(|s| s.name.clone()),
        }
    }

    pub fn confirm_delete(&mut self) {
        let Some(id) = self.pending_delete.take() else {
            self.mode = Mode::View;
            return;
        };

        let removed = match self.current_tab {
            Tab::Calendar => self.dashboard.delete_note(&id),
            Tab::Timeline => {
                let before = self.dashboard.events.len();
                self.dashboard.events.retain(|e| e.id != id);
                before != self.dashboard.events.len()
            }
            Tab::Sections => self.dashboard.sections.delete(&id),
        };

        if removed {
            self.persist();
            self.set_status_message("حذف شد");
        }
        self.mode = Mode::View;
        self.clamp_selections();
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.mode = Mode::View;
    }
}

/// Move `current` by `delta` inside `0..count`, clamping at both ends
fn step_index(current: usize, delta: i32, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let next = current as i64 + delta as i64;
    next.clamp(0, count as i64 - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::KeyValueStore;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 9, 6).unwrap() // 1402/06/15
    }

    fn app() -> App {
        App::with_today(Config::default(), Database::open_in_memory().unwrap(), today()).unwrap()
    }

    fn seeded() -> App {
        let mut app = app();
        app.dashboard.seed_sample_roadmap().unwrap();
        app.clamp_selections();
        app
    }

    fn type_into(form: &mut ItemForm, field: usize, text: &str) {
        let editor = &mut form.fields[field].editor;
        editor.clear();
        for c in text.chars() {
            editor.insert_char(c);
        }
    }

    #[test]
    fn starts_on_today_in_persian() {
        let app = app();
        assert_eq!((app.view_year, app.view_month, app.selected_day), (1402, 6, 15));
        assert_eq!(app.selected_iso().as_deref(), Some("2023-09-06"));
    }

    #[test]
    fn month_navigation_clamps_day() {
        let mut app = app();
        app.selected_day = 31;
        app.shift_month(1); // مهر has 30 days
        assert_eq!((app.view_year, app.view_month, app.selected_day), (1402, 7, 30));
        app.shift_month(-7);
        assert_eq!((app.view_year, app.view_month), (1401, 12));
    }

    #[test]
    fn day_movement_crosses_months() {
        let mut app = app();
        app.selected_day = 31;
        app.move_day(1);
        assert_eq!((app.view_month, app.selected_day), (7, 1));
        app.move_day(-7);
        assert_eq!((app.view_month, app.selected_day), (6, 25));
    }

    #[test]
    fn toggling_calendar_keeps_the_day() {
        let mut app = app();
        app.toggle_calendar();
        assert_eq!(app.system, CalendarSystem::Gregorian);
        assert_eq!((app.view_year, app.view_month, app.selected_day), (2023, 9, 6));
        app.toggle_calendar();
        assert_eq!((app.view_year, app.view_month, app.selected_day), (1402, 6, 15));
    }

    #[test]
    fn today_refresh_reports_change() {
        let mut app = app();
        assert!(!app.refresh_today(today()));
        assert!(app.refresh_today(today().succ_opt().unwrap()));
        app.go_today();
        assert_eq!(app.selected_day, 16);
    }

    #[test]
    fn note_form_saves_and_persists() {
        let mut app = app();
        app.open_new_form();
        let form = app.form.as_mut().unwrap();
        type_into(form, 0, "جلسه با سرمایه‌گذار");
        type_into(form, 2, "85");
        type_into(form, 3, "meeting");
        app.save_form();

        assert_eq!(app.mode, Mode::View);
        let notes = app.day_notes();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].importance, 85);
        assert_eq!(notes[0].note_type, NoteType::Meeting);
        assert!(app.database.get(crate::dashboard::NOTES_KEY).unwrap().is_some());
    }

    #[test]
    fn invalid_form_stays_open() {
        let mut app = app();
        app.open_new_form();
        type_into(app.form.as_mut().unwrap(), 0, "x");
        type_into(app.form.as_mut().unwrap(), 2, "300");
        app.save_form();
        assert_eq!(app.mode, Mode::Form);

        type_into(app.form.as_mut().unwrap(), 0, " ");
        type_into(app.form.as_mut().unwrap(), 2, "10");
        app.save_form();
        assert_eq!(app.mode, Mode::Form);
        assert!(app.dashboard.notes.is_empty());
    }

    #[test]
    fn new_event_form_adds_event() {
        let mut app = app();
        app.current_tab = Tab::Timeline;
        app.open_new_form();
        let form = app.form.as_mut().unwrap();
        assert_eq!(form.fields[1].editor.text(), "1402/06/15");
        type_into(form, 4, "high");
        app.save_form();

        assert_eq!(app.dashboard.events.len(), 1);
        let event = &app.dashboard.events[0];
        assert_eq!(event.title, "رویداد جدید");
        assert_eq!(event.status, EventStatus::Planned);
        assert_eq!(app.event_list_state.selected(), Some(0));
    }

    #[test]
    fn mark_and_drop_swaps_dates() {
        let mut app = seeded();
        app.current_tab = Tab::Timeline;
        app.event_list_state.select(Some(0));
        let first = app.selected_event().unwrap().clone();
        app.mark_or_drop();
        assert!(app.drag.is_active());

        app.select_event(1);
        let second = app.selected_event().unwrap().clone();
        app.mark_or_drop();
        assert!(!app.drag.is_active());

        let find = |id: &str| app.dashboard.events.iter().find(|e| e.id == id).unwrap().date.clone();
        assert_eq!(find(&first.id), second.date);
        assert_eq!(find(&second.id), first.date);
    }

    #[test]
    fn filter_toggle_clamps_selection() {
        let mut app = seeded();
        app.event_list_state.select(Some(7));
        app.toggle_status_filter(EventStatus::Planned);
        let visible = app.visible_events().len();
        assert!(app.event_list_state.selected().unwrap() < visible);
    }

    #[test]
    fn timeline_notes_are_not_deleted_from_calendar() {
        let mut app = seeded();
        // 1402/06/15 is the company founding event
        assert!(crate::adapter::is_timeline_note(&app.selected_note().unwrap()));
        app.request_delete();
        assert_eq!(app.mode, Mode::View);
        assert!(app.pending_delete.is_none());
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut app = app();
        app.current_tab = Tab::Sections;
        app.open_new_form();
        let form = app.form.as_mut().unwrap();
        type_into(form, 0, "طراحی");
        type_into(form, 2, "1200");
        app.save_form();
        app.clamp_selections();
        assert_eq!(app.dashboard.sections.len(), 1);

        app.request_delete();
        assert_eq!(app.mode, Mode::ConfirmDelete);
        assert_eq!(app.pending_delete_label().as_deref(), Some("طراحی"));
        app.cancel_delete();
        assert_eq!(app.dashboard.sections.len(), 1);

        app.request_delete();
        app.confirm_delete();
        assert!(app.dashboard.sections.is_empty());
    }

    #[test]
    fn tabs_cycle() {
        assert_eq!(Tab::Calendar.next(), Tab::Timeline);
        assert_eq!(Tab::Calendar.prev(), Tab::Sections);
        assert_eq!(step_index(0, -1, 3), 0);
        assert_eq!(step_index(2, 5, 3), 2);
    }
}
