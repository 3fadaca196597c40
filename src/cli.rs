use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::io::Write;
use thiserror::Error;
use tracing::info;

use crate::activity::{self, MetricDraft, TimeRange};
use crate::analytics::TimelineAnalytics;
use crate::calendar::{self, CalendarSystem, DateError, MonthGrid, grid};
use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::database::DatabaseError;
use crate::models::{EventStatus, MetricUnit, NoteType, Priority};
use crate::notes::{ImportanceBand, NoteDraft};
use crate::ranking::rank_notes;
use crate::store::{KeyValueStore, StoreError};
use crate::timeline::{self, EventFilter, ViewMode};

#[derive(Parser)]
#[command(name = "taqvim")]
#[command(about = "Persian calendar, notes and roadmap dashboard for the terminal")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Use development mode (separate config, database and log)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Launch the interactive dashboard (default if no subcommand)
    Tui,
    /// Print a month grid, marking days that have notes
    Month {
        year: Option<i32>,
        month: Option<u32>,
        /// persian or gregorian; defaults to the configured calendar
        #[arg(long)]
        calendar: Option<CalendarSystem>,
    },
    /// Convert between YYYY/MM/DD (Persian) and YYYY-MM-DD (Gregorian)
    Convert { date: String },
    /// List a month's notes, upcoming first
    Notes {
        year: Option<i32>,
        month: Option<u32>,
        #[arg(long)]
        calendar: Option<CalendarSystem>,
    },
    /// Add a calendar note
    AddNote {
        /// YYYY-MM-DD or Persian YYYY/MM/DD
        date: String,
        title: String,
        #[arg(long)]
        content: Option<String>,
        /// 0-100
        #[arg(long, default_value_t = 50)]
        importance: u8,
        /// meeting, task, deadline, event or reminder
        #[arg(long = "type")]
        note_type: Option<NoteType>,
    },
    /// Edit a note; timeline notes edit their event
    EditNote {
        id: String,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        importance: Option<u8>,
        #[arg(long = "type")]
        note_type: Option<NoteType>,
    },
    /// Delete a user note
    DeleteNote { id: String },
    /// Show the roadmap grouped by month, quarter or year
    Timeline {
        /// Repeatable; all statuses when omitted
        #[arg(long)]
        status: Vec<EventStatus>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        view: Option<ViewMode>,
        /// Show each event's dependencies
        #[arg(long)]
        deps: bool,
    },
    /// Add a roadmap event dated today unless --date is given
    AddEvent {
        title: String,
        /// Persian YYYY/MM/DD or YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<EventStatus>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        owner: Option<String>,
        #[arg(long)]
        reminder: Option<String>,
    },
    /// Exchange the dates of two events
    SwapEvents { dragged: String, target: String },
    /// Load the demo roadmap
    Seed {
        /// Replace an existing roadmap
        #[arg(long)]
        force: bool,
    },
    /// Roadmap summary figures
    Analytics {
        #[arg(long)]
        json: bool,
    },
    /// List business sections with revenue shares
    Sections,
    AddSection {
        name: String,
        revenue: f64,
        #[arg(long, default_value = "Star")]
        icon: String,
    },
    ToggleSection { id: String },
    DeleteSection { id: String },
    /// Remove every section
    ResetSections,
    /// List activity metrics, or print the chart series for a time range
    Metrics {
        /// week, month, 3months, 6months, year or START..END
        #[arg(long)]
        range: Option<TimeRange>,
        #[arg(long)]
        toggle: Option<String>,
        #[arg(long)]
        remove: Option<String>,
        /// Print the zero-filled series as JSON
        #[arg(long)]
        series: bool,
    },
    AddMetric {
        name: String,
        english_name: String,
        #[arg(long, default_value = "number")]
        unit: MetricUnit,
        #[arg(long, default_value = "#000000")]
        color: String,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),
    #[error("Storage error: {0}")]
    StoreError(#[from] StoreError),
    #[error("Date error: {0}")]
    DateError(#[from] DateError),
    #[error("Output error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidArgument(String),
}

/// Run one non-interactive command against the store.
/// Mutating commands load the dashboard, change it and save it back.
pub fn run(
    command: Commands,
    store: &mut dyn KeyValueStore,
    config: &Config,
    today: NaiveDate,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let mut dashboard = Dashboard::load(store)?;
    let calendar_of = |c: Option<CalendarSystem>| c.unwrap_or(config.default_calendar);

    let changed = match command {
        Commands::Tui => {
            return Err(CliError::InvalidArgument(
                "the dashboard is started by the binary".to_string(),
            ));
        }
        Commands::Month { year, month, calendar } => {
            handle_month(&dashboard, year, month, calendar_of(calendar), today, out)?;
            false
        }
        Commands::Convert { date } => {
            handle_convert(&date, out)?;
            false
        }
        Commands::Notes { year, month, calendar } => {
            handle_notes(&dashboard, year, month, calendar_of(calendar), today, out)?;
            false
        }
        Commands::AddNote { date, title, content, importance, note_type } => {
            let draft = NoteDraft {
                id: None,
                date: parse_note_date(&date)?,
                title,
                content: content.unwrap_or_default(),
                importance,
                note_type: note_type.unwrap_or_default(),
            };
            handle_save_note(&mut dashboard, draft, out)?
        }
        Commands::EditNote { id, date, title, content, importance, note_type } => {
            let note = dashboard
                .calendar_notes()
                .get(&id)
                .cloned()
                .ok_or_else(|| CliError::NotFound(format!("note {}", id)))?;
            let draft = NoteDraft {
                id: Some(note.id),
                date: match date {
                    Some(date) => parse_note_date(&date)?,
                    None => note.date,
                },
                title: title.unwrap_or(note.title),
                content: content.unwrap_or(note.content),
                importance: importance.unwrap_or(note.importance),
                note_type: note_type.unwrap_or(note.note_type),
            };
            handle_save_note(&mut dashboard, draft, out)?
        }
        Commands::DeleteNote { id } => handle_delete_note(&mut dashboard, &id, out)?,
        Commands::Timeline { status, search, view, deps } => {
            let mut filter = if status.is_empty() {
                EventFilter::default()
            } else {
                EventFilter::only(status)
            };
            if let Some(search) = search {
                filter = filter.with_search(search);
            }
            let view = view.unwrap_or(config.timeline_view_mode);
            handle_timeline(&dashboard, &filter, view, deps, today, out)?;
            false
        }
        Commands::AddEvent { title, date, description, status, priority, owner, reminder } => {
            let mut event = timeline::new_event(today)?;
            event.title = title;
            if let Some(date) = date {
                event.date = parse_event_date(&date)?;
            }
            if let Some(description) = description {
                event.description = description;
            }
            if let Some(status) = status {
                event.status = status;
            }
            event.priority = priority;
            event.owner = owner;
            event.reminder_date = reminder.map(|r| parse_event_date(&r)).transpose()?;

            let id = event.id.clone();
            if timeline::save_event(&mut dashboard.events, event) {
                writeln!(out, "Event created successfully (ID: {})", id)?;
                true
            } else {
                writeln!(out, "Event not saved: the title is empty")?;
                false
            }
        }
        Commands::SwapEvents { dragged, target } => {
            if !timeline::swap_event_dates(&mut dashboard.events, &dragged, &target) {
                return Err(CliError::InvalidArgument(format!(
                    "cannot swap {} and {}: ids must differ and both exist",
                    dragged, target
                )));
            }
            writeln!(out, "Swapped the dates of {} and {}", dragged, target)?;
            true
        }
        Commands::Seed { force } => {
            if !dashboard.events.is_empty() && !force {
                return Err(CliError::InvalidArgument(
                    "the roadmap is not empty; use --force to replace it".to_string(),
                ));
            }
            let count = dashboard.seed_sample_roadmap()?;
            writeln!(out, "Loaded {} sample events", count)?;
            true
        }
        Commands::Analytics { json } => {
            handle_analytics(&dashboard, json, out)?;
            false
        }
        Commands::Sections => {
            handle_sections(&dashboard, out)?;
            false
        }
        Commands::AddSection { name, revenue, icon } => {
            match dashboard.sections.add(&name, &icon, revenue) {
                Some(id) => {
                    writeln!(out, "Section created successfully (ID: {})", id)?;
                    true
                }
                None => {
                    writeln!(out, "Section not saved: a name and a non-zero revenue are required")?;
                    false
                }
            }
        }
        Commands::ToggleSection { id } => {
            let index = section_index(&dashboard, &id)?;
            if let Some(status) = dashboard.sections.toggle(index) {
                writeln!(out, "{} is now {}", id, status.as_str())?;
            }
            true
        }
        Commands::DeleteSection { id } => {
            if !dashboard.sections.delete(&id) {
                return Err(CliError::NotFound(format!("section {}", id)));
            }
            writeln!(out, "Section deleted")?;
            true
        }
        Commands::ResetSections => {
            dashboard.sections.reset(store)?;
            writeln!(out, "All sections removed")?;
            true
        }
        Commands::Metrics { range, toggle, remove, series } => {
            let mut changed = false;
            if let Some(id) = toggle {
                let enabled = dashboard
                    .metrics
                    .toggle(&id)
                    .ok_or_else(|| CliError::NotFound(format!("metric {}", id)))?;
                writeln!(out, "{} {}", id, if enabled { "enabled" } else { "disabled" })?;
                changed = true;
            }
            if let Some(id) = remove {
                if !dashboard.metrics.remove(&id) {
                    return Err(CliError::NotFound(format!("metric {}", id)));
                }
                changed = true;
            }
            handle_metrics(&dashboard, range.unwrap_or_default(), series, today, out)?;
            changed
        }
        Commands::AddMetric { name, english_name, unit, color } => {
            let draft = MetricDraft {
                name,
                english_name,
                unit,
                color,
                ..MetricDraft::default()
            };
            match dashboard.metrics.add_custom(draft) {
                Some(id) => {
                    writeln!(out, "Metric created successfully (ID: {})", id)?;
                    true
                }
                None => {
                    writeln!(out, "Metric not saved: both names are required")?;
                    false
                }
            }
        }
    };

    if changed {
        dashboard.save(store)?;
        info!("dashboard saved after command");
    }
    Ok(())
}

/// Accept either calendar's notation and return the ISO storage form
fn parse_note_date(input: &str) -> Result<String, CliError> {
    if input.contains('/') {
        Ok(calendar::to_calendar_date(input)?)
    } else {
        Ok(calendar::format_iso(calendar::parse_iso(input)?))
    }
}

/// Accept either calendar's notation and return the zero-padded Persian form
fn parse_event_date(input: &str) -> Result<String, CliError> {
    if input.contains('-') {
        Ok(calendar::to_timeline_date(input)?)
    } else {
        Ok(calendar::parse_persian(input)?.to_string())
    }
}

fn view_month(
    year: Option<i32>,
    month: Option<u32>,
    system: CalendarSystem,
    today: NaiveDate,
) -> Result<MonthGrid, CliError> {
    let (current_year, current_month) = grid::current_month(today, system)?;
    let month = month.unwrap_or(current_month);
    let month = i32::try_from(month).map_err(|_| DateError::Invalid(format!("month {}", month)))?;
    Ok(MonthGrid::build(year.unwrap_or(current_year), month, system)?)
}

fn handle_month(
    dashboard: &Dashboard,
    year: Option<i32>,
    month: Option<u32>,
    system: CalendarSystem,
    today: NaiveDate,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let grid = view_month(year, month, system, today)?;
    let notes = dashboard.calendar_notes();

    writeln!(
        out,
        "{} {}",
        system.month_name(grid.month),
        system.display_number(grid.year)
    )?;
    for header in system.weekday_headers() {
        write!(out, "{:>5}", header)?;
    }
    writeln!(out)?;

    for week in grid.weeks() {
        for cell in week {
            let Some(day) = cell else {
                write!(out, "{:>5}", "")?;
                continue;
            };
            let marker = match notes.most_important(&grid.iso_for_day(day)?) {
                Some(note) if note.importance > 60 => "!",
                Some(_) => "*",
                None => " ",
            };
            let number = system.display_number(day);
            if grid::is_today(grid.year, grid.month, day, system, today) {
                write!(out, "{:>4}", format!("[{}]", number))?;
            } else {
                write!(out, "{:>4}", number)?;
            }
            write!(out, "{}", marker)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn handle_convert(date: &str, out: &mut dyn Write) -> Result<(), CliError> {
    if date.contains('/') {
        let iso = calendar::to_calendar_date(date)?;
        let day = calendar::parse_iso(&iso)?;
        writeln!(out, "{}  ({})", iso, calendar::display_date(day, CalendarSystem::Gregorian)?)?;
    } else {
        let day = calendar::parse_iso(date)?;
        writeln!(
            out,
            "{}  ({})",
            calendar::format_persian(day)?,
            calendar::display_date(day, CalendarSystem::Persian)?
        )?;
    }
    Ok(())
}

fn handle_notes(
    dashboard: &Dashboard,
    year: Option<i32>,
    month: Option<u32>,
    system: CalendarSystem,
    today: NaiveDate,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let grid = view_month(year, month, system, today)?;
    let notes = dashboard.calendar_notes();
    let ranked = rank_notes(notes.in_month(grid.year, grid.month, system), today);

    if ranked.is_empty() {
        writeln!(out, "No notes in {} {}", system.month_name(grid.month), grid.year)?;
        return Ok(());
    }

    for note in ranked {
        let date = match note.day() {
            Some(day) => calendar::display_date(day, system)?,
            None => note.date.clone(),
        };
        writeln!(
            out,
            "{}  [{}] {} ({}) {}  <{}>",
            date,
            ImportanceBand::from_importance(note.importance).label(),
            note.title,
            note.note_type.label(),
            note.content,
            note.id
        )?;
    }
    Ok(())
}

fn handle_save_note(dashboard: &mut Dashboard, draft: NoteDraft, out: &mut dyn Write) -> Result<bool, CliError> {
    match dashboard.save_note(draft) {
        Some(id) => {
            writeln!(out, "Note saved successfully (ID: {})", id)?;
            Ok(true)
        }
        None => {
            writeln!(out, "Note not saved: the title is empty")?;
            Ok(false)
        }
    }
}

fn handle_delete_note(dashboard: &mut Dashboard, id: &str, out: &mut dyn Write) -> Result<bool, CliError> {
    if id.starts_with(crate::adapter::TIMELINE_PREFIX) {
        return Err(CliError::InvalidArgument(format!(
            "{} mirrors a roadmap event; edit the event instead",
            id
        )));
    }
    if dashboard.delete_note(id) {
        writeln!(out, "Note deleted")?;
        Ok(true)
    } else {
        writeln!(out, "No note with ID {}", id)?;
        Ok(false)
    }
}

fn handle_timeline(
    dashboard: &Dashboard,
    filter: &EventFilter,
    view: ViewMode,
    deps: bool,
    today: NaiveDate,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    for event in timeline::reminders_due(&dashboard.events, today) {
        writeln!(out, "⏰ {}", event.title)?;
    }

    let filtered = timeline::filter_events(&dashboard.events, filter);
    let resolved = timeline::resolve_dependencies(&dashboard.dependencies, &dashboard.events);
    if filtered.is_empty() {
        writeln!(out, "No events match")?;
        return Ok(());
    }

    for (group, events) in timeline::group_events(&filtered, view) {
        writeln!(out, "── {} ──", group)?;
        for event in events {
            write!(out, "  {} {}  {}", event.status.icon(), event.date, event.title)?;
            if let Some(progress) = event.progress {
                write!(out, "  {}%", progress)?;
            }
            if let Some(owner) = &event.owner {
                write!(out, "  @{}", owner)?;
            }
            writeln!(out, "  <{}>", event.id)?;

            if deps {
                for dependency in timeline::related_dependencies(&resolved, &event.id) {
                    writeln!(out, "      ↳ {}", timeline::describe_dependency(dependency, &event.id))?;
                }
            }
        }
    }
    Ok(())
}

fn handle_analytics(dashboard: &Dashboard, json: bool, out: &mut dyn Write) -> Result<(), CliError> {
    let analytics = TimelineAnalytics::compute(&dashboard.events);
    if json {
        let text = serde_json::to_string_pretty(&analytics).map_err(StoreError::from)?;
        writeln!(out, "{}", text)?;
        return Ok(());
    }

    writeln!(out, "Events: {}", analytics.total)?;
    for status in EventStatus::ALL {
        writeln!(out, "  {} {}: {}", status.icon(), status.label(), analytics.counts.get(status))?;
    }
    writeln!(out, "Completion: {:.0}%", analytics.completion_rate)?;

    writeln!(out, "By month:")?;
    for month in &analytics.monthly {
        writeln!(
            out,
            "  {}  ✅{} 🔄{} 🕒{}",
            month.month, month.counts.completed, month.counts.ongoing, month.counts.planned
        )?;
    }

    writeln!(out, "Critical path:")?;
    for event in &analytics.critical_path {
        writeln!(out, "  {} {}", event.date, event.title)?;
    }
    writeln!(out, "Key upcoming:")?;
    for event in &analytics.key_upcoming {
        writeln!(out, "  {} {}", event.date, event.title)?;
    }
    Ok(())
}

fn section_index(dashboard: &Dashboard, id: &str) -> Result<usize, CliError> {
    dashboard
        .sections
        .sections
        .iter()
        .position(|s| s.id == id)
        .ok_or_else(|| CliError::NotFound(format!("section {}", id)))
}

fn handle_sections(dashboard: &Dashboard, out: &mut dyn Write) -> Result<(), CliError> {
    if dashboard.sections.is_empty() {
        writeln!(out, "No sections")?;
        return Ok(());
    }
    for share in dashboard.sections.shares() {
        writeln!(
            out,
            "{:>4}%  {}  {}  [{}]  <{}>",
            share.share,
            share.section.name,
            activity::format_value(share.section.revenue, MetricUnit::Irr),
            share.section.status.label(),
            share.section.id
        )?;
    }
    writeln!(
        out,
        "Total: {}",
        activity::format_value(dashboard.sections.total_revenue(), MetricUnit::Irr)
    )?;
    Ok(())
}

fn handle_metrics(
    dashboard: &Dashboard,
    range: TimeRange,
    series: bool,
    today: NaiveDate,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    if series {
        let records = dashboard.metrics.series(range.days(), today);
        let text = serde_json::to_string_pretty(&records).map_err(StoreError::from)?;
        writeln!(out, "{}", text)?;
        return Ok(());
    }

    for metric in dashboard.metrics.iter() {
        writeln!(
            out,
            "[{}] {} ({}, {})  <{}>",
            if metric.enabled { "x" } else { " " },
            metric.name,
            metric.english_name,
            metric.unit.label(),
            metric.id
        )?;
    }
    writeln!(out, "Range: {} ({} days)", range.label(), range.days())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 9, 6).unwrap()
    }

    fn run_text(store: &mut MemoryStore, command: Commands) -> Result<String, CliError> {
        let mut out = Vec::new();
        run(command, store, &Config::default(), today(), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn cli_parses_default_and_flags() {
        let cli = Cli::try_parse_from(["taqvim", "--dev"]).unwrap();
        assert!(cli.dev);
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from([
            "taqvim", "timeline", "--status", "completed", "--status", "planned", "--view", "yearly",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Timeline {
                status: vec![EventStatus::Completed, EventStatus::Planned],
                search: None,
                view: Some(ViewMode::Yearly),
                deps: false,
            })
        );

        assert!(Cli::try_parse_from(["taqvim", "timeline", "--status", "done"]).is_err());
    }

    #[test]
    fn convert_both_directions() {
        let mut store = MemoryStore::new();
        let text = run_text(&mut store, Commands::Convert { date: "1402/06/15".into() }).unwrap();
        assert!(text.starts_with("2023-09-06"));

        let text = run_text(&mut store, Commands::Convert { date: "2023-09-06".into() }).unwrap();
        assert!(text.starts_with("1402/06/15"));

        assert!(run_text(&mut store, Commands::Convert { date: "1402/13/01".into() }).is_err());
    }

    #[test]
    fn add_note_accepts_persian_date_and_saves() {
        let mut store = MemoryStore::new();
        let command = Commands::AddNote {
            date: "1402/06/20".into(),
            title: "جلسه هیئت مدیره".into(),
            content: None,
            importance: 90,
            note_type: Some(NoteType::Meeting),
        };
        let text = run_text(&mut store, command).unwrap();
        assert!(text.contains("Note saved"));

        let dashboard = Dashboard::load(&store).unwrap();
        let note = dashboard.notes.iter().next().unwrap();
        assert_eq!(note.date, "2023-09-11");
        assert_eq!(note.note_type, NoteType::Meeting);

        let text = run_text(&mut store, Commands::Notes { year: None, month: None, calendar: None }).unwrap();
        assert!(text.contains("جلسه هیئت مدیره"));
        assert!(text.contains("بحرانی"));
    }

    #[test]
    fn blank_note_title_is_not_saved() {
        let mut store = MemoryStore::new();
        let command = Commands::AddNote {
            date: "2023-09-06".into(),
            title: "  ".into(),
            content: None,
            importance: 50,
            note_type: None,
        };
        let text = run_text(&mut store, command).unwrap();
        assert!(text.contains("not saved"));
        assert!(store.is_empty());
    }

    #[test]
    fn timeline_notes_cannot_be_deleted() {
        let mut store = MemoryStore::new();
        run_text(&mut store, Commands::Seed { force: false }).unwrap();
        let err = run_text(&mut store, Commands::DeleteNote { id: "timeline-1".into() }).unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument(_)));

        let text = run_text(&mut store, Commands::DeleteNote { id: "missing".into() }).unwrap();
        assert!(text.contains("No note"));
    }

    #[test]
    fn seed_refuses_to_overwrite_without_force() {
        let mut store = MemoryStore::new();
        run_text(&mut store, Commands::Seed { force: false }).unwrap();
        assert!(run_text(&mut store, Commands::Seed { force: false }).is_err());
        assert!(run_text(&mut store, Commands::Seed { force: true }).is_ok());
    }

    #[test]
    fn swap_persists_and_rejects_same_id() {
        let mut store = MemoryStore::new();
        run_text(&mut store, Commands::Seed { force: false }).unwrap();
        let before = Dashboard::load(&store).unwrap();

        run_text(&mut store, Commands::SwapEvents { dragged: "1".into(), target: "2".into() }).unwrap();
        let after = Dashboard::load(&store).unwrap();
        assert_eq!(after.events[0].date, before.events[1].date);
        assert_eq!(after.events[1].date, before.events[0].date);

        assert!(run_text(&mut store, Commands::SwapEvents { dragged: "1".into(), target: "1".into() }).is_err());
    }

    #[test]
    fn month_grid_marks_notes() {
        let mut store = MemoryStore::new();
        run_text(
            &mut store,
            Commands::AddNote {
                date: "2023-09-10".into(),
                title: "x".into(),
                content: None,
                importance: 20,
                note_type: None,
            },
        )
        .unwrap();
        let text = run_text(&mut store, Commands::Month { year: None, month: None, calendar: None }).unwrap();
        assert!(text.starts_with("شهریور ۱۴۰۲"));
        assert!(text.contains("[۱۵]"));
        assert!(text.contains("۱۹*"));
    }

    #[test]
    fn month_rejects_huge_year_and_month() {
        let mut store = MemoryStore::new();
        let huge_year = Commands::Month { year: Some(2_000_000_000), month: Some(1), calendar: None };
        assert!(matches!(run_text(&mut store, huge_year), Err(CliError::DateError(_))));
        let huge_month = Commands::Month { year: None, month: Some(u32::MAX), calendar: None };
        assert!(matches!(run_text(&mut store, huge_month), Err(CliError::DateError(_))));
        let wrapped = Commands::Month { year: Some(2024), month: Some(i32::MAX as u32), calendar: None };
        assert!(matches!(run_text(&mut store, wrapped), Err(CliError::DateError(_))));
    }

    #[test]
    fn sections_add_toggle_and_list() {
        let mut store = MemoryStore::new();
        run_text(&mut store, Commands::AddSection { name: "طراحی".into(), revenue: 300.0, icon: "Palette".into() }).unwrap();
        run_text(&mut store, Commands::AddSection { name: "توسعه".into(), revenue: 100.0, icon: "Code".into() }).unwrap();

        let id = Dashboard::load(&store).unwrap().sections.sections[0].id.clone();
        let text = run_text(&mut store, Commands::ToggleSection { id }).unwrap();
        assert!(text.contains("inactive"));

        let text = run_text(&mut store, Commands::Sections).unwrap();
        assert!(text.contains("75%"));
        assert!(text.contains("غیرفعال"));
    }

    #[test]
    fn metrics_toggle_and_series() {
        let mut store = MemoryStore::new();
        run_text(
            &mut store,
            Commands::Metrics { range: None, toggle: Some("revenueGrowth".into()), remove: None, series: false },
        )
        .unwrap();
        let dashboard = Dashboard::load(&store).unwrap();
        assert!(dashboard.metrics.get("revenueGrowth").unwrap().enabled);

        let text = run_text(
            &mut store,
            Commands::Metrics { range: Some(TimeRange::Week), toggle: None, remove: None, series: true },
        )
        .unwrap();
        let records: Vec<serde_json::Value> = serde_json::from_str(&text).unwrap();
        assert_eq!(records.len(), 8);
    }
}
