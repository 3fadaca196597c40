use chrono::{NaiveDate, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::calendar::{self, DateError};
use crate::models::{DependencyType, EventStatus, TimelineDependency, TimelineEvent};

/// How timeline events are bucketed for display
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl ViewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Monthly => "monthly",
            ViewMode::Quarterly => "quarterly",
            ViewMode::Yearly => "yearly",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Monthly => "ماهانه",
            ViewMode::Quarterly => "فصلی",
            ViewMode::Yearly => "سالانه",
        }
    }

    /// Cycle monthly -> quarterly -> yearly -> monthly
    pub fn next(self) -> Self {
        match self {
            ViewMode::Monthly => ViewMode::Quarterly,
            ViewMode::Quarterly => ViewMode::Yearly,
            ViewMode::Yearly => ViewMode::Monthly,
        }
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" | "month" => Ok(ViewMode::Monthly),
            "quarterly" | "quarter" => Ok(ViewMode::Quarterly),
            "yearly" | "year" => Ok(ViewMode::Yearly),
            other => Err(format!("Unknown view mode: {}", other)),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort key of a `YYYY/MM/DD` timeline date. Missing or non-numeric parts count as 0.
pub fn date_key(date: &str) -> (i32, i32, i32) {
    let mut parts = date.split('/').map(|p| p.trim().parse::<i32>().unwrap_or(0));
    let year = parts.next().unwrap_or(0);
    let month = parts.next().unwrap_or(0);
    let day = parts.next().unwrap_or(0);
    (year, month, day)
}

/// Stable chronological sort by the parsed timeline date
pub fn sort_by_date(events: &mut [&TimelineEvent]) {
    events.sort_by_key(|e| date_key(&e.date));
}

/// Status and free-text filter of the timeline view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFilter {
    pub statuses: BTreeSet<EventStatus>,
    pub search: String,
}

impl Default for EventFilter {
    fn default() -> Self {
        Self::only(EventStatus::ALL)
    }
}

impl EventFilter {
    pub fn only(statuses: impl IntoIterator<Item = EventStatus>) -> Self {
        Self {
            statuses: statuses.into_iter().collect(),
            search: String::new(),
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn toggle_status(&mut self, status: EventStatus) {
        if !self.statuses.remove(&status) {
            self.statuses.insert(status);
        }
    }

    /// Status in the set, and the search text (if any) found case-insensitively
    /// in the title, description, details or owner
    pub fn matches(&self, event: &TimelineEvent) -> bool {
        if !self.statuses.contains(&event.status) {
            return false;
        }
        if self.search.is_empty() {
            return true;
        }

        let needle = self.search.to_lowercase();
        let contains = |field: &str| field.to_lowercase().contains(&needle);
        contains(&event.title)
            || contains(&event.description)
            || event.details.as_deref().is_some_and(contains)
            || event.owner.as_deref().is_some_and(contains)
    }
}

/// Events passing the filter, sorted chronologically
pub fn filter_events<'a>(events: &'a [TimelineEvent], filter: &EventFilter) -> Vec<&'a TimelineEvent> {
    let mut matched: Vec<&TimelineEvent> = events.iter().filter(|e| filter.matches(e)).collect();
    sort_by_date(&mut matched);
    matched
}

/// Group label of a timeline date for the given view mode
pub fn group_key(date: &str, mode: ViewMode) -> String {
    let (year, month, _) = date_key(date);
    match mode {
        ViewMode::Monthly => format!("{}/{}", year, month),
        ViewMode::Quarterly => format!("{} - Q{}", year, (month + 2) / 3),
        ViewMode::Yearly => format!("{}", year),
    }
}

/// Bucket already-sorted events. Groups keep the order in which their first event appears.
pub fn group_events<'a>(
    events: &[&'a TimelineEvent],
    mode: ViewMode,
) -> IndexMap<String, Vec<&'a TimelineEvent>> {
    let mut groups: IndexMap<String, Vec<&TimelineEvent>> = IndexMap::new();
    for event in events {
        groups.entry(group_key(&event.date, mode)).or_default().push(event);
    }
    groups
}

/// Swap the dates of two events, the way drag-and-drop reorders the roadmap.
///
/// `date` is always swapped; `startDate` and `endDate` only when both events have
/// them. Positions in `events` never change. Returns whether a swap happened.
pub fn swap_event_dates(events: &mut [TimelineEvent], dragged_id: &str, target_id: &str) -> bool {
    if dragged_id == target_id {
        return false;
    }
    let (Some(a), Some(b)) = (
        events.iter().position(|e| e.id == dragged_id),
        events.iter().position(|e| e.id == target_id),
    ) else {
        return false;
    };

    let (low, high) = if a < b { (a, b) } else { (b, a) };
    let (left, right) = events.split_at_mut(high);
    let first = &mut left[low];
    let second = &mut right[0];

    std::mem::swap(&mut first.date, &mut second.date);
    if has_value(&first.start_date) && has_value(&second.start_date) {
        std::mem::swap(&mut first.start_date, &mut second.start_date);
    }
    if has_value(&first.end_date) && has_value(&second.end_date) {
        std::mem::swap(&mut first.end_date, &mut second.end_date);
    }

    debug!(dragged = dragged_id, target = target_id, "swapped event dates");
    true
}

fn has_value(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.is_empty())
}

/// Transient drag-and-drop state of the timeline
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragState {
    pub dragged: Option<String>,
    pub target: Option<String>,
}

impl DragState {
    pub fn start(&mut self, id: impl Into<String>) {
        self.dragged = Some(id.into());
    }

    pub fn over(&mut self, id: impl Into<String>) {
        self.target = Some(id.into());
    }

    pub fn is_active(&self) -> bool {
        self.dragged.is_some()
    }

    /// Drop onto `target_id`. State is cleared whether or not a swap happened.
    pub fn drop_on(&mut self, events: &mut [TimelineEvent], target_id: &str) -> bool {
        let dragged = self.dragged.take();
        self.target = None;
        match dragged {
            Some(dragged) => swap_event_dates(events, &dragged, target_id),
            None => false,
        }
    }

    pub fn cancel(&mut self) {
        self.dragged = None;
        self.target = None;
    }
}

/// A dependency whose endpoints both exist
#[derive(Debug, Clone, Copy)]
pub struct ResolvedDependency<'a> {
    pub dependency: &'a TimelineDependency,
    pub source: &'a TimelineEvent,
    pub target: &'a TimelineEvent,
}

/// Pair dependencies with their events. Dangling references are skipped.
pub fn resolve_dependencies<'a>(
    dependencies: &'a [TimelineDependency],
    events: &'a [TimelineEvent],
) -> Vec<ResolvedDependency<'a>> {
    dependencies
        .iter()
        .filter_map(|dependency| {
            let source = events.iter().find(|e| e.id == dependency.source_id);
            let target = events.iter().find(|e| e.id == dependency.target_id);
            match (source, target) {
                (Some(source), Some(target)) => Some(ResolvedDependency {
                    dependency,
                    source,
                    target,
                }),
                _ => {
                    debug!(id = %dependency.id, "skipping dependency with a missing endpoint");
                    None
                }
            }
        })
        .collect()
}

/// Resolved dependencies touching an event, on either end
pub fn related_dependencies<'r, 'a>(
    resolved: &'r [ResolvedDependency<'a>],
    event_id: &str,
) -> Vec<&'r ResolvedDependency<'a>> {
    resolved
        .iter()
        .filter(|r| r.source.id == event_id || r.target.id == event_id)
        .collect()
}

/// Sentence describing a dependency from the point of view of `event_id`
pub fn describe_dependency(resolved: &ResolvedDependency<'_>, event_id: &str) -> String {
    let is_source = resolved.source.id == event_id;
    let title = if is_source { &resolved.target.title } else { &resolved.source.title };

    match (resolved.dependency.kind, is_source) {
        (DependencyType::FinishToStart, true) => format!("پس از پایان، \"{}\" شروع می‌شود", title),
        (DependencyType::FinishToStart, false) => format!("پس از پایان \"{}\" شروع می‌شود", title),
        (DependencyType::StartToStart, true) => format!("همزمان با شروع، \"{}\" نیز شروع می‌شود", title),
        (DependencyType::StartToStart, false) => format!("همزمان با شروع \"{}\" شروع می‌شود", title),
        (DependencyType::FinishToFinish, true) => format!("همزمان با پایان، \"{}\" نیز پایان می‌یابد", title),
        (DependencyType::FinishToFinish, false) => format!("همزمان با پایان \"{}\" پایان می‌یابد", title),
        (DependencyType::StartToFinish, true) => format!("پس از شروع، \"{}\" پایان می‌یابد", title),
        (DependencyType::StartToFinish, false) => format!("پس از شروع \"{}\" پایان می‌یابد", title),
    }
}

/// Placeholder event dated today, as created by the "new event" action
pub fn new_event(today: NaiveDate) -> Result<TimelineEvent, DateError> {
    Ok(TimelineEvent::new(
        format!("event-{}", Utc::now().timestamp_millis()),
        "رویداد جدید",
        calendar::format_persian(today)?,
        EventStatus::Planned,
    )
    .with_description("توضیحات رویداد را اینجا وارد کنید"))
}

/// Insert or replace an event by id. Events with a blank title are not saved.
pub fn save_event(events: &mut Vec<TimelineEvent>, event: TimelineEvent) -> bool {
    if event.title.trim().is_empty() {
        return false;
    }
    match events.iter_mut().find(|e| e.id == event.id) {
        Some(existing) => *existing = event,
        None => events.push(event),
    }
    true
}

/// Days from `today` until a timeline date; negative when it has passed
pub fn days_until(date: &str, today: NaiveDate) -> Option<i64> {
    let day = calendar::parse_persian(date).ok()?.to_naive().ok()?;
    Some(day.signed_duration_since(today).num_days())
}

/// Events whose reminder falls on `today`
pub fn reminders_due(events: &[TimelineEvent], today: NaiveDate) -> Vec<&TimelineEvent> {
    events
        .iter()
        .filter(|e| e.reminder_date.as_deref().and_then(|d| days_until(d, today)) == Some(0))
        .collect()
}

/// Relative wording for an event's reminder, `None` when it has no valid reminder date
pub fn reminder_text(event: &TimelineEvent, today: NaiveDate) -> Option<String> {
    let days = days_until(event.reminder_date.as_deref()?, today)?;
    Some(match days {
        d if d < 0 => "یادآوری گذشته".to_string(),
        0 => "یادآوری امروز".to_string(),
        1 => "یادآوری فردا".to_string(),
        d => format!("یادآوری در {} روز دیگر", calendar::persian_digits(d)),
    })
}
