use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Open extension map for fields the dashboard does not model explicitly.
/// Flattened on the wire so unknown keys survive a load/save cycle.
pub type Extra = BTreeMap<String, Value>;

/// Kind of a calendar note, used for grouping and for the timeline mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NoteType {
    Meeting,
    #[default]
    Task,
    Deadline,
    Event,
    Reminder,
    /// Any type string this build does not know; kept verbatim
    Other(String),
}

impl NoteType {
    pub const ALL: [NoteType; 5] = [
        NoteType::Meeting,
        NoteType::Task,
        NoteType::Deadline,
        NoteType::Event,
        NoteType::Reminder,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            NoteType::Meeting => "meeting",
            NoteType::Task => "task",
            NoteType::Deadline => "deadline",
            NoteType::Event => "event",
            NoteType::Reminder => "reminder",
            NoteType::Other(s) => s.as_str(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            NoteType::Meeting => "جلسه",
            NoteType::Task => "وظیفه",
            NoteType::Deadline => "مهلت",
            NoteType::Event => "رویداد",
            NoteType::Reminder => "یادآوری",
            NoteType::Other(s) => s.as_str(),
        }
    }
}

impl From<String> for NoteType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "meeting" => NoteType::Meeting,
            "task" => NoteType::Task,
            "deadline" => NoteType::Deadline,
            "event" => NoteType::Event,
            "reminder" => NoteType::Reminder,
            _ => NoteType::Other(s),
        }
    }
}

impl From<NoteType> for String {
    fn from(t: NoteType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for NoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub date: String, // ISO 8601: YYYY-MM-DD, always Gregorian
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "importance_from_number")]
    pub importance: u8, // 0-100
    #[serde(default, rename = "type")]
    pub note_type: NoteType,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Accept any JSON number (or null) for importance, rounded and clamped to 0..=100,
/// so one bad record cannot fail the whole note list
fn importance_from_number<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.map_or(0, |v| v.round().clamp(0.0, 100.0) as u8))
}

impl Note {
    pub fn new(id: impl Into<String>, date: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            title: title.into(),
            content: String::new(),
            importance: 0,
            note_type: NoteType::default(),
            extra: Extra::new(),
        }
    }

    pub fn with_importance(mut self, importance: u8) -> Self {
        self.importance = importance.min(100);
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_type(mut self, note_type: NoteType) -> Self {
        self.note_type = note_type;
        self
    }

    /// Parsed storage date, `None` if the stored string is malformed
    pub fn day(&self) -> Option<chrono::NaiveDate> {
        crate::calendar::parse_iso(&self.date).ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Completed,
    Ongoing,
    Planned,
}

impl EventStatus {
    pub const ALL: [EventStatus; 3] = [EventStatus::Completed, EventStatus::Ongoing, EventStatus::Planned];

    pub fn as_str(self) -> &'static str {
        match self {
            EventStatus::Completed => "completed",
            EventStatus::Ongoing => "ongoing",
            EventStatus::Planned => "planned",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            EventStatus::Completed => "✅",
            EventStatus::Ongoing => "🔄",
            EventStatus::Planned => "🕒",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EventStatus::Completed => "انجام شده",
            EventStatus::Ongoing => "در حال انجام",
            EventStatus::Planned => "برنامه‌ریزی شده",
        }
    }

    /// Presentation color name (parsed by the TUI color helper)
    pub fn color(self) -> &'static str {
        match self {
            EventStatus::Completed => "#16a34a",
            EventStatus::Ongoing => "#ca8a04",
            EventStatus::Planned => "#6b7280",
        }
    }
}

impl FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "completed" | "done" => Ok(EventStatus::Completed),
            "ongoing" => Ok(EventStatus::Ongoing),
            "planned" => Ok(EventStatus::Planned),
            other => Err(format!("Unknown status: {}", other)),
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("Unknown priority: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Link,
    File,
    Image,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
    pub title: String,
    pub url: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub id: String,
    pub title: String,
    pub date: String, // Persian: YYYY/MM/DD
    #[serde(default)]
    pub description: String,
    pub status: EventStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_date: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl TimelineEvent {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        date: impl Into<String>,
        status: EventStatus,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            date: date.into(),
            description: String::new(),
            status,
            icon: None,
            details: None,
            attachments: Vec::new(),
            start_date: None,
            end_date: None,
            progress: None,
            owner: None,
            priority: None,
            reminder_date: None,
            extra: Extra::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyType {
    FinishToStart,
    StartToStart,
    FinishToFinish,
    StartToFinish,
}

impl DependencyType {
    pub fn as_str(self) -> &'static str {
        match self {
            DependencyType::FinishToStart => "finish-to-start",
            DependencyType::StartToStart => "start-to-start",
            DependencyType::FinishToFinish => "finish-to-finish",
            DependencyType::StartToFinish => "start-to-finish",
        }
    }

    /// Line color for the dependency arrow
    pub fn color(self) -> &'static str {
        match self {
            DependencyType::FinishToStart => "#2563eb",
            DependencyType::StartToStart => "#16a34a",
            DependencyType::FinishToFinish => "#9333ea",
            DependencyType::StartToFinish => "#dc2626",
        }
    }

    pub fn is_dashed(self) -> bool {
        self == DependencyType::StartToFinish
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineDependency {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    #[serde(rename = "type")]
    pub kind: DependencyType,
    #[serde(flatten)]
    pub extra: Extra,
}

impl TimelineDependency {
    pub fn new(
        id: impl Into<String>,
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        kind: DependencyType,
    ) -> Self {
        Self {
            id: id.into(),
            source_id: source_id.into(),
            target_id: target_id.into(),
            kind,
            extra: Extra::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionStatus {
    Active,
    Inactive,
    Live,
}

impl SectionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SectionStatus::Active => "active",
            SectionStatus::Inactive => "inactive",
            SectionStatus::Live => "live",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SectionStatus::Active => "فعال",
            SectionStatus::Inactive => "غیرفعال",
            SectionStatus::Live => "زنده",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessSection {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub value: f64,
    pub revenue: f64,
    #[serde(default)]
    pub trend: f64,
    #[serde(default)]
    pub ranking_change: i32,
    #[serde(default)]
    pub yearly_comparison: f64,
    #[serde(default)]
    pub mini_trend: Vec<f64>,
    pub status: SectionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_color: Option<String>,
}

/// Persisted shape of the `businessSections` key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionsRecord {
    pub sections: Vec<BusinessSection>,
    pub last_modified: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricUnit {
    #[serde(rename = "IRR")]
    Irr,
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "percentage")]
    Percentage,
}

impl MetricUnit {
    pub fn label(self) -> &'static str {
        match self {
            MetricUnit::Irr => "تومان",
            MetricUnit::Number => "عدد",
            MetricUnit::Percentage => "%",
        }
    }
}

impl FromStr for MetricUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "IRR" | "irr" => Ok(MetricUnit::Irr),
            "number" => Ok(MetricUnit::Number),
            "percentage" | "%" => Ok(MetricUnit::Percentage),
            other => Err(format!("Unknown unit: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Line,
    Area,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YAxis {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDefinition {
    pub id: String,
    pub name: String,
    pub english_name: String,
    pub unit: MetricUnit,
    pub color: String,
    pub chart_type: ChartType,
    pub y_axis: YAxis,
    pub enabled: bool,
    #[serde(default)]
    pub is_custom: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityEventKind {
    Milestone,
    Campaign,
    Release,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityEventKind,
    pub title: String,
    pub description: String,
}

/// One point of the business-activity series: a date plus one value per metric id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub date: String,
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<ActivityEvent>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_note_type_is_preserved() {
        let json = r#"{"id":"1","date":"2024-03-20","title":"x","type":"birthday"}"#;
        let note: Note = serde_json::from_str(json).unwrap();
        assert_eq!(note.note_type, NoteType::Other("birthday".to_string()));
        let back = serde_json::to_string(&note).unwrap();
        assert!(back.contains("\"type\":\"birthday\""));
    }

    #[test]
    fn importance_is_rounded_and_clamped_on_load() {
        let parse = |importance: &str| {
            let json = format!(r#"{{"id":"1","date":"2024-03-20","title":"x","importance":{}}}"#, importance);
            serde_json::from_str::<Note>(&json).unwrap().importance
        };
        assert_eq!(parse("150"), 100);
        assert_eq!(parse("300"), 100);
        assert_eq!(parse("75.5"), 76);
        assert_eq!(parse("-4"), 0);
        assert_eq!(parse("null"), 0);
        assert_eq!(parse("42"), 42);
    }

    #[test]
    fn event_extra_fields_survive_round_trip() {
        let json = r#"{
            "id": "1",
            "title": "تأسیس شرکت",
            "date": "1402/06/15",
            "description": "ثبت رسمی شرکت",
            "status": "completed",
            "startDate": "1402/05/20",
            "budget": 1200
        }"#;
        let event: TimelineEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.start_date.as_deref(), Some("1402/05/20"));
        assert_eq!(event.extra.get("budget"), Some(&Value::from(1200)));

        let back = serde_json::to_value(&event).unwrap();
        assert_eq!(back["budget"], Value::from(1200));
        assert_eq!(back["startDate"], Value::from("1402/05/20"));
        assert!(back.get("endDate").is_none());
    }

    #[test]
    fn dependency_type_uses_kebab_case() {
        let dep = TimelineDependency::new("d1", "1", "2", DependencyType::FinishToStart);
        let json = serde_json::to_string(&dep).unwrap();
        assert!(json.contains("\"type\":\"finish-to-start\""));
        assert!(json.contains("\"sourceId\":\"1\""));
    }
}
