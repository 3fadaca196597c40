use chrono::Utc;
use tracing::debug;

use crate::calendar::{CalendarDate, CalendarSystem};
use crate::models::{Note, NoteType};

/// Ordered, id-unique collection of calendar notes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteStore {
    notes: Vec<Note>,
}

impl NoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.notes.iter()
    }

    pub fn as_slice(&self) -> &[Note] {
        &self.notes
    }

    pub fn into_vec(self) -> Vec<Note> {
        self.notes
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Append a new note, or replace an existing one in place
    pub fn upsert(&mut self, note: Note) {
        match self.notes.iter_mut().find(|n| n.id == note.id) {
            Some(existing) => {
                debug!(id = %note.id, "replacing note");
                *existing = note;
            }
            None => {
                debug!(id = %note.id, "appending note");
                self.notes.push(note);
            }
        }
    }

    /// Delete a note by id. Unknown ids are ignored.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        before != self.notes.len()
    }

    /// Notes stored on exactly this ISO date, in insertion order
    pub fn by_date(&self, iso_date: &str) -> Vec<&Note> {
        self.notes.iter().filter(|n| n.date == iso_date).collect()
    }

    /// Highest-importance note of a date; the first one wins ties
    pub fn most_important(&self, iso_date: &str) -> Option<&Note> {
        self.notes
            .iter()
            .filter(|n| n.date == iso_date)
            .fold(None, |best: Option<&Note>, n| match best {
                Some(b) if b.importance >= n.importance => Some(b),
                _ => Some(n),
            })
    }

    /// Notes falling inside a month of the given calendar
    pub fn in_month(&self, year: i32, month: u32, system: CalendarSystem) -> Vec<&Note> {
        self.notes
            .iter()
            .filter(|n| {
                n.day()
                    .and_then(|d| CalendarDate::from_naive(d).to_system(system).ok())
                    .map(|d| d.year == year && d.month == month)
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Id for a new note: the current Unix time in milliseconds, bumped until unused
    pub fn next_id(&self) -> String {
        let mut candidate = Utc::now().timestamp_millis();
        while self.contains(&candidate.to_string()) {
            candidate += 1;
        }
        candidate.to_string()
    }

    /// Save a note from an edit form. Blank titles are ignored and return `None`;
    /// otherwise the note is inserted (fresh id) or updated (existing id).
    pub fn save_draft(&mut self, draft: NoteDraft) -> Option<String> {
        if draft.title.trim().is_empty() {
            return None;
        }

        let id = match draft.id {
            Some(id) => id,
            None => self.next_id(),
        };
        let mut note = match self.get(&id) {
            Some(existing) => existing.clone(),
            None => Note::new(id.clone(), draft.date.clone(), draft.title.clone()),
        };
        note.date = draft.date;
        note.title = draft.title;
        note.content = draft.content;
        note.importance = draft.importance.min(100);
        note.note_type = draft.note_type;

        self.upsert(note);
        Some(id)
    }
}

impl From<Vec<Note>> for NoteStore {
    fn from(notes: Vec<Note>) -> Self {
        let mut store = NoteStore::new();
        for note in notes {
            store.upsert(note);
        }
        store
    }
}

/// Form state for creating or editing a note
#[derive(Debug, Clone, Default)]
pub struct NoteDraft {
    /// `None` creates a new note
    pub id: Option<String>,
    pub date: String,
    pub title: String,
    pub content: String,
    pub importance: u8,
    pub note_type: NoteType,
}

/// One of five fixed importance ranges used for coloring
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ImportanceBand {
    VeryLow,
    Low,
    Medium,
    High,
    Critical,
}

impl ImportanceBand {
    pub const ALL: [ImportanceBand; 5] = [
        ImportanceBand::VeryLow,
        ImportanceBand::Low,
        ImportanceBand::Medium,
        ImportanceBand::High,
        ImportanceBand::Critical,
    ];

    /// Bands are 0-20, 21-40, 41-60, 61-80 and 81-100; larger values clamp to the top
    pub fn from_importance(importance: u8) -> Self {
        match importance {
            0..=20 => ImportanceBand::VeryLow,
            21..=40 => ImportanceBand::Low,
            41..=60 => ImportanceBand::Medium,
            61..=80 => ImportanceBand::High,
            _ => ImportanceBand::Critical,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            ImportanceBand::VeryLow => "gray",
            ImportanceBand::Low => "blue",
            ImportanceBand::Medium => "green",
            ImportanceBand::High => "yellow",
            ImportanceBand::Critical => "red",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ImportanceBand::VeryLow => "خیلی کم",
            ImportanceBand::Low => "کم",
            ImportanceBand::Medium => "متوسط",
            ImportanceBand::High => "زیاد",
            ImportanceBand::Critical => "بحرانی",
        }
    }
}
