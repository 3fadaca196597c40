use serde::Deserialize;
use tracing::{debug, info};

use crate::activity::MetricSet;
use crate::adapter;
use crate::models::{Note, TimelineDependency, TimelineEvent};
use crate::notes::{NoteDraft, NoteStore};
use crate::sections::SectionBoard;
use crate::store::{self, KeyValueStore, StoreError};

pub const NOTES_KEY: &str = "calendarNotes";
pub const EVENTS_KEY: &str = "timelineEvents";
pub const DEPENDENCIES_KEY: &str = "timelineDependencies";
pub const METRICS_KEY: &str = "activityMetrics";

const SAMPLE_ROADMAP: &str = include_str!("../data/sample_roadmap.json");

#[derive(Debug, Deserialize)]
struct Roadmap {
    events: Vec<TimelineEvent>,
    dependencies: Vec<TimelineDependency>,
}

/// The company roadmap shipped as demo content
pub fn sample_roadmap() -> Result<(Vec<TimelineEvent>, Vec<TimelineDependency>), StoreError> {
    let roadmap: Roadmap = serde_json::from_str(SAMPLE_ROADMAP)?;
    Ok((roadmap.events, roadmap.dependencies))
}

/// All dashboard state, loaded once from a store and written back explicitly
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dashboard {
    /// User notes only; timeline notes are derived on demand
    pub notes: NoteStore,
    pub events: Vec<TimelineEvent>,
    pub dependencies: Vec<TimelineDependency>,
    pub sections: SectionBoard,
    pub metrics: MetricSet,
}

impl Dashboard {
    /// Read every key; each one falls back to its default when absent or malformed
    pub fn load(store: &dyn KeyValueStore) -> Result<Self, StoreError> {
        let notes: Vec<Note> = store::load_json(store, NOTES_KEY)?.unwrap_or_default();
        let (notes, stale): (Vec<Note>, Vec<Note>) = adapter::split_notes(notes);
        if !stale.is_empty() {
            debug!(count = stale.len(), "dropping stored timeline notes");
        }

        let dashboard = Self {
            notes: NoteStore::from(notes),
            events: store::load_json(store, EVENTS_KEY)?.unwrap_or_default(),
            dependencies: store::load_json(store, DEPENDENCIES_KEY)?.unwrap_or_default(),
            sections: SectionBoard::load(store)?,
            metrics: store::load_json(store, METRICS_KEY)?.unwrap_or_default(),
        };

        info!(
            notes = dashboard.notes.len(),
            events = dashboard.events.len(),
            sections = dashboard.sections.len(),
            "dashboard loaded"
        );
        Ok(dashboard)
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        store::save_json(store, NOTES_KEY, self.notes.as_slice())?;
        store::save_json(store, EVENTS_KEY, &self.events)?;
        store::save_json(store, DEPENDENCIES_KEY, &self.dependencies)?;
        store::save_json(store, METRICS_KEY, &self.metrics)?;
        self.sections.save(store)?;
        debug!("dashboard saved");
        Ok(())
    }

    /// Replace the roadmap with the demo content. Returns the number of events loaded.
    pub fn seed_sample_roadmap(&mut self) -> Result<usize, StoreError> {
        let (events, dependencies) = sample_roadmap()?;
        self.events = events;
        self.dependencies = dependencies;
        Ok(self.events.len())
    }

    /// User notes followed by one note per timeline event
    pub fn calendar_notes(&self) -> NoteStore {
        NoteStore::from(adapter::merge_notes(self.notes.as_slice(), &self.events))
    }

    /// Take back a combined note list edited in the calendar: user notes are
    /// stored as they are, timeline notes update their events.
    pub fn apply_calendar_notes(&mut self, notes: Vec<Note>) {
        let (user, timeline) = adapter::split_notes(notes);
        self.events = adapter::notes_to_timeline_updates(&timeline, &self.events);
        self.notes = NoteStore::from(user);
    }

    /// Save a note edited in the calendar. Editing a timeline note edits its event.
    pub fn save_note(&mut self, draft: NoteDraft) -> Option<String> {
        let mut combined = self.calendar_notes();
        let id = combined.save_draft(draft)?;
        self.apply_calendar_notes(combined.into_vec());
        Some(id)
    }

    /// Delete a user note. Timeline notes mirror events and cannot be deleted here.
    pub fn delete_note(&mut self, id: &str) -> bool {
        if id.starts_with(adapter::TIMELINE_PREFIX) {
            return false;
        }
        self.notes.remove(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventStatus, NoteType};
    use crate::store::MemoryStore;

    #[test]
    fn sample_roadmap_parses() {
        let (events, dependencies) = sample_roadmap().unwrap();
        assert_eq!(events.len(), 8);
        assert_eq!(dependencies.len(), 7);
        assert_eq!(events[0].attachments.len(), 2);
    }

    #[test]
    fn empty_store_gives_defaults() {
        let dashboard = Dashboard::load(&MemoryStore::new()).unwrap();
        assert!(dashboard.notes.is_empty());
        assert!(dashboard.events.is_empty());
        assert_eq!(dashboard.metrics, MetricSet::default());
    }

    #[test]
    fn out_of_range_importance_does_not_drop_other_notes() {
        let mut store = MemoryStore::new();
        store
            .set(
                NOTES_KEY,
                r#"[
                    {"id":"1","date":"2024-03-20","title":"a","importance":50},
                    {"id":"2","date":"2024-03-21","title":"b","importance":300},
                    {"id":"3","date":"2024-03-22","title":"c","importance":150},
                    {"id":"4","date":"2024-03-23","title":"d","importance":75.5}
                ]"#,
            )
            .unwrap();

        let dashboard = Dashboard::load(&store).unwrap();
        let importances: Vec<u8> = dashboard.notes.iter().map(|n| n.importance).collect();
        assert_eq!(importances, [50, 100, 100, 76]);

        dashboard.save(&mut store).unwrap();
        assert_eq!(Dashboard::load(&store).unwrap().notes.len(), 4);
    }

    #[test]
    fn editing_timeline_note_updates_event() {
        let mut dashboard = Dashboard::default();
        dashboard.seed_sample_roadmap().unwrap();

        let note = dashboard.calendar_notes().get("timeline-4").cloned().unwrap();
        let id = dashboard
            .save_note(NoteDraft {
                id: Some(note.id.clone()),
                date: note.date.clone(),
                title: "وب‌سایت آماده شد".to_string(),
                content: note.content.clone(),
                importance: note.importance,
                note_type: NoteType::Event,
            })
            .unwrap();
        assert_eq!(id, "timeline-4");

        let event = dashboard.events.iter().find(|e| e.id == "4").unwrap();
        assert_eq!(event.title, "وب‌سایت آماده شد");
        assert_eq!(event.status, EventStatus::Completed);
        assert_eq!(event.progress, Some(65));
        assert_eq!(dashboard.events.len(), 8);
        assert!(dashboard.notes.is_empty());
        assert!(!dashboard.delete_note("timeline-4"));
    }
}
