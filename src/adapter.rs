//! Two-way bridge between roadmap events and calendar notes.
//!
//! Every timeline event shows up in the calendar as a note whose id carries the
//! [`TIMELINE_PREFIX`]. Editing such a note in the calendar writes the change back
//! to the event. The status/type mapping is lossy: `reminder` and unknown note
//! types both come back as `planned`.

use serde_json::Value;
use std::collections::HashSet;
use tracing::warn;

use crate::calendar;
use crate::models::{EventStatus, Note, NoteType, TimelineEvent};

pub const TIMELINE_PREFIX: &str = "timeline-";

const ORIGINAL_EVENT_KEY: &str = "originalEventId";

pub fn status_to_note_type(status: EventStatus) -> NoteType {
    match status {
        EventStatus::Completed => NoteType::Event,
        EventStatus::Ongoing => NoteType::Task,
        EventStatus::Planned => NoteType::Deadline,
    }
}

pub fn note_type_to_status(note_type: &NoteType) -> EventStatus {
    match note_type {
        NoteType::Event => EventStatus::Completed,
        NoteType::Task => EventStatus::Ongoing,
        _ => EventStatus::Planned,
    }
}

/// Importance given to derived notes so upcoming work outranks finished work
pub fn status_importance(status: EventStatus) -> u8 {
    match status {
        EventStatus::Completed => 30,
        EventStatus::Ongoing => 60,
        EventStatus::Planned => 80,
    }
}

pub fn is_timeline_note(note: &Note) -> bool {
    note.id.starts_with(TIMELINE_PREFIX)
}

/// Calendar notes for a set of events. Events whose date cannot be converted are skipped.
pub fn timeline_to_notes(events: &[TimelineEvent]) -> Vec<Note> {
    events
        .iter()
        .filter_map(|event| {
            let date = match calendar::to_calendar_date(&event.date) {
                Ok(date) => date,
                Err(e) => {
                    warn!(id = %event.id, error = %e, "cannot place timeline event on the calendar");
                    return None;
                }
            };

            let mut note = Note::new(format!("{}{}", TIMELINE_PREFIX, event.id), date, event.title.clone())
                .with_content(event.description.clone())
                .with_type(status_to_note_type(event.status))
                .with_importance(status_importance(event.status));
            note.extra
                .insert(ORIGINAL_EVENT_KEY.to_string(), Value::from(event.id.clone()));
            Some(note)
        })
        .collect()
}

/// Apply calendar edits of timeline notes back to the events.
///
/// Events touched by a note come first, in note order; the untouched events
/// follow in their original order. A note for an unknown event creates a
/// minimal new event.
pub fn notes_to_timeline_updates(notes: &[Note], existing: &[TimelineEvent]) -> Vec<TimelineEvent> {
    let mut updated: Vec<TimelineEvent> = Vec::new();

    for note in notes.iter().filter(|n| is_timeline_note(n)) {
        let event_id = &note.id[TIMELINE_PREFIX.len()..];
        let status = note_type_to_status(&note.note_type);

        let event = match existing.iter().find(|e| e.id == event_id) {
            Some(original) => {
                let mut event = original.clone();
                event.title = note.title.clone();
                event.description = note.content.clone();
                event.status = status;
                match calendar::to_timeline_date(&note.date) {
                    Ok(date) => event.date = date,
                    Err(e) => warn!(id = %note.id, error = %e, "keeping event date, note date is invalid"),
                }
                event
            }
            None => {
                let date = calendar::to_timeline_date(&note.date).unwrap_or_else(|e| {
                    warn!(id = %note.id, error = %e, "new timeline event has an invalid date");
                    String::new()
                });
                let mut event = TimelineEvent::new(event_id, note.title.clone(), date, status)
                    .with_description(note.content.clone());
                event.details = Some(String::new());
                event
            }
        };

        match updated.iter_mut().find(|e| e.id == event.id) {
            Some(slot) => *slot = event,
            None => updated.push(event),
        }
    }

    let touched: HashSet<&str> = updated.iter().map(|e| e.id.as_str()).collect();
    let untouched: Vec<TimelineEvent> = existing
        .iter()
        .filter(|e| !touched.contains(e.id.as_str()))
        .cloned()
        .collect();

    updated.extend(untouched);
    updated
}

/// User notes of `current` followed by notes freshly derived from `events`.
/// Stale timeline notes are dropped, so no id appears twice.
pub fn merge_notes(current: &[Note], events: &[TimelineEvent]) -> Vec<Note> {
    current
        .iter()
        .filter(|n| !is_timeline_note(n))
        .cloned()
        .chain(timeline_to_notes(events))
        .collect()
}

/// Split a combined list into (user notes, timeline notes)
pub fn split_notes(notes: Vec<Note>) -> (Vec<Note>, Vec<Note>) {
    notes.into_iter().partition(|n| !is_timeline_note(n))
}
