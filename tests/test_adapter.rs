use taqvim::adapter::{self, TIMELINE_PREFIX};
use taqvim::dashboard::sample_roadmap;
use taqvim::models::{EventStatus, Note, NoteType};

#[test]
fn every_sample_event_appears_once_in_the_calendar() {
    let (events, _) = sample_roadmap().unwrap();
    let user = vec![Note::new("1", "2023-09-06", "جلسه")];
    let merged = adapter::merge_notes(&user, &events);

    assert_eq!(merged.len(), events.len() + 1);
    assert_eq!(merged[0].id, "1");
    for event in &events {
        let id = format!("{}{}", TIMELINE_PREFIX, event.id);
        assert_eq!(merged.iter().filter(|n| n.id == id).count(), 1);
    }

    // Merging again does not duplicate derived notes
    let again = adapter::merge_notes(&merged, &events);
    assert_eq!(again, merged);
}

#[test]
fn moving_a_timeline_note_moves_its_event() {
    let (events, _) = sample_roadmap().unwrap();
    let mut notes = adapter::timeline_to_notes(&events);
    let note = notes.iter_mut().find(|n| n.id == "timeline-2").unwrap();
    note.date = "2024-01-01".to_string();
    note.note_type = NoteType::Task;

    let updated = adapter::notes_to_timeline_updates(&notes, &events);
    assert_eq!(updated.len(), events.len());
    let moved = updated.iter().find(|e| e.id == "2").unwrap();
    assert_eq!(moved.date, "1402/10/11");
    assert_eq!(moved.status, EventStatus::Ongoing);
}

#[test]
fn status_mapping_is_lossy_for_reminders() {
    for status in EventStatus::ALL {
        let back = adapter::note_type_to_status(&adapter::status_to_note_type(status));
        assert_eq!(back, status);
    }
    assert_eq!(adapter::note_type_to_status(&NoteType::Reminder), EventStatus::Planned);
    assert_eq!(
        adapter::note_type_to_status(&NoteType::Other("birthday".to_string())),
        EventStatus::Planned
    );
}
