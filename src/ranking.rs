use chrono::NaiveDate;
use std::cmp::{Ordering, Reverse};
use tracing::warn;

use crate::models::Note;

/// Order a month's notes for the "what matters next" list.
///
/// Notes on or after `reference` come first, soonest first; earlier notes follow,
/// most recent first. Notes sharing a date are ordered by descending importance,
/// keeping insertion order for equal importance. Notes whose date does not parse
/// are appended last in insertion order.
pub fn rank_notes<'a, I>(notes: I, reference: NaiveDate) -> Vec<&'a Note>
where
    I: IntoIterator<Item = &'a Note>,
{
    let mut dated: Vec<(NaiveDate, &Note)> = Vec::new();
    let mut undated: Vec<&Note> = Vec::new();

    for note in notes {
        match note.day() {
            Some(day) => dated.push((day, note)),
            None => {
                warn!(id = %note.id, date = %note.date, "note has an unparseable date");
                undated.push(note);
            }
        }
    }

    // Stable sort, so equal keys keep insertion order
    dated.sort_by(|(a_day, a), (b_day, b)| {
        compare_days(*a_day, *b_day, reference)
            .then_with(|| Reverse(a.importance).cmp(&Reverse(b.importance)))
    });

    dated
        .into_iter()
        .map(|(_, note)| note)
        .chain(undated)
        .collect()
}

fn compare_days(a: NaiveDate, b: NaiveDate, reference: NaiveDate) -> Ordering {
    let a_future = a >= reference;
    let b_future = b >= reference;
    match (a_future, b_future) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (true, true) => a.cmp(&b),
        (false, false) => b.cmp(&a),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::CalendarDate;

    fn persian_iso(y: i32, m: u32, d: u32) -> String {
        crate::calendar::format_iso(CalendarDate::persian(y, m, d).unwrap().to_naive().unwrap())
    }

    fn note(id: &str, date: String, importance: u8) -> Note {
        Note::new(id, date, id).with_importance(importance)
    }

    #[test]
    fn future_ascending_then_past_descending() {
        let reference = CalendarDate::persian(1402, 7, 1).unwrap().to_naive().unwrap();
        let notes = vec![
            note("past-far", persian_iso(1402, 6, 2), 50),
            note("future-late", persian_iso(1402, 7, 20), 50),
            note("today", persian_iso(1402, 7, 1), 50),
            note("past-near", persian_iso(1402, 6, 30), 50),
            note("future-soon", persian_iso(1402, 7, 3), 50),
        ];

        let ranked: Vec<_> = rank_notes(&notes, reference).into_iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ranked, ["today", "future-soon", "future-late", "past-near", "past-far"]);
    }

    #[test]
    fn same_day_notes_sorted_by_importance() {
        let reference = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        let notes = vec![
            note("a", "2024-03-25".to_string(), 10),
            note("b", "2024-03-25".to_string(), 90),
            note("c", "2024-03-25".to_string(), 40),
            note("d", "2024-03-25".to_string(), 90),
            note("e", "2024-03-10".to_string(), 5),
            note("f", "2024-03-10".to_string(), 70),
        ];

        let ranked: Vec<_> = rank_notes(&notes, reference).into_iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ranked, ["b", "d", "c", "a", "f", "e"]);
    }

    #[test]
    fn unparseable_dates_go_last() {
        let reference = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        let notes = vec![
            note("broken", "someday".to_string(), 100),
            note("past", "2024-03-01".to_string(), 0),
        ];
        let ranked: Vec<_> = rank_notes(&notes, reference).into_iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ranked, ["past", "broken"]);
    }

    #[test]
    fn future_notes_across_months() {
        let reference = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let notes = vec![
            note("december", "2024-12-01".to_string(), 0),
            note("march", "2024-03-05".to_string(), 0),
        ];
        let ranked: Vec<_> = rank_notes(&notes, reference).into_iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ranked, ["march", "december"]);
    }
}
