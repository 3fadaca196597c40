use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{EventStatus, Priority, TimelineEvent};
use crate::timeline::date_key;

/// Per-status event counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub completed: usize,
    pub ongoing: usize,
    pub planned: usize,
}

impl StatusCounts {
    fn add(&mut self, status: EventStatus) {
        match status {
            EventStatus::Completed => self.completed += 1,
            EventStatus::Ongoing => self.ongoing += 1,
            EventStatus::Planned => self.planned += 1,
        }
    }

    pub fn get(&self, status: EventStatus) -> usize {
        match status {
            EventStatus::Completed => self.completed,
            EventStatus::Ongoing => self.ongoing,
            EventStatus::Planned => self.planned,
        }
    }

    pub fn total(&self) -> usize {
        self.completed + self.ongoing + self.planned
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    /// `YYYY/MM`
    pub month: String,
    pub counts: StatusCounts,
}

/// Summary figures of the roadmap
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineAnalytics<'a> {
    pub counts: StatusCounts,
    pub total: usize,
    /// Percentage of completed events, 0 for an empty roadmap
    pub completion_rate: f64,
    pub monthly: Vec<MonthlyCount>,
    /// High-priority unfinished events in date order. A priority filter, not a
    /// dependency-graph computation.
    pub critical_path: Vec<&'a TimelineEvent>,
    pub key_upcoming: Vec<&'a TimelineEvent>,
}

impl<'a> TimelineAnalytics<'a> {
    pub fn compute(events: &'a [TimelineEvent]) -> Self {
        let mut counts = StatusCounts::default();
        let mut by_month: BTreeMap<(i32, i32), StatusCounts> = BTreeMap::new();

        for event in events {
            counts.add(event.status);
            let (year, month, _) = date_key(&event.date);
            by_month.entry((year, month)).or_default().add(event.status);
        }

        let total = events.len();
        let completion_rate = if total == 0 {
            0.0
        } else {
            counts.completed as f64 / total as f64 * 100.0
        };

        let monthly = by_month
            .into_iter()
            .map(|((year, month), counts)| MonthlyCount {
                month: format!("{}/{:02}", year, month),
                counts,
            })
            .collect();

        let high = |e: &&TimelineEvent| e.priority == Some(Priority::High);

        let mut critical_path: Vec<&TimelineEvent> = events
            .iter()
            .filter(high)
            .filter(|e| matches!(e.status, EventStatus::Ongoing | EventStatus::Planned))
            .collect();
        critical_path.sort_by_key(|e| date_key(&e.date));

        let key_upcoming = events
            .iter()
            .filter(high)
            .filter(|e| e.status == EventStatus::Planned)
            .take(2)
            .collect();

        Self {
            counts,
            total,
            completion_rate,
            monthly,
            critical_path,
            key_upcoming,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str, date: &str, status: EventStatus, priority: Priority) -> TimelineEvent {
        TimelineEvent::new(id, id, date, status).with_priority(priority)
    }

    #[test]
    fn empty_roadmap() {
        let analytics = TimelineAnalytics::compute(&[]);
        assert_eq!(analytics.total, 0);
        assert_eq!(analytics.completion_rate, 0.0);
        assert!(analytics.monthly.is_empty());
    }

    #[test]
    fn counts_trend_and_critical_path() {
        let events = vec![
            event("a", "1402/06/15", EventStatus::Completed, Priority::High),
            event("b", "1403/09/01", EventStatus::Planned, Priority::High),
            event("c", "1402/12/15", EventStatus::Ongoing, Priority::High),
            event("d", "1402/06/20", EventStatus::Planned, Priority::Low),
            event("e", "1403/02/01", EventStatus::Planned, Priority::High),
            event("f", "1403/03/01", EventStatus::Planned, Priority::High),
        ];
        let analytics = TimelineAnalytics::compute(&events);

        assert_eq!(analytics.counts, StatusCounts { completed: 1, ongoing: 1, planned: 4 });
        assert_eq!(analytics.total, 6);
        assert!((analytics.completion_rate - 100.0 / 6.0).abs() < 1e-9);

        let months: Vec<_> = analytics.monthly.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(months, ["1402/06", "1402/12", "1403/02", "1403/03", "1403/09"]);
        assert_eq!(analytics.monthly[0].counts.total(), 2);
        assert_eq!(analytics.monthly[0].counts.get(EventStatus::Planned), 1);

        let critical: Vec<_> = analytics.critical_path.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(critical, ["c", "e", "f", "b"]);

        let upcoming: Vec<_> = analytics.key_upcoming.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(upcoming, ["b", "e"]);
    }
}
