use chrono::Utc;
use tracing::info;

use crate::models::{BusinessSection, SectionStatus, SectionsRecord};
use crate::store::{self, KeyValueStore, StoreError};

pub const SECTIONS_KEY: &str = "businessSections";

/// Chart palette, cycled by section index
pub const DEFAULT_COLORS: [&str; 10] = [
    "#0088FE", "#00C49F", "#FFBB28", "#FF8042", "#8884d8",
    "#a4de6c", "#ffc658", "#d0ed57", "#ffa1b5", "#b5e7a0",
];

/// One slice of the revenue share chart
#[derive(Debug, Clone, PartialEq)]
pub struct SectionShare<'a> {
    pub section: &'a BusinessSection,
    /// Rounded percentage of total revenue
    pub share: f64,
    pub color: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionBoard {
    pub sections: Vec<BusinessSection>,
}

impl SectionBoard {
    pub fn new(sections: Vec<BusinessSection>) -> Self {
        Self { sections }
    }

    /// Load the saved board. Nothing saved, or an unreadable record, gives an empty board.
    pub fn load(store: &dyn KeyValueStore) -> Result<Self, StoreError> {
        let record: Option<SectionsRecord> = store::load_json(store, SECTIONS_KEY)?;
        Ok(Self {
            sections: record.map(|r| r.sections).unwrap_or_default(),
        })
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        let record = SectionsRecord {
            sections: self.sections.clone(),
            last_modified: Utc::now(),
        };
        store::save_json(store, SECTIONS_KEY, &record)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Active sections become inactive; inactive and live ones become active
    pub fn toggle(&mut self, index: usize) -> Option<SectionStatus> {
        let section = self.sections.get_mut(index)?;
        section.status = match section.status {
            SectionStatus::Active => SectionStatus::Inactive,
            SectionStatus::Inactive | SectionStatus::Live => SectionStatus::Active,
        };
        Some(section.status)
    }

    /// Append an active section. Blank names and zero revenue are ignored.
    pub fn add(&mut self, name: &str, icon: &str, revenue: f64) -> Option<String> {
        if name.trim().is_empty() || revenue == 0.0 {
            return None;
        }

        let mut millis = Utc::now().timestamp_millis();
        while self.sections.iter().any(|s| s.id == format!("section-{}", millis)) {
            millis += 1;
        }
        let id = format!("section-{}", millis);

        self.sections.push(BusinessSection {
            id: id.clone(),
            name: name.trim().to_string(),
            icon: icon.to_string(),
            value: 0.0,
            revenue,
            trend: 0.0,
            ranking_change: 0,
            yearly_comparison: 0.0,
            mini_trend: Vec::new(),
            status: SectionStatus::Active,
            custom_color: None,
        });
        Some(id)
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.sections.len();
        self.sections.retain(|s| s.id != id);
        before != self.sections.len()
    }

    /// Drop every section and forget the saved record
    pub fn reset(&mut self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        self.sections.clear();
        store.remove(SECTIONS_KEY)?;
        info!("business sections reset");
        Ok(())
    }

    pub fn total_revenue(&self) -> f64 {
        self.sections.iter().map(|s| s.revenue).sum()
    }

    pub fn color_for(&self, index: usize) -> &str {
        self.sections
            .get(index)
            .and_then(|s| s.custom_color.as_deref())
            .unwrap_or(DEFAULT_COLORS[index % DEFAULT_COLORS.len()])
    }

    pub fn shares(&self) -> Vec<SectionShare<'_>> {
        let total = self.total_revenue();
        self.sections
            .iter()
            .enumerate()
            .map(|(i, section)| SectionShare {
                section,
                share: if total == 0.0 {
                    0.0
                } else {
                    (section.revenue / total * 100.0).round()
                },
                color: self.color_for(i),
            })
            .collect()
    }
}
