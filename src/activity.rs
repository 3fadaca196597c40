use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::calendar::{self, CalendarDate, CalendarSystem, persian_digits};
use crate::models::{ActivityRecord, ChartType, MetricDefinition, MetricUnit, YAxis};

/// Series keys written by [`empty_series`] besides the default metrics
const EXTRA_SERIES: [&str; 1] = ["efficiency"];

#[allow(clippy::too_many_arguments)]
fn metric(
    id: &str,
    name: &str,
    english_name: &str,
    unit: MetricUnit,
    color: &str,
    chart_type: ChartType,
    y_axis: YAxis,
    enabled: bool,
) -> MetricDefinition {
    MetricDefinition {
        id: id.to_string(),
        name: name.to_string(),
        english_name: english_name.to_string(),
        unit,
        color: color.to_string(),
        chart_type,
        y_axis,
        enabled,
        is_custom: false,
    }
}

pub fn default_metrics() -> Vec<MetricDefinition> {
    vec![
        metric("revenue", "درآمد ماهیانه", "Monthly Revenue", MetricUnit::Irr, "#0088FE", ChartType::Area, YAxis::Left, true),
        metric("projects", "تعداد پروژه‌ها", "Projects Count", MetricUnit::Number, "#00C49F", ChartType::Line, YAxis::Right, true),
        metric("newCustomers", "مشتریان جدید", "New Customers", MetricUnit::Number, "#FFBB28", ChartType::Line, YAxis::Right, true),
        metric("avgProjectValue", "متوسط ارزش پروژه", "Average Project Value", MetricUnit::Irr, "#FF8042", ChartType::Line, YAxis::Left, false),
        metric("revenueGrowth", "نرخ رشد درآمد", "Revenue Growth", MetricUnit::Percentage, "#8884d8", ChartType::Line, YAxis::Right, false),
    ]
}

/// Form state for a user-defined metric
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDraft {
    pub name: String,
    pub english_name: String,
    pub unit: MetricUnit,
    pub color: String,
    pub chart_type: ChartType,
    pub y_axis: YAxis,
}

impl Default for MetricDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            english_name: String::new(),
            unit: MetricUnit::Number,
            color: "#000000".to_string(),
            chart_type: ChartType::Line,
            y_axis: YAxis::Left,
        }
    }
}

/// The metrics plotted on the activity chart, in display order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricSet {
    metrics: Vec<MetricDefinition>,
}

impl Default for MetricSet {
    fn default() -> Self {
        Self {
            metrics: default_metrics(),
        }
    }
}

impl MetricSet {
    pub fn iter(&self) -> impl Iterator<Item = &MetricDefinition> {
        self.metrics.iter()
    }

    pub fn get(&self, id: &str) -> Option<&MetricDefinition> {
        self.metrics.iter().find(|m| m.id == id)
    }

    pub fn enabled(&self) -> impl Iterator<Item = &MetricDefinition> {
        self.metrics.iter().filter(|m| m.enabled)
    }

    /// Flip a metric on or off; returns the new state, `None` for unknown ids
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let metric = self.metrics.iter_mut().find(|m| m.id == id)?;
        metric.enabled = !metric.enabled;
        Some(metric.enabled)
    }

    /// Add an enabled custom metric. Needs both a name and an English name.
    pub fn add_custom(&mut self, draft: MetricDraft) -> Option<String> {
        if draft.name.trim().is_empty() || draft.english_name.trim().is_empty() {
            return None;
        }

        let mut millis = Utc::now().timestamp_millis();
        while self.get(&format!("custom-{}", millis)).is_some() {
            millis += 1;
        }
        let id = format!("custom-{}", millis);

        self.metrics.push(MetricDefinition {
            id: id.clone(),
            name: draft.name,
            english_name: draft.english_name,
            unit: draft.unit,
            color: draft.color,
            chart_type: draft.chart_type,
            y_axis: draft.y_axis,
            enabled: true,
            is_custom: true,
        });
        Some(id)
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.metrics.len();
        self.metrics.retain(|m| m.id != id);
        before != self.metrics.len()
    }

    /// Zero-valued series over `days` days ending `today`, one key per metric
    pub fn series(&self, days: u32, today: NaiveDate) -> Vec<ActivityRecord> {
        zero_series(days, today, self.metrics.iter().map(|m| m.id.as_str()))
    }
}

/// Length of the plotted window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeRange {
    Week,
    Month,
    #[default]
    ThreeMonths,
    SixMonths,
    Year,
    Custom { start: NaiveDate, end: NaiveDate },
}

impl TimeRange {
    pub const PRESETS: [TimeRange; 5] = [
        TimeRange::Week,
        TimeRange::Month,
        TimeRange::ThreeMonths,
        TimeRange::SixMonths,
        TimeRange::Year,
    ];

    /// Number of days covered; a custom range counts whole days between its ends
    pub fn days(&self) -> u32 {
        match self {
            TimeRange::Week => 7,
            TimeRange::Month => 30,
            TimeRange::ThreeMonths => 90,
            TimeRange::SixMonths => 180,
            TimeRange::Year => 365,
            TimeRange::Custom { start, end } => {
                end.signed_duration_since(*start).num_days().max(0) as u32
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Week => "week",
            TimeRange::Month => "month",
            TimeRange::ThreeMonths => "3months",
            TimeRange::SixMonths => "6months",
            TimeRange::Year => "year",
            TimeRange::Custom { .. } => "custom",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::Week => "7 روز گذشته",
            TimeRange::Month => "30 روز گذشته",
            TimeRange::ThreeMonths => "3 ماه اخیر",
            TimeRange::SixMonths => "6 ماه اخیر",
            TimeRange::Year => "1 سال اخیر",
            TimeRange::Custom { .. } => "محدوده سفارشی",
        }
    }
}

impl FromStr for TimeRange {
    type Err = String;

    /// Presets by id, or a custom `START..END` range of ISO dates
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((start, end)) = s.split_once("..") {
            let start = calendar::parse_iso(start).map_err(|e| e.to_string())?;
            let end = calendar::parse_iso(end).map_err(|e| e.to_string())?;
            return Ok(TimeRange::Custom { start, end });
        }
        TimeRange::PRESETS
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("Unknown time range: {}", s))
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeRange::Custom { start, end } => write!(
                f,
                "{}..{}",
                calendar::format_iso(*start),
                calendar::format_iso(*end)
            ),
            other => f.write_str(other.as_str()),
        }
    }
}

/// `days + 1` zero records, oldest first, the last one dated `today`
pub fn empty_series(days: u32, today: NaiveDate) -> Vec<ActivityRecord> {
    let defaults = default_metrics();
    let keys = defaults
        .iter()
        .map(|m| m.id.as_str())
        .chain(EXTRA_SERIES);
    zero_series(days, today, keys)
}

fn zero_series<'a>(days: u32, today: NaiveDate, keys: impl Iterator<Item = &'a str> + Clone) -> Vec<ActivityRecord> {
    (0..=days)
        .rev()
        .map(|back| {
            let date = today - Duration::days(back as i64);
            ActivityRecord {
                date: calendar::format_iso(date),
                values: keys.clone().map(|k| (k.to_string(), 0.0)).collect::<BTreeMap<_, _>>(),
                events: None,
            }
        })
        .collect()
}

/// Persian-digit number with `٬` thousands separators and up to three decimals
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::new();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('٬');
        }
        grouped.push(c);
    }
    if !frac_part.is_empty() {
        grouped.push('٫');
        grouped.push_str(frac_part);
    }
    if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        grouped.insert(0, '-');
    }
    persian_digits(grouped)
}

/// Display form of a metric value
pub fn format_value(value: f64, unit: MetricUnit) -> String {
    match unit {
        MetricUnit::Irr => format!("{} تومان", format_amount(value)),
        MetricUnit::Percentage => format!("{}٪", persian_digits(value)),
        MetricUnit::Number => persian_digits(value),
    }
}

/// Axis label for an ISO date: Persian day and month name. Invalid input gives "".
pub fn format_tick(date: &str) -> String {
    let Ok(day) = calendar::parse_iso(date) else {
        return String::new();
    };
    match CalendarDate::from_naive(day).to_persian() {
        Ok(shown) => format!(
            "{} {}",
            persian_digits(shown.day),
            CalendarSystem::Persian.month_name(shown.month)
        ),
        Err(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metric_set() {
        let set = MetricSet::default();
        let ids: Vec<_> = set.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["revenue", "projects", "newCustomers", "avgProjectValue", "revenueGrowth"]);
        assert_eq!(set.enabled().count(), 3);
    }

    #[test]
    fn toggle_add_and_remove() {
        let mut set = MetricSet::default();
        assert_eq!(set.toggle("revenueGrowth"), Some(true));
        assert_eq!(set.toggle("missing"), None);

        assert!(set.add_custom(MetricDraft { name: "x".into(), ..Default::default() }).is_none());
        let id = set
            .add_custom(MetricDraft {
                name: "بازدید".into(),
                english_name: "Visits".into(),
                ..Default::default()
            })
            .unwrap();
        assert!(id.starts_with("custom-"));
        let added = set.get(&id).unwrap();
        assert!(added.enabled && added.is_custom);

        assert!(set.remove(&id));
        assert!(!set.remove(&id));
    }

    #[test]
    fn time_ranges() {
        assert_eq!(TimeRange::default().days(), 90);
        assert_eq!("6months".parse::<TimeRange>().unwrap().days(), 180);
        let custom: TimeRange = "2024-01-01..2024-01-31".parse().unwrap();
        assert_eq!(custom.days(), 30);
        assert_eq!(custom.to_string(), "2024-01-01..2024-01-31");
        assert!("fortnight".parse::<TimeRange>().is_err());
    }

    #[test]
    fn empty_series_ends_today() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        let series = empty_series(7, today);
        assert_eq!(series.len(), 8);
        assert_eq!(series[0].date, "2024-03-13");
        assert_eq!(series[7].date, "2024-03-20");
        assert_eq!(series[3].values["revenue"], 0.0);
        assert!(series[3].values.contains_key("efficiency"));
    }

    #[test]
    fn value_formatting() {
        assert_eq!(format_amount(1234567.0), "۱٬۲۳۴٬۵۶۷");
        assert_eq!(format_amount(999.0), "۹۹۹");
        assert_eq!(format_amount(1500.5), "۱٬۵۰۰٫۵");
        assert_eq!(format_value(2500000.0, MetricUnit::Irr), "۲٬۵۰۰٬۰۰۰ تومان");
        assert_eq!(format_value(12.5, MetricUnit::Percentage), "۱۲.۵٪");
        assert_eq!(format_value(42.0, MetricUnit::Number), "۴۲");
    }

    #[test]
    fn tick_labels() {
        assert_eq!(format_tick("2023-09-06"), "۱۵ شهریور");
        assert_eq!(format_tick("not-a-date"), "");
        assert_eq!(format_tick(""), "");
    }
}
