pub mod grid;
pub mod jalaali;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use grid::{MonthGrid, shift_month};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("Invalid date: {0}")]
    Invalid(String),
    #[error("Jalaali year {0} is outside the supported range")]
    OutOfRange(i32),
    #[error("Failed to parse date '{0}'")]
    Parse(String),
}

/// Persian month names (Farvardin to Esfand)
pub const PERSIAN_MONTHS: [&str; 12] = [
    "فروردین", "اردیبهشت", "خرداد", "تیر", "مرداد", "شهریور",
    "مهر", "آبان", "آذر", "دی", "بهمن", "اسفند",
];

pub const GREGORIAN_MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

/// Week headers, Saturday first
pub const PERSIAN_WEEKDAYS: [&str; 7] = ["ش", "ی", "د", "س", "چ", "پ", "ج"];
/// Week headers, Sunday first
pub const GREGORIAN_WEEKDAYS: [&str; 7] = ["S", "M", "T", "W", "T", "F", "S"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarSystem {
    #[default]
    Persian,
    Gregorian,
}

impl CalendarSystem {
    pub fn toggle(self) -> Self {
        match self {
            CalendarSystem::Persian => CalendarSystem::Gregorian,
            CalendarSystem::Gregorian => CalendarSystem::Persian,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CalendarSystem::Persian => "persian",
            CalendarSystem::Gregorian => "gregorian",
        }
    }

    /// Month name for a 1-based month, empty for anything outside 1..=12
    pub fn month_name(self, month: u32) -> &'static str {
        let names = match self {
            CalendarSystem::Persian => &PERSIAN_MONTHS,
            CalendarSystem::Gregorian => &GREGORIAN_MONTHS,
        };
        month
            .checked_sub(1)
            .and_then(|i| names.get(i as usize))
            .copied()
            .unwrap_or("")
    }

    pub fn weekday_headers(self) -> [&'static str; 7] {
        match self {
            CalendarSystem::Persian => PERSIAN_WEEKDAYS,
            CalendarSystem::Gregorian => GREGORIAN_WEEKDAYS,
        }
    }

    /// Render a number the way this calendar displays it
    pub fn display_number(self, n: impl fmt::Display) -> String {
        match self {
            CalendarSystem::Persian => persian_digits(n),
            CalendarSystem::Gregorian => n.to_string(),
        }
    }
}

impl FromStr for CalendarSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "persian" | "jalaali" | "shamsi" => Ok(CalendarSystem::Persian),
            "gregorian" | "miladi" => Ok(CalendarSystem::Gregorian),
            other => Err(format!("Unknown calendar system: {}", other)),
        }
    }
}

impl fmt::Display for CalendarSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated date tagged with the calendar it is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarDate {
    pub system: CalendarSystem,
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl CalendarDate {
    pub fn new(system: CalendarSystem, year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        let length = days_in_month(system, year, month)?;
        if day == 0 || day > length {
            return Err(DateError::Invalid(format!("{}-{:02}-{:02}", year, month, day)));
        }
        Ok(Self { system, year, month, day })
    }

    pub fn persian(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        Self::new(CalendarSystem::Persian, year, month, day)
    }

    pub fn gregorian(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        Self::new(CalendarSystem::Gregorian, year, month, day)
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        Self {
            system: CalendarSystem::Gregorian,
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }

    /// The same day as a Gregorian `NaiveDate`
    pub fn to_naive(&self) -> Result<NaiveDate, DateError> {
        match self.system {
            CalendarSystem::Gregorian => NaiveDate::from_ymd_opt(self.year, self.month, self.day)
                .ok_or_else(|| DateError::Invalid(self.to_string())),
            CalendarSystem::Persian => jalaali::to_gregorian(self.year, self.month, self.day),
        }
    }

    pub fn to_persian(&self) -> Result<Self, DateError> {
        self.to_system(CalendarSystem::Persian)
    }

    pub fn to_gregorian(&self) -> Result<Self, DateError> {
        self.to_system(CalendarSystem::Gregorian)
    }

    pub fn to_system(&self, system: CalendarSystem) -> Result<Self, DateError> {
        if self.system == system {
            return Ok(*self);
        }
        let naive = self.to_naive()?;
        match system {
            CalendarSystem::Gregorian => Ok(Self::from_naive(naive)),
            CalendarSystem::Persian => {
                let (year, month, day) = jalaali::to_jalaali(naive)?;
                Ok(Self { system, year, month, day })
            }
        }
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.system {
            CalendarSystem::Persian => write!(f, "{}/{:02}/{:02}", self.year, self.month, self.day),
            CalendarSystem::Gregorian => write!(f, "{}-{:02}-{:02}", self.year, self.month, self.day),
        }
    }
}

/// Number of days in a month of either calendar
pub fn days_in_month(system: CalendarSystem, year: i32, month: u32) -> Result<u32, DateError> {
    if !(1..=12).contains(&month) {
        return Err(DateError::Invalid(format!("month {} of {}", month, year)));
    }
    match system {
        CalendarSystem::Persian => {
            if !(jalaali::MIN_YEAR..=jalaali::MAX_YEAR).contains(&year) {
                return Err(DateError::OutOfRange(year));
            }
            Ok(jalaali::month_length(year, month))
        }
        CalendarSystem::Gregorian => {
            let (next_year, next_month) = if month == 12 {
                (year.checked_add(1).ok_or(DateError::OutOfRange(year))?, 1)
            } else {
                (year, month + 1)
            };
            let first = NaiveDate::from_ymd_opt(year, month, 1);
            let next = NaiveDate::from_ymd_opt(next_year, next_month, 1);
            match (first, next) {
                (Some(first), Some(next)) => Ok(next.signed_duration_since(first).num_days() as u32),
                _ => Err(DateError::Invalid(format!("{}-{:02}", year, month))),
            }
        }
    }
}

/// Parse a Gregorian `YYYY-MM-DD` storage string
pub fn parse_iso(s: &str) -> Result<NaiveDate, DateError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| DateError::Parse(s.to_string()))
}

pub fn format_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a Persian `YYYY/MM/DD` timeline string into a validated date
pub fn parse_persian(s: &str) -> Result<CalendarDate, DateError> {
    let parts: Vec<&str> = s.trim().split('/').collect();
    if parts.len() != 3 {
        return Err(DateError::Parse(s.to_string()));
    }
    let year = parts[0].trim().parse::<i32>().map_err(|_| DateError::Parse(s.to_string()))?;
    let month = parts[1].trim().parse::<u32>().map_err(|_| DateError::Parse(s.to_string()))?;
    let day = parts[2].trim().parse::<u32>().map_err(|_| DateError::Parse(s.to_string()))?;
    CalendarDate::persian(year, month, day)
}

/// Persian timeline string for a Gregorian day
pub fn format_persian(date: NaiveDate) -> Result<String, DateError> {
    Ok(CalendarDate::from_naive(date).to_persian()?.to_string())
}

/// Convert a Persian timeline date to the ISO string used by calendar notes.
/// An empty input maps to an empty output.
pub fn to_calendar_date(persian: &str) -> Result<String, DateError> {
    if persian.trim().is_empty() {
        return Ok(String::new());
    }
    Ok(format_iso(parse_persian(persian)?.to_naive()?))
}

/// Convert an ISO calendar-note date to the Persian timeline format.
/// An empty input maps to an empty output.
pub fn to_timeline_date(iso: &str) -> Result<String, DateError> {
    if iso.trim().is_empty() {
        return Ok(String::new());
    }
    format_persian(parse_iso(iso)?)
}

/// Replace ASCII digits with Persian digits
pub fn persian_digits(n: impl fmt::Display) -> String {
    n.to_string()
        .chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => char::from_u32('۰' as u32 + d).unwrap_or(c),
            None => c,
        })
        .collect()
}

/// Long display form, e.g. `۱۵ شهریور ۱۴۰۲` or `September 6, 2023`
pub fn display_date(date: NaiveDate, system: CalendarSystem) -> Result<String, DateError> {
    let shown = CalendarDate::from_naive(date).to_system(system)?;
    Ok(match system {
        CalendarSystem::Persian => format!(
            "{} {} {}",
            persian_digits(shown.day),
            system.month_name(shown.month),
            persian_digits(shown.year)
        ),
        CalendarSystem::Gregorian => format!(
            "{} {}, {}",
            system.month_name(shown.month),
            shown.day,
            shown.year
        ),
    })
}
