use chrono::{Datelike, NaiveDate};

use super::{CalendarDate, CalendarSystem, DateError, days_in_month, format_iso};

/// Layout of one month in a 7-column week grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthGrid {
    pub system: CalendarSystem,
    pub year: i32,
    pub month: u32,
    pub days_in_month: u32,
    /// Empty cells before day 1 (Saturday-first for Persian, Sunday-first for Gregorian)
    pub leading_blanks: u32,
}

impl MonthGrid {
    /// Build the grid for a month. Months outside 1..=12 roll over into the
    /// neighbouring years, so navigation can pass `month - 1` or `month + 1` directly.
    pub fn build(year: i32, month: i32, system: CalendarSystem) -> Result<Self, DateError> {
        let (year, month) = shift_month(year, month, 0)?;
        let days_in_month = days_in_month(system, year, month)?;
        let first = CalendarDate::new(system, year, month, 1)?.to_naive()?;

        Ok(Self {
            system,
            year,
            month,
            days_in_month,
            leading_blanks: weekday_offset(first, system),
        })
    }

    /// Total cells once trailing blanks pad the last week
    pub fn cell_count(&self) -> usize {
        let used = (self.leading_blanks + self.days_in_month) as usize;
        used.div_ceil(7) * 7
    }

    /// Cells in reading order: `None` for blanks, `Some(day)` for days
    pub fn cells(&self) -> Vec<Option<u32>> {
        let mut cells = Vec::with_capacity(self.cell_count());
        cells.extend((0..self.leading_blanks).map(|_| None));
        cells.extend((1..=self.days_in_month).map(Some));
        cells.resize(self.cell_count(), None);
        cells
    }

    pub fn weeks(&self) -> Vec<Vec<Option<u32>>> {
        self.cells().chunks(7).map(|w| w.to_vec()).collect()
    }

    /// Storage key (Gregorian ISO) for a day of this month
    pub fn iso_for_day(&self, day: u32) -> Result<String, DateError> {
        iso_for_day(self.year, self.month, day, self.system)
    }

    pub fn previous(&self) -> Result<Self, DateError> {
        Self::build(self.year, self.month as i32 - 1, self.system)
    }

    pub fn next(&self) -> Result<Self, DateError> {
        Self::build(self.year, self.month as i32 + 1, self.system)
    }
}

/// Move `delta` months from (year, month), wrapping across year boundaries.
/// `month` itself may already be out of range (0 means December of the previous year).
pub fn shift_month(year: i32, month: i32, delta: i32) -> Result<(i32, u32), DateError> {
    let total = year
        .checked_mul(12)
        .and_then(|t| t.checked_add(month.checked_sub(1)?))
        .and_then(|t| t.checked_add(delta))
        .ok_or(DateError::OutOfRange(year))?;
    Ok((total.div_euclid(12), (total.rem_euclid(12) + 1) as u32))
}

/// Column of a day in the week grid of the given calendar
pub fn weekday_offset(date: NaiveDate, system: CalendarSystem) -> u32 {
    let from_sunday = date.weekday().num_days_from_sunday();
    match system {
        CalendarSystem::Gregorian => from_sunday,
        // Saturday is the first column
        CalendarSystem::Persian => (from_sunday + 1) % 7,
    }
}

/// The (year, month) containing `today` in the given calendar
pub fn current_month(today: NaiveDate, system: CalendarSystem) -> Result<(i32, u32), DateError> {
    let shown = CalendarDate::from_naive(today).to_system(system)?;
    Ok((shown.year, shown.month))
}

/// Gregorian ISO key for a grid cell; notes are always stored in Gregorian
pub fn iso_for_day(year: i32, month: u32, day: u32, system: CalendarSystem) -> Result<String, DateError> {
    Ok(format_iso(CalendarDate::new(system, year, month, day)?.to_naive()?))
}

/// Whether a grid cell is the given `today`
pub fn is_today(year: i32, month: u32, day: u32, system: CalendarSystem, today: NaiveDate) -> bool {
    CalendarDate::new(system, year, month, day)
        .and_then(|d| d.to_naive())
        .map(|d| d == today)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn farvardin_1403_starts_on_wednesday() {
        // 1403/01/01 is Wednesday 2024-03-20: Sat, Sun, Mon, Tue come first
        let grid = MonthGrid::build(1403, 1, CalendarSystem::Persian).unwrap();
        assert_eq!(grid.leading_blanks, 4);
        assert_eq!(grid.days_in_month, 31);
    }

    #[test]
    fn gregorian_grid_is_sunday_first() {
        // 2024-03-01 is a Friday
        let grid = MonthGrid::build(2024, 3, CalendarSystem::Gregorian).unwrap();
        assert_eq!(grid.leading_blanks, 5);
        assert_eq!(grid.days_in_month, 31);
        assert_eq!(grid.cell_count(), 42);
    }

    #[test]
    fn cells_pad_to_whole_weeks() {
        for system in [CalendarSystem::Persian, CalendarSystem::Gregorian] {
            let base_year = if system == CalendarSystem::Persian { 1400 } else { 2021 };
            for year in base_year..base_year + 5 {
                for month in 1..=12 {
                    let grid = MonthGrid::build(year, month, system).unwrap();
                    let cells = grid.cells();
                    assert_eq!(cells.len() % 7, 0);
                    assert!(cells.len() >= grid.days_in_month as usize);
                    assert_eq!(cells.iter().flatten().count(), grid.days_in_month as usize);
                    assert_eq!(cells[grid.leading_blanks as usize], Some(1));
                }
            }
        }
    }

    #[test]
    fn huge_years_and_months_are_out_of_range() {
        assert_eq!(shift_month(i32::MAX, 1, 0), Err(DateError::OutOfRange(i32::MAX)));
        assert_eq!(shift_month(1402, i32::MIN, 0), Err(DateError::OutOfRange(1402)));
        assert_eq!(shift_month(1402, i32::MAX, 1), Err(DateError::OutOfRange(1402)));
        assert!(MonthGrid::build(i32::MAX, 1, CalendarSystem::Gregorian).is_err());
        assert!(MonthGrid::build(400_000_000, 1, CalendarSystem::Persian).is_err());
    }

    #[test]
    fn month_rollover() {
        assert_eq!(shift_month(1402, 1, -1).unwrap(), (1401, 12));
        assert_eq!(shift_month(1402, 12, 1).unwrap(), (1403, 1));
        assert_eq!(shift_month(1402, 0, 0).unwrap(), (1401, 12));
        assert_eq!(shift_month(1402, 13, 0).unwrap(), (1403, 1));
        assert_eq!(shift_month(1402, 5, -17).unwrap(), (1400, 12));

        let grid = MonthGrid::build(1402, 13, CalendarSystem::Persian).unwrap();
        assert_eq!((grid.year, grid.month), (1403, 1));
        let prev = grid.previous().unwrap();
        assert_eq!((prev.year, prev.month), (1402, 12));
        assert_eq!(prev.days_in_month, 29);
    }

    #[test]
    fn persian_cells_map_to_gregorian_keys() {
        let grid = MonthGrid::build(1402, 6, CalendarSystem::Persian).unwrap();
        assert_eq!(grid.iso_for_day(15).unwrap(), "2023-09-06");
        assert!(grid.iso_for_day(32).is_err());

        let today = NaiveDate::from_ymd_opt(2023, 9, 6).unwrap();
        assert!(is_today(1402, 6, 15, CalendarSystem::Persian, today));
        assert!(!is_today(1402, 6, 16, CalendarSystem::Persian, today));
        assert_eq!(current_month(today, CalendarSystem::Persian).unwrap(), (1402, 6));
        assert_eq!(current_month(today, CalendarSystem::Gregorian).unwrap(), (2023, 9));
    }
}
