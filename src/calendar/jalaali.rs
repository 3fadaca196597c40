//! Jalaali (Persian solar) calendar arithmetic.
//!
//! Leap years follow the 33-year cycle anchored on the table of break years
//! used by the reference jalaali algorithm (Borkowski's method). Day counting
//! is delegated to `chrono::NaiveDate`, anchored on 1 Farvardin of each year.

use chrono::{Datelike, Days, NaiveDate};

use super::DateError;

/// Jalaali years at which the leap cycle restarts
const BREAKS: [i32; 20] = [
    -61, 9, 38, 199, 426, 686, 756, 818, 1111, 1181, 1210, 1635, 2060, 2097, 2192, 2262, 2324,
    2394, 2456, 3178,
];

/// First supported Jalaali year
pub const MIN_YEAR: i32 = BREAKS[0];
/// Last supported Jalaali year
pub const MAX_YEAR: i32 = BREAKS[BREAKS.len() - 1] - 1;

/// Leap information for one Jalaali year
struct YearInfo {
    /// Years since the last leap year (0 means this year is leap)
    leap: i32,
    /// Gregorian year in which this Jalaali year starts
    gregorian_year: i32,
    /// March day of the Gregorian year on which 1 Farvardin falls
    march: i32,
}

fn year_info(jy: i32) -> Result<YearInfo, DateError> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&jy) {
        return Err(DateError::OutOfRange(jy));
    }

    let gregorian_year = jy + 621;
    let mut leap_j = -14;
    let mut jp = BREAKS[0];
    let mut jump = 0;

    // Find the cycle containing jy, accumulating leap days of earlier cycles
    for &jm in &BREAKS[1..] {
        jump = jm - jp;
        if jy < jm {
            break;
        }
        leap_j += (jump / 33) * 8 + (jump % 33) / 4;
        jp = jm;
    }

    let mut n = jy - jp;
    leap_j += (n / 33) * 8 + ((n % 33) + 3) / 4;
    if jump % 33 == 4 && jump - n == 4 {
        leap_j += 1;
    }

    // Gregorian leap days up to the same year
    let leap_g = gregorian_year / 4 - ((gregorian_year / 100 + 1) * 3) / 4 - 150;
    let march = 20 + leap_j - leap_g;

    if jump - n < 6 {
        n = n - jump + ((jump + 4) / 33) * 33;
    }
    let mut leap = (((n + 1) % 33) - 1) % 4;
    if leap == -1 {
        leap = 4;
    }

    Ok(YearInfo {
        leap,
        gregorian_year,
        march,
    })
}

/// 1 Farvardin of the given Jalaali year as a Gregorian date
fn farvardin_first(info: &YearInfo) -> Result<NaiveDate, DateError> {
    NaiveDate::from_ymd_opt(info.gregorian_year, 3, info.march as u32).ok_or_else(|| {
        DateError::Invalid(format!("{}-03-{}", info.gregorian_year, info.march))
    })
}

/// Whether Esfand (month 12) of `year` has 30 days.
/// Years outside the supported range are reported as common years.
pub fn is_leap_year(year: i32) -> bool {
    year_info(year).map(|info| info.leap == 0).unwrap_or(false)
}

/// Number of days in a Jalaali month, or 0 for a month outside 1..=12
pub fn month_length(year: i32, month: u32) -> u32 {
    match month {
        1..=6 => 31,
        7..=11 => 30,
        12 => {
            if is_leap_year(year) {
                30
            } else {
                29
            }
        }
        _ => 0,
    }
}

/// Convert a Jalaali date to the Gregorian calendar
pub fn to_gregorian(year: i32, month: u32, day: u32) -> Result<NaiveDate, DateError> {
    let length = month_length(year, month);
    if length == 0 || day == 0 || day > length {
        return Err(DateError::Invalid(format!("{}/{:02}/{:02}", year, month, day)));
    }

    let info = year_info(year)?;
    let start = farvardin_first(&info)?;

    // Months 1-6 have 31 days, 7-11 have 30
    let m = month as u64;
    let offset = (m - 1) * 31 - (m / 7) * (m.saturating_sub(7)) + day as u64 - 1;

    start
        .checked_add_days(Days::new(offset))
        .ok_or_else(|| DateError::Invalid(format!("{}/{:02}/{:02}", year, month, day)))
}

/// Convert a Gregorian date to the Jalaali calendar, as (year, month, day)
pub fn to_jalaali(date: NaiveDate) -> Result<(i32, u32, u32), DateError> {
    // The last weeks of MAX_YEAR fall early in the following Gregorian year
    let mut jy = (date.year() - 621).min(MAX_YEAR);
    let info = year_info(jy)?;
    let start = farvardin_first(&info)?;

    let mut k = date.signed_duration_since(start).num_days();
    if k >= 0 {
        if k <= 185 {
            return Ok((jy, 1 + (k / 31) as u32, (k % 31) as u32 + 1));
        }
        k -= 186;
        let second_half = if info.leap == 0 { 180 } else { 179 };
        if k >= second_half {
            return Err(DateError::OutOfRange(jy + 1));
        }
    } else {
        // Still in the previous Jalaali year (Dey to Esfand)
        jy -= 1;
        if jy < MIN_YEAR {
            return Err(DateError::OutOfRange(jy));
        }
        k += 179;
        if info.leap == 1 {
            k += 1;
        }
    }

    Ok((jy, 7 + (k / 30) as u32, (k % 30) as u32 + 1))
}
