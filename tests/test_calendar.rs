use chrono::NaiveDate;
use taqvim::calendar::{self, CalendarDate, CalendarSystem, MonthGrid};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn nowruz_dates_convert_both_ways() {
    for (gregorian, persian) in [
        (day(2023, 3, 21), (1402, 1, 1)),
        (day(2024, 3, 20), (1403, 1, 1)),
        (day(2025, 3, 21), (1404, 1, 1)),
    ] {
        let shown = CalendarDate::from_naive(gregorian).to_persian().unwrap();
        assert_eq!((shown.year, shown.month, shown.day), persian);
        assert_eq!(shown.to_naive().unwrap(), gregorian);
    }
}

#[test]
fn timeline_and_note_dates_convert() {
    assert_eq!(calendar::to_calendar_date("1402/06/15").unwrap(), "2023-09-06");
    assert_eq!(calendar::to_timeline_date("2023-09-06").unwrap(), "1402/06/15");
    assert_eq!(calendar::to_calendar_date("").unwrap(), "");
    assert!(calendar::to_calendar_date("1402/13/01").is_err());
    assert!(calendar::to_timeline_date("2023-02-30").is_err());
}

#[test]
fn every_day_of_a_persian_year_round_trips() {
    let mut date = day(2024, 3, 20);
    while date < day(2025, 3, 21) {
        let persian = calendar::format_persian(date).unwrap();
        assert_eq!(calendar::to_calendar_date(&persian).unwrap(), calendar::format_iso(date));
        date = date.succ_opt().unwrap();
    }
}

#[test]
fn grids_cover_whole_weeks() {
    let esfand = MonthGrid::build(1403, 12, CalendarSystem::Persian).unwrap();
    assert_eq!(esfand.days_in_month, 30); // 1403 is leap
    assert_eq!(esfand.cell_count() % 7, 0);
    assert!(esfand.cells().iter().flatten().count() == 30);

    let rolled = MonthGrid::build(1403, 13, CalendarSystem::Persian).unwrap();
    assert_eq!((rolled.year, rolled.month), (1404, 1));

    let february = MonthGrid::build(2024, 2, CalendarSystem::Gregorian).unwrap();
    assert_eq!(february.days_in_month, 29);
    assert_eq!(february.iso_for_day(29).unwrap(), "2024-02-29");
}

#[test]
fn display_forms() {
    assert_eq!(
        calendar::display_date(day(2023, 9, 6), CalendarSystem::Persian).unwrap(),
        "۱۵ شهریور ۱۴۰۲"
    );
    assert_eq!(CalendarSystem::Persian.display_number(1402), "۱۴۰۲");
    assert_eq!(CalendarSystem::Gregorian.month_name(9), "September");
}
