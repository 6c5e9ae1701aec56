//! Proleptic Gregorian calendar arithmetic.
//!
//! Dates are counted in days since `0001-01-01` (day 0) and date-times in
//! seconds since `0001-01-01 00:00:00`. Years before 1 are supported through
//! floor division, so year 0 is a leap year and `-0001-12-31` is day -367.
//!
//! Elapsed days are decomposed into 400-year cycles, centuries, 4-year groups
//! and single years in closed form. No function scans years iteratively.

mod format;

pub use format::{CalendarFormat, format_date, format_datetime, parse_date, parse_datetime};

use std::fmt;

const DAYS_YEAR: i32 = 365;

const DAYS_JANUARY: i32 = 31;
const DAYS_FEBRUARY: i32 = DAYS_JANUARY + 28;
const DAYS_MARCH: i32 = DAYS_FEBRUARY + 31;
const DAYS_APRIL: i32 = DAYS_MARCH + 30;
const DAYS_MAY: i32 = DAYS_APRIL + 31;
const DAYS_JUNE: i32 = DAYS_MAY + 30;
const DAYS_JULY: i32 = DAYS_JUNE + 31;
const DAYS_AUGUST: i32 = DAYS_JULY + 31;
const DAYS_SEPTEMBER: i32 = DAYS_AUGUST + 30;
const DAYS_OCTOBER: i32 = DAYS_SEPTEMBER + 31;
const DAYS_NOVEMBER: i32 = DAYS_OCTOBER + 30;

/// Days before the first day of each month in a common year.
const DAYS_BEFORE_MONTH: [i32; 12] = [
    0,
    DAYS_JANUARY,
    DAYS_FEBRUARY,
    DAYS_MARCH,
    DAYS_APRIL,
    DAYS_MAY,
    DAYS_JUNE,
    DAYS_JULY,
    DAYS_AUGUST,
    DAYS_SEPTEMBER,
    DAYS_OCTOBER,
    DAYS_NOVEMBER,
];

const YEARS_LEAP_CYCLE: i32 = 400;
const DAYS_LEAP_CYCLE: i32 = DAYS_YEAR * 400 + 400 / 4 - 400 / 100 + 400 / 400;

const YEARS_CENTURY: i32 = 100;
const DAYS_CENTURY: i32 = DAYS_YEAR * 100 + 100 / 4 - 100 / 100;

const YEARS_LEAP: i32 = 4;
const DAYS_LEAP: i32 = DAYS_YEAR * 4 + 1;

const CENTURIES_PER_CYCLE: i32 = YEARS_LEAP_CYCLE / YEARS_CENTURY;

pub const SECONDS_PER_DAY: i64 = 86_400;

/// A calendar date broken into its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CivilDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

/// A time of day broken into its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CivilTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl fmt::Display for CivilDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = String::with_capacity(11);
        format::append_date(&mut buf, *self, '-');
        f.write_str(&buf)
    }
}

impl fmt::Display for CivilTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

pub fn is_leap(year: i32) -> bool {
    if year % 4 != 0 {
        return false;
    }
    year % 100 != 0 || year % 400 == 0
}

/// Returns the number of days in `month` of `year`, or 0 for an invalid month.
pub fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Day-count of January 1st of `year`. Wraps like [`day_count`].
pub fn day_of_year_start(year: i32) -> i32 {
    year_start_wide(year) as i32
}

fn year_start_wide(year: i32) -> i64 {
    let y = i64::from(year) - 1;
    i64::from(DAYS_YEAR) * y + y.div_euclid(4) - y.div_euclid(100) + y.div_euclid(400)
}

/// Day-count of the given date.
///
/// `month` must be in `1..=12`; out-of-range months are clamped. Days past the
/// end of the month roll into the next month. The result wraps for dates
/// whose day-count leaves the `i32` range, roughly beyond year 5,879,610 in
/// either direction.
pub fn day_count(year: i32, month: u8, day: u8) -> i32 {
    debug_assert!((1..=12).contains(&month), "month out of range: {month}");
    let month = month.clamp(1, 12);
    let mut result = year_start_wide(year);
    result += i64::from(DAYS_BEFORE_MONTH[usize::from(month) - 1]);
    result += i64::from(day) - 1;
    if month >= 3 && is_leap(year) {
        result += 1;
    }
    result as i32
}

/// Year containing the given day-count.
pub fn year_of(day_count: i32) -> i32 {
    // 400-year cycles
    let cycles = day_count.div_euclid(DAYS_LEAP_CYCLE);
    let cycle_rest = day_count.rem_euclid(DAYS_LEAP_CYCLE);

    // century in the cycle (0-3); the last day of a cycle belongs to century 3
    let mut cent_in_cycle = cycle_rest / DAYS_CENTURY;
    let mut cent_rest = cycle_rest % DAYS_CENTURY;
    cent_rest += DAYS_CENTURY * (cent_in_cycle / CENTURIES_PER_CYCLE);
    cent_in_cycle -= cent_in_cycle / CENTURIES_PER_CYCLE;

    // 4-year group in the century (0-24)
    let leap_in_cent = cent_rest / DAYS_LEAP;
    let leap_rest = cent_rest % DAYS_LEAP;

    // year in the group (0-3); the leap day belongs to year 3
    let mut year_in_leap = leap_rest / DAYS_YEAR;
    year_in_leap -= year_in_leap / YEARS_LEAP;

    YEARS_LEAP_CYCLE * cycles
        + YEARS_CENTURY * cent_in_cycle
        + YEARS_LEAP * leap_in_cent
        + year_in_leap
        + 1
}

/// Month (1-12) of a zero-based day within a year.
pub fn month_of(day_in_year: i32, leap: bool) -> u8 {
    let mut d = day_in_year;
    if d < DAYS_JANUARY {
        return 1;
    }
    if leap {
        d -= 1;
    }
    match DAYS_BEFORE_MONTH[2..].iter().position(|&start| d < start) {
        Some(index) => index as u8 + 2,
        None => 12,
    }
}

/// Day of month (1-31) of a zero-based day within a year.
pub fn day_of_month(day_in_year: i32, leap: bool) -> u8 {
    let mut d = day_in_year;
    if d < DAYS_FEBRUARY {
        let month = month_of(d, false);
        return (d - DAYS_BEFORE_MONTH[usize::from(month) - 1] + 1) as u8;
    }
    if leap {
        if d == DAYS_FEBRUARY {
            return 29;
        }
        d -= 1;
    }
    let month = month_of(d, false);
    (d - DAYS_BEFORE_MONTH[usize::from(month) - 1] + 1) as u8
}

/// Decomposes a day-count into year, month and day.
pub fn date_of(day_count: i32) -> CivilDate {
    let year = year_of(day_count);
    let day_in_year = (i64::from(day_count) - year_start_wide(year)) as i32;
    let leap = is_leap(year);
    CivilDate {
        year,
        month: month_of(day_in_year, leap),
        day: day_of_month(day_in_year, leap),
    }
}

pub fn second_of_time(hour: u8, minute: u8, second: u8) -> i32 {
    i32::from(hour) * 3600 + i32::from(minute) * 60 + i32::from(second)
}

/// Second-count of the given date and time.
pub fn second_count(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> i64 {
    i64::from(day_count(year, month, day)) * SECONDS_PER_DAY
        + i64::from(second_of_time(hour, minute, second))
}

/// Day-count of the day containing `seconds`.
///
/// Exact for `|seconds|` up to `i32::MAX` days; larger counts wrap.
pub fn days_of_seconds(seconds: i64) -> i32 {
    seconds.div_euclid(SECONDS_PER_DAY) as i32
}

/// Seconds elapsed since midnight, always in `0..86400`.
pub fn second_of_day(seconds: i64) -> i32 {
    seconds.rem_euclid(SECONDS_PER_DAY) as i32
}

pub fn time_of(second_of_day: i32) -> CivilTime {
    CivilTime {
        hour: (second_of_day / 3600) as u8,
        minute: (second_of_day / 60 % 60) as u8,
        second: (second_of_day % 60) as u8,
    }
}

/// Decomposes a second-count into its date and time of day.
pub fn datetime_of(seconds: i64) -> (CivilDate, CivilTime) {
    (
        date_of(days_of_seconds(seconds)),
        time_of(second_of_day(seconds)),
    )
}
