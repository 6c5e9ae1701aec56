//! Fixed-width text forms of dates and date-times.
//!
//! The layouts are `YYYY-MM-DD` and `YYYY-MM-DD hh:mm:ss` with configurable
//! single-character ASCII separators. Parsing accepts only the exact layout;
//! anything else is "no match".

use std::fmt::Write;

use super::{
    CivilDate, CivilTime, SECONDS_PER_DAY, date_of, day_count, days_in_month, days_of_seconds,
    second_of_day, second_of_time, time_of,
};

const COL_YEAR_BEGIN: usize = 0;
const COL_YEAR_END: usize = COL_YEAR_BEGIN + 4;
const COL_MONTH_BEGIN: usize = COL_YEAR_END + 1;
const COL_MONTH_END: usize = COL_MONTH_BEGIN + 2;
const COL_DAY_BEGIN: usize = COL_MONTH_END + 1;
const COL_DAY_END: usize = COL_DAY_BEGIN + 2;
const COL_HOUR_BEGIN: usize = COL_DAY_END + 1;
const COL_HOUR_END: usize = COL_HOUR_BEGIN + 2;
const COL_MINUTE_BEGIN: usize = COL_HOUR_END + 1;
const COL_MINUTE_END: usize = COL_MINUTE_BEGIN + 2;
const COL_SECOND_BEGIN: usize = COL_MINUTE_END + 1;
const COL_SECOND_END: usize = COL_SECOND_BEGIN + 2;

/// Separators used by the text forms of date and date-time boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarFormat {
    date_separator: char,
    datetime_separator: char,
    time_separator: char,
}

impl Default for CalendarFormat {
    fn default() -> Self {
        Self {
            date_separator: '-',
            datetime_separator: ' ',
            time_separator: ':',
        }
    }
}

impl CalendarFormat {
    /// Sets the separator between year, month and day.
    pub fn date_separator(mut self, separator: char) -> Self {
        self.date_separator = separator;
        self
    }

    /// Sets the separator between the date and the time of day.
    pub fn datetime_separator(mut self, separator: char) -> Self {
        self.datetime_separator = separator;
        self
    }

    /// Sets the separator between hour, minute and second.
    pub fn time_separator(mut self, separator: char) -> Self {
        self.time_separator = separator;
        self
    }

    pub fn separators(&self) -> (char, char, char) {
        (
            self.date_separator,
            self.datetime_separator,
            self.time_separator,
        )
    }

    pub fn parse_date(&self, text: &str) -> Option<i32> {
        parse_date(text, self.date_separator)
    }

    pub fn parse_datetime(&self, text: &str) -> Option<i64> {
        parse_datetime(
            text,
            self.date_separator,
            self.datetime_separator,
            self.time_separator,
        )
    }

    pub fn format_date(&self, day_count: i32, out: &mut String) {
        format_date(day_count, self.date_separator, out);
    }

    pub fn format_datetime(&self, second_count: i64, out: &mut String) {
        format_datetime(
            second_count,
            self.date_separator,
            self.datetime_separator,
            self.time_separator,
            out,
        );
    }
}

/// Parses `YYYY<sep>MM<sep>DD` into a day-count.
pub fn parse_date(text: &str, separator: char) -> Option<i32> {
    let bytes = text.as_bytes();
    if bytes.len() != COL_DAY_END
        || !is(bytes, COL_YEAR_END, separator)
        || !is(bytes, COL_MONTH_END, separator)
    {
        return None;
    }
    parse_date_fields(bytes)
}

/// Parses `YYYY<ds>MM<ds>DD<ms>hh<ts>mm<ts>ss` into a second-count.
pub fn parse_datetime(
    text: &str,
    date_separator: char,
    datetime_separator: char,
    time_separator: char,
) -> Option<i64> {
    let bytes = text.as_bytes();
    if bytes.len() != COL_SECOND_END
        || !is(bytes, COL_YEAR_END, date_separator)
        || !is(bytes, COL_MONTH_END, date_separator)
        || !is(bytes, COL_DAY_END, datetime_separator)
        || !is(bytes, COL_HOUR_END, time_separator)
        || !is(bytes, COL_MINUTE_END, time_separator)
    {
        return None;
    }
    let days = parse_date_fields(bytes)?;
    let hour = digits(bytes, COL_HOUR_BEGIN, COL_HOUR_END)?;
    let minute = digits(bytes, COL_MINUTE_BEGIN, COL_MINUTE_END)?;
    let second = digits(bytes, COL_SECOND_BEGIN, COL_SECOND_END)?;
    if hour >= 24 || minute >= 60 || second >= 60 {
        return None;
    }
    let time = second_of_time(hour as u8, minute as u8, second as u8);
    Some(i64::from(days) * SECONDS_PER_DAY + i64::from(time))
}

fn parse_date_fields(bytes: &[u8]) -> Option<i32> {
    let year = digits(bytes, COL_YEAR_BEGIN, COL_YEAR_END)? as i32;
    let month = digits(bytes, COL_MONTH_BEGIN, COL_MONTH_END)?;
    let day = digits(bytes, COL_DAY_BEGIN, COL_DAY_END)?;
    if year <= 0 || !(1..=12).contains(&month) {
        return None;
    }
    let (month, day) = (month as u8, day as u8);
    if day == 0 || day > days_in_month(year, month) {
        return None;
    }
    Some(day_count(year, month, day))
}

fn is(bytes: &[u8], column: usize, separator: char) -> bool {
    separator.is_ascii() && bytes[column] == separator as u8
}

fn digits(bytes: &[u8], begin: usize, end: usize) -> Option<u32> {
    bytes[begin..end].iter().try_fold(0u32, |acc, &b| {
        b.is_ascii_digit().then(|| acc * 10 + u32::from(b - b'0'))
    })
}

/// Appends the fixed-width text of a day-count to `out`.
pub fn format_date(day_count: i32, separator: char, out: &mut String) {
    append_date(out, date_of(day_count), separator);
}

/// Appends the fixed-width text of a second-count to `out`.
pub fn format_datetime(
    second_count: i64,
    date_separator: char,
    datetime_separator: char,
    time_separator: char,
    out: &mut String,
) {
    append_date(out, date_of(days_of_seconds(second_count)), date_separator);
    out.push(datetime_separator);
    append_time(out, time_of(second_of_day(second_count)), time_separator);
}

pub(super) fn append_date(out: &mut String, date: CivilDate, separator: char) {
    fill(out, 4, date.year);
    out.push(separator);
    fill(out, 2, i32::from(date.month));
    out.push(separator);
    fill(out, 2, i32::from(date.day));
}

fn append_time(out: &mut String, time: CivilTime, separator: char) {
    fill(out, 2, i32::from(time.hour));
    out.push(separator);
    fill(out, 2, i32::from(time.minute));
    out.push(separator);
    fill(out, 2, i32::from(time.second));
}

/// Zero-pads `value` to `columns`; a minus sign takes one of the columns.
fn fill(out: &mut String, columns: usize, value: i32) {
    let (columns, magnitude) = if value < 0 {
        out.push('-');
        (columns.saturating_sub(1), value.unsigned_abs())
    } else {
        (columns, value.unsigned_abs())
    };
    let _ = write!(out, "{magnitude:0columns$}");
}
