//! Date and date-time boxes.
//!
//! Both store a count from `0001-01-01`: days for [`Date`], seconds for
//! [`DateTime`]. The raw form biases the count like an integer box; the
//! stream form writes it plainly.

use std::cmp::Ordering;
use std::fmt;

use bytes::{Buf, BufMut};

use super::ValueKind;
use super::fixed::{FixedBox, FixedValue};
use super::sealed::Sealed;
use crate::calendar::{self, CalendarFormat, CivilDate, CivilTime};
use crate::error::ValueError;
use crate::order;
use crate::text::quote;

/// A calendar date as a day-count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    pub days: i32,
}

impl Date {
    pub fn from_days(days: i32) -> Self {
        Self { days }
    }

    pub fn from_ymd(year: i32, month: u8, day: u8) -> Self {
        Self::from_days(calendar::day_count(year, month, day))
    }

    pub fn civil(self) -> CivilDate {
        calendar::date_of(self.days)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.civil(), f)
    }
}

/// A calendar date-time as a second-count.
///
/// Every `i64` is a valid payload, but the civil fields are only meaningful
/// while the day-count fits an `i32`; beyond that [`civil`](Self::civil) and
/// `Display` wrap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTime {
    pub seconds: i64,
}

impl DateTime {
    pub fn from_seconds(seconds: i64) -> Self {
        Self { seconds }
    }

    pub fn from_ymd_hms(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self::from_seconds(calendar::second_count(year, month, day, hour, minute, second))
    }

    pub fn civil(self) -> (CivilDate, CivilTime) {
        calendar::datetime_of(self.seconds)
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (date, time) = self.civil();
        write!(f, "{date} {time}")
    }
}

impl Sealed for Date {}
impl Sealed for DateTime {}

impl FixedValue for Date {
    const KIND: ValueKind = ValueKind::Date;
    const WIDTH: usize = 4;

    fn compare_values(&self, other: &Self) -> Ordering {
        self.days.cmp(&other.days)
    }

    fn put_stream(self, buf: &mut impl BufMut) {
        buf.put_i32(self.days);
    }

    fn get_stream(buf: &mut impl Buf) -> Self {
        Self::from_days(buf.get_i32())
    }

    fn put_raw(self, buf: &mut impl BufMut) {
        buf.put_u32(order::bias_i32(self.days));
    }

    fn get_raw(buf: &[u8], offset: usize) -> Result<Self, ValueError> {
        order::read_u32(buf, offset).map(|raw| Self::from_days(order::unbias_i32(raw)))
    }
}

impl FixedValue for DateTime {
    const KIND: ValueKind = ValueKind::DateTime;
    const WIDTH: usize = 8;

    fn compare_values(&self, other: &Self) -> Ordering {
        self.seconds.cmp(&other.seconds)
    }

    fn put_stream(self, buf: &mut impl BufMut) {
        buf.put_i64(self.seconds);
    }

    fn get_stream(buf: &mut impl Buf) -> Self {
        Self::from_seconds(buf.get_i64())
    }

    fn put_raw(self, buf: &mut impl BufMut) {
        buf.put_u64(order::bias_i64(self.seconds));
    }

    fn get_raw(buf: &[u8], offset: usize) -> Result<Self, ValueError> {
        order::read_u64(buf, offset).map(|raw| Self::from_seconds(order::unbias_i64(raw)))
    }
}

pub type DateBox = FixedBox<Date>;
pub type DateTimeBox = FixedBox<DateTime>;

impl FixedBox<Date> {
    pub fn set_date(&mut self, year: i32, month: u8, day: u8) -> &mut Self {
        self.set(Date::from_ymd(year, month, day))
    }

    pub fn civil(&self) -> Result<CivilDate, ValueError> {
        self.get().map(Date::civil)
    }

    /// Sets the box from `YYYY-MM-DD` text laid out per `format`.
    pub fn parse_text(&mut self, text: &str, format: &CalendarFormat) -> Result<(), ValueError> {
        let days = format
            .parse_date(text)
            .ok_or_else(|| ValueError::Malformed(format!("not a date: {}", quote(text))))?;
        self.set(Date::from_days(days));
        Ok(())
    }

    /// Appends the text form to `out`.
    pub fn format_text(&self, format: &CalendarFormat, out: &mut String) -> Result<(), ValueError> {
        format.format_date(self.get()?.days, out);
        Ok(())
    }
}

impl FixedBox<DateTime> {
    pub fn set_datetime(
        &mut self,
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> &mut Self {
        self.set(DateTime::from_ymd_hms(year, month, day, hour, minute, second))
    }

    pub fn civil(&self) -> Result<(CivilDate, CivilTime), ValueError> {
        self.get().map(DateTime::civil)
    }

    /// Sets the box from `YYYY-MM-DD hh:mm:ss` text laid out per `format`.
    pub fn parse_text(&mut self, text: &str, format: &CalendarFormat) -> Result<(), ValueError> {
        let seconds = format
            .parse_datetime(text)
            .ok_or_else(|| ValueError::Malformed(format!("not a date-time: {}", quote(text))))?;
        self.set(DateTime::from_seconds(seconds));
        Ok(())
    }

    /// Appends the text form to `out`.
    pub fn format_text(&self, format: &CalendarFormat, out: &mut String) -> Result<(), ValueError> {
        format.format_datetime(self.get()?.seconds, out);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueOption;

    #[test]
    fn set_date_and_decompose() {
        let mut b = DateBox::new();
        b.set_date(2024, 2, 29);
        assert_eq!(
            b.civil().unwrap(),
            CivilDate {
                year: 2024,
                month: 2,
                day: 29
            }
        );
        assert_eq!(b.to_string(), "2024-02-29");
        assert_eq!(DateBox::new().civil(), Err(ValueError::EmptyValue));
    }

    #[test]
    fn epoch_raw_layout() {
        let mut buf = Vec::new();
        DateBox::of(Date::from_days(0)).emit(&mut buf);
        assert_eq!(buf, vec![0x01, 0x80, 0x00, 0x00, 0x00]);

        buf.clear();
        DateTimeBox::of(DateTime::from_seconds(-1)).emit(&mut buf);
        assert_eq!(buf, vec![0x01, 0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);

        buf.clear();
        DateBox::of(Date::from_days(-1)).write_stream(&mut buf);
        assert_eq!(buf, vec![0x01, 0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn raw_order_follows_time() {
        let early = DateTimeBox::of(DateTime::from_ymd_hms(-44, 3, 15, 12, 0, 0));
        let late = DateTimeBox::of(DateTime::from_ymd_hms(1970, 1, 1, 0, 0, 0));
        let (mut a, mut b) = (Vec::new(), Vec::new());
        early.emit(&mut a);
        late.emit(&mut b);
        assert_eq!(DateTimeBox::compare_bytes(&a, 0, &b, 0), Ok(Ordering::Less));
        assert_eq!(early.compare(&late), Ordering::Less);
    }

    #[test]
    fn parse_and_format_text() {
        let format = CalendarFormat::default();
        let mut b = DateTimeBox::new();
        b.parse_text("2001-09-11 08:46:40", &format).unwrap();
        let (date, time) = b.civil().unwrap();
        assert_eq!((date.year, date.month, date.day), (2001, 9, 11));
        assert_eq!((time.hour, time.minute, time.second), (8, 46, 40));

        let mut out = String::new();
        b.format_text(&format.datetime_separator('T'), &mut out).unwrap();
        assert_eq!(out, "2001-09-11T08:46:40");
        assert_eq!(b.to_string(), "2001-09-11 08:46:40");
    }

    #[test]
    fn parse_text_failure_keeps_error_text() {
        let mut b = DateBox::of(Date::from_days(5));
        let err = b.parse_text("2024-02-30", &CalendarFormat::default()).unwrap_err();
        assert_eq!(err.to_string(), "malformed input: not a date: \"2024-02-30\"");
        assert_eq!(b.get(), Ok(Date::from_days(5)));

        let mut out = String::new();
        assert_eq!(
            DateBox::new().format_text(&CalendarFormat::default(), &mut out),
            Err(ValueError::EmptyValue)
        );
    }

    #[test]
    fn round_trips_at_extremes() {
        for days in [i32::MIN, -1, 0, i32::MAX] {
            let b = DateBox::of(Date::from_days(days));
            let mut buf = Vec::new();
            b.emit(&mut buf);
            let mut restored = DateBox::new();
            assert_eq!(restored.restore(&buf, 0), Ok(5));
            assert_eq!(restored, b);

            buf.clear();
            b.write_stream(&mut buf);
            let mut cursor = &buf[..];
            restored.clear();
            restored.read_stream(&mut cursor).unwrap();
            assert_eq!(restored, b);
        }
    }

    #[test]
    fn datetime_round_trips_at_extremes() {
        for seconds in [i64::MIN, -1, 0, 1, i64::MAX] {
            let b = DateTimeBox::of(DateTime::from_seconds(seconds));
            let mut buf = vec![0x5A];
            b.emit(&mut buf);
            assert_eq!(buf.len(), 10);
            let mut restored = DateTimeBox::of(DateTime::from_seconds(7));
            assert_eq!(restored.restore(&buf, 1), Ok(9));
            assert_eq!(restored.get(), Ok(DateTime::from_seconds(seconds)));

            buf.clear();
            b.write_stream(&mut buf);
            let mut cursor = &buf[..];
            restored.clear();
            restored.read_stream(&mut cursor).unwrap();
            assert!(cursor.is_empty());
            assert_eq!(restored, b);
        }

        let null = DateTimeBox::new();
        let mut buf = Vec::new();
        null.emit(&mut buf);
        let mut restored = DateTimeBox::of(DateTime::from_seconds(3));
        assert_eq!(restored.restore(&buf, 0), Ok(1));
        assert!(restored.is_null());

        buf.clear();
        null.write_stream(&mut buf);
        restored.set(DateTime::from_seconds(3));
        restored.read_stream(&mut &buf[..]).unwrap();
        assert!(restored.is_null());
    }
}
