//! HL7 TS dates with explicit precision.
//!
//! E2B dates are transmitted as `YYYY[MM[DD[HH[MM[SS[.F]]]]]][+/-ZZZZ]`. The
//! number of digits present determines the precision; fields declare the
//! minimum precision they accept.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Precision of an HL7 date, ordered from coarsest to finest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePrecision {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl DatePrecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatePrecision::Year => "year",
            DatePrecision::Month => "month",
            DatePrecision::Day => "day",
            DatePrecision::Hour => "hour",
            DatePrecision::Minute => "minute",
            DatePrecision::Second => "second",
        }
    }

    fn from_digit_count(count: usize) -> Option<Self> {
        match count {
            4 => Some(DatePrecision::Year),
            6 => Some(DatePrecision::Month),
            8 => Some(DatePrecision::Day),
            10 => Some(DatePrecision::Hour),
            12 => Some(DatePrecision::Minute),
            14 => Some(DatePrecision::Second),
            _ => None,
        }
    }
}

impl fmt::Display for DatePrecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated HL7 TS value.
///
/// The original text is kept so that encoding is lossless.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hl7Date {
    text: String,
    precision: DatePrecision,
}

impl Hl7Date {
    /// Parse an HL7 TS value, checking the calendar.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let text = raw.trim();
        let (main, zone) = split_zone(text);
        if let Some(zone) = zone
            && (zone.len() != 4 || !zone.bytes().all(|b| b.is_ascii_digit()))
        {
            return Err(format!("invalid time zone offset '{zone}'"));
        }
        let (digits, fraction) = match main.split_once('.') {
            Some((digits, fraction)) => (digits, Some(fraction)),
            None => (main, None),
        };
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err("expected digits only".to_string());
        }
        let precision = DatePrecision::from_digit_count(digits.len())
            .ok_or_else(|| format!("unexpected length {}", digits.len()))?;
        if let Some(fraction) = fraction
            && (precision != DatePrecision::Second
                || fraction.is_empty()
                || !fraction.bytes().all(|b| b.is_ascii_digit()))
        {
            return Err("fractional seconds require second precision".to_string());
        }
        check_calendar(digits)?;
        Ok(Self {
            text: text.to_string(),
            precision,
        })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            text: date.format("%Y%m%d").to_string(),
            precision: DatePrecision::Day,
        }
    }

    pub fn from_datetime(datetime: NaiveDateTime) -> Self {
        Self {
            text: datetime.format("%Y%m%d%H%M%S").to_string(),
            precision: DatePrecision::Second,
        }
    }

    pub fn precision(&self) -> DatePrecision {
        self.precision
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn year(&self) -> i32 {
        self.text[..4].parse().unwrap_or_default()
    }

    /// Calendar date, when the value has at least day precision.
    pub fn date(&self) -> Option<NaiveDate> {
        if self.precision < DatePrecision::Day {
            return None;
        }
        NaiveDate::parse_from_str(&self.text[..8], "%Y%m%d").ok()
    }
}

fn split_zone(text: &str) -> (&str, Option<&str>) {
    match text
        .char_indices()
        .skip(1)
        .find(|(_, c)| *c == '+' || *c == '-')
    {
        Some((index, _)) => (&text[..index], Some(&text[index + 1..])),
        None => (text, None),
    }
}

fn check_calendar(digits: &str) -> Result<(), String> {
    let field = |range: std::ops::Range<usize>| -> Option<u32> {
        digits.get(range).and_then(|part| part.parse().ok())
    };
    let year: i32 = digits[..4].parse().map_err(|_| "invalid year".to_string())?;
    let month = field(4..6).unwrap_or(1);
    let day = field(6..8).unwrap_or(1);
    if NaiveDate::from_ymd_opt(year, month, day).is_none() {
        return Err(format!("{year:04}-{month:02}-{day:02} is not a calendar date"));
    }
    let hour = field(8..10).unwrap_or(0);
    let minute = field(10..12).unwrap_or(0);
    let second = field(12..14).unwrap_or(0);
    if NaiveTime::from_hms_opt(hour, minute, second).is_none() {
        return Err(format!("{hour:02}:{minute:02}:{second:02} is not a valid time"));
    }
    Ok(())
}

impl FromStr for Hl7Date {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hl7Date::parse(s)
    }
}

impl TryFrom<String> for Hl7Date {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Hl7Date::parse(&value)
    }
}

impl From<Hl7Date> for String {
    fn from(value: Hl7Date) -> Self {
        value.text
    }
}

impl fmt::Display for Hl7Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
