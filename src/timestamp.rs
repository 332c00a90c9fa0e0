//! Request Timestamp Resolution
//!
//! Accepts ISO-8601 text (a trailing `Z` means UTC) and falls back to the
//! current local time when the text is absent or cannot be parsed. The
//! fallback is never surfaced as an error; [`TimestampSource`] records which
//! branch was taken.

use chrono::{
    DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, ParseError,
};
use serde::Serialize;

// Extended (`2024-06-01T10:30`) and basic (`20240601T1030`) forms
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
    "%Y%m%dT%H%M%S%.f%z",
    "%Y%m%dT%H%M%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y%m%dT%H%M%S%.f",
    "%Y%m%dT%H%M",
];

/// A resolved request time, with or without a UTC offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestTime {
    Naive(NaiveDateTime),
    Offset(DateTime<FixedOffset>),
}

impl RequestTime {
    /// Current local wall-clock time (no offset attached)
    pub fn now() -> Self {
        RequestTime::Naive(Local::now().naive_local())
    }

    pub fn month(&self) -> u32 {
        match self {
            RequestTime::Naive(dt) => dt.month(),
            RequestTime::Offset(dt) => dt.month(),
        }
    }

    /// ISO-8601 to second precision, with `+HH:MM` when an offset is known
    pub fn to_iso_seconds(&self) -> String {
        match self {
            RequestTime::Naive(dt) => dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
            RequestTime::Offset(dt) => dt.format("%Y-%m-%dT%H:%M:%S%:z").to_string(),
        }
    }
}

/// Which branch produced the request time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampSource {
    /// Caller text parsed successfully
    Parsed,
    /// No text supplied; current time used
    Now,
    /// Text supplied but unparseable; current time used
    FallbackAfterParseError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTimestamp {
    pub time: RequestTime,
    pub source: TimestampSource,
}

impl ResolvedTimestamp {
    pub fn used_fallback(&self) -> bool {
        self.source == TimestampSource::FallbackAfterParseError
    }
}

/// Parse ISO-8601 date or date-time text
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD[T ]HH[:MM[:SS[.fff]]]` and the basic
/// forms `YYYYMMDD` / `YYYYMMDDTHH[MM[SS]]`, each time optionally followed by
/// `+HH:MM` / `+HHMM` / `-HH:MM` or `Z`.
pub fn parse_iso_flexible(text: &str) -> Result<RequestTime, ParseError> {
    let text = text.trim();
    let normalized = match text.strip_suffix('Z') {
        Some(head) => format!("{}+00:00", head),
        None => text.to_string(),
    };
    let normalized = expand_hour_only(&normalized).unwrap_or(normalized);

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&normalized, fmt) {
            return Ok(RequestTime::Offset(dt));
        }
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&normalized, fmt) {
            return Ok(RequestTime::Naive(dt));
        }
    }

    let date = NaiveDate::parse_from_str(&normalized, "%Y%m%d")
        .or_else(|_| NaiveDate::parse_from_str(&normalized, "%Y-%m-%d"))?;
    Ok(RequestTime::Naive(date.and_time(NaiveTime::MIN)))
}

/// Rewrite an hour-only time (`...T10`, `...T10+08:00`) with zero minutes
///
/// chrono cannot build a time without minutes, so `2024-06-01T10` becomes
/// `2024-06-01T10:00` and `20240601T10` becomes `20240601T1000`.
fn expand_hour_only(text: &str) -> Option<String> {
    let sep = text.find(&['T', ' '][..])?;
    let (date, rest) = text.split_at(sep);
    let time = &rest[1..];
    let clock_len = time.find(&['+', '-'][..]).unwrap_or(time.len());
    let (clock, offset) = time.split_at(clock_len);

    if clock.len() != 2 || !clock.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let minutes = if date.contains('-') { ":00" } else { "00" };
    Some(format!("{}{}{}{}{}", date, &rest[..1], clock, minutes, offset))
}

/// Resolve optional caller text into a request time, never failing
pub fn resolve_timestamp(text: Option<&str>) -> ResolvedTimestamp {
    match text.map(str::trim).filter(|t| !t.is_empty()) {
        None => ResolvedTimestamp {
            time: RequestTime::now(),
            source: TimestampSource::Now,
        },
        Some(t) => match parse_iso_flexible(t) {
            Ok(time) => ResolvedTimestamp {
                time,
                source: TimestampSource::Parsed,
            },
            Err(e) => {
                tracing::debug!("Unparseable date '{}' ({}), using current time", t, e);
                ResolvedTimestamp {
                    time: RequestTime::now(),
                    source: TimestampSource::FallbackAfterParseError,
                }
            }
        },
    }
}
