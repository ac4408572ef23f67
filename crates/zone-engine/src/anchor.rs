//! Anchor resolution: turn a "when" value into an absolute instant.
//!
//! The anchor is read as a local wall-clock reading in the host zone and
//! then pinned to the timeline. The caller provides both the host zone and
//! the current instant, so nothing here touches the system clock.

use std::fmt;

use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc,
};
use serde::Serialize;
use tracing::debug;

use crate::error::{Result, ZoneError};
use crate::zone::TimeZoneHandle;

/// The literal that selects the current local date.
pub const NOW_TOKEN: &str = "now";

/// What the user asked the grid to start from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum When {
    /// Midnight of the current local date.
    #[default]
    Now,
    /// A free-form local date/time string.
    At(String),
}

impl When {
    /// Classify a raw argument: `"now"` selects [`When::Now`], anything else
    /// is kept verbatim for parsing.
    pub fn from_arg(arg: impl Into<String>) -> Self {
        let arg = arg.into();
        if arg == NOW_TOKEN {
            Self::Now
        } else {
            Self::At(arg)
        }
    }
}

impl fmt::Display for When {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Now => f.write_str(NOW_TOKEN),
            Self::At(s) => f.write_str(s),
        }
    }
}

/// How a local reading that falls in a DST gap or fold becomes an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Disambiguation {
    /// Gap: shift forward by the gap length. Fold: take the earlier instant.
    #[default]
    Compatible,
    /// Always take the earlier candidate.
    Earlier,
    /// Always take the later candidate.
    Later,
    /// Fail on any gap or fold.
    Reject,
}

/// Resolve a [`When`] into the anchor instant.
///
/// * [`When::Now`] anchors at midnight of the date `now` falls on in `local`.
///   The time of day of `now` is discarded.
/// * [`When::At`] is parsed with [`parse_plain_datetime`] and keeps its full
///   precision.
///
/// Either way the local reading is interpreted in `local` and mapped to an
/// instant using `disambiguation`.
///
/// # Errors
///
/// Returns [`ZoneError::AnchorParse`] when the string is not a date/time, or
/// [`ZoneError::NonexistentLocalTime`] / [`ZoneError::AmbiguousLocalTime`]
/// when `disambiguation` is [`Disambiguation::Reject`] and the reading hits a
/// DST transition.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use zone_engine::anchor::{resolve_anchor, Disambiguation, When};
/// use zone_engine::zone::parse_timezone;
///
/// let brussels = parse_timezone("Europe/Brussels").unwrap();
/// let when = When::from_arg("2026-07-01T09:00");
/// let anchor = resolve_anchor(&when, &brussels, Utc::now(), Disambiguation::default()).unwrap();
/// assert_eq!(anchor.to_rfc3339(), "2026-07-01T07:00:00+00:00");
/// ```
pub fn resolve_anchor(
    when: &When,
    local: &TimeZoneHandle,
    now: DateTime<Utc>,
    disambiguation: Disambiguation,
) -> Result<DateTime<Utc>> {
    let reading = match when {
        When::Now => today_in(local, now).and_time(NaiveTime::MIN),
        When::At(s) => parse_plain_datetime(s)?,
    };
    let instant = localize(&reading, local, disambiguation)?;
    debug!(%when, %reading, %instant, zone = %local, "resolved anchor");
    Ok(instant)
}

/// The calendar date `now` falls on in `zone`.
pub fn today_in(zone: &TimeZoneHandle, now: DateTime<Utc>) -> NaiveDate {
    (now.naive_utc() + zone.offset_at(&now)).date()
}

/// Pin a local wall-clock reading in `zone` to the timeline.
///
/// # Errors
///
/// Only fails under [`Disambiguation::Reject`].
pub fn localize(
    reading: &NaiveDateTime,
    zone: &TimeZoneHandle,
    disambiguation: Disambiguation,
) -> Result<DateTime<Utc>> {
    let at_offset = |offset: chrono::FixedOffset| (*reading - offset).and_utc();

    match zone.offsets_for_local(reading) {
        LocalResult::Single(offset) => Ok(at_offset(offset)),
        LocalResult::Ambiguous(a, b) => {
            let (first, second) = (at_offset(a), at_offset(b));
            let (earlier, later) = if first <= second {
                (first, second)
            } else {
                (second, first)
            };
            match disambiguation {
                Disambiguation::Compatible | Disambiguation::Earlier => Ok(earlier),
                Disambiguation::Later => Ok(later),
                Disambiguation::Reject => Err(ZoneError::AmbiguousLocalTime(format!(
                    "'{}' in {}",
                    reading, zone
                ))),
            }
        }
        LocalResult::None => {
            // Offsets on either side of the gap. A day away is clear of any
            // single transition.
            let probe = reading.and_utc();
            let before = zone.offset_at(&(probe - Duration::days(1)));
            let after = zone.offset_at(&(probe + Duration::days(1)));
            match disambiguation {
                Disambiguation::Compatible | Disambiguation::Later => Ok(at_offset(before)),
                Disambiguation::Earlier => Ok(at_offset(after)),
                Disambiguation::Reject => Err(ZoneError::NonexistentLocalTime(format!(
                    "'{}' in {}",
                    reading, zone
                ))),
            }
        }
    }
}

// ── Plain date/time grammar ─────────────────────────────────────────────────

/// Parse a timezone-less ISO 8601 date or date-time.
///
/// Accepted shapes:
///
/// * date: `YYYY-MM-DD` or `YYYYMMDD` (time defaults to midnight)
/// * separator: `T`, `t` or a single space
/// * time: `HH`, `HH:MM`, `HH:MM:SS`, `HH:MM:SS.fff`, `HHMM`, `HHMMSS`;
///   a leap second (`:60`) is clamped to `:59`
///
/// A trailing numeric offset (`+02:00`) and bracketed annotations
/// (`[Europe/Paris]`, `[u-ca=iso8601]`) are accepted and ignored. A `Z`
/// designator is rejected because it names an instant, not a local reading.
///
/// # Errors
///
/// Returns [`ZoneError::AnchorParse`] naming the input.
pub fn parse_plain_datetime(input: &str) -> Result<NaiveDateTime> {
    let fail = || ZoneError::AnchorParse(format!("'{}'", input));

    let body = strip_annotations(input).ok_or_else(fail)?;
    let (date_part, time_part) = match body.find(['T', 't', ' ']) {
        Some(idx) => (&body[..idx], Some(&body[idx + 1..])),
        None => (body, None),
    };

    let date = parse_date(date_part).ok_or_else(fail)?;
    let time = match time_part {
        Some(t) => parse_time(strip_offset(t).ok_or_else(fail)?).ok_or_else(fail)?,
        None => NaiveTime::MIN,
    };
    Ok(date.and_time(time))
}

/// Drop trailing `[...]` annotations. `None` if a bracket is unbalanced.
fn strip_annotations(s: &str) -> Option<&str> {
    let mut rest = s;
    while let Some(stripped) = rest.strip_suffix(']') {
        let open = stripped.rfind('[')?;
        rest = &stripped[..open];
    }
    if rest.contains(['[', ']']) {
        return None;
    }
    Some(rest)
}

/// Drop a trailing numeric offset from the time part. `None` for `Z`.
fn strip_offset(t: &str) -> Option<&str> {
    if t.ends_with(['Z', 'z']) {
        return None;
    }
    match t.find(['+', '-']) {
        Some(idx) => {
            let offset = &t[idx + 1..];
            let valid = !offset.is_empty()
                && offset.len() <= 8
                && offset.bytes().all(|b| b.is_ascii_digit() || b == b':');
            valid.then_some(&t[..idx])
        }
        None => Some(t),
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let well_formed = match s.len() {
        10 => s.as_bytes()[4] == b'-' && s.as_bytes()[7] == b'-',
        8 => s.bytes().all(|b| b.is_ascii_digit()),
        _ => false,
    };
    if !well_formed {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y%m%d"))
        .ok()
}

/// Time formats tried in order. A bare `HH` is handled separately because
/// chrono needs at least hour and minute.
const TIME_FORMATS: [&str; 4] = ["%H:%M:%S%.f", "%H:%M", "%H%M%S%.f", "%H%M"];

fn parse_time(s: &str) -> Option<NaiveTime> {
    let time = if s.len() == 2 && s.bytes().all(|b| b.is_ascii_digit()) {
        NaiveTime::from_hms_opt(s.parse().ok()?, 0, 0)?
    } else {
        TIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())?
    };
    // chrono reads `:60` as a leap second; clamp it to `:59`.
    time.with_nanosecond(time.nanosecond() % 1_000_000_000)
}
