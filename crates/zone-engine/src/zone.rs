//! Timezone identifiers and their resolution.
//!
//! A [`TimeZoneHandle`] is either a named zone from the IANA database
//! (via `chrono-tz`) or a fixed UTC offset such as `+05:30`. Its canonical
//! string form is what the header row prints and what equality checks
//! ("is this the host zone?", "is this UTC?") compare against.

use std::fmt;
use std::str::FromStr;

use chrono::format::{Parsed, StrftimeItems};
use chrono::{DateTime, FixedOffset, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::error::{Result, ZoneError};

/// The identifier that is always forced to the front of the column list.
pub const UTC_IDENTIFIER: &str = "UTC";

/// Zones shown when the caller names none.
pub const DEFAULT_IDENTIFIERS: [&str; 4] = [
    "America/Los_Angeles",
    "America/New_York",
    "Europe/London",
    "Europe/Brussels",
];

/// A resolved, canonical timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeZoneHandle {
    /// A region from the IANA database, e.g. `Europe/Brussels`.
    Named(Tz),
    /// A fixed offset from UTC, e.g. `-03:00`.
    Fixed(FixedOffset),
}

impl TimeZoneHandle {
    pub fn utc() -> Self {
        Self::Named(Tz::UTC)
    }

    /// Whether this handle is the canonical `UTC` zone.
    ///
    /// Fixed `+00:00` and aliases such as `Etc/UTC` are distinct zones and
    /// return `false`.
    pub fn is_utc(&self) -> bool {
        matches!(self, Self::Named(Tz::UTC))
    }

    /// Canonical string form (`Europe/London`, `+05:30`).
    pub fn canonical_name(&self) -> String {
        match self {
            Self::Named(tz) => tz.name().to_string(),
            Self::Fixed(offset) => format_offset(offset),
        }
    }

    /// The UTC offset in effect at `instant`.
    pub fn offset_at(&self, instant: &DateTime<Utc>) -> FixedOffset {
        match self {
            Self::Named(tz) => tz.offset_from_utc_datetime(&instant.naive_utc()).fix(),
            Self::Fixed(offset) => *offset,
        }
    }

    /// Every offset a local wall-clock reading could carry in this zone.
    ///
    /// `None` inside a DST gap, `Ambiguous` inside a fold.
    pub fn offsets_for_local(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
        match self {
            Self::Named(tz) => tz.offset_from_local_datetime(local).map(|o| o.fix()),
            Self::Fixed(offset) => LocalResult::Single(*offset),
        }
    }
}

impl fmt::Display for TimeZoneHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(tz) => f.write_str(tz.name()),
            Self::Fixed(offset) => f.write_str(&format_offset(offset)),
        }
    }
}

impl FromStr for TimeZoneHandle {
    type Err = ZoneError;

    fn from_str(s: &str) -> Result<Self> {
        parse_timezone(s)
    }
}

impl Serialize for TimeZoneHandle {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── Resolution ──────────────────────────────────────────────────────────────

/// Partition of an identifier list into resolved handles and rejected input.
///
/// Every input identifier lands in exactly one of the two lists, and both
/// keep the input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolutionResult {
    pub resolved: Vec<TimeZoneHandle>,
    pub rejected: Vec<String>,
}

impl ResolutionResult {
    pub fn has_rejections(&self) -> bool {
        !self.rejected.is_empty()
    }
}

/// Parse a single identifier into a [`TimeZoneHandle`].
///
/// Identifiers starting with `+` or `-` are read as fixed offsets
/// (`±HH`, `±HHMM`, `±HH:MM`, `±HH:MM:SS`). Anything else is looked up in
/// the IANA database, case-insensitively.
///
/// # Errors
///
/// Returns [`ZoneError::InvalidOffset`] for a malformed offset, or
/// [`ZoneError::InvalidTimezone`] for an unknown zone name.
///
/// # Examples
///
/// ```
/// use zone_engine::zone::parse_timezone;
///
/// let tz = parse_timezone("europe/brussels").unwrap();
/// assert_eq!(tz.canonical_name(), "Europe/Brussels");
///
/// let fixed = parse_timezone("+0530").unwrap();
/// assert_eq!(fixed.to_string(), "+05:30");
/// ```
pub fn parse_timezone(identifier: &str) -> Result<TimeZoneHandle> {
    if identifier.starts_with(['+', '-']) {
        return parse_offset(identifier).map(TimeZoneHandle::Fixed);
    }
    Tz::from_str_insensitive(identifier)
        .map(TimeZoneHandle::Named)
        .map_err(|_| ZoneError::InvalidTimezone(format!("'{}'", identifier)))
}

/// Resolve an ordered identifier list, collecting failures instead of
/// stopping at the first one.
pub fn resolve_identifiers<S: AsRef<str>>(identifiers: &[S]) -> ResolutionResult {
    let mut result = ResolutionResult::default();
    for identifier in identifiers {
        let identifier = identifier.as_ref();
        match parse_timezone(identifier) {
            Ok(handle) => result.resolved.push(handle),
            Err(err) => {
                debug!(identifier, error = %err, "rejected timezone identifier");
                result.rejected.push(identifier.to_string());
            }
        }
    }
    result
}

/// Force `UTC` to the front of an identifier list.
///
/// Every identifier that resolves to the canonical UTC zone (`UTC`, `utc`)
/// is dropped, then a single `"UTC"` is prepended. The order of the
/// remaining identifiers is preserved.
pub fn normalize_identifiers<I, S>(identifiers: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut normalized = vec![UTC_IDENTIFIER.to_string()];
    normalized.extend(
        identifiers
            .into_iter()
            .map(Into::into)
            .filter(|identifier| !names_utc(identifier)),
    );
    normalized
}

fn names_utc(identifier: &str) -> bool {
    parse_timezone(identifier).is_ok_and(|handle| handle.is_utc())
}

// ── Offsets ─────────────────────────────────────────────────────────────────

/// `%#z` covers `±HH`, `±HHMM` and `±HH:MM`. chrono has no seconds field
/// for offsets, so a trailing `SS` or `:SS` is split off first.
fn parse_offset(s: &str) -> Result<FixedOffset> {
    let invalid = || ZoneError::InvalidOffset(format!("'{}'", s));

    // chrono also tolerates inner spaces and a dangling ':'.
    let body = s.get(1..).ok_or_else(invalid)?;
    if body.is_empty()
        || body.ends_with(':')
        || !body.bytes().all(|b| b.is_ascii_digit() || b == b':')
    {
        return Err(invalid());
    }

    let (hours_minutes, seconds) = split_offset_seconds(s, body).ok_or_else(invalid)?;
    let mut parsed = Parsed::new();
    chrono::format::parse(&mut parsed, hours_minutes, StrftimeItems::new("%#z"))
        .map_err(|_| invalid())?;
    let offset = parsed.to_fixed_offset().map_err(|_| invalid())?;

    let sign = if s.starts_with('-') { -1 } else { 1 };
    FixedOffset::east_opt(offset.local_minus_utc() + sign * seconds).ok_or_else(invalid)
}

fn split_offset_seconds<'a>(s: &'a str, body: &str) -> Option<(&'a str, i32)> {
    let cut = if body.matches(':').count() == 2 {
        body.rfind(':')?
    } else if !body.contains(':') && body.len() == 6 {
        4
    } else {
        return Some((s, 0));
    };
    let seconds = body[cut..].trim_start_matches(':');
    if seconds.len() != 2 {
        return None;
    }
    let seconds: i32 = seconds.parse().ok()?;
    (seconds < 60).then_some((&s[..cut + 1], seconds))
}

/// Format an offset as `±HH:MM`, with `:SS` only when seconds are nonzero.
pub(crate) fn format_offset(offset: &FixedOffset) -> String {
    let offset_secs = offset.local_minus_utc();
    let sign = if offset_secs >= 0 { "+" } else { "-" };
    let abs_secs = offset_secs.unsigned_abs();
    let hours = abs_secs / 3600;
    let minutes = (abs_secs % 3600) / 60;
    let seconds = abs_secs % 60;
    if seconds == 0 {
        format!("{sign}{hours:02}:{minutes:02}")
    } else {
        format!("{sign}{hours:02}:{minutes:02}:{seconds:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── parse_timezone tests ────────────────────────────────────────────

    #[test]
    fn test_parse_named_zone() {
        let tz = parse_timezone("America/New_York").unwrap();
        assert_eq!(tz, TimeZoneHandle::Named(Tz::America__New_York));
        assert_eq!(tz.canonical_name(), "America/New_York");
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(parse_timezone("utc").unwrap(), TimeZoneHandle::utc());
        assert_eq!(
            parse_timezone("EUROPE/london").unwrap().to_string(),
            "Europe/London"
        );
    }

    #[test]
    fn test_parse_unknown_zone_is_rejected() {
        let err = parse_timezone("Not/AZone").unwrap_err();
        assert!(matches!(err, ZoneError::InvalidTimezone(_)));
        assert!(err.to_string().contains("Not/AZone"), "got: {err}");
    }

    #[test]
    fn test_parse_empty_identifier_is_rejected() {
        assert!(parse_timezone("").is_err());
    }

    #[test]
    fn test_parse_date_is_not_a_zone() {
        assert!(parse_timezone("2026-03-15").is_err());
        assert!(parse_timezone("now").is_err());
    }

    #[test]
    fn test_parse_offset_forms() {
        for input in ["+05:30", "+0530"] {
            assert_eq!(parse_timezone(input).unwrap().to_string(), "+05:30", "{input}");
        }
        assert_eq!(parse_timezone("-03").unwrap().to_string(), "-03:00");
        assert_eq!(parse_timezone("+00:00").unwrap().to_string(), "+00:00");
        assert_eq!(
            parse_timezone("+01:02:03").unwrap().to_string(),
            "+01:02:03"
        );
    }

    #[test]
    fn test_parse_offset_with_seconds() {
        let basic = parse_timezone("-010203").unwrap();
        let extended = parse_timezone("-01:02:03").unwrap();
        assert_eq!(basic, extended);
        assert_eq!(
            extended,
            TimeZoneHandle::Fixed(FixedOffset::west_opt(3723).unwrap())
        );
        assert_eq!(parse_timezone("+23:59:59").unwrap().to_string(), "+23:59:59");
    }

    #[test]
    fn test_parse_offset_sign() {
        let west = parse_timezone("-08:00").unwrap();
        assert_eq!(
            west,
            TimeZoneHandle::Fixed(FixedOffset::west_opt(8 * 3600).unwrap())
        );
    }

    #[test]
    fn test_parse_malformed_offsets() {
        for input in [
            "+",
            "+5",
            "+24:00",
            "+05:60",
            "+05:3",
            "+05:30:00:00",
            "+ab:cd",
            "-0530x",
            "+05:",
            "+05 30",
            "+05:30:60",
            "+0530601",
        ] {
            let err = parse_timezone(input).unwrap_err();
            assert!(matches!(err, ZoneError::InvalidOffset(_)), "{input}: {err}");
        }
    }

    #[test]
    fn test_fixed_zero_offset_is_not_utc() {
        assert!(!parse_timezone("+00:00").unwrap().is_utc());
        assert!(parse_timezone("UTC").unwrap().is_utc());
    }

    #[test]
    fn test_canonical_round_trip() {
        for input in ["utc", "asia/tokyo", "-0930", "+14", "Europe/Brussels"] {
            let handle = parse_timezone(input).unwrap();
            let again = parse_timezone(&handle.canonical_name()).unwrap();
            assert_eq!(handle, again, "{input}");
        }
    }

    // ── offset lookups ──────────────────────────────────────────────────

    #[test]
    fn test_offset_at_follows_dst() {
        let tz = parse_timezone("Europe/Brussels").unwrap();
        let winter = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        let summer = Utc.with_ymd_and_hms(2026, 7, 15, 12, 0, 0).unwrap();
        assert_eq!(format_offset(&tz.offset_at(&winter)), "+01:00");
        assert_eq!(format_offset(&tz.offset_at(&summer)), "+02:00");
    }

    #[test]
    fn test_offsets_for_local_gap_and_fold() {
        let tz = parse_timezone("America/New_York").unwrap();
        // March 8 2026: 02:00 → 03:00
        let gap = chrono::NaiveDate::from_ymd_opt(2026, 3, 8)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        assert!(matches!(tz.offsets_for_local(&gap), LocalResult::None));

        // November 1 2026: 02:00 → 01:00
        let fold = chrono::NaiveDate::from_ymd_opt(2026, 11, 1)
            .unwrap()
            .and_hms_opt(1, 30, 0)
            .unwrap();
        assert!(matches!(
            tz.offsets_for_local(&fold),
            LocalResult::Ambiguous(_, _)
        ));
    }

    // ── resolve_identifiers tests ───────────────────────────────────────

    #[test]
    fn test_resolve_partitions_in_order() {
        let result = resolve_identifiers(&["UTC", "Bogus/Zone", "Asia/Tokyo", "+99", "+02:00"]);
        let names: Vec<String> = result.resolved.iter().map(|h| h.to_string()).collect();
        assert_eq!(names, vec!["UTC", "Asia/Tokyo", "+02:00"]);
        assert_eq!(result.rejected, vec!["Bogus/Zone", "+99"]);
        assert!(result.has_rejections());
    }

    #[test]
    fn test_resolve_sole_unknown_identifier() {
        let ids = normalize_identifiers(["Not/AZone"]);
        let result = resolve_identifiers(&ids);
        assert_eq!(result.resolved, vec![TimeZoneHandle::utc()]);
        assert_eq!(result.rejected, vec!["Not/AZone"]);
    }

    #[test]
    fn test_resolve_tolerates_utc_anywhere() {
        let result = resolve_identifiers(&["Europe/London", "UTC"]);
        assert_eq!(result.resolved.len(), 2);
        assert!(result.resolved[1].is_utc());
    }

    #[test]
    fn test_resolve_empty_list() {
        let result = resolve_identifiers::<&str>(&[]);
        assert!(result.resolved.is_empty());
        assert!(!result.has_rejections());
    }

    // ── normalize_identifiers tests ─────────────────────────────────────

    #[test]
    fn test_normalize_dedupes_and_prepends_utc() {
        let ids = normalize_identifiers(["UTC", "UTC", "Europe/London"]);
        assert_eq!(ids, vec!["UTC", "Europe/London"]);
    }

    #[test]
    fn test_normalize_moves_utc_to_front() {
        let ids = normalize_identifiers(["Asia/Tokyo", "utc", "Europe/London"]);
        assert_eq!(ids, vec!["UTC", "Asia/Tokyo", "Europe/London"]);
    }

    #[test]
    fn test_normalize_keeps_invalid_identifiers() {
        let ids = normalize_identifiers(["Nope", "Asia/Tokyo"]);
        assert_eq!(ids, vec!["UTC", "Nope", "Asia/Tokyo"]);
    }

    #[test]
    fn test_normalize_empty_list_is_just_utc() {
        let ids = normalize_identifiers(Vec::<String>::new());
        assert_eq!(ids, vec!["UTC"]);
    }

    #[test]
    fn test_handle_serializes_as_canonical_name() {
        let json = serde_json::to_string(&parse_timezone("asia/kolkata").unwrap()).unwrap();
        assert_eq!(json, "\"Asia/Kolkata\"");
    }
}
