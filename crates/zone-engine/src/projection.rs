//! Hourly projection of an anchor instant into a set of zones.
//!
//! Row `i` of the grid is the anchor plus exactly `i` hours of elapsed
//! time, so a DST transition shows up as a repeated or skipped wall-clock
//! hour in the affected column rather than as a shifted row.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Timelike, Utc};
use serde::Serialize;

use crate::classify::{classify, Band};
use crate::zone::{format_offset, TimeZoneHandle};

/// Number of hourly rows in every grid.
pub const HOURS_PER_GRID: u32 = 24;

/// An instant as seen on the wall clock of one zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZonedMoment {
    /// ISO calendar date.
    pub date: NaiveDate,
    /// Wall-clock time.
    #[serde(serialize_with = "serialize_time")]
    pub time: NaiveTime,
    /// UTC offset in effect, e.g. `"+02:00"`.
    pub utc_offset: String,
}

impl ZonedMoment {
    pub fn hour(&self) -> u32 {
        self.time.hour()
    }

    /// Wall time as `HH:MM:SS`, with a fraction only when nonzero.
    pub fn format_time(&self) -> String {
        format_wall_time(&self.time)
    }
}

impl fmt::Display for ZonedMoment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.format_time(),
            self.utc_offset
        )
    }
}

/// Project `instant` onto the wall clock of `zone`.
pub fn project(instant: &DateTime<Utc>, zone: &TimeZoneHandle) -> ZonedMoment {
    let offset = zone.offset_at(instant);
    let local = instant.naive_utc() + offset;
    ZonedMoment {
        date: local.date(),
        time: local.time(),
        utc_offset: format_offset(&offset),
    }
}

/// One projected cell with its working-hours band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridCell {
    #[serde(flatten)]
    pub moment: ZonedMoment,
    pub band: Band,
}

/// One hour step across all zones.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridRow {
    /// Whole hours elapsed since the anchor.
    pub offset_hours: u32,
    /// The absolute instant this row shows.
    pub instant: DateTime<Utc>,
    /// One cell per zone, in column order.
    pub cells: Vec<GridCell>,
}

/// The 24 × N grid of projected moments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyGrid {
    pub anchor: DateTime<Utc>,
    pub zones: Vec<TimeZoneHandle>,
    pub rows: Vec<GridRow>,
}

impl HourlyGrid {
    /// Moments of a single column, top to bottom.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &ZonedMoment> + '_ {
        self.rows
            .iter()
            .filter_map(move |row| row.cells.get(index).map(|cell| &cell.moment))
    }
}

/// Build the hourly grid for `anchor` across `zones`.
///
/// Produces exactly [`HOURS_PER_GRID`] rows of `zones.len()` cells. Each
/// cell is classified with [`classify`]; UTC columns are exempt.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use zone_engine::projection::project_hours;
/// use zone_engine::zone::parse_timezone;
///
/// let zones = vec![parse_timezone("UTC").unwrap(), parse_timezone("Asia/Tokyo").unwrap()];
/// let anchor = Utc.with_ymd_and_hms(2026, 3, 15, 0, 0, 0).unwrap();
/// let grid = project_hours(anchor, &zones);
/// assert_eq!(grid.rows.len(), 24);
/// assert_eq!(grid.rows[0].cells[1].moment.to_string(), "2026-03-15 09:00:00 +09:00");
/// ```
pub fn project_hours(anchor: DateTime<Utc>, zones: &[TimeZoneHandle]) -> HourlyGrid {
    let rows = (0..HOURS_PER_GRID)
        .map(|offset_hours| {
            let instant = anchor + Duration::hours(i64::from(offset_hours));
            let cells = zones
                .iter()
                .map(|zone| {
                    let moment = project(&instant, zone);
                    let band = classify(&moment, zone.is_utc());
                    GridCell { moment, band }
                })
                .collect();
            GridRow {
                offset_hours,
                instant,
                cells,
            }
        })
        .collect();

    HourlyGrid {
        anchor,
        zones: zones.to_vec(),
        rows,
    }
}

fn format_wall_time(time: &NaiveTime) -> String {
    let base = time.format("%H:%M:%S").to_string();
    let nanos = time.nanosecond() % 1_000_000_000;
    if nanos == 0 {
        return base;
    }
    let fraction = format!("{nanos:09}");
    format!("{base}.{}", fraction.trim_end_matches('0'))
}

fn serialize_time<S: serde::Serializer>(
    time: &NaiveTime,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_wall_time(time))
}
