//! Working-hours classification of a local hour.

use serde::Serialize;

use crate::projection::ZonedMoment;

/// Hours that count as regular working time.
pub const CORE_HOURS: [u32; 9] = [9, 10, 11, 12, 13, 14, 15, 16, 17];

/// Hours either side of core time that are still reachable.
pub const EXTENDED_HOURS: [u32; 6] = [7, 8, 18, 19, 20, 21];

/// Working-hours band of a local hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Core,
    Extended,
    Off,
}

/// Classify an hour of the day (0-23).
///
/// UTC columns are always [`Band::Core`]. Hours outside 0-23 fall through
/// to [`Band::Off`].
pub fn classify_hour(hour: u32, is_utc: bool) -> Band {
    if is_utc || CORE_HOURS.contains(&hour) {
        Band::Core
    } else if EXTENDED_HOURS.contains(&hour) {
        Band::Extended
    } else {
        Band::Off
    }
}

/// Classify a projected moment by its local wall-clock hour.
pub fn classify(moment: &ZonedMoment, is_utc: bool) -> Band {
    classify_hour(moment.hour(), is_utc)
}
