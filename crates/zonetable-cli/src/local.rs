//! Host timezone detection.

use anyhow::{Context, Result};
use tracing::debug;
use zone_engine::{parse_timezone, TimeZoneHandle};

/// Work out the host zone.
///
/// An explicit override must resolve or the run fails. Otherwise `TZ` is
/// tried, then the operating system setting, and finally `UTC`.
pub fn detect_local_zone(override_id: Option<&str>) -> Result<TimeZoneHandle> {
    let tz_env = std::env::var("TZ").ok();
    let system = iana_time_zone::get_timezone()
        .map_err(|err| debug!(error = %err, "could not read the system timezone"))
        .ok();
    choose_local_zone(override_id, tz_env.as_deref(), system.as_deref())
}

fn choose_local_zone(
    override_id: Option<&str>,
    tz_env: Option<&str>,
    system: Option<&str>,
) -> Result<TimeZoneHandle> {
    if let Some(id) = override_id {
        return parse_timezone(id).with_context(|| format!("Invalid local zone “{id}”"));
    }

    let candidates = [
        ("TZ", tz_env.map(|tz| tz.strip_prefix(':').unwrap_or(tz))),
        ("system", system),
    ];
    for (source, candidate) in candidates {
        let Some(id) = candidate.filter(|id| !id.is_empty()) else {
            continue;
        };
        match parse_timezone(id) {
            Ok(zone) => {
                debug!(source, zone = %zone, "detected local timezone");
                return Ok(zone);
            }
            Err(err) => debug!(source, error = %err, "ignoring local timezone candidate"),
        }
    }

    debug!("no usable local timezone, falling back to UTC");
    Ok(TimeZoneHandle::utc())
}
