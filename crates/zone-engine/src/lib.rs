//! # zone-engine
//!
//! Deterministic multi-timezone hour grids.
//!
//! Given an anchor instant and a list of timezone identifiers, the engine
//! projects 24 consecutive hours into every zone and tags each local hour
//! as core, extended or off working time. Everything here is a pure
//! function of its inputs: the caller supplies "now" and the host zone.
//!
//! ## Modules
//!
//! - [`zone`] - Identifier parsing, canonical zone handles, UTC-first normalisation
//! - [`anchor`] - "now" / local date-time string → anchor instant, DST disambiguation
//! - [`projection`] - Anchor + N zones → 24 × N grid of zoned moments
//! - [`classify`] - Local hour → working-hours band
//! - [`error`] - Error types

pub mod anchor;
pub mod classify;
pub mod error;
pub mod projection;
pub mod zone;

pub use anchor::{
    localize, parse_plain_datetime, resolve_anchor, today_in, Disambiguation, When, NOW_TOKEN,
};
pub use classify::{classify, classify_hour, Band, CORE_HOURS, EXTENDED_HOURS};
pub use error::ZoneError;
pub use projection::{
    project, project_hours, GridCell, GridRow, HourlyGrid, ZonedMoment, HOURS_PER_GRID,
};
pub use zone::{
    normalize_identifiers, parse_timezone, resolve_identifiers, ResolutionResult,
    TimeZoneHandle, DEFAULT_IDENTIFIERS, UTC_IDENTIFIER,
};
