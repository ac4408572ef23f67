//! Output formatting: bordered table, JSON report and the warning line.

use colored::{ColoredString, Colorize};
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::style::HorizontalLine;
use tabled::settings::Style;
use zone_engine::{Band, GridCell, HourlyGrid, TimeZoneHandle};

/// Output format for the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Bordered, color-coded table
    #[default]
    Table,
    /// JSON document
    Json,
}

/// When to emit ANSI colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Only when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn apply(self) {
        use std::io::IsTerminal;

        match self {
            ColorChoice::Always => colored::control::set_override(true),
            ColorChoice::Never => colored::control::set_override(false),
            ColorChoice::Auto => {
                if !std::io::stdout().is_terminal() {
                    colored::control::set_override(false);
                }
            }
        }
    }
}

/// Everything the JSON output carries.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub local_zone: &'a TimeZoneHandle,
    pub when: String,
    #[serde(flatten)]
    pub grid: &'a HourlyGrid,
    pub ignored: &'a [String],
}

/// Render the grid as a table: a bold header of zone names (the host zone
/// also underlined) followed by 24 color-coded rows.
///
/// ASCII borders, with the only inner rule under the header.
pub fn render_table(grid: &HourlyGrid, local: &TimeZoneHandle) -> String {
    let mut builder = Builder::default();

    builder.push_record(grid.zones.iter().map(|zone| header(zone, local).to_string()));
    for row in &grid.rows {
        builder.push_record(
            grid.zones
                .iter()
                .zip(&row.cells)
                .map(|(zone, cell)| paint_cell(zone, cell)),
        );
    }

    let ascii = Style::ascii();
    let header_rule = HorizontalLine::new(1, ascii.get_horizontal());
    let mut table = builder.build();
    table.with(ascii.remove_horizontal().horizontals([header_rule]));
    table.to_string()
}

pub fn render_json(report: &Report<'_>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// The stderr line listing identifiers that did not resolve.
pub fn render_warning(rejected: &[String]) -> String {
    let message = format!(
        "WARN: Ignored identifiers “{}” as they could not be parsed to a proper timezone",
        rejected.join("”, “")
    );
    // xterm 178
    message.truecolor(215, 175, 0).to_string()
}

/// The stderr line for a fatal error, with its full cause chain.
pub fn render_error(err: &anyhow::Error) -> String {
    format!("ERROR: {err:#}").red().to_string()
}

fn header(zone: &TimeZoneHandle, local: &TimeZoneHandle) -> ColoredString {
    let name = zone.canonical_name().bold();
    if zone == local {
        name.underline()
    } else {
        name
    }
}

fn paint_cell(zone: &TimeZoneHandle, cell: &GridCell) -> String {
    let text = cell.moment.to_string();
    if zone.is_utc() {
        return text;
    }
    let painted = match cell.band {
        Band::Core => text.green(),
        Band::Extended => text.yellow(),
        Band::Off => text.red(),
    };
    painted.to_string()
}
