//! zonetable: the next 24 hours across timezones, color-coded by working hours.
//!
//! ```text
//! zonetable [ZONE...] [WHEN]
//! ```
//!
//! The last argument is read as a zone if it parses as one, otherwise as the
//! local date/time to start from (default: today at midnight).

use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zone_engine::{
    project_hours, resolve_anchor, resolve_identifiers, Disambiguation, ZoneError,
    DEFAULT_IDENTIFIERS,
};

mod args;
mod local;
mod render;

use render::{ColorChoice, OutputFormat, Report};

#[derive(Parser)]
#[command(name = "zonetable")]
#[command(about = "Compare the next 24 hours across timezones", long_about = None)]
#[command(version)]
struct Cli {
    /// Timezone identifiers, optionally followed by a local date/time or "now"
    #[arg(value_name = "ZONE|WHEN", allow_hyphen_values = true)]
    args: Vec<String>,

    /// Host timezone used for the anchor and header highlighting
    #[arg(long, env = "ZONETABLE_LOCAL_ZONE")]
    local_zone: Option<String>,

    /// Zones shown when none are given
    #[arg(
        long,
        env = "ZONETABLE_DEFAULT_ZONES",
        value_delimiter = ',',
        default_values_t = DEFAULT_IDENTIFIERS.map(String::from)
    )]
    default_zones: Vec<String>,

    /// When to use colors
    #[arg(long, env = "ZONETABLE_COLOR", value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// Output format
    #[arg(short, long, env = "ZONETABLE_FORMAT", value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// How to place a local anchor time that falls in a DST gap or fold
    #[arg(long, value_enum, default_value_t = DisambiguationArg::Compatible)]
    disambiguation: DisambiguationArg,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum DisambiguationArg {
    Compatible,
    Earlier,
    Later,
    Reject,
}

impl From<DisambiguationArg> for Disambiguation {
    fn from(arg: DisambiguationArg) -> Self {
        match arg {
            DisambiguationArg::Compatible => Disambiguation::Compatible,
            DisambiguationArg::Earlier => Disambiguation::Earlier,
            DisambiguationArg::Later => Disambiguation::Later,
            DisambiguationArg::Reject => Disambiguation::Reject,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    cli.color.apply();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", render::render_error(&err));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let local = local::detect_local_zone(cli.local_zone.as_deref())?;
    let invocation = args::split_arguments(cli.args, &cli.default_zones);
    let when = &invocation.when;
    debug!(identifiers = ?invocation.identifiers, %when, zone = %local, "parsed invocation");

    // The anchor must resolve before anything is computed or printed.
    let anchor = resolve_anchor(when, &local, Utc::now(), cli.disambiguation.into())
        .map_err(|err| match err {
            ZoneError::AnchorParse(_) => anyhow!(err)
                .context(format!("Could not parse “{when}” to a Date or TimeZone.")),
            other => anyhow!(other).context(format!("Could not place “{when}” in {local}.")),
        })?;

    let resolution = resolve_identifiers(&invocation.identifiers);
    let grid = project_hours(anchor, &resolution.resolved);

    match cli.format {
        OutputFormat::Table => println!("{}", render::render_table(&grid, &local)),
        OutputFormat::Json => {
            let report = Report {
                local_zone: &local,
                when: when.to_string(),
                grid: &grid,
                ignored: &resolution.rejected,
            };
            println!(
                "{}",
                render::render_json(&report).context("failed to serialize the grid")?
            );
        }
    }

    if resolution.has_rejections() {
        eprintln!("{}", render::render_warning(&resolution.rejected));
    }
    Ok(())
}
