//! Positional argument handling: zone identifiers with an optional trailing
//! "when".

use tracing::debug;
use zone_engine::{normalize_identifiers, parse_timezone, When};

/// Identifiers and anchor request extracted from the positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Identifiers to resolve, `UTC` first.
    pub identifiers: Vec<String>,
    pub when: When,
}

/// Split positional arguments into identifiers and a "when".
///
/// The last argument is tried as a timezone first. Only if that fails is it
/// removed and used as the "when" string. An empty identifier list falls
/// back to `defaults`. The result always starts with a single `UTC`.
pub fn split_arguments(args: Vec<String>, defaults: &[String]) -> Invocation {
    let mut identifiers = args;
    let mut when = When::Now;

    if let Some(last) = identifiers.pop() {
        match parse_timezone(&last) {
            Ok(_) => identifiers.push(last),
            Err(err) => {
                debug!(argument = %last, error = %err, "last argument is not a zone, using it as the anchor");
                when = When::from_arg(last);
            }
        }
    }

    if identifiers.is_empty() {
        identifiers = defaults.to_vec();
    }

    Invocation {
        identifiers: normalize_identifiers(identifiers),
        when,
    }
}
