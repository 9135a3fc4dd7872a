//! Log subscriber setup.
//!
//! Logs go to stderr so rendered digests on stdout stay machine-readable.
//! `DEVDIGEST_LOG` takes an `EnvFilter` directive and wins over `-v` flags.

use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::env::Env;

/// Filter directive for a verbosity level (`-v` count).
fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Build the filter from `DEVDIGEST_LOG`, else from the verbosity level.
///
/// An unparseable directive falls back to the verbosity level.
pub fn filter(verbosity: u8, env: &Env) -> EnvFilter {
    let fallback = || EnvFilter::new(level_for(verbosity));
    match env.get(crate::constants::ENV_LOG) {
        Some(directive) => EnvFilter::try_new(&directive).unwrap_or_else(|_| fallback()),
        None => fallback(),
    }
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(verbosity: u8, env: &Env) {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter(verbosity, env))
        .try_init();
}
