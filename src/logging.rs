//! `env_logger` set-up for the simulation binary and tests.
//!
//! The library only emits through the `log` facade. `RUST_LOG` always wins
//! over the level chosen here.
use env_logger::{Builder, Env};
use log::LevelFilter;

/// Default filter for the requested verbosity.
///
/// Verbose runs show per-transition debug output from this crate only, so
/// dependency chatter stays at `info`.
#[must_use]
pub fn default_filter(verbose: bool) -> String {
    if verbose {
        format!("{},feltcraft={}", LevelFilter::Info, LevelFilter::Debug)
    } else {
        LevelFilter::Info.to_string()
    }
}

/// Initialises the global logger.
///
/// Safe to call more than once; later calls are ignored so tests can call
/// `init` freely.
pub fn init(verbose: bool) {
    let env = Env::default().default_filter_or(default_filter(verbose));
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis();

    if builder.try_init().is_err() {
        log::trace!("logger already initialised");
    }
}
