//! Logging setup for the `pixfit` binary.
//!
//! The library only emits `tracing` events (plan decisions and backend file
//! operations at `debug`, batch progress at `info`, skipped entries at
//! `warn`). Nothing is printed until a subscriber is installed:
//!
//! ```no_run
//! pixfit::logging::init_subscriber(tracing::Level::DEBUG);
//! ```

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Level used by the CLI for a given number of `-v` flags.
pub fn level_for_verbosity(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Installs a global subscriber writing to standard error.
///
/// Call once at startup. A second call leaves the first subscriber in place.
pub fn init_subscriber(max_level: Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(max_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
