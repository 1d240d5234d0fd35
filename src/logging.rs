//! Diagnostics go to stderr so stdout stays reserved for the transcript.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt;

/// Install the global subscriber. `--silent` wins over `--debug`: silent
/// front-ends emit nothing but the transcript itself.
pub fn init(debug: bool, silent: bool) {
    let max_level = if silent {
        LevelFilter::OFF
    } else if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    // Ignore the error if a subscriber is already set (tests install their own).
    let _ = fmt()
        .with_max_level(max_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
