//! Log setup for the command line
//!
//! Logs go to stderr so stdout only carries the listing.

use std::io;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

/// Level for a `-v` count, or errors only when quiet
pub fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Install the stderr subscriber
///
/// Our own crates log at `level`; dependencies stay at warn unless tracing
/// everything.
pub fn init(level: LevelFilter) {
    let dependency_level = if level == LevelFilter::TRACE {
        LevelFilter::TRACE
    } else {
        LevelFilter::WARN.min(level)
    };

    let targets = Targets::new()
        .with_default(dependency_level)
        .with_target("makogen", level)
        .with_target("makogen_api", level)
        .with_target("makogen_cpp", level);

    let stderr_layer = fmt::layer()
        .compact()
        .with_target(level >= LevelFilter::DEBUG)
        .without_time()
        .with_writer(io::stderr)
        .with_filter(targets);

    // A subscriber may already be set when embedded in tests
    let _ = tracing_subscriber::registry().with(stderr_layer).try_init();
}
