//! Terminal logger setup for the command-line tool

use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

/// Log level for a `-v` count, with `--quiet` overriding to errors only
pub const fn level_for(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the global terminal logger on stderr
///
/// Returns `false` if a logger was already installed.
pub fn init(verbosity: u8, quiet: bool) -> bool {
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();

    TermLogger::init(
        level_for(verbosity, quiet),
        config,
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .is_ok()
}
