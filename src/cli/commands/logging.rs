use clap::{builder::ValueParser, Arg, Command};
use tracing::Level;

pub const ARG_VERBOSITY: &str = "verbosity";

/// Levels by verbosity count. A count of zero keeps the default (`ERROR`);
/// counts past the end saturate at `TRACE`.
pub const LEVELS: [Level; 5] = [
    Level::ERROR,
    Level::WARN,
    Level::INFO,
    Level::DEBUG,
    Level::TRACE,
];

/// Level for a `-v` count, `None` when no verbosity was requested.
#[must_use]
pub fn level_for(verbosity: u8) -> Option<Level> {
    match verbosity {
        0 => None,
        n => Some(LEVELS[usize::from(n).min(LEVELS.len() - 1)]),
    }
}

/// Accepts a count (`0`..`4`) or a level name from [`LEVELS`].
#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        let position = match level.trim().parse::<usize>() {
            Ok(count) => (count < LEVELS.len()).then_some(count),
            Err(_) => LEVELS
                .iter()
                .position(|candidate| candidate.as_str().eq_ignore_ascii_case(level.trim())),
        };

        position
            .and_then(|index| u8::try_from(index).ok())
            .ok_or_else(|| format!("invalid log level: {level}"))
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
            .env("DSOG_LOG_LEVEL")
            .global(true)
            .action(clap::ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}
