use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;

pub const ARG_API_URL: &str = "api-url";
pub const ARG_SESSION_PATH: &str = "session-path";

#[derive(Debug, Clone)]
pub struct Options {
    pub api_url: Option<String>,
    pub session_path: Option<PathBuf>,
}

impl Options {
    #[must_use]
    pub fn parse(matches: &ArgMatches) -> Self {
        Self {
            api_url: matches
                .get_one::<String>(ARG_API_URL)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
            session_path: matches
                .get_one::<String>(ARG_SESSION_PATH)
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from),
        }
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .long(ARG_API_URL)
                .help("Portal backend URL")
                .long_help(
                    "Portal backend URL. Every request is sent to this URL with an `action` query parameter, example: https://script.google.com/macros/s/<deployment>/exec",
                )
                .env("DSOG_API_URL")
                .global(true),
        )
        .arg(
            Arg::new(ARG_SESSION_PATH)
                .long(ARG_SESSION_PATH)
                .help("Session file (default: $XDG_STATE_HOME/dsog-portal/session.json)")
                .env("DSOG_SESSION_PATH")
                .global(true),
        )
}
