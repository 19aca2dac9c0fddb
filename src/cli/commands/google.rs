use crate::portal::AllowList;
use clap::{Arg, ArgMatches, Command};

pub const ARG_ALLOWED_EMAILS: &str = "allowed-emails";
pub const ARG_ALLOWED_DOMAINS: &str = "allowed-domains";

pub const DEFAULT_ALLOWED_EMAILS: &str =
    "office.dsog@gmail.com,franchise@dsog.com,partner@dsog.com";
pub const DEFAULT_ALLOWED_DOMAINS: &str = "dsog.com";

/// Builds the Google Sign-In allow-list from the parsed arguments.
#[must_use]
pub fn allow_list(matches: &ArgMatches) -> AllowList {
    let emails = matches
        .get_one::<String>(ARG_ALLOWED_EMAILS)
        .map_or(DEFAULT_ALLOWED_EMAILS, String::as_str);
    let domains = matches
        .get_one::<String>(ARG_ALLOWED_DOMAINS)
        .map_or(DEFAULT_ALLOWED_DOMAINS, String::as_str);

    AllowList::from_csv(emails, domains)
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_ALLOWED_EMAILS)
                .long(ARG_ALLOWED_EMAILS)
                .help("Comma-separated emails allowed to sign in with Google")
                .env("DSOG_ALLOWED_EMAILS")
                .default_value(DEFAULT_ALLOWED_EMAILS)
                .global(true),
        )
        .arg(
            Arg::new(ARG_ALLOWED_DOMAINS)
                .long(ARG_ALLOWED_DOMAINS)
                .help("Comma-separated domains allowed to sign in with Google")
                .long_help(
                    "Comma-separated domains allowed to sign in with Google. A Google hosted domain (hd) claim is matched first; the email suffix is only used when the credential carries no hosted domain.",
                )
                .env("DSOG_ALLOWED_DOMAINS")
                .default_value(DEFAULT_ALLOWED_DOMAINS)
                .global(true),
        )
}
