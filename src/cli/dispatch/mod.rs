//! Maps parsed CLI arguments to an [`Action`] and the [`GlobalArgs`] it runs
//! with.

use crate::cli::{
    actions::Action,
    commands::{self, backend, google},
    globals::GlobalArgs,
};
use crate::portal::session;
use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;

/// Matches of the innermost subcommand, where global arguments are visible.
#[must_use]
pub fn leaf(matches: &ArgMatches) -> &ArgMatches {
    match matches.subcommand() {
        Some((_, sub_m)) => leaf(sub_m),
        None => matches,
    }
}

fn required(matches: &ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .with_context(|| format!("missing required argument: --{id}"))
}

fn optional(matches: &ArgMatches, id: &str) -> Option<String> {
    matches
        .get_one::<String>(id)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Builds the global settings shared by every action.
///
/// # Errors
/// Returns an error if no session path is configured and none can be derived
/// from the environment.
pub fn globals(matches: &ArgMatches) -> Result<GlobalArgs> {
    let backend_opts = backend::Options::parse(matches);

    let session_path = match backend_opts.session_path {
        Some(path) => path,
        None => session::default_path().with_context(|| {
            format!(
                "cannot determine session file location, use --{}",
                backend::ARG_SESSION_PATH
            )
        })?,
    };

    let mut globals = GlobalArgs::new(session_path);
    if let Some(api_url) = backend_opts.api_url {
        globals.set_api_url(api_url);
    }
    globals.allow_list = google::allow_list(matches);

    Ok(globals)
}

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if no subcommand was given or required arguments are missing.
pub fn handler(matches: &ArgMatches) -> Result<(Action, GlobalArgs)> {
    let (name, sub_m) = matches
        .subcommand()
        .ok_or_else(|| anyhow!("missing subcommand"))?;

    let action = match name {
        commands::CMD_STATUS => Action::Status,
        commands::CMD_LOGIN => Action::Login {
            email: required(sub_m, commands::ARG_EMAIL)?,
            password: SecretString::from(required(sub_m, commands::ARG_PASSWORD)?),
        },
        commands::CMD_GOOGLE => Action::Google {
            credential: SecretString::from(required(sub_m, commands::ARG_CREDENTIAL)?),
        },
        commands::CMD_CHECK => Action::Check {
            email: required(sub_m, commands::ARG_EMAIL)?,
            hosted_domain: optional(sub_m, commands::ARG_HOSTED_DOMAIN),
        },
        commands::CMD_LOGOUT => Action::Logout,
        commands::CMD_WHOAMI => Action::Whoami,
        commands::CMD_PRODUCTS => Action::Products {
            category: optional(sub_m, commands::ARG_CATEGORY),
            supplier: optional(sub_m, commands::ARG_SUPPLIER),
        },
        commands::CMD_SEARCH => Action::Search {
            query: required(sub_m, commands::ARG_QUERY)?,
        },
        commands::CMD_ORDER => Action::Order {
            fields: sub_m
                .get_many::<(String, String)>(commands::ARG_FIELD)
                .map(|fields| fields.cloned().collect())
                .unwrap_or_default(),
        },
        commands::CMD_MATERIALS => Action::Materials {
            category: optional(sub_m, commands::ARG_CATEGORY),
        },
        commands::CMD_UPDATES => Action::Updates,
        commands::CMD_STATS => Action::Stats {
            franchise_id: required(sub_m, commands::ARG_FRANCHISE_ID)?,
        },
        other => return Err(anyhow!("unknown subcommand: {other}")),
    };

    Ok((action, globals(leaf(matches))?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::path::PathBuf;

    #[test]
    fn google_action_carries_credential_and_allow_list() {
        temp_env::with_vars(
            [
                ("DSOG_ALLOWED_EMAILS", None::<&str>),
                ("DSOG_ALLOWED_DOMAINS", Some("dsog.com, dsog.co.ke")),
                ("DSOG_SESSION_PATH", Some("/tmp/dsog/session.json")),
            ],
            || {
                let matches = commands::new().get_matches_from(vec![
                    "dsog-portal",
                    "google",
                    "--credential",
                    "header.payload.sig",
                    "--api-url",
                    "https://backend.dsog.com/exec",
                ]);

                let (action, globals) = handler(&matches).unwrap();
                match action {
                    Action::Google { credential } => {
                        assert_eq!(credential.expose_secret(), "header.payload.sig");
                    }
                    other => panic!("unexpected action: {other:?}"),
                }

                assert_eq!(
                    globals.api_url.as_deref(),
                    Some("https://backend.dsog.com/exec")
                );
                assert_eq!(
                    globals.session_path,
                    PathBuf::from("/tmp/dsog/session.json")
                );
                assert_eq!(
                    globals.allow_list.domains().collect::<Vec<_>>(),
                    vec!["dsog.co.ke", "dsog.com"]
                );
                assert_eq!(
                    globals.allow_list.emails().collect::<Vec<_>>(),
                    vec![
                        "franchise@dsog.com",
                        "office.dsog@gmail.com",
                        "partner@dsog.com"
                    ]
                );
            },
        );
    }

    #[test]
    fn products_filters_are_optional() {
        temp_env::with_vars([("DSOG_SESSION_PATH", Some("/tmp/dsog/session.json"))], || {
            let matches = commands::new().get_matches_from(vec![
                "dsog-portal",
                "products",
                "--category",
                "bakery",
            ]);

            let (action, _) = handler(&matches).unwrap();
            match action {
                Action::Products { category, supplier } => {
                    assert_eq!(category.as_deref(), Some("bakery"));
                    assert_eq!(supplier, None);
                }
                other => panic!("unexpected action: {other:?}"),
            }
        });
    }

    #[test]
    fn session_path_falls_back_to_state_dir() {
        temp_env::with_vars(
            [
                ("DSOG_SESSION_PATH", None::<&str>),
                ("XDG_STATE_HOME", Some("/var/lib/franchise")),
            ],
            || {
                let matches = commands::new().get_matches_from(vec!["dsog-portal", "logout"]);
                let (action, globals) = handler(&matches).unwrap();
                assert!(matches!(action, Action::Logout));
                assert_eq!(
                    globals.session_path,
                    PathBuf::from("/var/lib/franchise/dsog-portal/session.json")
                );
            },
        );
    }

    #[test]
    fn missing_session_location_is_an_error() {
        temp_env::with_vars(
            [
                ("DSOG_SESSION_PATH", None::<&str>),
                ("XDG_STATE_HOME", None::<&str>),
                ("HOME", None::<&str>),
            ],
            || {
                let matches = commands::new().get_matches_from(vec!["dsog-portal", "whoami"]);
                let err = handler(&matches).unwrap_err();
                assert!(err.to_string().contains("--session-path"));
            },
        );
    }
}
