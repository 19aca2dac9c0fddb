pub mod backend;
pub mod google;
pub mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ArgAction, ColorChoice, Command,
};

pub const CMD_STATUS: &str = "status";
pub const CMD_LOGIN: &str = "login";
pub const CMD_GOOGLE: &str = "google";
pub const CMD_CHECK: &str = "check";
pub const CMD_LOGOUT: &str = "logout";
pub const CMD_WHOAMI: &str = "whoami";
pub const CMD_PRODUCTS: &str = "products";
pub const CMD_SEARCH: &str = "search";
pub const CMD_ORDER: &str = "order";
pub const CMD_MATERIALS: &str = "materials";
pub const CMD_UPDATES: &str = "updates";
pub const CMD_STATS: &str = "stats";

pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_CREDENTIAL: &str = "credential";
pub const ARG_HOSTED_DOMAIN: &str = "hosted-domain";
pub const ARG_CATEGORY: &str = "category";
pub const ARG_SUPPLIER: &str = "supplier";
pub const ARG_QUERY: &str = "query";
pub const ARG_FIELD: &str = "field";
pub const ARG_FRANCHISE_ID: &str = "franchise-id";

/// Parses an order field given as `key=value`.
///
/// # Errors
/// Returns an error string if the `=` is missing or the key is empty.
pub fn parse_field(field: &str) -> Result<(String, String), String> {
    let (key, value) = field
        .split_once('=')
        .ok_or_else(|| format!("invalid field `{field}`, expected key=value"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("invalid field `{field}`, key is empty"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

fn category_arg(help: &'static str) -> Arg {
    Arg::new(ARG_CATEGORY)
        .short('c')
        .long(ARG_CATEGORY)
        .help(help)
}

fn subcommands() -> Vec<Command> {
    vec![
        Command::new(CMD_STATUS).about("Check that the portal backend is reachable"),
        Command::new(CMD_LOGIN)
            .about("Sign in with email and password")
            .arg(
                Arg::new(ARG_EMAIL)
                    .short('e')
                    .long(ARG_EMAIL)
                    .help("Account email")
                    .env("DSOG_EMAIL")
                    .required(true),
            )
            .arg(
                Arg::new(ARG_PASSWORD)
                    .long(ARG_PASSWORD)
                    .help("Account password")
                    .env("DSOG_PASSWORD")
                    .hide_env_values(true)
                    .required(true),
            ),
        Command::new(CMD_GOOGLE)
            .about("Sign in with a Google ID token")
            .arg(
                Arg::new(ARG_CREDENTIAL)
                    .long(ARG_CREDENTIAL)
                    .help("Google ID token (JWT) issued by Google Sign-In")
                    .env("DSOG_GOOGLE_CREDENTIAL")
                    .hide_env_values(true)
                    .required(true),
            ),
        Command::new(CMD_CHECK)
            .about("Check whether a Google identity is allowed to sign in")
            .arg(
                Arg::new(ARG_EMAIL)
                    .short('e')
                    .long(ARG_EMAIL)
                    .help("Email asserted by Google")
                    .required(true),
            )
            .arg(
                Arg::new(ARG_HOSTED_DOMAIN)
                    .long(ARG_HOSTED_DOMAIN)
                    .help("Hosted domain (hd) asserted by Google"),
            ),
        Command::new(CMD_LOGOUT).about("Remove the stored session"),
        Command::new(CMD_WHOAMI).about("Show the stored session"),
        Command::new(CMD_PRODUCTS)
            .about("List products")
            .arg(category_arg("Product category"))
            .arg(
                Arg::new(ARG_SUPPLIER)
                    .short('s')
                    .long(ARG_SUPPLIER)
                    .help("Supplier"),
            ),
        Command::new(CMD_SEARCH)
            .about("Search products")
            .arg(Arg::new(ARG_QUERY).help("Search terms").required(true)),
        Command::new(CMD_ORDER)
            .about("Place an order")
            .arg(
                Arg::new(ARG_FIELD)
                    .short('f')
                    .long(ARG_FIELD)
                    .help("Order field as key=value, repeatable")
                    .action(ArgAction::Append)
                    .value_parser(parse_field)
                    .required(true),
            ),
        Command::new(CMD_MATERIALS)
            .about("List marketing materials")
            .arg(category_arg("Material category")),
        Command::new(CMD_UPDATES).about("Show operational updates"),
        Command::new(CMD_STATS)
            .about("Show franchise statistics")
            .arg(
                Arg::new(ARG_FRANCHISE_ID)
                    .long(ARG_FRANCHISE_ID)
                    .help("Franchise identifier")
                    .env("DSOG_FRANCHISE_ID")
                    .required(true),
            ),
    ]
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("dsog-portal")
        .about("DSOG Franchise Portal client")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommands(subcommands());

    let command = backend::with_args(command);
    let command = google::with_args(command);
    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "dsog-portal");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some("DSOG Franchise Portal client".to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_login_args() {
        temp_env::with_vars([("DSOG_PASSWORD", None::<&str>)], || {
            let matches = new().get_matches_from(vec![
                "dsog-portal",
                "login",
                "--email",
                "franchise@dsog.com",
                "--password",
                "s3cret",
                "--api-url",
                "https://backend.dsog.com/exec",
            ]);

            let (name, sub_m) = matches.subcommand().unwrap();
            assert_eq!(name, CMD_LOGIN);
            assert_eq!(
                sub_m.get_one::<String>(ARG_EMAIL).cloned(),
                Some("franchise@dsog.com".to_string())
            );
            assert_eq!(
                sub_m.get_one::<String>(backend::ARG_API_URL).cloned(),
                Some("https://backend.dsog.com/exec".to_string())
            );
        });
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("DSOG_API_URL", Some("https://backend.dsog.com/exec")),
                ("DSOG_ALLOWED_DOMAINS", Some("dsog.com,dsog.co.ke")),
                ("DSOG_LOG_LEVEL", Some("info")),
                ("DSOG_FRANCHISE_ID", Some("F-42")),
            ],
            || {
                let matches = new().get_matches_from(vec!["dsog-portal", "stats"]);
                let (_, sub_m) = matches.subcommand().unwrap();

                assert_eq!(
                    sub_m.get_one::<String>(ARG_FRANCHISE_ID).cloned(),
                    Some("F-42".to_string())
                );
                assert_eq!(
                    sub_m.get_one::<String>(backend::ARG_API_URL).cloned(),
                    Some("https://backend.dsog.com/exec".to_string())
                );
                assert_eq!(
                    sub_m.get_one::<String>(google::ARG_ALLOWED_DOMAINS).cloned(),
                    Some("dsog.com,dsog.co.ke".to_string())
                );
                assert_eq!(
                    sub_m.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars([("DSOG_LOG_LEVEL", Some(level))], || {
                let matches = new().get_matches_from(vec!["dsog-portal", "whoami"]);
                let (_, sub_m) = matches.subcommand().unwrap();
                assert_eq!(
                    sub_m.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        for index in 0..5usize {
            temp_env::with_vars([("DSOG_LOG_LEVEL", None::<String>)], || {
                let mut args = vec!["dsog-portal".to_string(), "updates".to_string()];

                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index)));
                }

                let matches = new().get_matches_from(args);
                let (_, sub_m) = matches.subcommand().unwrap();
                assert_eq!(
                    sub_m.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_order_fields() {
        let matches = new().get_matches_from(vec![
            "dsog-portal",
            "order",
            "--field",
            "product_id=P-7",
            "-f",
            "quantity = 3",
        ]);
        let (_, sub_m) = matches.subcommand().unwrap();
        let fields: Vec<(String, String)> = sub_m
            .get_many::<(String, String)>(ARG_FIELD)
            .unwrap()
            .cloned()
            .collect();
        assert_eq!(
            fields,
            vec![
                ("product_id".to_string(), "P-7".to_string()),
                ("quantity".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_field_rejects_malformed() {
        assert!(parse_field("quantity").is_err());
        assert!(parse_field("=3").is_err());
        assert_eq!(
            parse_field("note=").unwrap(),
            ("note".to_string(), String::new())
        );
    }

    #[test]
    fn test_subcommand_required() {
        let result = new().try_get_matches_from(vec!["dsog-portal"]);
        assert!(result.is_err());
    }
}
