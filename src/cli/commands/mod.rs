use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ColorChoice, Command,
};

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("acceso")
        .about("Terminal client for the portal authentication and profile API")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .help("Base URL of the portal backend")
                .default_value("http://localhost:3000")
                .env("ACCESO_API_URL")
                .global(true),
        )
        .arg(
            Arg::new("session-file")
                .long("session-file")
                .help("Session file path (default: {data_dir}/acceso/session.json)")
                .env("ACCESO_SESSION_FILE")
                .global(true),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("ACCESO_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        )
        .subcommand(
            Command::new("login")
                .about("Sign in and persist the session")
                .arg(
                    Arg::new("email")
                        .short('e')
                        .long("email")
                        .help("Account email")
                        .env("ACCESO_EMAIL")
                        .required(true),
                )
                .arg(
                    Arg::new("password")
                        .short('p')
                        .long("password")
                        .help("Account password")
                        .env("ACCESO_PASSWORD")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("registro")
                .about("Create an account and sign in")
                .arg(
                    Arg::new("nombre")
                        .short('n')
                        .long("nombre")
                        .help("Display name")
                        .required(true),
                )
                .arg(
                    Arg::new("email")
                        .short('e')
                        .long("email")
                        .help("Account email")
                        .env("ACCESO_EMAIL")
                        .required(true),
                )
                .arg(
                    Arg::new("password")
                        .short('p')
                        .long("password")
                        .help("Account password")
                        .env("ACCESO_PASSWORD")
                        .required(true),
                )
                .arg(
                    Arg::new("confirmar")
                        .short('c')
                        .long("confirmar")
                        .help("Password confirmation")
                        .env("ACCESO_PASSWORD_CONFIRMAR")
                        .required(true),
                ),
        )
        .subcommand(Command::new("estado").about("Show and verify the current session"))
        .subcommand(
            Command::new("perfil")
                .about("Update the profile")
                .arg(
                    Arg::new("nombre")
                        .short('n')
                        .long("nombre")
                        .help("New display name"),
                )
                .arg(
                    Arg::new("email")
                        .short('e')
                        .long("email")
                        .help("New email address"),
                ),
        )
        .subcommand(
            Command::new("contrasena")
                .about("Change the account password")
                .arg(
                    Arg::new("actual")
                        .long("actual")
                        .help("Current password")
                        .required(true),
                )
                .arg(
                    Arg::new("nueva")
                        .long("nueva")
                        .help("New password")
                        .required(true),
                )
                .arg(
                    Arg::new("confirmar")
                        .short('c')
                        .long("confirmar")
                        .help("New password confirmation")
                        .required(true),
                ),
        )
        .subcommand(Command::new("salir").about("Sign out and clear the session"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "acceso");
        assert_eq!(
            command.get_about().unwrap().to_string(),
            "Terminal client for the portal authentication and profile API"
        );
        assert_eq!(
            command.get_version().unwrap().to_string(),
            env!("CARGO_PKG_VERSION")
        );
    }

    #[test]
    fn test_check_login_args() {
        let command = new();
        let matches = command.get_matches_from(vec![
            "acceso",
            "--api-url",
            "http://backend.tld:3000",
            "login",
            "--email",
            "a@b.com",
            "--password",
            "secret1",
        ]);

        assert_eq!(
            matches.get_one::<String>("api-url").map(|s| s.to_string()),
            Some("http://backend.tld:3000".to_string())
        );

        let sub = matches.subcommand_matches("login").unwrap();
        assert_eq!(
            sub.get_one::<String>("email").map(|s| s.to_string()),
            Some("a@b.com".to_string())
        );
        assert_eq!(
            sub.get_one::<String>("password").map(|s| s.to_string()),
            Some("secret1".to_string())
        );
    }

    #[test]
    fn test_api_url_default() {
        temp_env::with_vars([("ACCESO_API_URL", None::<String>)], || {
            let command = new();
            let matches = command.get_matches_from(vec!["acceso", "estado"]);
            assert_eq!(
                matches.get_one::<String>("api-url").map(|s| s.to_string()),
                Some("http://localhost:3000".to_string())
            );
        });
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("ACCESO_API_URL", Some("http://backend.tld:3000")),
                ("ACCESO_SESSION_FILE", Some("/tmp/acceso/session.json")),
                ("ACCESO_EMAIL", Some("a@b.com")),
                ("ACCESO_PASSWORD", Some("secret1")),
                ("ACCESO_LOG_LEVEL", Some("info")),
            ],
            || {
                let command = new();
                let matches = command.get_matches_from(vec!["acceso", "login"]);
                assert_eq!(
                    matches.get_one::<String>("api-url").map(|s| s.to_string()),
                    Some("http://backend.tld:3000".to_string())
                );
                assert_eq!(
                    matches
                        .get_one::<String>("session-file")
                        .map(|s| s.to_string()),
                    Some("/tmp/acceso/session.json".to_string())
                );
                assert_eq!(matches.get_one::<u8>("verbosity").map(|s| *s), Some(2));

                let sub = matches.subcommand_matches("login").unwrap();
                assert_eq!(
                    sub.get_one::<String>("email").map(|s| s.to_string()),
                    Some("a@b.com".to_string())
                );
                assert_eq!(
                    sub.get_one::<String>("password").map(|s| s.to_string()),
                    Some("secret1".to_string())
                );
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        // loop cover all possible value_parse
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars([("ACCESO_LOG_LEVEL", Some(level))], || {
                let command = new();
                let matches = command.get_matches_from(vec!["acceso", "estado"]);
                assert_eq!(
                    matches.get_one::<u8>("verbosity").map(|s| *s),
                    Some(index as u8)
                );
            });
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        // loop cover all possible value_parse
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, _) in levels.iter().enumerate() {
            temp_env::with_vars([("ACCESO_LOG_LEVEL", None::<String>)], || {
                let mut args = vec!["acceso".to_string()];

                // Add the appropriate number of "-v" flags based on the index
                if index > 0 {
                    let v = format!("-{}", "v".repeat(index));
                    args.push(v);
                }

                args.push("estado".to_string());

                let command = new();

                let matches = command.get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>("verbosity").map(|s| *s),
                    Some(index as u8)
                );
            });
        }
    }

    #[test]
    fn test_missing_required_login_args() {
        temp_env::with_vars(
            [
                ("ACCESO_EMAIL", None::<String>),
                ("ACCESO_PASSWORD", None::<String>),
            ],
            || {
                let command = new();
                let result = command.try_get_matches_from(vec!["acceso", "login"]);
                assert_eq!(
                    result.map(|_| ()).map_err(|e| e.kind()),
                    Err(clap::error::ErrorKind::MissingRequiredArgument)
                );
            },
        );
    }
}
