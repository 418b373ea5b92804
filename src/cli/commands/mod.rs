use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ArgAction, ColorChoice, Command,
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

fn email_arg() -> Arg {
    Arg::new("email")
        .short('e')
        .long("email")
        .help("Account email address")
        .required(true)
}

fn token_arg() -> Arg {
    Arg::new("token")
        .short('t')
        .long("token")
        .help("Token received by email")
        .required(true)
}

fn user_id_arg() -> Arg {
    Arg::new("id").help("User id").required(true)
}

fn update_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("email")
                .long("email")
                .help("New email address"),
        )
        .arg(
            Arg::new("new-password")
                .long("new-password")
                .help("New password (8-64 characters)"),
        )
        .arg(
            Arg::new("tg-id")
                .long("tg-id")
                .help("Telegram user id")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new("clear-tg-id")
                .long("clear-tg-id")
                .help("Unlink the Telegram account")
                .action(ArgAction::SetTrue)
                .conflicts_with("tg-id"),
        )
}

fn account_flag_args(command: Command) -> Command {
    let flag = |id: &'static str, help: &'static str| {
        Arg::new(id)
            .long(id)
            .help(help)
            .value_name("BOOL")
            .value_parser(clap::value_parser!(bool))
    };

    command
        .arg(flag("active", "Set whether the account can sign in"))
        .arg(flag("superuser", "Grant or revoke superuser access"))
        .arg(flag("verified", "Mark the email address verified or not"))
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("sesame")
        .about("Authentication and user profile client")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("api-base-url")
                .long("api-base-url")
                .help("API base URL, example: https://api.example.com")
                .env("SESAME_API_BASE_URL")
                .global(true),
        )
        .arg(
            Arg::new("timeout-ms")
                .long("timeout-ms")
                .help("Per-request timeout in milliseconds")
                .default_value("15000")
                .env("SESAME_TIMEOUT_MS")
                .global(true)
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("username")
                .short('u')
                .long("username")
                .help("Login username (email); signs in before the command runs")
                .env("SESAME_USERNAME")
                .global(true),
        )
        .arg(
            Arg::new("password")
                .short('p')
                .long("password")
                .help("Login or registration password")
                .env("SESAME_PASSWORD")
                .hide_env_values(true)
                .global(true),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("SESAME_LOG_LEVEL")
                .global(true)
                .action(ArgAction::Count)
                .value_parser(validator_log_level()),
        )
        .subcommand(Command::new("login").about("Sign in and print the current user"))
        .subcommand(Command::new("logout").about("End the server session"))
        .subcommand(
            Command::new("register")
                .about("Create an account using --password")
                .arg(email_arg())
                .arg(
                    Arg::new("send-verification")
                        .long("send-verification")
                        .help("Request a verification email after registering")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("request-verify-token")
                .about("Email a new verification token")
                .arg(email_arg()),
        )
        .subcommand(
            Command::new("verify")
                .about("Verify an email address with a token")
                .arg(token_arg()),
        )
        .subcommand(
            Command::new("forgot-password")
                .about("Email a password reset token")
                .arg(email_arg()),
        )
        .subcommand(
            Command::new("reset-password")
                .about("Set a new password with a reset token")
                .arg(token_arg())
                .arg(
                    Arg::new("new-password")
                        .long("new-password")
                        .help("New password")
                        .required(true),
                ),
        )
        .subcommand(Command::new("me").about("Print the current user"))
        .subcommand(update_args(
            Command::new("update-me").about("Update the current user"),
        ))
        .subcommand(
            Command::new("user")
                .about("Manage users by id")
                .subcommand_required(true)
                .subcommand(
                    Command::new("get")
                        .about("Print a user")
                        .arg(user_id_arg()),
                )
                .subcommand(account_flag_args(update_args(
                    Command::new("update")
                        .about("Update a user")
                        .arg(user_id_arg()),
                )))
                .subcommand(
                    Command::new("delete")
                        .about("Delete a user")
                        .arg(user_id_arg()),
                ),
        )
}
