mod logging;
mod members;
mod upload;

pub use self::logging::validator_log_level;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

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

    let command = Command::new("spaces")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("base-url")
                .short('u')
                .long("base-url")
                .help("Portal base URL, example: https://portal.tld/")
                .default_value("http://localhost:8000/")
                .env("SPACES_BASE_URL")
                .global(true),
        )
        .arg(
            Arg::new("csrf-token")
                .long("csrf-token")
                .help("CSRF token sent as X-CSRFToken")
                .env("SPACES_CSRF_TOKEN")
                .hide_env_values(true)
                .global(true),
        )
        .arg(
            Arg::new("session-cookie")
                .long("session-cookie")
                .help("Session cookie sent with every request, example: sessionid=...")
                .env("SPACES_SESSION_COOKIE")
                .hide_env_values(true)
                .global(true),
        )
        .arg(
            Arg::new("page")
                .long("page")
                .help("Page snapshot holding the membership tables")
                .default_value("space-page.json")
                .env("SPACES_PAGE")
                .global(true)
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        );

    let command = members::with_args(command);
    let command = upload::with_args(command);
    logging::with_args(command)
}
