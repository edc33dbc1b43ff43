use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ArgAction, ColorChoice, Command,
};

use client::{DEFAULT_URL, DEFAULT_VCS};

fn org_arg() -> Arg {
    Arg::new("org")
        .long("org")
        .help("Organization for this call; overrides --organization")
        .default_value("")
        .hide_default_value(true)
}

fn context_arg() -> Arg {
    Arg::new("context")
        .help("Context name")
        .required(true)
}

fn contexts_command() -> Command {
    Command::new("context")
        .about("Manage contexts")
        .subcommand_required(true)
        .subcommand(Command::new("list").about("List contexts").arg(org_arg()))
        .subcommand(
            Command::new("get")
                .about("Show a context")
                .arg(Arg::new("name").help("Context name").required(true))
                .arg(org_arg()),
        )
        .subcommand(
            Command::new("create")
                .about("Create a context")
                .arg(Arg::new("name").help("Context name").required(true))
                .arg(org_arg()),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a context; succeeds if it is already absent")
                .arg(Arg::new("name").help("Context name").required(true))
                .arg(org_arg()),
        )
}

fn env_command() -> Command {
    Command::new("env")
        .about("Manage context environment variables")
        .subcommand_required(true)
        .subcommand(
            Command::new("list")
                .about("List the variables of a context")
                .arg(context_arg())
                .arg(org_arg()),
        )
        .subcommand(
            Command::new("set")
                .about("Create or replace a variable")
                .arg(context_arg())
                .arg(Arg::new("variable").help("Variable name").required(true))
                .arg(
                    Arg::new("value")
                        .long("value")
                        .help("Variable value")
                        .env("CIRCLECI_ENV_VALUE")
                        .hide_env_values(true)
                        .required(true),
                )
                .arg(org_arg()),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a variable; succeeds if it is already absent")
                .arg(context_arg())
                .arg(Arg::new("variable").help("Variable name").required(true))
                .arg(org_arg()),
        )
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("circleci-provider")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg(
            Arg::new("url")
                .long("url")
                .help("CircleCI API URL")
                .env("CIRCLECI_URL")
                .default_value(DEFAULT_URL)
                .global(true),
        )
        .arg(
            Arg::new("token")
                .long("token")
                .help("CircleCI API token")
                .env("CIRCLECI_TOKEN")
                .hide_env_values(true)
                .global(true),
        )
        .arg(
            Arg::new("vcs")
                .long("vcs")
                .help("VCS the projects live under")
                .env("CIRCLECI_VCS")
                .default_value(DEFAULT_VCS)
                .global(true),
        )
        .arg(
            Arg::new("organization")
                .long("organization")
                .help("Default organization")
                .env("CIRCLECI_ORGANIZATION")
                .global(true),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: -v info, -vv debug, -vvv trace")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("slug")
                .about("Print the project slug")
                .arg(Arg::new("project").help("Project name").required(true))
                .arg(org_arg()),
        )
        .subcommand(contexts_command())
        .subcommand(env_command())
}
