use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use client::{ClientConfig, DEFAULT_URL, DEFAULT_VCS};
use secrecy::SecretString;
use tracing::Level;

use crate::cli::actions::{Action, Operation};

/// Maps the `-v` count to the default log level.
pub fn verbosity(matches: &ArgMatches) -> Level {
    match matches.get_count("verbosity") {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn required(matches: &ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .with_context(|| format!("missing required argument: {id}"))
}

fn org(matches: &ArgMatches) -> String {
    matches.get_one::<String>("org").cloned().unwrap_or_default()
}

fn leaf(matches: &ArgMatches) -> Result<(&str, &ArgMatches)> {
    matches
        .subcommand()
        .ok_or_else(|| anyhow!("missing subcommand"))
}

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let url = matches
        .get_one::<String>("url")
        .cloned()
        .unwrap_or_else(|| DEFAULT_URL.to_string());
    let token = matches
        .get_one::<String>("token")
        .cloned()
        .context("missing required argument: --token (or CIRCLECI_TOKEN)")?;
    let vcs = matches
        .get_one::<String>("vcs")
        .cloned()
        .unwrap_or_else(|| DEFAULT_VCS.to_string());

    let mut config = ClientConfig::new(url, token).with_vcs(vcs);
    if let Some(organization) = matches.get_one::<String>("organization") {
        config = config.with_organization(organization.clone());
    }

    let (command, sub) = leaf(matches)?;
    let (operation, org) = match command {
        "slug" => (
            Operation::Slug {
                project: required(sub, "project")?,
            },
            org(sub),
        ),
        "context" => {
            let (name, m) = leaf(sub)?;
            let operation = match name {
                "list" => Operation::ContextList,
                "get" => Operation::ContextGet {
                    name: required(m, "name")?,
                },
                "create" => Operation::ContextCreate {
                    name: required(m, "name")?,
                },
                "delete" => Operation::ContextDelete {
                    name: required(m, "name")?,
                },
                other => return Err(anyhow!("unknown context command: {other}")),
            };
            (operation, org(m))
        }
        "env" => {
            let (name, m) = leaf(sub)?;
            let context = required(m, "context")?;
            let operation = match name {
                "list" => Operation::EnvList { context },
                "set" => Operation::EnvSet {
                    context,
                    variable: required(m, "variable")?,
                    value: SecretString::from(required(m, "value")?),
                },
                "delete" => Operation::EnvDelete {
                    context,
                    variable: required(m, "variable")?,
                },
                other => return Err(anyhow!("unknown env command: {other}")),
            };
            (operation, org(m))
        }
        other => return Err(anyhow!("unknown command: {other}")),
    };

    Ok(Action {
        config,
        org,
        operation,
    })
}
