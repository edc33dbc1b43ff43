use anyhow::{Context as _, Result};
use client::{Client, ClientConfig};
use contexts::ContextError;
use secrecy::SecretString;
use serde_json::{json, Value};
use tracing::info;

/// What the user asked for, resolved from the command line.
#[derive(Debug)]
pub enum Operation {
    Slug {
        project: String,
    },
    ContextList,
    ContextGet {
        name: String,
    },
    ContextCreate {
        name: String,
    },
    ContextDelete {
        name: String,
    },
    EnvList {
        context: String,
    },
    EnvSet {
        context: String,
        variable: String,
        value: SecretString,
    },
    EnvDelete {
        context: String,
        variable: String,
    },
}

#[derive(Debug)]
pub struct Action {
    pub config: ClientConfig,
    /// Per-call organization; empty means the configured default.
    pub org: String,
    pub operation: Operation,
}

impl Action {
    /// Builds the client, runs the operation, and prints the result as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built or the operation fails.
    pub async fn execute(self) -> Result<()> {
        let client = Client::new(self.config).context("failed to build CircleCI client")?;
        let output = run(&client, &self.org, self.operation).await?;
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}

/// `Ok(false)` when `result` failed only because the target does not exist.
fn absent_ok(result: Result<(), ContextError>) -> Result<bool, ContextError> {
    match result {
        Ok(()) => Ok(true),
        Err(err) if err.is_not_found() => Ok(false),
        Err(err) => Err(err),
    }
}

pub async fn run(client: &Client, org: &str, operation: Operation) -> Result<Value> {
    match operation {
        Operation::Slug { project } => {
            let slug = client.slug(org, &project)?;
            Ok(json!({ "slug": slug.as_str() }))
        }
        Operation::ContextList => {
            let owner = client.owner(org)?;
            let contexts = client
                .contexts()
                .contexts(&owner)
                .await
                .with_context(|| format!("failed to list contexts of {owner}"))?;
            Ok(serde_json::to_value(contexts)?)
        }
        Operation::ContextGet { name } => {
            let owner = client.owner(org)?;
            let context = client.contexts().context_by_name(&owner, &name).await?;
            Ok(serde_json::to_value(context)?)
        }
        Operation::ContextCreate { name } => {
            let owner = client.owner(org)?;
            let context = client
                .contexts()
                .create_context(&owner, &name)
                .await
                .with_context(|| format!("failed to create context {name}"))?;
            Ok(serde_json::to_value(context)?)
        }
        Operation::ContextDelete { name } => {
            let owner = client.owner(org)?;
            let existed = match client.contexts().context_by_name(&owner, &name).await {
                Ok(context) => absent_ok(client.contexts().delete_context(&context.id).await)?,
                Err(err) if err.is_not_found() => false,
                Err(err) => return Err(err.into()),
            };
            if !existed {
                info!(%owner, context = %name, "context already absent");
            }
            Ok(json!({ "deleted": name, "existed": existed }))
        }
        Operation::EnvList { context } => {
            let owner = client.owner(org)?;
            let found = client.contexts().context_by_name(&owner, &context).await?;
            let variables = client
                .contexts()
                .environment_variables(&found.id)
                .await
                .with_context(|| format!("failed to list variables of {context}"))?;
            Ok(serde_json::to_value(variables)?)
        }
        Operation::EnvSet {
            context,
            variable,
            value,
        } => {
            let owner = client.owner(org)?;
            let found = client.contexts().context_by_name(&owner, &context).await?;
            let stored = client
                .contexts()
                .create_environment_variable(&found.id, &variable, &value)
                .await
                .with_context(|| format!("failed to store {variable} in {context}"))?;
            Ok(serde_json::to_value(stored)?)
        }
        Operation::EnvDelete { context, variable } => {
            let owner = client.owner(org)?;
            let existed = match client.contexts().context_by_name(&owner, &context).await {
                Ok(found) => absent_ok(
                    client
                        .contexts()
                        .delete_environment_variable(&found.id, &variable)
                        .await,
                )?,
                Err(err) if err.is_not_found() => false,
                Err(err) => return Err(err.into()),
            };
            if !existed {
                info!(%owner, %context, %variable, "variable already absent");
            }
            Ok(json!({ "deleted": variable, "existed": existed }))
        }
    }
}
