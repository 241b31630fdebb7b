//! Context command implementations

use std::io::{IsTerminal, Read};

use colored::Colorize;
use dialoguer::{Password, theme::ColorfulTheme};
use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::client::{Context, ContextApi};
use crate::config::Config;
use crate::error::{ApiError, ConfigError, Result};
use crate::git::{self, VcsType};
use crate::output::{json, table};

/// The organization a command operates on, resolved once per invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Organization {
    pub name: String,
    pub provider: VcsType,
}

/// Resolve the organization from flags, config defaults, or git inference.
///
/// Flags win over config; the `origin` remote is only consulted for whatever
/// is still missing, so fully specified invocations never spawn git.
pub fn resolve_organization(
    org_flag: Option<&str>,
    vcs_flag: Option<VcsType>,
    config: &Config,
) -> Result<Organization> {
    let name = org_flag
        .map(str::to_string)
        .or_else(|| config.organization.clone());
    let provider = vcs_flag.or(config.vcs_type);

    if let (Some(name), Some(provider)) = (name.clone(), provider) {
        return Ok(Organization { name, provider });
    }

    match git::infer_organization_from_git_remotes() {
        Ok((inferred_provider, inferred_name)) => Ok(Organization {
            name: name.unwrap_or(inferred_name),
            provider: provider.unwrap_or(inferred_provider),
        }),
        // A partially specified organization gets the actionable hint; an
        // unspecified one gets the git failure itself.
        Err(err) if name.is_none() && provider.is_none() => Err(err),
        Err(err) => {
            log::debug!("git inference failed: {}", err);
            Err(ConfigError::MissingOrganization.into())
        }
    }
}

/// Look up a context by name via the listing.
///
/// Names are unique within an organization; a missing name is a not-found
/// error identifying both the context and the organization.
async fn context_by_name(
    client: &dyn ContextApi,
    org: &Organization,
    context_name: &str,
) -> Result<Context> {
    let contexts = client.list_contexts(&org.name, org.provider).await?;

    contexts.context_by_name(context_name).cloned().ok_or_else(|| {
        ApiError::NotFound(format!(
            "no context named '{}' in the '{}' organization",
            context_name, org.name
        ))
        .into()
    })
}

/// Context row for table display
#[derive(Tabled, Serialize)]
struct ContextDisplay {
    #[tabled(rename = "PROVIDER")]
    provider: String,
    #[tabled(rename = "ORGANIZATION")]
    organization: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "CREATED AT")]
    created_at: String,
}

/// Environment variable row for table display; values stay masked
#[derive(Tabled, Serialize)]
struct ResourceDisplay {
    #[tabled(rename = "ENVIRONMENT VARIABLE")]
    variable: String,
    #[tabled(rename = "VALUE")]
    value: String,
}

/// Run the context list command
pub async fn list(client: &dyn ContextApi, org: &Organization, format: OutputFormat) -> Result<()> {
    let contexts = client.list_contexts(&org.name, org.provider).await?;

    match format {
        OutputFormat::Table => {
            let rows: Vec<ContextDisplay> = contexts
                .contexts()
                .map(|c| ContextDisplay {
                    provider: org.provider.to_string(),
                    organization: org.name.clone(),
                    name: c.name.clone(),
                    created_at: c.created_at.clone(),
                })
                .collect();
            println!("{}", table::format_table(&rows));
        }
        OutputFormat::Json => {
            let data: Vec<&Context> = contexts.contexts().collect();
            println!("{}", json::format_json(&data)?);
        }
    }

    Ok(())
}

/// Run the context show command
pub async fn show(
    client: &dyn ContextApi,
    org: &Organization,
    context_name: &str,
    format: OutputFormat,
) -> Result<()> {
    let context = context_by_name(client, org, context_name).await?;

    match format {
        OutputFormat::Table => {
            println!("Context: {}", context.name.bold());
            let rows: Vec<ResourceDisplay> = context
                .resources
                .iter()
                .map(|r| ResourceDisplay {
                    variable: r.variable.clone(),
                    value: format!("••••{}", r.truncated_value),
                })
                .collect();
            println!("{}", table::format_table(&rows));
        }
        OutputFormat::Json => {
            println!("{}", json::format_json(&context)?);
        }
    }

    Ok(())
}

/// Run the context create command
pub async fn create(client: &dyn ContextApi, org: &Organization, context_name: &str) -> Result<()> {
    client
        .create_context(context_name, &org.name, org.provider)
        .await?;

    println!(
        "{} Created context {} in the '{}' organization",
        "✓".green(),
        context_name.bold(),
        org.name
    );

    Ok(())
}

/// Run the context delete command
pub async fn delete(client: &dyn ContextApi, org: &Organization, context_name: &str) -> Result<()> {
    let context = context_by_name(client, org, context_name).await?;
    client.delete_context(&context.id).await?;

    println!("{} Deleted context {}", "✓".green(), context_name.bold());

    Ok(())
}

/// Run the context store command. The secret value comes from stdin: read
/// wholesale when piped, prompted for otherwise.
pub async fn store(
    client: &dyn ContextApi,
    org: &Organization,
    context_name: &str,
    variable: &str,
) -> Result<()> {
    let context = context_by_name(client, org, context_name).await?;
    let secret_value = read_secret_value()?;

    client
        .store_environment_variable(&context.id, variable, &secret_value)
        .await?;

    println!(
        "{} Stored {} in context {}",
        "✓".green(),
        variable.bold(),
        context_name.bold()
    );

    Ok(())
}

/// Run the context remove command
pub async fn remove(
    client: &dyn ContextApi,
    org: &Organization,
    context_name: &str,
    variable: &str,
) -> Result<()> {
    let context = context_by_name(client, org, context_name).await?;
    client
        .delete_environment_variable(&context.id, variable)
        .await?;

    println!(
        "{} Removed {} from context {}",
        "✓".green(),
        variable.bold(),
        context_name.bold()
    );

    Ok(())
}

/// Read the secret value from stdin, prompting when attached to a terminal.
///
/// Piped input is taken as-is; only the interactive prompt trims the trailing
/// newline (the prompt library does so itself).
fn read_secret_value() -> Result<String> {
    let mut stdin = std::io::stdin();

    if stdin.is_terminal() {
        let value = Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Enter secret value")
            .interact()?;
        Ok(value)
    } else {
        let mut value = String::new();
        stdin.read_to_string(&mut value)?;
        Ok(value)
    }
}
