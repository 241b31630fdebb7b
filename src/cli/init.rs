//! Init command implementation

use colored::Colorize;
use dialoguer::{Confirm, Input, Password, Select, theme::ColorfulTheme};

use crate::config::Config;
use crate::error::Result;
use crate::git::{self, VcsType};

/// Run the init command
///
/// Interactive setup: prompts for the API token and an optional default
/// organization. The default production host is used; a custom host can be set
/// in the config file or via `CIRCLET_HOST` afterwards.
pub fn run(config_path: Option<&str>) -> Result<()> {
    println!("{}", "Welcome to circlet!".bold().green());
    println!("Let's set up your CircleCI configuration.\n");

    let token: String = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("Enter your CircleCI API token")
        .interact()?;

    // Offer the inferred organization as the default when inside a repository
    // with a recognized remote.
    let (organization, vcs_type) = match git::infer_organization_from_git_remotes() {
        Ok((provider, name)) => {
            println!(
                "Found organization {} on {} from the 'origin' remote.",
                name.bold(),
                provider
            );
            let use_inferred = Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt("Set this as your default organization?")
                .default(true)
                .interact()?;

            if use_inferred {
                (Some(name), Some(provider))
            } else {
                prompt_organization()?
            }
        }
        Err(_) => prompt_organization()?,
    };

    let config = Config {
        token: Some(token),
        organization,
        vcs_type,
        ..Config::default()
    };
    config.save_at(config_path)?;

    let path = Config::resolve_path(config_path)?;
    println!(
        "\n{} Configuration saved to: {}",
        "✓".green(),
        path.display()
    );

    if let Some(org) = &config.organization {
        println!("  Default organization: {}", org.bold());
    }

    println!("\n{}", "You're all set! Try running:".bold());
    println!("  {} - Show configuration status", "circlet status".cyan());
    println!("  {} - List contexts", "circlet context list".cyan());

    Ok(())
}

fn prompt_organization() -> Result<(Option<String>, Option<VcsType>)> {
    let name: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Default organization name (leave empty to infer per command)")
        .allow_empty(true)
        .interact_text()?;

    if name.is_empty() {
        return Ok((None, None));
    }

    let providers = [VcsType::GitHub, VcsType::BitBucket];
    let labels = ["GitHub", "Bitbucket"];
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Which provider hosts this organization?")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok((Some(name), Some(providers[selection])))
}
