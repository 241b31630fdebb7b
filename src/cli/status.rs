//! Status command implementation

use colored::Colorize;

use crate::config::Config;
use crate::error::Result;

/// Run the status command to display configuration status
pub fn run(config_path: Option<&str>) -> Result<()> {
    println!("{}\n", "circlet Configuration Status".bold());

    match Config::load_at(config_path) {
        Ok(config) => {
            let path = Config::resolve_path(config_path)?;
            println!("Config file: {}", path.display().to_string().cyan());
            println!("API host: {}", config.host);
            println!();

            if config.token.is_some() {
                println!("{} API token configured", "✓".green());
            } else {
                println!("{} API token not configured", "✗".red());
                println!("  → Run 'circlet init' to configure");
            }

            match (&config.organization, config.vcs_type) {
                (Some(org), Some(vcs)) => {
                    println!("{} Default organization: {} ({})", "✓".green(), org, vcs);
                }
                (Some(org), None) => {
                    println!(
                        "{} Default organization: {} (provider inferred from git)",
                        "✓".green(),
                        org
                    );
                }
                _ => {
                    println!(
                        "{} No default organization (inferred from the 'origin' remote)",
                        "○".dimmed()
                    );
                }
            }

            Ok(())
        }
        Err(err) => {
            println!("{} {}", "✗".red(), err);
            println!("\nRun {} to get started.", "circlet init".cyan());
            Ok(())
        }
    }
}
