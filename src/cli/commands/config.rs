use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;

use crate::cli::prompts::{prompt_confirmation, success};
use cxgen::config::{Config, KEYS};

#[derive(Args)]
pub struct ConfigCommands {
    #[command(subcommand)]
    pub command: ConfigSubcommands,
}

#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Show current settings
    Show,
    /// Print where the config file lives
    Path,
    /// Get the value of a specific setting
    Get {
        /// Setting name, e.g. rules.time_window
        name: String,
    },
    /// Set the value of a specific setting
    Set {
        /// Setting name
        name: String,
        /// Setting value
        value: String,
    },
    /// Reset a setting to its default value
    Reset {
        /// Setting name
        name: String,
    },
    /// Reset all settings to default values
    ResetAll {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

pub fn handle_config_command(args: ConfigCommands, config: &Config) -> Result<()> {
    match args.command {
        ConfigSubcommands::Show => {
            println!("{}", "Settings".bright_cyan().bold());
            let defaults = Config::default();
            for key in KEYS {
                let value = config.get(key)?;
                let marker = if value == defaults.get(key)? {
                    String::new()
                } else {
                    " (modified)".bright_yellow().to_string()
                };
                println!("  {:<28} {}{}", key, value.bright_white(), marker);
            }
            Ok(())
        }
        ConfigSubcommands::Path => {
            println!("{}", Config::get_config_path()?.display());
            Ok(())
        }
        ConfigSubcommands::Get { name } => {
            println!("{}", config.get(&name)?);
            Ok(())
        }
        ConfigSubcommands::Set { name, value } => {
            let mut config = config.clone();
            config.set(&name, &value)?;
            config.save()?;
            success(format!("{} = {}", name, config.get(&name)?));
            Ok(())
        }
        ConfigSubcommands::Reset { name } => {
            let default = Config::default().get(&name)?;
            let mut config = config.clone();
            config.set(&name, &default)?;
            config.save()?;
            success(format!("{} reset to {}", name, default));
            Ok(())
        }
        ConfigSubcommands::ResetAll { force } => {
            if !force && !prompt_confirmation("Reset all settings to their defaults?", false)? {
                println!("Operation cancelled.");
                return Ok(());
            }
            Config::default().save()?;
            success("All settings reset to defaults");
            Ok(())
        }
    }
}
