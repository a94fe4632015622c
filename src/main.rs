use anyhow::Result;
use clap::Parser;
use log::info;

mod cli;

use cli::{Cli, Commands};
use cli::commands::{
    handle_config_command, handle_hierarchy_command, handle_rules_command, handle_workflow_command,
};
use cxgen::config::Config;

fn main() -> Result<()> {
    // Initialize logger to file (truncate on each run)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("cxgen.log")?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let config = Config::load()?;

    let cli = Cli::parse();
    info!("Starting cxgen");

    match cli.command {
        Commands::Hierarchy(args) => handle_hierarchy_command(args, &config),
        Commands::Rules(args) => handle_rules_command(args, &config),
        Commands::Workflow(args) => handle_workflow_command(args, &config),
        Commands::Config(args) => handle_config_command(args, &config),
    }
}
