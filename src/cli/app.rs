use super::commands::config::ConfigCommands;
use super::commands::hierarchy::HierarchyCommands;
use super::commands::rules::RulesCommands;
use super::commands::workflow::WorkflowCommands;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cxgen")]
#[command(about = "Build hierarchy spreadsheets, engagement rule XML and workflow JSON")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Enterprise hierarchy spreadsheet
    Hierarchy(HierarchyCommands),
    /// Engagement rule XML
    Rules(RulesCommands),
    /// Workflow drafts and JSON export
    Workflow(WorkflowCommands),
    /// Application settings
    Config(ConfigCommands),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_nested_workflow_command() {
        let cli = Cli::try_parse_from([
            "cxgen", "workflow", "status", "add", "draft.json", "Escalated", "--color", "#ff0000",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Workflow(_)));
    }
}
