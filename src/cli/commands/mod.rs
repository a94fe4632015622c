pub mod config;
pub mod hierarchy;
pub mod rules;
pub mod workflow;

pub use config::handle_config_command;
pub use hierarchy::handle_hierarchy_command;
pub use rules::handle_rules_command;
pub use workflow::handle_workflow_command;
