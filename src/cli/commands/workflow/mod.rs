//! Workflow draft commands
//!
//! A draft is the JSON form of `WorkflowDocument`. Every editing command
//! loads it, applies one document method and saves it back; `export` writes
//! the separate platform JSON.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

mod show;

use crate::cli::prompts::{confirm_overwrite, success};
use cxgen::config::Config;
use cxgen::workflow::condition::FieldComparison;
use cxgen::workflow::duration::parse_duration;
use cxgen::workflow::editor::validate_json;
use cxgen::workflow::{
    Condition, CustomTrigger, FieldFlags, FieldType, HeaderKind, NotificationChannel, StatusEdit, Target,
    TextField, WorkflowDocument, WorkflowType, export_file_name, render, templates,
};

pub const DEFAULT_DRAFT: &str = "workflow.draft.json";

#[derive(Args)]
pub struct WorkflowCommands {
    #[command(subcommand)]
    pub command: WorkflowSubcommands,
}

#[derive(Subcommand)]
pub enum WorkflowSubcommands {
    /// Start a draft from the default skeleton or a template
    Init {
        #[arg(short = 't', long = "type", value_enum)]
        workflow_type: Option<WorkflowType>,
        #[arg(short, long)]
        name: Option<String>,
        /// Built-in template, see `cxgen workflow templates`
        #[arg(long)]
        template: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short, long)]
        force: bool,
    },
    /// Summarise a draft
    Show { draft: PathBuf },
    /// Switch to another workflow type, rebuilding the skeleton
    SetType {
        draft: PathBuf,
        #[arg(value_enum)]
        workflow_type: WorkflowType,
    },
    Rename { draft: PathBuf, name: String },
    /// Set a prefix or template text
    Set {
        draft: PathBuf,
        #[arg(value_enum)]
        field: TextField,
        value: String,
    },
    /// Sender address for notifications
    BotEmail { draft: PathBuf, email: String },
    #[command(subcommand)]
    Status(StatusCommands),
    #[command(subcommand)]
    Transition(TransitionCommands),
    #[command(subcommand)]
    Priority(ValueCommands),
    #[command(subcommand)]
    Field(FieldCommands),
    #[command(subcommand)]
    Header(HeaderCommands),
    /// Creation triggers
    #[command(subcommand)]
    Trigger(TriggerCommands),
    #[command(subcommand)]
    Assignment(AssignmentCommands),
    /// Review channels feeding orm type values
    #[command(subcommand)]
    Channel(ChannelCommands),
    #[command(subcommand)]
    TypeValue(TypeValueCommands),
    /// Write the platform JSON
    Export {
        draft: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short, long)]
        force: bool,
    },
    /// Check that a hand-edited JSON file parses
    Validate { file: PathBuf },
    /// List built-in templates
    Templates,
}

#[derive(Subcommand)]
pub enum StatusCommands {
    List { draft: PathBuf },
    Add {
        draft: PathBuf,
        name: String,
        #[arg(long, default_value = "#e6e6e6")]
        color: String,
    },
    Remove { draft: PathBuf, id: String },
    Edit {
        draft: PathBuf,
        id: String,
        #[arg(long)]
        name: Option<String>,
        /// New background; resets derived colors
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        text_color: Option<String>,
        #[arg(long)]
        initial: Option<bool>,
        #[arg(long = "final")]
        is_final: Option<bool>,
        /// Replaces the high priority field list
        #[arg(long = "high-priority")]
        high_priority: Option<Vec<String>>,
    },
}

#[derive(Subcommand)]
pub enum TransitionCommands {
    Add { draft: PathBuf, from: String, to: String },
    Remove { draft: PathBuf, from: String, to: String },
}

#[derive(Subcommand)]
pub enum ValueCommands {
    Add { draft: PathBuf, name: String },
    Remove { draft: PathBuf, id: String },
}

#[derive(Subcommand)]
pub enum FieldCommands {
    List { draft: PathBuf },
    Add {
        draft: PathBuf,
        name: String,
        #[arg(long)]
        id: Option<String>,
        #[arg(short = 't', long = "type", value_enum, default_value = "string")]
        field_type: FieldType,
        #[arg(long)]
        required: bool,
    },
    Remove { draft: PathBuf, id: String },
    /// Change required / readOnly / hidden
    Flags {
        draft: PathBuf,
        id: String,
        #[arg(long)]
        required: Option<bool>,
        #[arg(long)]
        read_only: Option<bool>,
        #[arg(long)]
        hidden: Option<bool>,
    },
    /// Enum and multiselect options
    #[command(subcommand)]
    #[command(name = "option")]
    Options(OptionCommands),
}

#[derive(Subcommand)]
pub enum OptionCommands {
    Add { draft: PathBuf, field: String, option: String },
    Remove { draft: PathBuf, field: String, option: String },
}

#[derive(Subcommand)]
pub enum HeaderCommands {
    Add {
        draft: PathBuf,
        id: String,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, value_enum, default_value = "contact")]
        kind: HeaderKind,
    },
    /// Remove by 0-based position
    Remove { draft: PathBuf, index: usize },
}

#[derive(Subcommand)]
pub enum TriggerCommands {
    /// Show the catalog with on/off state, then custom triggers
    List { draft: PathBuf },
    /// Switch a catalog trigger by id (e.g. creation_sms_orm)
    Toggle { draft: PathBuf, id: String },
    /// Add a custom creation notification
    Add {
        draft: PathBuf,
        #[arg(long, value_enum, default_value = "email")]
        channel: NotificationChannel,
        #[arg(long)]
        template: String,
        #[arg(long, value_enum, default_value = "admin")]
        target: Target,
        #[arg(long = "contact")]
        contacts: Vec<String>,
        /// Only notify admins of the ticket's location
        #[arg(long)]
        filter_by_location: bool,
        /// Fire only when the status equals this value
        #[arg(long)]
        when_status: Option<String>,
        /// Fire only when this field matches `--value`
        #[arg(long, requires = "value")]
        when_field: Option<String>,
        #[arg(long, value_enum, default_value = "equals")]
        comparison: FieldComparison,
        #[arg(long)]
        value: Option<String>,
    },
    /// Remove a custom trigger by its position in the custom list
    Remove { draft: PathBuf, index: usize },
}

#[derive(Subcommand)]
pub enum AssignmentCommands {
    /// Switch an assignment trigger by template name
    Toggle { draft: PathBuf, template: String },
    /// Turn automatic escalation on or off
    Auto {
        draft: PathBuf,
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
    /// Escalation sender address
    Email { draft: PathBuf, email: String },
    #[command(subcommand)]
    Escalation(EscalationCommands),
}

#[derive(Subcommand)]
pub enum EscalationCommands {
    Add { draft: PathBuf },
    Remove { draft: PathBuf, index: usize },
    Edit {
        draft: PathBuf,
        index: usize,
        /// Delay such as `1h 30m`
        #[arg(long)]
        after: Option<String>,
        #[arg(long)]
        assignee: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ChannelCommands {
    /// Show the channel catalog
    List { draft: Option<PathBuf> },
    Add { draft: PathBuf, channel: String },
    Remove { draft: PathBuf, channel: String },
}

#[derive(Subcommand)]
pub enum TypeValueCommands {
    Add { draft: PathBuf, name: String },
    Remove { draft: PathBuf, id: String },
    Rename { draft: PathBuf, id: String, name: String },
    /// Drop manual edits and derive values again
    Reset { draft: PathBuf },
    /// Display name of the type field
    SetName { draft: PathBuf, name: String },
}

pub fn handle_workflow_command(args: WorkflowCommands, config: &Config) -> Result<()> {
    use WorkflowSubcommands as W;

    match args.command {
        W::Init {
            workflow_type,
            name,
            template,
            output,
            force,
        } => init_command(config, workflow_type, name, template, output, force),
        W::Show { draft } => show::show_draft(&load(&draft)?),
        W::SetType { draft, workflow_type } => edit(&draft, |doc| {
            Ok(if doc.set_workflow_type(workflow_type) {
                format!("Workflow type is now {}", workflow_type)
            } else {
                format!("Workflow type is already {}", workflow_type)
            })
        }),
        W::Rename { draft, name } => edit(&draft, |doc| {
            doc.rename(&name)?;
            Ok(format!("Renamed workflow to '{}'", doc.name()))
        }),
        W::Set { draft, field, value } => edit(&draft, |doc| {
            doc.set_text(field, &value);
            Ok(format!("Updated {:?}", field))
        }),
        W::BotEmail { draft, email } => edit(&draft, |doc| {
            doc.set_bot_email(&email)?;
            Ok(format!("Bot email set to {}", email))
        }),
        W::Status(cmd) => status_command(cmd),
        W::Transition(cmd) => match cmd {
            TransitionCommands::Add { draft, from, to } => edit(&draft, |doc| {
                doc.add_transition(&from, &to)?;
                Ok(format!("Added transition {} -> {}", from, to))
            }),
            TransitionCommands::Remove { draft, from, to } => edit(&draft, |doc| {
                doc.remove_transition(&from, &to)?;
                Ok(format!("Removed transition {} -> {}", from, to))
            }),
        },
        W::Priority(cmd) => match cmd {
            ValueCommands::Add { draft, name } => edit(&draft, |doc| {
                doc.add_priority(&name)?;
                Ok(format!("Added priority '{}'", name.trim()))
            }),
            ValueCommands::Remove { draft, id } => edit(&draft, |doc| {
                doc.remove_priority(&id)?;
                Ok(format!("Removed priority '{}'", id))
            }),
        },
        W::Field(cmd) => field_command(cmd),
        W::Header(cmd) => match cmd {
            HeaderCommands::Add { draft, id, name, kind } => edit(&draft, |doc| {
                doc.add_header(kind, &id, &name)?;
                Ok(format!("Added header '{}'", id))
            }),
            HeaderCommands::Remove { draft, index } => edit(&draft, |doc| {
                let header = doc.remove_header(index)?;
                Ok(format!("Removed header '{}'", header.id))
            }),
        },
        W::Trigger(cmd) => trigger_command(cmd),
        W::Assignment(cmd) => assignment_command(cmd),
        W::Channel(cmd) => match cmd {
            ChannelCommands::List { draft } => {
                let doc = draft.as_deref().map(load).transpose()?;
                show::show_channels(doc.as_ref());
                Ok(())
            }
            ChannelCommands::Add { draft, channel } => edit(&draft, |doc| {
                Ok(if doc.add_channel(&channel)? {
                    format!("Selected channel '{}'", channel)
                } else {
                    format!("Channel '{}' was already selected", channel)
                })
            }),
            ChannelCommands::Remove { draft, channel } => edit(&draft, |doc| {
                Ok(if doc.remove_channel(&channel)? {
                    format!("Deselected channel '{}'", channel)
                } else {
                    format!("Channel '{}' was not selected", channel)
                })
            }),
        },
        W::TypeValue(cmd) => type_value_command(cmd),
        W::Export { draft, output, force } => export_command(config, &draft, output, force),
        W::Validate { file } => validate_command(&file),
        W::Templates => {
            show::show_templates();
            Ok(())
        }
    }
}

fn init_command(
    config: &Config,
    workflow_type: Option<WorkflowType>,
    name: Option<String>,
    template: Option<String>,
    output: Option<PathBuf>,
    force: bool,
) -> Result<()> {
    let mut doc = match &template {
        Some(template) => templates::load(template)?,
        None => WorkflowDocument::new(
            workflow_type.unwrap_or(config.workflow.default_type),
            name.as_deref().unwrap_or(&config.workflow.default_name),
        ),
    };
    if template.is_some() {
        if let Some(workflow_type) = workflow_type {
            doc.set_workflow_type(workflow_type);
        }
        if let Some(name) = &name {
            doc.rename(name)?;
        }
    }
    doc.set_bot_email(&config.workflow.bot_email)?;

    let path = output.unwrap_or_else(|| config.output.resolve(DEFAULT_DRAFT));
    if !confirm_overwrite(&path, force)? {
        println!("Operation cancelled.");
        return Ok(());
    }
    doc.write_file(&path)?;
    success(format!(
        "Created {} draft '{}' in {}",
        doc.workflow_type(),
        doc.name(),
        path.display()
    ));
    Ok(())
}

fn status_command(cmd: StatusCommands) -> Result<()> {
    match cmd {
        StatusCommands::List { draft } => show::show_statuses(&load(&draft)?),
        StatusCommands::Add { draft, name, color } => edit(&draft, |doc| {
            doc.add_status(&name, &color)?;
            Ok(format!("Added status '{}'", name.trim()))
        }),
        StatusCommands::Remove { draft, id } => edit(&draft, |doc| {
            doc.remove_status(&id)?;
            Ok(format!("Removed status '{}' and its transitions", id))
        }),
        StatusCommands::Edit {
            draft,
            id,
            name,
            color,
            text_color,
            initial,
            is_final,
            high_priority,
        } => edit(&draft, |doc| {
            doc.edit_status(
                &id,
                StatusEdit {
                    name,
                    background: color,
                    text_color,
                    is_initial: initial,
                    is_final,
                    high_priority_fields: high_priority,
                },
            )?;
            Ok(format!("Updated status '{}'", id))
        }),
    }
}

fn field_command(cmd: FieldCommands) -> Result<()> {
    match cmd {
        FieldCommands::List { draft } => show::show_fields(&load(&draft)?),
        FieldCommands::Add {
            draft,
            name,
            id,
            field_type,
            required,
        } => edit(&draft, |doc| {
            let id = doc.add_field(&name, id.as_deref(), field_type)?;
            if required {
                doc.set_field_flags(
                    &id,
                    FieldFlags {
                        required: Some(true),
                        ..Default::default()
                    },
                )?;
            }
            Ok(format!("Added {} field '{}'", field_type, id))
        }),
        FieldCommands::Remove { draft, id } => edit(&draft, |doc| {
            doc.remove_field(&id)?;
            Ok(format!("Removed field '{}'", id))
        }),
        FieldCommands::Flags {
            draft,
            id,
            required,
            read_only,
            hidden,
        } => edit(&draft, |doc| {
            doc.set_field_flags(
                &id,
                FieldFlags {
                    required,
                    read_only,
                    hidden,
                },
            )?;
            Ok(format!("Updated field '{}'", id))
        }),
        FieldCommands::Options(OptionCommands::Add { draft, field, option }) => edit(&draft, |doc| {
            doc.add_option(&field, &option)?;
            Ok(format!("Added option '{}' to '{}'", option.trim(), field))
        }),
        FieldCommands::Options(OptionCommands::Remove { draft, field, option }) => edit(&draft, |doc| {
            doc.remove_option(&field, &option)?;
            Ok(format!("Removed option '{}' from '{}'", option, field))
        }),
    }
}

fn trigger_command(cmd: TriggerCommands) -> Result<()> {
    match cmd {
        TriggerCommands::List { draft } => show::show_triggers(&load(&draft)?),
        TriggerCommands::Toggle { draft, id } => edit(&draft, |doc| {
            let enabled = doc.toggle_creation_trigger(&id)?;
            Ok(format!("Trigger {} is now {}", id, if enabled { "on" } else { "off" }))
        }),
        TriggerCommands::Add {
            draft,
            channel,
            template,
            target,
            contacts,
            filter_by_location,
            when_status,
            when_field,
            comparison,
            value,
        } => edit(&draft, |doc| {
            let mut clauses = Vec::new();
            if let Some(status) = &when_status {
                clauses.push(Condition::equals("status", status));
            }
            if let (Some(field), Some(value)) = (&when_field, &value) {
                clauses.push(Condition::compare(field, comparison, value));
            }
            let condition = match clauses.len() {
                0 => None,
                1 => clauses.pop(),
                _ => Some(Condition::and(clauses)),
            };

            doc.add_custom_trigger(CustomTrigger {
                channel,
                template: template.clone(),
                target,
                contacts,
                filter_by_location,
                condition,
            })?;
            Ok(format!("Added custom trigger '{}'", template.trim()))
        }),
        TriggerCommands::Remove { draft, index } => edit(&draft, |doc| {
            let removed = doc.remove_custom_trigger(index)?;
            Ok(format!("Removed custom trigger '{}'", removed.template().unwrap_or("?")))
        }),
    }
}

fn assignment_command(cmd: AssignmentCommands) -> Result<()> {
    match cmd {
        AssignmentCommands::Toggle { draft, template } => edit(&draft, |doc| {
            let enabled = doc.toggle_assignment_trigger(&template)?;
            Ok(format!("Assignment trigger {} is now {}", template, if enabled { "on" } else { "off" }))
        }),
        AssignmentCommands::Auto { draft, enabled } => edit(&draft, |doc| {
            doc.set_automatic_assignment(enabled);
            Ok(format!(
                "Automatic assignment {}",
                if enabled { "enabled" } else { "disabled" }
            ))
        }),
        AssignmentCommands::Email { draft, email } => edit(&draft, |doc| {
            doc.set_assignment_email(&email)?;
            Ok(format!("Escalation email set to {}", email))
        }),
        AssignmentCommands::Escalation(EscalationCommands::Add { draft }) => edit(&draft, |doc| {
            let index = doc.add_escalation_level()?;
            Ok(format!("Added escalation level {}", index))
        }),
        AssignmentCommands::Escalation(EscalationCommands::Remove { draft, index }) => edit(&draft, |doc| {
            doc.remove_escalation_level(index)?;
            Ok(format!("Removed escalation level {}", index))
        }),
        AssignmentCommands::Escalation(EscalationCommands::Edit {
            draft,
            index,
            after,
            assignee,
        }) => {
            let delay = after.as_deref().map(parse_duration).transpose()?;
            edit(&draft, |doc| {
                doc.edit_escalation_level(index, delay, assignee.as_deref())?;
                Ok(format!("Updated escalation level {}", index))
            })
        }
    }
}

fn type_value_command(cmd: TypeValueCommands) -> Result<()> {
    match cmd {
        TypeValueCommands::Add { draft, name } => edit(&draft, |doc| {
            let id = doc.add_type_value(&name)?;
            Ok(format!("Added type value '{}'", id))
        }),
        TypeValueCommands::Remove { draft, id } => edit(&draft, |doc| {
            doc.remove_type_value(&id)?;
            Ok(format!("Removed type value '{}'", id))
        }),
        TypeValueCommands::Rename { draft, id, name } => edit(&draft, |doc| {
            let new_id = doc.rename_type_value(&id, &name)?;
            Ok(format!("Renamed type value '{}' to '{}'", id, new_id))
        }),
        TypeValueCommands::Reset { draft } => edit(&draft, |doc| {
            doc.reset_type_values();
            Ok("Type values derived from type, name and channels".to_string())
        }),
        TypeValueCommands::SetName { draft, name } => edit(&draft, |doc| {
            doc.set_type_name(&name)?;
            Ok(format!("Type field is now '{}'", name.trim()))
        }),
    }
}

fn export_command(config: &Config, draft: &Path, output: Option<PathBuf>, force: bool) -> Result<()> {
    let doc = load(draft)?;
    for warning in doc.warnings() {
        show::warn_line(&warning);
    }

    let json = render(doc.workflow())?;
    let path = output.unwrap_or_else(|| config.output.resolve(&export_file_name(doc.workflow())));
    if !confirm_overwrite(&path, force)? {
        println!("Operation cancelled.");
        return Ok(());
    }
    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    success(format!("Exported '{}' to {}", doc.name(), path.display()));
    Ok(())
}

fn validate_command(file: &Path) -> Result<()> {
    let text = fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
    validate_json(&text).with_context(|| format!("{} is not valid JSON", file.display()))?;
    success(format!("{} is valid JSON", file.display()));
    Ok(())
}

fn load(path: &Path) -> Result<WorkflowDocument> {
    WorkflowDocument::read_file(path)
}

/// Load, apply, save. A failed command leaves the file untouched.
fn edit<F>(path: &Path, apply: F) -> Result<()>
where
    F: FnOnce(&mut WorkflowDocument) -> Result<String>,
{
    let mut doc = load(path)?;
    let message = apply(&mut doc)?;
    doc.write_file(path)?;
    info!("{}: {}", path.display(), message);
    success(message);
    Ok(())
}
