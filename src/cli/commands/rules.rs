//! Engagement rule commands
//!
//! The rule file is the exported `<cepRules>` XML itself, read back with
//! `rules::import` on every command. A missing file is an empty rule set.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::*;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::prompts::success;
use cxgen::config::Config;
use cxgen::rules::templates::{self, EMAIL_TEMPLATES, INCIDENT_DESCRIPTIONS, SMS_TEMPLATES};
use cxgen::rules::{
    CustomFieldValue, EmailAction, IncidentAction, OPERATORS, Rule, RuleAction, RuleBuilder, RuleSet,
    SmsAction, XmlOptions,
};

#[derive(Args)]
pub struct RulesCommands {
    #[command(subcommand)]
    pub command: RulesSubcommands,
}

#[derive(Subcommand)]
pub enum RulesSubcommands {
    /// Validate a rule and append it to the file
    Add {
        file: PathBuf,
        /// Survey question id the rule listens to
        #[arg(short, long)]
        question: String,
        /// Rule id; defaults to the next free id
        #[arg(long)]
        id: Option<i64>,
        /// Minutes
        #[arg(long)]
        time_window: Option<u32>,
        /// Drop the emoteNumericValue comparison
        #[arg(long)]
        no_join: bool,
        /// One of eq, nEq, gd, ld, gdOrEq, ldOrEq
        #[arg(long, default_value = "gd")]
        operator: String,
        #[arg(long, default_value = "0")]
        value: String,
        #[arg(long)]
        validity_period: Option<String>,
        /// Fill subject/body/description from a built-in text template
        #[arg(long)]
        template: Option<String>,
        #[command(subcommand)]
        action: ActionArgs,
    },
    /// List rules in the file
    List { file: PathBuf },
    /// Remove a rule by its 0-based position
    Remove { file: PathBuf, index: usize },
    /// Print the XML
    Show { file: PathBuf },
    /// List built-in text templates
    Templates,
}

#[derive(Subcommand)]
pub enum ActionArgs {
    /// Send an email
    Email {
        #[arg(long)]
        to: String,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long, default_value = "")]
        body: String,
    },
    /// Send an SMS
    Sms {
        #[arg(long)]
        to: String,
        #[arg(long, default_value = "")]
        body: String,
    },
    /// Open an incident in a workflow
    Incident {
        #[arg(long)]
        workflow_id: String,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        assignee: String,
        #[arg(long = "type", default_value = "")]
        incident_type: String,
        #[arg(long, default_value = "")]
        priority: String,
        #[arg(long, default_value = "")]
        status: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Custom field values as key=value
        #[arg(long = "field")]
        fields: Vec<String>,
    },
}

impl ActionArgs {
    fn into_action(self) -> Result<RuleAction> {
        Ok(match self {
            ActionArgs::Email { to, subject, body } => RuleAction::Email(EmailAction {
                to,
                subject: subject.unwrap_or_default(),
                body,
            }),
            ActionArgs::Sms { to, body } => RuleAction::Sms(SmsAction {
                sms_to: to,
                sms_body: body,
            }),
            ActionArgs::Incident {
                workflow_id,
                name,
                assignee,
                incident_type,
                priority,
                status,
                description,
                fields,
            } => RuleAction::Incident(IncidentAction {
                workflow_id,
                name,
                assignee,
                incident_type,
                priority,
                status,
                description,
                custom_fields: fields
                    .iter()
                    .map(|pair| {
                        let (key, value) = pair
                            .split_once('=')
                            .with_context(|| format!("Expected key=value, got '{}'", pair))?;
                        Ok(CustomFieldValue {
                            key: key.trim().to_string(),
                            value: value.trim().to_string(),
                        })
                    })
                    .collect::<Result<Vec<_>>>()?,
            }),
        })
    }
}

pub fn handle_rules_command(args: RulesCommands, config: &Config) -> Result<()> {
    match args.command {
        RulesSubcommands::Add {
            file,
            question,
            id,
            time_window,
            no_join,
            operator,
            value,
            validity_period,
            template,
            action,
        } => {
            if !OPERATORS.iter().any(|(op, _)| *op == operator) {
                let known: Vec<&str> = OPERATORS.iter().map(|(op, _)| *op).collect();
                anyhow::bail!("Unknown operator '{}'. Expected one of: {}", operator, known.join(", "));
            }

            let mut builder = RuleBuilder::new(load(&file, config)?);
            let draft = &mut builder.draft;
            if let Some(id) = id {
                draft.id = id;
            }
            draft.time_window = time_window.unwrap_or(config.rules.time_window);
            draft.params.question_id = question;
            draft.params.use_join_param = !no_join;
            draft.params.operator = operator;
            draft.params.value = value;
            draft.validity_period = Some(validity_period.unwrap_or_else(|| config.rules.validity_period.clone()));
            draft.action = action.into_action()?;
            if let Some(name) = template {
                apply_template(draft, &name)?;
            }

            let id = draft.id;
            builder.add_rule()?;
            save(&builder.set, &file)?;
            success(format!("Added rule {} ({} rule(s) in {})", id, builder.set.len(), file.display()));
            Ok(())
        }
        RulesSubcommands::List { file } => {
            let set = load(&file, config)?;
            if set.is_empty() {
                println!("  {}", "No rules yet".dimmed());
            }
            for (index, rule) in set.rules().iter().enumerate() {
                let join = if rule.params.use_join_param {
                    format!(" and emote {} {}", rule.params.operator, rule.params.value)
                } else {
                    String::new()
                };
                println!(
                    "{:>3}  {} {}  question {}{}  {}",
                    index.to_string().dimmed(),
                    "#".dimmed(),
                    rule.id.to_string().bright_cyan().bold(),
                    rule.params.question_id,
                    join,
                    rule.action.summary().bright_white()
                );
            }
            Ok(())
        }
        RulesSubcommands::Remove { file, index } => {
            let mut set = load(&file, config)?;
            let removed = set.remove_rule(index)?;
            save(&set, &file)?;
            success(format!("Removed rule {}", removed.id));
            Ok(())
        }
        RulesSubcommands::Show { file } => {
            let set = load(&file, config)?;
            println!("{}", set.export(&config.rules.xml_options())?);
            Ok(())
        }
        RulesSubcommands::Templates => {
            print_templates();
            Ok(())
        }
    }
}

fn apply_template(draft: &mut Rule, name: &str) -> Result<()> {
    if !templates::apply(draft, name) {
        anyhow::bail!("No {} template named '{}'", draft.action.kind(), name);
    }
    Ok(())
}

fn load(file: &Path, config: &Config) -> Result<RuleSet> {
    if !file.exists() {
        info!("{} does not exist, starting an empty rule set", file.display());
        return Ok(RuleSet::new().with_unique_ids(config.rules.enforce_unique_ids));
    }
    let xml = fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
    cxgen::rules::from_xml(&xml, config.rules.enforce_unique_ids)
}

fn save(set: &RuleSet, file: &Path) -> Result<()> {
    // The stored file is always escaped so `load` can parse it again; rules.escape_xml only shapes `show`.
    // An emptied set is still written so the last rule can be removed
    let xml = set.serialize_all(&XmlOptions::default());
    fs::write(file, xml).with_context(|| format!("Failed to write {}", file.display()))?;
    info!("Saved {} rules to {}", set.len(), file.display());
    Ok(())
}

fn print_templates() {
    println!("{}", "Email".bright_cyan().bold());
    for t in EMAIL_TEMPLATES {
        println!("  {}  {}", t.name.bright_white(), t.subject.dimmed());
    }
    println!("{}", "SMS".bright_cyan().bold());
    for t in SMS_TEMPLATES {
        println!("  {}", t.name.bright_white());
    }
    println!("{}", "Incident description".bright_cyan().bold());
    for t in INCIDENT_DESCRIPTIONS {
        println!("  {}", t.name.bright_white());
    }
    println!();
    println!("{}", "Operators".bright_cyan().bold());
    for (op, label) in OPERATORS {
        println!("  {:<8} {}", op, label.dimmed());
    }
}
