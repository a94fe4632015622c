use anyhow::Result;
use colored::*;

use cxgen::workflow::WorkflowDocument;
use cxgen::workflow::duration::format_duration;
use cxgen::workflow::model::Trigger;
use cxgen::workflow::templates::TEMPLATES;
use cxgen::workflow::type_values::{REVIEW_CHANNELS, channel_name};

pub fn warn_line(warning: &str) {
    println!("{} {}", "!".bright_yellow().bold(), warning.yellow());
}

fn heading(title: &str) {
    println!();
    println!("{}", title.bright_cyan().bold());
}

fn on_off(enabled: bool) -> ColoredString {
    if enabled { "on ".bright_green() } else { "off".dimmed() }
}

pub fn show_draft(doc: &WorkflowDocument) -> Result<()> {
    let wf = doc.workflow();
    println!("{} {}", wf.workflow_name.bright_white().bold(), format!("({})", wf.workflow_type).dimmed());
    println!("  report prefix    {}", wf.report_name_prefix);
    println!("  reporter prefix  {}", wf.reporter_name_prefix);
    println!("  bot email        {}", wf.workflow_creation.email);

    heading(&wf.type_field.name);
    for value in &wf.type_field.values {
        println!("  {:<28} {}", value.id, value.name.dimmed());
    }
    if doc.type_values_customized() {
        println!("  {}", "edited by hand".dimmed());
    }
    if wf.workflow_type.has_reviews() {
        let names: Vec<&str> = doc
            .review_channels()
            .iter()
            .map(|id| channel_name(id).unwrap_or(id.as_str()))
            .collect();
        println!("  channels: {}", names.join(", "));
    }

    show_statuses(doc)?;

    heading("Priority");
    for value in &wf.priority.values {
        println!("  {}", value.name);
    }

    show_fields(doc)?;

    if let Some(hierarchy) = &wf.admin_hierarchy {
        heading("Admin hierarchy");
        for (index, header) in hierarchy.headers.iter().enumerate() {
            println!("{:>4}  {:<20} {}", index.to_string().dimmed(), header.id, header.name.dimmed());
        }
    }

    show_triggers(doc)?;
    show_assignment(doc);

    let warnings = doc.warnings();
    if !warnings.is_empty() {
        println!();
        for warning in &warnings {
            warn_line(warning);
        }
    }
    Ok(())
}

pub fn show_statuses(doc: &WorkflowDocument) -> Result<()> {
    let flow = &doc.workflow().status_flow;
    heading("Statuses");
    for status in &flow.statuses {
        let colors = status.colors()?;
        let mut marks = Vec::new();
        if status.is_initial {
            marks.push("initial");
        }
        if status.is_final {
            marks.push("final");
        }
        let targets = flow.targets_of(&status.id);
        println!(
            "  {:<20} {} {}  {}{}",
            status.id.bright_white(),
            colors.background.dimmed(),
            colors.text.dimmed(),
            marks.join(", ").bright_magenta(),
            if targets.is_empty() {
                String::new()
            } else {
                format!("  -> {}", targets.join(", "))
            }
        );
    }
    Ok(())
}

pub fn show_fields(doc: &WorkflowDocument) -> Result<()> {
    heading("Custom fields");
    let fields = &doc.workflow().custom_fields;
    if fields.is_empty() {
        println!("  {}", "none".dimmed());
    }
    for (id, field) in fields {
        let mut flags = Vec::new();
        if field.required == Some(true) {
            flags.push("required");
        }
        if field.read_only == Some(true) {
            flags.push("read-only");
        }
        if field.hidden == Some(true) {
            flags.push("hidden");
        }
        println!(
            "  {:<24} {:<12} {}  {}",
            id.bright_white(),
            field.field_type.to_string(),
            field.name.dimmed(),
            flags.join(", ").bright_magenta()
        );
        if let Some(values) = &field.values {
            let names: Vec<&str> = values.iter().map(|v| v.name.as_str()).collect();
            if !names.is_empty() {
                println!("  {:<24} {}", "", names.join(" | ").dimmed());
            }
        }
    }
    Ok(())
}

fn trigger_line(trigger: &Trigger) -> String {
    let mut line = format!("{:<6} {}", trigger.channel(), trigger.template().unwrap_or("-"));
    if let Some(target) = trigger.target() {
        line.push_str(&format!(" -> {}", target.as_str()));
    }
    if let Some(condition) = trigger.condition() {
        line.push_str(&format!("  {}", condition.describe().dimmed()));
    }
    line
}

pub fn show_triggers(doc: &WorkflowDocument) -> Result<()> {
    heading("Creation triggers");
    for entry in doc.creation_catalog() {
        println!(
            "  {} {:<32} {}",
            on_off(doc.is_creation_trigger_enabled(&entry.trigger)),
            entry.id,
            trigger_line(&entry.trigger)
        );
    }

    let custom = doc.custom_creation_triggers();
    if !custom.is_empty() {
        heading("Custom triggers");
        for (index, trigger) in custom.iter().enumerate() {
            println!("{:>4}  {}", index.to_string().dimmed(), trigger_line(trigger));
        }
    }
    Ok(())
}

fn show_assignment(doc: &WorkflowDocument) {
    heading("Assignment triggers");
    for trigger in doc.assignment_catalog() {
        println!(
            "  {} {}",
            on_off(doc.is_assignment_trigger_enabled(&trigger)),
            trigger_line(&trigger)
        );
    }

    let Some(auto) = &doc.workflow().assignment.automatic_assignment else {
        println!("  automatic assignment {}", on_off(false));
        return;
    };
    println!("  automatic assignment {}  {}", on_off(auto.is_enabled), auto.email.dimmed());
    for flow in &auto.trigger_flows {
        for (index, level) in flow.levels.iter().enumerate() {
            println!(
                "{:>6}  after {:<8} {}",
                index.to_string().dimmed(),
                format_duration(level.next_level_time),
                level.assignee.as_deref().unwrap_or("-")
            );
        }
    }
}

pub fn show_channels(doc: Option<&WorkflowDocument>) {
    for (id, name) in REVIEW_CHANNELS {
        let selected = doc.map(|d| d.review_channels().iter().any(|c| c == id));
        let mark = match selected {
            Some(true) => "✓".bright_green().bold(),
            Some(false) => " ".normal(),
            None => "-".dimmed(),
        };
        println!("  {} {:<16} {}", mark, id, name.dimmed());
    }
}

pub fn show_templates() {
    for info in TEMPLATES {
        println!(
            "  {:<14} {}  {}",
            info.id.bright_white().bold(),
            info.title,
            info.description.dimmed()
        );
    }
}
