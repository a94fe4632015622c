//! Export pass producing the platform's workflow JSON
//!
//! The export is derived from a [`Workflow`] and never read back. Key order
//! follows the platform's own samples so diffs against hand-made files stay
//! readable.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::{Map, Value, json};

use super::condition::RESOLVED;
use super::model::{EnumField, FieldType, Status, Trigger, Workflow};
use super::triggers::{for_resolved_status, is_resolution};

pub const REPORT_SENSOR: &str = "inci1";
pub const TIME_ZONE: i64 = -330;
pub const EXPORT_ADMIN_LIST: &str = "admin";
pub const DEFAULT_FILE_STEM: &str = "workflow";

const COLOR_KEYS: [&str; 4] = ["backgroundColor", "textColor", "statusTextColor", "statusBackgroundColor"];

/// Keys the export always writes itself; pass-through sections never override them
const RESERVED_KEYS: &[&str] = &[
    "reportNamePrefix",
    "reporterNamePrefix",
    "descriptionFormat",
    "name",
    "nameTemplate",
    "descriptionTemplate",
    "type",
    "status",
    "priority",
    "customFields",
    "adminHierarchy",
    "timeSpent",
    "assignment",
    "workflowCreation",
    "timeZone",
    "reportSensor",
    "workflowName",
    "workflowType",
    "statusFlow",
    "adminListName",
];

fn to_value<T: Serialize>(value: &T, what: &str) -> Result<Value> {
    serde_json::to_value(value).with_context(|| format!("Failed to serialize {}", what))
}

/// `<workflowName>.json`, or `workflow.json` for an unnamed workflow
pub fn export_file_name(workflow: &Workflow) -> String {
    let name = workflow.workflow_name.trim();
    let stem = if name.is_empty() { DEFAULT_FILE_STEM } else { name };
    format!("{}.json", stem)
}

/// Build the platform document
pub fn export(workflow: &Workflow) -> Result<Value> {
    let name = workflow.workflow_name.trim();
    let has_resolved = workflow.status_flow.status(RESOLVED).is_some();

    // Resolution triggers never fire at creation; they live on the Resolved status, if any
    let (resolution, creation): (Vec<&Trigger>, Vec<&Trigger>) = workflow
        .workflow_creation
        .triggers
        .iter()
        .partition(|t| is_resolution(t));
    if !has_resolved && !resolution.is_empty() {
        warn!("Dropping {} resolution trigger(s): no '{}' status", resolution.len(), RESOLVED);
    }
    let mirrored: Vec<Trigger> = if has_resolved {
        resolution.into_iter().map(for_resolved_status).collect()
    } else {
        Vec::new()
    };
    debug!("Mirroring {} resolution trigger(s) onto '{}'", mirrored.len(), RESOLVED);

    let mut out = Map::new();
    out.insert("reportNamePrefix".into(), json!(non_empty_or(&workflow.report_name_prefix, &format!("{} Ticket", name))));
    out.insert("reporterNamePrefix".into(), json!(non_empty_or(&workflow.reporter_name_prefix, "Customer")));
    out.insert("descriptionFormat".into(), json!("text"));
    out.insert("name".into(), json!(name));
    out.insert(
        "nameTemplate".into(),
        json!(non_empty_or(&workflow.name_template, &format!("{} Complaint: $type$", name))),
    );
    out.insert(
        "descriptionTemplate".into(),
        json!(non_empty_or(&workflow.description_template, "Customer Complaint from $type$")),
    );
    out.insert("type".into(), export_type(&workflow.type_field)?);
    out.insert("status".into(), export_status_flow(workflow, &mirrored)?);
    out.insert("priority".into(), export_priority(&workflow.priority)?);
    out.insert("customFields".into(), export_custom_fields(workflow)?);

    if let Some(hierarchy) = &workflow.admin_hierarchy {
        let mut value = to_value(hierarchy, "admin hierarchy")?;
        value["list"] = json!(EXPORT_ADMIN_LIST);
        out.insert("adminHierarchy".into(), value);
    }
    out.insert("timeSpent".into(), to_value(&workflow.time_spent, "time spent")?);
    out.insert("assignment".into(), to_value(&workflow.assignment, "assignment")?);
    out.insert(
        "workflowCreation".into(),
        json!({
            "email": workflow.workflow_creation.email,
            "triggers": to_value(&creation, "creation triggers")?,
        }),
    );
    out.insert("timeZone".into(), json!(TIME_ZONE));
    out.insert("reportSensor".into(), json!(REPORT_SENSOR));

    for (key, value) in &workflow.extra {
        if !RESERVED_KEYS.contains(&key.as_str()) {
            out.insert(key.clone(), value.clone());
        }
    }

    info!("Exported workflow '{}'", name);
    Ok(Value::Object(out))
}

/// Pretty-printed export
pub fn render(workflow: &Workflow) -> Result<String> {
    serde_json::to_string_pretty(&export(workflow)?).context("Failed to render workflow JSON")
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

fn export_type(field: &EnumField) -> Result<Value> {
    let name = if field.name.trim().is_empty() { "Type" } else { field.name.as_str() };
    Ok(json!({
        "name": name,
        "type": "enum",
        "readOnly": true,
        "values": to_value(&field.values, "type values")?,
    }))
}

fn export_status_flow(workflow: &Workflow, mirrored: &[Trigger]) -> Result<Value> {
    let flow = &workflow.status_flow;
    let values = flow
        .statuses
        .iter()
        .map(|status| {
            let extra = if status.id == RESOLVED { mirrored } else { &[] };
            export_status(status, extra)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut out = Map::new();
    out.insert("name".into(), json!("Status"));
    out.insert("type".into(), json!("enum"));
    out.insert("values".into(), Value::Array(values));
    out.insert("transitions".into(), to_value(&flow.transitions, "transitions")?);
    if !flow.conditional_transitions.is_empty() {
        out.insert("conditionalTransitions".into(), json!(flow.conditional_transitions));
    }
    Ok(Value::Object(out))
}

fn export_status(status: &Status, mirrored: &[Trigger]) -> Result<Value> {
    let colors = status.colors()?;

    let mut out = Map::new();
    out.insert("id".into(), json!(status.id));
    out.insert("name".into(), json!(status.name));
    out.insert("backgroundColor".into(), json!(colors.background));
    out.insert("textColor".into(), json!(colors.text));
    out.insert("statusTextColor".into(), json!(colors.status_text));
    out.insert("statusBackgroundColor".into(), json!(colors.status_background));
    if !status.high_priority_fields.is_empty() {
        out.insert("highPriorityFields".into(), json!(status.high_priority_fields));
    }
    if !status.editable_fields.is_empty() {
        out.insert("editableFields".into(), json!(status.editable_fields));
    }
    if !status.fields_validation.is_empty() {
        out.insert("fieldsValidation".into(), json!(status.fields_validation));
    }
    if status.is_final {
        out.insert("finalState".into(), json!(true));
    }

    // Mirrored resolution triggers replace whatever the status carried
    let triggers: Vec<&Trigger> = if mirrored.is_empty() {
        status.triggers.iter().collect()
    } else {
        mirrored.iter().collect()
    };
    if !triggers.is_empty() {
        out.insert("triggers".into(), to_value(&triggers, "status triggers")?);
    }
    for (key, value) in &status.extra {
        out.entry(key.clone()).or_insert_with(|| value.clone());
    }
    Ok(Value::Object(out))
}

fn export_priority(priority: &EnumField) -> Result<Value> {
    let mut value = to_value(priority, "priority")?;
    if let Some(values) = value.get_mut("values").and_then(Value::as_array_mut) {
        for entry in values.iter_mut().filter_map(Value::as_object_mut) {
            for key in COLOR_KEYS {
                entry.shift_remove(key);
            }
        }
    }
    Ok(value)
}

fn export_custom_fields(workflow: &Workflow) -> Result<Value> {
    let mut out = Map::new();
    for (id, field) in &workflow.custom_fields {
        let mut field = field.clone();
        if field.field_type == FieldType::Enum {
            for option in field.values.iter_mut().flatten() {
                if !option.name.is_empty() {
                    option.id = option.name.clone();
                }
            }
        }
        out.insert(id.clone(), to_value(&field, "custom field")?);
    }
    Ok(Value::Object(out))
}
