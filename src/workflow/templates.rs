//! Built-in workflow templates
//!
//! Templates are platform-format JSON files embedded from `templates/` at
//! build time. Loading one maps it onto the default skeleton, so the admin
//! hierarchy and trigger catalogs still come from the skeleton.

use anyhow::{Context, Result};
use include_dir::{Dir, include_dir};
use indexmap::IndexMap;
use log::info;
use serde::Deserialize;
use serde_json::Value;

use super::document::{WorkflowDocument, skeleton};
use super::model::{CustomField, EnumField, Status, Transition, WorkflowType};
use crate::error::{EditError, EditResult};

static TEMPLATES_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// Status background used when a template does not set one
pub const TEMPLATE_STATUS_BACKGROUND: &str = "#f5f5f5";
const TEMPLATE_TEXT_COLOR: &str = "#000000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateInfo {
    /// File stem under `templates/`
    pub id: &'static str,
    /// Name shown in the template picker
    pub label: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub const TEMPLATES: &[TemplateInfo] = &[
    TemplateInfo {
        id: "barista",
        label: "Barista",
        title: "Coffee Shop Management",
        description: "Customer service workflow for coffee shops with location-based routing",
    },
    TemplateInfo {
        id: "grand_hotel",
        label: "Grand Hotel",
        title: "Hotel Management",
        description: "Guest service management with room and service tracking",
    },
    TemplateInfo {
        id: "selyn",
        label: "Selyn",
        title: "E-commerce Support",
        description: "Product and delivery issue management for online stores",
    },
    TemplateInfo {
        id: "dipra",
        label: "Dipra",
        title: "Tech Support",
        description: "Technical support workflow with version and device tracking",
    },
    TemplateInfo {
        id: "midnightdivas",
        label: "Midnightdivas",
        title: "Salon Management",
        description: "Appointment booking workflow for salons and spas",
    },
];

/// Find a template by id or label, ignoring case, spaces and underscores
pub fn find(query: &str) -> EditResult<&'static TemplateInfo> {
    let normalize = |s: &str| -> String {
        s.chars()
            .filter(|c| !c.is_whitespace() && *c != '_')
            .collect::<String>()
            .to_lowercase()
    };
    let wanted = normalize(query);
    TEMPLATES
        .iter()
        .find(|t| normalize(t.id) == wanted || normalize(t.label) == wanted)
        .ok_or_else(|| EditError::UnknownTemplate(query.trim().to_string()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TemplateStatus {
    id: String,
    name: String,
    #[serde(default)]
    background_color: Option<String>,
    #[serde(default)]
    text_color: Option<String>,
    #[serde(default)]
    status_text_color: Option<String>,
    #[serde(default)]
    status_background_color: Option<String>,
    #[serde(default)]
    high_priority_fields: Vec<String>,
    #[serde(default)]
    editable_fields: Vec<String>,
    #[serde(default)]
    fields_validation: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct TemplateStatusFlow {
    values: Vec<TemplateStatus>,
    #[serde(default)]
    transitions: Vec<Transition>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlatformTemplate {
    name: String,
    #[serde(default)]
    report_name_prefix: Option<String>,
    #[serde(default)]
    reporter_name_prefix: Option<String>,
    #[serde(default)]
    name_template: String,
    #[serde(default)]
    description_template: String,
    #[serde(rename = "type")]
    type_field: Option<EnumField>,
    status: TemplateStatusFlow,
    priority: Option<EnumField>,
    #[serde(default)]
    custom_fields: IndexMap<String, CustomField>,
}

/// Raw JSON of an embedded template
pub fn source(info: &TemplateInfo) -> Result<&'static str> {
    let path = format!("{}.json", info.id);
    TEMPLATES_DIR
        .get_file(&path)
        .with_context(|| format!("Missing template file {}", path))?
        .contents_utf8()
        .with_context(|| format!("Template {} is not valid UTF-8", path))
}

/// Build a draft from a built-in template
pub fn load(query: &str) -> Result<WorkflowDocument> {
    let info = find(query)?;
    let template: PlatformTemplate = serde_json::from_str(source(info)?)
        .with_context(|| format!("Failed to parse template '{}'", info.label))?;

    let mut workflow = skeleton(WorkflowType::Ccm, &template.name, &[]);
    if let Some(prefix) = template.report_name_prefix {
        workflow.report_name_prefix = prefix;
    }
    if let Some(prefix) = template.reporter_name_prefix {
        workflow.reporter_name_prefix = prefix;
    }
    workflow.name_template = template.name_template;
    workflow.description_template = template.description_template;
    if let Some(type_field) = template.type_field {
        workflow.type_field = type_field;
    }
    if let Some(priority) = template.priority {
        workflow.priority = priority;
    }
    workflow.custom_fields = template.custom_fields;

    let last = template.status.values.len().saturating_sub(1);
    workflow.status_flow.statuses = template
        .status
        .values
        .into_iter()
        .enumerate()
        .map(|(i, s)| {
            let mut status = Status::new(s.name, s.background_color.unwrap_or_else(|| "#e6e6e6".into()));
            status.id = s.id;
            status.is_initial = i == 0;
            status.is_final = i == last;
            status.text_color = Some(s.text_color.unwrap_or_else(|| TEMPLATE_TEXT_COLOR.into()));
            status.status_text_color = s.status_text_color;
            status.status_background_color =
                Some(s.status_background_color.unwrap_or_else(|| TEMPLATE_STATUS_BACKGROUND.into()));
            status.high_priority_fields = s.high_priority_fields;
            status.editable_fields = s.editable_fields;
            status.fields_validation = s.fields_validation;
            status
        })
        .collect();
    workflow.status_flow.transitions = template.status.transitions;

    info!("Loaded template '{}'", info.label);
    Ok(WorkflowDocument::from_template(workflow))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::export::export;

    #[test]
    fn test_every_template_loads() {
        for info in TEMPLATES {
            let doc = load(info.id).unwrap();
            let flow = &doc.workflow().status_flow;
            assert!(flow.statuses.first().unwrap().is_initial, "{}", info.id);
            assert!(flow.statuses.last().unwrap().is_final, "{}", info.id);
            assert_eq!(flow.statuses.iter().filter(|s| s.is_initial).count(), 1);
            assert!(doc.type_values_customized());
            assert!(export(doc.workflow()).is_ok());
        }
    }

    #[test]
    fn test_find_by_label() {
        assert_eq!(find("Grand Hotel").unwrap().id, "grand_hotel");
        assert_eq!(find("grand_hotel").unwrap().id, "grand_hotel");
        assert_eq!(find("BARISTA").unwrap().id, "barista");
        assert_eq!(find("nope"), Err(EditError::UnknownTemplate("nope".into())));
    }

    #[test]
    fn test_grand_hotel_contents() {
        let doc = load("Grand Hotel").unwrap();
        let wf = doc.workflow();

        assert_eq!(wf.workflow_name, "Grand Hotel Workflow");
        assert_eq!(wf.reporter_name_prefix, "Guest");
        assert_eq!(wf.type_field.values.len(), 3);
        assert_eq!(wf.priority.values.last().unwrap().id, "urgent");
        assert_eq!(wf.custom_fields["location"].values.as_ref().unwrap()[2].name, "Guest Room");
        assert_eq!(wf.status_flow.targets_of("assigned"), &["in_progress".to_string()]);

        let in_progress = wf.status_flow.status("in_progress").unwrap();
        let colors = in_progress.colors().unwrap();
        assert_eq!(colors.text, "#ffffff");
        assert_eq!(colors.status_text, "#8855dd");
        assert_eq!(colors.status_background, TEMPLATE_STATUS_BACKGROUND);
        assert!(wf.admin_hierarchy.is_some());
    }

    #[test]
    fn test_template_type_values_survive_rename() {
        let mut doc = load("selyn").unwrap();
        doc.rename("Selyn Support").unwrap();
        assert_eq!(doc.workflow().type_field.values[0].id, "product_issue");
    }
}
