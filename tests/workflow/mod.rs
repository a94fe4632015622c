/// Workflow draft and export tests
use cxgen::workflow::color::{BLACK, Rgb, StatusColors};
use cxgen::workflow::condition::{FieldComparison, RESOLVED};
use cxgen::workflow::editor::validate_json;
use cxgen::workflow::model::Status;
use cxgen::workflow::triggers::{for_resolved_status, is_resolution};
use cxgen::workflow::{
    Condition, CustomTrigger, FieldType, NotificationChannel, StatusEdit, Target, WorkflowDocument, WorkflowType,
    export, export_file_name, render, templates,
};
use serde_json::{Value, json};

fn status_values(exported: &Value) -> &Vec<Value> {
    exported["status"]["values"].as_array().unwrap()
}

#[test]
fn test_open_status_gets_black_text() {
    let open = Status::new("Open", "#f4b000");
    let colors = open.colors().unwrap();

    let luminance = Rgb::parse("#f4b000").unwrap().luminance();
    assert!(luminance > 0.5, "luminance {}", luminance);
    assert_eq!(colors.text, BLACK);
}

#[test]
fn test_derived_status_colors_for_many_backgrounds() {
    let backgrounds = ["#000000", "#ffffff", "#f4b000", "#0088cc", "#8855dd", "#123456", "#fe01ab", "#7f7f7f"];
    for background in backgrounds {
        let colors = StatusColors::derive(Some(background), None, None, None).unwrap();
        assert_eq!(colors.status_text, background);

        let Rgb(r, g, b) = Rgb::parse(background).unwrap();
        let Rgb(lr, lg, lb) = Rgb::parse(&colors.status_background).unwrap();
        assert!(lr >= r && lg >= g && lb >= b, "{} -> {}", background, colors.status_background);
    }
}

#[test]
fn test_resolution_triggers_end_up_on_resolved_only() {
    for workflow_type in [WorkflowType::Ccm, WorkflowType::Orm, WorkflowType::Combined] {
        let mut doc = WorkflowDocument::new(workflow_type, "Harbour Cafe");
        doc.add_custom_trigger(CustomTrigger {
            channel: NotificationChannel::Sms,
            template: "managerFollowUp".to_string(),
            target: Target::Admin,
            contacts: Vec::new(),
            filter_by_location: true,
            condition: Some(Condition::and(vec![
                Condition::equals("status", RESOLVED),
                Condition::compare("rating", FieldComparison::NotEquals, "5"),
            ])),
        })
        .unwrap();

        let creation = &doc.workflow().workflow_creation.triggers;
        let expected: Vec<Value> = creation
            .iter()
            .filter(|t| is_resolution(t))
            .map(|t| serde_json::to_value(for_resolved_status(t)).unwrap())
            .collect();
        assert!(!expected.is_empty());

        let value = export(doc.workflow()).unwrap();
        let resolved = status_values(&value).iter().find(|s| s["id"] == RESOLVED).unwrap();
        assert_eq!(resolved["triggers"].as_array().unwrap(), &expected, "{}", workflow_type);

        for trigger in value["workflowCreation"]["triggers"].as_array().unwrap() {
            let template = trigger["template"].as_str().unwrap();
            assert!(!template.contains("Resolution"), "{} kept {}", workflow_type, template);
            assert_ne!(template, "managerFollowUp");
        }
    }
}

#[test]
fn test_draft_round_trip_then_export() {
    let mut doc = WorkflowDocument::new(WorkflowType::Ccm, "Harbour Cafe");
    doc.add_status("Escalated", "#ff0000").unwrap();
    doc.add_transition("In Progress", "Escalated").unwrap();
    doc.add_field("Table Number", None, FieldType::Number).unwrap();
    doc.edit_status(
        "Escalated",
        StatusEdit {
            high_priority_fields: Some(vec!["table_number".to_string()]),
            ..Default::default()
        },
    )
    .unwrap();

    let reloaded = WorkflowDocument::from_json(&doc.to_json().unwrap()).unwrap();
    assert_eq!(reloaded, doc);

    let text = render(reloaded.workflow()).unwrap();
    let value = validate_json(&text).unwrap();
    assert_eq!(export_file_name(reloaded.workflow()), "Harbour Cafe.json");

    let escalated = status_values(&value).iter().find(|s| s["id"] == "Escalated").unwrap();
    assert_eq!(escalated["textColor"], "#ffffff");
    assert_eq!(escalated["highPriorityFields"], json!(["table_number"]));
    assert!(value["customFields"].get("table_number").is_some());
}

#[test]
fn test_protected_statuses() {
    let mut doc = WorkflowDocument::default();
    let before = doc.clone();
    assert!(doc.remove_status("Open").is_err());
    assert!(doc.remove_status(RESOLVED).is_err());
    assert!(doc.add_status("Open", "#000000").is_err());
    assert!(doc.add_status("Late", "not a color").is_err());
    assert_eq!(doc, before);
}

#[test]
fn test_templates_export_cleanly() {
    for info in templates::TEMPLATES {
        let mut doc = templates::load(info.label).unwrap();
        doc.rename(&format!("{} Copy", info.label)).unwrap();

        let value = export(doc.workflow()).unwrap();
        assert_eq!(value["name"], format!("{} Copy", info.label));
        assert_eq!(value["reportSensor"], "inci1");
        for status in status_values(&value) {
            for key in ["backgroundColor", "textColor", "statusTextColor", "statusBackgroundColor"] {
                assert!(status[key].as_str().unwrap().starts_with('#'), "{} {}", info.id, key);
            }
        }
        for trigger in value["workflowCreation"]["triggers"].as_array().unwrap() {
            let template = trigger["template"].as_str().unwrap_or_default();
            assert!(!template.contains("Resolution"), "{} kept {} at creation", info.id, template);
        }
    }
}
