//! Built-in creation and assignment trigger catalogs
//!
//! Both catalogs are pure functions of the workflow type and name. The
//! document keeps only which entries are switched on, keyed by
//! [`Trigger::key`], and rebuilds the trigger lists from the catalog.

use serde_json::{Value, json};

use super::condition::{Condition, RESOLVED};
use super::model::{Notification, Target, Trigger, WorkflowType};
use super::type_values::camel_case;
use crate::error::{EditError, EditResult};

/// Resolution templates recognised even when their name says nothing about it
pub const RESOLUTION_TEMPLATES: &[&str] = &[
    "complaintResolutionAlert",
    "complaintResolutionAlert_email",
    "complaintResolutionAlert_sms",
    "complaintResolutionAlert_orm",
    "complaintResolutionAlert_orm_email",
    "complaintResolutionAlert_orm_sms",
    "complaintResolution_customer",
    "complaintResolution_customer_email",
    "complaintResolution_customer_sms",
];

/// A creation trigger offered to the user
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    /// Stable label such as `creation_email_ccm`
    pub id: String,
    pub trigger: Trigger,
}

impl CatalogEntry {
    /// Email entries start switched on
    pub fn enabled_by_default(&self) -> bool {
        self.id.contains("email")
    }

    /// Same channel, template and target, ignoring the condition
    pub fn matches(&self, other: &Trigger) -> bool {
        self.trigger.channel() == other.channel()
            && self.trigger.template() == other.template()
            && self.trigger.target() == other.target()
    }
}

/// Restrict admin recipients to the ticket's location
pub fn location_query() -> Value {
    json!({
        "condition": "and",
        "rules": [{ "field": "location", "operator": "eq", "value": "$location$" }]
    })
}

fn admin_alert(template: &str, contact_filter: &str, condition: Option<Condition>) -> Notification {
    let mut n = Notification::new(template, Target::Admin);
    n.contact_filters = vec![contact_filter.to_string()];
    n.admin_user_query = Some(location_query());
    n.condition = condition;
    n
}

fn base_creation_catalog() -> Vec<CatalogEntry> {
    let resolved = || Some(Condition::equals("status", RESOLVED));
    vec![
        CatalogEntry {
            id: "creation_email".into(),
            trigger: Trigger::Email(admin_alert("complaintCreationAlert_email", "ticketCreationAlert", None)),
        },
        CatalogEntry {
            id: "creation_sms".into(),
            trigger: Trigger::Sms(admin_alert("complaintCreationAlert_sms", "ticketCreationAlert", None)),
        },
        CatalogEntry {
            id: "resolution_email".into(),
            trigger: Trigger::Email(admin_alert(
                "complaintResolutionAlert_email",
                "ticketResolutionAlert",
                resolved(),
            )),
        },
        CatalogEntry {
            id: "resolution_sms".into(),
            trigger: Trigger::Sms(admin_alert(
                "complaintResolutionAlert_sms",
                "ticketResolutionAlert",
                resolved(),
            )),
        },
    ]
}

/// `complaintCreationAlert_email` -> `complaintCreationAlert_orm_email`
fn orm_template(template: &str) -> String {
    for suffix in ["_email", "_sms"] {
        if let Some(stem) = template.strip_suffix(suffix) {
            return format!("{}_orm{}", stem, suffix);
        }
    }
    template.to_string()
}

fn rename_template(trigger: &mut Trigger) {
    if let Trigger::Email(n) | Trigger::Sms(n) = trigger {
        n.template = orm_template(&n.template);
    }
}

/// Creation triggers available for a workflow of this type and name
pub fn creation_catalog(workflow_type: WorkflowType, workflow_name: &str) -> Vec<CatalogEntry> {
    let base = base_creation_catalog();
    match workflow_type {
        WorkflowType::Ccm => base,
        WorkflowType::Orm => base
            .into_iter()
            .map(|mut entry| {
                rename_template(&mut entry.trigger);
                entry
            })
            .collect(),
        WorkflowType::Combined => {
            let camel = camel_case(workflow_name);

            let ccm = base.iter().map(|entry| {
                let condition = Condition::and_with(entry.trigger.condition(), Condition::equals("type", &camel));
                CatalogEntry {
                    id: format!("{}_ccm", entry.id),
                    trigger: entry.trigger.clone().with_condition(Some(condition)),
                }
            });
            let orm = base.iter().map(|entry| {
                let condition =
                    Condition::and_with(entry.trigger.condition(), Condition::not_equals("type", &camel));
                let mut trigger = entry.trigger.clone().with_condition(Some(condition));
                rename_template(&mut trigger);
                CatalogEntry {
                    id: format!("{}_orm", entry.id),
                    trigger,
                }
            });
            ccm.chain(orm).collect()
        }
    }
}

fn assignment_alert(template: &str, append_edit_url: Option<bool>) -> Notification {
    let mut n = Notification::new(template, Target::Employee);
    n.append_edit_url = append_edit_url;
    n
}

/// Assignment notifications for a workflow of this type and name
pub fn assignment_catalog(workflow_type: WorkflowType, workflow_name: &str) -> Vec<Trigger> {
    match workflow_type {
        WorkflowType::Ccm => vec![
            Trigger::Email(assignment_alert("complaintAssignment_email", Some(false))),
            Trigger::Sms(assignment_alert("complaintAssignment_sms", Some(true))),
        ],
        WorkflowType::Orm => vec![
            Trigger::Email(assignment_alert("complaintAssignment_orm_email", None)),
            Trigger::Sms(assignment_alert("complaintAssignment_orm_sms", None)),
        ],
        WorkflowType::Combined => {
            let camel = camel_case(workflow_name);
            let is_ccm = || Some(Condition::equals("type", &camel));
            let is_orm = || Some(Condition::not_equals("type", &camel));
            vec![
                Trigger::Email(assignment_alert("complaintAssignment_email", None)).with_condition(is_ccm()),
                Trigger::Sms(assignment_alert("complaintAssignment_sms", None)).with_condition(is_ccm()),
                Trigger::Email(assignment_alert("complaintAssignment_orm_email", None)).with_condition(is_orm()),
                Trigger::Sms(assignment_alert("complaintAssignment_orm_sms", None)).with_condition(is_orm()),
            ]
        }
    }
}

/// Whether a creation trigger belongs on the `Resolved` status instead
pub fn is_resolution(trigger: &Trigger) -> bool {
    if let Some(template) = trigger.template() {
        if template.contains("Resolution") || template.contains("resolution") {
            return true;
        }
        if RESOLUTION_TEMPLATES.contains(&template) {
            return true;
        }
    }
    trigger
        .condition()
        .map(|c| c.tests_equality_to(RESOLVED))
        .unwrap_or(false)
}

/// Copy of a resolution trigger with the `status == Resolved` clause removed
pub fn for_resolved_status(trigger: &Trigger) -> Trigger {
    let stripped = trigger.condition().and_then(|c| c.strip_equality(RESOLVED));
    trigger.clone().with_condition(stripped)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum NotificationChannel {
    Email,
    Sms,
}

/// A user-defined creation notification
#[derive(Debug, Clone)]
pub struct CustomTrigger {
    pub channel: NotificationChannel,
    pub template: String,
    pub target: Target,
    pub contacts: Vec<String>,
    /// Only applies to admin targets
    pub filter_by_location: bool,
    pub condition: Option<Condition>,
}

impl CustomTrigger {
    pub fn build(self) -> EditResult<Trigger> {
        let template = self.template.trim();
        if template.is_empty() {
            return Err(EditError::MissingField("Template name"));
        }

        let mut n = Notification::new(template, self.target);
        n.contacts = self
            .contacts
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        if self.filter_by_location && self.target == Target::Admin {
            n.admin_user_query = Some(location_query());
        }
        n.condition = self.condition;

        Ok(match self.channel {
            NotificationChannel::Email => Trigger::Email(n),
            NotificationChannel::Sms => Trigger::Sms(n),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn templates(entries: &[CatalogEntry]) -> Vec<&str> {
        entries.iter().filter_map(|e| e.trigger.template()).collect()
    }

    #[test]
    fn test_ccm_catalog() {
        let catalog = creation_catalog(WorkflowType::Ccm, "Customer Satisfaction Survey");
        assert_eq!(
            templates(&catalog),
            vec![
                "complaintCreationAlert_email",
                "complaintCreationAlert_sms",
                "complaintResolutionAlert_email",
                "complaintResolutionAlert_sms",
            ]
        );
        let defaults: Vec<&str> = catalog
            .iter()
            .filter(|e| e.enabled_by_default())
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(defaults, vec!["creation_email", "resolution_email"]);
    }

    #[test]
    fn test_orm_catalog_renames_templates() {
        let catalog = creation_catalog(WorkflowType::Orm, "x");
        assert_eq!(templates(&catalog)[0], "complaintCreationAlert_orm_email");
        assert_eq!(templates(&catalog)[3], "complaintResolutionAlert_orm_sms");
        assert!(catalog[0].trigger.condition().is_none());
    }

    #[test]
    fn test_combined_catalog_branches() {
        let catalog = creation_catalog(WorkflowType::Combined, "Barista Feedback");
        assert_eq!(catalog.len(), 8);

        let ccm_creation = &catalog[0];
        assert_eq!(ccm_creation.id, "creation_email_ccm");
        assert_eq!(
            ccm_creation.trigger.condition(),
            Some(&Condition::equals("type", "baristaFeedback"))
        );

        let orm_resolution = &catalog[6];
        assert_eq!(orm_resolution.id, "resolution_email_orm");
        assert_eq!(orm_resolution.trigger.template(), Some("complaintResolutionAlert_orm_email"));
        assert_eq!(
            orm_resolution.trigger.condition(),
            Some(&Condition::and(vec![
                Condition::equals("status", RESOLVED),
                Condition::not_equals("type", "baristaFeedback"),
            ]))
        );
    }

    #[test]
    fn test_catalog_keys_are_distinct() {
        for workflow_type in [WorkflowType::Ccm, WorkflowType::Orm, WorkflowType::Combined] {
            let keys: Vec<String> = creation_catalog(workflow_type, "a b")
                .iter()
                .map(|e| e.trigger.key())
                .collect();
            for (i, key) in keys.iter().enumerate() {
                assert!(!keys[i + 1..].contains(key), "duplicate key {}", key);
            }
        }
    }

    #[test]
    fn test_assignment_catalog() {
        let ccm = assignment_catalog(WorkflowType::Ccm, "x");
        assert_eq!(ccm.len(), 2);
        assert_eq!(ccm[1].notification().and_then(|n| n.append_edit_url), Some(true));
        assert_eq!(ccm[0].target(), Some(Target::Employee));

        let combined = assignment_catalog(WorkflowType::Combined, "Grand Hotel");
        assert_eq!(combined.len(), 4);
        assert_eq!(combined[3].condition(), Some(&Condition::not_equals("type", "grandHotel")));
    }

    #[test]
    fn test_resolution_classification() {
        let by_name = Trigger::Email(Notification::new("guestResolution_email", Target::Customer));
        let by_list = Trigger::Sms(Notification::new("complaintResolution_customer_sms", Target::Customer));
        let by_condition = Trigger::Email(Notification::new("followUp", Target::Admin))
            .with_condition(Some(Condition::equals("status", RESOLVED)));
        let creation = Trigger::Email(Notification::new("complaintCreationAlert_email", Target::Admin));

        assert!(is_resolution(&by_name));
        assert!(is_resolution(&by_list));
        assert!(is_resolution(&by_condition));
        assert!(!is_resolution(&creation));
    }

    #[test]
    fn test_custom_trigger() {
        let trigger = CustomTrigger {
            channel: NotificationChannel::Sms,
            template: " vipAlert ".into(),
            target: Target::Admin,
            contacts: vec!["ops@x.com".into(), " ".into()],
            filter_by_location: true,
            condition: Some(Condition::equals("status", "Open")),
        }
        .build()
        .unwrap();

        let n = trigger.notification().unwrap();
        assert_eq!(trigger.channel(), "sms");
        assert_eq!(n.template, "vipAlert");
        assert_eq!(n.contacts, vec!["ops@x.com".to_string()]);
        assert_eq!(n.admin_user_query, Some(location_query()));
    }

    #[test]
    fn test_custom_trigger_needs_template() {
        let err = CustomTrigger {
            channel: NotificationChannel::Email,
            template: "  ".into(),
            target: Target::Employee,
            contacts: Vec::new(),
            filter_by_location: true,
            condition: None,
        }
        .build()
        .unwrap_err();
        assert_eq!(err, EditError::MissingField("Template name"));
    }

    #[test]
    fn test_for_resolved_status_strips_clause() {
        let catalog = creation_catalog(WorkflowType::Combined, "Barista Feedback");
        let mirrored = for_resolved_status(&catalog[2].trigger);
        assert_eq!(mirrored.condition(), Some(&Condition::equals("type", "baristaFeedback")));

        let ccm = creation_catalog(WorkflowType::Ccm, "x");
        assert_eq!(for_resolved_status(&ccm[2].trigger).condition(), None);
    }
}
